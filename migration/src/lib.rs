pub use sea_orm_migration::prelude::*;

mod m20250810_000001_create_users;
mod m20250810_000002_create_planes;
mod m20250810_000003_create_seats;
mod m20250810_000004_create_flight_statuses;
mod m20250810_000005_create_flights;
mod m20250810_000006_create_flight_staff;
mod m20250810_000007_create_passengers;
mod m20250810_000008_create_reservations;
mod m20250810_000009_create_tickets;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250810_000001_create_users::Migration),
            Box::new(m20250810_000002_create_planes::Migration),
            Box::new(m20250810_000003_create_seats::Migration),
            Box::new(m20250810_000004_create_flight_statuses::Migration),
            Box::new(m20250810_000005_create_flights::Migration),
            Box::new(m20250810_000006_create_flight_staff::Migration),
            Box::new(m20250810_000007_create_passengers::Migration),
            Box::new(m20250810_000008_create_reservations::Migration),
            Box::new(m20250810_000009_create_tickets::Migration),
        ]
    }
}
