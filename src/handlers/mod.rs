pub mod auth;
pub mod flight_statuses;
pub mod flights;
pub mod passengers;
pub mod planes;
pub mod reports;
pub mod reservations;
pub mod tickets;
