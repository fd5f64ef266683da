use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::flight;
use crate::error::{AppError, AppResult};

/// Reject flights whose [departure, arrival) interval intersects another
/// flight on the same plane. `excluding` skips the flight's own row on
/// update. Touching boundaries (arrival_a == departure_b) do not overlap.
pub async fn validate_schedule<C: ConnectionTrait>(
    conn: &C,
    plane_id: Uuid,
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
    excluding: Option<Uuid>,
) -> AppResult<()> {
    if arrival <= departure {
        return Err(AppError::Validation(
            "Arrival date must be after the departure date".to_string(),
        ));
    }

    let mut query = flight::Entity::find()
        .filter(flight::Column::PlaneId.eq(plane_id))
        .filter(flight::Column::DepartureDate.lt(arrival))
        .filter(flight::Column::ArrivalDate.gt(departure));

    if let Some(flight_id) = excluding {
        query = query.filter(flight::Column::Id.ne(flight_id));
    }

    if query.one(conn).await?.is_some() {
        return Err(AppError::Conflict(
            "The plane already has a flight in that time range".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn flight_at(dep_hour: u32, arr_hour: u32) -> flight::Model {
        let dep = Utc.with_ymd_and_hms(2025, 9, 1, dep_hour, 0, 0).unwrap();
        let arr = Utc.with_ymd_and_hms(2025, 9, 1, arr_hour, 0, 0).unwrap();
        flight::Model {
            id: Uuid::new_v4(),
            origin: "EZE".to_string(),
            destination: "MAD".to_string(),
            departure_date: dep.into(),
            arrival_date: arr.into(),
            base_price: Decimal::new(45000, 2),
            status_id: 1,
            plane_id: Uuid::new_v4(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_rejects_arrival_before_departure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let dep = Utc.with_ymd_and_hms(2025, 9, 1, 14, 0, 0).unwrap();
        let arr = Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap();

        let err = validate_schedule(&db, Uuid::new_v4(), dep, arr, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_rejects_equal_departure_and_arrival() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let at = Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap();

        let err = validate_schedule(&db, Uuid::new_v4(), at, at, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_conflicts_when_an_overlapping_flight_exists() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![flight_at(10, 14)]])
            .into_connection();

        let dep = Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap();
        let arr = Utc.with_ymd_and_hms(2025, 9, 1, 16, 0, 0).unwrap();

        let err = validate_schedule(&db, Uuid::new_v4(), dep, arr, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_passes_when_plane_is_free() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<flight::Model>::new()])
            .into_connection();

        let dep = Utc.with_ymd_and_hms(2025, 9, 1, 14, 0, 0).unwrap();
        let arr = Utc.with_ymd_and_hms(2025, 9, 1, 18, 0, 0).unwrap();

        assert!(validate_schedule(&db, Uuid::new_v4(), dep, arr, None)
            .await
            .is_ok());
    }
}
