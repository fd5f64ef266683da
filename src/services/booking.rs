use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::reservation::{self, ReservationStatus};
use crate::entities::{flight, passenger, seat, user};
use crate::error::{AppError, AppResult};
use crate::services::seats;
use crate::utils::codes;

/// Collision retries for the 8-character reservation code. Collisions are
/// close to impossible at this keyspace, but the unique constraint makes a
/// retry loop cheap.
const CODE_RETRY_LIMIT: usize = 5;

pub struct BookSeatRequest {
    pub flight_id: Uuid,
    pub passenger_id: Uuid,
    pub seat_id: Uuid,
    pub created_by: Uuid,
}

/// Book a seat: the whole sequence (checks, reservation insert, seat
/// transition) runs in one transaction so a partial failure cannot leave a
/// reservation without a taken seat or vice versa. The seat transition is an
/// atomic conditional update, so two concurrent bookings of the same seat
/// resolve as one success and one conflict.
pub async fn book(
    db: &DatabaseConnection,
    request: BookSeatRequest,
) -> AppResult<reservation::Model> {
    let created = db
        .transaction::<_, reservation::Model, AppError>(|txn| {
            Box::pin(async move {
                let flight = flight::Entity::find_by_id(request.flight_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

                let passenger = passenger::Entity::find_by_id(request.passenger_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Passenger not found".to_string()))?;

                let seat = seat::Entity::find_by_id(request.seat_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Seat not found".to_string()))?;

                user::Entity::find_by_id(request.created_by)
                    .one(txn)
                    .await?
                    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

                if seat.plane_id != flight.plane_id {
                    return Err(AppError::Validation(
                        "Seat does not belong to the plane of this flight".to_string(),
                    ));
                }

                // A document may hold at most one confirmed reservation per flight
                let duplicate = reservation::Entity::find()
                    .filter(reservation::Column::FlightId.eq(flight.id))
                    .filter(reservation::Column::Status.eq(ReservationStatus::Confirmed))
                    .inner_join(passenger::Entity)
                    .filter(passenger::Column::Document.eq(passenger.document.clone()))
                    .one(txn)
                    .await?;

                if duplicate.is_some() {
                    return Err(AppError::Conflict(
                        "This passenger is already registered on this flight".to_string(),
                    ));
                }

                // Availability check and transition in a single statement
                seats::mark_taken(txn, seat.id).await?;

                let code = unique_reservation_code(txn).await?;

                let new_reservation = reservation::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    status: Set(ReservationStatus::Confirmed),
                    reservation_date: Set(Utc::now().into()),
                    price: Set(flight.base_price),
                    reservation_code: Set(code),
                    flight_id: Set(flight.id),
                    passenger_id: Set(passenger.id),
                    seat_id: Set(seat.id),
                    created_by: Set(request.created_by),
                };

                Ok(new_reservation.insert(txn).await?)
            })
        })
        .await?;

    tracing::info!(
        reservation_code = %created.reservation_code,
        seat_id = %created.seat_id,
        "Seat booked"
    );

    Ok(created)
}

async fn unique_reservation_code(txn: &DatabaseTransaction) -> AppResult<String> {
    for _ in 0..CODE_RETRY_LIMIT {
        let candidate = codes::reservation_code();

        let exists = reservation::Entity::find()
            .filter(reservation::Column::ReservationCode.eq(candidate.clone()))
            .one(txn)
            .await?;

        if exists.is_none() {
            return Ok(candidate);
        }
    }

    Err(AppError::Internal(
        "Could not generate a unique reservation code".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;
    use crate::entities::passenger::DocumentType;
    use crate::entities::seat::{SeatClass, SeatStatus};
    use crate::entities::user::UserRole;

    fn a_flight(plane_id: Uuid) -> flight::Model {
        flight::Model {
            id: Uuid::new_v4(),
            origin: "EZE".to_string(),
            destination: "MAD".to_string(),
            departure_date: Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap().into(),
            arrival_date: Utc.with_ymd_and_hms(2025, 9, 1, 22, 0, 0).unwrap().into(),
            base_price: Decimal::new(45000, 2),
            status_id: 1,
            plane_id,
            created_at: Utc::now().into(),
        }
    }

    fn a_passenger() -> passenger::Model {
        passenger::Model {
            id: Uuid::new_v4(),
            name: "Jane Doe".to_string(),
            document: "X1234567".to_string(),
            document_type: DocumentType::Passport,
            email: "jane@example.com".to_string(),
            phone: "+54 11 5555 0000".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            created_at: Utc::now().into(),
        }
    }

    fn a_user() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            email: "agent@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "Agent".to_string(),
            role: UserRole::Agent,
            created_at: Utc::now().into(),
        }
    }

    fn seat_on(plane_id: Uuid) -> seat::Model {
        seat::Model {
            id: Uuid::new_v4(),
            plane_id,
            number: "1A".to_string(),
            row: 1,
            column: "A".to_string(),
            seat_class: SeatClass::FirstClass,
            status: SeatStatus::Available,
        }
    }

    fn request_for(
        flight: &flight::Model,
        passenger: &passenger::Model,
        seat: &seat::Model,
        user: &user::Model,
    ) -> BookSeatRequest {
        BookSeatRequest {
            flight_id: flight.id,
            passenger_id: passenger.id,
            seat_id: seat.id,
            created_by: user.id,
        }
    }

    #[tokio::test]
    async fn test_reservations_join_their_creating_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<reservation::Model>::new()])
            .into_connection();

        let found = reservation::Entity::find()
            .inner_join(user::Entity)
            .filter(user::Column::Email.eq("agent@example.com"))
            .all(&db)
            .await
            .unwrap();

        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_book_fails_when_flight_is_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<flight::Model>::new()])
            .into_connection();

        let request = BookSeatRequest {
            flight_id: Uuid::new_v4(),
            passenger_id: Uuid::new_v4(),
            seat_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
        };

        let err = book(&db, request).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_book_rejects_seat_from_another_plane() {
        let flight = a_flight(Uuid::new_v4());
        let passenger = a_passenger();
        let seat = seat_on(Uuid::new_v4());
        let user = a_user();
        let request = request_for(&flight, &passenger, &seat, &user);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![flight]])
            .append_query_results([vec![passenger]])
            .append_query_results([vec![seat]])
            .append_query_results([vec![user]])
            .into_connection();

        let err = book(&db, request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_book_creates_confirmed_reservation_at_flight_price() {
        let plane_id = Uuid::new_v4();
        let flight = a_flight(plane_id);
        let passenger = a_passenger();
        let seat = seat_on(plane_id);
        let user = a_user();
        let request = request_for(&flight, &passenger, &seat, &user);

        let created = reservation::Model {
            id: Uuid::new_v4(),
            status: ReservationStatus::Confirmed,
            reservation_date: Utc::now().into(),
            price: flight.base_price,
            reservation_code: "AB12CD34".to_string(),
            flight_id: flight.id,
            passenger_id: passenger.id,
            seat_id: seat.id,
            created_by: user.id,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![flight.clone()]])
            .append_query_results([vec![passenger]])
            .append_query_results([vec![seat]])
            .append_query_results([vec![user]])
            // no duplicate passenger on this flight
            .append_query_results([Vec::<reservation::Model>::new()])
            // reservation code uniqueness check
            .append_query_results([Vec::<reservation::Model>::new()])
            // insert returning
            .append_query_results([vec![created]])
            // seat transition
            .append_exec_results([sea_orm::MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let reservation = book(&db, request).await.unwrap();
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(reservation.price, flight.base_price);
        assert_eq!(reservation.reservation_code.len(), 8);
    }

    #[tokio::test]
    async fn test_book_rejects_duplicate_passenger_on_flight() {
        let plane_id = Uuid::new_v4();
        let flight = a_flight(plane_id);
        let passenger = a_passenger();
        let seat = seat_on(plane_id);
        let user = a_user();
        let request = request_for(&flight, &passenger, &seat, &user);

        let existing = reservation::Model {
            id: Uuid::new_v4(),
            status: ReservationStatus::Confirmed,
            reservation_date: Utc::now().into(),
            price: Decimal::new(45000, 2),
            reservation_code: "AB12CD34".to_string(),
            flight_id: flight.id,
            passenger_id: passenger.id,
            seat_id: Uuid::new_v4(),
            created_by: user.id,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![flight]])
            .append_query_results([vec![passenger]])
            .append_query_results([vec![seat]])
            .append_query_results([vec![user]])
            .append_query_results([vec![existing]])
            .into_connection();

        let err = book(&db, request).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
