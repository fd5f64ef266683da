use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::reservation::{self, ReservationStatus};
use crate::entities::ticket::{self, TicketStatus};
use crate::entities::{flight, passenger};
use crate::error::{AppError, AppResult};
use crate::utils::codes;

const BARCODE_RETRY_LIMIT: usize = 5;

/// Issue a ticket from a confirmed reservation. At most one ticket can ever
/// exist per reservation; the whole sequence runs in one transaction, with
/// the reservation row locked so concurrent issuers serialize on it.
pub async fn issue(db: &DatabaseConnection, reservation_id: Uuid) -> AppResult<ticket::Model> {
    let issued = db
        .transaction::<_, ticket::Model, AppError>(|txn| {
            Box::pin(async move {
                let reservation = reservation::Entity::find_by_id(reservation_id)
                    .lock_exclusive()
                    .one(txn)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

                if reservation.status != ReservationStatus::Confirmed {
                    return Err(AppError::Precondition(
                        "A ticket can only be issued from a confirmed reservation".to_string(),
                    ));
                }

                let existing = ticket::Entity::find()
                    .filter(ticket::Column::ReservationId.eq(reservation.id))
                    .one(txn)
                    .await?;

                if existing.is_some() {
                    return Err(AppError::Conflict(
                        "A ticket already exists for this reservation".to_string(),
                    ));
                }

                let barcode = unique_barcode(txn).await?;

                let new_ticket = ticket::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    barcode: Set(barcode),
                    issue_date: Set(Utc::now().into()),
                    status: Set(TicketStatus::Active),
                    reservation_id: Set(reservation.id),
                };

                // Losing a race on the reservation_id unique constraint is
                // still the duplicate-ticket case, not an infrastructure error
                new_ticket.insert(txn).await.map_err(|err| {
                    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                        AppError::Conflict(
                            "A ticket already exists for this reservation".to_string(),
                        )
                    } else {
                        AppError::Database(err)
                    }
                })
            })
        })
        .await?;

    tracing::info!(barcode = %issued.barcode, "Ticket issued");

    Ok(issued)
}

async fn unique_barcode(txn: &DatabaseTransaction) -> AppResult<String> {
    for _ in 0..BARCODE_RETRY_LIMIT {
        let candidate = codes::barcode();

        let exists = ticket::Entity::find()
            .filter(ticket::Column::Barcode.eq(candidate.clone()))
            .one(txn)
            .await?;

        if exists.is_none() {
            return Ok(candidate);
        }
    }

    Err(AppError::Internal(
        "Could not generate a unique barcode".to_string(),
    ))
}

#[derive(Debug, Serialize)]
pub struct TicketInfo {
    pub barcode: String,
    pub status: TicketStatus,
    pub reservation: TicketReservationInfo,
}

#[derive(Debug, Serialize)]
pub struct TicketReservationInfo {
    pub id: Uuid,
    pub status: ReservationStatus,
    pub passenger: String,
    pub flight: String,
}

/// Case-insensitive barcode lookup, denormalized for reporting.
pub async fn lookup(db: &DatabaseConnection, barcode: &str) -> AppResult<TicketInfo> {
    let ticket = ticket::Entity::find()
        .filter(Expr::expr(Func::upper(Expr::col(ticket::Column::Barcode))).eq(barcode.to_uppercase()))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    let reservation = reservation::Entity::find_by_id(ticket.reservation_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal("Ticket without reservation".to_string()))?;

    let passenger = passenger::Entity::find_by_id(reservation.passenger_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal("Reservation without passenger".to_string()))?;

    let flight = flight::Entity::find_by_id(reservation.flight_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal("Reservation without flight".to_string()))?;

    Ok(TicketInfo {
        barcode: ticket.barcode,
        status: ticket.status,
        reservation: TicketReservationInfo {
            id: reservation.id,
            status: reservation.status,
            passenger: passenger.describe(),
            flight: flight.describe(),
        },
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn a_reservation(status: ReservationStatus) -> reservation::Model {
        reservation::Model {
            id: Uuid::new_v4(),
            status,
            reservation_date: Utc::now().into(),
            price: Decimal::new(45000, 2),
            reservation_code: "AB12CD34".to_string(),
            flight_id: Uuid::new_v4(),
            passenger_id: Uuid::new_v4(),
            seat_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
        }
    }

    fn a_ticket(reservation_id: Uuid) -> ticket::Model {
        ticket::Model {
            id: Uuid::new_v4(),
            barcode: "9K2L5M8N0P3Q".to_string(),
            issue_date: Utc::now().into(),
            status: TicketStatus::Active,
            reservation_id,
        }
    }

    #[tokio::test]
    async fn test_issue_fails_for_missing_reservation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<reservation::Model>::new()])
            .into_connection();

        let err = issue(&db, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_issue_requires_confirmed_reservation() {
        let denied = a_reservation(ReservationStatus::Denied);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![denied]])
            .into_connection();

        let err = issue(&db, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
    }

    #[tokio::test]
    async fn test_issue_conflicts_on_second_ticket() {
        let confirmed = a_reservation(ReservationStatus::Confirmed);
        let existing = a_ticket(confirmed.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![confirmed]])
            .append_query_results([vec![existing]])
            .into_connection();

        let err = issue(&db, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_issue_creates_active_ticket() {
        let confirmed = a_reservation(ReservationStatus::Confirmed);
        let inserted = a_ticket(confirmed.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // reservation resolution
            .append_query_results([vec![confirmed]])
            // no existing ticket
            .append_query_results([Vec::<ticket::Model>::new()])
            // barcode uniqueness check
            .append_query_results([Vec::<ticket::Model>::new()])
            // insert returning
            .append_query_results([vec![inserted.clone()]])
            .into_connection();

        let ticket = issue(&db, inserted.reservation_id).await.unwrap();
        assert_eq!(ticket.status, TicketStatus::Active);
        assert_eq!(ticket.barcode.len(), codes::BARCODE_LEN);
        assert_eq!(ticket.reservation_id, inserted.reservation_id);

        // the reservation read must lock the row so concurrent issuers
        // serialize instead of racing the exists check
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("FOR UPDATE"));
    }
}
