use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::reservation::{self, ReservationStatus};
use crate::entities::{flight, passenger, seat};
use crate::error::{AppError, AppResult};
use crate::services::{booking, seats};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub flight_id: Uuid,
    pub passenger_id: Uuid,
    pub seat_id: Uuid,
    /// Booking user; defaults to the authenticated admin when omitted.
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub status: ReservationStatus,
    pub reservation_date: DateTime<Utc>,
    pub price: Decimal,
    pub reservation_code: String,
    pub flight_id: Uuid,
    pub passenger_id: Uuid,
    pub seat_id: Uuid,
    pub created_by: Uuid,
}

impl From<reservation::Model> for ReservationResponse {
    fn from(r: reservation::Model) -> Self {
        ReservationResponse {
            id: r.id,
            status: r.status,
            reservation_date: r.reservation_date.with_timezone(&Utc),
            price: r.price,
            reservation_code: r.reservation_code,
            flight_id: r.flight_id,
            passenger_id: r.passenger_id,
            seat_id: r.seat_id,
            created_by: r.created_by,
        }
    }
}

/// Book a seat on a flight for a passenger (admin)
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    let request = booking::BookSeatRequest {
        flight_id: payload.flight_id,
        passenger_id: payload.passenger_id,
        seat_id: payload.seat_id,
        created_by: payload.user_id.unwrap_or(claims.sub),
    };

    let created = booking::book(state.db.as_ref(), request).await?;

    Ok((StatusCode::CREATED, Json(ReservationResponse::from(created))))
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: ReservationStatus,
}

/// Overwrite a reservation's status (admin)
pub async fn change_reservation_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeStatusRequest>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = reservation::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

    let seat_id = reservation.seat_id;
    let mut active: reservation::ActiveModel = reservation.into();
    active.status = Set(payload.status);

    let release = state.config.release_seat_on_cancel
        && matches!(payload.status, ReservationStatus::Cancelled | ReservationStatus::Denied);

    let updated = state
        .db
        .transaction::<_, reservation::Model, AppError>(|txn| {
            Box::pin(async move {
                let updated = active.update(txn).await?;

                if release {
                    seats::release(txn, seat_id).await?;
                }

                Ok(updated)
            })
        })
        .await?;

    Ok(Json(ReservationResponse::from(updated)))
}

#[derive(Debug, Deserialize)]
pub struct ReservationFilterParams {
    pub status: Option<ReservationStatus>,
    pub flight_id: Option<Uuid>,
    pub passenger_id: Option<Uuid>,
}

/// List reservations with optional filters (admin). Empty result sets are
/// returned as empty lists, never as errors.
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(params): Query<ReservationFilterParams>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    let mut query = reservation::Entity::find();

    if let Some(status) = params.status {
        query = query.filter(reservation::Column::Status.eq(status));
    }
    if let Some(flight_id) = params.flight_id {
        query = query.filter(reservation::Column::FlightId.eq(flight_id));
    }
    if let Some(passenger_id) = params.passenger_id {
        query = query.filter(reservation::Column::PassengerId.eq(passenger_id));
    }

    let reservations = query
        .order_by_desc(reservation::Column::ReservationDate)
        .all(state.db.as_ref())
        .await?;

    let responses = reservations
        .into_iter()
        .map(ReservationResponse::from)
        .collect();

    Ok(Json(responses))
}

/// Get a reservation by id (admin)
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = reservation::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

    Ok(Json(ReservationResponse::from(reservation)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateReservationRequest {
    pub status: Option<ReservationStatus>,
    pub price: Option<Decimal>,
    pub flight_id: Option<Uuid>,
    pub passenger_id: Option<Uuid>,
    pub seat_id: Option<Uuid>,
}

/// Rewrite a reservation (admin). Moving the reservation to another seat
/// takes the new seat atomically; the old seat is only released when the
/// release-on-cancel flag is enabled.
pub async fn update_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = reservation::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

    if let Some(price) = payload.price {
        if price <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Price must be greater than zero".to_string(),
            ));
        }
    }

    let target_flight_id = payload.flight_id.unwrap_or(reservation.flight_id);
    let flight = flight::Entity::find_by_id(target_flight_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    if let Some(passenger_id) = payload.passenger_id {
        passenger::Entity::find_by_id(passenger_id)
            .one(state.db.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Passenger not found".to_string()))?;
    }

    let old_seat_id = reservation.seat_id;
    let seat_change = payload.seat_id.filter(|new_id| *new_id != old_seat_id);
    let flight_change = target_flight_id != reservation.flight_id;

    // The effective (flight, seat) pair must stay on one plane, whether the
    // seat moved, the flight moved, or both
    if seat_change.is_some() || flight_change {
        let effective_seat_id = seat_change.unwrap_or(old_seat_id);
        let effective_seat = seat::Entity::find_by_id(effective_seat_id)
            .one(state.db.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Seat not found".to_string()))?;

        if effective_seat.plane_id != flight.plane_id {
            return Err(AppError::Validation(
                "Seat does not belong to the plane of this flight".to_string(),
            ));
        }
    }

    let mut active: reservation::ActiveModel = reservation.into();

    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    active.flight_id = Set(target_flight_id);
    if let Some(passenger_id) = payload.passenger_id {
        active.passenger_id = Set(passenger_id);
    }
    if let Some(new_seat_id) = seat_change {
        active.seat_id = Set(new_seat_id);
    }

    let release_old = state.config.release_seat_on_cancel;
    let updated = state
        .db
        .transaction::<_, reservation::Model, AppError>(|txn| {
            Box::pin(async move {
                if let Some(new_seat_id) = seat_change {
                    seats::mark_taken(txn, new_seat_id).await?;

                    if release_old {
                        seats::release(txn, old_seat_id).await?;
                    }
                }

                Ok(active.update(txn).await?)
            })
        })
        .await?;

    Ok(Json(ReservationResponse::from(updated)))
}

/// Hard-delete a reservation (admin). The seat stays taken unless the
/// release-on-cancel flag is enabled.
pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let reservation = reservation::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

    let seat_id = reservation.seat_id;
    let release = state.config.release_seat_on_cancel;

    state
        .db
        .transaction::<_, (), AppError>(|txn| {
            Box::pin(async move {
                reservation::Entity::delete_by_id(id).exec(txn).await?;

                if release {
                    seats::release(txn, seat_id).await?;
                }

                Ok(())
            })
        })
        .await?;

    Ok(Json(serde_json::json!({ "message": "Reservation deleted" })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    use super::*;
    use crate::entities::seat::{SeatClass, SeatStatus};
    use crate::Config;

    fn state_with(db: DatabaseConnection) -> AppState {
        AppState {
            db: Arc::new(db),
            config: Config {
                database_url: "postgres://localhost/test".to_string(),
                jwt_secret: "secret".to_string(),
                jwt_expiration_hours: 24,
                server_host: "127.0.0.1".to_string(),
                server_port: 3000,
                release_seat_on_cancel: false,
            },
        }
    }

    fn a_reservation(flight_id: Uuid, seat_id: Uuid) -> reservation::Model {
        reservation::Model {
            id: Uuid::new_v4(),
            status: ReservationStatus::Confirmed,
            reservation_date: Utc::now().into(),
            price: Decimal::new(45000, 2),
            reservation_code: "AB12CD34".to_string(),
            flight_id,
            passenger_id: Uuid::new_v4(),
            seat_id,
            created_by: Uuid::new_v4(),
        }
    }

    fn flight_on(plane_id: Uuid) -> flight::Model {
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

    fn seat_on(plane_id: Uuid) -> seat::Model {
        seat::Model {
            id: Uuid::new_v4(),
            plane_id,
            number: "1A".to_string(),
            row: 1,
            column: "A".to_string(),
            seat_class: SeatClass::FirstClass,
            status: SeatStatus::Taken,
        }
    }

    #[tokio::test]
    async fn test_update_rejects_flight_on_another_plane_with_retained_seat() {
        let plane_a = Uuid::new_v4();
        let old_flight = flight_on(plane_a);
        let seat = seat_on(plane_a);
        let reservation = a_reservation(old_flight.id, seat.id);
        let reservation_id = reservation.id;

        // the new flight runs on a different plane; the seat stays behind
        let new_flight = flight_on(Uuid::new_v4());
        let new_flight_id = new_flight.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![reservation]])
            .append_query_results([vec![new_flight]])
            .append_query_results([vec![seat]])
            .into_connection();

        let payload = UpdateReservationRequest {
            status: None,
            price: None,
            flight_id: Some(new_flight_id),
            passenger_id: None,
            seat_id: None,
        };

        let err = update_reservation(
            axum::extract::State(state_with(db)),
            axum::extract::Path(reservation_id),
            Json(payload),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
