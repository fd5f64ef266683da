use axum::{
    extract::{Path, State},
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::reservation::{self, ReservationStatus};
use crate::entities::{flight, passenger};
use crate::error::{AppError, AppResult};
use crate::handlers::reservations::ReservationResponse;
use crate::AppState;

/// Passenger manifest for a flight: everyone holding a confirmed reservation.
pub async fn passengers_by_flight(
    State(state): State<AppState>,
    Path(flight_id): Path<Uuid>,
) -> AppResult<Json<Vec<passenger::Model>>> {
    flight::Entity::find_by_id(flight_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    let reservations = reservation::Entity::find()
        .filter(reservation::Column::FlightId.eq(flight_id))
        .filter(reservation::Column::Status.eq(ReservationStatus::Confirmed))
        .all(state.db.as_ref())
        .await?;

    let passenger_ids: Vec<Uuid> = reservations.iter().map(|r| r.passenger_id).collect();

    let passengers = passenger::Entity::find()
        .filter(passenger::Column::Id.is_in(passenger_ids))
        .order_by_asc(passenger::Column::Name)
        .all(state.db.as_ref())
        .await?;

    Ok(Json(passengers))
}

/// Confirmed reservations held by a passenger.
pub async fn active_reservations(
    State(state): State<AppState>,
    Path(passenger_id): Path<Uuid>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    passenger::Entity::find_by_id(passenger_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Passenger not found".to_string()))?;

    let reservations = reservation::Entity::find()
        .filter(reservation::Column::PassengerId.eq(passenger_id))
        .filter(reservation::Column::Status.eq(ReservationStatus::Confirmed))
        .order_by_desc(reservation::Column::ReservationDate)
        .all(state.db.as_ref())
        .await?;

    let responses = reservations
        .into_iter()
        .map(ReservationResponse::from)
        .collect();

    Ok(Json(responses))
}
