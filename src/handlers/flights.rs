use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::seat::{SeatClass, SeatStatus};
use crate::entities::{flight, flight_staff, flight_status, plane, user};
use crate::error::{AppError, AppResult};
use crate::services::{schedule, seats};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateFlightRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: DateTime<Utc>,
    pub arrival_date: DateTime<Utc>,
    pub base_price: Decimal,
    pub status_id: i32,
    pub plane_id: Uuid,
    pub staff_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlightRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<DateTime<Utc>>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub base_price: Option<Decimal>,
    pub status_id: Option<i32>,
    pub staff_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize)]
pub struct FlightResponse {
    pub id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_date: DateTime<Utc>,
    pub arrival_date: DateTime<Utc>,
    pub duration_minutes: i64,
    pub base_price: Decimal,
    pub status: String,
    pub plane: String,
    pub plane_id: Uuid,
}

fn flight_response(
    f: flight::Model,
    statuses: &[flight_status::Model],
    planes: &[plane::Model],
) -> FlightResponse {
    let status = statuses.iter().find(|s| s.id == f.status_id);
    let plane = planes.iter().find(|p| p.id == f.plane_id);

    FlightResponse {
        id: f.id,
        duration_minutes: f.duration_minutes(),
        origin: f.origin,
        destination: f.destination,
        departure_date: f.departure_date.with_timezone(&Utc),
        arrival_date: f.arrival_date.with_timezone(&Utc),
        base_price: f.base_price,
        status: status.map(|s| s.name.clone()).unwrap_or_default(),
        plane: plane.map(|p| p.describe()).unwrap_or_default(),
        plane_id: f.plane_id,
    }
}

/// Upcoming flights, soonest first
pub async fn available_flights(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<FlightResponse>>> {
    let flights = flight::Entity::find()
        .filter(flight::Column::DepartureDate.gt(Utc::now()))
        .order_by_asc(flight::Column::DepartureDate)
        .all(state.db.as_ref())
        .await?;

    let statuses = flight_status::Entity::find().all(state.db.as_ref()).await?;
    let planes = plane::Entity::find().all(state.db.as_ref()).await?;

    let responses = flights
        .into_iter()
        .map(|f| flight_response(f, &statuses, &planes))
        .collect();

    Ok(Json(responses))
}

#[derive(Debug, Deserialize)]
pub struct FlightFilterParams {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Filter flights by origin, destination and departure date. Without
/// parameters this returns every flight.
pub async fn filter_flights(
    State(state): State<AppState>,
    Query(params): Query<FlightFilterParams>,
) -> AppResult<Json<Vec<FlightResponse>>> {
    let mut query = flight::Entity::find();

    if let Some(origin) = &params.origin {
        query = query.filter(Expr::col(flight::Column::Origin).ilike(format!("%{}%", origin)));
    }

    if let Some(destination) = &params.destination {
        query = query
            .filter(Expr::col(flight::Column::Destination).ilike(format!("%{}%", destination)));
    }

    if let Some(date) = params.date {
        let start = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc();
        let end = start + chrono::Duration::days(1);
        query = query
            .filter(flight::Column::DepartureDate.gte(start))
            .filter(flight::Column::DepartureDate.lt(end));
    }

    let flights = query
        .order_by_asc(flight::Column::DepartureDate)
        .all(state.db.as_ref())
        .await?;

    let statuses = flight_status::Entity::find().all(state.db.as_ref()).await?;
    let planes = plane::Entity::find().all(state.db.as_ref()).await?;

    let responses = flights
        .into_iter()
        .map(|f| flight_response(f, &statuses, &planes))
        .collect();

    Ok(Json(responses))
}

/// Get flight details
pub async fn flight_detail(
    State(state): State<AppState>,
    Path(flight_id): Path<Uuid>,
) -> AppResult<Json<FlightResponse>> {
    let flight = flight::Entity::find_by_id(flight_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    let statuses = flight_status::Entity::find().all(state.db.as_ref()).await?;
    let planes = plane::Entity::find().all(state.db.as_ref()).await?;

    Ok(Json(flight_response(flight, &statuses, &planes)))
}

#[derive(Debug, Serialize)]
pub struct SeatResponse {
    pub id: Uuid,
    pub number: String,
    pub row: i32,
    pub column: String,
    pub seat_class: SeatClass,
    pub status: SeatStatus,
}

/// Available seats on the plane serving a flight, in seat-map order
pub async fn available_seats(
    State(state): State<AppState>,
    Path(flight_id): Path<Uuid>,
) -> AppResult<Json<Vec<SeatResponse>>> {
    let flight = flight::Entity::find_by_id(flight_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    let seats = seats::list_available(state.db.as_ref(), flight.plane_id).await?;

    let responses = seats
        .into_iter()
        .map(|s| SeatResponse {
            id: s.id,
            number: s.number,
            row: s.row,
            column: s.column,
            seat_class: s.seat_class,
            status: s.status,
        })
        .collect();

    Ok(Json(responses))
}

// ============ Admin flight management ============

/// List all flights (admin)
pub async fn list_flights(State(state): State<AppState>) -> AppResult<Json<Vec<FlightResponse>>> {
    let flights = flight::Entity::find()
        .order_by_asc(flight::Column::DepartureDate)
        .all(state.db.as_ref())
        .await?;

    let statuses = flight_status::Entity::find().all(state.db.as_ref()).await?;
    let planes = plane::Entity::find().all(state.db.as_ref()).await?;

    let responses = flights
        .into_iter()
        .map(|f| flight_response(f, &statuses, &planes))
        .collect();

    Ok(Json(responses))
}

/// Create a flight (admin). The plane must be free in the requested time
/// range; touching boundaries are allowed.
pub async fn create_flight(
    State(state): State<AppState>,
    Json(payload): Json<CreateFlightRequest>,
) -> AppResult<(StatusCode, Json<flight::Model>)> {
    if payload.base_price <= Decimal::ZERO {
        return Err(AppError::Validation(
            "Base price must be greater than zero".to_string(),
        ));
    }

    plane::Entity::find_by_id(payload.plane_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Plane not found".to_string()))?;

    flight_status::Entity::find_by_id(payload.status_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Flight status not found".to_string()))?;

    schedule::validate_schedule(
        state.db.as_ref(),
        payload.plane_id,
        payload.departure_date,
        payload.arrival_date,
        None,
    )
    .await?;

    let staff_ids = payload.staff_ids.clone().unwrap_or_default();
    for user_id in &staff_ids {
        user::Entity::find_by_id(*user_id)
            .one(state.db.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Staff user not found".to_string()))?;
    }

    let created = state
        .db
        .transaction::<_, flight::Model, AppError>(|txn| {
            Box::pin(async move {
                let new_flight = flight::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    origin: Set(payload.origin.clone()),
                    destination: Set(payload.destination.clone()),
                    departure_date: Set(payload.departure_date.into()),
                    arrival_date: Set(payload.arrival_date.into()),
                    base_price: Set(payload.base_price),
                    status_id: Set(payload.status_id),
                    plane_id: Set(payload.plane_id),
                    ..Default::default()
                };

                let flight = new_flight.insert(txn).await?;

                if !staff_ids.is_empty() {
                    let assignments = staff_ids.iter().map(|user_id| flight_staff::ActiveModel {
                        flight_id: Set(flight.id),
                        user_id: Set(*user_id),
                    });
                    flight_staff::Entity::insert_many(assignments).exec(txn).await?;
                }

                Ok(flight)
            })
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a flight (admin); the overlap check excludes the flight's own row
pub async fn update_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFlightRequest>,
) -> AppResult<Json<flight::Model>> {
    let flight = flight::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    let departure = payload
        .departure_date
        .unwrap_or_else(|| flight.departure_date.with_timezone(&Utc));
    let arrival = payload
        .arrival_date
        .unwrap_or_else(|| flight.arrival_date.with_timezone(&Utc));

    schedule::validate_schedule(state.db.as_ref(), flight.plane_id, departure, arrival, Some(flight.id))
        .await?;

    if let Some(price) = payload.base_price {
        if price <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Base price must be greater than zero".to_string(),
            ));
        }
    }

    if let Some(status_id) = payload.status_id {
        flight_status::Entity::find_by_id(status_id)
            .one(state.db.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Flight status not found".to_string()))?;
    }

    let flight_id = flight.id;
    let mut active: flight::ActiveModel = flight.into();

    if let Some(origin) = payload.origin {
        active.origin = Set(origin);
    }
    if let Some(destination) = payload.destination {
        active.destination = Set(destination);
    }
    active.departure_date = Set(departure.into());
    active.arrival_date = Set(arrival.into());
    if let Some(price) = payload.base_price {
        active.base_price = Set(price);
    }
    if let Some(status_id) = payload.status_id {
        active.status_id = Set(status_id);
    }

    let staff_ids = payload.staff_ids;
    if let Some(staff_ids) = &staff_ids {
        for user_id in staff_ids {
            user::Entity::find_by_id(*user_id)
                .one(state.db.as_ref())
                .await?
                .ok_or_else(|| AppError::NotFound("Staff user not found".to_string()))?;
        }
    }

    let updated = state
        .db
        .transaction::<_, flight::Model, AppError>(|txn| {
            Box::pin(async move {
                let flight = active.update(txn).await?;

                // Replace the staff assignment set when one is provided
                if let Some(staff_ids) = staff_ids {
                    flight_staff::Entity::delete_many()
                        .filter(flight_staff::Column::FlightId.eq(flight_id))
                        .exec(txn)
                        .await?;

                    if !staff_ids.is_empty() {
                        let assignments =
                            staff_ids.iter().map(|user_id| flight_staff::ActiveModel {
                                flight_id: Set(flight_id),
                                user_id: Set(*user_id),
                            });
                        flight_staff::Entity::insert_many(assignments).exec(txn).await?;
                    }
                }

                Ok(flight)
            })
        })
        .await?;

    Ok(Json(updated))
}

/// Delete a flight (admin)
pub async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = flight::Entity::delete_by_id(id).exec(state.db.as_ref()).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Flight not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Flight deleted" })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    use super::*;
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

    fn a_flight() -> flight::Model {
        flight::Model {
            id: Uuid::new_v4(),
            origin: "EZE".to_string(),
            destination: "MAD".to_string(),
            departure_date: Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap().into(),
            arrival_date: Utc.with_ymd_and_hms(2025, 9, 1, 22, 0, 0).unwrap().into(),
            base_price: Decimal::new(45000, 2),
            status_id: 1,
            plane_id: Uuid::new_v4(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_update_flight_rejects_unknown_staff_user() {
        let flight = a_flight();
        let flight_id = flight.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![flight]])
            // no overlapping flight on the plane
            .append_query_results([Vec::<flight::Model>::new()])
            // the staff id resolves to nobody
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let payload = UpdateFlightRequest {
            origin: None,
            destination: None,
            departure_date: None,
            arrival_date: None,
            base_price: None,
            status_id: None,
            staff_ids: Some(vec![Uuid::new_v4()]),
        };

        let err = update_flight(
            axum::extract::State(state_with(db)),
            axum::extract::Path(flight_id),
            Json(payload),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("Staff user")));
    }
}
