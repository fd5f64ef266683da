use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::plane;
use crate::error::{AppError, AppResult};
use crate::services::seats;
use crate::services::seats::SeatCell;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePlaneRequest {
    pub model: String,
    pub capacity: i32,
    pub rows: i32,
    pub columns: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaneRequest {
    pub model: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct PlaneResponse {
    pub id: Uuid,
    pub model: String,
    pub capacity: i32,
    pub rows: i32,
    pub columns: i32,
    pub seat_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<plane::Model> for PlaneResponse {
    fn from(p: plane::Model) -> Self {
        PlaneResponse {
            id: p.id,
            model: p.model,
            capacity: p.capacity,
            rows: p.rows,
            columns: p.columns,
            seat_count: p.rows * p.columns,
            created_at: p.created_at.with_timezone(&Utc),
        }
    }
}

/// List all planes (admin)
pub async fn list_planes(State(state): State<AppState>) -> AppResult<Json<Vec<PlaneResponse>>> {
    let planes = plane::Entity::find().all(state.db.as_ref()).await?;

    Ok(Json(planes.into_iter().map(PlaneResponse::from).collect()))
}

/// Create a plane together with its full seat map (admin). A plane never
/// exists without its generated seats, so both inserts share a transaction.
pub async fn create_plane(
    State(state): State<AppState>,
    Json(payload): Json<CreatePlaneRequest>,
) -> AppResult<(StatusCode, Json<PlaneResponse>)> {
    if payload.rows < 1 {
        return Err(AppError::Validation(
            "Rows must be at least 1".to_string(),
        ));
    }
    if payload.columns < 1 || payload.columns > 26 {
        return Err(AppError::Validation(
            "Columns must be between 1 and 26".to_string(),
        ));
    }
    if payload.capacity < 0 {
        return Err(AppError::Validation(
            "Capacity cannot be negative".to_string(),
        ));
    }

    let created = state
        .db
        .transaction::<_, plane::Model, AppError>(|txn| {
            Box::pin(async move {
                let new_plane = plane::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    model: Set(payload.model.clone()),
                    capacity: Set(payload.capacity),
                    rows: Set(payload.rows),
                    columns: Set(payload.columns),
                    ..Default::default()
                };

                let plane = new_plane.insert(txn).await?;
                let count = seats::generate_seats(txn, &plane).await?;

                tracing::info!(plane_id = %plane.id, seats = count, "Plane created with seat map");

                Ok(plane)
            })
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PlaneResponse::from(created))))
}

/// Get a plane by id (admin)
pub async fn get_plane(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PlaneResponse>> {
    let plane = plane::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Plane not found".to_string()))?;

    Ok(Json(PlaneResponse::from(plane)))
}

/// Update a plane (admin). Rows and columns are frozen once the seat map
/// exists; only the informational fields can change.
pub async fn update_plane(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlaneRequest>,
) -> AppResult<Json<PlaneResponse>> {
    let plane = plane::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Plane not found".to_string()))?;

    let mut active: plane::ActiveModel = plane.into();

    if let Some(model) = payload.model {
        active.model = Set(model);
    }

    if let Some(capacity) = payload.capacity {
        if capacity < 0 {
            return Err(AppError::Validation(
                "Capacity cannot be negative".to_string(),
            ));
        }
        active.capacity = Set(capacity);
    }

    let updated = active.update(state.db.as_ref()).await?;
    Ok(Json(PlaneResponse::from(updated)))
}

/// Delete a plane and, by cascade, its seats (admin)
pub async fn delete_plane(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = plane::Entity::delete_by_id(id).exec(state.db.as_ref()).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Plane not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Plane deleted" })))
}

#[derive(Debug, Serialize)]
pub struct PlaneLayoutResponse {
    pub plane: String,
    pub rows: i32,
    pub columns: i32,
    pub layout: Vec<Vec<SeatCell>>,
}

/// Full seat map of a plane, row by row
pub async fn plane_layout(
    State(state): State<AppState>,
    Path(plane_id): Path<Uuid>,
) -> AppResult<Json<PlaneLayoutResponse>> {
    let plane = plane::Entity::find_by_id(plane_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Plane not found".to_string()))?;

    let layout = seats::layout(state.db.as_ref(), &plane).await?;

    Ok(Json(PlaneLayoutResponse {
        plane: plane.describe(),
        rows: plane.rows,
        columns: plane.columns,
        layout,
    }))
}

#[derive(Debug, Serialize)]
pub struct SeatAvailabilityResponse {
    pub seat_code: String,
    pub plane: String,
    pub status: crate::entities::seat::SeatStatus,
}

/// Current status of a single seat, looked up by its code ("12A", case-insensitive)
pub async fn check_seat_availability(
    State(state): State<AppState>,
    Path((plane_id, seat_code)): Path<(Uuid, String)>,
) -> AppResult<Json<SeatAvailabilityResponse>> {
    let plane = plane::Entity::find_by_id(plane_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Plane not found".to_string()))?;

    let seat = seats::find_by_plane_and_code(state.db.as_ref(), plane_id, &seat_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Seat not found".to_string()))?;

    Ok(Json(SeatAvailabilityResponse {
        seat_code: seat.number,
        plane: plane.describe(),
        status: seat.status,
    }))
}
