use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;

use crate::entities::flight_status;
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FlightStatusRequest {
    pub name: String,
}

/// List the flight status vocabulary (admin)
pub async fn list_statuses(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<flight_status::Model>>> {
    let statuses = flight_status::Entity::find()
        .order_by_asc(flight_status::Column::Id)
        .all(state.db.as_ref())
        .await?;

    Ok(Json(statuses))
}

/// Add a status name (admin)
pub async fn create_status(
    State(state): State<AppState>,
    Json(payload): Json<FlightStatusRequest>,
) -> AppResult<(StatusCode, Json<flight_status::Model>)> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let existing = flight_status::Entity::find()
        .filter(flight_status::Column::Name.eq(&name))
        .one(state.db.as_ref())
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(
            "A flight status with that name already exists".to_string(),
        ));
    }

    let created = flight_status::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Rename a status (admin)
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<FlightStatusRequest>,
) -> AppResult<Json<flight_status::Model>> {
    let status = flight_status::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Flight status not found".to_string()))?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let mut active: flight_status::ActiveModel = status.into();
    active.name = Set(name);

    let updated = active.update(state.db.as_ref()).await?;
    Ok(Json(updated))
}

/// Delete a status (admin); fails while flights still reference it
pub async fn delete_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    let result = flight_status::Entity::delete_by_id(id)
        .exec(state.db.as_ref())
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Flight status not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Flight status deleted" })))
}
