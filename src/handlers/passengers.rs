use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::passenger::{self, DocumentType};
use crate::entities::reservation;
use crate::error::{AppError, AppResult};
use crate::handlers::reservations::ReservationResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePassengerRequest {
    pub name: String,
    pub document: String,
    pub document_type: DocumentType,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePassengerRequest {
    pub name: Option<String>,
    pub document: Option<String>,
    pub document_type: Option<DocumentType>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

fn validate_birth_date(birth_date: NaiveDate) -> AppResult<()> {
    if birth_date > Utc::now().date_naive() {
        return Err(AppError::Validation(
            "Birth date cannot be in the future".to_string(),
        ));
    }
    Ok(())
}

/// List all passengers (admin)
pub async fn list_passengers(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<passenger::Model>>> {
    let passengers = passenger::Entity::find()
        .order_by_asc(passenger::Column::Name)
        .all(state.db.as_ref())
        .await?;

    Ok(Json(passengers))
}

/// Register a passenger (admin)
pub async fn create_passenger(
    State(state): State<AppState>,
    Json(payload): Json<CreatePassengerRequest>,
) -> AppResult<(StatusCode, Json<passenger::Model>)> {
    validate_birth_date(payload.birth_date)?;

    let document = payload.document.trim().to_string();
    if document.is_empty() {
        return Err(AppError::Validation("Document is required".to_string()));
    }

    let created = passenger::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        document: Set(document),
        document_type: Set(payload.document_type),
        email: Set(payload.email),
        phone: Set(payload.phone),
        birth_date: Set(payload.birth_date),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a passenger by id
pub async fn get_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<passenger::Model>> {
    let passenger = passenger::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Passenger not found".to_string()))?;

    Ok(Json(passenger))
}

/// Update a passenger (admin)
pub async fn update_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePassengerRequest>,
) -> AppResult<Json<passenger::Model>> {
    let passenger = passenger::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Passenger not found".to_string()))?;

    if let Some(birth_date) = payload.birth_date {
        validate_birth_date(birth_date)?;
    }

    let mut active: passenger::ActiveModel = passenger.into();

    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(document) = payload.document {
        if document.trim().is_empty() {
            return Err(AppError::Validation("Document is required".to_string()));
        }
        active.document = Set(document.trim().to_string());
    }
    if let Some(document_type) = payload.document_type {
        active.document_type = Set(document_type);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(phone);
    }
    if let Some(birth_date) = payload.birth_date {
        active.birth_date = Set(birth_date);
    }

    let updated = active.update(state.db.as_ref()).await?;
    Ok(Json(updated))
}

/// Delete a passenger (admin)
pub async fn delete_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = passenger::Entity::delete_by_id(id).exec(state.db.as_ref()).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Passenger not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Passenger deleted" })))
}

/// All reservations of a passenger, newest first
pub async fn reservations_by_passenger(
    State(state): State<AppState>,
    Path(passenger_id): Path<Uuid>,
) -> AppResult<Json<Vec<ReservationResponse>>> {
    passenger::Entity::find_by_id(passenger_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Passenger not found".to_string()))?;

    let reservations = reservation::Entity::find()
        .filter(reservation::Column::PassengerId.eq(passenger_id))
        .order_by_desc(reservation::Column::ReservationDate)
        .all(state.db.as_ref())
        .await?;

    let responses = reservations
        .into_iter()
        .map(ReservationResponse::from)
        .collect();

    Ok(Json(responses))
}
