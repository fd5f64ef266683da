use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::EntityTrait;
use serde::Serialize;
use uuid::Uuid;

use crate::entities::ticket::{self, TicketStatus};
use crate::error::AppResult;
use crate::services::tickets;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub id: Uuid,
    pub barcode: String,
    pub status: TicketStatus,
    pub reservation_id: Uuid,
}

impl From<ticket::Model> for TicketResponse {
    fn from(t: ticket::Model) -> Self {
        TicketResponse {
            id: t.id,
            barcode: t.barcode,
            status: t.status,
            reservation_id: t.reservation_id,
        }
    }
}

/// Issue the ticket for a confirmed reservation (admin)
pub async fn generate_ticket(
    State(state): State<AppState>,
    Path(reservation_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<TicketResponse>)> {
    let ticket = tickets::issue(state.db.as_ref(), reservation_id).await?;

    Ok((StatusCode::CREATED, Json(TicketResponse::from(ticket))))
}

/// Look up a ticket by barcode
pub async fn ticket_information(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> AppResult<Json<tickets::TicketInfo>> {
    let info = tickets::lookup(state.db.as_ref(), &barcode).await?;

    Ok(Json(info))
}

/// List all tickets (admin)
pub async fn list_tickets(State(state): State<AppState>) -> AppResult<Json<Vec<TicketResponse>>> {
    let tickets = ticket::Entity::find().all(state.db.as_ref()).await?;

    let responses = tickets.into_iter().map(TicketResponse::from).collect();

    Ok(Json(responses))
}
