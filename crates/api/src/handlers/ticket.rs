//! Handlers for purchased tickets.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use touchgrass_core::ticket_status::TicketStatus;
use touchgrass_core::types::EntityId;
use touchgrass_db::models::ticket::{CreateTicket, Ticket};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireOrganizer;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PurchaseTicket {
    pub ticket_type_id: EntityId,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicketStatus {
    pub status: TicketStatus,
}

/// POST /api/v1/tickets
///
/// Records a purchase for the authenticated user. The ticket starts `active`.
pub async fn purchase(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<PurchaseTicket>,
) -> AppResult<(StatusCode, Json<DataResponse<Ticket>>)> {
    let ticket = state
        .store
        .create_ticket(&CreateTicket {
            ticket_type_id: input.ticket_type_id,
            purchaser_id: user.user_id,
        })
        .await?;
    tracing::info!(ticket_id = %ticket.id, user_id = %user.user_id, "Ticket purchased");
    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// PUT /api/v1/tickets/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    RequireOrganizer(_): RequireOrganizer,
    Path(id): Path<EntityId>,
    Json(input): Json<UpdateTicketStatus>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let ticket = state.store.transition_ticket(id, input.status).await?;
    tracing::info!(ticket_id = %id, status = %input.status, "Ticket status changed");
    Ok(Json(DataResponse { data: ticket }))
}
