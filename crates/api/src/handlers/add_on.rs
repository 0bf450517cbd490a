//! Handlers for the `/add-ons` catalogue.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use touchgrass_core::validation::{validate_add_on, AddOnDraft};
use touchgrass_db::models::add_on::AddOn;

use crate::error::AppResult;
use crate::middleware::rbac::RequireOrganizer;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/add-ons
pub async fn create(
    State(state): State<AppState>,
    RequireOrganizer(_): RequireOrganizer,
    Json(draft): Json<AddOnDraft>,
) -> AppResult<(StatusCode, Json<DataResponse<AddOn>>)> {
    let input = validate_add_on(draft)?;
    let add_on = state.store.create_add_on(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: add_on })))
}
