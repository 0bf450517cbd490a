//! Handlers for the `/venues` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use touchgrass_core::error::CoreError;
use touchgrass_core::media_path::OwnerKind;
use touchgrass_core::types::EntityId;
use touchgrass_core::validation::VenueDraft;
use touchgrass_db::models::venue::Venue;

use crate::error::{AppError, AppResult};
use crate::handlers::submission::{
    read_submission, run_detached, Submission, SubmissionResponse,
};
use crate::middleware::rbac::RequireOrganizer;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/venues
///
/// Runs the full submission pipeline on a detached task. Anything past
/// entity creation is reported in the body with `201 Created`, including
/// failed uploads.
pub async fn create(
    State(state): State<AppState>,
    RequireOrganizer(user): RequireOrganizer,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<SubmissionResponse<Venue>>>)> {
    let Submission {
        draft,
        mut staging,
        rejected_files,
    } = read_submission::<VenueDraft>(multipart, &state.staging_policy).await?;
    tracing::info!(
        user_id = %user.user_id,
        files = staging.len(),
        "Venue submission received"
    );

    let orchestrator = state.orchestrator.clone();
    let report =
        run_detached(async move { orchestrator.submit_venue(draft, &mut staging).await }).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmissionResponse {
                report,
                rejected_files,
            },
        }),
    ))
}

/// GET /api/v1/venues
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Venue>>>> {
    let venues = state.entities.list_venues().await?;
    Ok(Json(DataResponse { data: venues }))
}

/// GET /api/v1/venues/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Venue>>> {
    let venue = find(&state, id).await?;
    Ok(Json(DataResponse { data: venue }))
}

/// GET /api/v1/venues/{id}/media
///
/// Lists what is in object storage under the venue's prefix, which may
/// include uploads that were never recorded on the venue row.
pub async fn list_media(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    find(&state, id).await?;
    let urls = state
        .orchestrator
        .media()
        .list_urls(OwnerKind::Venue, id)
        .await?;
    Ok(Json(DataResponse { data: urls }))
}

async fn find(state: &AppState, id: EntityId) -> AppResult<Venue> {
    state
        .store
        .find_venue(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Venue",
            id,
        }))
}
