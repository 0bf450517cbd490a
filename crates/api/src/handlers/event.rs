//! Handlers for the `/events` resource and its nested ticket types and
//! add-ons.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use touchgrass_core::error::CoreError;
use touchgrass_core::media_path::OwnerKind;
use touchgrass_core::types::EntityId;
use touchgrass_core::validation::{validate_ticket_type, EventDraft, TicketTypeDraft};
use touchgrass_db::models::add_on::{AttachAddOn, EventAddOn};
use touchgrass_db::models::event::EventWithRelations;
use touchgrass_db::models::ticket_type::TicketType;
use touchgrass_workflow::PersistenceError;

use crate::error::{AppError, AppResult};
use crate::handlers::submission::{
    read_submission, run_detached, Submission, SubmissionResponse,
};
use crate::middleware::rbac::RequireOrganizer;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/events
pub async fn create(
    State(state): State<AppState>,
    RequireOrganizer(user): RequireOrganizer,
    multipart: Multipart,
) -> AppResult<(
    StatusCode,
    Json<DataResponse<SubmissionResponse<EventWithRelations>>>,
)> {
    let Submission {
        draft,
        mut staging,
        rejected_files,
    } = read_submission::<EventDraft>(multipart, &state.staging_policy).await?;
    tracing::info!(
        user_id = %user.user_id,
        files = staging.len(),
        "Event submission received"
    );

    let orchestrator = state.orchestrator.clone();
    let report =
        run_detached(async move { orchestrator.submit_event(draft, &mut staging).await }).await?;

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

/// GET /api/v1/events
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<EventWithRelations>>>> {
    let events = state.entities.list_events().await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<EventWithRelations>>> {
    let event = state
        .store
        .find_event(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }))?;
    Ok(Json(DataResponse { data: event }))
}

/// GET /api/v1/events/{id}/media
pub async fn list_media(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    if state.store.find_event(id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }));
    }
    let urls = state
        .orchestrator
        .media()
        .list_urls(OwnerKind::Event, id)
        .await?;
    Ok(Json(DataResponse { data: urls }))
}

/// POST /api/v1/events/{id}/ticket-types
pub async fn create_ticket_type(
    State(state): State<AppState>,
    RequireOrganizer(_): RequireOrganizer,
    Path(id): Path<EntityId>,
    Json(draft): Json<TicketTypeDraft>,
) -> AppResult<(StatusCode, Json<DataResponse<TicketType>>)> {
    let input = validate_ticket_type(id, draft)?;
    let ticket_type = state
        .store
        .create_ticket_type(&input)
        .await
        .map_err(|e| missing_path_event(e, id))?;
    tracing::info!(event_id = %id, ticket_type_id = %ticket_type.id, "Ticket type created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket_type })))
}

/// POST /api/v1/events/{id}/add-ons
pub async fn attach_add_on(
    State(state): State<AppState>,
    RequireOrganizer(_): RequireOrganizer,
    Path(id): Path<EntityId>,
    Json(input): Json<AttachAddOn>,
) -> AppResult<(StatusCode, Json<DataResponse<EventAddOn>>)> {
    if input.price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        return Err(AppError::Core(CoreError::Validation(
            "Add-on price must be 0 or greater".into(),
        )));
    }
    let link = state
        .store
        .attach_add_on(id, &input)
        .await
        .map_err(|e| missing_path_event(e, id))?;
    tracing::info!(event_id = %id, add_on_id = %link.add_on_id, "Add-on attached");
    Ok((StatusCode::CREATED, Json(DataResponse { data: link })))
}

/// The event in the path is a resource lookup, so its absence is a 404
/// rather than a referential error.
fn missing_path_event(err: PersistenceError, event_id: EntityId) -> AppError {
    match err {
        PersistenceError::Referential { entity: "Event", id } if id == event_id => {
            AppError::Core(CoreError::NotFound { entity: "Event", id })
        }
        other => AppError::Persistence(other),
    }
}
