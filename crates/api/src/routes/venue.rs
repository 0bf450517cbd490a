use axum::routing::get;
use axum::Router;

use crate::handlers::venue;
use crate::state::AppState;

/// Routes mounted at `/venues`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create (multipart)
/// GET    /{id}          -> get_by_id
/// GET    /{id}/media    -> list_media
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(venue::list).post(venue::create))
        .route("/{id}", get(venue::get_by_id))
        .route("/{id}/media", get(venue::list_media))
}
