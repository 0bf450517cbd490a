use axum::routing::{post, put};
use axum::Router;

use crate::handlers::ticket;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// POST   /              -> purchase
/// PUT    /{id}/status   -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(ticket::purchase))
        .route("/{id}/status", put(ticket::update_status))
}
