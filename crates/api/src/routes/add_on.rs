use axum::routing::post;
use axum::Router;

use crate::handlers::add_on;
use crate::state::AppState;

/// Routes mounted at `/add-ons`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(add_on::create))
}
