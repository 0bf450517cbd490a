pub mod add_on;
pub mod event;
pub mod health;
pub mod ticket;
pub mod venue;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /venues                              list, submit (organizer)
/// /venues/{id}                         get
/// /venues/{id}/media                   stored media urls
///
/// /events                              list, submit (organizer)
/// /events/{id}                         get
/// /events/{id}/media                   stored media urls
/// /events/{id}/ticket-types            create (organizer)
/// /events/{id}/add-ons                 attach (organizer)
///
/// /add-ons                             create (organizer)
///
/// /tickets                             purchase (any authenticated user)
/// /tickets/{id}/status                 transition (organizer)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/venues", venue::router())
        .nest("/events", event::router())
        .nest("/add-ons", add_on::router())
        .nest("/tickets", ticket::router())
}
