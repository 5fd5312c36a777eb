//! Versioned REST API routes.

use crate::api::handlers::{delete_link_handler, list_links_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Routes mounted under `/api/v1`.
///
/// # Endpoints
///
/// - `POST   /shorten`   - Create a short link
/// - `GET    /urls`      - List all short links
/// - `DELETE /{alias}`   - Delete a short link
pub fn v1_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/urls", get(list_links_handler))
        .route("/{alias}", delete(delete_link_handler))
}
