//! Handlers for link listing and deletion.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::api::dto::shorten::ShortLinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every stored link in creation order.
///
/// # Endpoint
///
/// `GET /api/v1/urls`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ShortLinkResponse>>, AppError> {
    let links = state.link_service.get_all_urls().await?;

    Ok(Json(links.into_iter().map(ShortLinkResponse::from).collect()))
}

/// Permanently deletes a short link.
///
/// # Endpoint
///
/// `DELETE /api/v1/{alias}`
///
/// The alias becomes available for reuse immediately.
///
/// # Errors
///
/// Returns 404 `url_not_found` if no link has this alias.
pub async fn delete_link_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_by_alias(&alias).await?;

    info!(alias = %alias, "Short link deleted");

    Ok(StatusCode::NO_CONTENT)
}
