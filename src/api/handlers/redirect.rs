//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects an alias to its original URL.
///
/// # Endpoint
///
/// `GET /{alias}`
///
/// Answers `302 Found` with the stored URL in `Location`. Aliases are matched
/// exactly, case included.
///
/// # Errors
///
/// Returns 404 `url_not_found` if the alias doesn't exist.
pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.link_service.get_original_url(&alias).await?;

    debug!(alias = %alias, target = %original_url, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]))
}
