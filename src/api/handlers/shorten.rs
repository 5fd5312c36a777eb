//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;
use validator::Validate;

use crate::api::dto::shorten::{ShortLinkResponse, ShortenRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /api/v1/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "originalUrl": "example.com/some/page",
///   "customAlias": "promo"   // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 1,
///   "alias": "promo",
///   "shortUrl": "http://localhost:3000/promo",
///   "originalUrl": "https://example.com/some/page",
///   "createdAt": "2026-03-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 `invalid_url` if the URL is missing or malformed
/// - 400 `validation_error` if the custom alias has bad length or characters
/// - 409 `alias_already_exists` if the custom alias is taken
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortLinkResponse>), AppError> {
    let payload = payload.without_blank_alias();
    payload.validate()?;

    let shortened = state
        .link_service
        .shorten(payload.original_url, payload.custom_alias)
        .await?;

    info!(
        alias = %shortened.link.alias,
        original_url = %shortened.link.original_url,
        "Short link created"
    );

    Ok((StatusCode::CREATED, Json(shortened.into())))
}
