//! DTOs for link creation and listing endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::application::services::ShortenedUrl;

/// Characters that survive in a URL path segment without escaping.
static CUSTOM_ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._~-]+$").expect("custom alias regex is valid"));

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// URL to shorten. A missing scheme defaults to `https://`.
    ///
    /// Checked by the URL normalizer rather than here, so a missing value
    /// yields the same `invalid_url` error as an empty one.
    pub original_url: Option<String>,

    /// Optional alias chosen by the caller.
    #[validate(length(min = 1, max = 50))]
    #[validate(regex(path = *CUSTOM_ALIAS_REGEX, message = "Alias may only contain letters, digits, '.', '_', '~' and '-'"))]
    pub custom_alias: Option<String>,
}

impl ShortenRequest {
    /// Treats a blank custom alias as if none had been sent.
    pub fn without_blank_alias(mut self) -> Self {
        self.custom_alias = self.custom_alias.filter(|alias| !alias.trim().is_empty());
        self
    }
}

/// A stored link as returned by the API.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkResponse {
    pub id: i64,
    pub alias: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<ShortenedUrl> for ShortLinkResponse {
    fn from(shortened: ShortenedUrl) -> Self {
        let ShortenedUrl { link, short_url } = shortened;

        Self {
            id: link.id,
            alias: link.alias,
            short_url,
            original_url: link.original_url,
            created_at: link.created_at,
        }
    }
}
