#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use shortlink::domain::entities::{NewShortLink, ShortLink};
use shortlink::domain::repositories::ShortLinkRepository;
use shortlink::error::AppError;
use shortlink::infrastructure::persistence::InMemoryShortLinkRepository;
use shortlink::state::AppState;
use std::sync::Arc;

pub const TEST_BASE_URL: &str = "http://sho.rt";

pub fn create_test_state() -> (AppState, Arc<InMemoryShortLinkRepository>) {
    let repository = Arc::new(InMemoryShortLinkRepository::new());
    let state = AppState::new(repository.clone(), TEST_BASE_URL);

    (state, repository)
}

pub async fn create_test_link(
    repository: &InMemoryShortLinkRepository,
    alias: &str,
    url: &str,
) -> ShortLink {
    repository
        .save(NewShortLink {
            alias: alias.to_string(),
            original_url: url.to_string(),
        })
        .await
        .unwrap()
}

/// Repository whose every call fails as if the database were unreachable.
pub struct UnavailableRepository;

fn unavailable() -> AppError {
    AppError::internal(
        "Database error",
        json!({ "reason": "connection refused by 10.0.0.5:5432" }),
    )
}

#[async_trait]
impl ShortLinkRepository for UnavailableRepository {
    async fn exists_by_alias(&self, _alias: &str) -> Result<bool, AppError> {
        Err(unavailable())
    }

    async fn find_by_alias(&self, _alias: &str) -> Result<Option<ShortLink>, AppError> {
        Err(unavailable())
    }

    async fn save(&self, _new_link: NewShortLink) -> Result<ShortLink, AppError> {
        Err(unavailable())
    }

    async fn find_all(&self) -> Result<Vec<ShortLink>, AppError> {
        Err(unavailable())
    }

    async fn delete_by_alias(&self, _alias: &str) -> Result<bool, AppError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

pub fn create_unavailable_state() -> AppState {
    AppState::new(Arc::new(UnavailableRepository), TEST_BASE_URL)
}
