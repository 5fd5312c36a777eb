//! In-memory implementation of the short link repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;

/// Process-local repository.
///
/// Each operation takes the lock once, so a single call is atomic with respect
/// to every other call. Links are listed in insertion order. Contents are lost
/// when the process exits.
#[derive(Default)]
pub struct InMemoryShortLinkRepository {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    links: BTreeMap<i64, ShortLink>,
    ids_by_alias: HashMap<String, i64>,
}

impl InMemoryShortLinkRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShortLinkRepository for InMemoryShortLinkRepository {
    async fn exists_by_alias(&self, alias: &str) -> Result<bool, AppError> {
        Ok(self.state.read().await.ids_by_alias.contains_key(alias))
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<ShortLink>, AppError> {
        let state = self.state.read().await;

        Ok(state
            .ids_by_alias
            .get(alias)
            .and_then(|id| state.links.get(id))
            .cloned())
    }

    async fn save(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut state = self.state.write().await;

        if state.ids_by_alias.contains_key(&new_link.alias) {
            return Err(AppError::AliasAlreadyExists(new_link.alias));
        }

        state.last_id += 1;
        let link = ShortLink::new(
            state.last_id,
            new_link.alias,
            new_link.original_url,
            Utc::now(),
        );

        state.ids_by_alias.insert(link.alias.clone(), link.id);
        state.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn find_all(&self) -> Result<Vec<ShortLink>, AppError> {
        Ok(self.state.read().await.links.values().cloned().collect())
    }

    async fn delete_by_alias(&self, alias: &str) -> Result<bool, AppError> {
        let mut state = self.state.write().await;

        match state.ids_by_alias.remove(alias) {
            Some(id) => {
                state.links.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
