//! Repository trait for short link storage.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage collaborator for short links, keyed by alias.
///
/// Storage is the single source of truth for alias uniqueness. Each operation
/// is expected to be individually linearizable; callers must not assume
/// atomicity across calls.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryShortLinkRepository`] - Process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Returns whether a link with exactly this alias exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn exists_by_alias(&self, alias: &str) -> Result<bool, AppError>;

    /// Finds a link by exact alias match.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortLink))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_alias(&self, alias: &str) -> Result<Option<ShortLink>, AppError>;

    /// Persists a new link, assigning `id` and stamping `created_at` at write time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasAlreadyExists`] if the alias was taken by the time of
    /// the insert.
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn save(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Returns every stored link in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_all(&self) -> Result<Vec<ShortLink>, AppError>;

    /// Deletes the link with this alias.
    ///
    /// Returns `Ok(true)` if a link was removed, `Ok(false)` if none matched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete_by_alias(&self, alias: &str) -> Result<bool, AppError>;

    /// Checks that storage is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when storage cannot serve requests.
    async fn ping(&self) -> Result<(), AppError>;
}
