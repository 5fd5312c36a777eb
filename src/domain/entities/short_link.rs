//! ShortLink entity binding an alias to a normalized URL.

use chrono::{DateTime, Utc};

/// A persisted alias → URL mapping.
///
/// Records are immutable once stored: they are read or deleted as a whole,
/// never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub id: i64,
    pub alias: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(id: i64, alias: String, original_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            alias,
            original_url,
            created_at,
        }
    }
}

/// Input data for persisting a new link.
///
/// `id` and `created_at` are assigned by storage at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortLink {
    pub alias: String,
    pub original_url: String,
}
