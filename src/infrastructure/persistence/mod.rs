//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgShortLinkRepository`] - PostgreSQL storage via SQLx
//! - [`InMemoryShortLinkRepository`] - Process-local storage for development and tests

pub mod memory_short_link_repository;
pub mod pg_short_link_repository;

pub use memory_short_link_repository::InMemoryShortLinkRepository;
pub use pg_short_link_repository::PgShortLinkRepository;
