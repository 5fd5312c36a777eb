//! Domain layer containing business entities and storage contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.
//! Repository traits define contracts implemented by [`crate::infrastructure`].

pub mod entities;
pub mod repositories;
