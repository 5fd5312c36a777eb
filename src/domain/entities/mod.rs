//! Core domain entities.
//!
//! - [`ShortLink`] - A persisted alias → URL mapping
//! - [`NewShortLink`] - Creation input; storage fills in `id` and `created_at`

pub mod short_link;

pub use short_link::{NewShortLink, ShortLink};
