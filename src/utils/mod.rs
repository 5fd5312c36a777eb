//! Utility functions for alias generation, URL processing and error classification.
//!
//! - [`alias_generator`] - Random alias generation and reserved aliases
//! - [`url_normalizer`] - URL normalization and validation
//! - [`db_error`] - Database error classification

pub mod alias_generator;
pub mod db_error;
pub mod url_normalizer;
