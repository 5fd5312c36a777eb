//! Short alias generation.
//!
//! Provides the [`AliasGenerator`] seam used by the allocator and its
//! production implementation backed by a cryptographically secure RNG.

use rand::Rng;

/// Characters a generated alias is drawn from (`[A-Za-z0-9]`).
pub const ALIAS_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a freshly generated alias.
pub const DEFAULT_ALIAS_LENGTH: usize = 6;

/// Longest alias storage accepts.
pub const MAX_ALIAS_LENGTH: usize = 50;

/// Aliases that cannot be allocated.
///
/// Each one would be shadowed by a fixed route and could never resolve or be deleted.
pub const RESERVED_ALIASES: &[&str] = &["health", "shorten", "urls"];

/// Source of candidate aliases.
///
/// Candidates are not guaranteed unique; the caller checks them against storage.
#[cfg_attr(test, mockall::automock)]
pub trait AliasGenerator: Send + Sync {
    /// Draws a candidate alias of exactly `length` characters.
    fn generate(&self, length: usize) -> String;
}

/// Generator drawing each character uniformly from [`ALIAS_ALPHABET`].
///
/// Uses the thread-local `rand` generator (ChaCha, seeded from the OS), giving
/// 62^6 ≈ 5.68×10^10 possible aliases at the default length.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAliasGenerator;

impl AliasGenerator for RandomAliasGenerator {
    fn generate(&self, length: usize) -> String {
        let mut rng = rand::rng();

        (0..length)
            .map(|_| {
                let idx = rng.random_range(0..ALIAS_ALPHABET.len());
                ALIAS_ALPHABET[idx] as char
            })
            .collect()
    }
}

/// Returns `true` if `alias` collides with a fixed route.
pub fn is_reserved(alias: &str) -> bool {
    RESERVED_ALIASES.contains(&alias)
}
