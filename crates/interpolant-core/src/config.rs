//! # Interpolant Configuration
//!
//! Sizing for the shared template and key caches.
//! Supports loading from environment variables and programmatic defaults.

use std::env;

/// Default number of parsed templates kept in the template cache.
pub const DEFAULT_TEMPLATE_CACHE_CAPACITY: usize = 1000;

/// Default number of normalized keys kept in the key cache.
pub const DEFAULT_KEY_CACHE_CAPACITY: usize = 2000;

/// Cache configuration for the interpolation engine.
///
/// # Example
/// ```rust
/// use interpolant_core::InterpolationConfig;
///
/// // Load from environment
/// let config = InterpolationConfig::from_env();
///
/// // Or customize
/// let config = InterpolationConfig::default()
///     .with_template_cache_capacity(64)
///     .with_key_cache_capacity(128);
/// assert_eq!(config.template_cache_capacity, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationConfig {
    /// Maximum number of parsed templates kept in memory.
    /// Default: 1000, Env: INTERPOLANT_TEMPLATE_CACHE=1000
    pub template_cache_capacity: usize,

    /// Maximum number of normalized keys kept in memory.
    /// Default: 2000, Env: INTERPOLANT_KEY_CACHE=2000
    pub key_cache_capacity: usize,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            template_cache_capacity: DEFAULT_TEMPLATE_CACHE_CAPACITY,
            key_cache_capacity: DEFAULT_KEY_CACHE_CAPACITY,
        }
    }
}

impl InterpolationConfig {
    /// Create a new config from environment variables.
    /// Falls back to defaults for missing or unparsable variables.
    pub fn from_env() -> Self {
        Self {
            template_cache_capacity: capacity_from(
                env::var("INTERPOLANT_TEMPLATE_CACHE").ok(),
                DEFAULT_TEMPLATE_CACHE_CAPACITY,
            ),
            key_cache_capacity: capacity_from(
                env::var("INTERPOLANT_KEY_CACHE").ok(),
                DEFAULT_KEY_CACHE_CAPACITY,
            ),
        }
    }

    /// Builder: Set the template cache capacity.
    pub fn with_template_cache_capacity(mut self, capacity: usize) -> Self {
        self.template_cache_capacity = capacity;
        self
    }

    /// Builder: Set the key cache capacity.
    pub fn with_key_cache_capacity(mut self, capacity: usize) -> Self {
        self.key_cache_capacity = capacity;
        self
    }
}

/// Parse a capacity setting, keeping `default` when it is missing or not a
/// non-negative integer.
fn capacity_from(raw: Option<String>, default: usize) -> usize {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
