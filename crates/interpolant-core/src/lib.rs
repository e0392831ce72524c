//! # Interpolant Core
//!
//! Cached string interpolation for `${...}` templates.
//!
//! This crate parses templates into literal and placeholder tokens, resolves
//! placeholders against a key/value context or positional arguments, and
//! keeps parsed templates and normalized keys in bounded LRU caches.
//!
//! ## Features
//!
//! - `${key}` placeholders, echoed verbatim when unresolved
//! - `${key: default}` placeholders with a literal fallback
//! - Positional rendering that fills placeholders left to right
//! - Suffix-marked key lists (`"host ->", "localhost"`) for readable call sites
//! - Shared, bounded template and key caches
//!
//! ## Example
//!
//! ```rust
//! use interpolant_core::{interpolate, Interpolator};
//! use serde_json::json;
//!
//! let ip = Interpolator::init(&[json!("name ->"), json!("World")])?;
//! assert_eq!(ip.render("Hello, ${name}!"), "Hello, World!");
//!
//! assert_eq!(interpolate!("${a}-${b}", 1), "1-${b}");
//! # Ok::<(), interpolant_core::InterpolationError>(())
//! ```

pub mod error;
pub mod config;
pub mod token;
pub mod template;
pub mod cache;
pub mod keys;
pub mod tuple;
pub mod interpolator;

pub use error::{InterpolationError, Result};
pub use config::InterpolationConfig;
pub use token::Token;
pub use cache::{CacheService, LruCache};
pub use keys::{Context, KeyConvention, SuffixMode};
pub use tuple::Tuple;
pub use interpolator::{display_value, interpolate, render_args, render_args_with, Interpolator};

#[doc(hidden)]
pub use serde_json as __serde_json;

/// Render a template positionally from Rust expressions.
///
/// Each argument is converted with `serde_json::json!`, so anything
/// serializable works.
///
/// ```
/// use interpolant_core::interpolate;
///
/// assert_eq!(interpolate!("${host}:${port}", "localhost", 8080), "localhost:8080");
/// assert_eq!(interpolate!("${host: 0.0.0.0}"), "0.0.0.0");
/// ```
#[macro_export]
macro_rules! interpolate {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::render_args($template, &[$($crate::__serde_json::json!($arg)),*])
    };
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        CacheService, Context, InterpolationConfig, InterpolationError, Interpolator,
        KeyConvention, Result, Token, Tuple,
    };
}
