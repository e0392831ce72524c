//! Error types for Interpolant Core.

use thiserror::Error;

/// Result type alias for interpolation operations.
pub type Result<T> = std::result::Result<T, InterpolationError>;

/// Errors raised while building or mutating an interpolation context.
///
/// Substitution itself never fails: unresolved placeholders render their
/// fallback text instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpolationError {
    /// Key/value argument list has an odd length.
    #[error("Malformed arguments: expected alternating key/value pairs, got {len} values")]
    MalformedArguments { len: usize },

    /// A key position holds `null`.
    #[error("Null key at argument index {index}")]
    NullKey { index: usize },

    /// A key position holds something other than a string.
    #[error("Invalid key type at argument index {index}: expected string, found {found}")]
    InvalidKeyType { index: usize, found: &'static str },

    /// A key lacks one of the recognized suffix markers.
    #[error("Unexpected suffix at argument index {index}: key {key:?} must end with ` ->`, ` >>>` or ` >>`")]
    UnexpectedSuffix { index: usize, key: String },

    /// Tuple element lookup past the end.
    #[error("Index {index} out of range for tuple of arity {arity}")]
    IndexOutOfRange { index: usize, arity: usize },
}
