//! Key normalization for flat key/value argument lists.
//!
//! Arguments alternate `key, value, key, value, ...`. Keys may be required
//! to carry a trailing marker (` ->`, ` >>>` or ` >>`) so that call sites
//! read like `"host ->", "localhost", "port ->", 8080`.

use crate::cache::CacheService;
use crate::{InterpolationError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Key → value mapping used to resolve placeholders.
pub type Context = HashMap<String, Value>;

/// Recognized key markers, longest first: ` >>` is a suffix of ` >>>`.
pub const SUFFIX_MARKERS: [&str; 3] = [" >>>", " ->", " >>"];

/// How a marked key is cleaned up after its marker is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixMode {
    /// Surrounding whitespace (full-width spaces included) is removed.
    Trimmed,
    /// The key is kept exactly as written, minus the marker.
    Untrimmed,
}

/// How keys in a flat argument list are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyConvention {
    /// Keys are used as given.
    #[default]
    Plain,
    /// Keys need a marker and are trimmed.
    Init,
    /// Keys need a marker and are not trimmed.
    Load,
}

impl KeyConvention {
    /// Convention for a `(with_suffix, need_trim)` flag pair.
    /// `need_trim` only matters when a suffix is required.
    pub fn from_flags(with_suffix: bool, need_trim: bool) -> Self {
        match (with_suffix, need_trim) {
            (false, _) => KeyConvention::Plain,
            (true, true) => KeyConvention::Init,
            (true, false) => KeyConvention::Load,
        }
    }

    /// How marked keys are cleaned up, or `None` if keys carry no marker.
    pub fn suffix_mode(self) -> Option<SuffixMode> {
        match self {
            KeyConvention::Plain => None,
            KeyConvention::Init => Some(SuffixMode::Trimmed),
            KeyConvention::Load => Some(SuffixMode::Untrimmed),
        }
    }
}

/// Remove the marker from `raw`, or return `None` if it has none.
///
/// In [`SuffixMode::Trimmed`] trailing whitespace is ignored when looking for
/// the marker, and the remaining key is trimmed on both sides.
pub fn strip_suffix(raw: &str, mode: SuffixMode) -> Option<String> {
    let candidate = match mode {
        SuffixMode::Trimmed => raw.trim_end_matches(char::is_whitespace),
        SuffixMode::Untrimmed => raw,
    };

    let stripped = SUFFIX_MARKERS
        .iter()
        .find_map(|&marker| candidate.strip_suffix(marker))?;

    Some(match mode {
        SuffixMode::Trimmed => stripped.trim_matches(char::is_whitespace).to_owned(),
        SuffixMode::Untrimmed => stripped.to_owned(),
    })
}

/// Validate a flat key/value list and build a context from it.
///
/// Marked keys are normalized through the key cache of `caches`. Later
/// duplicates overwrite earlier ones.
///
/// # Errors
///
/// Checks run one at a time over every key, and the first failing key of
/// the first failing check is reported:
/// [`InterpolationError::MalformedArguments`], then
/// [`InterpolationError::NullKey`], then
/// [`InterpolationError::InvalidKeyType`], then
/// [`InterpolationError::UnexpectedSuffix`].
pub fn normalize(
    kvs: &[Value],
    convention: KeyConvention,
    caches: &CacheService,
) -> Result<Context> {
    match convention.suffix_mode() {
        None => plain_pairs(kvs),
        Some(mode) => collect_pairs(kvs, |index, raw| {
            caches
                .normalized_key(mode, raw)
                .map(|key| key.to_string())
                .ok_or_else(|| InterpolationError::UnexpectedSuffix {
                    index,
                    key: raw.to_owned(),
                })
        }),
    }
}

/// Build a context from a flat key/value list with keys taken as written.
pub fn plain_pairs(kvs: &[Value]) -> Result<Context> {
    collect_pairs(kvs, |_, raw| Ok(raw.to_owned()))
}

fn collect_pairs<F>(kvs: &[Value], mut key_for: F) -> Result<Context>
where
    F: FnMut(usize, &str) -> Result<String>,
{
    if kvs.len() % 2 != 0 {
        return Err(InterpolationError::MalformedArguments { len: kvs.len() });
    }

    let key_slots = || kvs.iter().step_by(2).enumerate().map(|(pair, key)| (pair * 2, key));

    if let Some((index, _)) = key_slots().find(|(_, key)| key.is_null()) {
        return Err(InterpolationError::NullKey { index });
    }

    let mut raw_keys = Vec::with_capacity(kvs.len() / 2);
    for (index, key) in key_slots() {
        match key {
            Value::String(s) => raw_keys.push((index, s.as_str())),
            other => {
                return Err(InterpolationError::InvalidKeyType {
                    index,
                    found: value_kind(other),
                })
            }
        }
    }

    let mut context = Context::with_capacity(raw_keys.len());
    for (index, raw) in raw_keys {
        context.insert(key_for(index, raw)?, kvs[index + 1].clone());
    }

    Ok(context)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
