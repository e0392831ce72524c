//! Interpolator - resolves `${...}` placeholders against a context or
//! positional arguments.
//!
//! This module provides the high-level API for rendering templates.

use crate::cache::CacheService;
use crate::keys::{self, Context, KeyConvention};
use crate::{Result, Token, Tuple};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::trace;

/// Renders templates against a mutable key → value context.
///
/// The context is owned by this instance and has no internal locking:
/// populate it before sharing, or coordinate writers yourself. Parsed
/// templates and normalized keys come from a [`CacheService`], the shared
/// one unless [`Interpolator::with_caches`] says otherwise.
///
/// # Example
///
/// ```
/// use interpolant_core::Interpolator;
/// use serde_json::json;
///
/// let ip = Interpolator::load(&[json!("ip ->"), json!("127.0.0.1"), json!("port ->"), json!(3306)])?;
/// assert_eq!(ip.render("${ip}:${port}"), "127.0.0.1:3306");
/// assert_eq!(ip.render("${user: root}@${ip}"), "root@127.0.0.1");
/// # Ok::<(), interpolant_core::InterpolationError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interpolator {
    /// Values placeholders resolve against.
    #[serde(default)]
    context: Context,

    #[serde(skip, default = "CacheService::shared")]
    caches: Arc<CacheService>,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Context> for Interpolator {
    fn from(context: Context) -> Self {
        Self::from_map(context)
    }
}

impl Interpolator {
    /// Create an interpolator with an empty context.
    pub fn new() -> Self {
        Self::from_map(Context::new())
    }

    /// Create an interpolator over an existing mapping.
    pub fn from_map(context: Context) -> Self {
        Self {
            context,
            caches: CacheService::shared(),
        }
    }

    /// Use `caches` instead of the shared cache service from now on.
    ///
    /// Keys already in the context were normalized through the previous
    /// service; use [`Interpolator::build_with`] to normalize through
    /// `caches` from the start.
    pub fn with_caches(mut self, caches: Arc<CacheService>) -> Self {
        self.caches = caches;
        self
    }

    /// Build from a flat `key, value, ...` list with keys taken as written.
    pub fn of(kvs: &[Value]) -> Result<Self> {
        Self::build_with(CacheService::shared(), kvs, KeyConvention::Plain)
    }

    /// Build from a flat list whose keys carry a marker; keys are trimmed.
    ///
    /// `init(&[json!(" name -> "), json!("x")])` binds `name`.
    pub fn init(kvs: &[Value]) -> Result<Self> {
        Self::build_with(CacheService::shared(), kvs, KeyConvention::Init)
    }

    /// Build from a flat list whose keys carry a marker; keys are not trimmed.
    pub fn load(kvs: &[Value]) -> Result<Self> {
        Self::build_with(CacheService::shared(), kvs, KeyConvention::Load)
    }

    /// Build by merging each tuple's key/value pairs. Empty tuples are skipped.
    pub fn of_tuples<I>(tuples: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Tuple>,
    {
        let mut context = Context::new();
        for tuple in tuples {
            let tuple = tuple.into();
            if tuple.arity() == 0 {
                continue;
            }
            context.extend(tuple.to_map()?);
        }
        Ok(Self::from_map(context))
    }

    /// Build from a flat list written in `convention`, normalizing keys and
    /// later rendering through `caches`.
    ///
    /// [`Interpolator::of`], [`Interpolator::init`] and [`Interpolator::load`]
    /// are this with the shared cache service.
    pub fn build_with(
        caches: Arc<CacheService>,
        kvs: &[Value],
        convention: KeyConvention,
    ) -> Result<Self> {
        let mut interpolator = Self::new().with_caches(caches);
        interpolator.merge(kvs, convention)?;
        Ok(interpolator)
    }

    /// Merge key/value pairs written in `convention`. Keys not mentioned are
    /// left alone.
    ///
    /// On error the context is unchanged.
    pub fn merge(&mut self, kvs: &[Value], convention: KeyConvention) -> Result<&mut Self> {
        let pairs = keys::normalize(kvs, convention, &self.caches)?;
        trace!(count = pairs.len(), ?convention, "Merging context pairs");
        self.context.extend(pairs);
        Ok(self)
    }

    /// Merge plain key/value pairs. Keys not mentioned are left alone.
    ///
    /// On error the context is unchanged.
    pub fn add(&mut self, kvs: &[Value]) -> Result<&mut Self> {
        self.merge(kvs, KeyConvention::Plain)
    }

    /// Merge marked key/value pairs, trimming keys as [`Interpolator::init`] does.
    pub fn fill(&mut self, kvs: &[Value]) -> Result<&mut Self> {
        self.merge(kvs, KeyConvention::Init)
    }

    /// Replace the whole context with plain key/value pairs.
    ///
    /// On error the context is unchanged.
    pub fn set(&mut self, kvs: &[Value]) -> Result<&mut Self> {
        let pairs = keys::normalize(kvs, KeyConvention::Plain, &self.caches)?;
        self.context.clear();
        self.context.extend(pairs);
        Ok(self)
    }

    /// Remove the named keys. Unknown keys are ignored.
    pub fn del<I, S>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            self.context.remove(key.as_ref());
        }
        self
    }

    /// Read-only view of the context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Value bound to `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    /// Render `template` against the context.
    ///
    /// Placeholders whose key is absent render their fallback text. A key
    /// bound to `null` is present and renders as `null`.
    pub fn render(&self, template: &str) -> String {
        if template.trim().is_empty() {
            return template.to_owned();
        }

        let tokens = self.caches.tokens(template);
        render_tokens(&tokens, template.len(), |key| {
            self.context.get(key).map(display_value)
        })
    }

    /// [`Interpolator::render`] for an optional template; `None` stays `None`.
    pub fn interpolate(&self, template: Option<&str>) -> Option<String> {
        template.map(|t| self.render(t))
    }
}

/// Render `template` by filling placeholders from `args` left to right.
///
/// Placeholders beyond the last argument render their fallback text; extra
/// arguments are ignored. Uses the shared cache service.
///
/// ```
/// use interpolant_core::render_args;
/// use serde_json::json;
///
/// assert_eq!(render_args("${a}-${b}", &[json!("1"), json!(2)]), "1-2");
/// assert_eq!(render_args("${a}-${b}", &[json!("1")]), "1-${b}");
/// ```
pub fn render_args(template: &str, args: &[Value]) -> String {
    render_args_with(&CacheService::shared(), template, args)
}

/// [`render_args`] using a specific cache service.
pub fn render_args_with(caches: &CacheService, template: &str, args: &[Value]) -> String {
    if template.trim().is_empty() {
        return template.to_owned();
    }

    let tokens = caches.tokens(template);
    let mut args = args.iter();
    render_tokens(&tokens, template.len(), |_| args.next().map(display_value))
}

/// [`render_args`] for an optional template and optional arguments.
/// `None` arguments behave like an empty list.
pub fn interpolate(template: Option<&str>, args: Option<&[Value]>) -> Option<String> {
    template.map(|t| render_args(t, args.unwrap_or_default()))
}

/// Text a value renders as: strings without quotes, everything else as JSON.
pub fn display_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

fn render_tokens<'v, F>(tokens: &[Token], size_hint: usize, mut resolve: F) -> String
where
    F: FnMut(&str) -> Option<Cow<'v, str>>,
{
    let mut out = String::with_capacity(size_hint);
    for token in tokens {
        match token {
            Token::Literal { text, .. } => out.push_str(text),
            Token::Placeholder { key, fallback, .. } => match resolve(key) {
                Some(value) => out.push_str(&value),
                None => out.push_str(fallback),
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InterpolationError, SuffixMode};
    use serde_json::json;

    #[test]
    fn test_render_from_context() {
        let ip = Interpolator::of(&[json!("name"), json!("World")]).unwrap();
        assert_eq!(ip.render("Hello, ${name}!"), "Hello, World!");
    }

    #[test]
    fn test_unresolved_uses_fallback() {
        let ip = Interpolator::new();
        assert_eq!(ip.render("Value: ${x: default}"), "Value: default");
        assert_eq!(ip.render("Value: ${x}"), "Value: ${x}");
    }

    #[test]
    fn test_null_value_is_present() {
        let ip = Interpolator::of(&[json!("x"), Value::Null]).unwrap();
        assert_eq!(ip.render("${x: fallback}"), "null");
    }

    #[test]
    fn test_non_string_values() {
        let ip = Interpolator::of(&[
            json!("n"), json!(42),
            json!("b"), json!(true),
            json!("list"), json!([1, 2]),
        ])
        .unwrap();
        assert_eq!(ip.render("${n} ${b} ${list}"), "42 true [1,2]");
    }

    #[test]
    fn test_blank_and_none() {
        let ip = Interpolator::new();
        assert_eq!(ip.interpolate(None), None);
        assert_eq!(ip.interpolate(Some("")), Some(String::new()));
        assert_eq!(ip.render("  \t "), "  \t ");
    }

    #[test]
    fn test_add_fill_set_del() {
        let mut ip = Interpolator::of(&[json!("a"), json!(1)]).unwrap();
        ip.add(&[json!("b"), json!(2)])
            .unwrap()
            .fill(&[json!(" c >> "), json!(3)])
            .unwrap();
        assert_eq!(ip.render("${a}${b}${c}"), "123");

        ip.del(["a", "missing"]);
        assert_eq!(ip.render("${a}${b}"), "${a}2");

        ip.set(&[json!("z"), json!("only")]).unwrap();
        assert_eq!(ip.context().len(), 1);
        assert_eq!(ip.render("${b: gone} ${z}"), "gone only");
    }

    #[test]
    fn test_failed_mutation_leaves_context() {
        let mut ip = Interpolator::of(&[json!("a"), json!(1)]).unwrap();
        assert!(ip.set(&[json!("b")]).is_err());
        assert!(ip.fill(&[json!("nomarker"), json!(2)]).is_err());
        assert_eq!(ip.get("a"), Some(&json!(1)));
        assert_eq!(ip.context().len(), 1);
    }

    #[test]
    fn test_init_requires_suffix() {
        let err = Interpolator::init(&[json!("badkey"), json!("v")]).unwrap_err();
        assert!(matches!(err, InterpolationError::UnexpectedSuffix { index: 0, .. }));
    }

    #[test]
    fn test_of_tuples_skips_empty() {
        let ip = Interpolator::of_tuples([
            Tuple::from(("host", "db")),
            Tuple::default(),
            Tuple::new([json!("port"), json!(5432), json!("user"), json!("app")]),
        ])
        .unwrap();
        assert_eq!(ip.render("${user}@${host}:${port}"), "app@db:5432");
    }

    #[test]
    fn test_positional() {
        assert_eq!(render_args("${a}-${b}", &[json!("1"), json!("2")]), "1-2");
        assert_eq!(render_args("${a}-${b}", &[json!("1")]), "1-${b}");
        assert_eq!(render_args("${a: x}", &[]), "x");
        assert_eq!(render_args("${a}", &[json!(1), json!(2)]), "1");
        assert_eq!(interpolate(None, None), None);
        assert_eq!(interpolate(Some("${}abc"), None).as_deref(), Some("$abc"));
    }

    #[test]
    fn test_serde_roundtrip_keeps_context() {
        let ip = Interpolator::of(&[json!("k"), json!("v")]).unwrap();
        let json = serde_json::to_string(&ip).unwrap();
        let back: Interpolator = serde_json::from_str(&json).unwrap();
        assert_eq!(back.render("${k}"), "v");
    }

    #[test]
    fn test_build_with_normalizes_through_given_caches() {
        let caches = Arc::new(CacheService::default());
        let ip = Interpolator::build_with(
            Arc::clone(&caches),
            &[json!("isolated_host ->"), json!("db")],
            KeyConvention::Init,
        )
        .unwrap();

        assert_eq!(ip.render("${isolated_host}"), "db");
        assert!(caches
            .key_cache(SuffixMode::Trimmed)
            .contains_key("isolated_host ->"));
        assert!(!CacheService::shared()
            .key_cache(SuffixMode::Trimmed)
            .contains_key("isolated_host ->"));
        assert!(caches.template_cache().contains_key("${isolated_host}"));
    }

    #[test]
    fn test_merge_with_load_convention() {
        let caches = Arc::new(CacheService::default());
        let mut ip = Interpolator::new().with_caches(Arc::clone(&caches));
        ip.merge(&[json!(" padded >>"), json!(1)], KeyConvention::Load)
            .unwrap();

        assert_eq!(ip.get(" padded"), Some(&json!(1)));
        assert_eq!(caches.key_cache(SuffixMode::Untrimmed).len(), 1);
    }
}
