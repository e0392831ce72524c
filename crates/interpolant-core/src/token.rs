//! Token model produced by the template tokenizer.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One span of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    /// Text emitted verbatim.
    Literal {
        /// Output text. Differs from the source span only for `${}`,
        /// where the trailing `{}` is dropped.
        text: String,

        /// Byte range in the template.
        span: Range<usize>,
    },

    /// A `${...}` span resolved at render time.
    Placeholder {
        /// Lookup key: inner text up to the first `": "`.
        key: String,

        /// Rendered when the key cannot be resolved. Either the text after
        /// `": "` or the whole `${...}` match.
        fallback: String,

        /// Byte range in the template.
        span: Range<usize>,
    },
}

impl Token {
    /// Create a literal token.
    pub fn literal(text: impl Into<String>, span: Range<usize>) -> Self {
        Token::Literal {
            text: text.into(),
            span,
        }
    }

    /// Create a placeholder token.
    pub fn placeholder(
        key: impl Into<String>,
        fallback: impl Into<String>,
        span: Range<usize>,
    ) -> Self {
        Token::Placeholder {
            key: key.into(),
            fallback: fallback.into(),
            span,
        }
    }

    /// Byte range this token covers in its template.
    pub fn span(&self) -> Range<usize> {
        match self {
            Token::Literal { span, .. } | Token::Placeholder { span, .. } => span.clone(),
        }
    }

    /// Slice of `template` this token was parsed from.
    ///
    /// Returns an empty string if `template` is not the text this token
    /// came from and the span does not fit.
    pub fn source<'t>(&self, template: &'t str) -> &'t str {
        template.get(self.span()).unwrap_or_default()
    }

    /// True for `${...}` tokens.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Token::Placeholder { .. })
    }

    /// Key of a placeholder token.
    pub fn key(&self) -> Option<&str> {
        match self {
            Token::Placeholder { key, .. } => Some(key),
            Token::Literal { .. } => None,
        }
    }
}
