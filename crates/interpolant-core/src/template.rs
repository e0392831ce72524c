//! Template tokenization.
//!
//! Templates contain placeholders marked with `${key}` or `${key: default}`
//! syntax. Everything else is literal text.

use crate::Token;
use regex::Regex;
use std::sync::OnceLock;

/// Pattern for matching placeholders in templates.
/// Format: ${key} or ${key: default}. Braces and newlines are not allowed inside.
const PLACEHOLDER_PATTERN: &str = r"\$\{[^{}\n]*\}";

/// Separates a placeholder key from its default value. Only the first
/// occurrence counts.
pub const DEFAULT_DELIMITER: &str = ": ";

/// A placeholder with nothing inside. Renders as a lone `$`.
pub const EMPTY_PLACEHOLDER: &str = "${}";

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(PLACEHOLDER_PATTERN).expect("Invalid placeholder pattern regex"))
}

/// Split a template into literal and placeholder tokens, left to right.
///
/// The spans of the returned tokens cover `template` exactly once.
///
/// # Example
///
/// ```
/// use interpolant_core::{template::tokenize, Token};
///
/// let tokens = tokenize("Hello, ${name: stranger}!");
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[1], Token::placeholder("name", "stranger", 7..24));
/// ```
pub fn tokenize(template: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for m in get_placeholder_regex().find_iter(template) {
        let matched = m.as_str();

        if matched == EMPTY_PLACEHOLDER {
            // Keep everything up to and including the `$`, drop the `{}`.
            tokens.push(Token::literal(&template[cursor..=m.start()], cursor..m.end()));
            cursor = m.end();
            continue;
        }

        if m.start() > cursor {
            tokens.push(Token::literal(&template[cursor..m.start()], cursor..m.start()));
        }

        let inner = &matched[2..matched.len() - 1];
        let token = match inner.split_once(DEFAULT_DELIMITER) {
            Some((key, default)) => Token::placeholder(key, default, m.range()),
            None => Token::placeholder(inner, matched, m.range()),
        };
        tokens.push(token);
        cursor = m.end();
    }

    if cursor < template.len() {
        tokens.push(Token::literal(&template[cursor..], cursor..template.len()));
    }

    tokens
}

/// Keys of all placeholders in a template, in order of appearance.
pub fn placeholder_keys(template: &str) -> Vec<String> {
    tokenize(template)
        .into_iter()
        .filter_map(|token| match token {
            Token::Placeholder { key, .. } => Some(key),
            Token::Literal { .. } => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reassemble(template: &str, tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.source(template)).collect()
    }

    #[test]
    fn test_literal_only() {
        let tokens = tokenize("no placeholders here");
        assert_eq!(tokens, vec![Token::literal("no placeholders here", 0..20)]);
    }

    #[test]
    fn test_empty_template() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_placeholder_without_default() {
        let tokens = tokenize("Hello, ${name}!");
        assert_eq!(
            tokens,
            vec![
                Token::literal("Hello, ", 0..7),
                Token::placeholder("name", "${name}", 7..14),
                Token::literal("!", 14..15),
            ]
        );
    }

    #[test]
    fn test_default_splits_on_first_delimiter() {
        let tokens = tokenize("${url: http://host: 80}");
        assert_eq!(
            tokens,
            vec![Token::placeholder("url", "http://host: 80", 0..23)]
        );
    }

    #[test]
    fn test_empty_placeholder_becomes_dollar() {
        let tokens = tokenize("${}abc");
        assert_eq!(
            tokens,
            vec![Token::literal("$", 0..3), Token::literal("abc", 3..6)]
        );
    }

    #[test]
    fn test_empty_placeholder_merges_preceding_text() {
        let tokens = tokenize("cost: ${}5");
        assert_eq!(
            tokens,
            vec![Token::literal("cost: $", 0..9), Token::literal("5", 9..10)]
        );
    }

    #[test]
    fn test_adjacent_placeholders() {
        let tokens = tokenize("${a}${b}");
        assert_eq!(
            tokens,
            vec![
                Token::placeholder("a", "${a}", 0..4),
                Token::placeholder("b", "${b}", 4..8),
            ]
        );
    }

    #[test]
    fn test_empty_key_with_default() {
        let tokens = tokenize("${: fallback}");
        assert_eq!(tokens, vec![Token::placeholder("", "fallback", 0..13)]);
    }

    #[test]
    fn test_braces_inside_are_not_placeholders() {
        let template = "${a{b}} and ${ok}";
        let tokens = tokenize(template);
        assert_eq!(placeholder_keys(template), vec!["ok".to_string()]);
        assert_eq!(reassemble(template, &tokens), template);
    }

    #[test]
    fn test_newline_breaks_placeholder() {
        let tokens = tokenize("${a\nb}");
        assert_eq!(tokens, vec![Token::literal("${a\nb}", 0..6)]);
    }

    #[test]
    fn test_spans_reconstruct_template() {
        for template in [
            "plain",
            "${x}",
            "a ${b} c ${d: e} f",
            "${}${}${q}",
            "€ ${ключ: значение} ✓",
            "$ {not} ${unterminated",
        ] {
            let tokens = tokenize(template);
            assert_eq!(reassemble(template, &tokens), template, "template {template:?}");
        }
    }
}
