//! Classification of single, already isolated tokens.
//!
//! Splitting a URL into tokens belongs to the grammar layer. What remains here
//! is deciding whether one token's text is exactly a literal of some primitive
//! kind, or exactly a batch content-id. Both automata are generated at compile
//! time, so there is no pattern state to initialize at runtime.

pub mod token;

use logos::Logos;
pub use token::{ContentIdToken, LiteralToken};

/// Returns the literal kind when the whole of `text` is one literal token.
pub fn lex_literal(text: &str) -> Option<LiteralToken> {
    lex_whole::<LiteralToken>(text)
}

/// True when `text` matches the content-id pattern in full.
pub fn is_valid_content_id(text: &str) -> bool {
    lex_whole::<ContentIdToken>(text).is_some()
}

fn lex_whole<'s, T>(text: &'s str) -> Option<T>
where
    T: Logos<'s, Source = str, Extras = ()>,
{
    let mut lexer = T::lexer(text);
    let token = lexer.next()?.ok()?;
    if lexer.span() != (0..text.len()) {
        return None;
    }
    match lexer.next() {
        None => Some(token),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_numeric_literals() {
        assert_eq!(lex_literal("42"), Some(LiteralToken::Integer));
        assert_eq!(lex_literal("-7"), Some(LiteralToken::Integer));
        assert_eq!(lex_literal("42L"), Some(LiteralToken::Int64));
        assert_eq!(lex_literal("1.5"), Some(LiteralToken::Double));
        assert_eq!(lex_literal("1e10"), Some(LiteralToken::Double));
        assert_eq!(lex_literal("1.5f"), Some(LiteralToken::Single));
        assert_eq!(lex_literal("19.99m"), Some(LiteralToken::Decimal));
    }

    #[test]
    fn classifies_text_and_temporal_literals() {
        assert_eq!(lex_literal("'O''Neil'"), Some(LiteralToken::String));
        assert_eq!(lex_literal("''"), Some(LiteralToken::String));
        assert_eq!(lex_literal("2024-01-31"), Some(LiteralToken::Date));
        assert_eq!(
            lex_literal("2024-01-31T10:15:00Z"),
            Some(LiteralToken::DateTimeOffset)
        );
        assert_eq!(lex_literal("10:15:30"), Some(LiteralToken::TimeOfDay));
        assert_eq!(lex_literal("duration'P1DT2H'"), Some(LiteralToken::Duration));
        assert_eq!(
            lex_literal("01234567-89ab-cdef-0123-456789abcdef"),
            Some(LiteralToken::Guid)
        );
        assert_eq!(lex_literal("null"), Some(LiteralToken::Null));
        assert_eq!(lex_literal("true"), Some(LiteralToken::True));
    }

    #[test]
    fn rejects_partial_matches() {
        assert_eq!(lex_literal("42 43"), None);
        assert_eq!(lex_literal("'unterminated"), None);
        assert_eq!(lex_literal("Name"), None);
        assert_eq!(lex_literal(""), None);
    }

    #[test]
    fn content_ids_follow_unreserved_pattern() {
        assert!(is_valid_content_id("1"));
        assert!(is_valid_content_id("order-1.a_b~c"));
        assert!(!is_valid_content_id("$1"));
        assert!(!is_valid_content_id("1 2"));
        assert!(!is_valid_content_id("a/b"));
        assert!(!is_valid_content_id(""));
    }
}
