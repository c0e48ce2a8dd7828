//! Literal values and constant nodes.

use crate::error::{Result, UriError};
use crate::lexer::{self, LiteralToken};
use crate::schema::{PrimitiveKind, TypeRef};
use smol_str::SmolStr;
use std::fmt;

/// A literal value.
///
/// Decimal and temporal values keep their literal text; binding does not
/// need their numeric form.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(SmolStr),
    String(SmolStr),
    Guid(SmolStr),
    Date(SmolStr),
    DateTimeOffset(SmolStr),
    TimeOfDay(SmolStr),
    Duration(SmolStr),
}

impl ConstantValue {
    /// Primitive kind of the value; `None` for `null`.
    pub fn kind(&self) -> Option<PrimitiveKind> {
        let kind = match self {
            ConstantValue::Null => return None,
            ConstantValue::Boolean(_) => PrimitiveKind::Boolean,
            ConstantValue::Int32(_) => PrimitiveKind::Int32,
            ConstantValue::Int64(_) => PrimitiveKind::Int64,
            ConstantValue::Single(_) => PrimitiveKind::Single,
            ConstantValue::Double(_) => PrimitiveKind::Double,
            ConstantValue::Decimal(_) => PrimitiveKind::Decimal,
            ConstantValue::String(_) => PrimitiveKind::String,
            ConstantValue::Guid(_) => PrimitiveKind::Guid,
            ConstantValue::Date(_) => PrimitiveKind::Date,
            ConstantValue::DateTimeOffset(_) => PrimitiveKind::DateTimeOffset,
            ConstantValue::TimeOfDay(_) => PrimitiveKind::TimeOfDay,
            ConstantValue::Duration(_) => PrimitiveKind::Duration,
        };
        Some(kind)
    }

    /// Renders the value as URL literal text.
    pub fn to_literal(&self) -> String {
        match self {
            ConstantValue::Null => "null".to_string(),
            ConstantValue::Boolean(value) => value.to_string(),
            ConstantValue::Int32(value) => value.to_string(),
            ConstantValue::Int64(value) => format!("{value}L"),
            ConstantValue::Single(value) => format!("{value}f"),
            // Debug keeps a fractional part or exponent, so the text lexes as Double again.
            ConstantValue::Double(value) => format!("{value:?}"),
            ConstantValue::Decimal(text) => format!("{text}m"),
            ConstantValue::String(text) => format!("'{}'", text.replace('\'', "''")),
            ConstantValue::Guid(text)
            | ConstantValue::Date(text)
            | ConstantValue::DateTimeOffset(text)
            | ConstantValue::TimeOfDay(text) => text.to_string(),
            ConstantValue::Duration(text) => format!("duration'{text}'"),
        }
    }

    /// Parses one isolated literal token.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: &'static str| {
            UriError::InvalidLiteral {
                text: SmolStr::new(text),
                reason,
            }
            .rejected("ConstantNode")
        };
        let token = lexer::lex_literal(text).ok_or_else(|| invalid("not a recognized literal"))?;
        let value = match token {
            LiteralToken::Null => ConstantValue::Null,
            LiteralToken::True => ConstantValue::Boolean(true),
            LiteralToken::False => ConstantValue::Boolean(false),
            LiteralToken::Integer => match text.parse::<i32>() {
                Ok(value) => ConstantValue::Int32(value),
                Err(_) => text
                    .parse::<i64>()
                    .map(ConstantValue::Int64)
                    .map_err(|_| invalid("integer out of range"))?,
            },
            LiteralToken::Int64 => strip_suffix(text)
                .parse::<i64>()
                .map(ConstantValue::Int64)
                .map_err(|_| invalid("integer out of range"))?,
            LiteralToken::Double => text
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(ConstantValue::Double)
                .ok_or_else(|| invalid("double out of range"))?,
            LiteralToken::Single => strip_suffix(text)
                .parse::<f32>()
                .ok()
                .filter(|value| value.is_finite())
                .map(ConstantValue::Single)
                .ok_or_else(|| invalid("single out of range"))?,
            LiteralToken::Decimal => ConstantValue::Decimal(strip_suffix(text).into()),
            LiteralToken::String => ConstantValue::String(unquote(text).into()),
            LiteralToken::Guid => ConstantValue::Guid(text.into()),
            LiteralToken::Date => ConstantValue::Date(text.into()),
            LiteralToken::DateTimeOffset => ConstantValue::DateTimeOffset(text.into()),
            LiteralToken::TimeOfDay => ConstantValue::TimeOfDay(text.into()),
            LiteralToken::Duration => {
                let inner = text
                    .strip_prefix("duration'")
                    .and_then(|rest| rest.strip_suffix('\''))
                    .ok_or_else(|| invalid("malformed duration"))?;
                ConstantValue::Duration(inner.into())
            }
        };
        Ok(value)
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

fn strip_suffix(text: &str) -> &str {
    &text[..text.len() - 1]
}

fn unquote(text: &str) -> String {
    text[1..text.len() - 1].replace("''", "'")
}

/// A literal in an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantNode {
    value: ConstantValue,
    literal_text: SmolStr,
    type_ref: Option<TypeRef>,
}

impl ConstantNode {
    pub fn new(value: ConstantValue) -> Self {
        let type_ref = value.kind().map(|kind| TypeRef::primitive(kind, false));
        Self {
            literal_text: value.to_literal().into(),
            value,
            type_ref,
        }
    }

    /// Builds a constant from the raw literal token, keeping its original text.
    pub fn from_literal(text: &str) -> Result<Self> {
        let value = ConstantValue::parse(text)?;
        let type_ref = value.kind().map(|kind| TypeRef::primitive(kind, false));
        Ok(Self {
            value,
            literal_text: SmolStr::new(text),
            type_ref,
        })
    }

    pub fn value(&self) -> &ConstantValue {
        &self.value
    }

    pub fn literal_text(&self) -> &SmolStr {
        &self.literal_text
    }

    /// `None` for an untyped `null`.
    pub fn type_ref(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_widen_to_int64() {
        assert_eq!(ConstantValue::parse("42"), Ok(ConstantValue::Int32(42)));
        assert_eq!(
            ConstantValue::parse("3000000000"),
            Ok(ConstantValue::Int64(3_000_000_000))
        );
        assert_eq!(ConstantValue::parse("7L"), Ok(ConstantValue::Int64(7)));
        assert!(matches!(
            ConstantValue::parse("99999999999999999999"),
            Err(UriError::InvalidLiteral { reason: "integer out of range", .. })
        ));
    }

    #[test]
    fn strings_collapse_doubled_quotes() {
        assert_eq!(
            ConstantValue::parse("'O''Neil'"),
            Ok(ConstantValue::String("O'Neil".into()))
        );
        assert_eq!(ConstantValue::String("O'Neil".into()).to_literal(), "'O''Neil'");
    }

    #[test]
    fn literal_text_round_trips_through_the_lexer() {
        for value in [
            ConstantValue::Double(10_000_000_000.0),
            ConstantValue::Double(1.5),
            ConstantValue::Int64(5),
            ConstantValue::Decimal("19.99".into()),
            ConstantValue::Duration("P1D".into()),
            ConstantValue::Boolean(false),
        ] {
            assert_eq!(ConstantValue::parse(&value.to_literal()), Ok(value));
        }
    }

    #[test]
    fn floating_literals_must_be_finite() {
        for text in ["1e400".to_string(), "-1.5E999".to_string(), format!("{}f", "9".repeat(40))] {
            assert!(
                matches!(ConstantValue::parse(&text), Err(UriError::InvalidLiteral { .. })),
                "{text} accepted"
            );
        }
        assert_eq!(ConstantValue::parse("1e300"), Ok(ConstantValue::Double(1e300)));
        assert_eq!(ConstantValue::parse("2.5f"), Ok(ConstantValue::Single(2.5)));
    }

    #[test]
    fn null_constant_is_untyped() {
        let node = ConstantNode::from_literal("null").expect("null literal");
        assert_eq!(node.type_ref(), None);
        assert_eq!(node.literal_text(), "null");
    }

    #[test]
    fn constant_type_follows_value() {
        let node = ConstantNode::from_literal("2024-01-31").expect("date literal");
        assert_eq!(node.type_ref(), Some(&TypeRef::primitive(PrimitiveKind::Date, false)));
        assert!(ConstantNode::from_literal("Name").is_err());
    }
}
