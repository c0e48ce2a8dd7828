//! Operator kinds and their result typing.

use crate::error::{Result, UriError};
use crate::schema::{PrimitiveKind, SchemaOracle, TypeRef};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperatorKind {
    Or,
    And,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Has,
}

impl BinaryOperatorKind {
    /// URL keyword (`eq`, `add`, ...).
    pub fn keyword(self) -> &'static str {
        match self {
            BinaryOperatorKind::Or => "or",
            BinaryOperatorKind::And => "and",
            BinaryOperatorKind::Equal => "eq",
            BinaryOperatorKind::NotEqual => "ne",
            BinaryOperatorKind::GreaterThan => "gt",
            BinaryOperatorKind::GreaterThanOrEqual => "ge",
            BinaryOperatorKind::LessThan => "lt",
            BinaryOperatorKind::LessThanOrEqual => "le",
            BinaryOperatorKind::Add => "add",
            BinaryOperatorKind::Subtract => "sub",
            BinaryOperatorKind::Multiply => "mul",
            BinaryOperatorKind::Divide => "div",
            BinaryOperatorKind::Modulo => "mod",
            BinaryOperatorKind::Has => "has",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "or" => BinaryOperatorKind::Or,
            "and" => BinaryOperatorKind::And,
            "eq" => BinaryOperatorKind::Equal,
            "ne" => BinaryOperatorKind::NotEqual,
            "gt" => BinaryOperatorKind::GreaterThan,
            "ge" => BinaryOperatorKind::GreaterThanOrEqual,
            "lt" => BinaryOperatorKind::LessThan,
            "le" => BinaryOperatorKind::LessThanOrEqual,
            "add" => BinaryOperatorKind::Add,
            "sub" => BinaryOperatorKind::Subtract,
            "mul" => BinaryOperatorKind::Multiply,
            "div" => BinaryOperatorKind::Divide,
            "mod" => BinaryOperatorKind::Modulo,
            "has" => BinaryOperatorKind::Has,
            _ => return None,
        };
        Some(kind)
    }

    /// True for operators whose result is always Boolean.
    pub fn yields_boolean(self) -> bool {
        !self.is_arithmetic()
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOperatorKind::Add
                | BinaryOperatorKind::Subtract
                | BinaryOperatorKind::Multiply
                | BinaryOperatorKind::Divide
                | BinaryOperatorKind::Modulo
        )
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperatorKind::Or => 1,
            BinaryOperatorKind::And => 2,
            BinaryOperatorKind::Equal | BinaryOperatorKind::NotEqual => 3,
            BinaryOperatorKind::GreaterThan
            | BinaryOperatorKind::GreaterThanOrEqual
            | BinaryOperatorKind::LessThan
            | BinaryOperatorKind::LessThanOrEqual => 4,
            BinaryOperatorKind::Add | BinaryOperatorKind::Subtract => 5,
            BinaryOperatorKind::Multiply | BinaryOperatorKind::Divide | BinaryOperatorKind::Modulo => 6,
            BinaryOperatorKind::Has => 7,
        }
    }
}

impl fmt::Display for BinaryOperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperatorKind {
    Not,
    Negate,
}

impl UnaryOperatorKind {
    pub fn keyword(self) -> &'static str {
        match self {
            UnaryOperatorKind::Not => "not",
            UnaryOperatorKind::Negate => "-",
        }
    }
}

impl fmt::Display for UnaryOperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Result type of `left <operator> right`.
///
/// Unknown operand types make the result unknown. Known operand types must be
/// equivalent under the schema's rules.
pub(crate) fn binary_result_type(
    operator: BinaryOperatorKind,
    left: Option<&TypeRef>,
    right: Option<&TypeRef>,
    schema: &dyn SchemaOracle,
) -> Result<Option<TypeRef>> {
    let (Some(left), Some(right)) = (left, right) else {
        return Ok(None);
    };
    if !schema.types_are_equivalent(left, right) {
        return Err(UriError::incompatible_operands(operator, left.name(), right.name()));
    }

    let accepted = match operator {
        BinaryOperatorKind::And | BinaryOperatorKind::Or => left.is_boolean(),
        _ if operator.is_arithmetic() => {
            left.is_numeric() || left.as_primitive() == Some(PrimitiveKind::Duration)
        }
        _ => true,
    };
    if !accepted {
        return Err(UriError::UnsupportedOperandType {
            operator: operator.keyword().into(),
            type_name: left.name(),
        });
    }

    let nullable = left.nullable || right.nullable;
    if operator.yields_boolean() {
        return Ok(Some(TypeRef::boolean(nullable)));
    }
    let result = match (left.as_primitive(), right.as_primitive()) {
        (Some(l), Some(r)) if l.is_numeric() && r.is_numeric() => {
            let wider = if r.numeric_rank() > l.numeric_rank() { r } else { l };
            TypeRef::primitive(wider, nullable)
        }
        _ => left.clone().with_nullable(nullable),
    };
    Ok(Some(result))
}

/// Result type of `<operator> operand`.
pub(crate) fn unary_result_type(operator: UnaryOperatorKind, operand: Option<&TypeRef>) -> Result<Option<TypeRef>> {
    let Some(operand) = operand else {
        return Ok(None);
    };
    let accepted = match operator {
        UnaryOperatorKind::Not => operand.is_boolean(),
        UnaryOperatorKind::Negate => {
            operand.is_numeric() || operand.as_primitive() == Some(PrimitiveKind::Duration)
        }
    };
    if !accepted {
        return Err(UriError::UnsupportedOperandType {
            operator: operator.keyword().into(),
            type_name: operand.name(),
        });
    }
    Ok(Some(operand.clone()))
}
