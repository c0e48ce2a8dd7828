//! `$filter` and `$orderby` clauses.

use super::node::SingleValueNode;
use super::range_variable::RangeVariable;
use crate::error::{Result, UriError};
use std::fmt;

/// A bound `$filter`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    expression: SingleValueNode,
    range_variable: RangeVariable,
}

impl FilterClause {
    /// The expression must be Boolean when its type is known.
    pub fn new(expression: SingleValueNode, range_variable: RangeVariable) -> Result<Self> {
        if let Some(ty) = expression.type_ref().filter(|ty| !ty.is_boolean()) {
            return Err(UriError::NonBooleanExpression {
                context: "$filter",
                type_name: ty.name(),
            }
            .rejected("FilterClause"));
        }
        Ok(Self {
            expression,
            range_variable,
        })
    }

    pub fn expression(&self) -> &SingleValueNode {
        &self.expression
    }

    pub fn range_variable(&self) -> &RangeVariable {
        &self.range_variable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderByDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderByDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            OrderByDirection::Ascending => "asc",
            OrderByDirection::Descending => "desc",
        }
    }
}

impl fmt::Display for OrderByDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One `$orderby` item and the items after it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    expression: SingleValueNode,
    direction: OrderByDirection,
    range_variable: RangeVariable,
    then_by: Option<Box<OrderByClause>>,
}

impl OrderByClause {
    /// Entities have no ordering, so entity-typed expressions are rejected.
    pub fn new(
        expression: SingleValueNode,
        direction: OrderByDirection,
        range_variable: RangeVariable,
    ) -> Result<Self> {
        if let Some(ty) = expression.type_ref().filter(|ty| ty.is_entity() || ty.is_collection()) {
            return Err(UriError::UnexpectedEntity {
                context: "$orderby expression",
                type_name: ty.name(),
            }
            .rejected("OrderByClause"));
        }
        Ok(Self {
            expression,
            direction,
            range_variable,
            then_by: None,
        })
    }

    /// Appends `next` at the end of the chain.
    pub fn then_by(mut self, next: OrderByClause) -> Self {
        let tail = match self.then_by.take() {
            Some(existing) => (*existing).then_by(next),
            None => next,
        };
        self.then_by = Some(Box::new(tail));
        self
    }

    pub fn expression(&self) -> &SingleValueNode {
        &self.expression
    }

    pub fn direction(&self) -> OrderByDirection {
        self.direction
    }

    pub fn range_variable(&self) -> &RangeVariable {
        &self.range_variable
    }

    pub fn next(&self) -> Option<&OrderByClause> {
        self.then_by.as_deref()
    }

    /// This clause followed by its then-by chain.
    pub fn iter(&self) -> impl Iterator<Item = &OrderByClause> {
        std::iter::successors(Some(self), |clause| clause.next())
    }
}
