//! Expression node model for `$filter`, `$orderby` and lambda bodies.
//!
//! Nodes are built bottom-up by the binder. Each constructor computes the
//! node's type from its children and the schema, and fails on the first
//! inconsistency.

mod clauses;
mod constant;
mod node;
mod operators;
mod range_variable;
mod visitor;

pub use clauses::{FilterClause, OrderByClause, OrderByDirection};
pub use constant::{ConstantNode, ConstantValue};
pub use node::{
    BinaryOperatorNode, CollectionConstantNode, CollectionNavigationNode, CollectionNode,
    CollectionPropertyAccessNode, ConvertNode, CountNode, EntityCollectionCastNode,
    EntityRangeVariableReferenceNode, InNode, LambdaNode, NonEntityRangeVariableReferenceNode,
    ParameterAliasNode, QueryNode, SingleEntityCastNode, SingleNavigationNode, SingleValueFunctionCallNode,
    SingleValueNode, SingleValueOpenPropertyAccessNode, SingleValuePropertyAccessNode, UnaryOperatorNode,
};
pub use operators::{BinaryOperatorKind, UnaryOperatorKind};
pub use range_variable::{EntityRangeVariable, NonEntityRangeVariable, RangeVariable};
pub use visitor::{ExpressionWriter, QueryNodeVisitor};
