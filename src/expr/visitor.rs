//! Per-kind dispatch over expression nodes, and the expression text writer.

use super::constant::ConstantNode;
use super::node::{
    BinaryOperatorNode, CollectionConstantNode, CollectionNavigationNode, CollectionNode,
    CollectionPropertyAccessNode, ConvertNode, CountNode, EntityCollectionCastNode,
    EntityRangeVariableReferenceNode, InNode, LambdaNode, NonEntityRangeVariableReferenceNode,
    ParameterAliasNode, QueryNode, SingleEntityCastNode, SingleNavigationNode, SingleValueFunctionCallNode,
    SingleValueNode, SingleValueOpenPropertyAccessNode, SingleValuePropertyAccessNode, UnaryOperatorNode,
};
use super::operators::UnaryOperatorKind;
use std::fmt;

/// Handler for every kind of expression node.
pub trait QueryNodeVisitor {
    type Output;

    fn visit_constant(&mut self, node: &ConstantNode) -> Self::Output;
    fn visit_convert(&mut self, node: &ConvertNode) -> Self::Output;
    fn visit_binary_operator(&mut self, node: &BinaryOperatorNode) -> Self::Output;
    fn visit_unary_operator(&mut self, node: &UnaryOperatorNode) -> Self::Output;
    fn visit_property_access(&mut self, node: &SingleValuePropertyAccessNode) -> Self::Output;
    fn visit_open_property_access(&mut self, node: &SingleValueOpenPropertyAccessNode) -> Self::Output;
    fn visit_single_navigation(&mut self, node: &SingleNavigationNode) -> Self::Output;
    fn visit_single_entity_cast(&mut self, node: &SingleEntityCastNode) -> Self::Output;
    fn visit_entity_range_variable_reference(&mut self, node: &EntityRangeVariableReferenceNode) -> Self::Output;
    fn visit_non_entity_range_variable_reference(
        &mut self,
        node: &NonEntityRangeVariableReferenceNode,
    ) -> Self::Output;
    fn visit_parameter_alias(&mut self, node: &ParameterAliasNode) -> Self::Output;
    fn visit_function_call(&mut self, node: &SingleValueFunctionCallNode) -> Self::Output;
    fn visit_any(&mut self, node: &LambdaNode) -> Self::Output;
    fn visit_all(&mut self, node: &LambdaNode) -> Self::Output;
    fn visit_count(&mut self, node: &CountNode) -> Self::Output;
    fn visit_in(&mut self, node: &InNode) -> Self::Output;
    fn visit_collection_property_access(&mut self, node: &CollectionPropertyAccessNode) -> Self::Output;
    fn visit_collection_navigation(&mut self, node: &CollectionNavigationNode) -> Self::Output;
    fn visit_entity_collection_cast(&mut self, node: &EntityCollectionCastNode) -> Self::Output;
    fn visit_collection_constant(&mut self, node: &CollectionConstantNode) -> Self::Output;
}

impl SingleValueNode {
    pub fn accept<V: QueryNodeVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            SingleValueNode::Constant(node) => visitor.visit_constant(node),
            SingleValueNode::Convert(node) => visitor.visit_convert(node),
            SingleValueNode::BinaryOperator(node) => visitor.visit_binary_operator(node),
            SingleValueNode::UnaryOperator(node) => visitor.visit_unary_operator(node),
            SingleValueNode::PropertyAccess(node) => visitor.visit_property_access(node),
            SingleValueNode::OpenPropertyAccess(node) => visitor.visit_open_property_access(node),
            SingleValueNode::SingleNavigation(node) => visitor.visit_single_navigation(node),
            SingleValueNode::SingleEntityCast(node) => visitor.visit_single_entity_cast(node),
            SingleValueNode::EntityRangeVariableReference(node) => {
                visitor.visit_entity_range_variable_reference(node)
            }
            SingleValueNode::NonEntityRangeVariableReference(node) => {
                visitor.visit_non_entity_range_variable_reference(node)
            }
            SingleValueNode::ParameterAlias(node) => visitor.visit_parameter_alias(node),
            SingleValueNode::FunctionCall(node) => visitor.visit_function_call(node),
            SingleValueNode::Any(node) => visitor.visit_any(node),
            SingleValueNode::All(node) => visitor.visit_all(node),
            SingleValueNode::Count(node) => visitor.visit_count(node),
            SingleValueNode::In(node) => visitor.visit_in(node),
        }
    }
}

impl CollectionNode {
    pub fn accept<V: QueryNodeVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            CollectionNode::CollectionPropertyAccess(node) => visitor.visit_collection_property_access(node),
            CollectionNode::CollectionNavigation(node) => visitor.visit_collection_navigation(node),
            CollectionNode::EntityCollectionCast(node) => visitor.visit_entity_collection_cast(node),
            CollectionNode::CollectionConstant(node) => visitor.visit_collection_constant(node),
        }
    }
}

impl QueryNode {
    pub fn accept<V: QueryNodeVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            QueryNode::Single(node) => node.accept(visitor),
            QueryNode::Collection(node) => node.accept(visitor),
        }
    }
}

/// Renders nodes as OData expression text (`Price gt 5`).
///
/// Members of the implicit `$it` variable are written without a prefix.
/// Parentheses are added only where operator precedence requires them.
#[derive(Debug, Default)]
pub struct ExpressionWriter;

impl ExpressionWriter {
    pub fn new() -> Self {
        Self
    }

    fn member(&mut self, source: &SingleValueNode, name: &str) -> String {
        if source.is_implicit_variable() {
            name.to_string()
        } else {
            format!("{}/{name}", source.accept(self))
        }
    }

    fn operand(&mut self, node: &SingleValueNode, parent: u8, right: bool) -> String {
        let text = node.accept(self);
        match node {
            SingleValueNode::BinaryOperator(child) => {
                let child = child.operator().precedence();
                if child < parent || (right && child == parent) {
                    format!("({text})")
                } else {
                    text
                }
            }
            _ => text,
        }
    }

    fn lambda(&mut self, node: &LambdaNode, keyword: &str) -> String {
        let source = node.source().accept(self);
        let variable = node.range_variable().name();
        let body = node.body().accept(self);
        format!("{source}/{keyword}({variable}:{body})")
    }
}

impl QueryNodeVisitor for ExpressionWriter {
    type Output = String;

    fn visit_constant(&mut self, node: &ConstantNode) -> String {
        node.literal_text().to_string()
    }

    fn visit_convert(&mut self, node: &ConvertNode) -> String {
        format!("cast({},{})", node.source().accept(self), node.type_ref().name())
    }

    fn visit_binary_operator(&mut self, node: &BinaryOperatorNode) -> String {
        let precedence = node.operator().precedence();
        let left = self.operand(node.left(), precedence, false);
        let right = self.operand(node.right(), precedence, true);
        format!("{left} {} {right}", node.operator())
    }

    fn visit_unary_operator(&mut self, node: &UnaryOperatorNode) -> String {
        let operand = self.operand(node.operand(), u8::MAX, false);
        match node.operator() {
            UnaryOperatorKind::Not => format!("not {operand}"),
            UnaryOperatorKind::Negate => format!("-{operand}"),
        }
    }

    fn visit_property_access(&mut self, node: &SingleValuePropertyAccessNode) -> String {
        self.member(node.source(), &node.property().name)
    }

    fn visit_open_property_access(&mut self, node: &SingleValueOpenPropertyAccessNode) -> String {
        self.member(node.source(), node.name())
    }

    fn visit_single_navigation(&mut self, node: &SingleNavigationNode) -> String {
        self.member(node.source(), &node.navigation().name)
    }

    fn visit_single_entity_cast(&mut self, node: &SingleEntityCastNode) -> String {
        self.member(node.source(), &node.type_ref().name())
    }

    fn visit_entity_range_variable_reference(&mut self, node: &EntityRangeVariableReferenceNode) -> String {
        node.name().to_string()
    }

    fn visit_non_entity_range_variable_reference(&mut self, node: &NonEntityRangeVariableReferenceNode) -> String {
        node.name().to_string()
    }

    fn visit_parameter_alias(&mut self, node: &ParameterAliasNode) -> String {
        node.alias().to_string()
    }

    fn visit_function_call(&mut self, node: &SingleValueFunctionCallNode) -> String {
        let arguments = node
            .parameters()
            .iter()
            .map(|parameter| parameter.accept(self))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({arguments})", node.name())
    }

    fn visit_any(&mut self, node: &LambdaNode) -> String {
        self.lambda(node, "any")
    }

    fn visit_all(&mut self, node: &LambdaNode) -> String {
        self.lambda(node, "all")
    }

    fn visit_count(&mut self, node: &CountNode) -> String {
        format!("{}/$count", node.source().accept(self))
    }

    fn visit_in(&mut self, node: &InNode) -> String {
        format!("{} in {}", node.left().accept(self), node.right().accept(self))
    }

    fn visit_collection_property_access(&mut self, node: &CollectionPropertyAccessNode) -> String {
        self.member(node.source(), &node.property().name)
    }

    fn visit_collection_navigation(&mut self, node: &CollectionNavigationNode) -> String {
        self.member(node.source(), &node.navigation().name)
    }

    fn visit_entity_collection_cast(&mut self, node: &EntityCollectionCastNode) -> String {
        let cast = node.type_ref().element_type().map(|ty| ty.name()).unwrap_or_default();
        format!("{}/{cast}", node.source().accept(self))
    }

    fn visit_collection_constant(&mut self, node: &CollectionConstantNode) -> String {
        let items = node
            .items()
            .iter()
            .map(|item| item.literal_text().as_str())
            .collect::<Vec<_>>()
            .join(",");
        format!("({items})")
    }
}

impl fmt::Display for SingleValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.accept(&mut ExpressionWriter::new()))
    }
}

impl fmt::Display for CollectionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.accept(&mut ExpressionWriter::new()))
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.accept(&mut ExpressionWriter::new()))
    }
}
