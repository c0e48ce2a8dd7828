//! Typed expression nodes.
//!
//! Every node computes its type from its children when it is built and
//! rejects children that do not fit. A node that exists is well-typed as far
//! as the known types allow; unknown types (open properties, untyped nulls,
//! parameter aliases) propagate instead of failing.

use super::constant::ConstantNode;
use super::operators::{self, BinaryOperatorKind, UnaryOperatorKind};
use super::range_variable::{EntityRangeVariable, NonEntityRangeVariable, RangeVariable};
use crate::error::{Result, UriError, require_identifier};
use crate::schema::{EntitySet, NavigationProperty, PrimitiveKind, SchemaOracle, StructuralProperty, TypeRef};
use smol_str::SmolStr;
use std::sync::Arc;

/// Any expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Single(SingleValueNode),
    Collection(CollectionNode),
}

impl QueryNode {
    pub fn type_ref(&self) -> Option<&TypeRef> {
        match self {
            QueryNode::Single(node) => node.type_ref(),
            QueryNode::Collection(node) => Some(node.type_ref()),
        }
    }

    pub fn as_single(&self) -> Option<&SingleValueNode> {
        match self {
            QueryNode::Single(node) => Some(node),
            QueryNode::Collection(_) => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionNode> {
        match self {
            QueryNode::Single(_) => None,
            QueryNode::Collection(node) => Some(node),
        }
    }
}

impl From<SingleValueNode> for QueryNode {
    fn from(node: SingleValueNode) -> Self {
        QueryNode::Single(node)
    }
}

impl From<CollectionNode> for QueryNode {
    fn from(node: CollectionNode) -> Self {
        QueryNode::Collection(node)
    }
}

/// A node producing one value.
#[derive(Debug, Clone, PartialEq)]
pub enum SingleValueNode {
    Constant(ConstantNode),
    Convert(ConvertNode),
    BinaryOperator(BinaryOperatorNode),
    UnaryOperator(UnaryOperatorNode),
    PropertyAccess(SingleValuePropertyAccessNode),
    OpenPropertyAccess(SingleValueOpenPropertyAccessNode),
    SingleNavigation(SingleNavigationNode),
    SingleEntityCast(SingleEntityCastNode),
    EntityRangeVariableReference(EntityRangeVariableReferenceNode),
    NonEntityRangeVariableReference(NonEntityRangeVariableReferenceNode),
    ParameterAlias(ParameterAliasNode),
    FunctionCall(SingleValueFunctionCallNode),
    Any(LambdaNode),
    All(LambdaNode),
    Count(CountNode),
    In(InNode),
}

impl SingleValueNode {
    /// Type of the produced value; `None` when it cannot be known statically.
    pub fn type_ref(&self) -> Option<&TypeRef> {
        match self {
            SingleValueNode::Constant(node) => node.type_ref(),
            SingleValueNode::Convert(node) => Some(&node.type_ref),
            SingleValueNode::BinaryOperator(node) => node.type_ref.as_ref(),
            SingleValueNode::UnaryOperator(node) => node.type_ref.as_ref(),
            SingleValueNode::PropertyAccess(node) => Some(&node.property.type_ref),
            SingleValueNode::OpenPropertyAccess(_) => None,
            SingleValueNode::SingleNavigation(node) => Some(&node.type_ref),
            SingleValueNode::SingleEntityCast(node) => Some(&node.type_ref),
            SingleValueNode::EntityRangeVariableReference(node) => Some(&node.type_ref),
            SingleValueNode::NonEntityRangeVariableReference(node) => node.type_ref.as_ref(),
            SingleValueNode::ParameterAlias(node) => node.type_ref.as_ref(),
            SingleValueNode::FunctionCall(node) => node.return_type.as_ref(),
            SingleValueNode::Any(node) | SingleValueNode::All(node) => Some(&node.type_ref),
            SingleValueNode::Count(node) => Some(&node.type_ref),
            SingleValueNode::In(node) => Some(&node.type_ref),
        }
    }

    /// Entity set of an entity-valued node, when known.
    pub fn entity_set(&self) -> Option<&Arc<EntitySet>> {
        match self {
            SingleValueNode::SingleNavigation(node) => node.entity_set.as_ref(),
            SingleValueNode::SingleEntityCast(node) => node.entity_set.as_ref(),
            SingleValueNode::EntityRangeVariableReference(node) => node.entity_set.as_ref(),
            _ => None,
        }
    }

    /// Reference to a range variable, of the matching kind.
    pub fn reference(variable: &RangeVariable) -> Self {
        match variable {
            RangeVariable::Entity(variable) => {
                SingleValueNode::EntityRangeVariableReference(EntityRangeVariableReferenceNode::new(variable))
            }
            RangeVariable::NonEntity(variable) => SingleValueNode::NonEntityRangeVariableReference(
                NonEntityRangeVariableReferenceNode::new(variable),
            ),
        }
    }

    /// True for a reference to the implicit `$it` variable.
    pub fn is_implicit_variable(&self) -> bool {
        matches!(
            self,
            SingleValueNode::EntityRangeVariableReference(node) if node.name == EntityRangeVariable::IMPLICIT
        )
    }
}

/// A node producing a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionNode {
    CollectionPropertyAccess(CollectionPropertyAccessNode),
    CollectionNavigation(CollectionNavigationNode),
    EntityCollectionCast(EntityCollectionCastNode),
    CollectionConstant(CollectionConstantNode),
}

impl CollectionNode {
    /// Collection type of the node.
    pub fn type_ref(&self) -> &TypeRef {
        match self {
            CollectionNode::CollectionPropertyAccess(node) => &node.property.type_ref,
            CollectionNode::CollectionNavigation(node) => &node.type_ref,
            CollectionNode::EntityCollectionCast(node) => &node.type_ref,
            CollectionNode::CollectionConstant(node) => &node.type_ref,
        }
    }

    /// Element type of the collection.
    pub fn item_type(&self) -> &TypeRef {
        let type_ref = self.type_ref();
        type_ref.element_type().unwrap_or(type_ref)
    }

    pub fn entity_set(&self) -> Option<&Arc<EntitySet>> {
        match self {
            CollectionNode::CollectionNavigation(node) => node.entity_set.as_ref(),
            CollectionNode::EntityCollectionCast(node) => node.entity_set.as_ref(),
            CollectionNode::CollectionPropertyAccess(_) | CollectionNode::CollectionConstant(_) => None,
        }
    }

    /// True when the items are entities.
    pub fn is_entity_collection(&self) -> bool {
        self.item_type().is_entity()
    }
}

macro_rules! impl_from_node {
    ($target:ident: $($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for $target {
                fn from(node: $ty) -> Self {
                    $target::$variant(node)
                }
            }
        )*
    };
}

impl_from_node!(SingleValueNode:
    Constant(ConstantNode),
    Convert(ConvertNode),
    BinaryOperator(BinaryOperatorNode),
    UnaryOperator(UnaryOperatorNode),
    PropertyAccess(SingleValuePropertyAccessNode),
    OpenPropertyAccess(SingleValueOpenPropertyAccessNode),
    SingleNavigation(SingleNavigationNode),
    SingleEntityCast(SingleEntityCastNode),
    EntityRangeVariableReference(EntityRangeVariableReferenceNode),
    NonEntityRangeVariableReference(NonEntityRangeVariableReferenceNode),
    ParameterAlias(ParameterAliasNode),
    FunctionCall(SingleValueFunctionCallNode),
    Count(CountNode),
    In(InNode),
);

impl_from_node!(CollectionNode:
    CollectionPropertyAccess(CollectionPropertyAccessNode),
    CollectionNavigation(CollectionNavigationNode),
    EntityCollectionCast(EntityCollectionCastNode),
    CollectionConstant(CollectionConstantNode),
);

fn unknown_type_name(type_ref: Option<&TypeRef>) -> SmolStr {
    type_ref
        .map(TypeRef::name)
        .unwrap_or_else(|| SmolStr::new_static("<unknown>"))
}

/// Qualified name of an entity-typed source.
fn entity_source(source: Option<&TypeRef>, context: &'static str, constructor: &'static str) -> Result<SmolStr> {
    source.and_then(TypeRef::as_entity).cloned().ok_or_else(|| {
        UriError::NotAnEntity {
            context,
            type_name: unknown_type_name(source),
        }
        .rejected(constructor)
    })
}

/// Qualified name of an entity- or complex-typed source.
fn structured_source(source: Option<&TypeRef>, constructor: &'static str) -> Result<SmolStr> {
    source.and_then(TypeRef::structured_name).cloned().ok_or_else(|| {
        UriError::UnsupportedOperandType {
            operator: "property access".into(),
            type_name: unknown_type_name(source),
        }
        .rejected(constructor)
    })
}

fn require_boolean(expression: Option<&TypeRef>, context: &'static str, constructor: &'static str) -> Result<()> {
    match expression {
        Some(ty) if !ty.is_boolean() => Err(UriError::NonBooleanExpression {
            context,
            type_name: ty.name(),
        }
        .rejected(constructor)),
        _ => Ok(()),
    }
}

// ============================================================================
// Operators and conversions
// ============================================================================

/// `left <operator> right`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperatorNode {
    operator: BinaryOperatorKind,
    left: Box<SingleValueNode>,
    right: Box<SingleValueNode>,
    type_ref: Option<TypeRef>,
}

impl BinaryOperatorNode {
    pub fn new(
        operator: BinaryOperatorKind,
        left: SingleValueNode,
        right: SingleValueNode,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        let type_ref = operators::binary_result_type(operator, left.type_ref(), right.type_ref(), schema)
            .map_err(|error| error.rejected("BinaryOperatorNode"))?;
        Ok(Self {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            type_ref,
        })
    }

    pub fn operator(&self) -> BinaryOperatorKind {
        self.operator
    }

    pub fn left(&self) -> &SingleValueNode {
        &self.left
    }

    pub fn right(&self) -> &SingleValueNode {
        &self.right
    }

    pub fn type_ref(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }
}

/// `not operand` or `-operand`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperatorNode {
    operator: UnaryOperatorKind,
    operand: Box<SingleValueNode>,
    type_ref: Option<TypeRef>,
}

impl UnaryOperatorNode {
    pub fn new(operator: UnaryOperatorKind, operand: SingleValueNode) -> Result<Self> {
        let type_ref = operators::unary_result_type(operator, operand.type_ref())
            .map_err(|error| error.rejected("UnaryOperatorNode"))?;
        Ok(Self {
            operator,
            operand: Box::new(operand),
            type_ref,
        })
    }

    pub fn operator(&self) -> UnaryOperatorKind {
        self.operator
    }

    pub fn operand(&self) -> &SingleValueNode {
        &self.operand
    }
}

/// Conversion of a single value to another single-valued type.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertNode {
    source: Box<SingleValueNode>,
    type_ref: TypeRef,
}

impl ConvertNode {
    pub fn new(source: SingleValueNode, type_ref: TypeRef) -> Result<Self> {
        if type_ref.is_collection() {
            return Err(UriError::UnsupportedOperandType {
                operator: "cast".into(),
                type_name: type_ref.name(),
            }
            .rejected("ConvertNode"));
        }
        Ok(Self {
            source: Box::new(source),
            type_ref,
        })
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }
}

// ============================================================================
// Property access
// ============================================================================

/// Access to a declared single-valued property.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleValuePropertyAccessNode {
    source: Box<SingleValueNode>,
    property: StructuralProperty,
}

impl SingleValuePropertyAccessNode {
    pub fn new(source: SingleValueNode, property: StructuralProperty) -> Result<Self> {
        require_identifier(&property.name, "property name")?;
        structured_source(source.type_ref(), "SingleValuePropertyAccessNode")?;
        if property.type_ref.is_collection() {
            return Err(UriError::PropertyShapeMismatch {
                property: property.name.clone(),
                type_name: property.type_ref.name(),
                expected: "single",
            }
            .rejected("SingleValuePropertyAccessNode"));
        }
        Ok(Self {
            source: Box::new(source),
            property,
        })
    }

    /// Looks `name` up on the source's type and its bases.
    pub fn resolve(source: SingleValueNode, name: &str, schema: &dyn SchemaOracle) -> Result<Self> {
        let owner = structured_source(source.type_ref(), "SingleValuePropertyAccessNode")?;
        let property = schema.find_property(&owner, name).ok_or_else(|| {
            UriError::unknown("property", format!("{owner}/{name}")).rejected("SingleValuePropertyAccessNode")
        })?;
        Self::new(source, property)
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn property(&self) -> &StructuralProperty {
        &self.property
    }
}

/// Access to a declared collection-valued property.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPropertyAccessNode {
    source: Box<SingleValueNode>,
    property: StructuralProperty,
}

impl CollectionPropertyAccessNode {
    pub fn new(source: SingleValueNode, property: StructuralProperty) -> Result<Self> {
        require_identifier(&property.name, "property name")?;
        structured_source(source.type_ref(), "CollectionPropertyAccessNode")?;
        if !property.type_ref.is_collection() {
            return Err(UriError::PropertyShapeMismatch {
                property: property.name.clone(),
                type_name: property.type_ref.name(),
                expected: "collection",
            }
            .rejected("CollectionPropertyAccessNode"));
        }
        Ok(Self {
            source: Box::new(source),
            property,
        })
    }

    pub fn resolve(source: SingleValueNode, name: &str, schema: &dyn SchemaOracle) -> Result<Self> {
        let owner = structured_source(source.type_ref(), "CollectionPropertyAccessNode")?;
        let property = schema.find_property(&owner, name).ok_or_else(|| {
            UriError::unknown("property", format!("{owner}/{name}")).rejected("CollectionPropertyAccessNode")
        })?;
        Self::new(source, property)
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn property(&self) -> &StructuralProperty {
        &self.property
    }
}

/// Access to an undeclared property of an open type. Its type is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleValueOpenPropertyAccessNode {
    source: Box<SingleValueNode>,
    name: SmolStr,
}

impl SingleValueOpenPropertyAccessNode {
    pub fn new(source: SingleValueNode, name: impl Into<SmolStr>) -> Result<Self> {
        let name = name.into();
        require_identifier(&name, "open property name")?;
        Ok(Self {
            source: Box::new(source),
            name,
        })
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }
}

// ============================================================================
// Navigation and casts
// ============================================================================

fn navigation_set(
    source: Option<&Arc<EntitySet>>,
    navigation: &NavigationProperty,
    schema: &dyn SchemaOracle,
) -> Option<Arc<EntitySet>> {
    source.and_then(|set| schema.resolve_navigation_target(set, navigation))
}

fn resolve_navigation(
    source: &SingleValueNode,
    name: &str,
    schema: &dyn SchemaOracle,
    constructor: &'static str,
) -> Result<NavigationProperty> {
    let owner = entity_source(source.type_ref(), "navigation", constructor)?;
    schema
        .find_navigation(&owner, name)
        .ok_or_else(|| UriError::unknown("navigation property", format!("{owner}/{name}")).rejected(constructor))
}

/// Follows a to-one navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleNavigationNode {
    source: Box<SingleValueNode>,
    navigation: NavigationProperty,
    type_ref: TypeRef,
    entity_set: Option<Arc<EntitySet>>,
}

impl SingleNavigationNode {
    pub fn new(source: SingleValueNode, navigation: NavigationProperty, schema: &dyn SchemaOracle) -> Result<Self> {
        require_identifier(&navigation.name, "navigation property name")?;
        if !navigation.multiplicity.is_single() {
            return Err(UriError::MultiplicityMismatch {
                navigation: navigation.name.clone(),
                expected: "single",
                multiplicity: navigation.multiplicity,
            }
            .rejected("SingleNavigationNode"));
        }
        entity_source(source.type_ref(), "single navigation", "SingleNavigationNode")?;
        let entity_set = navigation_set(source.entity_set(), &navigation, schema);
        Ok(Self {
            type_ref: navigation.type_ref(),
            source: Box::new(source),
            navigation,
            entity_set,
        })
    }

    pub fn resolve(source: SingleValueNode, name: &str, schema: &dyn SchemaOracle) -> Result<Self> {
        let navigation = resolve_navigation(&source, name, schema, "SingleNavigationNode")?;
        Self::new(source, navigation, schema)
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn navigation(&self) -> &NavigationProperty {
        &self.navigation
    }

    pub fn entity_set(&self) -> Option<&Arc<EntitySet>> {
        self.entity_set.as_ref()
    }
}

/// Follows a to-many navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionNavigationNode {
    source: Box<SingleValueNode>,
    navigation: NavigationProperty,
    type_ref: TypeRef,
    entity_set: Option<Arc<EntitySet>>,
}

impl CollectionNavigationNode {
    pub fn new(source: SingleValueNode, navigation: NavigationProperty, schema: &dyn SchemaOracle) -> Result<Self> {
        require_identifier(&navigation.name, "navigation property name")?;
        if navigation.multiplicity.is_single() {
            return Err(UriError::MultiplicityMismatch {
                navigation: navigation.name.clone(),
                expected: "collection",
                multiplicity: navigation.multiplicity,
            }
            .rejected("CollectionNavigationNode"));
        }
        entity_source(source.type_ref(), "collection navigation", "CollectionNavigationNode")?;
        let entity_set = navigation_set(source.entity_set(), &navigation, schema);
        Ok(Self {
            type_ref: navigation.type_ref(),
            source: Box::new(source),
            navigation,
            entity_set,
        })
    }

    pub fn resolve(source: SingleValueNode, name: &str, schema: &dyn SchemaOracle) -> Result<Self> {
        let navigation = resolve_navigation(&source, name, schema, "CollectionNavigationNode")?;
        Self::new(source, navigation, schema)
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn navigation(&self) -> &NavigationProperty {
        &self.navigation
    }

    pub fn entity_set(&self) -> Option<&Arc<EntitySet>> {
        self.entity_set.as_ref()
    }
}

/// Casts a single entity to a related entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleEntityCastNode {
    source: Box<SingleValueNode>,
    type_ref: TypeRef,
    entity_set: Option<Arc<EntitySet>>,
}

impl SingleEntityCastNode {
    pub fn new(source: SingleValueNode, type_name: &str, schema: &dyn SchemaOracle) -> Result<Self> {
        require_identifier(type_name, "type name")?;
        let target = schema
            .resolve_entity_type(type_name)
            .ok_or_else(|| UriError::unknown("entity type", type_name).rejected("SingleEntityCastNode"))?;
        entity_source(source.type_ref(), "entity cast", "SingleEntityCastNode")?;
        let source_type = source.type_ref().cloned().unwrap_or_else(|| target.type_ref());
        let type_ref = TypeRef::entity(target.qualified_name(), source_type.nullable);
        if !schema.types_are_related(&source_type, &type_ref) {
            return Err(UriError::unrelated("entity cast", source_type.name(), type_ref.name())
                .rejected("SingleEntityCastNode"));
        }
        let entity_set = source.entity_set().cloned();
        Ok(Self {
            source: Box::new(source),
            type_ref,
            entity_set,
        })
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn entity_set(&self) -> Option<&Arc<EntitySet>> {
        self.entity_set.as_ref()
    }
}

/// Casts an entity collection to a collection of a related entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCollectionCastNode {
    source: Box<CollectionNode>,
    type_ref: TypeRef,
    entity_set: Option<Arc<EntitySet>>,
}

impl EntityCollectionCastNode {
    pub fn new(source: CollectionNode, type_name: &str, schema: &dyn SchemaOracle) -> Result<Self> {
        require_identifier(type_name, "type name")?;
        let target = schema
            .resolve_entity_type(type_name)
            .ok_or_else(|| UriError::unknown("entity type", type_name).rejected("EntityCollectionCastNode"))?;
        if !source.is_entity_collection() {
            return Err(UriError::NotAnEntity {
                context: "entity collection cast",
                type_name: source.type_ref().name(),
            }
            .rejected("EntityCollectionCastNode"));
        }
        let item = target.type_ref();
        if !schema.types_are_related(source.item_type(), &item) {
            return Err(UriError::unrelated("entity collection cast", source.item_type().name(), item.name())
                .rejected("EntityCollectionCastNode"));
        }
        let entity_set = source.entity_set().cloned();
        Ok(Self {
            source: Box::new(source),
            type_ref: TypeRef::collection(item),
            entity_set,
        })
    }

    pub fn source(&self) -> &CollectionNode {
        &self.source
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn entity_set(&self) -> Option<&Arc<EntitySet>> {
        self.entity_set.as_ref()
    }
}

// ============================================================================
// Variables, aliases and calls
// ============================================================================

/// Reference to an entity range variable. Name, type and set are copied.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRangeVariableReferenceNode {
    name: SmolStr,
    type_ref: TypeRef,
    entity_set: Option<Arc<EntitySet>>,
}

impl EntityRangeVariableReferenceNode {
    pub fn new(variable: &EntityRangeVariable) -> Self {
        Self {
            name: variable.name().clone(),
            type_ref: variable.type_ref().clone(),
            entity_set: variable.entity_set().cloned(),
        }
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn entity_set(&self) -> Option<&Arc<EntitySet>> {
        self.entity_set.as_ref()
    }
}

/// Reference to a non-entity range variable.
#[derive(Debug, Clone, PartialEq)]
pub struct NonEntityRangeVariableReferenceNode {
    name: SmolStr,
    type_ref: Option<TypeRef>,
}

impl NonEntityRangeVariableReferenceNode {
    pub fn new(variable: &NonEntityRangeVariable) -> Self {
        Self {
            name: variable.name().clone(),
            type_ref: variable.type_ref().cloned(),
        }
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    pub fn type_ref(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }
}

/// `@alias`, resolved from another query option.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAliasNode {
    alias: SmolStr,
    type_ref: Option<TypeRef>,
}

impl ParameterAliasNode {
    pub fn new(alias: &str, type_ref: Option<TypeRef>) -> Result<Self> {
        require_identifier(alias, "parameter alias")?;
        if !alias.starts_with('@') || alias.len() == 1 {
            return Err(UriError::InvalidParameterAlias {
                alias: SmolStr::new(alias),
            }
            .rejected("ParameterAliasNode"));
        }
        if let Some(ty) = type_ref.as_ref().filter(|ty| ty.is_collection()) {
            return Err(UriError::UnsupportedOperandType {
                operator: "parameter alias".into(),
                type_name: ty.name(),
            }
            .rejected("ParameterAliasNode"));
        }
        Ok(Self {
            alias: SmolStr::new(alias),
            type_ref,
        })
    }

    pub fn alias(&self) -> &SmolStr {
        &self.alias
    }
}

/// Call of a single-valued function (`contains(Name,'a')`, `length(Name)`).
#[derive(Debug, Clone, PartialEq)]
pub struct SingleValueFunctionCallNode {
    name: SmolStr,
    parameters: Vec<QueryNode>,
    return_type: Option<TypeRef>,
}

impl SingleValueFunctionCallNode {
    pub fn new(name: &str, parameters: Vec<QueryNode>, return_type: Option<TypeRef>) -> Result<Self> {
        require_identifier(name, "function name")?;
        if let Some(ty) = return_type.as_ref().filter(|ty| ty.is_collection()) {
            return Err(UriError::PropertyShapeMismatch {
                property: SmolStr::new(name),
                type_name: ty.name(),
                expected: "single",
            }
            .rejected("SingleValueFunctionCallNode"));
        }
        Ok(Self {
            name: SmolStr::new(name),
            parameters,
            return_type,
        })
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    pub fn parameters(&self) -> &[QueryNode] {
        &self.parameters
    }
}

// ============================================================================
// Collection operators
// ============================================================================

/// Body of `any`/`all`: a predicate evaluated per item of `source`.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaNode {
    source: Box<CollectionNode>,
    range_variable: RangeVariable,
    body: Box<SingleValueNode>,
    type_ref: TypeRef,
}

impl LambdaNode {
    pub fn new(
        source: CollectionNode,
        range_variable: RangeVariable,
        body: SingleValueNode,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        if let Some(variable_type) = range_variable.type_ref() {
            let item = source.item_type();
            let fits = if variable_type.is_entity() {
                schema.types_are_related(variable_type, item)
            } else {
                schema.types_are_equivalent(variable_type, item)
            };
            if !fits {
                return Err(UriError::unrelated("lambda range variable", item.name(), variable_type.name())
                    .rejected("LambdaNode"));
            }
        }
        require_boolean(body.type_ref(), "lambda body", "LambdaNode")?;
        Ok(Self {
            source: Box::new(source),
            range_variable,
            body: Box::new(body),
            type_ref: TypeRef::boolean(false),
        })
    }

    pub fn source(&self) -> &CollectionNode {
        &self.source
    }

    pub fn range_variable(&self) -> &RangeVariable {
        &self.range_variable
    }

    pub fn body(&self) -> &SingleValueNode {
        &self.body
    }
}

/// `collection/$count`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountNode {
    source: Box<CollectionNode>,
    type_ref: TypeRef,
}

impl CountNode {
    pub fn new(source: CollectionNode) -> Self {
        Self {
            source: Box::new(source),
            type_ref: TypeRef::primitive(PrimitiveKind::Int64, false),
        }
    }

    pub fn source(&self) -> &CollectionNode {
        &self.source
    }
}

/// `value in collection`.
#[derive(Debug, Clone, PartialEq)]
pub struct InNode {
    left: Box<SingleValueNode>,
    right: Box<CollectionNode>,
    type_ref: TypeRef,
}

impl InNode {
    pub fn new(left: SingleValueNode, right: CollectionNode, schema: &dyn SchemaOracle) -> Result<Self> {
        let nullable = match left.type_ref() {
            Some(ty) => {
                let item = right.item_type();
                if !schema.types_are_equivalent(ty, item) {
                    return Err(UriError::incompatible_operands("in", ty.name(), item.name()).rejected("InNode"));
                }
                ty.nullable
            }
            None => true,
        };
        Ok(Self {
            left: Box::new(left),
            right: Box::new(right),
            type_ref: TypeRef::boolean(nullable),
        })
    }

    pub fn left(&self) -> &SingleValueNode {
        &self.left
    }

    pub fn right(&self) -> &CollectionNode {
        &self.right
    }
}

/// A parenthesized list of literals (`(1,2,3)`).
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionConstantNode {
    items: Vec<ConstantNode>,
    type_ref: TypeRef,
}

impl CollectionConstantNode {
    /// All typed items must share one type; `null` items make it nullable.
    pub fn new(items: Vec<ConstantNode>, schema: &dyn SchemaOracle) -> Result<Self> {
        if items.is_empty() {
            return Err(UriError::missing("collection items").rejected("CollectionConstantNode"));
        }
        let mut item_type: Option<TypeRef> = None;
        for item in &items {
            let Some(ty) = item.type_ref() else {
                continue;
            };
            let seen = item_type.get_or_insert_with(|| ty.clone());
            if !schema.types_are_equivalent(seen, ty) {
                return Err(UriError::incompatible_operands("in", seen.name(), ty.name())
                    .rejected("CollectionConstantNode"));
            }
        }
        let has_null = items.iter().any(|item| item.type_ref().is_none());
        let item_type = item_type
            .ok_or_else(|| {
                UriError::InvalidLiteral {
                    text: "null".into(),
                    reason: "a collection of nulls has no item type",
                }
                .rejected("CollectionConstantNode")
            })?
            .with_nullable(has_null);
        Ok(Self {
            items,
            type_ref: TypeRef::collection(item_type),
        })
    }

    pub fn items(&self) -> &[ConstantNode] {
        &self.items
    }
}
