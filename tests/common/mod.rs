//! Common test utilities
//!
//! Shared fixture schema and builders used across the integration tests.
//!
//! # Fixture
//! - [`sales_schema`] - `Sales` namespace with customers, orders (plus a
//!   derived `VipOrder`), open/streamed products, an `Address` complex type
//!   and a few operations
//!
//! # Builders
//! - [`implicit`] - `$it` range variable and its reference over an entity set
//! - [`literal`] - constant node from literal text
//! - [`select_property`] - single-property select item
//! - [`expand`] - expansion builder for a navigation on an entity set
//!
//! # Assertions
//! - [`assert_kind`] - assert an error's taxonomy kind
//! - [`format_reports`] - render miette reports for assertion messages

#![allow(dead_code)]

use odata_uri::error::{ErrorKind, UriError};
use odata_uri::expr::{ConstantNode, EntityRangeVariable, RangeVariable, SingleValueNode};
use odata_uri::path::{NavigationPropertySegment, ODataExpandPath, ODataSelectPath, PathSegment, PropertySegment};
use odata_uri::schema::{
    ComplexType, EntitySet, EntityType, InMemorySchema, Multiplicity, NavigationProperty, Operation,
    PrimitiveKind, SchemaOracle, TypeRef,
};
use odata_uri::select_expand::{ExpandedNavigationBuilder, SelectItem};

// ============================================================================
// Fixture Schema
// ============================================================================

fn primitive(kind: PrimitiveKind) -> TypeRef {
    TypeRef::primitive(kind, false)
}

/// Builds the `Sales` fixture schema.
pub fn sales_schema() -> InMemorySchema {
    let mut schema = InMemorySchema::new();

    schema.add_complex_type(
        ComplexType::new("Sales", "Address")
            .with_property("Street", primitive(PrimitiveKind::String))
            .with_property("City", TypeRef::primitive(PrimitiveKind::String, true)),
    );

    schema.add_entity_type(
        EntityType::new("Sales", "Customer")
            .with_key("Id")
            .with_property("Id", primitive(PrimitiveKind::Int32))
            .with_property("Name", TypeRef::primitive(PrimitiveKind::String, true))
            .with_property("Address", TypeRef::complex("Sales.Address", true))
            .with_property("Tags", TypeRef::collection(primitive(PrimitiveKind::String)))
            .with_navigation(
                NavigationProperty::new("Orders", "Sales.Order", Multiplicity::Many).with_partner("Customer"),
            ),
    );

    schema.add_entity_type(
        EntityType::new("Sales", "Order")
            .with_key("Id")
            .with_property("Id", primitive(PrimitiveKind::Int32))
            .with_property("Total", primitive(PrimitiveKind::Decimal))
            .with_property("Quantity", primitive(PrimitiveKind::Int32))
            .with_property("Placed", primitive(PrimitiveKind::DateTimeOffset))
            .with_navigation(
                NavigationProperty::new("Customer", "Sales.Customer", Multiplicity::One).with_partner("Orders"),
            )
            .with_navigation(NavigationProperty::new("Product", "Sales.Product", Multiplicity::ZeroOrOne)),
    );

    schema.add_entity_type(
        EntityType::new("Sales", "VipOrder")
            .with_base("Sales.Order")
            .with_property("Discount", primitive(PrimitiveKind::Decimal)),
    );

    schema.add_entity_type(
        EntityType::new("Sales", "Product")
            .with_key("Sku")
            .with_property("Sku", primitive(PrimitiveKind::String))
            .with_property("Price", TypeRef::primitive(PrimitiveKind::Double, true))
            .open()
            .with_stream(),
    );

    schema.add_entity_set(EntitySet::new("Customers", "Sales.Customer").with_binding("Orders", "Orders"));
    schema.add_entity_set(
        EntitySet::new("Orders", "Sales.Order")
            .with_binding("Customer", "Customers")
            .with_binding("Product", "Products"),
    );
    schema.add_entity_set(EntitySet::new("Products", "Sales.Product"));

    schema.add_operation(
        Operation::function("Sales", "TopCustomers")
            .with_parameter("Count", primitive(PrimitiveKind::Int32))
            .returns(TypeRef::collection(TypeRef::entity("Sales.Customer", false))),
    );
    schema.add_operation(
        Operation::function("Sales", "Rank")
            .bound()
            .with_parameter("bindingParameter", TypeRef::entity("Sales.Customer", false))
            .returns(primitive(PrimitiveKind::Int32)),
    );
    schema.add_operation(Operation::action("Sales", "Reset"));

    schema
}

// ============================================================================
// Builders
// ============================================================================

/// `$it` over `set`, plus a reference node to it.
pub fn implicit(schema: &InMemorySchema, set: &str) -> (RangeVariable, SingleValueNode) {
    let set = schema.resolve_entity_set(set).expect("fixture entity set");
    let variable = RangeVariable::from(EntityRangeVariable::implicit(set, schema).expect("$it"));
    let reference = SingleValueNode::reference(&variable);
    (variable, reference)
}

/// Constant node from literal text.
pub fn literal(text: &str) -> SingleValueNode {
    ConstantNode::from_literal(text).expect("valid literal").into()
}

/// `$select=<name>` on `owner`.
pub fn select_property(schema: &InMemorySchema, owner: &str, name: &str) -> SelectItem {
    let segment = PropertySegment::resolve(owner, name, schema).expect("fixture property");
    SelectItem::path(ODataSelectPath::new(vec![segment.into()]).expect("property select path"))
}

/// Expansion of `navigation` on the element type of `set`.
pub fn expand(schema: &InMemorySchema, set: &str, navigation: &str) -> ExpandedNavigationBuilder {
    let set = schema.resolve_entity_set(set).expect("fixture entity set");
    let nav = schema
        .find_navigation(&set.element_type, navigation)
        .expect("fixture navigation");
    let segment = NavigationPropertySegment::new(nav, Some(set.as_ref()), schema).expect("navigation segment");
    let path = ODataExpandPath::new(vec![PathSegment::from(segment)]).expect("expand path");
    ExpandedNavigationBuilder::new(path)
}

// ============================================================================
// Assertions
// ============================================================================

/// Renders miette reports for assertion messages.
pub fn format_reports(reports: &[miette::Report]) -> String {
    reports
        .iter()
        .map(|report| format!("{report:?}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assert that `result` failed with an error of `kind`.
pub fn assert_kind<T: std::fmt::Debug>(result: Result<T, UriError>, kind: ErrorKind) -> UriError {
    match result {
        Ok(value) => panic!("expected {kind} error, got {value:?}"),
        Err(err) => {
            assert_eq!(err.kind(), kind, "unexpected error: {err}");
            err
        }
    }
}
