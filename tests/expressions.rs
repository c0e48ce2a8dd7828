//! Expression nodes bound against the fixture schema.

mod common;

use common::{assert_kind, implicit, literal, sales_schema};
use odata_uri::error::{ErrorKind, UriError};
use odata_uri::expr::{
    BinaryOperatorKind, BinaryOperatorNode, CollectionConstantNode, CollectionNode, CollectionPropertyAccessNode,
    ConstantNode, ConstantValue, ConvertNode, CountNode, EntityRangeVariable, FilterClause, InNode, LambdaNode,
    NonEntityRangeVariable, OrderByClause, OrderByDirection, ParameterAliasNode, QueryNode, RangeVariable,
    SingleEntityCastNode, SingleNavigationNode, SingleValueFunctionCallNode, SingleValueNode,
    SingleValueOpenPropertyAccessNode, SingleValuePropertyAccessNode, UnaryOperatorKind, UnaryOperatorNode,
};
use odata_uri::schema::{InMemorySchema, PrimitiveKind, SchemaOracle, TypeRef};

fn property(source: &SingleValueNode, name: &str, schema: &InMemorySchema) -> SingleValueNode {
    SingleValuePropertyAccessNode::resolve(source.clone(), name, schema)
        .expect("fixture property")
        .into()
}

fn binary(
    operator: BinaryOperatorKind,
    left: SingleValueNode,
    right: SingleValueNode,
    schema: &InMemorySchema,
) -> SingleValueNode {
    BinaryOperatorNode::new(operator, left, right, schema)
        .expect("well-typed operands")
        .into()
}

fn tags(it: &SingleValueNode, schema: &InMemorySchema) -> CollectionNode {
    CollectionPropertyAccessNode::resolve(it.clone(), "Tags", schema)
        .expect("Tags")
        .into()
}

#[test]
fn filter_on_derived_member_through_entity_cast() {
    let schema = sales_schema();
    let (variable, it) = implicit(&schema, "Orders");

    let vip = SingleEntityCastNode::new(it.clone(), "Sales.VipOrder", &schema).expect("derived cast");
    assert_eq!(vip.type_ref(), &TypeRef::entity("Sales.VipOrder", false));
    assert_eq!(vip.entity_set().map(|s| s.name.as_str()), Some("Orders"));

    let vip = SingleValueNode::from(vip);
    let discount = property(&vip, "Discount", &schema);
    let predicate = binary(BinaryOperatorKind::GreaterThan, discount, literal("5m"), &schema);
    let filter = FilterClause::new(predicate, variable).expect("boolean filter");
    assert_eq!(filter.expression().to_string(), "Sales.VipOrder/Discount gt 5m");
    assert_eq!(filter.range_variable().name(), EntityRangeVariable::IMPLICIT);

    let err = assert_kind(
        SingleEntityCastNode::new(it.clone(), "Sales.Customer", &schema),
        ErrorKind::SchemaMismatch,
    );
    assert!(matches!(err, UriError::UnrelatedTypes { .. }));
    let err = assert_kind(SingleEntityCastNode::new(it, "Sales.Nope", &schema), ErrorKind::SchemaMismatch);
    assert!(matches!(err, UriError::UnknownSchemaElement { .. }));
}

#[test]
fn operand_types_must_be_equivalent() {
    let schema = sales_schema();
    let (_, it) = implicit(&schema, "Orders");

    let quantity = property(&it, "Quantity", &schema);
    let err = assert_kind(
        BinaryOperatorNode::new(BinaryOperatorKind::Equal, quantity.clone(), literal("'x'"), &schema),
        ErrorKind::SchemaMismatch,
    );
    let message = err.to_string();
    assert!(message.contains("Edm.Int32") && message.contains("Edm.String"), "{message}");

    let total = property(&it, "Total", &schema);
    assert_kind(
        BinaryOperatorNode::new(BinaryOperatorKind::Add, total, quantity.clone(), &schema),
        ErrorKind::SchemaMismatch,
    );

    let doubled = BinaryOperatorNode::new(BinaryOperatorKind::Multiply, quantity, literal("2"), &schema)
        .expect("Int32 mul Int32");
    assert_eq!(doubled.type_ref(), Some(&TypeRef::primitive(PrimitiveKind::Int32, false)));
}

#[test]
fn nullable_operand_makes_comparison_nullable() {
    let schema = sales_schema();
    let (_, it) = implicit(&schema, "Products");
    let price = property(&it, "Price", &schema);
    let cheap = BinaryOperatorNode::new(
        BinaryOperatorKind::LessThan,
        price,
        ConstantNode::new(ConstantValue::Double(9.5)).into(),
        &schema,
    )
    .expect("Double lt Double");
    assert_eq!(cheap.type_ref(), Some(&TypeRef::boolean(true)));
}

#[test]
fn unknown_types_defer_checks() {
    let schema = sales_schema();
    let (variable, it) = implicit(&schema, "Products");

    let color: SingleValueNode = SingleValueOpenPropertyAccessNode::new(it.clone(), "Color")
        .expect("open property")
        .into();
    assert_eq!(color.type_ref(), None);
    let predicate = binary(BinaryOperatorKind::Equal, color, literal("'red'"), &schema);
    assert_eq!(predicate.type_ref(), None);
    let filter = FilterClause::new(predicate, variable).expect("unknown type is accepted");
    assert_eq!(filter.expression().to_string(), "Color eq 'red'");

    let sku = property(&it, "Sku", &schema);
    let is_null = binary(BinaryOperatorKind::Equal, sku, literal("null"), &schema);
    assert_eq!(is_null.to_string(), "Sku eq null");
}

#[test]
fn logical_and_unary_operators() {
    let schema = sales_schema();
    let (variable, it) = implicit(&schema, "Customers");
    let id = property(&it, "Id", &schema);
    let name = property(&it, "Name", &schema);

    let high = binary(BinaryOperatorKind::GreaterThan, id.clone(), literal("1"), &schema);
    let named = binary(BinaryOperatorKind::Equal, name.clone(), literal("'Ann'"), &schema);
    let both = binary(BinaryOperatorKind::And, high.clone(), named, &schema);
    assert_eq!(both.type_ref(), Some(&TypeRef::boolean(true)));
    assert_eq!(both.to_string(), "Id gt 1 and Name eq 'Ann'");

    let err = assert_kind(
        BinaryOperatorNode::new(BinaryOperatorKind::Or, id.clone(), id.clone(), &schema),
        ErrorKind::SchemaMismatch,
    );
    assert!(matches!(err, UriError::UnsupportedOperandType { .. }));

    let negated: SingleValueNode = UnaryOperatorNode::new(UnaryOperatorKind::Not, high).expect("not").into();
    assert_eq!(negated.to_string(), "not (Id gt 1)");
    FilterClause::new(negated, variable).expect("not yields Boolean");

    let minus: SingleValueNode = UnaryOperatorNode::new(UnaryOperatorKind::Negate, id)
        .expect("negate")
        .into();
    assert_eq!(minus.to_string(), "-Id");
    assert_eq!(minus.type_ref(), Some(&TypeRef::primitive(PrimitiveKind::Int32, false)));

    assert_kind(UnaryOperatorNode::new(UnaryOperatorKind::Not, name), ErrorKind::SchemaMismatch);
}

#[test]
fn conversions_and_function_calls() {
    let schema = sales_schema();
    let (variable, it) = implicit(&schema, "Customers");

    let id = property(&it, "Id", &schema);
    let widened: SingleValueNode = ConvertNode::new(id.clone(), TypeRef::primitive(PrimitiveKind::Int64, false))
        .expect("convert")
        .into();
    assert_eq!(widened.to_string(), "cast(Id,Edm.Int64)");
    assert_kind(
        ConvertNode::new(id, TypeRef::collection(TypeRef::primitive(PrimitiveKind::Int32, false))),
        ErrorKind::SchemaMismatch,
    );

    let name = property(&it, "Name", &schema);
    let contains: SingleValueNode = SingleValueFunctionCallNode::new(
        "contains",
        vec![QueryNode::from(name.clone()), QueryNode::from(literal("'an'"))],
        Some(TypeRef::boolean(false)),
    )
    .expect("contains")
    .into();
    assert_eq!(contains.to_string(), "contains(Name,'an')");
    FilterClause::new(contains, variable).expect("Boolean function");

    assert_kind(
        SingleValueFunctionCallNode::new(
            "split",
            vec![QueryNode::from(name)],
            Some(TypeRef::collection(TypeRef::primitive(PrimitiveKind::String, false))),
        ),
        ErrorKind::SchemaMismatch,
    );
    assert_kind(SingleValueFunctionCallNode::new("", Vec::new(), None), ErrorKind::NullArgument);
}

#[test]
fn lambda_over_primitive_collection() {
    let schema = sales_schema();
    let (variable, it) = implicit(&schema, "Customers");
    let tags = tags(&it, &schema);

    let t = RangeVariable::from(NonEntityRangeVariable::from_collection("t", &tags).expect("t"));
    let body = binary(BinaryOperatorKind::Equal, SingleValueNode::reference(&t), literal("'vip'"), &schema);
    let all = SingleValueNode::All(LambdaNode::new(tags.clone(), t, body.clone(), &schema).expect("all"));
    assert_eq!(all.to_string(), "Tags/all(t:t eq 'vip')");
    FilterClause::new(all, variable).expect("lambda is Boolean");

    let wrong = RangeVariable::from(
        NonEntityRangeVariable::new("t", Some(TypeRef::primitive(PrimitiveKind::Int32, false))).expect("t"),
    );
    assert_kind(LambdaNode::new(tags.clone(), wrong, body, &schema), ErrorKind::SchemaMismatch);

    let err = assert_kind(
        EntityRangeVariable::from_collection("o", TypeRef::entity("Sales.Order", false), &tags, &schema),
        ErrorKind::SchemaMismatch,
    );
    assert!(matches!(err, UriError::NotAnEntity { .. }));
}

#[test]
fn entity_range_variables_check_their_set() {
    let schema = sales_schema();
    let customers = schema.resolve_entity_set("Customers").expect("Customers");
    let err = assert_kind(
        EntityRangeVariable::with_entity_set("c", TypeRef::entity("Sales.Order", false), customers.clone(), &schema),
        ErrorKind::SchemaMismatch,
    );
    assert!(matches!(err, UriError::UnrelatedTypes { .. }));
    assert_kind(
        EntityRangeVariable::with_entity_set("", TypeRef::entity("Sales.Customer", false), customers, &schema),
        ErrorKind::NullArgument,
    );
}

#[test]
fn navigation_chain_keeps_entity_sets() {
    let schema = sales_schema();
    let (_, it) = implicit(&schema, "Orders");

    let customer: SingleValueNode = SingleNavigationNode::resolve(it.clone(), "Customer", &schema)
        .expect("Customer")
        .into();
    assert_eq!(customer.entity_set().map(|s| s.name.as_str()), Some("Customers"));
    let name = property(&customer, "Name", &schema);
    let predicate = binary(BinaryOperatorKind::Equal, name, literal("'Ann'"), &schema);
    assert_eq!(predicate.to_string(), "Customer/Name eq 'Ann'");

    let product = SingleNavigationNode::resolve(it.clone(), "Product", &schema).expect("Product");
    assert_eq!(product.entity_set().map(|s| s.name.as_str()), Some("Products"));
    assert_eq!(
        SingleValueNode::from(product).type_ref(),
        Some(&TypeRef::entity("Sales.Product", true))
    );

    let quantity = property(&it, "Quantity", &schema);
    let err = assert_kind(SingleNavigationNode::resolve(quantity, "Customer", &schema), ErrorKind::SchemaMismatch);
    assert!(matches!(err, UriError::NotAnEntity { .. }));
    assert_kind(SingleNavigationNode::resolve(it, "Missing", &schema), ErrorKind::SchemaMismatch);
}

fn list(texts: &[&str]) -> Vec<ConstantNode> {
    texts
        .iter()
        .map(|text| ConstantNode::from_literal(text).expect("literal"))
        .collect()
}

#[test]
fn in_operator_and_literal_lists() {
    let schema = sales_schema();
    let (_, it) = implicit(&schema, "Customers");
    let id = property(&it, "Id", &schema);

    let strings = CollectionConstantNode::new(list(&["'a'", "'b'"]), &schema).expect("string list");
    let err = assert_kind(InNode::new(id.clone(), strings.into(), &schema), ErrorKind::SchemaMismatch);
    assert!(matches!(err, UriError::IncompatibleOperandTypes { .. }));

    let with_null = CollectionConstantNode::new(list(&["1", "null"]), &schema).expect("nullable list");
    let with_null = CollectionNode::from(with_null);
    assert_eq!(with_null.item_type(), &TypeRef::primitive(PrimitiveKind::Int32, true));
    let node: SingleValueNode = InNode::new(id, with_null, &schema).expect("in").into();
    assert_eq!(node.to_string(), "Id in (1,null)");

    assert_kind(CollectionConstantNode::new(list(&["null"]), &schema), ErrorKind::MalformedToken);
    assert_kind(CollectionConstantNode::new(list(&["1", "'a'"]), &schema), ErrorKind::SchemaMismatch);
    assert_kind(CollectionConstantNode::new(Vec::new(), &schema), ErrorKind::NullArgument);
}

#[test]
fn orderby_accepts_values_only() {
    let schema = sales_schema();
    let (variable, it) = implicit(&schema, "Orders");

    let customer: SingleValueNode = SingleNavigationNode::resolve(it.clone(), "Customer", &schema)
        .expect("Customer")
        .into();
    let err = assert_kind(
        OrderByClause::new(customer.clone(), OrderByDirection::Ascending, variable.clone()),
        ErrorKind::SchemaMismatch,
    );
    assert!(matches!(err, UriError::UnexpectedEntity { .. }));

    let (customers_variable, customer_it) = implicit(&schema, "Customers");
    let tag_count: SingleValueNode = CountNode::new(tags(&customer_it, &schema)).into();
    let by_tags = OrderByClause::new(tag_count, OrderByDirection::Descending, customers_variable)
        .expect("count is orderable");
    assert_eq!(by_tags.direction(), OrderByDirection::Descending);
    assert!(by_tags.next().is_none());

    let placed = property(&it, "Placed", &schema);
    let quantity = property(&it, "Quantity", &schema);
    let name = property(&customer, "Name", &schema);
    let clause = OrderByClause::new(placed, OrderByDirection::default(), variable.clone())
        .expect("Placed")
        .then_by(OrderByClause::new(quantity, OrderByDirection::Descending, variable.clone()).expect("Quantity"))
        .then_by(OrderByClause::new(name, OrderByDirection::Ascending, variable).expect("Customer/Name"));
    let rendered: Vec<String> = clause
        .iter()
        .map(|item| format!("{} {}", item.expression(), item.direction()))
        .collect();
    assert_eq!(rendered, ["Placed asc", "Quantity desc", "Customer/Name asc"]);
}

#[test]
fn parameter_aliases_carry_optional_types() {
    let schema = sales_schema();
    let (_, it) = implicit(&schema, "Customers");
    let id = property(&it, "Id", &schema);

    let typed = ParameterAliasNode::new("@p", Some(TypeRef::primitive(PrimitiveKind::Int32, false))).expect("@p");
    let predicate = binary(BinaryOperatorKind::Equal, id.clone(), typed.into(), &schema);
    assert_eq!(predicate.to_string(), "Id eq @p");
    assert_eq!(predicate.type_ref(), Some(&TypeRef::boolean(false)));

    let mistyped = ParameterAliasNode::new("@q", Some(TypeRef::primitive(PrimitiveKind::String, false))).expect("@q");
    assert_kind(
        BinaryOperatorNode::new(BinaryOperatorKind::Equal, id, mistyped.into(), &schema),
        ErrorKind::SchemaMismatch,
    );
    assert_kind(ParameterAliasNode::new("@", None), ErrorKind::MalformedToken);
}
