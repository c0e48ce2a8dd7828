//! Construction Benchmarks
//!
//! Measures the cost of building schema-validated trees the way a binder does
//! for each request. Benchmarks are organized into the following categories:
//!
//! - **Resource Paths**: segment construction and whole-path validation
//! - **Filters**: bottom-up expression building, wide and deep
//! - **Select/Expand**: level building and finalization, wide and nested
//! - **Literals**: classification of isolated literal tokens
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark group
//! cargo bench resource_paths
//! cargo bench filters
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use odata_uri::expr::{
    BinaryOperatorKind, BinaryOperatorNode, ConstantNode, EntityRangeVariable, RangeVariable, SingleValueNode,
    SingleValuePropertyAccessNode,
};
use odata_uri::lexer::lex_literal;
use odata_uri::path::{
    CountSegment, EntitySetSegment, KeySegment, NavigationPropertySegment, ODataExpandPath, ODataPath,
    ODataSelectPath, PathSegment, PropertySegment,
};
use odata_uri::schema::{
    EntitySet, EntityType, InMemorySchema, Multiplicity, NavigationProperty, PrimitiveKind, SchemaOracle, TypeRef,
};
use odata_uri::select_expand::{ExpandedNavigationBuilder, SelectExpandClauseBuilder, SelectItem};
use odata_uri::{ConstantValue, Result, UriError};

fn schema() -> InMemorySchema {
    let mut schema = InMemorySchema::new();
    let mut customer = EntityType::new("Sales", "Customer")
        .with_key("Id")
        .with_property("Id", TypeRef::primitive(PrimitiveKind::Int32, false))
        .with_navigation(NavigationProperty::new("Orders", "Sales.Order", Multiplicity::Many));
    for i in 0..32 {
        customer = customer.with_property(format!("P{i}"), TypeRef::primitive(PrimitiveKind::Int32, true));
    }
    schema.add_entity_type(customer);
    schema.add_entity_type(
        EntityType::new("Sales", "Order")
            .with_key("Id")
            .with_property("Id", TypeRef::primitive(PrimitiveKind::Int32, false))
            .with_navigation(NavigationProperty::new("Customer", "Sales.Customer", Multiplicity::One)),
    );
    schema.add_entity_set(EntitySet::new("Customers", "Sales.Customer").with_binding("Orders", "Orders"));
    schema.add_entity_set(EntitySet::new("Orders", "Sales.Order").with_binding("Customer", "Customers"));
    schema
}

// ============================================================================
// Resource Path Benchmarks
// ============================================================================

/// `Customers(1)/Orders(2)/Customer/Orders/.../$count`, `hops` navigations deep.
fn build_path(schema: &InMemorySchema, hops: usize) -> Result<ODataPath> {
    let mut segments: Vec<PathSegment> = vec![EntitySetSegment::resolve("Customers", schema)?.into()];
    let key = KeySegment::after(&segments[0], vec![("Id".into(), ConstantValue::Int32(1))], schema)?;
    segments.push(key.into());
    for hop in 0..hops {
        let name = if hop % 2 == 0 { "Orders" } else { "Customer" };
        let previous = &segments[segments.len() - 1];
        let navigation = NavigationPropertySegment::after(previous, name, schema)?;
        segments.push(navigation.into());
    }
    if segments[segments.len() - 1].target_type().is_some_and(|ty| ty.is_collection()) {
        segments.push(CountSegment.into());
    }
    ODataPath::new(segments)
}

fn bench_resource_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_paths");
    let schema = schema();

    for hops in [0, 4, 16] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("navigation_hops", hops), &hops, |b, &hops| {
            b.iter(|| build_path(black_box(&schema), hops));
        });
    }

    group.finish();
}

// ============================================================================
// Filter Benchmarks
// ============================================================================

/// `P0 gt 0 and P1 gt 1 and ...` over `width` properties.
fn build_filter(schema: &InMemorySchema, width: usize) -> Result<SingleValueNode> {
    let set = EntitySetSegment::resolve("Customers", schema)?.entity_set().clone();
    let it = RangeVariable::from(EntityRangeVariable::implicit(set, schema)?);
    let mut predicate: Option<SingleValueNode> = None;
    for i in 0..width {
        let source = SingleValueNode::reference(&it);
        let property = SingleValuePropertyAccessNode::resolve(source, &format!("P{i}"), schema)?;
        let constant = ConstantNode::new(ConstantValue::Int32(i as i32));
        let term: SingleValueNode =
            BinaryOperatorNode::new(BinaryOperatorKind::GreaterThan, property.into(), constant.into(), schema)?.into();
        predicate = Some(match predicate {
            Some(left) => BinaryOperatorNode::new(BinaryOperatorKind::And, left, term, schema)?.into(),
            None => term,
        });
    }
    Ok(predicate.unwrap_or_else(|| ConstantNode::new(ConstantValue::Boolean(true)).into()))
}

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");
    let schema = schema();

    for width in [1, 8, 32] {
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::new("conjunction", width), &width, |b, &width| {
            b.iter(|| build_filter(black_box(&schema), width));
        });
    }

    let filter = build_filter(&schema, 32).expect("filter builds");
    group.bench_function("render_conjunction_32", |b| {
        b.iter(|| black_box(&filter).to_string());
    });

    group.finish();
}

// ============================================================================
// Select/Expand Benchmarks
// ============================================================================

fn build_wide_select(schema: &InMemorySchema, width: usize) -> Result<usize> {
    let mut builder = SelectExpandClauseBuilder::new();
    for i in 0..width {
        let segment = PropertySegment::resolve("Sales.Customer", &format!("P{i}"), schema)?;
        builder.add_select_item(SelectItem::path(ODataSelectPath::new(vec![segment.into()])?))?;
    }
    builder.add_select_item(SelectItem::wildcard())?;
    Ok(builder.build()?.selected_items().len())
}

/// `$expand=Orders($expand=Customer($expand=Orders(...)))`, `depth` levels deep.
fn build_nested_expand(schema: &InMemorySchema, depth: usize) -> Result<usize> {
    let mut root = SelectExpandClauseBuilder::new();
    let mut level = &mut root;
    let mut source = "Customers";
    for hop in 0..depth {
        let (owner, name, target) = if hop % 2 == 0 {
            ("Sales.Customer", "Orders", "Orders")
        } else {
            ("Sales.Order", "Customer", "Customers")
        };
        let navigation = schema
            .find_navigation(owner, name)
            .ok_or_else(|| UriError::UnknownSchemaElement {
                element: "navigation property",
                name: name.into(),
            })?;
        let source_set = schema.resolve_entity_set(source);
        let segment = NavigationPropertySegment::new(navigation, source_set.as_deref(), schema)?;
        let builder = ExpandedNavigationBuilder::new(ODataExpandPath::from_navigation(segment));
        level = level.add_expansion(builder)?.clause_mut();
        source = target;
    }
    Ok(root.build()?.expand_depth())
}

fn bench_select_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_expand");
    let schema = schema();

    for width in [4, 32] {
        group.bench_with_input(BenchmarkId::new("wide_select", width), &width, |b, &width| {
            b.iter(|| build_wide_select(black_box(&schema), width));
        });
    }
    for depth in [1, 4, 12] {
        group.bench_with_input(BenchmarkId::new("nested_expand", depth), &depth, |b, &depth| {
            b.iter(|| build_nested_expand(black_box(&schema), depth));
        });
    }

    group.finish();
}

// ============================================================================
// Literal Benchmarks
// ============================================================================

fn bench_literals(c: &mut Criterion) {
    let mut group = c.benchmark_group("literals");

    let literals = vec![
        ("integer", "42"),
        ("decimal", "19.99m"),
        ("string", "'O''Neil'"),
        ("guid", "01234567-89ab-cdef-0123-456789abcdef"),
        ("date_time_offset", "2024-01-31T10:15:00Z"),
        ("duration", "duration'P1DT2H'"),
    ];

    for (name, text) in literals {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, t| {
            b.iter(|| lex_literal(black_box(t)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_resource_paths,
    bench_filters,
    bench_select_expand,
    bench_literals
);
criterion_main!(benches);
