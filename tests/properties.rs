//! Property-based tests for construction invariants
//!
//! - Comparison typing: operands combine iff their types are equivalent
//! - Content ids: exactly the unreserved-character strings are accepted
//! - Selection merge: adding the same items again changes nothing
//! - Wildcard: `*` absorbs every property and navigation path

mod common;

use common::{sales_schema, select_property};
use odata_uri::expr::{BinaryOperatorKind, BinaryOperatorNode, ParameterAliasNode, SingleValueNode};
use odata_uri::path::{BatchReferenceSegment, ODataSelectPath, OperationSegment};
use odata_uri::schema::{InMemorySchema, PrimitiveKind, TypeRef};
use odata_uri::select_expand::{NamespaceQualifiedWildcardSelectItem, SelectExpandClauseBuilder, SelectItem, Selection};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn primitive_kind() -> impl Strategy<Value = PrimitiveKind> {
    prop::sample::select(vec![
        PrimitiveKind::Boolean,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Double,
        PrimitiveKind::Decimal,
        PrimitiveKind::String,
        PrimitiveKind::Guid,
        PrimitiveKind::Date,
        PrimitiveKind::DateTimeOffset,
        PrimitiveKind::Duration,
    ])
}

fn comparison() -> impl Strategy<Value = BinaryOperatorKind> {
    prop::sample::select(vec![
        BinaryOperatorKind::Equal,
        BinaryOperatorKind::NotEqual,
        BinaryOperatorKind::GreaterThan,
        BinaryOperatorKind::GreaterThanOrEqual,
        BinaryOperatorKind::LessThan,
        BinaryOperatorKind::LessThanOrEqual,
    ])
}

fn content_id() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._~-]{1,16}"
}

fn reserved_char() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['$', '/', '?', '#', '&', '=', ' ', '(', '\'', 'é'])
}

/// Indices into [`select_pool`].
fn item_sequence() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..7usize, 0..12)
}

fn operand(name: &str, kind: PrimitiveKind, nullable: bool) -> SingleValueNode {
    ParameterAliasNode::new(name, Some(TypeRef::primitive(kind, nullable)))
        .expect("alias")
        .into()
}

fn select_pool(schema: &InMemorySchema) -> Vec<SelectItem> {
    let rank = OperationSegment::resolve("Sales.Rank", None, schema).expect("Rank");
    vec![
        select_property(schema, "Sales.Customer", "Id"),
        select_property(schema, "Sales.Customer", "Name"),
        select_property(schema, "Sales.Customer", "Address"),
        select_property(schema, "Sales.Customer", "Tags"),
        SelectItem::path(ODataSelectPath::new(vec![rank.into()]).expect("operation path")),
        SelectItem::wildcard(),
        SelectItem::NamespaceQualifiedWildcard(NamespaceQualifiedWildcardSelectItem::new("Sales").expect("Sales")),
    ]
}

fn selection_after(pool: &[SelectItem], passes: usize, sequence: &[usize]) -> Selection {
    let mut builder = SelectExpandClauseBuilder::new();
    for _ in 0..passes {
        for &index in sequence {
            builder.add_select_item(pool[index].clone()).expect("open level");
        }
    }
    builder.selection().clone()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn comparison_accepts_exactly_equivalent_operands(
        operator in comparison(),
        left in primitive_kind(),
        right in primitive_kind(),
        left_nullable in any::<bool>(),
        right_nullable in any::<bool>(),
    ) {
        let schema = InMemorySchema::new();
        let result = BinaryOperatorNode::new(
            operator,
            operand("@l", left, left_nullable),
            operand("@r", right, right_nullable),
            &schema,
        );
        if left == right {
            let node = result.expect("equivalent operands");
            prop_assert_eq!(node.type_ref(), Some(&TypeRef::boolean(left_nullable || right_nullable)));
        } else {
            prop_assert!(result.is_err());
        }
    }

    #[test]
    fn unreserved_content_ids_are_accepted(id in content_id()) {
        let reference = BatchReferenceSegment::new(&id, TypeRef::entity("Sales.Customer", false), None);
        prop_assert!(reference.is_ok(), "{id:?} rejected");
    }

    #[test]
    fn content_ids_with_reserved_chars_are_rejected(
        prefix in "[A-Za-z0-9]{0,6}",
        reserved in reserved_char(),
        suffix in "[A-Za-z0-9]{0,6}",
    ) {
        let id = format!("{prefix}{reserved}{suffix}");
        let reference = BatchReferenceSegment::new(&id, TypeRef::entity("Sales.Customer", false), None);
        prop_assert!(reference.is_err(), "{id:?} accepted");
    }

    #[test]
    fn repeating_select_items_is_idempotent(sequence in item_sequence()) {
        let schema = sales_schema();
        let pool = select_pool(&schema);
        prop_assert_eq!(selection_after(&pool, 1, &sequence), selection_after(&pool, 2, &sequence));
    }

    #[test]
    fn wildcard_absorbs_property_paths(sequence in item_sequence()) {
        let schema = sales_schema();
        let pool = select_pool(&schema);
        let Selection::Partial(items) = selection_after(&pool, 1, &sequence) else {
            prop_assert!(sequence.is_empty());
            return Ok(());
        };
        if sequence.contains(&5) {
            let wildcards = items.iter().filter(|item| matches!(item, SelectItem::Wildcard(_))).count();
            prop_assert_eq!(wildcards, 1);
            // Only the operation path and the namespace wildcard survive next to `*`.
            prop_assert!(items.len() <= 3);
            prop_assert!(!items.iter().any(|item| *item == pool[0] || *item == pool[1]));
            prop_assert!(!items.iter().any(|item| *item == pool[2] || *item == pool[3]));
        } else {
            let mut expected: Vec<usize> = Vec::new();
            for &index in &sequence {
                if !expected.contains(&index) {
                    expected.push(index);
                }
            }
            prop_assert_eq!(items.len(), expected.len());
        }
    }
}
