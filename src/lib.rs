//! Semantic model of OData request URLs.
//!
//! This library turns already-tokenized resource paths and query options into
//! typed, schema-validated trees: path segments, `$filter`/`$orderby`
//! expressions, and select/expand levels. Every constructor validates against
//! a [`SchemaOracle`] and fails fast with a [`UriError`] that renders as a
//! miette diagnostic.
//!
//! # Example
//!
//! ```
//! use odata_uri::schema::{EntitySet, EntityType, InMemorySchema, PrimitiveKind, TypeRef};
//! use odata_uri::{CountSegment, EntitySetSegment, ODataPath, PathSegment};
//!
//! let mut schema = InMemorySchema::new();
//! schema.add_entity_type(
//!     EntityType::new("Sales", "Customer")
//!         .with_key("Id")
//!         .with_property("Id", TypeRef::primitive(PrimitiveKind::Int32, false)),
//! );
//! schema.add_entity_set(EntitySet::new("Customers", "Sales.Customer"));
//!
//! let customers = EntitySetSegment::resolve("Customers", &schema).unwrap();
//! let path = ODataPath::new(vec![
//!     PathSegment::from(customers),
//!     PathSegment::from(CountSegment),
//! ])
//! .unwrap();
//!
//! assert_eq!(path.to_string(), "Customers/$count");
//! ```

pub mod diag;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod path;
pub mod schema;
pub mod select_expand;
pub mod settings;

pub use diag::{Diag, DiagLabel, LabelRole, RequestUrl, Span};
pub use error::{ErrorKind, Result, UriError};
pub use expr::{
    BinaryOperatorKind, BinaryOperatorNode, CollectionNode, ConstantNode, ConstantValue, FilterClause,
    OrderByClause, OrderByDirection, QueryNode, QueryNodeVisitor, RangeVariable, SingleValueNode,
    UnaryOperatorKind,
};
pub use path::{
    CountSegment, EntitySetSegment, KeySegment, NavigationPropertySegment, ODataExpandPath, ODataPath,
    ODataSelectPath, PathSegment, PathSegmentVisitor, PropertySegment, TargetKind,
};
pub use schema::{SchemaOracle, TypeRef};
pub use select_expand::{
    ExpandedNavigationBuilder, SelectExpandClause, SelectExpandClauseBuilder, SelectItem, SelectItemVisitor,
};
pub use settings::UriParserSettings;
