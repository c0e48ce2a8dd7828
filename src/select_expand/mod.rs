//! Select/expand composition.
//!
//! # Architecture
//!
//! - **Items**: [`SelectItem`] and its item structs, [`ExpandOptions`]
//! - **Levels**: [`SelectExpandClauseBuilder`] (mutable, finalized once) and
//!   [`SelectExpandClause`] (immutable)
//! - **Dispatch**: [`SelectItemVisitor`], [`SelectExpandWriter`]

mod clause;
mod select_item;
mod visitor;

pub use clause::{ExpandedNavigationBuilder, SelectExpandClause, SelectExpandClauseBuilder, Selection};
pub use select_item::{
    ExpandLevels, ExpandOptions, ExpandedNavigationSelectItem, ExpandedReferenceSelectItem,
    NamespaceQualifiedWildcardSelectItem, PathSelectItem, SelectItem, WildcardSelectItem,
};
pub use visitor::{SelectExpandWriter, SelectItemVisitor};
