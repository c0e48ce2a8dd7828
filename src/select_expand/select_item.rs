//! Items of a finalized select/expand level.

use super::clause::SelectExpandClause;
use crate::error::{Result, require_identifier};
use crate::expr::{FilterClause, OrderByClause};
use crate::path::{ODataExpandPath, ODataSelectPath, PathSegment};
use crate::schema::EntitySet;
use smol_str::SmolStr;
use std::sync::Arc;

/// One selected or expanded item.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `*`: every structural property.
    Wildcard(WildcardSelectItem),
    Path(PathSelectItem),
    /// `Namespace.*`: every operation in a namespace.
    NamespaceQualifiedWildcard(NamespaceQualifiedWildcardSelectItem),
    ExpandedNavigation(ExpandedNavigationSelectItem),
    /// `Nav/$ref`.
    ExpandedReference(ExpandedReferenceSelectItem),
}

impl SelectItem {
    pub fn wildcard() -> Self {
        SelectItem::Wildcard(WildcardSelectItem)
    }

    pub fn path(path: ODataSelectPath) -> Self {
        SelectItem::Path(PathSelectItem::new(path))
    }

    /// True for items that live in the expansion list of a level.
    pub fn is_expansion(&self) -> bool {
        matches!(
            self,
            SelectItem::ExpandedNavigation(_) | SelectItem::ExpandedReference(_)
        )
    }

    /// True for paths ending in a property or a navigation, which a wildcard
    /// already covers.
    pub(crate) fn is_structural_or_navigation(&self) -> bool {
        match self {
            SelectItem::Path(item) => matches!(
                item.path.last_segment(),
                PathSegment::Property(_) | PathSegment::OpenProperty(_) | PathSegment::Navigation(_)
            ),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WildcardSelectItem;

/// An explicitly selected property, navigation or operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSelectItem {
    path: ODataSelectPath,
}

impl PathSelectItem {
    pub fn new(path: ODataSelectPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &ODataSelectPath {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceQualifiedWildcardSelectItem {
    namespace: SmolStr,
}

impl NamespaceQualifiedWildcardSelectItem {
    pub fn new(namespace: &str) -> Result<Self> {
        require_identifier(namespace, "namespace")?;
        Ok(Self {
            namespace: SmolStr::new(namespace),
        })
    }

    pub fn namespace(&self) -> &SmolStr {
        &self.namespace
    }
}

/// `$levels` of an expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandLevels {
    Max,
    Depth(u32),
}

/// Query options nested inside one `$expand` item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpandOptions {
    pub filter: Option<FilterClause>,
    pub order_by: Option<OrderByClause>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub count: Option<bool>,
    pub levels: Option<ExpandLevels>,
}

impl ExpandOptions {
    pub fn is_empty(&self) -> bool {
        *self == ExpandOptions::default()
    }

    /// Fills options that are unset here from `other`.
    pub(crate) fn merge_missing(&mut self, other: ExpandOptions) {
        if self.filter.is_none() {
            self.filter = other.filter;
        }
        if self.order_by.is_none() {
            self.order_by = other.order_by;
        }
        self.top = self.top.or(other.top);
        self.skip = self.skip.or(other.skip);
        self.count = self.count.or(other.count);
        self.levels = self.levels.or(other.levels);
    }
}

/// An expanded navigation with its own select/expand level.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedNavigationSelectItem {
    path: ODataExpandPath,
    entity_set: Option<Arc<EntitySet>>,
    clause: SelectExpandClause,
    options: ExpandOptions,
}

impl ExpandedNavigationSelectItem {
    pub fn new(
        path: ODataExpandPath,
        entity_set: Option<Arc<EntitySet>>,
        clause: SelectExpandClause,
        options: ExpandOptions,
    ) -> Self {
        Self {
            path,
            entity_set,
            clause,
            options,
        }
    }

    pub fn path(&self) -> &ODataExpandPath {
        &self.path
    }

    pub fn entity_set(&self) -> Option<&Arc<EntitySet>> {
        self.entity_set.as_ref()
    }

    pub fn clause(&self) -> &SelectExpandClause {
        &self.clause
    }

    pub fn options(&self) -> &ExpandOptions {
        &self.options
    }
}

/// An expanded navigation link (`$expand=Orders/$ref`).
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedReferenceSelectItem {
    path: ODataExpandPath,
    entity_set: Option<Arc<EntitySet>>,
    options: ExpandOptions,
}

impl ExpandedReferenceSelectItem {
    pub fn new(path: ODataExpandPath, entity_set: Option<Arc<EntitySet>>, options: ExpandOptions) -> Self {
        Self {
            path,
            entity_set,
            options,
        }
    }

    pub fn path(&self) -> &ODataExpandPath {
        &self.path
    }

    pub fn entity_set(&self) -> Option<&Arc<EntitySet>> {
        self.entity_set.as_ref()
    }

    pub fn options(&self) -> &ExpandOptions {
        &self.options
    }
}
