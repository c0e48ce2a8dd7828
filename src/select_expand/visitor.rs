//! Per-kind dispatch over select items, and the query-option text writer.

use super::clause::SelectExpandClause;
use super::select_item::{
    ExpandLevels, ExpandOptions, ExpandedNavigationSelectItem, ExpandedReferenceSelectItem,
    NamespaceQualifiedWildcardSelectItem, PathSelectItem, SelectItem, WildcardSelectItem,
};

/// Handler for every kind of select item.
pub trait SelectItemVisitor {
    type Output;

    fn visit_wildcard(&mut self, item: &WildcardSelectItem) -> Self::Output;
    fn visit_path(&mut self, item: &PathSelectItem) -> Self::Output;
    fn visit_namespace_wildcard(&mut self, item: &NamespaceQualifiedWildcardSelectItem) -> Self::Output;
    fn visit_expanded_navigation(&mut self, item: &ExpandedNavigationSelectItem) -> Self::Output;
    fn visit_expanded_reference(&mut self, item: &ExpandedReferenceSelectItem) -> Self::Output;
}

impl SelectItem {
    pub fn accept<V: SelectItemVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            SelectItem::Wildcard(item) => visitor.visit_wildcard(item),
            SelectItem::Path(item) => visitor.visit_path(item),
            SelectItem::NamespaceQualifiedWildcard(item) => visitor.visit_namespace_wildcard(item),
            SelectItem::ExpandedNavigation(item) => visitor.visit_expanded_navigation(item),
            SelectItem::ExpandedReference(item) => visitor.visit_expanded_reference(item),
        }
    }
}

/// Renders a level back into `$select`/`$expand` option values.
///
/// Nested levels and options are written inside parentheses, separated by
/// `;`, as in `Orders($select=Total;$top=5)`.
#[derive(Debug, Default)]
pub struct SelectExpandWriter {
    select: Vec<String>,
    expand: Vec<String>,
}

impl SelectExpandWriter {
    /// `$select` and `$expand` values for `clause`; `None` when empty.
    pub fn render(clause: &SelectExpandClause) -> (Option<String>, Option<String>) {
        let mut writer = Self::default();
        for item in clause.selected_items() {
            item.accept(&mut writer);
        }
        let join = |parts: Vec<String>| (!parts.is_empty()).then(|| parts.join(","));
        (join(writer.select), join(writer.expand))
    }

    /// Both options as a query string fragment.
    pub fn to_query_string(clause: &SelectExpandClause) -> String {
        let (select, expand) = Self::render(clause);
        let mut parts = Vec::new();
        if let Some(select) = select {
            parts.push(format!("$select={select}"));
        }
        if let Some(expand) = expand {
            parts.push(format!("$expand={expand}"));
        }
        parts.join("&")
    }
}

fn nested_options(clause: Option<&SelectExpandClause>, options: &ExpandOptions) -> String {
    let mut parts = Vec::new();
    if let Some(clause) = clause {
        let (select, expand) = SelectExpandWriter::render(clause);
        if let Some(select) = select {
            parts.push(format!("$select={select}"));
        }
        if let Some(expand) = expand {
            parts.push(format!("$expand={expand}"));
        }
    }
    if let Some(filter) = &options.filter {
        parts.push(format!("$filter={}", filter.expression()));
    }
    if let Some(order_by) = &options.order_by {
        let items = order_by
            .iter()
            .map(|item| format!("{} {}", item.expression(), item.direction()))
            .collect::<Vec<_>>()
            .join(",");
        parts.push(format!("$orderby={items}"));
    }
    if let Some(top) = options.top {
        parts.push(format!("$top={top}"));
    }
    if let Some(skip) = options.skip {
        parts.push(format!("$skip={skip}"));
    }
    if let Some(count) = options.count {
        parts.push(format!("$count={count}"));
    }
    match options.levels {
        Some(ExpandLevels::Max) => parts.push("$levels=max".to_string()),
        Some(ExpandLevels::Depth(depth)) => parts.push(format!("$levels={depth}")),
        None => {}
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("({})", parts.join(";"))
    }
}

impl SelectItemVisitor for SelectExpandWriter {
    type Output = ();

    fn visit_wildcard(&mut self, _item: &WildcardSelectItem) {
        self.select.push("*".to_string());
    }

    fn visit_path(&mut self, item: &PathSelectItem) {
        self.select.push(item.path().to_resource_path());
    }

    fn visit_namespace_wildcard(&mut self, item: &NamespaceQualifiedWildcardSelectItem) {
        self.select.push(format!("{}.*", item.namespace()));
    }

    fn visit_expanded_navigation(&mut self, item: &ExpandedNavigationSelectItem) {
        let nested = nested_options(Some(item.clause()), item.options());
        self.expand.push(format!("{}{nested}", item.path()));
    }

    fn visit_expanded_reference(&mut self, item: &ExpandedReferenceSelectItem) {
        let nested = nested_options(None, item.options());
        self.expand.push(format!("{}/$ref{nested}", item.path()));
    }
}
