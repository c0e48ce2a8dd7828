//! Select/expand levels: the mutable builder and the finalized clause.
//!
//! A level is assembled while the query string is walked, then finalized
//! exactly once. Finalization flattens the level's own selection and its
//! expansions into one ordered item list and freezes the builder.

use super::select_item::{ExpandOptions, ExpandedNavigationSelectItem, ExpandedReferenceSelectItem, SelectItem};
use crate::error::{Result, UriError};
use crate::path::ODataExpandPath;
use crate::schema::EntitySet;
use std::sync::Arc;

/// The finalized select/expand tree of one entity level.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectExpandClause {
    selected_items: Vec<SelectItem>,
    all_selected: bool,
}

impl SelectExpandClause {
    /// Builds an already-finalized level from its items.
    pub fn new(selected_items: Vec<SelectItem>, all_selected: bool) -> Self {
        Self {
            selected_items,
            all_selected,
        }
    }

    /// The level selecting everything and expanding nothing.
    pub fn all() -> Self {
        Self::new(Vec::new(), true)
    }

    pub fn selected_items(&self) -> &[SelectItem] {
        &self.selected_items
    }

    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    /// Expanded navigations of this level.
    pub fn expanded_navigations(&self) -> impl Iterator<Item = &ExpandedNavigationSelectItem> {
        self.selected_items.iter().filter_map(|item| match item {
            SelectItem::ExpandedNavigation(expanded) => Some(expanded),
            _ => None,
        })
    }

    /// Deepest expansion nesting below this level (0 when nothing is expanded).
    pub fn expand_depth(&self) -> usize {
        self.selected_items
            .iter()
            .map(|item| match item {
                SelectItem::ExpandedNavigation(expanded) => 1 + expanded.clause().expand_depth(),
                SelectItem::ExpandedReference(_) => 1,
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }

    /// Number of expand items in the whole tree.
    pub fn expand_count(&self) -> usize {
        self.selected_items
            .iter()
            .map(|item| match item {
                SelectItem::ExpandedNavigation(expanded) => 1 + expanded.clause().expand_count(),
                SelectItem::ExpandedReference(_) => 1,
                _ => 0,
            })
            .sum()
    }
}

/// Selection state of a level under construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    /// Nothing decided yet; finalizes as "everything selected".
    #[default]
    Unknown,
    AllSelected,
    /// `$select` was present but only expansions were named.
    ExpansionsOnly,
    /// Explicit non-expansion items, in insertion order.
    Partial(Vec<SelectItem>),
}

impl Selection {
    fn name(&self) -> &'static str {
        match self {
            Selection::Unknown => "unknown",
            Selection::AllSelected => "all",
            Selection::ExpansionsOnly => "expansions-only",
            Selection::Partial(_) => "partial",
        }
    }
}

#[derive(Debug, Clone)]
enum Expansion {
    Building(ExpandedNavigationBuilder),
    Finished(ExpandedNavigationSelectItem),
    Reference(ExpandedReferenceSelectItem),
}

impl Expansion {
    fn path(&self) -> &ODataExpandPath {
        match self {
            Expansion::Building(builder) => &builder.path,
            Expansion::Finished(item) => item.path(),
            Expansion::Reference(item) => item.path(),
        }
    }

    fn is_reference(&self) -> bool {
        matches!(self, Expansion::Reference(_))
    }
}

/// Mutable select/expand level.
#[derive(Debug, Clone, Default)]
pub struct SelectExpandClauseBuilder {
    selection: Selection,
    expansions: Vec<Expansion>,
    finalized: Option<SelectExpandClause>,
}

impl SelectExpandClauseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_clause(clause: SelectExpandClause) -> Self {
        let selection = if clause.all_selected() {
            Selection::AllSelected
        } else {
            let items: Vec<SelectItem> = clause
                .selected_items()
                .iter()
                .filter(|item| !item.is_expansion())
                .cloned()
                .collect();
            if items.is_empty() {
                Selection::ExpansionsOnly
            } else {
                Selection::Partial(items)
            }
        };
        Self {
            selection,
            expansions: Vec::new(),
            finalized: Some(clause),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.is_finalized() {
            return Err(UriError::SelectionFinalized.rejected("SelectExpandClauseBuilder"));
        }
        Ok(())
    }

    fn transition(&mut self, next: Selection) {
        tracing::trace!(from = self.selection.name(), to = next.name(), "selection transition");
        self.selection = next;
    }

    /// Marks that `$select` was given; an undecided level then selects only
    /// its expansions.
    pub fn initialize_empty_selection(&mut self) -> Result<()> {
        self.ensure_mutable()?;
        if self.selection == Selection::Unknown {
            self.transition(Selection::ExpansionsOnly);
        }
        Ok(())
    }

    /// Adds one item.
    ///
    /// Expansions go to the expansion list, deduplicated by path. Other items
    /// merge into the selection: nothing changes once everything is selected;
    /// a wildcard replaces the property and navigation paths already selected
    /// and suppresses later ones; exact duplicates are dropped.
    pub fn add_select_item(&mut self, item: SelectItem) -> Result<()> {
        self.ensure_mutable()?;
        match item {
            SelectItem::ExpandedNavigation(expanded) => {
                self.push_expansion(Expansion::Finished(expanded));
                return Ok(());
            }
            SelectItem::ExpandedReference(reference) => {
                self.push_expansion(Expansion::Reference(reference));
                return Ok(());
            }
            _ => {}
        }

        match &mut self.selection {
            Selection::AllSelected => {}
            Selection::Unknown | Selection::ExpansionsOnly => {
                self.transition(Selection::Partial(vec![item]));
            }
            Selection::Partial(items) => merge_item(items, item),
        }
        Ok(())
    }

    fn push_expansion(&mut self, expansion: Expansion) {
        let duplicate = self.expansions.iter().any(|existing| {
            existing.is_reference() == expansion.is_reference() && existing.path() == expansion.path()
        });
        if !duplicate {
            self.expansions.push(expansion);
        }
    }

    /// Adds an expansion and returns its nested level for further building.
    ///
    /// When an expansion with the same path is already present, that one is
    /// returned instead. A finished expansion comes back as a builder over its
    /// frozen level. Options an open level does not set yet are taken from
    /// `expansion`.
    pub fn add_expansion(&mut self, expansion: ExpandedNavigationBuilder) -> Result<&mut ExpandedNavigationBuilder> {
        self.ensure_mutable()?;
        let position = self
            .expansions
            .iter()
            .position(|existing| !existing.is_reference() && existing.path() == &expansion.path);
        let index = match position {
            Some(index) => {
                let slot = &mut self.expansions[index];
                if let Expansion::Finished(item) = slot {
                    *slot = Expansion::Building(ExpandedNavigationBuilder::from_item(item.clone()));
                }
                if let Expansion::Building(existing) = slot {
                    if !existing.clause.is_finalized() {
                        existing.options.merge_missing(expansion.options);
                    }
                }
                index
            }
            None => {
                self.expansions.push(Expansion::Building(expansion));
                self.expansions.len() - 1
            }
        };
        match &mut self.expansions[index] {
            Expansion::Building(builder) => Ok(builder),
            _ => Err(UriError::expand_path("expansion slot holds a finished item").rejected("add_expansion")),
        }
    }

    /// Selects everything on this level and on every expansion still being built.
    ///
    /// Nested levels that are already finalized keep their selection.
    pub fn set_all_selection_recursively(&mut self) -> Result<()> {
        self.ensure_mutable()?;
        self.select_all_open_levels();
        Ok(())
    }

    fn select_all_open_levels(&mut self) {
        if self.is_finalized() {
            return;
        }
        self.transition(Selection::AllSelected);
        for expansion in &mut self.expansions {
            if let Expansion::Building(builder) = expansion {
                builder.clause.select_all_open_levels();
            }
        }
    }

    /// Finalizes this level and, first, every nested level not finalized yet.
    ///
    /// The result lists the level's own items followed by its expansions.
    /// Calling this twice is an error.
    pub fn compute_final_selected_items(&mut self) -> Result<()> {
        if self.is_finalized() {
            return Err(UriError::SelectedItemsAlreadyComputed.rejected("compute_final_selected_items"));
        }

        let mut expand_items = Vec::with_capacity(self.expansions.len());
        for expansion in &mut self.expansions {
            let item = match expansion {
                Expansion::Building(builder) => {
                    if !builder.clause.is_finalized() {
                        builder.clause.compute_final_selected_items()?;
                    }
                    SelectItem::ExpandedNavigation(builder.to_item()?)
                }
                Expansion::Finished(item) => SelectItem::ExpandedNavigation(item.clone()),
                Expansion::Reference(item) => SelectItem::ExpandedReference(item.clone()),
            };
            expand_items.push(item);
        }

        let (mut items, all_selected) = match &self.selection {
            Selection::Partial(items) => (items.clone(), false),
            Selection::ExpansionsOnly => (Vec::new(), false),
            Selection::AllSelected | Selection::Unknown => (Vec::new(), true),
        };
        items.extend(expand_items);

        tracing::trace!(
            selection = self.selection.name(),
            items = items.len(),
            all_selected,
            "selected items computed"
        );
        self.finalized = Some(SelectExpandClause::new(items, all_selected));
        Ok(())
    }

    /// Final items; only available after [`compute_final_selected_items`](Self::compute_final_selected_items).
    pub fn selected_items(&self) -> Result<&[SelectItem]> {
        self.finalized
            .as_ref()
            .map(SelectExpandClause::selected_items)
            .ok_or_else(|| UriError::SelectedItemsNotComputed.rejected("selected_items"))
    }

    /// Finalized `all_selected` flag.
    pub fn all_selected(&self) -> Result<bool> {
        self.finalized
            .as_ref()
            .map(SelectExpandClause::all_selected)
            .ok_or_else(|| UriError::SelectedItemsNotComputed.rejected("all_selected"))
    }

    /// Freezes the builder, finalizing it first when that has not happened yet.
    pub fn build(mut self) -> Result<SelectExpandClause> {
        if self.finalized.is_none() {
            self.compute_final_selected_items()?;
        }
        self.finalized
            .ok_or_else(|| UriError::SelectedItemsNotComputed.rejected("build"))
    }
}

fn merge_item(items: &mut Vec<SelectItem>, item: SelectItem) {
    let has_wildcard = items.iter().any(|existing| matches!(existing, SelectItem::Wildcard(_)));
    match &item {
        SelectItem::Wildcard(_) => {
            if has_wildcard {
                return;
            }
            items.retain(|existing| !existing.is_structural_or_navigation());
        }
        _ if has_wildcard && item.is_structural_or_navigation() => return,
        _ => {}
    }
    if !items.contains(&item) {
        tracing::trace!(items = items.len() + 1, "selection item added");
        items.push(item);
    }
}

/// An expansion whose nested level is still being built.
#[derive(Debug, Clone)]
pub struct ExpandedNavigationBuilder {
    path: ODataExpandPath,
    entity_set: Option<Arc<EntitySet>>,
    options: ExpandOptions,
    clause: SelectExpandClauseBuilder,
}

impl ExpandedNavigationBuilder {
    /// The target entity set defaults to the navigation's resolved target.
    pub fn new(path: ODataExpandPath) -> Self {
        let entity_set = path.navigation().and_then(|nav| nav.target_set().cloned());
        Self {
            path,
            entity_set,
            options: ExpandOptions::default(),
            clause: SelectExpandClauseBuilder::new(),
        }
    }

    /// Reopens a finished expansion; its nested level stays finalized.
    fn from_item(item: ExpandedNavigationSelectItem) -> Self {
        Self {
            path: item.path().clone(),
            entity_set: item.entity_set().cloned(),
            options: item.options().clone(),
            clause: SelectExpandClauseBuilder::from_clause(item.clause().clone()),
        }
    }

    pub fn with_entity_set(mut self, entity_set: Option<Arc<EntitySet>>) -> Self {
        self.entity_set = entity_set;
        self
    }

    pub fn with_options(mut self, options: ExpandOptions) -> Self {
        self.options = options;
        self
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

    /// Options can change until the nested level is finalized.
    pub fn options_mut(&mut self) -> Result<&mut ExpandOptions> {
        self.clause.ensure_mutable()?;
        Ok(&mut self.options)
    }

    pub fn clause(&self) -> &SelectExpandClauseBuilder {
        &self.clause
    }

    /// The nested level.
    pub fn clause_mut(&mut self) -> &mut SelectExpandClauseBuilder {
        &mut self.clause
    }

    fn to_item(&self) -> Result<ExpandedNavigationSelectItem> {
        let clause = self
            .clause
            .finalized
            .clone()
            .ok_or_else(|| UriError::SelectedItemsNotComputed.rejected("ExpandedNavigationBuilder"))?;
        Ok(ExpandedNavigationSelectItem::new(
            self.path.clone(),
            self.entity_set.clone(),
            clause,
            self.options.clone(),
        ))
    }
}
