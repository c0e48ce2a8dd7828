//! Read-only schema oracle consumed by the semantic model.
//!
//! Every constructor that needs metadata takes a `&dyn SchemaOracle`. The
//! oracle answers lookups by name and decides type equivalence and
//! relatedness; the semantic model never stores or mutates metadata itself.
//!
//! # Architecture
//!
//! - **Types**: [`TypeRef`], [`EdmType`], [`PrimitiveKind`]
//! - **Metadata**: [`EntityType`], [`ComplexType`], [`EntitySet`],
//!   [`NavigationProperty`], [`Operation`]
//! - **Oracle**: [`SchemaOracle`], with [`InMemorySchema`] for tests and
//!   embedders that build their model in code

mod in_memory;
mod model;
mod types;

pub use in_memory::InMemorySchema;
pub use model::{
    ComplexType, EntitySet, EntityType, Multiplicity, NavigationProperty, Operation,
    OperationKind, StructuralProperty,
};
pub use types::{EdmType, PrimitiveKind, TypeRef};

use smol_str::SmolStr;
use std::collections::HashSet;
use std::sync::Arc;

/// Provides the metadata lookups needed while binding a request.
///
/// Only the name-resolution methods are required. Relationship checks
/// (`is_derived_from`, `types_are_related`, member lookups along the base-type
/// chain) have default implementations expressed in terms of them; override
/// them when the backing store can answer more directly.
pub trait SchemaOracle: Send + Sync {
    /// Resolves an entity set in the default container.
    fn resolve_entity_set(&self, name: &str) -> Option<Arc<EntitySet>>;

    /// Resolves an entity type by qualified name.
    fn resolve_entity_type(&self, name: &str) -> Option<Arc<EntityType>>;

    /// Resolves a complex type by qualified name.
    fn resolve_complex_type(&self, _name: &str) -> Option<Arc<ComplexType>> {
        None
    }

    /// Resolves an operation by qualified name.
    fn resolve_operation(&self, _name: &str) -> Option<Arc<Operation>> {
        None
    }

    /// Resolves the entity set a navigation lands in when followed from `set`.
    ///
    /// # Default Implementation
    ///
    /// Follows the set's navigation bindings.
    fn resolve_navigation_target(
        &self,
        set: &EntitySet,
        navigation: &NavigationProperty,
    ) -> Option<Arc<EntitySet>> {
        set.navigation_bindings
            .get(&navigation.name)
            .and_then(|target| self.resolve_entity_set(target))
    }

    /// Returns the declared base type of an entity or complex type.
    fn base_type_of(&self, name: &str) -> Option<SmolStr> {
        if let Some(entity) = self.resolve_entity_type(name) {
            return entity.base_type.clone();
        }
        self.resolve_complex_type(name)
            .and_then(|complex| complex.base_type.clone())
    }

    /// True when `derived` is `base` or inherits from it.
    fn is_derived_from(&self, derived: &str, base: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(SmolStr::new(derived));
        while let Some(name) = current {
            if name == base {
                return true;
            }
            if !seen.insert(name.clone()) {
                return false;
            }
            current = self.base_type_of(&name);
        }
        false
    }

    /// Equivalence used for operand compatibility; ignores nullability.
    fn types_are_equivalent(&self, left: &TypeRef, right: &TypeRef) -> bool {
        match (&left.ty, &right.ty) {
            (EdmType::Collection(l), EdmType::Collection(r)) => self.types_are_equivalent(l, r),
            (l, r) => l == r,
        }
    }

    /// True when one type is a subtype or supertype of the other.
    fn types_are_related(&self, left: &TypeRef, right: &TypeRef) -> bool {
        match (&left.ty, &right.ty) {
            (EdmType::Collection(l), EdmType::Collection(r)) => self.types_are_related(l, r),
            (EdmType::Entity(l), EdmType::Entity(r)) | (EdmType::Complex(l), EdmType::Complex(r)) => {
                self.is_derived_from(l, r) || self.is_derived_from(r, l)
            }
            _ => self.types_are_equivalent(left, right),
        }
    }

    /// Finds a structural property declared on `type_name` or one of its bases.
    fn find_property(&self, type_name: &str, property: &str) -> Option<StructuralProperty> {
        let mut seen = HashSet::new();
        let mut current = Some(SmolStr::new(type_name));
        while let Some(name) = current {
            if !seen.insert(name.clone()) {
                return None;
            }
            let found = match self.resolve_entity_type(&name) {
                Some(entity) => entity.properties.get(property).cloned(),
                None => self
                    .resolve_complex_type(&name)
                    .and_then(|complex| complex.properties.get(property).cloned()),
            };
            if found.is_some() {
                return found;
            }
            current = self.base_type_of(&name);
        }
        None
    }

    /// Finds a navigation property declared on `type_name` or one of its bases.
    fn find_navigation(&self, type_name: &str, navigation: &str) -> Option<NavigationProperty> {
        let mut seen = HashSet::new();
        let mut current = Some(SmolStr::new(type_name));
        while let Some(name) = current {
            if !seen.insert(name.clone()) {
                return None;
            }
            let entity = self.resolve_entity_type(&name)?;
            if let Some(found) = entity.navigations.get(navigation) {
                return Some(found.clone());
            }
            current = entity.base_type.clone();
        }
        None
    }

    /// The effective key of an entity type (declared on the root of its hierarchy).
    fn key_of(&self, type_name: &str) -> Vec<SmolStr> {
        let mut seen = HashSet::new();
        let mut current = Some(SmolStr::new(type_name));
        while let Some(name) = current {
            if !seen.insert(name.clone()) {
                break;
            }
            let Some(entity) = self.resolve_entity_type(&name) else {
                break;
            };
            if !entity.key.is_empty() {
                return entity.key.clone();
            }
            current = entity.base_type.clone();
        }
        Vec::new()
    }

    /// True when the entity or complex type, or any of its bases, is open.
    fn is_open_type(&self, type_name: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(SmolStr::new(type_name));
        while let Some(name) = current {
            if !seen.insert(name.clone()) {
                return false;
            }
            let open = match self.resolve_entity_type(&name) {
                Some(entity) => entity.is_open,
                None => self
                    .resolve_complex_type(&name)
                    .is_some_and(|complex| complex.is_open),
            };
            if open {
                return true;
            }
            current = self.base_type_of(&name);
        }
        false
    }
}
