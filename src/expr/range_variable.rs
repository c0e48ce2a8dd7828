//! Variables bound by `$filter`/`$orderby` (`$it`) and lambda operators.

use super::node::CollectionNode;
use crate::error::{Result, UriError, require_identifier};
use crate::schema::{EntitySet, SchemaOracle, TypeRef};
use smol_str::SmolStr;
use std::sync::Arc;

/// A variable ranging over entities.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRangeVariable {
    name: SmolStr,
    type_ref: TypeRef,
    entity_set: Option<Arc<EntitySet>>,
}

impl EntityRangeVariable {
    /// Name of the implicit variable of a query option.
    pub const IMPLICIT: &'static str = "$it";

    /// Binds a variable to the entities of a known entity set.
    pub fn with_entity_set(
        name: &str,
        type_ref: TypeRef,
        entity_set: Arc<EntitySet>,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        require_identifier(name, "range variable name")?;
        check_entity(&type_ref)?;
        let set_type = entity_set.element_type_ref();
        if !schema.types_are_related(&type_ref, &set_type) {
            return Err(UriError::unrelated("range variable", set_type.name(), type_ref.name())
                .rejected("EntityRangeVariable"));
        }
        Ok(Self {
            name: SmolStr::new(name),
            type_ref,
            entity_set: Some(entity_set),
        })
    }

    /// Binds a variable to the items of an entity collection. The entity set
    /// is taken from the collection and may be unknown.
    pub fn from_collection(
        name: &str,
        type_ref: TypeRef,
        collection: &CollectionNode,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        require_identifier(name, "range variable name")?;
        check_entity(&type_ref)?;
        let item = collection.item_type();
        if !item.is_entity() {
            return Err(UriError::NotAnEntity {
                context: "entity range variable collection",
                type_name: collection.type_ref().name(),
            }
            .rejected("EntityRangeVariable"));
        }
        if !schema.types_are_related(&type_ref, item) {
            return Err(UriError::unrelated("range variable", item.name(), type_ref.name())
                .rejected("EntityRangeVariable"));
        }
        Ok(Self {
            name: SmolStr::new(name),
            type_ref,
            entity_set: collection.entity_set().cloned(),
        })
    }

    /// `$it` over the given entity set.
    pub fn implicit(entity_set: Arc<EntitySet>, schema: &dyn SchemaOracle) -> Result<Self> {
        let type_ref = entity_set.element_type_ref();
        Self::with_entity_set(Self::IMPLICIT, type_ref, entity_set, schema)
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn entity_set(&self) -> Option<&Arc<EntitySet>> {
        self.entity_set.as_ref()
    }
}

fn check_entity(type_ref: &TypeRef) -> Result<()> {
    if type_ref.is_entity() {
        return Ok(());
    }
    Err(UriError::NotAnEntity {
        context: "entity range variable",
        type_name: type_ref.name(),
    }
    .rejected("EntityRangeVariable"))
}

/// A variable ranging over primitive or complex values.
#[derive(Debug, Clone, PartialEq)]
pub struct NonEntityRangeVariable {
    name: SmolStr,
    type_ref: Option<TypeRef>,
}

impl NonEntityRangeVariable {
    /// `type_ref` is `None` for items of an untyped (open) collection.
    pub fn new(name: &str, type_ref: Option<TypeRef>) -> Result<Self> {
        require_identifier(name, "range variable name")?;
        if let Some(ty) = type_ref.as_ref().filter(|ty| ty.is_entity()) {
            return Err(UriError::UnexpectedEntity {
                context: "non-entity range variable",
                type_name: ty.name(),
            }
            .rejected("NonEntityRangeVariable"));
        }
        Ok(Self {
            name: SmolStr::new(name),
            type_ref,
        })
    }

    /// Binds a variable to the items of a primitive or complex collection.
    pub fn from_collection(name: &str, collection: &CollectionNode) -> Result<Self> {
        Self::new(name, Some(collection.item_type().clone()))
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    pub fn type_ref(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }
}

/// Either kind of range variable.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeVariable {
    Entity(EntityRangeVariable),
    NonEntity(NonEntityRangeVariable),
}

impl RangeVariable {
    pub fn name(&self) -> &SmolStr {
        match self {
            RangeVariable::Entity(variable) => variable.name(),
            RangeVariable::NonEntity(variable) => variable.name(),
        }
    }

    pub fn type_ref(&self) -> Option<&TypeRef> {
        match self {
            RangeVariable::Entity(variable) => Some(variable.type_ref()),
            RangeVariable::NonEntity(variable) => variable.type_ref(),
        }
    }

    pub fn entity_set(&self) -> Option<&Arc<EntitySet>> {
        match self {
            RangeVariable::Entity(variable) => variable.entity_set(),
            RangeVariable::NonEntity(_) => None,
        }
    }
}

impl From<EntityRangeVariable> for RangeVariable {
    fn from(variable: EntityRangeVariable) -> Self {
        RangeVariable::Entity(variable)
    }
}

impl From<NonEntityRangeVariable> for RangeVariable {
    fn from(variable: NonEntityRangeVariable) -> Self {
        RangeVariable::NonEntity(variable)
    }
}
