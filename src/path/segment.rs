//! Resource path segments.
//!
//! Each segment is built once from a raw token plus schema lookups and is
//! immutable afterwards. Constructors perform their own resolution and reject
//! anything that would leave the segment inconsistent with the schema.
//! Equality is structural: same variant, same identifying fields.

use crate::error::{Result, UriError, require_identifier};
use crate::expr::ConstantValue;
use crate::lexer;
use crate::schema::{
    EdmType, EntitySet, NavigationProperty, Operation, PrimitiveKind, SchemaOracle,
    StructuralProperty, TypeRef,
};
use smol_str::SmolStr;
use std::sync::Arc;

/// What a segment addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Resource,
    OpenProperty,
    Primitive,
    ComplexObject,
    Collection,
    VoidOperation,
    Batch,
    MetadataDocument,
    PrimitiveValue,
    MediaResource,
}

/// Whether a segment yields one value or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultShape {
    Single,
    Collection,
}

impl ResultShape {
    pub fn name(self) -> &'static str {
        match self {
            ResultShape::Single => "single",
            ResultShape::Collection => "collection",
        }
    }
}

/// One step of a resource path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    EntitySet(EntitySetSegment),
    Key(KeySegment),
    Property(PropertySegment),
    OpenProperty(OpenPropertySegment),
    Navigation(NavigationPropertySegment),
    NavigationLink(NavigationPropertyLinkSegment),
    TypeCast(TypeSegment),
    Value(ValueSegment),
    BatchReference(BatchReferenceSegment),
    Operation(OperationSegment),
    Count(CountSegment),
    Metadata(MetadataSegment),
    Batch(BatchSegment),
}

impl PathSegment {
    /// The raw identifier this segment was built from.
    pub fn identifier(&self) -> &str {
        match self {
            PathSegment::EntitySet(s) => &s.entity_set.name,
            PathSegment::Key(s) => &s.identifier,
            PathSegment::Property(s) => &s.property.name,
            PathSegment::OpenProperty(s) => &s.name,
            PathSegment::Navigation(s) => &s.navigation.name,
            PathSegment::NavigationLink(s) => &s.navigation.name,
            PathSegment::TypeCast(s) => &s.type_name,
            PathSegment::Value(_) => ValueSegment::IDENTIFIER,
            PathSegment::BatchReference(s) => &s.identifier,
            PathSegment::Operation(s) => &s.identifier,
            PathSegment::Count(_) => CountSegment::IDENTIFIER,
            PathSegment::Metadata(_) => MetadataSegment::IDENTIFIER,
            PathSegment::Batch(_) => BatchSegment::IDENTIFIER,
        }
    }

    /// True when the segment yields at most one value.
    pub fn single_result(&self) -> bool {
        match self {
            PathSegment::EntitySet(_) => false,
            PathSegment::Key(_) => true,
            PathSegment::Property(s) => !s.property.type_ref.is_collection(),
            PathSegment::OpenProperty(_) => true,
            PathSegment::Navigation(s) => s.navigation.multiplicity.is_single(),
            PathSegment::NavigationLink(s) => s.navigation.multiplicity.is_single(),
            PathSegment::TypeCast(s) => !s.target_type.is_collection(),
            PathSegment::Value(_) => true,
            PathSegment::BatchReference(s) => !s.target_type.is_collection(),
            PathSegment::Operation(s) => !s.return_type().is_some_and(TypeRef::is_collection),
            PathSegment::Count(_) | PathSegment::Metadata(_) | PathSegment::Batch(_) => true,
        }
    }

    /// Type of the value this segment addresses, when known.
    pub fn target_type(&self) -> Option<TypeRef> {
        match self {
            PathSegment::EntitySet(s) => Some(s.target_type()),
            PathSegment::Key(s) => Some(s.target_type.clone()),
            PathSegment::Property(s) => Some(s.property.type_ref.clone()),
            PathSegment::OpenProperty(_) => None,
            PathSegment::Navigation(s) => Some(s.navigation.type_ref()),
            PathSegment::NavigationLink(s) => Some(s.navigation.type_ref()),
            PathSegment::TypeCast(s) => Some(s.target_type.clone()),
            PathSegment::Value(s) => s.target_type.clone(),
            PathSegment::BatchReference(s) => Some(s.target_type.clone()),
            PathSegment::Operation(s) => s.return_type().cloned(),
            PathSegment::Count(_) => Some(TypeRef::primitive(PrimitiveKind::Int32, false)),
            PathSegment::Metadata(_) | PathSegment::Batch(_) => None,
        }
    }

    /// Entity set the addressed value belongs to, when known.
    pub fn target_entity_set(&self) -> Option<&Arc<EntitySet>> {
        match self {
            PathSegment::EntitySet(s) => Some(&s.entity_set),
            PathSegment::Key(s) => s.entity_set.as_ref(),
            PathSegment::Navigation(s) => s.target_set.as_ref(),
            PathSegment::NavigationLink(s) => s.target_set.as_ref(),
            PathSegment::TypeCast(s) => s.entity_set.as_ref(),
            PathSegment::Value(s) => s.entity_set.as_ref(),
            PathSegment::BatchReference(s) => s.entity_set.as_ref(),
            PathSegment::Operation(s) => s.entity_set.as_ref(),
            PathSegment::Property(_)
            | PathSegment::OpenProperty(_)
            | PathSegment::Count(_)
            | PathSegment::Metadata(_)
            | PathSegment::Batch(_) => None,
        }
    }

    pub fn target_kind(&self) -> TargetKind {
        match self {
            PathSegment::EntitySet(_)
            | PathSegment::Key(_)
            | PathSegment::Navigation(_)
            | PathSegment::NavigationLink(_)
            | PathSegment::BatchReference(_) => TargetKind::Resource,
            PathSegment::Property(s) => kind_of_value(&s.property.type_ref),
            PathSegment::OpenProperty(_) => TargetKind::OpenProperty,
            PathSegment::TypeCast(s) => s.target_kind,
            PathSegment::Value(s) => s.target_kind,
            PathSegment::Operation(s) => s.target_kind,
            PathSegment::Count(_) => TargetKind::PrimitiveValue,
            PathSegment::Metadata(_) => TargetKind::MetadataDocument,
            PathSegment::Batch(_) => TargetKind::Batch,
        }
    }
}

fn kind_of_value(type_ref: &TypeRef) -> TargetKind {
    match &type_ref.ty {
        EdmType::Collection(_) => TargetKind::Collection,
        EdmType::Complex(_) => TargetKind::ComplexObject,
        EdmType::Entity(_) => TargetKind::Resource,
        EdmType::Primitive(_) => TargetKind::Primitive,
    }
}

macro_rules! impl_from_segment {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for PathSegment {
                fn from(segment: $ty) -> Self {
                    PathSegment::$variant(segment)
                }
            }
        )*
    };
}

impl_from_segment!(
    EntitySet(EntitySetSegment),
    Key(KeySegment),
    Property(PropertySegment),
    OpenProperty(OpenPropertySegment),
    Navigation(NavigationPropertySegment),
    NavigationLink(NavigationPropertyLinkSegment),
    TypeCast(TypeSegment),
    Value(ValueSegment),
    BatchReference(BatchReferenceSegment),
    Operation(OperationSegment),
    Count(CountSegment),
    Metadata(MetadataSegment),
    Batch(BatchSegment),
);

// ============================================================================
// Entity sets and keys
// ============================================================================

/// Addresses every entity in an entity set.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySetSegment {
    entity_set: Arc<EntitySet>,
}

impl EntitySetSegment {
    pub fn new(entity_set: Arc<EntitySet>) -> Result<Self> {
        require_identifier(&entity_set.name, "entity set name")?;
        Ok(Self { entity_set })
    }

    /// Resolves `name` in the schema's entity container.
    pub fn resolve(name: &str, schema: &dyn SchemaOracle) -> Result<Self> {
        require_identifier(name, "entity set name")?;
        let entity_set = schema
            .resolve_entity_set(name)
            .ok_or_else(|| UriError::unknown("entity set", name).rejected("EntitySetSegment"))?;
        Self::new(entity_set)
    }

    pub fn entity_set(&self) -> &Arc<EntitySet> {
        &self.entity_set
    }

    fn target_type(&self) -> TypeRef {
        TypeRef::collection(self.entity_set.element_type_ref())
    }
}

/// Numeric key values may widen: `Orders(1)` addresses an `Edm.Int64` key.
fn key_value_fits(value: PrimitiveKind, key: PrimitiveKind) -> bool {
    match (value.numeric_rank(), key.numeric_rank()) {
        (Some(value), Some(key)) => value <= key,
        _ => value == key,
    }
}

/// Selects one entity from a collection by key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeySegment {
    identifier: SmolStr,
    keys: Vec<(SmolStr, ConstantValue)>,
    target_type: TypeRef,
    entity_set: Option<Arc<EntitySet>>,
}

impl KeySegment {
    /// Builds a key lookup on `entity_type`.
    ///
    /// A single positional key (empty name) is accepted when the type declares
    /// exactly one key property; it is recorded under that property's name.
    pub fn new(
        keys: Vec<(SmolStr, ConstantValue)>,
        entity_type: &str,
        entity_set: Option<Arc<EntitySet>>,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        if keys.is_empty() {
            return Err(UriError::missing("keys").rejected("KeySegment"));
        }
        let resolved = schema
            .resolve_entity_type(entity_type)
            .ok_or_else(|| UriError::unknown("entity type", entity_type).rejected("KeySegment"))?;
        let target_type = resolved.type_ref();

        if let Some(set) = &entity_set {
            let set_type = set.element_type_ref();
            if !schema.types_are_related(&target_type, &set_type) {
                return Err(UriError::unrelated("key segment", set_type.name(), target_type.name())
                    .rejected("KeySegment"));
            }
        }

        let declared = schema.key_of(entity_type);
        let invalid = |reason: String| {
            UriError::InvalidKey {
                entity_type: SmolStr::new(entity_type),
                reason,
            }
            .rejected("KeySegment")
        };
        if declared.is_empty() {
            return Err(invalid("the type declares no key".to_string()));
        }
        if keys.len() != declared.len() {
            return Err(invalid(format!(
                "expected {} key value(s), found {}",
                declared.len(),
                keys.len()
            )));
        }

        let mut normalized = Vec::with_capacity(keys.len());
        for (name, value) in keys {
            let name = if name.is_empty() && declared.len() == 1 {
                declared[0].clone()
            } else {
                name
            };
            if !declared.contains(&name) {
                return Err(invalid(format!("'{name}' is not a key property")));
            }
            if normalized.iter().any(|(seen, _)| *seen == name) {
                return Err(invalid(format!("key property '{name}' is given twice")));
            }
            let key_kind = schema
                .find_property(entity_type, &name)
                .and_then(|property| property.type_ref.as_primitive())
                .ok_or_else(|| invalid(format!("key property '{name}' is not a declared primitive property")))?;
            match value.kind() {
                None => return Err(invalid(format!("key property '{name}' cannot be null"))),
                Some(kind) if !key_value_fits(kind, key_kind) => {
                    return Err(invalid(format!(
                        "key property '{name}' is {} but the value is {}",
                        key_kind.name(),
                        kind.name()
                    )));
                }
                Some(_) => {}
            }
            normalized.push((name, value));
        }

        let identifier = render_key(&normalized);
        Ok(Self {
            identifier,
            keys: normalized,
            target_type,
            entity_set,
        })
    }

    /// Builds a key lookup on the collection addressed by `previous`.
    pub fn after(
        previous: &PathSegment,
        keys: Vec<(SmolStr, ConstantValue)>,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        let element = previous
            .target_type()
            .filter(|ty| ty.is_entity_collection())
            .and_then(|ty| ty.element_type().and_then(TypeRef::as_entity).cloned())
            .ok_or_else(|| {
                UriError::resource_path(format!(
                    "a key cannot follow '{}', which is not an entity collection",
                    previous.identifier()
                ))
                .rejected("KeySegment")
            })?;
        Self::new(keys, &element, previous.target_entity_set().cloned(), schema)
    }

    /// Key predicate text: the bare value for a single key, `Name=value,..` otherwise.
    pub fn identifier(&self) -> &SmolStr {
        &self.identifier
    }

    pub fn keys(&self) -> &[(SmolStr, ConstantValue)] {
        &self.keys
    }

    pub fn entity_type(&self) -> &TypeRef {
        &self.target_type
    }
}

fn render_key(keys: &[(SmolStr, ConstantValue)]) -> SmolStr {
    match keys {
        [(_, value)] => value.to_literal().into(),
        _ => keys
            .iter()
            .map(|(name, value)| format!("{name}={}", value.to_literal()))
            .collect::<Vec<_>>()
            .join(",")
            .into(),
    }
}

// ============================================================================
// Properties
// ============================================================================

/// Addresses a declared structural property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySegment {
    property: StructuralProperty,
}

impl PropertySegment {
    pub fn new(property: StructuralProperty) -> Result<Self> {
        require_identifier(&property.name, "property name")?;
        Ok(Self { property })
    }

    /// Resolves `name` on `owner_type` or one of its base types.
    pub fn resolve(owner_type: &str, name: &str, schema: &dyn SchemaOracle) -> Result<Self> {
        require_identifier(name, "property name")?;
        let property = schema.find_property(owner_type, name).ok_or_else(|| {
            UriError::unknown("property", format!("{owner_type}/{name}")).rejected("PropertySegment")
        })?;
        Self::new(property)
    }

    pub fn property(&self) -> &StructuralProperty {
        &self.property
    }
}

/// Addresses an undeclared (dynamic) property of an open type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPropertySegment {
    name: SmolStr,
}

impl OpenPropertySegment {
    pub fn new(name: impl Into<SmolStr>) -> Result<Self> {
        let name = name.into();
        require_identifier(&name, "open property name")?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }
}

// ============================================================================
// Navigation
// ============================================================================

fn navigation_target(
    navigation: &NavigationProperty,
    source_set: Option<&EntitySet>,
    expected: Option<ResultShape>,
    schema: &dyn SchemaOracle,
    constructor: &'static str,
) -> Result<Option<Arc<EntitySet>>> {
    require_identifier(&navigation.name, "navigation property name")?;
    if let Some(expected) = expected {
        let actual = if navigation.multiplicity.is_single() {
            ResultShape::Single
        } else {
            ResultShape::Collection
        };
        if actual != expected {
            return Err(UriError::MultiplicityMismatch {
                navigation: navigation.name.clone(),
                expected: expected.name(),
                multiplicity: navigation.multiplicity,
            }
            .rejected(constructor));
        }
    }
    Ok(source_set.and_then(|set| schema.resolve_navigation_target(set, navigation)))
}

/// Follows a navigation property.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationPropertySegment {
    navigation: NavigationProperty,
    target_set: Option<Arc<EntitySet>>,
}

impl NavigationPropertySegment {
    /// Builds the segment with the shape implied by the navigation's multiplicity.
    ///
    /// `source_set` is `None` when the source came from somewhere without a
    /// known set (an open type, an operation result); the target set is then
    /// unknown too.
    pub fn new(
        navigation: NavigationProperty,
        source_set: Option<&EntitySet>,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        let target_set = navigation_target(&navigation, source_set, None, schema, "NavigationPropertySegment")?;
        Ok(Self {
            navigation,
            target_set,
        })
    }

    /// Builds the segment and checks the navigation can produce `expected`.
    pub fn with_expected_shape(
        navigation: NavigationProperty,
        source_set: Option<&EntitySet>,
        expected: ResultShape,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        let target_set = navigation_target(
            &navigation,
            source_set,
            Some(expected),
            schema,
            "NavigationPropertySegment",
        )?;
        Ok(Self {
            navigation,
            target_set,
        })
    }

    /// Resolves `name` on the type addressed by `previous`.
    pub fn after(previous: &PathSegment, name: &str, schema: &dyn SchemaOracle) -> Result<Self> {
        let navigation = resolve_navigation_after(previous, name, schema, "NavigationPropertySegment")?;
        Self::new(navigation, previous.target_entity_set().map(Arc::as_ref), schema)
    }

    pub fn navigation(&self) -> &NavigationProperty {
        &self.navigation
    }

    pub fn target_set(&self) -> Option<&Arc<EntitySet>> {
        self.target_set.as_ref()
    }
}

/// Addresses the reference (`$ref`) of a navigation rather than its target.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationPropertyLinkSegment {
    navigation: NavigationProperty,
    target_set: Option<Arc<EntitySet>>,
}

impl NavigationPropertyLinkSegment {
    pub fn new(
        navigation: NavigationProperty,
        source_set: Option<&EntitySet>,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        let target_set =
            navigation_target(&navigation, source_set, None, schema, "NavigationPropertyLinkSegment")?;
        Ok(Self {
            navigation,
            target_set,
        })
    }

    pub fn with_expected_shape(
        navigation: NavigationProperty,
        source_set: Option<&EntitySet>,
        expected: ResultShape,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        let target_set = navigation_target(
            &navigation,
            source_set,
            Some(expected),
            schema,
            "NavigationPropertyLinkSegment",
        )?;
        Ok(Self {
            navigation,
            target_set,
        })
    }

    pub fn navigation(&self) -> &NavigationProperty {
        &self.navigation
    }

    pub fn target_set(&self) -> Option<&Arc<EntitySet>> {
        self.target_set.as_ref()
    }
}

fn resolve_navigation_after(
    previous: &PathSegment,
    name: &str,
    schema: &dyn SchemaOracle,
    constructor: &'static str,
) -> Result<NavigationProperty> {
    require_identifier(name, "navigation property name")?;
    let owner = previous
        .target_type()
        .and_then(|ty| match ty.element_type() {
            Some(element) => element.as_entity().cloned(),
            None => ty.as_entity().cloned(),
        })
        .ok_or_else(|| {
            UriError::NotAnEntity {
                context: "navigation",
                type_name: previous
                    .target_type()
                    .map(|ty| ty.name())
                    .unwrap_or_else(|| SmolStr::new_static("<unknown>")),
            }
            .rejected(constructor)
        })?;
    schema
        .find_navigation(&owner, name)
        .ok_or_else(|| UriError::unknown("navigation property", format!("{owner}/{name}")).rejected(constructor))
}

// ============================================================================
// Type casts
// ============================================================================

/// Narrows (or widens) the addressed value to a related structured type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSegment {
    type_name: SmolStr,
    target_type: TypeRef,
    target_kind: TargetKind,
    entity_set: Option<Arc<EntitySet>>,
}

impl TypeSegment {
    /// Builds a cast to `cast_type`.
    ///
    /// The cast is checked against `expected` (the type the previous segment
    /// addressed) or, failing that, the entity set's element type. The result
    /// keeps the collection shape of `expected`.
    pub fn new(
        cast_type: &str,
        expected: Option<&TypeRef>,
        entity_set: Option<Arc<EntitySet>>,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        require_identifier(cast_type, "type name")?;
        let element = if let Some(entity) = schema.resolve_entity_type(cast_type) {
            entity.type_ref()
        } else if let Some(complex) = schema.resolve_complex_type(cast_type) {
            TypeRef::complex(complex.qualified_name(), false)
        } else {
            return Err(UriError::unknown("type", cast_type).rejected("TypeSegment"));
        };

        let reference = match expected {
            Some(ty) => Some(ty.element_type().cloned().unwrap_or_else(|| ty.clone())),
            None => entity_set.as_ref().map(|set| set.element_type_ref()),
        };
        if let Some(reference) = &reference {
            if !schema.types_are_related(reference, &element) {
                return Err(UriError::unrelated("type cast segment", reference.name(), element.name())
                    .rejected("TypeSegment"));
            }
        }

        let collection = expected.is_some_and(TypeRef::is_collection);
        let nullable = expected.is_some_and(|ty| ty.nullable && !ty.is_collection());
        let element = element.with_nullable(nullable);
        let target_kind = if element.is_entity() {
            TargetKind::Resource
        } else if collection {
            TargetKind::Collection
        } else {
            TargetKind::ComplexObject
        };
        let target_type = if collection {
            TypeRef::collection(element)
        } else {
            element
        };

        Ok(Self {
            type_name: SmolStr::new(cast_type),
            target_type,
            target_kind,
            entity_set,
        })
    }

    /// Builds a cast applied to the value addressed by `previous`.
    pub fn after(previous: &PathSegment, cast_type: &str, schema: &dyn SchemaOracle) -> Result<Self> {
        let expected = previous.target_type();
        Self::new(
            cast_type,
            expected.as_ref(),
            previous.target_entity_set().cloned(),
            schema,
        )
    }

    pub fn type_name(&self) -> &SmolStr {
        &self.type_name
    }

    pub fn target_type(&self) -> &TypeRef {
        &self.target_type
    }
}

// ============================================================================
// $value, $count, $metadata, $batch
// ============================================================================

/// Addresses the raw value (`$value`) of the previous segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSegment {
    target_type: Option<TypeRef>,
    target_kind: TargetKind,
    entity_set: Option<Arc<EntitySet>>,
}

impl ValueSegment {
    pub const IDENTIFIER: &'static str = "$value";

    /// Computes the raw-value type from the previous segment.
    ///
    /// Entities yield their default stream; primitives yield themselves; open
    /// properties yield an unknown type. Collections have no raw value.
    pub fn new(previous: &PathSegment) -> Result<Self> {
        let previous_type = previous.target_type();
        if !previous.single_result() || previous_type.as_ref().is_some_and(TypeRef::is_collection) {
            return Err(UriError::ValueOnCollection {
                previous: SmolStr::new(previous.identifier()),
            }
            .rejected("ValueSegment"));
        }

        match previous_type {
            None => Ok(Self {
                target_type: None,
                target_kind: TargetKind::PrimitiveValue,
                entity_set: None,
            }),
            Some(ty) if ty.is_entity() => Ok(Self {
                target_type: Some(TypeRef::primitive(PrimitiveKind::Stream, false)),
                target_kind: TargetKind::MediaResource,
                entity_set: previous.target_entity_set().cloned(),
            }),
            Some(ty) if ty.as_primitive().is_some() => Ok(Self {
                target_type: Some(ty),
                target_kind: TargetKind::PrimitiveValue,
                entity_set: None,
            }),
            Some(ty) => Err(UriError::PropertyShapeMismatch {
                property: SmolStr::new(previous.identifier()),
                type_name: ty.name(),
                expected: "primitive",
            }
            .rejected("ValueSegment")),
        }
    }

    pub fn target_type(&self) -> Option<&TypeRef> {
        self.target_type.as_ref()
    }
}

/// `$count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountSegment;

impl CountSegment {
    pub const IDENTIFIER: &'static str = "$count";
}

/// `$metadata`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetadataSegment;

impl MetadataSegment {
    pub const IDENTIFIER: &'static str = "$metadata";
}

/// `$batch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSegment;

impl BatchSegment {
    pub const IDENTIFIER: &'static str = "$batch";
}

// ============================================================================
// Batch references and operations
// ============================================================================

/// References the result of an earlier request in the same batch (`$1`).
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReferenceSegment {
    content_id: SmolStr,
    identifier: SmolStr,
    target_type: TypeRef,
    entity_set: Option<Arc<EntitySet>>,
}

impl BatchReferenceSegment {
    /// `content_id` is the bare request id (`"1"`), without the `$` that
    /// introduces it in a URL.
    pub fn new(content_id: &str, target_type: TypeRef, entity_set: Option<Arc<EntitySet>>) -> Result<Self> {
        require_identifier(content_id, "content-id")?;
        if !lexer::is_valid_content_id(content_id) {
            return Err(UriError::InvalidContentId {
                content_id: SmolStr::new(content_id),
            }
            .rejected("BatchReferenceSegment"));
        }
        Ok(Self {
            content_id: SmolStr::new(content_id),
            identifier: format!("${content_id}").into(),
            target_type,
            entity_set,
        })
    }

    pub fn content_id(&self) -> &SmolStr {
        &self.content_id
    }
}

/// Invokes a function or action.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSegment {
    operation: Arc<Operation>,
    identifier: SmolStr,
    target_kind: TargetKind,
    entity_set: Option<Arc<EntitySet>>,
}

impl OperationSegment {
    /// `entity_set` is the set an entity-returning operation's results belong
    /// to, when the caller knows it.
    pub fn new(
        operation: Arc<Operation>,
        entity_set: Option<Arc<EntitySet>>,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        require_identifier(&operation.name, "operation name")?;
        let target_kind = match &operation.return_type {
            None => TargetKind::VoidOperation,
            Some(ty) => {
                let element = ty.element_type().unwrap_or(ty);
                if element.is_entity() {
                    TargetKind::Resource
                } else if ty.is_collection() {
                    TargetKind::Collection
                } else if element.is_complex() {
                    TargetKind::ComplexObject
                } else {
                    TargetKind::Primitive
                }
            }
        };

        if let Some(set) = &entity_set {
            let returned = operation
                .return_type
                .as_ref()
                .map(|ty| ty.element_type().unwrap_or(ty).clone())
                .filter(TypeRef::is_entity)
                .ok_or_else(|| {
                    UriError::NotAnEntity {
                        context: "operation with a result entity set",
                        type_name: operation
                            .return_type
                            .as_ref()
                            .map(TypeRef::name)
                            .unwrap_or_else(|| SmolStr::new_static("<void>")),
                    }
                    .rejected("OperationSegment")
                })?;
            let set_type = set.element_type_ref();
            if !schema.types_are_related(&set_type, &returned) {
                return Err(UriError::unrelated("operation result set", set_type.name(), returned.name())
                    .rejected("OperationSegment"));
            }
        }

        Ok(Self {
            identifier: operation.qualified_name(),
            operation,
            target_kind,
            entity_set,
        })
    }

    /// Resolves `name` to an operation in the schema.
    pub fn resolve(
        name: &str,
        entity_set: Option<Arc<EntitySet>>,
        schema: &dyn SchemaOracle,
    ) -> Result<Self> {
        require_identifier(name, "operation name")?;
        let operation = schema
            .resolve_operation(name)
            .ok_or_else(|| UriError::unknown("operation", name).rejected("OperationSegment"))?;
        Self::new(operation, entity_set, schema)
    }

    pub fn operation(&self) -> &Arc<Operation> {
        &self.operation
    }

    pub fn return_type(&self) -> Option<&TypeRef> {
        self.operation.return_type.as_ref()
    }
}
