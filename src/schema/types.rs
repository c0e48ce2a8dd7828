//! EDM type references used throughout the semantic model.

use smol_str::SmolStr;
use std::fmt;

/// Primitive EDM type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    SByte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    String,
    Guid,
    Date,
    DateTimeOffset,
    TimeOfDay,
    Duration,
    Binary,
    Stream,
    Geography,
    Geometry,
}

impl PrimitiveKind {
    /// Returns the qualified EDM name (`Edm.Int32`).
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Edm.Boolean",
            PrimitiveKind::Byte => "Edm.Byte",
            PrimitiveKind::SByte => "Edm.SByte",
            PrimitiveKind::Int16 => "Edm.Int16",
            PrimitiveKind::Int32 => "Edm.Int32",
            PrimitiveKind::Int64 => "Edm.Int64",
            PrimitiveKind::Single => "Edm.Single",
            PrimitiveKind::Double => "Edm.Double",
            PrimitiveKind::Decimal => "Edm.Decimal",
            PrimitiveKind::String => "Edm.String",
            PrimitiveKind::Guid => "Edm.Guid",
            PrimitiveKind::Date => "Edm.Date",
            PrimitiveKind::DateTimeOffset => "Edm.DateTimeOffset",
            PrimitiveKind::TimeOfDay => "Edm.TimeOfDay",
            PrimitiveKind::Duration => "Edm.Duration",
            PrimitiveKind::Binary => "Edm.Binary",
            PrimitiveKind::Stream => "Edm.Stream",
            PrimitiveKind::Geography => "Edm.Geography",
            PrimitiveKind::Geometry => "Edm.Geometry",
        }
    }

    /// Looks up a primitive kind by its qualified EDM name.
    pub fn from_name(name: &str) -> Option<Self> {
        const ALL: [PrimitiveKind; 19] = [
            PrimitiveKind::Boolean,
            PrimitiveKind::Byte,
            PrimitiveKind::SByte,
            PrimitiveKind::Int16,
            PrimitiveKind::Int32,
            PrimitiveKind::Int64,
            PrimitiveKind::Single,
            PrimitiveKind::Double,
            PrimitiveKind::Decimal,
            PrimitiveKind::String,
            PrimitiveKind::Guid,
            PrimitiveKind::Date,
            PrimitiveKind::DateTimeOffset,
            PrimitiveKind::TimeOfDay,
            PrimitiveKind::Duration,
            PrimitiveKind::Binary,
            PrimitiveKind::Stream,
            PrimitiveKind::Geography,
            PrimitiveKind::Geometry,
        ];
        ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Widening rank for numeric kinds; `None` for everything else.
    pub fn numeric_rank(self) -> Option<u8> {
        match self {
            PrimitiveKind::Byte | PrimitiveKind::SByte => Some(0),
            PrimitiveKind::Int16 => Some(1),
            PrimitiveKind::Int32 => Some(2),
            PrimitiveKind::Int64 => Some(3),
            PrimitiveKind::Single => Some(4),
            PrimitiveKind::Double => Some(5),
            PrimitiveKind::Decimal => Some(6),
            _ => None,
        }
    }

    /// Returns true for integral and floating-point kinds.
    pub fn is_numeric(self) -> bool {
        self.numeric_rank().is_some()
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The definition side of a type reference.
///
/// Structured types are referenced by qualified name and resolved through the
/// [`SchemaOracle`](crate::schema::SchemaOracle); this keeps type references
/// cheap to clone and free of reference cycles between entity types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdmType {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Entity type by qualified name.
    Entity(SmolStr),
    /// Complex type by qualified name.
    Complex(SmolStr),
    /// Collection of the element type.
    Collection(Box<TypeRef>),
}

/// A type reference: a type definition plus nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub ty: EdmType,
    pub nullable: bool,
}

impl TypeRef {
    pub fn new(ty: EdmType, nullable: bool) -> Self {
        Self { ty, nullable }
    }

    pub fn primitive(kind: PrimitiveKind, nullable: bool) -> Self {
        Self::new(EdmType::Primitive(kind), nullable)
    }

    pub fn boolean(nullable: bool) -> Self {
        Self::primitive(PrimitiveKind::Boolean, nullable)
    }

    pub fn entity(name: impl Into<SmolStr>, nullable: bool) -> Self {
        Self::new(EdmType::Entity(name.into()), nullable)
    }

    pub fn complex(name: impl Into<SmolStr>, nullable: bool) -> Self {
        Self::new(EdmType::Complex(name.into()), nullable)
    }

    /// Wraps `element` in a freshly built, non-nullable collection type.
    pub fn collection(element: TypeRef) -> Self {
        Self::new(EdmType::Collection(Box::new(element)), false)
    }

    /// Returns a copy with the given nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match &self.ty {
            EdmType::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Qualified name of the entity type, if this is an entity reference.
    pub fn as_entity(&self) -> Option<&SmolStr> {
        match &self.ty {
            EdmType::Entity(name) => Some(name),
            _ => None,
        }
    }

    /// Qualified name of the entity or complex type.
    pub fn structured_name(&self) -> Option<&SmolStr> {
        match &self.ty {
            EdmType::Entity(name) | EdmType::Complex(name) => Some(name),
            _ => None,
        }
    }

    /// Element type of a collection reference.
    pub fn element_type(&self) -> Option<&TypeRef> {
        match &self.ty {
            EdmType::Collection(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.ty, EdmType::Collection(_))
    }

    pub fn is_entity(&self) -> bool {
        matches!(self.ty, EdmType::Entity(_))
    }

    pub fn is_complex(&self) -> bool {
        matches!(self.ty, EdmType::Complex(_))
    }

    pub fn is_boolean(&self) -> bool {
        self.as_primitive() == Some(PrimitiveKind::Boolean)
    }

    pub fn is_numeric(&self) -> bool {
        self.as_primitive().is_some_and(PrimitiveKind::is_numeric)
    }

    /// True when this is a collection whose element is an entity type.
    pub fn is_entity_collection(&self) -> bool {
        self.element_type().is_some_and(TypeRef::is_entity)
    }

    /// Human-readable type name used in diagnostics.
    pub fn name(&self) -> SmolStr {
        match &self.ty {
            EdmType::Primitive(kind) => SmolStr::new_static(kind.name()),
            EdmType::Entity(name) | EdmType::Complex(name) => name.clone(),
            EdmType::Collection(element) => format!("Collection({})", element.name()).into(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())?;
        if self.nullable && !self.is_collection() {
            f.write_str("?")?;
        }
        Ok(())
    }
}
