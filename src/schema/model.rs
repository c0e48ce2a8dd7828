//! Schema metadata types consumed by the semantic model.
//!
//! These mirror the CSDL concepts the binder needs: entity and complex types
//! with inheritance, structural and navigation properties, entity sets with
//! navigation bindings, and operations.

use super::types::TypeRef;
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;

/// Cardinality of a navigation property's target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    One,
    ZeroOrOne,
    Many,
}

impl Multiplicity {
    /// True for `One` and `ZeroOrOne`.
    pub fn is_single(self) -> bool {
        !matches!(self, Multiplicity::Many)
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Multiplicity::One => f.write_str("1"),
            Multiplicity::ZeroOrOne => f.write_str("0..1"),
            Multiplicity::Many => f.write_str("*"),
        }
    }
}

/// A declared structural (primitive, complex or collection) property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuralProperty {
    pub name: SmolStr,
    pub type_ref: TypeRef,
}

impl StructuralProperty {
    pub fn new(name: impl Into<SmolStr>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
        }
    }
}

/// A declared navigation property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationProperty {
    pub name: SmolStr,
    /// Qualified name of the target entity type.
    pub target_type: SmolStr,
    pub multiplicity: Multiplicity,
    /// Name of the partner navigation on the target type, if declared.
    pub partner: Option<SmolStr>,
}

impl NavigationProperty {
    pub fn new(
        name: impl Into<SmolStr>,
        target_type: impl Into<SmolStr>,
        multiplicity: Multiplicity,
    ) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            multiplicity,
            partner: None,
        }
    }

    pub fn with_partner(mut self, partner: impl Into<SmolStr>) -> Self {
        self.partner = Some(partner.into());
        self
    }

    /// Type of the value reached through this navigation.
    pub fn type_ref(&self) -> TypeRef {
        let target = TypeRef::entity(
            self.target_type.clone(),
            self.multiplicity == Multiplicity::ZeroOrOne,
        );
        if self.multiplicity.is_single() {
            target
        } else {
            TypeRef::collection(target.with_nullable(false))
        }
    }
}

/// An entity type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityType {
    pub namespace: SmolStr,
    pub name: SmolStr,
    /// Qualified name of the base type.
    pub base_type: Option<SmolStr>,
    /// Declared key property names (empty on derived types).
    pub key: Vec<SmolStr>,
    pub properties: BTreeMap<SmolStr, StructuralProperty>,
    pub navigations: BTreeMap<SmolStr, NavigationProperty>,
    pub is_open: bool,
    pub has_stream: bool,
}

impl EntityType {
    pub fn new(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            base_type: None,
            key: Vec::new(),
            properties: BTreeMap::new(),
            navigations: BTreeMap::new(),
            is_open: false,
            has_stream: false,
        }
    }

    /// `Namespace.Name`.
    pub fn qualified_name(&self) -> SmolStr {
        qualify(&self.namespace, &self.name)
    }

    pub fn with_base(mut self, base: impl Into<SmolStr>) -> Self {
        self.base_type = Some(base.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<SmolStr>) -> Self {
        self.key.push(key.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<SmolStr>, type_ref: TypeRef) -> Self {
        let property = StructuralProperty::new(name, type_ref);
        self.properties.insert(property.name.clone(), property);
        self
    }

    pub fn with_navigation(mut self, navigation: NavigationProperty) -> Self {
        self.navigations.insert(navigation.name.clone(), navigation);
        self
    }

    pub fn open(mut self) -> Self {
        self.is_open = true;
        self
    }

    pub fn with_stream(mut self) -> Self {
        self.has_stream = true;
        self
    }

    /// A non-nullable reference to this type.
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::entity(self.qualified_name(), false)
    }
}

/// A complex type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexType {
    pub namespace: SmolStr,
    pub name: SmolStr,
    pub base_type: Option<SmolStr>,
    pub properties: BTreeMap<SmolStr, StructuralProperty>,
    pub is_open: bool,
}

impl ComplexType {
    pub fn new(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            base_type: None,
            properties: BTreeMap::new(),
            is_open: false,
        }
    }

    pub fn qualified_name(&self) -> SmolStr {
        qualify(&self.namespace, &self.name)
    }

    pub fn with_property(mut self, name: impl Into<SmolStr>, type_ref: TypeRef) -> Self {
        let property = StructuralProperty::new(name, type_ref);
        self.properties.insert(property.name.clone(), property);
        self
    }
}

/// An entity set in the entity container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySet {
    pub name: SmolStr,
    /// Qualified name of the element entity type.
    pub element_type: SmolStr,
    /// Navigation property name to target entity set name.
    pub navigation_bindings: BTreeMap<SmolStr, SmolStr>,
}

impl EntitySet {
    pub fn new(name: impl Into<SmolStr>, element_type: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            element_type: element_type.into(),
            navigation_bindings: BTreeMap::new(),
        }
    }

    pub fn with_binding(mut self, navigation: impl Into<SmolStr>, target: impl Into<SmolStr>) -> Self {
        self.navigation_bindings.insert(navigation.into(), target.into());
        self
    }

    /// A non-nullable reference to the element type.
    pub fn element_type_ref(&self) -> TypeRef {
        TypeRef::entity(self.element_type.clone(), false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Function,
    Action,
}

/// A function or action declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub namespace: SmolStr,
    pub name: SmolStr,
    pub kind: OperationKind,
    pub is_bound: bool,
    pub parameters: Vec<StructuralProperty>,
    pub return_type: Option<TypeRef>,
}

impl Operation {
    pub fn function(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self::new(namespace, name, OperationKind::Function)
    }

    pub fn action(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self::new(namespace, name, OperationKind::Action)
    }

    fn new(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>, kind: OperationKind) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            is_bound: false,
            parameters: Vec::new(),
            return_type: None,
        }
    }

    pub fn bound(mut self) -> Self {
        self.is_bound = true;
        self
    }

    pub fn with_parameter(mut self, name: impl Into<SmolStr>, type_ref: TypeRef) -> Self {
        self.parameters.push(StructuralProperty::new(name, type_ref));
        self
    }

    pub fn returns(mut self, type_ref: TypeRef) -> Self {
        self.return_type = Some(type_ref);
        self
    }

    pub fn qualified_name(&self) -> SmolStr {
        qualify(&self.namespace, &self.name)
    }
}

fn qualify(namespace: &str, name: &str) -> SmolStr {
    if namespace.is_empty() {
        SmolStr::new(name)
    } else {
        format!("{namespace}.{name}").into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::PrimitiveKind;

    #[test]
    fn navigation_type_follows_multiplicity() {
        let single = NavigationProperty::new("Customer", "Sales.Customer", Multiplicity::ZeroOrOne);
        assert_eq!(single.type_ref(), TypeRef::entity("Sales.Customer", true));

        let many = NavigationProperty::new("Orders", "Sales.Order", Multiplicity::Many);
        assert_eq!(
            many.type_ref(),
            TypeRef::collection(TypeRef::entity("Sales.Order", false))
        );
    }

    #[test]
    fn entity_type_builder_collects_members() {
        let ty = EntityType::new("Sales", "Customer")
            .with_key("Id")
            .with_property("Id", TypeRef::primitive(PrimitiveKind::Int32, false))
            .with_navigation(NavigationProperty::new("Orders", "Sales.Order", Multiplicity::Many));
        assert_eq!(ty.qualified_name(), "Sales.Customer");
        assert_eq!(ty.key, vec![SmolStr::new("Id")]);
        assert!(ty.properties.contains_key("Id"));
        assert!(ty.navigations.contains_key("Orders"));
    }

    #[test]
    fn empty_namespace_is_not_qualified() {
        assert_eq!(Operation::function("", "Top").qualified_name(), "Top");
    }
}
