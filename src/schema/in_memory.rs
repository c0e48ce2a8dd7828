//! In-memory schema oracle.

use super::model::{ComplexType, EntitySet, EntityType, Operation};
use super::SchemaOracle;
use smol_str::SmolStr;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory schema oracle.
///
/// Suitable for unit tests, integration tests, and embedders that assemble
/// their model in code. Types and operations are keyed by qualified name,
/// entity sets by their container-local name.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchema {
    entity_types: HashMap<SmolStr, Arc<EntityType>>,
    complex_types: HashMap<SmolStr, Arc<ComplexType>>,
    entity_sets: HashMap<SmolStr, Arc<EntitySet>>,
    operations: HashMap<SmolStr, Arc<Operation>>,
}

impl InMemorySchema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity type.
    pub fn add_entity_type(&mut self, entity_type: EntityType) -> Arc<EntityType> {
        let entity_type = Arc::new(entity_type);
        self.entity_types
            .insert(entity_type.qualified_name(), Arc::clone(&entity_type));
        entity_type
    }

    /// Adds a complex type.
    pub fn add_complex_type(&mut self, complex_type: ComplexType) -> Arc<ComplexType> {
        let complex_type = Arc::new(complex_type);
        self.complex_types
            .insert(complex_type.qualified_name(), Arc::clone(&complex_type));
        complex_type
    }

    /// Adds an entity set.
    pub fn add_entity_set(&mut self, entity_set: EntitySet) -> Arc<EntitySet> {
        let entity_set = Arc::new(entity_set);
        self.entity_sets
            .insert(entity_set.name.clone(), Arc::clone(&entity_set));
        entity_set
    }

    /// Adds an operation.
    pub fn add_operation(&mut self, operation: Operation) -> Arc<Operation> {
        let operation = Arc::new(operation);
        self.operations
            .insert(operation.qualified_name(), Arc::clone(&operation));
        operation
    }

    /// Number of registered entity types.
    pub fn entity_type_count(&self) -> usize {
        self.entity_types.len()
    }
}

impl SchemaOracle for InMemorySchema {
    fn resolve_entity_set(&self, name: &str) -> Option<Arc<EntitySet>> {
        self.entity_sets.get(name).cloned()
    }

    fn resolve_entity_type(&self, name: &str) -> Option<Arc<EntityType>> {
        self.entity_types.get(name).cloned()
    }

    fn resolve_complex_type(&self, name: &str) -> Option<Arc<ComplexType>> {
        self.complex_types.get(name).cloned()
    }

    fn resolve_operation(&self, name: &str) -> Option<Arc<Operation>> {
        self.operations.get(name).cloned()
    }
}
