//! Per-kind dispatch over path segments.
//!
//! [`PathSegmentVisitor`] has one required method per segment kind, so adding
//! a segment kind is a compile error in every visitor until it is handled.

use super::segment::{
    BatchReferenceSegment, BatchSegment, CountSegment, EntitySetSegment, KeySegment,
    MetadataSegment, NavigationPropertyLinkSegment, NavigationPropertySegment, OpenPropertySegment,
    OperationSegment, PathSegment, PropertySegment, TypeSegment, ValueSegment,
};

/// Handler for every kind of path segment.
pub trait PathSegmentVisitor {
    type Output;

    fn visit_entity_set(&mut self, segment: &EntitySetSegment) -> Self::Output;
    fn visit_key(&mut self, segment: &KeySegment) -> Self::Output;
    fn visit_property(&mut self, segment: &PropertySegment) -> Self::Output;
    fn visit_open_property(&mut self, segment: &OpenPropertySegment) -> Self::Output;
    fn visit_navigation(&mut self, segment: &NavigationPropertySegment) -> Self::Output;
    fn visit_navigation_link(&mut self, segment: &NavigationPropertyLinkSegment) -> Self::Output;
    fn visit_type_cast(&mut self, segment: &TypeSegment) -> Self::Output;
    fn visit_value(&mut self, segment: &ValueSegment) -> Self::Output;
    fn visit_batch_reference(&mut self, segment: &BatchReferenceSegment) -> Self::Output;
    fn visit_operation(&mut self, segment: &OperationSegment) -> Self::Output;
    fn visit_count(&mut self, segment: &CountSegment) -> Self::Output;
    fn visit_metadata(&mut self, segment: &MetadataSegment) -> Self::Output;
    fn visit_batch(&mut self, segment: &BatchSegment) -> Self::Output;
}

impl PathSegment {
    /// Forwards to the visitor method matching this segment's kind.
    pub fn accept<V: PathSegmentVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            PathSegment::EntitySet(s) => visitor.visit_entity_set(s),
            PathSegment::Key(s) => visitor.visit_key(s),
            PathSegment::Property(s) => visitor.visit_property(s),
            PathSegment::OpenProperty(s) => visitor.visit_open_property(s),
            PathSegment::Navigation(s) => visitor.visit_navigation(s),
            PathSegment::NavigationLink(s) => visitor.visit_navigation_link(s),
            PathSegment::TypeCast(s) => visitor.visit_type_cast(s),
            PathSegment::Value(s) => visitor.visit_value(s),
            PathSegment::BatchReference(s) => visitor.visit_batch_reference(s),
            PathSegment::Operation(s) => visitor.visit_operation(s),
            PathSegment::Count(s) => visitor.visit_count(s),
            PathSegment::Metadata(s) => visitor.visit_metadata(s),
            PathSegment::Batch(s) => visitor.visit_batch(s),
        }
    }
}

/// Renders segments back into resource-path text.
///
/// Key segments attach to the previous segment (`Customers(1)`); every other
/// segment starts a new `/`-separated step.
#[derive(Debug, Default)]
pub struct ResourcePathWriter {
    out: String,
}

impl ResourcePathWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn step(&mut self, text: &str) {
        if !self.out.is_empty() {
            self.out.push('/');
        }
        self.out.push_str(text);
    }
}

impl PathSegmentVisitor for ResourcePathWriter {
    type Output = ();

    fn visit_entity_set(&mut self, segment: &EntitySetSegment) {
        self.step(&segment.entity_set().name);
    }

    fn visit_key(&mut self, segment: &KeySegment) {
        self.out.push('(');
        self.out.push_str(segment.identifier());
        self.out.push(')');
    }

    fn visit_property(&mut self, segment: &PropertySegment) {
        self.step(&segment.property().name);
    }

    fn visit_open_property(&mut self, segment: &OpenPropertySegment) {
        self.step(segment.name());
    }

    fn visit_navigation(&mut self, segment: &NavigationPropertySegment) {
        self.step(&segment.navigation().name);
    }

    fn visit_navigation_link(&mut self, segment: &NavigationPropertyLinkSegment) {
        self.step(&segment.navigation().name);
        self.step("$ref");
    }

    fn visit_type_cast(&mut self, segment: &TypeSegment) {
        self.step(segment.type_name());
    }

    fn visit_value(&mut self, _segment: &ValueSegment) {
        self.step(ValueSegment::IDENTIFIER);
    }

    fn visit_batch_reference(&mut self, segment: &BatchReferenceSegment) {
        self.step(&format!("${}", segment.content_id()));
    }

    fn visit_operation(&mut self, segment: &OperationSegment) {
        self.step(&segment.operation().qualified_name());
    }

    fn visit_count(&mut self, _segment: &CountSegment) {
        self.step(CountSegment::IDENTIFIER);
    }

    fn visit_metadata(&mut self, _segment: &MetadataSegment) {
        self.step(MetadataSegment::IDENTIFIER);
    }

    fn visit_batch(&mut self, _segment: &BatchSegment) {
        self.step(BatchSegment::IDENTIFIER);
    }
}
