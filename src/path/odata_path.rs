//! Validated segment sequences.
//!
//! Shape rules are checked when the sequence is built; a path that exists is a
//! path that satisfies them.

use super::segment::{NavigationPropertySegment, PathSegment, TypeSegment};
use super::visitor::{PathSegmentVisitor, ResourcePathWriter};
use crate::error::{Result, UriError};
use crate::schema::{EntitySet, TypeRef};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Resource path
// ============================================================================

/// The resource path of a request URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ODataPath {
    segments: Vec<PathSegment>,
}

impl ODataPath {
    pub fn new(segments: Vec<PathSegment>) -> Result<Self> {
        validate_resource_path(&segments).map_err(|error| error.rejected("ODataPath"))?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn first_segment(&self) -> &PathSegment {
        &self.segments[0]
    }

    pub fn last_segment(&self) -> &PathSegment {
        &self.segments[self.segments.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Type addressed by the whole path.
    pub fn target_type(&self) -> Option<TypeRef> {
        self.last_segment().target_type()
    }

    /// Entity set addressed by the whole path, when known.
    pub fn target_entity_set(&self) -> Option<&Arc<EntitySet>> {
        self.last_segment().target_entity_set()
    }

    /// Visits every segment in order.
    pub fn walk<V: PathSegmentVisitor + ?Sized>(&self, visitor: &mut V) -> Vec<V::Output> {
        self.segments.iter().map(|segment| segment.accept(visitor)).collect()
    }

    /// Renders the path back to resource-path text.
    pub fn to_resource_path(&self) -> String {
        let mut writer = ResourcePathWriter::new();
        self.walk(&mut writer);
        writer.finish()
    }
}

impl fmt::Display for ODataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_resource_path())
    }
}

fn validate_resource_path(segments: &[PathSegment]) -> Result<()> {
    if segments.is_empty() {
        return Err(UriError::resource_path("a path needs at least one segment"));
    }
    let last = segments.len() - 1;
    for (index, segment) in segments.iter().enumerate() {
        match segment {
            PathSegment::Metadata(_) | PathSegment::Batch(_) if segments.len() > 1 => {
                return Err(UriError::resource_path(format!(
                    "'{}' must be the only segment of a path",
                    segment.identifier()
                )));
            }
            PathSegment::Value(_) | PathSegment::Count(_) | PathSegment::NavigationLink(_)
                if index != last =>
            {
                return Err(UriError::resource_path(format!(
                    "'{}' must be the last segment of a path",
                    segment.identifier()
                )));
            }
            PathSegment::Key(_) | PathSegment::Count(_) => {
                let follows_collection = index > 0
                    && segments[index - 1]
                        .target_type()
                        .is_some_and(|ty| ty.is_collection());
                if !follows_collection {
                    let what = match segment {
                        PathSegment::Key(_) => "a key",
                        _ => "'$count'",
                    };
                    return Err(UriError::resource_path(format!(
                        "{what} must follow a collection-valued segment"
                    )));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

// ============================================================================
// Expand path
// ============================================================================

/// The path of one `$expand` item: type casts ending in one navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct ODataExpandPath {
    segments: Vec<PathSegment>,
}

impl ODataExpandPath {
    pub fn new(segments: Vec<PathSegment>) -> Result<Self> {
        validate_expand_path(&segments).map_err(|error| error.rejected("ODataExpandPath"))?;
        Ok(Self { segments })
    }

    /// Shorthand for a path made of a single navigation.
    pub fn from_navigation(navigation: NavigationPropertySegment) -> Self {
        Self {
            segments: vec![PathSegment::Navigation(navigation)],
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The terminal navigation.
    pub fn navigation(&self) -> Option<&NavigationPropertySegment> {
        match self.segments.last() {
            Some(PathSegment::Navigation(segment)) => Some(segment),
            _ => None,
        }
    }

    /// Leading type casts.
    pub fn type_casts(&self) -> impl Iterator<Item = &TypeSegment> {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::TypeCast(cast) => Some(cast),
            _ => None,
        })
    }

    pub fn to_resource_path(&self) -> String {
        let mut writer = ResourcePathWriter::new();
        for segment in &self.segments {
            segment.accept(&mut writer);
        }
        writer.finish()
    }
}

impl fmt::Display for ODataExpandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_resource_path())
    }
}

fn validate_expand_path(segments: &[PathSegment]) -> Result<()> {
    let Some((terminal, leading)) = segments.split_last() else {
        return Err(UriError::expand_path("the path is empty"));
    };
    if let Some(other) = leading
        .iter()
        .find(|segment| !matches!(segment, PathSegment::TypeCast(_)))
    {
        return Err(UriError::expand_path(format!(
            "only type casts may precede the navigation, found '{}'",
            other.identifier()
        )));
    }
    if !matches!(terminal, PathSegment::Navigation(_)) {
        return Err(UriError::expand_path(format!(
            "the path must end in a navigation property, found '{}'",
            terminal.identifier()
        )));
    }
    Ok(())
}

// ============================================================================
// Select path
// ============================================================================

/// The path of one `$select` item.
#[derive(Debug, Clone, PartialEq)]
pub struct ODataSelectPath {
    segments: Vec<PathSegment>,
}

impl ODataSelectPath {
    pub fn new(segments: Vec<PathSegment>) -> Result<Self> {
        validate_select_path(&segments).map_err(|error| error.rejected("ODataSelectPath"))?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn last_segment(&self) -> &PathSegment {
        &self.segments[self.segments.len() - 1]
    }

    pub fn to_resource_path(&self) -> String {
        let mut writer = ResourcePathWriter::new();
        for segment in &self.segments {
            segment.accept(&mut writer);
        }
        writer.finish()
    }
}

impl fmt::Display for ODataSelectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_resource_path())
    }
}

fn validate_select_path(segments: &[PathSegment]) -> Result<()> {
    let Some(last) = segments.len().checked_sub(1) else {
        return Err(UriError::select_path("the path is empty"));
    };
    for (index, segment) in segments.iter().enumerate() {
        match segment {
            PathSegment::TypeCast(_) if index == last => {
                return Err(UriError::select_path("a type cast cannot end the path"));
            }
            PathSegment::Navigation(_) | PathSegment::Operation(_) if index != last => {
                return Err(UriError::select_path(format!(
                    "'{}' may only appear as the last segment",
                    segment.identifier()
                )));
            }
            PathSegment::TypeCast(_)
            | PathSegment::Property(_)
            | PathSegment::OpenProperty(_)
            | PathSegment::Navigation(_)
            | PathSegment::Operation(_) => {}
            other => {
                return Err(UriError::select_path(format!(
                    "'{}' is not allowed in a select path",
                    other.identifier()
                )));
            }
        }
    }
    Ok(())
}
