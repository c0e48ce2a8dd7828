//! Path segment model.
//!
//! Turns resolved resource-path tokens into typed, immutable segments and
//! validates whole segment sequences.
//!
//! # Architecture
//!
//! - **Segments**: [`PathSegment`] and one struct per segment kind
//! - **Sequences**: [`ODataPath`], [`ODataExpandPath`], [`ODataSelectPath`]
//! - **Dispatch**: [`PathSegmentVisitor`], [`ResourcePathWriter`]

mod odata_path;
mod segment;
mod visitor;

pub use odata_path::{ODataExpandPath, ODataPath, ODataSelectPath};
pub use segment::{
    BatchReferenceSegment, BatchSegment, CountSegment, EntitySetSegment, KeySegment,
    MetadataSegment, NavigationPropertyLinkSegment, NavigationPropertySegment, OpenPropertySegment,
    OperationSegment, PathSegment, PropertySegment, ResultShape, TargetKind, TypeSegment,
    ValueSegment,
};
pub use visitor::{PathSegmentVisitor, ResourcePathWriter};
