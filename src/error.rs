//! Construction errors for the semantic model.
//!
//! Every constructor in this crate is fail-fast: it either returns a fully
//! validated value or one of these errors, carrying the offending identifiers
//! and type names so a caller can render a diagnostic without re-walking the
//! tree. [`UriError::kind`] classifies each error into the coarse taxonomy
//! callers translate into protocol-level error payloads.

use crate::schema::Multiplicity;
use miette::Diagnostic;
use smol_str::SmolStr;
use std::fmt;
use thiserror::Error;

/// Coarse error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Types, casts, multiplicities or schema members do not line up.
    SchemaMismatch,
    /// A raw token or segment sequence violates its syntactic shape.
    MalformedToken,
    /// The caller broke the two-phase select/expand protocol.
    ProtocolMisuse,
    /// A required argument was missing or empty.
    NullArgument,
    /// A caller-side size or depth guard rejected the request.
    LimitExceeded,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::SchemaMismatch => "SchemaMismatch",
            ErrorKind::MalformedToken => "MalformedToken",
            ErrorKind::ProtocolMisuse => "ProtocolMisuse",
            ErrorKind::NullArgument => "NullArgument",
            ErrorKind::LimitExceeded => "LimitExceeded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error raised when a path segment, query node or select/expand clause
/// cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum UriError {
    #[error("operands of '{operator}' must have equivalent types, found '{left}' and '{right}'")]
    #[diagnostic(
        code(odata::schema::operand_types),
        help("convert one operand so both sides share a type")
    )]
    IncompatibleOperandTypes {
        operator: SmolStr,
        left: SmolStr,
        right: SmolStr,
    },

    #[error("operator '{operator}' cannot be applied to an operand of type '{type_name}'")]
    #[diagnostic(code(odata::schema::operand_type))]
    UnsupportedOperandType { operator: SmolStr, type_name: SmolStr },

    #[error("{context}: type '{target_type}' is not related to '{source_type}'")]
    #[diagnostic(
        code(odata::schema::unrelated_types),
        help("a cast target must derive from, or be a base of, the source type")
    )]
    UnrelatedTypes {
        context: &'static str,
        source_type: SmolStr,
        target_type: SmolStr,
    },

    #[error("navigation '{navigation}' has multiplicity {multiplicity} and cannot produce a {expected} result")]
    #[diagnostic(code(odata::schema::multiplicity))]
    MultiplicityMismatch {
        navigation: SmolStr,
        expected: &'static str,
        multiplicity: Multiplicity,
    },

    #[error("unknown {element} '{name}'")]
    #[diagnostic(code(odata::schema::unknown_element))]
    UnknownSchemaElement { element: &'static str, name: SmolStr },

    #[error("property '{property}' of type '{type_name}' cannot be accessed as a {expected} value")]
    #[diagnostic(code(odata::schema::property_shape))]
    PropertyShapeMismatch {
        property: SmolStr,
        type_name: SmolStr,
        expected: &'static str,
    },

    #[error("{context} requires an entity-typed source, found '{type_name}'")]
    #[diagnostic(code(odata::schema::not_an_entity))]
    NotAnEntity { context: &'static str, type_name: SmolStr },

    #[error("{context} must not be entity-typed, found '{type_name}'")]
    #[diagnostic(code(odata::schema::unexpected_entity))]
    UnexpectedEntity { context: &'static str, type_name: SmolStr },

    #[error("{context} must be a Boolean expression, found '{type_name}'")]
    #[diagnostic(code(odata::schema::not_boolean))]
    NonBooleanExpression { context: &'static str, type_name: SmolStr },

    #[error("$value cannot follow the collection-valued segment '{previous}'")]
    #[diagnostic(code(odata::schema::value_on_collection))]
    ValueOnCollection { previous: SmolStr },

    #[error("key for '{entity_type}' is invalid: {reason}")]
    #[diagnostic(code(odata::schema::key))]
    InvalidKey { entity_type: SmolStr, reason: String },

    #[error("content-id '{content_id}' is not a valid batch request reference")]
    #[diagnostic(
        code(odata::token::content_id),
        help("content-ids consist of letters, digits, '-', '.', '_' and '~' only")
    )]
    InvalidContentId { content_id: SmolStr },

    #[error("invalid expand path: {reason}")]
    #[diagnostic(
        code(odata::token::expand_path),
        help("an expand path is zero or more type casts followed by exactly one navigation property")
    )]
    InvalidExpandPath { reason: String },

    #[error("invalid select path: {reason}")]
    #[diagnostic(code(odata::token::select_path))]
    InvalidSelectPath { reason: String },

    #[error("invalid resource path: {reason}")]
    #[diagnostic(code(odata::token::resource_path))]
    InvalidResourcePath { reason: String },

    #[error("'{text}' is not a valid literal: {reason}")]
    #[diagnostic(code(odata::token::literal))]
    InvalidLiteral { text: SmolStr, reason: &'static str },

    #[error("'{alias}' is not a valid parameter alias")]
    #[diagnostic(code(odata::token::parameter_alias), help("parameter aliases start with '@'"))]
    InvalidParameterAlias { alias: SmolStr },

    #[error("selected items have already been computed for this clause")]
    #[diagnostic(code(odata::protocol::already_computed))]
    SelectedItemsAlreadyComputed,

    #[error("selected items have not been computed yet")]
    #[diagnostic(
        code(odata::protocol::not_computed),
        help("call compute_final_selected_items once the whole query string has been walked")
    )]
    SelectedItemsNotComputed,

    #[error("select/expand clause is finalized and can no longer be modified")]
    #[diagnostic(code(odata::protocol::finalized))]
    SelectionFinalized,

    #[error("required argument '{argument}' is missing or empty")]
    #[diagnostic(code(odata::argument::missing))]
    MissingArgument { argument: &'static str },

    #[error("{limit} limit exceeded: {actual} > {max}")]
    #[diagnostic(code(odata::limit::exceeded))]
    LimitExceeded {
        limit: &'static str,
        max: usize,
        actual: usize,
    },
}

impl UriError {
    /// Classifies this error into the coarse taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UriError::IncompatibleOperandTypes { .. }
            | UriError::UnsupportedOperandType { .. }
            | UriError::UnrelatedTypes { .. }
            | UriError::MultiplicityMismatch { .. }
            | UriError::UnknownSchemaElement { .. }
            | UriError::PropertyShapeMismatch { .. }
            | UriError::NotAnEntity { .. }
            | UriError::UnexpectedEntity { .. }
            | UriError::NonBooleanExpression { .. }
            | UriError::ValueOnCollection { .. }
            | UriError::InvalidKey { .. } => ErrorKind::SchemaMismatch,
            UriError::InvalidContentId { .. }
            | UriError::InvalidExpandPath { .. }
            | UriError::InvalidSelectPath { .. }
            | UriError::InvalidResourcePath { .. }
            | UriError::InvalidLiteral { .. }
            | UriError::InvalidParameterAlias { .. } => ErrorKind::MalformedToken,
            UriError::SelectedItemsAlreadyComputed
            | UriError::SelectedItemsNotComputed
            | UriError::SelectionFinalized => ErrorKind::ProtocolMisuse,
            UriError::MissingArgument { .. } => ErrorKind::NullArgument,
            UriError::LimitExceeded { .. } => ErrorKind::LimitExceeded,
        }
    }

    pub(crate) fn incompatible_operands(
        operator: impl fmt::Display,
        left: SmolStr,
        right: SmolStr,
    ) -> Self {
        UriError::IncompatibleOperandTypes {
            operator: operator.to_string().into(),
            left,
            right,
        }
    }

    pub(crate) fn unrelated(context: &'static str, source_type: SmolStr, target_type: SmolStr) -> Self {
        UriError::UnrelatedTypes {
            context,
            source_type,
            target_type,
        }
    }

    pub(crate) fn unknown(element: &'static str, name: impl Into<SmolStr>) -> Self {
        UriError::UnknownSchemaElement {
            element,
            name: name.into(),
        }
    }

    pub(crate) fn missing(argument: &'static str) -> Self {
        UriError::MissingArgument { argument }
    }

    pub(crate) fn expand_path(reason: impl Into<String>) -> Self {
        UriError::InvalidExpandPath {
            reason: reason.into(),
        }
    }

    pub(crate) fn select_path(reason: impl Into<String>) -> Self {
        UriError::InvalidSelectPath {
            reason: reason.into(),
        }
    }

    pub(crate) fn resource_path(reason: impl Into<String>) -> Self {
        UriError::InvalidResourcePath {
            reason: reason.into(),
        }
    }

    /// Logs the rejection and hands the error back, for use in `map_err`/`Err(..)`.
    pub(crate) fn rejected(self, constructor: &'static str) -> Self {
        tracing::debug!(constructor, kind = %self.kind(), error = %self, "construction rejected");
        self
    }
}

/// Result type for semantic model construction.
pub type Result<T> = std::result::Result<T, UriError>;

/// Rejects empty identifiers.
pub(crate) fn require_identifier(value: &str, argument: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(UriError::missing(argument).rejected(argument));
    }
    Ok(())
}
