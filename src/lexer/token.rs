//! Token automata for isolated literal and content-id tokens.

use logos::Logos;

/// Kinds of primitive literal accepted in `$filter`/`$orderby` and key values.
///
/// The grammar layer isolates a literal token; this automaton only decides
/// which primitive kind its text spells.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralToken {
    #[token("null")]
    Null,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[regex(r"-?[0-9]+")]
    Integer,

    #[regex(r"-?[0-9]+[lL]")]
    Int64,

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"-?[0-9]+[eE][+-]?[0-9]+")]
    Double,

    #[regex(r"-?[0-9]+(\.[0-9]+)?[fF]")]
    Single,

    #[regex(r"-?[0-9]+(\.[0-9]+)?[mM]")]
    Decimal,

    #[regex(r"'([^']|'')*'")]
    String,

    #[regex(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")]
    Guid,

    #[regex(r"[0-9]{4}-[0-9]{2}-[0-9]{2}")]
    Date,

    #[regex(r"[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}(:[0-9]{2}(\.[0-9]+)?)?(Z|[+-][0-9]{2}:[0-9]{2})")]
    DateTimeOffset,

    #[regex(r"[0-9]{2}:[0-9]{2}(:[0-9]{2}(\.[0-9]+)?)?")]
    TimeOfDay,

    #[regex(r"duration'-?P[0-9DTHMS.]+'")]
    Duration,
}

/// A batch request id: `1*unreserved` (RFC 3986 unreserved characters).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentIdToken {
    #[regex(r"[A-Za-z0-9._~-]+")]
    RequestId,
}
