//! Caller-side size limits.
//!
//! Constructors never consult these limits. A binder checks them explicitly
//! at the points where untrusted input could make a tree grow without bound.

use crate::error::{Result, UriError};
use crate::path::ODataPath;
use crate::select_expand::SelectExpandClause;

/// Limits applied while binding a request URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UriParserSettings {
    /// Maximum number of resource path segments.
    pub max_segment_count: usize,
    /// Maximum nesting of `$expand`.
    pub max_expand_depth: usize,
    /// Maximum number of expand items across the whole tree.
    pub max_expand_count: usize,
}

impl Default for UriParserSettings {
    fn default() -> Self {
        Self {
            max_segment_count: 100,
            max_expand_depth: 8,
            max_expand_count: 100,
        }
    }
}

impl UriParserSettings {
    /// Tight limits for public endpoints.
    pub fn strict() -> Self {
        Self {
            max_segment_count: 20,
            max_expand_depth: 2,
            max_expand_count: 10,
        }
    }

    /// Effectively unlimited.
    pub fn permissive() -> Self {
        Self {
            max_segment_count: usize::MAX,
            max_expand_depth: usize::MAX,
            max_expand_count: usize::MAX,
        }
    }

    pub fn with_max_segment_count(mut self, max: usize) -> Self {
        self.max_segment_count = max;
        self
    }

    pub fn with_max_expand_depth(mut self, max: usize) -> Self {
        self.max_expand_depth = max;
        self
    }

    pub fn with_max_expand_count(mut self, max: usize) -> Self {
        self.max_expand_count = max;
        self
    }

    /// Checks a raw segment count before segments are built.
    pub fn check_segment_count(&self, actual: usize) -> Result<()> {
        check("segment count", self.max_segment_count, actual)
    }

    pub fn check_path(&self, path: &ODataPath) -> Result<()> {
        self.check_segment_count(path.len())
    }

    /// Checks expansion depth and total expansion count of a finalized tree.
    pub fn check_select_expand(&self, clause: &SelectExpandClause) -> Result<()> {
        check("expand depth", self.max_expand_depth, clause.expand_depth())?;
        check("expand count", self.max_expand_count, clause.expand_count())
    }
}

fn check(limit: &'static str, max: usize, actual: usize) -> Result<()> {
    if actual > max {
        return Err(UriError::LimitExceeded { limit, max, actual }.rejected("UriParserSettings"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn presets_order_by_strictness() {
        let strict = UriParserSettings::strict();
        let default = UriParserSettings::default();
        let permissive = UriParserSettings::permissive();
        assert!(strict.max_expand_depth < default.max_expand_depth);
        assert!(default.max_expand_depth < permissive.max_expand_depth);
    }

    #[test]
    fn segment_count_guard() {
        let settings = UriParserSettings::default().with_max_segment_count(3);
        assert!(settings.check_segment_count(3).is_ok());
        let err = settings.check_segment_count(4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
        assert_eq!(
            err,
            UriError::LimitExceeded {
                limit: "segment count",
                max: 3,
                actual: 4
            }
        );
    }

    #[test]
    fn empty_clause_passes_any_limit() {
        let settings = UriParserSettings::default()
            .with_max_expand_depth(0)
            .with_max_expand_count(0);
        assert!(settings.check_select_expand(&SelectExpandClause::all()).is_ok());
    }
}
