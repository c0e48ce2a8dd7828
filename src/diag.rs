//! Rendering construction errors against the request URL.
//!
//! The semantic model reports failures as [`UriError`] values and knows
//! nothing about where a token sat in the URL. The grammar layer that drove
//! construction does: it turns the error into a [`Diag`], points labels at the
//! offending tokens of the [`RequestUrl`], and renders a miette [`Report`].

use crate::error::{ErrorKind, UriError};
use miette::{Diagnostic, LabeledSpan, NamedSource, Report, Severity};
use std::fmt;
use std::ops::Range;

/// Byte range within the request URL.
pub type Span = Range<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    Primary,
    Secondary,
}

/// Text attached to a span of the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    pub span: Span,
    pub message: String,
    pub role: LabelRole,
}

/// A construction error prepared for display.
///
/// Message, code and help are taken from the error; labels and notes are
/// added by whoever knows the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub kind: ErrorKind,
    pub message: String,
    /// Stable code, e.g. `odata::schema::operand_types`.
    pub code: Option<String>,
    pub help: Option<String>,
    pub labels: Vec<DiagLabel>,
    pub notes: Vec<String>,
}

impl Diag {
    pub fn from_error(error: &UriError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            code: error.code().map(|code| code.to_string()),
            help: error.help().map(|help| help.to_string()),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_primary_label(self, span: Span, message: impl Into<String>) -> Self {
        self.label(span, message.into(), LabelRole::Primary)
    }

    pub fn with_secondary_label(self, span: Span, message: impl Into<String>) -> Self {
        self.label(span, message.into(), LabelRole::Secondary)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    fn label(mut self, span: Span, message: String, role: LabelRole) -> Self {
        self.labels.push(DiagLabel { span, message, role });
        self
    }
}

impl From<&UriError> for Diag {
    fn from(error: &UriError) -> Self {
        Diag::from_error(error)
    }
}

/// The raw request URL, optionally named (`request`, `batch part 3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    text: String,
    name: Option<String>,
}

impl RequestUrl {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            name: None,
        }
    }

    pub fn named(text: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            name: Some(name.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Span of the first occurrence of `token` at or after byte `from`.
    pub fn span_of(&self, token: &str, from: usize) -> Option<Span> {
        let start = from + self.text.get(from..)?.find(token)?;
        Some(start..start + token.len())
    }

    /// Pulls `span` inside the URL; an inverted span collapses to its start.
    pub fn clamp(&self, span: &Span) -> Span {
        let start = span.start.min(self.text.len());
        start..span.end.clamp(start, self.text.len())
    }
}

/// Renders one diagnostic. Spans outside the URL are clamped.
pub fn render(diag: &Diag, url: &RequestUrl) -> Report {
    let rendered = Rendered {
        message: diag.message.clone(),
        code: diag.code.clone(),
        help: diag.help.clone(),
        labels: diag
            .labels
            .iter()
            .map(|label| {
                let span = url.clamp(&label.span);
                let offset = (span.start, span.len());
                let text = Some(label.message.clone());
                match label.role {
                    LabelRole::Primary => LabeledSpan::new_primary_with_span(text, offset),
                    LabelRole::Secondary => LabeledSpan::new_with_span(text, offset),
                }
            })
            .collect(),
        notes: std::iter::once(format!("kind: {}", diag.kind))
            .chain(diag.notes.iter().cloned())
            .map(Note)
            .collect(),
    };
    let report = Report::new(rendered);
    match url.name() {
        Some(name) => report.with_source_code(NamedSource::new(name, url.as_str().to_string())),
        None => report.with_source_code(url.as_str().to_string()),
    }
}

/// Renders every diagnostic against the same URL.
pub fn render_all(diags: &[Diag], url: &RequestUrl) -> Vec<Report> {
    diags.iter().map(|diag| render(diag, url)).collect()
}

/// Shorthand for an error whose offending token is known by its text.
///
/// Falls back to an unlabeled report when `token` does not occur in the URL.
pub fn render_error(error: &UriError, url: &RequestUrl, token: &str) -> Report {
    let diag = Diag::from(error);
    let diag = match url.span_of(token, 0) {
        Some(span) => diag.with_primary_label(span, "here"),
        None => diag,
    };
    render(&diag, url)
}

#[derive(Debug)]
struct Rendered {
    message: String,
    code: Option<String>,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
    notes: Vec<Note>,
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Rendered {}

impl Diagnostic for Rendered {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = self.code.as_ref()?;
        Some(Box::new(code) as Box<dyn fmt::Display + 'a>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = self.help.as_ref()?;
        Some(Box::new(help) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            return None;
        }
        Some(Box::new(self.labels.iter().cloned()))
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        Some(Box::new(self.notes.iter().map(|note| note as &dyn Diagnostic)))
    }
}

/// Advice attached below the main message.
#[derive(Debug)]
struct Note(String);

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Note {}

impl Diagnostic for Note {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Advice)
    }
}
