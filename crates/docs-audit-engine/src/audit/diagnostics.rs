//! Editor diagnostics for failing audit entries.

use serde::Serialize;
use xi_rope::Rope;

use crate::{parsing::rope::span::Span, rules::AuditEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hint,
    Information,
    Warning,
    Error,
}

/// A message attached to a byte range of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub range: Span,
    pub message: String,
    pub severity: Severity,
    pub rule_num: u32,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            range: Span::default(),
            message: message.into(),
            severity,
            rule_num: 0,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn with_range(mut self, range: Span) -> Self {
        self.range = range;
        self
    }

    pub fn with_rule(mut self, rule_num: u32) -> Self {
        self.rule_num = rule_num;
        self
    }
}

/// Receives the diagnostics of one document, replacing any it had before.
pub trait DiagnosticsSink {
    fn publish(&mut self, document_id: &str, diagnostics: Vec<Diagnostic>);
}

impl DiagnosticsSink for Vec<(String, Vec<Diagnostic>)> {
    fn publish(&mut self, document_id: &str, diagnostics: Vec<Diagnostic>) {
        self.retain(|(id, _)| id != document_id);
        self.push((document_id.to_string(), diagnostics));
    }
}

/// One warning per offset range of every failing entry, titled with the
/// entry's title. A failing entry without ranges is reported at `[0, 0)`.
/// Passing entries produce nothing.
pub fn diagnostics_for(entries: &[AuditEntry]) -> Vec<Diagnostic> {
    entries
        .iter()
        .filter(|e| !e.success)
        .flat_map(|e| {
            let ranges = if e.indexes.is_empty() {
                vec![Span::point(0)]
            } else {
                e.indexes.clone()
            };
            ranges
                .into_iter()
                .map(|r| Diagnostic::warning(&e.title).with_range(r).with_rule(e.rule_num))
        })
        .collect()
}

/// Publishes the diagnostics of `entries` for `document_id`.
pub fn publish_diagnostics(
    document_id: &str,
    entries: &[AuditEntry],
    sink: &mut dyn DiagnosticsSink,
) {
    let diagnostics = diagnostics_for(entries);
    log::debug!("publishing {} diagnostics for {document_id}", diagnostics.len());
    sink.publish(document_id, diagnostics);
}

/// A zero-based line and column (in bytes) within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Converts byte offsets to positions.
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from(text),
        }
    }

    /// The position of `offset`, clamped to the end of the document.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len());
        let line = self.rope.line_of_offset(offset);
        let column = offset - self.rope.offset_of_line(line);
        Position { line, column }
    }

    pub fn range(&self, span: Span) -> (Position, Position) {
        (self.position(span.start), self.position(span.end))
    }
}
