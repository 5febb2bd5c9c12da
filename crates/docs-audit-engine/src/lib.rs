//! Structure parsing and rule auditing for Markdown and YAML documentation.
//!
//! - [`parsing`] splits a document into a tree of [`ContentBlock`]s.
//! - [`metadata`] reads front matter, with a heuristic fallback.
//! - [`rules`] loads rules once and evaluates them.
//! - [`audit`] ties these together in [`Auditor::verify`].

pub mod audit;
pub mod io;
pub mod metadata;
pub mod parsing;
pub mod rules;


// Re-export key types for easier usage
pub use audit::{
    AuditLog, AuditOptions, Auditor, Diagnostic, DiagnosticsSink, LineIndex, LogForwarder,
    Position, Severity, SourceDocument, diagnostics_for, publish_diagnostics,
};
pub use io::*;
pub use metadata::{
    DocFxConfig, Metadata, MetadataError, MetadataReplacement, extract_metadata, get_metadata,
    normalize_key, read_metadata,
};
pub use parsing::{
    SegmentedDocument,
    blocks::{AllInnerBlocks, BlockKind, ContentBlock},
    rope::span::Span,
    split_content_into_blocks,
};
pub use rules::{
    AuditContext, AuditEntry, AuditRule, Check, Outcome, RuleError, RuleLoadError, RuleRegistry,
    RuleSource, RuleTest, Strategy,
};
