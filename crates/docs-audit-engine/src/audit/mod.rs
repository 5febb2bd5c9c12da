//! # Audit Orchestration
//!
//! [`Auditor::verify`] runs the whole pipeline for one document: segment,
//! resolve metadata, select rules by topic, evaluate them and sort the
//! results by rule number.

pub mod diagnostics;
pub mod sink;

pub use diagnostics::{
    Diagnostic, DiagnosticsSink, LineIndex, Position, Severity, diagnostics_for,
    publish_diagnostics,
};
pub use sink::{AuditLog, LogForwarder};

use crate::{
    metadata::{
        Metadata, MetadataReplacement, extract_metadata, get_metadata, read_metadata,
    },
    parsing::{blocks::AllInnerBlocks, split_content_into_blocks},
    rules::{AuditContext, AuditEntry, RuleRegistry, RuleTest},
};

/// The rule set used when none is configured.
pub const DEFAULT_RULE_SET: &str = "MVC";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditOptions {
    /// Only rules of this set run.
    pub rule_set: String,
    /// Segment with strict block recognition.
    pub strict: bool,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            rule_set: DEFAULT_RULE_SET.to_string(),
            strict: false,
        }
    }
}

/// A document to audit, with the metadata the host layers around it.
#[derive(Debug, Clone, Default)]
pub struct SourceDocument {
    pub file_name: String,
    pub text: String,
    /// Values that win over the document's own metadata.
    pub overrides: Vec<MetadataReplacement>,
    /// Values used only where the document has none (e.g. docfx globals).
    pub defaults: Metadata,
}

impl SourceDocument {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_overrides(mut self, overrides: Vec<MetadataReplacement>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_defaults(mut self, defaults: Metadata) -> Self {
        self.defaults = defaults;
        self
    }

    /// The document's effective metadata.
    ///
    /// Front matter is read first; when it fails to parse or has no keys the
    /// heuristic scan is used instead. Overrides then replace values and
    /// defaults fill in what is still missing.
    pub fn resolve_metadata(&self) -> Metadata {
        let front_matter = get_metadata(&self.text, &self.file_name);
        let mut metadata = match read_metadata(&front_matter) {
            Ok(m) if !m.is_empty() => m,
            Ok(_) => extract_metadata(&self.text),
            Err(e) => {
                log::warn!("{}: {e}; using heuristic metadata", self.file_name);
                extract_metadata(&self.text)
            }
        };
        metadata.apply_overrides(self.overrides.iter().map(|r| (r.kind.as_str(), r.value())));
        metadata.apply_defaults(&self.defaults);
        metadata
    }
}

/// Runs the applicable rules of a registry against documents.
#[derive(Debug)]
pub struct Auditor<'r> {
    registry: &'r RuleRegistry,
    options: AuditOptions,
}

impl<'r> Auditor<'r> {
    pub fn new(registry: &'r RuleRegistry, options: AuditOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &AuditOptions {
        &self.options
    }

    /// Audits `doc`, returning entries sorted by rule number.
    pub fn verify(&self, doc: &SourceDocument) -> Vec<AuditEntry> {
        self.verify_with_log(doc, &mut Vec::new())
    }

    /// Like [`verify`](Self::verify), also writing the audit trace to `out`.
    ///
    /// A rule that fails to evaluate is logged and contributes no entries;
    /// the other rules still run.
    pub fn verify_with_log(&self, doc: &SourceDocument, out: &mut dyn AuditLog) -> Vec<AuditEntry> {
        let rule_set = self.options.rule_set.as_str();
        out.append_line(&format!("Verifying file: {}", doc.file_name));

        let blocks = split_content_into_blocks(&doc.file_name, &doc.text, self.options.strict);
        let all_blocks: Vec<_> = AllInnerBlocks::over(&blocks).collect();
        let metadata = doc.resolve_metadata();

        let Some(topic) = metadata.topic() else {
            out.append_line(&format!("No MS.Topic detected for {rule_set} guidance"));
            return vec![];
        };

        let rules = self.registry.applicable(rule_set, topic);
        if rules.is_empty() {
            out.append_line(&format!("No {rule_set} Guidance for {topic}"));
            return vec![];
        }
        log::debug!("{}: running {} rules for topic {topic}", doc.file_name, rules.len());

        let ctx = AuditContext {
            blocks: &blocks,
            file_name: &doc.file_name,
            metadata: &metadata,
            raw_text: &doc.text,
            all_blocks: &all_blocks,
        };

        let mut entries = vec![];
        for rule in rules {
            match rule.test(&ctx) {
                Ok(found) => entries.extend(found),
                Err(e) => {
                    log::warn!("{}: {e}", doc.file_name);
                    out.append_line(&e.to_string());
                }
            }
        }

        // Stable: entries of one rule keep their order.
        entries.sort_by_key(|e| e.rule_num);
        for entry in &entries {
            out.append_line(&format!("{}: {}", entry.title, entry.success));
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        parsing::rope::span::Span,
        rules::{AuditRule, Outcome, RuleError},
    };
    use pretty_assertions::assert_eq;

    fn failing(rule_num: u32, title: &str) -> AuditRule {
        AuditRule::from_fn(rule_num, "MVC", "overview", title, |_| Ok(Outcome::Fail(vec![])))
    }

    #[test]
    fn missing_topic_runs_nothing() {
        let registry = RuleRegistry::with_rules(vec![failing(1, "a")]);
        let auditor = Auditor::new(&registry, AuditOptions::default());
        let mut out = vec![];
        let entries = auditor.verify_with_log(&SourceDocument::new("a.md", "# T"), &mut out);
        assert!(entries.is_empty());
        assert_eq!(
            out,
            vec![
                "Verifying file: a.md".to_string(),
                "No MS.Topic detected for MVC guidance".to_string(),
            ]
        );
    }

    #[test]
    fn topic_without_rules() {
        let registry = RuleRegistry::with_rules(vec![failing(1, "a")]);
        let auditor = Auditor::new(&registry, AuditOptions::default());
        let mut out = vec![];
        let doc = SourceDocument::new("a.md", "---\nms.topic: tutorial\n---\n");
        assert!(auditor.verify_with_log(&doc, &mut out).is_empty());
        assert_eq!(out.last().map(String::as_str), Some("No MVC Guidance for tutorial"));
    }

    #[test]
    fn failing_rule_is_isolated() {
        let registry = RuleRegistry::with_rules(vec![
            AuditRule::from_fn(1, "MVC", "overview", "boom", |_| {
                Err(RuleError::Evaluation {
                    rule_num: 1,
                    message: "boom".into(),
                })
            }),
            failing(2, "still runs"),
        ]);
        let auditor = Auditor::new(&registry, AuditOptions::default());
        let mut out = vec![];
        let doc = SourceDocument::new("a.md", "---\nms.topic: overview\n---\n");
        let entries = auditor.verify_with_log(&doc, &mut out);
        assert_eq!(entries, vec![AuditEntry::fail(2, "still runs", vec![Span::point(0)])]);
        assert!(out.contains(&"rule 1 failed: boom".to_string()));
        assert_eq!(out.last().map(String::as_str), Some("still runs: false"));
    }

    #[test]
    fn overrides_beat_front_matter_and_defaults_fill_gaps() {
        let doc = SourceDocument::new("a.md", "---\nms.topic: overview\nauthor: me\n---\n")
            .with_overrides(vec![MetadataReplacement::new("ms.topic", "ms.topic: quickstart")])
            .with_defaults([("author", "docfx"), ("ms.service", "storage")].into_iter().collect());
        let m = doc.resolve_metadata();
        assert_eq!(m.topic(), Some("quickstart"));
        assert_eq!(m.get("author"), Some("me"));
        assert_eq!(m.get("ms.service"), Some("storage"));
    }

    #[test]
    fn unparseable_front_matter_falls_back_to_heuristics() {
        let doc = SourceDocument::new("a.md", "---\nms.topic: overview\ntitle: [broken\n---\n# T");
        let m = doc.resolve_metadata();
        assert_eq!(m.topic(), Some("overview"));
        assert_eq!(m.get("title"), Some("[broken"));
    }

    #[test]
    fn strict_option_reaches_the_segmenter() {
        let registry = RuleRegistry::with_rules(vec![AuditRule::from_fn(
            1,
            "MVC",
            "overview",
            "Has header",
            |ctx| {
                let found = ctx.blocks_of(crate::parsing::blocks::BlockKind::Header, None).count();
                Ok(if found > 0 {
                    Outcome::Pass(vec![])
                } else {
                    Outcome::Fail(vec![])
                })
            },
        )]);
        let doc = SourceDocument::new("a.md", "---\nms.topic: overview\n---\n#Title");
        let lenient = Auditor::new(&registry, AuditOptions::default());
        let strict = Auditor::new(
            &registry,
            AuditOptions {
                strict: true,
                ..AuditOptions::default()
            },
        );
        assert!(lenient.verify(&doc)[0].success);
        assert!(!strict.verify(&doc)[0].success);
    }
}
