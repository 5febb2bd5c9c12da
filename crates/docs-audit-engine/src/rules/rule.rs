use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    AuditContext, AuditEntry, RuleError, RuleLoadError, RuleTest,
    checks::{Check, Outcome, Strategy},
};
use crate::parsing::rope::span::Span;

/// A rule as written in rule JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDescriptor {
    pub rule_num: u32,
    pub rule_set: String,
    pub rule_group: String,
    #[serde(default)]
    pub depends_on: Option<u32>,
    pub title: String,
    pub check: Check,
}

/// A loaded rule: identity and selection fields plus its strategy.
pub struct AuditRule {
    pub rule_num: u32,
    pub rule_set: String,
    pub rule_group: String,
    pub depends_on: Option<u32>,
    pub title: String,
    strategy: Box<dyn Strategy>,
}

impl fmt::Debug for AuditRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditRule")
            .field("rule_num", &self.rule_num)
            .field("rule_set", &self.rule_set)
            .field("rule_group", &self.rule_group)
            .field("depends_on", &self.depends_on)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl AuditRule {
    pub fn new(
        rule_num: u32,
        rule_set: impl Into<String>,
        rule_group: impl Into<String>,
        title: impl Into<String>,
        strategy: impl Strategy + 'static,
    ) -> Self {
        Self {
            rule_num,
            rule_set: rule_set.into(),
            rule_group: rule_group.into(),
            depends_on: None,
            title: title.into(),
            strategy: Box::new(strategy),
        }
    }

    /// A rule whose strategy is a closure.
    pub fn from_fn<F>(
        rule_num: u32,
        rule_set: impl Into<String>,
        rule_group: impl Into<String>,
        title: impl Into<String>,
        f: F,
    ) -> Self
    where
        F: Fn(&AuditContext<'_>) -> Result<Outcome, RuleError> + Send + Sync + 'static,
    {
        Self::new(rule_num, rule_set, rule_group, title, f)
    }

    pub fn depending_on(mut self, rule_num: u32) -> Self {
        self.depends_on = Some(rule_num);
        self
    }

    pub fn from_descriptor(d: RuleDescriptor) -> Result<Self, RuleLoadError> {
        let strategy = d.check.compile(d.rule_num)?;
        Ok(Self {
            rule_num: d.rule_num,
            rule_set: d.rule_set,
            rule_group: d.rule_group,
            depends_on: d.depends_on,
            title: d.title,
            strategy,
        })
    }

    /// Whether this rule runs for `topic` in `rule_set`. Topics compare
    /// trimmed and case-insensitively; rules depending on another rule never
    /// run in a top-level pass.
    pub fn applies_to(&self, rule_set: &str, topic: &str) -> bool {
        self.rule_set == rule_set
            && self.rule_group.trim().to_lowercase() == topic.trim().to_lowercase()
            && self.depends_on.is_none()
    }

    fn checked(&self, span: Span, len: usize) -> Result<Span, RuleError> {
        if span.is_valid_for(len) {
            Ok(span)
        } else {
            Err(RuleError::SpanOutOfBounds {
                rule_num: self.rule_num,
                span,
                len,
            })
        }
    }
}

impl RuleTest for AuditRule {
    fn test(&self, ctx: &AuditContext<'_>) -> Result<Vec<AuditEntry>, RuleError> {
        let len = ctx.raw_text.len();
        let outcome = self.strategy.evaluate(ctx)?;
        let entries = match outcome {
            Outcome::Pass(spans) => {
                let spans = spans
                    .into_iter()
                    .map(|s| self.checked(s, len))
                    .collect::<Result<_, _>>()?;
                vec![AuditEntry::pass(self.rule_num, &self.title, spans)]
            }
            Outcome::Fail(spans) if spans.is_empty() => {
                vec![AuditEntry::fail(self.rule_num, &self.title, vec![Span::point(0)])]
            }
            Outcome::Fail(spans) => spans
                .into_iter()
                .map(|s| {
                    let s = self.checked(s, len)?;
                    Ok(AuditEntry::fail(self.rule_num, &self.title, vec![s]))
                })
                .collect::<Result<_, RuleError>>()?,
        };
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;
    use rstest::rstest;

    fn ctx_test(rule: &AuditRule, raw_text: &str) -> Result<Vec<AuditEntry>, RuleError> {
        let metadata = Metadata::new();
        let ctx = AuditContext {
            blocks: &[],
            file_name: "doc.md",
            metadata: &metadata,
            raw_text,
            all_blocks: &[],
        };
        rule.test(&ctx)
    }

    #[test]
    fn absence_fails_at_document_start() {
        let rule = AuditRule::from_fn(1, "MVC", "overview", "Has H1", |_| {
            Ok(Outcome::Fail(vec![]))
        });
        let entries = ctx_test(&rule, "text").unwrap();
        assert_eq!(entries, vec![AuditEntry::fail(1, "Has H1", vec![Span::point(0)])]);
    }

    #[test]
    fn one_failing_entry_per_violation() {
        let rule = AuditRule::from_fn(2, "MVC", "overview", "No TODO", |_| {
            Ok(Outcome::Fail(vec![Span::new(0, 1), Span::new(2, 3)]))
        });
        let entries = ctx_test(&rule, "a b").unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| !e.success && e.indexes.len() == 1));
    }

    #[test]
    fn out_of_bounds_spans_are_errors() {
        let rule = AuditRule::from_fn(3, "MVC", "overview", "Broken", |_| {
            Ok(Outcome::Pass(vec![Span::new(0, 99)]))
        });
        assert!(matches!(
            ctx_test(&rule, "short"),
            Err(RuleError::SpanOutOfBounds { rule_num: 3, .. })
        ));
    }

    #[test]
    fn topic_match_folds_non_ascii_case() {
        let rule = AuditRule::from_fn(1, "MVC", "Übersicht", "t", |_| Ok(Outcome::Pass(vec![])));
        assert!(rule.applies_to("MVC", "ÜBERSICHT"));
        assert!(rule.applies_to("MVC", "übersicht"));
    }

    #[rstest]
    #[case("MVC", "overview", true)]
    #[case("MVC", " Overview ", true)]
    #[case("MVC", "quickstart", false)]
    #[case("Other", "overview", false)]
    fn applicability(#[case] rule_set: &str, #[case] topic: &str, #[case] expected: bool) {
        let rule = AuditRule::from_fn(1, "MVC", "overview", "t", |_| {
            Ok(Outcome::Pass(vec![]))
        });
        assert_eq!(rule.applies_to(rule_set, topic), expected);
        assert!(!rule.depending_on(9).applies_to("MVC", "overview"));
    }

    #[test]
    fn descriptor_json_uses_camel_case() {
        let json = r#"{"ruleNum":4,"ruleSet":"MVC","ruleGroup":"how-to","dependsOn":null,
            "title":"Has steps","check":{"kind":"requireBlock","block":"NumberedList"}}"#;
        let d: RuleDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.rule_num, 4);
        assert_eq!(d.depends_on, None);
        assert_eq!(
            d.check,
            Check::RequireBlock {
                block: "NumberedList".into(),
                level: None,
                min: 1
            }
        );
        let rule = AuditRule::from_descriptor(d).unwrap();
        assert!(rule.applies_to("MVC", "How-To"));
    }
}
