//! Built-in rule strategies.
//!
//! A [`Check`] is the declarative form read from rule JSON. Compiling it
//! resolves block names and regexes once, yielding a [`Strategy`] that
//! evaluates a document without further parsing.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::{AuditContext, RuleError, RuleLoadError};
use crate::{
    metadata::normalize_key,
    parsing::{blocks::BlockKind, rope::span::Span},
};

/// Result of evaluating a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Spans justifying the pass.
    Pass(Vec<Span>),
    /// One span per violation. Empty means something required is absent.
    Fail(Vec<Span>),
}

/// How a rule decides pass or fail.
pub trait Strategy: Send + Sync {
    fn evaluate(&self, ctx: &AuditContext<'_>) -> Result<Outcome, RuleError>;
}

impl<F> Strategy for F
where
    F: Fn(&AuditContext<'_>) -> Result<Outcome, RuleError> + Send + Sync,
{
    fn evaluate(&self, ctx: &AuditContext<'_>) -> Result<Outcome, RuleError> {
        self(ctx)
    }
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Check {
    /// At least `min` blocks of a kind (and level) exist.
    RequireBlock {
        block: String,
        #[serde(default)]
        level: Option<u8>,
        #[serde(default = "one")]
        min: usize,
    },
    /// At most `max` blocks of a kind (and level) exist.
    MaxBlocks {
        block: String,
        #[serde(default)]
        level: Option<u8>,
        max: usize,
    },
    /// Every key is present with a non-empty value.
    RequireMetadata { keys: Vec<String> },
    /// The value of `key` matches `pattern`.
    MetadataMatches { key: String, pattern: String },
    /// A header whose title matches `heading` (case-insensitive) exists.
    RequireSection {
        heading: String,
        #[serde(default)]
        level: Option<u8>,
    },
    /// Header levels never skip a level going deeper.
    HeadingHierarchy,
    /// `pattern` never occurs, in the whole text or in blocks of the listed kinds.
    ForbidPattern {
        pattern: String,
        #[serde(default)]
        blocks: Vec<String>,
    },
    /// No link or ToC `href` target matches `forbid`.
    LinkTargets { forbid: String },
}

impl Check {
    pub fn compile(&self, rule_num: u32) -> Result<Box<dyn Strategy>, RuleLoadError> {
        let kind = |name: &str| {
            BlockKind::from_name(name).ok_or_else(|| RuleLoadError::UnknownBlockKind {
                rule_num,
                name: name.to_string(),
            })
        };
        let regex = |pattern: &str, case_insensitive: bool| {
            RegexBuilder::new(pattern)
                .case_insensitive(case_insensitive)
                .build()
                .map_err(|source| RuleLoadError::Regex { rule_num, source })
        };

        Ok(match self {
            Check::RequireBlock { block, level, min } => Box::new(RequireBlock {
                kind: kind(block)?,
                level: *level,
                min: *min,
            }),
            Check::MaxBlocks { block, level, max } => Box::new(MaxBlocks {
                kind: kind(block)?,
                level: *level,
                max: *max,
            }),
            Check::RequireMetadata { keys } => Box::new(RequireMetadata {
                keys: keys.iter().map(|k| normalize_key(k)).collect(),
            }),
            Check::MetadataMatches { key, pattern } => Box::new(MetadataMatches {
                key: normalize_key(key),
                pattern: regex(pattern, false)?,
            }),
            Check::RequireSection { heading, level } => Box::new(RequireSection {
                heading: regex(heading, true)?,
                level: *level,
            }),
            Check::HeadingHierarchy => Box::new(HeadingHierarchy),
            Check::ForbidPattern { pattern, blocks } => Box::new(ForbidPattern {
                pattern: regex(pattern, false)?,
                kinds: blocks.iter().map(|b| kind(b)).collect::<Result<_, _>>()?,
            }),
            Check::LinkTargets { forbid } => Box::new(LinkTargets {
                forbid: regex(forbid, false)?,
            }),
        })
    }
}

struct RequireBlock {
    kind: BlockKind,
    level: Option<u8>,
    min: usize,
}

impl Strategy for RequireBlock {
    fn evaluate(&self, ctx: &AuditContext<'_>) -> Result<Outcome, RuleError> {
        let found: Vec<Span> = ctx.blocks_of(self.kind, self.level).map(|b| b.span).collect();
        Ok(if found.len() >= self.min {
            Outcome::Pass(found)
        } else {
            Outcome::Fail(vec![])
        })
    }
}

struct MaxBlocks {
    kind: BlockKind,
    level: Option<u8>,
    max: usize,
}

impl Strategy for MaxBlocks {
    fn evaluate(&self, ctx: &AuditContext<'_>) -> Result<Outcome, RuleError> {
        let found: Vec<Span> = ctx.blocks_of(self.kind, self.level).map(|b| b.span).collect();
        Ok(if found.len() <= self.max {
            Outcome::Pass(found)
        } else {
            Outcome::Fail(found[self.max..].to_vec())
        })
    }
}

/// The span of the front-matter field for `key`, if the document has one.
fn field_span(ctx: &AuditContext<'_>, key: &str) -> Option<Span> {
    ctx.blocks_of(BlockKind::MetadataField, None)
        .find(|b| b.tag.as_deref() == Some(key))
        .map(|b| b.span)
}

struct RequireMetadata {
    keys: Vec<String>,
}

impl Strategy for RequireMetadata {
    fn evaluate(&self, ctx: &AuditContext<'_>) -> Result<Outcome, RuleError> {
        let missing = self
            .keys
            .iter()
            .filter(|k| ctx.metadata.get(k).is_none_or(|v| v.trim().is_empty()))
            .count();
        if missing > 0 {
            return Ok(Outcome::Fail(vec![Span::point(0); missing]));
        }
        Ok(Outcome::Pass(
            self.keys.iter().filter_map(|k| field_span(ctx, k)).collect(),
        ))
    }
}

struct MetadataMatches {
    key: String,
    pattern: Regex,
}

impl Strategy for MetadataMatches {
    fn evaluate(&self, ctx: &AuditContext<'_>) -> Result<Outcome, RuleError> {
        let span = field_span(ctx, &self.key);
        Ok(match ctx.metadata.get(&self.key) {
            Some(value) if self.pattern.is_match(value) => {
                Outcome::Pass(span.into_iter().collect())
            }
            _ => Outcome::Fail(span.into_iter().collect()),
        })
    }
}

struct RequireSection {
    heading: Regex,
    level: Option<u8>,
}

impl Strategy for RequireSection {
    fn evaluate(&self, ctx: &AuditContext<'_>) -> Result<Outcome, RuleError> {
        let found: Vec<Span> = ctx
            .blocks_of(BlockKind::Header, self.level)
            .filter(|b| self.heading.is_match(b.content_text()))
            .map(|b| b.span)
            .collect();
        Ok(if found.is_empty() {
            Outcome::Fail(vec![])
        } else {
            Outcome::Pass(found)
        })
    }
}

struct HeadingHierarchy;

impl Strategy for HeadingHierarchy {
    fn evaluate(&self, ctx: &AuditContext<'_>) -> Result<Outcome, RuleError> {
        let mut current = 0u8;
        let mut jumps = vec![];
        for header in ctx.blocks_of(BlockKind::Header, None) {
            // Going back up to any level is fine.
            if header.level > current + 1 {
                jumps.push(header.span);
            }
            current = header.level;
        }
        Ok(if jumps.is_empty() {
            Outcome::Pass(vec![])
        } else {
            Outcome::Fail(jumps)
        })
    }
}

struct ForbidPattern {
    pattern: Regex,
    kinds: Vec<BlockKind>,
}

impl Strategy for ForbidPattern {
    fn evaluate(&self, ctx: &AuditContext<'_>) -> Result<Outcome, RuleError> {
        let mut hits: Vec<Span> = if self.kinds.is_empty() {
            self.pattern
                .find_iter(ctx.raw_text)
                .map(|m| Span::new(m.start(), m.end()))
                .collect()
        } else {
            ctx.all_blocks
                .iter()
                .filter(|b| self.kinds.contains(&b.kind))
                .flat_map(|b| {
                    self.pattern
                        .find_iter(&b.text)
                        .map(|m| Span::new(b.start() + m.start(), b.start() + m.end()))
                })
                .collect()
        };
        // Nested blocks of listed kinds report the same match twice.
        hits.sort();
        hits.dedup();

        Ok(if hits.is_empty() {
            Outcome::Pass(vec![])
        } else {
            Outcome::Fail(hits)
        })
    }
}

struct LinkTargets {
    forbid: Regex,
}

impl Strategy for LinkTargets {
    fn evaluate(&self, ctx: &AuditContext<'_>) -> Result<Outcome, RuleError> {
        let bad: Vec<Span> = ctx
            .all_blocks
            .iter()
            .filter(|b| matches!(b.kind, BlockKind::Link | BlockKind::FileName))
            .filter_map(|b| Some((b.target?, b.target_text()?)))
            .filter(|(_, target)| self.forbid.is_match(target))
            .map(|(span, _)| span)
            .collect();
        Ok(if bad.is_empty() {
            Outcome::Pass(vec![])
        } else {
            Outcome::Fail(bad)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{Metadata, get_metadata, read_metadata},
        parsing::{blocks::AllInnerBlocks, split_content_into_blocks},
    };
    use pretty_assertions::assert_eq;

    fn run(check: Check, md: &str) -> Outcome {
        let blocks = split_content_into_blocks("doc.md", md, false);
        let all: Vec<_> = AllInnerBlocks::over(&blocks).collect();
        let metadata: Metadata = read_metadata(&get_metadata(md, "doc.md")).unwrap();
        let ctx = AuditContext {
            blocks: &blocks,
            file_name: "doc.md",
            metadata: &metadata,
            raw_text: md,
            all_blocks: &all,
        };
        check.compile(1).unwrap().evaluate(&ctx).unwrap()
    }

    fn check(json: &str) -> Check {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn require_block_by_level() {
        let h1 = check(r#"{"kind":"requireBlock","block":"Header","level":1}"#);
        assert_eq!(run(h1.clone(), "# T\n"), Outcome::Pass(vec![Span::new(0, 3)]));
        assert_eq!(run(h1, "## T\n"), Outcome::Fail(vec![]));
    }

    #[test]
    fn max_blocks_reports_extras() {
        let one_h1 = check(r#"{"kind":"maxBlocks","block":"Header","level":1,"max":1}"#);
        assert_eq!(
            run(one_h1, "# A\n# B\n# C"),
            Outcome::Fail(vec![Span::new(4, 7), Span::new(8, 11)])
        );
    }

    #[test]
    fn require_metadata_points_at_fields() {
        let keys = check(r#"{"kind":"requireMetadata","keys":["ms.topic","author"]}"#);
        let md = "---\nms.topic: overview\nauthor: me\n---\n";
        assert_eq!(
            run(keys.clone(), md),
            Outcome::Pass(vec![Span::new(4, 22), Span::new(23, 33)])
        );
        assert_eq!(
            run(keys, "---\nauthor: \"\"\n---\n"),
            Outcome::Fail(vec![Span::point(0), Span::point(0)])
        );
    }

    #[test]
    fn metadata_matches() {
        let date = check(r#"{"kind":"metadataMatches","key":"ms.date","pattern":"^\\d{2}/\\d{2}/\\d{4}$"}"#);
        let md = "---\nms.date: 2024-01-02\n---\n";
        assert_eq!(run(date.clone(), md), Outcome::Fail(vec![Span::new(4, 23)]));
        assert_eq!(
            run(date, "---\nms.date: 01/02/2024\n---\n"),
            Outcome::Pass(vec![Span::new(4, 23)])
        );
    }

    #[test]
    fn require_section_is_case_insensitive() {
        let next = check(r#"{"kind":"requireSection","heading":"^next steps$","level":2}"#);
        assert_eq!(
            run(next.clone(), "# T\n## Next Steps\n"),
            Outcome::Pass(vec![Span::new(4, 17)])
        );
        assert_eq!(run(next, "# T\n### Next steps\n"), Outcome::Fail(vec![]));
    }

    #[test]
    fn heading_hierarchy_flags_jumps() {
        assert_eq!(
            run(Check::HeadingHierarchy, "# A\n### C\n## B\n# D\n## E"),
            Outcome::Fail(vec![Span::new(4, 9)])
        );
        assert_eq!(run(Check::HeadingHierarchy, "## A"), Outcome::Fail(vec![Span::new(0, 4)]));
        assert_eq!(run(Check::HeadingHierarchy, "# A\n## B"), Outcome::Pass(vec![]));
    }

    #[test]
    fn forbid_pattern_in_blocks() {
        let todo = check(r#"{"kind":"forbidPattern","pattern":"TODO","blocks":["Paragraph"]}"#);
        assert_eq!(
            run(todo.clone(), "# TODO\n\nfix TODO\n"),
            Outcome::Fail(vec![Span::new(12, 16)])
        );
        let anywhere = check(r#"{"kind":"forbidPattern","pattern":"TODO"}"#);
        assert_eq!(
            run(anywhere, "# TODO\n\nfix TODO\n"),
            Outcome::Fail(vec![Span::new(2, 6), Span::new(12, 16)])
        );
    }

    #[test]
    fn link_targets_point_at_target() {
        let locale = check(r#"{"kind":"linkTargets","forbid":"/en-us/"}"#);
        let md = "See [x](https://learn.microsoft.com/en-us/a) and [y](b.md).";
        assert_eq!(run(locale, md), Outcome::Fail(vec![Span::new(8, 43)]));
    }

    #[test]
    fn unknown_names_and_bad_regexes_fail_to_compile() {
        let banner = check(r#"{"kind":"requireBlock","block":"Banner"}"#);
        assert!(matches!(
            banner.compile(7),
            Err(RuleLoadError::UnknownBlockKind { rule_num: 7, .. })
        ));
        let bad = check(r#"{"kind":"forbidPattern","pattern":"("}"#);
        assert!(matches!(bad.compile(3), Err(RuleLoadError::Regex { rule_num: 3, .. })));
    }
}
