//! # Audit Rules
//!
//! Rules are loaded once into a [`RuleRegistry`] and evaluated against a
//! segmented document through an [`AuditContext`].
//!
//! ## Evaluation Convention
//!
//! A passing rule yields one `success = true` entry whose indexes point at
//! the spans that justify the pass (possibly none). A failing rule yields one
//! `success = false` entry per violation; a violation that is an absence is
//! reported at `[0, 0)`.

pub mod checks;
pub mod registry;
pub mod rule;

pub use checks::{Check, Outcome, Strategy};
pub use registry::{RuleLoadError, RuleRegistry, RuleSource, parse_rules};
pub use rule::{AuditRule, RuleDescriptor};

use serde::Serialize;
use thiserror::Error;

use crate::{
    metadata::Metadata,
    parsing::{
        blocks::{BlockKind, ContentBlock},
        rope::span::Span,
    },
};

/// One rule evaluation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub title: String,
    pub success: bool,
    pub rule_num: u32,
    /// Byte ranges in the document this entry refers to.
    pub indexes: Vec<Span>,
}

impl AuditEntry {
    pub fn pass(rule_num: u32, title: impl Into<String>, indexes: Vec<Span>) -> Self {
        Self {
            title: title.into(),
            success: true,
            rule_num,
            indexes,
        }
    }

    pub fn fail(rule_num: u32, title: impl Into<String>, indexes: Vec<Span>) -> Self {
        Self {
            title: title.into(),
            success: false,
            rule_num,
            indexes,
        }
    }
}

/// Everything a rule may look at. Rules must not depend on anything else.
#[derive(Debug, Clone, Copy)]
pub struct AuditContext<'a> {
    pub blocks: &'a [ContentBlock],
    pub file_name: &'a str,
    pub metadata: &'a Metadata,
    pub raw_text: &'a str,
    /// Every block of the document in pre-order.
    pub all_blocks: &'a [&'a ContentBlock],
}

impl<'a> AuditContext<'a> {
    /// Blocks of `kind`, optionally restricted to one `level`.
    pub fn blocks_of(
        &self,
        kind: BlockKind,
        level: Option<u8>,
    ) -> impl Iterator<Item = &'a ContentBlock> {
        let all = self.all_blocks;
        all.iter()
            .copied()
            .filter(move |b| b.kind == kind && level.is_none_or(|l| b.level == l))
    }
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule {rule_num} reported {span:?} outside the document (length {len})")]
    SpanOutOfBounds { rule_num: u32, span: Span, len: usize },
    #[error("rule {rule_num} failed: {message}")]
    Evaluation { rule_num: u32, message: String },
}

/// Evaluates one rule against a document.
pub trait RuleTest: Send + Sync {
    fn test(&self, ctx: &AuditContext<'_>) -> Result<Vec<AuditEntry>, RuleError>;
}
