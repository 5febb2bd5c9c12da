//! # Document Segmentation
//!
//! Splits a raw Markdown or `toc.yml` document into a tree of
//! [`ContentBlock`]s with absolute byte spans.

pub mod blocks;
pub mod inline;
pub mod rope;
pub mod snapshot;

#[cfg(test)]
mod tests;

use xi_rope::Rope;

use blocks::{
    BlockBuilder, BlockKind, ContentBlock, LineClass, MarkdownLineClassifier, assign_sections,
    kinds::{FrontMatter, FrontMatterBounds},
    toc,
};
use rope::{lines_with_spans, span::Span};

use crate::metadata::normalize_key;

/// The blocks of one document.
#[derive(Debug, Clone, Default)]
pub struct SegmentedDocument {
    pub blocks: Vec<ContentBlock>,
}

impl SegmentedDocument {
    pub fn new(file_name: &str, raw_text: &str, strict: bool) -> Self {
        Self {
            blocks: split_content_into_blocks(file_name, raw_text, strict),
        }
    }

    /// Every block in document order: each top-level block followed by its
    /// descendants.
    pub fn all_blocks(&self) -> Vec<&ContentBlock> {
        blocks::AllInnerBlocks::over(&self.blocks).collect()
    }
}

/// Segments `raw_text` into blocks. Never fails: unrecognized content
/// becomes paragraphs.
///
/// `file_name` only selects table-of-contents handling. `strict` tightens
/// heading and table recognition.
pub fn split_content_into_blocks(
    file_name: &str,
    raw_text: &str,
    strict: bool,
) -> Vec<ContentBlock> {
    let rope = Rope::from(raw_text);
    let classifier = MarkdownLineClassifier::new(strict);
    let lines: Vec<LineClass> = lines_with_spans(&rope)
        .map(|lr| classifier.classify(&lr))
        .collect();

    if toc::is_toc(file_name, &lines) {
        return toc::build(raw_text, &lines);
    }

    let mut out = vec![];
    let mut first = 0;
    if let Some(fm) = FrontMatter::locate(raw_text) {
        out.push(metadata_block(raw_text, &lines, fm));
        first = lines
            .iter()
            .position(|c| c.line.start >= fm.block.end)
            .unwrap_or(lines.len());
    }

    out.extend(BlockBuilder::new(raw_text, &lines[first..], strict).build());
    assign_sections(&mut out, raw_text.len());

    log::debug!("segmented {file_name}: {} top-level blocks", out.len());
    out
}

/// The front-matter block. Each top-level `key: value` line is a
/// `MetadataField` child tagged with its normalized key; indented lines
/// extend the field above them.
fn metadata_block(source: &str, lines: &[LineClass], fm: FrontMatterBounds) -> ContentBlock {
    let mut fields: Vec<ContentBlock> = vec![];
    let body = lines
        .iter()
        .filter(|c| c.line.start >= fm.body.start && c.line.end <= fm.body.end);

    for c in body {
        if c.is_blank {
            continue;
        }
        if c.indent == 0
            && let Some(field) = FrontMatter::field(&c.text)
        {
            let key = &c.text[field.key.0..field.key.1];
            let value = Span::new(
                c.content.start + field.value.0,
                c.content.start + field.value.1,
            );
            fields.push(
                ContentBlock::from_source(
                    BlockKind::MetadataField,
                    Span::new(c.start(), c.end()),
                    source,
                )
                .with_tag(normalize_key(key))
                .with_content(value),
            );
        } else if let Some(last) = fields.last_mut() {
            last.span.end = c.end().max(last.span.end);
            last.text = source[last.span.start..last.span.end].to_string();
        }
    }

    ContentBlock::from_source(BlockKind::Metadata, fm.block, source)
        .with_content(fm.body)
        .with_children(fields)
}
