//! # Inline Parsing
//!
//! Cursor-based inline parsing with explicit raw zones.
//!
//! Inline parsing runs over the content span of inline-eligible blocks
//! (paragraphs, heading titles, list item text, table cells, note bodies) and
//! exists to record [`BlockKind::Link`] children with the exact offset of each
//! link target.
//!
//! ## Raw Zone Precedence
//!
//! Code spans take precedence: `` `[x](y)` `` parses as a single CodeSpan,
//! not as text containing a link.

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::parse_inline;
pub use types::InlineNode;

use super::blocks::{BlockKind, ContentBlock};

/// Builds `Link` blocks for every link in `s`, which starts at `base` in the
/// source document.
///
/// Each block's `content` is the link text and `target` the link target;
/// `tag` holds the target string.
pub fn link_blocks(base: usize, s: &str) -> Vec<ContentBlock> {
    parse_inline(base, s)
        .into_iter()
        .filter_map(|node| match node {
            InlineNode::Link {
                full, text, target, ..
            } => Some(
                ContentBlock::new(BlockKind::Link, full, &s[full.start - base..full.end - base])
                    .with_content(text)
                    .with_target(target)
                    .with_tag(&s[target.start - base..target.end - base]),
            ),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::rope::Span;

    #[test]
    fn link_blocks_carry_target_text_and_span() {
        let links = link_blocks(10, "a [b](c.md) d");
        assert_eq!(links.len(), 1);
        let link = &links[0];
        assert_eq!(link.kind, BlockKind::Link);
        assert_eq!(link.span, Span::new(12, 21));
        assert_eq!(link.text, "[b](c.md)");
        assert_eq!(link.tag.as_deref(), Some("c.md"));
        assert_eq!(link.target, Some(Span::new(16, 20)));
        assert_eq!(link.content_text(), "b");
    }
}
