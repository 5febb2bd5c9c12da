use xi_rope::Rope;

use crate::parsing::{blocks::ContentBlock, rope::slice::preview};

/// Renders a block tree as one line per block, indented by depth:
/// `Kind start..end "preview"`, with the heading/list level and tag when set.
pub fn outline(source: &str, blocks: &[ContentBlock]) -> Vec<String> {
    let rope = Rope::from(source);
    let mut out = vec![];
    push_blocks(&rope, blocks, 0, &mut out);
    out
}

fn push_blocks(rope: &Rope, blocks: &[ContentBlock], depth: usize, out: &mut Vec<String>) {
    for b in blocks {
        let mut line = format!(
            "{}{:?} {}..{} {:?}",
            "  ".repeat(depth),
            b.kind,
            b.span.start,
            b.span.end,
            preview(rope, b.span, 40)
        );
        if b.level > 0 {
            line.push_str(&format!(" level={}", b.level));
        }
        if let Some(tag) = &b.tag {
            line.push_str(&format!(" tag={tag:?}"));
        }
        out.push(line);
        push_blocks(rope, &b.children, depth + 1, out);
    }
}
