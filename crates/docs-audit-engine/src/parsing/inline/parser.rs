use crate::parsing::rope::span::Span;

use super::{
    cursor::Cursor,
    kinds::{CodeSpan, Link},
    types::InlineNode,
};

/// Parses inline content into a sequence of [`InlineNode`]s.
///
/// # Arguments
/// - `base`: Byte offset in the source where `s` begins (for absolute span positions)
/// - `s`: The string content to parse (a paragraph, heading title, cell...)
///
/// # Raw Zone Precedence
/// Code spans are checked first and suppress link recognition inside them:
/// `` `[x](y)` `` is a code span, not a link.
///
/// # Returns
/// A vector of inline nodes covering the entire input. Text between special
/// constructs is emitted as `InlineNode::Text`.
pub fn parse_inline(base: usize, s: &str) -> Vec<InlineNode> {
    let mut cur = Cursor::new(s, base);
    let mut out = vec![];
    let mut text_start = cur.pos();

    fn flush_text(out: &mut Vec<InlineNode>, start: usize, end: usize) {
        if end > start {
            out.push(InlineNode::Text(Span { start, end }));
        }
    }

    while !cur.eof() {
        if cur.peek() == Some(Link::ESCAPE) {
            cur.bump();
            cur.bump();
            continue;
        }
        if let Some(node) = try_parse_code_span(&mut cur).or_else(|| try_parse_link(&mut cur)) {
            flush_text(&mut out, text_start, node.span().start);
            text_start = node.span().end;
            out.push(node);
            continue;
        }
        cur.bump();
    }

    flush_text(&mut out, text_start, cur.pos());
    out
}

/// Attempts to parse a code span starting at the current position.
///
/// The closing run must have the same number of backticks as the opening run.
/// On failure the cursor is restored and `None` returned.
fn try_parse_code_span(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    if cur.peek() != Some(CodeSpan::TICK) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    let open_at = cur.i;
    cur.bump_while(|b| b == CodeSpan::TICK);
    let run = cur.i - open_at;
    let inner_start = cur.pos();

    while !cur.eof() {
        if cur.peek() == Some(CodeSpan::TICK) {
            let close_at = cur.i;
            cur.bump_while(|b| b == CodeSpan::TICK);
            if cur.i - close_at == run {
                return Some(InlineNode::CodeSpan {
                    full: Span {
                        start,
                        end: cur.pos(),
                    },
                    inner: Span {
                        start: inner_start,
                        end: cur.base + close_at,
                    },
                });
            }
            continue;
        }
        cur.bump();
    }

    *cur = saved;
    None
}

/// Attempts to parse `[text](target "title")` or `![alt](target)`.
///
/// Brackets in the text and parentheses in the target may nest. On failure
/// the cursor is restored and `None` returned.
fn try_parse_link(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    let image = cur.peek() == Some(Link::IMAGE_BANG) && cur.peek_at(1) == Some(Link::TEXT_OPEN);
    if !image && cur.peek() != Some(Link::TEXT_OPEN) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    if image {
        cur.bump();
    }
    cur.bump(); // [
    let text_start = cur.pos();

    let mut depth = 0usize;
    loop {
        match cur.peek() {
            None => {
                *cur = saved;
                return None;
            }
            Some(Link::ESCAPE) => {
                cur.bump();
                cur.bump();
            }
            Some(Link::TEXT_OPEN) => {
                depth += 1;
                cur.bump();
            }
            Some(Link::TEXT_CLOSE) if depth == 0 => break,
            Some(Link::TEXT_CLOSE) => {
                depth -= 1;
                cur.bump();
            }
            Some(_) => {
                cur.bump();
            }
        }
    }
    let text_end = cur.pos();
    cur.bump(); // ]

    if cur.peek() != Some(Link::TARGET_OPEN) {
        *cur = saved;
        return None;
    }
    cur.bump(); // (
    cur.bump_while(|b| b == b' ');
    let target_start = cur.pos();

    let mut parens = 0usize;
    loop {
        match cur.peek() {
            None | Some(b'\n') => {
                *cur = saved;
                return None;
            }
            Some(b' ') | Some(b'\t') => break,
            Some(Link::TARGET_OPEN) => {
                parens += 1;
                cur.bump();
            }
            Some(Link::TARGET_CLOSE) if parens == 0 => break,
            Some(Link::TARGET_CLOSE) => {
                parens -= 1;
                cur.bump();
            }
            Some(_) => {
                cur.bump();
            }
        }
    }
    let target_end = cur.pos();

    cur.bump_while(|b| b == b' ' || b == b'\t');
    if let Some(quote @ (b'"' | b'\'')) = cur.peek() {
        cur.bump();
        cur.bump_while(|b| b != quote && b != b'\n');
        if cur.peek() != Some(quote) {
            *cur = saved;
            return None;
        }
        cur.bump();
        cur.bump_while(|b| b == b' ' || b == b'\t');
    }

    if cur.peek() != Some(Link::TARGET_CLOSE) {
        *cur = saved;
        return None;
    }
    cur.bump(); // )

    Some(InlineNode::Link {
        full: Span {
            start,
            end: cur.pos(),
        },
        text: Span {
            start: text_start,
            end: text_end,
        },
        target: Span {
            start: target_start,
            end: target_end,
        },
        image,
    })
}
