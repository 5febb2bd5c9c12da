use crate::parsing::{blocks::ContentBlock, rope::span::Span};

/// Validates segmenter output invariants.
///
/// Asserts that:
/// - All spans (block, content, target, section) are within source bounds
/// - Block text is the source text of the block span
/// - Child spans are contained within their parent span
/// - Sibling spans are in document order and don't overlap
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(source: &str, blocks: &[ContentBlock]) {
    check_siblings(source, blocks, Span::new(0, source.len()));
}

fn check_siblings(source: &str, blocks: &[ContentBlock], parent: Span) {
    let n = source.len();
    let mut prev_end = parent.start;
    for b in blocks {
        assert!(
            b.span.is_valid_for(n),
            "block span out of bounds: {:?} (source len: {})",
            b.span,
            n
        );
        assert!(
            parent.contains(b.span),
            "{:?} span {:?} not contained in parent {:?}",
            b.kind,
            b.span,
            parent
        );
        assert!(
            b.span.start >= prev_end,
            "{:?} span {:?} overlaps or precedes previous sibling ending at {}",
            b.kind,
            b.span,
            prev_end
        );
        assert_eq!(
            b.text,
            &source[b.span.start..b.span.end],
            "{:?} text does not match its span {:?}",
            b.kind,
            b.span
        );
        for sp in [b.content, b.target].into_iter().flatten() {
            assert!(
                b.span.contains(sp),
                "{:?} sub-span {:?} not contained in block span {:?}",
                b.kind,
                sp,
                b.span
            );
        }
        if let Some(section) = b.section {
            assert!(
                section.is_valid_for(n) && section.start == b.span.start,
                "{:?} section {:?} invalid for block span {:?}",
                b.kind,
                section,
                b.span
            );
        }
        check_siblings(source, &b.children, b.span);
        prev_end = b.span.end;
    }
}
