use crate::parsing::rope::{lines::LineRef, span::Span};

use super::kinds::{
    BlockQuote, CodeFence, FenceSig, FrontMatter, Heading, HeadingSig, ListMarker, ListSyntax,
    Table, indentation,
};

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of segmentation: each line is classified independently
/// without reference to surrounding context.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// Full byte span of this line, newline included.
    pub line: Span,
    /// Byte span of the line without its line terminator.
    pub content: Span,
    /// Text of `content`.
    pub text: String,
    /// Whether the line is blank (whitespace only).
    pub is_blank: bool,
    /// Leading whitespace in columns.
    pub indent: usize,
    /// Leading whitespace in bytes.
    pub indent_bytes: usize,
    /// Number of blockquote `>` prefixes found.
    pub quote_depth: u8,
    /// Byte offset within `text` where the quoted remainder starts.
    pub quote_offset: usize,
    pub fence: Option<FenceSig>,
    pub heading: Option<HeadingSig>,
    pub list: Option<ListMarker>,
    pub table_row: bool,
    pub table_separator: bool,
}

impl LineClass {
    /// Offset of the first non-whitespace byte.
    pub fn start(&self) -> usize {
        (self.content.start + self.indent_bytes).min(self.end())
    }

    /// Offset just past the last non-whitespace byte.
    pub fn end(&self) -> usize {
        self.content.start + self.text.trim_end().len()
    }
}

/// Classifies individual lines for the segmentation phase.
pub struct MarkdownLineClassifier {
    strict: bool,
}

impl MarkdownLineClassifier {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Classifies a line into a [`LineClass`] containing local facts.
    pub fn classify(&self, lr: &LineRef) -> LineClass {
        let mut start = lr.span.start;
        let mut text = lr.text.trim_end_matches(['\r', '\n']);
        if start == 0
            && let Some(rest) = text.strip_prefix(FrontMatter::BOM)
        {
            start += FrontMatter::BOM.len_utf8();
            text = rest;
        }
        let is_blank = text.trim().is_empty();
        let (indent, indent_bytes) = indentation(text);
        let (quote_depth, quote_offset) = BlockQuote::strip_prefixes(text);
        let unquoted = quote_depth == 0;

        LineClass {
            line: lr.span,
            content: Span {
                start,
                end: start + text.len(),
            },
            text: text.to_string(),
            is_blank,
            indent,
            indent_bytes,
            quote_depth,
            quote_offset,
            fence: if unquoted { CodeFence::sig(text) } else { None },
            heading: if unquoted {
                Heading::sig(text, self.strict)
            } else {
                None
            },
            list: if unquoted { ListSyntax::marker(text) } else { None },
            table_row: unquoted && Table::is_row(text),
            table_separator: unquoted && Table::is_separator(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str, strict: bool) -> LineClass {
        let lr = LineRef {
            span: Span::new(10, 10 + text.len()),
            text: text.to_string(),
        };
        MarkdownLineClassifier::new(strict).classify(&lr)
    }

    #[test]
    fn strips_line_terminator() {
        let c = classify("  - item\r\n", false);
        assert_eq!(c.text, "  - item");
        assert_eq!(c.content, Span::new(10, 18));
        assert_eq!(c.line, Span::new(10, 20));
        assert_eq!(c.indent, 2);
        assert_eq!(c.start(), 12);
        assert!(c.list.is_some());
    }

    #[test]
    fn blank_line() {
        let c = classify("   \n", false);
        assert!(c.is_blank);
        assert!(c.start() <= c.end());
    }

    #[test]
    fn quoted_lines_have_no_block_markers() {
        let c = classify("> # not a heading", false);
        assert_eq!(c.quote_depth, 1);
        assert!(c.heading.is_none());
        assert_eq!(&c.text[c.quote_offset..], "# not a heading");
    }

    #[test]
    fn strictness_reaches_headings() {
        assert!(classify("#Title", false).heading.is_some());
        assert!(classify("#Title", true).heading.is_none());
    }

    #[test]
    fn leading_byte_order_mark_is_not_content() {
        let lr = LineRef {
            span: Span::new(0, 10),
            text: "\u{feff}# Title".to_string(),
        };
        let c = MarkdownLineClassifier::new(true).classify(&lr);
        assert_eq!(c.text, "# Title");
        assert_eq!(c.content, Span::new(3, 10));
        assert_eq!(c.line, Span::new(0, 10));
        assert!(c.heading.is_some());
    }

    #[test]
    fn table_lines() {
        let c = classify("|---|---|", false);
        assert!(c.table_row && c.table_separator);
    }
}
