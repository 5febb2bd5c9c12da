use crate::parsing::rope::span::Span;

/// A parsed inline node with byte spans into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    /// Plain text that isn't part of any special construct.
    Text(Span),
    /// A code span (backtick-delimited). This is a raw zone - no parsing inside.
    CodeSpan {
        /// Full span including backticks.
        full: Span,
        /// Inner span (content between backticks).
        inner: Span,
    },
    /// A Markdown link `[text](target)`, or an image `![alt](target)`.
    Link {
        /// Full span including brackets and parentheses (and `!` for images).
        full: Span,
        /// Span of the link text between the brackets.
        text: Span,
        /// Span of the target between the parentheses, title excluded.
        target: Span,
        image: bool,
    },
}

impl InlineNode {
    /// Extracts the full span from any inline node variant.
    pub fn span(&self) -> Span {
        match self {
            InlineNode::Text(sp) => *sp,
            InlineNode::CodeSpan { full, .. } => *full,
            InlineNode::Link { full, .. } => *full,
        }
    }
}
