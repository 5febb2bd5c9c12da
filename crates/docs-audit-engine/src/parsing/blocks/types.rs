use serde::Serialize;

use crate::parsing::rope::span::Span;

/// The kind of a [`ContentBlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockKind {
    /// An ATX heading line (`# Title`).
    Header,
    /// A pipe-delimited table.
    Table,
    /// One cell of a table's first (header) row.
    TableColumn,
    /// A body row of a table.
    TableRow,
    /// One cell of a body row.
    TableRowValue,
    BulletedList,
    /// A continuation line inside a list item.
    ListRow,
    NumberedList,
    ListItem,
    /// An inline `[text](target)` link or image.
    Link,
    Paragraph,
    /// The front-matter block delimited by `---` lines.
    Metadata,
    /// A `key: value` line inside front matter.
    MetadataField,
    /// A `> [!NOTE]` style alert.
    Note,
    /// A top-level table-of-contents item that owns nested items.
    TocTopNode,
    /// A nested table-of-contents item that owns nested items.
    TocNode,
    /// A nested table-of-contents leaf item.
    TocEntry,
    /// A top-level table-of-contents leaf item.
    TocTopEntry,
    /// A fenced code block.
    CodeFence,
    /// The `href` target of a table-of-contents item.
    FileName,
    /// A heading of the form `# [Title](#tab/id)`.
    ConceptualTab,
    /// A `::: zone pivot="..."` section.
    ZonePivot,
    /// An ARM resource type string inside a code fence.
    CodeFenceArmResourceType,
    /// The provider namespace portion of an ARM resource type.
    CodeFenceArmNamespace,
    /// No block; used by rules that don't target a structure.
    None,
}

impl BlockKind {
    pub const ALL: [BlockKind; 25] = [
        BlockKind::Header,
        BlockKind::Table,
        BlockKind::TableColumn,
        BlockKind::TableRow,
        BlockKind::TableRowValue,
        BlockKind::BulletedList,
        BlockKind::ListRow,
        BlockKind::NumberedList,
        BlockKind::ListItem,
        BlockKind::Link,
        BlockKind::Paragraph,
        BlockKind::Metadata,
        BlockKind::MetadataField,
        BlockKind::Note,
        BlockKind::TocTopNode,
        BlockKind::TocNode,
        BlockKind::TocEntry,
        BlockKind::TocTopEntry,
        BlockKind::CodeFence,
        BlockKind::FileName,
        BlockKind::ConceptualTab,
        BlockKind::ZonePivot,
        BlockKind::CodeFenceArmResourceType,
        BlockKind::CodeFenceArmNamespace,
        BlockKind::None,
    ];

    /// Looks a kind up by name, ignoring case and underscores, so both
    /// `TocEntry` and `ToC_Entry` resolve. `Null` is accepted for `None`.
    pub fn from_name(name: &str) -> Option<BlockKind> {
        let wanted: String = name
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        if wanted == "null" {
            return Some(BlockKind::None);
        }
        Self::ALL
            .into_iter()
            .find(|kind| format!("{kind:?}").to_lowercase() == wanted)
    }
}

/// A node in the document tree.
///
/// Every block records its byte span and the raw source text of that span.
/// The optional fields are only meaningful for some kinds:
///
/// | field     | used by |
/// |-----------|---------|
/// | `level`   | heading level for `Header`/`ConceptualTab`, nesting depth for lists and ToC items |
/// | `tag`     | fence info string, link target, note type, pivot expression, ToC item name, metadata key |
/// | `content` | the meaningful inner span: heading title, cell value, list item text, fence body, field value |
/// | `target`  | link target span, ToC `href` value span |
/// | `section` | for headers, the span from the heading to the next heading of equal or shallower level |
///
/// # Invariants
///
/// - `span.start <= span.end`
/// - every child's span lies within this block's span
/// - sibling spans don't overlap and are in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub kind: BlockKind,
    pub span: Span,
    pub text: String,
    pub level: u8,
    pub tag: Option<String>,
    pub content: Option<Span>,
    pub target: Option<Span>,
    pub section: Option<Span>,
    pub children: Vec<ContentBlock>,
}

impl ContentBlock {
    /// Creates a childless block. `text` must be the source text of `span`.
    pub fn new(kind: BlockKind, span: Span, text: &str) -> Self {
        Self {
            kind,
            span,
            text: text.to_string(),
            level: 0,
            tag: None,
            content: None,
            target: None,
            section: None,
            children: Vec::new(),
        }
    }

    /// Creates a block by slicing its text out of the full `source`.
    pub fn from_source(kind: BlockKind, span: Span, source: &str) -> Self {
        Self::new(kind, span, &source[span.start..span.end])
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_content(mut self, content: Span) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_target(mut self, target: Span) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_children(mut self, children: Vec<ContentBlock>) -> Self {
        self.children = children;
        self
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Text of the `content` span, or the whole block text when unset.
    pub fn content_text(&self) -> &str {
        self.relative(self.content).unwrap_or(&self.text)
    }

    /// Text of the `target` span, if any.
    pub fn target_text(&self) -> Option<&str> {
        self.relative(self.target)
    }

    fn relative(&self, span: Option<Span>) -> Option<&str> {
        let span = span?;
        let start = span.start.checked_sub(self.span.start)?;
        let end = span.end.checked_sub(self.span.start)?;
        self.text.get(start..end)
    }

    /// All descendants of this block, depth-first in pre-order.
    ///
    /// The iterator is lazy and recomputed on every call.
    pub fn all_inner_blocks(&self) -> AllInnerBlocks<'_> {
        AllInnerBlocks::over(&self.children)
    }
}

/// Depth-first, pre-order iterator over a forest of blocks.
pub struct AllInnerBlocks<'a> {
    stack: Vec<std::slice::Iter<'a, ContentBlock>>,
}

impl<'a> AllInnerBlocks<'a> {
    /// Iterates `blocks` and all of their descendants in document order.
    pub fn over(blocks: &'a [ContentBlock]) -> Self {
        Self {
            stack: vec![blocks.iter()],
        }
    }
}

impl<'a> Iterator for AllInnerBlocks<'a> {
    type Item = &'a ContentBlock;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(block) => {
                    if !block.children.is_empty() {
                        self.stack.push(block.children.iter());
                    }
                    return Some(block);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
