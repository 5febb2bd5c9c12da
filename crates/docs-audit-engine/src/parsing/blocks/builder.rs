use crate::parsing::{inline::link_blocks, rope::span::Span};

use super::{
    classify::LineClass,
    kinds::{ArmTemplate, CodeFence, FenceSig, Heading, HeadingSig, ListMarker, Table, ZonePivot},
    open::{BlockOpen, try_open},
    types::{BlockKind, ContentBlock},
};

#[derive(Debug, Clone, Copy)]
enum LeafState {
    None,
    Paragraph { start: usize, end: usize },
}

/// Builds blocks from classified lines.
///
/// The builder walks the lines once. Paragraph text accumulates in the leaf
/// state until a blank line or a block opener flushes it; every other block
/// consumes its own lines and hands back the index of the next line.
pub struct BlockBuilder<'a> {
    source: &'a str,
    lines: &'a [LineClass],
    strict: bool,
    leaf: LeafState,
    out: Vec<ContentBlock>,
}

impl<'a> BlockBuilder<'a> {
    pub fn new(source: &'a str, lines: &'a [LineClass], strict: bool) -> Self {
        Self {
            source,
            lines,
            strict,
            leaf: LeafState::None,
            out: vec![],
        }
    }

    pub fn build(mut self) -> Vec<ContentBlock> {
        let mut i = 0;
        while i < self.lines.len() {
            let c = &self.lines[i];
            if c.is_blank {
                self.flush_paragraph();
                i += 1;
                continue;
            }

            if let Some(open) = try_open(self.lines, i, self.strict) {
                self.flush_paragraph();
                let (block, next) = self.open_block(open, i);
                self.out.push(block);
                i = next;
                continue;
            }

            self.extend_paragraph(c.start(), c.end());
            i += 1;
        }

        // EOF flush
        self.flush_paragraph();
        self.out
    }

    fn open_block(&self, open: BlockOpen, i: usize) -> (ContentBlock, usize) {
        match open {
            BlockOpen::FencedCode(sig) => self.fence(i, &sig),
            BlockOpen::Zone(attrs) => self.zone(i, attrs),
            BlockOpen::Heading(sig) => (self.heading(i, sig), i + 1),
            BlockOpen::Note(kind) => self.note(i, kind),
            BlockOpen::Table => self.table(i),
            BlockOpen::List(marker) => self.list(i, marker, 0),
        }
    }

    fn extend_paragraph(&mut self, start: usize, end: usize) {
        self.leaf = match self.leaf {
            LeafState::None => LeafState::Paragraph { start, end },
            LeafState::Paragraph { start, .. } => LeafState::Paragraph { start, end },
        };
    }

    fn flush_paragraph(&mut self) {
        if let LeafState::Paragraph { start, end } = self.leaf {
            let span = Span::new(start, end);
            let children = link_blocks(start, &self.source[start..end]);
            self.out.push(
                ContentBlock::from_source(BlockKind::Paragraph, span, self.source)
                    .with_content(span)
                    .with_children(children),
            );
        }
        self.leaf = LeafState::None;
    }

    fn block(&self, kind: BlockKind, start: usize, end: usize) -> ContentBlock {
        ContentBlock::from_source(kind, Span::new(start, end), self.source)
    }

    fn heading(&self, i: usize, sig: HeadingSig) -> ContentBlock {
        let c = &self.lines[i];
        let title_text = &c.text[sig.title_start..sig.title_end];
        let title = Span::new(
            c.content.start + sig.title_start,
            c.content.start + sig.title_end,
        );
        let links = link_blocks(title.start, title_text);

        let block = match Heading::tab_id(title_text) {
            Some(id) => self
                .block(BlockKind::ConceptualTab, c.start(), c.end())
                .with_tag(id),
            None => self.block(BlockKind::Header, c.start(), c.end()),
        };
        block
            .with_level(sig.level)
            .with_content(title)
            .with_children(links)
    }

    /// A fenced code block from its opening line to its closing fence, or to
    /// the end of input when unterminated.
    fn fence(&self, i: usize, sig: &FenceSig) -> (ContentBlock, usize) {
        let lines = self.lines;
        let language = CodeFence::language(&sig.info);
        let arm = ArmTemplate::applies_to(&language);

        let mut children = vec![];
        let mut closed = None;
        for (j, c) in lines.iter().enumerate().skip(i + 1) {
            if CodeFence::closes(sig, c.fence.as_ref()) {
                closed = Some(j);
                break;
            }
            if arm {
                children.extend(ArmTemplate::resource_types(
                    &c.text,
                    c.content.start,
                    &language,
                ));
            }
        }

        let last = closed.unwrap_or(lines.len() - 1);
        let start = lines[i].start();
        let end = lines[last].end().max(start);
        let body_start = lines[i].line.end.min(end);
        let body_end = match closed {
            Some(j) => lines[j].line.start,
            None => end,
        }
        .max(body_start);

        let mut block = self
            .block(BlockKind::CodeFence, start, end)
            .with_content(Span::new(body_start, body_end))
            .with_children(children);
        if !sig.info.is_empty() {
            block = block.with_tag(sig.info.clone());
        }
        (block, last + 1)
    }

    /// A zone pivot section. Its inner lines are built recursively.
    fn zone(&self, i: usize, attrs: String) -> (ContentBlock, usize) {
        let lines = self.lines;
        let close = (i + 1..lines.len()).find(|j| ZonePivot::is_end(&lines[*j].text));
        let inner_end = close.unwrap_or(lines.len());
        let children =
            BlockBuilder::new(self.source, &lines[i + 1..inner_end], self.strict).build();

        let last = close.unwrap_or(lines.len() - 1);
        let start = lines[i].start();
        let end = lines[last].end().max(start);
        let block = self
            .block(BlockKind::ZonePivot, start, end)
            .with_tag(attrs)
            .with_children(children);
        (block, last + 1)
    }

    /// A `> [!TYPE]` alert and the quoted lines that follow it.
    fn note(&self, i: usize, kind: String) -> (ContentBlock, usize) {
        let lines = self.lines;
        let mut children = vec![];
        let mut j = i + 1;
        while j < lines.len() && lines[j].quote_depth > 0 {
            let c = &lines[j];
            let remainder = &c.text[c.quote_offset..];
            children.extend(link_blocks(c.content.start + c.quote_offset, remainder));
            j += 1;
        }

        let start = lines[i].start();
        let end = lines[j - 1].end().max(start);
        let mut block = self
            .block(BlockKind::Note, start, end)
            .with_tag(kind)
            .with_children(children);
        if j - 1 > i {
            let body_start = lines[i + 1].start().max(start);
            block = block.with_content(Span::new(body_start, end.max(body_start)));
        }
        (block, j)
    }

    /// A pipe table. Cells of the first row become `TableColumn` children,
    /// separator rows are skipped and other rows become `TableRow` children.
    fn table(&self, i: usize) -> (ContentBlock, usize) {
        let lines = self.lines;
        let mut children = vec![];
        let mut j = i;
        while j < lines.len() && lines[j].table_row {
            let c = &lines[j];
            if j == i {
                children.extend(self.cells(c, BlockKind::TableColumn));
            } else if !c.table_separator {
                let row = self
                    .block(BlockKind::TableRow, c.start(), c.end())
                    .with_children(self.cells(c, BlockKind::TableRowValue));
                children.push(row);
            }
            j += 1;
        }

        let start = lines[i].start();
        let end = lines[j - 1].end().max(start);
        (
            self.block(BlockKind::Table, start, end).with_children(children),
            j,
        )
    }

    fn cells(&self, c: &LineClass, kind: BlockKind) -> Vec<ContentBlock> {
        Table::split_cells(&c.text, c.content.start)
            .into_iter()
            .map(|cell| {
                let text = &self.source[cell.start..cell.end];
                ContentBlock::new(kind, cell, text)
                    .with_content(cell)
                    .with_children(link_blocks(cell.start, text))
            })
            .collect()
    }

    /// A list whose first item is on line `i`. Items continue while markers
    /// of the same type appear at the same indentation.
    fn list(&self, i: usize, marker: ListMarker, depth: u8) -> (ContentBlock, usize) {
        let lines = self.lines;
        let continues = |k: usize| {
            let c = &lines[k];
            c.indent > marker.indent
                || c.list
                    .is_some_and(|m| m.indent == marker.indent && m.ordered == marker.ordered)
        };

        let mut items = vec![];
        let mut j = i;
        while j < lines.len() {
            let c = &lines[j];
            if c.is_blank {
                match self.next_non_blank(j) {
                    Some(k) if continues(k) => {
                        j = k;
                        continue;
                    }
                    _ => break,
                }
            }
            let Some(m) = c
                .list
                .filter(|m| m.indent == marker.indent && m.ordered == marker.ordered)
            else {
                break;
            };
            let (item, next) = self.list_item(j, m, depth);
            items.push(item);
            j = next;
        }

        let kind = if marker.ordered {
            BlockKind::NumberedList
        } else {
            BlockKind::BulletedList
        };
        let start = items.first().map_or(lines[i].start(), ContentBlock::start);
        let end = items.last().map_or(start, ContentBlock::end);
        let block = self
            .block(kind, start, end)
            .with_level(depth)
            .with_children(items);
        (block, j)
    }

    fn list_item(&self, i: usize, marker: ListMarker, depth: u8) -> (ContentBlock, usize) {
        let lines = self.lines;
        let c = &lines[i];
        let start = c.start();
        let first_end = c.end();
        let text_start = (c.content.start + marker.content_offset).min(first_end);
        let text = &self.source[text_start..first_end];

        let mut children = link_blocks(text_start, text);
        let mut end = first_end;
        let mut k = i + 1;
        while k < lines.len() {
            let c2 = &lines[k];
            if c2.is_blank {
                match self.next_non_blank(k) {
                    Some(nb) if lines[nb].indent > marker.indent => {
                        k = nb;
                        continue;
                    }
                    _ => break,
                }
            }
            if c2.indent <= marker.indent {
                break;
            }

            let (child, next) = if let Some(m2) = c2.list {
                self.list(k, m2, depth.saturating_add(1))
            } else if let Some(sig) = &c2.fence {
                self.fence(k, sig)
            } else {
                let row = self
                    .block(BlockKind::ListRow, c2.start(), c2.end())
                    .with_children(link_blocks(c2.start(), &self.source[c2.start()..c2.end()]));
                (row, k + 1)
            };
            end = child.end();
            children.push(child);
            k = next;
        }

        let block = self
            .block(BlockKind::ListItem, start, end)
            .with_level(depth)
            .with_content(Span::new(text_start, first_end))
            .with_children(children);
        (block, k)
    }

    fn next_non_blank(&self, from: usize) -> Option<usize> {
        (from..self.lines.len()).find(|k| !self.lines[*k].is_blank)
    }
}

/// Assigns each header its section: from the heading to the next heading of
/// equal or shallower level among its siblings, or to `limit`.
pub fn assign_sections(blocks: &mut [ContentBlock], limit: usize) {
    for k in 0..blocks.len() {
        match blocks[k].kind {
            BlockKind::Header => {
                let level = blocks[k].level;
                let end = blocks[k + 1..]
                    .iter()
                    .find(|b| b.kind == BlockKind::Header && b.level <= level)
                    .map_or(limit, ContentBlock::start);
                blocks[k].section = Some(Span::new(blocks[k].start(), end));
            }
            BlockKind::ZonePivot => {
                let zone_end = blocks[k].end();
                assign_sections(&mut blocks[k].children, zone_end);
            }
            _ => {}
        }
    }
}
