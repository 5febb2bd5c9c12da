//! Table-of-contents documents (`toc.yml`).
//!
//! A ToC is a YAML sequence of items with `name`, `href` and optional nested
//! `items`. Items are read by indentation so each block keeps its exact
//! source span.

use std::path::Path;

use crate::parsing::rope::span::Span;

use super::{
    classify::LineClass,
    kinds::FrontMatter,
    types::{BlockKind, ContentBlock},
};

/// True when `file_name` names a ToC file, or when the first meaningful
/// line looks like one (`- name:` or `items:`).
pub fn is_toc(file_name: &str, lines: &[LineClass]) -> bool {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name)
        .to_ascii_lowercase();
    if name == "toc.yml" || name == "toc.yaml" {
        return true;
    }

    let yaml = name.ends_with(".yml") || name.ends_with(".yaml");
    lines
        .iter()
        .find(|c| !c.is_blank && !(yaml && is_comment(c)))
        .is_some_and(|c| {
            let t = c.text.trim();
            t.starts_with("- name:") || t == "items:"
        })
}

/// Builds ToC item blocks from the first sequence in the document.
pub fn build(source: &str, lines: &[LineClass]) -> Vec<ContentBlock> {
    let Some(first) = lines.iter().position(|c| is_item(c) && !is_comment(c)) else {
        return vec![];
    };
    TocBuilder { source, lines }
        .items(first, lines[first].indent, 0)
        .0
}

fn is_item(c: &LineClass) -> bool {
    c.list.is_some_and(|m| !m.ordered) && c.text.trim_start().starts_with('-')
}

fn is_comment(c: &LineClass) -> bool {
    c.text.trim_start().starts_with('#')
}

#[derive(Default)]
struct ItemProps {
    name: Option<String>,
    has_items: bool,
    files: Vec<ContentBlock>,
}

struct TocBuilder<'a> {
    source: &'a str,
    lines: &'a [LineClass],
}

impl TocBuilder<'_> {
    /// Items at exactly `indent`, starting on line `i`.
    fn items(&self, mut i: usize, indent: usize, depth: u8) -> (Vec<ContentBlock>, usize) {
        let mut items = vec![];
        while i < self.lines.len() {
            let c = &self.lines[i];
            if c.is_blank || is_comment(c) {
                i += 1;
                continue;
            }
            if c.indent < indent {
                break;
            }
            if c.indent == indent {
                if !is_item(c) {
                    break;
                }
                let (item, next) = self.item(i, depth);
                items.push(item);
                i = next;
                continue;
            }
            i += 1;
        }
        (items, i)
    }

    fn item(&self, i: usize, depth: u8) -> (ContentBlock, usize) {
        let c = &self.lines[i];
        let mut props = ItemProps::default();
        let mut children = vec![];
        if let Some(m) = c.list {
            self.property(c, m.content_offset, &mut props);
        }
        children.append(&mut props.files);

        let start = c.start();
        let mut end = c.end();
        let mut k = i + 1;
        while k < self.lines.len() {
            let c2 = &self.lines[k];
            if c2.is_blank || is_comment(c2) {
                k += 1;
                continue;
            }
            if c2.indent <= c.indent {
                break;
            }
            if is_item(c2) {
                let (nested, next) = self.items(k, c2.indent, depth.saturating_add(1));
                if let Some(last) = nested.last() {
                    end = last.end();
                    props.has_items = true;
                }
                children.extend(nested);
                k = next;
                continue;
            }
            self.property(c2, c2.indent_bytes, &mut props);
            children.append(&mut props.files);
            end = c2.end();
            k += 1;
        }

        let kind = match (depth == 0, props.has_items) {
            (true, true) => BlockKind::TocTopNode,
            (true, false) => BlockKind::TocTopEntry,
            (false, true) => BlockKind::TocNode,
            (false, false) => BlockKind::TocEntry,
        };
        let mut block = ContentBlock::from_source(kind, Span::new(start, end), self.source)
            .with_level(depth)
            .with_children(children);
        if let Some(name) = props.name {
            block = block.with_tag(name);
        }
        (block, k)
    }

    /// Reads the `key: value` pair starting at byte `offset` of line `c`.
    fn property(&self, c: &LineClass, offset: usize, props: &mut ItemProps) {
        let Some(rest) = c.text.get(offset..) else {
            return;
        };
        let Some(field) = FrontMatter::field(rest) else {
            return;
        };
        let key = &rest[field.key.0..field.key.1];
        let base = c.content.start + offset;
        let value = unquote(Span::new(base + field.value.0, base + field.value.1), self.source);
        let value_text = &self.source[value.start..value.end];

        match key {
            "name" => props.name = Some(value_text.to_string()),
            "items" => props.has_items = true,
            "href" if !value.is_empty() => props.files.push(
                ContentBlock::new(BlockKind::FileName, value, value_text)
                    .with_target(value)
                    .with_tag(value_text),
            ),
            _ => {}
        }
    }
}

/// Narrows a span to exclude matching surrounding quotes.
fn unquote(span: Span, source: &str) -> Span {
    let s = &source[span.start..span.end];
    let quoted = s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')));
    if quoted {
        Span::new(span.start + 1, span.end - 1)
    } else {
        span
    }
}
