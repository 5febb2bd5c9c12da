use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::rope::span::Span;

static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_.\-]*)[ \t]*:(?:[ \t]+(.*?))?[ \t]*$")
        .expect("valid field regex")
});

/// Where the front matter sits in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatterBounds {
    /// From the opening delimiter to the end of the closing delimiter text.
    pub block: Span,
    /// The lines between the delimiters.
    pub body: Span,
}

/// A `key: value` line inside front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSig {
    /// Key span, relative to the line.
    pub key: (usize, usize),
    /// Value span, relative to the line. Empty for `key:` lines.
    pub value: (usize, usize),
}

/// YAML front matter delimited by `---` lines at the top of a document.
pub struct FrontMatter;

impl FrontMatter {
    pub const DELIMITER: &'static str = "---";
    pub const BOM: char = '\u{feff}';

    /// Finds front matter at the start of `text`. Unterminated front matter
    /// is not front matter.
    pub fn locate(text: &str) -> Option<FrontMatterBounds> {
        let start = if text.starts_with(Self::BOM) {
            Self::BOM.len_utf8()
        } else {
            0
        };

        let mut offset = start;
        let mut lines = text[start..].split_inclusive('\n');
        let first = lines.next()?;
        if first.trim_end() != Self::DELIMITER {
            return None;
        }
        offset += first.len();
        let body_start = offset;

        for line in lines {
            let content = line.trim_end();
            if content == Self::DELIMITER || content == "..." {
                return Some(FrontMatterBounds {
                    block: Span::new(start, offset + content.len()),
                    body: Span::new(body_start, offset),
                });
            }
            offset += line.len();
        }
        None
    }

    /// Recognizes a top-level `key: value` line.
    pub fn field(line: &str) -> Option<FieldSig> {
        let caps = FIELD.captures(line)?;
        let key = caps.get(1)?;
        let value = caps
            .get(2)
            .map(|m| (m.start(), m.end()))
            .unwrap_or((key.end() + 1, key.end() + 1));
        Some(FieldSig {
            key: (key.start(), key.end()),
            value,
        })
    }
}
