use std::sync::LazyLock;

use regex::Regex;

static TAB_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[^\]]+\]\(#tab/([^)\s]+)\)$").expect("valid tab regex")
});

/// Where the title of an ATX heading sits within its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingSig {
    pub level: u8,
    /// Byte offset of the title within the line.
    pub title_start: usize,
    /// Byte offset just past the title (closing `#`s and spaces excluded).
    pub title_end: usize,
}

pub struct Heading;

impl Heading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// Recognizes `# Title`. In lenient mode `#Title` is accepted too.
    pub fn sig(line: &str, strict: bool) -> Option<HeadingSig> {
        let b = line.as_bytes();
        let lead = b.iter().take_while(|c| **c == b' ').count();
        if lead > 3 {
            return None;
        }
        let hashes = b[lead..].iter().take_while(|c| **c == Self::MARKER).count();
        if hashes == 0 || hashes > Self::MAX_LEVEL {
            return None;
        }
        let after = lead + hashes;
        match b.get(after) {
            None | Some(b' ') | Some(b'\t') => {}
            Some(_) if strict => return None,
            Some(_) => {}
        }

        let rest = &line[after..];
        let title_start = after + (rest.len() - rest.trim_start().len());
        let mut title = line[title_start..].trim_end();
        // Optional closing sequence: `## Title ##`
        let without_closing = title.trim_end_matches('#');
        if without_closing.len() != title.len()
            && (without_closing.is_empty() || without_closing.ends_with([' ', '\t']))
        {
            title = without_closing.trim_end();
        }

        Some(HeadingSig {
            level: hashes as u8,
            title_start,
            title_end: title_start + title.len(),
        })
    }

    /// The tab id when a heading title is a conceptual tab link such as
    /// `[Linux](#tab/linux)`.
    pub fn tab_id(title: &str) -> Option<&str> {
        TAB_LINK
            .captures(title)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}
