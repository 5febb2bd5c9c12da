use super::{
    classify::LineClass,
    kinds::{BlockQuote, FenceSig, HeadingSig, ListMarker, ZonePivot},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOpen {
    FencedCode(FenceSig),
    /// Zone attributes, e.g. `pivot="cli"`.
    Zone(String),
    Heading(HeadingSig),
    /// Alert type, e.g. `NOTE`.
    Note(String),
    Table,
    List(ListMarker),
}

/// Decides whether line `i` opens a block.
///
/// Precedence: fence, zone, heading, note, table, list. In strict mode a
/// table needs a separator row right after its first row.
pub fn try_open(lines: &[LineClass], i: usize, strict: bool) -> Option<BlockOpen> {
    let c = &lines[i];

    if let Some(sig) = &c.fence {
        return Some(BlockOpen::FencedCode(sig.clone()));
    }
    if c.quote_depth == 0
        && let Some(attrs) = ZonePivot::open(&c.text)
    {
        return Some(BlockOpen::Zone(attrs));
    }
    if let Some(sig) = c.heading {
        return Some(BlockOpen::Heading(sig));
    }
    if c.quote_depth > 0
        && let Some(kind) = BlockQuote::alert(&c.text[c.quote_offset..])
    {
        return Some(BlockOpen::Note(kind));
    }
    if c.table_row && (!strict || lines.get(i + 1).is_some_and(|next| next.table_separator)) {
        return Some(BlockOpen::Table);
    }
    if let Some(marker) = c.list {
        return Some(BlockOpen::List(marker));
    }
    None
}
