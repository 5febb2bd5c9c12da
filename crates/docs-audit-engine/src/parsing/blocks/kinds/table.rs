use crate::parsing::rope::span::Span;

/// Pipe-table syntax: row detection, separator rows and cell splitting.
pub struct Table;

impl Table {
    pub const DELIMITER: u8 = b'|';
    pub const ESCAPE: u8 = b'\\';

    pub fn is_row(line: &str) -> bool {
        line.trim_start().as_bytes().first() == Some(&Self::DELIMITER)
    }

    /// `|---|:---:|` style rows separating the header from the body.
    pub fn is_separator(line: &str) -> bool {
        let t = line.trim();
        Self::is_row(t)
            && t.contains('-')
            && t.bytes()
                .all(|b| matches!(b, b'|' | b'-' | b':' | b' ' | b'\t'))
    }

    /// Splits a row into trimmed cell spans on unescaped `|`.
    ///
    /// `base` is the absolute offset of `row` in the source. Empty cells are
    /// reported as zero-width spans just after their opening delimiter.
    pub fn split_cells(row: &str, base: usize) -> Vec<Span> {
        let b = row.as_bytes();
        let mut bounds = vec![];
        let mut i = 0;
        while i < b.len() {
            match b[i] {
                Self::ESCAPE => i += 2,
                Self::DELIMITER => {
                    bounds.push(i);
                    i += 1;
                }
                _ => i += 1,
            }
        }

        let trimmed_end = row.trim_end().len();
        let leading = row.len() - row.trim_start().len();
        let mut cells = vec![];
        let mut cell_start = 0;
        for (n, &pipe) in bounds.iter().chain(std::iter::once(&trimmed_end)).enumerate() {
            let is_leading_pipe = n == 0 && pipe == leading;
            let is_trailing_edge = pipe == trimmed_end && cell_start >= trimmed_end;
            if !is_leading_pipe && !is_trailing_edge {
                cells.push(trim_span(row, cell_start, pipe, base));
            }
            cell_start = pipe + 1;
        }
        cells
    }
}

fn trim_span(row: &str, start: usize, end: usize, base: usize) -> Span {
    let cell = &row[start..end];
    let lead = cell.len() - cell.trim_start().len();
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Span::point(base + start);
    }
    Span::new(base + start + lead, base + start + lead + trimmed.len())
}
