/// A list marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub ordered: bool,
    /// Indentation of the marker in columns (a tab counts as four).
    pub indent: usize,
    /// Byte offset of the item text within the line.
    pub content_offset: usize,
}

pub struct ListSyntax;

impl ListSyntax {
    pub const BULLETS: [u8; 3] = [b'-', b'*', b'+'];
    pub const ORDERED_DELIMITERS: [u8; 2] = [b'.', b')'];
    const MAX_ORDINAL_DIGITS: usize = 9;

    pub fn marker(line: &str) -> Option<ListMarker> {
        let b = line.as_bytes();
        let (indent, lead) = indentation(line);

        let (ordered, marker_end) = if b.get(lead).is_some_and(|c| Self::BULLETS.contains(c)) {
            (false, lead + 1)
        } else {
            let digits = b[lead..].iter().take_while(|c| c.is_ascii_digit()).count();
            if digits == 0 || digits > Self::MAX_ORDINAL_DIGITS {
                return None;
            }
            if !b
                .get(lead + digits)
                .is_some_and(|c| Self::ORDERED_DELIMITERS.contains(c))
            {
                return None;
            }
            (true, lead + digits + 1)
        };

        match b.get(marker_end) {
            None => Some(ListMarker {
                ordered,
                indent,
                content_offset: marker_end,
            }),
            Some(b' ') | Some(b'\t') => {
                let spaces = b[marker_end..]
                    .iter()
                    .take_while(|c| **c == b' ' || **c == b'\t')
                    .count();
                Some(ListMarker {
                    ordered,
                    indent,
                    content_offset: marker_end + spaces,
                })
            }
            Some(_) => None,
        }
    }
}

/// Leading whitespace as (columns, bytes).
pub fn indentation(line: &str) -> (usize, usize) {
    let mut columns = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => columns += 1,
            b'\t' => columns += 4,
            _ => break,
        }
        bytes += 1;
    }
    (columns, bytes)
}
