use std::sync::LazyLock;

use regex::Regex;

static ALERT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\[!(NOTE|TIP|IMPORTANT|CAUTION|WARNING)\]\s*$").expect("valid alert regex")
});

/// Blockquote prefix handling and the `> [!NOTE]` alert syntax built on it.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    /// Strips blockquote prefixes from a line, returning (depth, byte_offset).
    ///
    /// Handles various forms: `> text`, `>> nested`, `> > spaced nested`.
    pub fn strip_prefixes(s: &str) -> (u8, usize) {
        let b = s.as_bytes();
        let mut i = 0usize;
        let mut depth = 0u8;

        loop {
            while i < b.len() && b[i] == b' ' {
                i += 1;
            }
            if i < b.len() && b[i] == (Self::PREFIX as u8) {
                depth = depth.saturating_add(1);
                i += 1;
                if i < b.len() && b[i] == b' ' {
                    i += 1;
                }
            } else {
                break;
            }
        }
        if depth == 0 {
            return (0, 0);
        }
        (depth, i)
    }

    /// The alert type (upper-cased) when the quoted remainder is an alert
    /// marker such as `[!NOTE]`.
    pub fn alert(remainder: &str) -> Option<String> {
        ALERT
            .captures(remainder.trim())
            .map(|caps| caps[1].to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_no_quote() {
        assert_eq!(BlockQuote::strip_prefixes("hello"), (0, 0));
        assert_eq!(BlockQuote::strip_prefixes("  indented"), (0, 0));
    }

    #[test]
    fn strip_single_quote() {
        assert_eq!(BlockQuote::strip_prefixes("> hello"), (1, 2));
    }

    #[test]
    fn strip_nested_quote_no_space() {
        assert_eq!(BlockQuote::strip_prefixes(">> hello"), (2, 3));
    }

    #[test]
    fn alert_types() {
        assert_eq!(BlockQuote::alert("[!NOTE]").as_deref(), Some("NOTE"));
        assert_eq!(BlockQuote::alert("[!tip] ").as_deref(), Some("TIP"));
        assert_eq!(BlockQuote::alert("[!BANNER]"), None);
        assert_eq!(BlockQuote::alert("plain quote"), None);
    }
}
