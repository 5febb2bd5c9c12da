#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

/// What a line looks like when it opens or closes a fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceSig {
    pub kind: FenceKind,
    /// Number of fence characters in the run.
    pub len: usize,
    /// Info string after the run, trimmed.
    pub info: String,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    pub fn sig(remainder: &str) -> Option<FenceSig> {
        let t = remainder.trim_start().trim_end_matches(['\r', '\n']);
        let (kind, ch) = if t.starts_with(Self::BACKTICKS) {
            (FenceKind::Backticks, '`')
        } else if t.starts_with(Self::TILDES) {
            (FenceKind::Tildes, '~')
        } else {
            return None;
        };
        let len = t.chars().take_while(|c| *c == ch).count();
        let info = t[len..].trim();
        if kind == FenceKind::Backticks && info.contains('`') {
            return None;
        }
        Some(FenceSig {
            kind,
            len,
            info: info.to_string(),
        })
    }

    /// A fence closes on a bare run of the same character, at least as long
    /// as the opening run.
    pub fn closes(open: &FenceSig, line: Option<&FenceSig>) -> bool {
        matches!(
            line,
            Some(sig) if sig.kind == open.kind && sig.len >= open.len && sig.info.is_empty()
        )
    }

    /// The language of an info string: its first word, lower-cased.
    pub fn language(info: &str) -> String {
        info.split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}
