use super::Metadata;
use crate::parsing::blocks::kinds::{CodeFence, FrontMatter, Heading};

/// Best-effort metadata for documents whose front matter can't be parsed.
///
/// Scans lines up to the first heading, skipping fenced code, and takes every
/// top-level `key: value` line with a non-empty value. The first occurrence
/// of a key wins and surrounding quotes are stripped.
pub fn extract_metadata(raw_text: &str) -> Metadata {
    let mut metadata = Metadata::new();
    let mut fence = None;

    let text = raw_text.strip_prefix(FrontMatter::BOM).unwrap_or(raw_text);
    for line in text.lines() {
        let sig = CodeFence::sig(line);
        if let Some(open) = &fence {
            if CodeFence::closes(open, sig.as_ref()) {
                fence = None;
            }
            continue;
        }
        if sig.is_some() {
            fence = sig;
            continue;
        }
        if Heading::sig(line, true).is_some() {
            break;
        }

        let Some(field) = FrontMatter::field(line) else {
            continue;
        };
        let value = unquote(line[field.value.0..field.value.1].trim());
        if value.is_empty() {
            continue;
        }
        metadata.insert_if_absent(&line[field.key.0..field.key.1], value);
    }

    log::debug!("heuristic metadata extraction found {} keys", metadata.len());
    metadata
}

fn unquote(s: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            return inner;
        }
    }
    s
}
