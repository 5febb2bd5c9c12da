use super::normalize_key;

/// A host-supplied metadata value that replaces whatever the document says,
/// e.g. `{ kind: "ms.topic", replacement: "ms.topic: quickstart" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataReplacement {
    pub kind: String,
    pub replacement: String,
}

impl MetadataReplacement {
    pub fn new(kind: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            replacement: replacement.into(),
        }
    }

    /// The normalized metadata key this replacement applies to.
    pub fn key(&self) -> String {
        normalize_key(&self.kind)
    }

    /// The replacement value with any leading `<kind>:` removed.
    pub fn value(&self) -> &str {
        let r = self.replacement.trim();
        r.strip_prefix(self.kind.as_str())
            .and_then(|rest| rest.trim_start().strip_prefix(':'))
            .map_or(r, str::trim)
    }

    /// The front-matter line for this replacement: `<kind>: <value>`.
    pub fn to_replacement_string(&self) -> String {
        format!("{}: {}", self.kind, self.value())
    }
}
