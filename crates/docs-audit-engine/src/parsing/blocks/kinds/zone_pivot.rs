use std::sync::LazyLock;

use regex::Regex;

static ZONE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:::\s*zone\s+(\S.*?)\s*$").expect("valid zone regex"));
static ZONE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:::\s*zone-end\s*$").expect("valid zone-end regex"));

/// `::: zone pivot="..."` / `::: zone-end` fenced sections.
pub struct ZonePivot;

impl ZonePivot {
    /// The zone's attribute text (e.g. `pivot="cli"`) when `line` opens a zone.
    pub fn open(line: &str) -> Option<String> {
        ZONE_OPEN
            .captures(line.trim())
            .map(|caps| caps[1].to_string())
    }

    pub fn is_end(line: &str) -> bool {
        ZONE_END.is_match(line.trim())
    }
}
