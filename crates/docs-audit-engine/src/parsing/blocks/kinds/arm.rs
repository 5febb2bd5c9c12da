use std::sync::LazyLock;

use regex::Regex;

use crate::parsing::{
    blocks::types::{BlockKind, ContentBlock},
    rope::span::Span,
};

static JSON_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""type"\s*:\s*"(?P<ns>[A-Za-z][A-Za-z0-9]*(?:\.[A-Za-z0-9]+)+)/(?P<rt>[A-Za-z0-9/]+)""#)
        .expect("valid ARM json regex")
});
static BICEP_RESOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"resource\s+\w+\s+'(?P<ns>[A-Za-z][A-Za-z0-9]*(?:\.[A-Za-z0-9]+)+)/(?P<rt>[A-Za-z0-9/]+)(?:@[^']*)?'")
        .expect("valid bicep regex")
});

/// Azure Resource Manager resource types inside template code fences.
pub struct ArmTemplate;

impl ArmTemplate {
    pub const LANGUAGES: [&'static str; 4] = ["json", "jsonc", "arm", "bicep"];

    pub fn applies_to(language: &str) -> bool {
        Self::LANGUAGES.contains(&language)
    }

    /// Resource type blocks found in one fence line starting at `base`.
    ///
    /// Each `CodeFenceArmResourceType` spans `Namespace/type` and owns a
    /// `CodeFenceArmNamespace` child spanning the namespace.
    pub fn resource_types(line: &str, base: usize, language: &str) -> Vec<ContentBlock> {
        let pattern = if language == "bicep" {
            &BICEP_RESOURCE
        } else {
            &JSON_TYPE
        };

        pattern
            .captures_iter(line)
            .filter_map(|caps| {
                let ns = caps.name("ns")?;
                let rt = caps.name("rt")?;
                let full = Span::new(base + ns.start(), base + rt.end());
                let namespace = Span::new(base + ns.start(), base + ns.end());
                Some(
                    ContentBlock::new(
                        BlockKind::CodeFenceArmResourceType,
                        full,
                        &line[ns.start()..rt.end()],
                    )
                    .with_tag(rt.as_str())
                    .with_children(vec![
                        ContentBlock::new(BlockKind::CodeFenceArmNamespace, namespace, ns.as_str())
                            .with_tag(ns.as_str()),
                    ]),
                )
            })
            .collect()
    }
}
