use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use thiserror::Error;

use super::rule::{AuditRule, RuleDescriptor};

/// The rule file shipped with the engine.
pub const DEFAULT_RULES: &str = include_str!("default-rules.json");

#[derive(Debug, Error)]
pub enum RuleLoadError {
    #[error("failed to read rules from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid rule JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("rule {rule_num}: unknown block kind `{name}`")]
    UnknownBlockKind { rule_num: u32, name: String },
    #[error("rule {rule_num}: invalid pattern: {source}")]
    Regex {
        rule_num: u32,
        #[source]
        source: regex::Error,
    },
}

/// Where rule JSON comes from.
#[derive(Debug, Clone, Copy)]
pub enum RuleSource<'a> {
    Path(&'a Path),
    Json(&'a str),
    Builtin,
}

/// Parses a JSON array of rule descriptors.
pub fn parse_rules(json: &str) -> Result<Vec<AuditRule>, RuleLoadError> {
    let descriptors: Vec<RuleDescriptor> = serde_json::from_str(json)?;
    descriptors.into_iter().map(AuditRule::from_descriptor).collect()
}

/// The rules, loaded exactly once.
///
/// The first successful [`load_rules`](Self::load_rules) wins; later calls
/// keep the loaded rules. A failed load leaves the registry empty so it can
/// be retried.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: OnceCell<Vec<AuditRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry already holding `rules`.
    pub fn with_rules(rules: Vec<AuditRule>) -> Self {
        Self {
            rules: OnceCell::with_value(rules),
        }
    }

    /// Loads rules from `source` unless already loaded. Returns the number of
    /// loaded rules.
    pub fn load_rules(&self, source: RuleSource<'_>) -> Result<usize, RuleLoadError> {
        if let Some(rules) = self.rules.get() {
            log::debug!("rules already loaded, ignoring {source:?}");
            return Ok(rules.len());
        }
        let rules = self.rules.get_or_try_init(|| {
            let rules = match source {
                RuleSource::Path(path) => {
                    let json = std::fs::read_to_string(path).map_err(|source| RuleLoadError::Io {
                        path: path.to_path_buf(),
                        source,
                    })?;
                    parse_rules(&json)?
                }
                RuleSource::Json(json) => parse_rules(json)?,
                RuleSource::Builtin => parse_rules(DEFAULT_RULES)?,
            };
            log::info!("loaded {} audit rules", rules.len());
            Ok::<_, RuleLoadError>(rules)
        })?;
        Ok(rules.len())
    }

    pub fn is_loaded(&self) -> bool {
        self.rules.get().is_some()
    }

    /// All loaded rules; empty before a successful load.
    pub fn rules(&self) -> &[AuditRule] {
        self.rules.get().map(Vec::as_slice).unwrap_or_default()
    }

    /// Rules of `rule_set` whose group matches `topic` and that don't depend
    /// on another rule, in load order.
    pub fn applicable(&self, rule_set: &str, topic: &str) -> Vec<&AuditRule> {
        self.rules()
            .iter()
            .filter(|r| r.applies_to(rule_set, topic))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RULES: &str = r#"[
        {"ruleNum": 2, "ruleSet": "MVC", "ruleGroup": "overview", "title": "Has H1",
         "check": {"kind": "requireBlock", "block": "Header", "level": 1}},
        {"ruleNum": 1, "ruleSet": "MVC", "ruleGroup": "Overview", "title": "Has topic",
         "check": {"kind": "requireMetadata", "keys": ["ms.topic"]}},
        {"ruleNum": 3, "ruleSet": "MVC", "ruleGroup": "overview", "dependsOn": 2, "title": "Follow-up",
         "check": {"kind": "headingHierarchy"}},
        {"ruleNum": 4, "ruleSet": "Other", "ruleGroup": "overview", "title": "Elsewhere",
         "check": {"kind": "headingHierarchy"}}
    ]"#;

    #[test]
    fn loads_once() {
        let registry = RuleRegistry::new();
        assert!(!registry.is_loaded());
        assert_eq!(registry.load_rules(RuleSource::Json(RULES)).unwrap(), 4);
        assert_eq!(registry.load_rules(RuleSource::Json("[]")).unwrap(), 4);
        assert_eq!(registry.rules().len(), 4);
    }

    #[test]
    fn failed_load_can_be_retried() {
        let registry = RuleRegistry::new();
        assert!(matches!(
            registry.load_rules(RuleSource::Json("{not json")),
            Err(RuleLoadError::Json(_))
        ));
        assert!(registry.rules().is_empty());
        assert_eq!(registry.load_rules(RuleSource::Json(RULES)).unwrap(), 4);
    }

    #[test]
    fn applicable_filters_set_topic_and_dependencies() {
        let registry = RuleRegistry::new();
        registry.load_rules(RuleSource::Json(RULES)).unwrap();
        let nums: Vec<u32> = registry
            .applicable("MVC", "OVERVIEW")
            .iter()
            .map(|r| r.rule_num)
            .collect();
        assert_eq!(nums, vec![2, 1]);
        assert!(registry.applicable("MVC", "tutorial").is_empty());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RULES.as_bytes()).unwrap();
        let registry = RuleRegistry::new();
        assert_eq!(registry.load_rules(RuleSource::Path(file.path())).unwrap(), 4);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let registry = RuleRegistry::new();
        let err = registry
            .load_rules(RuleSource::Path(Path::new("/nonexistent/rules.json")))
            .unwrap_err();
        assert!(matches!(err, RuleLoadError::Io { .. }));
    }

    #[test]
    fn bundled_rules_load() {
        let registry = RuleRegistry::new();
        let count = registry.load_rules(RuleSource::Builtin).unwrap();
        assert!(count > 0);
        assert!(registry.rules().iter().all(|r| r.rule_set == "MVC"));
    }
}
