use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Metadata, MetadataError};

/// The parts of a `docfx.json` build configuration that feed metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocFxConfig {
    #[serde(default)]
    build: DocFxBuild,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DocFxBuild {
    #[serde(default, rename = "globalMetadata")]
    global_metadata: Map<String, Value>,
}

impl DocFxConfig {
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// `build.globalMetadata` as metadata. Arrays are joined with `", "`;
    /// nested objects are skipped.
    pub fn global_metadata(&self) -> Metadata {
        self.build
            .global_metadata
            .iter()
            .filter_map(|(key, value)| json_scalar(value).map(|v| (key, v)))
            .collect()
    }
}

fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(json_scalar)
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}
