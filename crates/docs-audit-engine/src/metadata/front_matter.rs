use serde_yaml::Value;

use super::{Metadata, MetadataError};
use crate::parsing::blocks::kinds::FrontMatter;

/// The raw metadata text of a document, or an empty string when it has none.
///
/// Markdown documents keep it in front matter. YAML documents (`.yml`,
/// `.yaml`) keep it under a top-level `metadata:` key; its body is returned
/// dedented.
pub fn get_metadata(raw_text: &str, file_name: &str) -> String {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".yml") || lower.ends_with(".yaml") {
        return yaml_metadata_section(raw_text);
    }
    FrontMatter::locate(raw_text)
        .map(|fm| raw_text[fm.body.start..fm.body.end].to_string())
        .unwrap_or_default()
}

fn yaml_metadata_section(raw_text: &str) -> String {
    let mut lines = raw_text.lines().skip_while(|l| l.trim_end() != "metadata:");
    if lines.next().is_none() {
        return String::new();
    }
    let body: Vec<&str> = lines
        .take_while(|l| l.trim().is_empty() || l.starts_with([' ', '\t']))
        .collect();
    let indent = body
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = String::new();
    for line in body {
        out.push_str(line.get(indent..).unwrap_or("").trim_end());
        out.push('\n');
    }
    out
}

/// Parses front-matter text into metadata.
///
/// Scalars become strings, sequences are joined with `", "` and nested
/// mappings are flattened with `_` (`a: {b: 1}` becomes `a_b`). Empty text
/// yields empty metadata.
pub fn read_metadata(front_matter: &str) -> Result<Metadata, MetadataError> {
    if front_matter.trim().is_empty() {
        return Ok(Metadata::new());
    }
    let value: Value = serde_yaml::from_str(front_matter)?;
    let mut metadata = Metadata::new();
    match value {
        Value::Null => {}
        Value::Mapping(_) => flatten("", &value, &mut metadata),
        _ => return Err(MetadataError::NotAMapping),
    }
    Ok(metadata)
}

fn flatten(prefix: &str, value: &Value, out: &mut Metadata) {
    let Value::Mapping(map) = value else {
        out.insert(prefix, scalar(value));
        return;
    };
    for (k, v) in map {
        let key = scalar(k);
        let key = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}_{key}")
        };
        flatten(&key, v, out);
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items
            .iter()
            .map(scalar)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Mapping(_) => serde_yaml::to_string(value)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        Value::Tagged(tagged) => scalar(&tagged.value),
    }
}
