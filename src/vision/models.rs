//! Data model for classification results

use serde_json::Value;

/// Classification result returned by the vision service.
///
/// The raw payload is retained untouched because the API echoes it back to
/// the caller; `tags` is the flattened view used for notification routing.
#[derive(Debug, Clone)]
pub struct Analysis {
    raw: Value,
    tags: Vec<String>,
}

impl Analysis {
    /// Build an analysis from the upstream JSON body
    pub fn from_value(raw: Value) -> Self {
        let tags = extract_tags(&raw);
        Self { raw, tags }
    }

    /// Tag strings found in the payload
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Exact, case-sensitive tag membership test
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// The untouched upstream payload
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Consume the analysis, yielding the upstream payload
    pub fn into_raw(self) -> Value {
        self.raw
    }
}

/// Pull tag strings out of the payload's `tags` array.
///
/// Entries may be plain strings or objects carrying a `name` field;
/// anything else is skipped.
fn extract_tags(raw: &Value) -> Vec<String> {
    let Some(entries) = raw.get("tags").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(tag) => Some(tag.clone()),
            Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .collect()
}
