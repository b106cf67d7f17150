//! Joins Stage 1 layer definitions with Stage 2 file assignments.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Merged boundaries keyed by name, in Stage 1 order.
pub type Boundaries = IndexMap<String, MergedBoundary>;

/// One boundary with its layers and their assigned paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedBoundary {
    /// Patterns reported by Stage 1, `[]` when absent.
    pub architecture_patterns: Value,
    /// Stage 1 layers with Stage 2 membership attached.
    pub layers: Vec<MergedLayer>,
    /// Dependency description from Stage 1, `""` when absent.
    pub dependency_flow: Value,
}

/// A layer definition plus the folders and files mapped to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedLayer {
    /// Layer name as given by Stage 1.
    pub name: Value,
    /// Stage 1 responsibility text.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub responsibility: Value,
    /// Stage 1 identification hints.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub characteristics: Value,
    /// Folders Stage 2 placed in this layer.
    pub folders: Vec<Value>,
    /// Files Stage 2 placed in this layer.
    pub files: Vec<Value>,
}

/// Merges the two stage results.
///
/// Stage 1 decides which boundaries and layers exist; Stage 2 only supplies
/// membership, matched by exact layer name within the same boundary. Layers
/// or boundaries that appear only in Stage 2 are dropped.
#[must_use]
pub fn merge(stage1: &Value, stage2: &Value) -> Boundaries {
    let mut merged = Boundaries::new();

    let Some(boundaries) = stage1.get("boundaries").and_then(Value::as_object) else {
        return merged;
    };

    for (name, boundary) in boundaries {
        let stage2_layers = stage2
            .get("boundaries")
            .and_then(|b| b.get(name))
            .map_or(&[][..], |b| array(b, "layers"));

        let layers = array(boundary, "layers")
            .iter()
            .map(|layer| {
                let layer_name = field(layer, "name");
                let assigned = stage2_layers.iter().find(|l| field(l, "name") == layer_name);
                MergedLayer {
                    name: layer_name.clone(),
                    responsibility: field(layer, "responsibility").clone(),
                    characteristics: field(layer, "characteristics").clone(),
                    folders: assigned.map_or_else(Vec::new, |l| array(l, "folders").to_vec()),
                    files: assigned.map_or_else(Vec::new, |l| array(l, "files").to_vec()),
                }
            })
            .collect();

        merged.insert(
            name.clone(),
            MergedBoundary {
                architecture_patterns: or_default(boundary, "architecturePatterns", Value::Array(Vec::new())),
                layers,
                dependency_flow: or_default(boundary, "dependencyFlow", Value::String(String::new())),
            },
        );
    }

    merged
}

static NULL: Value = Value::Null;

/// Looks up `key`, falling back to `Null`.
pub(crate) fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

/// Looks up an array at `key`, falling back to an empty slice.
pub(crate) fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value.get(key).and_then(Value::as_array).map_or(&[][..], Vec::as_slice)
}

/// Clones `key` unless it is absent, null or an empty string.
pub(crate) fn or_default(value: &Value, key: &str, default: Value) -> Value {
    match value.get(key) {
        None | Some(Value::Null) => default,
        Some(Value::String(s)) if s.is_empty() => default,
        Some(v) => v.clone(),
    }
}
