//! Response-schema derivation for structured output.
//!
//! Gemini's `responseSchema` accepts an OpenAPI-style subset of JSON
//! Schema: no `$schema`, no `definitions`/`$ref`, no
//! `additionalProperties`, single `type` strings with a `nullable` flag,
//! and a restricted set of `format` values. This module turns the
//! draft-07 output of `schemars` into that subset.

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;

/// Formats Gemini understands; everything else is stripped.
const SUPPORTED_FORMATS: &[&str] = &["float", "double", "int32", "int64", "enum", "date-time"];

/// Trait for types that can be used as Gemini structured output.
///
/// Automatically implemented for any type that implements
/// `JsonSchema + DeserializeOwned`.
pub trait ResponseSchema: JsonSchema + DeserializeOwned {
    /// Generate a Gemini-compatible response schema for this type.
    fn response_schema() -> serde_json::Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        inline_refs(&mut value);

        if let serde_json::Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
            map.remove("title");
        }

        sanitize(&mut value);
        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> ResponseSchema for T {}

/// Recursively strip unsupported keywords and normalize nullable types.
fn sanitize(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            map.remove("additionalProperties");
            map.remove("title");

            // schemars encodes Option<T> as "type": ["T", "null"];
            // Gemini wants a single type plus "nullable": true.
            if let Some(serde_json::Value::Array(types)) = map.get("type").cloned() {
                let non_null: Vec<_> = types
                    .iter()
                    .filter(|t| t.as_str() != Some("null"))
                    .cloned()
                    .collect();
                if non_null.len() < types.len() {
                    map.insert("nullable".to_string(), serde_json::Value::Bool(true));
                }
                if let Some(first) = non_null.into_iter().next() {
                    map.insert("type".to_string(), first);
                }
            }

            if let Some(format) = map.get("format").and_then(|f| f.as_str()) {
                if !SUPPORTED_FORMATS.contains(&format) {
                    map.remove("format");
                }
            }

            // Bounds keywords from range attributes are not part of the subset
            map.remove("minimum");
            map.remove("maximum");
            map.remove("exclusiveMinimum");
            map.remove("exclusiveMaximum");

            for (_, v) in map.iter_mut() {
                sanitize(v);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                sanitize(item);
            }
        }
        _ => {}
    }
}

fn inline_refs(value: &mut serde_json::Value) {
    let definitions = if let serde_json::Value::Object(map) = value {
        map.get("definitions").cloned()
    } else {
        None
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut serde_json::Value, definitions: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(type_name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(type_name) {
                        let description = map.get("description").cloned();
                        *value = def.clone();
                        // A field-level description on the referring node
                        // survives the inlining
                        if let (Some(desc), serde_json::Value::Object(inner)) =
                            (description, &mut *value)
                        {
                            inner.entry("description".to_string()).or_insert(desc);
                        }
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }

            if let Some(serde_json::Value::Array(all_of)) = map.get("allOf").cloned() {
                if all_of.len() == 1 {
                    let description = map.get("description").cloned();
                    *value = all_of.into_iter().next().unwrap();
                    // Keep the field description that schemars hoisted above the allOf
                    if let (Some(desc), serde_json::Value::Object(inner)) = (description, &mut *value)
                    {
                        inner.entry("description".to_string()).or_insert(desc);
                    }
                    inline_refs_recursive(value, definitions);
                    return;
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}
