//! JSON schemas for strict structured output, generated from Rust types.
//!
//! ```rust,ignore
//! #[derive(Deserialize, JsonSchema)]
//! struct Assessment {
//!     score: u8,
//!     summary: String,
//! }
//!
//! let schema = Assessment::openai_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Keywords that strict mode rejects and that carry no meaning for the model.
const UNSUPPORTED_KEYWORDS: &[&str] = &["format", "$schema", "title"];

/// Types usable as a strict structured-output target.
///
/// Blanket-implemented for every `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Schema in the shape strict mode accepts:
    /// every object closed with `additionalProperties: false`, every property
    /// listed in `required`, and no `$ref` indirection.
    fn openai_schema() -> Value {
        let mut value = serde_json::to_value(schema_for!(Self)).unwrap_or_default();

        let definitions = match &mut value {
            Value::Object(map) => map.remove("definitions"),
            _ => None,
        };
        if let Some(definitions) = definitions {
            inline_refs(&mut value, &definitions);
        }
        close_objects(&mut value);
        strip_keywords(&mut value);

        value
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Replace every `#/definitions/X` reference with a copy of `X`.
fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(mut inlined) = target {
                inline_refs(&mut inlined, definitions);
                *value = inlined;
                return;
            }

            for child in map.values_mut() {
                inline_refs(child, definitions);
            }
        }
        Value::Array(items) => {
            for item in items {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

/// Close every object schema and require all of its properties.
fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if is_object_schema(map) {
                map.insert("additionalProperties".into(), Value::Bool(false));
                let keys: Vec<Value> = map
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| props.keys().cloned().map(Value::String).collect())
                    .unwrap_or_default();
                map.insert("required".into(), Value::Array(keys));
            }
            for child in map.values_mut() {
                close_objects(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                close_objects(item);
            }
        }
        _ => {}
    }
}

fn is_object_schema(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(t)) => t == "object",
        Some(Value::Array(types)) => types.iter().any(|t| t == "object"),
        _ => false,
    }
}

fn strip_keywords(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for keyword in UNSUPPORTED_KEYWORDS {
                // "format"/"title" may legitimately be property names
                if !matches!(map.get(*keyword), Some(Value::Object(_))) {
                    map.remove(*keyword);
                }
            }
            for child in map.values_mut() {
                strip_keywords(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_keywords(item);
            }
        }
        _ => {}
    }
}
