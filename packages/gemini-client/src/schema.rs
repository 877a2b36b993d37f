//! Type-safe schema generation for Gemini structured outputs.
//!
//! Uses the `schemars` crate to generate a JSON schema from a Rust type, then
//! rewrites it into the OpenAPI subset accepted by `responseSchema`.
//!
//! # Example
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use gemini_client::StructuredOutput;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Dish {
//!     name: String,
//!     price: f64,
//! }
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Response {
//!     dishes: Vec<Dish>,
//! }
//!
//! let schema = Response::gemini_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Keys Gemini accepts on a schema node. Everything else is dropped.
const PASSTHROUGH_KEYS: &[&str] = &["description", "enum", "minItems", "maxItems"];

/// Trait for types that can be used as Gemini structured output.
///
/// Automatically implemented for any type that implements `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate a Gemini-compatible response schema for this type.
    ///
    /// Gemini requires:
    /// 1. Upper-case type names (`OBJECT`, `STRING`, ...)
    /// 2. `nullable: true` instead of `["string", "null"]` type unions
    /// 3. Fully inlined schemas (no `$ref`, no `definitions`)
    /// 4. No JSON Schema keywords outside its subset (`default`, `title`, `format`, ...)
    fn gemini_schema() -> Value {
        let schema = schema_for!(Self);
        let value = serde_json::to_value(schema).unwrap_or_default();

        let definitions = value
            .get("definitions")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        convert_node(&value, &definitions)
    }
}

// Blanket implementation for all types that satisfy the bounds
impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Convert one JSON Schema node (and its children) to Gemini's format.
fn convert_node(node: &Value, definitions: &Map<String, Value>) -> Value {
    let Some(map) = node.as_object() else {
        return node.clone();
    };

    // Inline $ref, keeping a local description if the referring node had one
    if let Some(Value::String(ref_path)) = map.get("$ref") {
        let name = ref_path.trim_start_matches("#/definitions/");
        if let Some(def) = definitions.get(name) {
            let mut inlined = convert_node(def, definitions);
            if let (Some(desc), Value::Object(out)) = (map.get("description"), &mut inlined) {
                out.insert("description".to_string(), desc.clone());
            }
            return inlined;
        }
    }

    // Option<Struct> renders as anyOf [ {$ref}, {type: null} ]
    if let Some(Value::Array(variants)) = map.get("anyOf") {
        let non_null: Vec<&Value> = variants
            .iter()
            .filter(|v| v.get("type") != Some(&Value::String("null".to_string())))
            .collect();
        if non_null.len() == 1 && non_null.len() < variants.len() {
            let mut inner = convert_node(non_null[0], definitions);
            if let Value::Object(out) = &mut inner {
                out.insert("nullable".to_string(), Value::Bool(true));
                if let Some(desc) = map.get("description") {
                    out.insert("description".to_string(), desc.clone());
                }
            }
            return inner;
        }
    }

    let mut out = Map::new();

    match map.get("type") {
        Some(Value::String(t)) => {
            out.insert("type".to_string(), Value::String(t.to_uppercase()));
        }
        Some(Value::Array(types)) => {
            let mut nullable = false;
            for t in types.iter().filter_map(Value::as_str) {
                if t == "null" {
                    nullable = true;
                } else if !out.contains_key("type") {
                    out.insert("type".to_string(), Value::String(t.to_uppercase()));
                }
            }
            if nullable {
                out.insert("nullable".to_string(), Value::Bool(true));
            }
        }
        _ => {}
    }

    for key in PASSTHROUGH_KEYS {
        if let Some(v) = map.get(*key) {
            out.insert((*key).to_string(), v.clone());
        }
    }

    if let Some(Value::Object(props)) = map.get("properties") {
        let converted: Map<String, Value> = props
            .iter()
            .map(|(k, v)| (k.clone(), convert_node(v, definitions)))
            .collect();
        out.insert("properties".to_string(), Value::Object(converted));
    }

    if let Some(Value::Array(required)) = map.get("required") {
        if !required.is_empty() {
            out.insert("required".to_string(), Value::Array(required.clone()));
        }
    }

    if let Some(items) = map.get("items") {
        out.insert("items".to_string(), convert_node(items, definitions));
    }

    Value::Object(out)
}

/// Maximum object/array nesting of a converted schema.
///
/// Gemini rejects schemas nested deeper than its structural limit, so callers
/// can assert the shape they send stays shallow.
pub fn schema_depth(schema: &Value) -> usize {
    let Some(map) = schema.as_object() else {
        return 0;
    };

    let children = map
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.values().map(schema_depth).max().unwrap_or(0))
        .unwrap_or(0);
    let items = map.get("items").map(schema_depth).unwrap_or(0);

    let own = match map.get("type").and_then(Value::as_str) {
        Some("OBJECT") | Some("ARRAY") => 1,
        _ => 0,
    };

    own + children.max(items)
}
