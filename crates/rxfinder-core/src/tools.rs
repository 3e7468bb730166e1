//! Tool definition vocabulary and the shared envelope shapes.
//!
//! Every gateway operation returns a JSON object envelope: success carries
//! operation-specific fields, failure carries a single `error` string
//! (plus, for identifier-scoped operations, an echo of the input). The
//! envelope is data, never an exception — operations are total functions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// JSON-schema parameter block of a tool definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameterSchema {
    /// Always `"object"` for our tools.
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property name → JSON-schema fragment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    /// Names of required properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

/// Agent-facing definition of one gateway operation: name, description
/// (written for the model), and parameter schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Wire name of the operation.
    pub name: String,
    /// What the operation does, phrased for the model.
    pub description: String,
    /// Parameter schema.
    pub parameters: ToolParameterSchema,
}

/// Build a failure envelope: `{"error": <message>}`.
pub fn error_envelope(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}

/// Fluent builder for [`ToolSpec`] schemas.
///
/// ```ignore
/// ToolSchemaBuilder::new("search_drugs", "Search RxNorm by name")
///     .required_property("query", json!({"type": "string"}))
///     .property("limit", json!({"type": "number"}))
///     .build()
/// ```
pub struct ToolSchemaBuilder {
    name: String,
    description: String,
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl ToolSchemaBuilder {
    /// Create a new builder with the given tool name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            properties: Map::new(),
            required: Vec::new(),
        }
    }

    /// Add an optional property.
    pub fn property(mut self, name: &str, schema: Value) -> Self {
        let _ = self.properties.insert(name.into(), schema);
        self
    }

    /// Add a required property.
    pub fn required_property(mut self, name: &str, schema: Value) -> Self {
        let _ = self.properties.insert(name.into(), schema);
        self.required.push(name.into());
        self
    }

    /// Build the final [`ToolSpec`].
    pub fn build(self) -> ToolSpec {
        ToolSpec {
            name: self.name,
            description: self.description,
            parameters: ToolParameterSchema {
                schema_type: "object".into(),
                properties: if self.properties.is_empty() {
                    None
                } else {
                    Some(self.properties)
                },
                required: if self.required.is_empty() {
                    None
                } else {
                    Some(self.required)
                },
            },
        }
    }
}
