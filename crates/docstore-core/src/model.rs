//! Record model
//!
//! A `Record` is one stored JSON document. It is a plain JSON object whose
//! reserved `id` key holds the identifier generated at creation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ResourceError;

/// Reserved key holding the record identifier
pub const ID_FIELD: &str = "id";

/// A JSON document keyed by its `id` field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap caller-supplied fields without touching `id`
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a record from any JSON value, which must be an object
    pub fn from_value(value: Value) -> std::result::Result<Self, ResourceError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(ResourceError::InvalidPayload {
                reason: format!("expected a JSON object, got {}", json_type_name(&other)),
            }),
        }
    }

    /// Decode the contents of a `data` column
    pub fn from_json(json: &str) -> std::result::Result<Self, ResourceError> {
        serde_json::from_str(json).map_err(|e| ResourceError::CorruptDocument {
            reason: e.to_string(),
        })
    }

    /// Encode for the `data` column
    pub fn to_json(&self) -> std::result::Result<String, ResourceError> {
        serde_json::to_string(&self.0).map_err(|e| ResourceError::EncodeFailed {
            reason: e.to_string(),
        })
    }

    /// Set `id`, replacing whatever the fields carried
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.0.insert(ID_FIELD.to_string(), Value::String(id.into()));
        self
    }

    /// Shallow merge: keys in `fields` overwrite, all other keys are kept
    pub fn merge(mut self, fields: Map<String, Value>) -> Self {
        for (key, value) in fields {
            self.0.insert(key, value);
        }
        self
    }

    /// The record identifier, when present and a string
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
