use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names of the user resource as they appear on the wire.
pub mod fields {
    pub const ID: &str = "id";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const DATE_OF_BIRTH: &str = "dateOfBirth";
    pub const PERSONAL_ID_DOCUMENT: &str = "personalIdDocument";
    pub const DOCUMENT_ID: &str = "documentId";
    pub const COUNTRY_OF_ISSUE: &str = "countryOfIssue";
    pub const VALID_UNTIL: &str = "validUntil";
}

/// A single user as stored in the collection.
///
/// Kept as an ordered JSON object so that fields the caller sends, known or
/// not, are persisted and echoed back exactly as supplied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(Map<String, Value>);

impl UserRecord {
    /// Interpret an arbitrary request body. Anything other than a JSON object
    /// carries no fields and becomes an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The record key, when it is a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get(fields::ID).and_then(Value::as_str)
    }

    /// Whether the record carries a usable (truthy) `id`.
    pub fn has_id(&self) -> bool {
        self.0.get(fields::ID).is_some_and(is_truthy)
    }

    pub fn matches_id(&self, id: &str) -> bool {
        self.id() == Some(id)
    }

    /// Shallow merge: every top-level field of `patch` overwrites the same field
    /// here; fields absent from `patch` are kept. Nested objects are replaced,
    /// not merged. A patch `id` re-keys the record.
    pub fn merge(&mut self, patch: UserRecord) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Presence in the loose sense request bodies are judged by: `null`, `false`,
/// zero, NaN and the empty string count as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
