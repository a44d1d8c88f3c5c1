// ============================================================
// Layer 3 — Record Domain Type
// ============================================================
// One dataset row, kept as a JSON object so that any
// field layout can be loaded. The extractor looks fields up by
// name and reports rows that lack them.
//
//   {"id": "5733be28", "title": "University_of_Notre_Dame",
//    "question": "To whom did the Virgin Mary ...",
//    "context": "Architecturally, the school has ..."}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single dataset row: field name → JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build a record from (name, text) pairs. Handy for tests and
    /// for flattening nested dataset layouts.
    pub fn from_text_fields<'a>(fields: impl IntoIterator<Item = (&'a str, String)>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::String(v)))
            .collect();
        Self { fields }
    }

    /// Raw value of a field, if present
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Value of a field if it is present and a string.
    /// `None` for a missing field, `Some(None)` for a non-string one.
    pub fn text(&self, field: &str) -> Option<Option<&str>> {
        self.get(field).map(Value::as_str)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}
