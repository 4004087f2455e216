use crate::error::ReadinessError;
use serde_json::{Map, Value};

/// Flat field dictionary as consumed by the modality gates.
pub type FieldMap = Map<String, Value>;

/// Outcome of reading a numeric field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Numeric {
    Absent,
    Value(f64),
    Malformed,
}

impl Numeric {
    /// Read a JSON value as a number. Numeric strings are accepted.
    pub fn read(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::Number(n)) => n.as_f64().map_or(Self::Malformed, Self::Value),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map_or(Self::Malformed, Self::Value),
            Some(_) => Self::Malformed,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Name of a JSON value's kind, for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Truthiness of a record entry: null, `false`, zero, and empty
/// strings/lists/objects all count as absent.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Blank for gate purposes: absent, null, empty string or empty list.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(_) => false,
    }
}

/// A raw clinical record: a JSON object keyed by section name
/// (`medications`, `vital_signs`, `laboratory`, ...).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordMap {
    fields: Map<String, Value>,
}

impl RecordMap {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn from_value(value: Value) -> Result<Self, ReadinessError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ReadinessError::NotAnObject(kind_of(&other))),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_present(&self, key: &str) -> bool {
        is_truthy(self.fields.get(key))
    }

    /// String field, or `None` when absent or not a string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Lower-cased string field, empty when absent.
    pub fn text_lower(&self, key: &str) -> String {
        self.text(key).unwrap_or_default().to_lowercase()
    }

    pub fn numeric(&self, key: &str) -> Numeric {
        Numeric::read(self.fields.get(key))
    }

    /// List section. Absent or null is `Ok(None)`; any other non-list shape
    /// is an error.
    pub fn list(&self, key: &str) -> Result<Option<&Vec<Value>>, ReadinessError> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(other) => Err(ReadinessError::WrongShape {
                field: key.to_string(),
                expected: "a list",
                found: kind_of(other),
            }),
        }
    }

    /// Object section. Absent or null is `Ok(None)`; any other non-object
    /// shape is an error.
    pub fn object(&self, key: &str) -> Result<Option<&Map<String, Value>>, ReadinessError> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(ReadinessError::WrongShape {
                field: key.to_string(),
                expected: "an object",
                found: kind_of(other),
            }),
        }
    }

    /// Lower-cased string entries of a list section; non-strings are skipped.
    pub fn string_list_lower(&self, key: &str) -> Result<Vec<String>, ReadinessError> {
        Ok(self
            .list(key)?
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_lowercase)
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl From<Map<String, Value>> for RecordMap {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}
