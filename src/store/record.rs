use std::{collections::BTreeMap, time::SystemTime};

/// A single field value of a document about to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(SystemTime),
    /// Placeholder that the store replaces with its commit time.
    ServerTimestamp,
}

impl FieldValue {
    /// Whole amounts that fit an `i64` are stored as integers, anything else
    /// as a double.
    pub fn amount(amount: f64) -> Self {
        // i64::MAX rounds up to 2^63 as an f64, which is already out of range.
        if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
            FieldValue::Integer(amount as i64)
        } else {
            FieldValue::Double(amount)
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

/// The field map handed to [`DocumentStore::add_document`](super::DocumentStore::add_document).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }

    /// Names of the fields holding [`FieldValue::ServerTimestamp`].
    pub fn server_timestamp_fields(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, v)| matches!(v, FieldValue::ServerTimestamp))
            .map(|(k, _)| k)
    }

    /// Replaces every server timestamp placeholder with `commit_time`.
    pub fn resolve_server_timestamps(&self, commit_time: SystemTime) -> Record {
        let fields = self
            .fields
            .iter()
            .map(|(k, v)| {
                let resolved = match v {
                    FieldValue::ServerTimestamp => FieldValue::Timestamp(commit_time),
                    other => other.clone(),
                };
                (k.clone(), resolved)
            })
            .collect();

        Record { fields }
    }
}
