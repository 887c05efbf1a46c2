//! Conversion between [`Record`]s and Firestore's wire types.

use std::collections::HashMap;

use firestore_grpc::v1::{
    document_transform::{
        field_transform::{ServerValue, TransformType},
        FieldTransform,
    },
    precondition::ConditionType,
    value::ValueType,
    write::Operation,
    Document, Precondition, Value, Write,
};

use prost_types::Timestamp;

use crate::store::{FieldValue, Record};

/// Builds a write that creates the document `name` from `record`.
///
/// Server timestamp placeholders are left out of the document fields and
/// become `REQUEST_TIME` transforms instead, so Firestore fills them in with
/// the commit time. The write fails if a document already exists at `name`.
pub(crate) fn create_document_write(name: String, record: &Record) -> Write {
    let mut fields = HashMap::with_capacity(record.len());
    let mut transforms = Vec::new();

    for (field, value) in record.iter() {
        match value {
            FieldValue::ServerTimestamp => transforms.push(FieldTransform {
                field_path: quote_field_path(field),
                transform_type: Some(TransformType::SetToServerValue(
                    ServerValue::RequestTime as i32,
                )),
            }),
            other => {
                fields.insert(field.to_string(), to_value(other));
            }
        }
    }

    Write {
        operation: Some(Operation::Update(Document {
            name,
            fields,
            create_time: None,
            update_time: None,
        })),
        update_transforms: transforms,
        current_document: Some(Precondition {
            condition_type: Some(ConditionType::Exists(false)),
        }),
        ..Default::default()
    }
}

pub(crate) fn to_value(value: &FieldValue) -> Value {
    let value_type = match value {
        FieldValue::Integer(i) => ValueType::IntegerValue(*i),
        FieldValue::Double(d) => ValueType::DoubleValue(*d),
        FieldValue::String(s) => ValueType::StringValue(s.clone()),
        FieldValue::Timestamp(at) => ValueType::TimestampValue(Timestamp::from(*at)),
        // Only reachable when a placeholder is used outside of a write, e.g.
        // in a query filter, where Firestore has no commit time to offer.
        FieldValue::ServerTimestamp => ValueType::NullValue(0),
    };

    Value {
        value_type: Some(value_type),
    }
}

pub(crate) fn string_field<'a>(document: &'a Document, field: &str) -> Option<&'a str> {
    match document.fields.get(field)?.value_type.as_ref()? {
        ValueType::StringValue(s) => Some(s),
        _ => None,
    }
}

/// Field names that aren't simple identifiers must be backtick-quoted in a
/// field path.
fn quote_field_path(field: &str) -> String {
    let mut chars = field.chars();
    let is_simple = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if is_simple {
        field.to_string()
    } else {
        format!("`{}`", field.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approval::ApprovalRequest;

    #[test]
    fn placeholders_become_request_time_transforms() {
        let record = ApprovalRequest::pending("Ergonomic Keyboard", "user2@example.com", 75.0)
            .approved_by("admin@example.com")
            .to_record();

        let write = create_document_write(
            "projects/p/databases/(default)/documents/approvals/abc".to_string(),
            &record,
        );

        let Some(Operation::Update(document)) = &write.operation else {
            panic!("expected an update operation");
        };
        assert_eq!(
            document.name,
            "projects/p/databases/(default)/documents/approvals/abc"
        );
        assert!(!document.fields.contains_key("requestedAt"));
        assert!(!document.fields.contains_key("approvedAt"));
        assert_eq!(string_field(document, "itemName"), Some("Ergonomic Keyboard"));
        assert_eq!(
            document.fields["amount"].value_type,
            Some(ValueType::IntegerValue(75))
        );

        let mut transformed: Vec<&str> = write
            .update_transforms
            .iter()
            .map(|t| t.field_path.as_str())
            .collect();
        transformed.sort();
        assert_eq!(transformed, ["approvedAt", "requestedAt"]);
        assert!(write.update_transforms.iter().all(|t| t.transform_type
            == Some(TransformType::SetToServerValue(ServerValue::RequestTime as i32))));
    }

    #[test]
    fn writes_only_create_new_documents() {
        let write = create_document_write("doc".to_string(), &Record::new());

        assert_eq!(
            write.current_document,
            Some(Precondition {
                condition_type: Some(ConditionType::Exists(false)),
            })
        );
    }

    #[test]
    fn resolved_timestamps_are_sent_as_timestamp_values() {
        let at = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);

        assert_eq!(
            to_value(&FieldValue::Timestamp(at)).value_type,
            Some(ValueType::TimestampValue(Timestamp {
                seconds: 1_700_000_000,
                nanos: 0,
            }))
        );
    }

    #[test]
    fn quotes_non_simple_field_names() {
        assert_eq!(quote_field_path("requestedAt"), "requestedAt");
        assert_eq!(quote_field_path("_private"), "_private");
        assert_eq!(quote_field_path("approved at"), "`approved at`");
        assert_eq!(quote_field_path("1st"), "`1st`");
    }
}
