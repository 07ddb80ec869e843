//! JSON/BSON conversion at the MongoDB boundary.
//!
//! Documents cross the store boundary as JSON values, so everything going
//! into a collection is converted to BSON and everything coming back is
//! restored. Restoration flattens the driver-specific types a document may
//! carry: object ids become their hex strings and datetimes become RFC 3339
//! strings, matching how the transport serializes them.

use bson::oid::ObjectId;
use bson::{Bson, Document, doc};
use serde_json::{Map, Value};

use docgate_core::error::{GatewayError, GatewayResult};

/// Converts a JSON value to BSON. Integers map to `Int64`, other numbers to
/// `Double`.
pub(crate) fn to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(flag) => Bson::Boolean(*flag),
        Value::Number(number) => number
            .as_i64()
            .map(Bson::Int64)
            .or_else(|| number.as_f64().map(Bson::Double))
            .unwrap_or(Bson::Null),
        Value::String(text) => Bson::String(text.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(to_bson).collect()),
        Value::Object(fields) => Bson::Document(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), to_bson(value)))
                .collect(),
        ),
    }
}

/// Converts a JSON object to a BSON document, rejecting non-objects.
pub(crate) fn to_document(value: &Value) -> GatewayResult<Document> {
    match to_bson(value) {
        Bson::Document(document) => Ok(document),
        _ => Err(GatewayError::Store(
            "document must be a JSON object".to_string(),
        )),
    }
}

/// Restores a BSON value fetched from MongoDB into transport JSON.
pub(crate) fn restore_value(value: &Bson) -> Value {
    match value {
        Bson::Null => Value::Null,
        Bson::Boolean(flag) => Value::Bool(*flag),
        Bson::Int32(number) => Value::from(*number),
        Bson::Int64(number) => Value::from(*number),
        Bson::Double(number) => Value::from(*number),
        Bson::String(text) => Value::String(text.clone()),
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(instant) => match instant.try_to_rfc3339_string() {
            Ok(text) => Value::String(text),
            Err(_) => Value::from(instant.timestamp_millis()),
        },
        Bson::Array(items) => Value::Array(items.iter().map(restore_value).collect()),
        Bson::Document(document) => restore_document(document),
        other => Value::String(other.to_string()),
    }
}

pub(crate) fn restore_document(document: &Document) -> Value {
    Value::Object(
        document
            .iter()
            .map(|(key, value)| (key.clone(), restore_value(value)))
            .collect::<Map<String, Value>>(),
    )
}

/// Builds the `_id` filter for a path identifier: a valid 24-hex object id
/// matches as an `ObjectId`, anything else as a plain string.
pub(crate) fn id_filter(id: &str) -> Document {
    match ObjectId::parse_str(id) {
        Ok(oid) => doc! { "_id": oid },
        Err(_) => doc! { "_id": id },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_document_rejects_non_objects() {
        assert!(to_document(&json!("scalar")).is_err());
        assert!(to_document(&json!({ "title": "rust" })).is_ok());
    }

    #[test]
    fn numbers_round_trip_through_bson() {
        let document = to_document(&json!({ "level": 4, "score": 1.5 })).unwrap();
        assert_eq!(document.get("level"), Some(&Bson::Int64(4)));
        assert_eq!(document.get("score"), Some(&Bson::Double(1.5)));
        assert_eq!(
            restore_document(&document),
            json!({ "level": 4, "score": 1.5 })
        );
    }

    #[test]
    fn object_ids_restore_as_hex_strings() {
        let oid = ObjectId::new();
        let restored = restore_value(&Bson::ObjectId(oid));
        assert_eq!(restored, Value::String(oid.to_hex()));
    }

    #[test]
    fn id_filter_prefers_object_ids() {
        let oid = ObjectId::new();
        assert_eq!(id_filter(&oid.to_hex()), doc! { "_id": oid });
        assert_eq!(id_filter("not-an-oid"), doc! { "_id": "not-an-oid" });
    }
}
