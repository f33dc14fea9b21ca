//! BSON ⇄ JSON conversion at the driver boundary.
//!
//! Documents leave the store as plain JSON objects. Object ids become their
//! hex string and dates become RFC 3339 strings so the frontend never sees
//! `$oid`/`$date` wrappers; everything else uses relaxed extended JSON.

use mongodb::bson::{self, Bson};
use serde_json::{Map, Value};

use crate::store::error::{StoreError, StoreResult};
use crate::store::Document;

/// Convert a driver document into a JSON object.
pub fn to_json(doc: bson::Document) -> Document {
    doc.into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect::<Map<String, Value>>()
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Bson::DateTime(dt).into_relaxed_extjson(),
        },
        Bson::Document(doc) => Value::Object(to_json(doc)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Convert a JSON value into BSON for an update.
pub fn to_bson(value: &Value) -> StoreResult<Bson> {
    Ok(bson::to_bson(value)?)
}

/// Reject values BSON cannot hold: integers above `i64::MAX`.
pub fn ensure_representable(value: &Value) -> StoreResult<()> {
    match value {
        Value::Number(n) if n.is_u64() && n.as_i64().is_none() => {
            Err(StoreError::InvalidValue(format!("integer {n} exceeds the 64-bit signed range")))
        }
        Value::Array(items) => items.iter().try_for_each(ensure_representable),
        Value::Object(map) => map.values().try_for_each(ensure_representable),
        _ => Ok(()),
    }
}
