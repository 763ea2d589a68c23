use std::collections::BTreeMap;

use serde_json::Value;

use crate::clock::EpochMillis;
use crate::error::TypeError;
use crate::id::RecordId;

/// Caller-defined record data: string keys, arbitrary JSON values, no schema.
pub type Payload = BTreeMap<String, Value>;

/// The persisted and indexed shape: a [`Payload`] with the reserved keys
/// merged in. This is exactly what the search index stores per id, and what
/// the blob envelope wraps.
pub type Document = BTreeMap<String, Value>;

/// Reserved key carrying the record's identity.
pub const KEY_ID: &str = "id";

/// Reserved key carrying the record's last-save timestamp.
pub const KEY_EPOCH: &str = "epoch";

/// Project a payload into its document shape.
///
/// Returns a new map; the caller's payload is never mutated. Reserved keys
/// already present in the payload are overwritten by the record's own
/// identity and epoch.
pub fn merge_reserved(payload: &Payload, id: RecordId, epoch: EpochMillis) -> Document {
    let mut doc = payload.clone();
    doc.insert(KEY_ID.to_string(), Value::String(id.as_key()));
    doc.insert(KEY_EPOCH.to_string(), Value::from(epoch));
    doc
}

/// Project a document back into record fields.
///
/// Pops the reserved keys out; the remainder is the payload. Fails if either
/// reserved key is missing or malformed.
pub fn split_reserved(mut doc: Document) -> Result<(RecordId, EpochMillis, Payload), TypeError> {
    let id_value = doc
        .remove(KEY_ID)
        .ok_or(TypeError::MissingReservedKey(KEY_ID))?;
    let id = match id_value {
        Value::String(s) => RecordId::parse(&s)?,
        other => {
            return Err(TypeError::MalformedReservedKey {
                key: KEY_ID,
                reason: format!("expected string, got {other}"),
            })
        }
    };

    let epoch_value = doc
        .remove(KEY_EPOCH)
        .ok_or(TypeError::MissingReservedKey(KEY_EPOCH))?;
    let epoch = epoch_value
        .as_u64()
        .ok_or_else(|| TypeError::MalformedReservedKey {
            key: KEY_EPOCH,
            reason: format!("expected non-negative integer, got {epoch_value}"),
        })?;

    Ok((id, epoch, doc))
}
