use serde::{Deserialize, Serialize};

use tandem_types::{
    merge_reserved, split_reserved, Document, EpochMillis, Payload, RecordId,
};

use crate::error::RecordResult;

/// The JSON shape persisted in the blob store:
/// `{"record": {...payload, "id": "...", "epoch": N}}`.
#[derive(Serialize, Deserialize)]
struct Envelope {
    record: Document,
}

/// One record: identity, payload, timestamp.
///
/// The id is allocated at creation and immutable thereafter. The epoch is
/// provisional (zero) until the first save stamps it from the collection's
/// clock; every save refreshes it. The payload is caller-defined key/value
/// data with no schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    id: RecordId,
    collection: String,
    epoch: EpochMillis,
    pub payload: Payload,
}

impl Record {
    /// Allocate a fresh unsaved record bound to `collection`.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            id: RecordId::generate(),
            collection: collection.into(),
            epoch: 0,
            payload: Payload::new(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Milliseconds since the Unix epoch at the last save; zero if the
    /// record was never saved.
    pub fn epoch(&self) -> EpochMillis {
        self.epoch
    }

    pub(crate) fn stamp_epoch(&mut self, epoch: EpochMillis) {
        self.epoch = epoch;
    }

    /// The exact shape persisted and indexed: payload plus the reserved
    /// `id` and `epoch` keys.
    pub fn to_document(&self) -> Document {
        merge_reserved(&self.payload, self.id, self.epoch)
    }

    /// Reconstruct from an indexed document: reserved keys pop back into
    /// record fields, the remainder becomes the payload.
    pub fn from_document(collection: impl Into<String>, document: Document) -> RecordResult<Self> {
        let (id, epoch, payload) = split_reserved(document)?;
        Ok(Self {
            id,
            collection: collection.into(),
            epoch,
            payload,
        })
    }

    /// Serialize to the blob envelope.
    pub fn to_envelope_bytes(&self) -> RecordResult<Vec<u8>> {
        let envelope = Envelope {
            record: self.to_document(),
        };
        Ok(serde_json::to_vec(&envelope)?)
    }

    /// Reconstruct from raw blob bytes: parse the envelope, then as
    /// [`Self::from_document`].
    pub fn from_envelope_bytes(
        collection: impl Into<String>,
        bytes: &[u8],
    ) -> RecordResult<Self> {
        let envelope: Envelope = serde_json::from_slice(bytes)?;
        Self::from_document(collection, envelope.record)
    }
}
