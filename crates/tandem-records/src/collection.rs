use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use tandem_index::{Query, Scroll};
use tandem_types::{Payload, RecordId, KEY_ID};

use crate::context::StoreContext;
use crate::error::{DualOp, RecordError, RecordResult};
use crate::record::Record;

/// Page size for the bulk scans behind purge.
const BULK_PAGE_SIZE: usize = 100;

/// Outcome of one reindex run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReindexReport {
    /// Blob keys enumerated.
    pub scanned: usize,
    /// Records successfully re-upserted into the index.
    pub indexed: usize,
    /// Keys skipped because the blob vanished mid-run or failed to decode.
    pub skipped: usize,
}

/// The dual-store coordinator for one logical named dataset.
///
/// A `Collection` is a stateless accessor bound to a name: it is not itself
/// persisted and can be constructed at any time from a [`StoreContext`].
/// Every `Record` it returns carries this collection's name.
///
/// Point lookups read the index (the fast path); the blob store is
/// consulted only by [`get_raw`](Self::get_raw) and by
/// [`reindex`](Self::reindex), which treats it as the source of truth.
#[derive(Clone, Debug)]
pub struct Collection {
    name: String,
    stores: StoreContext,
}

impl Collection {
    pub fn new(name: impl Into<String>, stores: StoreContext) -> Self {
        Self {
            name: name.into(),
            stores,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stores(&self) -> &StoreContext {
        &self.stores
    }

    /// Allocate a fresh unsaved record bound to this collection.
    pub fn new_record(&self) -> Record {
        Record::new(self.name.as_str())
    }

    /// Idempotently ensure the backing index exists. An index that already
    /// exists is success, not an error.
    pub async fn ensure_ready(&self) -> RecordResult<()> {
        self.stores.index.ensure_index(&self.name).await?;
        Ok(())
    }

    /// Fetch a record by id from the search index.
    ///
    /// This is the point-lookup fast path. It reflects only what got
    /// indexed: an id present in the blob store but absent from the index
    /// (a partial save) is `NotFound` here until the next reindex.
    pub async fn get(&self, id: RecordId) -> RecordResult<Record> {
        match self.stores.index.get(&self.name, &id.as_key()).await {
            Ok(document) => Record::from_document(self.name.as_str(), document),
            Err(e) if e.is_not_found() => Err(RecordError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a record by id from the blob store, the authoritative copy.
    pub async fn get_raw(&self, id: RecordId) -> RecordResult<Record> {
        match self.stores.blob.get(&id.as_key()).await {
            Ok(bytes) => Record::from_envelope_bytes(self.name.as_str(), &bytes),
            Err(e) if e.is_not_found() => Err(RecordError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Run a query against the index and wrap each hit as a record. The
    /// blob store is never touched.
    pub async fn search(&self, query: &Query) -> RecordResult<Vec<Record>> {
        let page = self.stores.index.query(&self.name, query).await?;
        page.hits
            .into_iter()
            .map(|doc| Record::from_document(self.name.as_str(), doc))
            .collect()
    }

    /// Persist a record to both stores.
    ///
    /// The epoch is refreshed from the context clock, then the blob write
    /// runs first: the blob store is the source of truth and the index is
    /// derivative, so a blob failure stops the save outright. An index
    /// failure after a successful blob write surfaces as
    /// [`RecordError::PartialWrite`]; the record is durable but
    /// undiscoverable until the next reindex.
    pub async fn save(&self, record: &mut Record) -> RecordResult<()> {
        if record.collection() != self.name {
            return Err(RecordError::CollectionMismatch {
                expected: self.name.clone(),
                actual: record.collection().to_string(),
            });
        }
        record.stamp_epoch(self.stores.clock.now_millis());
        let key = record.id().as_key();
        let bytes = record.to_envelope_bytes()?;
        self.stores.blob.put(&key, &bytes).await?;
        if let Err(e) = self
            .stores
            .index
            .upsert(&self.name, &key, record.to_document())
            .await
        {
            return Err(RecordError::partial(record.id(), DualOp::Save, e.into()));
        }
        Ok(())
    }

    /// Remove a record from both stores.
    ///
    /// The index copy goes first: it is the discoverable one, and removing
    /// it before the blob means a failure never leaves search results
    /// pointing at a missing record. An id absent from the index but
    /// present in the blob store is still deleted; an id absent from both
    /// is `NotFound`. A blob failure after the index delete succeeded is a
    /// [`RecordError::PartialWrite`] (the orphan blob re-surfaces on the
    /// next reindex).
    pub async fn delete(&self, id: RecordId) -> RecordResult<()> {
        let key = id.as_key();
        let index_had_it = match self.stores.index.delete(&self.name, &key).await {
            Ok(()) => true,
            Err(e) if e.is_not_found() => false,
            Err(e) => return Err(e.into()),
        };
        match self.stores.blob.delete(&key).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                if index_had_it {
                    // Index-only anomaly: removing the dangling index copy
                    // is exactly the resolution, not a failure.
                    Ok(())
                } else {
                    Err(RecordError::NotFound(id))
                }
            }
            Err(e) if index_had_it => Err(RecordError::partial(id, DualOp::Delete, e.into())),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a record's payload wholly and save.
    pub async fn update_replace(&self, id: RecordId, payload: Payload) -> RecordResult<Record> {
        let mut record = self.get(id).await?;
        record.payload = payload;
        self.save(&mut record).await?;
        Ok(record)
    }

    /// Merge a patch into a record's payload and save. Patch keys overwrite
    /// existing keys; everything else is preserved.
    pub async fn update_merge(&self, id: RecordId, patch: Payload) -> RecordResult<Record> {
        let mut record = self.get(id).await?;
        record.payload.extend(patch);
        self.save(&mut record).await?;
        Ok(record)
    }

    /// Rebuild the index from the blob store of record.
    ///
    /// Every enumerated blob key is fetched, decoded, and re-upserted into
    /// the index. Individual reconstruction failures (a blob deleted
    /// mid-run, a corrupt envelope) are logged and skipped so one bad key
    /// never blocks reconciliation of the rest. Safe to run repeatedly and
    /// concurrently with live traffic: upserts are last-write-wins by id.
    pub async fn reindex(&self) -> RecordResult<ReindexReport> {
        self.ensure_ready().await?;
        let keys = self.stores.blob.list().await?;
        let mut report = ReindexReport::default();
        for key in keys {
            report.scanned += 1;
            let bytes = match self.stores.blob.get(&key).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("reindex: skipping {key}: {e}");
                    report.skipped += 1;
                    continue;
                }
            };
            let record = match Record::from_envelope_bytes(self.name.as_str(), &bytes) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("reindex: skipping {key}: {e}");
                    report.skipped += 1;
                    continue;
                }
            };
            self.stores
                .index
                .upsert(&self.name, &record.id().as_key(), record.to_document())
                .await?;
            report.indexed += 1;
        }
        tracing::info!(
            "reindex of {}: {} scanned, {} indexed, {} skipped",
            self.name,
            report.scanned,
            report.indexed,
            report.skipped
        );
        Ok(report)
    }

    /// Remove every document from the index without touching the blob
    /// store. An index-only reset, distinct from true deletion; a
    /// subsequent reindex restores everything the blob store holds.
    pub async fn purge(&self) -> RecordResult<usize> {
        let mut purged = 0;
        loop {
            // Deleting while scrolling shifts pages under the scroll, so
            // some ids survive a pass; repeat until a pass removes nothing.
            let mut scroll = Scroll::new(
                Arc::clone(&self.stores.index),
                self.name.as_str(),
                Query::match_all().with_size(BULK_PAGE_SIZE),
            );
            let mut removed_this_pass = 0;
            while let Some(doc) = scroll.next().await? {
                let Some(id) = doc.get(KEY_ID).and_then(Value::as_str) else {
                    tracing::warn!("purge: document without an id in {}", self.name);
                    continue;
                };
                match self.stores.index.delete(&self.name, id).await {
                    Ok(()) => removed_this_pass += 1,
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(e.into()),
                }
            }
            if removed_this_pass == 0 {
                break;
            }
            purged += removed_this_pass;
        }
        tracing::info!("purged {} documents from index {}", purged, self.name);
        Ok(purged)
    }
}
