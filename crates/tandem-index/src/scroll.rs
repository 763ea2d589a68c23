use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use serde_json::Value;

use tandem_types::{Document, KEY_ID};

use crate::error::IndexResult;
use crate::query::Query;
use crate::traits::SearchIndex;

/// Restartable lazy sequence over query results.
///
/// A `Scroll` yields one document at a time and fetches a page from the
/// index only when its buffer drains, so large result sets never require
/// full materialization. The sequence is finite (it ends when a page comes
/// back short) and deduplicated by id even if pages shift under concurrent
/// writes. [`reset`](Self::reset) restarts from the beginning.
pub struct Scroll {
    index: Arc<dyn SearchIndex>,
    collection: String,
    query: Query,
    buffer: VecDeque<Document>,
    seen: HashSet<String>,
    next_from: usize,
    exhausted: bool,
}

impl Scroll {
    /// Begin a scroll over `query` against `collection`. The query's `size`
    /// becomes the page size; its `from` is ignored (the scroll manages
    /// paging itself).
    pub fn new(
        index: Arc<dyn SearchIndex>,
        collection: impl Into<String>,
        query: Query,
    ) -> Self {
        Self {
            index,
            collection: collection.into(),
            query: query.with_from(0),
            buffer: VecDeque::new(),
            seen: HashSet::new(),
            next_from: 0,
            exhausted: false,
        }
    }

    /// Yield the next document, or `None` when the sequence is finished.
    pub async fn next(&mut self) -> IndexResult<Option<Document>> {
        loop {
            if let Some(doc) = self.buffer.pop_front() {
                let id = doc
                    .get(KEY_ID)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if id.is_empty() || self.seen.insert(id) {
                    return Ok(Some(doc));
                }
                // Already yielded under this id; pages shifted under us.
                continue;
            }
            if self.exhausted {
                return Ok(None);
            }
            let page_query = self.query.clone().with_from(self.next_from);
            let page = self.index.query(&self.collection, &page_query).await?;
            if page.hits.is_empty() {
                self.exhausted = true;
                return Ok(None);
            }
            self.next_from += page.hits.len();
            if page.hits.len() < self.query.size {
                self.exhausted = true;
            }
            self.buffer.extend(page.hits);
        }
    }

    /// Restart the sequence from the beginning.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.seen.clear();
        self.next_from = 0;
        self.exhausted = false;
    }

    /// Drain every remaining document into a `Vec`.
    pub async fn collect_all(&mut self) -> IndexResult<Vec<Document>> {
        let mut out = Vec::new();
        while let Some(doc) = self.next().await? {
            out.push(doc);
        }
        Ok(out)
    }
}
