use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tandem_types::{Document, KEY_EPOCH};

/// Page size used when a query does not specify one.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Which document field to order results by, and in which direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }

    /// The default sort: newest first.
    pub fn epoch_descending() -> Self {
        Self::descending(KEY_EPOCH)
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::epoch_descending()
    }
}

/// One query against a collection's index.
///
/// An empty or absent query string means match everything (`*`). `extras`
/// are backend-specific query modifiers (filters and the like) passed
/// through without interpretation by the core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Query {
    pub text: Option<String>,
    pub sort: SortSpec,
    pub from: usize,
    pub size: usize,
    pub extras: BTreeMap<String, Value>,
}

impl Query {
    /// A match-everything query with default sort and page size.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// A full-text query with default sort and page size.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_from(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    /// Returns `true` if this query matches everything.
    pub fn is_match_all(&self) -> bool {
        match self.text.as_deref() {
            None => true,
            Some(t) => t.trim().is_empty() || t.trim() == "*",
        }
    }
}

impl Default for Query {
    fn default() -> Self {
        Self {
            text: None,
            sort: SortSpec::default(),
            from: 0,
            size: DEFAULT_PAGE_SIZE,
            extras: BTreeMap::new(),
        }
    }
}

/// One page of ranked query results.
///
/// `total` counts every match, not just the hits on this page, so callers
/// can page without a separate count query.
#[derive(Clone, Debug, Default)]
pub struct Page {
    pub hits: Vec<Document>,
    pub total: usize,
}

impl Page {
    /// Returns `true` if this page holds no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
