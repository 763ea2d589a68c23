use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use tandem_types::{Document, KEY_ID};

use crate::error::{IndexError, IndexResult};
use crate::query::{Page, Query, SortOrder};
use crate::traits::{IndexStatus, SearchIndex};

/// In-memory search index.
///
/// Intended for tests, embedding, and offline operation. Documents are held
/// per collection behind a `RwLock`; queries materialize the matching set,
/// sort it, and slice one page out.
///
/// Query semantics: an empty/`*` query matches everything; otherwise each
/// whitespace token must appear (case-insensitive substring) somewhere in
/// the document's text. `extras` entries are equality filters on top-level
/// fields.
pub struct InMemorySearchIndex {
    indexes: RwLock<HashMap<String, HashMap<String, Document>>>,
}

impl InMemorySearchIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents in the named collection.
    pub fn len(&self, collection: &str) -> usize {
        self.indexes
            .read()
            .expect("lock poisoned")
            .get(collection)
            .map_or(0, HashMap::len)
    }

    /// Returns `true` if the named collection holds no documents.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn matches(doc: &Document, query: &Query) -> bool {
        for (key, expected) in &query.extras {
            if doc.get(key) != Some(expected) {
                return false;
            }
        }
        if query.is_match_all() {
            return true;
        }
        let needle = query.text.as_deref().unwrap_or_default().to_lowercase();
        let mut corpus = String::new();
        for value in doc.values() {
            collect_text(value, &mut corpus);
        }
        let corpus = corpus.to_lowercase();
        needle
            .split_whitespace()
            .all(|token| corpus.contains(token))
    }

    fn compare(a: &Document, b: &Document, query: &Query) -> Ordering {
        let field = query.sort.field.as_str();
        let primary = match (a.get(field), b.get(field)) {
            (Some(x), Some(y)) => {
                let ord = compare_values(x, y);
                match query.sort.order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            }
            // Documents missing the sort field rank after the rest in
            // either direction.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        primary.then_with(|| id_of(a).cmp(id_of(b)))
    }
}

fn id_of(doc: &Document) -> &str {
    doc.get(KEY_ID).and_then(Value::as_str).unwrap_or_default()
}

fn collect_text(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => {
            out.push(' ');
            out.push_str(s);
        }
        Value::Number(n) => {
            out.push(' ');
            out.push_str(&n.to_string());
        }
        Value::Bool(b) => {
            out.push(' ');
            out.push_str(if *b { "true" } else { "false" });
        }
        Value::Array(items) => {
            for item in items {
                collect_text(item, out);
            }
        }
        Value::Object(fields) => {
            for item in fields.values() {
                collect_text(item, out);
            }
        }
        Value::Null => {}
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    value_text(a).cmp(&value_text(b))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Default for InMemorySearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    async fn ensure_index(&self, name: &str) -> IndexResult<IndexStatus> {
        let mut map = self.indexes.write().expect("lock poisoned");
        if map.contains_key(name) {
            Ok(IndexStatus::AlreadyExists)
        } else {
            map.insert(name.to_string(), HashMap::new());
            tracing::debug!("created index {name}");
            Ok(IndexStatus::Created)
        }
    }

    async fn upsert(&self, collection: &str, id: &str, document: Document) -> IndexResult<()> {
        let mut map = self.indexes.write().expect("lock poisoned");
        map.entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> IndexResult<()> {
        let mut map = self.indexes.write().expect("lock poisoned");
        map.get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .map(|_| ())
            .ok_or_else(|| IndexError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }

    async fn get(&self, collection: &str, id: &str) -> IndexResult<Document> {
        let map = self.indexes.read().expect("lock poisoned");
        map.get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
            .ok_or_else(|| IndexError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }

    async fn query(&self, collection: &str, query: &Query) -> IndexResult<Page> {
        let map = self.indexes.read().expect("lock poisoned");
        let docs = match map.get(collection) {
            Some(docs) => docs,
            None => return Ok(Page::default()),
        };
        let mut matched: Vec<&Document> = docs
            .values()
            .filter(|doc| Self::matches(doc, query))
            .collect();
        matched.sort_by(|a, b| Self::compare(a, b, query));
        let total = matched.len();
        let hits = matched
            .into_iter()
            .skip(query.from)
            .take(query.size)
            .cloned()
            .collect();
        Ok(Page { hits, total })
    }
}

impl std::fmt::Debug for InMemorySearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let map = self.indexes.read().expect("lock poisoned");
        let counts: HashMap<&str, usize> = map.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        f.debug_struct("InMemorySearchIndex")
            .field("collections", &counts)
            .finish()
    }
}
