use std::collections::BTreeMap;

use axum::extract::{Path, Query as UrlQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use tandem_index::{Query, SortOrder, SortSpec};
use tandem_types::{Payload, RecordId};

use crate::error::{ServerError, ServerResult};
use crate::gate::{Credentials, OpClass};
use crate::state::AppState;

/// Health check handler.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "tandem-server",
        "version": env!("CARGO_PKG_VERSION"),
        "collection": state.collection.name(),
    }))
}

async fn authorize(state: &AppState, headers: &HeaderMap, class: OpClass) -> ServerResult<()> {
    let credentials = Credentials::from_headers(headers);
    if state.gate.authorize(&credentials, class).await {
        Ok(())
    } else {
        Err(ServerError::Denied {
            class,
            anonymous: credentials.is_anonymous(),
        })
    }
}

fn parse_id(raw: &str) -> ServerResult<RecordId> {
    RecordId::parse(raw).map_err(|e| ServerError::BadRequest(e.to_string()))
}

fn parse_payload(body: Value) -> ServerResult<Payload> {
    match body {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(ServerError::BadRequest(format!(
            "payload must be a JSON object, got {other}"
        ))),
    }
}

/// Query-string parameters for record listing.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub size: Option<usize>,
    pub from: Option<usize>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl SearchParams {
    fn into_query(self) -> Query {
        let mut query = match self.q {
            Some(text) => Query::text(text),
            None => Query::match_all(),
        };
        if let Some(size) = self.size {
            query = query.with_size(size);
        }
        if let Some(from) = self.from {
            query = query.with_from(from);
        }
        if let Some(field) = self.sort {
            let order = match self.order.as_deref() {
                Some("asc") => SortOrder::Ascending,
                _ => SortOrder::Descending,
            };
            query = query.with_sort(SortSpec { field, order });
        }
        query
    }
}

/// `GET /v1/records/{id}` — point lookup via the index.
pub async fn get_record(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> ServerResult<Json<Value>> {
    authorize(&state, &headers, OpClass::Safe).await?;
    let id = parse_id(&raw_id)?;
    let record = state.collection.get(id).await?;
    Ok(Json(json!(record.to_document())))
}

/// `GET /v1/records` — query/list.
pub async fn list_records(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<SearchParams>,
    headers: HeaderMap,
) -> ServerResult<Json<Value>> {
    authorize(&state, &headers, OpClass::Safe).await?;
    let records = state.collection.search(&params.into_query()).await?;
    let documents: Vec<BTreeMap<String, Value>> =
        records.iter().map(|r| r.to_document()).collect();
    Ok(Json(json!({
        "count": documents.len(),
        "records": documents,
    })))
}

/// `POST /v1/records` — create.
pub async fn create_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ServerResult<(StatusCode, Json<Value>)> {
    authorize(&state, &headers, OpClass::Unsafe).await?;
    let mut record = state.collection.new_record();
    record.payload = parse_payload(body)?;
    state.collection.save(&mut record).await?;
    Ok((StatusCode::CREATED, Json(json!(record.to_document()))))
}

/// `PUT /v1/records/{id}` — full-replace update.
pub async fn replace_record(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ServerResult<Json<Value>> {
    authorize(&state, &headers, OpClass::Unsafe).await?;
    let id = parse_id(&raw_id)?;
    let record = state
        .collection
        .update_replace(id, parse_payload(body)?)
        .await?;
    Ok(Json(json!(record.to_document())))
}

/// `PATCH /v1/records/{id}` — partial-merge update.
pub async fn merge_record(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ServerResult<Json<Value>> {
    authorize(&state, &headers, OpClass::Unsafe).await?;
    let id = parse_id(&raw_id)?;
    let record = state
        .collection
        .update_merge(id, parse_payload(body)?)
        .await?;
    Ok(Json(json!(record.to_document())))
}

/// `DELETE /v1/records/{id}` — remove from both stores.
pub async fn delete_record(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> ServerResult<StatusCode> {
    authorize(&state, &headers, OpClass::Unsafe).await?;
    let id = parse_id(&raw_id)?;
    state.collection.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /v1/reindex` — rebuild the index from the blob store.
pub async fn reindex(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ServerResult<Json<Value>> {
    authorize(&state, &headers, OpClass::Unsafe).await?;
    let report = state.collection.reindex().await?;
    Ok(Json(json!(report)))
}

/// `POST /v1/purge` — index-only reset.
pub async fn purge(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ServerResult<Json<Value>> {
    authorize(&state, &headers, OpClass::Unsafe).await?;
    let purged = state.collection.purge().await?;
    Ok(Json(json!({ "purged": purged })))
}
