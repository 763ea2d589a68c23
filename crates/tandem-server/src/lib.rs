//! HTTP boundary for Tandem.
//!
//! Maps a REST surface 1:1 onto collection operations: fetch-by-id,
//! query/list, create, full-replace update, partial-merge update, delete,
//! and explicit reindex/purge triggers. Every request passes the
//! [`AccessGate`] first; safe (read) and unsafe (mutating) operations can
//! carry different policy. Records cross the wire as their flat document
//! shape: payload fields plus the reserved `id` and `epoch`.

pub mod config;
pub mod error;
pub mod gate;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use gate::{AccessGate, ApiKeyGate, Credentials, OpClass, OpenGate};
pub use router::build_router;
pub use server::TandemServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use tandem_blob::BlobBackendConfig;

    fn app() -> Router {
        let config = ServerConfig {
            storage: BlobBackendConfig::Memory,
            ..ServerConfig::default()
        };
        TandemServer::new(config).unwrap().router()
    }

    fn gated_app() -> Router {
        let config = ServerConfig {
            storage: BlobBackendConfig::Memory,
            api_key: Some("s3cret".into()),
            ..ServerConfig::default()
        };
        TandemServer::new(config).unwrap().router()
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        key: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header("authorization", format!("Bearer {key}"));
        }
        let request = match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = app();
        let (status, body) = send(&app, "GET", "/v1/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn info_endpoint() {
        let app = app();
        let (status, body) = send(&app, "GET", "/v1/info", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "tandem-server");
        assert_eq!(body["collection"], "records");
    }

    #[tokio::test]
    async fn create_get_update_delete_cycle() {
        let app = app();

        let (status, created) = send(
            &app,
            "POST",
            "/v1/records",
            None,
            Some(json!({"name": "a"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        let t1 = created["epoch"].as_u64().unwrap();
        assert!(t1 > 0);

        let (status, fetched) = send(&app, "GET", &format!("/v1/records/{id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "a");

        let (status, merged) = send(
            &app,
            "PATCH",
            &format!("/v1/records/{id}"),
            None,
            Some(json!({"tag": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(merged["name"], "a");
        assert_eq!(merged["tag"], "x");
        assert!(merged["epoch"].as_u64().unwrap() > t1);

        let (status, replaced) = send(
            &app,
            "PUT",
            &format!("/v1/records/{id}"),
            None,
            Some(json!({"only": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(replaced["only"], true);
        assert!(replaced.get("name").is_none());

        let (status, _) = send(&app, "DELETE", &format!("/v1/records/{id}"), None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", &format!("/v1/records/{id}"), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn list_endpoint_filters_and_counts() {
        let app = app();
        send(&app, "POST", "/v1/records", None, Some(json!({"name": "alpha"}))).await;
        send(&app, "POST", "/v1/records", None, Some(json!({"name": "beta"}))).await;

        let (status, all) = send(&app, "GET", "/v1/records", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all["count"], 2);

        let (status, filtered) = send(&app, "GET", "/v1/records?q=beta", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(filtered["count"], 1);
        assert_eq!(filtered["records"][0]["name"], "beta");
    }

    #[tokio::test]
    async fn purge_then_reindex_round_trip() {
        let app = app();
        send(&app, "POST", "/v1/records", None, Some(json!({"name": "a"}))).await;
        send(&app, "POST", "/v1/records", None, Some(json!({"name": "b"}))).await;

        let (status, purged) = send(&app, "POST", "/v1/purge", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(purged["purged"], 2);

        let (_, emptied) = send(&app, "GET", "/v1/records", None, None).await;
        assert_eq!(emptied["count"], 0);

        let (status, report) = send(&app, "POST", "/v1/reindex", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["indexed"], 2);
        assert_eq!(report["skipped"], 0);

        let (_, restored) = send(&app, "GET", "/v1/records", None, None).await;
        assert_eq!(restored["count"], 2);
    }

    #[tokio::test]
    async fn gate_blocks_unkeyed_mutations() {
        let app = gated_app();

        let (status, body) = send(
            &app,
            "POST",
            "/v1/records",
            None,
            Some(json!({"name": "a"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");

        let (status, _) = send(
            &app,
            "POST",
            "/v1/records",
            Some("wrong"),
            Some(json!({"name": "a"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            "POST",
            "/v1/records",
            Some("s3cret"),
            Some(json!({"name": "a"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        // Reads stay public with the default allow_anonymous_read.
        let (status, _) = send(&app, "GET", "/v1/records", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn non_object_payload_is_rejected() {
        let app = app();
        let (status, body) = send(&app, "POST", "/v1/records", None, Some(json!([1, 2]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn malformed_id_is_rejected() {
        let app = app();
        let (status, body) = send(&app, "GET", "/v1/records/not-a-uuid", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }
}
