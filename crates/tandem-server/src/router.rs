use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all Tandem endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health))
        .route("/v1/info", get(handler::info))
        .route(
            "/v1/records",
            get(handler::list_records).post(handler::create_record),
        )
        .route(
            "/v1/records/:id",
            get(handler::get_record)
                .put(handler::replace_record)
                .patch(handler::merge_record)
                .delete(handler::delete_record),
        )
        .route("/v1/reindex", post(handler::reindex))
        .route("/v1/purge", post(handler::purge))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
