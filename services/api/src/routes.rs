use crate::infra::{AppState, BoardServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use bawabti::board::board_router;
use bawabti::uploads::{ArtifactKind, MediaStore};
use serde_json::json;
use tower_http::services::ServeDir;

/// Board API, health and readiness checks, and static serving of stored uploads.
pub(crate) fn app_router(services: BoardServices, store: &MediaStore) -> axum::Router {
    let mut router = board_router(services.companies, services.jobs, services.applications)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint));

    for kind in ArtifactKind::ALL {
        router = router.nest_service(
            &format!("/uploads/{}", kind.public_dir()),
            ServeDir::new(store.folder_for(kind)),
        );
    }

    router
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    // the ping takes the database mutex
    let ready = tokio::task::spawn_blocking(move || state.is_ready())
        .await
        .unwrap_or(false);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
