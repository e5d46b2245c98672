use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use rim_orientation::orientation::{
    orientation_router, OrientationService, ResultSink, SessionStore,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_orientation_routes<S, P>(
    service: Arc<OrientationService<S, P>>,
) -> axum::Router
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
{
    orientation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
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

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use rim_orientation::orientation::{
        Dimension, InMemoryResultSink, InMemorySessionStore, ProgramRecord, Question,
    };
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn service() -> Arc<OrientationService<InMemorySessionStore, InMemoryResultSink>> {
        let questions = Dimension::ALL
            .iter()
            .enumerate()
            .map(|(index, dimension)| Question {
                display_order: index as u32 + 1,
                text: format!("Question {}", index + 1),
                translation: None,
                dimension: *dimension,
            })
            .collect();
        let programs = vec![ProgramRecord::new("Informatique", "ISCAE", "RIA")];
        Arc::new(
            OrientationService::new(
                questions,
                programs,
                Arc::new(InMemorySessionStore::default()),
                Arc::new(InMemoryResultSink::default()),
            )
            .expect("service builds"),
        )
    }

    fn app(ready: bool) -> axum::Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_orientation_routes(service()).layer(Extension(state))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(true).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let response = app(false).oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true).oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_are_plain_text() {
        let response = app(true).oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn orientation_routes_are_mounted() {
        let response = app(true)
            .oneshot(
                Request::post("/api/v1/orientation/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
