//! HTTP server for the metrics endpoint
//!
//! Axum-based server with a single concern: answer GET requests with
//! the current build statuses in Prometheus text format.

use axum::{Router, routing::get};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::metrics::metrics_handler;
use super::state::AppState;

/// Start the exporter server on the given port
///
/// Runs until the process is stopped or the listener fails.
pub async fn start_server(
    port: u16,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!(port = port, "Starting Jenkins build status exporter");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the exporter router
///
/// Scrape configurations point at whatever path they like, `/metrics`
/// or otherwise, so every GET resolves to the metrics handler. Other
/// methods get 405.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::api::metrics::METRICS_CONTENT_TYPE;
    use crate::config::JobName;
    use crate::status::{BuildStatus, BuildStatusSource};

    struct FixedSource(BuildStatus);

    #[async_trait]
    impl BuildStatusSource for FixedSource {
        async fn status(&self, _job: &JobName) -> BuildStatus {
            self.0
        }
    }

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(FixedSource(BuildStatus::Idle)),
            vec![JobName::new("website-build").unwrap()],
            2,
        )
    }

    #[tokio::test]
    async fn test_root_path_serves_metrics() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            METRICS_CONTENT_TYPE
        );
    }

    #[tokio::test]
    async fn test_any_path_serves_metrics() {
        for uri in ["/metrics", "/status", "/some/odd/path"] {
            let app = create_router(test_state());

            let response = app
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "GET {uri}");

            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            assert_eq!(body, "jenkins_build_status{name=\"website-build\"} 0\n");
        }
    }

    #[tokio::test]
    async fn test_non_get_methods_are_rejected() {
        for method in ["POST", "DELETE"] {
            let app = create_router(test_state());

            let response = app
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri("/")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} /");
        }
    }
}
