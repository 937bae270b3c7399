//! Prometheus metrics for Jenkins build statuses
//!
//! One gauge line per configured job:
//!
//! ```text
//! jenkins_build_status{name="website-build"} 0
//! ```
//!
//! Status values: `-1` unknown, `0` idle, `1` building, `2` failed.
//! Scrape configurations sometimes point at `/` and sometimes at
//! `/metrics`; the router sends every path here, so both work:
//!
//! ```yaml
//! scrape_configs:
//!   - job_name: 'jenkins-builds'
//!     static_configs:
//!       - targets: ['jenkins-exporter:9103']
//! ```

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::fmt::Write;

use crate::config::JobName;
use crate::status::BuildStatusSource;
use crate::utils::concurrent::map_ordered;

use super::state::AppState;

/// Content type of the Prometheus text exposition format
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render one `jenkins_build_status` line per job, in the given order.
///
/// Statuses are resolved with at most `max_concurrent` lookups in
/// flight, but emission order is always the configured job order, never
/// completion order.
pub async fn render_status(
    source: &dyn BuildStatusSource,
    jobs: &[JobName],
    max_concurrent: usize,
) -> String {
    // Each lookup future owns its name; futures borrowing the slice
    // items would break the Send bound on the handler future.
    let statuses = map_ordered(jobs.iter().cloned(), max_concurrent, |job| async move {
        source.status(&job).await
    })
    .await;

    let mut output = String::new();
    for (job, status) in jobs.iter().zip(statuses) {
        writeln!(
            output,
            "jenkins_build_status{{name=\"{}\"}} {}",
            job,
            status.code()
        )
        .unwrap();
    }

    output
}

/// Generate Prometheus-format metrics from freshly fetched statuses
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let output = render_status(state.source.as_ref(), &state.jobs, state.max_concurrent).await;

    (
        StatusCode::OK,
        [("content-type", METRICS_CONTENT_TYPE)],
        output,
    )
}
