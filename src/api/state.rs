//! Shared handler state

use std::sync::Arc;

use crate::config::JobName;
use crate::status::BuildStatusSource;

/// State shared by all request handlers
///
/// Assembled once at startup and never mutated afterwards; cloning is a
/// couple of pointer copies, so every request can take its own handle.
#[derive(Clone)]
pub struct AppState {
    /// Where job statuses come from
    pub source: Arc<dyn BuildStatusSource>,
    /// Jobs to report, in emission order
    pub jobs: Arc<[JobName]>,
    /// Upper bound on concurrent status lookups per scrape
    pub max_concurrent: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(
        source: Arc<dyn BuildStatusSource>,
        jobs: Vec<JobName>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            source,
            jobs: jobs.into(),
            max_concurrent,
        }
    }
}
