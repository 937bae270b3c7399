//! Jenkins Exporter Test Kit
//!
//! Test infrastructure for exercising the exporter against a scripted
//! Jenkins lookalike.
//!
//! This crate provides:
//! - An in-process mock Jenkins server with per-job scripted behavior
//! - Request counting for fresh-fetch assertions
//! - Optional basic-auth enforcement
//!
//! # Example
//!
//! ```rust,no_run
//! use jenkins_exporter_testkit::mock::{MockJenkins, MockJob};
//!
//! # async fn demo() {
//! let jenkins = MockJenkins::start(vec![
//!     MockJob::success("website-build"),
//!     MockJob::building("api-tests"),
//! ])
//! .await;
//!
//! // Point the exporter at jenkins.base_url()
//! # }
//! ```

pub mod mock;

// Re-exports for convenience
pub use mock::{MockJenkins, MockJob, basic_auth_header};
