//! Jenkins build status exporter for Prometheus
//!
//! A small exporter that turns the build state of a fixed set of Jenkins
//! jobs into Prometheus gauges, one `jenkins_build_status` line per job.
//!
//! ## Architecture
//!
//! Every scrape is a fresh look at Jenkins:
//! - Statuses are fetched on demand, never cached between scrapes
//! - Jobs are resolved concurrently but reported in configured order
//! - Any per-job failure degrades that job to `-1`, never the scrape
//!
//! ## Modules
//!
//! - [`client`] - HTTP client for the Jenkins remote access API
//! - [`status`] - Build status model and resolution
//! - [`api`] - Metrics endpoint served to Prometheus
//! - [`config`] - Startup configuration and validation
//! - [`utils`] - Bounded concurrency helpers

pub mod api;
pub mod client;
pub mod config;
pub mod status;
pub mod utils;
