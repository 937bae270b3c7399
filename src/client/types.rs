//! Jenkins remote API types
//!
//! These types cover the two documents the exporter reads, shaped after the
//! Jenkins JSON remote API (`<object-url>/api/json`). Jenkins returns far
//! more fields than declared here; unknown fields are ignored on purpose.

use serde::{Deserialize, Serialize};

/// The only `result` value that counts as a successful build.
///
/// The comparison is case-sensitive and exact; every other recorded value
/// (`FAILURE`, `UNSTABLE`, `ABORTED`, ...) marks the build as failed.
pub const RESULT_SUCCESS: &str = "SUCCESS";

/// Job summary document
/// Endpoint: GET `<base>/<job>/api/json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Pointer to the most recent build; `null` for a job that has never
    /// been built
    #[serde(default)]
    pub last_build: Option<BuildRef>,
}

/// Reference to a build inside a job document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRef {
    /// Absolute URL of the build, reported with a trailing slash
    pub url: String,
}

/// Build detail document
/// Endpoint: GET `<lastBuild.url>/api/json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRecord {
    /// Whether the build is still running
    pub building: bool,
    /// Recorded outcome; `null` while the build is running
    #[serde(default)]
    pub result: Option<String>,
}
