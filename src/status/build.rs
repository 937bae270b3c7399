//! Build status model

use std::fmt;

use crate::client::{BuildRecord, RESULT_SUCCESS};

/// Observed state of a Jenkins job, as exposed to Prometheus
///
/// The numeric codes are the exporter's wire contract; dashboards and alert
/// rules match on them, so they must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// Status could not be determined
    Unknown,
    /// Last build completed successfully
    Idle,
    /// A build is currently running
    Building,
    /// Last build completed with a non-success result
    Failed,
}

impl BuildStatus {
    /// Numeric gauge value for this status
    pub fn code(&self) -> i64 {
        match self {
            BuildStatus::Unknown => -1,
            BuildStatus::Idle => 0,
            BuildStatus::Building => 1,
            BuildStatus::Failed => 2,
        }
    }

    /// Classify a fetched build document.
    ///
    /// An in-progress build wins over any recorded result, since Jenkins
    /// keeps the previous result on the build until the new run finishes.
    /// Only the exact string `SUCCESS` counts as success; `UNSTABLE`,
    /// `ABORTED`, `FAILURE` and anything else land on [`BuildStatus::Failed`].
    /// A finished build with no result yet is [`BuildStatus::Unknown`].
    pub fn from_build(build: &BuildRecord) -> Self {
        if build.building {
            return BuildStatus::Building;
        }

        match build.result.as_deref() {
            Some(RESULT_SUCCESS) => BuildStatus::Idle,
            Some(_) => BuildStatus::Failed,
            None => BuildStatus::Unknown,
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStatus::Unknown => write!(f, "unknown"),
            BuildStatus::Idle => write!(f, "idle"),
            BuildStatus::Building => write!(f, "building"),
            BuildStatus::Failed => write!(f, "failed"),
        }
    }
}
