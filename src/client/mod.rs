//! HTTP client for the Jenkins remote access API

mod jenkins;
mod types;

pub use jenkins::{JenkinsClient, JenkinsError, JenkinsResult};
pub use types::{BuildRecord, BuildRef, JobRecord, RESULT_SUCCESS};
