//! Build status resolution
//!
//! Two round-trips per job: the job document names its last build, the
//! build document carries the state we report. Every failure mode along
//! the way collapses to [`BuildStatus::Unknown`] so one broken job can
//! never break a scrape.

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::client::{BuildRecord, JenkinsClient, JenkinsError, JenkinsResult, JobRecord};
use crate::config::JobName;
use crate::status::BuildStatus;

/// Anything that can report the current status of a job
///
/// The HTTP layer depends on this seam rather than on the concrete
/// resolver, which keeps handler tests free of a live Jenkins.
#[async_trait]
pub trait BuildStatusSource: Send + Sync {
    /// Report the current status of `job`.
    ///
    /// Implementations must be total: faults are mapped to
    /// [`BuildStatus::Unknown`], never surfaced as errors.
    async fn status(&self, job: &JobName) -> BuildStatus;
}

/// Resolves job statuses against a live Jenkins server
pub struct StatusResolver {
    client: JenkinsClient,
    base: String,
}

impl StatusResolver {
    /// Create a resolver for jobs under `base`.
    ///
    /// `base` is the URL prefix job names are appended to, typically
    /// ending in `/job`. Trailing slashes are dropped so composed URLs
    /// come out with exactly one separator.
    pub fn new(client: JenkinsClient, base: &Url) -> Self {
        Self {
            client,
            base: base.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the status of `job`, reporting fetch and decode faults
    /// as [`BuildStatus::Unknown`].
    pub async fn resolve(&self, job: &JobName) -> BuildStatus {
        match self.try_resolve(job).await {
            Ok(status) => {
                debug!(job = %job, status = %status, "resolved build status");
                status
            }
            Err(error) => {
                warn!(job = %job, error = %error, "failed to resolve build status");
                BuildStatus::Unknown
            }
        }
    }

    async fn try_resolve(&self, job: &JobName) -> JenkinsResult<BuildStatus> {
        let body = self.client.get_text(&self.job_url(job)).await?;
        let record: JobRecord = serde_json::from_str(&body)?;

        let last_build = record
            .last_build
            .ok_or(JenkinsError::MissingField("lastBuild"))?;

        let body = self.client.get_text(&build_detail_url(&last_build.url)).await?;
        let build: BuildRecord = serde_json::from_str(&body)?;

        Ok(BuildStatus::from_build(&build))
    }

    fn job_url(&self, job: &JobName) -> String {
        format!("{}/{}/api/json", self.base, job)
    }
}

#[async_trait]
impl BuildStatusSource for StatusResolver {
    async fn status(&self, job: &JobName) -> BuildStatus {
        self.resolve(job).await
    }
}

/// Compose the API URL for a build from the URL Jenkins advertises for it.
///
/// Jenkins reports build URLs with a trailing slash; tolerate both forms.
fn build_detail_url(build_url: &str) -> String {
    format!("{}/api/json", build_url.trim_end_matches('/'))
}
