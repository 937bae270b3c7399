//! Exporter configuration

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Errors raised while validating the exporter configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("Unsupported base URL scheme `{0}`, expected http or https")]
    BaseUrlScheme(String),

    #[error("No jobs configured")]
    NoJobs,

    #[error("Invalid job name {name:?}: {reason}")]
    Job { name: String, reason: &'static str },

    #[error("Job {0:?} is listed more than once")]
    DuplicateJob(String),

    #[error("Username and token must be given together or not at all")]
    PartialCredential,

    #[error("Concurrency limit must be at least 1")]
    ZeroParallelism,
}

/// Basic-auth credential for the Jenkins API
#[derive(Debug, Clone)]
pub struct Credential {
    pub username: String,
    pub token: String,
}

impl Credential {
    /// Combine optional username and token into an optional credential.
    ///
    /// Empty strings count as absent, so a blank environment variable
    /// behaves like an unset one. Supplying only one half is an error
    /// rather than a silent fall-back to anonymous access.
    pub fn from_parts(
        username: Option<String>,
        token: Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let username = username.filter(|u| !u.is_empty());
        let token = token.filter(|t| !t.is_empty());

        match (username, token) {
            (Some(username), Some(token)) => Ok(Some(Self { username, token })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::PartialCredential),
        }
    }
}

/// A validated Jenkins job name
///
/// Names are interpolated into a Prometheus label value and into request
/// URLs, so quotes, backslashes and control characters are rejected up
/// front. Slashes stay legal: multibranch jobs are addressed as nested
/// paths such as `website/job/main`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobName(String);

impl JobName {
    /// Validate `name`, trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ConfigError> {
        let trimmed = name.as_ref().trim();

        if trimmed.is_empty() {
            return Err(ConfigError::Job {
                name: name.as_ref().to_string(),
                reason: "name is empty",
            });
        }
        for c in trimmed.chars() {
            if c == '"' || c == '\\' {
                return Err(ConfigError::Job {
                    name: trimmed.to_string(),
                    reason: "quotes and backslashes are not allowed",
                });
            }
            if c.is_control() {
                return Err(ConfigError::Job {
                    name: trimmed.to_string(),
                    reason: "control characters are not allowed",
                });
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JobName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse a comma-separated job list into validated names.
///
/// Whitespace around entries is trimmed and empty segments from stray
/// commas are skipped. An effectively empty list is an error: an
/// exporter with nothing to export is a deployment mistake. A name
/// listed twice is an error as well: it would emit two series with an
/// identical label set, which scrapers reject.
pub fn parse_jobs(raw: &str) -> Result<Vec<JobName>, ConfigError> {
    let jobs = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(JobName::new)
        .collect::<Result<Vec<_>, _>>()?;

    if jobs.is_empty() {
        return Err(ConfigError::NoJobs);
    }

    let mut seen = HashSet::new();
    for job in &jobs {
        if !seen.insert(job.as_str()) {
            return Err(ConfigError::DuplicateJob(job.as_str().to_string()));
        }
    }

    Ok(jobs)
}

/// Configuration as collected from the command line and environment,
/// before validation
#[derive(Debug, Clone)]
pub struct RawConfig {
    pub base_url: String,
    pub jobs: String,
    pub username: Option<String>,
    pub token: Option<String>,
    pub port: u16,
    pub timeout: Duration,
    pub max_concurrent: usize,
}

/// Validated exporter configuration
///
/// Built once at startup and treated as immutable afterwards; every
/// component receives the values it needs at construction time.
#[derive(Debug, Clone)]
pub struct Config {
    /// URL prefix job names are appended to, typically ending in `/job`
    pub base_url: Url,
    /// Jobs to report, in the order their metrics are emitted
    pub jobs: Vec<JobName>,
    /// Optional basic-auth credential for the Jenkins API
    pub credential: Option<Credential>,
    /// TCP port the exporter listens on
    pub port: u16,
    /// Per-request timeout for Jenkins fetches
    pub timeout: Duration,
    /// Upper bound on concurrently resolved jobs per scrape
    pub max_concurrent: usize,
}

impl Config {
    /// Validate raw settings into a usable configuration.
    pub fn resolve(raw: RawConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(raw.base_url.trim())?;
        match base_url.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::BaseUrlScheme(other.to_string())),
        }

        let jobs = parse_jobs(&raw.jobs)?;
        let credential = Credential::from_parts(raw.username, raw.token)?;

        if raw.max_concurrent == 0 {
            return Err(ConfigError::ZeroParallelism);
        }

        Ok(Self {
            base_url,
            jobs,
            credential,
            port: raw.port,
            timeout: raw.timeout,
            max_concurrent: raw.max_concurrent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawConfig {
        RawConfig {
            base_url: "https://jenkins.example.com/job".to_string(),
            jobs: "website-build,api-tests".to_string(),
            username: None,
            token: None,
            port: 9103,
            timeout: Duration::from_secs(10),
            max_concurrent: 4,
        }
    }

    #[test]
    fn test_resolve_anonymous_config() {
        let config = Config::resolve(raw()).unwrap();

        assert_eq!(config.base_url.as_str(), "https://jenkins.example.com/job");
        assert_eq!(config.jobs.len(), 2);
        assert_eq!(config.jobs[0].as_str(), "website-build");
        assert_eq!(config.jobs[1].as_str(), "api-tests");
        assert!(config.credential.is_none());
        assert_eq!(config.port, 9103);
        assert_eq!(config.max_concurrent, 4);
    }

    #[test]
    fn test_resolve_with_credential() {
        let mut raw = raw();
        raw.username = Some("ci-bot".to_string());
        raw.token = Some("t0k3n".to_string());

        let config = Config::resolve(raw).unwrap();
        let credential = config.credential.unwrap();
        assert_eq!(credential.username, "ci-bot");
        assert_eq!(credential.token, "t0k3n");
    }

    #[test]
    fn test_username_without_token_is_rejected() {
        let mut raw = raw();
        raw.username = Some("ci-bot".to_string());

        let error = Config::resolve(raw).unwrap_err();
        assert!(matches!(error, ConfigError::PartialCredential));
    }

    #[test]
    fn test_token_without_username_is_rejected() {
        let mut raw = raw();
        raw.token = Some("t0k3n".to_string());

        let error = Config::resolve(raw).unwrap_err();
        assert!(matches!(error, ConfigError::PartialCredential));
    }

    #[test]
    fn test_blank_credential_counts_as_absent() {
        let mut raw = raw();
        raw.username = Some(String::new());
        raw.token = Some(String::new());

        let config = Config::resolve(raw).unwrap();
        assert!(config.credential.is_none());
    }

    #[test]
    fn test_malformed_base_url_is_rejected() {
        let mut raw = raw();
        raw.base_url = "not a url".to_string();

        let error = Config::resolve(raw).unwrap_err();
        assert!(matches!(error, ConfigError::BaseUrl(_)));
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let mut raw = raw();
        raw.base_url = "ftp://jenkins.example.com/job".to_string();

        let error = Config::resolve(raw).unwrap_err();
        assert!(matches!(error, ConfigError::BaseUrlScheme(scheme) if scheme == "ftp"));
    }

    #[test]
    fn test_empty_job_list_is_rejected() {
        let mut raw = raw();
        raw.jobs = " , ,".to_string();

        let error = Config::resolve(raw).unwrap_err();
        assert!(matches!(error, ConfigError::NoJobs));
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let mut raw = raw();
        raw.max_concurrent = 0;

        let error = Config::resolve(raw).unwrap_err();
        assert!(matches!(error, ConfigError::ZeroParallelism));
    }

    #[test]
    fn test_job_list_keeps_configured_order() {
        let jobs = parse_jobs("zeta, alpha ,midway").unwrap();
        let names: Vec<_> = jobs.iter().map(JobName::as_str).collect();
        assert_eq!(names, ["zeta", "alpha", "midway"]);
    }

    #[test]
    fn test_stray_commas_are_tolerated() {
        let jobs = parse_jobs("website-build,,api-tests,").unwrap();
        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn test_duplicate_job_names_are_rejected() {
        let error = parse_jobs("website-build,api-tests,website-build").unwrap_err();
        assert!(matches!(error, ConfigError::DuplicateJob(name) if name == "website-build"));
    }

    #[test]
    fn test_duplicates_are_detected_after_trimming() {
        let error = parse_jobs("deploy, deploy ").unwrap_err();
        assert!(matches!(error, ConfigError::DuplicateJob(_)));
    }

    #[test]
    fn test_multibranch_names_are_valid() {
        let job = JobName::new("website/job/main").unwrap();
        assert_eq!(job.as_str(), "website/job/main");
    }

    #[test]
    fn test_job_names_are_trimmed() {
        let job = JobName::new("  website-build\t").unwrap();
        assert_eq!(job.as_str(), "website-build");
    }

    #[test]
    fn test_label_breaking_characters_are_rejected() {
        for name in ["quo\"te", "back\\slash", "new\nline", "tab\tinside"] {
            let error = JobName::new(name).unwrap_err();
            assert!(
                matches!(error, ConfigError::Job { .. }),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_job_name_is_rejected() {
        assert!(matches!(
            JobName::new("   ").unwrap_err(),
            ConfigError::Job { .. }
        ));
    }
}
