//! Configuration loading and validation
//!
//! Settings come in over command-line flags or their environment
//! counterparts and are validated once at startup:
//!
//! | Flag | Environment | Meaning |
//! |------|-------------|---------|
//! | `--base-url` | `JENKINS_BASE_URL` | URL prefix for job lookups, usually ending in `/job` |
//! | `--jobs` | `JENKINS_JOBS` | Comma-separated job names to report, each listed once |
//! | `--username` | `JENKINS_USERNAME` | Basic-auth username, paired with the token |
//! | `--token` | `JENKINS_TOKEN` | Basic-auth API token, paired with the username |
//! | `--port` | `EXPORTER_PORT` | Listen port, `9103` by default |
//! | `--timeout` | `EXPORTER_TIMEOUT` | Per-request Jenkins timeout, `10s` by default |
//! | `--max-concurrent` | `EXPORTER_MAX_CONCURRENT` | Parallel job lookups per scrape, `4` by default |

mod exporter;

pub use exporter::{Config, ConfigError, Credential, JobName, RawConfig, parse_jobs};
