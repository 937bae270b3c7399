//! Jenkins exporter CLI
//!
//! Serve the build status of a set of Jenkins jobs as Prometheus gauges.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use jenkins_exporter::api::{AppState, start_server};
use jenkins_exporter::client::JenkinsClient;
use jenkins_exporter::config::{Config, RawConfig};
use jenkins_exporter::status::StatusResolver;

/// Prometheus exporter for Jenkins build statuses
#[derive(Debug, Parser)]
#[command(name = "jenkins-exporter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Jenkins URL prefix for job lookups, usually ending in /job
    #[arg(long, env = "JENKINS_BASE_URL")]
    base_url: String,

    /// Comma-separated Jenkins job names to report
    #[arg(long, env = "JENKINS_JOBS")]
    jobs: String,

    /// Basic-auth username for the Jenkins API
    #[arg(long, env = "JENKINS_USERNAME")]
    username: Option<String>,

    /// Basic-auth API token, paired with the username
    #[arg(long, env = "JENKINS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Port to serve metrics on
    #[arg(long, env = "EXPORTER_PORT", default_value_t = 9103)]
    port: u16,

    /// Timeout for each Jenkins request
    #[arg(
        long,
        env = "EXPORTER_TIMEOUT",
        default_value = "10s",
        value_parser = humantime::parse_duration
    )]
    timeout: Duration,

    /// Maximum concurrent job lookups per scrape
    #[arg(long, env = "EXPORTER_MAX_CONCURRENT", default_value_t = 4)]
    max_concurrent: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs as JSON
    #[arg(long)]
    json: bool,
}

fn setup_logging(verbose: bool, json: bool) {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.json);

    let config = Config::resolve(RawConfig {
        base_url: cli.base_url,
        jobs: cli.jobs,
        username: cli.username,
        token: cli.token,
        port: cli.port,
        timeout: cli.timeout,
        max_concurrent: cli.max_concurrent,
    })
    .context("Invalid configuration")?;

    tracing::info!(
        base_url = %config.base_url,
        jobs = config.jobs.len(),
        authenticated = config.credential.is_some(),
        timeout = ?config.timeout,
        max_concurrent = config.max_concurrent,
        "Configuration loaded"
    );
    for job in &config.jobs {
        tracing::info!(job = %job, "Watching job");
    }

    let client = JenkinsClient::new(config.timeout, config.credential.clone())
        .context("Failed to create Jenkins client")?;
    let resolver = StatusResolver::new(client, &config.base_url);
    let state = AppState::new(Arc::new(resolver), config.jobs.clone(), config.max_concurrent);

    if let Err(error) = start_server(config.port, state).await {
        anyhow::bail!("Exporter server failed: {error}");
    }

    Ok(())
}
