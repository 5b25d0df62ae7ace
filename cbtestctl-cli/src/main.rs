//! cbtestctl - integration-test driver for the Couchbase JVM clients
//!
//! For each requested Couchbase Server version the driver:
//! - allocates an ephemeral single-node cluster via `cbdyncluster`
//! - provisions services, bucket, and credentials, and enables bucket flush
//! - clones couchbase-jvm-core and couchbase-java-client, installs their
//!   integration property files, and runs both Maven builds against the
//!   live cluster
//! - releases the cluster, whether or not the builds succeeded

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use cbtestctl_core::cluster::Cbdyncluster;
use cbtestctl_core::driver::{self, DriverOptions};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod preflight;

#[derive(Parser, Debug)]
#[command(
    name = "cbtestctl",
    author,
    version,
    about = "Run the Couchbase JVM client integration suites against ephemeral clusters",
    long_about = "Provisions a throwaway cluster per requested server version via cbdyncluster, \
                  points the couchbase-jvm-core and couchbase-java-client test suites at it, and \
                  tears the cluster down afterward."
)]
struct Cli {
    /// Couchbase Server versions to provision and test against (repeatable or comma-separated)
    #[arg(
        short = 'c',
        long = "cluster-versions",
        value_name = "VERSION",
        required = true,
        value_delimiter = ','
    )]
    cluster_versions: Vec<String>,

    /// Directory receiving the project checkouts and the shared local Maven repository
    #[arg(long = "work-dir", value_name = "DIR", default_value = ".")]
    work_dir: PathBuf,

    /// Override the cbdyncluster binary
    #[arg(long, value_name = "PATH")]
    cbdyncluster: Option<PathBuf>,

    /// Suppress info-level logging (RUST_LOG still takes precedence)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

fn init_tracing(quiet: bool) -> Result<()> {
    let default_filter = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet).ok();

    let tool = match &cli.cbdyncluster {
        Some(path) => Cbdyncluster::with_program(path),
        None => Cbdyncluster::new(),
    };
    preflight::check(&tool)?;

    let work_dir = cli
        .work_dir
        .canonicalize()
        .with_context(|| format!("work dir {} is not usable", cli.work_dir.display()))?;
    let opts = DriverOptions::new(work_dir);

    info!(versions = ?cli.cluster_versions, "running integration suites");
    driver::run(&tool, &cli.cluster_versions, &opts)
        .await
        .context("integration run failed")?;
    Ok(())
}
