//! Top-level orchestration: one provision/build/release pass per requested
//! cluster version, strictly sequential.
//!
//! Teardown is scoped to the allocation: everything that happens after a
//! successful `allocate` runs inside a block whose outcome is joined with the
//! `rm` result, so a failed setup or build never leaks a cluster. The first
//! error stops the run; later versions are not attempted.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::admin;
use crate::cluster::{Cbdyncluster, ClusterHandle, ClusterSpec};
use crate::error::Result;
use crate::exec::{run_streaming, CommandLine};
use crate::properties::{CoreTestProperties, MockClientProperties};

pub const JVM_CORE_REPO: &str = "http://github.com/couchbase/couchbase-jvm-core";
pub const JAVA_CLIENT_REPO: &str = "http://github.com/couchbase/couchbase-java-client";

const JVM_CORE_DIR: &str = "couchbase-jvm-core";
const JAVA_CLIENT_DIR: &str = "couchbase-java-client";
const CORE_PROPERTIES: &str = "src/main/resources/com.couchbase.client.core.integration.properties";
const MOCK_PROPERTIES: &str = "src/test/resources/mock.properties";
const LOCAL_MAVEN_REPO: &str = ".repository";

/// Run-wide settings for the driver.
///
/// `work_dir` receives the project checkouts, the shared local Maven
/// repository, and property staging files; subprocesses get it as an
/// explicit working directory instead of the driver mutating its own.
/// `git` and `mvn` are overridable for tests and nonstandard installs.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub work_dir: PathBuf,
    pub spec: ClusterSpec,
    pub git: PathBuf,
    pub mvn: PathBuf,
}

impl DriverOptions {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            spec: ClusterSpec::default(),
            git: PathBuf::from("git"),
            mvn: PathBuf::from("mvn"),
        }
    }
}

/// Run the full integration pass for each version, in order. Stops at the
/// first failing version.
pub async fn run(tool: &Cbdyncluster, versions: &[String], opts: &DriverOptions) -> Result<()> {
    for version in versions {
        info!(version, "starting integration pass");
        run_version(tool, version, opts).await?;
        info!(version, "integration pass complete");
    }
    Ok(())
}

async fn run_version(tool: &Cbdyncluster, version: &str, opts: &DriverOptions) -> Result<()> {
    let handle = tool.allocate(version, &opts.spec)?;

    let outcome = provision_and_test(tool, &handle, opts).await;
    let teardown = tool.remove(&handle);

    match (outcome, teardown) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(err)) => Err(err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(teardown_err)) => {
            // The pass failure is the interesting one; the teardown failure
            // still needs to reach the operator, since the cluster may leak.
            warn!(cluster = %handle, error = %teardown_err, "cluster teardown failed");
            Err(err)
        }
    }
}

async fn provision_and_test(
    tool: &Cbdyncluster,
    handle: &ClusterHandle,
    opts: &DriverOptions,
) -> Result<()> {
    let node = tool.ips(handle)?;
    tool.setup(handle, &opts.spec)?;
    admin::enable_flush(&node, &opts.spec).await?;
    build_and_run_tests(&node, opts)
}

/// Clone both downstream projects fresh, install their property files, and
/// run their Maven builds against the live cluster, sequentially. Both builds
/// share one local Maven repository under the working directory.
fn build_and_run_tests(node: &str, opts: &DriverOptions) -> Result<()> {
    let spec = &opts.spec;
    let maven_repo = opts.work_dir.join(LOCAL_MAVEN_REPO);

    let core_dir = clone_fresh(opts, JVM_CORE_REPO, JVM_CORE_DIR)?;
    CoreTestProperties {
        seed_node: node.to_string(),
        bucket: spec.bucket.clone(),
        password: spec.password.clone(),
    }
    .install(&opts.work_dir, &core_dir.join(CORE_PROPERTIES))?;
    run_streaming(&maven_install(opts, &core_dir, &maven_repo))?;

    let client_dir = clone_fresh(opts, JAVA_CLIENT_REPO, JAVA_CLIENT_DIR)?;
    MockClientProperties {
        seed_node: node.to_string(),
        bucket: spec.bucket.clone(),
        password: spec.password.clone(),
    }
    .install(&opts.work_dir, &client_dir.join(MOCK_PROPERTIES))?;
    let client_build = maven_install(opts, &client_dir, &maven_repo)
        .arg(format!("-DseedNode={node}"))
        .arg(format!("-Dbucket={}", spec.bucket))
        .arg(format!("-Dpassword={}", spec.password))
        .arg("-Dci=true");
    run_streaming(&client_build)?;

    Ok(())
}

/// Clone a downstream project into the working directory, removing any stale
/// checkout from a previous run first so every pass starts from a clean tree.
fn clone_fresh(opts: &DriverOptions, url: &str, dir_name: &str) -> Result<PathBuf> {
    let checkout = opts.work_dir.join(dir_name);
    if checkout.exists() {
        info!("removing stale checkout {}", checkout.display());
        fs::remove_dir_all(&checkout)?;
    }

    let clone = CommandLine::new(opts.git.to_string_lossy())
        .arg("clone")
        .arg(url)
        .current_dir(&opts.work_dir);
    run_streaming(&clone)?;
    Ok(checkout)
}

fn maven_install(opts: &DriverOptions, project_dir: &Path, maven_repo: &Path) -> CommandLine {
    CommandLine::new(opts.mvn.to_string_lossy())
        .arg(format!("-Dmaven.repo.local={}", maven_repo.display()))
        .arg("install")
        .current_dir(project_dir)
}
