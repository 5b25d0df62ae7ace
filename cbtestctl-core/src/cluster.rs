//! Typed wrapper over the `cbdyncluster` CLI.
//!
//! Commands: allocate, ips, setup, rm

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::exec::{capture_first_line, run_streaming, CommandLine};

/// Opaque identifier for a provisioned cluster, as printed by `allocate`.
/// Created by allocation, consumed by setup/ips/rm, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterHandle(String);

impl ClusterHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provisioning parameters for a test cluster. Fixed for the whole run;
/// the defaults match what the downstream suites expect.
#[derive(Debug, Clone)]
pub struct ClusterSpec {
    pub bucket: String,
    pub password: String,
    pub num_nodes: u32,
    pub ram_quota_mb: u32,
    pub storage_mode: String,
    pub services: String,
    pub admin_user: String,
    pub admin_password: String,
    pub admin_port: u16,
}

impl Default for ClusterSpec {
    fn default() -> Self {
        Self {
            bucket: "default".to_string(),
            password: "password".to_string(),
            num_nodes: 1,
            ram_quota_mb: 2048,
            storage_mode: "memory_optimized".to_string(),
            services: "kv,index,n1ql".to_string(),
            admin_user: "Administrator".to_string(),
            admin_password: "password".to_string(),
            admin_port: 8091,
        }
    }
}

/// Handle to the cluster-allocation tool. The binary path is injectable so
/// tests and nonstandard installs can point at their own executable.
#[derive(Debug, Clone)]
pub struct Cbdyncluster {
    program: PathBuf,
}

impl Cbdyncluster {
    pub fn new() -> Self {
        Self::with_program("cbdyncluster")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self) -> CommandLine {
        CommandLine::new(self.program.to_string_lossy())
    }

    /// Allocate a fresh cluster of the requested server version and return
    /// its handle.
    pub fn allocate(&self, version: &str, spec: &ClusterSpec) -> Result<ClusterHandle> {
        let id = capture_first_line(&self.allocate_cmd(version, spec))?;
        info!(cluster = %id, version, "allocated cluster");
        Ok(ClusterHandle(id))
    }

    /// Resolve the node address list for a cluster. The first line of output
    /// is the seed node handed to the downstream builds.
    pub fn ips(&self, handle: &ClusterHandle) -> Result<String> {
        let node = capture_first_line(&self.ips_cmd(handle))?;
        info!(cluster = %handle, node = %node, "resolved seed node");
        Ok(node)
    }

    /// Provision services, bucket, and admin user on an allocated cluster.
    pub fn setup(&self, handle: &ClusterHandle, spec: &ClusterSpec) -> Result<()> {
        run_streaming(&self.setup_cmd(handle, spec))
    }

    /// Release a cluster.
    pub fn remove(&self, handle: &ClusterHandle) -> Result<()> {
        info!(cluster = %handle, "releasing cluster");
        run_streaming(&self.remove_cmd(handle))
    }

    fn allocate_cmd(&self, version: &str, spec: &ClusterSpec) -> CommandLine {
        self.command()
            .arg("allocate")
            .arg(format!("--num-nodes={}", spec.num_nodes))
            .arg(format!("--server-version={version}"))
    }

    fn ips_cmd(&self, handle: &ClusterHandle) -> CommandLine {
        self.command().arg("ips").arg(handle.as_str())
    }

    fn setup_cmd(&self, handle: &ClusterHandle, spec: &ClusterSpec) -> CommandLine {
        self.command()
            .arg("setup")
            .arg(handle.as_str())
            .arg(format!("--ram-quota={}", spec.ram_quota_mb))
            .arg(format!("--storage-mode={}", spec.storage_mode))
            .arg(format!("--node={}", spec.services))
            .arg(format!("--bucket={}", spec.bucket))
            .arg(format!("--user={}:{}:admin", spec.bucket, spec.password))
    }

    fn remove_cmd(&self, handle: &ClusterHandle) -> CommandLine {
        self.command().arg("rm").arg(handle.as_str())
    }
}

impl Default for Cbdyncluster {
    fn default() -> Self {
        Self::new()
    }
}
