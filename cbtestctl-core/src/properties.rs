//! Flat key=value property files consumed by the downstream test suites.
//!
//! Files are rendered in a fixed order, staged as a temp file inside the
//! working directory, and persisted over the destination path. A move, not a
//! merge: whatever was at the destination is replaced.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::{DriverError, Result};

/// Connection and credential properties read by the couchbase-jvm-core
/// integration suite.
#[derive(Debug, Clone)]
pub struct CoreTestProperties {
    pub seed_node: String,
    pub bucket: String,
    pub password: String,
}

impl CoreTestProperties {
    /// Render the eleven documented keys, one per line, in documented order.
    /// The username always mirrors the bucket name.
    pub fn render(&self) -> String {
        let pairs = [
            ("seedNode", self.seed_node.as_str()),
            ("bucket", self.bucket.as_str()),
            ("username", self.bucket.as_str()),
            ("password", self.password.as_str()),
            ("adminUser", "Administrator"),
            ("adminPassword", "password"),
            ("mockNodeCount", "1"),
            ("mockReplicaCount", "1"),
            ("mockBucketType", "couchbase"),
            ("useMock", "false"),
            ("ci", "true"),
        ];
        render_pairs(&pairs)
    }

    pub fn install(&self, work_dir: &Path, dest: &Path) -> Result<()> {
        install_rendered(&self.render(), work_dir, dest)
    }
}

/// Properties that disable the mock client for the couchbase-java-client
/// suite. Connection parameters are accepted for call-site symmetry but the
/// rendered content is fixed.
#[derive(Debug, Clone)]
pub struct MockClientProperties {
    pub seed_node: String,
    pub bucket: String,
    pub password: String,
}

impl MockClientProperties {
    pub fn render(&self) -> String {
        render_pairs(&[("mock.enabled", "false"), ("useMock", "false")])
    }

    pub fn install(&self, work_dir: &Path, dest: &Path) -> Result<()> {
        install_rendered(&self.render(), work_dir, dest)
    }
}

fn render_pairs(pairs: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (key, value) in pairs {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// Stage the rendered content in `work_dir` and rename it over `dest`.
/// The staging file lives on the same filesystem as the checkout tree, so
/// the persist is an atomic rename. Creates the destination's parent
/// directories when the checkout does not carry them.
fn install_rendered(content: &str, work_dir: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut staged = tempfile::Builder::new()
        .prefix("properties-")
        .tempfile_in(work_dir)?;
    staged.write_all(content.as_bytes())?;
    staged
        .persist(dest)
        .map_err(|err| DriverError::property_install(dest, err.error.to_string()))?;

    info!("installed {}", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_props() -> CoreTestProperties {
        CoreTestProperties {
            seed_node: "10.0.0.5".to_string(),
            bucket: "default".to_string(),
            password: "password".to_string(),
        }
    }

    #[test]
    fn core_properties_render_documented_keys_in_order() {
        let expected = "seedNode=10.0.0.5\n\
                        bucket=default\n\
                        username=default\n\
                        password=password\n\
                        adminUser=Administrator\n\
                        adminPassword=password\n\
                        mockNodeCount=1\n\
                        mockReplicaCount=1\n\
                        mockBucketType=couchbase\n\
                        useMock=false\n\
                        ci=true\n";
        assert_eq!(core_props().render(), expected);
    }

    #[test]
    fn username_mirrors_bucket_name() {
        let props = CoreTestProperties {
            seed_node: "10.0.0.5".to_string(),
            bucket: "beer-sample".to_string(),
            password: "secret".to_string(),
        };
        let rendered = props.render();
        assert!(rendered.contains("bucket=beer-sample\n"));
        assert!(rendered.contains("username=beer-sample\n"));
    }

    #[test]
    fn mock_properties_ignore_connection_inputs() {
        let a = MockClientProperties {
            seed_node: "10.0.0.5".to_string(),
            bucket: "default".to_string(),
            password: "password".to_string(),
        };
        let b = MockClientProperties {
            seed_node: "somewhere-else".to_string(),
            bucket: "other".to_string(),
            password: "hunter2".to_string(),
        };
        assert_eq!(a.render(), "mock.enabled=false\nuseMock=false\n");
        assert_eq!(a.render(), b.render());
    }

    #[test]
    fn install_creates_missing_resource_directories() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir
            .path()
            .join("checkout/src/test/resources/mock.properties");

        let props = MockClientProperties {
            seed_node: "10.0.0.5".to_string(),
            bucket: "default".to_string(),
            password: "password".to_string(),
        };
        props.install(dir.path(), &dest).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), props.render());
    }

    #[test]
    fn reinstall_replaces_destination_with_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("checkout/resources/integration.properties");

        let props = core_props();
        props.install(dir.path(), &dest).unwrap();
        let first = fs::read(&dest).unwrap();

        // Simulate a stale file from a previous run, then reinstall.
        fs::write(&dest, "stale=true\n").unwrap();
        props.install(dir.path(), &dest).unwrap();
        let second = fs::read(&dest).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn no_staging_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.properties");
        core_props().install(dir.path(), &dest).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("properties-"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
