//! Bucket configuration against the cluster's admin REST endpoint.

use reqwest::Client;
use tracing::info;

use crate::cluster::ClusterSpec;
use crate::error::{DriverError, Result};

/// Enable flush on the test bucket so the suites can reset state between
/// test classes. POSTs `flushEnabled=1` with admin basic auth; a non-success
/// response is an error.
pub async fn enable_flush(node: &str, spec: &ClusterSpec) -> Result<()> {
    let url = format!(
        "http://{node}:{port}/pools/default/buckets/{bucket}",
        port = spec.admin_port,
        bucket = spec.bucket,
    );
    info!(%url, "enabling flush on bucket");

    let response = Client::new()
        .post(&url)
        .basic_auth(&spec.admin_user, Some(&spec.admin_password))
        .form(&[("flushEnabled", "1")])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DriverError::FlushRejected {
            url,
            status: status.as_u16(),
        });
    }
    Ok(())
}
