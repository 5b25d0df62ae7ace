//! PATH checks for the external tools the driver shells out to.
//!
//! Run before the first allocation so a missing binary fails the run in
//! seconds instead of mid-provision with a cluster already allocated.

use std::path::Component;

use anyhow::{anyhow, Result};
use cbtestctl_core::cluster::Cbdyncluster;

pub fn check(tool: &Cbdyncluster) -> Result<()> {
    let program = tool.program();
    let is_bare_name = program.components().count() == 1
        && matches!(program.components().next(), Some(Component::Normal(_)));

    if is_bare_name {
        which::which(program).map_err(|_| {
            anyhow!(
                "cbdyncluster not found on PATH\n\
                 Install it from https://github.com/couchbaselabs/cbdynclusterd \
                 or pass --cbdyncluster with an explicit path"
            )
        })?;
    } else if !program.exists() {
        return Err(anyhow!(
            "cbdyncluster override not found: {}",
            program.display()
        ));
    }

    for bin in ["git", "mvn"] {
        which::which(bin)
            .map_err(|_| anyhow!("{bin} not found on PATH (required to build the downstream projects)"))?;
    }
    Ok(())
}
