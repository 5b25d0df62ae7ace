//! Structured error types for cbtestctl-core.
//!
//! Uses `thiserror` for better API surface and error composition.
//! The binary crate (cbtestctl-cli) can still use `anyhow` for convenience,
//! but library consumers get structured, composable errors.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Main error type for cbtestctl-core operations
#[derive(Error, Debug)]
pub enum DriverError {
    /// External binary could not be started
    #[error("failed to start `{command}`: {source}")]
    Spawn { command: String, source: io::Error },

    /// External command ran but exited nonzero
    #[error("`{command}` failed with {status}")]
    CommandFailed { command: String, status: ExitStatus },

    /// A command expected to print an identifier produced nothing usable
    #[error("`{command}` produced no output to capture")]
    EmptyCapture { command: String },

    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Staged property file could not be moved into the checkout
    #[error("failed to install properties at {dest:?}: {reason}")]
    PropertyInstall { dest: PathBuf, reason: String },

    /// Bucket-flush request could not be sent
    #[error("bucket flush request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Bucket-flush request reached the cluster but was rejected
    #[error("bucket flush rejected by {url}: HTTP {status}")]
    FlushRejected { url: String, status: u16 },
}

/// Result type alias for cbtestctl-core operations
pub type Result<T> = std::result::Result<T, DriverError>;

impl DriverError {
    /// Create a spawn error for a rendered command line
    pub fn spawn(command: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Create a command-failed error for a rendered command line
    pub fn command_failed(command: impl Into<String>, status: ExitStatus) -> Self {
        Self::CommandFailed {
            command: command.into(),
            status,
        }
    }

    /// Create an empty-capture error for a rendered command line
    pub fn empty_capture(command: impl Into<String>) -> Self {
        Self::EmptyCapture {
            command: command.into(),
        }
    }

    /// Create a property-install error
    pub fn property_install(dest: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::PropertyInstall {
            dest: dest.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DriverError::empty_capture("cbdyncluster ips cluster-1");
        assert_eq!(
            err.to_string(),
            "`cbdyncluster ips cluster-1` produced no output to capture"
        );

        let err = DriverError::property_install("/tmp/mock.properties", "cross-device rename");
        assert!(err.to_string().contains("mock.properties"));
        assert!(err.to_string().contains("cross-device rename"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let driver_err: DriverError = io_err.into();

        assert!(matches!(driver_err, DriverError::Io { .. }));
    }
}
