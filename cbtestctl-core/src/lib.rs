pub mod admin;
pub mod cluster;
pub mod driver;
pub mod error;
pub mod exec;
pub mod properties;

pub use cluster::{Cbdyncluster, ClusterHandle, ClusterSpec};
pub use driver::DriverOptions;
pub use error::{DriverError, Result};
pub use exec::{capture_first_line, run_streaming, CommandLine};
pub use properties::{CoreTestProperties, MockClientProperties};
