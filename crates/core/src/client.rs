//! The run orchestrator: one synchronization run from credential resolution
//! to the bounded auto-restart loop.

mod config;
mod error;
mod proxy;
mod restart;
mod run;

pub use config::{DEFAULT_SYNC_RETRIES, RunConfig, RunConfigBuilder};
pub use error::ClientError;
pub use proxy::parse_proxy;
pub use restart::RestartState;
pub use run::{RunSummary, run_sync};
