//! Stdio offload worker command.

use anyhow::Result;

use crate::domain::models::Config;
use crate::infrastructure::worker::StdioWorker;

/// Serve the worker protocol on stdin/stdout until stdin closes.
pub async fn execute(config: &Config) -> Result<()> {
    StdioWorker::new(&config.offload).run().await
}
