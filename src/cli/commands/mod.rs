//! Command handlers, one module per subcommand.

pub mod aggregate;
pub mod detect;
pub mod match_catalog;
pub mod set_axis;
pub mod worker;

use std::sync::Arc;

use crate::domain::models::Config;
use crate::domain::ports::ComputeBackend;
use crate::services::{backend_from_config, SyncBackend};

/// Synchronous backend unless `offload` is requested and enabled in config.
pub(crate) async fn select_backend(config: &Config, offload: bool) -> Arc<dyn ComputeBackend> {
    if offload {
        backend_from_config(&config.offload).await
    } else {
        Arc::new(SyncBackend::new())
    }
}
