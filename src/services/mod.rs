pub mod axis_solver;
pub mod coalescer;
pub mod compatibility_matcher;
pub mod compute;
pub mod convergence_detector;
pub mod offload;
pub mod profile_aggregator;
pub mod profile_session;

pub use axis_solver::{AdjustmentKind, AdjustmentRecord, AxisConstraintSolver, SolverOutcome};
pub use coalescer::Coalescer;
pub use compatibility_matcher::CompatibilityMatcher;
pub use compute::{compute, SyncBackend};
pub use convergence_detector::ConvergenceDetector;
pub use offload::{backend_from_config, OffloadClient, OffloadError, OffloadWorker, WorkerChannels};
pub use profile_aggregator::ProfileAggregator;
pub use profile_session::ProfileSession;
