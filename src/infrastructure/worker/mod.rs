//! Process-level hosting of the offload worker.

pub mod stdio;

pub use stdio::StdioWorker;
