//! Process-level pieces shared by every entry point: configuration,
//! tracing set-up and concrete adapters for the workflow's collaborators.

pub mod adapters;
pub mod config;
pub mod store;
pub mod submission;
pub mod telemetry;

pub use config::WorkflowConfig;
pub use store::FsImageStore;
pub use submission::{JsonFileSubmission, StdoutSubmission};
