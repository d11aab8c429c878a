//! Report-composition block: ties the capability, media, location and report
//! atoms into one workflow instance per complaint.

pub mod error;
pub mod signals;
pub mod submission;
pub mod workflow;

pub use error::WorkflowError;
pub use signals::{SignalBus, WorkflowSignal};
pub use submission::{ReportSubmission, SubmissionError};
pub use workflow::{AddressRefresh, Collaborators, ReportWorkflow, WorkflowOptions, WorkflowState};
