// Re-export model types and service functions
pub mod model;
pub mod service;

pub use model::{
    AssembleError, Priority, ReportDraft, ReportPayload, ValidationError, UNRESOLVED_ADDRESS_TEXT,
};
pub use service::{validate, ReportAssembler};
