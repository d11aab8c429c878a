// Re-export model types and service functions
pub mod model;
pub mod platform;
pub mod service;

pub use model::{Capability, PermissionStatus};
pub use platform::PermissionPlatform;
pub use service::CapabilityGate;
