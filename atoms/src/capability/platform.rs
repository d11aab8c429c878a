use async_trait::async_trait;
use std::collections::HashMap;

use super::model::{Capability, PermissionStatus};

/// Permission collaborator provided by the host platform
#[async_trait]
pub trait PermissionPlatform: Send + Sync {
    /// Side-effect free query of the current grant state
    fn check(&self, capability: Capability) -> PermissionStatus;

    /// Prompt the user (or answer immediately when the platform has already
    /// decided) and report one grant result per capability.
    async fn request(&self, capabilities: &[Capability]) -> HashMap<Capability, bool>;
}
