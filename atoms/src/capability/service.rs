use std::collections::HashMap;
use std::sync::Arc;

use super::model::{Capability, PermissionStatus};
use super::platform::PermissionPlatform;

/// Decides whether a capability needs a permission prompt before use
#[derive(Clone)]
pub struct CapabilityGate {
    platform: Arc<dyn PermissionPlatform>,
}

impl CapabilityGate {
    pub fn new(platform: Arc<dyn PermissionPlatform>) -> Self {
        Self { platform }
    }

    /// Query the platform's current grant state. Call this right before every
    /// privileged operation; grants can be revoked out-of-band.
    pub fn check_status(&self, capability: Capability) -> PermissionStatus {
        self.platform.check(capability)
    }

    /// Request the given capabilities. Never fails: a capability the platform
    /// did not answer for is reported as not granted.
    pub async fn request(&self, capabilities: &[Capability]) -> HashMap<Capability, bool> {
        if capabilities.is_empty() {
            return HashMap::new();
        }

        tracing::info!("🔐 Requesting capabilities: {:?}", capabilities);
        let answered = self.platform.request(capabilities).await;

        let grants: HashMap<Capability, bool> = capabilities
            .iter()
            .map(|cap| (*cap, answered.get(cap).copied().unwrap_or(false)))
            .collect();

        for (cap, granted) in &grants {
            if *granted {
                tracing::info!("✅ Capability granted: {}", cap);
            } else {
                tracing::warn!("⚠️ Capability not granted: {}", cap);
            }
        }

        grants
    }

    /// Check the capability and prompt for it only when it is not already granted
    pub async fn ensure(&self, capability: Capability) -> bool {
        if self.check_status(capability).is_granted() {
            return true;
        }

        self.request(&[capability])
            .await
            .get(&capability)
            .copied()
            .unwrap_or(false)
    }
}
