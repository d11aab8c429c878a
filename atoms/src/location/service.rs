use std::sync::Arc;

use super::model::{AddressResolution, LocationFix, ResolverState};
use super::platform::{PositionProvider, ReverseGeocoder};
use crate::capability::{Capability, CapabilityGate};

/// Turns the device's last-known position into an address line.
///
/// Each call to [`LocationResolver::resolve`] is an independent attempt that
/// starts from `Idle`; failures fall back to a placeholder text.
#[derive(Clone)]
pub struct LocationResolver {
    gate: CapabilityGate,
    position: Arc<dyn PositionProvider>,
    geocoder: Arc<dyn ReverseGeocoder>,
    max_results: usize,
}

impl LocationResolver {
    pub fn new(
        gate: CapabilityGate,
        position: Arc<dyn PositionProvider>,
        geocoder: Arc<dyn ReverseGeocoder>,
        max_results: usize,
    ) -> Self {
        Self {
            gate,
            position,
            geocoder,
            max_results: max_results.max(1),
        }
    }

    pub async fn resolve(&self) -> AddressResolution {
        let mut state = ResolverState::Idle;
        let outcome = self.run(&mut state).await;

        match &outcome {
            AddressResolution::Resolved(line) => tracing::info!("📍 Address resolved: {}", line),
            other => tracing::warn!(
                "⚠️ Address resolution ended in {:?}: {}",
                other.terminal_state(),
                other.address_text()
            ),
        }

        outcome
    }

    async fn run(&self, state: &mut ResolverState) -> AddressResolution {
        transition(state, ResolverState::CheckingPermission);
        if !self.gate.ensure(Capability::Location).await {
            transition(state, ResolverState::PermissionDenied);
            return AddressResolution::PermissionDenied;
        }

        // The grant may have been revoked since the prompt
        if !self.gate.check_status(Capability::Location).is_granted() {
            transition(state, ResolverState::PermissionDenied);
            return AddressResolution::PermissionDenied;
        }

        transition(state, ResolverState::FetchingFix);
        let fix = match self.position.last_known().await {
            Ok(Some(fix)) => fix,
            Ok(None) => {
                transition(state, ResolverState::FixUnavailable);
                return AddressResolution::FixUnavailable;
            }
            Err(e) => {
                tracing::error!("❌ Failed to get location: {}", e);
                transition(state, ResolverState::FixUnavailable);
                return AddressResolution::FixFailed;
            }
        };

        transition(state, ResolverState::Geocoding);
        let outcome = self.geocode(fix).await;
        transition(state, outcome.terminal_state());
        outcome
    }

    async fn geocode(&self, fix: LocationFix) -> AddressResolution {
        match self.geocoder.reverse(fix, self.max_results).await {
            Ok(lines) => lines
                .into_iter()
                .map(|line| line.trim().to_string())
                .find(|line| !line.is_empty())
                .map(AddressResolution::Resolved)
                .unwrap_or(AddressResolution::NoAddressFound),
            Err(e) => {
                tracing::error!(
                    "❌ Geocoder failed: lat={}, lon={}, error={}",
                    fix.latitude,
                    fix.longitude,
                    e
                );
                AddressResolution::GeocodeUnavailable
            }
        }
    }
}

fn transition(state: &mut ResolverState, next: ResolverState) {
    tracing::debug!("location resolver: {:?} -> {:?}", state, next);
    *state = next;
}
