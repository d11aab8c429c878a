use async_trait::async_trait;

use super::model::{GeocodeError, LocationFix, PositionError};

/// Position collaborator: a cached last-known fix, not a fresh acquisition
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn last_known(&self) -> Result<Option<LocationFix>, PositionError>;
}

/// Reverse-geocoding collaborator. Returns the first address line of up to
/// `max_results` candidates, best match first.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, fix: LocationFix, max_results: usize) -> Result<Vec<String>, GeocodeError>;
}
