use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PERMISSION_DENIED_TEXT: &str = "Location permission denied";
pub const FIX_UNAVAILABLE_TEXT: &str = "Could not get location. Turn on GPS.";
pub const FIX_FAILED_TEXT: &str = "Location fetch failed.";
pub const NO_ADDRESS_TEXT: &str = "No address found for location.";
pub const GEOCODE_UNAVAILABLE_TEXT: &str = "Could not connect to Geocoder service.";

/// Last-known device position. Only lives long enough to be geocoded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
}

/// States of a single resolution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    Idle,
    CheckingPermission,
    PermissionDenied,
    FetchingFix,
    FixUnavailable,
    Geocoding,
    NoAddressFound,
    AddressReady,
    GeocodeUnavailable,
}

/// Terminal outcome of a resolution attempt.
///
/// Every variant carries a usable address text; none of them is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressResolution {
    Resolved(String),
    PermissionDenied,
    FixUnavailable,
    FixFailed,
    NoAddressFound,
    GeocodeUnavailable,
}

impl AddressResolution {
    pub fn address_text(&self) -> &str {
        match self {
            AddressResolution::Resolved(line) => line,
            AddressResolution::PermissionDenied => PERMISSION_DENIED_TEXT,
            AddressResolution::FixUnavailable => FIX_UNAVAILABLE_TEXT,
            AddressResolution::FixFailed => FIX_FAILED_TEXT,
            AddressResolution::NoAddressFound => NO_ADDRESS_TEXT,
            AddressResolution::GeocodeUnavailable => GEOCODE_UNAVAILABLE_TEXT,
        }
    }

    pub fn terminal_state(&self) -> ResolverState {
        match self {
            AddressResolution::Resolved(_) => ResolverState::AddressReady,
            AddressResolution::PermissionDenied => ResolverState::PermissionDenied,
            AddressResolution::FixUnavailable | AddressResolution::FixFailed => {
                ResolverState::FixUnavailable
            }
            AddressResolution::NoAddressFound => ResolverState::NoAddressFound,
            AddressResolution::GeocodeUnavailable => ResolverState::GeocodeUnavailable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("position provider failed: {0}")]
pub struct PositionError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("geocoding service unavailable: {0}")]
pub struct GeocodeError(pub String);
