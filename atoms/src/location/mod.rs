// Re-export model types and service functions
pub mod model;
pub mod platform;
pub mod service;

pub use model::{
    AddressResolution, GeocodeError, LocationFix, PositionError, ResolverState,
    FIX_FAILED_TEXT, FIX_UNAVAILABLE_TEXT, GEOCODE_UNAVAILABLE_TEXT, NO_ADDRESS_TEXT,
    PERMISSION_DENIED_TEXT,
};
pub use platform::{PositionProvider, ReverseGeocoder};
pub use service::LocationResolver;
