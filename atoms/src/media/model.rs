use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::capability::Capability;

/// Opaque reference (path or URI) to image data held by the platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The photo attached to a report.
///
/// `bytes` is only filled when the platform handed over the data directly;
/// otherwise the reference is read on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    reference: ImageRef,
    bytes: Option<Vec<u8>>,
}

impl ImageAsset {
    pub fn new(reference: ImageRef) -> Self {
        Self {
            reference,
            bytes: None,
        }
    }

    pub fn with_bytes(reference: ImageRef, bytes: Vec<u8>) -> Self {
        Self {
            reference,
            bytes: Some(bytes),
        }
    }

    pub fn reference(&self) -> &ImageRef {
        &self.reference
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }
}

/// Result of handing control to the external capture collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("{0} permission is required")]
    PermissionRequired(Capability),

    #[error("image could not be read: {0}")]
    IoFailure(String),
}
