// Static collaborators for running a workflow outside a device: grants,
// position and address come from configuration, photos from local files.

use async_trait::async_trait;
use civic_atoms::capability::{Capability, PermissionPlatform, PermissionStatus};
use civic_atoms::location::{GeocodeError, LocationFix, PositionError, PositionProvider, ReverseGeocoder};
use civic_atoms::media::{CameraCapture, CaptureOutcome, GalleryPicker, ImageRef, MediaError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

/// Answers every prompt from a fixed table and remembers the answer
#[derive(Debug)]
pub struct StaticPermissions {
    status: RwLock<HashMap<Capability, PermissionStatus>>,
    answers: HashMap<Capability, bool>,
}

impl StaticPermissions {
    pub fn new(answers: HashMap<Capability, bool>) -> Self {
        Self {
            status: RwLock::new(HashMap::new()),
            answers,
        }
    }
}

#[async_trait]
impl PermissionPlatform for StaticPermissions {
    fn check(&self, capability: Capability) -> PermissionStatus {
        let status = self.status.read().unwrap_or_else(|e| e.into_inner());
        status.get(&capability).copied().unwrap_or(PermissionStatus::Unknown)
    }

    async fn request(&self, capabilities: &[Capability]) -> HashMap<Capability, bool> {
        let mut status = self.status.write().unwrap_or_else(|e| e.into_inner());
        capabilities
            .iter()
            .map(|cap| {
                let granted = self.answers.get(cap).copied().unwrap_or(false);
                let next = if granted {
                    PermissionStatus::Granted
                } else {
                    PermissionStatus::Denied
                };
                status.insert(*cap, next);
                (*cap, granted)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Option<LocationFix>);

#[async_trait]
impl PositionProvider for FixedPosition {
    async fn last_known(&self) -> Result<Option<LocationFix>, PositionError> {
        Ok(self.0)
    }
}

/// Geocoder with a canned answer. `None` behaves like an unreachable service.
#[derive(Debug, Clone)]
pub struct StaticGeocoder(pub Option<Vec<String>>);

#[async_trait]
impl ReverseGeocoder for StaticGeocoder {
    async fn reverse(&self, fix: LocationFix, max_results: usize) -> Result<Vec<String>, GeocodeError> {
        match &self.0 {
            Some(lines) => Ok(lines.iter().take(max_results).cloned().collect()),
            None => Err(GeocodeError(format!(
                "no geocoder configured for {},{}",
                fix.latitude, fix.longitude
            ))),
        }
    }
}

/// "Camera" that copies an existing file into the capture target.
/// No source means the user backed out; a failed copy is an error.
#[derive(Debug, Clone)]
pub struct FileCamera {
    source: Option<PathBuf>,
}

impl FileCamera {
    pub fn new(source: Option<PathBuf>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl CameraCapture for FileCamera {
    async fn capture(&self, target: &ImageRef) -> Result<CaptureOutcome, MediaError> {
        let Some(source) = &self.source else {
            return Ok(CaptureOutcome::Cancelled);
        };

        tokio::fs::copy(source, target.as_str()).await.map_err(|e| {
            tracing::error!("❌ Copying {} into {} failed: {}", source.display(), target, e);
            MediaError::IoFailure(format!("{}: {}", source.display(), e))
        })?;
        Ok(CaptureOutcome::Completed)
    }
}

/// "Gallery" that returns a preselected file
#[derive(Debug, Clone)]
pub struct FileGallery {
    selection: Option<PathBuf>,
}

impl FileGallery {
    pub fn new(selection: Option<PathBuf>) -> Self {
        Self { selection }
    }
}

#[async_trait]
impl GalleryPicker for FileGallery {
    async fn pick(&self) -> Option<ImageRef> {
        self.selection
            .as_ref()
            .map(|path| ImageRef::new(path.to_string_lossy().into_owned()))
    }
}
