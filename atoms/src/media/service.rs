use chrono::{DateTime, Local};
use std::sync::Arc;

use super::model::{CaptureOutcome, ImageAsset, ImageRef, MediaError};
use super::platform::{CameraCapture, GalleryPicker, ImageStore};
use crate::capability::{Capability, CapabilityGate};

/// Build a capture file name: `JPEG_<yyyyMMdd_HHmmss>_<8 hex>.jpg`
pub fn capture_file_name(now: DateTime<Local>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("JPEG_{}_{}.jpg", now.format("%Y%m%d_%H%M%S"), &suffix[..8])
}

/// Obtains a photo from the camera or the gallery and reads it back as bytes
#[derive(Clone)]
pub struct ImageAcquirer {
    gate: CapabilityGate,
    camera: Arc<dyn CameraCapture>,
    gallery: Arc<dyn GalleryPicker>,
    store: Arc<dyn ImageStore>,
}

impl ImageAcquirer {
    pub fn new(
        gate: CapabilityGate,
        camera: Arc<dyn CameraCapture>,
        gallery: Arc<dyn GalleryPicker>,
        store: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            gate,
            camera,
            gallery,
            store,
        }
    }

    /// Capture a new photo. `Ok(None)` when the user cancelled.
    /// Does not prompt: the camera grant must already be in place.
    pub async fn capture_from_camera(&self) -> Result<Option<ImageAsset>, MediaError> {
        if !self.gate.check_status(Capability::Camera).is_granted() {
            tracing::warn!("⚠️ capture_from_camera: camera permission missing");
            return Err(MediaError::PermissionRequired(Capability::Camera));
        }

        let file_name = capture_file_name(Local::now());
        let target = self.store.create_target(&file_name).await.map_err(|e| {
            tracing::error!("❌ Error creating capture target {}: {}", file_name, e);
            e
        })?;

        tracing::info!("📷 Launching camera, target={}", target);

        match self.camera.capture(&target).await {
            Ok(CaptureOutcome::Completed) => {
                tracing::info!("✅ Photo captured: {}", target);
                Ok(Some(ImageAsset::new(target)))
            }
            Ok(CaptureOutcome::Cancelled) => {
                tracing::info!("Camera cancelled, target={}", target);
                self.discard_target(&target).await;
                Ok(None)
            }
            Err(e) => {
                tracing::error!("❌ Camera failed, target={}, error={}", target, e);
                self.discard_target(&target).await;
                Err(e)
            }
        }
    }

    async fn discard_target(&self, target: &ImageRef) {
        if let Err(e) = self.store.discard(target).await {
            tracing::warn!("⚠️ Could not discard capture target {}: {}", target, e);
        }
    }

    /// Pick an existing photo. `None` when the user backed out.
    pub async fn pick_from_gallery(&self) -> Option<ImageAsset> {
        tracing::info!("🖼️ Launching gallery picker");

        let picked = self.gallery.pick().await;
        match &picked {
            Some(reference) => tracing::info!("✅ Photo picked: {}", reference),
            None => tracing::info!("Gallery picker returned no result"),
        }

        picked.map(ImageAsset::new)
    }

    /// Read the image fully into memory
    pub async fn materialize(&self, asset: &ImageAsset) -> Result<Vec<u8>, MediaError> {
        if let Some(bytes) = asset.bytes() {
            return Ok(bytes.to_vec());
        }

        self.store.read(asset.reference()).await.map_err(|e| {
            tracing::error!("❌ materialize failed: reference={}, error={}", asset.reference(), e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{PermissionPlatform, PermissionStatus};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixedPermissions(PermissionStatus);

    #[async_trait]
    impl PermissionPlatform for FixedPermissions {
        fn check(&self, _capability: Capability) -> PermissionStatus {
            self.0
        }

        async fn request(&self, capabilities: &[Capability]) -> HashMap<Capability, bool> {
            capabilities.iter().map(|cap| (*cap, self.0.is_granted())).collect()
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    #[async_trait]
    impl ImageStore for MemoryStore {
        async fn create_target(&self, file_name: &str) -> Result<ImageRef, MediaError> {
            let path = format!("captures/{}", file_name);
            self.files.lock().unwrap().insert(path.clone(), Vec::new());
            Ok(ImageRef::new(path))
        }

        async fn read(&self, reference: &ImageRef) -> Result<Vec<u8>, MediaError> {
            self.files
                .lock()
                .unwrap()
                .get(reference.as_str())
                .cloned()
                .ok_or_else(|| MediaError::IoFailure(format!("{} not found", reference)))
        }

        async fn discard(&self, reference: &ImageRef) -> Result<(), MediaError> {
            self.files.lock().unwrap().remove(reference.as_str());
            Ok(())
        }
    }

    struct ScriptedCamera(Result<CaptureOutcome, MediaError>);

    #[async_trait]
    impl CameraCapture for ScriptedCamera {
        async fn capture(&self, _target: &ImageRef) -> Result<CaptureOutcome, MediaError> {
            self.0.clone()
        }
    }

    struct ScriptedGallery(Option<&'static str>);

    #[async_trait]
    impl GalleryPicker for ScriptedGallery {
        async fn pick(&self) -> Option<ImageRef> {
            self.0.map(ImageRef::new)
        }
    }

    fn acquirer_with_store(
        status: PermissionStatus,
        camera: Result<CaptureOutcome, MediaError>,
        gallery: Option<&'static str>,
    ) -> (ImageAcquirer, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let acquirer = ImageAcquirer::new(
            CapabilityGate::new(Arc::new(FixedPermissions(status))),
            Arc::new(ScriptedCamera(camera)),
            Arc::new(ScriptedGallery(gallery)),
            store.clone(),
        );
        (acquirer, store)
    }

    fn acquirer(status: PermissionStatus, camera: CaptureOutcome, gallery: Option<&'static str>) -> ImageAcquirer {
        acquirer_with_store(status, Ok(camera), gallery).0
    }

    #[test]
    fn capture_file_name_is_timestamped() {
        let now = Local.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let name = capture_file_name(now);

        assert!(name.starts_with("JPEG_20240101_100000_"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), "JPEG_20240101_100000_".len() + 8 + ".jpg".len());
        assert_ne!(name, capture_file_name(now));
    }

    #[tokio::test]
    async fn capture_requires_camera_grant() {
        let acquirer = acquirer(PermissionStatus::Denied, CaptureOutcome::Completed, None);

        let err = acquirer.capture_from_camera().await.unwrap_err();
        assert_eq!(err, MediaError::PermissionRequired(Capability::Camera));
    }

    #[tokio::test]
    async fn capture_binds_asset_to_target() {
        let acquirer = acquirer(PermissionStatus::Granted, CaptureOutcome::Completed, None);

        let asset = acquirer.capture_from_camera().await.unwrap().unwrap();
        assert!(asset.reference().as_str().starts_with("captures/JPEG_"));
        assert_eq!(asset.bytes(), None);
    }

    #[tokio::test]
    async fn cancelled_capture_yields_nothing() {
        let acquirer = acquirer(PermissionStatus::Granted, CaptureOutcome::Cancelled, None);

        assert_eq!(acquirer.capture_from_camera().await.unwrap(), None);
    }

    #[tokio::test]
    async fn cancelled_capture_discards_its_target() {
        let (acquirer, store) =
            acquirer_with_store(PermissionStatus::Granted, Ok(CaptureOutcome::Cancelled), None);

        for _ in 0..3 {
            assert_eq!(acquirer.capture_from_camera().await.unwrap(), None);
        }
        assert!(store.files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn camera_failure_is_reported_and_target_discarded() {
        let (acquirer, store) = acquirer_with_store(
            PermissionStatus::Granted,
            Err(MediaError::IoFailure("sensor busy".into())),
            None,
        );

        let err = acquirer.capture_from_camera().await.unwrap_err();
        assert_eq!(err, MediaError::IoFailure("sensor busy".into()));
        assert!(store.files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn gallery_needs_no_permission() {
        let acquirer = acquirer(PermissionStatus::Denied, CaptureOutcome::Cancelled, Some("content://media/42"));

        let asset = acquirer.pick_from_gallery().await.unwrap();
        assert_eq!(asset.reference().as_str(), "content://media/42");
    }

    #[tokio::test]
    async fn materialize_prefers_inline_bytes() {
        let acquirer = acquirer(PermissionStatus::Granted, CaptureOutcome::Cancelled, None);
        let asset = ImageAsset::with_bytes(ImageRef::new("inline"), vec![1, 2, 3]);

        assert_eq!(acquirer.materialize(&asset).await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn materialize_reports_unreadable_reference() {
        let acquirer = acquirer(PermissionStatus::Granted, CaptureOutcome::Cancelled, None);
        let asset = ImageAsset::new(ImageRef::new("content://gone"));

        let err = acquirer.materialize(&asset).await.unwrap_err();
        assert!(matches!(err, MediaError::IoFailure(_)));
    }
}
