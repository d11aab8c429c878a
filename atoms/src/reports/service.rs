use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::model::{
    AssembleError, ReportDraft, ReportPayload, ValidationError, UNRESOLVED_ADDRESS_TEXT,
};
use crate::media::{ImageAcquirer, ImageAsset};

/// Fail-fast validation: title, then description, then image
pub fn validate(draft: &ReportDraft) -> Result<&ImageAsset, ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if draft.description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    draft.image.as_ref().ok_or(ValidationError::MissingImage)
}

/// Validates a draft and packages it as a [`ReportPayload`]
#[derive(Clone)]
pub struct ReportAssembler {
    acquirer: ImageAcquirer,
}

impl ReportAssembler {
    pub fn new(acquirer: ImageAcquirer) -> Self {
        Self { acquirer }
    }

    /// Same draft in, same payload out. Nothing partial is ever returned.
    pub async fn assemble(&self, draft: &ReportDraft) -> Result<ReportPayload, AssembleError> {
        let image = validate(draft).map_err(|e| {
            tracing::warn!("⚠️ Report rejected: {}", e);
            e
        })?;

        let bytes = self
            .acquirer
            .materialize(image)
            .await
            .map_err(AssembleError::ImageEncodingFailed)?;
        let image_data = STANDARD.encode(&bytes);

        let address = match draft.address.trim() {
            "" => UNRESOLVED_ADDRESS_TEXT.to_string(),
            text => text.to_string(),
        };

        tracing::info!(
            "📦 Report assembled: title={}, priority={}, image_bytes={}",
            draft.title.trim(),
            draft.priority,
            bytes.len()
        );

        Ok(ReportPayload::new(
            draft.title.trim().to_string(),
            draft.description.trim().to_string(),
            address,
            draft.timestamp.trim().to_string(),
            draft.priority,
            image_data,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Capability, CapabilityGate, PermissionPlatform, PermissionStatus};
    use crate::media::{
        CameraCapture, CaptureOutcome, GalleryPicker, ImageRef, ImageStore, MediaError,
    };
    use crate::reports::Priority;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct NoPermissions;

    #[async_trait]
    impl PermissionPlatform for NoPermissions {
        fn check(&self, _capability: Capability) -> PermissionStatus {
            PermissionStatus::Denied
        }

        async fn request(&self, _capabilities: &[Capability]) -> HashMap<Capability, bool> {
            HashMap::new()
        }
    }

    struct NoCamera;

    #[async_trait]
    impl CameraCapture for NoCamera {
        async fn capture(&self, _target: &ImageRef) -> Result<CaptureOutcome, MediaError> {
            Ok(CaptureOutcome::Cancelled)
        }
    }

    struct NoGallery;

    #[async_trait]
    impl GalleryPicker for NoGallery {
        async fn pick(&self) -> Option<ImageRef> {
            None
        }
    }

    /// Serves `photo.jpg`; everything else is unreadable
    struct OnePhoto(Vec<u8>);

    #[async_trait]
    impl ImageStore for OnePhoto {
        async fn create_target(&self, file_name: &str) -> Result<ImageRef, MediaError> {
            Ok(ImageRef::new(file_name))
        }

        async fn read(&self, reference: &ImageRef) -> Result<Vec<u8>, MediaError> {
            match reference.as_str() {
                "photo.jpg" => Ok(self.0.clone()),
                other => Err(MediaError::IoFailure(format!("{} was deleted", other))),
            }
        }

        async fn discard(&self, _reference: &ImageRef) -> Result<(), MediaError> {
            Ok(())
        }
    }

    fn assembler(photo: Vec<u8>) -> ReportAssembler {
        ReportAssembler::new(ImageAcquirer::new(
            CapabilityGate::new(Arc::new(NoPermissions)),
            Arc::new(NoCamera),
            Arc::new(NoGallery),
            Arc::new(OnePhoto(photo)),
        ))
    }

    fn pothole_draft() -> ReportDraft {
        let mut draft = ReportDraft::new("2024-01-01 10:00:00");
        draft.title = "Pothole".into();
        draft.description = "Large pothole on Main St".into();
        draft.address = "Location permission denied".into();
        draft.image = Some(ImageAsset::new(ImageRef::new("photo.jpg")));
        draft
    }

    #[test]
    fn priority_defaults_to_first_variant() {
        assert_eq!(Priority::default(), Priority::ALL[0]);
        assert_eq!("LOW".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn new_draft_always_has_an_address() {
        let draft = ReportDraft::new("2024-01-01 10:00:00");
        assert_eq!(draft.address, UNRESOLVED_ADDRESS_TEXT);
        assert_eq!(draft.priority, Priority::High);
    }

    #[test]
    fn validation_reports_first_violation() {
        let mut draft = ReportDraft::new("t");
        assert_eq!(validate(&draft), Err(ValidationError::MissingTitle));

        draft.title = "  Pothole ".into();
        draft.description = " \t".into();
        assert_eq!(validate(&draft), Err(ValidationError::MissingDescription));

        draft.description = "Deep".into();
        assert_eq!(validate(&draft), Err(ValidationError::MissingImage));
    }

    #[tokio::test]
    async fn assembles_pothole_report() {
        let payload = assembler(vec![0xFF; 10]).assemble(&pothole_draft()).await.unwrap();

        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Pothole",
                "description": "Large pothole on Main St",
                "address": "Location permission denied",
                "timestamp": "2024-01-01 10:00:00",
                "priority": "High",
                "imageData": "/////////////w==",
            })
        );
    }

    #[tokio::test]
    async fn image_data_round_trips() {
        let photo: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let payload = assembler(photo.clone()).assemble(&pothole_draft()).await.unwrap();

        assert_eq!(STANDARD.decode(payload.image_data()).unwrap(), photo);
        assert!(!payload.image_data().contains('\n'));
    }

    #[tokio::test]
    async fn assembling_twice_is_idempotent() {
        let assembler = assembler(vec![7, 8, 9]);
        let draft = pothole_draft();

        let first = assembler.assemble(&draft).await.unwrap();
        let second = assembler.assemble(&draft).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[tokio::test]
    async fn missing_title_produces_no_payload() {
        let mut draft = pothole_draft();
        draft.title = "   ".into();

        let err = assembler(vec![1]).assemble(&draft).await.unwrap_err();
        assert_eq!(err, AssembleError::Validation(ValidationError::MissingTitle));
    }

    #[tokio::test]
    async fn unreadable_image_is_an_encoding_failure() {
        let mut draft = pothole_draft();
        draft.image = Some(ImageAsset::new(ImageRef::new("content://revoked")));

        let err = assembler(vec![1]).assemble(&draft).await.unwrap_err();
        assert!(matches!(err, AssembleError::ImageEncodingFailed(MediaError::IoFailure(_))));
    }

    #[tokio::test]
    async fn fields_are_trimmed_and_blank_address_falls_back() {
        let mut draft = pothole_draft();
        draft.title = "  Pothole  ".into();
        draft.address = "  ".into();
        draft.priority = Priority::Low;

        let payload = assembler(vec![1]).assemble(&draft).await.unwrap();
        assert_eq!(payload.title(), "Pothole");
        assert_eq!(payload.address(), UNRESOLVED_ADDRESS_TEXT);
        assert_eq!(payload.priority(), "Low");
    }
}
