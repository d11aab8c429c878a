use async_trait::async_trait;

use super::model::{CaptureOutcome, ImageRef, MediaError};

/// App-private image storage: hands out capture destinations and reads
/// referenced images back into memory.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn create_target(&self, file_name: &str) -> Result<ImageRef, MediaError>;

    async fn read(&self, reference: &ImageRef) -> Result<Vec<u8>, MediaError>;

    /// Remove a capture target that never received a photo
    async fn discard(&self, reference: &ImageRef) -> Result<(), MediaError>;
}

/// Camera collaborator. Writes the photo to `target` on completion;
/// an error means the camera could not deliver, not that the user backed out.
#[async_trait]
pub trait CameraCapture: Send + Sync {
    async fn capture(&self, target: &ImageRef) -> Result<CaptureOutcome, MediaError>;
}

/// Gallery collaborator. `None` means the user backed out.
#[async_trait]
pub trait GalleryPicker: Send + Sync {
    async fn pick(&self) -> Option<ImageRef>;
}
