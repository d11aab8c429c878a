// Re-export model types and service functions
pub mod model;
pub mod platform;
pub mod service;

pub use model::{CaptureOutcome, ImageAsset, ImageRef, MediaError};
pub use platform::{CameraCapture, GalleryPicker, ImageStore};
pub use service::{capture_file_name, ImageAcquirer};
