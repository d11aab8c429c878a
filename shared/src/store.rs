use async_trait::async_trait;
use civic_atoms::media::{ImageRef, ImageStore, MediaError};
use std::path::PathBuf;

/// Image store backed by a local directory (the app-private capture folder)
#[derive(Debug, Clone)]
pub struct FsImageStore {
    capture_dir: PathBuf,
}

impl FsImageStore {
    pub fn new(capture_dir: impl Into<PathBuf>) -> Self {
        Self {
            capture_dir: capture_dir.into(),
        }
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn create_target(&self, file_name: &str) -> Result<ImageRef, MediaError> {
        tokio::fs::create_dir_all(&self.capture_dir)
            .await
            .map_err(|e| MediaError::IoFailure(format!("{}: {}", self.capture_dir.display(), e)))?;

        let path = self.capture_dir.join(file_name);
        tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| MediaError::IoFailure(format!("{}: {}", path.display(), e)))?;

        Ok(ImageRef::new(path.to_string_lossy().into_owned()))
    }

    async fn read(&self, reference: &ImageRef) -> Result<Vec<u8>, MediaError> {
        tokio::fs::read(reference.as_str())
            .await
            .map_err(|e| MediaError::IoFailure(format!("{}: {}", reference, e)))
    }

    async fn discard(&self, reference: &ImageRef) -> Result<(), MediaError> {
        match tokio::fs::remove_file(reference.as_str()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediaError::IoFailure(format!("{}: {}", reference, e))),
        }
    }
}
