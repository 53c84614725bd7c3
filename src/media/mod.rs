//! Stored files: recipe images live under the media root and are served
//! back at the configured URL prefix.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader};
use thiserror::Error;
use uuid::Uuid;

use crate::config::MediaConfig;

const RECIPE_IMAGE_DIR: &str = "uploads/recipe";

/// Width times height accepted when no cap is configured
pub const DEFAULT_MAX_IMAGE_PIXELS: u64 = 40_000_000;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("No file was submitted.")]
    Missing,

    #[error("The submitted file is empty.")]
    EmptyUpload,

    #[error("Ensure this file is no larger than {max_bytes} bytes.")]
    TooLarge { max_bytes: usize },

    #[error("Ensure this image has no more than {max_pixels} pixels.")]
    TooManyPixels { max_pixels: u64 },

    #[error("Upload a valid image. The file you uploaded was either not an image or a corrupted image.")]
    NotAnImage,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    url_prefix: String,
    max_bytes: usize,
    max_pixels: u64,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>, max_bytes: usize) -> Self {
        let url_prefix = url_prefix.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            url_prefix,
            max_bytes,
            max_pixels: DEFAULT_MAX_IMAGE_PIXELS,
        }
    }

    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(config.root.clone(), config.url_prefix.clone(), config.max_image_size_bytes)
            .with_max_pixels(config.max_image_pixels)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL prefix without a trailing slash, e.g. `/media`
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Detect the format from content and fully decode it. Returns the
    /// file extension to store the image under.
    ///
    /// Dimensions are read from the header and checked against the pixel
    /// cap before any pixel data is decoded.
    pub fn inspect_image(&self, bytes: &[u8]) -> Result<&'static str, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::EmptyUpload);
        }
        if bytes.len() > self.max_bytes {
            return Err(MediaError::TooLarge { max_bytes: self.max_bytes });
        }

        let format = image::guess_format(bytes).map_err(|_| MediaError::NotAnImage)?;
        let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
            .into_dimensions()
            .map_err(|_| MediaError::NotAnImage)?;
        if u64::from(width) * u64::from(height) > self.max_pixels {
            return Err(MediaError::TooManyPixels { max_pixels: self.max_pixels });
        }

        ImageReader::with_format(Cursor::new(bytes), format)
            .decode()
            .map_err(|_| MediaError::NotAnImage)?;

        Ok(extension_for(format))
    }

    /// Validate and write a recipe image under a fresh name, returning its
    /// path relative to the media root. Decoding runs on the blocking pool.
    pub async fn save_recipe_image(&self, bytes: Vec<u8>) -> Result<String, MediaError> {
        let store = self.clone();
        let (extension, bytes) = tokio::task::spawn_blocking(move || {
            store.inspect_image(&bytes).map(|extension| (extension, bytes))
        })
        .await
        .map_err(std::io::Error::other)??;

        let relative = format!("{}/{}.{}", RECIPE_IMAGE_DIR, Uuid::new_v4(), extension);

        let path = self.root.join(&relative);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!("Stored recipe image at {}", path.display());
        Ok(relative)
    }

    pub fn url(&self, relative: &str) -> String {
        format!("{}/{}", self.url_prefix, relative.trim_start_matches('/'))
    }

    /// Delete a stored file; a file that is already gone is not an error
    pub async fn remove(&self, relative: &str) -> Result<(), MediaError> {
        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort removal for cleanup paths
    pub async fn discard(&self, relative: &str) {
        if let Err(e) = self.remove(relative).await {
            tracing::warn!("Failed to remove media file {}: {}", relative, e);
        }
    }
}

fn extension_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpg",
        other => other.extensions_str().first().copied().unwrap_or("img"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb};

    fn jpeg_bytes() -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(10, 10, Rgb([200, 40, 40]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    fn store(dir: &Path) -> MediaStore {
        MediaStore::new(dir, "/media/", 1024 * 1024)
    }

    #[test]
    fn rejects_non_image_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let err = store(dir.path()).inspect_image(b"notanimage").unwrap_err();
        assert!(matches!(err, MediaError::NotAnImage));
    }

    #[test]
    fn rejects_truncated_image() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = jpeg_bytes();
        let err = store(dir.path()).inspect_image(&bytes[..bytes.len() / 3]).unwrap_err();
        assert!(matches!(err, MediaError::NotAnImage));
    }

    #[test]
    fn rejects_oversized_upload() {
        let dir = tempfile::tempdir().unwrap();
        let small = MediaStore::new(dir.path(), "/media", 16);
        assert!(matches!(small.inspect_image(&jpeg_bytes()), Err(MediaError::TooLarge { max_bytes: 16 })));
    }

    #[test]
    fn rejects_images_over_the_pixel_cap() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = jpeg_bytes();
        let capped = store(dir.path()).with_max_pixels(99);
        assert!(matches!(capped.inspect_image(&bytes), Err(MediaError::TooManyPixels { max_pixels: 99 })));
        assert_eq!(store(dir.path()).with_max_pixels(100).inspect_image(&bytes).unwrap(), "jpg");
    }

    #[test]
    fn small_payload_with_huge_dimensions_is_rejected_before_decoding() {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::new(4000, 4000);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        let bytes = out.into_inner();

        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).with_max_pixels(1_000_000);
        assert!(bytes.len() < 1024 * 1024);
        assert!(matches!(store.inspect_image(&bytes), Err(MediaError::TooManyPixels { .. })));
    }

    #[tokio::test]
    async fn saves_and_removes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let relative = store.save_recipe_image(jpeg_bytes()).await.unwrap();
        assert!(relative.starts_with("uploads/recipe/"));
        assert!(relative.ends_with(".jpg"));
        assert!(dir.path().join(&relative).exists());
        assert_eq!(store.url(&relative), format!("/media/{}", relative));

        store.remove(&relative).await.unwrap();
        assert!(!dir.path().join(&relative).exists());
        store.remove(&relative).await.unwrap();
    }
}
