//! Image acquisition and normalization.
//!
//! Every acquired image is validated (size, then format), decoded, and held
//! as PNG bytes. The PNG is both what the classifier receives and what the
//! preview renders from, via a `data:` URL.

use std::io::Cursor;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use dram_client::ImageUpload;
use image::{DynamicImage, ImageFormat, ImageOutputFormat, RgbaImage};
use tokio::io::AsyncReadExt;

use crate::error::{FlowResult, ValidationError};

/// Where an image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// File picker
    File,
    /// Drag-and-drop
    Drop,
    /// Camera capture
    Camera,
}

impl ImageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::File => "file",
            ImageSource::Drop => "drop",
            ImageSource::Camera => "camera",
        }
    }
}

/// Raw bytes of a user-provided file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, refusing anything over `max_bytes`.
    ///
    /// The size is checked from metadata before any content is read, and the
    /// read itself stops one byte past the limit in case the file grows.
    pub async fn read(path: impl AsRef<Path>, max_bytes: usize) -> FlowResult<Self> {
        let path = path.as_ref();

        let size = tokio::fs::metadata(path).await?.len();
        if size > max_bytes as u64 {
            return Err(too_large(size, max_bytes).into());
        }

        let file = tokio::fs::File::open(path).await?;
        let mut bytes = Vec::with_capacity(size as usize);
        file.take(max_bytes as u64 + 1).read_to_end(&mut bytes).await?;
        if bytes.len() > max_bytes {
            return Err(too_large(bytes.len() as u64, max_bytes).into());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The image currently held by the flow.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquiredImage {
    source: ImageSource,
    file_name: Option<String>,
    byte_size: usize,
    width: u32,
    height: u32,
    png: Vec<u8>,
    acquired_at: DateTime<Utc>,
}

impl AcquiredImage {
    /// Validate and normalize a file.
    ///
    /// The size limit is checked before any decoding work.
    pub fn from_file(
        file: &ImageFile,
        source: ImageSource,
        max_bytes: usize,
    ) -> Result<Self, ValidationError> {
        if file.len() > max_bytes {
            return Err(ValidationError::TooLarge {
                size: file.len(),
                limit: max_bytes,
            });
        }
        if file.is_empty() {
            return Err(ValidationError::Unreadable("empty file".into()));
        }

        let format = image::guess_format(&file.bytes)
            .map_err(|_| ValidationError::UnsupportedFormat("unrecognized".into()))?;
        if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP) {
            return Err(ValidationError::UnsupportedFormat(format!("{:?}", format)));
        }

        let decoded = image::load_from_memory_with_format(&file.bytes, format)
            .map_err(|e| ValidationError::Unreadable(e.to_string()))?;

        let png = if format == ImageFormat::Png {
            file.bytes.clone()
        } else {
            encode_png(&decoded)?
        };

        Ok(Self {
            source,
            file_name: Some(file.name.clone()).filter(|n| !n.is_empty()),
            byte_size: file.len(),
            width: decoded.width(),
            height: decoded.height(),
            png,
            acquired_at: Utc::now(),
        })
    }

    /// Freeze a camera frame. The encoded PNG is held to the same limit as
    /// files.
    pub fn from_frame(frame: RgbaImage, max_bytes: usize) -> Result<Self, ValidationError> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(ValidationError::Unreadable("empty camera frame".into()));
        }

        let png = encode_png(&DynamicImage::ImageRgba8(frame))?;
        if png.len() > max_bytes {
            return Err(ValidationError::TooLarge {
                size: png.len(),
                limit: max_bytes,
            });
        }
        Ok(Self {
            source: ImageSource::Camera,
            file_name: None,
            byte_size: png.len(),
            width,
            height,
            png,
            acquired_at: Utc::now(),
        })
    }

    pub fn source(&self) -> ImageSource {
        self.source
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Size of the image as acquired (the original file, or the captured PNG).
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    /// `data:image/png;base64,...` URL for previews.
    pub fn preview_data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }

    /// Package for the classifier.
    pub fn to_upload(&self) -> ImageUpload {
        ImageUpload::png(self.png.clone())
    }
}

fn too_large(size: u64, limit: usize) -> ValidationError {
    ValidationError::TooLarge {
        size: usize::try_from(size).unwrap_or(usize::MAX),
        limit,
    }
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, ValidationError> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageOutputFormat::Png)
        .map_err(|e| ValidationError::Unreadable(e.to_string()))?;
    Ok(cursor.into_inner())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::FlowError;

    const LIMIT: usize = 5 * 1024 * 1024;

    #[test]
    fn test_png_file_is_kept_verbatim() {
        let bytes = png(16, 8);
        let file = ImageFile::new("bottle.png", bytes.clone());
        let image = AcquiredImage::from_file(&file, ImageSource::File, LIMIT).unwrap();

        assert_eq!(image.dimensions(), (16, 8));
        assert_eq!(image.byte_size(), bytes.len());
        assert_eq!(image.png_bytes(), bytes.as_slice());
        assert_eq!(image.file_name(), Some("bottle.png"));
        assert!(image.preview_data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_jpeg_is_normalized_to_png() {
        let jpeg = encode(&noise_frame(10, 10), ImageOutputFormat::Jpeg(80));
        let file = ImageFile::new("bottle.jpg", jpeg.clone());
        let image = AcquiredImage::from_file(&file, ImageSource::Drop, LIMIT).unwrap();

        assert_eq!(image.source(), ImageSource::Drop);
        assert_eq!(image.byte_size(), jpeg.len());
        assert_eq!(
            image::guess_format(image.png_bytes()).unwrap(),
            ImageFormat::Png
        );
        let upload = image.to_upload();
        assert_eq!(upload.mime, "image/png");
        assert_eq!(upload.file_name, "upload.png");
    }

    #[test]
    fn test_size_limit_checked_before_decoding() {
        let file = ImageFile::new("huge.bin", vec![0u8; LIMIT + 1]);
        let err = AcquiredImage::from_file(&file, ImageSource::File, LIMIT).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLarge {
                size: LIMIT + 1,
                limit: LIMIT
            }
        );
    }

    #[test]
    fn test_limit_is_inclusive() {
        let bytes = png(4, 4);
        let file = ImageFile::new("exact.png", bytes.clone());
        assert!(AcquiredImage::from_file(&file, ImageSource::File, bytes.len()).is_ok());
    }

    #[test]
    fn test_rejects_unsupported_and_garbage() {
        let text = ImageFile::new("notes.txt", b"just some text".to_vec());
        assert!(matches!(
            AcquiredImage::from_file(&text, ImageSource::File, LIMIT),
            Err(ValidationError::UnsupportedFormat(_))
        ));

        let gif = ImageFile::new("anim.gif", b"GIF89a\x01\x00\x01\x00".to_vec());
        assert!(matches!(
            AcquiredImage::from_file(&gif, ImageSource::File, LIMIT),
            Err(ValidationError::UnsupportedFormat(_))
        ));

        let truncated = ImageFile::new("broken.png", png(8, 8)[..20].to_vec());
        assert!(matches!(
            AcquiredImage::from_file(&truncated, ImageSource::File, LIMIT),
            Err(ValidationError::Unreadable(_))
        ));

        let empty = ImageFile::new("empty.png", Vec::new());
        assert!(matches!(
            AcquiredImage::from_file(&empty, ImageSource::File, LIMIT),
            Err(ValidationError::Unreadable(_))
        ));
    }

    #[test]
    fn test_from_frame() {
        let image = AcquiredImage::from_frame(noise_frame(6, 4), LIMIT).unwrap();
        assert_eq!(image.source(), ImageSource::Camera);
        assert_eq!(image.dimensions(), (6, 4));
        assert_eq!(image.byte_size(), image.png_bytes().len());
        assert!(image.file_name().is_none());

        assert!(AcquiredImage::from_frame(RgbaImage::new(0, 0), LIMIT).is_err());
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let err = AcquiredImage::from_frame(noise_frame(32, 32), 256).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { limit: 256, size } if size > 256));
    }

    #[tokio::test]
    async fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        tokio::fs::write(&path, png(3, 3)).await.unwrap();

        let file = ImageFile::read(&path, LIMIT).await.unwrap();
        assert_eq!(file.name, "photo.png");
        assert!(!file.is_empty());
    }

    #[tokio::test]
    async fn test_read_refuses_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        let file = std::fs::File::create(&path).unwrap();
        // sparse, so nothing is actually written
        file.set_len(64 * 1024 * 1024).unwrap();

        let err = ImageFile::read(&path, LIMIT).await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::TooLarge { size, limit: LIMIT })
                if size == 64 * 1024 * 1024
        ));
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageFile::read(dir.path().join("nope.png"), LIMIT)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Io(_)));
    }
}
