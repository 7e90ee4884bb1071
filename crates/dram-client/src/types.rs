//! Classifier request/response types.

use serde::Deserialize;

/// Multipart field the service reads the image from.
pub const IMAGE_FIELD: &str = "image";

/// Filename sent with every upload. The service ignores it.
pub const UPLOAD_FILE_NAME: &str = "upload.png";

pub const PNG_MIME: &str = "image/png";

/// A single image ready to be posted to the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// Filename for the multipart part
    pub file_name: String,
    /// MIME type of `bytes`
    pub mime: String,
}

impl ImageUpload {
    /// A PNG upload with the default filename.
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: UPLOAD_FILE_NAME.to_string(),
            mime: PNG_MIME.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Error body sent by the service on 4xx/5xx.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
