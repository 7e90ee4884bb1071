//! Flow error types.

use dram_client::ClientError;
use dram_models::SubmissionState;
use thiserror::Error;

pub type FlowResult<T> = Result<T, FlowError>;

/// Message shown after any failed submission.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Failed to analyze image. Try again.";

/// Message shown when the camera cannot be used.
pub const CAMERA_UNAVAILABLE_MESSAGE: &str = "Unable to access camera.";

/// Message shown when a submit is refused because an earlier request has
/// not come back yet.
pub const ANALYSIS_PENDING_MESSAGE: &str = "Previous analysis still running. Try again shortly.";

/// An image was rejected before it became the active image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Image is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Unreadable image: {0}")]
    Unreadable(String),
}

/// The camera could not be opened or read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("No camera available")]
    Unavailable,

    #[error("Camera session is closed")]
    Closed,

    #[error("Camera error: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Submission failed: {0}")]
    Submission(#[from] ClientError),

    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: SubmissionState,
        action: &'static str,
    },

    #[error("Request {0} is still in flight")]
    RequestPending(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlowError {
    pub fn invalid_transition(from: SubmissionState, action: &'static str) -> Self {
        Self::InvalidTransition { from, action }
    }

    /// Text for the user. Diagnostics stay in `Display` and the logs.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Validation(ValidationError::TooLarge { limit, .. }) => {
                format!("File too large (max {} MB)", limit / (1024 * 1024))
            }
            FlowError::Validation(_) | FlowError::Io(_) => {
                "Unsupported or unreadable image. Use JPEG, PNG or WebP.".to_string()
            }
            FlowError::Device(_) => CAMERA_UNAVAILABLE_MESSAGE.to_string(),
            FlowError::Submission(_) => SUBMISSION_FAILED_MESSAGE.to_string(),
            FlowError::RequestPending(_) => ANALYSIS_PENDING_MESSAGE.to_string(),
            FlowError::InvalidTransition { action, .. } => format!("Cannot {} right now.", action),
        }
    }
}
