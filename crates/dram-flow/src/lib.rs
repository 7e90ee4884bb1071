//! Image acquisition and submission flow.
//!
//! This crate provides:
//! - Image validation and PNG normalization for picked, dropped and captured images
//! - An exclusive, self-releasing camera session
//! - The Idle → Acquired → Submitting → Succeeded/Failed state machine
//! - The result view-model rendered after a successful classification

pub mod acquire;
pub mod camera;
pub mod config;
pub mod error;
pub mod flow;
pub mod view;

pub use acquire::{AcquiredImage, ImageFile, ImageSource};
pub use camera::{CameraProvider, CameraSession, VideoStream};
pub use config::{FlowConfig, DEFAULT_MAX_IMAGE_BYTES};
pub use error::{DeviceError, FlowError, FlowResult, ValidationError};
pub use flow::{AcquisitionFlow, FlowEvent, PendingSubmission, ResultPanel, SubmissionId};
pub use view::ResultView;
