//! Client for the whisky bottle classification service.
//!
//! The service is an opaque HTTP endpoint: it takes one image as a
//! multipart upload and answers with candidate matches ordered by score.
//! This crate owns the wire format on both sides of that exchange and the
//! [`Classifier`] seam the acquisition flow submits through.

pub mod client;
pub mod error;
pub mod metrics;
pub mod types;

pub use client::{Classifier, ClassifierClient, ClassifierConfig};
pub use error::{ClientError, ClientResult};
pub use types::ImageUpload;
