//! Shared data models for the dram whisky classifier.
//!
//! This crate provides Serde-serializable types for:
//! - Classifier responses (candidate matches and the ordered result)
//! - The submission lifecycle state
//! - The bottle gallery catalog with search and filtering
//! - Presentation helpers (confidence bands, price formatting)

pub mod catalog;
pub mod classification;
pub mod display;
pub mod submission_state;

// Re-export common types
pub use catalog::{Catalog, Gallery, GalleryEntry};
pub use classification::{ClassificationResult, EmptyResultError, WhiskyMatch, SIMILAR_LIMIT};
pub use display::{format_usd, ConfidenceBand};
pub use submission_state::SubmissionState;
