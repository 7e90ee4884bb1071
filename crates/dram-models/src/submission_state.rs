//! Submission lifecycle state.

use serde::{Deserialize, Serialize};

/// Where the current image is in its acquire → submit → result lifecycle.
///
/// Exactly one of these drives what the interface renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    /// No image held
    #[default]
    Idle,
    /// Image present, not yet submitted
    Acquired,
    /// Request in flight
    Submitting,
    /// Classification result present
    Succeeded,
    /// Submission failed, image still held for retry
    Failed,
}

impl SubmissionState {
    /// Get string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Acquired => "acquired",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed => "failed",
        }
    }

    /// Whether a request is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    /// Whether an image may be submitted from this state.
    ///
    /// `Failed` is included so the user can retry without re-acquiring.
    pub fn can_submit(&self) -> bool {
        matches!(self, SubmissionState::Acquired | SubmissionState::Failed)
    }

    /// Whether an image is held in this state.
    pub fn holds_image(&self) -> bool {
        !matches!(self, SubmissionState::Idle)
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
