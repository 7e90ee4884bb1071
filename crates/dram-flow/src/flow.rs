//! Acquisition & submission state machine.
//!
//! Input sources (file picker, drag-and-drop, camera) are reduced to discrete
//! [`FlowEvent`]s, so the flow never depends on which mechanism supplied the
//! bytes. Submission is split into [`AcquisitionFlow::begin_submit`] and
//! [`AcquisitionFlow::complete_submit`] so an event loop can run the request
//! elsewhere; [`AcquisitionFlow::submit`] drives both halves inline.
//!
//! At most one request is outstanding per flow. A reset or a new acquisition
//! while a request is in flight does not cancel it: the request runs to
//! completion, its outcome is discarded, and no new submission starts until
//! it has finished.

use std::fmt;
use std::path::Path;

use dram_client::{Classifier, ClientResult, ImageUpload};
use dram_models::{ClassificationResult, SubmissionState};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::acquire::{AcquiredImage, ImageFile, ImageSource};
use crate::camera::{CameraProvider, CameraSession};
use crate::config::FlowConfig;
use crate::error::{DeviceError, FlowError, FlowResult};
use crate::view::ResultView;

/// Identifies one outbound classification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request the caller must send and report back via
/// [`AcquisitionFlow::complete_submit`].
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub id: SubmissionId,
    pub upload: ImageUpload,
}

/// Discrete user input.
#[derive(Debug, Clone)]
pub enum FlowEvent {
    DragEnter,
    DragOver,
    DragLeave,
    FileSelected(ImageFile),
    /// Only the first file is used
    FilesDropped(Vec<ImageFile>),
    StartCamera,
    CapturePhoto,
    CancelCamera,
    Reset,
}

/// What the results panel shows. Exactly one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPanel {
    Placeholder,
    Analyzing,
    Result(ResultView),
    Error(String),
}

/// Image acquisition and submission flow for one page visit.
pub struct AcquisitionFlow {
    config: FlowConfig,
    state: SubmissionState,
    image: Option<AcquiredImage>,
    result: Option<ClassificationResult>,
    error: Option<String>,
    drop_active: bool,
    camera_provider: Option<Box<dyn CameraProvider>>,
    camera: Option<CameraSession>,
    /// Request on the wire, cleared only by its completion
    in_flight: Option<SubmissionId>,
    /// Request whose outcome should be applied
    awaiting: Option<SubmissionId>,
}

impl AcquisitionFlow {
    pub fn new(config: FlowConfig) -> Self {
        Self {
            config,
            state: SubmissionState::Idle,
            image: None,
            result: None,
            error: None,
            drop_active: false,
            camera_provider: None,
            camera: None,
            in_flight: None,
            awaiting: None,
        }
    }

    /// Attach a camera. Without one, starting the camera reports it unavailable.
    pub fn with_camera(mut self, provider: Box<dyn CameraProvider>) -> Self {
        self.camera_provider = Some(provider);
        self
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn image(&self) -> Option<&AcquiredImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        self.result.as_ref()
    }

    /// Message for the user, if the last action failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_drop_active(&self) -> bool {
        self.drop_active
    }

    pub fn is_camera_open(&self) -> bool {
        self.camera.as_ref().is_some_and(CameraSession::is_open)
    }

    pub fn is_request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn result_view(&self) -> Option<ResultView> {
        self.result.as_ref().map(ResultView::from_result)
    }

    pub fn result_panel(&self) -> ResultPanel {
        match self.state {
            SubmissionState::Submitting => ResultPanel::Analyzing,
            SubmissionState::Succeeded => self
                .result_view()
                .map_or(ResultPanel::Placeholder, ResultPanel::Result),
            SubmissionState::Failed => ResultPanel::Error(
                self.error
                    .clone()
                    .unwrap_or_else(|| crate::error::SUBMISSION_FAILED_MESSAGE.to_string()),
            ),
            SubmissionState::Idle | SubmissionState::Acquired => ResultPanel::Placeholder,
        }
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: FlowEvent) -> FlowResult<()> {
        match event {
            FlowEvent::DragEnter | FlowEvent::DragOver => {
                self.drop_active = true;
                Ok(())
            }
            FlowEvent::DragLeave => {
                self.drop_active = false;
                Ok(())
            }
            FlowEvent::FileSelected(file) => self.acquire_from_file(file),
            FlowEvent::FilesDropped(files) => self.acquire_from_drop(files),
            FlowEvent::StartCamera => self.start_camera(),
            FlowEvent::CapturePhoto => self.capture_photo(),
            FlowEvent::CancelCamera => {
                self.cancel_camera();
                Ok(())
            }
            FlowEvent::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Validate and hold a picked file.
    pub fn acquire_from_file(&mut self, file: ImageFile) -> FlowResult<()> {
        self.acquire(&file, ImageSource::File)
    }

    /// Read a file from disk and hold it, as if picked.
    ///
    /// Files over the size limit are refused without reading their contents.
    pub async fn acquire_from_path(&mut self, path: impl AsRef<Path>) -> FlowResult<()> {
        match ImageFile::read(path, self.config.max_image_bytes).await {
            Ok(file) => self.acquire_from_file(file),
            Err(e) => self.fail_locally(e),
        }
    }

    /// Hold the first dropped file; the rest are ignored.
    pub fn acquire_from_drop(&mut self, files: Vec<ImageFile>) -> FlowResult<()> {
        self.drop_active = false;
        match files.into_iter().next() {
            Some(file) => self.acquire(&file, ImageSource::Drop),
            None => Ok(()),
        }
    }

    /// Open the camera. Only allowed with no image held.
    pub fn start_camera(&mut self) -> FlowResult<()> {
        if self.state != SubmissionState::Idle || self.camera.is_some() {
            return Err(FlowError::invalid_transition(self.state, "start the camera"));
        }

        let opened = match self.camera_provider.as_mut() {
            Some(provider) => provider.open(),
            None => Err(DeviceError::Unavailable),
        };

        match opened {
            Ok(stream) => {
                self.camera = Some(CameraSession::new(stream));
                self.error = None;
                debug!("Camera opened");
                Ok(())
            }
            Err(e) => self.fail_locally(e.into()),
        }
    }

    /// Freeze the current frame. The device is released whether or not the
    /// capture succeeds.
    pub fn capture_photo(&mut self) -> FlowResult<()> {
        let mut session = self
            .camera
            .take()
            .ok_or_else(|| FlowError::invalid_transition(self.state, "capture a photo"))?;

        let frame = session.capture();
        session.release();

        let image = frame
            .map_err(FlowError::from)
            .and_then(|f| {
                AcquiredImage::from_frame(f, self.config.max_image_bytes).map_err(FlowError::from)
            });

        match image {
            Ok(image) => {
                self.install(image);
                Ok(())
            }
            Err(e) => self.fail_locally(e),
        }
    }

    /// Close the camera without producing an image.
    pub fn cancel_camera(&mut self) {
        if let Some(mut session) = self.camera.take() {
            session.release();
        }
    }

    /// Back to `Idle` from any state.
    pub fn reset(&mut self) {
        self.cancel_camera();
        self.image = None;
        self.result = None;
        self.error = None;
        self.drop_active = false;
        if let Some(id) = self.awaiting.take() {
            debug!(submission_id = %id, "Reset while submitting; outcome will be discarded");
        }
        self.transition(SubmissionState::Idle);
    }

    /// Start a submission of the held image.
    ///
    /// Returns `Ok(None)` without doing anything while a request is already
    /// outstanding.
    pub fn begin_submit(&mut self) -> FlowResult<Option<PendingSubmission>> {
        if self.state.is_busy() {
            debug!(state = %self.state, "Submission already in flight; ignoring");
            return Ok(None);
        }
        if let Some(id) = self.in_flight {
            return self
                .fail_locally(FlowError::RequestPending(id.to_string()))
                .map(|_| None);
        }
        if !self.state.can_submit() {
            return Err(FlowError::invalid_transition(self.state, "submit"));
        }
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| FlowError::invalid_transition(self.state, "submit"))?;

        let pending = PendingSubmission {
            id: SubmissionId::new(),
            upload: image.to_upload(),
        };
        self.in_flight = Some(pending.id);
        self.awaiting = Some(pending.id);
        self.error = None;
        self.transition(SubmissionState::Submitting);

        debug!(
            submission_id = %pending.id,
            bytes = pending.upload.len(),
            "Submission started"
        );
        Ok(Some(pending))
    }

    /// Report the outcome of a request started by [`Self::begin_submit`].
    ///
    /// A failure moves to `Failed`, keeps the image for a retry, and is
    /// returned to the caller. Outcomes of superseded requests are dropped.
    pub fn complete_submit(
        &mut self,
        id: SubmissionId,
        outcome: ClientResult<ClassificationResult>,
    ) -> FlowResult<()> {
        if self.in_flight == Some(id) {
            self.in_flight = None;
        }
        if self.awaiting != Some(id) {
            debug!(submission_id = %id, "Discarding outcome of superseded submission");
            return Ok(());
        }
        self.awaiting = None;

        match outcome {
            Ok(result) => {
                info!(
                    submission_id = %id,
                    name = %result.primary().whisky_name,
                    score = result.primary().score,
                    candidates = result.len(),
                    "Classification succeeded"
                );
                self.result = Some(result);
                self.error = None;
                self.transition(SubmissionState::Succeeded);
                Ok(())
            }
            Err(e) => {
                warn!(submission_id = %id, kind = e.kind(), "Classification failed: {}", e);
                let err = FlowError::from(e);
                self.error = Some(err.user_message());
                self.transition(SubmissionState::Failed);
                Err(err)
            }
        }
    }

    /// Submit the held image and wait for the outcome. Single attempt.
    pub async fn submit(&mut self, classifier: &dyn Classifier) -> FlowResult<()> {
        let Some(pending) = self.begin_submit()? else {
            return Ok(());
        };
        let outcome = classifier.classify(pending.upload).await;
        self.complete_submit(pending.id, outcome)
    }

    fn acquire(&mut self, file: &ImageFile, source: ImageSource) -> FlowResult<()> {
        match AcquiredImage::from_file(file, source, self.config.max_image_bytes) {
            Ok(image) => {
                self.install(image);
                Ok(())
            }
            Err(e) => self.fail_locally(e.into()),
        }
    }

    /// Make `image` the active image, discarding any result or error.
    fn install(&mut self, image: AcquiredImage) {
        self.cancel_camera();
        debug!(
            source = image.source().as_str(),
            bytes = image.byte_size(),
            "Image acquired"
        );
        self.image = Some(image);
        self.result = None;
        self.error = None;
        self.awaiting = None;
        self.transition(SubmissionState::Acquired);
    }

    /// Surface a recoverable error without touching the held image or state.
    fn fail_locally(&mut self, err: FlowError) -> FlowResult<()> {
        warn!(state = %self.state, "{}", err);
        self.error = Some(err.user_message());
        Err(err)
    }

    fn transition(&mut self, next: SubmissionState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "State transition");
        }
        self.state = next;
    }
}

impl Default for AcquisitionFlow {
    fn default() -> Self {
        Self::new(FlowConfig::default())
    }
}

impl fmt::Debug for AcquisitionFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcquisitionFlow")
            .field("state", &self.state)
            .field("has_image", &self.image.is_some())
            .field("has_result", &self.result.is_some())
            .field("error", &self.error)
            .field("camera", &self.camera)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}
