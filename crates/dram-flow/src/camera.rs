//! Live camera access.
//!
//! A [`CameraProvider`] opens devices; each open device is a [`VideoStream`].
//! The flow wraps the stream in a [`CameraSession`], which stops the device
//! exactly once: on explicit release, or when the session is dropped.

use chrono::{DateTime, Utc};
use image::RgbaImage;
use tracing::debug;

use crate::error::DeviceError;

/// An open video device.
pub trait VideoStream: Send {
    /// Copy the current frame.
    fn grab_frame(&mut self) -> Result<RgbaImage, DeviceError>;

    /// Stop the device and free its handle.
    fn stop(&mut self);
}

/// Opens video devices on request.
pub trait CameraProvider: Send {
    /// Request a live video device. Permission prompts happen here.
    fn open(&mut self) -> Result<Box<dyn VideoStream>, DeviceError>;
}

/// Exclusive handle to an open video device.
pub struct CameraSession {
    stream: Option<Box<dyn VideoStream>>,
    opened_at: DateTime<Utc>,
}

impl CameraSession {
    pub fn new(stream: Box<dyn VideoStream>) -> Self {
        Self {
            stream: Some(stream),
            opened_at: Utc::now(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Grab the current frame. Does not release the device.
    pub fn capture(&mut self) -> Result<RgbaImage, DeviceError> {
        match self.stream.as_mut() {
            Some(stream) => stream.grab_frame(),
            None => Err(DeviceError::Closed),
        }
    }

    /// Stop the device. Returns `false` if it was already released.
    pub fn release(&mut self) -> bool {
        match self.stream.take() {
            Some(mut stream) => {
                stream.stop();
                debug!("Camera released");
                true
            }
            None => false,
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("open", &self.is_open())
            .field("opened_at", &self.opened_at)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::acquire::test_support::noise_frame;

    /// Counts device opens and stops so tests can check release discipline.
    #[derive(Debug, Default, Clone)]
    pub struct DeviceCounters {
        pub opened: Arc<AtomicUsize>,
        pub stopped: Arc<AtomicUsize>,
    }

    impl DeviceCounters {
        pub fn opened(&self) -> usize {
            self.opened.load(Ordering::SeqCst)
        }

        pub fn stopped(&self) -> usize {
            self.stopped.load(Ordering::SeqCst)
        }
    }

    pub struct FakeStream {
        counters: DeviceCounters,
        frame_fails: bool,
    }

    impl VideoStream for FakeStream {
        fn grab_frame(&mut self) -> Result<RgbaImage, DeviceError> {
            if self.frame_fails {
                Err(DeviceError::Failed("no frame".into()))
            } else {
                Ok(noise_frame(8, 6))
            }
        }

        fn stop(&mut self) {
            self.counters.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Camera that can be told to deny access or fail on capture.
    pub struct FakeCamera {
        pub counters: DeviceCounters,
        pub deny: bool,
        pub frame_fails: bool,
    }

    impl FakeCamera {
        pub fn working() -> Self {
            Self {
                counters: DeviceCounters::default(),
                deny: false,
                frame_fails: false,
            }
        }
    }

    impl CameraProvider for FakeCamera {
        fn open(&mut self) -> Result<Box<dyn VideoStream>, DeviceError> {
            if self.deny {
                return Err(DeviceError::PermissionDenied);
            }
            self.counters.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeStream {
                counters: self.counters.clone(),
                frame_fails: self.frame_fails,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_release_is_idempotent() {
        let mut camera = FakeCamera::working();
        let counters = camera.counters.clone();
        let mut session = CameraSession::new(camera.open().unwrap());

        assert!(session.capture().is_ok());
        assert!(session.release());
        assert!(!session.release());
        assert!(!session.is_open());
        assert!(matches!(session.capture(), Err(DeviceError::Closed)));

        drop(session);
        assert_eq!(counters.stopped(), 1);
    }

    #[test]
    fn test_drop_releases() {
        let mut camera = FakeCamera::working();
        let counters = camera.counters.clone();
        let session = CameraSession::new(camera.open().unwrap());
        drop(session);
        assert_eq!(counters.opened(), 1);
        assert_eq!(counters.stopped(), 1);
    }
}
