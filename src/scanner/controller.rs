use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{debug, instrument, warn};

use super::{BarcodeDetector, Camera, CameraStream, Facing, SCAN_FORMATS};
use crate::error::AppError;

/// How often a frame is offered to the detector while scanning.
pub const POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Resting states of a scan session. Detection and errors are conveyed by
/// the return value of [`ScanController::scan`] and settle back to `Idle`
/// once the camera is released; `Stopped` is reached only through an
/// explicit [`ScanController::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Starting,
    Scanning,
    Stopped,
}

struct Inner {
    state: ScanState,
    stream: Option<Arc<dyn CameraStream>>,
    stop_requested: bool,
}

/// Drives one barcode scan at a time: acquire the rear camera, poll the
/// detector at a fixed interval, release the camera on every exit path.
pub struct ScanController {
    camera: Arc<dyn Camera>,
    detector: Arc<dyn BarcodeDetector>,
    poll_interval: Duration,
    inner: Mutex<Inner>,
    stop_signal: Notify,
}

impl ScanController {
    pub fn new(camera: Arc<dyn Camera>, detector: Arc<dyn BarcodeDetector>) -> Self {
        Self {
            camera,
            detector,
            poll_interval: POLL_INTERVAL,
            inner: Mutex::new(Inner {
                state: ScanState::Idle,
                stream: None,
                stop_requested: false,
            }),
            stop_signal: Notify::new(),
        }
    }

    #[cfg(test)]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn state(&self) -> ScanState {
        self.inner.lock().unwrap().state
    }

    /// Run a scan session to completion. Resolves with the raw decoded
    /// string of the first detection, or `None` when the session was
    /// stopped before anything was detected. The camera is released
    /// before this returns, whatever the outcome.
    #[instrument(skip(self))]
    pub async fn scan(&self) -> Result<Option<String>, AppError> {
        {
            let mut inner = self.inner.lock().unwrap();
            if matches!(inner.state, ScanState::Starting | ScanState::Scanning) {
                return Err(AppError::InvalidInput("a scan is already in progress".into()));
            }
            inner.state = ScanState::Starting;
            inner.stop_requested = false;
        }

        if !self.detector.supports(SCAN_FORMATS) {
            self.finish(ScanState::Idle);
            return Err(AppError::UnsupportedCapability);
        }

        let stream = match self.camera.open(Facing::Rear).await {
            Ok(stream) => stream,
            Err(e) => {
                self.finish(ScanState::Idle);
                return Err(e);
            }
        };

        {
            let mut inner = self.inner.lock().unwrap();
            if inner.stop_requested {
                // Stopped while the camera was still being acquired.
                drop(inner);
                stream.release();
                return Ok(None);
            }
            inner.stream = Some(Arc::clone(&stream));
            inner.state = ScanState::Scanning;
        }

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if self.stop_requested() {
                return Ok(None);
            }
            tokio::select! {
                _ = self.stop_signal.notified() => {
                    return Ok(None);
                }
                _ = ticker.tick() => {
                    // Never hand the detector a released or paused stream.
                    if !stream.is_active() || stream.is_paused() {
                        continue;
                    }
                    let detections = match self.detector.detect(&*stream).await {
                        Ok(detections) => detections,
                        Err(e) => {
                            // A failed frame is not fatal; keep polling.
                            warn!(error = %e, "barcode detection failed");
                            continue;
                        }
                    };
                    if let Some(first) = detections.first() {
                        let stream_slot = {
                            let mut inner = self.inner.lock().unwrap();
                            // A detection that resolves after stop() is
                            // discarded; the camera is already released.
                            if inner.stop_requested {
                                return Ok(None);
                            }
                            inner.state = ScanState::Idle;
                            inner.stream.take()
                        };
                        if let Some(stream) = stream_slot {
                            stream.release();
                        }
                        debug!(format = ?first.format, "barcode detected");
                        return Ok(Some(first.raw_value.clone()));
                    }
                    if self.stop_requested() {
                        return Ok(None);
                    }
                }
            }
        }
    }

    /// Cancel the session: the camera is released synchronously and any
    /// in-flight detection result is discarded. Safe to call at any time,
    /// any number of times.
    pub fn stop(&self) {
        let stream = {
            let mut inner = self.inner.lock().unwrap();
            inner.stop_requested = true;
            if matches!(inner.state, ScanState::Starting | ScanState::Scanning) {
                inner.state = ScanState::Stopped;
            }
            inner.stream.take()
        };
        if let Some(stream) = stream {
            stream.release();
        }
        self.stop_signal.notify_waiters();
    }

    fn stop_requested(&self) -> bool {
        self.inner.lock().unwrap().stop_requested
    }

    fn finish(&self, state: ScanState) {
        let stream = {
            let mut inner = self.inner.lock().unwrap();
            inner.state = state;
            inner.stream.take()
        };
        if let Some(stream) = stream {
            stream.release();
        }
    }
}

impl Drop for ScanController {
    fn drop(&mut self) {
        if let Some(stream) = self.inner.get_mut().unwrap().stream.take() {
            stream.release();
        }
    }
}
