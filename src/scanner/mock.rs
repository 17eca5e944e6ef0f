//! Test doubles for the camera and detector seams.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{BarcodeDetector, BarcodeFormat, Camera, CameraStream, Detection, Facing};
use crate::error::AppError;

pub struct MockStream {
    active: AtomicBool,
    paused: AtomicBool,
    tracks: AtomicUsize,
}

impl MockStream {
    pub fn new() -> Self {
        Self {
            active: AtomicBool::new(true),
            paused: AtomicBool::new(false),
            tracks: AtomicUsize::new(1),
        }
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }
}

impl CameraStream for MockStream {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn active_tracks(&self) -> usize {
        self.tracks.load(Ordering::SeqCst)
    }

    fn release(&self) {
        self.active.store(false, Ordering::SeqCst);
        self.tracks.store(0, Ordering::SeqCst);
    }
}

pub struct MockCamera {
    pub stream: Arc<MockStream>,
    pub open_calls: AtomicUsize,
    deny: bool,
}

impl MockCamera {
    pub fn working() -> Self {
        Self::with_stream(Arc::new(MockStream::new()))
    }

    pub fn with_stream(stream: Arc<MockStream>) -> Self {
        Self {
            stream,
            open_calls: AtomicUsize::new(0),
            deny: false,
        }
    }

    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Self::working()
        }
    }
}

#[async_trait]
impl Camera for MockCamera {
    async fn open(&self, _facing: Facing) -> Result<Arc<dyn CameraStream>, AppError> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        if self.deny {
            return Err(AppError::CameraUnavailable("permission denied".into()));
        }
        Ok(Arc::clone(&self.stream) as Arc<dyn CameraStream>)
    }
}

/// Plays back a fixed sequence of per-frame detection results, then keeps
/// reporting empty frames.
pub struct ScriptedDetector {
    script: Mutex<VecDeque<Vec<Detection>>>,
    pub detect_calls: AtomicUsize,
    supported: bool,
    fail_first: AtomicBool,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Vec<Detection>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            detect_calls: AtomicUsize::new(0),
            supported: true,
            fail_first: AtomicBool::new(false),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn fail_first(self) -> Self {
        self.fail_first.store(true, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl BarcodeDetector for ScriptedDetector {
    fn supports(&self, _formats: &[BarcodeFormat]) -> bool {
        self.supported
    }

    async fn detect(&self, _stream: &dyn CameraStream) -> anyhow::Result<Vec<Detection>> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_first.swap(false, Ordering::SeqCst) {
            anyhow::bail!("frame decode failed");
        }
        Ok(self.script.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// Parks its first `detect` call until the test releases it, so a stop can
/// race an in-flight detection.
pub struct BlockingDetector {
    result: Detection,
    detecting: AtomicBool,
    release: Notify,
}

impl BlockingDetector {
    pub fn new(result: Detection) -> Self {
        Self {
            result,
            detecting: AtomicBool::new(false),
            release: Notify::new(),
        }
    }

    pub async fn wait_until_detecting(&self) {
        while !self.detecting.load(Ordering::SeqCst) {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
    }

    pub fn release_result(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl BarcodeDetector for BlockingDetector {
    fn supports(&self, _formats: &[BarcodeFormat]) -> bool {
        true
    }

    async fn detect(&self, _stream: &dyn CameraStream) -> anyhow::Result<Vec<Detection>> {
        self.detecting.store(true, Ordering::SeqCst);
        self.release.notified().await;
        Ok(vec![self.result.clone()])
    }
}
