//! Barcode scanning over platform capabilities. The camera and the
//! detector are host collaborators behind trait seams; [`ScanController`]
//! owns the acquire/poll/release lifecycle.

mod controller;
#[cfg(test)]
pub(crate) mod mock;

pub use controller::{ScanController, ScanState};

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Rear,
    Front,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeFormat {
    Ean13,
    UpcA,
    UpcE,
}

/// The product-barcode formats a host detector must cover.
pub const SCAN_FORMATS: &[BarcodeFormat] =
    &[BarcodeFormat::Ean13, BarcodeFormat::UpcA, BarcodeFormat::UpcE];

#[derive(Debug, Clone)]
pub struct Detection {
    pub raw_value: String,
    pub format: BarcodeFormat,
}

/// Camera hardware access.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Acquire a live stream, preferring the requested facing. Fails with
    /// `CameraUnavailable` when permission is denied or no camera exists.
    async fn open(&self, facing: Facing) -> Result<Arc<dyn CameraStream>, AppError>;
}

/// A live video stream. `release` must be idempotent; after it, the
/// stream reports inactive and zero tracks.
pub trait CameraStream: Send + Sync {
    fn is_active(&self) -> bool;
    fn is_paused(&self) -> bool;
    fn active_tracks(&self) -> usize;
    fn release(&self);
}

/// Platform barcode-detection capability. An empty detection list means
/// no barcode in this frame.
#[async_trait]
pub trait BarcodeDetector: Send + Sync {
    fn supports(&self, formats: &[BarcodeFormat]) -> bool;
    async fn detect(&self, stream: &dyn CameraStream) -> anyhow::Result<Vec<Detection>>;
}

/// Default camera for hosts without camera hardware.
pub struct NoCamera;

#[async_trait]
impl Camera for NoCamera {
    async fn open(&self, _facing: Facing) -> Result<Arc<dyn CameraStream>, AppError> {
        Err(AppError::CameraUnavailable(
            "no camera on this host".into(),
        ))
    }
}

/// Default detector for hosts without a barcode-detection capability.
pub struct NoDetector;

#[async_trait]
impl BarcodeDetector for NoDetector {
    fn supports(&self, _formats: &[BarcodeFormat]) -> bool {
        false
    }

    async fn detect(&self, _stream: &dyn CameraStream) -> anyhow::Result<Vec<Detection>> {
        Ok(Vec::new())
    }
}
