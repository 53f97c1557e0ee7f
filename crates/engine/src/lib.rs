/// Timeline calibration and closed-loop positioning.
///
/// Everything here works from UI snapshots and coarse gestures only: the
/// engine measures the timeline, seeks by visual feedback, projects clip
/// times onto the screen and scans scrollable rows for labels.
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use device::{DeviceDriver, DeviceError, UiElement};
use timeline::{Seconds, TimelineError};

mod config;
pub use config::*;
mod calibration;
pub use calibration::*;
mod readout;
pub use readout::*;
mod seek;
pub use seek::*;
mod projector;
pub use projector::*;
mod scanner;
pub use scanner::*;
pub mod layout;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error("calibration failed: {0}")]
    Calibration(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("time readout not visible")]
    ReadoutUnavailable,
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
    #[error("config error: {0}")]
    Config(String),
}

/// Coarse classification used in run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotCalibrated,
    OutOfBounds,
    Validation,
    NotFound,
    Calibration,
    Readout,
    Device,
    Config,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeline(TimelineError::NotCalibrated) => ErrorKind::NotCalibrated,
            Self::Timeline(
                TimelineError::OutOfBounds { .. } | TimelineError::JunctionOutOfBounds { .. },
            ) => ErrorKind::OutOfBounds,
            Self::Timeline(TimelineError::InvalidReadout(_)) => ErrorKind::Readout,
            Self::Timeline(TimelineError::InvalidOp(_)) | Self::Validation(_) => {
                ErrorKind::Validation
            }
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Calibration(_) => ErrorKind::Calibration,
            Self::ReadoutUnavailable => ErrorKind::Readout,
            Self::Device(_) => ErrorKind::Device,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Failures that end one operation but leave the session usable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Device | ErrorKind::Config)
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Device handle plus policy. Holds no timeline state; callers pass the
/// `TimelineStore` into every operation.
#[derive(Clone)]
pub struct Engine {
    driver: Arc<dyn DeviceDriver>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(driver: Arc<dyn DeviceDriver>, config: EngineConfig) -> Self {
        Self { driver, config }
    }

    pub fn driver(&self) -> &dyn DeviceDriver {
        self.driver.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn snapshot(&self) -> Result<Vec<UiElement>> {
        Ok(self.driver.snapshot().await?)
    }

    /// Fixed, non-cancellable wait for the UI to settle.
    pub async fn settle(&self, ms: u64) {
        if ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
        }
    }

    /// Fresh snapshot, first element with `resource_id`.
    pub async fn find_by_id(&self, resource_id: &str) -> Result<Option<UiElement>> {
        let snapshot = self.snapshot().await?;
        Ok(device::find_by_id(&snapshot, resource_id).cloned())
    }

    /// Taps the element with `resource_id`; `what` names it in the error.
    pub async fn tap_by_id(&self, resource_id: &str, what: &str) -> Result<UiElement> {
        let element = self
            .find_by_id(resource_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(what.to_string()))?;
        debug!("tapping {} (index {})", what, element.index);
        self.driver.tap_element(&element).await?;
        Ok(element)
    }

    /// Displayed play position from a fresh snapshot.
    pub async fn read_time(&self) -> Result<Seconds> {
        let snapshot = self.snapshot().await?;
        read_time_from(&snapshot, &self.config.ids)
    }

    pub async fn read_total_duration(&self) -> Result<Seconds> {
        let snapshot = self.snapshot().await?;
        read_total_duration_from(&snapshot, &self.config.ids)
    }
}
