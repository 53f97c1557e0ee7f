use serde::{Deserialize, Serialize};
use thiserror::Error;

mod model;
pub use model::*;
mod store;
pub use store::*;
mod readout;
pub use readout::*;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimelineError {
    #[error("timeline not calibrated")]
    NotCalibrated,
    #[error("clip {index} out of bounds (total clips: {len})")]
    OutOfBounds { index: usize, len: usize },
    #[error("junction {index} out of bounds (total junctions: {len})")]
    JunctionOutOfBounds { index: usize, len: usize },
    #[error("invalid time readout: {0:?}")]
    InvalidReadout(String),
    #[error("invalid operation: {0}")]
    InvalidOp(String),
}

pub type Seconds = f64;

/// A point in screen pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
