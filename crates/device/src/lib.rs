/// Device side of the automation: UI snapshots and gesture primitives.
///
/// Snapshots are flat, pre-ordered element lists. They are only valid for
/// the frame they were taken from; indices are not stable across snapshots.
use thiserror::Error;

mod element;
pub use element::*;
mod snapshot;
pub use snapshot::*;
mod driver;
pub use driver::*;
mod adb;
pub use adb::AdbDriver;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("adb not found on PATH; please install Android platform-tools")]
    AdbMissing,
    #[error("device command failed: {0}")]
    CommandFailed(String),
    #[error("snapshot parse error: {0}")]
    Parse(String),
    #[error("malformed bounds: {0:?}")]
    MalformedBounds(String),
    #[error("element {0} not present in the last snapshot")]
    UnknownElement(usize),
}

pub type Result<T> = std::result::Result<T, DeviceError>;
