/// Edit orchestration: each operation composes seeks, projected taps and
/// scans into one user-visible change, then records it in the timeline.
///
/// Validation happens before the first device call. A failure part way
/// through leaves earlier model updates in place.
use thiserror::Error;

use device::DeviceError;
use engine::{Engine, EngineError, ErrorKind};
use timeline::TimelineError;

mod catalog;
pub use catalog::*;
mod plan;
pub use plan::*;
mod duration;
pub use duration::*;
mod transition;
pub use transition::*;
mod effect;
pub use effect::*;
mod media;
mod runner;
pub use runner::*;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("unknown effect: {0}")]
    UnknownEffect(String),
    #[error("unknown transition: {0}")]
    UnknownTransition(String),
    #[error("plan error: {0}")]
    Plan(String),
    #[error("catalog error: {0}")]
    Catalog(String),
}

impl From<TimelineError> for OperationError {
    fn from(e: TimelineError) -> Self {
        Self::Engine(e.into())
    }
}

impl From<DeviceError> for OperationError {
    fn from(e: DeviceError) -> Self {
        Self::Engine(e.into())
    }
}

impl OperationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Engine(e) => e.kind(),
            Self::Validation(_) | Self::UnknownEffect(_) | Self::UnknownTransition(_) => {
                ErrorKind::Validation
            }
            Self::Plan(_) | Self::Catalog(_) => ErrorKind::Config,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Engine(e) => e.is_recoverable(),
            Self::Plan(_) | Self::Catalog(_) => false,
            _ => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, OperationError>;

/// Runs edits against one device. Holds the catalogs; the timeline is
/// passed into every call.
#[derive(Clone)]
pub struct Orchestrator {
    engine: Engine,
    effects: EffectCatalog,
    transitions: TransitionCatalog,
}

impl Orchestrator {
    pub fn new(engine: Engine, effects: EffectCatalog, transitions: TransitionCatalog) -> Self {
        Self {
            engine,
            effects,
            transitions,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn effects(&self) -> &EffectCatalog {
        &self.effects
    }

    pub fn transitions(&self) -> &TransitionCatalog {
        &self.transitions
    }
}
