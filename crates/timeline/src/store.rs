use crate::{CalibrationConstants, SessionState, TimelineError, TimelineModel};

/// Owner of the one calibrated session. Every operation reads and mutates
/// the timeline through here; nothing is kept in globals.
#[derive(Debug, Default)]
pub struct TimelineStore {
    session: Option<SessionState>,
}

impl TimelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: SessionState) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// Replaces any previous session; constants and model are never merged.
    pub fn install(&mut self, session: SessionState) -> Option<SessionState> {
        self.session.replace(session)
    }

    pub fn clear(&mut self) -> Option<SessionState> {
        self.session.take()
    }

    pub fn is_calibrated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Result<&SessionState, TimelineError> {
        self.session.as_ref().ok_or(TimelineError::NotCalibrated)
    }

    pub fn session_mut(&mut self) -> Result<&mut SessionState, TimelineError> {
        self.session.as_mut().ok_or(TimelineError::NotCalibrated)
    }

    pub fn constants(&self) -> Result<CalibrationConstants, TimelineError> {
        self.session().map(|s| s.constants)
    }

    pub fn model(&self) -> Result<&TimelineModel, TimelineError> {
        self.session().map(|s| &s.model)
    }

    pub fn model_mut(&mut self) -> Result<&mut TimelineModel, TimelineError> {
        self.session_mut().map(|s| &mut s.model)
    }
}
