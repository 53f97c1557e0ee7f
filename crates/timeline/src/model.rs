/// Logical model of the edited video: clip durations plus the calibration
/// constants that map timeline seconds onto screen pixels.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Point, Seconds, TimelineError};

/// Physical-to-temporal mapping measured from one calibration snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalibrationConstants {
    /// Horizontal pixels per second of timeline.
    pub px_per_sec: f64,
    /// Fixed playhead position; the track scrolls under it.
    pub anchor: Point,
    /// Height of the track row in pixels.
    pub track_height: i32,
}

impl CalibrationConstants {
    /// Pixel distance covered by `secs`, truncated toward zero.
    pub fn seconds_to_px(&self, secs: Seconds) -> i32 {
        (secs * self.px_per_sec) as i32
    }

    pub fn px_to_seconds(&self, px: i32) -> Seconds {
        px as f64 / self.px_per_sec
    }
}

/// Clip durations, 1-indexed at the API surface. Junction `j` is the cut
/// between clip `j` and clip `j + 1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineModel {
    durations: Vec<Seconds>,
    raw_durations: Vec<Seconds>,
}

impl TimelineModel {
    pub fn new(num_clips: usize, default_duration: Seconds) -> Self {
        let durations = vec![default_duration; num_clips];
        Self {
            raw_durations: durations.clone(),
            durations,
        }
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn durations(&self) -> &[Seconds] {
        &self.durations
    }

    /// Durations as they were at calibration time.
    pub fn raw_durations(&self) -> &[Seconds] {
        &self.raw_durations
    }

    /// Maps a 1-based clip index to its slot in `durations`.
    pub fn slot(&self, clip: usize) -> Result<usize, TimelineError> {
        if clip == 0 || clip > self.durations.len() {
            return Err(TimelineError::OutOfBounds {
                index: clip,
                len: self.durations.len(),
            });
        }
        Ok(clip - 1)
    }

    pub fn duration(&self, clip: usize) -> Result<Seconds, TimelineError> {
        Ok(self.durations[self.slot(clip)?])
    }

    /// Absolute set; returns the previous value.
    pub fn set_duration(&mut self, clip: usize, secs: Seconds) -> Result<Seconds, TimelineError> {
        let slot = self.slot(clip)?;
        Ok(std::mem::replace(&mut self.durations[slot], secs))
    }

    pub fn start_of(&self, clip: usize) -> Result<Seconds, TimelineError> {
        let slot = self.slot(clip)?;
        Ok(self.durations[..slot].iter().sum())
    }

    pub fn clip_range(&self, clip: usize) -> Result<(Seconds, Seconds), TimelineError> {
        let start = self.start_of(clip)?;
        Ok((start, start + self.duration(clip)?))
    }

    pub fn clip_midpoint(&self, clip: usize) -> Result<Seconds, TimelineError> {
        let (start, end) = self.clip_range(clip)?;
        Ok(start + (end - start) / 2.0)
    }

    /// Time of the cut after `clip`.
    pub fn junction_time(&self, clip: usize) -> Result<Seconds, TimelineError> {
        self.clip_range(clip).map(|(_, end)| end)
    }

    pub fn total_duration(&self) -> Seconds {
        self.durations.iter().sum()
    }

    /// Number of cuts between clips.
    pub fn junction_count(&self) -> usize {
        self.durations.len().saturating_sub(1)
    }

    /// Takes half of `length` from each clip around `junction`. Every call
    /// charges the full length, whatever was applied there before.
    pub fn apply_transition(&mut self, junction: usize, length: Seconds) -> Result<(), TimelineError> {
        let slot = self.junction_slot(junction)?;
        let half = length / 2.0;
        self.durations[slot] -= half;
        self.durations[slot + 1] -= half;
        Ok(())
    }

    fn junction_slot(&self, junction: usize) -> Result<usize, TimelineError> {
        if junction == 0 || junction > self.junction_count() {
            return Err(TimelineError::JunctionOutOfBounds {
                index: junction,
                len: self.junction_count(),
            });
        }
        Ok(junction - 1)
    }
}

/// Everything a calibration produces. Replaced wholesale on recalibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub id: Uuid,
    pub calibrated_at: DateTime<Utc>,
    pub constants: CalibrationConstants,
    pub model: TimelineModel,
}

impl SessionState {
    pub fn new(constants: CalibrationConstants, model: TimelineModel) -> Self {
        Self {
            id: Uuid::new_v4(),
            calibrated_at: Utc::now(),
            constants,
            model,
        }
    }
}
