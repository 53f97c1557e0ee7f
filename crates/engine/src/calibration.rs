/// Calibration: derive pixels-per-second and the playhead anchor from one
/// snapshot of the timeline, and start a fresh model.
///
/// The track is drawn as a run of equal reference segments. The segments
/// after the first together span exactly one default clip length, so the
/// same constant seeds both the model and the pixel scale.
use device::UiElement;
use timeline::{CalibrationConstants, Point, SessionState, TimelineModel, TimelineStore};
use tracing::info;

use crate::{CalibrationPolicy, Engine, EngineError, Result};

pub fn calibrate_from_snapshot(
    snapshot: &[UiElement],
    num_clips: usize,
    segment_id: &str,
    policy: &CalibrationPolicy,
) -> Result<SessionState> {
    if num_clips == 0 {
        return Err(EngineError::Validation(
            "calibration needs at least one clip".into(),
        ));
    }

    let segments: Vec<&UiElement> = snapshot.iter().filter(|el| el.has_id(segment_id)).collect();
    if segments.len() < policy.min_segments {
        return Err(EngineError::Calibration(format!(
            "found {} reference segments, need at least {}",
            segments.len(),
            policy.min_segments
        )));
    }

    let mut total_width = 0.0;
    for &i in &policy.measured_segments {
        let segment = segments.get(i).ok_or_else(|| {
            EngineError::Calibration(format!("reference segment {} not visible", i))
        })?;
        total_width += segment.bounds.width() as f64;
    }
    if total_width <= 0.0 {
        return Err(EngineError::Calibration(
            "reference segments have no width".into(),
        ));
    }

    // The playhead sits on the right edge of the first segment.
    let first = segments[0].bounds;
    let constants = CalibrationConstants {
        px_per_sec: total_width / policy.default_clip_secs,
        anchor: Point::new(first.x2, first.mid_y()),
        track_height: first.height(),
    };
    let model = TimelineModel::new(num_clips, policy.default_clip_secs);

    Ok(SessionState::new(constants, model))
}

impl Engine {
    /// Measures the timeline and installs a new session in `store`,
    /// replacing any previous one.
    pub async fn calibrate(
        &self,
        store: &mut TimelineStore,
        num_clips: usize,
    ) -> Result<CalibrationConstants> {
        let snapshot = self.snapshot().await?;
        let session = calibrate_from_snapshot(
            &snapshot,
            num_clips,
            &self.config().ids.reference_segment,
            &self.config().calibration,
        )?;
        let constants = session.constants;

        info!(
            "calibration complete: 1s = {:.2}px, playhead fixed at ({}, {}), track height {}px, {} clips",
            constants.px_per_sec,
            constants.anchor.x,
            constants.anchor.y,
            constants.track_height,
            num_clips
        );
        store.install(session);
        Ok(constants)
    }
}
