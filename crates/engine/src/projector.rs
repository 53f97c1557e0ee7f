use serde::{Deserialize, Serialize};
use timeline::{CalibrationConstants, Seconds, TimelineStore};
use tracing::debug;

use crate::{Engine, ProjectionPolicy, Result};

/// Vertical lane of the track a tap should land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapRow {
    /// Middle of the track, selects a clip.
    Track,
    /// Just above the bottom edge, where junction handles sit.
    Handle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapPoint {
    pub x: i32,
    pub y: i32,
    pub target: Seconds,
    pub measured: Seconds,
}

/// Screen point for `target` given the position actually displayed. The
/// measured residual is converted back to pixels, so a loose seek still
/// lands on the right spot.
pub fn tap_point(
    constants: &CalibrationConstants,
    policy: &ProjectionPolicy,
    target: Seconds,
    measured: Seconds,
    row: TapRow,
) -> TapPoint {
    let offset = constants.seconds_to_px(measured - target);
    let y = match row {
        TapRow::Track => constants.anchor.y,
        TapRow::Handle => {
            constants.anchor.y + constants.track_height / 2 - policy.handle_inset_px
        }
    };
    TapPoint {
        x: constants.anchor.x - offset - policy.tap_nudge_px,
        y,
        target,
        measured,
    }
}

impl Engine {
    /// Seeks near `target`, re-measures, and projects the residual.
    pub async fn project_time(
        &self,
        store: &TimelineStore,
        target: Seconds,
        row: TapRow,
    ) -> Result<TapPoint> {
        let constants = store.constants()?;
        self.seek(store, target, self.config().seek.coarse_tolerance_secs)
            .await?;
        let measured = self.read_time().await?;
        let point = tap_point(&constants, &self.config().projection, target, measured, row);
        debug!(
            "projected {:.2}s (displayed {:.2}s) to ({}, {})",
            target, measured, point.x, point.y
        );
        Ok(point)
    }

    /// Tap point on the middle of `clip` (1-based).
    pub async fn project_clip(&self, store: &TimelineStore, clip: usize) -> Result<TapPoint> {
        let midpoint = store.model()?.clip_midpoint(clip)?;
        self.project_time(store, midpoint, TapRow::Track).await
    }

    /// Tap point on the handle between `clip` and the one after it.
    pub async fn project_junction(&self, store: &TimelineStore, clip: usize) -> Result<TapPoint> {
        let junction = store.model()?.junction_time(clip)?;
        self.project_time(store, junction, TapRow::Handle).await
    }

    pub async fn tap_at(&self, point: &TapPoint) -> Result<()> {
        self.driver().tap(point.x, point.y).await?;
        Ok(())
    }

    /// Projects and taps `clip`, selecting it.
    pub async fn tap_clip(&self, store: &TimelineStore, clip: usize) -> Result<TapPoint> {
        let point = self.project_clip(store, clip).await?;
        self.tap_at(&point).await?;
        Ok(point)
    }
}
