/// Closed-loop seek: swipe the timeline under the fixed playhead until the
/// displayed time is within tolerance of the target.
use serde::{Deserialize, Serialize};
use timeline::{CalibrationConstants, Point, Seconds, TimelineStore};
use tracing::{debug, info, warn};

use crate::{read_time_from, Engine, Result, SeekPolicy};

/// Terminal state of one seek. Neither variant is an error; callers decide
/// whether a residual is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SeekOutcome {
    Converged { time: Seconds, iterations: usize },
    GivenUp { time: Seconds, residual: Seconds },
}

impl SeekOutcome {
    /// Last measured play position.
    pub fn achieved(&self) -> Seconds {
        match *self {
            Self::Converged { time, .. } | Self::GivenUp { time, .. } => time,
        }
    }

    pub fn converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

/// Per-iteration measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekState {
    pub target: Seconds,
    pub current: Seconds,
    pub error: Seconds,
    pub iteration: usize,
}

impl SeekState {
    fn measure(target: Seconds, current: Seconds, iteration: usize) -> Self {
        Self {
            target,
            current,
            error: target - current,
            iteration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipePlan {
    pub from: Point,
    pub to: Point,
    pub duration_ms: u32,
}

impl SwipePlan {
    pub fn distance(&self) -> i32 {
        (self.to.x - self.from.x).abs()
    }
}

/// Swipe that moves the timeline by `error` seconds, starting on the
/// playhead. Positive error (target ahead) drags the track left.
pub fn plan_swipe(error: Seconds, constants: &CalibrationConstants, policy: &SeekPolicy) -> SwipePlan {
    let anchor = constants.anchor;
    let screen_width = policy.screen_width.unwrap_or(anchor.x * 2);
    let wanted = constants.seconds_to_px(error.abs()).max(1);

    let to_x = if error > 0.0 {
        let max_travel = (anchor.x - policy.safe_margin_px).max(1);
        anchor.x - wanted.min(max_travel)
    } else {
        let max_travel = (screen_width - anchor.x - policy.safe_margin_px).max(1);
        anchor.x + wanted.min(max_travel)
    };

    let distance = (to_x - anchor.x).unsigned_abs() as f64;
    let duration_ms = if error.abs() < policy.near_target_secs {
        policy.near_target_duration_ms
    } else {
        ((distance / policy.speed_px_per_ms) as u32)
            .clamp(policy.min_duration_ms, policy.max_duration_ms)
    };

    SwipePlan {
        from: anchor,
        to: Point::new(to_x, anchor.y),
        duration_ms,
    }
}

impl Engine {
    /// Drives the displayed play position to `target`.
    ///
    /// Makes at most `max_iterations` corrective swipes, then measures once
    /// more. Fails only when uncalibrated, on a device error, or when the
    /// time readout is not on screen.
    pub async fn seek(
        &self,
        store: &TimelineStore,
        target: Seconds,
        tolerance: Seconds,
    ) -> Result<SeekOutcome> {
        let constants = store.constants()?;
        let policy = &self.config().seek;
        info!(
            "seeking {:.2}s from playhead ({}, {})",
            target, constants.anchor.x, constants.anchor.y
        );

        for iteration in 0..policy.max_iterations {
            let snapshot = self.snapshot().await?;
            let state = SeekState::measure(
                target,
                read_time_from(&snapshot, &self.config().ids)?,
                iteration,
            );
            if state.error.abs() < tolerance {
                debug!("arrived at {:.2}s after {} swipes", state.current, iteration);
                return Ok(SeekOutcome::Converged {
                    time: state.current,
                    iterations: iteration,
                });
            }

            let swipe = plan_swipe(state.error, &constants, policy);
            debug!(
                "step {}: current={:.2}s error={:.2}s swipe {}px in {}ms",
                state.iteration + 1,
                state.current,
                state.error,
                swipe.distance(),
                swipe.duration_ms
            );
            self.driver()
                .swipe(swipe.from.x, swipe.from.y, swipe.to.x, swipe.to.y, swipe.duration_ms)
                .await?;
            self.settle(self.config().timing.seek_settle_ms).await;
        }

        let current = self.read_time().await?;
        let residual = target - current;
        if residual.abs() < tolerance {
            return Ok(SeekOutcome::Converged {
                time: current,
                iterations: policy.max_iterations,
            });
        }
        warn!(
            "stopped after {} steps at {:.2}s (target {:.2}s)",
            policy.max_iterations, current, target
        );
        Ok(SeekOutcome::GivenUp {
            time: current,
            residual,
        })
    }
}
