use engine::EngineError;
use serde::{Deserialize, Serialize};
use timeline::{Seconds, TimelineStore};
use tracing::{info, warn};

use crate::{OperationError, Orchestrator, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationChange {
    pub clip: usize,
    pub previous: Seconds,
    pub duration: Seconds,
}

/// Text typed into the duration field: `3.0`, `2.25`.
fn duration_text(secs: Seconds) -> String {
    if secs.fract() == 0.0 {
        format!("{:.1}", secs)
    } else {
        secs.to_string()
    }
}

impl Orchestrator {
    /// Sets `clip` (1-based) to `duration` seconds.
    ///
    /// Selects the clip, edits its duration through the Duration tool and
    /// reselects it so the timeline is left positioned on it.
    pub async fn change_duration(
        &self,
        store: &mut TimelineStore,
        clip: usize,
        duration: Seconds,
    ) -> Result<DurationChange> {
        let engine = self.engine();
        let config = engine.config();
        let min = config.edit.min_clip_secs;
        if !duration.is_finite() || duration < min {
            return Err(OperationError::Validation(format!(
                "duration {}s is below the minimum clip length {}s",
                duration, min
            )));
        }
        store.model()?.slot(clip)?;

        info!("changing clip {} duration to {}s", clip, duration);
        engine.tap_clip(store, clip).await?;
        engine.open_tool(&config.labels.duration_tool).await?;

        engine
            .tap_by_id(&config.ids.duration_edit, "duration edit button")
            .await?;
        engine.settle(config.timing.input_settle_ms).await;

        let input = engine
            .find_by_id(&config.ids.duration_input)
            .await?
            .ok_or_else(|| EngineError::NotFound("duration input field".into()))?;
        engine
            .driver()
            .type_text(&duration_text(duration), input.index)
            .await?;

        match engine.find_by_id(&config.ids.duration_ok).await? {
            Some(ok) => engine.driver().tap_element(&ok).await?,
            None => warn!("duration confirm button not found"),
        }

        let previous = store.model_mut()?.set_duration(clip, duration)?;
        info!("clip {} changed from {}s to {}s", clip, previous, duration);

        engine.settle(config.timing.menu_settle_ms).await;
        match engine.find_by_id(&config.ids.apply).await? {
            Some(apply) => engine.driver().tap_element(&apply).await?,
            None => warn!("apply button not found after duration edit"),
        }
        engine.settle(config.timing.menu_settle_ms).await;

        engine.tap_clip(store, clip).await?;

        Ok(DurationChange {
            clip,
            previous,
            duration,
        })
    }
}
