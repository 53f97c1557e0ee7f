use device::find_by_text;
use engine::{layout, EngineError, ScanArea};
use serde::{Deserialize, Serialize};
use timeline::{Seconds, TimelineStore};
use tracing::{info, warn};

use crate::{EffectEntry, OperationError, Orchestrator, Result};

/// How an applied effect was stretched over its clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Extension {
    /// Handle selected, then the extend-to-clip-end action.
    ToClipEnd,
    /// End handle dragged by `px` pixels.
    Dragged { px: i32 },
    /// The effect bar could not be located; left at its default length.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedEffect {
    pub name: String,
    pub category: String,
    pub extension: Extension,
}

/// Horizontal drag that stretches a fresh effect starting at `start` to end
/// at `end`.
pub fn drag_distance(start: Seconds, end: Seconds, default_secs: Seconds, px_per_sec: f64) -> i32 {
    ((end - (start + default_secs)) * px_per_sec) as i32
}

impl Orchestrator {
    /// Applies up to `max_effects` effects to `clip`, each covering the
    /// whole clip.
    pub async fn apply_effect(
        &self,
        store: &TimelineStore,
        clip: usize,
        names: &[String],
    ) -> Result<Vec<AppliedEffect>> {
        let engine = self.engine();
        let config = engine.config();
        if names.is_empty() {
            return Err(OperationError::Validation("no effects requested".into()));
        }
        if names.len() > config.edit.max_effects {
            return Err(OperationError::Validation(format!(
                "at most {} effects can be stacked, got {}",
                config.edit.max_effects,
                names.len()
            )));
        }
        let entries = names
            .iter()
            .map(|name| self.effects().resolve(name))
            .collect::<Result<Vec<_>>>()?;
        let (start, end) = store.model()?.clip_range(clip)?;

        info!("applying {:?} to clip {}", names, clip);
        engine.tap_clip(store, clip).await?;
        engine.open_tool(&config.labels.effect_tool).await?;

        let mut applied = Vec::with_capacity(entries.len());
        for entry in entries {
            let extension = self.add_one_effect(store, &entry, start, end).await?;
            info!("applied '{}' ({:?})", entry.name, extension);
            applied.push(AppliedEffect {
                name: entry.name,
                category: entry.category,
                extension,
            });
        }

        engine.tap_by_id(&config.ids.apply, "apply button").await?;
        Ok(applied)
    }

    async fn add_one_effect(
        &self,
        store: &TimelineStore,
        entry: &EffectEntry,
        start: Seconds,
        end: Seconds,
    ) -> Result<Extension> {
        let engine = self.engine();
        let config = engine.config();

        let seek = engine
            .seek(store, start, config.seek.fine_tolerance_secs)
            .await?;
        engine
            .tap_by_id(&config.ids.add_effect, "add effect button")
            .await?;
        engine.settle(config.timing.menu_settle_ms).await;

        let anchor = &config.labels.effect_category_anchor;
        if !engine
            .find_and_select(&entry.category, Some(anchor.as_str()), ScanArea::Menu)
            .await?
        {
            return Err(EngineError::NotFound(format!("effect group '{}'", entry.category)).into());
        }
        if !engine
            .find_and_select(&entry.name, Some(entry.group_anchor.as_str()), ScanArea::Content)
            .await?
        {
            return Err(EngineError::NotFound(format!(
                "effect '{}' in group '{}'",
                entry.name, entry.category
            ))
            .into());
        }
        engine.tap_by_id(&config.ids.apply, "apply button").await?;

        let snapshot = engine.snapshot().await?;
        let Some(label) = find_by_text(&snapshot, &entry.name) else {
            warn!("applied '{}' but its label is not visible", entry.name);
            return Ok(Extension::Skipped);
        };
        let Some(bar) = layout::effect_bar_for_label(&snapshot, label) else {
            warn!("no effect bar for label at index {}", label.index);
            return Ok(Extension::Skipped);
        };
        let handle_x = bar.bounds.x2 + config.edit.handle_gap_px;
        let handle_y = bar.bounds.mid_y();

        if end - start > config.edit.extend_threshold_secs {
            engine.driver().tap(handle_x, handle_y).await?;
            engine.settle(config.timing.menu_settle_ms).await;
            engine
                .tap_by_id(&config.ids.effect_clip_end, "extend to clip end")
                .await?;
            Ok(Extension::ToClipEnd)
        } else {
            let constants = store.constants()?;
            let px = drag_distance(
                seek.achieved(),
                end,
                config.edit.effect_default_secs,
                constants.px_per_sec,
            );
            info!("short clip ({:.1}s), dragging handle {}px", end - start, px);
            engine
                .driver()
                .swipe(
                    handle_x,
                    handle_y,
                    handle_x + px,
                    handle_y,
                    config.edit.drag_duration_ms,
                )
                .await?;
            engine.settle(config.timing.drag_settle_ms).await;
            Ok(Extension::Dragged { px })
        }
    }
}
