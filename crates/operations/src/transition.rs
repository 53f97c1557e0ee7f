use engine::{layout, EditPolicy, EngineError};
use serde::{Deserialize, Serialize};
use timeline::{Seconds, TimelineModel, TimelineStore};
use tracing::{debug, info, warn};

use crate::{OperationError, Orchestrator, Result, TransitionCatalog};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// Clip before the cut (1-based).
    pub first: usize,
    pub second: usize,
    pub transition: String,
    /// Confirm through the editor's apply-to-all button. The model is
    /// still only charged at this junction.
    pub all_apply: bool,
}

/// Everything decided before touching the device.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub ordinal: usize,
    pub length: Seconds,
    pub junction: usize,
    /// Model as it will be once the transition is applied.
    pub after: TimelineModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionApplied {
    pub transition: String,
    pub length: Seconds,
    pub junction: usize,
    pub all_apply: bool,
    pub durations: Vec<Seconds>,
}

/// Validates `request` against the model and catalog and computes the
/// resulting durations. A transition takes half its length from each side
/// of the cut; one that would leave a clip shorter than the minimum is
/// rejected.
pub fn plan_transition(
    model: &TimelineModel,
    request: &TransitionRequest,
    catalog: &TransitionCatalog,
    policy: &EditPolicy,
) -> Result<TransitionPlan> {
    if request.second != request.first + 1 {
        return Err(OperationError::Validation(format!(
            "can only transition adjacent clips, got {} and {}",
            request.first, request.second
        )));
    }
    let ordinal = catalog.ordinal(&request.transition)?;
    model.slot(request.first)?;
    model.slot(request.second)?;

    let length = policy.transition_secs;
    let junction = request.first;

    let mut after = model.clone();
    after.apply_transition(junction, length)?;
    if let Some((slot, secs)) = after
        .durations()
        .iter()
        .enumerate()
        .find(|(_, secs)| **secs < policy.min_clip_secs)
    {
        return Err(OperationError::Validation(format!(
            "transition '{}' would shorten clip {} to {:.2}s (minimum {}s)",
            request.transition,
            slot + 1,
            secs,
            policy.min_clip_secs
        )));
    }

    Ok(TransitionPlan {
        ordinal,
        length,
        junction,
        after,
    })
}

impl Orchestrator {
    /// Puts a transition on the cut between two adjacent clips.
    pub async fn add_transition(
        &self,
        store: &mut TimelineStore,
        request: &TransitionRequest,
    ) -> Result<TransitionApplied> {
        let engine = self.engine();
        let config = engine.config();
        let plan = plan_transition(store.model()?, request, self.transitions(), &config.edit)?;

        info!(
            "adding '{}' between clips {} and {}",
            request.transition, request.first, request.second
        );
        let point = engine.project_junction(store, request.first).await?;
        engine.tap_at(&point).await?;
        engine.settle(config.timing.menu_settle_ms).await;

        self.select_transition_thumbnail(plan.ordinal).await?;

        if request.all_apply {
            engine
                .tap_by_id(&config.ids.transition_apply_all, "apply-to-all button")
                .await?;
            engine.settle(config.timing.menu_settle_ms).await;
            match engine.find_by_id(&config.ids.apply_all_confirm).await? {
                Some(confirm) => engine.driver().tap_element(&confirm).await?,
                None => warn!("apply-to-all confirmation not shown"),
            }
        } else {
            engine
                .tap_by_id(&config.ids.transition_apply, "apply button")
                .await?;
        }

        let durations = plan.after.durations().to_vec();
        *store.model_mut()? = plan.after;
        info!("durations now {:?}", durations);

        Ok(TransitionApplied {
            transition: request.transition.clone(),
            length: plan.length,
            junction: plan.junction,
            all_apply: request.all_apply,
            durations,
        })
    }

    /// Taps the `ordinal`-th thumbnail of the transition strip.
    ///
    /// When the thumbnail is past the visible ones the strip is swiped one
    /// page and the row is read again at the same height. Each swipe is
    /// assumed to reveal a fresh page of thumbnails.
    async fn select_transition_thumbnail(&self, ordinal: usize) -> Result<()> {
        let engine = self.engine();
        let config = engine.config();
        let scan = &config.scan;
        let label = &config.labels.transition_category;

        let snapshot = engine.snapshot().await?;
        let mut row = layout::thumbnail_row(&snapshot, label, scan.row_tolerance_px)
            .ok_or_else(|| EngineError::NotFound(format!("'{}' transition row", label)))?;
        let mut position = ordinal;

        for page in 0..=scan.max_strip_pages {
            if row.is_empty() {
                break;
            }
            if let Some(thumb) = row.get(position) {
                debug!("tapping thumbnail {} of {} (page {})", position, row.len(), page);
                engine.driver().tap_element(thumb).await?;
                return Ok(());
            }
            if page == scan.max_strip_pages {
                break;
            }

            position -= row.len();
            let y = row.top + scan.strip_row_offset_px;
            debug!("thumbnail {} not in view, paging strip", ordinal);
            engine
                .driver()
                .swipe(scan.swipe_from_x, y, scan.strip_swipe_to_x, y, scan.swipe_duration_ms)
                .await?;
            engine.settle(config.timing.scan_settle_ms).await;

            let snapshot = engine.snapshot().await?;
            row = layout::row_at(&snapshot, row.top, scan.row_tolerance_px, label);
        }

        Err(EngineError::NotFound(format!("transition thumbnail {}", ordinal)).into())
    }
}
