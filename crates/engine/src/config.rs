/// Engine configuration. Every field has a default matching the InShot
/// editor, so a config file only needs the values it overrides.
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::EngineError;

const INSHOT_ID_PREFIX: &str = "com.camerasideas.instashot:id/";

fn inshot_id(name: &str) -> String {
    format!("{INSHOT_ID_PREFIX}{name}")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ids: UiIds,
    pub labels: UiLabels,
    pub calibration: CalibrationPolicy,
    pub seek: SeekPolicy,
    pub projection: ProjectionPolicy,
    pub scan: ScanPolicy,
    pub timing: Timing,
    pub edit: EditPolicy,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Same config with every settle delay set to zero. Used against
    /// simulated devices that settle instantly.
    pub fn without_delays(mut self) -> Self {
        self.timing = Timing {
            seek_settle_ms: 0,
            scan_settle_ms: 0,
            menu_settle_ms: 0,
            input_settle_ms: 0,
            drag_settle_ms: 0,
        };
        self
    }
}

/// Resource identifiers of the target app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiIds {
    pub time_readout: String,
    pub total_duration: String,
    pub reference_segment: String,
    pub toolbar_title: String,
    pub duration_edit: String,
    pub duration_input: String,
    pub duration_ok: String,
    pub apply: String,
    pub add_effect: String,
    pub effect_clip_end: String,
    pub transition_apply: String,
    pub transition_apply_all: String,
    pub apply_all_confirm: String,
    pub gallery: String,
    pub gallery_confirm: String,
}

impl Default for UiIds {
    fn default() -> Self {
        Self {
            time_readout: inshot_id("current_position"),
            total_duration: inshot_id("total_clips_duration"),
            reference_segment: inshot_id("layout"),
            toolbar_title: inshot_id("title"),
            duration_edit: inshot_id("btn_edit_duration"),
            duration_input: inshot_id("edit_text"),
            duration_ok: inshot_id("btn_ok"),
            apply: inshot_id("btn_apply"),
            add_effect: inshot_id("btn_add_effect"),
            effect_clip_end: inshot_id("textClipEnd"),
            transition_apply: inshot_id("btnApply"),
            transition_apply_all: inshot_id("btnApplyAll"),
            apply_all_confirm: inshot_id("applyAllTextView"),
            gallery: inshot_id("wallRecyclerView"),
            gallery_confirm: inshot_id("applySelectVideo"),
        }
    }
}

/// Literal texts the engine searches for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiLabels {
    pub duration_tool: String,
    pub effect_tool: String,
    /// First toolbar entry; seeing it means the toolbar is fully rewound.
    pub toolbar_start: String,
    /// Category label above the transition thumbnails.
    pub transition_category: String,
    /// Always-present effect category used to find the category bar row.
    pub effect_category_anchor: String,
}

impl Default for UiLabels {
    fn default() -> Self {
        Self {
            duration_tool: "Duration".into(),
            effect_tool: "Effect".into(),
            toolbar_start: "CANVAS".into(),
            transition_category: "BASIC".into(),
            effect_category_anchor: "Basic".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationPolicy {
    /// Initial clip length and real duration of the reference window.
    pub default_clip_secs: f64,
    pub min_segments: usize,
    /// Positions (among reference segments) whose widths span the window.
    pub measured_segments: Vec<usize>,
}

impl Default for CalibrationPolicy {
    fn default() -> Self {
        Self {
            default_clip_secs: 5.0,
            min_segments: 4,
            measured_segments: vec![1, 2, 3],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekPolicy {
    pub max_iterations: usize,
    pub fine_tolerance_secs: f64,
    pub coarse_tolerance_secs: f64,
    pub safe_margin_px: i32,
    /// Defaults to twice the anchor x (playhead centered).
    pub screen_width: Option<i32>,
    pub speed_px_per_ms: f64,
    pub min_duration_ms: u32,
    pub max_duration_ms: u32,
    pub near_target_secs: f64,
    pub near_target_duration_ms: u32,
}

impl Default for SeekPolicy {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            fine_tolerance_secs: 0.2,
            coarse_tolerance_secs: 3.5,
            safe_margin_px: 100,
            screen_width: None,
            speed_px_per_ms: 2.0,
            min_duration_ms: 300,
            max_duration_ms: 2000,
            near_target_secs: 0.3,
            near_target_duration_ms: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionPolicy {
    /// Shift left of the computed x so taps land inside the target.
    pub tap_nudge_px: i32,
    /// Distance above the track's bottom edge for handle-row taps.
    pub handle_inset_px: i32,
}

impl Default for ProjectionPolicy {
    fn default() -> Self {
        Self {
            tap_nudge_px: 5,
            handle_inset_px: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanPolicy {
    pub max_swipes: usize,
    pub toolbar_max_swipes: usize,
    pub toolbar_rewind_swipes: usize,
    pub swipe_from_x: i32,
    pub swipe_to_x: i32,
    pub swipe_duration_ms: u32,
    /// Row swiped before the anchor label has been seen.
    pub default_row_y: i32,
    /// Vertical slack when grouping elements into one row.
    pub row_tolerance_px: i32,
    pub strip_swipe_to_x: i32,
    pub strip_row_offset_px: i32,
    pub max_strip_pages: usize,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            max_swipes: 5,
            toolbar_max_swipes: 8,
            toolbar_rewind_swipes: 5,
            swipe_from_x: 900,
            swipe_to_x: 200,
            swipe_duration_ms: 600,
            default_row_y: 1250,
            row_tolerance_px: 2,
            strip_swipe_to_x: 100,
            strip_row_offset_px: 50,
            max_strip_pages: 3,
        }
    }
}

/// Fixed post-gesture waits, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub seek_settle_ms: u64,
    pub scan_settle_ms: u64,
    pub menu_settle_ms: u64,
    pub input_settle_ms: u64,
    pub drag_settle_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            seek_settle_ms: 200,
            scan_settle_ms: 1000,
            menu_settle_ms: 500,
            input_settle_ms: 100,
            drag_settle_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditPolicy {
    pub min_clip_secs: f64,
    pub transition_secs: f64,
    pub max_effects: usize,
    /// Clips longer than this use the direct extend-to-end action.
    pub extend_threshold_secs: f64,
    /// Length the editor gives a freshly added effect.
    pub effect_default_secs: f64,
    /// Gap right of the effect bar where its end handle sits.
    pub handle_gap_px: i32,
    pub drag_duration_ms: u32,
}

impl Default for EditPolicy {
    fn default() -> Self {
        Self {
            min_clip_secs: 1.5,
            transition_secs: 1.0,
            max_effects: 2,
            extend_threshold_secs: 3.5,
            effect_default_secs: 3.0,
            handle_gap_px: 5,
            drag_duration_ms: 2000,
        }
    }
}
