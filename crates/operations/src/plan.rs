use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::{OperationError, Result};

/// One edit, as emitted by the planner: `{"tool": ..., "args": {...}}`.
/// Clip indices are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", content = "args", rename_all = "snake_case")]
pub enum PlanCommand {
    ApplyEffect {
        image_idx: usize,
        effects_list: Vec<String>,
    },
    AddTransition {
        image1_idx: usize,
        image2_idx: usize,
        transition_type: String,
        #[serde(default)]
        all_apply: bool,
    },
    ChangeDuration {
        image_idx: usize,
        duration: f64,
    },
}

impl PlanCommand {
    pub fn tool(&self) -> &'static str {
        match self {
            Self::ApplyEffect { .. } => "apply_effect",
            Self::AddTransition { .. } => "add_transition",
            Self::ChangeDuration { .. } => "change_duration",
        }
    }
}

impl fmt::Display for PlanCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplyEffect {
                image_idx,
                effects_list,
            } => write!(f, "apply_effect(clip {}, [{}])", image_idx, effects_list.join(", ")),
            Self::AddTransition {
                image1_idx,
                image2_idx,
                transition_type,
                all_apply,
            } => write!(
                f,
                "add_transition({}-{}, {}{})",
                image1_idx,
                image2_idx,
                transition_type,
                if *all_apply { ", all" } else { "" }
            ),
            Self::ChangeDuration {
                image_idx,
                duration,
            } => write!(f, "change_duration(clip {}, {}s)", image_idx, duration),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_process: Option<String>,
    pub plan: Vec<PlanCommand>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.plan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlanFile {
    Full(Plan),
    Bare(Vec<PlanCommand>),
}

/// Accepts a full plan object or a bare command array. Markdown code
/// fences around the JSON are ignored.
pub fn parse_plan(text: &str) -> Result<Plan> {
    let json = text.replace("```json", "").replace("```", "");
    let file: PlanFile =
        serde_json::from_str(json.trim()).map_err(|e| OperationError::Plan(e.to_string()))?;
    Ok(match file {
        PlanFile::Full(plan) => plan,
        PlanFile::Bare(commands) => Plan {
            thought_process: None,
            plan: commands,
        },
    })
}

pub fn load_plan(path: &Path) -> Result<Plan> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| OperationError::Plan(format!("{}: {}", path.display(), e)))?;
    parse_plan(&text)
}
