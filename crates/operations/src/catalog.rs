/// Static lookup tables: effect name → category, transition type → position
/// in the transition strip.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{OperationError, Result};

const BUILTIN_EFFECTS: &[(&str, &[&str])] = &[
    ("Basic", &["Slow Zoom", "Zoom Out", "Tremble", "Thrill", "Roll"]),
    ("Glitch", &["Glitch", "Noise", "RGB"]),
    ("Vibrate", &["Strobe", "Flash", "Flow", "Flicker", "Flip", "Leap"]),
    ("Shake", &["Node", "Flutter", "Bass", "Shake", "Cam Shake"]),
    ("Fade", &["White", "Black", "Mosiac"]),
    ("Film", &["Focus", "Zoom", "Darken"]),
    ("Retro", &["REC", "VHS"]),
    ("Blur", &["Circle", "Diamond"]),
    ("Analog", &["Date", "Shorts", "Split"]),
    ("Split", &["Two", "Four", "Nine"]),
    ("Glass", &["Shatter", "Shard"]),
];

const BUILTIN_TRANSITIONS: &[&str] = &[
    "none",
    "mix",
    "fade",
    "blur",
    "circlefade",
    "wipe right",
    "wipe left",
    "wipe down",
    "wipe up",
    "slide right",
    "slide left",
    "slide down",
    "slide up",
];

fn read_catalog(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| OperationError::Catalog(format!("{}: {}", path.display(), e)))
}

/// A resolved effect: its display name, category, and the category's first
/// effect, which is used to find the row the effect grid scrolls on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectEntry {
    pub name: String,
    pub category: String,
    pub group_anchor: String,
}

/// Effect name → category, in the order the editor lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectCatalog {
    #[serde(rename = "Effects")]
    effects: IndexMap<String, String>,
}

impl Default for EffectCatalog {
    fn default() -> Self {
        let effects = BUILTIN_EFFECTS
            .iter()
            .flat_map(|(category, names)| {
                names
                    .iter()
                    .map(move |name| (name.to_string(), category.to_string()))
            })
            .collect();
        Self { effects }
    }
}

impl EffectCatalog {
    /// Parses `{"Effects": {"Name": "Category", ...}}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| OperationError::Catalog(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json_str(&read_catalog(path)?)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Case-insensitive lookup.
    pub fn resolve(&self, name: &str) -> Result<EffectEntry> {
        let wanted = name.to_lowercase();
        let (name, category) = self
            .effects
            .iter()
            .find(|(k, _)| k.to_lowercase() == wanted)
            .ok_or_else(|| OperationError::UnknownEffect(name.to_string()))?;
        let group_anchor = self
            .effects
            .iter()
            .find(|(_, v)| *v == category)
            .map(|(k, _)| k.clone())
            .unwrap_or_else(|| name.clone());
        Ok(EffectEntry {
            name: name.clone(),
            category: category.clone(),
            group_anchor,
        })
    }

    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for category in self.effects.values() {
            if !seen.contains(&category.as_str()) {
                seen.push(category);
            }
        }
        seen
    }
}

/// Transition type → zero-based position in the transition strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionCatalog {
    ordinals: IndexMap<String, usize>,
}

impl Default for TransitionCatalog {
    fn default() -> Self {
        let ordinals = BUILTIN_TRANSITIONS
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i))
            .collect();
        Self { ordinals }
    }
}

impl TransitionCatalog {
    /// Parses `{"type": ordinal, ...}`. Keys are matched case-insensitively.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: IndexMap<String, usize> =
            serde_json::from_str(json).map_err(|e| OperationError::Catalog(e.to_string()))?;
        let ordinals = raw
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Ok(Self { ordinals })
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json_str(&read_catalog(path)?)
    }

    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }

    pub fn ordinal(&self, transition: &str) -> Result<usize> {
        self.ordinals
            .get(&transition.to_lowercase())
            .copied()
            .ok_or_else(|| OperationError::UnknownTransition(transition.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ordinals.keys().map(String::as_str)
    }
}
