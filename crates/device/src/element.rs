use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::DeviceError;

/// Pixel rectangle `(x1, y1)` top-left to `(x2, y2)` bottom-right.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Bounds {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn mid_x(&self) -> i32 {
        (self.x1 + self.x2) / 2
    }

    pub fn mid_y(&self) -> i32 {
        (self.y1 + self.y2) / 2
    }

    pub fn center(&self) -> (i32, i32) {
        (self.mid_x(), self.mid_y())
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

/// Accepts both `x1,y1,x2,y2` and the uiautomator form `[x1,y1][x2,y2]`.
impl FromStr for Bounds {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DeviceError::MalformedBounds(s.to_string());
        let normalized = s.trim().replace("][", ",").replace(['[', ']'], "");
        let coords = normalized
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| malformed())?;

        match coords.as_slice() {
            [x1, y1, x2, y2] => Ok(Self::new(*x1, *y1, *x2, *y2)),
            _ => Err(malformed()),
        }
    }
}

/// One element of a UI snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiElement {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub bounds: Bounds,
}

impl UiElement {
    /// Text or the empty string.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn has_id(&self, resource_id: &str) -> bool {
        self.resource_id.as_deref() == Some(resource_id)
    }

    pub fn text_eq_ignore_case(&self, target: &str) -> bool {
        self.text
            .as_deref()
            .is_some_and(|t| t.to_lowercase() == target.to_lowercase())
    }
}

pub fn find_by_id<'a>(snapshot: &'a [UiElement], resource_id: &str) -> Option<&'a UiElement> {
    snapshot.iter().find(|el| el.has_id(resource_id))
}

pub fn find_by_index(snapshot: &[UiElement], index: usize) -> Option<&UiElement> {
    snapshot.iter().find(|el| el.index == index)
}

pub fn find_by_text<'a>(snapshot: &'a [UiElement], text: &str) -> Option<&'a UiElement> {
    snapshot.iter().find(|el| el.text_eq_ignore_case(text))
}
