/// Bounded search over horizontally scrolling rows: category bars, effect
/// grids and the bottom toolbar.
use device::UiElement;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{Engine, EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanArea {
    /// Category bar; every text is a candidate.
    Menu,
    /// Item grid; only upper-case captions are candidates, which keeps a
    /// category tab from matching an item of the same name.
    Content,
}

impl ScanArea {
    fn admits(self, text: &str) -> bool {
        match self {
            Self::Menu => true,
            Self::Content => is_upper_label(text),
        }
    }
}

/// True when `text` has at least one cased letter and no lower-case ones.
pub fn is_upper_label(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

fn toolbar_match<'a>(items: &[&'a UiElement], label: &str) -> Option<&'a UiElement> {
    let label = label.to_uppercase();
    items
        .iter()
        .copied()
        .find(|el| el.text().to_uppercase() == label)
}

impl Engine {
    /// Looks for `target` in the visible row, swiping right-to-left between
    /// attempts. The swipe row is taken from `anchor` once it has been seen,
    /// and is `default_row_y` until then.
    ///
    /// Returns `Ok(false)` after `max_swipes` misses.
    pub async fn find_and_select(
        &self,
        target: &str,
        anchor: Option<&str>,
        area: ScanArea,
    ) -> Result<bool> {
        let scan = &self.config().scan;
        let mut row_y: Option<i32> = None;

        for attempt in 0..scan.max_swipes {
            let snapshot = self.snapshot().await?;
            for el in snapshot.iter().filter(|el| area.admits(el.text())) {
                if let Some(anchor) = anchor {
                    if el.text_eq_ignore_case(anchor) {
                        row_y = Some(el.bounds.mid_y());
                    }
                }
                if el.text_eq_ignore_case(target) {
                    info!("found '{}' at index {}", target, el.index);
                    self.driver().tap_element(el).await?;
                    return Ok(true);
                }
            }

            let y = row_y.unwrap_or(scan.default_row_y);
            debug!(
                "'{}' not visible, swiping row y={} (attempt {})",
                target,
                y,
                attempt + 1
            );
            self.driver()
                .swipe(scan.swipe_from_x, y, scan.swipe_to_x, y, scan.swipe_duration_ms)
                .await?;
            self.settle(self.config().timing.scan_settle_ms).await;
        }

        warn!("'{}' not found after {} swipes", target, scan.max_swipes);
        Ok(false)
    }

    /// Finds a toolbar entry by label.
    ///
    /// The toolbar is first rewound until its first entry shows, so the
    /// forward scan always starts from the same place.
    pub async fn find_toolbar_item(&self, tool: &str) -> Result<UiElement> {
        let scan = &self.config().scan;
        let toolbar_id = &self.config().ids.toolbar_title;
        let start_marker = &self.config().labels.toolbar_start;
        let mut toolbar_y: Option<i32> = None;
        info!("looking for toolbar item '{}'", tool);

        for _ in 0..scan.toolbar_rewind_swipes {
            let snapshot = self.snapshot().await?;
            let items: Vec<&UiElement> = snapshot.iter().filter(|el| el.has_id(toolbar_id)).collect();
            let Some(first) = items.first() else {
                break;
            };
            toolbar_y.get_or_insert(first.bounds.mid_y());

            if let Some(found) = toolbar_match(&items, tool) {
                debug!("found '{}' while rewinding", tool);
                return Ok(found.clone());
            }
            if toolbar_match(&items, start_marker).is_some() {
                debug!("toolbar at start");
                break;
            }

            if let Some(y) = toolbar_y {
                self.driver()
                    .swipe(scan.swipe_to_x, y, scan.swipe_from_x, y, scan.swipe_duration_ms)
                    .await?;
                self.settle(self.config().timing.scan_settle_ms).await;
            }
        }

        for attempt in 0..scan.toolbar_max_swipes {
            let snapshot = self.snapshot().await?;
            let items: Vec<&UiElement> = snapshot.iter().filter(|el| el.has_id(toolbar_id)).collect();
            if let Some(first) = items.first() {
                toolbar_y.get_or_insert(first.bounds.mid_y());
            }
            if let Some(found) = toolbar_match(&items, tool) {
                info!("found '{}' at index {}", tool, found.index);
                return Ok(found.clone());
            }

            let y = toolbar_y.ok_or_else(|| EngineError::NotFound("toolbar row".into()))?;
            debug!("'{}' not visible, swiping toolbar (attempt {})", tool, attempt + 1);
            self.driver()
                .swipe(scan.swipe_from_x, y, scan.swipe_to_x, y, scan.swipe_duration_ms)
                .await?;
            self.settle(self.config().timing.scan_settle_ms).await;
        }

        Err(EngineError::NotFound(format!("toolbar tool '{}'", tool)))
    }

    /// Finds and taps a toolbar entry.
    pub async fn open_tool(&self, tool: &str) -> Result<UiElement> {
        let item = self.find_toolbar_item(tool).await?;
        self.driver().tap_element(&item).await?;
        self.settle(self.config().timing.menu_settle_ms).await;
        Ok(item)
    }
}
