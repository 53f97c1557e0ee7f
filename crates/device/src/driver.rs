use async_trait::async_trait;

use crate::{Result, UiElement};

/// Blocking remote control of the device. Calls never overlap: callers
/// await each one before issuing the next.
#[async_trait]
pub trait DeviceDriver: Send + Sync {
    /// Current UI state as a flat, pre-ordered element list.
    async fn snapshot(&self) -> Result<Vec<UiElement>>;

    async fn tap(&self, x: i32, y: i32) -> Result<()>;

    async fn swipe(&self, x1: i32, y1: i32, x2: i32, y2: i32, duration_ms: u32) -> Result<()>;

    /// Types into the element with `target_index` from the most recent snapshot.
    async fn type_text(&self, text: &str, target_index: usize) -> Result<()>;

    /// Taps the center of an element's bounds.
    async fn tap_element(&self, element: &UiElement) -> Result<()> {
        let (x, y) = element.bounds.center();
        self.tap(x, y).await
    }
}
