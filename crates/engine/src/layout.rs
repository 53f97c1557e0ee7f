//! Structural assumptions about the editor's element ordering.
//!
//! Each helper here encodes one fact about how the app lays out its view
//! tree. When the app changes a layout, this is the file to update.

use device::UiElement;

/// Thumbnails sharing one horizontal row, left to right.
#[derive(Debug, Clone)]
pub struct ThumbnailRow {
    /// Top edge all members are aligned on.
    pub top: i32,
    pub items: Vec<UiElement>,
}

impl ThumbnailRow {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&UiElement> {
        self.items.get(position)
    }
}

/// Row of thumbnails under a category label.
///
/// The first thumbnail is the second element after the label in document
/// order; its top edge defines the row. Members are elements after the
/// label whose top lies within `tolerance` pixels, minus the label itself.
pub fn thumbnail_row(snapshot: &[UiElement], label: &str, tolerance: i32) -> Option<ThumbnailRow> {
    let pos = snapshot.iter().position(|el| el.text() == label)?;
    let top = snapshot.get(pos + 2)?.bounds.y1;
    Some(row_at(&snapshot[pos..], top, tolerance, label))
}

/// Elements whose top is within `tolerance` of `top`, sorted by x.
pub fn row_at(snapshot: &[UiElement], top: i32, tolerance: i32, exclude_text: &str) -> ThumbnailRow {
    let mut items: Vec<UiElement> = snapshot
        .iter()
        .filter(|el| (el.bounds.y1 - top).abs() < tolerance && el.text() != exclude_text)
        .cloned()
        .collect();
    items.sort_by_key(|el| el.bounds.x1);
    ThumbnailRow { top, items }
}

/// The timeline bar an effect caption belongs to. The caption sits two
/// elements below its bar in the tree.
pub fn effect_bar_for_label<'a>(snapshot: &'a [UiElement], label: &UiElement) -> Option<&'a UiElement> {
    let bar_index = label.index.checked_sub(2)?;
    device::find_by_index(snapshot, bar_index)
}

/// Selectable tiles of the media picker.
///
/// Tiles follow the gallery container. Its first child is the blank camera
/// tile and is skipped; the grid ends at the first later element carrying a
/// resource id.
pub fn gallery_items<'a>(snapshot: &'a [UiElement], gallery_id: &str) -> Vec<&'a UiElement> {
    let Some(start) = snapshot.iter().position(|el| el.has_id(gallery_id)) else {
        return Vec::new();
    };
    let container = snapshot[start].index;
    snapshot[start + 1..]
        .iter()
        .filter(|el| el.index > container + 1)
        .take_while(|el| el.resource_id.is_none())
        .collect()
}
