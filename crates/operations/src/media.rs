use engine::{layout, EngineError};
use tracing::{debug, info};

use crate::{Orchestrator, Result};

impl Orchestrator {
    /// Selects every tile in the media picker, in grid order, and confirms.
    /// Returns how many tiles were selected.
    pub async fn select_media(&self) -> Result<usize> {
        let engine = self.engine();
        let ids = &engine.config().ids;

        let snapshot = engine.snapshot().await?;
        let tiles = layout::gallery_items(&snapshot, &ids.gallery);
        if tiles.is_empty() {
            return Err(EngineError::NotFound("media gallery".into()).into());
        }
        for tile in &tiles {
            debug!("selecting tile at index {}", tile.index);
            engine.driver().tap_element(tile).await?;
        }
        engine
            .tap_by_id(&ids.gallery_confirm, "media confirm button")
            .await?;
        info!("selected {} media items", tiles.len());
        Ok(tiles.len())
    }
}
