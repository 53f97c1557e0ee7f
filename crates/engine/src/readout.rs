use device::UiElement;
use timeline::{parse_readout_time, Seconds};
use tracing::debug;

use crate::{EngineError, Result, UiIds};

/// First parseable time among elements carrying `resource_id`. Elements
/// with malformed text are skipped.
fn first_time_with_id(snapshot: &[UiElement], resource_id: &str) -> Result<Seconds> {
    for el in snapshot.iter().filter(|el| el.has_id(resource_id)) {
        match parse_readout_time(el.text()) {
            Ok(secs) => return Ok(secs),
            Err(e) => debug!("ignoring readout element {}: {}", el.index, e),
        }
    }
    Err(EngineError::ReadoutUnavailable)
}

/// Current play position shown under the preview.
pub fn read_time_from(snapshot: &[UiElement], ids: &UiIds) -> Result<Seconds> {
    first_time_with_id(snapshot, &ids.time_readout)
}

pub fn read_total_duration_from(snapshot: &[UiElement], ids: &UiIds) -> Result<Seconds> {
    first_time_with_id(snapshot, &ids.total_duration)
}
