/// Snapshot parsing for the two formats we get from devices:
/// droidrun-style JSON state and raw `uiautomator dump` XML.
///
/// Elements whose bounds cannot be parsed are dropped from the snapshot.
/// A malformed element never fails the whole snapshot.
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Deserialize;
use tracing::debug;

use crate::{Bounds, DeviceError, Result, UiElement};

#[derive(Debug, Clone, Deserialize)]
struct RawElement {
    index: Option<usize>,
    #[serde(rename = "resourceId", alias = "resource_id", default)]
    resource_id: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    bounds: Option<String>,
    #[serde(default)]
    children: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawState {
    Elements(Vec<RawElement>),
    Wrapped { a11y_tree: Vec<RawElement> },
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn flatten_into(raw: RawElement, counter: &mut usize, out: &mut Vec<UiElement>) {
    let index = raw.index.unwrap_or(*counter);
    *counter += 1;

    match raw.bounds.as_deref().map(str::parse::<Bounds>) {
        Some(Ok(bounds)) => out.push(UiElement {
            index,
            resource_id: non_empty(raw.resource_id),
            text: non_empty(raw.text),
            bounds,
        }),
        Some(Err(e)) => debug!("skipping element {}: {}", index, e),
        None => debug!("skipping element {}: no bounds", index),
    }

    for child in raw.children {
        flatten_into(child, counter, out);
    }
}

/// Parses a JSON UI state: either a bare element array or an object with an
/// `a11y_tree` array. Nested `children` are flattened in pre-order.
pub fn parse_snapshot_json(json: &str) -> Result<Vec<UiElement>> {
    let state: RawState =
        serde_json::from_str(json).map_err(|e| DeviceError::Parse(e.to_string()))?;
    let roots = match state {
        RawState::Elements(elements) => elements,
        RawState::Wrapped { a11y_tree } => a11y_tree,
    };

    let mut out = Vec::new();
    let mut counter = 0;
    for raw in roots {
        flatten_into(raw, &mut counter, &mut out);
    }
    Ok(out)
}

/// Cuts the `<hierarchy>` document out of `exec-out uiautomator dump /dev/tty`
/// output, which appends a status line after the XML.
pub fn extract_hierarchy(output: &str) -> Option<&str> {
    let start = output.find("<?xml").or_else(|| output.find("<hierarchy"))?;
    let end = output.rfind("</hierarchy>")? + "</hierarchy>".len();
    (start < end).then(|| &output[start..end])
}

fn node_element(e: &BytesStart<'_>, index: usize) -> Result<Option<UiElement>> {
    let mut resource_id = None;
    let mut text = None;
    let mut bounds = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| DeviceError::Parse(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| DeviceError::Parse(e.to_string()))?
            .into_owned();
        match attr.key.as_ref() {
            b"resource-id" => resource_id = Some(value),
            b"text" => text = Some(value),
            b"bounds" => bounds = Some(value),
            _ => {}
        }
    }

    let bounds = match bounds.as_deref().map(str::parse::<Bounds>) {
        Some(Ok(b)) => b,
        Some(Err(e)) => {
            debug!("skipping node {}: {}", index, e);
            return Ok(None);
        }
        None => return Ok(None),
    };

    Ok(Some(UiElement {
        index,
        resource_id: non_empty(resource_id),
        text: non_empty(text),
        bounds,
    }))
}

/// Parses a uiautomator XML dump. The XML `index` attribute is only the
/// sibling position, so elements are numbered by document order instead.
pub fn parse_uiautomator_xml(xml: &str) -> Result<Vec<UiElement>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut out = Vec::new();
    let mut counter = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"node" => {
                if let Some(el) = node_element(&e, counter)? {
                    out.push(el);
                }
                counter += 1;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(DeviceError::Parse(e.to_string())),
        }
    }
    Ok(out)
}
