//! Flow documents as they appear on disk or in controller replies

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bvc_openflow::{Document, FlowEntry, FLOW_PAYLOAD_KEY};
use serde_json::Value;
use tracing::debug;

const TABLE_KEY: &str = "flow-node-inventory:table";

/// Read a whole file, or stdin for `-`
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Decode every flow in `text`. Accepts a bare flow, a payload wrapper
/// (object or list) or a table document with one or more tables.
pub fn parse_flows(text: &str) -> Result<Vec<FlowEntry>> {
    let doc: Value = serde_json::from_str(text).context("Input is not JSON")?;

    let docs: Vec<&Value> = if let Some(tables) = doc.get(TABLE_KEY) {
        debug!("reading {} document", TABLE_KEY);
        let Some(tables) = tables.as_array() else {
            bail!("'{}' must be a list", TABLE_KEY);
        };
        tables
            .iter()
            .filter_map(|table| table.get("flow").and_then(Value::as_array))
            .flatten()
            .collect()
    } else if let Some(wrapped) = doc.get(FLOW_PAYLOAD_KEY) {
        match wrapped {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        }
    } else {
        vec![&doc]
    };

    docs.into_iter()
        .enumerate()
        .map(|(i, doc)| FlowEntry::from_document(doc).with_context(|| format!("Flow #{} is invalid", i)))
        .collect()
}

/// Decode exactly one flow
pub fn parse_single_flow(text: &str) -> Result<FlowEntry> {
    let mut flows = parse_flows(text)?;
    match flows.len() {
        1 => Ok(flows.remove(0)),
        n => bail!("Expected one flow, found {}", n),
    }
}
