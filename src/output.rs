use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Serialize with one tab per indent level, the shape all generated json
/// files are published in.
pub fn to_json_tab(value: &impl Serialize) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize to json")?;
    String::from_utf8(buf).context("Serialized json is not valid utf-8")
}

pub async fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let body = to_json_tab(value)?;
    tokio::fs::write(path, body)
        .await
        .context(format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
