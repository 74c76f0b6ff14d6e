use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::ProductEntry;
use crate::decoder::BundleUrlDecoder;

/// Partitions whose files are emitted in reverse snapshot order. No other
/// partition is reversed.
const REVERSED_PARTITIONS: &[(&str, &str)] = &[("portal", "7.2"), ("portal", "7.1")];

/// Flatten the keyed source document into a list, carrying each key into
/// its record's `name`. The list keeps the document's key order.
pub fn build_catalog(document: Map<String, Value>) -> Result<Vec<ProductEntry>> {
    let mut snapshot = Vec::with_capacity(document.len());
    for (name, value) in document {
        let mut entry: ProductEntry =
            serde_json::from_value(value).context(format!("Malformed product record {}", name))?;
        entry.name = name;
        snapshot.push(entry);
    }
    Ok(snapshot)
}

/// Replace both encoded url fields of every entry with their decoded form,
/// in list order, one blocking codec call per field. Entries without an
/// encoded field keep it absent.
pub fn decode_bundle_urls(
    snapshot: &mut [ProductEntry],
    decoder: &impl BundleUrlDecoder,
) -> Result<()> {
    let total = snapshot.len();
    log::info!("Decoding bundle urls of {} products", total);

    for (index, entry) in snapshot.iter_mut().enumerate() {
        let release_date = entry.release_date.clone().unwrap_or_default();

        if let Some(encoded) = entry.bundle_url.take() {
            let decoded = decoder
                .decode(&encoded, &release_date)
                .context(format!("Failed to decode the bundle url of {}", entry.name))?;
            entry.bundle_url = Some(decoded);
        }

        if let Some(encoded) = entry.bundle_checksum_md5_url.take() {
            let decoded = decoder.decode(&encoded, &release_date).context(format!(
                "Failed to decode the bundle checksum url of {}",
                entry.name,
            ))?;
            entry.bundle_checksum_md5_url = Some(decoded);
        }

        log::debug!(
            "Decoded bundle urls of {} ({}/{})",
            entry.name,
            index + 1,
            total,
        );
    }

    Ok(())
}

/// Entries whose `promoted` field is the literal string "true". A json
/// boolean true does not count.
pub fn filter_promoted(snapshot: &[ProductEntry]) -> Vec<ProductEntry> {
    snapshot
        .iter()
        .filter(|entry| matches!(&entry.promoted, Some(Value::String(flag)) if flag == "true"))
        .cloned()
        .collect()
}

/// Entries whose name starts with `<family>-<version>`, in snapshot order
/// unless the partition is a reversed one. An empty version selects the
/// whole family.
pub fn filter_family(snapshot: &[ProductEntry], family: &str, version: &str) -> Vec<ProductEntry> {
    let prefix = format!("{}-{}", family, version);
    let mut entries: Vec<_> = snapshot
        .iter()
        .filter(|entry| entry.name.starts_with(&prefix))
        .cloned()
        .collect();

    if is_reversed(family, version) {
        entries.reverse();
    }

    entries
}

fn is_reversed(family: &str, version: &str) -> bool {
    REVERSED_PARTITIONS
        .iter()
        .any(|(reversed_family, reversed_version)| {
            *reversed_family == family && *reversed_version == version
        })
}

pub fn partition_file_name(family: &str, version: &str) -> String {
    match version.is_empty() {
        true => format!("{}_product_info.json", family),
        false => format!("{}_{}_product_info.json", family, version.replace('.', "")),
    }
}
