use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One product release, reshaped from the keyed source document. Fields
/// this tool does not touch pass through verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProductEntry {
    /// Injected from the source object's key, never present in the value.
    #[serde(default)]
    pub name: String,

    #[serde(rename = "bundleUrl", default, skip_serializing_if = "Option::is_none")]
    pub bundle_url: Option<String>,

    #[serde(
        rename = "bundleChecksumMD5Url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bundle_checksum_md5_url: Option<String>,

    #[serde(rename = "releaseDate", default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    /// The source emits this as the string "true", not a boolean.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
