use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One tag from a registry listing. Registry fields this tool does not
/// touch pass through verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TagRecord {
    pub name: String,

    /// Set on the winning tag only: `<image>:<name>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_docker_image: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TagPage {
    pub results: Vec<TagRecord>,
}

/// Outcome of scanning one image's tag pages.
#[derive(Debug, Clone, PartialEq)]
pub enum TagResolution {
    Found(TagRecord),
    NoStableTagFound { image: String, pages_scanned: u32 },
}
