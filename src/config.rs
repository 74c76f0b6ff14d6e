/// Url of the vendor-published product info document.
pub const PRODUCT_INFO_JSON_URL: &str =
    "https://releases-cdn.liferay.com/tools/workspace/.product_info.json";

pub const DOCKER_HUB_REPO_API_BASE_URL: &str = "https://registry.hub.docker.com/v2/repositories";

/// Setting this env variable to a non-empty value enables bundle url
/// decoding, same as passing --decode-bundle-urls.
pub const DECODE_BUNDLE_URLS_ENV: &str = "DECODE_BUNDLE_URLS";

/// One product family and the versions that get their own partition file
/// in addition to the whole-family file.
#[derive(Debug, Clone)]
pub struct FamilyPartition {
    pub family: String,
    pub versions: Vec<String>,
}

impl FamilyPartition {
    pub fn new(family: &str, versions: &[&str]) -> Self {
        Self {
            family: family.to_string(),
            versions: versions.iter().map(|version| version.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub source_url: String,
    pub decode_bundle_urls: bool,
    pub partitions: Vec<FamilyPartition>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source_url: PRODUCT_INFO_JSON_URL.to_string(),
            decode_bundle_urls: false,
            partitions: vec![
                FamilyPartition::new("dxp", &["7.4", "7.3", "7.2", "7.1", "7.0"]),
                FamilyPartition::new("portal", &["7.4", "7.3", "7.2", "7.1", "7.0"]),
                FamilyPartition::new("commerce", &[]),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub api_base_url: String,
    pub images: Vec<String>,
    pub page_size: u32,
    /// Pages scanned per image before giving up on finding a stable tag.
    pub max_pages: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_base_url: DOCKER_HUB_REPO_API_BASE_URL.to_string(),
            images: [
                "liferaycloud/backup",
                "liferaycloud/jenkins",
                "liferaycloud/database",
                "liferaycloud/liferay-dxp",
                "liferaycloud/elasticsearch",
                "liferaycloud/nginx",
            ]
            .iter()
            .map(|image| image.to_string())
            .collect(),
            page_size: 1024,
            max_pages: 64,
        }
    }
}
