use anyhow::{Context, Result};
use futures::future::join_all;
use regex::Regex;

use super::{RegistryClient, TagRecord, TagResolution};
use crate::config::RegistryConfig;
use crate::policy;

/// Tag names accepted as stable releases: `MAJOR.MINOR` or
/// `MAJOR.MINOR.PATCH`, each optionally suffixed with `-jdkNN`, optionally
/// suffixed again with `-MAJOR.MINOR.PATCH`.
pub const STABLE_VERSION_PATTERN: &str =
    r"^(\d+\.\d+\.\d+(-jdk\d+)?|\d+\.\d+(-jdk\d+)?)(-\d+\.\d+\.\d+)?$";

/// Resolve every configured image concurrently. Failed or exhausted images
/// keep their position in the result as `None`.
pub async fn resolve_all(
    client: &impl RegistryClient,
    config: &RegistryConfig,
) -> Result<Vec<Option<TagRecord>>> {
    let pattern = Regex::new(STABLE_VERSION_PATTERN).context("Invalid stable version pattern")?;

    let resolutions = join_all(
        config
            .images
            .iter()
            .map(|image| resolve_one(client, image, &pattern, config)),
    )
    .await;

    resolutions.into_iter().collect()
}

async fn resolve_one(
    client: &impl RegistryClient,
    image: &str,
    pattern: &Regex,
    config: &RegistryConfig,
) -> Result<Option<TagRecord>> {
    let resolution = resolve_latest_tag(client, image, pattern, config).await;
    let resolution = policy::TAG_RESOLUTION.handle(
        format!("Failed to resolve the latest tag of {}", image),
        resolution,
    )?;

    match resolution {
        Some(TagResolution::Found(tag)) => Ok(Some(tag)),
        Some(TagResolution::NoStableTagFound {
            image,
            pages_scanned,
        }) => {
            log::warn!("No stable tag of {} in {} pages", image, pages_scanned);
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Scan an image's tag pages in order for the first stable tag. Absence of
/// a match is the only continuation trigger; the page cap is the only
/// termination guard.
pub async fn resolve_latest_tag(
    client: &impl RegistryClient,
    image: &str,
    pattern: &Regex,
    config: &RegistryConfig,
) -> Result<TagResolution> {
    for page in 1..=config.max_pages {
        let tags = client
            .get_tag_page(image, page, config.page_size)
            .await
            .context(format!("Failed to get tags page {} of {}", page, image))?;

        log::debug!("Scanning {} tags on page {} of {}", tags.len(), page, image);

        if let Some(tag) = find_stable_tag(image, &tags, pattern) {
            return Ok(TagResolution::Found(tag));
        }
    }

    Ok(TagResolution::NoStableTagFound {
        image: image.to_string(),
        pages_scanned: config.max_pages,
    })
}

/// First tag in listed order whose name matches the pattern, enriched with
/// its pullable image reference.
fn find_stable_tag(image: &str, tags: &[TagRecord], pattern: &Regex) -> Option<TagRecord> {
    tags.iter()
        .find(|tag| pattern.is_match(&tag.name))
        .map(|tag| {
            let mut tag = tag.clone();
            tag.latest_docker_image = Some(format!("{}:{}", image, tag.name));
            tag
        })
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use mockall::predicate::*;

    use super::*;
    use crate::registry::MockRegistryClient;

    fn tag(name: &str) -> TagRecord {
        TagRecord {
            name: name.to_string(),
            latest_docker_image: None,
            extra: serde_json::Map::new(),
        }
    }

    fn test_config(images: &[&str], max_pages: u32) -> RegistryConfig {
        RegistryConfig {
            images: images.iter().map(|image| image.to_string()).collect(),
            page_size: 3,
            max_pages,
            ..RegistryConfig::default()
        }
    }

    #[test]
    fn test_stable_version_pattern() {
        let pattern = Regex::new(STABLE_VERSION_PATTERN).unwrap();

        assert!(pattern.is_match("7.4.13"));
        assert!(pattern.is_match("7.4"));
        assert!(pattern.is_match("7.4.13-jdk11"));
        assert!(pattern.is_match("7.4-jdk8"));
        assert!(pattern.is_match("7.4.13-jdk11-1.2.3"));
        assert!(pattern.is_match("7.4-1.2.3"));

        assert!(!pattern.is_match("latest"));
        assert!(!pattern.is_match("7.4.13-rc1"));
        assert!(!pattern.is_match("abc"));
        assert!(!pattern.is_match("7"));
        assert!(!pattern.is_match("7.4.13-jdk11-1.2"));
    }

    #[test]
    fn test_find_stable_tag_takes_the_first_match() {
        let pattern = Regex::new(STABLE_VERSION_PATTERN).unwrap();
        let tags = vec![tag("latest"), tag("7.4.13"), tag("7.3.10")];

        let found = find_stable_tag("liferaycloud/nginx", &tags, &pattern).unwrap();
        assert_eq!(found.name, "7.4.13");
        assert_eq!(
            found.latest_docker_image.as_deref(),
            Some("liferaycloud/nginx:7.4.13"),
        );

        assert!(find_stable_tag("liferaycloud/nginx", &[tag("latest")], &pattern).is_none());
        assert!(find_stable_tag("liferaycloud/nginx", &[], &pattern).is_none());
    }

    #[tokio::test]
    async fn test_resolve_latest_tag_stops_at_the_first_matching_page() {
        let mut client = MockRegistryClient::new();
        client
            .expect_get_tag_page()
            .with(eq("liferaycloud/nginx"), eq(1), eq(3))
            .times(1)
            .returning(|_, _, _| Ok(vec![tag("latest"), tag("edge")]));
        client
            .expect_get_tag_page()
            .with(eq("liferaycloud/nginx"), eq(2), eq(3))
            .times(1)
            .returning(|_, _, _| Ok(vec![tag("beta"), tag("7.4-rc1"), tag("1.22.0")]));

        let pattern = Regex::new(STABLE_VERSION_PATTERN).unwrap();
        let resolution =
            resolve_latest_tag(&client, "liferaycloud/nginx", &pattern, &test_config(&[], 10))
                .await
                .unwrap();

        // Page 3 was never requested.
        match resolution {
            TagResolution::Found(tag) => {
                assert_eq!(tag.name, "1.22.0");
                assert_eq!(
                    tag.latest_docker_image.as_deref(),
                    Some("liferaycloud/nginx:1.22.0"),
                );
            }
            other => panic!("Unexpected resolution {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_latest_tag_gives_up_at_the_page_cap() {
        let mut client = MockRegistryClient::new();
        client
            .expect_get_tag_page()
            .times(2)
            .returning(|_, _, _| Ok(vec![tag("latest")]));

        let pattern = Regex::new(STABLE_VERSION_PATTERN).unwrap();
        let resolution =
            resolve_latest_tag(&client, "liferaycloud/backup", &pattern, &test_config(&[], 2))
                .await
                .unwrap();

        assert_eq!(
            resolution,
            TagResolution::NoStableTagFound {
                image: "liferaycloud/backup".to_string(),
                pages_scanned: 2,
            },
        );
    }

    #[tokio::test]
    async fn test_resolve_all_keeps_image_order_and_absorbs_failures() {
        let mut client = MockRegistryClient::new();
        client
            .expect_get_tag_page()
            .with(eq("liferaycloud/backup"), eq(1), eq(3))
            .returning(|_, _, _| Err(anyhow!("Server returned status 500")));
        client
            .expect_get_tag_page()
            .with(eq("liferaycloud/nginx"), eq(1), eq(3))
            .returning(|_, _, _| Ok(vec![tag("1.22.0")]));
        client
            .expect_get_tag_page()
            .with(eq("liferaycloud/database"), eq(1), eq(3))
            .returning(|_, _, _| Ok(vec![tag("latest")]));

        let config = test_config(
            &[
                "liferaycloud/backup",
                "liferaycloud/nginx",
                "liferaycloud/database",
            ],
            1,
        );
        let latest = resolve_all(&client, &config).await.unwrap();

        assert_eq!(latest.len(), 3);
        assert!(latest[0].is_none());
        assert_eq!(latest[1].as_ref().unwrap().name, "1.22.0");
        assert_eq!(
            latest[1].as_ref().unwrap().latest_docker_image.as_deref(),
            Some("liferaycloud/nginx:1.22.0"),
        );
        assert!(latest[2].is_none());
    }
}
