use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Value};

use crate::catalog::{CatalogClient, CatalogClientImpl, ProductEntry};
use crate::config::{CatalogConfig, RegistryConfig, DECODE_BUNDLE_URLS_ENV};
use crate::decoder::{BundleUrlDecoder, CodecProcessDecoder};
use crate::registry::{RegistryClient, RegistryClientImpl};

mod catalog;
mod config;
mod decoder;
mod output;
mod policy;
mod registry;

const PRODUCT_INFO_JSON_FILE_NAME: &str = ".product_info.json";
const BETTER_PRODUCT_INFO_FILE_NAME: &str = "better_product_info.json";
const PROMOTED_PRODUCT_INFO_FILE_NAME: &str = "promoted_product_info.json";
const LATEST_DOCKER_IMAGES_FILE_NAME: &str = "liferaycloud_latest_docker_images.json";

/// Reshape the product release catalog into per-category json files and
/// resolve the latest stable tag of each cloud image.
#[derive(Parser)]
#[clap(version)]
struct Args {
    /// Directory the generated json files are written to
    #[clap(long, short, default_value = ".")]
    output_dir: PathBuf,

    /// Decode bundle urls via the external codec.
    /// You can also enable this via the DECODE_BUNDLE_URLS env variable.
    #[clap(long)]
    decode_bundle_urls: bool,

    /// Path to the bundle url codec jar
    #[clap(
        long,
        default_value = "com.liferay.workspace.bundle.url.codec-1.0.0.jar"
    )]
    codec_jar: String,

    /// Make logging more verbose.
    /// You can also specify the log level via the RUST_LOG env variable.
    #[clap(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if env::var("RUST_LOG").is_err() {
        let level = match args.verbose {
            true => "debug",
            false => "info",
        };
        env::set_var("RUST_LOG", format!("{}={}", env!("CARGO_CRATE_NAME"), level));
    }
    env_logger::init();

    log::info!(
        "Starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    );
    log::debug!("With arguments {:?}", env::args().collect::<Vec<_>>());

    if let Err(error) = run(args).await {
        log::error!("{:?}", error);
    }
}

async fn run(args: Args) -> Result<()> {
    let catalog_config = CatalogConfig {
        decode_bundle_urls: args.decode_bundle_urls
            || env::var(DECODE_BUNDLE_URLS_ENV).map_or(false, |toggle| !toggle.is_empty()),
        ..CatalogConfig::default()
    };
    let registry_config = RegistryConfig::default();

    let catalog_client = CatalogClientImpl::new(catalog_config.source_url.clone())
        .context("Failed to create catalog client")?;
    let registry_client = RegistryClientImpl::new(registry_config.api_base_url.clone())
        .context("Failed to create registry client")?;
    let decoder = CodecProcessDecoder::new(args.codec_jar);

    // The pipelines share nothing; one failing must not keep the other
    // from finishing.
    let (catalog, images) = tokio::join!(
        run_catalog_pipeline(&catalog_client, &decoder, &catalog_config, &args.output_dir),
        run_image_pipeline(&registry_client, &registry_config, &args.output_dir),
    );

    policy::CATALOG_IO.handle("Catalog pipeline failed", catalog)?;
    policy::IMAGE_AGGREGATE_IO.handle("Latest image pipeline failed", images)?;

    Ok(())
}

async fn run_catalog_pipeline(
    client: &impl CatalogClient,
    decoder: &impl BundleUrlDecoder,
    config: &CatalogConfig,
    output_dir: &Path,
) -> Result<()> {
    let raw = client
        .fetch_product_info()
        .await
        .context("Failed to download the product info document")?;

    let raw_path = output_dir.join(PRODUCT_INFO_JSON_FILE_NAME);
    tokio::fs::write(&raw_path, &raw)
        .await
        .context(format!("Failed to write {}", raw_path.display()))?;
    log::info!("Downloaded {}", raw_path.display());

    let document: Map<String, Value> =
        serde_json::from_str(&raw).context("Failed to parse the product info document as json")?;

    let mut snapshot = catalog::build_catalog(document)?;
    if config.decode_bundle_urls {
        catalog::decode_bundle_urls(&mut snapshot, decoder)?;
    }

    output::write_json(&output_dir.join(BETTER_PRODUCT_INFO_FILE_NAME), &snapshot).await?;
    output::write_json(
        &output_dir.join(PROMOTED_PRODUCT_INFO_FILE_NAME),
        &catalog::filter_promoted(&snapshot),
    )
    .await?;

    for partition in &config.partitions {
        write_family_partition(&snapshot, &partition.family, "", output_dir).await?;
        for version in &partition.versions {
            write_family_partition(&snapshot, &partition.family, version, output_dir).await?;
        }
    }

    Ok(())
}

async fn write_family_partition(
    snapshot: &[ProductEntry],
    family: &str,
    version: &str,
    output_dir: &Path,
) -> Result<()> {
    let entries = catalog::filter_family(snapshot, family, version);
    let path = output_dir.join(catalog::partition_file_name(family, version));
    output::write_json(&path, &entries).await
}

async fn run_image_pipeline(
    client: &impl RegistryClient,
    config: &RegistryConfig,
    output_dir: &Path,
) -> Result<()> {
    let latest = registry::resolve_all(client, config).await?;
    output::write_json(&output_dir.join(LATEST_DOCKER_IMAGES_FILE_NAME), &latest).await
}
