//! `qdesk render`

use std::path::PathBuf;

use qdesk_core::validation::validate_record;
use qdesk_core::{price_quotation, QuotationRecord};
use qdesk_doc::{embed, render, resolve_images, FsImageSource, HttpImageSource, ImageSlot};
use reqwest::Url;

use crate::cli::RenderArgs;
use crate::config::QdeskConfig;
use crate::error::{CliResult, ConfigError};

pub async fn run(args: &RenderArgs, config: &QdeskConfig) -> CliResult<()> {
    let path = render_to_disk(args, config).await?;
    println!("{}", path.display());
    Ok(())
}

/// Prices, renders and embeds; returns the written path.
pub async fn render_to_disk(args: &RenderArgs, config: &QdeskConfig) -> CliResult<PathBuf> {
    let mut record: QuotationRecord = super::read_record(&args.record)?;
    validate_record(&record)?;

    // The stored total is never trusted
    let previous = record.total_amount;
    let total = record.recompute_total()?;
    if previous.is_some_and(|p| p != total.to_decimal()) {
        tracing::warn!(
            stored = ?previous,
            recomputed = %total,
            "Stored totalAmount differs, using recomputed value"
        );
    }

    let priced = price_quotation(&record.items)?;
    let images = fetch_images(args, config, &record).await?;

    let document = render(&record, &priced, &images, &config.company)?;
    let bytes = embed(&document.bytes, &record)?;

    let path = args.out_dir.join(&document.filename);
    super::write_file(&path, &bytes)?;

    tracing::info!(
        path = %path.display(),
        pages = document.page_count,
        bytes = bytes.len(),
        "Wrote quotation"
    );
    Ok(path)
}

/// Picks the image source: a directory wins, then an explicit URL, then
/// the configured image/server URL.
async fn fetch_images(
    args: &RenderArgs,
    config: &QdeskConfig,
    record: &QuotationRecord,
) -> CliResult<Vec<ImageSlot>> {
    let timeout = config.image_timeout();

    if let Some(dir) = args.images_dir.as_ref().or(config.images.dir.as_ref()) {
        let source = FsImageSource::new(dir);
        return Ok(resolve_images(&source, &record.items, timeout).await);
    }

    let base_url = match &args.image_base_url {
        Some(url) => Some(
            Url::parse(url).map_err(|_| ConfigError::InvalidValue("--image-base-url".to_string()))?,
        ),
        None => config.image_base_url(),
    };
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let source = HttpImageSource::new(client, base_url);
    Ok(resolve_images(&source, &record.items, timeout).await)
}
