//! # Image Resolution
//!
//! Turns each line's image reference into bytes before rendering.
//!
//! ```text
//!  items ──► [fetch #1] ─┐
//!        ──► [fetch #2] ─┼──► join_all ──► Vec<ImageSlot> (item order)
//!        ──► [fetch #3] ─┘
//!              │
//!              └─ error / timeout ──► WARN + ImageSlot::Unavailable
//! ```
//!
//! Fetches are independent and run concurrently. A failed fetch never
//! fails the render; the row gets a "No Image" placeholder instead.

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use futures_util::future::join_all;
use qdesk_core::LineItem;
use reqwest::Url;

use crate::error::ImageFetchError;

/// Default per-image fetch timeout.
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Image Slot
// =============================================================================

/// Outcome of resolving one line's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    /// Raw encoded image bytes (PNG, JPEG, ...).
    Ready(Vec<u8>),
    /// The line has no image reference.
    Missing,
    /// The reference could not be fetched; rendered as a placeholder.
    Unavailable { reason: String },
}

impl ImageSlot {
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            ImageSlot::Ready(bytes) => Some(bytes),
            _ => None,
        }
    }
}

// =============================================================================
// Image Source Trait
// =============================================================================

/// Where image references are resolved.
pub trait ImageSource: Send + Sync {
    fn fetch(&self, reference: &str) -> impl Future<Output = Result<Vec<u8>, ImageFetchError>> + Send;
}

/// Resolves every line's image concurrently.
///
/// Returns one slot per item, in item order. Never fails.
pub async fn resolve_images<S: ImageSource>(
    source: &S,
    items: &[LineItem],
    timeout: Duration,
) -> Vec<ImageSlot> {
    let fetches = items.iter().enumerate().map(|(index, item)| async move {
        let Some(reference) = item.image_url() else {
            return ImageSlot::Missing;
        };

        let result = match tokio::time::timeout(timeout, source.fetch(reference)).await {
            Ok(result) => result,
            Err(_) => Err(ImageFetchError::Timeout(timeout)),
        };

        match result {
            Ok(bytes) if !bytes.is_empty() => ImageSlot::Ready(bytes),
            Ok(_) => {
                tracing::warn!(line = index + 1, reference, "Image is empty, using placeholder");
                ImageSlot::Unavailable {
                    reason: "empty response".to_string(),
                }
            }
            Err(err) => {
                tracing::warn!(line = index + 1, reference, error = %err, "Image unavailable, using placeholder");
                ImageSlot::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    });

    let slots = join_all(fetches).await;

    tracing::debug!(
        ready = slots.iter().filter(|s| matches!(s, ImageSlot::Ready(_))).count(),
        unavailable = slots.iter().filter(|s| matches!(s, ImageSlot::Unavailable { .. })).count(),
        "Resolved line images"
    );

    slots
}

// =============================================================================
// Filesystem Source
// =============================================================================

/// Reads references as paths under a root directory.
///
/// `/uploads/a.png` and `uploads/a.png` both resolve to
/// `<root>/uploads/a.png`. References that climb out of the root are
/// rejected.
#[derive(Debug, Clone)]
pub struct FsImageSource {
    root: PathBuf,
}

impl FsImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsImageSource { root: root.into() }
    }

    fn resolve(&self, reference: &str) -> Result<PathBuf, ImageFetchError> {
        let relative = Path::new(reference.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || reference.contains("://") {
            return Err(ImageFetchError::InvalidReference {
                reference: reference.to_string(),
                reason: "not a path inside the image directory".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl ImageSource for FsImageSource {
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, ImageFetchError> {
        let path = self.resolve(reference)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(ImageFetchError::NotFound(path.display().to_string()))
            }
            Err(err) => Err(ImageFetchError::Io(err)),
        }
    }
}

// =============================================================================
// HTTP Source
// =============================================================================

/// Downloads references over HTTP(S).
///
/// Absolute `http(s)://` references are used as-is; anything else is
/// joined onto the base URL (the API server that serves `/uploads`).
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpImageSource {
    pub fn new(client: reqwest::Client, base_url: Option<Url>) -> Self {
        HttpImageSource { client, base_url }
    }

    fn url_for(&self, reference: &str) -> Result<Url, ImageFetchError> {
        let invalid = |reason: String| ImageFetchError::InvalidReference {
            reference: reference.to_string(),
            reason,
        };

        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Url::parse(reference).map_err(|e| invalid(e.to_string()));
        }

        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| invalid("relative reference and no image base URL".to_string()))?;
        base.join(reference).map_err(|e| invalid(e.to_string()))
    }
}

impl ImageSource for HttpImageSource {
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, ImageFetchError> {
        let url = self.url_for(reference)?;
        tracing::debug!(%url, "Fetching image");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ImageFetchError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(ImageFetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
