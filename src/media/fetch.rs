//! Getting the encoded bytes of a clip into memory.
//!
//! Clips are short, so the whole file is buffered; seeking then rebuilds the
//! decoder from the same buffer instead of touching disk or network again.

use std::sync::Arc;
use std::time::Duration;

use crate::config::NetworkSettings;

use super::error::MediaError;
use super::source::{MediaSource, SourceKind};

pub(super) fn fetch_bytes(
    source: &MediaSource,
    network: &NetworkSettings,
) -> Result<Arc<[u8]>, MediaError> {
    match source.kind()? {
        SourceKind::File(path) => std::fs::read(&path)
            .map(Arc::from)
            .map_err(|e| MediaError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        SourceKind::Http(url) => fetch_http(&url, network),
    }
}

fn fetch_http(url: &str, network: &NetworkSettings) -> Result<Arc<[u8]>, MediaError> {
    let http_err = |reason: String| MediaError::Http {
        url: url.to_string(),
        reason,
    };

    let resp = ureq::get(url)
        .config()
        .timeout_per_call(Some(Duration::from_secs(network.timeout_secs)))
        .build()
        .call()
        .map_err(|e| http_err(e.to_string()))?;

    let mut body = resp.into_body();
    let bytes = body
        .with_config()
        .limit(network.max_bytes)
        .read_to_vec()
        .map_err(|e| http_err(e.to_string()))?;

    log::debug!("fetched {} bytes from {url}", bytes.len());
    Ok(Arc::from(bytes))
}
