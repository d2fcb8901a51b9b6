use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::config::CatalogSettings;

use super::model::Recording;
use super::sample::sample_recordings;
use super::scan::scan;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse catalog {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{} is neither a catalog file nor a directory", .0.display())]
    NotFound(PathBuf),
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "recording")]
    recordings: Vec<Recording>,
}

/// Read a TOML catalog made of `[[recording]]` tables.
pub fn read_catalog_file(path: &Path) -> Result<Vec<Recording>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: CatalogFile = toml::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.recordings)
}

/// Resolve the catalog from the CLI argument, then the config, then the built-in samples.
///
/// An argument ending in `.toml` is a catalog file; any other argument must
/// be a directory to scan.
pub fn load_catalog(
    arg: Option<&Path>,
    settings: &CatalogSettings,
) -> Result<Vec<Recording>, CatalogError> {
    if let Some(p) = arg {
        let is_toml = p
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        if is_toml {
            return read_catalog_file(p);
        }
        if p.is_dir() {
            let recordings = scan(p, settings);
            log::info!("scanned {} recordings under {}", recordings.len(), p.display());
            return Ok(recordings);
        }
        return Err(CatalogError::NotFound(p.to_path_buf()));
    }

    if let Some(file) = &settings.file {
        return read_catalog_file(file);
    }

    Ok(sample_recordings())
}
