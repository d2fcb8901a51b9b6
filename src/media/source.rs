use std::fmt;
use std::path::PathBuf;

use super::error::MediaError;

/// The clip a handle is told to load. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaSource(String);

/// How the platform reaches the bytes behind a `MediaSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    File(PathBuf),
    Http(String),
}

impl MediaSource {
    pub fn new(source: impl Into<String>) -> Result<Self, MediaError> {
        let source = source.into();
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(MediaError::EmptySource);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the source. Bare paths and `file://` URLs are local; `http(s)://`
    /// is remote; any other `scheme://` is rejected.
    pub fn kind(&self) -> Result<SourceKind, MediaError> {
        let s = self.0.as_str();
        if let Some(path) = s.strip_prefix("file://") {
            return Ok(SourceKind::File(PathBuf::from(path)));
        }
        if let Some((scheme, _)) = s.split_once("://") {
            let scheme = scheme.to_ascii_lowercase();
            return match scheme.as_str() {
                "http" | "https" => Ok(SourceKind::Http(s.to_string())),
                _ => Err(MediaError::UnsupportedScheme(scheme)),
            };
        }
        Ok(SourceKind::File(PathBuf::from(s)))
    }

    /// Last path segment, for titles and log lines.
    pub fn file_name(&self) -> &str {
        let s = self.0.trim_end_matches('/');
        let s = s.split(['?', '#']).next().unwrap_or(s);
        s.rsplit(['/', '\\']).next().unwrap_or(s)
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
