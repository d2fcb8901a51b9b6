use thiserror::Error;

/// Everything that can go wrong between a `MediaSource` and the speakers.
///
/// None of these are fatal to the host; the widget turns them into an
/// inline "unable to play" notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("media source is empty")]
    EmptySource,
    #[error("unsupported media scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("failed to fetch {url}: {reason}")]
    Http { url: String, reason: String },
    #[error("failed to decode {0}")]
    Decode(String),
    #[error("no audio output device: {0}")]
    NoOutput(String),
}
