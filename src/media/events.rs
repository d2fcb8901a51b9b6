use std::fmt;
use std::time::Duration;

use super::error::MediaError;

/// Identity of one live `MediaHandle`. Never reused within a process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub(crate) u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the platform reports about a handle.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Metadata loaded; fires once per source.
    DurationKnown(Duration),
    /// Fires continuously while playing and once after each seek.
    PositionChanged(Duration),
    /// Playback actually started (confirms a `play` request).
    Playing,
    /// Playback actually stopped (confirms a `pause` request).
    Paused,
    /// Position naturally reached the end of the clip.
    Ended,
    /// The clip could not be fetched, decoded or played.
    Failed(MediaError),
}

/// A `MediaEvent` tagged with the handle that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub handle: HandleId,
    pub event: MediaEvent,
}
