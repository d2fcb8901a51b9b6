use std::time::Duration;

use super::bus::Emitter;
use super::source::MediaSource;

/// Requests a handle forwards to the platform.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCmd {
    /// Fetch and decode the source. No playback starts.
    Load(MediaSource),
    /// Start playback, or queue it until the clip is ready.
    Play,
    /// Stop playback and keep the position.
    Pause,
    /// Jump to an already-clamped position.
    Seek(Duration),
    /// Stop everything and release the output.
    Shutdown,
}

/// The platform's audio decode/output path, seen from one handle.
pub trait Transport {
    fn request(&mut self, cmd: MediaCmd);
}

/// Factory for transports; one transport per handle.
pub trait Platform {
    /// Open a transport that reports back through `emitter`. Opening never
    /// fails synchronously: problems arrive later as `MediaEvent::Failed`.
    fn open(&self, emitter: Emitter) -> Box<dyn Transport>;
}
