//! Displayed playback progress, fed only by handle notifications.

use std::time::Duration;

/// Position/duration as last reported by the platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressModel {
    position: Duration,
    /// `None` until the platform reports it; displayed as `0:00`.
    duration: Option<Duration>,
    playing: bool,
}

/// Derived view of a `ProgressModel`, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSnapshot {
    pub elapsed: Duration,
    pub remaining: Duration,
    pub playing: bool,
    /// `elapsed / duration` in `[0, 1]`, 0 while the duration is unknown.
    pub fraction: f64,
}

impl ProgressModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Duration for display and clamping; zero while unknown.
    pub fn duration_or_zero(&self) -> Duration {
        self.duration.unwrap_or(Duration::ZERO)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = Some(duration);
        self.position = self.position.min(duration);
    }

    pub fn set_position(&mut self, position: Duration) {
        self.position = match self.duration {
            Some(d) => position.min(d),
            None => position,
        };
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// End of media: stop and pin the position to the duration.
    pub fn mark_ended(&mut self) {
        self.playing = false;
        if let Some(d) = self.duration {
            self.position = d;
        }
    }

    /// `clamp(position + delta, 0, duration)`. Zero while the duration is unknown.
    pub fn seek_relative_target(&self, delta_secs: f64) -> Duration {
        let Some(duration) = self.duration else {
            return Duration::ZERO;
        };
        let delta = if delta_secs.is_nan() { 0.0 } else { delta_secs };
        let target = (self.position.as_secs_f64() + delta).clamp(0.0, duration.as_secs_f64());
        Duration::from_secs_f64(target).min(duration)
    }

    pub fn fraction(&self) -> f64 {
        match self.duration {
            Some(d) if !d.is_zero() => {
                (self.position.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            elapsed: self.position,
            remaining: self.duration_or_zero().saturating_sub(self.position),
            playing: self.playing,
            fraction: self.fraction(),
        }
    }

    /// `elapsed / duration`, e.g. `0:07 / 0:30`.
    pub fn label(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.position),
            format_time(self.duration_or_zero())
        )
    }
}

/// Format as `m:ss`: whole seconds rounded down, minutes unpadded.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
