//! `PlaybackWidget`: one controllable surface around one `MediaHandle`.
//!
//! State machine per source: `Idle -> Loading -> (Paused <-> Playing) -> Ended`.
//! Controls only issue requests; the widget moves when the platform confirms.

use std::time::Duration;

use crate::config::PlayerSettings;
use crate::media::{HandleId, MediaEvent, MediaHandle, MediaSource, Notification, Platform, Subscriptions};

use super::progress::ProgressModel;
use super::waveform::{WaveformModel, scrub_fraction};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WidgetState {
    /// No handle yet, or the clip failed before its duration was known.
    Idle,
    /// Load requested, duration not reported yet.
    Loading,
    Paused,
    Playing,
    /// Reached the end of the clip; a seek backwards re-opens it.
    Ended,
}

/// What a `toggle_play` call actually did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Play,
    Pause,
    /// Previous toggle unconfirmed, clip ended/failed, or widget closed.
    Ignored,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// Built without an `on_close` callback, so there is no close control.
    NotClosable,
    AlreadyClosed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Pending {
    Play,
    Pause,
}

pub struct PlaybackWidget {
    source: MediaSource,
    handle: Option<MediaHandle>,
    progress: ProgressModel,
    waveform: WaveformModel,
    state: WidgetState,
    pending: Option<Pending>,
    notice: Option<String>,
    on_close: Option<Box<dyn FnMut()>>,
    closed: bool,
    skip: Duration,
}

impl PlaybackWidget {
    /// Build an unmounted widget in `Idle`. The waveform is drawn here, once.
    pub fn new(
        source: MediaSource,
        on_close: Option<Box<dyn FnMut()>>,
        settings: &PlayerSettings,
    ) -> Self {
        let waveform = WaveformModel::generate(
            settings.waveform_bars,
            settings.bar_min_height,
            settings.bar_max_height,
        );
        Self::with_waveform(source, on_close, settings, waveform)
    }

    pub fn with_waveform(
        source: MediaSource,
        on_close: Option<Box<dyn FnMut()>>,
        settings: &PlayerSettings,
        waveform: WaveformModel,
    ) -> Self {
        Self {
            source,
            handle: None,
            progress: ProgressModel::new(),
            waveform,
            state: WidgetState::Idle,
            pending: None,
            notice: None,
            on_close,
            closed: false,
            skip: Duration::from_secs(settings.skip_seconds),
        }
    }

    /// Build and immediately mount.
    pub fn open(
        source: MediaSource,
        on_close: Option<Box<dyn FnMut()>>,
        settings: &PlayerSettings,
        platform: &dyn Platform,
        subs: &Subscriptions,
    ) -> Self {
        let mut widget = Self::new(source, on_close, settings);
        widget.mount(platform, subs);
        widget
    }

    /// Create the handle for the current source and request `load`.
    pub fn mount(&mut self, platform: &dyn Platform, subs: &Subscriptions) {
        if self.closed {
            return;
        }
        self.teardown_handle();
        self.handle = Some(MediaHandle::open(self.source.clone(), platform, subs));
        self.state = WidgetState::Loading;
    }

    /// Replace the source. The old handle is fully torn down (subscription
    /// detached, playback stopped) before the new one is created.
    pub fn switch_source(
        &mut self,
        source: MediaSource,
        platform: &dyn Platform,
        subs: &Subscriptions,
    ) {
        if self.closed {
            return;
        }
        self.teardown_handle();
        self.source = source;
        self.progress = ProgressModel::new();
        self.notice = None;
        self.state = WidgetState::Idle;
        self.mount(platform, subs);
    }

    /// Apply one platform notification. Returns `false` if it was not for the
    /// live handle and therefore ignored.
    pub fn handle_notification(&mut self, n: &Notification) -> bool {
        if self.handle_id() != Some(n.handle) {
            log::debug!("widget: ignoring {:?} from handle {}", n.event, n.handle);
            return false;
        }

        match &n.event {
            MediaEvent::DurationKnown(d) => {
                self.progress.set_duration(*d);
                if self.state == WidgetState::Loading {
                    self.state = WidgetState::Paused;
                }
            }
            MediaEvent::PositionChanged(p) => {
                self.progress.set_position(*p);
                if self.state == WidgetState::Ended
                    && self.progress.position() < self.progress.duration_or_zero()
                {
                    self.state = WidgetState::Paused;
                }
            }
            MediaEvent::Playing => {
                self.progress.set_playing(true);
                self.state = WidgetState::Playing;
                self.pending = None;
            }
            MediaEvent::Paused => {
                self.progress.set_playing(false);
                if self.state == WidgetState::Playing {
                    self.state = WidgetState::Paused;
                }
                self.pending = None;
            }
            MediaEvent::Ended => {
                self.progress.mark_ended();
                self.state = WidgetState::Ended;
                self.pending = None;
            }
            MediaEvent::Failed(e) => {
                log::warn!("widget: unable to play {}: {e}", self.source);
                self.notice = Some(format!("Unable to play audio file ({e})"));
                self.progress.set_playing(false);
                self.state = if self.progress.duration().is_some() {
                    WidgetState::Paused
                } else {
                    WidgetState::Idle
                };
                self.pending = None;
            }
        }
        true
    }

    /// Pause if playing, play otherwise, judged by the platform-confirmed state.
    ///
    /// A toggle issued while the previous one is still unconfirmed is dropped.
    pub fn toggle_play(&mut self) -> ToggleOutcome {
        if self.closed {
            return ToggleOutcome::Ignored;
        }
        if let Some(p) = self.pending {
            log::debug!("widget: toggle ignored, {p:?} still unconfirmed");
            return ToggleOutcome::Ignored;
        }
        if matches!(self.state, WidgetState::Idle | WidgetState::Ended) {
            return ToggleOutcome::Ignored;
        }
        let playing = self.progress.is_playing();
        let Some(handle) = self.handle.as_mut() else {
            return ToggleOutcome::Ignored;
        };

        if playing {
            handle.pause();
            self.pending = Some(Pending::Pause);
            ToggleOutcome::Pause
        } else {
            handle.play();
            self.pending = Some(Pending::Play);
            ToggleOutcome::Play
        }
    }

    /// Request a seek to `target`, clamped into `[0, duration]`.
    ///
    /// No-op (returns `None`) while the duration is unknown.
    pub fn seek_to(&mut self, target: Duration) -> Option<Duration> {
        if self.closed {
            return None;
        }
        let duration = self.progress.duration()?;
        let handle = self.handle.as_mut()?;
        Some(handle.seek(target, duration))
    }

    pub fn seek_relative(&mut self, delta_secs: f64) -> Option<Duration> {
        self.progress.duration()?;
        let target = self.progress.seek_relative_target(delta_secs);
        self.seek_to(target)
    }

    pub fn skip_back(&mut self) -> Option<Duration> {
        self.seek_relative(-self.skip.as_secs_f64())
    }

    pub fn skip_forward(&mut self) -> Option<Duration> {
        self.seek_relative(self.skip.as_secs_f64())
    }

    /// Seek to the point under a pointer at `x` in a strip `width` wide.
    pub fn scrub(&mut self, x: f64, width: f64) -> Option<Duration> {
        let duration = self.progress.duration()?;
        let fraction = scrub_fraction(x, width);
        let target = if fraction >= 1.0 {
            duration
        } else {
            duration.mul_f64(fraction)
        };
        self.seek_to(target)
    }

    /// User dismissal: tear down the handle, then invoke `on_close` exactly once.
    pub fn close(&mut self) -> CloseOutcome {
        if self.closed {
            return CloseOutcome::AlreadyClosed;
        }
        let Some(mut on_close) = self.on_close.take() else {
            return CloseOutcome::NotClosable;
        };
        self.teardown_handle();
        self.closed = true;
        on_close();
        CloseOutcome::Closed
    }

    fn teardown_handle(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.teardown();
        }
        self.pending = None;
        self.progress.set_playing(false);
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    pub fn handle_id(&self) -> Option<HandleId> {
        self.handle.as_ref().map(MediaHandle::id)
    }

    pub fn progress(&self) -> &ProgressModel {
        &self.progress
    }

    pub fn waveform(&self) -> &WaveformModel {
        &self.waveform
    }

    pub fn active_index(&self) -> Option<usize> {
        self.waveform.active_index(&self.progress)
    }

    pub fn label(&self) -> String {
        self.progress.label()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn is_closable(&self) -> bool {
        self.on_close.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for PlaybackWidget {
    fn drop(&mut self) {
        self.teardown_handle();
    }
}
