//! `rodio`-backed platform: one thread per handle owning the output stream
//! and the sink for that handle's clip.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::config::{NetworkSettings, PlayerSettings};

use super::bus::Emitter;
use super::error::MediaError;
use super::events::MediaEvent;
use super::fetch::fetch_bytes;
use super::platform::{MediaCmd, Platform, Transport};
use super::source::MediaSource;

pub struct RodioPlatform {
    tick: Duration,
    network: NetworkSettings,
}

impl RodioPlatform {
    pub fn new(player: &PlayerSettings, network: &NetworkSettings) -> Self {
        Self {
            tick: Duration::from_millis(player.tick_ms.max(1)),
            network: network.clone(),
        }
    }
}

impl Platform for RodioPlatform {
    fn open(&self, emitter: Emitter) -> Box<dyn Transport> {
        let (tx, rx) = mpsc::channel::<MediaCmd>();
        let tick = self.tick;
        let network = self.network.clone();
        let id = emitter.id();
        let on_spawn_error = emitter.clone();
        // Not joined on teardown: a thread stuck in a fetch must not block the UI.
        // Its emitter is already detached by then, so it exits silently.
        let spawned = thread::Builder::new()
            .name(format!("media-{}", id.0))
            .spawn(move || run_platform_thread(rx, emitter, tick, network));
        if let Err(e) = spawned {
            spawn_failed(&on_spawn_error, &e);
        }
        Box::new(RodioTransport { tx })
    }
}

/// No thread will ever answer this handle, so fail its load right away.
fn spawn_failed(emitter: &Emitter, e: &std::io::Error) {
    log::error!("handle {}: failed to spawn platform thread: {e}", emitter.id());
    emitter.emit(MediaEvent::Failed(MediaError::NoOutput(format!(
        "cannot start playback thread: {e}"
    ))));
}

struct RodioTransport {
    tx: Sender<MediaCmd>,
}

impl Transport for RodioTransport {
    fn request(&mut self, cmd: MediaCmd) {
        // The thread only goes away after Shutdown or a fatal output error,
        // and in both cases nobody is listening any more.
        let _ = self.tx.send(cmd);
    }
}

/// One clip being rendered from some offset.
trait Voice {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    /// Time rendered since this voice was created.
    fn elapsed(&self) -> Duration;
    fn is_finished(&self) -> bool;
}

impl Voice for Sink {
    fn play(&self) {
        Sink::play(self);
    }

    fn pause(&self) {
        Sink::pause(self);
    }

    fn stop(&self) {
        Sink::stop(self);
    }

    fn elapsed(&self) -> Duration {
        self.get_pos()
    }

    fn is_finished(&self) -> bool {
        self.empty()
    }
}

/// Where voices get created; the default output stream outside tests.
trait Output {
    /// A paused voice for `bytes` starting at `start_at`.
    fn voice_at(&self, bytes: &Arc<[u8]>, start_at: Duration) -> Result<Box<dyn Voice>, MediaError>;
}

impl Output for OutputStream {
    fn voice_at(&self, bytes: &Arc<[u8]>, start_at: Duration) -> Result<Box<dyn Voice>, MediaError> {
        let source = Decoder::new(Cursor::new(bytes.clone()))
            .map_err(|e| MediaError::Decode(e.to_string()))?
            // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
            .skip_duration(start_at);

        let sink = Sink::connect_new(self.mixer());
        sink.append(source);
        sink.pause();
        Ok(Box::new(sink))
    }
}

/// Encoded clip kept in memory so a voice can be rebuilt at any offset.
struct Clip {
    bytes: Arc<[u8]>,
    duration: Option<Duration>,
}

/// Playback state private to the platform thread.
struct Playback {
    clip: Option<Clip>,
    voice: Option<Box<dyn Voice>>,
    /// Clip offset the current voice started at.
    base: Duration,
    play_queued: bool,
    playing: bool,
    ended: bool,
}

impl Playback {
    fn new() -> Self {
        Self {
            clip: None,
            voice: None,
            base: Duration::ZERO,
            play_queued: false,
            playing: false,
            ended: false,
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.clip.as_ref().and_then(|c| c.duration)
    }

    fn position(&self) -> Duration {
        let pos = self.base + self.voice.as_ref().map_or(Duration::ZERO, |v| v.elapsed());
        match self.duration() {
            Some(d) => pos.min(d),
            None => pos,
        }
    }

    fn stop(&mut self) {
        if let Some(v) = self.voice.take() {
            v.stop();
        }
        self.playing = false;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

fn run_platform_thread(
    rx: Receiver<MediaCmd>,
    emitter: Emitter,
    tick: Duration,
    network: NetworkSettings,
) {
    let id = emitter.id();
    let mut stream = match OutputStreamBuilder::open_default_stream() {
        Ok(s) => s,
        Err(e) => {
            log::warn!("handle {id}: no output device: {e}");
            emitter.emit(MediaEvent::Failed(MediaError::NoOutput(e.to_string())));
            return;
        }
    };
    // rodio logs to stderr when the stream drops, which would scribble over the TUI.
    stream.log_on_drop(false);

    let mut pb = Playback::new();

    loop {
        match rx.recv_timeout(tick) {
            Ok(cmd) => {
                if apply_command(&mut pb, cmd, &stream, &network, &emitter) == Flow::Exit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => on_tick(&mut pb, &emitter),
            Err(RecvTimeoutError::Disconnected) => {
                pb.stop();
                break;
            }
        }
    }
}

/// Carry out one request against the playback state.
fn apply_command(
    pb: &mut Playback,
    cmd: MediaCmd,
    out: &dyn Output,
    network: &NetworkSettings,
    emitter: &Emitter,
) -> Flow {
    let id = emitter.id();
    match cmd {
        MediaCmd::Load(source) => {
            pb.stop();
            pb.clip = None;
            pb.base = Duration::ZERO;
            pb.ended = false;
            match load_clip(&source, network) {
                Ok(clip) => {
                    match clip.duration {
                        Some(d) => {
                            log::info!("handle {id}: {source} is {:.1}s", d.as_secs_f64());
                            emitter.emit(MediaEvent::DurationKnown(d));
                        }
                        None => log::warn!("handle {id}: duration of {source} is unknown"),
                    }
                    pb.clip = Some(clip);
                    emitter.emit(MediaEvent::PositionChanged(Duration::ZERO));
                    if pb.play_queued {
                        start(pb, out, emitter);
                    }
                }
                Err(e) => {
                    log::warn!("handle {id}: {e}");
                    pb.play_queued = false;
                    emitter.emit(MediaEvent::Failed(e));
                }
            }
        }
        MediaCmd::Play => {
            if pb.clip.is_none() {
                // Not ready yet; the Load arm starts playback once it is.
                pb.play_queued = true;
            } else if pb.ended {
                emitter.emit(MediaEvent::Ended);
            } else {
                start(pb, out, emitter);
            }
        }
        MediaCmd::Pause => {
            pb.play_queued = false;
            if pb.playing {
                let pos = pb.position();
                if let Some(v) = pb.voice.as_ref() {
                    v.pause();
                }
                pb.playing = false;
                emitter.emit(MediaEvent::PositionChanged(pos));
            }
            emitter.emit(MediaEvent::Paused);
        }
        MediaCmd::Seek(target) => {
            let Some(clip) = pb.clip.as_ref() else {
                return Flow::Continue;
            };
            let target = match clip.duration {
                Some(d) => target.min(d),
                None => target,
            };
            let voice = out.voice_at(&clip.bytes, target);
            if let Some(v) = pb.voice.take() {
                v.stop();
            }
            match voice {
                Ok(voice) => {
                    if pb.playing {
                        voice.play();
                    }
                    pb.voice = Some(voice);
                    pb.base = target;
                    pb.ended = false;
                    emitter.emit(MediaEvent::PositionChanged(target));
                }
                Err(e) => {
                    pb.playing = false;
                    emitter.emit(MediaEvent::Failed(e));
                }
            }
        }
        MediaCmd::Shutdown => {
            pb.stop();
            log::debug!("handle {id}: platform thread exiting");
            return Flow::Exit;
        }
    }
    Flow::Continue
}

/// Report progress while playing; detect the end of the clip.
fn on_tick(pb: &mut Playback, emitter: &Emitter) {
    if !pb.playing {
        return;
    }
    let finished = pb.voice.as_ref().is_none_or(|v| v.is_finished());
    if finished {
        let end = pb.duration().unwrap_or_else(|| pb.position());
        pb.stop();
        pb.base = end;
        pb.ended = true;
        emitter.emit(MediaEvent::PositionChanged(end));
        emitter.emit(MediaEvent::Ended);
    } else {
        emitter.emit(MediaEvent::PositionChanged(pb.position()));
    }
}

fn start(pb: &mut Playback, out: &dyn Output, emitter: &Emitter) {
    pb.play_queued = false;
    if pb.voice.is_none() {
        let Some(clip) = pb.clip.as_ref() else {
            return;
        };
        match out.voice_at(&clip.bytes, pb.base) {
            Ok(voice) => pb.voice = Some(voice),
            Err(e) => {
                emitter.emit(MediaEvent::Failed(e));
                return;
            }
        }
    }
    if let Some(v) = pb.voice.as_ref() {
        v.play();
    }
    pb.playing = true;
    emitter.emit(MediaEvent::Playing);
}

fn load_clip(source: &MediaSource, network: &NetworkSettings) -> Result<Clip, MediaError> {
    let bytes = fetch_bytes(source, network)?;
    let duration = read_duration(&bytes, source)?;
    Ok(Clip { bytes, duration })
}

/// Read the duration from the container, or count samples when it does not say.
fn read_duration(bytes: &Arc<[u8]>, source: &MediaSource) -> Result<Option<Duration>, MediaError> {
    let decoder = Decoder::new(Cursor::new(bytes.clone()))
        .map_err(|e| MediaError::Decode(format!("{}: {e}", source.file_name())))?;
    if let Some(d) = decoder.total_duration() {
        return Ok(Some(d));
    }

    let rate = decoder.sample_rate() as u64;
    let channels = decoder.channels() as u64;
    if rate == 0 || channels == 0 {
        return Ok(None);
    }
    let samples = decoder.count() as u64;
    Ok(Some(Duration::from_secs_f64(
        samples as f64 / (rate * channels) as f64,
    )))
}

#[cfg(test)]
mod tests;
