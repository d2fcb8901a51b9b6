use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use tempfile::TempDir;

use super::*;
use crate::media::bus::NotificationBus;

/// Mono 16-bit PCM WAV, `samples` long at `rate` Hz.
fn wav_bytes(rate: u32, samples: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut buf = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut buf, spec).unwrap();
        for i in 0..samples {
            writer.write_sample(((i % 64) as i16 - 32) * 256).unwrap();
        }
        writer.finalize().unwrap();
    }
    buf.into_inner()
}

fn close_to(a: Duration, b: Duration) -> bool {
    a.abs_diff(b) < Duration::from_millis(20)
}

#[derive(Default)]
struct VoiceState {
    playing: Cell<bool>,
    stopped: Cell<bool>,
    finished: Cell<bool>,
    elapsed: Cell<Duration>,
}

struct ScriptedVoice(Rc<VoiceState>);

impl Voice for ScriptedVoice {
    fn play(&self) {
        self.0.playing.set(true);
    }

    fn pause(&self) {
        self.0.playing.set(false);
    }

    fn stop(&self) {
        self.0.playing.set(false);
        self.0.stopped.set(true);
    }

    fn elapsed(&self) -> Duration {
        self.0.elapsed.get()
    }

    fn is_finished(&self) -> bool {
        self.0.finished.get()
    }
}

/// Output that hands out scripted voices and remembers where each started.
#[derive(Default)]
struct ScriptedOutput {
    starts: RefCell<Vec<Duration>>,
    voices: RefCell<Vec<Rc<VoiceState>>>,
}

impl Output for ScriptedOutput {
    fn voice_at(&self, _bytes: &Arc<[u8]>, start_at: Duration) -> Result<Box<dyn Voice>, MediaError> {
        let state = Rc::new(VoiceState::default());
        self.starts.borrow_mut().push(start_at);
        self.voices.borrow_mut().push(state.clone());
        Ok(Box::new(ScriptedVoice(state)))
    }
}

impl ScriptedOutput {
    fn voice(&self, i: usize) -> Rc<VoiceState> {
        self.voices.borrow()[i].clone()
    }

    fn last_voice(&self) -> Rc<VoiceState> {
        self.voices.borrow().last().cloned().unwrap()
    }
}

struct Rig {
    bus: NotificationBus,
    emitter: Emitter,
    out: ScriptedOutput,
    pb: Playback,
    path: PathBuf,
    _dir: TempDir,
}

impl Rig {
    /// One second of audio on disk, nothing loaded yet.
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        std::fs::write(&path, wav_bytes(8_000, 8_000)).unwrap();
        let bus = NotificationBus::new();
        let emitter = bus.subscriptions().subscribe();
        Self {
            bus,
            emitter,
            out: ScriptedOutput::default(),
            pb: Playback::new(),
            path,
            _dir: dir,
        }
    }

    /// Loaded and drained; returns the clip duration.
    fn loaded() -> (Self, Duration) {
        let mut rig = Self::new();
        let source = MediaSource::new(rig.path.display().to_string()).unwrap();
        rig.send(MediaCmd::Load(source));
        rig.events();
        let d = rig.pb.duration().unwrap();
        (rig, d)
    }

    fn send(&mut self, cmd: MediaCmd) -> Flow {
        apply_command(
            &mut self.pb,
            cmd,
            &self.out,
            &NetworkSettings::default(),
            &self.emitter,
        )
    }

    fn tick(&mut self) {
        on_tick(&mut self.pb, &self.emitter);
    }

    fn events(&self) -> Vec<MediaEvent> {
        self.bus.drain().into_iter().map(|n| n.event).collect()
    }
}

#[test]
fn read_duration_reads_pcm_wav_length() {
    let bytes: Arc<[u8]> = Arc::from(wav_bytes(8_000, 8_000));
    let source = MediaSource::new("one-second.wav").unwrap();
    let d = read_duration(&bytes, &source).unwrap().unwrap();
    assert!(close_to(d, Duration::from_secs(1)), "got {d:?}");

    let bytes: Arc<[u8]> = Arc::from(wav_bytes(16_000, 4_000));
    let d = read_duration(&bytes, &source).unwrap().unwrap();
    assert!(close_to(d, Duration::from_millis(250)), "got {d:?}");
}

#[test]
fn read_duration_rejects_junk_bytes() {
    let bytes: Arc<[u8]> = Arc::from(&b"definitely not audio, just text"[..]);
    let source = MediaSource::new("junk.wav").unwrap();
    assert!(matches!(
        read_duration(&bytes, &source),
        Err(MediaError::Decode(_))
    ));
}

#[test]
fn local_file_is_fetched_and_decoded() {
    let rig = Rig::new();
    let on_disk = std::fs::read(&rig.path).unwrap();

    for raw in [
        rig.path.display().to_string(),
        format!("file://{}", rig.path.display()),
    ] {
        let source = MediaSource::new(raw).unwrap();
        let bytes = fetch_bytes(&source, &NetworkSettings::default()).unwrap();
        assert_eq!(&bytes[..], &on_disk[..]);

        let clip = load_clip(&source, &NetworkSettings::default()).unwrap();
        assert!(close_to(clip.duration.unwrap(), Duration::from_secs(1)));
    }
}

#[test]
fn unsupported_scheme_and_missing_file_are_rejected() {
    let ftp = MediaSource::new("ftp://example.org/clip.wav").unwrap();
    assert_eq!(
        fetch_bytes(&ftp, &NetworkSettings::default()).map(|_| ()),
        Err(MediaError::UnsupportedScheme("ftp".to_string()))
    );

    let dir = tempfile::tempdir().unwrap();
    let missing = MediaSource::new(dir.path().join("gone.wav").display().to_string()).unwrap();
    assert!(matches!(
        load_clip(&missing, &NetworkSettings::default()),
        Err(MediaError::Io { .. })
    ));
}

#[test]
fn load_reports_duration_then_start_position() {
    let mut rig = Rig::new();
    let source = MediaSource::new(rig.path.display().to_string()).unwrap();
    assert_eq!(rig.send(MediaCmd::Load(source)), Flow::Continue);

    let events = rig.events();
    assert_eq!(events.len(), 2);
    match &events[0] {
        MediaEvent::DurationKnown(d) => assert!(close_to(*d, Duration::from_secs(1))),
        other => panic!("expected DurationKnown, got {other:?}"),
    }
    assert_eq!(events[1], MediaEvent::PositionChanged(Duration::ZERO));
    assert!(rig.out.starts.borrow().is_empty());
}

#[test]
fn failed_load_reports_failure_and_drops_queued_play() {
    let mut rig = Rig::new();
    rig.send(MediaCmd::Play);
    let missing = MediaSource::new(format!("{}.missing", rig.path.display())).unwrap();
    rig.send(MediaCmd::Load(missing));

    let events = rig.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], MediaEvent::Failed(MediaError::Io { .. })));
    assert!(!rig.pb.play_queued);
    assert!(!rig.pb.playing);
}

#[test]
fn play_before_load_starts_once_loaded() {
    let mut rig = Rig::new();
    rig.send(MediaCmd::Play);
    assert!(rig.events().is_empty());

    let source = MediaSource::new(rig.path.display().to_string()).unwrap();
    rig.send(MediaCmd::Load(source));
    let events = rig.events();
    assert_eq!(events.last(), Some(&MediaEvent::Playing));
    assert_eq!(rig.out.starts.borrow().as_slice(), &[Duration::ZERO]);
    assert!(rig.out.last_voice().playing.get());
}

#[test]
fn seek_past_end_is_clamped_to_duration() {
    let (mut rig, d) = Rig::loaded();
    rig.send(MediaCmd::Seek(Duration::from_secs(60)));

    assert_eq!(rig.events(), vec![MediaEvent::PositionChanged(d)]);
    assert_eq!(rig.out.starts.borrow().last(), Some(&d));
    assert_eq!(rig.pb.base, d);
}

#[test]
fn seek_while_playing_replaces_voice_and_keeps_playing() {
    let (mut rig, _) = Rig::loaded();
    rig.send(MediaCmd::Play);
    rig.events();

    let target = Duration::from_millis(400);
    rig.send(MediaCmd::Seek(target));
    assert_eq!(rig.events(), vec![MediaEvent::PositionChanged(target)]);
    assert!(rig.out.voice(0).stopped.get());
    assert!(rig.out.voice(1).playing.get());
    assert_eq!(rig.out.starts.borrow()[1], target);
}

#[test]
fn seek_before_load_does_nothing() {
    let mut rig = Rig::new();
    rig.send(MediaCmd::Seek(Duration::from_secs(1)));
    assert!(rig.events().is_empty());
}

#[test]
fn pause_reports_position_then_paused() {
    let (mut rig, _) = Rig::loaded();
    rig.send(MediaCmd::Play);
    rig.events();
    rig.out.last_voice().elapsed.set(Duration::from_millis(300));

    rig.send(MediaCmd::Pause);
    assert_eq!(
        rig.events(),
        vec![
            MediaEvent::PositionChanged(Duration::from_millis(300)),
            MediaEvent::Paused
        ]
    );
    assert!(!rig.out.last_voice().playing.get());

    // Ticks are silent while paused.
    rig.tick();
    assert!(rig.events().is_empty());
}

#[test]
fn reported_position_never_exceeds_duration() {
    let (mut rig, d) = Rig::loaded();
    rig.send(MediaCmd::Play);
    rig.events();
    rig.out.last_voice().elapsed.set(d + Duration::from_secs(5));

    rig.tick();
    assert_eq!(rig.events(), vec![MediaEvent::PositionChanged(d)]);
}

#[test]
fn end_of_clip_reports_end_position_then_ended() {
    let (mut rig, d) = Rig::loaded();
    rig.send(MediaCmd::Play);
    assert_eq!(rig.events(), vec![MediaEvent::Playing]);

    let voice = rig.out.last_voice();
    voice.elapsed.set(Duration::from_millis(500));
    rig.tick();
    assert_eq!(
        rig.events(),
        vec![MediaEvent::PositionChanged(Duration::from_millis(500))]
    );

    voice.finished.set(true);
    rig.tick();
    assert_eq!(
        rig.events(),
        vec![MediaEvent::PositionChanged(d), MediaEvent::Ended]
    );
    assert!(!rig.pb.playing);
    assert!(rig.pb.ended);
    assert!(voice.stopped.get());

    rig.tick();
    assert!(rig.events().is_empty());

    // Play after the end only repeats Ended.
    rig.send(MediaCmd::Play);
    assert_eq!(rig.events(), vec![MediaEvent::Ended]);

    // Seeking back re-opens the clip.
    rig.send(MediaCmd::Seek(Duration::ZERO));
    assert_eq!(rig.events(), vec![MediaEvent::PositionChanged(Duration::ZERO)]);
    rig.send(MediaCmd::Play);
    assert_eq!(rig.events(), vec![MediaEvent::Playing]);
    assert!(rig.out.last_voice().playing.get());
}

#[test]
fn shutdown_stops_voice_and_exits() {
    let (mut rig, _) = Rig::loaded();
    rig.send(MediaCmd::Play);
    assert_eq!(rig.send(MediaCmd::Shutdown), Flow::Exit);
    assert!(rig.out.last_voice().stopped.get());
    assert!(!rig.pb.playing);
}

#[test]
fn failed_thread_spawn_fails_the_load() {
    let rig = Rig::new();
    spawn_failed(&rig.emitter, &std::io::Error::other("resource temporarily unavailable"));
    let events = rig.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], MediaEvent::Failed(MediaError::NoOutput(_))));
}
