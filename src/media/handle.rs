use std::time::Duration;

use super::bus::Subscriptions;
use super::events::HandleId;
use super::platform::{MediaCmd, Platform, Transport};
use super::source::MediaSource;

/// Live binding between one clip and the platform's output path.
///
/// Dropping the handle tears it down: the subscription is detached first so
/// no late callback can land, then the platform is told to stop.
pub struct MediaHandle {
    id: HandleId,
    source: MediaSource,
    transport: Box<dyn Transport>,
    subs: Subscriptions,
    torn_down: bool,
}

impl MediaHandle {
    /// Subscribe, open a transport and issue `load(source)`.
    pub fn open(source: MediaSource, platform: &dyn Platform, subs: &Subscriptions) -> Self {
        let emitter = subs.subscribe();
        let id = emitter.id();
        let mut transport = platform.open(emitter);
        log::info!("handle {id}: loading {source}");
        transport.request(MediaCmd::Load(source.clone()));
        Self {
            id,
            source,
            transport,
            subs: subs.clone(),
            torn_down: false,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    pub fn play(&mut self) {
        self.send(MediaCmd::Play);
    }

    pub fn pause(&mut self) {
        self.send(MediaCmd::Pause);
    }

    /// Seek to `target`, clamped into `[0, duration]`. Returns the clamped target.
    pub fn seek(&mut self, target: Duration, duration: Duration) -> Duration {
        let target = target.min(duration);
        self.send(MediaCmd::Seek(target));
        target
    }

    /// Detach notifications, then stop playback. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.subs.detach(self.id);
        self.transport.request(MediaCmd::Shutdown);
        log::info!("handle {}: torn down", self.id);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn send(&mut self, cmd: MediaCmd) {
        if self.torn_down {
            log::debug!("handle {}: ignoring {cmd:?} after teardown", self.id);
            return;
        }
        self.transport.request(cmd);
    }
}

impl Drop for MediaHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}
