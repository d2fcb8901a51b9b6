//! Scripted platform for tests: records every request and lets the test
//! play the part of the audio thread by emitting events by hand.

use std::cell::RefCell;
use std::rc::Rc;

use super::bus::Emitter;
use super::events::{HandleId, MediaEvent};
use super::platform::{MediaCmd, Platform, Transport};

#[derive(Default)]
struct Log {
    cmds: Vec<(HandleId, MediaCmd)>,
    emitters: Vec<Emitter>,
}

#[derive(Clone, Default)]
pub(crate) struct FakePlatform {
    log: Rc<RefCell<Log>>,
}

struct FakeTransport {
    id: HandleId,
    log: Rc<RefCell<Log>>,
}

impl Platform for FakePlatform {
    fn open(&self, emitter: Emitter) -> Box<dyn Transport> {
        let id = emitter.id();
        self.log.borrow_mut().emitters.push(emitter);
        Box::new(FakeTransport {
            id,
            log: self.log.clone(),
        })
    }
}

impl Transport for FakeTransport {
    fn request(&mut self, cmd: MediaCmd) {
        self.log.borrow_mut().cmds.push((self.id, cmd));
    }
}

impl FakePlatform {
    pub(crate) fn commands(&self) -> Vec<(HandleId, MediaCmd)> {
        self.log.borrow().cmds.clone()
    }

    pub(crate) fn commands_for(&self, id: HandleId) -> Vec<MediaCmd> {
        self.log
            .borrow()
            .cmds
            .iter()
            .filter(|(h, _)| *h == id)
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub(crate) fn last_command(&self) -> Option<MediaCmd> {
        self.log.borrow().cmds.last().map(|(_, c)| c.clone())
    }

    /// Emit `event` as the platform thread of `id` would. Returns whether it was sent.
    pub(crate) fn emit(&self, id: HandleId, event: MediaEvent) -> bool {
        self.log
            .borrow()
            .emitters
            .iter()
            .find(|e| e.id() == id)
            .is_some_and(|e| e.emit(event))
    }
}
