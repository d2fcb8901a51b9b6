//! Notification plumbing between platform threads and the UI event loop.
//!
//! Every handle gets its own subscription. Detaching a subscription is
//! synchronous: the emitter stops sending immediately, and anything it had
//! already queued is discarded when the loop drains the bus.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::events::{HandleId, MediaEvent, Notification};

type LiveMap = HashMap<HandleId, Arc<AtomicBool>>;

/// Owning end of the bus; lives with the event loop.
pub struct NotificationBus {
    rx: Receiver<Notification>,
    subs: Subscriptions,
}

/// Cloneable registration side of the bus, handed to whoever creates handles.
#[derive(Clone)]
pub struct Subscriptions {
    tx: Sender<Notification>,
    live: Arc<Mutex<LiveMap>>,
    next_id: Arc<AtomicU64>,
}

/// Sending end held by a platform thread for exactly one handle.
#[derive(Clone)]
pub struct Emitter {
    id: HandleId,
    tx: Sender<Notification>,
    live: Arc<AtomicBool>,
}

impl NotificationBus {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            subs: Subscriptions {
                tx,
                live: Arc::new(Mutex::new(HashMap::new())),
                next_id: Arc::new(AtomicU64::new(1)),
            },
        }
    }

    pub fn subscriptions(&self) -> Subscriptions {
        self.subs.clone()
    }

    /// Take everything queued so far, dropping notifications from detached handles.
    pub fn drain(&self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.rx.try_recv() {
            if self.subs.is_live(n.handle) {
                out.push(n);
            } else {
                log::debug!("dropping stale {:?} from detached handle {}", n.event, n.handle);
            }
        }
        out
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscriptions {
    fn live_map(&self) -> MutexGuard<'_, LiveMap> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new handle and return the emitter its platform thread will use.
    pub fn subscribe(&self) -> Emitter {
        let id = HandleId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let flag = Arc::new(AtomicBool::new(true));
        self.live_map().insert(id, flag.clone());
        Emitter {
            id,
            tx: self.tx.clone(),
            live: flag,
        }
    }

    /// Detach `id`. Returns `false` if it was already detached.
    pub fn detach(&self, id: HandleId) -> bool {
        match self.live_map().remove(&id) {
            Some(flag) => {
                flag.store(false, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    pub fn is_live(&self, id: HandleId) -> bool {
        self.live_map().contains_key(&id)
    }

    /// Number of handles currently subscribed.
    pub fn live_count(&self) -> usize {
        self.live_map().len()
    }
}

impl Emitter {
    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Send `event` unless the subscription was detached. Returns whether it was sent.
    pub fn emit(&self, event: MediaEvent) -> bool {
        if !self.is_live() {
            return false;
        }
        self.tx
            .send(Notification {
                handle: self.id,
                event,
            })
            .is_ok()
    }
}
