//! Media handle binding: one decodable clip bound to the platform audio sink.
//!
//! A `MediaHandle` only *requests* actions (load, play, pause, seek). The
//! platform answers asynchronously through `Notification`s on the
//! `NotificationBus`, and those notifications are the only thing that moves
//! displayed state.

mod bus;
mod error;
mod events;
#[cfg(test)]
pub(crate) mod fake;
mod fetch;
mod handle;
mod platform;
mod rodio_platform;
mod source;

pub use bus::{Emitter, NotificationBus, Subscriptions};
pub use error::MediaError;
pub use events::{HandleId, MediaEvent, Notification};
pub use handle::MediaHandle;
pub use platform::{MediaCmd, Platform, Transport};
pub use rodio_platform::RodioPlatform;
pub use source::{MediaSource, SourceKind};
