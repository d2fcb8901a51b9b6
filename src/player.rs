//! The inline clip player: progress model, decorative waveform and the
//! widget that composes them around one `MediaHandle`.

mod progress;
mod waveform;
mod widget;

pub use progress::{PlaybackSnapshot, ProgressModel, format_time};
pub use waveform::{WaveformModel, scrub_fraction};
pub use widget::{CloseOutcome, PlaybackWidget, ToggleOutcome, WidgetState};
