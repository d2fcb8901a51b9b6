//! Recording selector: search form, paginated results, location popup and
//! the inline player that the runtime and TUI drive.

mod model;

pub use model::*;
