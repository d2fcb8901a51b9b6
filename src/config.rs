//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive the player widget, the
//! recording catalog and logging, plus helpers to load them from disk.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
