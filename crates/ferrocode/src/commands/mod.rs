//! Command handlers for the ferrocode CLI.

pub mod snapshot;
pub mod undo;
