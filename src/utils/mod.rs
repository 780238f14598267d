//! Shared helpers for the demo binaries.

pub mod terminal;
