//! ShakeTorch library.
//!
//! Shake-gesture torch toggle: a debounced multi-peak shake detector fed
//! by a motion sensor, and a permission-gated torch controller that
//! accepts one toggle at a time from either the detector or the UI.
//!
//! Platform specifics live behind the port traits in [`app::ports`];
//! [`adapters`] holds the host implementations used by the replay tool
//! and the tests.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod sensors;
