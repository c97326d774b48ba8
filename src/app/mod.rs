//! Application core — pure domain logic, zero platform I/O.
//!
//! This module contains the rules for the shake-to-torch screen: the
//! torch controller, the per-screen session that wires the detector to
//! it, and the commands and events crossing the boundary. All interaction
//! with sensors, permission dialogs and the torch happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable with
//! mock adapters.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod torch;
