//! Application core — pure domain logic, zero I/O.
//!
//! This module wires the fuzzy controller, the room model and the run-state
//! FSM into a single stepper. All interaction with the outside world happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without a GUI, files or a clock.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
