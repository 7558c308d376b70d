//! FuzzyTherm library.
//!
//! A Mamdani fuzzy controller driving a simulated room. The control core
//! (`control`, `plant`, `fsm`) is pure and deterministic; everything that
//! touches the outside world sits behind the port traits in [`app::ports`]
//! and is implemented in [`adapters`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod fsm;
pub mod history;
pub mod metrics;
pub mod plant;
