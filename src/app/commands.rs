//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (a GUI, the CLI
//! driver, a test) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.

use crate::config::SimConfig;
use crate::plant::AmbientMode;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Begin or resume stepping (Stopped/Paused → Running).
    Start,

    /// Freeze the simulation (Running → Paused).
    Pause,

    /// Return to Stopped with the initial temperature restored.
    Reset,

    /// Set the setpoint; clamped to the configured range.
    SetTarget(f64),

    /// Raise the setpoint by the configured `target_step_c` (the up button).
    RaiseTarget,

    /// Lower the setpoint by the configured `target_step_c` (the down button).
    LowerTarget,

    /// Select the season.
    SetMode(AmbientMode),

    /// Switch summer ↔ winter.
    ToggleMode,

    /// Hot-reload configuration. Rejected if it fails validation.
    UpdateConfig(SimConfig),

    /// Persist the current config on the next auto-save check.
    SaveConfig,
}
