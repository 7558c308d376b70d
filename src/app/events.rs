//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them: draw a graph, log to the console, append to
//! a CSV run log, feed a metrics calculator.

use serde::Serialize;

use crate::control::rules::Action;
use crate::fsm::RunState;
use crate::fsm::context::Sample;
use crate::plant::AmbientMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// One simulation step completed.
    Sample(Sample),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// The run state changed.
    StateChanged { from: RunState, to: RunState },

    /// The setpoint changed (values after clamping).
    TargetChanged { from: f64, to: f64 },

    /// The season changed.
    ModeChanged(AmbientMode),

    /// The simulation was reset to its initial temperature.
    SimulationReset { temperature_c: f64 },

    /// A new configuration was accepted.
    ConfigUpdated,

    /// The application service has started (carries initial state).
    Started(RunState),
}

/// A point-in-time telemetry snapshot suitable for logging or display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryData {
    pub state: RunState,
    pub tick: u64,
    pub time_secs: f64,
    pub temperature_c: f64,
    pub target_c: f64,
    pub error_c: f64,
    /// Change of the error per simulated second over the latest step.
    pub error_rate_c_per_sec: f64,
    pub power: f64,
    pub action: Action,
    pub mode: AmbientMode,
    pub at_target: bool,
}
