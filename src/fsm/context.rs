//! Simulation state threaded through every FSM handler.
//!
//! `SimContext` is the single struct that state handlers read from and
//! write to. It owns the evolving room temperature, the operator inputs
//! (target, season), the controller and the configuration. Nothing here
//! is global: two contexts never share state.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::control::fuzzy::{ControlOutput, FuzzyController};
use crate::control::rules::Action;
use crate::plant::{self, AmbientMode};

// ---------------------------------------------------------------------------
// Sample (one per running tick; consumed by sinks, history and metrics)
// ---------------------------------------------------------------------------

/// The state emitted after every simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    /// Simulation tick index, starting at 1 for the first step after reset.
    pub tick: u64,
    /// Simulated seconds since reset.
    pub time_secs: f64,
    /// Room temperature after the step (°C).
    pub temperature_c: f64,
    /// Setpoint in force during the step (°C).
    pub target_c: f64,
    /// Controller power applied during the step, in `[-1, 1]`.
    pub power: f64,
    /// Dominant controller action.
    pub action: Action,
}

// ---------------------------------------------------------------------------
// SimContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct SimContext {
    // -- Simulation state --
    /// Simulation steps taken since the last reset.
    pub tick_index: u64,
    /// Simulated seconds since the last reset, summed step by step so a
    /// runtime change of `tick_secs` never rewrites past time.
    pub elapsed_secs: f64,
    /// Current room temperature (°C).
    pub temperature_c: f64,
    /// Operator setpoint (°C), always inside the configured range.
    pub target_c: f64,
    /// Current season.
    pub mode: AmbientMode,
    /// Controller result from the latest step.
    pub last_output: ControlOutput,
    /// Sample produced by the current tick, if a step ran.
    pub pending_sample: Option<Sample>,
    /// Rate of change of the error over the latest step (°C/s).
    pub error_rate_c_per_sec: f64,
    prev_error_c: Option<f64>,

    // -- Control --
    pub controller: FuzzyController,
    pub config: SimConfig,
}

impl SimContext {
    /// Create a new context with the given configuration. A configuration
    /// that fails validation is replaced by the defaults.
    pub fn new(config: SimConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("Invalid configuration ({e}); using defaults");
                SimConfig::default()
            }
        };
        let controller = FuzzyController::from_config(&config);
        let temperature_c = plant::sanitize(
            config.initial_temperature_c,
            config.min_temperature_c,
            config.min_temperature_c,
            config.max_temperature_c,
        );
        let target_c = plant::sanitize(
            config.target_temperature_c,
            temperature_c,
            config.min_temperature_c,
            config.max_temperature_c,
        );
        Self {
            tick_index: 0,
            elapsed_secs: 0.0,
            temperature_c,
            target_c,
            mode: config.ambient_mode,
            last_output: ControlOutput::default(),
            pending_sample: None,
            error_rate_c_per_sec: 0.0,
            prev_error_c: None,
            controller,
            config,
        }
    }

    /// Restore the initial temperature and clear per-run state. Target and
    /// season are operator settings and survive a reset.
    pub fn reset(&mut self) {
        self.tick_index = 0;
        self.elapsed_secs = 0.0;
        self.temperature_c = plant::sanitize(
            self.config.initial_temperature_c,
            self.config.min_temperature_c,
            self.config.min_temperature_c,
            self.config.max_temperature_c,
        );
        self.last_output = ControlOutput::default();
        self.pending_sample = None;
        self.error_rate_c_per_sec = 0.0;
        self.prev_error_c = None;
    }

    /// Query the controller, apply control plus drift, and record the
    /// resulting sample.
    pub fn step(&mut self) -> Sample {
        let output = self.controller.evaluate(self.temperature_c, self.target_c);
        self.temperature_c = plant::step(self.temperature_c, output.power, self.mode, &self.config);
        self.last_output = output;
        self.tick_index += 1;
        self.elapsed_secs += self.config.tick_secs;

        let error = self.error_c();
        self.error_rate_c_per_sec = self
            .prev_error_c
            .map_or(0.0, |prev| (error - prev) / self.config.tick_secs);
        self.prev_error_c = Some(error);

        let sample = Sample {
            tick: self.tick_index,
            time_secs: self.elapsed_secs,
            temperature_c: self.temperature_c,
            target_c: self.target_c,
            power: output.power,
            action: output.action,
        };
        self.pending_sample = Some(sample);
        sample
    }

    /// Take the sample produced by the latest tick, if any.
    pub fn take_sample(&mut self) -> Option<Sample> {
        self.pending_sample.take()
    }

    /// Clamp and store a new setpoint. NaN keeps the current value.
    /// Returns the setpoint actually in force.
    pub fn set_target(&mut self, requested_c: f64) -> f64 {
        self.target_c = plant::sanitize(
            requested_c,
            self.target_c,
            self.config.min_temperature_c,
            self.config.max_temperature_c,
        );
        self.target_c
    }

    /// Swap in a new configuration and rebuild the controller. The target
    /// and season are taken from the new configuration; the temperature is
    /// pulled back into the new range. Callers validate `config` first.
    pub fn apply_config(&mut self, config: SimConfig) {
        self.controller = FuzzyController::from_config(&config);
        self.config = config;
        self.temperature_c = plant::sanitize(
            self.temperature_c,
            self.config.initial_temperature_c,
            self.config.min_temperature_c,
            self.config.max_temperature_c,
        );
        let target = self.config.target_temperature_c;
        self.set_target(target);
        self.mode = self.config.ambient_mode;
    }

    /// Signed error `target − current` (°C).
    pub fn error_c(&self) -> f64 {
        self.target_c - self.temperature_c
    }

    /// Whether the room is within the at-target tolerance.
    pub fn at_target(&self) -> bool {
        self.error_c().abs() <= self.config.at_target_tolerance_c
    }
}
