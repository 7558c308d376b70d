//! Simulation configuration parameters
//!
//! All tunable parameters for the thermal simulation and the fuzzy
//! controller. Values can be overridden from a JSON file through a
//! [`ConfigPort`](crate::app::ports::ConfigPort); missing fields fall back
//! to the defaults below.

use serde::{Deserialize, Serialize};

use crate::control::rules::RuleBase;
use crate::error::ConfigError;
use crate::plant::AmbientMode;

/// Core simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // --- Plausible range ---
    /// Lowest temperature the room can reach (°C)
    pub min_temperature_c: f64,
    /// Highest temperature the room can reach (°C)
    pub max_temperature_c: f64,

    // --- Initial conditions ---
    /// Room temperature on start-up and after every reset (°C)
    pub initial_temperature_c: f64,
    /// Setpoint on start-up (°C)
    pub target_temperature_c: f64,
    /// Season on start-up
    pub ambient_mode: AmbientMode,

    // --- Plant ---
    /// Simulated seconds per tick
    pub tick_secs: f64,
    /// Temperature change per second at full power (°C/s)
    pub actuator_gain_c_per_sec: f64,
    /// Passive drift magnitude per second, signed by the season (°C/s)
    pub ambient_drift_c_per_sec: f64,

    // --- Controller ---
    /// Error is clamped to ±this before fuzzification (°C)
    pub error_span_c: f64,
    /// Points used to integrate the centroid over [-1, 1]
    pub defuzz_samples: usize,
    /// Membership functions and rule table
    pub rule_base: RuleBase,

    // --- Operator ---
    /// Step applied by the target up/down controls (°C)
    pub target_step_c: f64,
    /// |T - target| at or below this counts as "at target" (°C)
    pub at_target_tolerance_c: f64,
    /// Band around the target used for settling-time metrics (°C)
    pub settle_band_c: f64,

    // --- Reporting ---
    /// Running ticks between telemetry events (0 disables telemetry)
    pub telemetry_every_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Range
            min_temperature_c: 0.0,
            max_temperature_c: 50.0,

            // Initial conditions
            initial_temperature_c: 18.0,
            target_temperature_c: 22.0,
            ambient_mode: AmbientMode::Summer,

            // Plant
            tick_secs: 0.5,               // 2 Hz
            actuator_gain_c_per_sec: 0.8, // 0.4 °C per tick at full power
            ambient_drift_c_per_sec: 0.05,

            // Controller
            error_span_c: 20.0,
            defuzz_samples: 201, // 0.01 resolution
            rule_base: RuleBase::default(),

            // Operator
            target_step_c: 0.5,
            at_target_tolerance_c: 0.4,
            settle_band_c: 0.5,

            // Reporting
            telemetry_every_ticks: 10, // every 5 s
        }
    }
}

impl SimConfig {
    /// Validate configuration parameters. Values are never clamped here:
    /// an out-of-range field is rejected with the field name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn fail(msg: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::ValidationFailed(msg))
        }

        if !self.min_temperature_c.is_finite() || !self.max_temperature_c.is_finite() {
            return fail("temperature range: bounds must be finite");
        }
        if self.min_temperature_c >= self.max_temperature_c {
            return fail("temperature range: min must be below max");
        }
        if !self.in_range(self.initial_temperature_c) {
            return fail("initial_temperature_c: must lie within the temperature range");
        }
        if !self.in_range(self.target_temperature_c) {
            return fail("target_temperature_c: must lie within the temperature range");
        }
        if !(self.tick_secs.is_finite() && self.tick_secs > 0.0) {
            return fail("tick_secs: must be > 0");
        }
        if !(self.actuator_gain_c_per_sec.is_finite() && self.actuator_gain_c_per_sec >= 0.0) {
            return fail("actuator_gain_c_per_sec: must be >= 0");
        }
        if !(self.ambient_drift_c_per_sec.is_finite() && self.ambient_drift_c_per_sec >= 0.0) {
            return fail("ambient_drift_c_per_sec: must be >= 0");
        }
        if !(self.error_span_c.is_finite() && self.error_span_c > 0.0) {
            return fail("error_span_c: must be > 0");
        }
        if !(3..=100_001).contains(&self.defuzz_samples) {
            return fail("defuzz_samples: must be in 3..=100001");
        }
        if !(self.target_step_c.is_finite() && self.target_step_c > 0.0) {
            return fail("target_step_c: must be > 0");
        }
        if !(self.at_target_tolerance_c.is_finite() && self.at_target_tolerance_c >= 0.0) {
            return fail("at_target_tolerance_c: must be >= 0");
        }
        if !(self.settle_band_c.is_finite() && self.settle_band_c > 0.0) {
            return fail("settle_band_c: must be > 0");
        }
        self.rule_base
            .validate()
            .map_err(ConfigError::ValidationFailed)
    }

    /// Load from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| {
            log::warn!("config JSON parse error: {e}");
            ConfigError::Corrupted
        })
    }

    /// Serialise to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|_| ConfigError::Corrupted)
    }

    /// Whether `value` lies in the plausible temperature range.
    pub fn in_range(&self, value: f64) -> bool {
        (self.min_temperature_c..=self.max_temperature_c).contains(&value)
    }
}
