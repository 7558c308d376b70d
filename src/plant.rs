//! Simulated thermal plant.
//!
//! A single lumped room temperature driven by the controller's power and a
//! constant seasonal drift:
//!
//! ```text
//!   T[k+1] = clamp( T[k] + u·G·dt + s·D·dt )
//!
//!   u  controller power in [-1, 1]      G  actuator gain (°C/s)
//!   s  +1 summer, -1 winter             D  drift magnitude (°C/s)
//! ```

use core::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// Season, selecting the direction of passive drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientMode {
    /// Room drifts warmer.
    #[default]
    Summer,
    /// Room drifts colder.
    Winter,
}

impl AmbientMode {
    /// `+1.0` for summer, `-1.0` for winter.
    pub fn drift_sign(self) -> f64 {
        match self {
            Self::Summer => 1.0,
            Self::Winter => -1.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Summer => Self::Winter,
            Self::Winter => Self::Summer,
        }
    }
}

impl fmt::Display for AmbientMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summer => write!(f, "summer"),
            Self::Winter => write!(f, "winter"),
        }
    }
}

/// Clamp `value` to `[lo, hi]`. NaN maps to `fallback`, ±∞ to the nearest
/// bound.
#[inline]
pub fn sanitize(value: f64, fallback: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        warn!("plant: NaN detected, keeping {fallback:.2}");
        return fallback.clamp(lo, hi);
    }
    value.clamp(lo, hi)
}

/// Temperature change from the actuator over one tick.
pub fn control_delta(power: f64, config: &SimConfig) -> f64 {
    power.clamp(-1.0, 1.0) * config.actuator_gain_c_per_sec * config.tick_secs
}

/// Temperature change from ambient drift over one tick.
pub fn drift_delta(mode: AmbientMode, config: &SimConfig) -> f64 {
    mode.drift_sign() * config.ambient_drift_c_per_sec * config.tick_secs
}

/// Advance the room temperature by one tick.
pub fn step(temperature_c: f64, power: f64, mode: AmbientMode, config: &SimConfig) -> f64 {
    let next = temperature_c + control_delta(power, config) + drift_delta(mode, config);
    sanitize(
        next,
        temperature_c,
        config.min_temperature_c,
        config.max_temperature_c,
    )
}
