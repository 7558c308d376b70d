//! Mamdani fuzzy inference over the temperature error.
//!
//! ```text
//!  error ─▶ fuzzify ─▶ fire rules ─▶ aggregate (max) ─▶ clip + union ─▶ centroid ─▶ power
//! ```
//!
//! Evaluation is a pure function of `(current, target)` and the immutable
//! rule base. It is total: non-finite inputs are sanitised, the error is
//! clamped to the configured span, and an empty aggregate yields zero.

use log::{trace, warn};

use super::rules::{Action, ErrorTerm, PowerTerm, RuleBase};
use crate::config::SimConfig;

/// Lower bound of the output universe.
pub const POWER_MIN: f64 = -1.0;
/// Upper bound of the output universe.
pub const POWER_MAX: f64 = 1.0;

/// Error span used when the requested one is unusable (°C).
const DEFAULT_ERROR_SPAN_C: f64 = 20.0;

/// Aggregated areas at or below this are treated as empty.
const MIN_AREA: f64 = 1e-12;

/// The crisp result of one inference pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOutput {
    /// Error actually evaluated (after sanitising and clamping).
    pub error_c: f64,
    /// Defuzzified power: negative cools, positive heats, in `[-1, 1]`.
    pub power: f64,
    /// Category of the dominant output term.
    pub action: Action,
    /// Output term with the strongest aggregated firing, if any fired.
    pub dominant: Option<PowerTerm>,
    /// Aggregated firing strength per output term.
    pub strengths: [f64; PowerTerm::COUNT],
}

impl ControlOutput {
    /// No action: nothing fired.
    pub fn idle(error_c: f64) -> Self {
        Self {
            error_c,
            power: 0.0,
            action: Action::Neutral,
            dominant: None,
            strengths: [0.0; PowerTerm::COUNT],
        }
    }
}

impl Default for ControlOutput {
    fn default() -> Self {
        Self::idle(0.0)
    }
}

/// Fuzzy controller: rule base plus evaluation parameters.
#[derive(Debug, Clone)]
pub struct FuzzyController {
    rules: RuleBase,
    error_span_c: f64,
    samples: usize,
}

impl FuzzyController {
    /// `samples` is the number of points used to integrate the centroid
    /// over `[-1, 1]`; values below 2 are raised to 2. A zero or
    /// non-finite `error_span_c` is replaced by the 20 °C default.
    pub fn new(rules: RuleBase, error_span_c: f64, samples: usize) -> Self {
        let mut span = error_span_c.abs();
        if !span.is_finite() || span == 0.0 {
            warn!("fuzzy: unusable error span {error_span_c}, using {DEFAULT_ERROR_SPAN_C}");
            span = DEFAULT_ERROR_SPAN_C;
        }
        Self {
            rules,
            error_span_c: span,
            samples: samples.max(2),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.rule_base.clone(),
            config.error_span_c,
            config.defuzz_samples,
        )
    }

    pub fn rule_base(&self) -> &RuleBase {
        &self.rules
    }

    /// Evaluate the controller for a current and target temperature.
    pub fn evaluate(&self, current_c: f64, target_c: f64) -> ControlOutput {
        let raw = target_c - current_c;
        let error = if raw.is_nan() {
            0.0
        } else {
            raw.clamp(-self.error_span_c, self.error_span_c)
        };

        let degrees = self.fuzzify(error);
        let strengths = self.fire(&degrees);

        if strengths.iter().all(|s| *s <= 0.0) {
            trace!("fuzzy: error {error:.3} outside every term, no action");
            return ControlOutput::idle(error);
        }

        let power = self.centroid(&strengths);
        let dominant = dominant_term(&strengths);
        let action = dominant.map_or(Action::Neutral, PowerTerm::action);

        trace!(
            "fuzzy: error={error:.3} power={power:.4} dominant={:?}",
            dominant.map(PowerTerm::name)
        );

        ControlOutput {
            error_c: error,
            power,
            action,
            dominant,
            strengths,
        }
    }

    /// Degree of membership of `error` in each input term.
    pub fn fuzzify(&self, error: f64) -> [f64; ErrorTerm::COUNT] {
        let mut degrees = [0.0; ErrorTerm::COUNT];
        for term in ErrorTerm::ALL {
            degrees[term as usize] = self.rules.error_fn(term).degree(error);
        }
        degrees
    }

    /// Firing strength per rule, max-aggregated per output term.
    fn fire(&self, degrees: &[f64; ErrorTerm::COUNT]) -> [f64; PowerTerm::COUNT] {
        let mut strengths = [0.0_f64; PowerTerm::COUNT];
        for rule in &self.rules.rules {
            let strength = degrees[rule.when as usize];
            let slot = &mut strengths[rule.then as usize];
            *slot = slot.max(strength);
        }
        strengths
    }

    /// Centre of gravity of the clipped, max-unioned output set.
    fn centroid(&self, strengths: &[f64; PowerTerm::COUNT]) -> f64 {
        let step = (POWER_MAX - POWER_MIN) / (self.samples - 1) as f64;
        let mut moment = 0.0;
        let mut area = 0.0;

        for i in 0..self.samples {
            let x = POWER_MIN + step * i as f64;
            let mu = PowerTerm::ALL
                .iter()
                .map(|t| strengths[*t as usize].min(self.rules.power_fn(*t).degree(x)))
                .fold(0.0_f64, f64::max);
            moment += x * mu;
            area += mu;
        }

        if area <= MIN_AREA {
            return 0.0;
        }
        (moment / area).clamp(POWER_MIN, POWER_MAX)
    }
}

impl Default for FuzzyController {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

/// First term (in table order) with the highest non-zero strength.
fn dominant_term(strengths: &[f64; PowerTerm::COUNT]) -> Option<PowerTerm> {
    let mut best: Option<(PowerTerm, f64)> = None;
    for term in PowerTerm::ALL {
        let s = strengths[term as usize];
        if s > 0.0 && best.is_none_or(|(_, b)| s > b) {
            best = Some((term, s));
        }
    }
    best.map(|(term, _)| term)
}
