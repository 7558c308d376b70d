//! Step-response metrics computed from the emitted sample sequence.
//!
//! This module is a pure consumer: it never touches the simulation, it only
//! reads [`Sample`]s (from the history buffer or a [`SampleRecorder`]).
//!
//! Metrics are computed over the trailing segment of samples that share the
//! final setpoint, so a target change mid-run starts a new step response.

use serde::Serialize;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::context::Sample;

/// Samples averaged for the steady-state error.
const STEADY_STATE_SAMPLES: usize = 10;

/// Step-response summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepMetrics {
    /// Setpoint of the analysed segment (°C).
    pub target_c: f64,
    /// Temperature just before the segment's first step (°C).
    pub start_c: f64,
    /// Largest excursion past the target in the step direction (°C, ≥ 0).
    pub overshoot_c: f64,
    /// Overshoot as a percentage of the step size (0 for a zero step).
    pub overshoot_pct: f64,
    /// 10 % → 90 % rise time (s). `None` if never reached or zero step.
    pub rise_time_secs: Option<f64>,
    /// Time after which the temperature stays inside the band (s).
    /// `None` if the last sample is still outside.
    pub settling_time_secs: Option<f64>,
    /// Mean `target − T` over the last few samples (°C).
    pub steady_state_error_c: f64,
    /// Integral of absolute error (°C·s).
    pub iae: f64,
    /// Number of samples in the segment.
    pub samples: usize,
}

/// Analyse the trailing constant-target segment of `samples`.
///
/// `start_c` is used as the pre-step temperature when the segment begins
/// at the first sample; otherwise the sample preceding the segment is.
pub fn analyze(start_c: f64, samples: &[Sample], band_c: f64) -> Option<StepMetrics> {
    let last = samples.last()?;
    let target = last.target_c;
    let seg_start = samples
        .iter()
        .rposition(|s| s.target_c != target)
        .map_or(0, |i| i + 1);
    let seg = &samples[seg_start..];

    let (origin_c, origin_t) = match seg_start.checked_sub(1) {
        Some(prev) => (samples[prev].temperature_c, samples[prev].time_secs),
        None => (start_c, seg[0].time_secs - tick_period(seg[0])),
    };

    let step = target - origin_c;
    let direction = if step < 0.0 { -1.0 } else { 1.0 };

    let overshoot_c = seg
        .iter()
        .map(|s| (s.temperature_c - target) * direction)
        .fold(0.0_f64, f64::max);
    let overshoot_pct = if step.abs() > f64::EPSILON {
        overshoot_c / step.abs() * 100.0
    } else {
        0.0
    };

    let rise_time_secs = if step.abs() > f64::EPSILON {
        let progress = |s: &Sample| (s.temperature_c - origin_c) / step;
        let t10 = seg.iter().find(|s| progress(s) >= 0.1).map(|s| s.time_secs);
        let t90 = seg.iter().find(|s| progress(s) >= 0.9).map(|s| s.time_secs);
        t10.zip(t90).map(|(a, b)| b - a)
    } else {
        None
    };

    let outside = |s: &Sample| (s.temperature_c - target).abs() > band_c;
    let settling_time_secs = match seg.iter().rposition(outside) {
        None => Some(seg[0].time_secs - origin_t),
        Some(i) if i + 1 < seg.len() => Some(seg[i + 1].time_secs - origin_t),
        Some(_) => None,
    };

    let tail = &seg[seg.len().saturating_sub(STEADY_STATE_SAMPLES)..];
    let steady_state_error_c =
        tail.iter().map(|s| target - s.temperature_c).sum::<f64>() / tail.len() as f64;

    // Each sample covers the interval since the one before it.
    let iae = seg
        .iter()
        .scan(origin_t, |prev_t, s| {
            let dt = s.time_secs - *prev_t;
            *prev_t = s.time_secs;
            Some((target - s.temperature_c).abs() * dt)
        })
        .sum();

    Some(StepMetrics {
        target_c: target,
        start_c: origin_c,
        overshoot_c,
        overshoot_pct,
        rise_time_secs,
        settling_time_secs,
        steady_state_error_c,
        iae,
        samples: seg.len(),
    })
}

/// Mean seconds per tick up to `sample`.
fn tick_period(sample: Sample) -> f64 {
    if sample.tick == 0 {
        0.0
    } else {
        sample.time_secs / sample.tick as f64
    }
}

// ---------------------------------------------------------------------------
// Recorder sink
// ---------------------------------------------------------------------------

/// Event sink that keeps every sample of the current run, unbounded.
/// A reset starts a new run.
#[derive(Debug, Default)]
pub struct SampleRecorder {
    samples: Vec<Sample>,
}

impl SampleRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn analyze(&self, start_c: f64, band_c: f64) -> Option<StepMetrics> {
        analyze(start_c, &self.samples, band_c)
    }
}

impl EventSink for SampleRecorder {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Sample(s) => self.samples.push(*s),
            AppEvent::SimulationReset { .. } => self.samples.clear(),
            _ => {}
        }
    }
}
