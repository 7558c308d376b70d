//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade. Per-step samples go out at `trace` so a normal run
//! only shows the periodic telemetry line.

use log::{info, trace};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Sample(s) => {
                trace!(
                    "STEP  | #{} t={:.1}s | T={:.2}\u{00b0}C target={:.1}\u{00b0}C | u={:+.3} {}",
                    s.tick,
                    s.time_secs,
                    s.temperature_c,
                    s.target_c,
                    s.power,
                    s.action.as_str(),
                );
            }
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={:?} | t={:.1}s | T={:.2}\u{00b0}C target={:.1}\u{00b0}C \
                     err={:+.2} ({:+.3}/s) | u={:+.3} {} | mode={} | {}",
                    t.state,
                    t.time_secs,
                    t.temperature_c,
                    t.target_c,
                    t.error_c,
                    t.error_rate_c_per_sec,
                    t.power,
                    t.action.as_str(),
                    t.mode,
                    if t.at_target { "AT TARGET" } else { "settling" },
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::TargetChanged { from, to } => {
                info!("TARGET| {:.1} -> {:.1}\u{00b0}C", from, to);
            }
            AppEvent::ModeChanged(mode) => {
                info!("MODE  | {}", mode);
            }
            AppEvent::SimulationReset { temperature_c } => {
                info!("RESET | T={:.1}\u{00b0}C", temperature_c);
            }
            AppEvent::ConfigUpdated => {
                info!("CONFIG| updated");
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
