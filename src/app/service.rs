//! Application service — the simulation stepper behind a hexagonal boundary.
//!
//! [`AppService`] owns the FSM, the simulation context and the history
//! buffer. It exposes a clean, I/O-free API: the external loop calls
//! [`tick`](AppService::tick) at a fixed rate and forwards operator input
//! through [`handle_command`](AppService::handle_command); everything the
//! outside world needs to see leaves through an [`EventSink`].
//!
//! ```text
//!  AppCommand ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                 │       AppService         │
//!  tick()     ──▶ │  FSM · Fuzzy · Plant     │ ──▶ ConfigPort
//!                 └─────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::SimConfig;
use crate::control::fuzzy::ControlOutput;
use crate::error::Result;
use crate::fsm::context::{Sample, SimContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, Request, RunState};
use crate::history::History;
use crate::plant::AmbientMode;

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{ConfigPort, EventSink};

/// Simulated seconds a change must settle before it is auto-saved.
const AUTOSAVE_DELAY_SECS: f64 = 5.0;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: SimContext,
    history: History,
    tick_count: u64,
    config_dirty: bool,
    save_now: bool,
    dirty_since_tick: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** run the initial state's entry action; call
    /// [`boot`](Self::boot) next.
    pub fn new(config: SimConfig) -> Self {
        let ctx = SimContext::new(config);
        let fsm = Fsm::new(build_state_table(), RunState::Stopped);

        Self {
            fsm,
            ctx,
            history: History::new(),
            tick_count: 0,
            config_dirty: false,
            save_now: false,
            dirty_since_tick: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter the initial state (Stopped) and announce it.
    pub fn boot(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService booted in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Advance one tick of the external loop.
    ///
    /// While running this performs exactly one simulation step and emits
    /// the resulting sample; while stopped or paused nothing changes.
    pub fn tick(&mut self, sink: &mut impl EventSink) -> Option<Sample> {
        self.tick_count += 1;
        let prev_state = self.fsm.current_state();

        self.fsm.tick(&mut self.ctx);

        let sample = self.ctx.take_sample();
        if let Some(s) = sample {
            self.history.push(s);
            sink.emit(&AppEvent::Sample(s));

            let every = u64::from(self.ctx.config.telemetry_every_ticks);
            if every > 0 && s.tick % every == 0 {
                sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
            }
        }

        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }

        sample
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an operator command.
    ///
    /// Only [`AppCommand::UpdateConfig`] can fail; every other command
    /// either takes effect or is a logged no-op.
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) -> Result<()> {
        match cmd {
            AppCommand::Start => self.request(Request::Start, sink),
            AppCommand::Pause => self.request(Request::Pause, sink),
            AppCommand::Reset => self.request(Request::Reset, sink),
            AppCommand::SetTarget(target) => self.set_target(target, sink),
            AppCommand::RaiseTarget => {
                let requested = self.ctx.target_c + self.ctx.config.target_step_c;
                self.set_target(requested, sink);
            }
            AppCommand::LowerTarget => {
                let requested = self.ctx.target_c - self.ctx.config.target_step_c;
                self.set_target(requested, sink);
            }
            AppCommand::SetMode(mode) => self.set_mode(mode, sink),
            AppCommand::ToggleMode => self.set_mode(self.ctx.mode.toggled(), sink),
            AppCommand::UpdateConfig(new_config) => {
                if let Err(e) = new_config.validate() {
                    warn!("Rejected configuration update: {e}");
                    return Err(e.into());
                }
                let (from_target, from_mode) = (self.ctx.target_c, self.ctx.mode);
                self.ctx.apply_config(new_config);
                if self.ctx.target_c != from_target {
                    sink.emit(&AppEvent::TargetChanged {
                        from: from_target,
                        to: self.ctx.target_c,
                    });
                }
                if self.ctx.mode != from_mode {
                    sink.emit(&AppEvent::ModeChanged(self.ctx.mode));
                }
                self.mark_config_dirty();
                sink.emit(&AppEvent::ConfigUpdated);
                info!("Configuration updated at runtime");
            }
            AppCommand::SaveConfig => {
                self.mark_config_dirty();
                self.save_now = true;
                info!("Explicit config save requested (will flush on next auto-save check)");
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current context.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            state: self.fsm.current_state(),
            tick: self.ctx.tick_index,
            time_secs: self.ctx.elapsed_secs,
            temperature_c: self.ctx.temperature_c,
            target_c: self.ctx.target_c,
            error_c: self.ctx.error_c(),
            error_rate_c_per_sec: self.ctx.error_rate_c_per_sec,
            power: self.ctx.last_output.power,
            action: self.ctx.last_output.action,
            mode: self.ctx.mode,
            at_target: self.ctx.at_target(),
        }
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.fsm.current_state()
    }

    /// Current room temperature (°C).
    pub fn temperature_c(&self) -> f64 {
        self.ctx.temperature_c
    }

    /// Current setpoint (°C).
    pub fn target_c(&self) -> f64 {
        self.ctx.target_c
    }

    pub fn mode(&self) -> AmbientMode {
        self.ctx.mode
    }

    /// Controller result from the latest simulation step.
    pub fn last_output(&self) -> ControlOutput {
        self.ctx.last_output
    }

    /// Simulation steps since the last reset.
    pub fn tick_index(&self) -> u64 {
        self.ctx.tick_index
    }

    /// Total loop ticks received since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Recent samples for graphing.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Live configuration, with the operator's current target and season
    /// folded in so that saving it restores the session.
    pub fn current_config(&self) -> SimConfig {
        SimConfig {
            target_temperature_c: self.ctx.target_c,
            ambient_mode: self.ctx.mode,
            ..self.ctx.config.clone()
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn request(&mut self, request: Request, sink: &mut impl EventSink) {
        let prev = self.fsm.current_state();
        if self.fsm.request(request, &mut self.ctx).is_none() {
            return;
        }

        let now = self.fsm.current_state();
        if now != prev {
            sink.emit(&AppEvent::StateChanged { from: prev, to: now });
        }
        if request == Request::Reset {
            self.history.clear();
            sink.emit(&AppEvent::SimulationReset {
                temperature_c: self.ctx.temperature_c,
            });
        }
    }

    fn set_target(&mut self, requested: f64, sink: &mut impl EventSink) {
        let from = self.ctx.target_c;
        let to = self.ctx.set_target(requested);
        if to != from {
            info!("Target {from:.1} -> {to:.1}\u{00b0}C");
            self.mark_config_dirty();
            sink.emit(&AppEvent::TargetChanged { from, to });
        } else if requested != to {
            warn!("Target request {requested} clamped to {to:.1}\u{00b0}C");
        }
    }

    fn set_mode(&mut self, mode: AmbientMode, sink: &mut impl EventSink) {
        if mode == self.ctx.mode {
            return;
        }
        info!("Ambient mode {} -> {}", self.ctx.mode, mode);
        self.ctx.mode = mode;
        self.mark_config_dirty();
        sink.emit(&AppEvent::ModeChanged(mode));
    }

    // ── Config dirty-flag management ──────────────────────────

    /// Mark the config as modified.
    pub fn mark_config_dirty(&mut self) {
        if !self.config_dirty {
            self.config_dirty = true;
            self.dirty_since_tick = self.tick_count;
        }
    }

    /// Persist once the last change has aged [`AUTOSAVE_DELAY_SECS`] of
    /// loop ticks, or immediately after [`AppCommand::SaveConfig`].
    /// Returns `true` if the config was saved.
    pub fn auto_save_if_needed(&mut self, storage: &impl ConfigPort) -> bool {
        if !self.config_dirty {
            return false;
        }
        let ticks_since_dirty = self.tick_count.saturating_sub(self.dirty_since_tick);
        let secs_since_dirty = ticks_since_dirty as f64 * self.ctx.config.tick_secs;
        if !self.save_now && secs_since_dirty < AUTOSAVE_DELAY_SECS {
            return false;
        }
        match storage.save(&self.current_config()) {
            Ok(()) => {
                self.config_dirty = false;
                self.save_now = false;
                info!("Config auto-saved");
                true
            }
            Err(e) => {
                warn!("Config auto-save failed: {e}");
                false
            }
        }
    }

    /// Save if dirty, regardless of age (call before shutdown).
    pub fn force_save_if_dirty(&mut self, storage: &impl ConfigPort) {
        if !self.config_dirty {
            return;
        }
        match storage.save(&self.current_config()) {
            Ok(()) => {
                self.config_dirty = false;
                self.save_now = false;
                info!("Config force-saved before shutdown");
            }
            Err(e) => {
                warn!("Config force-save failed: {e}");
            }
        }
    }

    /// Whether the config has unsaved changes.
    pub fn is_config_dirty(&self) -> bool {
        self.config_dirty
    }
}
