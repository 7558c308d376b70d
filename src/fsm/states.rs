//! Concrete state handler functions, table builder and transition guard.
//!
//! ```text
//!            start                 pause
//!  STOPPED ─────────▶ RUNNING ─────────▶ PAUSED
//!     ▲                  ▲                  │
//!     │                  └──────start───────┘
//!     │
//!     └──────────── reset (from any state) ──
//! ```

use super::context::SimContext;
use super::{Request, RunState, StateDescriptor};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; RunState::COUNT] {
    [
        // Index 0 — Stopped
        StateDescriptor {
            id: RunState::Stopped,
            name: "Stopped",
            on_enter: Some(stopped_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — Running
        StateDescriptor {
            id: RunState::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: Some(running_exit),
            on_update: running_update,
        },
        // Index 2 — Paused
        StateDescriptor {
            id: RunState::Paused,
            name: "Paused",
            on_enter: Some(paused_enter),
            on_exit: None,
            on_update: idle_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Transition guard
// ═══════════════════════════════════════════════════════════════════════════

/// Where `request` leads from `current`, or `None` if it is not allowed.
pub fn resolve(current: RunState, request: Request) -> Option<RunState> {
    match (current, request) {
        (RunState::Stopped | RunState::Paused, Request::Start) => Some(RunState::Running),
        (RunState::Running, Request::Pause) => Some(RunState::Paused),
        (_, Request::Reset) => Some(RunState::Stopped),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  STOPPED / PAUSED — nothing evolves
// ═══════════════════════════════════════════════════════════════════════════

fn stopped_enter(ctx: &mut SimContext) {
    info!(
        "STOPPED: room at {:.1}\u{00b0}C, target {:.1}\u{00b0}C",
        ctx.temperature_c, ctx.target_c
    );
}

fn paused_enter(ctx: &mut SimContext) {
    info!(
        "PAUSED: holding at {:.2}\u{00b0}C after {} steps",
        ctx.temperature_c, ctx.tick_index
    );
}

fn idle_update(_ctx: &mut SimContext) {}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING — one simulation step per tick
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut SimContext) {
    info!(
        "RUNNING: {:.2}\u{00b0}C -> {:.1}\u{00b0}C ({} mode)",
        ctx.temperature_c, ctx.target_c, ctx.mode
    );
}

fn running_exit(ctx: &mut SimContext) {
    info!("RUNNING: halted at step {}", ctx.tick_index);
}

fn running_update(ctx: &mut SimContext) {
    let sample = ctx.step();
    debug!(
        "step {}: T={:.3} target={:.1} power={:+.3} {}",
        sample.tick,
        sample.temperature_c,
        sample.target_c,
        sample.power,
        sample.action.as_str()
    );
}
