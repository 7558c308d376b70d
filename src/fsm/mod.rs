//! Function-pointer finite state machine engine for the simulation stepper.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  StateTable                                              │
//! │  ┌─────────┬───────────┬──────────┬───────────────────┐  │
//! │  │ RunState│ on_enter  │ on_exit  │ on_update         │  │
//! │  ├─────────┼───────────┼──────────┼───────────────────┤  │
//! │  │ Stopped │ fn(ctx)   │ fn(ctx)  │ fn(ctx)           │  │
//! │  │ Running │ fn(ctx)   │ fn(ctx)  │ fn(ctx)           │  │
//! │  │ Paused  │ fn(ctx)   │ fn(ctx)  │ fn(ctx)           │  │
//! │  └─────────┴───────────┴──────────┴───────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state; the
//! `Running` handler is the one that advances the simulation. Operator
//! requests (start, pause, reset) go through [`Fsm::request`], which
//! consults the transition guard in [`states::resolve`]. A request the
//! guard rejects is a no-op.

pub mod context;
pub mod states;

use context::SimContext;
use log::{debug, info};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all run states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum RunState {
    Stopped = 0,
    Running = 1,
    Paused = 2,
}

impl RunState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert an index back to `RunState`. Panics on out-of-range in
    /// debug builds; returns `Stopped` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Stopped,
            1 => Self::Running,
            2 => Self::Paused,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Stopped
            }
        }
    }
}

/// Operator requests that drive transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    Start,
    Pause,
    Reset,
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut SimContext);

/// Signature for the per-tick update handler. Transitions only happen
/// through [`Fsm::request`].
pub type StateUpdateFn = fn(&mut SimContext);

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: RunState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `RunState as usize`.
    table: [StateDescriptor; RunState::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; RunState::COUNT], initial: RunState) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut SimContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    pub fn tick(&mut self, ctx: &mut SimContext) {
        (self.table[self.current].on_update)(ctx);
    }

    /// Apply an operator request. Returns the resulting state if the guard
    /// accepted it (possibly the current state), or `None` for a no-op.
    /// An accepted reset also restores the context's initial conditions.
    pub fn request(&mut self, request: Request, ctx: &mut SimContext) -> Option<RunState> {
        let current = self.current_state();
        match states::resolve(current, request) {
            Some(next) => {
                self.force_transition(next, ctx);
                if request == Request::Reset {
                    ctx.reset();
                }
                Some(next)
            }
            None => {
                debug!("FSM: {request:?} ignored in {}", self.table[self.current].name);
                None
            }
        }
    }

    /// Force an immediate transition, bypassing the guard.
    pub fn force_transition(&mut self, next: RunState, ctx: &mut SimContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> RunState {
        RunState::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: RunState, ctx: &mut SimContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
