//! Fuzzy-logic temperature controller.
//!
//! A five-term Mamdani controller over the temperature error, with the
//! inference pipeline in [`fuzzy`].

pub mod fuzzy;
pub mod membership;
pub mod rules;

pub use fuzzy::{ControlOutput, FuzzyController};
pub use membership::MembershipFn;
pub use rules::{Action, ErrorTerm, PowerTerm, Rule, RuleBase};
