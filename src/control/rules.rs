//! Linguistic terms and the rule base.
//!
//! The rule base is plain data: one membership function per term, stored
//! in arrays indexed by the term's discriminant, plus an ordered table of
//! `(error term → power term)` rules.
//!
//! ```text
//!   error (°C)   NL ── NS ── ZE ── PS ── PL
//!                 │     │     │     │     │
//!   power        SC ── C  ── H  ── HT ── SH
//! ```

use serde::{Deserialize, Serialize};

use super::membership::MembershipFn;

/// Maximum number of rules a rule base can hold.
pub const MAX_RULES: usize = 16;

// ---------------------------------------------------------------------------
// Terms
// ---------------------------------------------------------------------------

/// Input terms over the temperature error (`target − current`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ErrorTerm {
    NegativeLarge = 0,
    NegativeSmall = 1,
    Zero = 2,
    PositiveSmall = 3,
    PositiveLarge = 4,
}

impl ErrorTerm {
    pub const COUNT: usize = 5;
    pub const ALL: [Self; Self::COUNT] = [
        Self::NegativeLarge,
        Self::NegativeSmall,
        Self::Zero,
        Self::PositiveSmall,
        Self::PositiveLarge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::NegativeLarge => "negative-large",
            Self::NegativeSmall => "negative-small",
            Self::Zero => "zero",
            Self::PositiveSmall => "positive-small",
            Self::PositiveLarge => "positive-large",
        }
    }
}

/// Output terms over the normalised heating/cooling power `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PowerTerm {
    StrongCool = 0,
    Cool = 1,
    Hold = 2,
    Heat = 3,
    StrongHeat = 4,
}

impl PowerTerm {
    pub const COUNT: usize = 5;
    pub const ALL: [Self; Self::COUNT] = [
        Self::StrongCool,
        Self::Cool,
        Self::Hold,
        Self::Heat,
        Self::StrongHeat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::StrongCool => "strong-cool",
            Self::Cool => "cool",
            Self::Hold => "hold",
            Self::Heat => "heat",
            Self::StrongHeat => "strong-heat",
        }
    }

    /// Actuator category shown to the operator.
    pub fn action(self) -> Action {
        match self {
            Self::StrongCool | Self::Cool => Action::Cool,
            Self::Hold => Action::Neutral,
            Self::Heat | Self::StrongHeat => Action::Heat,
        }
    }
}

/// Coarse label for what the actuator is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Cool,
    #[default]
    Neutral,
    Heat,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cool => "COOL",
            Self::Neutral => "NEUTRAL",
            Self::Heat => "HEAT",
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// A single-antecedent rule with implicit weight 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub when: ErrorTerm,
    pub then: PowerTerm,
}

impl Rule {
    pub const fn new(when: ErrorTerm, then: PowerTerm) -> Self {
        Self { when, then }
    }
}

/// Membership functions for every term plus the ordered rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBase {
    /// Indexed by `ErrorTerm as usize`.
    pub error_terms: [MembershipFn; ErrorTerm::COUNT],
    /// Indexed by `PowerTerm as usize`. Evaluated over `[-1, 1]`.
    pub power_terms: [MembershipFn; PowerTerm::COUNT],
    pub rules: heapless::Vec<Rule, MAX_RULES>,
}

impl RuleBase {
    pub fn error_fn(&self, term: ErrorTerm) -> &MembershipFn {
        &self.error_terms[term as usize]
    }

    pub fn power_fn(&self, term: PowerTerm) -> &MembershipFn {
        &self.power_terms[term as usize]
    }

    /// Structural check used by config validation.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.rules.is_empty() {
            return Err("rule_base.rules: must contain at least one rule");
        }
        if !self.error_terms.iter().all(MembershipFn::is_well_formed) {
            return Err("rule_base.error_terms: corners must be finite and ordered");
        }
        if !self.power_terms.iter().all(MembershipFn::is_well_formed) {
            return Err("rule_base.power_terms: corners must be finite and ordered");
        }
        let inside_universe = self.power_terms.iter().all(|mf| {
            let (lo, hi) = mf.support();
            lo >= -1.0 && hi <= 1.0
        });
        if !inside_universe {
            return Err("rule_base.power_terms: support must lie within [-1, 1]");
        }
        Ok(())
    }
}

impl Default for RuleBase {
    fn default() -> Self {
        let mut rules = heapless::Vec::new();
        for (when, then) in ErrorTerm::ALL.into_iter().zip(PowerTerm::ALL) {
            // Capacity is MAX_RULES > COUNT.
            let _ = rules.push(Rule::new(when, then));
        }

        Self {
            error_terms: [
                MembershipFn::trapezoidal(-20.0, -20.0, -8.0, -5.0), // NL
                MembershipFn::trapezoidal(-8.0, -5.0, -2.0, -0.5),   // NS
                MembershipFn::triangular(-2.0, 0.0, 2.0),            // ZE
                MembershipFn::trapezoidal(0.5, 2.0, 5.0, 8.0),       // PS
                MembershipFn::trapezoidal(5.0, 8.0, 20.0, 20.0),     // PL
            ],
            power_terms: [
                MembershipFn::trapezoidal(-1.0, -1.0, -0.8, -0.5), // SC
                MembershipFn::triangular(-0.75, -0.5, -0.25),      // C
                MembershipFn::triangular(-0.25, 0.0, 0.25),        // H
                MembershipFn::triangular(0.25, 0.5, 0.75),         // HT
                MembershipFn::trapezoidal(0.5, 0.8, 1.0, 1.0),     // SH
            ],
            rules,
        }
    }
}
