//! Modifier aggregation.
//!
//! Every stat query uses the same calculation order:
//!
//! ```text
//! final = (base + Σ add) × (1 + Σ multiply)
//! ```
//!
//! Multiply contributions are summed into one rate and applied once; they do
//! not compound with each other.

use crate::effect::{Modifier, ModifierOp};

/// Summed Add and Multiply contributions for one stat query.
///
/// # Example
/// ```
/// # use effect_core::stats::ModifierTotals;
/// # use effect_core::Modifier;
/// let mut totals = ModifierTotals::new();
/// totals.add(&Modifier::add("accuracy", 10.0, 5.0), 3);       // +20
/// totals.add(&Modifier::multiply("accuracy", 0.1, 0.1), 2);   // +20%
/// assert!((totals.apply(100.0) - 144.0).abs() < 1e-9);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ModifierTotals {
    /// Σ Add contributions.
    pub flat: f64,
    /// Σ Multiply contributions.
    pub rate: f64,
    /// Number of modifiers folded in.
    pub count: usize,
}

impl ModifierTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds in one modifier at the given stack count.
    pub fn add(&mut self, modifier: &Modifier, stacks: u32) {
        let contribution = modifier.contribution(stacks);
        match modifier.op {
            ModifierOp::Add => self.flat += contribution,
            ModifierOp::Multiply => self.rate += contribution,
        }
        self.count += 1;
    }

    /// Applies the totals to `base`.
    pub fn apply(&self, base: f64) -> f64 {
        (base + self.flat) * (1.0 + self.rate)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
