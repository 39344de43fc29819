//! Savings attributable to the investment under evaluation

use crate::inputs::{Attribution, ScenarioInput};
use super::engine::ReductionBasis;

/// Attributed ratio reductions expressed in ratio points
///
/// The attributed share is applied straight to premium rather than through a
/// second pair of profit projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributedReduction {
    pub loss_ratio_points: f64,
    pub expense_ratio_points: f64,
}

impl AttributedReduction {
    /// Convert attribution inputs using the same basis as the total reductions,
    /// so an attribution equal to the total reduction yields the full improvement
    pub fn new(attribution: &Attribution, input: &ScenarioInput, basis: ReductionBasis) -> Self {
        Self {
            loss_ratio_points: basis.points(input.current_loss_ratio, attribution.loss_ratio_reduction),
            expense_ratio_points: basis.points(input.current_expense_ratio, attribution.expense_ratio_reduction),
        }
    }

    pub fn total_points(&self) -> f64 {
        self.loss_ratio_points + self.expense_ratio_points
    }

    /// Attributed profit improvement before ongoing costs
    pub fn gross_savings(&self, gwp: f64) -> f64 {
        gwp * self.total_points() / 100.0
    }
}
