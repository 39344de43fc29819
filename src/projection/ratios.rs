//! Loss, expense and combined ratios before and after the improvement

use serde::{Deserialize, Serialize};

use crate::inputs::ScenarioInput;
use super::engine::ReductionBasis;

/// Combined ratio = loss ratio + expense ratio
pub fn combined_ratio(loss_ratio: f64, expense_ratio: f64) -> f64 {
    loss_ratio + expense_ratio
}

/// Current and improved ratios, all in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioComparison {
    pub current_loss_ratio: f64,
    pub current_expense_ratio: f64,
    pub new_loss_ratio: f64,
    pub new_expense_ratio: f64,
}

impl RatioComparison {
    pub fn from_input(input: &ScenarioInput, basis: ReductionBasis) -> Self {
        Self {
            current_loss_ratio: input.current_loss_ratio,
            current_expense_ratio: input.current_expense_ratio,
            new_loss_ratio: basis.apply(input.current_loss_ratio, input.loss_ratio_reduction),
            new_expense_ratio: basis.apply(input.current_expense_ratio, input.expense_ratio_reduction),
        }
    }

    pub fn current_combined_ratio(&self) -> f64 {
        combined_ratio(self.current_loss_ratio, self.current_expense_ratio)
    }

    pub fn new_combined_ratio(&self) -> f64 {
        combined_ratio(self.new_loss_ratio, self.new_expense_ratio)
    }

    /// Combined ratio improvement in points
    pub fn improvement(&self) -> f64 {
        self.current_combined_ratio() - self.new_combined_ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_inputs_relative() {
        // Dashboard defaults: 65% loss, 30% expense, 0.5% and 1% relative reductions
        let ratios = RatioComparison::from_input(&ScenarioInput::default(), ReductionBasis::Relative);
        assert_abs_diff_eq!(ratios.new_loss_ratio, 64.675, epsilon = 1e-9);
        assert_abs_diff_eq!(ratios.new_expense_ratio, 29.7, epsilon = 1e-9);
        assert_abs_diff_eq!(ratios.current_combined_ratio(), 95.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ratios.improvement(), 0.625, epsilon = 1e-9);
    }

    #[test]
    fn test_default_inputs_absolute() {
        let ratios = RatioComparison::from_input(&ScenarioInput::default(), ReductionBasis::Absolute);
        assert_abs_diff_eq!(ratios.new_combined_ratio(), 93.5, epsilon = 1e-9);
        assert_abs_diff_eq!(ratios.improvement(), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_no_reduction_leaves_ratios_unchanged() {
        let input = ScenarioInput {
            loss_ratio_reduction: 0.0,
            expense_ratio_reduction: 0.0,
            ..Default::default()
        };
        for basis in [ReductionBasis::Absolute, ReductionBasis::Relative] {
            let ratios = RatioComparison::from_input(&input, basis);
            assert_eq!(ratios.improvement(), 0.0);
        }
    }
}
