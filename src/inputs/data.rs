//! Scenario input structures and boundary validation

use serde::{Deserialize, Serialize};

use crate::error::{InputError, InputResult};
use crate::projection::ReductionBasis;

/// Longest analysis window the calculator supports, in years
pub const MAX_ANALYSIS_PERIOD: u32 = 10;

/// Portion of each total ratio reduction attributable to the investment under evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Attribution {
    /// Attributed loss ratio reduction, same units as the total reduction
    pub loss_ratio_reduction: f64,

    /// Attributed expense ratio reduction, same units as the total reduction
    pub expense_ratio_reduction: f64,
}

/// Lower and upper bounds for the attributed reductions, used for sensitivity runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributionRange {
    pub min: Attribution,
    pub max: Attribution,
}

impl AttributionRange {
    pub fn validate(&self) -> InputResult<()> {
        if self.min.loss_ratio_reduction > self.max.loss_ratio_reduction {
            return Err(InputError::invalid(
                "attribution_range.loss_ratio_reduction",
                "minimum exceeds maximum",
            ));
        }
        if self.min.expense_ratio_reduction > self.max.expense_ratio_reduction {
            return Err(InputError::invalid(
                "attribution_range.expense_ratio_reduction",
                "minimum exceeds maximum",
            ));
        }
        Ok(())
    }
}

/// Current financial metrics and expected improvements for one carrier scenario
///
/// Monetary amounts are in currency-millions, ratios and rates in percent.
/// Missing fields deserialize to the calculator's dashboard defaults; unknown
/// fields are rejected so a misspelt name never falls back silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioInput {
    /// Current annual gross written premium
    pub current_gwp: f64,

    /// Current loss ratio (%)
    pub current_loss_ratio: f64,

    /// Current expense ratio (%)
    pub current_expense_ratio: f64,

    /// Expected loss ratio reduction, interpreted per `ReductionBasis`
    pub loss_ratio_reduction: f64,

    /// Expected expense ratio reduction, interpreted per `ReductionBasis`
    pub expense_ratio_reduction: f64,

    /// Annual premium growth rate (%)
    pub premium_growth_rate: f64,

    /// Number of projected years (1-10)
    pub analysis_period: u32,

    /// One-off investment cost at time zero
    pub initial_investment: f64,

    /// Annual running cost of the investment
    pub ongoing_costs: f64,

    /// Attributed share of the reductions, if evaluated separately
    pub attribution: Option<Attribution>,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        Self {
            current_gwp: 500.0,
            current_loss_ratio: 65.0,
            current_expense_ratio: 30.0,
            loss_ratio_reduction: 0.5,
            expense_ratio_reduction: 1.0,
            premium_growth_rate: 2.0,
            analysis_period: 5,
            initial_investment: 7.0,
            ongoing_costs: 1.5,
            attribution: None,
        }
    }
}

impl ScenarioInput {
    /// Copy of this scenario with a different attribution
    pub fn with_attribution(&self, attribution: Attribution) -> Self {
        Self {
            attribution: Some(attribution),
            ..self.clone()
        }
    }

    /// Check every field against its domain. Values are never clamped.
    pub fn validate(&self, basis: ReductionBasis) -> InputResult<()> {
        non_negative("current_gwp", self.current_gwp)?;
        percentage("current_loss_ratio", self.current_loss_ratio)?;
        percentage("current_expense_ratio", self.current_expense_ratio)?;
        reduction(
            "loss_ratio_reduction",
            self.loss_ratio_reduction,
            self.current_loss_ratio,
            basis,
        )?;
        reduction(
            "expense_ratio_reduction",
            self.expense_ratio_reduction,
            self.current_expense_ratio,
            basis,
        )?;
        non_negative("premium_growth_rate", self.premium_growth_rate)?;

        if self.analysis_period == 0 || self.analysis_period > MAX_ANALYSIS_PERIOD {
            return Err(InputError::invalid(
                "analysis_period",
                format!("must be between 1 and {}, got {}", MAX_ANALYSIS_PERIOD, self.analysis_period),
            ));
        }

        non_negative("initial_investment", self.initial_investment)?;
        non_negative("ongoing_costs", self.ongoing_costs)?;

        if let Some(attribution) = &self.attribution {
            bounded_by(
                "attribution.loss_ratio_reduction",
                attribution.loss_ratio_reduction,
                self.loss_ratio_reduction,
            )?;
            bounded_by(
                "attribution.expense_ratio_reduction",
                attribution.expense_ratio_reduction,
                self.expense_ratio_reduction,
            )?;
        }

        Ok(())
    }
}

fn finite(field: &str, value: f64) -> InputResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::invalid(field, format!("must be a finite number, got {}", value)))
    }
}

fn non_negative(field: &str, value: f64) -> InputResult<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(InputError::invalid(field, format!("must not be negative, got {}", value)));
    }
    Ok(())
}

fn percentage(field: &str, value: f64) -> InputResult<()> {
    non_negative(field, value)?;
    if value > 100.0 {
        return Err(InputError::invalid(field, format!("must not exceed 100%, got {}", value)));
    }
    Ok(())
}

fn reduction(field: &str, value: f64, current: f64, basis: ReductionBasis) -> InputResult<()> {
    non_negative(field, value)?;
    match basis {
        ReductionBasis::Absolute if value > current => Err(InputError::invalid(
            field,
            format!("{} points exceeds the current ratio of {}%", value, current),
        )),
        ReductionBasis::Relative if value > 100.0 => Err(InputError::invalid(
            field,
            format!("relative reduction of {}% exceeds 100%", value),
        )),
        _ => Ok(()),
    }
}

fn bounded_by(field: &str, value: f64, total: f64) -> InputResult<()> {
    non_negative(field, value)?;
    if value > total {
        return Err(InputError::invalid(
            field,
            format!("{} exceeds the total reduction of {}", value, total),
        ));
    }
    Ok(())
}
