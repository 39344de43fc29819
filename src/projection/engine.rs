//! Core projection engine for year-by-year combined ratio improvement projections

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::InputResult;
use crate::inputs::ScenarioInput;
use super::attribution::AttributedReduction;
use super::cashflows::{AttributedSummary, ProjectionResult, YearRecord};
use super::irr::calculate_irr;
use super::ratios::RatioComparison;
use super::state::ProjectionState;

/// How a ratio reduction input is applied to the current ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionBasis {
    /// Reduction in percentage points: new = current - reduction
    #[default]
    Absolute,
    /// Reduction as a percentage of the current ratio: new = current * (1 - reduction/100)
    Relative,
}

impl ReductionBasis {
    /// Ratio after applying the reduction
    pub fn apply(&self, current: f64, reduction: f64) -> f64 {
        match self {
            ReductionBasis::Absolute => current - reduction,
            ReductionBasis::Relative => current * (1.0 - reduction / 100.0),
        }
    }

    /// Size of the reduction in ratio points
    pub fn points(&self, current: f64, reduction: f64) -> f64 {
        match self {
            ReductionBasis::Absolute => reduction,
            ReductionBasis::Relative => current * reduction / 100.0,
        }
    }
}

/// When premium growth starts compounding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthTiming {
    /// Year 1 premium already includes one period of growth (exponent = year)
    #[default]
    EndOfYear,
    /// Year 1 premium equals current premium (exponent = year - 1)
    StartOfYear,
}

impl GrowthTiming {
    pub fn exponent(&self, year: u32) -> i32 {
        match self {
            GrowthTiming::EndOfYear => year as i32,
            GrowthTiming::StartOfYear => year as i32 - 1,
        }
    }
}

/// Where the investment's ongoing costs are charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OngoingCostTreatment {
    /// Annual savings are reported net of ongoing costs
    #[default]
    NettedAnnually,
    /// Annual savings are the gross profit improvement; ongoing costs come off total savings
    CashFlowOnly,
}

impl OngoingCostTreatment {
    /// Amount deducted from a single year's savings
    pub fn annual_charge(&self, ongoing_costs: f64) -> f64 {
        match self {
            OngoingCostTreatment::NettedAnnually => ongoing_costs,
            OngoingCostTreatment::CashFlowOnly => 0.0,
        }
    }

    /// Amount still to deduct when totalling savings over the period
    pub fn period_charge(&self, ongoing_costs: f64, years: u32) -> f64 {
        match self {
            OngoingCostTreatment::NettedAnnually => 0.0,
            OngoingCostTreatment::CashFlowOnly => ongoing_costs * years as f64,
        }
    }
}

/// Formula conventions for a projection run
///
/// Each field picks one side of a formula fork; a single config applies to the
/// whole result, attributed figures included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Interpretation of the ratio reduction inputs
    pub reduction_basis: ReductionBasis,

    /// Premium growth compounding convention
    pub growth_timing: GrowthTiming,

    /// Treatment of ongoing investment costs
    pub ongoing_costs: OngoingCostTreatment,
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given conventions
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Validate the scenario and run the projection
    pub fn project(&self, input: &ScenarioInput) -> InputResult<ProjectionResult> {
        input.validate(self.config.reduction_basis)?;
        Ok(self.project_validated(input))
    }

    fn project_validated(&self, input: &ScenarioInput) -> ProjectionResult {
        let ratios = RatioComparison::from_input(input, self.config.reduction_basis);
        let attributed = input
            .attribution
            .map(|a| AttributedReduction::new(&a, input, self.config.reduction_basis));

        let mut state = ProjectionState::new(input.initial_investment);
        let mut attributed_state = attributed.map(|_| ProjectionState::new(input.initial_investment));
        let mut years = Vec::with_capacity(input.analysis_period as usize);

        // Net cash flows for IRR: investment at time zero, then savings net of running costs
        let mut net_cashflows = Vec::with_capacity(input.analysis_period as usize + 1);
        net_cashflows.push(-input.initial_investment);

        for _year in 1..=input.analysis_period {
            state.advance_year();

            let mut row = self.calculate_year(input, &ratios, &mut state);
            net_cashflows.push(row.profit_new - row.profit_current - input.ongoing_costs);

            if let (Some(reduction), Some(attr_state)) = (&attributed, attributed_state.as_mut()) {
                attr_state.advance_year();
                let gross = reduction.gross_savings(row.gwp);
                let charge = self.config.ongoing_costs.annual_charge(input.ongoing_costs);
                attr_state.record(gross - charge, charge);
                row.annual_savings_attributed = Some(gross - charge);
                row.cumulative_savings_attributed = Some(attr_state.cumulative_savings);
            }

            debug!(
                "year {}: gwp={:.4} savings={:.4} cumulative={:.4} cash_flow={:.4}",
                row.year, row.gwp, row.annual_savings, row.cumulative_savings, state.cash_flow
            );
            years.push(row);
        }

        let total_investment = total_investment(input);
        let total_savings = state.cumulative_savings
            - self.config.ongoing_costs.period_charge(input.ongoing_costs, input.analysis_period);

        let attribution = attributed_state.map(|attr_state| {
            let total_savings = attr_state.cumulative_savings
                - self.config.ongoing_costs.period_charge(input.ongoing_costs, input.analysis_period);
            AttributedSummary {
                roi: return_on_investment(total_savings, total_investment),
                payback_period: attr_state.payback_period,
                total_investment,
                total_savings,
            }
        });

        ProjectionResult {
            years,
            ratios,
            roi: return_on_investment(total_savings, total_investment),
            payback_period: state.payback_period,
            total_investment,
            total_savings,
            irr: calculate_irr(&net_cashflows).map(|r| r * 100.0),
            attribution,
        }
    }

    /// Calculate premium, profits and savings for the state's current year
    fn calculate_year(
        &self,
        input: &ScenarioInput,
        ratios: &RatioComparison,
        state: &mut ProjectionState,
    ) -> YearRecord {
        let growth = 1.0 + input.premium_growth_rate / 100.0;
        let gwp = input.current_gwp * growth.powi(self.config.growth_timing.exponent(state.year));

        let profit_current = gwp * (1.0 - ratios.current_loss_ratio / 100.0 - ratios.current_expense_ratio / 100.0);
        let profit_new = gwp * (1.0 - ratios.new_loss_ratio / 100.0 - ratios.new_expense_ratio / 100.0);

        let charge = self.config.ongoing_costs.annual_charge(input.ongoing_costs);
        let annual_savings = profit_new - profit_current - charge;
        state.record(annual_savings, charge);

        YearRecord {
            year: state.year,
            gwp,
            profit_current,
            profit_new,
            annual_savings,
            cumulative_savings: state.cumulative_savings,
            annual_savings_attributed: None,
            cumulative_savings_attributed: None,
        }
    }
}

/// Initial investment plus ongoing costs for every projected year
pub fn total_investment(input: &ScenarioInput) -> f64 {
    input.initial_investment + input.ongoing_costs * input.analysis_period as f64
}

/// ROI in percent; zero when nothing was invested
pub fn return_on_investment(total_savings: f64, total_investment: f64) -> f64 {
    if total_investment == 0.0 {
        0.0
    } else {
        total_savings / total_investment * 100.0
    }
}
