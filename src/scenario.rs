//! Scenario runner for single, batch and sensitivity projections
//!
//! Holds one set of formula conventions and applies it to every scenario it runs.

use std::fmt;

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, InputResult};
use crate::inputs::{AttributionRange, NamedScenario, RejectedRow, ScenarioBatch, ScenarioInput};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Which end of an attribution range a sensitivity result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensitivityBound {
    Min,
    Max,
}

impl fmt::Display for SensitivityBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensitivityBound::Min => write!(f, "Min"),
            SensitivityBound::Max => write!(f, "Max"),
        }
    }
}

/// Projections at both ends of an attribution range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub min: ProjectionResult,
    pub max: ProjectionResult,
}

impl SensitivityResult {
    pub fn iter(&self) -> impl Iterator<Item = (SensitivityBound, &ProjectionResult)> {
        [(SensitivityBound::Min, &self.min), (SensitivityBound::Max, &self.max)].into_iter()
    }
}

/// Outcome of one scenario in a batch; invalid scenarios keep their error
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub name: String,
    pub result: Result<ProjectionResult, InputError>,
}

impl From<RejectedRow> for BatchOutcome {
    fn from(row: RejectedRow) -> Self {
        BatchOutcome {
            name: row.name,
            result: Err(row.error),
        }
    }
}

/// Runner applying one `ProjectionConfig` to many scenarios
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(ProjectionConfig::default());
/// let result = runner.run(&ScenarioInput::default())?;
/// println!("ROI: {:.2}%", result.roi);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        self.engine.config()
    }

    /// Run a single projection
    pub fn run(&self, input: &ScenarioInput) -> InputResult<ProjectionResult> {
        self.engine.project(input)
    }

    /// Run many independent scenarios in parallel, preserving input order
    pub fn run_batch(&self, scenarios: &[NamedScenario]) -> Vec<BatchOutcome> {
        let outcomes: Vec<BatchOutcome> = scenarios
            .par_iter()
            .map(|scenario| BatchOutcome {
                name: scenario.name.clone(),
                result: self.engine.project(&scenario.input),
            })
            .collect();

        let rejected = outcomes.iter().filter(|o| o.result.is_err()).count();
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                warn!("scenario '{}' rejected: {}", outcome.name, e);
            }
        }
        info!("batch complete: {} projected, {} rejected", outcomes.len() - rejected, rejected);

        outcomes
    }

    /// Run every parsed scenario of a loaded batch; unparsed rows follow as rejected outcomes
    pub fn run_loaded(&self, batch: &ScenarioBatch) -> Vec<BatchOutcome> {
        let mut outcomes = self.run_batch(&batch.scenarios);
        outcomes.extend(batch.rejected.iter().cloned().map(BatchOutcome::from));
        outcomes
    }

    /// Re-run the scenario at the low and high end of an attribution range
    pub fn run_sensitivity(
        &self,
        input: &ScenarioInput,
        range: &AttributionRange,
    ) -> InputResult<SensitivityResult> {
        range.validate()?;
        let min = self.engine.project(&input.with_attribution(range.min))?;
        let max = self.engine.project(&input.with_attribution(range.max))?;
        Ok(SensitivityResult { min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::Attribution;

    fn range() -> AttributionRange {
        AttributionRange {
            min: Attribution { loss_ratio_reduction: 0.1, expense_ratio_reduction: 0.2 },
            max: Attribution { loss_ratio_reduction: 0.4, expense_ratio_reduction: 0.8 },
        }
    }

    #[test]
    fn test_sensitivity_orders_attributed_savings() {
        let runner = ScenarioRunner::default();
        let result = runner.run_sensitivity(&ScenarioInput::default(), &range()).unwrap();

        let min = result.min.attribution.unwrap();
        let max = result.max.attribution.unwrap();
        assert!(max.total_savings > min.total_savings);
        assert!(max.roi > min.roi);

        // Total figures do not depend on the attribution
        assert_eq!(result.min.total_savings, result.max.total_savings);

        let labels: Vec<String> = result.iter().map(|(bound, _)| bound.to_string()).collect();
        assert_eq!(labels, vec!["Min", "Max"]);
    }

    #[test]
    fn test_sensitivity_rejects_bound_above_total() {
        let runner = ScenarioRunner::default();
        let mut range = range();
        range.max.expense_ratio_reduction = 5.0;
        let err = runner.run_sensitivity(&ScenarioInput::default(), &range).unwrap_err();
        assert_eq!(err.field(), "attribution.expense_ratio_reduction");
    }

    #[test]
    fn test_batch_keeps_order_and_errors() {
        let runner = ScenarioRunner::default();
        let scenarios: Vec<NamedScenario> = (1..=8)
            .map(|period| NamedScenario {
                name: format!("period-{}", period),
                input: ScenarioInput {
                    analysis_period: period,
                    ..Default::default()
                },
            })
            .chain(std::iter::once(NamedScenario {
                name: "invalid".to_string(),
                input: ScenarioInput {
                    current_gwp: -1.0,
                    ..Default::default()
                },
            }))
            .collect();

        let outcomes = runner.run_batch(&scenarios);
        assert_eq!(outcomes.len(), 9);
        for (i, outcome) in outcomes.iter().take(8).enumerate() {
            assert_eq!(outcome.name, format!("period-{}", i + 1));
            assert_eq!(outcome.result.as_ref().unwrap().years.len(), i + 1);
        }
        assert!(outcomes[8].result.is_err());
    }

    #[test]
    fn test_loaded_batch_reports_unparsed_rows() {
        let data = "\
Scenario,CurrentGWP,LossRatio,ExpenseRatio,LossRatioReduction,ExpenseRatioReduction,GrowthRate,AnalysisPeriod,InitialInvestment,OngoingCosts
good,500,65,30,2,3,5,5,5,1
bad,500,65,30,2,3,5,-1,5,1
good2,400,70,28,1,1,3,4,2,0.5
";
        let batch = crate::inputs::load_scenarios_from_reader(data.as_bytes()).unwrap();
        let outcomes = ScenarioRunner::default().run_loaded(&batch);

        let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["good", "good2", "bad"]);
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_ok());
        assert_eq!(outcomes[2].result.as_ref().unwrap_err().field(), "AnalysisPeriod");
    }
}
