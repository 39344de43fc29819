//! Load scenarios from batch CSV files and single-scenario JSON files

use super::{Attribution, ScenarioInput};
use crate::error::{InputError, LoadResult};
use csv::{Reader, StringRecord};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A scenario with the label it was given in the batch file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedScenario {
    pub name: String,
    pub input: ScenarioInput,
}

/// A batch row that could not be read as a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// Line number in the source file
    pub line: u64,
    pub name: String,
    pub error: InputError,
}

/// Scenarios read from a batch file, with the rows that failed to parse
#[derive(Debug, Clone, Default)]
pub struct ScenarioBatch {
    pub scenarios: Vec<NamedScenario>,
    pub rejected: Vec<RejectedRow>,
}

/// Raw CSV row matching the batch scenario columns
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Scenario")]
    name: String,
    #[serde(rename = "CurrentGWP")]
    current_gwp: f64,
    #[serde(rename = "LossRatio")]
    current_loss_ratio: f64,
    #[serde(rename = "ExpenseRatio")]
    current_expense_ratio: f64,
    #[serde(rename = "LossRatioReduction")]
    loss_ratio_reduction: f64,
    #[serde(rename = "ExpenseRatioReduction")]
    expense_ratio_reduction: f64,
    #[serde(rename = "GrowthRate")]
    premium_growth_rate: f64,
    #[serde(rename = "AnalysisPeriod")]
    analysis_period: u32,
    #[serde(rename = "InitialInvestment")]
    initial_investment: f64,
    #[serde(rename = "OngoingCosts")]
    ongoing_costs: f64,
    #[serde(rename = "AttributedLossReduction", default)]
    attributed_loss_reduction: Option<f64>,
    #[serde(rename = "AttributedExpenseReduction", default)]
    attributed_expense_reduction: Option<f64>,
}

impl CsvRow {
    fn into_scenario(self) -> NamedScenario {
        // A row with either attributed column filled is an attributed scenario
        let attribution = match (self.attributed_loss_reduction, self.attributed_expense_reduction) {
            (None, None) => None,
            (loss, expense) => Some(Attribution {
                loss_ratio_reduction: loss.unwrap_or(0.0),
                expense_ratio_reduction: expense.unwrap_or(0.0),
            }),
        };

        NamedScenario {
            name: self.name,
            input: ScenarioInput {
                current_gwp: self.current_gwp,
                current_loss_ratio: self.current_loss_ratio,
                current_expense_ratio: self.current_expense_ratio,
                loss_ratio_reduction: self.loss_ratio_reduction,
                expense_ratio_reduction: self.expense_ratio_reduction,
                premium_growth_rate: self.premium_growth_rate,
                analysis_period: self.analysis_period,
                initial_investment: self.initial_investment,
                ongoing_costs: self.ongoing_costs,
                attribution,
            },
        }
    }
}

/// Load all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> LoadResult<ScenarioBatch> {
    let file = File::open(path)?;
    load_scenarios_from_reader(file)
}

/// Load scenarios from any reader (e.g., string buffer, request body)
///
/// Rows that do not parse are logged and returned in `rejected`; only I/O
/// failures and an unreadable header abort the load.
pub fn load_scenarios_from_reader<R: std::io::Read>(reader: R) -> LoadResult<ScenarioBatch> {
    let mut csv_reader = Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let name_column = headers.iter().position(|h| h == "Scenario");
    let mut batch = ScenarioBatch::default();

    for result in csv_reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                batch.reject(line, String::new(), InputError::invalid("row", e.to_string()));
                continue;
            }
        };

        match record.deserialize::<CsvRow>(Some(&headers)) {
            Ok(row) => batch.scenarios.push(row.into_scenario()),
            Err(e) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                let name = name_column.and_then(|i| record.get(i)).unwrap_or_default().to_string();
                batch.reject(line, name, row_error(&headers, &e));
            }
        }
    }

    Ok(batch)
}

impl ScenarioBatch {
    fn reject(&mut self, line: u64, name: String, error: InputError) {
        let name = if name.is_empty() { format!("line {}", line) } else { name };
        warn!("skipping scenario '{}' at line {}: {}", name, line, error);
        self.rejected.push(RejectedRow { line, name, error });
    }
}

/// Name the offending column when the CSV error carries one
fn row_error(headers: &StringRecord, error: &csv::Error) -> InputError {
    match error.kind() {
        csv::ErrorKind::Deserialize { err, .. } => {
            let field = err
                .field()
                .and_then(|i| headers.get(i as usize))
                .unwrap_or("row");
            InputError::invalid(field, err.kind().to_string())
        }
        _ => InputError::invalid("row", error.to_string()),
    }
}

/// Load a single scenario from a JSON file; missing fields take their defaults
pub fn load_scenario_json<P: AsRef<Path>>(path: P) -> LoadResult<ScenarioInput> {
    let file = File::open(path)?;
    let input = serde_json::from_reader(BufReader::new(file))?;
    Ok(input)
}
