//! Combined Ratio Calculator CLI
//!
//! Command-line interface for projecting the impact of a combined ratio improvement

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use combined_ratio_calculator::{
    advisory::{consult, input_range, AdvisoryOutcome, ChatHistory, GuidanceAdvisor},
    export::export_year_table,
    inputs::load_scenario_json,
    projection::{payback_label, GrowthTiming, OngoingCostTreatment, ProjectionConfig, ReductionBasis},
    Attribution, AttributionRange, InputError, ProjectionResult, ScenarioInput, ScenarioRunner,
};
use log::info;
use std::fmt::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Project premiums, savings, ROI and payback for one scenario
    Project(ProjectArgs),
    /// Project a scenario at the low and high end of an attribution range
    Sensitivity(SensitivityArgs),
    /// Ask for guidance on plausible input values
    Ask {
        /// Free-text question, e.g. "what expense ratio reduction is typical?"
        question: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct ScenarioArgs {
    /// Read the scenario from a JSON file instead of the flags below
    #[arg(long)]
    input: Option<PathBuf>,

    /// Annual gross written premium ($M)
    #[arg(long, default_value_t = 500.0)]
    gwp: f64,

    /// Current loss ratio (%)
    #[arg(long, default_value_t = 65.0)]
    loss_ratio: f64,

    /// Current expense ratio (%)
    #[arg(long, default_value_t = 30.0)]
    expense_ratio: f64,

    /// Expected loss ratio reduction
    #[arg(long, default_value_t = 0.5)]
    loss_reduction: f64,

    /// Expected expense ratio reduction
    #[arg(long, default_value_t = 1.0)]
    expense_reduction: f64,

    /// Annual premium growth rate (%)
    #[arg(long, default_value_t = 2.0)]
    growth: f64,

    /// Analysis period in years (1-10)
    #[arg(long, default_value_t = 5)]
    years: u32,

    /// Initial investment cost ($M)
    #[arg(long, default_value_t = 7.0)]
    investment: f64,

    /// Annual ongoing costs ($M)
    #[arg(long, default_value_t = 1.5)]
    ongoing_costs: f64,

    #[command(flatten)]
    conventions: ConventionArgs,
}

#[derive(Args, Debug)]
struct ConventionArgs {
    /// How reductions apply to the current ratios
    #[arg(long, value_enum, default_value_t = BasisArg::Absolute)]
    reduction_basis: BasisArg,

    /// Whether year 1 premium already includes growth
    #[arg(long, value_enum, default_value_t = GrowthArg::EndOfYear)]
    growth_timing: GrowthArg,

    /// Where ongoing costs are charged
    #[arg(long, value_enum, default_value_t = CostArg::Netted)]
    cost_treatment: CostArg,
}

#[derive(Args, Debug)]
struct ProjectArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Loss ratio reduction attributable to the investment
    #[arg(long)]
    attributed_loss_reduction: Option<f64>,

    /// Expense ratio reduction attributable to the investment
    #[arg(long)]
    attributed_expense_reduction: Option<f64>,

    /// Write the year table to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct SensitivityArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    #[arg(long, default_value_t = 0.0)]
    min_loss_reduction: f64,

    #[arg(long)]
    max_loss_reduction: f64,

    #[arg(long, default_value_t = 0.0)]
    min_expense_reduction: f64,

    #[arg(long)]
    max_expense_reduction: f64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BasisArg {
    Absolute,
    Relative,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GrowthArg {
    EndOfYear,
    StartOfYear,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CostArg {
    Netted,
    CashFlowOnly,
}

impl ConventionArgs {
    fn config(&self) -> ProjectionConfig {
        ProjectionConfig {
            reduction_basis: match self.reduction_basis {
                BasisArg::Absolute => ReductionBasis::Absolute,
                BasisArg::Relative => ReductionBasis::Relative,
            },
            growth_timing: match self.growth_timing {
                GrowthArg::EndOfYear => GrowthTiming::EndOfYear,
                GrowthArg::StartOfYear => GrowthTiming::StartOfYear,
            },
            ongoing_costs: match self.cost_treatment {
                CostArg::Netted => OngoingCostTreatment::NettedAnnually,
                CostArg::CashFlowOnly => OngoingCostTreatment::CashFlowOnly,
            },
        }
    }
}

impl ScenarioArgs {
    fn scenario(&self) -> Result<ScenarioInput> {
        if let Some(path) = &self.input {
            return load_scenario_json(path)
                .with_context(|| format!("failed to read scenario from {}", path.display()));
        }

        Ok(ScenarioInput {
            current_gwp: self.gwp,
            current_loss_ratio: self.loss_ratio,
            current_expense_ratio: self.expense_ratio,
            loss_ratio_reduction: self.loss_reduction,
            expense_ratio_reduction: self.expense_reduction,
            premium_growth_rate: self.growth,
            analysis_period: self.years,
            initial_investment: self.investment,
            ongoing_costs: self.ongoing_costs,
            attribution: None,
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Project(args) => project(args),
        Commands::Sensitivity(args) => sensitivity(args),
        Commands::Ask { question } => {
            ask(&question.join(" "));
            Ok(())
        }
    }
}

fn project(args: ProjectArgs) -> Result<()> {
    let mut input = args.scenario.scenario()?;
    if args.attributed_loss_reduction.is_some() || args.attributed_expense_reduction.is_some() {
        input.attribution = Some(Attribution {
            loss_ratio_reduction: args.attributed_loss_reduction.unwrap_or(0.0),
            expense_ratio_reduction: args.attributed_expense_reduction.unwrap_or(0.0),
        });
    }

    let runner = ScenarioRunner::new(args.scenario.conventions.config());
    info!("projecting with {:?}", runner.config());
    let result = runner.run(&input).map_err(rejected)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result)?;
    }

    if let Some(path) = &args.output {
        export_year_table(path, &result)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nYear table written to: {}", path.display());
    }

    Ok(())
}

fn sensitivity(args: SensitivityArgs) -> Result<()> {
    let input = args.scenario.scenario()?;
    let range = AttributionRange {
        min: Attribution {
            loss_ratio_reduction: args.min_loss_reduction,
            expense_ratio_reduction: args.min_expense_reduction,
        },
        max: Attribution {
            loss_ratio_reduction: args.max_loss_reduction,
            expense_ratio_reduction: args.max_expense_reduction,
        },
    };

    let runner = ScenarioRunner::new(args.scenario.conventions.config());
    let result = runner.run_sensitivity(&input, &range).map_err(rejected)?;

    for (bound, projection) in result.iter() {
        println!("\n=== {} ===", bound);
        print_result(projection)?;
    }

    Ok(())
}

fn ask(question: &str) {
    let mut history = ChatHistory::new();
    match consult(&GuidanceAdvisor, &mut history, question) {
        AdvisoryOutcome::Answered(answer) => println!("{}", answer),
        AdvisoryOutcome::Notice(notice) => eprintln!("{}", notice.message),
    }
}

/// Attach the suggested range for the offending input, when there is one
fn rejected(e: InputError) -> anyhow::Error {
    match input_range(e.field()) {
        Some(range) => anyhow::anyhow!("scenario rejected: {}\n  {}", e, range.describe()),
        None => anyhow::Error::new(e).context("scenario rejected"),
    }
}

fn print_result(result: &ProjectionResult) -> Result<()> {
    let mut out = String::new();
    write_result(&mut out, result)?;
    print!("{}", out);
    Ok(())
}

/// Headline figures, summary and year table for the console
fn write_result<W: fmt::Write>(out: &mut W, result: &ProjectionResult) -> fmt::Result {
    let summary = result.summary();

    writeln!(out, "Current Combined Ratio (%):   {:>10.2}", summary.current_combined_ratio)?;
    writeln!(out, "Projected Combined Ratio (%): {:>10.2}", summary.new_combined_ratio)?;
    writeln!(out, "Improvement (points):         {:>10.2}", result.ratios.improvement())?;
    writeln!(out)?;
    writeln!(out, "Total Investment Cost ($M):     {:>10.2}", result.total_investment)?;
    writeln!(out, "Total Savings Over Period ($M): {:>10.2}", result.total_savings)?;
    writeln!(out, "Return on Investment (%):       {:>10.2}", result.roi)?;
    writeln!(out, "Payback Period (Years):         {:>10}", result.payback_label())?;
    match result.irr {
        Some(irr) => writeln!(out, "Internal Rate of Return (%):    {:>10.2}", irr)?,
        None => writeln!(out, "Internal Rate of Return (%):    {:>10}", "n/a")?,
    }

    if let Some(attributed) = &result.attribution {
        writeln!(out)?;
        writeln!(out, "Attributed Savings ($M):        {:>10.2}", attributed.total_savings)?;
        writeln!(out, "Attributed ROI (%):             {:>10.2}", attributed.roi)?;
        writeln!(out, "Attributed Payback (Years):     {:>10}", payback_label(attributed.payback_period))?;
    }

    writeln!(out)?;
    writeln!(out, "Final Year GWP ($M):            {:>10.2}", summary.final_gwp)?;
    writeln!(out, "Final Cumulative Savings ($M):  {:>10.2}", summary.final_cumulative_savings)?;
    if let (Some(best), Some(worst)) = (summary.best_year, summary.worst_year) {
        writeln!(out, "Best / Worst Savings Year:      {:>10}", format!("{} / {}", best, worst))?;
    }

    let attributed = result.attribution.is_some();
    writeln!(out)?;
    write!(
        out,
        "{:>4} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Year", "GWP", "Profit Curr", "Profit New", "Annual Sav", "Cumul Sav"
    )?;
    if attributed {
        write!(out, " {:>14} {:>14}", "Attr Annual", "Attr Cumul")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(if attributed { 109 } else { 79 }))?;
    for row in &result.years {
        write!(
            out,
            "{:>4} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            row.year, row.gwp, row.profit_current, row.profit_new, row.annual_savings, row.cumulative_savings,
        )?;
        if attributed {
            write!(
                out,
                " {:>14.2} {:>14.2}",
                row.annual_savings_attributed.unwrap_or(0.0),
                row.cumulative_savings_attributed.unwrap_or(0.0),
            )?;
        }
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &ScenarioInput) -> String {
        let result = ScenarioRunner::default().run(input).unwrap();
        let mut out = String::new();
        write_result(&mut out, &result).unwrap();
        out
    }

    #[test]
    fn test_console_output_includes_summary() {
        let input = ScenarioInput {
            loss_ratio_reduction: 2.0,
            expense_ratio_reduction: 3.0,
            premium_growth_rate: 5.0,
            initial_investment: 5.0,
            ongoing_costs: 1.0,
            ..Default::default()
        };
        let out = render(&input);

        let improvement = out.lines().find(|l| l.starts_with("Improvement (points):")).unwrap();
        assert_eq!(improvement.split_whitespace().last(), Some("5.00"));
        assert!(out.contains("Final Year GWP ($M):"));
        // Growing premium makes the last year the best and the first the worst
        assert!(out.contains("5 / 1"));
        assert!(!out.contains("Attr Annual"));
    }

    #[test]
    fn test_console_year_table_shows_attributed_columns() {
        let input = ScenarioInput::default().with_attribution(Attribution {
            loss_ratio_reduction: 0.25,
            expense_ratio_reduction: 0.5,
        });
        let out = render(&input);

        assert!(out.contains("Attr Annual"));
        let header = out.lines().find(|l| l.trim_start().starts_with("Year")).unwrap();
        let first_row = out.lines().find(|l| l.trim_start().starts_with("1 ")).unwrap();
        assert_eq!(header.split_whitespace().count(), 14);
        assert_eq!(first_row.split_whitespace().count(), 8);
    }

    #[test]
    fn test_rejected_input_carries_suggested_range() {
        let err = rejected(InputError::invalid("analysis_period", "must be between 1 and 10, got 12"));
        assert!(err.to_string().contains("Analysis period (years)"));

        let err = rejected(InputError::invalid("attribution.loss_ratio_reduction", "exceeds total"));
        assert_eq!(err.to_string(), "scenario rejected");
    }
}
