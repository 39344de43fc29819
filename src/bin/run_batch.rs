//! Run projections for every scenario in a batch CSV file
//!
//! Outputs one summary row per scenario and, optionally, each scenario's year table

use anyhow::{Context, Result};
use clap::Parser;
use combined_ratio_calculator::{
    export::{export_batch_summary, export_year_table},
    inputs::load_scenarios,
    projection::{OngoingCostTreatment, ProjectionConfig, ReductionBasis, GrowthTiming},
    ScenarioRunner,
};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Project every scenario in a batch CSV file", long_about = None)]
struct Args {
    /// Scenario CSV file (Scenario,CurrentGWP,LossRatio,ExpenseRatio,...)
    #[arg(short, long)]
    scenarios: PathBuf,

    /// Summary output file
    #[arg(short, long, default_value = "batch_projection_output.csv")]
    output: PathBuf,

    /// Also write each scenario's year table into this directory
    #[arg(long)]
    tables_dir: Option<PathBuf>,

    /// Interpret reductions as a percentage of the current ratio
    #[arg(long)]
    relative: bool,

    /// Year 1 premium equals current premium
    #[arg(long)]
    growth_from_year_two: bool,

    /// Report annual savings gross of ongoing costs
    #[arg(long)]
    gross_annual_savings: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading scenarios from {}...", args.scenarios.display());

    let batch = load_scenarios(&args.scenarios)
        .with_context(|| format!("failed to load {}", args.scenarios.display()))?;
    println!(
        "Loaded {} scenarios ({} unreadable rows) in {:?}",
        batch.scenarios.len(),
        batch.rejected.len(),
        start.elapsed()
    );

    let config = ProjectionConfig {
        reduction_basis: if args.relative { ReductionBasis::Relative } else { ReductionBasis::Absolute },
        growth_timing: if args.growth_from_year_two { GrowthTiming::StartOfYear } else { GrowthTiming::EndOfYear },
        ongoing_costs: if args.gross_annual_savings {
            OngoingCostTreatment::CashFlowOnly
        } else {
            OngoingCostTreatment::NettedAnnually
        },
    };
    info!("batch conventions: {:?}", config);

    println!("Running projections...");
    let proj_start = Instant::now();
    let runner = ScenarioRunner::new(config);
    let outcomes = runner.run_loaded(&batch);
    println!("Projections complete in {:?}", proj_start.elapsed());

    export_batch_summary(&args.output, &outcomes)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Summary written to {}", args.output.display());

    if let Some(dir) = &args.tables_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        for outcome in &outcomes {
            if let Ok(result) = &outcome.result {
                let path = dir.join(format!("{}.csv", outcome.name));
                export_year_table(&path, result)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
        println!("Year tables written to {}", dir.display());
    }

    // Print summary stats
    let projected: Vec<_> = outcomes.iter().filter_map(|o| o.result.as_ref().ok().map(|r| (&o.name, r))).collect();
    println!("\nBatch Summary:");
    println!("  Projected: {}, Rejected: {}", projected.len(), outcomes.len() - projected.len());
    if let Some((name, best)) = projected.iter().max_by(|a, b| a.1.roi.total_cmp(&b.1.roi)) {
        println!("  Highest ROI: {} ({:.2}%, payback {})", name, best.roi, best.payback_label());
    }
    if let Some((name, worst)) = projected.iter().min_by(|a, b| a.1.roi.total_cmp(&b.1.roi)) {
        println!("  Lowest ROI:  {} ({:.2}%, payback {})", name, worst.roi, worst.payback_label());
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
