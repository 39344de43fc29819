//! CSV export of projection tables and batch summaries

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::error::ExportResult;
use crate::projection::{payback_label, ProjectionResult};
use crate::scenario::BatchOutcome;

/// Year table columns, in output order
pub const YEAR_COLUMNS: [&str; 6] = [
    "year",
    "gwp",
    "profit_current",
    "profit_new",
    "annual_savings",
    "cumulative_savings",
];

/// Extra columns written when the result carries attributed savings
pub const ATTRIBUTED_COLUMNS: [&str; 2] = ["annual_savings_attributed", "cumulative_savings_attributed"];

/// Batch summary columns, in output order
pub const SUMMARY_COLUMNS: [&str; 9] = [
    "scenario",
    "current_combined_ratio",
    "new_combined_ratio",
    "total_investment",
    "total_savings",
    "roi",
    "payback_period",
    "irr",
    "error",
];

/// Write the year table to any writer, one row per year in ascending order
pub fn write_year_table<W: Write>(writer: W, result: &ProjectionResult) -> ExportResult<()> {
    let attributed = result.attribution.is_some();
    let mut csv_writer = Writer::from_writer(writer);

    let mut header: Vec<&str> = YEAR_COLUMNS.to_vec();
    if attributed {
        header.extend_from_slice(&ATTRIBUTED_COLUMNS);
    }
    csv_writer.write_record(&header)?;

    for row in &result.years {
        let mut record = vec![
            row.year.to_string(),
            format!("{:.6}", row.gwp),
            format!("{:.6}", row.profit_current),
            format!("{:.6}", row.profit_new),
            format!("{:.6}", row.annual_savings),
            format!("{:.6}", row.cumulative_savings),
        ];
        if attributed {
            record.push(format!("{:.6}", row.annual_savings_attributed.unwrap_or(0.0)));
            record.push(format!("{:.6}", row.cumulative_savings_attributed.unwrap_or(0.0)));
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the year table to a file
pub fn export_year_table<P: AsRef<Path>>(path: P, result: &ProjectionResult) -> ExportResult<()> {
    let file = File::create(path)?;
    write_year_table(file, result)
}

/// Write one summary row per batch scenario; rejected scenarios carry their error
pub fn write_batch_summary<W: Write>(writer: W, outcomes: &[BatchOutcome]) -> ExportResult<()> {
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record(SUMMARY_COLUMNS)?;

    for outcome in outcomes {
        let record = match &outcome.result {
            Ok(result) => vec![
                outcome.name.clone(),
                format!("{:.4}", result.ratios.current_combined_ratio()),
                format!("{:.4}", result.ratios.new_combined_ratio()),
                format!("{:.6}", result.total_investment),
                format!("{:.6}", result.total_savings),
                format!("{:.4}", result.roi),
                payback_label(result.payback_period),
                result.irr.map(|r| format!("{:.4}", r)).unwrap_or_default(),
                String::new(),
            ],
            Err(e) => {
                let mut record = vec![outcome.name.clone()];
                record.extend(std::iter::repeat(String::new()).take(SUMMARY_COLUMNS.len() - 2));
                record.push(e.to_string());
                record
            }
        };
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the batch summary to a file
pub fn export_batch_summary<P: AsRef<Path>>(path: P, outcomes: &[BatchOutcome]) -> ExportResult<()> {
    let file = File::create(path)?;
    write_batch_summary(file, outcomes)
}
