//! Projection output structures

use serde::{Deserialize, Serialize};

use super::ratios::RatioComparison;

/// A single row of projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: u32,

    /// Gross written premium for the year
    pub gwp: f64,

    // Underwriting profit under each set of ratios
    pub profit_current: f64,
    pub profit_new: f64,

    // Savings
    pub annual_savings: f64,
    pub cumulative_savings: f64,

    // Attributed savings (only when attribution inputs are supplied)
    pub annual_savings_attributed: Option<f64>,
    pub cumulative_savings_attributed: Option<f64>,
}

/// Aggregates for the attributed share of the improvement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributedSummary {
    pub roi: f64,
    pub payback_period: Option<u32>,
    pub total_investment: f64,
    pub total_savings: f64,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Yearly rows, year 1 first
    pub years: Vec<YearRecord>,

    /// Ratios before and after the improvement
    pub ratios: RatioComparison,

    /// Return on investment (%)
    pub roi: f64,

    /// First year the investment is paid back, None if not within the period
    pub payback_period: Option<u32>,

    pub total_investment: f64,

    /// Savings over the period, net of ongoing costs
    pub total_savings: f64,

    /// Annual internal rate of return of the net cash flows (%)
    pub irr: Option<f64>,

    pub attribution: Option<AttributedSummary>,
}

impl ProjectionResult {
    /// Payback period as displayed to users
    pub fn payback_label(&self) -> String {
        payback_label(self.payback_period)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let final_gwp = self.years.last().map(|r| r.gwp).unwrap_or(0.0);
        let final_cumulative_savings = self.years.last().map(|r| r.cumulative_savings).unwrap_or(0.0);

        let best_year = self
            .years
            .iter()
            .max_by(|a, b| a.annual_savings.total_cmp(&b.annual_savings))
            .map(|r| r.year);
        let worst_year = self
            .years
            .iter()
            .min_by(|a, b| a.annual_savings.total_cmp(&b.annual_savings))
            .map(|r| r.year);

        ProjectionSummary {
            total_years: self.years.len() as u32,
            current_combined_ratio: self.ratios.current_combined_ratio(),
            new_combined_ratio: self.ratios.new_combined_ratio(),
            final_gwp,
            final_cumulative_savings,
            best_year,
            worst_year,
        }
    }
}

/// "Not Achieved" when the investment is never paid back
pub fn payback_label(payback_period: Option<u32>) -> String {
    match payback_period {
        Some(year) => year.to_string(),
        None => "Not Achieved".to_string(),
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub current_combined_ratio: f64,
    pub new_combined_ratio: f64,
    pub final_gwp: f64,
    pub final_cumulative_savings: f64,
    /// Year with the highest annual savings
    pub best_year: Option<u32>,
    /// Year with the lowest annual savings
    pub worst_year: Option<u32>,
}
