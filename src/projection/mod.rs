//! Projection engine for year-by-year combined ratio improvement projections

mod state;
mod engine;
mod cashflows;
mod ratios;
mod attribution;
mod irr;

pub use state::ProjectionState;
pub use engine::{
    ProjectionEngine, ProjectionConfig, ReductionBasis, GrowthTiming, OngoingCostTreatment,
    total_investment, return_on_investment,
};
pub use cashflows::{YearRecord, ProjectionResult, ProjectionSummary, AttributedSummary, payback_label};
pub use ratios::{RatioComparison, combined_ratio};
pub use attribution::AttributedReduction;
pub use irr::calculate_irr;
