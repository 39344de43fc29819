//! Combined Ratio Calculator - projection engine for P&C combined ratio improvements
//!
//! This library provides:
//! - Scenario inputs with boundary validation and CSV/JSON loading
//! - Year-by-year projection of premium, underwriting profit and savings
//! - ROI, payback period and IRR of the improvement investment
//! - Attributed savings and min/max sensitivity runs
//! - CSV export of projection tables and batch summaries
//! - Offline input guidance with append-only conversation history

pub mod error;
pub mod inputs;
pub mod projection;
pub mod scenario;
pub mod export;
pub mod advisory;

// Re-export commonly used types
pub use error::{InputError, LoadError, ExportError, AdvisoryError};
pub use inputs::{ScenarioInput, Attribution, AttributionRange};
pub use projection::{ProjectionEngine, ProjectionConfig, ProjectionResult, YearRecord};
pub use scenario::{ScenarioRunner, SensitivityResult};
