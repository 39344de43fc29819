//! Scenario input structures and scenario file loading

mod data;
pub mod loader;

pub use data::{Attribution, AttributionRange, ScenarioInput, MAX_ANALYSIS_PERIOD};
pub use loader::{
    load_scenario_json, load_scenarios, load_scenarios_from_reader, NamedScenario, RejectedRow, ScenarioBatch,
};
