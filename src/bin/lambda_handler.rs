//! AWS Lambda handler for running combined ratio projections
//!
//! This Lambda function accepts a scenario via JSON and returns the year-by-year
//! projection with ROI, payback period and, when a range is given, the min/max
//! attribution sensitivity results.
//!
//! Request body:
//! ```json
//! {
//!   "scenario": { "current_gwp": 500.0, "loss_ratio_reduction": 2.0 },
//!   "reduction_basis": "absolute",
//!   "sensitivity": { "min": {...}, "max": {...} }
//! }
//! ```
//! Unknown keys are rejected with a 400.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use combined_ratio_calculator::{
    projection::{GrowthTiming, OngoingCostTreatment, ProjectionConfig, ReductionBasis},
    AttributionRange, ProjectionResult, ScenarioInput, ScenarioRunner, SensitivityResult,
};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Input for one projection
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionRequest {
    /// Scenario values (missing fields take the calculator defaults)
    #[serde(default)]
    pub scenario: ScenarioInput,

    /// Reduction basis (default: absolute percentage points)
    #[serde(default)]
    pub reduction_basis: ReductionBasis,

    /// Premium growth timing (default: growth applies to year 1)
    #[serde(default)]
    pub growth_timing: GrowthTiming,

    /// Ongoing cost treatment (default: netted from annual savings)
    #[serde(default)]
    pub cost_treatment: OngoingCostTreatment,

    /// Min/max attribution range for a sensitivity run
    #[serde(default)]
    pub sensitivity: Option<AttributionRange>,
}

impl ProjectionRequest {
    fn config(&self) -> ProjectionConfig {
        ProjectionConfig {
            reduction_basis: self.reduction_basis,
            growth_timing: self.growth_timing,
            ongoing_costs: self.cost_treatment,
        }
    }
}

/// Output from the projection
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub config: ProjectionConfig,
    pub result: ProjectionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<SensitivityResult>,
    pub execution_time_us: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn cors(builder: lambda_http::http::response::Builder) -> lambda_http::http::response::Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
}

fn json_response<T: Serialize>(status: u16, body: &T) -> Result<Response<Body>, Error> {
    let response = cors(Response::builder())
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(serde_json::to_string(body)?))?;
    Ok(response)
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    json_response(status, &ErrorBody { error: message })
}

/// A request answered with a 400
#[derive(Debug, PartialEq)]
struct BadRequest(String);

/// Parse, validate and project one request body
fn process(body: &str) -> Result<ProjectionResponse, BadRequest> {
    let start = Instant::now();

    let request: ProjectionRequest =
        serde_json::from_str(body).map_err(|e| BadRequest(format!("Invalid JSON: {}", e)))?;

    let runner = ScenarioRunner::new(request.config());

    let result = runner.run(&request.scenario).map_err(|e| {
        warn!("rejected scenario: {}", e);
        BadRequest(e.to_string())
    })?;

    let sensitivity = match &request.sensitivity {
        Some(range) => Some(runner.run_sensitivity(&request.scenario, range).map_err(|e| {
            warn!("rejected sensitivity range: {}", e);
            BadRequest(e.to_string())
        })?),
        None => None,
    };

    let execution_time_us = start.elapsed().as_micros() as u64;
    info!(
        "projected {} years: roi={:.2}% payback={} in {}us",
        result.years.len(),
        result.roi,
        result.payback_label(),
        execution_time_us
    );

    Ok(ProjectionResponse {
        config: *runner.config(),
        result,
        sensitivity,
        execution_time_us,
    })
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(cors(Response::builder()).status(200).body(Body::Empty)?);
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    match process(&body_str) {
        Ok(response) => json_response(200, &response),
        Err(BadRequest(message)) => error_response(400, &message),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_projects_defaults() {
        let response = process("{}").unwrap();
        assert_eq!(response.result.years.len(), ScenarioInput::default().analysis_period as usize);
        assert_eq!(response.config, ProjectionConfig::default());
        assert!(response.sensitivity.is_none());
    }

    #[test]
    fn test_conventions_and_sensitivity() {
        let body = r#"{
            "scenario": {"current_gwp": 900.0, "loss_ratio_reduction": 2.0, "expense_ratio_reduction": 3.0},
            "reduction_basis": "relative",
            "sensitivity": {
                "min": {"loss_ratio_reduction": 0.5, "expense_ratio_reduction": 1.0},
                "max": {"loss_ratio_reduction": 1.5, "expense_ratio_reduction": 2.0}
            }
        }"#;
        let response = process(body).unwrap();
        assert_eq!(response.config.reduction_basis, ReductionBasis::Relative);
        assert!((response.result.years[0].gwp - 918.0).abs() < 1e-9);

        let sensitivity = response.sensitivity.unwrap();
        assert!(sensitivity.max.attribution.unwrap().total_savings > sensitivity.min.attribution.unwrap().total_savings);
    }

    #[test]
    fn test_invalid_json_is_bad_request() {
        let BadRequest(message) = process("{not json").unwrap_err();
        assert!(message.starts_with("Invalid JSON"));
    }

    #[test]
    fn test_unknown_field_is_bad_request() {
        let BadRequest(message) = process(r#"{"scenario": {"gwp": 900.0}}"#).unwrap_err();
        assert!(message.contains("unknown field `gwp`"));

        let BadRequest(message) = process(r#"{"current_gwp": 900.0}"#).unwrap_err();
        assert!(message.contains("unknown field `current_gwp`"));
    }

    #[test]
    fn test_validation_failure_is_bad_request() {
        let BadRequest(message) = process(r#"{"scenario": {"analysis_period": 12}}"#).unwrap_err();
        assert!(message.contains("analysis_period"));
    }

    #[test]
    fn test_inverted_sensitivity_range_is_bad_request() {
        let body = r#"{"sensitivity": {
            "min": {"loss_ratio_reduction": 0.4, "expense_ratio_reduction": 0.2},
            "max": {"loss_ratio_reduction": 0.1, "expense_ratio_reduction": 0.8}
        }}"#;
        let BadRequest(message) = process(body).unwrap_err();
        assert!(message.contains("attribution_range.loss_ratio_reduction"));
    }
}
