//! Offline input guidance built from the calculator's input ranges

use serde::Serialize;

use super::{Advisor, ChatHistory};
use crate::error::AdvisoryError;

/// Suggested range and default for one scenario input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputRange {
    /// Field name on `ScenarioInput`
    pub field: &'static str,
    pub label: &'static str,
    pub min: f64,
    /// None when the input has no upper bound
    pub max: Option<f64>,
    pub default: f64,
    keywords: &'static [&'static str],
}

impl InputRange {
    /// One-line description of the range and default
    pub fn describe(&self) -> String {
        match self.max {
            Some(max) => format!(
                "{}: typically between {} and {}, default {}.",
                self.label, self.min, max, self.default
            ),
            None => format!("{}: at least {}, default {}.", self.label, self.min, self.default),
        }
    }

    fn matches(&self, question: &str) -> bool {
        self.keywords.iter().all(|k| question.contains(k))
    }
}

/// Ranges offered to users when entering a scenario
pub static INPUT_GUIDE: [InputRange; 9] = [
    InputRange {
        field: "current_gwp",
        label: "Annual gross written premium ($M)",
        min: 0.0,
        max: None,
        default: 500.0,
        keywords: &["premium"],
    },
    InputRange {
        field: "current_loss_ratio",
        label: "Current loss ratio (%)",
        min: 0.0,
        max: Some(100.0),
        default: 65.0,
        keywords: &["loss ratio"],
    },
    InputRange {
        field: "current_expense_ratio",
        label: "Current expense ratio (%)",
        min: 0.0,
        max: Some(100.0),
        default: 30.0,
        keywords: &["expense ratio"],
    },
    InputRange {
        field: "loss_ratio_reduction",
        label: "Expected reduction in loss ratio (%)",
        min: 0.0,
        max: Some(10.0),
        default: 0.5,
        keywords: &["loss", "reduc"],
    },
    InputRange {
        field: "expense_ratio_reduction",
        label: "Expected reduction in expense ratio (%)",
        min: 0.0,
        max: Some(10.0),
        default: 1.0,
        keywords: &["expense", "reduc"],
    },
    InputRange {
        field: "premium_growth_rate",
        label: "Annual premium growth rate (%)",
        min: 0.0,
        max: Some(5.0),
        default: 2.0,
        keywords: &["growth"],
    },
    InputRange {
        field: "analysis_period",
        label: "Analysis period (years)",
        min: 1.0,
        max: Some(10.0),
        default: 5.0,
        keywords: &["period"],
    },
    InputRange {
        field: "initial_investment",
        label: "Initial investment cost ($M)",
        min: 0.0,
        max: None,
        default: 7.0,
        keywords: &["investment"],
    },
    InputRange {
        field: "ongoing_costs",
        label: "Annual ongoing costs ($M)",
        min: 0.0,
        max: None,
        default: 1.5,
        keywords: &["ongoing"],
    },
];

/// Look up the guidance entry for a `ScenarioInput` field
pub fn input_range(field: &str) -> Option<&'static InputRange> {
    INPUT_GUIDE.iter().find(|r| r.field == field)
}

/// Advisor answering from `INPUT_GUIDE` without leaving the process
#[derive(Debug, Clone, Copy, Default)]
pub struct GuidanceAdvisor;

impl Advisor for GuidanceAdvisor {
    fn answer(&self, _history: &ChatHistory, question: &str) -> Result<String, AdvisoryError> {
        let question = question.to_lowercase();
        let matched: Vec<String> = INPUT_GUIDE
            .iter()
            .filter(|r| r.matches(&question))
            .map(InputRange::describe)
            .collect();

        if matched.is_empty() {
            let mut answer = String::from("Suggested input ranges:");
            for range in &INPUT_GUIDE {
                answer.push('\n');
                answer.push_str(&range.describe());
            }
            Ok(answer)
        } else {
            Ok(matched.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guide_defaults_match_scenario_defaults() {
        let input = crate::inputs::ScenarioInput::default();
        assert_eq!(input_range("current_gwp").unwrap().default, input.current_gwp);
        assert_eq!(input_range("loss_ratio_reduction").unwrap().default, input.loss_ratio_reduction);
        assert_eq!(input_range("analysis_period").unwrap().default, input.analysis_period as f64);
        assert_eq!(input_range("ongoing_costs").unwrap().default, input.ongoing_costs);
        assert!(input_range("nonexistent").is_none());
    }

    #[test]
    fn test_answers_specific_field() {
        let answer = GuidanceAdvisor
            .answer(&ChatHistory::new(), "What Expense Ratio reduction should I expect?")
            .unwrap();
        assert!(answer.contains("Expected reduction in expense ratio"));
        assert!(!answer.contains("growth"));
    }

    #[test]
    fn test_falls_back_to_full_guide() {
        let answer = GuidanceAdvisor.answer(&ChatHistory::new(), "What is the best ratio?").unwrap();
        assert!(answer.starts_with("Suggested input ranges:"));
        assert_eq!(answer.lines().count(), 1 + INPUT_GUIDE.len());
    }
}
