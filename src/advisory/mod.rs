//! Advisory exchanges that help users choose plausible input values
//!
//! Entirely separate from the projection engine: an advisor failure becomes a
//! notice for the user and never blocks a projection.

mod history;
mod guidance;

pub use history::{ChatHistory, ChatTurn, Role};
pub use guidance::{input_range, GuidanceAdvisor, InputRange, INPUT_GUIDE};

use log::warn;

use crate::error::AdvisoryError;

/// A service that answers free-text questions given the conversation so far
pub trait Advisor {
    fn answer(&self, history: &ChatHistory, question: &str) -> Result<String, AdvisoryError>;
}

/// Non-fatal message shown to the user when the advisor could not answer
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryNotice {
    pub message: String,
}

/// Result of one advisory exchange
#[derive(Debug, Clone, PartialEq)]
pub enum AdvisoryOutcome {
    Answered(String),
    Notice(AdvisoryNotice),
}

/// Ask the advisor a question, recording the exchange in `history`.
///
/// The question is appended before the advisor is called; the answer is
/// appended only on success.
pub fn consult<A: Advisor + ?Sized>(
    advisor: &A,
    history: &mut ChatHistory,
    question: &str,
) -> AdvisoryOutcome {
    let question = question.trim();
    if question.is_empty() {
        return notice(AdvisoryError::EmptyQuestion);
    }

    history.push(Role::User, question);

    match advisor.answer(history, question) {
        Ok(answer) => {
            history.push(Role::Assistant, answer.clone());
            AdvisoryOutcome::Answered(answer)
        }
        Err(e) => notice(e),
    }
}

fn notice(error: AdvisoryError) -> AdvisoryOutcome {
    warn!("advisory exchange failed: {}", error);
    AdvisoryOutcome::Notice(AdvisoryNotice {
        message: format!("Input guidance is unavailable right now ({}).", error),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OfflineAdvisor;

    impl Advisor for OfflineAdvisor {
        fn answer(&self, _history: &ChatHistory, _question: &str) -> Result<String, AdvisoryError> {
            Err(AdvisoryError::Unavailable("connection refused".to_string()))
        }
    }

    #[test]
    fn test_consult_records_both_turns() {
        let mut history = ChatHistory::new();
        let outcome = consult(&GuidanceAdvisor, &mut history, "What growth rate is typical?");

        match outcome {
            AdvisoryOutcome::Answered(answer) => assert!(answer.contains("growth")),
            other => panic!("expected an answer, got {:?}", other),
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].role, Role::User);
        assert_eq!(history.turns()[1].role, Role::Assistant);
    }

    #[test]
    fn test_failure_becomes_notice() {
        let mut history = ChatHistory::new();
        let outcome = consult(&OfflineAdvisor, &mut history, "What loss ratio?");

        match outcome {
            AdvisoryOutcome::Notice(n) => assert!(n.message.contains("connection refused")),
            other => panic!("expected a notice, got {:?}", other),
        }
        // The question stays on record, no answer is appended
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_empty_question_is_not_recorded() {
        let mut history = ChatHistory::new();
        let outcome = consult(&GuidanceAdvisor, &mut history, "   ");
        assert!(matches!(outcome, AdvisoryOutcome::Notice(_)));
        assert!(history.is_empty());
    }

    #[test]
    fn test_projection_unaffected_by_advisor_failure() {
        let mut history = ChatHistory::new();
        let _ = consult(&OfflineAdvisor, &mut history, "anything");
        let result = crate::projection::ProjectionEngine::default()
            .project(&crate::inputs::ScenarioInput::default());
        assert!(result.is_ok());
    }
}
