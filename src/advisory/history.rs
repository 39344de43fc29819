//! Append-only conversation history for advisory exchanges

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// Conversation history owned by the caller.
///
/// Turns can only be appended; there is no way to edit or remove one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(ChatTurn {
            role,
            content: content.into(),
            at: Utc::now(),
        });
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_are_appended_in_order() {
        let mut history = ChatHistory::new();
        assert!(history.is_empty());

        history.push(Role::User, "What loss ratio reduction is realistic?");
        history.push(Role::Assistant, "Between 0 and 10%.");

        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].role, Role::User);
        assert_eq!(history.turns().last().unwrap().role, Role::Assistant);
        assert!(history.turns()[0].at <= history.turns()[1].at);
    }

    #[test]
    fn test_serializes_roles_lowercase() {
        let mut history = ChatHistory::new();
        history.push(Role::User, "hi");
        let json = serde_json::to_string(&history).unwrap();
        assert!(json.contains(r#""role":"user""#));
    }
}
