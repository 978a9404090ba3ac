//! Conversation turn types.
//!
//! A conversation is an ordered sequence of turns owned by the *caller*: the
//! gateway receives it in the request body, appends the assistant's reply,
//! and echoes it back. Nothing is persisted server-side.
//!
//! The wire shape (`{"role": "user"|"model", "parts": "..."}`) follows the
//! Gemini chat-history format.

use serde::{Deserialize, Serialize};

/// The role of a turn's author in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The generative model
    Model,
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Who authored this turn
    pub role: Role,

    /// The text content
    pub parts: String,
}

impl Turn {
    /// Create a new user turn.
    pub fn user(parts: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: parts.into(),
        }
    }

    /// Create a new model turn.
    pub fn model(parts: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: parts.into(),
        }
    }
}

/// The last `n` turns of a history, in order.
///
/// The completion client only sends a small trailing window of prior turns;
/// the composed prompt carries the knowledge context, so older history adds
/// cost without adding grounding.
pub fn recent_window(history: &[Turn], n: usize) -> &[Turn] {
    let start = history.len().saturating_sub(n);
    &history[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_turn() {
        let turn = Turn::user("Hola, Condorito");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.parts, "Hola, Condorito");
    }

    #[test]
    fn role_serializes_lowercase() {
        let turn = Turn::model("Con gusto");
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"role\":\"model\""));

        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, turn);
    }

    #[test]
    fn window_takes_trailing_turns() {
        let history = vec![Turn::user("a"), Turn::model("b"), Turn::user("c")];
        let window = recent_window(&history, 2);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].parts, "b");
        assert_eq!(window[1].parts, "c");
    }

    #[test]
    fn window_larger_than_history() {
        let history = vec![Turn::user("only")];
        assert_eq!(recent_window(&history, 5).len(), 1);
        assert!(recent_window(&[], 2).is_empty());
    }
}
