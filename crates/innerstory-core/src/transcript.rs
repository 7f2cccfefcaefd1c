//! Conversation transcript types.
//!
//! The engine is stateless across requests: the caller supplies the full
//! transcript on every call, and nothing here owns a database row.

use serde::{Deserialize, Serialize};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The participant.
    User,
    /// The language model.
    Assistant,
}

/// One entry in a conversation transcript, append-only within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who authored this entry.
    pub role: Role,
    /// The entry's text content.
    pub text: String,
}

impl ConversationTurn {
    /// Creates a user-authored turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Creates an assistant-authored turn.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Counts the user-authored entries in a transcript.
#[must_use]
pub fn user_turn_count(transcript: &[ConversationTurn]) -> usize {
    transcript.iter().filter(|t| t.role == Role::User).count()
}
