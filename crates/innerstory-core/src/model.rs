//! Upstream language-model abstraction.
//!
//! In production this is an HTTP client; tests and replays inject
//! deterministic implementations.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::transcript::ConversationTurn;

/// Seam to the external language model.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Requests a completion for the given system prompt and transcript.
    ///
    /// Returns `Ok(None)` when the upstream produced no usable text; the
    /// orchestration layer treats that as "no reply" and performs neither
    /// stage reconciliation nor scene extraction.
    async fn complete(
        &self,
        system_prompt: &str,
        transcript: &[ConversationTurn],
    ) -> Result<Option<String>, DomainError>;
}
