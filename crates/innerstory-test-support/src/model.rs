//! Deterministic `ModelClient` implementations for tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use innerstory_core::error::DomainError;
use innerstory_core::model::ModelClient;
use innerstory_core::transcript::ConversationTurn;

/// Replays a fixed sequence of replies, one per call, then falls silent.
pub struct ScriptedModelClient {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedModelClient {
    /// Creates a client that returns the given replies in order.
    #[must_use]
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(str::to_owned).collect()),
        }
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    async fn complete(
        &self,
        _system_prompt: &str,
        _transcript: &[ConversationTurn],
    ) -> Result<Option<String>, DomainError> {
        Ok(self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front())
    }
}

/// Always returns an empty reply.
pub struct SilentModelClient;

#[async_trait]
impl ModelClient for SilentModelClient {
    async fn complete(
        &self,
        _system_prompt: &str,
        _transcript: &[ConversationTurn],
    ) -> Result<Option<String>, DomainError> {
        Ok(None)
    }
}

/// Always fails with an upstream error.
pub struct FailingModelClient;

#[async_trait]
impl ModelClient for FailingModelClient {
    async fn complete(
        &self,
        _system_prompt: &str,
        _transcript: &[ConversationTurn],
    ) -> Result<Option<String>, DomainError> {
        Err(DomainError::Upstream("scripted failure".to_owned()))
    }
}
