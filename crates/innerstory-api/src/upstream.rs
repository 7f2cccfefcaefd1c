//! Production `ModelClient` over an OpenAI-compatible chat-completions
//! endpoint.

use async_trait::async_trait;
use innerstory_core::error::DomainError;
use innerstory_core::model::ModelClient;
use innerstory_core::transcript::{ConversationTurn, Role};
use serde_json::json;

/// HTTP client for the upstream language model.
pub struct UpstreamModelClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl UpstreamModelClient {
    /// Creates a client against the given chat-completions base URL.
    #[must_use]
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

#[async_trait]
impl ModelClient for UpstreamModelClient {
    async fn complete(
        &self,
        system_prompt: &str,
        transcript: &[ConversationTurn],
    ) -> Result<Option<String>, DomainError> {
        let mut messages = vec![json!({"role": "system", "content": system_prompt})];
        messages.extend(
            transcript
                .iter()
                .map(|turn| json!({"role": wire_role(turn.role), "content": turn.text})),
        );

        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.7,
            "max_tokens": 4096,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DomainError::Upstream(format!(
                "model endpoint returned {status}: {text}"
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DomainError::Upstream(e.to_string()))?;

        // A present-but-empty content field is "no reply", not a fault.
        Ok(payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(str::to_owned))
    }
}
