//! The conversation turn endpoint.
//!
//! One inbound request runs the whole pipeline in order: chat rate limit,
//! guest budget, directive computation, the model call, stage
//! reconciliation, and — once the completion signal fires — scene
//! extraction over the accumulated terminal-stage text.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use innerstory_core::error::DomainError;
use innerstory_core::identity::RouteClass;
use innerstory_core::transcript::{ConversationTurn, Role};
use innerstory_dialogue::codec;
use innerstory_dialogue::machine;
use innerstory_dialogue::stage::{Stage, StageState};
use innerstory_scenes::{Scene, extract_scenes};
use innerstory_throttle::guest_budget_exceeded;

use crate::error::ApiError;
use crate::prompt;
use crate::routes::resolve_identity;
use crate::state::AppState;

/// One transcript entry as the client sends it.
///
/// Both fields are optional: a malformed entry degrades to a safe default
/// instead of rejecting the whole request.
#[derive(Debug, Deserialize)]
pub struct RawTurn {
    /// `user` or `assistant`.
    #[serde(default)]
    pub role: Option<String>,
    /// The entry's text.
    #[serde(default)]
    pub text: Option<String>,
}

/// Request body for POST /turn.
#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    /// The full conversation so far, oldest first.
    #[serde(default)]
    pub transcript: Vec<RawTurn>,
    /// Client-reported stage, untrusted and re-validated.
    #[serde(default, deserialize_with = "lenient_int")]
    pub stage: Option<i64>,
    /// Client-reported turns within the stage, untrusted and re-validated.
    #[serde(default, deserialize_with = "lenient_int")]
    pub turns_in_stage: Option<i64>,
    /// Gateway-supplied authenticated user id, if any.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Response body for POST /turn.
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    /// The reconciled stage, never lower than any stage reached before.
    pub effective_stage: u32,
    /// The turn count the client must report on its next call.
    pub turns_in_stage: u32,
    /// The model's reply with all stage markers removed.
    pub reply: String,
    /// True once the terminal stage signalled completion.
    pub is_complete: bool,
    /// The extracted story, empty until `is_complete`.
    pub scenes: Vec<Scene>,
}

/// Accepts a number or a digit string; anything else counts as absent.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::Number(number) => number.as_i64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }))
}

/// Clamps raw entries into typed turns.
///
/// An unknown or missing role counts as the participant, so the guest
/// budget errs against the caller rather than in their favor.
fn normalize_transcript(raw: Vec<RawTurn>) -> Vec<ConversationTurn> {
    raw.into_iter()
        .map(|entry| {
            let role = match entry.role.as_deref() {
                Some(role) if role.eq_ignore_ascii_case("assistant") => Role::Assistant,
                _ => Role::User,
            };
            ConversationTurn {
                role,
                text: entry.text.unwrap_or_default(),
            }
        })
        .collect()
}

/// Concatenates every prior assistant reply tagged with the terminal
/// stage, then the latest (already stripped) reply, in chronological
/// order.
fn terminal_stage_text(transcript: &[ConversationTurn], latest: &str) -> String {
    let mut pieces: Vec<String> = transcript
        .iter()
        .filter(|turn| turn.role == Role::Assistant)
        .filter(|turn| codec::detect(&turn.text) == Some(Stage::NarrativeSynthesis.number()))
        .map(|turn| codec::strip(&turn.text))
        .collect();
    pieces.push(latest.to_owned());
    pieces.join("\n\n")
}

/// POST /turn
#[instrument(skip(state, headers, request))]
async fn take_turn(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let correlation_id = Uuid::new_v4();
    let identity = resolve_identity(request.user_id.as_deref(), &headers);

    if !state
        .throttle
        .admit(RouteClass::ChatMessage, &identity.key(), state.clock.now())
    {
        return Err(DomainError::RateLimited {
            route: RouteClass::ChatMessage,
        }
        .into());
    }

    let transcript = normalize_transcript(request.transcript);
    if guest_budget_exceeded(&transcript, identity.is_authenticated()) {
        return Err(DomainError::GuestQuotaExceeded.into());
    }

    let client_state = StageState::from_client(request.stage, request.turns_in_stage);
    let directive = machine::compute_directive(client_state);
    let system_prompt = prompt::build_system_prompt(&directive);

    info!(
        correlation_id = %correlation_id,
        stage = client_state.stage.number(),
        turns_in_stage = client_state.turns_in_stage,
        "requesting model completion"
    );

    let Some(reply) = state.model.complete(&system_prompt, &transcript).await? else {
        return Err(DomainError::Upstream("model returned no reply".to_owned()).into());
    };

    let reported = codec::detect(&reply);
    let effective = machine::reconcile(reported, machine::server_floor(client_state));
    let cleaned = codec::strip(&reply);
    let is_complete = codec::completion_signal(&reply, reported, client_state.stage);

    let scenes = if is_complete {
        extract_scenes(&terminal_stage_text(&transcript, &cleaned))
    } else {
        Vec::new()
    };

    info!(
        correlation_id = %correlation_id,
        effective_stage = effective.number(),
        is_complete,
        scene_count = scenes.len(),
        "turn reconciled"
    );

    Ok(Json(TurnResponse {
        effective_stage: effective.number(),
        turns_in_stage: machine::next_turns_in_stage(effective, client_state),
        reply: cleaned,
        is_complete,
        scenes,
    }))
}

/// Returns the router for the conversation context.
pub fn router() -> Router<AppState> {
    Router::new().route("/turn", post(take_turn))
}
