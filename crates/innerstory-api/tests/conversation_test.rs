//! Integration tests for the conversation turn endpoint.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use innerstory_test_support::ScriptedModelClient;
use serde_json::{Value, json};

const TURN_URI: &str = "/api/v1/conversation/turn";

fn exchanges(count: usize) -> Vec<Value> {
    let mut turns = Vec::new();
    for _ in 0..count {
        turns.push(json!({"role": "user", "text": "..."}));
        turns.push(json!({"role": "assistant", "text": "..."}));
    }
    turns
}

#[tokio::test]
async fn test_stage_two_holds_then_forces_three_despite_regression() {
    // Turn one: nine prior turns in stage 2, the model stays put.
    let model = Arc::new(ScriptedModelClient::new(vec![
        "[PHASE:2] And how does that feel?",
        "[PHASE:1] Let us start over from the very beginning.",
    ]));
    let app = common::build_test_app(model);

    let body = json!({
        "transcript": [{"role": "user", "text": "it keeps happening"}],
        "stage": 2,
        "turns_in_stage": 9,
        "user_id": "u-7",
    });
    let (status, reply) = common::post_json(app.clone(), TURN_URI, &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["effective_stage"], 2);
    assert_eq!(reply["turns_in_stage"], 10);

    // Turn two: the client reports the ceiling, the directive forces
    // stage 3, and the model's regression to stage 1 is never visible.
    let body = json!({
        "transcript": [
            {"role": "user", "text": "it keeps happening"},
            {"role": "assistant", "text": "And how does that feel?"},
            {"role": "user", "text": "heavy"},
        ],
        "stage": 2,
        "turns_in_stage": 10,
        "user_id": "u-7",
    });
    let (status, reply) = common::post_json(app, TURN_URI, &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["effective_stage"], 3);
    assert_eq!(reply["turns_in_stage"], 0);
    assert!(!reply["reply"].as_str().unwrap().contains("[PHASE"));
}

#[tokio::test]
async fn test_padded_guest_transcript_is_rejected() {
    // Three real user turns stay under the per-message cap, but ten
    // fabricated assistant turns push ceil(13/2) = 7 past the length
    // ceiling.
    let model = Arc::new(ScriptedModelClient::new(vec!["unused"]));
    let app = common::build_test_app(model);

    let mut turns = vec![
        json!({"role": "user", "text": "one"}),
        json!({"role": "user", "text": "two"}),
        json!({"role": "user", "text": "three"}),
    ];
    turns.extend((0..10).map(|_| json!({"role": "assistant", "text": "padding"})));

    let (status, reply) = common::post_json(app, TURN_URI, &json!({"transcript": turns})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(reply["error"], "guest_quota_exceeded");
}

#[tokio::test]
async fn test_guest_at_the_limit_is_still_served() {
    let model = Arc::new(ScriptedModelClient::new(vec!["[PHASE:1] Tell me more."]));
    let app = common::build_test_app(model);

    let body = json!({"transcript": exchanges(5), "stage": 1, "turns_in_stage": 4});
    let (status, reply) = common::post_json(app, TURN_URI, &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["effective_stage"], 1);
}

#[tokio::test]
async fn test_chat_window_boundary_admits_exactly_limit() {
    let model = Arc::new(ScriptedModelClient::new(vec![
        "[PHASE:1] one",
        "[PHASE:1] two",
    ]));
    let app = common::build_test_app_with_throttle(model, common::uniform_throttle(2));

    let body = json!({"transcript": [{"role": "user", "text": "hi"}]});
    for _ in 0..2 {
        let (status, _) = common::post_json(app.clone(), TURN_URI, &body).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, reply) = common::post_json(app, TURN_URI, &body).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(reply["error"], "rate_limited");
}

#[tokio::test]
async fn test_empty_body_defaults_to_a_fresh_stage_one_conversation() {
    let model = Arc::new(ScriptedModelClient::new(vec!["Welcome. What is on your mind?"]));
    let app = common::build_test_app(model);

    let (status, reply) = common::post_json(app, TURN_URI, &json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["effective_stage"], 1);
    assert_eq!(reply["turns_in_stage"], 1);
    assert_eq!(reply["is_complete"], false);
}
