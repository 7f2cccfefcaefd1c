//! Guest turn governor.

use innerstory_core::transcript::{ConversationTurn, user_turn_count};

/// How many exchanges an unauthenticated participant gets.
pub const GUEST_TURN_LIMIT: usize = 5;

/// True when a guest has used up their turn budget.
///
/// Two independent checks over the server-received transcript: the count
/// of user-role messages, and `ceil(len / 2)` as a floor on the real
/// exchange count. The second closes the bypass where a caller pads the
/// transcript with fabricated assistant turns to under-report its own
/// messages. Authenticated callers are exempt.
#[must_use]
pub fn guest_budget_exceeded(transcript: &[ConversationTurn], is_authenticated: bool) -> bool {
    if is_authenticated {
        return false;
    }
    let user_messages = user_turn_count(transcript);
    let total_turns = transcript.len().div_ceil(2);
    user_messages > GUEST_TURN_LIMIT || total_turns > GUEST_TURN_LIMIT + 1
}
