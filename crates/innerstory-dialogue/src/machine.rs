//! Stage state machine.
//!
//! Consumed once per request before the model call (directive
//! computation) and once after (reconciliation). The reconciliation rule
//! is the load-bearing invariant of the whole engine: the stage observed
//! by a client never decreases, whatever the model declares.

use crate::stage::{STAGE_TURN_CEILING, Stage, StageState};

/// Returns the stage a forced advance would move to, when the ceiling has
/// been reached and a next stage exists.
#[must_use]
pub fn forced_advance_target(state: StageState) -> Option<Stage> {
    if state.turns_in_stage >= STAGE_TURN_CEILING {
        state.stage.next()
    } else {
        None
    }
}

/// The stage the server will not let this turn fall below: the client's
/// clamped stage, or the forced-advance target once the ceiling is hit.
///
/// Folding the forced advance into the floor means a model that ignores
/// the advance order, or regresses outright, still lands on the forced
/// stage at reconciliation.
#[must_use]
pub fn server_floor(state: StageState) -> Stage {
    forced_advance_target(state).unwrap_or(state.stage)
}

/// Builds the directive text appended to the model's instructions for
/// this turn.
///
/// At the ceiling the directive mandates advancement; it is an order, not
/// a suggestion, so the protocol cannot stall on an evasive model. The
/// terminal stage has no ceiling to advance past and always holds.
#[must_use]
pub fn compute_directive(state: StageState) -> String {
    let current = state.stage;
    if let Some(next) = forced_advance_target(state) {
        format!(
            "STAGE DIRECTIVE: this conversation has spent {turns} turns in stage \
             {current_number} ({current_name}), the ceiling for a single stage. Your next \
             reply must advance to stage {next_number} ({next_name}) and declare it by \
             including the marker [PHASE:{next_number}]. Advancing is mandatory: do not \
             remain in stage {current_number} and never declare a stage below \
             {next_number}.",
            turns = state.turns_in_stage,
            current_number = current.number(),
            current_name = current.name(),
            next_number = next.number(),
            next_name = next.name(),
        )
    } else {
        format!(
            "STAGE DIRECTIVE: this conversation is in stage {current_number} \
             ({current_name}), turn {turns} of {ceiling}. Declare the stage of your reply \
             with a [PHASE:{current_number}] marker and never declare a stage below \
             {current_number}.",
            current_number = current.number(),
            current_name = current.name(),
            turns = state.turns_in_stage,
            ceiling = STAGE_TURN_CEILING,
        )
    }
}

/// Reconciles the stage the model reported against the server floor.
///
/// An absent or out-of-range report, or one below the floor, resolves to
/// the floor; anything else is accepted. The result is non-decreasing
/// across any sequence of calls that feeds each result back as the next
/// floor.
#[must_use]
pub fn reconcile(reported: Option<u32>, floor: Stage) -> Stage {
    reported
        .and_then(|number| Stage::from_number(i64::from(number)))
        .filter(|reported_stage| *reported_stage >= floor)
        .unwrap_or(floor)
}

/// The `turns_in_stage` value the client must report on its next call:
/// zero right after a stage transition, incremented otherwise.
#[must_use]
pub fn next_turns_in_stage(effective: Stage, state: StageState) -> u32 {
    if effective > state.stage {
        0
    } else {
        state.turns_in_stage.saturating_add(1)
    }
}
