// Unit tests for the session state reducer.
//
// These drive the reducer directly with server events and verify the
// transcript, streaming flag, and phase transitions, independent of any
// transport.

use mockmate::session::{Phase, Role, Score, SessionKind, SessionState};
use mockmate::socket::messages::ServerEvent;

fn algorithm_state() -> SessionState {
    SessionState::new("sess-1", SessionKind::Algorithm, "Reverse a linked list.")
}

fn chunk(content: &str) -> ServerEvent {
    ServerEvent::MessageChunk {
        content: content.to_string(),
    }
}

fn complete(content: &str) -> ServerEvent {
    ServerEvent::MessageComplete {
        content: content.to_string(),
        completed: false,
        stage: None,
    }
}

#[test]
fn test_opening_prompt_seeds_transcript() {
    let state = algorithm_state();

    assert_eq!(state.turns.len(), 1);
    assert_eq!(state.turns[0].role, Role::Assistant);
    assert_eq!(state.turns[0].content, "Reverse a linked list.");
    assert!(!state.streaming);
    assert_eq!(state.phase, Phase::AwaitingTurn);
}

#[test]
fn test_chunks_accumulate_in_arrival_order() {
    let mut state = algorithm_state();

    state.apply(ServerEvent::MessageStart);
    assert!(state.streaming);
    assert_eq!(state.phase, Phase::Streaming);
    assert_eq!(state.turns.len(), 2);

    state.apply(chunk("Let's "));
    state.apply(chunk("think "));
    state.apply(chunk("step by step."));

    assert_eq!(state.turns[1].content, "Let's think step by step.");
}

#[test]
fn test_complete_supersedes_accumulated_chunks() {
    let mut state = algorithm_state();

    state.apply(ServerEvent::MessageStart);
    state.apply(chunk("Let'ss "));
    state.apply(chunk("thinkk "));
    state.apply(complete("Let's think step by step."));

    // The full content is authoritative over whatever the chunks built up.
    assert_eq!(state.turns[1].content, "Let's think step by step.");
    assert!(!state.streaming);
    assert_eq!(state.phase, Phase::AwaitingTurn);
}

#[test]
fn test_complete_with_final_flag_ends_session() {
    let mut state = algorithm_state();

    state.apply(ServerEvent::MessageStart);
    state.apply(ServerEvent::MessageComplete {
        content: "That concludes the interview.".to_string(),
        completed: true,
        stage: None,
    });

    assert_eq!(state.phase, Phase::Ended);
    assert!(!state.streaming);
}

#[test]
fn test_complete_carries_stage_forward() {
    let mut state = SessionState::new("sess-2", SessionKind::SystemDesign, "Design a URL shortener.")
        .with_stage("requirements");

    state.apply(ServerEvent::MessageStart);
    state.apply(ServerEvent::MessageComplete {
        content: "Good. Let's talk architecture.".to_string(),
        completed: false,
        stage: Some("architecture".to_string()),
    });

    assert_eq!(state.stage.as_deref(), Some("architecture"));
}

#[test]
fn test_chunk_without_turn_in_progress_is_dropped() {
    let mut state = algorithm_state();

    state.apply(chunk("orphan fragment"));

    assert_eq!(state.turns.len(), 1);
    assert_eq!(state.turns[0].content, "Reverse a linked list.");
    assert!(!state.streaming);
}

#[test]
fn test_second_message_start_while_streaming_is_dropped() {
    let mut state = algorithm_state();

    state.apply(ServerEvent::MessageStart);
    state.apply(chunk("partial"));
    state.apply(ServerEvent::MessageStart);

    // Still exactly one in-progress assistant turn.
    assert_eq!(state.turns.len(), 2);
    assert_eq!(state.turns[1].content, "partial");
    assert!(state.streaming);
}

#[test]
fn test_error_during_streaming_keeps_transcript() {
    let mut state = algorithm_state();

    state.apply(ServerEvent::MessageStart);
    state.apply(chunk("half a thou"));
    let before = state.turns.clone();

    state.apply(ServerEvent::Error {
        message: "upstream timeout".to_string(),
    });

    assert!(!state.streaming);
    assert_eq!(state.phase, Phase::AwaitingTurn);
    assert_eq!(state.turns, before);
    assert_eq!(state.last_error.as_deref(), Some("upstream timeout"));
}

#[test]
fn test_unknown_event_is_a_no_op() {
    let mut state = algorithm_state();
    let before = state.clone();

    state.apply(ServerEvent::Unknown);

    assert_eq!(state, before);
}

#[test]
fn test_no_events_apply_after_end() {
    let mut state = algorithm_state();

    state.apply(ServerEvent::MessageStart);
    state.apply(ServerEvent::MessageComplete {
        content: "Done.".to_string(),
        completed: true,
        stage: None,
    });
    let before = state.clone();

    state.apply(ServerEvent::MessageStart);
    state.apply(chunk("late"));
    state.apply(ServerEvent::Error {
        message: "late error".to_string(),
    });

    assert_eq!(state, before);
}

#[test]
fn test_submission_gating() {
    let mut state = algorithm_state();

    assert!(state.can_submit("two pointers approach"));
    assert!(!state.can_submit(""));
    assert!(!state.can_submit("   \n\t"));

    state.apply(ServerEvent::MessageStart);
    assert!(!state.can_submit("two pointers approach"));

    state.apply(complete("ok"));
    assert!(state.can_submit("two pointers approach"));
}

#[test]
fn test_score_is_set_at_most_once() {
    let mut state = algorithm_state();

    let first: Score = Score::from_value(
        SessionKind::Algorithm,
        serde_json::json!({
            "algorithm": 8, "code_quality": 7, "complexity": 6, "edge_cases": 7,
            "communication": 8, "overall": 7,
            "feedback": "solid", "improvements": ["discuss tradeoffs"]
        }),
    )
    .unwrap();
    let second: Score = Score::from_value(
        SessionKind::Algorithm,
        serde_json::json!({
            "algorithm": 1, "code_quality": 1, "complexity": 1, "edge_cases": 1,
            "communication": 1, "overall": 1,
            "feedback": "different", "improvements": []
        }),
    )
    .unwrap();

    assert!(state.set_score(first.clone()));
    assert_eq!(state.phase, Phase::Ended);

    assert!(!state.set_score(second));
    assert_eq!(state.score, Some(first));
}

#[test]
fn test_session_complete_stores_workplace_score() {
    let mut state = SessionState::new("sess-3", SessionKind::Workplace, "You join a new team.");

    state.apply(ServerEvent::SessionComplete {
        evaluation: serde_json::json!({
            "technical_depth": 7, "business_understanding": 8,
            "communication": 9, "logical_thinking": 7, "overall": 8,
            "feedback": "clear and pragmatic",
            "strengths": ["stakeholder empathy"],
            "improvements": ["quantify impact"]
        }),
    });

    assert_eq!(state.phase, Phase::Ended);
    let score = state.score.expect("score should be stored");
    assert_eq!(score.overall(), 8);
    assert_eq!(score.feedback(), "clear and pragmatic");
}

#[test]
fn test_transport_loss_degrades_to_awaiting_turn() {
    let mut state = algorithm_state();

    state.apply(ServerEvent::MessageStart);
    state.apply(chunk("partial answer"));
    state.transport_lost();

    assert!(!state.streaming);
    assert_eq!(state.phase, Phase::AwaitingTurn);
    // The partial turn stays in the transcript as-is.
    assert_eq!(state.turns[1].content, "partial answer");

    // Outside of streaming it changes nothing.
    let before = state.clone();
    state.transport_lost();
    assert_eq!(state, before);
}
