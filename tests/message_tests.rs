use mockmate::socket::messages::{ServerEvent, TurnMessage};

#[test]
fn test_message_start_deserialization() {
    let event: ServerEvent = serde_json::from_str(r#"{"type": "message_start"}"#).unwrap();
    assert_eq!(event, ServerEvent::MessageStart);

    // Extra fields on the frame are tolerated.
    let event: ServerEvent =
        serde_json::from_str(r#"{"type": "message_start", "role": "assistant"}"#).unwrap();
    assert_eq!(event, ServerEvent::MessageStart);
}

#[test]
fn test_message_chunk_deserialization() {
    let json = r#"{"type": "message_chunk", "content": "Let's "}"#;
    let event: ServerEvent = serde_json::from_str(json).unwrap();
    assert_eq!(
        event,
        ServerEvent::MessageChunk {
            content: "Let's ".to_string()
        }
    );
}

#[test]
fn test_message_complete_defaults() {
    // `completed` and `stage` are optional on the wire.
    let json = r#"{"type": "message_complete", "content": "done"}"#;
    let event: ServerEvent = serde_json::from_str(json).unwrap();
    assert_eq!(
        event,
        ServerEvent::MessageComplete {
            content: "done".to_string(),
            completed: false,
            stage: None,
        }
    );
}

#[test]
fn test_message_complete_with_stage_and_completion() {
    let json = r#"{
        "type": "message_complete",
        "content": "full reply",
        "completed": true,
        "stage": "architecture"
    }"#;
    let event: ServerEvent = serde_json::from_str(json).unwrap();
    assert_eq!(
        event,
        ServerEvent::MessageComplete {
            content: "full reply".to_string(),
            completed: true,
            stage: Some("architecture".to_string()),
        }
    );
}

#[test]
fn test_error_event_deserialization() {
    let json = r#"{"type": "error", "message": "model overloaded"}"#;
    let event: ServerEvent = serde_json::from_str(json).unwrap();
    assert_eq!(
        event,
        ServerEvent::Error {
            message: "model overloaded".to_string()
        }
    );
}

#[test]
fn test_session_complete_carries_evaluation() {
    let json = r#"{
        "type": "session_complete",
        "evaluation": {"overall": 8, "feedback": "solid"}
    }"#;
    let event: ServerEvent = serde_json::from_str(json).unwrap();
    match event {
        ServerEvent::SessionComplete { evaluation } => {
            assert_eq!(evaluation["overall"], 8);
            assert_eq!(evaluation["feedback"], "solid");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_unrecognized_tag_maps_to_unknown() {
    // Tags added server-side later must not break the client.
    let json = r#"{"type": "typing_indicator", "visible": true}"#;
    let event: ServerEvent = serde_json::from_str(json).unwrap();
    assert_eq!(event, ServerEvent::Unknown);
}

#[test]
fn test_turn_message_omits_absent_code() {
    let turn = TurnMessage::text("two pointers approach");
    let json = serde_json::to_string(&turn).unwrap();
    assert_eq!(json, r#"{"content":"two pointers approach"}"#);
}

#[test]
fn test_turn_message_with_code_attachment() {
    let turn = TurnMessage {
        content: "here is my solution".to_string(),
        code: Some("fn main() {}".to_string()),
    };
    let json = serde_json::to_string(&turn).unwrap();
    assert!(json.contains(r#""content":"here is my solution""#));
    assert!(json.contains(r#""code":"fn main() {}""#));

    let parsed: TurnMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, turn);
}
