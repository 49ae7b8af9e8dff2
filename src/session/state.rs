use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::score::Score;
use crate::socket::ServerEvent;

/// The three interview formats offered by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Algorithm,
    SystemDesign,
    Workplace,
}

impl SessionKind {
    /// URL path segment used by the REST and socket endpoint families.
    pub fn as_path(&self) -> &'static str {
        match self {
            SessionKind::Algorithm => "algorithm",
            SessionKind::SystemDesign => "system-design",
            SessionKind::Workplace => "workplace",
        }
    }

    /// Wire name used in JSON payloads and query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Algorithm => "algorithm",
            SessionKind::SystemDesign => "system_design",
            SessionKind::Workplace => "workplace",
        }
    }
}

/// Author of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Lifecycle phase of a session.
///
/// `AwaitingTurn` and `Streaming` alternate while the interview runs;
/// `Ended` is terminal and no further events or submissions are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingTurn,
    Streaming,
    Ended,
}

/// Transcript and streaming state of one interview attempt.
///
/// This is the reducer the socket events are applied to. It lives only in
/// memory: all mutation happens through [`SessionState::apply`] (server
/// events) and the two local operations (pushing a user turn, attaching the
/// final score). It never talks to a transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: String,
    pub kind: SessionKind,
    pub turns: Vec<Turn>,
    /// True exactly while an assistant turn is streaming in.
    pub streaming: bool,
    /// Server-assigned progress label (system-design sessions).
    pub stage: Option<String>,
    /// Final evaluation; set at most once.
    pub score: Option<Score>,
    pub phase: Phase,
    /// Most recent server-reported error, for display.
    pub last_error: Option<String>,
}

impl SessionState {
    /// Seed a fresh session with the server's opening prompt as the sole
    /// assistant turn, ready for operator input.
    pub fn new(
        session_id: impl Into<String>,
        kind: SessionKind,
        opening_prompt: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            kind,
            turns: vec![Turn::now(Role::Assistant, opening_prompt)],
            streaming: false,
            stage: None,
            score: None,
            phase: Phase::AwaitingTurn,
            last_error: None,
        }
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Apply one server-pushed event.
    ///
    /// Events arriving after the session ended are dropped. Events whose
    /// precondition does not hold (e.g. a chunk with no turn in progress)
    /// are dropped with a warning rather than corrupting the transcript.
    pub fn apply(&mut self, event: ServerEvent) {
        if self.phase == Phase::Ended {
            debug!(session_id = %self.session_id, "ignoring event after session end");
            return;
        }

        match event {
            ServerEvent::MessageStart => {
                if self.streaming {
                    warn!(
                        session_id = %self.session_id,
                        "message_start while a turn is already streaming, ignoring"
                    );
                    return;
                }
                self.turns.push(Turn::now(Role::Assistant, ""));
                self.streaming = true;
                self.phase = Phase::Streaming;
            }

            ServerEvent::MessageChunk { content } => {
                match self.streaming_turn() {
                    Some(turn) => turn.content.push_str(&content),
                    None => warn!(
                        session_id = %self.session_id,
                        "message_chunk with no assistant turn in progress, ignoring"
                    ),
                }
            }

            ServerEvent::MessageComplete {
                content,
                completed,
                stage,
            } => {
                match self.streaming_turn() {
                    // The full content is authoritative over accumulated chunks.
                    Some(turn) => turn.content = content,
                    None => warn!(
                        session_id = %self.session_id,
                        "message_complete with no assistant turn in progress, ignoring content"
                    ),
                }
                self.streaming = false;
                if let Some(stage) = stage {
                    self.stage = Some(stage);
                }
                self.phase = if completed {
                    Phase::Ended
                } else {
                    Phase::AwaitingTurn
                };
            }

            ServerEvent::Error { message } => {
                warn!(session_id = %self.session_id, error = %message, "server reported an error");
                self.streaming = false;
                self.last_error = Some(message);
                if self.phase == Phase::Streaming {
                    self.phase = Phase::AwaitingTurn;
                }
            }

            ServerEvent::Evaluating => {
                debug!(session_id = %self.session_id, "server is evaluating the session");
            }

            ServerEvent::SessionComplete { evaluation } => {
                match Score::from_value(self.kind, evaluation) {
                    Ok(score) => {
                        self.set_score(score);
                    }
                    Err(e) => {
                        warn!(session_id = %self.session_id, "undecodable evaluation payload: {e}");
                    }
                }
                self.streaming = false;
                self.phase = Phase::Ended;
            }

            // Forward-compatible: tags we don't know yet are a no-op.
            ServerEvent::Unknown => {
                debug!(session_id = %self.session_id, "ignoring unrecognized event tag");
            }
        }
    }

    /// Whether a local turn with this text would currently be accepted.
    pub fn can_submit(&self, text: &str) -> bool {
        self.phase == Phase::AwaitingTurn && !self.streaming && !text.trim().is_empty()
    }

    /// Append a user turn. Callers must gate on [`SessionState::can_submit`].
    pub fn push_user_turn(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::now(Role::User, content));
    }

    /// Attach the final evaluation. Returns false (and changes nothing) if a
    /// score was already stored; the first score wins for the session's
    /// lifetime.
    pub fn set_score(&mut self, score: Score) -> bool {
        if self.score.is_some() {
            warn!(session_id = %self.session_id, "score already set, keeping the existing one");
            return false;
        }
        self.score = Some(score);
        self.phase = Phase::Ended;
        true
    }

    /// The transport dropped mid-stream: degrade to awaiting input so the
    /// operator can decide what to do. No reconnect is attempted.
    pub fn transport_lost(&mut self) {
        if self.phase == Phase::Streaming {
            warn!(session_id = %self.session_id, "transport lost while streaming");
            self.streaming = false;
            self.phase = Phase::AwaitingTurn;
        }
    }

    fn streaming_turn(&mut self) -> Option<&mut Turn> {
        if !self.streaming {
            return None;
        }
        self.turns
            .last_mut()
            .filter(|turn| turn.role == Role::Assistant)
    }
}
