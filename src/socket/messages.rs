use serde::{Deserialize, Serialize};

/// Server-pushed event received on the interview socket.
///
/// Frames arrive as JSON objects tagged by a `type` field. Tags the client
/// does not recognize deserialize into `Unknown` and are dropped by the
/// reducer, so the server can add event types without breaking us.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A new assistant turn is about to stream.
    MessageStart,

    /// One fragment of the in-progress assistant turn.
    MessageChunk { content: String },

    /// The assistant turn finished; `content` is the full authoritative text.
    MessageComplete {
        content: String,
        /// Set when the interviewer considers the whole interview over.
        #[serde(default)]
        completed: bool,
        /// Interview stage label (system-design sessions).
        #[serde(default)]
        stage: Option<String>,
    },

    /// Server-side failure while producing a response.
    Error { message: String },

    /// The server is computing the final evaluation (workplace sessions).
    Evaluating,

    /// Terminal event carrying the evaluation after an explicit end request.
    SessionComplete { evaluation: serde_json::Value },

    #[serde(other)]
    Unknown,
}

/// Ordinary client → server turn.
///
/// `code` carries an optional attachment (e.g. a solution snippet) and is
/// omitted from the frame entirely when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl TurnMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            code: None,
        }
    }
}
