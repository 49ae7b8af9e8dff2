pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod socket;

pub use api::{ApiClient, Difficulty, Scenario, WorkplaceScenario};
pub use client::InterviewClient;
pub use config::Config;
pub use error::{ClientError, Result};
pub use session::{
    InterviewSession, Phase, Role, Score, SessionKind, SessionSeed, SessionState, Turn,
};
pub use socket::{ServerEvent, SocketTransport, TurnMessage, WebSocketTransport};
