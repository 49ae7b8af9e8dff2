//! Typed REST client for the interview service:
//! - POST /api/<kind>/interview - Start a session
//! - POST /api/<kind>/:id/end - End a session and fetch the score
//! - GET /api/<kind>/scenarios - Scenario catalogs
//! - POST /api/auth/register, /api/auth/login, GET /api/auth/me - Auth
//! - GET /api/history - Past training sessions
//!
//! With a bearer token, the `/v2` authenticated endpoint family is used
//! instead.

mod client;
mod types;

pub use client::ApiClient;
pub use types::{
    AlgorithmStarted, Difficulty, HistoryEntry, HistoryList, HistoryTurn, Scenario, SessionDetail,
    SessionStatus, SystemDesignStarted, TokenResponse, UserProfile, WorkplaceScenario,
    WorkplaceStarted,
};
