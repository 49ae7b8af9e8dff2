use std::sync::Arc;

use tracing::info;

use crate::api::{ApiClient, Difficulty};
use crate::error::{ClientError, Result};
use crate::session::{InterviewSession, Score, SessionKind, SessionSeed};
use crate::socket::WebSocketTransport;

/// Top-level interview controller.
///
/// Owns the single "current session" slot: at most one live
/// [`InterviewSession`] exists at a time, and starting a new one disposes
/// of the previous one first. Views hold the `Arc` handle this hands out;
/// lifecycle (start, end, dispose) goes through here.
pub struct InterviewClient {
    api: ApiClient,
    current: Option<Arc<InterviewSession>>,
}

impl InterviewClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api, current: None }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The live session, if any.
    pub fn session(&self) -> Option<Arc<InterviewSession>> {
        self.current.clone()
    }

    /// Start an algorithm interview at the given difficulty.
    pub async fn start_algorithm(&mut self, difficulty: Difficulty) -> Result<Arc<InterviewSession>> {
        self.dispose().await;

        let started = self.api.start_algorithm(difficulty).await?;
        self.connect(SessionSeed {
            session_id: started.session_id,
            kind: SessionKind::Algorithm,
            opening_prompt: started.question,
            stage: None,
        })
        .await
    }

    /// Start a system-design interview for a scenario. The session begins
    /// in the requirements stage; the server advances it from there.
    pub async fn start_system_design(&mut self, scenario: &str) -> Result<Arc<InterviewSession>> {
        self.dispose().await;

        let started = self.api.start_system_design(scenario).await?;
        self.connect(SessionSeed {
            session_id: started.session_id,
            kind: SessionKind::SystemDesign,
            opening_prompt: started.requirements,
            stage: Some("requirements".to_string()),
        })
        .await
    }

    /// Start a workplace-scenario interview.
    pub async fn start_workplace(&mut self, scenario: &str) -> Result<Arc<InterviewSession>> {
        self.dispose().await;

        let started = self.api.start_workplace(scenario).await?;
        self.connect(SessionSeed {
            session_id: started.session_id,
            kind: SessionKind::Workplace,
            opening_prompt: started.question,
            stage: None,
        })
        .await
    }

    /// End the current session and fetch its evaluation.
    ///
    /// Workplace sessions terminate over the socket with the distinguished
    /// end frame; the other kinds use the REST end endpoint. Either way the
    /// score is stored on the session exactly once, and calling this again
    /// afterwards returns the stored score unchanged.
    pub async fn end(&self) -> Result<Score> {
        let session = self
            .current
            .as_ref()
            .ok_or_else(|| ClientError::Termination("no active session".to_string()))?;

        match session.kind() {
            SessionKind::Workplace => session.end_via_socket().await,
            _ => {
                if let Some(score) = session.score().await {
                    return Ok(score);
                }
                let score = self
                    .api
                    .end_session(session.kind(), session.session_id())
                    .await?;
                Ok(session.finish_with(score).await)
            }
        }
    }

    /// Dispose of the current session, if any. Idempotent.
    pub async fn dispose(&mut self) {
        if let Some(session) = self.current.take() {
            session.dispose().await;
        }
    }

    async fn connect(&mut self, seed: SessionSeed) -> Result<Arc<InterviewSession>> {
        let url = self.api.socket_url(seed.kind, &seed.session_id);
        let transport = Box::new(WebSocketTransport::new(url));

        let session = Arc::new(InterviewSession::open(seed, transport).await?);
        info!("Session {} is live", session.session_id());

        self.current = Some(Arc::clone(&session));
        Ok(session)
    }
}
