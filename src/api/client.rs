use reqwest::RequestBuilder;
use tracing::info;

use super::types::*;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::session::{Score, SessionKind};

/// Typed client for the interview service's REST endpoints.
///
/// When a bearer token is present, calls are routed to the authenticated
/// endpoint family (`/api/<kind>/v2/...`) and the token also rides the
/// socket URL as a query parameter; without a token the anonymous family
/// (`/api/<kind>/...`) is used. That selection happens here so the session
/// client never has to know about it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    ws_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, ws_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: trim_base(base_url.into()),
            ws_url: trim_base(ws_url.into()),
            token: None,
        }
    }

    /// Build a client from configuration, honoring the request timeout.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.api.timeout_secs))
            .build()?;

        let mut client = Self {
            http,
            base_url: trim_base(cfg.api.base_url.clone()),
            ws_url: trim_base(cfg.api.ws_url.clone()),
            token: None,
        };
        if let Some(token) = cfg.auth.token.clone().filter(|t| !t.is_empty()) {
            client = client.with_token(token);
        }
        Ok(client)
    }

    /// Attach a bearer token, switching to the authenticated endpoints.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // ========================================================================
    // Session creation
    // ========================================================================

    pub async fn start_algorithm(&self, difficulty: Difficulty) -> Result<AlgorithmStarted> {
        info!("Starting algorithm interview ({difficulty})");

        let url = self.interview_url(SessionKind::Algorithm, "interview");
        let resp = self
            .authorize(self.http.post(&url))
            .json(&StartAlgorithmRequest { difficulty })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ClientError::Creation(error_detail(resp).await));
        }
        Ok(resp.json().await?)
    }

    pub async fn start_system_design(&self, scenario: &str) -> Result<SystemDesignStarted> {
        info!("Starting system-design interview (scenario={scenario})");

        let url = self.interview_url(SessionKind::SystemDesign, "interview");
        let resp = self
            .authorize(self.http.post(&url))
            .json(&StartScenarioRequest {
                scenario: scenario.to_string(),
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ClientError::Creation(error_detail(resp).await));
        }
        Ok(resp.json().await?)
    }

    pub async fn start_workplace(&self, scenario: &str) -> Result<WorkplaceStarted> {
        info!("Starting workplace interview (scenario={scenario})");

        let url = self.interview_url(SessionKind::Workplace, "interview");
        let resp = self
            .authorize(self.http.post(&url))
            .json(&StartScenarioRequest {
                scenario: scenario.to_string(),
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ClientError::Creation(error_detail(resp).await));
        }
        Ok(resp.json().await?)
    }

    // ========================================================================
    // Session termination / scoring
    // ========================================================================

    /// Request termination and scoring for a session.
    pub async fn end_session(&self, kind: SessionKind, session_id: &str) -> Result<Score> {
        info!("Ending {} session {}", kind.as_path(), session_id);

        let url = self.interview_url(kind, &format!("{session_id}/end"));
        let resp = self.authorize(self.http.post(&url)).send().await?;

        if !resp.status().is_success() {
            return Err(ClientError::Termination(error_detail(resp).await));
        }

        let value: serde_json::Value = resp.json().await?;
        Score::from_value(kind, value)
    }

    /// Socket URL for a session, with the token as a query parameter when
    /// running authenticated.
    pub fn socket_url(&self, kind: SessionKind, session_id: &str) -> String {
        let path = kind.as_path();
        match &self.token {
            Some(token) => format!(
                "{}/api/{}/v2/{}/ws?token={}",
                self.ws_url, path, session_id, token
            ),
            None => format!("{}/api/{}/{}/ws", self.ws_url, path, session_id),
        }
    }

    // ========================================================================
    // Scenario catalogs
    // ========================================================================

    pub async fn system_design_scenarios(&self) -> Result<Vec<Scenario>> {
        let url = self.interview_url(SessionKind::SystemDesign, "scenarios");
        let resp = self.authorize(self.http.get(&url)).send().await?;
        self.expect_ok(resp, "system-design/scenarios").await
    }

    pub async fn workplace_scenarios(&self) -> Result<Vec<WorkplaceScenario>> {
        let url = self.interview_url(SessionKind::Workplace, "scenarios");
        let resp = self.authorize(self.http.get(&url)).send().await?;
        let list: ScenarioList = self.expect_ok(resp, "workplace/scenarios").await?;
        Ok(list.scenarios)
    }

    // ========================================================================
    // Auth
    // ========================================================================

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<TokenResponse> {
        let url = format!("{}/api/auth/register", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
                name: name.to_string(),
            })
            .send()
            .await?;
        self.expect_ok(resp, "auth/register").await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let url = format!("{}/api/auth/login", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        self.expect_ok(resp, "auth/login").await
    }

    pub async fn current_user(&self) -> Result<UserProfile> {
        let url = format!("{}/api/auth/me", self.base_url);
        let resp = self.authorize(self.http.get(&url)).send().await?;
        self.expect_ok(resp, "auth/me").await
    }

    // ========================================================================
    // Training history
    // ========================================================================

    pub async fn history(
        &self,
        skip: usize,
        limit: usize,
        kind: Option<SessionKind>,
    ) -> Result<HistoryList> {
        let mut url = format!("{}/api/history?skip={}&limit={}", self.base_url, skip, limit);
        if let Some(kind) = kind {
            url.push_str("&type=");
            url.push_str(kind.as_str());
        }
        let resp = self.authorize(self.http.get(&url)).send().await?;
        self.expect_ok(resp, "history").await
    }

    pub async fn session_detail(&self, session_id: &str) -> Result<SessionDetail> {
        let url = format!("{}/api/history/{}", self.base_url, session_id);
        let resp = self.authorize(self.http.get(&url)).send().await?;
        self.expect_ok(resp, "history/detail").await
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = format!("{}/api/history/{}", self.base_url, session_id);
        let resp = self.authorize(self.http.delete(&url)).send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Api {
                endpoint: "history/delete".to_string(),
                detail: error_detail(resp).await,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// REST URL for an interview endpoint, picking the endpoint family by
    /// token presence.
    fn interview_url(&self, kind: SessionKind, tail: &str) -> String {
        let path = kind.as_path();
        match &self.token {
            Some(_) => format!("{}/api/{}/v2/{}", self.base_url, path, tail),
            None => format!("{}/api/{}/{}", self.base_url, path, tail),
        }
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn expect_ok<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        endpoint: &str,
    ) -> Result<T> {
        if !resp.status().is_success() {
            return Err(ClientError::Api {
                endpoint: endpoint.to_string(),
                detail: error_detail(resp).await,
            });
        }
        Ok(resp.json().await?)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Pull the service's `detail` message out of an error response, falling
/// back to the bare status when the body isn't the expected shape.
async fn error_detail(resp: reqwest::Response) -> String {
    let status = resp.status();
    match resp.json::<ErrorBody>().await {
        Ok(body) => format!("{status}: {}", body.detail),
        Err(_) => status.to_string(),
    }
}
