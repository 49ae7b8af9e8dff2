use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionKind;

/// Difficulty selector for algorithm interviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

// ============================================================================
// Session creation
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StartAlgorithmRequest {
    pub difficulty: Difficulty,
}

#[derive(Debug, Serialize)]
pub struct StartScenarioRequest {
    pub scenario: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmStarted {
    pub session_id: String,
    /// Opening prompt: the problem statement.
    pub question: String,
    pub difficulty: Difficulty,
}

/// System-design scenario descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDesignStarted {
    pub session_id: String,
    pub scenario: Scenario,
    /// Opening prompt: the requirements briefing.
    pub requirements: String,
}

/// Workplace scenario descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkplaceScenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkplaceStarted {
    pub session_id: String,
    pub scenario: String,
    pub scenario_name: String,
    pub role: String,
    pub description: String,
    /// Opening prompt: the scenario briefing.
    pub question: String,
    /// Evaluation dimensions announced by the server; shape is theirs.
    #[serde(default)]
    pub dimensions: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioList {
    pub scenarios: Vec<WorkplaceScenario>,
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub years_of_experience: Option<u32>,
    pub current_company: Option<String>,
    pub current_role: Option<String>,
    pub target_role: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserProfile,
}

// ============================================================================
// Training history
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub difficulty: Option<String>,
    pub scenario_id: Option<String>,
    pub score: Option<serde_json::Value>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryList {
    pub total: usize,
    pub sessions: Vec<HistoryEntry>,
}

/// Transcript entry as stored server-side (epoch-millis timestamps).
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub content: String,
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub difficulty: Option<String>,
    pub scenario_id: Option<String>,
    pub messages: Vec<HistoryTurn>,
    pub score: Option<serde_json::Value>,
    pub feedback: Option<String>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Error body the service returns on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
