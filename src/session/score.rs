use serde::{Deserialize, Serialize};

use super::state::SessionKind;
use crate::error::Result;

/// Evaluation for an algorithm interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmScore {
    pub algorithm: u8,
    pub code_quality: u8,
    pub complexity: u8,
    pub edge_cases: u8,
    pub communication: u8,
    pub overall: u8,
    pub feedback: String,
    pub improvements: Vec<String>,
}

/// Evaluation for a system-design interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemDesignScore {
    pub requirements: u8,
    pub architecture: u8,
    pub tech_stack: u8,
    pub scalability: u8,
    pub availability: u8,
    pub consistency: u8,
    pub overall: u8,
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// Evaluation for a workplace-scenario interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkplaceScore {
    pub technical_depth: u8,
    pub business_understanding: u8,
    pub communication: u8,
    pub logical_thinking: u8,
    pub overall: u8,
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// Final evaluation of a session. Set at most once, never mutated after.
///
/// The dimension set differs per interview kind, so the record is a sum
/// type matched against the session's kind when the server's evaluation
/// payload is decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    SystemDesign(SystemDesignScore),
    Workplace(WorkplaceScore),
    Algorithm(AlgorithmScore),
}

impl Score {
    /// Decode an evaluation payload according to the session kind.
    pub fn from_value(kind: SessionKind, value: serde_json::Value) -> Result<Self> {
        let score = match kind {
            SessionKind::Algorithm => Score::Algorithm(serde_json::from_value(value)?),
            SessionKind::SystemDesign => Score::SystemDesign(serde_json::from_value(value)?),
            SessionKind::Workplace => Score::Workplace(serde_json::from_value(value)?),
        };
        Ok(score)
    }

    pub fn overall(&self) -> u8 {
        match self {
            Score::Algorithm(s) => s.overall,
            Score::SystemDesign(s) => s.overall,
            Score::Workplace(s) => s.overall,
        }
    }

    pub fn feedback(&self) -> &str {
        match self {
            Score::Algorithm(s) => &s.feedback,
            Score::SystemDesign(s) => &s.feedback,
            Score::Workplace(s) => &s.feedback,
        }
    }

    pub fn improvements(&self) -> &[String] {
        match self {
            Score::Algorithm(s) => &s.improvements,
            Score::SystemDesign(s) => &s.improvements,
            Score::Workplace(s) => &s.improvements,
        }
    }
}
