use serde::{Deserialize, Serialize};

use crate::models::ids::{CandidateId, RequirementId};

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningRequest {
    pub candidate_id: CandidateId,
    pub requirement_id: RequirementId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Shortlisted,
    Hold,
    Rejected,
    #[serde(other)]
    Other,
}

/// Outcome of an automated screening run. Scoring itself happens server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    /// 0 – 100
    pub score: f64,
    pub recommend: Recommendation,
    #[serde(default)]
    pub rationale: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
}
