use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ids::{CandidateId, RequirementId, StageId};

/// Lifecycle state of one hiring stage.
///
/// Conventional flow is `PENDING -> IN_PROGRESS -> COMPLETED`, with `REJECTED`
/// reachable from any non-terminal state. The backend does not enforce this
/// and neither does the client: [`StageStatus::is_conventional_transition`]
/// is only used to flag unusual moves in the logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Rejected,
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown stage status '{0}' (expected PENDING, IN_PROGRESS, COMPLETED or REJECTED)")]
pub struct ParseStageStatusError(pub String);

impl StageStatus {
    pub const ALL: [StageStatus; 4] = [
        StageStatus::Pending,
        StageStatus::InProgress,
        StageStatus::Completed,
        StageStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Pending => "PENDING",
            StageStatus::InProgress => "IN_PROGRESS",
            StageStatus::Completed => "COMPLETED",
            StageStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, StageStatus::Completed | StageStatus::Rejected)
    }

    /// True when moving `self -> to` follows the usual pipeline direction.
    pub fn is_conventional_transition(self, to: StageStatus) -> bool {
        if self == to {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        to == StageStatus::Rejected || to.rank() > self.rank()
    }

    fn rank(self) -> u8 {
        match self {
            StageStatus::Pending => 0,
            StageStatus::InProgress => 1,
            StageStatus::Completed | StageStatus::Rejected => 2,
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageStatus {
    type Err = ParseStageStatusError;

    /// Accepts `in_progress`, `In Progress`, `in-progress` and friends.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        StageStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseStageStatusError(s.to_string()))
    }
}

/// One step of a requirement's hiring pipeline, as seen for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub stage_id: StageId,
    pub stage_name: String,
    #[serde(default)]
    pub status: StageStatus,
    #[serde(default)]
    pub decision: Option<String>,
}

/// Body of `POST /api/update-stage-status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageUpdate {
    pub candidate_id: CandidateId,
    pub requirement_id: RequirementId,
    pub stage_id: StageId,
    pub status: StageStatus,
    pub decision: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&StageStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let parsed: StageStatus = serde_json::from_str("\"REJECTED\"").unwrap();
        assert_eq!(parsed, StageStatus::Rejected);
        assert!(serde_json::from_str::<StageStatus>("\"DONE\"").is_err());
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_separators() {
        assert_eq!("in progress".parse::<StageStatus>(), Ok(StageStatus::InProgress));
        assert_eq!("In-Progress".parse::<StageStatus>(), Ok(StageStatus::InProgress));
        assert_eq!("completed".parse::<StageStatus>(), Ok(StageStatus::Completed));
        assert!("finished".parse::<StageStatus>().is_err());
    }

    #[test]
    fn test_new_stage_defaults_to_pending() {
        let stage: Stage =
            serde_json::from_str(r#"{"stage_id": 1, "stage_name": "HR Round"}"#).unwrap();
        assert_eq!(stage.status, StageStatus::Pending);
        assert_eq!(stage.decision, None);
    }

    #[test]
    fn test_conventional_transitions() {
        use StageStatus::*;
        assert!(Pending.is_conventional_transition(InProgress));
        assert!(Pending.is_conventional_transition(Completed));
        assert!(InProgress.is_conventional_transition(Rejected));
        assert!(!InProgress.is_conventional_transition(Pending));
        assert!(!Completed.is_conventional_transition(Pending));
        assert!(!Rejected.is_conventional_transition(Completed));
        assert!(Completed.is_conventional_transition(Completed));
    }

    #[test]
    fn test_update_body_shape() {
        let update = StageUpdate {
            candidate_id: 42.into(),
            requirement_id: 7.into(),
            stage_id: 2.into(),
            status: StageStatus::Completed,
            decision: Some("Passed".to_string()),
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "candidate_id": 42,
                "requirement_id": 7,
                "stage_id": 2,
                "status": "COMPLETED",
                "decision": "Passed"
            })
        );
    }
}
