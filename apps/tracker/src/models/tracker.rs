use serde::{Deserialize, Serialize};

use crate::models::ids::{RequirementId, StageId};
use crate::models::stage::{Stage, StageStatus};

/// The slice of a requirement the tracker needs for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementSummary {
    pub id: RequirementId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub client_name: Option<String>,
    /// Declared number of interview rounds. Older requirements may not carry one.
    #[serde(default)]
    pub no_of_rounds: Option<u32>,
}

/// One candidate's progress against one requirement. Stage order is pipeline order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerRecord {
    pub requirement: RequirementSummary,
    pub stages: Vec<Stage>,
}

/// Aggregate view over a record's stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerProgress {
    pub completed: usize,
    pub total: usize,
    /// First stage that is neither completed nor rejected.
    pub current_stage: Option<StageId>,
    pub rejected: bool,
    /// Every stage completed.
    pub qualified: bool,
    /// The current stage is the final round.
    pub in_last_round: bool,
}

impl TrackerRecord {
    pub fn stage(&self, stage_id: &StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| &s.stage_id == stage_id)
    }

    pub fn stage_mut(&mut self, stage_id: &StageId) -> Option<&mut Stage> {
        self.stages.iter_mut().find(|s| &s.stage_id == stage_id)
    }

    /// Round count the pipeline is expected to have: the declared count when
    /// present, otherwise the number of stages received.
    pub fn total_rounds(&self) -> usize {
        self.requirement
            .no_of_rounds
            .map(|n| n as usize)
            .unwrap_or(self.stages.len())
    }

    pub fn progress(&self) -> TrackerProgress {
        let completed = self
            .stages
            .iter()
            .filter(|s| s.status == StageStatus::Completed)
            .count();
        let rejected = self
            .stages
            .iter()
            .any(|s| s.status == StageStatus::Rejected);
        let current = self
            .stages
            .iter()
            .position(|s| !s.status.is_terminal());
        let total = self.total_rounds();

        TrackerProgress {
            completed,
            total,
            current_stage: current.map(|i| self.stages[i].stage_id.clone()),
            rejected,
            qualified: total > 0 && completed == total,
            in_last_round: !rejected && current.is_some_and(|i| i + 1 == total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(statuses: &[StageStatus]) -> TrackerRecord {
        TrackerRecord {
            requirement: RequirementSummary {
                id: 7.into(),
                title: "Backend Engineer".to_string(),
                client_name: Some("Acme".to_string()),
                no_of_rounds: Some(statuses.len() as u32),
            },
            stages: statuses
                .iter()
                .enumerate()
                .map(|(i, status)| Stage {
                    stage_id: (i as i64 + 1).into(),
                    stage_name: format!("Round {}", i + 1),
                    status: *status,
                    decision: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_progress_all_pending() {
        let p = record(&[StageStatus::Pending; 3]).progress();
        assert_eq!(p.completed, 0);
        assert_eq!(p.total, 3);
        assert_eq!(p.current_stage, Some(1.into()));
        assert!(!p.qualified);
        assert!(!p.in_last_round);
    }

    #[test]
    fn test_progress_last_round() {
        use StageStatus::*;
        let p = record(&[Completed, Completed, InProgress]).progress();
        assert_eq!(p.completed, 2);
        assert_eq!(p.current_stage, Some(3.into()));
        assert!(p.in_last_round);
        assert!(!p.qualified);
    }

    #[test]
    fn test_progress_qualified_and_rejected() {
        use StageStatus::*;
        let qualified = record(&[Completed, Completed]).progress();
        assert!(qualified.qualified);
        assert_eq!(qualified.current_stage, None);

        let rejected = record(&[Completed, Rejected, Pending]).progress();
        assert!(rejected.rejected);
        assert!(!rejected.qualified);
        assert_eq!(rejected.current_stage, Some(3.into()));
        assert!(!rejected.in_last_round);
    }

    #[test]
    fn test_decode_record_with_missing_round_count() {
        let record: TrackerRecord = serde_json::from_value(serde_json::json!({
            "requirement": {"id": "req-1", "title": "QA"},
            "stages": [{"stage_id": 1, "stage_name": "Screen", "status": "PENDING", "decision": null}]
        }))
        .unwrap();
        assert_eq!(record.requirement.no_of_rounds, None);
        assert_eq!(record.total_rounds(), 1);
    }
}
