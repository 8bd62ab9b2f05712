use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::api_client::TrackerBackend;
use crate::errors::TrackerError;
use crate::models::{CandidateId, RequirementId, Stage, StageId, StageStatus, TrackerRecord};

/// Proof that a load was requested. Only the most recently issued ticket can
/// write into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    candidate_id: CandidateId,
    generation: u64,
}

impl LoadTicket {
    pub fn candidate_id(&self) -> &CandidateId {
        &self.candidate_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { records: usize },
    /// A newer load was issued after this one; the response was dropped.
    Stale,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Loading,
    Ready {
        records: Vec<TrackerRecord>,
        loaded_at: DateTime<Utc>,
    },
    Failed {
        message: String,
    },
}

/// What the presentation layer should draw.
#[derive(Debug, PartialEq)]
pub enum TrackerView<'a> {
    NoCandidate,
    Loading {
        candidate_id: &'a CandidateId,
    },
    /// Loaded, zero records: the candidate has not been screened yet.
    NoActiveTracking {
        candidate_id: &'a CandidateId,
    },
    Tracking {
        candidate_id: &'a CandidateId,
        records: &'a [TrackerRecord],
        loaded_at: DateTime<Utc>,
    },
    Error {
        candidate_id: &'a CandidateId,
        message: &'a str,
    },
}

type StageKey = (RequirementId, StageId);

/// Server-confirmed tracker for one candidate at a time, plus any optimistic
/// edits made since the last accepted load.
#[derive(Debug)]
pub struct TrackerStore {
    candidate_id: Option<CandidateId>,
    generation: u64,
    phase: Phase,
    /// Optimistically edited stages, mapped to their last confirmed value.
    unconfirmed: HashMap<StageKey, Stage>,
}

impl Default for TrackerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerStore {
    pub fn new() -> Self {
        Self {
            candidate_id: None,
            generation: 0,
            phase: Phase::Idle,
            unconfirmed: HashMap::new(),
        }
    }

    pub fn current_candidate(&self) -> Option<&CandidateId> {
        self.candidate_id.as_ref()
    }

    /// Switches the store to `candidate_id` and drops everything held for the
    /// previous one before any request is made.
    pub fn begin_load(&mut self, candidate_id: CandidateId) -> LoadTicket {
        if self.candidate_id.as_ref() != Some(&candidate_id) {
            debug!("Tracker switching to candidate {candidate_id}");
        }
        self.generation += 1;
        self.candidate_id = Some(candidate_id.clone());
        self.phase = Phase::Loading;
        self.unconfirmed.clear();
        LoadTicket {
            candidate_id,
            generation: self.generation,
        }
    }

    /// Issues a ticket that resynchronises `candidate_id` without blanking the
    /// records already shown. Returns `None` if the store has moved on to a
    /// different candidate.
    pub fn begin_refresh(&mut self, candidate_id: &CandidateId) -> Option<LoadTicket> {
        if self.candidate_id.as_ref() != Some(candidate_id) {
            return None;
        }
        self.generation += 1;
        if !matches!(self.phase, Phase::Ready { .. }) {
            self.phase = Phase::Loading;
        }
        Some(LoadTicket {
            candidate_id: candidate_id.clone(),
            generation: self.generation,
        })
    }

    pub fn is_stale(&self, ticket: &LoadTicket) -> bool {
        ticket.generation != self.generation
            || self.candidate_id.as_ref() != Some(&ticket.candidate_id)
    }

    /// Applies a fetch result if `ticket` is still current. Success replaces
    /// all records and confirms every optimistic edit; failure leaves an
    /// explicit error state with no records.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Vec<TrackerRecord>, TrackerError>,
    ) -> Result<LoadOutcome, TrackerError> {
        if self.is_stale(ticket) {
            debug!(
                "Discarding stale tracker response for candidate {} (generation {}, current {})",
                ticket.candidate_id, ticket.generation, self.generation
            );
            return Ok(LoadOutcome::Stale);
        }

        self.unconfirmed.clear();
        match result {
            Ok(records) => {
                let count = records.len();
                info!(
                    "Tracker loaded for candidate {}: {} record(s)",
                    ticket.candidate_id, count
                );
                self.phase = Phase::Ready {
                    records,
                    loaded_at: Utc::now(),
                };
                Ok(LoadOutcome::Applied { records: count })
            }
            Err(e) => {
                warn!("Tracker load failed for candidate {}: {e}", ticket.candidate_id);
                self.phase = Phase::Failed {
                    message: e.notice().message,
                };
                Err(e)
            }
        }
    }

    /// Loads `candidate_id` in one step. Callers that must stay responsive
    /// while the request is in flight use `begin_load`/`finish_load` instead.
    pub async fn load(
        &mut self,
        candidate_id: CandidateId,
        backend: &dyn TrackerBackend,
    ) -> Result<&[TrackerRecord], TrackerError> {
        let ticket = self.begin_load(candidate_id);
        let result = backend
            .fetch_tracker(ticket.candidate_id())
            .await
            .map_err(|e| not_found_on_404(e, ticket.candidate_id()));
        self.finish_load(&ticket, result)?;
        Ok(self.records())
    }

    /// Records currently shown; empty unless a load has succeeded.
    pub fn records(&self) -> &[TrackerRecord] {
        match &self.phase {
            Phase::Ready { records, .. } => records,
            _ => &[],
        }
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        match &self.phase {
            Phase::Ready { loaded_at, .. } => Some(*loaded_at),
            _ => None,
        }
    }

    pub fn record(&self, requirement_id: &RequirementId) -> Option<&TrackerRecord> {
        self.records()
            .iter()
            .find(|r| &r.requirement.id == requirement_id)
    }

    pub fn get_stage(
        &self,
        requirement_id: &RequirementId,
        stage_id: &StageId,
    ) -> Result<&Stage, TrackerError> {
        self.record(requirement_id)
            .and_then(|r| r.stage(stage_id))
            .ok_or_else(|| not_in_store(requirement_id, stage_id))
    }

    /// Optimistic local edit. Visible immediately; unconfirmed until the next
    /// accepted load.
    pub fn apply_stage_update(
        &mut self,
        requirement_id: &RequirementId,
        stage_id: &StageId,
        status: StageStatus,
        decision: Option<String>,
    ) -> Result<(), TrackerError> {
        let Phase::Ready { records, .. } = &mut self.phase else {
            return Err(not_in_store(requirement_id, stage_id));
        };
        let stage = records
            .iter_mut()
            .find(|r| &r.requirement.id == requirement_id)
            .and_then(|r| r.stage_mut(stage_id))
            .ok_or_else(|| not_in_store(requirement_id, stage_id))?;

        if !stage.status.is_conventional_transition(status) {
            warn!(
                "Unusual stage transition {} -> {} (requirement {}, stage {})",
                stage.status, status, requirement_id, stage_id
            );
        }

        self.unconfirmed
            .entry((requirement_id.clone(), stage_id.clone()))
            .or_insert_with(|| stage.clone());
        stage.status = status;
        stage.decision = decision;
        Ok(())
    }

    pub fn is_confirmed(&self, requirement_id: &RequirementId, stage_id: &StageId) -> bool {
        !self
            .unconfirmed
            .contains_key(&(requirement_id.clone(), stage_id.clone()))
    }

    pub fn has_unconfirmed(&self) -> bool {
        !self.unconfirmed.is_empty()
    }

    /// Restores the last confirmed value of an optimistically edited stage.
    /// Returns false when there was nothing to roll back.
    pub fn rollback_stage(&mut self, requirement_id: &RequirementId, stage_id: &StageId) -> bool {
        let key = (requirement_id.clone(), stage_id.clone());
        let Some(confirmed) = self.unconfirmed.remove(&key) else {
            return false;
        };
        let Phase::Ready { records, .. } = &mut self.phase else {
            return false;
        };
        match records
            .iter_mut()
            .find(|r| &r.requirement.id == requirement_id)
            .and_then(|r| r.stage_mut(stage_id))
        {
            Some(stage) => {
                *stage = confirmed;
                true
            }
            None => false,
        }
    }

    pub fn view(&self) -> TrackerView<'_> {
        let Some(candidate_id) = self.candidate_id.as_ref() else {
            return TrackerView::NoCandidate;
        };
        match &self.phase {
            Phase::Idle => TrackerView::NoCandidate,
            Phase::Loading => TrackerView::Loading { candidate_id },
            Phase::Ready { records, .. } if records.is_empty() => {
                TrackerView::NoActiveTracking { candidate_id }
            }
            Phase::Ready { records, loaded_at } => TrackerView::Tracking {
                candidate_id,
                records,
                loaded_at: *loaded_at,
            },
            Phase::Failed { message } => TrackerView::Error {
                candidate_id,
                message,
            },
        }
    }
}

fn not_in_store(requirement_id: &RequirementId, stage_id: &StageId) -> TrackerError {
    TrackerError::NotFoundInStore {
        requirement_id: requirement_id.clone(),
        stage_id: stage_id.clone(),
    }
}

/// A 404 on the tracker endpoint means the candidate itself does not exist.
pub(crate) fn not_found_on_404(e: TrackerError, candidate_id: &CandidateId) -> TrackerError {
    match e {
        TrackerError::BadResponse { status: 404, .. } => {
            TrackerError::NotFound(candidate_id.clone())
        }
        other => other,
    }
}
