//! Orchestration between the presentation layer, the store and the backend.
//!
//! The controller is the single writer of its [`TrackerStore`]. The store lock
//! is never held across a network call, so several operations can be in
//! flight at once; stale loads are dropped by ticket generation and the most
//! recently issued fetch decides the final state.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::api_client::{Ack, TrackerBackend};
use crate::errors::TrackerError;
use crate::models::requirement::SuggestedRequirement;
use crate::models::screening::ScreeningResult;
use crate::models::{CandidateId, RequirementId, StageId, StageStatus, StageUpdate};
use crate::policy::Action;
use crate::session::Session;
use crate::tracker::store::{not_found_on_404, LoadOutcome, LoadTicket, TrackerStore};

/// Result of a stage update the backend accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReceipt {
    pub ack: Ack,
    /// Whether the follow-up refetch landed in the store. False when the user
    /// moved to another candidate, a newer fetch superseded it, or it failed.
    pub resynced: bool,
}

pub struct TrackerController {
    backend: Arc<dyn TrackerBackend>,
    session: Session,
    store: Mutex<TrackerStore>,
}

impl TrackerController {
    pub fn new(backend: Arc<dyn TrackerBackend>, session: Session) -> Self {
        Self {
            backend,
            session,
            store: Mutex::new(TrackerStore::new()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read access for rendering.
    pub async fn store(&self) -> MutexGuard<'_, TrackerStore> {
        self.store.lock().await
    }

    /// Opens the tracker for `candidate_id`, cancelling interest in any load
    /// still in flight.
    pub async fn open(&self, candidate_id: CandidateId) -> Result<LoadOutcome, TrackerError> {
        self.session.require(Action::ViewTracker)?;
        let ticket = self.store.lock().await.begin_load(candidate_id);
        self.fetch_into_store(ticket).await
    }

    /// Refetches the candidate currently shown.
    pub async fn refresh(&self) -> Result<LoadOutcome, TrackerError> {
        self.session.require(Action::ViewTracker)?;
        let ticket = {
            let mut store = self.store.lock().await;
            let candidate_id = store
                .current_candidate()
                .cloned()
                .ok_or_else(|| TrackerError::Validation("No candidate is open".to_string()))?;
            store.begin_refresh(&candidate_id)
        };
        match ticket {
            Some(ticket) => self.fetch_into_store(ticket).await,
            None => Ok(LoadOutcome::Stale),
        }
    }

    async fn fetch_into_store(&self, ticket: LoadTicket) -> Result<LoadOutcome, TrackerError> {
        let result = self
            .backend
            .fetch_tracker(ticket.candidate_id())
            .await
            .map_err(|e| not_found_on_404(e, ticket.candidate_id()));
        self.store.lock().await.finish_load(&ticket, result)
    }

    /// Applies the change locally, submits it, and on acknowledgement refetches
    /// the candidate. A refused or failed submit rolls the local edit back.
    pub async fn update_stage(
        &self,
        requirement_id: RequirementId,
        stage_id: StageId,
        status: StageStatus,
        decision: Option<String>,
    ) -> Result<UpdateReceipt, TrackerError> {
        self.session.require(Action::UpdateStageStatus)?;

        let candidate_id = {
            let mut store = self.store.lock().await;
            let candidate_id = store
                .current_candidate()
                .cloned()
                .ok_or_else(|| TrackerError::Validation("No candidate is open".to_string()))?;
            store.apply_stage_update(&requirement_id, &stage_id, status, decision.clone())?;
            candidate_id
        };

        let update = StageUpdate {
            candidate_id: candidate_id.clone(),
            requirement_id,
            stage_id,
            status,
            decision,
        };

        let ack = match self.backend.submit_stage_update(&update).await {
            Ok(ack) => ack,
            Err(e) => {
                warn!(
                    "Stage update for candidate {} failed, rolling back: {e}",
                    candidate_id
                );
                let mut store = self.store.lock().await;
                if store.current_candidate() == Some(&candidate_id) {
                    store.rollback_stage(&update.requirement_id, &update.stage_id);
                }
                return Err(e);
            }
        };

        let ticket = self.store.lock().await.begin_refresh(&candidate_id);
        let resynced = match ticket {
            Some(ticket) => match self.fetch_into_store(ticket).await {
                Ok(LoadOutcome::Applied { .. }) => true,
                Ok(LoadOutcome::Stale) => false,
                Err(e) => {
                    warn!("Resync after stage update failed for candidate {candidate_id}: {e}");
                    false
                }
            },
            None => {
                info!("Candidate {candidate_id} no longer open; skipping resync");
                false
            }
        };

        Ok(UpdateReceipt { ack, resynced })
    }

    /// Runs automated screening. A successful screening creates a tracker
    /// record server-side, so the open candidate is refetched.
    pub async fn screen(
        &self,
        candidate_id: CandidateId,
        requirement_id: RequirementId,
    ) -> Result<ScreeningResult, TrackerError> {
        self.session.require(Action::ScreenCandidate)?;
        let result = self
            .backend
            .screen_candidate(&candidate_id, &requirement_id)
            .await?;
        info!(
            "Screened candidate {} against requirement {}: score {} ({:?})",
            candidate_id, requirement_id, result.score, result.recommend
        );

        let ticket = self.store.lock().await.begin_refresh(&candidate_id);
        if let Some(ticket) = ticket {
            if let Err(e) = self.fetch_into_store(ticket).await {
                warn!("Resync after screening failed for candidate {candidate_id}: {e}");
            }
        }
        Ok(result)
    }

    /// Asks the backend to draft requirement fields from a job description.
    pub async fn autofill_requirement(
        &self,
        jd_text: &str,
    ) -> Result<SuggestedRequirement, TrackerError> {
        self.session.require(Action::CreateRequirement)?;
        if jd_text.trim().is_empty() {
            return Err(TrackerError::Validation(
                "Please enter a job description first".to_string(),
            ));
        }
        self.backend.suggest_requirement(jd_text).await
    }
}
