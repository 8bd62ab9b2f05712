use serde::Serialize;
use thiserror::Error;

use crate::models::{CandidateId, RequirementId, StageId};
use crate::policy::{Action, Role};

/// Tracker-level error type.
/// Every variant is recoverable: the caller shows [`TrackerError::notice`] and
/// lets the user retry.
#[derive(Debug, Error, PartialEq)]
pub enum TrackerError {
    #[error("Candidate {0} not found")]
    NotFound(CandidateId),

    #[error("Stage {stage_id} of requirement {requirement_id} is not in the loaded tracker")]
    NotFoundInStore {
        requirement_id: RequirementId,
        stage_id: StageId,
    },

    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("Bad response (status {status}): {reason}")]
    BadResponse {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Rejected by backend: {0}")]
    Rejected(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {role} may not {action}")]
    Forbidden { role: Role, action: Action },
}

impl From<reqwest::Error> for TrackerError {
    fn from(e: reqwest::Error) -> Self {
        TrackerError::Unreachable(e.to_string())
    }
}

/// What a presentation layer shows for a failed operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorNotice {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl TrackerError {
    pub fn notice(&self) -> ErrorNotice {
        let (code, message, retryable) = match self {
            TrackerError::NotFound(id) => (
                "NOT_FOUND",
                format!("Candidate {id} could not be found"),
                false,
            ),
            TrackerError::NotFoundInStore { .. } => (
                "STAGE_NOT_LOADED",
                "That stage is no longer shown for this candidate. Reload the tracker.".to_string(),
                true,
            ),
            TrackerError::Unreachable(detail) => {
                tracing::error!("Backend unreachable: {detail}");
                (
                    "NETWORK_ERROR",
                    "The server could not be reached. Check your connection and retry.".to_string(),
                    true,
                )
            }
            TrackerError::BadResponse { status, reason, .. } => {
                tracing::error!("Bad response ({status}): {reason}");
                (
                    "BAD_RESPONSE",
                    format!("The server returned an unexpected response (status {status})."),
                    true,
                )
            }
            TrackerError::Rejected(reason) => ("REJECTED", reason.clone(), true),
            TrackerError::Validation(msg) => ("VALIDATION_ERROR", msg.clone(), false),
            TrackerError::Forbidden { role, action } => (
                "FORBIDDEN",
                format!("A {} may not {action}.", role.label()),
                false,
            ),
        };

        ErrorNotice {
            code,
            message,
            retryable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_notice_carries_server_reason() {
        let notice = TrackerError::Rejected("stage not found".to_string()).notice();
        assert_eq!(notice.code, "REJECTED");
        assert_eq!(notice.message, "stage not found");
        assert!(notice.retryable);
    }

    #[test]
    fn test_bad_response_notice_hides_body() {
        let notice = TrackerError::BadResponse {
            status: 502,
            reason: "body is not a JSON array".to_string(),
            body: "<html>gateway</html>".to_string(),
        }
        .notice();
        assert_eq!(notice.code, "BAD_RESPONSE");
        assert!(!notice.message.contains("<html>"));
    }

    #[test]
    fn test_forbidden_notice_uses_role_label() {
        let notice = TrackerError::Forbidden {
            role: Role::DeliveryManager,
            action: Action::ManageUsers,
        }
        .notice();
        assert_eq!(notice.message, "A Delivery Manager may not manage users.");
        assert!(!notice.retryable);
    }
}
