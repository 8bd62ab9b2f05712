use crate::errors::TrackerError;
use crate::models::user::SessionUser;
use crate::policy::{self, Action, Capabilities, Role};

/// Who is driving the client. Passed explicitly to whatever needs to make an
/// authorization decision.
#[derive(Debug, Clone)]
pub struct Session {
    user: SessionUser,
}

impl Session {
    pub fn new(user: SessionUser) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn can(&self, action: Action) -> bool {
        policy::is_allowed(self.user.role, action)
    }

    pub fn require(&self, action: Action) -> Result<(), TrackerError> {
        if self.can(action) {
            Ok(())
        } else {
            Err(TrackerError::Forbidden {
                role: self.user.role,
                action,
            })
        }
    }

    pub fn capabilities(&self) -> &'static Capabilities {
        policy::capabilities(self.user.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session::new(SessionUser {
            id: None,
            name: "Test".to_string(),
            email: None,
            role,
        })
    }

    #[test]
    fn test_require_reports_role_and_action() {
        let err = session(Role::Client)
            .require(Action::UpdateStageStatus)
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Forbidden {
                role: Role::Client,
                action: Action::UpdateStageStatus
            }
        ));
        assert!(session(Role::Recruiter)
            .require(Action::UpdateStageStatus)
            .is_ok());
    }

    #[test]
    fn test_login_payload_decodes_into_session_user() {
        let user: SessionUser = serde_json::from_str(
            r#"{"id": 1, "name": "Srini", "email": "srini@example.com", "role": "ADMIN", "status": "ACTIVE"}"#,
        )
        .unwrap();
        assert!(session(user.role).can(Action::ManageUsers));
    }
}
