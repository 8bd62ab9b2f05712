//! Role-based capability table.
//!
//! Every authorization decision in the crate is `is_allowed(role, action)`;
//! callers never compare role strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    DeliveryManager,
    Recruiter,
    TeamLead,
    Client,
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown role '{0}'")]
pub struct ParseRoleError(pub String);

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::DeliveryManager,
        Role::Recruiter,
        Role::TeamLead,
        Role::Client,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::DeliveryManager => "DELIVERY_MANAGER",
            Role::Recruiter => "RECRUITER",
            Role::TeamLead => "TEAM_LEAD",
            Role::Client => "CLIENT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::DeliveryManager => "Delivery Manager",
            Role::Recruiter => "Recruiter",
            Role::TeamLead => "Team Lead",
            Role::Client => "Client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ManageUsers,
    ManageClients,
    ViewRequirements,
    CreateRequirement,
    AssignRequirement,
    ViewCandidates,
    ManageCandidates,
    ScreenCandidate,
    ViewTracker,
    UpdateStageStatus,
    ViewReports,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::ManageUsers => "manage users",
            Action::ManageClients => "manage clients",
            Action::ViewRequirements => "view requirements",
            Action::CreateRequirement => "create requirements",
            Action::AssignRequirement => "assign requirements",
            Action::ViewCandidates => "view candidates",
            Action::ManageCandidates => "manage candidates",
            Action::ScreenCandidate => "screen candidates",
            Action::ViewTracker => "view the candidate tracker",
            Action::UpdateStageStatus => "update stage status",
            Action::ViewReports => "view reports",
        };
        f.write_str(s)
    }
}

/// Navigation entries shown to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    Users,
    Clients,
    Requirements,
    CreateRequirement,
    Candidates,
    Applications,
    Interviews,
    Offers,
    Reports,
    Settings,
}

impl Screen {
    pub fn label(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Users => "Users",
            Screen::Clients => "Clients",
            Screen::Requirements => "Requirements",
            Screen::CreateRequirement => "Create Requirement",
            Screen::Candidates => "Candidates",
            Screen::Applications => "Applications",
            Screen::Interviews => "Interviews",
            Screen::Offers => "Offers",
            Screen::Reports => "Reports",
            Screen::Settings => "Settings",
        }
    }
}

pub struct Capabilities {
    pub actions: &'static [Action],
    pub screens: &'static [Screen],
}

static ADMIN: Capabilities = Capabilities {
    actions: &[
        Action::ManageUsers,
        Action::ManageClients,
        Action::ViewRequirements,
        Action::CreateRequirement,
        Action::AssignRequirement,
        Action::ViewCandidates,
        Action::ManageCandidates,
        Action::ScreenCandidate,
        Action::ViewTracker,
        Action::UpdateStageStatus,
        Action::ViewReports,
    ],
    screens: &[
        Screen::Dashboard,
        Screen::Users,
        Screen::Clients,
        Screen::Requirements,
        Screen::Candidates,
        Screen::Applications,
        Screen::Interviews,
        Screen::Offers,
        Screen::Reports,
        Screen::Settings,
        Screen::CreateRequirement,
    ],
};

static DELIVERY_MANAGER: Capabilities = Capabilities {
    actions: &[
        Action::ViewRequirements,
        Action::CreateRequirement,
        Action::AssignRequirement,
        Action::ViewCandidates,
        Action::ManageCandidates,
        Action::ScreenCandidate,
        Action::ViewTracker,
        Action::UpdateStageStatus,
        Action::ViewReports,
    ],
    screens: &[
        Screen::Dashboard,
        Screen::Requirements,
        Screen::CreateRequirement,
        Screen::Candidates,
        Screen::Applications,
        Screen::Interviews,
        Screen::Reports,
    ],
};

static RECRUITER: Capabilities = Capabilities {
    actions: &[
        Action::ViewRequirements,
        Action::ViewCandidates,
        Action::ManageCandidates,
        Action::ScreenCandidate,
        Action::ViewTracker,
        Action::UpdateStageStatus,
    ],
    screens: &[Screen::Dashboard, Screen::Requirements, Screen::Candidates],
};

static TEAM_LEAD: Capabilities = Capabilities {
    actions: &[
        Action::ViewRequirements,
        Action::ViewCandidates,
        Action::ScreenCandidate,
        Action::ViewTracker,
        Action::UpdateStageStatus,
        Action::ViewReports,
    ],
    screens: &[
        Screen::Dashboard,
        Screen::Requirements,
        Screen::Candidates,
        Screen::Interviews,
        Screen::Reports,
    ],
};

static CLIENT: Capabilities = Capabilities {
    actions: &[Action::ViewRequirements, Action::ViewTracker],
    screens: &[Screen::Dashboard, Screen::Requirements],
};

pub fn capabilities(role: Role) -> &'static Capabilities {
    match role {
        Role::Admin => &ADMIN,
        Role::DeliveryManager => &DELIVERY_MANAGER,
        Role::Recruiter => &RECRUITER,
        Role::TeamLead => &TEAM_LEAD,
        Role::Client => &CLIENT,
    }
}

pub fn is_allowed(role: Role, action: Action) -> bool {
    capabilities(role).actions.contains(&action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_admin_and_dm_create_requirements() {
        let creators: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|r| is_allowed(*r, Action::CreateRequirement))
            .collect();
        assert_eq!(creators, vec![Role::Admin, Role::DeliveryManager]);
    }

    #[test]
    fn test_admin_can_do_everything_dm_can() {
        for action in capabilities(Role::DeliveryManager).actions {
            assert!(is_allowed(Role::Admin, *action), "{action}");
        }
    }

    #[test]
    fn test_client_is_read_only() {
        assert!(is_allowed(Role::Client, Action::ViewTracker));
        assert!(!is_allowed(Role::Client, Action::UpdateStageStatus));
        assert!(!is_allowed(Role::Client, Action::ScreenCandidate));
    }

    #[test]
    fn test_dm_menu_has_no_user_management() {
        let screens = capabilities(Role::DeliveryManager).screens;
        assert!(screens.contains(&Screen::CreateRequirement));
        assert!(!screens.contains(&Screen::Users));
        assert!(!screens.contains(&Screen::Settings));
    }

    #[test]
    fn test_parse_role() {
        assert_eq!("delivery manager".parse::<Role>(), Ok(Role::DeliveryManager));
        assert_eq!("TEAM_LEAD".parse::<Role>(), Ok(Role::TeamLead));
        assert!("GUEST".parse::<Role>().is_err());
    }
}
