use serde::{Deserialize, Serialize};

use crate::models::ids::EntityId;
use crate::policy::Role;

/// The logged-in user as returned by the backend's login call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}
