pub mod ids;
pub mod requirement;
pub mod screening;
pub mod stage;
pub mod tracker;
pub mod user;

pub use ids::{CandidateId, EntityId, RequirementId, StageId};
pub use stage::{Stage, StageStatus, StageUpdate};
pub use tracker::{RequirementSummary, TrackerProgress, TrackerRecord};
