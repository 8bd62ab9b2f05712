// Candidate stage tracker: per-candidate store plus the controller that keeps
// it in step with the backend (fire the write, then refetch).

pub mod controller;
pub mod store;

pub use controller::{TrackerController, UpdateReceipt};
pub use store::{LoadOutcome, LoadTicket, TrackerStore, TrackerView};
