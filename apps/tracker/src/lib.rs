//! Candidate stage tracker for the ATS front-end.
//!
//! The backend owns every tracker record; this crate reads them, requests
//! stage changes, and keeps one candidate's view consistent with the server.

pub mod api_client;
pub mod config;
pub mod errors;
pub mod models;
pub mod policy;
pub mod render;
pub mod session;
pub mod tracker;

pub use api_client::{Ack, TrackerBackend, TrackerSyncClient};
pub use errors::{ErrorNotice, TrackerError};
pub use session::Session;
pub use tracker::{LoadOutcome, TrackerController, TrackerStore, TrackerView};
