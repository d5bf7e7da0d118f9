//! dmeter-state
//!
//! The sled-backed submission store and the `ScoringEngine` that drives a
//! submission through verification, scoring and persistence.

pub mod db;
pub mod engine;

pub use db::{StateDb, StoreStats};
pub use engine::{PendingSubmission, Scored, ScoringEngine};
