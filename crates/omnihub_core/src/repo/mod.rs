//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable-snapshot contract used by the record store.
//! - Isolate SQLite and JSON encoding details from store orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `AppState::validate()` before persistence.
//! - Corrupted snapshots surface as `RepoError::InvalidData`, never as an
//!   empty state.

pub mod state_repo;
