//! Unified domain model for notes, tasks, events and finance entries.
//!
//! # Responsibility
//! - Define the canonical records held by the record store.
//! - Keep the persisted blob shape (camelCase JSON) stable across releases.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - A task with subtasks is completed exactly when all subtasks are.
//! - Every record type exposes `validate()`; writers call it before persisting.

pub mod event;
pub mod finance;
pub mod note;
pub mod record;
pub mod settings;
pub mod state;
pub mod task;
pub mod validation;
