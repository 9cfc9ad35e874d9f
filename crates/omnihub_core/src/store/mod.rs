//! In-memory record store mirrored to durable storage.
//!
//! # Responsibility
//! - Own the four record collections and settings.
//! - Expose create/toggle/delete/update operations.
//!
//! # Invariants
//! - Every mutation is persisted before it becomes visible through `state()`.
//! - New records are prepended (newest first).

pub mod record_store;
