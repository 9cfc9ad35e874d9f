//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate interpreter and store calls into use-case level APIs.
//! - Keep CLI callers decoupled from model and storage details.

pub mod smart_entry;
