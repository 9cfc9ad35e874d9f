//! Core domain logic for OmniHub.
//! Notes, tasks, events and finances live in one persisted state owned by
//! the record store; everything else reads from it.

pub mod config;
pub mod db;
pub mod interpret;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod view;

pub use config::{AiSettings, ConfigError, OmniConfig, ResolvedConfig};
pub use interpret::{
    GeminiClient, GenerateRequest, InterpretError, Interpreter, LanguageModel, SmartEntry,
    SmartEntryKind,
};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::record::{NewRecord, RecordId, RecordKind};
pub use model::state::AppState;
pub use model::validation::ValidationError;
pub use repo::state_repo::{RepoError, RepoResult, SqliteStateRepository, StateRepository};
pub use service::smart_entry::{CapturedEntry, ServiceError, SmartEntryService};
pub use store::record_store::{RecordStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
