//! Natural-language capture use-cases.
//!
//! # Responsibility
//! - Turn one line of free text into a stored record.
//! - Expand an existing task with model-suggested subtasks.
//!
//! # Invariants
//! - Nothing is written when interpretation or mapping fails.
//! - Captured text is never logged; only kind and id are.

use crate::interpret::{InterpretError, Interpreter, LanguageModel};
use crate::model::record::{RecordId, RecordKind};
use crate::repo::state_repo::StateRepository;
use crate::store::record_store::{RecordStore, StoreError};
use chrono::NaiveDateTime;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ServiceError {
    Interpret(InterpretError),
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interpret(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Interpret(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<InterpretError> for ServiceError {
    fn from(value: InterpretError) -> Self {
        Self::Interpret(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Result of a successful capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEntry {
    pub kind: RecordKind,
    pub id: RecordId,
    pub title: String,
}

/// Interpreter + store orchestration for smart input.
pub struct SmartEntryService<'a, R: StateRepository, M: LanguageModel> {
    store: &'a mut RecordStore<R>,
    interpreter: &'a Interpreter<M>,
}

impl<'a, R: StateRepository, M: LanguageModel> SmartEntryService<'a, R, M> {
    pub fn new(store: &'a mut RecordStore<R>, interpreter: &'a Interpreter<M>) -> Self {
        Self { store, interpreter }
    }

    /// Interprets `text` and stores the resulting record.
    pub fn capture(&mut self, text: &str, now: NaiveDateTime) -> Result<CapturedEntry, ServiceError> {
        let entry = self.interpreter.interpret(text, now).map_err(|err| {
            warn!("event=smart_capture module=service status=error stage=interpret error={err}");
            err
        })?;
        let record = entry.into_record(now).map_err(|err| {
            warn!("event=smart_capture module=service status=error stage=map error={err}");
            err
        })?;
        let title = record.title().to_string();
        let (kind, id) = self.store.apply(record)?;

        info!("event=smart_capture module=service status=ok kind={kind} id={id}");
        Ok(CapturedEntry { kind, id, title })
    }

    /// Asks the model to split the task's title and appends the subtasks.
    ///
    /// Returns the ids of the appended subtasks.
    pub fn split_task(&mut self, task_id: RecordId) -> Result<Vec<RecordId>, ServiceError> {
        let title = self.store.task(task_id)?.title.clone();
        let items = self.interpreter.breakdown(&title)?;
        let ids = self.store.add_subtasks(task_id, items)?;

        info!(
            "event=task_split module=service status=ok id={task_id} added={}",
            ids.len()
        );
        Ok(ids)
    }
}
