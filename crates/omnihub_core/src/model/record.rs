//! Record identity and record-kind dispatch.
//!
//! # Responsibility
//! - Provide the shared identifier type for all four collections.
//! - Carry "one of four" drafts from input paths (forms, CLI, model output)
//!   into the store.

use crate::model::event::NewEvent;
use crate::model::finance::NewFinance;
use crate::model::note::NewNote;
use crate::model::task::NewTask;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every stored record and nested subtask/checklist item.
pub type RecordId = Uuid;

/// The four record collections owned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Note,
    Task,
    Event,
    Finance,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Task => "task",
            Self::Event => "event",
            Self::Finance => "finance",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation draft for any of the four record kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    Note(NewNote),
    Task(NewTask),
    Event(NewEvent),
    Finance(NewFinance),
}

impl NewRecord {
    /// Returns the collection this draft will be inserted into.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Note(_) => RecordKind::Note,
            Self::Task(_) => RecordKind::Task,
            Self::Event(_) => RecordKind::Event,
            Self::Finance(_) => RecordKind::Finance,
        }
    }

    /// Human-readable label used in confirmations.
    pub fn title(&self) -> &str {
        match self {
            Self::Note(note) => note.title.as_str(),
            Self::Task(task) => task.title.as_str(),
            Self::Event(event) => event.title.as_str(),
            Self::Finance(entry) => entry.category.as_str(),
        }
    }
}
