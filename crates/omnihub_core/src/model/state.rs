//! The single persisted application object.

use crate::model::event::CalendarEvent;
use crate::model::finance::FinanceEntry;
use crate::model::note::Note;
use crate::model::settings::AppSettings;
use crate::model::task::Task;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// All four collections plus settings, stored newest-first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub finances: Vec<FinanceEntry>,
    #[serde(default)]
    pub settings: AppSettings,
}

impl AppState {
    /// Validates every record and the settings block.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for note in &self.notes {
            note.validate()?;
        }
        for task in &self.tasks {
            task.validate()?;
        }
        for event in &self.events {
            event.validate()?;
        }
        for entry in &self.finances {
            entry.validate()?;
        }
        self.settings.validate()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
            && self.tasks.is_empty()
            && self.events.is_empty()
            && self.finances.is_empty()
    }
}
