//! Calendar event domain model.
//!
//! # Invariants
//! - `end` is never earlier than `start`.

use crate::model::record::{RecordId, RecordKind};
use crate::model::validation::{require_title, ValidationError};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Default span applied when only a start time is known.
pub const DEFAULT_EVENT_DURATION_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: RecordId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl NewEvent {
    /// Builds an event lasting the default duration from `start`.
    pub fn starting_at(title: impl Into<String>, start: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            start,
            end: start + Duration::minutes(DEFAULT_EVENT_DURATION_MINUTES),
            description: None,
            location: None,
        }
    }

    pub fn into_event(self, id: RecordId) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title,
            start: self.start,
            end: self.end,
            description: self.description,
            location: self.location,
        }
    }
}

impl CalendarEvent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_title(&self.title, RecordKind::Event)?;
        if self.end < self.start {
            return Err(ValidationError::EventEndsBeforeStart);
        }
        Ok(())
    }
}
