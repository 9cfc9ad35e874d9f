//! Invariant errors shared by every record type and settings.
//!
//! Each record's `validate()` returns a [`ValidationError`]; the store
//! rejects a mutation before anything is written when one comes back.

use crate::model::record::RecordKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Domain invariant violation detected by a `validate()` call.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Title is empty or whitespace only.
    BlankTitle(RecordKind),
    /// Subtask or checklist item title is empty or whitespace only.
    BlankItemTitle(RecordKind),
    /// Event `end` is earlier than `start`.
    EventEndsBeforeStart,
    /// Finance amount is negative, NaN or infinite.
    InvalidAmount(f64),
    /// Budget for the named period is negative, NaN or infinite.
    InvalidBudget { period: &'static str },
    /// Pomodoro duration field is zero.
    InvalidPomodoroDuration { field: &'static str },
    /// Currency code is not in the supported list.
    UnsupportedCurrency(String),
    /// Dashboard order is not a permutation of all panels.
    InvalidDashboardOrder,
    /// Checklist note content is not a checklist item array.
    InvalidChecklist(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle(kind) => write!(f, "{kind} title cannot be blank"),
            Self::BlankItemTitle(kind) => write!(f, "{kind} item title cannot be blank"),
            Self::EventEndsBeforeStart => write!(f, "event end must not be earlier than start"),
            Self::InvalidAmount(amount) => {
                write!(f, "finance amount must be a non-negative number, got {amount}")
            }
            Self::InvalidBudget { period } => {
                write!(f, "{period} budget must be a non-negative number")
            }
            Self::InvalidPomodoroDuration { field } => {
                write!(f, "{field} must be at least one minute")
            }
            Self::UnsupportedCurrency(code) => write!(f, "unsupported currency `{code}`"),
            Self::InvalidDashboardOrder => {
                write!(f, "dashboard order must list every panel exactly once")
            }
            Self::InvalidChecklist(details) => write!(f, "invalid checklist content: {details}"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_title(title: &str, kind: RecordKind) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankTitle(kind));
    }
    Ok(())
}

pub(crate) fn require_item_title(title: &str, kind: RecordKind) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankItemTitle(kind));
    }
    Ok(())
}
