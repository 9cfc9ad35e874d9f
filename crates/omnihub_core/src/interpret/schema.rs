//! Structured-output schemas and model-output mapping.
//!
//! # Responsibility
//! - Declare the JSON schemas sent with smart-input and breakdown requests.
//! - Map a decoded `SmartEntry` onto exactly one record draft.
//!
//! # Invariants
//! - `title` is required for every kind; `amount` is required for finance.
//! - Missing dates default to the caller-supplied "now".

use crate::interpret::{InterpretError, InterpretResult};
use crate::model::event::NewEvent;
use crate::model::finance::{FinanceKind, NewFinance, DEFAULT_FINANCE_CATEGORY};
use crate::model::note::NewNote;
use crate::model::record::NewRecord;
use crate::model::task::{NewTask, Priority, SubTask, DEFAULT_TASK_CATEGORY};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").expect("valid date regex"));
static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[T\s])(\d{1,2}):(\d{2})(?::\d{2}(?:\.\d+)?)?\s*([AaPp][Mm])?")
        .expect("valid time regex")
});

/// Due time used when a task has a date but no time.
const DEFAULT_DUE_TIME: (u32, u32) = (23, 59);

/// Record kind chosen by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmartEntryKind {
    Task,
    Event,
    Note,
    Finance,
}

/// Typed model answer for a smart-input request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartEntry {
    #[serde(rename = "type")]
    pub kind: Option<SmartEntryKind>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub amount: Option<f64>,
    pub finance_type: Option<String>,
    pub priority: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct BreakdownResponse {
    #[serde(default)]
    pub subtasks: Vec<String>,
}

/// Response schema for smart input.
pub fn smart_entry_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "type": { "type": "STRING", "enum": ["task", "event", "note", "finance"] },
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "date": { "type": "STRING" },
            "startTime": { "type": "STRING" },
            "amount": { "type": "NUMBER" },
            "financeType": { "type": "STRING", "enum": ["spending", "earning"] },
            "priority": { "type": "STRING", "enum": ["low", "medium", "high"] },
            "subtasks": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["type", "title"]
    })
}

/// Response schema for task breakdown.
pub fn breakdown_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "subtasks": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["subtasks"]
    })
}

impl SmartEntry {
    /// Maps the model answer onto a record draft.
    ///
    /// `now` supplies default dates and the default event start.
    pub fn into_record(self, now: NaiveDateTime) -> InterpretResult<NewRecord> {
        let kind = self.kind.ok_or(InterpretError::MissingField("type"))?;
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(InterpretError::MissingField("title"));
        }
        let description = self
            .description
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let start_time = self
            .start_time
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let explicit_date = resolve_date(self.date.as_deref(), start_time, now.date())?;
        let date = explicit_date.unwrap_or(now.date());
        // Only tasks and events carry a time of day.
        let time = || start_time.map(parse_start_time).transpose().map(Option::flatten);

        match kind {
            SmartEntryKind::Task => {
                let due_time = time()?.unwrap_or_else(|| {
                    NaiveTime::from_hms_opt(DEFAULT_DUE_TIME.0, DEFAULT_DUE_TIME.1, 0)
                        .unwrap_or_default()
                });
                let priority = match self.priority.as_deref() {
                    Some(value) => Priority::parse(value).ok_or_else(|| invalid("priority", value))?,
                    None => Priority::default(),
                };
                Ok(NewRecord::Task(NewTask {
                    title,
                    description,
                    due_date: date.and_time(due_time),
                    priority,
                    sub_tasks: self
                        .subtasks
                        .iter()
                        .map(|value| value.trim())
                        .filter(|value| !value.is_empty())
                        .map(SubTask::new)
                        .collect(),
                    category: DEFAULT_TASK_CATEGORY.to_string(),
                }))
            }
            SmartEntryKind::Event => {
                let start = match (time()?, explicit_date) {
                    (Some(time), _) => date.and_time(time),
                    // A named day keeps the default clock time.
                    (None, Some(date)) => date.and_time(default_event_start(now).time()),
                    (None, None) => default_event_start(now),
                };
                let mut event = NewEvent::starting_at(title, start);
                event.description = description;
                Ok(NewRecord::Event(event))
            }
            SmartEntryKind::Note => Ok(NewRecord::Note(NewNote::text(
                title,
                description.unwrap_or_default(),
            ))),
            SmartEntryKind::Finance => {
                let amount = self.amount.ok_or(InterpretError::MissingField("amount"))?;
                if !amount.is_finite() || amount < 0.0 {
                    return Err(invalid("amount", &amount.to_string()));
                }
                let kind = match self.finance_type.as_deref() {
                    Some(value) => {
                        FinanceKind::parse(value).ok_or_else(|| invalid("financeType", value))?
                    }
                    None => FinanceKind::Spending,
                };
                // Finance entries have no title field; keep the label as the note.
                let note = match description {
                    Some(description) => Some(format!("{title}: {description}")),
                    None => Some(title),
                };
                Ok(NewRecord::Finance(NewFinance {
                    amount,
                    kind,
                    category: DEFAULT_FINANCE_CATEGORY.to_string(),
                    date,
                    note,
                }))
            }
        }
    }
}

fn invalid(field: &'static str, value: &str) -> InterpretError {
    InterpretError::InvalidField {
        field,
        value: value.to_string(),
    }
}

/// Time of day in `startTime`. A date-only value carries no time.
fn parse_start_time(value: &str) -> InterpretResult<Option<NaiveTime>> {
    if !TIME_RE.is_match(value) && DATE_RE.is_match(value) {
        return Ok(None);
    }
    parse_time("startTime", value).map(Some)
}

/// Picks the entry date: explicit `date`, else a date embedded in
/// `start_time`. `None` when the model named no day.
fn resolve_date(
    date: Option<&str>,
    start_time: Option<&str>,
    today: NaiveDate,
) -> InterpretResult<Option<NaiveDate>> {
    if let Some(value) = date.map(str::trim).filter(|value| !value.is_empty()) {
        return parse_date("date", value, today).map(Some);
    }
    if let Some(value) = start_time.filter(|value| DATE_RE.is_match(value)) {
        return parse_date("startTime", value, today).map(Some);
    }
    Ok(None)
}

pub(crate) fn parse_date(field: &'static str, value: &str, today: NaiveDate) -> InterpretResult<NaiveDate> {
    match value.trim().to_ascii_lowercase().as_str() {
        "today" => return Ok(today),
        "tomorrow" => return Ok(today + Duration::days(1)),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    let caps = DATE_RE.captures(value).ok_or_else(|| invalid(field, value))?;
    let year = caps[1].parse::<i32>().map_err(|_| invalid(field, value))?;
    let month = caps[2].parse::<u32>().map_err(|_| invalid(field, value))?;
    let day = caps[3].parse::<u32>().map_err(|_| invalid(field, value))?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid(field, value))
}

pub(crate) fn parse_time(field: &'static str, value: &str) -> InterpretResult<NaiveTime> {
    let caps = TIME_RE
        .captures(value.trim())
        .ok_or_else(|| invalid(field, value))?;
    let mut hour = caps[1].parse::<u32>().map_err(|_| invalid(field, value))?;
    let minute = caps[2].parse::<u32>().map_err(|_| invalid(field, value))?;

    if let Some(meridiem) = caps.get(3) {
        if hour == 0 || hour > 12 {
            return Err(invalid(field, value));
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (hour, true) => hour + 12,
            (hour, false) => hour,
        };
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| invalid(field, value))
}

/// One hour from `now`, truncated to the minute.
fn default_event_start(now: NaiveDateTime) -> NaiveDateTime {
    let start = now + Duration::hours(1);
    start
        .with_second(0)
        .and_then(|value| value.with_nanosecond(0))
        .unwrap_or(start)
}
