//! Task domain model.
//!
//! # Responsibility
//! - Define tasks, subtasks and task priority.
//! - Own the subtask completion propagation rule.
//!
//! # Invariants
//! - A task with at least one subtask is completed iff all subtasks are.
//! - Toggling the parent pushes the new flag down to every subtask.

use crate::model::record::{RecordId, RecordKind};
use crate::model::validation::{require_item_title, require_title, ValidationError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TASK_CATEGORY: &str = "General";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight; higher is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: RecordId,
    pub title: String,
    pub completed: bool,
}

impl SubTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
        }
    }
}

/// Stored task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: NaiveDateTime,
    pub completed: bool,
    pub priority: Priority,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
    pub category: String,
}

/// Creation draft for a task; the store assigns `id` and `completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDateTime,
    pub priority: Priority,
    pub sub_tasks: Vec<SubTask>,
    pub category: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>, due_date: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date,
            priority: Priority::default(),
            sub_tasks: Vec::new(),
            category: DEFAULT_TASK_CATEGORY.to_string(),
        }
    }

    pub fn into_task(self, id: RecordId) -> Task {
        let mut task = Task {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            completed: false,
            priority: self.priority,
            sub_tasks: self.sub_tasks,
            category: self.category,
        };
        task.sync_completion();
        task
    }
}

impl Task {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_title(&self.title, RecordKind::Task)?;
        for sub_task in &self.sub_tasks {
            require_item_title(&sub_task.title, RecordKind::Task)?;
        }
        Ok(())
    }

    /// Flips the task flag and pushes the new value down to every subtask.
    pub fn toggle(&mut self) {
        let next = !self.completed;
        self.completed = next;
        for sub_task in &mut self.sub_tasks {
            sub_task.completed = next;
        }
    }

    /// Flips one subtask and re-derives the parent flag.
    ///
    /// Returns `false` when no subtask has the given id.
    pub fn toggle_subtask(&mut self, sub_task_id: RecordId) -> bool {
        let Some(sub_task) = self
            .sub_tasks
            .iter_mut()
            .find(|sub_task| sub_task.id == sub_task_id)
        else {
            return false;
        };
        sub_task.completed = !sub_task.completed;
        self.sync_completion();
        true
    }

    /// Re-derives `completed` from subtasks; tasks without subtasks keep
    /// their own flag.
    pub fn sync_completion(&mut self) {
        if !self.sub_tasks.is_empty() {
            self.completed = self.sub_tasks.iter().all(|sub_task| sub_task.completed);
        }
    }

    /// Returns `(completed, total)` subtask counts.
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self
            .sub_tasks
            .iter()
            .filter(|sub_task| sub_task.completed)
            .count();
        (done, self.sub_tasks.len())
    }
}
