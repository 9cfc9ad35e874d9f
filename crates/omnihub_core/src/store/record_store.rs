//! Record store use-case API.
//!
//! # Responsibility
//! - Apply mutations to a working copy, persist it, then publish it.
//! - Enforce the subtask propagation rule on every task mutation.
//!
//! # Invariants
//! - A failed validation or write leaves the published state untouched.
//! - Unknown ids are reported as `StoreError::NotFound`, never ignored.
//! - Logs carry record kind and id only, never titles or amounts.

use crate::model::event::NewEvent;
use crate::model::finance::NewFinance;
use crate::model::note::NewNote;
use crate::model::record::{NewRecord, RecordId, RecordKind};
use crate::model::settings::{DashboardPanel, SettingsPatch};
use crate::model::state::AppState;
use crate::model::task::{NewTask, SubTask, Task};
use crate::model::validation::ValidationError;
use crate::repo::state_repo::{RepoError, StateRepository};
use crate::view::dashboard::normalize_dashboard_order;
use chrono::Utc;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store error.
#[derive(Debug)]
pub enum StoreError {
    /// No record of `kind` has the given id.
    NotFound { kind: RecordKind, id: RecordId },
    /// The task exists but has no subtask with the given id.
    SubTaskNotFound {
        task_id: RecordId,
        sub_task_id: RecordId,
    },
    /// Mutation would break a model invariant.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::SubTaskNotFound {
                task_id,
                sub_task_id,
            } => write!(f, "subtask {sub_task_id} not found in task {task_id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Single owner of application state.
pub struct RecordStore<R: StateRepository> {
    repo: R,
    state: AppState,
}

impl<R: StateRepository> RecordStore<R> {
    /// Loads persisted state, or starts empty with default settings.
    ///
    /// Corrupted snapshots are returned as errors; see `open_recovering`.
    pub fn open(repo: R) -> StoreResult<Self> {
        let state = repo.load_state()?.unwrap_or_default();
        info!(
            "event=store_open module=store status=ok notes={} tasks={} events={} finances={}",
            state.notes.len(),
            state.tasks.len(),
            state.events.len(),
            state.finances.len()
        );
        Ok(Self { repo, state })
    }

    /// Like `open`, but quarantines an unreadable snapshot and starts fresh.
    ///
    /// Returns `true` as the second element when a snapshot was quarantined.
    pub fn open_recovering(repo: R) -> StoreResult<(Self, bool)> {
        match repo.load_state() {
            Ok(state) => Ok((
                Self {
                    repo,
                    state: state.unwrap_or_default(),
                },
                false,
            )),
            Err(RepoError::InvalidData(details)) => {
                warn!(
                    "event=store_open module=store status=recovered error_code=invalid_snapshot"
                );
                repo.quarantine_state(&details)?;
                Ok((
                    Self {
                        repo,
                        state: AppState::default(),
                    },
                    true,
                ))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Read access to the published state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn add_note(&mut self, note: NewNote) -> StoreResult<RecordId> {
        let id = Uuid::new_v4();
        let note = note.into_note(id, Utc::now().timestamp_millis());
        note.validate()?;
        self.commit("note_add", RecordKind::Note, id, |state| {
            state.notes.insert(0, note);
            Ok(())
        })?;
        Ok(id)
    }

    pub fn delete_note(&mut self, id: RecordId) -> StoreResult<()> {
        self.commit("note_delete", RecordKind::Note, id, |state| {
            remove_by_id(&mut state.notes, id, |note| note.id, RecordKind::Note)
        })
    }

    /// Adds a task with `completed = false`, then applies subtask propagation.
    pub fn add_task(&mut self, task: NewTask) -> StoreResult<RecordId> {
        let id = Uuid::new_v4();
        let task = task.into_task(id);
        task.validate()?;
        self.commit("task_add", RecordKind::Task, id, |state| {
            state.tasks.insert(0, task);
            Ok(())
        })?;
        Ok(id)
    }

    /// Flips a task and sets every subtask to the task's new flag.
    ///
    /// Returns the new completion flag.
    pub fn toggle_task(&mut self, id: RecordId) -> StoreResult<bool> {
        self.commit("task_toggle", RecordKind::Task, id, |state| {
            let task = find_task(state, id)?;
            task.toggle();
            Ok(task.completed)
        })
    }

    /// Flips one subtask; the task becomes complete iff all subtasks are.
    ///
    /// Returns the task's resulting completion flag.
    pub fn toggle_subtask(&mut self, task_id: RecordId, sub_task_id: RecordId) -> StoreResult<bool> {
        self.commit("subtask_toggle", RecordKind::Task, task_id, |state| {
            let task = find_task(state, task_id)?;
            if !task.toggle_subtask(sub_task_id) {
                return Err(StoreError::SubTaskNotFound {
                    task_id,
                    sub_task_id,
                });
            }
            Ok(task.completed)
        })
    }

    /// Appends incomplete subtasks; blank titles are skipped.
    ///
    /// A completed task becomes pending again once a new subtask lands.
    pub fn add_subtasks<I, S>(&mut self, task_id: RecordId, titles: I) -> StoreResult<Vec<RecordId>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sub_tasks: Vec<SubTask> = titles
            .into_iter()
            .map(|title| title.into().trim().to_string())
            .filter(|title| !title.is_empty())
            .map(SubTask::new)
            .collect();
        let ids: Vec<RecordId> = sub_tasks.iter().map(|sub_task| sub_task.id).collect();
        if ids.is_empty() {
            // Still report unknown tasks.
            self.task(task_id)?;
            return Ok(ids);
        }

        self.commit("subtask_add", RecordKind::Task, task_id, |state| {
            let task = find_task(state, task_id)?;
            task.sub_tasks.extend(sub_tasks);
            task.sync_completion();
            Ok(())
        })?;
        Ok(ids)
    }

    pub fn delete_task(&mut self, id: RecordId) -> StoreResult<()> {
        self.commit("task_delete", RecordKind::Task, id, |state| {
            remove_by_id(&mut state.tasks, id, |task| task.id, RecordKind::Task)
        })
    }

    pub fn add_event(&mut self, event: NewEvent) -> StoreResult<RecordId> {
        let id = Uuid::new_v4();
        let event = event.into_event(id);
        event.validate()?;
        self.commit("event_add", RecordKind::Event, id, |state| {
            state.events.insert(0, event);
            Ok(())
        })?;
        Ok(id)
    }

    pub fn delete_event(&mut self, id: RecordId) -> StoreResult<()> {
        self.commit("event_delete", RecordKind::Event, id, |state| {
            remove_by_id(&mut state.events, id, |event| event.id, RecordKind::Event)
        })
    }

    pub fn add_finance(&mut self, entry: NewFinance) -> StoreResult<RecordId> {
        let id = Uuid::new_v4();
        let entry = entry.into_entry(id);
        entry.validate()?;
        self.commit("finance_add", RecordKind::Finance, id, |state| {
            state.finances.insert(0, entry);
            Ok(())
        })?;
        Ok(id)
    }

    pub fn delete_finance(&mut self, id: RecordId) -> StoreResult<()> {
        self.commit("finance_delete", RecordKind::Finance, id, |state| {
            remove_by_id(&mut state.finances, id, |entry| entry.id, RecordKind::Finance)
        })
    }

    /// Shallow-merges `patch` into settings.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> StoreResult<()> {
        let mut settings = self.state.settings.clone();
        settings.apply(patch);
        settings.validate()?;

        let changed = settings != self.state.settings;
        self.persist(|state| state.settings = settings)?;
        info!("event=settings_update module=store status=ok changed={changed}");
        Ok(())
    }

    /// Moves `panel` to `to_index` in the dashboard order.
    ///
    /// Indexes past the end move the panel last.
    pub fn move_dashboard_panel(&mut self, panel: DashboardPanel, to_index: usize) -> StoreResult<()> {
        let mut order = normalize_dashboard_order(&self.state.settings.dashboard_order);
        order.retain(|existing| *existing != panel);
        let index = to_index.min(order.len());
        order.insert(index, panel);

        self.update_settings(SettingsPatch {
            dashboard_order: Some(order),
            ..SettingsPatch::default()
        })
    }

    /// Inserts a draft of any kind through the matching `add_*` operation.
    pub fn apply(&mut self, record: NewRecord) -> StoreResult<(RecordKind, RecordId)> {
        let kind = record.kind();
        let id = match record {
            NewRecord::Note(note) => self.add_note(note)?,
            NewRecord::Task(task) => self.add_task(task)?,
            NewRecord::Event(event) => self.add_event(event)?,
            NewRecord::Finance(entry) => self.add_finance(entry)?,
        };
        Ok((kind, id))
    }

    /// Looks up one task by id.
    pub fn task(&self, id: RecordId) -> StoreResult<&Task> {
        self.state
            .tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound {
                kind: RecordKind::Task,
                id,
            })
    }

    fn commit<T>(
        &mut self,
        event: &'static str,
        kind: RecordKind,
        id: RecordId,
        mutate: impl FnOnce(&mut AppState) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut next = self.state.clone();
        let output = match mutate(&mut next) {
            Ok(output) => output,
            Err(err) => {
                warn!(
                    "event={event} module=store status=rejected kind={kind} id={id} error={err}"
                );
                return Err(err);
            }
        };
        if let Err(err) = self.repo.save_state(&next) {
            warn!("event={event} module=store status=error kind={kind} id={id} error={err}");
            return Err(err.into());
        }
        self.state = next;
        info!("event={event} module=store status=ok kind={kind} id={id}");
        Ok(output)
    }

    fn persist(&mut self, mutate: impl FnOnce(&mut AppState)) -> StoreResult<()> {
        let mut next = self.state.clone();
        mutate(&mut next);
        self.repo.save_state(&next)?;
        self.state = next;
        Ok(())
    }
}

fn find_task(state: &mut AppState, id: RecordId) -> StoreResult<&mut Task> {
    state
        .tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or(StoreError::NotFound {
            kind: RecordKind::Task,
            id,
        })
}

fn remove_by_id<T>(
    items: &mut Vec<T>,
    id: RecordId,
    id_of: impl Fn(&T) -> RecordId,
    kind: RecordKind,
) -> StoreResult<()> {
    let before = items.len();
    items.retain(|item| id_of(item) != id);
    if items.len() == before {
        return Err(StoreError::NotFound { kind, id });
    }
    Ok(())
}
