use chrono::{NaiveDate, NaiveDateTime};
use omnihub_core::db::{open_db, open_db_in_memory};
use omnihub_core::model::event::NewEvent;
use omnihub_core::model::finance::{FinanceKind, NewFinance};
use omnihub_core::model::note::{ChecklistItem, NewNote, NoteKind};
use omnihub_core::model::settings::{DashboardPanel, Mode, SettingsPatch, POMODORO_PRESETS};
use omnihub_core::model::task::{NewTask, SubTask};
use omnihub_core::{
    AppState, NewRecord, RecordKind, RecordStore, RepoError, RepoResult, SqliteStateRepository,
    StateRepository, StoreError, ValidationError,
};
use std::cell::{Cell, RefCell};
use uuid::Uuid;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn task_with_subtasks(title: &str, subtasks: &[&str]) -> NewTask {
    let mut task = NewTask::new(title, at(20, 9));
    task.sub_tasks = subtasks.iter().map(|title| SubTask::new(*title)).collect();
    task
}

/// In-memory repository whose writes can be switched to fail.
#[derive(Default)]
struct FlakyRepo {
    saved: RefCell<Option<AppState>>,
    fail_writes: Cell<bool>,
}

impl StateRepository for FlakyRepo {
    fn load_state(&self) -> RepoResult<Option<AppState>> {
        Ok(self.saved.borrow().clone())
    }

    fn save_state(&self, state: &AppState) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::InvalidData("disk full".to_string()));
        }
        *self.saved.borrow_mut() = Some(state.clone());
        Ok(())
    }

    fn quarantine_state(&self, _reason: &str) -> RepoResult<bool> {
        Ok(self.saved.borrow_mut().take().is_some())
    }
}

#[test]
fn records_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("omnihub.db");

    let note_id = {
        let conn = open_db(&path).unwrap();
        let mut store = RecordStore::open(SqliteStateRepository::new(&conn)).unwrap();
        store
            .add_finance(NewFinance::spending(12.5, at(17, 0).date()))
            .unwrap();
        store.add_note(NewNote::text("ideas", "ship it")).unwrap()
    };

    let conn = open_db(&path).unwrap();
    let store = RecordStore::open(SqliteStateRepository::new(&conn)).unwrap();
    assert_eq!(store.state().notes[0].id, note_id);
    assert_eq!(store.state().notes[0].content, "ship it");
    assert_eq!(store.state().finances[0].amount, 12.5);
}

#[test]
fn new_records_are_prepended() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RecordStore::open(SqliteStateRepository::new(&conn)).unwrap();

    let first = store.add_task(NewTask::new("first", at(18, 9))).unwrap();
    let second = store.add_task(NewTask::new("second", at(18, 9))).unwrap();

    let ids: Vec<Uuid> = store.state().tasks.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![second, first]);
    assert!(store.state().tasks.iter().all(|task| !task.completed));
}

#[test]
fn toggling_a_task_pushes_its_flag_to_subtasks() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();
    let id = store
        .add_task(task_with_subtasks("move", &["pack", "drive"]))
        .unwrap();

    assert!(store.toggle_task(id).unwrap());
    assert!(store.task(id).unwrap().sub_tasks.iter().all(|s| s.completed));

    assert!(!store.toggle_task(id).unwrap());
    assert!(store.task(id).unwrap().sub_tasks.iter().all(|s| !s.completed));
}

#[test]
fn completing_every_subtask_completes_the_task() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();
    let id = store
        .add_task(task_with_subtasks("move", &["pack", "drive"]))
        .unwrap();
    let subtask_ids: Vec<Uuid> = store.task(id).unwrap().sub_tasks.iter().map(|s| s.id).collect();

    assert!(!store.toggle_subtask(id, subtask_ids[0]).unwrap());
    assert!(store.toggle_subtask(id, subtask_ids[1]).unwrap());
    assert!(!store.toggle_subtask(id, subtask_ids[0]).unwrap());
    assert!(!store.task(id).unwrap().completed);
}

#[test]
fn task_added_with_every_subtask_done_is_complete() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();
    let mut draft = task_with_subtasks("errands", &["bank", "post office"]);
    for sub_task in &mut draft.sub_tasks {
        sub_task.completed = true;
    }

    let id = store.add_task(draft).unwrap();

    let task = store.task(id).unwrap();
    assert!(task.completed);
    assert_eq!(task.subtask_progress(), (2, 2));
}

#[test]
fn task_added_with_some_subtasks_done_stays_pending() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();
    let mut draft = task_with_subtasks("errands", &["bank", "post office"]);
    draft.sub_tasks[0].completed = true;

    let id = store.add_task(draft).unwrap();

    assert!(!store.task(id).unwrap().completed);
}

#[test]
fn task_without_subtasks_toggles_its_own_flag() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RecordStore::open(SqliteStateRepository::new(&conn)).unwrap();
    let id = store.add_task(NewTask::new("water plants", at(18, 9))).unwrap();

    assert!(store.toggle_task(id).unwrap());
    assert!(store.task(id).unwrap().completed);
    assert!(store.task(id).unwrap().sub_tasks.is_empty());

    assert!(!store.toggle_task(id).unwrap());
    assert!(!store.task(id).unwrap().completed);
}

#[test]
fn unknown_subtask_is_reported() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();
    let id = store.add_task(task_with_subtasks("t", &["a"])).unwrap();
    let missing = Uuid::new_v4();

    let err = store.toggle_subtask(id, missing).unwrap_err();
    assert!(matches!(
        err,
        StoreError::SubTaskNotFound { task_id, sub_task_id } if task_id == id && sub_task_id == missing
    ));
}

#[test]
fn adding_subtasks_reopens_a_completed_task() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();
    let id = store.add_task(task_with_subtasks("trip", &["book"])).unwrap();
    store.toggle_task(id).unwrap();

    let added = store.add_subtasks(id, ["pack", "  ", "go"]).unwrap();

    assert_eq!(added.len(), 2);
    let task = store.task(id).unwrap();
    assert!(!task.completed);
    assert_eq!(task.subtask_progress(), (1, 3));
}

#[test]
fn adding_only_blank_subtasks_still_checks_the_task() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();
    let err = store.add_subtasks(Uuid::new_v4(), [" "]).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { kind: RecordKind::Task, .. }));
}

#[test]
fn deleting_unknown_ids_is_not_found() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();
    let id = Uuid::new_v4();

    assert!(matches!(
        store.delete_note(id),
        Err(StoreError::NotFound { kind: RecordKind::Note, .. })
    ));
    assert!(matches!(
        store.delete_event(id),
        Err(StoreError::NotFound { kind: RecordKind::Event, .. })
    ));
    assert!(matches!(
        store.delete_finance(id),
        Err(StoreError::NotFound { kind: RecordKind::Finance, .. })
    ));
    assert!(matches!(
        store.toggle_task(id),
        Err(StoreError::NotFound { kind: RecordKind::Task, .. })
    ));
}

#[test]
fn delete_removes_only_the_target() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();
    let keep = store.add_event(NewEvent::starting_at("standup", at(18, 9))).unwrap();
    let gone = store.add_event(NewEvent::starting_at("retro", at(18, 15))).unwrap();

    store.delete_event(gone).unwrap();

    assert_eq!(store.state().events.len(), 1);
    assert_eq!(store.state().events[0].id, keep);
    assert_eq!(
        store.repository().saved.borrow().as_ref().unwrap().events.len(),
        1
    );
}

#[test]
fn invalid_records_are_rejected_without_writing() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();

    assert!(matches!(
        store.add_note(NewNote::text("   ", "body")),
        Err(StoreError::Validation(ValidationError::BlankTitle(RecordKind::Note)))
    ));

    let mut event = NewEvent::starting_at("backwards", at(18, 10));
    event.end = at(18, 9);
    assert!(matches!(
        store.add_event(event),
        Err(StoreError::Validation(ValidationError::EventEndsBeforeStart))
    ));

    assert!(matches!(
        store.add_finance(NewFinance::spending(-3.0, at(18, 0).date())),
        Err(StoreError::Validation(ValidationError::InvalidAmount(_)))
    ));

    assert!(store.state().is_empty());
    assert!(store.repository().saved.borrow().is_none());
}

#[test]
fn failed_write_keeps_the_previous_state() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();
    let id = store.add_task(NewTask::new("pay rent", at(18, 9))).unwrap();
    let before = store.state().clone();

    store.repository().fail_writes.set(true);
    assert!(matches!(store.toggle_task(id), Err(StoreError::Repo(_))));
    assert!(store.add_note(NewNote::text("lost", "")).is_err());

    assert_eq!(store.state(), &before);
    assert!(!store.task(id).unwrap().completed);
}

#[test]
fn checklist_notes_keep_their_items() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();
    let items = [ChecklistItem::new("eggs"), ChecklistItem::new("flour")];
    store.add_note(NewNote::checklist("baking", &items)).unwrap();

    let note = &store.state().notes[0];
    assert_eq!(note.kind, NoteKind::Checklist);
    assert_eq!(note.checklist_items().unwrap(), items.to_vec());
}

#[test]
fn settings_patch_merges_and_validates() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();

    store
        .update_settings(SettingsPatch {
            mode: Some(Mode::Dark),
            currency: Some("eur".to_string()),
            ..SettingsPatch::default()
        })
        .unwrap();
    store
        .update_settings(SettingsPatch::pomodoro_preset(&POMODORO_PRESETS[1]))
        .unwrap();

    let settings = &store.state().settings;
    assert_eq!(settings.mode, Mode::Dark);
    assert_eq!(settings.currency, "EUR");
    assert_eq!((settings.pomodoro_work, settings.pomodoro_break), (50, 10));

    let err = store
        .update_settings(SettingsPatch {
            currency: Some("XYZ".to_string()),
            ..SettingsPatch::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::UnsupportedCurrency(_))
    ));
    assert_eq!(store.state().settings.currency, "EUR");
}

#[test]
fn dashboard_panels_can_be_reordered() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();

    store.move_dashboard_panel(DashboardPanel::Notes, 0).unwrap();
    assert_eq!(
        store.state().settings.dashboard_order,
        vec![
            DashboardPanel::Notes,
            DashboardPanel::Finances,
            DashboardPanel::Tasks,
            DashboardPanel::Events
        ]
    );

    store.move_dashboard_panel(DashboardPanel::Notes, 99).unwrap();
    assert_eq!(
        store.state().settings.dashboard_order.last(),
        Some(&DashboardPanel::Notes)
    );
}

#[test]
fn apply_routes_each_draft_to_its_collection() {
    let mut store = RecordStore::open(FlakyRepo::default()).unwrap();

    let (kind, id) = store
        .apply(NewRecord::Finance(NewFinance::earning(100.0, at(17, 0).date())))
        .unwrap();
    assert_eq!(kind, RecordKind::Finance);
    assert_eq!(store.state().finances[0].id, id);
    assert_eq!(store.state().finances[0].kind, FinanceKind::Earning);

    let (kind, _) = store
        .apply(NewRecord::Event(NewEvent::starting_at("dentist", at(21, 8))))
        .unwrap();
    assert_eq!(kind, RecordKind::Event);
    assert_eq!(store.state().events.len(), 1);
}
