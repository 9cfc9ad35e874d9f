//! Dashboard panel ordering and the combined dashboard snapshot.

use crate::model::event::CalendarEvent;
use crate::model::note::Note;
use crate::model::settings::{AppSettings, DashboardPanel};
use crate::model::state::AppState;
use crate::model::task::Task;
use crate::view::events::upcoming_events;
use crate::view::finance::{budget_summary, BudgetPeriod, BudgetSummary};
use crate::view::notes::recent_notes;
use crate::view::tasks::{priority_tasks, task_progress, TaskProgress};
use chrono::NaiveDate;

pub const DASHBOARD_UPCOMING_EVENTS: usize = 3;
pub const DASHBOARD_PRIORITY_TASKS: usize = 4;
pub const DASHBOARD_RECENT_NOTES: usize = 2;

/// Everything the home screen shows, computed in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot<'a> {
    pub layout: Vec<DashboardPanel>,
    pub currency: &'a str,
    pub budget: BudgetSummary,
    pub tasks_today: TaskProgress,
    pub upcoming_events: Vec<&'a CalendarEvent>,
    pub priority_tasks: Vec<&'a Task>,
    pub recent_notes: Vec<&'a Note>,
}

/// Drops duplicate panels and appends missing ones in default order.
pub fn normalize_dashboard_order(order: &[DashboardPanel]) -> Vec<DashboardPanel> {
    let mut normalized: Vec<DashboardPanel> = Vec::with_capacity(DashboardPanel::ALL.len());
    for panel in order.iter().chain(DashboardPanel::ALL.iter()) {
        if !normalized.contains(panel) {
            normalized.push(*panel);
        }
    }
    normalized
}

pub fn dashboard_layout(settings: &AppSettings) -> Vec<DashboardPanel> {
    normalize_dashboard_order(&settings.dashboard_order)
}

pub fn dashboard(state: &AppState, today: NaiveDate) -> DashboardSnapshot<'_> {
    let mut upcoming = upcoming_events(&state.events, today);
    upcoming.truncate(DASHBOARD_UPCOMING_EVENTS);

    DashboardSnapshot {
        layout: dashboard_layout(&state.settings),
        currency: state.settings.currency.as_str(),
        budget: budget_summary(state, today, BudgetPeriod::Daily),
        tasks_today: task_progress(&state.tasks, today),
        upcoming_events: upcoming,
        priority_tasks: priority_tasks(&state.tasks, DASHBOARD_PRIORITY_TASKS),
        recent_notes: recent_notes(&state.notes, DASHBOARD_RECENT_NOTES),
    }
}
