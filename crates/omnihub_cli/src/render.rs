//! Plain-text output for CLI commands.

use omnihub_core::model::event::CalendarEvent;
use omnihub_core::model::note::{Note, NoteKind};
use omnihub_core::model::settings::{AppSettings, DashboardPanel};
use omnihub_core::model::task::Task;
use omnihub_core::view::dashboard::DashboardSnapshot;
use omnihub_core::view::finance::{BudgetSummary, DailyCashFlow};

pub fn dashboard(snapshot: &DashboardSnapshot<'_>) {
    for panel in &snapshot.layout {
        match panel {
            DashboardPanel::Finances => {
                println!("== Finances");
                budget(&snapshot.budget, snapshot.currency);
            }
            DashboardPanel::Tasks => {
                let progress = &snapshot.tasks_today;
                println!(
                    "== Tasks  today {}/{} done ({:.0}%)",
                    progress.completed, progress.total, progress.percent
                );
                tasks(&snapshot.priority_tasks);
            }
            DashboardPanel::Events => {
                println!("== Upcoming events");
                events(&snapshot.upcoming_events);
            }
            DashboardPanel::Notes => {
                println!("== Recent notes");
                notes(&snapshot.recent_notes);
            }
        }
    }
}

pub fn budget(summary: &BudgetSummary, currency: &str) {
    let flag = if summary.over_threshold { "  !" } else { "" };
    println!(
        "{:?} spending {:.2} / {:.2} {currency} ({:.0}%){flag}",
        summary.period, summary.spent, summary.budget, summary.usage_percent
    );
}

pub fn cash_flow(days: &[DailyCashFlow]) {
    for day in days {
        println!("{}  -{:.2}  +{:.2}", day.date, day.spending, day.earning);
    }
}

pub fn tasks(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("  (none)");
    }
    for task in tasks {
        let (done, total) = task.subtask_progress();
        let progress = if total > 0 {
            format!(" [{done}/{total}]")
        } else {
            String::new()
        };
        println!(
            "  {} {} {:?} due {}{progress}  {}",
            if task.completed { "x" } else { "-" },
            task.title,
            task.priority,
            task.due_date.format("%Y-%m-%d %H:%M"),
            task.id
        );
    }
}

pub fn task_detail(task: &Task) {
    tasks(&[task]);
    for sub_task in &task.sub_tasks {
        println!(
            "      {} {}  {}",
            if sub_task.completed { "x" } else { "-" },
            sub_task.title,
            sub_task.id
        );
    }
}

pub fn events(events: &[&CalendarEvent]) {
    if events.is_empty() {
        println!("  (none)");
    }
    for event in events {
        let location = event
            .location
            .as_deref()
            .map(|location| format!(" @ {location}"))
            .unwrap_or_default();
        println!(
            "  {} - {} {}{location}  {}",
            event.start.format("%Y-%m-%d %H:%M"),
            event.end.format("%H:%M"),
            event.title,
            event.id
        );
    }
}

pub fn notes(notes: &[&Note]) {
    if notes.is_empty() {
        println!("  (none)");
    }
    for note in notes {
        let detail = match note.kind {
            NoteKind::Checklist => match note.checklist_items() {
                Ok(items) => {
                    let done = items.iter().filter(|item| item.completed).count();
                    format!("checklist {done}/{}", items.len())
                }
                Err(_) => "checklist (unreadable)".to_string(),
            },
            NoteKind::Drawing => "drawing".to_string(),
            NoteKind::Text => note.content.lines().next().unwrap_or_default().to_string(),
        };
        println!("  {}  {detail}  {}", note.title, note.id);
    }
}

pub fn settings(settings: &AppSettings) {
    println!(
        "theme={:?} mode={:?} font={} currency={}",
        settings.theme, settings.mode, settings.font, settings.currency
    );
    println!(
        "pomodoro={}/{} min notifications={}",
        settings.pomodoro_work, settings.pomodoro_break, settings.notifications_enabled
    );
    println!(
        "budgets daily={:.2} weekly={:.2} monthly={:.2}",
        settings.budgets.daily, settings.budgets.weekly, settings.budgets.monthly
    );
    let order: Vec<String> = settings
        .dashboard_order
        .iter()
        .map(|panel| format!("{panel:?}").to_lowercase())
        .collect();
    println!("dashboard={}", order.join(","));
}
