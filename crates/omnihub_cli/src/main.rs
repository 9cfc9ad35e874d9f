//! `omnihub` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open the store.
//! - Map subcommands onto record store, view and smart-entry calls.

mod render;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use omnihub_core::db::open_db;
use omnihub_core::model::event::NewEvent;
use omnihub_core::model::finance::NewFinance;
use omnihub_core::model::note::{ChecklistItem, NewNote};
use omnihub_core::model::settings::{
    DashboardPanel, Mode, SettingsPatch, ThemeName, POMODORO_PRESETS,
};
use omnihub_core::model::task::{NewTask, Priority, SubTask};
use omnihub_core::view::events::{sort_events, EventSort, EventSortKey};
use omnihub_core::view::finance::{budget_summary, daily_cash_flow, BudgetPeriod};
use omnihub_core::view::notes::{sort_notes, ListSort};
use omnihub_core::view::tasks::{sort_tasks, TaskSort, TaskSortKey};
use omnihub_core::view::{dashboard::dashboard, SortOrder};
use omnihub_core::{
    init_from_config, GeminiClient, Interpreter, OmniConfig, RecordStore, ResolvedConfig,
    SmartEntryService, SqliteStateRepository, StateRepository,
};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "omnihub", version, about = "Notes, tasks, events and finances in one place")]
struct Cli {
    /// Database file; overrides config and OMNIHUB_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the home dashboard (default).
    #[command(alias = "d")]
    Dashboard,
    /// Interpret free text and store the resulting record.
    #[command(alias = "add")]
    Capture { text: Vec<String> },
    #[command(subcommand)]
    Note(NoteCommand),
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Event(EventCommand),
    #[command(subcommand)]
    Finance(FinanceCommand),
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Print the core version.
    Version,
}

#[derive(Subcommand, Debug)]
enum NoteCommand {
    Add {
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Checklist item; repeat to build a checklist note.
        #[arg(long = "item")]
        items: Vec<String>,
    },
    List {
        #[arg(long, value_enum, default_value_t = NoteSortArg::Newest)]
        sort: NoteSortArg,
    },
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    Add {
        title: String,
        /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM`; defaults to today 23:59.
        #[arg(long, value_parser = parse_due)]
        due: Option<NaiveDateTime>,
        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
    },
    /// List pending tasks.
    List {
        #[arg(long, value_enum, default_value_t = TaskSortArg::Date)]
        sort: TaskSortArg,
        #[arg(long)]
        desc: bool,
    },
    Toggle { id: Uuid },
    ToggleSubtask { task_id: Uuid, sub_task_id: Uuid },
    /// Ask the language model for subtasks and append them.
    Split { id: Uuid },
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum EventCommand {
    Add {
        title: String,
        #[arg(long, value_parser = parse_datetime)]
        start: NaiveDateTime,
        /// Defaults to one hour after start.
        #[arg(long, value_parser = parse_datetime)]
        end: Option<NaiveDateTime>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// List events from today onwards.
    List {
        #[arg(long, value_enum, default_value_t = EventSortArg::Date)]
        sort: EventSortArg,
        #[arg(long)]
        desc: bool,
    },
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum FinanceCommand {
    Add {
        amount: f64,
        #[arg(long)]
        earning: bool,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Budget usage and recent cash flow.
    Summary {
        #[arg(long, value_enum, default_value_t = PeriodArg::Daily)]
        period: PeriodArg,
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    Set {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        #[arg(long)]
        font: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        work: Option<u32>,
        #[arg(long = "break")]
        break_minutes: Option<u32>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        daily_budget: Option<f64>,
        #[arg(long)]
        weekly_budget: Option<f64>,
        #[arg(long)]
        monthly_budget: Option<f64>,
    },
    /// Apply a built-in focus preset by label, e.g. "Long Focus".
    Preset { label: String },
    /// Move a dashboard panel to a zero-based position.
    MovePanel { panel: String, index: usize },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum NoteSortArg {
    Newest,
    Oldest,
    Title,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TaskSortArg {
    Date,
    Title,
    Priority,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EventSortArg {
    Date,
    Title,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PriorityArg {
    Low,
    Medium,
    High,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PeriodArg {
    Daily,
    Weekly,
    Monthly,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeArg {
    Classic,
    Ocean,
    Forest,
    Sunset,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Light,
    Dark,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = OmniConfig::load()?.resolve_with_db(cli.db.as_deref())?;
    if let Err(err) = init_from_config(&config) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    let (mut store, recovered) = RecordStore::open_recovering(SqliteStateRepository::new(&conn))?;
    if recovered {
        eprintln!("warning: saved data was unreadable and has been moved to backups");
    }

    let now = Local::now().naive_local();
    let today = now.date();
    let command = cli.command.unwrap_or(Command::Dashboard);
    info!("event=cli_command module=cli status=start command={}", command.name());

    match command {
        Command::Dashboard => render::dashboard(&dashboard(store.state(), today)),
        Command::Version => println!("omnihub_core {}", omnihub_core::core_version()),
        Command::Capture { text } => {
            let interpreter = interpreter(&config)?;
            let mut service = SmartEntryService::new(&mut store, &interpreter);
            let captured = service.capture(&text.join(" "), now)?;
            println!("added {} {} ({})", captured.kind, captured.title, captured.id);
        }
        Command::Note(command) => run_note(&mut store, command)?,
        Command::Task(command) => run_task(&mut store, command, &config, today)?,
        Command::Event(command) => run_event(&mut store, command, today)?,
        Command::Finance(command) => run_finance(&mut store, command, today)?,
        Command::Settings(command) => run_settings(&mut store, command)?,
    }
    Ok(())
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Capture { .. } => "capture",
            Self::Note(_) => "note",
            Self::Task(_) => "task",
            Self::Event(_) => "event",
            Self::Finance(_) => "finance",
            Self::Settings(_) => "settings",
            Self::Version => "version",
        }
    }
}

fn interpreter(config: &ResolvedConfig) -> Result<Interpreter<GeminiClient>> {
    let Some(ai) = config.ai.as_ref() else {
        bail!("smart input needs an API key; set GEMINI_API_KEY or [ai] api_key");
    };
    let client = GeminiClient::with_options(&ai.api_key, &ai.base_url, ai.timeout_secs)?;
    Ok(Interpreter::new(client).with_models(&ai.smart_input_model, &ai.breakdown_model))
}

fn run_note<R: StateRepository>(store: &mut RecordStore<R>, command: NoteCommand) -> Result<()> {
    match command {
        NoteCommand::Add {
            title,
            content,
            items,
        } => {
            let note = if items.is_empty() {
                NewNote::text(title, content)
            } else {
                let items: Vec<ChecklistItem> = items.into_iter().map(ChecklistItem::new).collect();
                NewNote::checklist(title, &items)
            };
            println!("{}", store.add_note(note)?);
        }
        NoteCommand::List { sort } => {
            let sort = match sort {
                NoteSortArg::Newest => ListSort::DateDesc,
                NoteSortArg::Oldest => ListSort::DateAsc,
                NoteSortArg::Title => ListSort::TitleAsc,
            };
            render::notes(&sort_notes(&store.state().notes, sort));
        }
        NoteCommand::Delete { id } => store.delete_note(id)?,
    }
    Ok(())
}

fn run_task<R: StateRepository>(
    store: &mut RecordStore<R>,
    command: TaskCommand,
    config: &ResolvedConfig,
    today: NaiveDate,
) -> Result<()> {
    match command {
        TaskCommand::Add {
            title,
            due,
            priority,
            category,
            description,
            subtasks,
        } => {
            let due = due.unwrap_or_else(|| today.and_time(end_of_day()));
            let mut task = NewTask::new(title, due);
            task.priority = match priority {
                PriorityArg::Low => Priority::Low,
                PriorityArg::Medium => Priority::Medium,
                PriorityArg::High => Priority::High,
            };
            if let Some(category) = category {
                task.category = category;
            }
            task.description = description;
            task.sub_tasks = subtasks.into_iter().map(SubTask::new).collect();
            println!("{}", store.add_task(task)?);
        }
        TaskCommand::List { sort, desc } => {
            let key = match sort {
                TaskSortArg::Date => TaskSortKey::Date,
                TaskSortArg::Title => TaskSortKey::Title,
                TaskSortArg::Priority => TaskSortKey::Priority,
            };
            let sort = TaskSort {
                key,
                order: order(desc),
            };
            render::tasks(&sort_tasks(&store.state().tasks, sort));
        }
        TaskCommand::Toggle { id } => {
            let completed = store.toggle_task(id)?;
            println!("{}", if completed { "completed" } else { "reopened" });
        }
        TaskCommand::ToggleSubtask {
            task_id,
            sub_task_id,
        } => {
            store.toggle_subtask(task_id, sub_task_id)?;
            render::task_detail(store.task(task_id)?);
        }
        TaskCommand::Split { id } => {
            let interpreter = interpreter(config)?;
            let added = SmartEntryService::new(store, &interpreter).split_task(id)?;
            println!("added {} subtasks", added.len());
            render::task_detail(store.task(id)?);
        }
        TaskCommand::Delete { id } => store.delete_task(id)?,
    }
    Ok(())
}

fn run_event<R: StateRepository>(
    store: &mut RecordStore<R>,
    command: EventCommand,
    today: NaiveDate,
) -> Result<()> {
    match command {
        EventCommand::Add {
            title,
            start,
            end,
            location,
            description,
        } => {
            let mut event = NewEvent::starting_at(title, start);
            if let Some(end) = end {
                event.end = end;
            }
            event.location = location;
            event.description = description;
            println!("{}", store.add_event(event)?);
        }
        EventCommand::List { sort, desc } => {
            let key = match sort {
                EventSortArg::Date => EventSortKey::Date,
                EventSortArg::Title => EventSortKey::Title,
            };
            let sort = EventSort {
                key,
                order: order(desc),
            };
            render::events(&sort_events(&store.state().events, today, sort));
        }
        EventCommand::Delete { id } => store.delete_event(id)?,
    }
    Ok(())
}

fn run_finance<R: StateRepository>(
    store: &mut RecordStore<R>,
    command: FinanceCommand,
    today: NaiveDate,
) -> Result<()> {
    match command {
        FinanceCommand::Add {
            amount,
            earning,
            category,
            date,
            note,
        } => {
            let date = date.unwrap_or(today);
            let mut entry = if earning {
                NewFinance::earning(amount, date)
            } else {
                NewFinance::spending(amount, date)
            };
            if let Some(category) = category {
                entry.category = category;
            }
            entry.note = note;
            println!("{}", store.add_finance(entry)?);
        }
        FinanceCommand::Summary { period, days } => {
            let period = match period {
                PeriodArg::Daily => BudgetPeriod::Daily,
                PeriodArg::Weekly => BudgetPeriod::Weekly,
                PeriodArg::Monthly => BudgetPeriod::Monthly,
            };
            let state = store.state();
            render::budget(&budget_summary(state, today, period), &state.settings.currency);
            render::cash_flow(&daily_cash_flow(&state.finances, today, days));
        }
        FinanceCommand::Delete { id } => store.delete_finance(id)?,
    }
    Ok(())
}

fn run_settings<R: StateRepository>(
    store: &mut RecordStore<R>,
    command: SettingsCommand,
) -> Result<()> {
    match command {
        SettingsCommand::Show => {}
        SettingsCommand::Set {
            theme,
            mode,
            font,
            currency,
            work,
            break_minutes,
            notifications,
            daily_budget,
            weekly_budget,
            monthly_budget,
        } => {
            let mut budgets = store.state().settings.budgets;
            budgets.daily = daily_budget.unwrap_or(budgets.daily);
            budgets.weekly = weekly_budget.unwrap_or(budgets.weekly);
            budgets.monthly = monthly_budget.unwrap_or(budgets.monthly);

            store.update_settings(SettingsPatch {
                theme: theme.map(|theme| match theme {
                    ThemeArg::Classic => ThemeName::Classic,
                    ThemeArg::Ocean => ThemeName::Ocean,
                    ThemeArg::Forest => ThemeName::Forest,
                    ThemeArg::Sunset => ThemeName::Sunset,
                }),
                mode: mode.map(|mode| match mode {
                    ModeArg::Light => Mode::Light,
                    ModeArg::Dark => Mode::Dark,
                }),
                font,
                currency,
                pomodoro_work: work,
                pomodoro_break: break_minutes,
                notifications_enabled: notifications,
                dashboard_order: None,
                budgets: Some(budgets),
            })?;
        }
        SettingsCommand::Preset { label } => {
            let Some(preset) = POMODORO_PRESETS
                .iter()
                .find(|preset| preset.label.eq_ignore_ascii_case(label.trim()))
            else {
                let labels: Vec<&str> = POMODORO_PRESETS.iter().map(|preset| preset.label).collect();
                bail!("unknown preset `{label}`; expected one of: {}", labels.join(", "));
            };
            store.update_settings(SettingsPatch::pomodoro_preset(preset))?;
        }
        SettingsCommand::MovePanel { panel, index } => {
            let Some(panel) = DashboardPanel::parse(&panel) else {
                bail!("unknown panel `{panel}`; expected finances|tasks|events|notes");
            };
            store.move_dashboard_panel(panel, index)?;
        }
    }
    render::settings(&store.state().settings);
    Ok(())
}

fn order(desc: bool) -> SortOrder {
    if desc {
        SortOrder::Desc
    } else {
        SortOrder::Asc
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default()
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn parse_datetime(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got `{value}`"))
}

/// A bare date means due at the end of that day.
fn parse_due(value: &str) -> Result<NaiveDateTime, String> {
    parse_datetime(value).or_else(|_| parse_date(value).map(|date| date.and_time(end_of_day())))
}

#[cfg(test)]
mod tests {
    use super::{parse_datetime, parse_due, Cli};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_due_date_lands_at_end_of_day() {
        let due = parse_due("2026-10-17").unwrap();
        assert_eq!(due.format("%H:%M").to_string(), "23:59");
        assert!(parse_datetime("tomorrow").is_err());
    }
}
