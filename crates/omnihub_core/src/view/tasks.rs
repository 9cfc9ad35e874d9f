//! Task progress aggregates and task list orderings.

use crate::model::task::Task;
use crate::view::{compare_titles, SortOrder};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskProgress {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Completed share in percent; 0 when there are no tasks.
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortKey {
    Date,
    Title,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSort {
    pub key: TaskSortKey,
    pub order: SortOrder,
}

impl Default for TaskSort {
    fn default() -> Self {
        Self {
            key: TaskSortKey::Date,
            order: SortOrder::Asc,
        }
    }
}

impl TaskSort {
    /// Selecting the active key flips the order; a new key starts ascending.
    pub fn select(self, key: TaskSortKey) -> Self {
        if self.key == key {
            Self {
                key,
                order: self.order.reversed(),
            }
        } else {
            Self {
                key,
                order: SortOrder::Asc,
            }
        }
    }
}

/// Tasks whose due date falls on `today`.
pub fn tasks_due_on(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.due_date.date() == today)
        .collect()
}

/// Completion ratio over tasks due `today`.
pub fn task_progress(tasks: &[Task], today: NaiveDate) -> TaskProgress {
    let due_today = tasks_due_on(tasks, today);
    let total = due_today.len();
    let completed = due_today.iter().filter(|task| task.completed).count();
    let percent = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    };
    TaskProgress {
        total,
        completed,
        pending: total - completed,
        percent,
    }
}

/// `(completed, total)` subtask counts for one task.
pub fn subtask_progress(task: &Task) -> (usize, usize) {
    task.subtask_progress()
}

/// Pending tasks ordered by priority, highest first, at most `limit`.
///
/// Equal priorities keep store order.
pub fn priority_tasks(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut pending: Vec<&Task> = tasks.iter().filter(|task| !task.completed).collect();
    pending.sort_by(|left, right| right.priority.rank().cmp(&left.priority.rank()));
    pending.truncate(limit);
    pending
}

/// Pending tasks ordered by `sort`.
pub fn sort_tasks(tasks: &[Task], sort: TaskSort) -> Vec<&Task> {
    let mut pending: Vec<&Task> = tasks.iter().filter(|task| !task.completed).collect();
    pending.sort_by(|left, right| {
        let ordering = match sort.key {
            TaskSortKey::Date => left.due_date.cmp(&right.due_date),
            TaskSortKey::Title => compare_titles(&left.title, &right.title),
            TaskSortKey::Priority => left.priority.rank().cmp(&right.priority.rank()),
        };
        sort.order.apply(ordering)
    });
    pending
}

#[cfg(test)]
mod tests {
    use super::{priority_tasks, sort_tasks, task_progress, TaskSort, TaskSortKey};
    use crate::model::task::{NewTask, Priority, Task};
    use crate::view::SortOrder;
    use chrono::{NaiveDate, NaiveDateTime};
    use uuid::Uuid;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 4, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn task(title: &str, due: NaiveDateTime, priority: Priority, completed: bool) -> Task {
        let mut draft = NewTask::new(title, due);
        draft.priority = priority;
        let mut task = draft.into_task(Uuid::new_v4());
        task.completed = completed;
        task
    }

    #[test]
    fn progress_counts_only_tasks_due_today() {
        let tasks = vec![
            task("a", at(5, 9), Priority::Low, true),
            task("b", at(5, 18), Priority::Low, false),
            task("c", at(5, 20), Priority::Low, false),
            task("d", at(6, 9), Priority::Low, true),
        ];
        let progress = task_progress(&tasks, at(5, 0).date());
        assert_eq!(progress.total, 3);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.pending, 2);
        assert!((progress.percent - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn progress_without_tasks_is_zero() {
        let progress = task_progress(&[], at(5, 0).date());
        assert_eq!(progress.total, 0);
        assert_eq!(progress.percent, 0.0);
    }

    #[test]
    fn priority_tasks_skip_completed_and_keep_store_order_on_ties() {
        let tasks = vec![
            task("low", at(1, 9), Priority::Low, false),
            task("high-1", at(1, 9), Priority::High, false),
            task("done", at(1, 9), Priority::High, true),
            task("high-2", at(1, 9), Priority::High, false),
            task("medium", at(1, 9), Priority::Medium, false),
        ];
        let titles: Vec<_> = priority_tasks(&tasks, 3)
            .into_iter()
            .map(|task| task.title.as_str())
            .collect();
        assert_eq!(titles, vec!["high-1", "high-2", "medium"]);
    }

    #[test]
    fn sort_tasks_by_title_desc_is_case_insensitive() {
        let tasks = vec![
            task("banana", at(1, 9), Priority::Low, false),
            task("Apple", at(2, 9), Priority::Low, false),
            task("cherry", at(3, 9), Priority::Low, false),
        ];
        let sort = TaskSort {
            key: TaskSortKey::Title,
            order: SortOrder::Desc,
        };
        let titles: Vec<_> = sort_tasks(&tasks, sort)
            .into_iter()
            .map(|task| task.title.as_str())
            .collect();
        assert_eq!(titles, vec!["cherry", "banana", "Apple"]);
    }

    #[test]
    fn selecting_active_key_flips_order() {
        let sort = TaskSort::default();
        assert_eq!(sort.select(TaskSortKey::Date).order, SortOrder::Desc);
        let priority = sort.select(TaskSortKey::Priority);
        assert_eq!(priority.key, TaskSortKey::Priority);
        assert_eq!(priority.order, SortOrder::Asc);
    }
}
