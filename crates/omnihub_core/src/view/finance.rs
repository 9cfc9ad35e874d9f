//! Spending aggregates and budget usage.

use crate::model::finance::{FinanceEntry, FinanceKind};
use crate::model::settings::Budgets;
use crate::model::state::AppState;
use chrono::{Datelike, Duration, NaiveDate};

/// Budget usage above this percentage is flagged as a warning.
pub const BUDGET_WARNING_PERCENT: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetPeriod {
    /// The given day only.
    Daily,
    /// Monday through Sunday of the week containing the day.
    Weekly,
    /// Calendar month containing the day.
    Monthly,
}

impl BudgetPeriod {
    /// Inclusive `(first, last)` day range containing `day`.
    pub fn range(self, day: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Daily => (day, day),
            Self::Weekly => {
                let first = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
                (first, first + Duration::days(6))
            }
            Self::Monthly => {
                let first = day.with_day(1).unwrap_or(day);
                let next_month = if first.month() == 12 {
                    NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
                };
                let last = next_month.map_or(day, |next| next - Duration::days(1));
                (first, last)
            }
        }
    }

    fn limit(self, budgets: &Budgets) -> f64 {
        match self {
            Self::Daily => budgets.daily,
            Self::Weekly => budgets.weekly,
            Self::Monthly => budgets.monthly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetSummary {
    pub period: BudgetPeriod,
    pub spent: f64,
    pub budget: f64,
    /// Percentage of budget used, capped at 100.
    pub usage_percent: f64,
    /// `usage_percent > BUDGET_WARNING_PERCENT`.
    pub over_threshold: bool,
}

/// One day of the cash-flow series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyCashFlow {
    pub date: NaiveDate,
    pub spending: f64,
    pub earning: f64,
}

/// Sums `kind` amounts dated within `first..=last`.
pub fn total_between(
    finances: &[FinanceEntry],
    kind: FinanceKind,
    first: NaiveDate,
    last: NaiveDate,
) -> f64 {
    finances
        .iter()
        .filter(|entry| entry.kind == kind && entry.date >= first && entry.date <= last)
        .map(|entry| entry.amount)
        .sum()
}

/// Total spending dated `today`.
pub fn today_spending(finances: &[FinanceEntry], today: NaiveDate) -> f64 {
    total_between(finances, FinanceKind::Spending, today, today)
}

/// Percentage of `budget` consumed by `spent`, capped at 100.
///
/// A zero budget is fully used as soon as anything is spent.
pub fn budget_usage(spent: f64, budget: f64) -> f64 {
    if budget <= 0.0 {
        return if spent > 0.0 { 100.0 } else { 0.0 };
    }
    (spent / budget * 100.0).min(100.0)
}

/// Spending vs. budget for the period containing `today`.
pub fn budget_summary(state: &AppState, today: NaiveDate, period: BudgetPeriod) -> BudgetSummary {
    let (first, last) = period.range(today);
    let spent = total_between(&state.finances, FinanceKind::Spending, first, last);
    let budget = period.limit(&state.settings.budgets);
    let usage_percent = budget_usage(spent, budget);
    BudgetSummary {
        period,
        spent,
        budget,
        usage_percent,
        over_threshold: usage_percent > BUDGET_WARNING_PERCENT,
    }
}

/// Per-day spending and earning for the `days` days ending at `today`,
/// oldest first.
pub fn daily_cash_flow(finances: &[FinanceEntry], today: NaiveDate, days: u32) -> Vec<DailyCashFlow> {
    (0..i64::from(days))
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            DailyCashFlow {
                date,
                spending: total_between(finances, FinanceKind::Spending, date, date),
                earning: total_between(finances, FinanceKind::Earning, date, date),
            }
        })
        .collect()
}
