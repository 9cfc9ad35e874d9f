//! Finance entry domain model.

use crate::model::record::RecordId;
use crate::model::validation::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FINANCE_CATEGORY: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceKind {
    Spending,
    Earning,
}

impl FinanceKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "spending" => Some(Self::Spending),
            "earning" => Some(Self::Earning),
            _ => None,
        }
    }
}

/// Stored money movement. `amount` is always non-negative; direction is
/// carried by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceEntry {
    pub id: RecordId,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: FinanceKind,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFinance {
    pub amount: f64,
    pub kind: FinanceKind,
    pub category: String,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl NewFinance {
    pub fn spending(amount: f64, date: NaiveDate) -> Self {
        Self {
            amount,
            kind: FinanceKind::Spending,
            category: DEFAULT_FINANCE_CATEGORY.to_string(),
            date,
            note: None,
        }
    }

    pub fn earning(amount: f64, date: NaiveDate) -> Self {
        Self {
            kind: FinanceKind::Earning,
            ..Self::spending(amount, date)
        }
    }

    pub fn into_entry(self, id: RecordId) -> FinanceEntry {
        FinanceEntry {
            id,
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            date: self.date,
            note: self.note,
        }
    }
}

impl FinanceEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(ValidationError::InvalidAmount(self.amount));
        }
        Ok(())
    }
}
