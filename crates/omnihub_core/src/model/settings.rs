//! Application settings model.
//!
//! # Responsibility
//! - Hold user preferences persisted alongside the record collections.
//! - Provide partial-update (`SettingsPatch`) merge semantics.
//!
//! # Invariants
//! - `currency` is one of `SUPPORTED_CURRENCIES`.
//! - `dashboard_order` lists every `DashboardPanel` exactly once.
//! - Budgets are finite and non-negative.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const SUPPORTED_CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "JPY", "INR", "CAD", "BRL", "KRW"];

/// Named work/break duration pairs offered by the focus timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroPreset {
    pub label: &'static str,
    pub work_minutes: u32,
    pub break_minutes: u32,
}

pub const POMODORO_PRESETS: &[PomodoroPreset] = &[
    PomodoroPreset {
        label: "Pomodoro",
        work_minutes: 25,
        break_minutes: 5,
    },
    PomodoroPreset {
        label: "Long Focus",
        work_minutes: 50,
        break_minutes: 10,
    },
    PomodoroPreset {
        label: "Short Bursts",
        work_minutes: 15,
        break_minutes: 3,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeName {
    Classic,
    Ocean,
    Forest,
    Sunset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Light,
    Dark,
}

/// Dashboard sections whose display order is user-configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardPanel {
    Finances,
    Tasks,
    Events,
    Notes,
}

impl DashboardPanel {
    pub const ALL: [DashboardPanel; 4] = [
        DashboardPanel::Finances,
        DashboardPanel::Tasks,
        DashboardPanel::Events,
        DashboardPanel::Notes,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "finances" => Some(Self::Finances),
            "tasks" => Some(Self::Tasks),
            "events" => Some(Self::Events),
            "notes" => Some(Self::Notes),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Budgets {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

impl Default for Budgets {
    fn default() -> Self {
        Self {
            daily: 50.0,
            weekly: 300.0,
            monthly: 1200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: ThemeName,
    pub mode: Mode,
    pub font: String,
    pub currency: String,
    /// Focus duration in minutes.
    pub pomodoro_work: u32,
    /// Break duration in minutes.
    pub pomodoro_break: u32,
    pub notifications_enabled: bool,
    #[serde(default = "default_dashboard_order")]
    pub dashboard_order: Vec<DashboardPanel>,
    pub budgets: Budgets,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeName::Classic,
            mode: Mode::Light,
            font: "font-sans".to_string(),
            currency: "USD".to_string(),
            pomodoro_work: 25,
            pomodoro_break: 5,
            notifications_enabled: false,
            dashboard_order: default_dashboard_order(),
            budgets: Budgets::default(),
        }
    }
}

fn default_dashboard_order() -> Vec<DashboardPanel> {
    DashboardPanel::ALL.to_vec()
}

impl AppSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !SUPPORTED_CURRENCIES.contains(&self.currency.as_str()) {
            return Err(ValidationError::UnsupportedCurrency(self.currency.clone()));
        }
        if self.pomodoro_work == 0 {
            return Err(ValidationError::InvalidPomodoroDuration {
                field: "pomodoro_work",
            });
        }
        if self.pomodoro_break == 0 {
            return Err(ValidationError::InvalidPomodoroDuration {
                field: "pomodoro_break",
            });
        }
        for (period, value) in [
            ("daily", self.budgets.daily),
            ("weekly", self.budgets.weekly),
            ("monthly", self.budgets.monthly),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidBudget { period });
            }
        }

        let unique: HashSet<_> = self.dashboard_order.iter().collect();
        if self.dashboard_order.len() != DashboardPanel::ALL.len()
            || unique.len() != DashboardPanel::ALL.len()
        {
            return Err(ValidationError::InvalidDashboardOrder);
        }
        Ok(())
    }

    /// Applies every field present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(font) = patch.font {
            self.font = font;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency.trim().to_ascii_uppercase();
        }
        if let Some(minutes) = patch.pomodoro_work {
            self.pomodoro_work = minutes;
        }
        if let Some(minutes) = patch.pomodoro_break {
            self.pomodoro_break = minutes;
        }
        if let Some(enabled) = patch.notifications_enabled {
            self.notifications_enabled = enabled;
        }
        if let Some(order) = patch.dashboard_order {
            self.dashboard_order = order;
        }
        if let Some(budgets) = patch.budgets {
            self.budgets = budgets;
        }
    }
}

/// Partial settings update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub theme: Option<ThemeName>,
    pub mode: Option<Mode>,
    pub font: Option<String>,
    pub currency: Option<String>,
    pub pomodoro_work: Option<u32>,
    pub pomodoro_break: Option<u32>,
    pub notifications_enabled: Option<bool>,
    pub dashboard_order: Option<Vec<DashboardPanel>>,
    pub budgets: Option<Budgets>,
}

impl SettingsPatch {
    /// Patch selecting one of the built-in focus presets.
    pub fn pomodoro_preset(preset: &PomodoroPreset) -> Self {
        Self {
            pomodoro_work: Some(preset.work_minutes),
            pomodoro_break: Some(preset.break_minutes),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AppSettings, DashboardPanel, Mode, SettingsPatch, ThemeName, POMODORO_PRESETS,
    };
    use crate::model::validation::ValidationError;

    #[test]
    fn defaults_are_valid() {
        let settings = AppSettings::default();
        settings.validate().unwrap();
        assert_eq!(settings.dashboard_order, DashboardPanel::ALL.to_vec());
        assert_eq!(settings.budgets.daily, 50.0);
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut settings = AppSettings::default();
        settings.apply(SettingsPatch {
            mode: Some(Mode::Dark),
            currency: Some(" eur ".to_string()),
            ..SettingsPatch::default()
        });

        assert_eq!(settings.mode, Mode::Dark);
        assert_eq!(settings.currency, "EUR");
        assert_eq!(settings.theme, ThemeName::Classic);
        assert_eq!(settings.pomodoro_work, 25);
    }

    #[test]
    fn preset_patch_sets_both_durations() {
        let mut settings = AppSettings::default();
        settings.apply(SettingsPatch::pomodoro_preset(&POMODORO_PRESETS[1]));
        assert_eq!((settings.pomodoro_work, settings.pomodoro_break), (50, 10));
    }

    #[test]
    fn duplicate_dashboard_panels_are_rejected() {
        let mut settings = AppSettings::default();
        settings.dashboard_order = vec![
            DashboardPanel::Tasks,
            DashboardPanel::Tasks,
            DashboardPanel::Events,
            DashboardPanel::Notes,
        ];
        assert_eq!(
            settings.validate(),
            Err(ValidationError::InvalidDashboardOrder)
        );
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let mut settings = AppSettings::default();
        settings.currency = "XYZ".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::UnsupportedCurrency(code)) if code == "XYZ"
        ));
    }

    #[test]
    fn settings_blob_without_dashboard_order_gets_default() {
        let mut value = serde_json::to_value(AppSettings::default()).unwrap();
        value.as_object_mut().unwrap().remove("dashboardOrder");
        let settings: AppSettings = serde_json::from_value(value).unwrap();
        assert_eq!(settings.dashboard_order, DashboardPanel::ALL.to_vec());
    }
}
