//! Application preferences and UI language, stored next to the planner data.
//!
//! These live under their own keys and are never touched by
//! `DataStore::clear_all` or bundle import.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PlanbookError, Result};
use crate::storage::{codec, BackingStore, StorageKeys};

pub const SETTINGS_EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SidebarPosition {
    #[default]
    Left,
    Right,
}

impl std::fmt::Display for SidebarPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SidebarPosition::Left => write!(f, "left"),
            SidebarPosition::Right => write!(f, "right"),
        }
    }
}

impl std::str::FromStr for SidebarPosition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(SidebarPosition::Left),
            "right" => Ok(SidebarPosition::Right),
            _ => Err(format!("Invalid sidebar position: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub time_zone: String,
    pub date_format: String,
    pub auto_save: bool,
    pub compact_mode: bool,
    pub animations: bool,
    pub sidebar_position: SidebarPosition,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            time_zone: "UTC".to_string(),
            date_format: "MM/DD/YYYY".to_string(),
            auto_save: true,
            compact_mode: false,
            animations: true,
            sidebar_position: SidebarPosition::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub task_reminders: bool,
    pub goal_milestones: bool,
    pub subscription_payments: bool,
    pub weekly_summary: bool,
    /// Local time of day, `HH:MM`.
    pub notification_time: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            task_reminders: true,
            goal_milestones: true,
            subscription_payments: true,
            weekly_summary: false,
            notification_time: "09:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacySettings {
    pub analytics: bool,
    pub crash_reports: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            analytics: false,
            crash_reports: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub general: GeneralSettings,
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneralSettingsUpdate {
    pub time_zone: Option<String>,
    pub date_format: Option<String>,
    pub auto_save: Option<bool>,
    pub compact_mode: Option<bool>,
    pub animations: Option<bool>,
    pub sidebar_position: Option<SidebarPosition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSettingsUpdate {
    pub task_reminders: Option<bool>,
    pub goal_milestones: Option<bool>,
    pub subscription_payments: Option<bool>,
    pub weekly_summary: Option<bool>,
    pub notification_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivacySettingsUpdate {
    pub analytics: Option<bool>,
    pub crash_reports: Option<bool>,
}

/// A patch merged section by section; untouched fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettingsUpdate {
    pub general: GeneralSettingsUpdate,
    pub notifications: NotificationSettingsUpdate,
    pub privacy: PrivacySettingsUpdate,
}

fn flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

impl AppSettingsUpdate {
    /// A single-field update from a `section.field` key, named as in the JSON
    /// export (`general.sidebarPosition`, `notifications.notificationTime`).
    pub fn parse(key: &str, value: &str) -> Result<Self> {
        let bad_value = || PlanbookError::InvalidValue {
            field: key.to_string(),
            value: value.to_string(),
        };
        let toggle = || flag(value).ok_or_else(bad_value);

        let mut update = AppSettingsUpdate::default();
        let g = &mut update.general;
        let n = &mut update.notifications;
        let p = &mut update.privacy;
        match key {
            "general.timeZone" => g.time_zone = Some(value.to_string()),
            "general.dateFormat" => g.date_format = Some(value.to_string()),
            "general.autoSave" => g.auto_save = Some(toggle()?),
            "general.compactMode" => g.compact_mode = Some(toggle()?),
            "general.animations" => g.animations = Some(toggle()?),
            "general.sidebarPosition" => {
                g.sidebar_position = Some(value.parse().map_err(|_| bad_value())?)
            }
            "notifications.taskReminders" => n.task_reminders = Some(toggle()?),
            "notifications.goalMilestones" => n.goal_milestones = Some(toggle()?),
            "notifications.subscriptionPayments" => n.subscription_payments = Some(toggle()?),
            "notifications.weeklySummary" => n.weekly_summary = Some(toggle()?),
            "notifications.notificationTime" => {
                let time = NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| bad_value())?;
                n.notification_time = Some(time.format("%H:%M").to_string());
            }
            "privacy.analytics" => p.analytics = Some(toggle()?),
            "privacy.crashReports" => p.crash_reports = Some(toggle()?),
            _ => {
                return Err(PlanbookError::InvalidValue {
                    field: "setting".to_string(),
                    value: key.to_string(),
                })
            }
        }
        Ok(update)
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl AppSettings {
    pub fn apply(&mut self, update: AppSettingsUpdate) {
        let g = update.general;
        set(&mut self.general.time_zone, g.time_zone);
        set(&mut self.general.date_format, g.date_format);
        set(&mut self.general.auto_save, g.auto_save);
        set(&mut self.general.compact_mode, g.compact_mode);
        set(&mut self.general.animations, g.animations);
        set(&mut self.general.sidebar_position, g.sidebar_position);

        let n = update.notifications;
        set(&mut self.notifications.task_reminders, n.task_reminders);
        set(&mut self.notifications.goal_milestones, n.goal_milestones);
        set(
            &mut self.notifications.subscription_payments,
            n.subscription_payments,
        );
        set(&mut self.notifications.weekly_summary, n.weekly_summary);
        set(&mut self.notifications.notification_time, n.notification_time);

        let p = update.privacy;
        set(&mut self.privacy.analytics, p.analytics);
        set(&mut self.privacy.crash_reports, p.crash_reports);
    }
}

/// Envelope written by [`export_settings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsExport {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub settings: AppSettings,
}

/// Persisted settings, or the defaults when absent or unreadable.
pub fn load_settings<B: BackingStore>(backend: &B, keys: &StorageKeys) -> AppSettings {
    let key = keys.settings();
    match backend.get(&key) {
        Ok(Some(raw)) => codec::deserialize(&raw).unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "ignoring corrupt settings");
            AppSettings::default()
        }),
        Ok(None) => AppSettings::default(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "failed to read settings");
            AppSettings::default()
        }
    }
}

pub fn save_settings<B: BackingStore>(
    backend: &mut B,
    keys: &StorageKeys,
    settings: &AppSettings,
) -> Result<()> {
    backend.set(&keys.settings(), &codec::serialize(settings)?)
}

/// Merge `update` into the persisted settings and return the result.
pub fn update_settings<B: BackingStore>(
    backend: &mut B,
    keys: &StorageKeys,
    update: AppSettingsUpdate,
) -> Result<AppSettings> {
    let mut settings = load_settings(backend, keys);
    settings.apply(update);
    save_settings(backend, keys, &settings)?;
    Ok(settings)
}

/// Forget the persisted settings.
pub fn reset_settings<B: BackingStore>(backend: &mut B, keys: &StorageKeys) -> Result<AppSettings> {
    backend.remove(&keys.settings())?;
    Ok(AppSettings::default())
}

pub fn export_settings(settings: &AppSettings) -> Result<String> {
    let export = SettingsExport {
        version: SETTINGS_EXPORT_VERSION.to_string(),
        export_date: Utc::now(),
        settings: settings.clone(),
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Apply an export produced by [`export_settings`].
///
/// Sections present in the file replace the defaults; the rest are reset.
/// Returns `false`, leaving the stored settings untouched, when the text is
/// not JSON, has no `settings` object, or cannot be persisted.
pub fn import_settings<B: BackingStore>(backend: &mut B, keys: &StorageKeys, text: &str) -> bool {
    let parsed: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "settings import is not valid JSON");
            return false;
        }
    };
    let Some(section) = parsed.get("settings").filter(|s| s.is_object()) else {
        tracing::warn!("settings import has no settings object");
        return false;
    };
    let settings: AppSettings = match serde_json::from_value(section.clone()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "settings import has invalid fields");
            return false;
        }
    };

    match save_settings(backend, keys, &settings) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "failed to persist imported settings");
            false
        }
    }
}

/// Interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hu,
    De,
    Fr,
    Es,
    It,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Hu,
        Language::De,
        Language::Fr,
        Language::Es,
        Language::It,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hu => "hu",
            Language::De => "de",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::It => "it",
        }
    }

    /// The language's name for itself.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hu => "Magyar",
            Language::De => "Deutsch",
            Language::Fr => "Français",
            Language::Es => "Español",
            Language::It => "Italiano",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.code() == code)
            .ok_or_else(|| format!("Invalid language: {}", s))
    }
}

/// The stored language code, falling back to English for anything unknown.
pub fn load_language<B: BackingStore>(backend: &B, keys: &StorageKeys) -> Language {
    match backend.get(&keys.language()) {
        Ok(Some(code)) => code.parse().unwrap_or_else(|_| {
            tracing::warn!(code = %code, "unknown stored language");
            Language::default()
        }),
        Ok(None) => Language::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read language");
            Language::default()
        }
    }
}

/// Stored as the bare code, not JSON.
pub fn save_language<B: BackingStore>(
    backend: &mut B,
    keys: &StorageKeys,
    language: Language,
) -> Result<()> {
    backend.set(&keys.language(), language.code())
}
