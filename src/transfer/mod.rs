//! Bundle export and import.
//!
//! A bundle is a JSON document carrying some or all collections:
//!
//! ```json
//! { "version": "1.0", "exportDate": "...", "exportType": "all",
//!   "data": { "notes": [...], "budgetSettings": {...} },
//!   "stats": { "totalNotes": 3 } }
//! ```
//!
//! Imports treat the bundle as untrusted. Only the presence of a `data` object
//! is checked up front; after that every entry is coerced field by field and
//! entries missing required fields are dropped.

mod coerce;
mod export;
mod import;

pub use export::{export_bundle, export_json, suggested_file_name};
pub use import::{import_bundle, import_json};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{BudgetSettings, Drawing, Goal, Note, PlanItem, Subscription, Transaction};

pub const BUNDLE_VERSION: &str = "1.0";

/// Which collections an export carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    #[default]
    All,
    /// Notes, goals, plans and drawings.
    Tasks,
    /// Subscriptions, transactions and budget settings.
    Budget,
}

impl ExportScope {
    pub fn includes_tasks(&self) -> bool {
        matches!(self, ExportScope::All | ExportScope::Tasks)
    }

    pub fn includes_budget(&self) -> bool {
        matches!(self, ExportScope::All | ExportScope::Budget)
    }
}

impl std::fmt::Display for ExportScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportScope::All => write!(f, "all"),
            ExportScope::Tasks => write!(f, "tasks"),
            ExportScope::Budget => write!(f, "budget"),
        }
    }
}

impl std::str::FromStr for ExportScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ExportScope::All),
            "tasks" | "tasks-only" => Ok(ExportScope::Tasks),
            "budget" | "budget-only" => Ok(ExportScope::Budget),
            _ => Err(format!("Invalid export scope: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Add imported entries next to the existing ones.
    #[default]
    Merge,
    /// Clear everything first.
    Replace,
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportMode::Merge => write!(f, "merge"),
            ImportMode::Replace => write!(f, "replace"),
        }
    }
}

impl std::str::FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(ImportMode::Merge),
            "replace" => Ok(ImportMode::Replace),
            _ => Err(format!("Invalid import mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub export_type: ExportScope,
    pub data: BundleData,
    pub stats: BundleStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Note>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<Goal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plans: Option<Vec<PlanItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawings: Option<Vec<Drawing>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriptions: Option<Vec<Subscription>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_settings: Option<BudgetSettings>,
}

/// Per-collection counts for the exported collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_notes: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_goals: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_plans: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_drawings: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_subscriptions: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_transactions: Option<usize>,
}

/// Result of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Accepted entries, plus one if budget settings were applied.
    pub imported: usize,
    pub mode: ImportMode,
}

impl ImportOutcome {
    pub fn message(&self) -> String {
        let tail = match self.mode {
            ImportMode::Replace => "All previous data was replaced.",
            ImportMode::Merge => "New items added to existing data.",
        };
        format!("Successfully imported {} items! {}", self.imported, tail)
    }
}
