use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{CollectionKind, Entity};
use crate::store::Collections;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

/// A scheduled item on a calendar day, optionally with a time span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub description: String,
    #[serde(with = "super::dates::calendar_day")]
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub completed: bool,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub priority: Priority,
    /// Note ids; not checked for existence.
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub linked_notes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PlanDraft {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub completed: bool,
    pub priority: Priority,
    pub linked_notes: Vec<String>,
}

impl PlanDraft {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            date,
            start_time: None,
            end_time: None,
            completed: false,
            priority: Priority::default(),
            linked_notes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<Option<DateTime<Utc>>>, // Some(None) to clear
    pub end_time: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub linked_notes: Option<Vec<String>>,
}

impl Entity for PlanItem {
    type Draft = PlanDraft;
    type Update = PlanUpdate;

    const KIND: CollectionKind = CollectionKind::Plans;

    fn id(&self) -> &str {
        &self.id
    }

    // Plan items carry no creation timestamp.
    fn from_draft(id: String, _now: DateTime<Utc>, draft: PlanDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            completed: draft.completed,
            priority: draft.priority,
            linked_notes: draft.linked_notes,
        }
    }

    fn apply(&mut self, update: PlanUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(start_time) = update.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = update.end_time {
            self.end_time = end_time;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(linked_notes) = update.linked_notes {
            self.linked_notes = linked_notes;
        }
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.plans
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.plans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_clears_start_time() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut draft = PlanDraft::new("Standup", day);
        draft.start_time = day.and_hms_opt(9, 0, 0).map(|t| t.and_utc());
        let mut plan = PlanItem::from_draft("p00000001".into(), Utc::now(), draft);
        assert!(plan.start_time.is_some());

        plan.apply(PlanUpdate {
            start_time: Some(None),
            ..Default::default()
        });
        assert!(plan.start_time.is_none());
        assert_eq!(plan.title, "Standup");
    }

    #[test]
    fn test_priority_orders_low_to_high() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }
}
