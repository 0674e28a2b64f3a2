use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{CollectionKind, Entity};
use crate::store::Collections;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Paused,
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalStatus::NotStarted => write!(f, "not-started"),
            GoalStatus::InProgress => write!(f, "in-progress"),
            GoalStatus::Completed => write!(f, "completed"),
            GoalStatus::Paused => write!(f, "paused"),
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-started" => Ok(GoalStatus::NotStarted),
            "in-progress" => Ok(GoalStatus::InProgress),
            "completed" => Ok(GoalStatus::Completed),
            "paused" => Ok(GoalStatus::Paused),
            _ => Err(format!("Invalid goal status: {}", s)),
        }
    }
}

/// A goal with a target day and a percentage of progress.
///
/// `progress` and `status` are independent: the store accepts any
/// combination, including values outside 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub description: String,
    #[serde(with = "super::dates::calendar_day")]
    pub target_date: NaiveDate,
    /// A blank progress input was stored as `null`; that reads as 0.
    #[serde(default, deserialize_with = "super::lenient::percent")]
    pub progress: i32,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub target_date: NaiveDate,
    pub progress: i32,
    pub status: GoalStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub progress: Option<i32>,
    pub status: Option<GoalStatus>,
}

impl Goal {
    /// Build the update for a quick "+N%" / "-N%" step.
    ///
    /// Progress is clamped to 0..=100. Stepping up to 100 completes the goal
    /// and leaving 0 starts it; stepping back to 0 resets it to not-started and
    /// stepping back from completed reopens it. Nothing here is enforced by
    /// the store.
    pub fn progress_step(&self, delta: i32) -> GoalUpdate {
        let progress = self.progress.saturating_add(delta).clamp(0, 100);
        let status = if delta >= 0 {
            if progress == 100 {
                GoalStatus::Completed
            } else if progress > 0 && self.status == GoalStatus::NotStarted {
                GoalStatus::InProgress
            } else {
                self.status
            }
        } else if progress == 0 {
            GoalStatus::NotStarted
        } else if progress < 100 && self.status == GoalStatus::Completed {
            GoalStatus::InProgress
        } else {
            self.status
        };

        GoalUpdate {
            progress: Some(progress),
            status: Some(status),
            ..Default::default()
        }
    }

    /// Build the update that marks the goal done.
    pub fn complete(&self) -> GoalUpdate {
        GoalUpdate {
            progress: Some(100),
            status: Some(GoalStatus::Completed),
            ..Default::default()
        }
    }
}

impl Entity for Goal {
    type Draft = GoalDraft;
    type Update = GoalUpdate;

    const KIND: CollectionKind = CollectionKind::Goals;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, now: DateTime<Utc>, draft: GoalDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            target_date: draft.target_date,
            progress: draft.progress,
            status: draft.status,
            created_at: now,
        }
    }

    fn apply(&mut self, update: GoalUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(target_date) = update.target_date {
            self.target_date = target_date;
        }
        if let Some(progress) = update.progress {
            self.progress = progress;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.goals
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.goals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(progress: i32, status: GoalStatus) -> Goal {
        Goal::from_draft(
            "g00000001".to_string(),
            Utc::now(),
            GoalDraft {
                title: "Run a marathon".to_string(),
                description: String::new(),
                target_date: NaiveDate::from_ymd_opt(2025, 4, 20).unwrap(),
                progress,
                status,
            },
        )
    }

    #[test]
    fn test_step_up_starts_goal() {
        let update = goal(0, GoalStatus::NotStarted).progress_step(10);
        assert_eq!(update.progress, Some(10));
        assert_eq!(update.status, Some(GoalStatus::InProgress));
    }

    #[test]
    fn test_step_up_to_hundred_completes() {
        let update = goal(95, GoalStatus::Paused).progress_step(10);
        assert_eq!(update.progress, Some(100));
        assert_eq!(update.status, Some(GoalStatus::Completed));
    }

    #[test]
    fn test_step_up_keeps_paused() {
        let update = goal(30, GoalStatus::Paused).progress_step(10);
        assert_eq!(update.status, Some(GoalStatus::Paused));
    }

    #[test]
    fn test_step_back_reopens_and_resets() {
        let reopened = goal(100, GoalStatus::Completed).progress_step(-10);
        assert_eq!(reopened.progress, Some(90));
        assert_eq!(reopened.status, Some(GoalStatus::InProgress));

        let reset = goal(5, GoalStatus::InProgress).progress_step(-10);
        assert_eq!(reset.progress, Some(0));
        assert_eq!(reset.status, Some(GoalStatus::NotStarted));
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&GoalStatus::NotStarted).unwrap(),
            "\"not-started\""
        );
        assert_eq!("in-progress".parse::<GoalStatus>(), Ok(GoalStatus::InProgress));
        assert!("bogus".parse::<GoalStatus>().is_err());
    }
}
