use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CollectionKind, Entity};
use crate::store::Collections;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub tags: Vec<String>,
    /// PlanItem ids; not checked for existence.
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub linked_plans: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub linked_plans: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub linked_plans: Option<Vec<String>>,
}

impl Note {
    /// Tags with duplicates removed, first occurrence wins.
    pub fn display_tags(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            if !seen.contains(&tag.as_str()) {
                seen.push(tag);
            }
        }
        seen
    }
}

impl Entity for Note {
    type Draft = NoteDraft;
    type Update = NoteUpdate;

    const KIND: CollectionKind = CollectionKind::Notes;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, now: DateTime<Utc>, draft: NoteDraft) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            linked_plans: draft.linked_plans,
            created_at: now,
        }
    }

    fn apply(&mut self, update: NoteUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(linked_plans) = update.linked_plans {
            self.linked_plans = linked_plans;
        }
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.notes
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.notes
    }
}
