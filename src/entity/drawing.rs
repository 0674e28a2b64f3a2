use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CollectionKind, Entity};
use crate::store::Collections;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub id: String,
    pub title: String,
    /// Self-contained image payload, usually a `data:image/png;base64,...` URI.
    pub data: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct DrawingDraft {
    pub title: String,
    pub data: String,
}

#[derive(Debug, Clone, Default)]
pub struct DrawingUpdate {
    pub title: Option<String>,
    pub data: Option<String>,
}

impl Drawing {
    /// MIME type declared by a data URI payload, if any.
    pub fn media_type(&self) -> Option<&str> {
        let rest = self.data.strip_prefix("data:")?;
        let end = rest.find([';', ','])?;
        Some(&rest[..end]).filter(|m| !m.is_empty())
    }
}

impl Entity for Drawing {
    type Draft = DrawingDraft;
    type Update = DrawingUpdate;

    const KIND: CollectionKind = CollectionKind::Drawings;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, now: DateTime<Utc>, draft: DrawingDraft) -> Self {
        Self {
            id,
            title: draft.title,
            data: draft.data,
            created_at: now,
        }
    }

    fn apply(&mut self, update: DrawingUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(data) = update.data {
            self.data = data;
        }
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.drawings
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.drawings
    }
}
