mod budget;
pub mod dates;
mod drawing;
mod goal;
pub mod id;
mod invoice;
mod lenient;
mod note;
mod plan;
mod subscription;
mod transaction;

pub use budget::{BudgetSettings, BudgetSettingsUpdate};
pub use drawing::{Drawing, DrawingDraft, DrawingUpdate};
pub use goal::{Goal, GoalDraft, GoalStatus, GoalUpdate};
pub use invoice::{Client, Invoice, InvoiceItem, InvoiceStatus};
pub use note::{Note, NoteDraft, NoteUpdate};
pub use plan::{PlanDraft, PlanItem, PlanUpdate, Priority};
pub use subscription::{BillingCycle, Subscription, SubscriptionDraft, SubscriptionUpdate};
pub use transaction::{Transaction, TransactionDraft, TransactionType, TransactionUpdate};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::store::Collections;

/// The live collections held by the data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Notes,
    Goals,
    Plans,
    Drawings,
    Subscriptions,
    Transactions,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 6] = [
        CollectionKind::Notes,
        CollectionKind::Goals,
        CollectionKind::Plans,
        CollectionKind::Drawings,
        CollectionKind::Subscriptions,
        CollectionKind::Transactions,
    ];

    /// Name used for the persisted key suffix and the bundle `data` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Notes => "notes",
            CollectionKind::Goals => "goals",
            CollectionKind::Plans => "plans",
            CollectionKind::Drawings => "drawings",
            CollectionKind::Subscriptions => "subscriptions",
            CollectionKind::Transactions => "transactions",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            CollectionKind::Notes => "note",
            CollectionKind::Goals => "goal",
            CollectionKind::Plans => "plan",
            CollectionKind::Drawings => "drawing",
            CollectionKind::Subscriptions => "subscription",
            CollectionKind::Transactions => "transaction",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CollectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "note" | "notes" => Ok(CollectionKind::Notes),
            "goal" | "goals" => Ok(CollectionKind::Goals),
            "plan" | "plans" | "task" | "tasks" => Ok(CollectionKind::Plans),
            "drawing" | "drawings" => Ok(CollectionKind::Drawings),
            "subscription" | "subscriptions" => Ok(CollectionKind::Subscriptions),
            "transaction" | "transactions" => Ok(CollectionKind::Transactions),
            _ => Err(format!("Invalid entity type: {}", s)),
        }
    }
}

/// A record stored in one of the data store's collections.
///
/// `Draft` is the caller-supplied part of a new record (everything except the
/// generated id and creation timestamp). `Update` carries the optional fields
/// of a shallow merge.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    type Draft;
    type Update;

    const KIND: CollectionKind;

    fn id(&self) -> &str;

    fn from_draft(id: String, now: DateTime<Utc>, draft: Self::Draft) -> Self;

    /// Overwrite the fields present in `update`, leaving the rest untouched.
    fn apply(&mut self, update: Self::Update);

    fn collection(collections: &Collections) -> &Vec<Self>;

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self>;
}
