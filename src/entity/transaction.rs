use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{CollectionKind, Entity};
use crate::store::Collections;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
    Subscription,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
            TransactionType::Subscription => write!(f, "subscription"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "subscription" => Ok(TransactionType::Subscription),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Weak reference to a Subscription; may dangle after the subscription is deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub amount: f64,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub description: String,
    #[serde(with = "super::dates::calendar_day")]
    pub date: NaiveDate,
    #[serde(rename = "type", default, deserialize_with = "super::lenient::null_as_default")]
    pub kind: TransactionType,
    #[serde(
        default = "super::lenient::default_category",
        deserialize_with = "super::lenient::category"
    )]
    pub category: String,
}

#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub subscription_id: Option<String>,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub category: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub subscription_id: Option<Option<String>>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
}

impl Transaction {
    /// Amount with the sign of its effect on the balance.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense | TransactionType::Subscription => -self.amount,
        }
    }
}

impl Entity for Transaction {
    type Draft = TransactionDraft;
    type Update = TransactionUpdate;

    const KIND: CollectionKind = CollectionKind::Transactions;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, _now: DateTime<Utc>, draft: TransactionDraft) -> Self {
        Self {
            id,
            subscription_id: draft.subscription_id,
            amount: draft.amount,
            description: draft.description,
            date: draft.date,
            kind: draft.kind,
            category: draft.category,
        }
    }

    fn apply(&mut self, update: TransactionUpdate) {
        if let Some(subscription_id) = update.subscription_id {
            self.subscription_id = subscription_id;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.transactions
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.transactions
    }
}
