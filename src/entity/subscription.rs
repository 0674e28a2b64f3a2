use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{CollectionKind, Entity};
use crate::store::Collections;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Yearly,
    Weekly,
    Daily,
    OneTime,
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingCycle::Monthly => write!(f, "monthly"),
            BillingCycle::Yearly => write!(f, "yearly"),
            BillingCycle::Weekly => write!(f, "weekly"),
            BillingCycle::Daily => write!(f, "daily"),
            BillingCycle::OneTime => write!(f, "one-time"),
        }
    }
}

impl std::str::FromStr for BillingCycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            "weekly" => Ok(BillingCycle::Weekly),
            "daily" => Ok(BillingCycle::Daily),
            "one-time" => Ok(BillingCycle::OneTime),
            _ => Err(format!("Invalid billing cycle: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub cost: f64,
    #[serde(
        default = "super::lenient::default_currency",
        deserialize_with = "super::lenient::currency"
    )]
    pub currency: String,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub billing_cycle: BillingCycle,
    #[serde(with = "super::dates::calendar_day")]
    pub next_payment: NaiveDate,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub is_active: bool,
    #[serde(
        default = "super::lenient::default_category",
        deserialize_with = "super::lenient::category"
    )]
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SubscriptionDraft {
    pub name: String,
    pub description: String,
    pub cost: f64,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    pub next_payment: NaiveDate,
    pub is_active: bool,
    pub category: String,
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cost: Option<f64>,
    pub currency: Option<String>,
    pub billing_cycle: Option<BillingCycle>,
    pub next_payment: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub category: Option<String>,
}

impl Subscription {
    /// Cost normalised to one month; one-time charges contribute nothing.
    pub fn monthly_cost(&self) -> f64 {
        match self.billing_cycle {
            BillingCycle::Monthly => self.cost,
            BillingCycle::Yearly => self.cost / 12.0,
            BillingCycle::Weekly => self.cost * 52.0 / 12.0,
            BillingCycle::Daily => self.cost * 365.0 / 12.0,
            BillingCycle::OneTime => 0.0,
        }
    }
}

impl Entity for Subscription {
    type Draft = SubscriptionDraft;
    type Update = SubscriptionUpdate;

    const KIND: CollectionKind = CollectionKind::Subscriptions;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, now: DateTime<Utc>, draft: SubscriptionDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            cost: draft.cost,
            currency: draft.currency,
            billing_cycle: draft.billing_cycle,
            next_payment: draft.next_payment,
            is_active: draft.is_active,
            category: draft.category,
            created_at: now,
        }
    }

    fn apply(&mut self, update: SubscriptionUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(cost) = update.cost {
            self.cost = cost;
        }
        if let Some(currency) = update.currency {
            self.currency = currency;
        }
        if let Some(billing_cycle) = update.billing_cycle {
            self.billing_cycle = billing_cycle;
        }
        if let Some(next_payment) = update.next_payment {
            self.next_payment = next_payment;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.subscriptions
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.subscriptions
    }
}
