//! Invoicing types. Not held by the data store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: String,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub client_id: String,
    pub items: Vec<InvoiceItem>,
    pub subtotal: f64,
    /// Percent, e.g. 27.0
    pub tax_rate: f64,
    pub tax: f64,
    pub total: f64,
    pub status: InvoiceStatus,
    #[serde(with = "super::dates::calendar_day")]
    pub issue_date: NaiveDate,
    #[serde(with = "super::dates::calendar_day")]
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Recompute line totals, subtotal, tax and total from the items.
    pub fn recompute_totals(&mut self) {
        for item in &mut self.items {
            item.total = item.quantity * item.unit_price;
        }
        self.subtotal = self.items.iter().map(|i| i.total).sum();
        self.tax = self.subtotal * self.tax_rate / 100.0;
        self.total = self.subtotal + self.tax;
    }
}
