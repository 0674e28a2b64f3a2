//! Field-level coercion of untrusted bundle entries into drafts.
//!
//! Each `*_draft` function returns `None` when a required field is missing,
//! empty, zero, or (for dates) unparsable. Everything else falls back to a
//! default.

use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::entity::dates::{self, parse_day_in, parse_timestamp};
use crate::entity::{
    BillingCycle, BudgetSettingsUpdate, DrawingDraft, GoalDraft, GoalStatus, NoteDraft,
    PlanDraft, Priority, SubscriptionDraft, TransactionDraft, TransactionType,
};

const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_CATEGORY: &str = "Other";
const DEFAULT_WARNING_THRESHOLD: i32 = 80;

/// Loose truthiness: null, false, 0, NaN and "" are false; everything else is true.
pub(crate) fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn non_empty_str(entry: &Value, field: &str) -> Option<String> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn str_or(entry: &Value, field: &str, default: &str) -> String {
    non_empty_str(entry, field).unwrap_or_else(|| default.to_string())
}

fn string_list(entry: &Value, field: &str) -> Vec<String> {
    entry
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn enum_or<T: FromStr>(entry: &Value, field: &str, default: T) -> T {
    entry
        .get(field)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// A non-zero amount, given as a number or a numeric string.
fn non_zero_number(entry: &Value, field: &str) -> Option<f64> {
    let n = match entry.get(field)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n != 0.0 && n.is_finite()).then_some(n)
}

fn timestamp(entry: &Value, field: &str) -> Option<DateTime<Utc>> {
    match entry.get(field)? {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn day(entry: &Value, field: &str) -> Option<NaiveDate> {
    day_in(entry, field, &Local)
}

fn day_in<Tz: TimeZone>(entry: &Value, field: &str, tz: &Tz) -> Option<NaiveDate> {
    match entry.get(field)? {
        Value::String(s) => parse_day_in(s, tz),
        Value::Number(_) => timestamp(entry, field).map(|ts| dates::day_in(ts, tz)),
        _ => None,
    }
}

pub(crate) fn note_draft(entry: &Value) -> Option<NoteDraft> {
    Some(NoteDraft {
        title: non_empty_str(entry, "title")?,
        content: non_empty_str(entry, "content")?,
        tags: string_list(entry, "tags"),
        linked_plans: string_list(entry, "linkedPlans"),
    })
}

pub(crate) fn goal_draft(entry: &Value) -> Option<GoalDraft> {
    let title = non_empty_str(entry, "title")?;
    let target_date = day(entry, "targetDate")?;
    let progress = entry
        .get("progress")
        .and_then(Value::as_f64)
        .map(|p| p.round() as i32)
        .unwrap_or(0);

    Some(GoalDraft {
        title,
        description: str_or(entry, "description", ""),
        target_date,
        progress,
        status: enum_or(entry, "status", GoalStatus::NotStarted),
    })
}

pub(crate) fn plan_draft(entry: &Value) -> Option<PlanDraft> {
    let title = non_empty_str(entry, "title")?;
    let date = day(entry, "date")?;

    Some(PlanDraft {
        title,
        description: str_or(entry, "description", ""),
        date,
        start_time: timestamp(entry, "startTime"),
        end_time: timestamp(entry, "endTime"),
        completed: truthy(entry.get("completed")),
        priority: enum_or(entry, "priority", Priority::Medium),
        linked_notes: string_list(entry, "linkedNotes"),
    })
}

pub(crate) fn drawing_draft(entry: &Value) -> Option<DrawingDraft> {
    Some(DrawingDraft {
        title: non_empty_str(entry, "title")?,
        data: non_empty_str(entry, "data")?,
    })
}

pub(crate) fn subscription_draft(entry: &Value) -> Option<SubscriptionDraft> {
    let name = non_empty_str(entry, "name")?;
    let cost = non_zero_number(entry, "cost")?;
    let next_payment = day(entry, "nextPayment")?;

    Some(SubscriptionDraft {
        name,
        description: str_or(entry, "description", ""),
        cost,
        currency: str_or(entry, "currency", DEFAULT_CURRENCY),
        billing_cycle: enum_or(entry, "billingCycle", BillingCycle::Monthly),
        next_payment,
        is_active: truthy(entry.get("isActive")),
        category: str_or(entry, "category", DEFAULT_CATEGORY),
    })
}

pub(crate) fn transaction_draft(entry: &Value) -> Option<TransactionDraft> {
    let amount = non_zero_number(entry, "amount")?;
    let description = non_empty_str(entry, "description")?;
    let date = day(entry, "date")?;

    Some(TransactionDraft {
        subscription_id: non_empty_str(entry, "subscriptionId"),
        amount,
        description,
        date,
        kind: enum_or(entry, "type", TransactionType::Expense),
        category: str_or(entry, "category", DEFAULT_CATEGORY),
    })
}

/// Every field is set: falsy or missing values fall back to the defaults.
pub(crate) fn budget_settings_update(entry: &Value) -> BudgetSettingsUpdate {
    BudgetSettingsUpdate {
        monthly_budget: Some(non_zero_number(entry, "monthlyBudget").unwrap_or(0.0)),
        currency: Some(str_or(entry, "currency", DEFAULT_CURRENCY)),
        notifications: Some(truthy(entry.get("notifications"))),
        warning_threshold: Some(
            non_zero_number(entry, "warningThreshold")
                .map(|t| t.round() as i32)
                .unwrap_or(DEFAULT_WARNING_THRESHOLD),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::json;

    #[test]
    fn test_truthy() {
        assert!(!truthy(None));
        assert!(!truthy(Some(&json!(null))));
        assert!(!truthy(Some(&json!(0))));
        assert!(!truthy(Some(&json!(""))));
        assert!(!truthy(Some(&json!(false))));
        assert!(truthy(Some(&json!("no"))));
        assert!(truthy(Some(&json!(1))));
        assert!(truthy(Some(&json!([]))));
    }

    #[test]
    fn test_note_requires_title_and_content() {
        assert!(note_draft(&json!({"content": "x"})).is_none());
        assert!(note_draft(&json!({"title": "x", "content": ""})).is_none());
        assert!(note_draft(&json!({"title": 5, "content": "x"})).is_none());

        let draft = note_draft(&json!({
            "title": "t", "content": "c", "tags": "oops", "linkedPlans": ["p1", 7]
        }))
        .unwrap();
        assert!(draft.tags.is_empty());
        assert_eq!(draft.linked_plans, vec!["p1".to_string()]);
    }

    #[test]
    fn test_goal_defaults() {
        let draft = goal_draft(&json!({
            "title": "Ship", "targetDate": "2024-09-01T12:00:00.000Z",
            "status": "bogus", "progress": "50"
        }))
        .unwrap();
        assert_eq!(draft.status, GoalStatus::NotStarted);
        assert_eq!(draft.progress, 0);
        assert_eq!(draft.description, "");
        assert_eq!(draft.target_date, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
    }

    #[test]
    fn test_timestamp_days_are_read_in_the_given_zone() {
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let entry = json!({
            "targetDate": "2024-06-01T22:00:00.000Z",
            "date": 1717279200000i64,
            "nextPayment": "2024-06-01",
        });
        let june_2 = NaiveDate::from_ymd_opt(2024, 6, 2);
        assert_eq!(day_in(&entry, "targetDate", &east), june_2);
        assert_eq!(day_in(&entry, "date", &east), june_2);
        assert_eq!(day_in(&entry, "nextPayment", &east), NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(day_in(&entry, "date", &Utc), NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn test_goal_unparsable_date_is_missing() {
        assert!(goal_draft(&json!({"title": "Ship", "targetDate": "whenever"})).is_none());
    }

    #[test]
    fn test_plan_defaults() {
        let draft = plan_draft(&json!({
            "title": "Gym", "date": "2024-06-02", "priority": "urgent",
            "startTime": "garbage", "endTime": 1717322400000i64, "completed": 1
        }))
        .unwrap();
        assert_eq!(draft.priority, Priority::Medium);
        assert!(draft.linked_notes.is_empty());
        assert!(draft.start_time.is_none());
        assert_eq!(
            draft.end_time,
            DateTime::from_timestamp_millis(1_717_322_400_000)
        );
        assert!(draft.completed);
    }

    #[test]
    fn test_subscription_requires_non_zero_cost() {
        let base = json!({"name": "Free tier", "cost": 0, "nextPayment": "2024-07-01"});
        assert!(subscription_draft(&base).is_none());

        let draft = subscription_draft(&json!({
            "name": "Pro", "cost": "9.5", "nextPayment": "2024-07-01", "billingCycle": "hourly"
        }))
        .unwrap();
        assert_eq!(draft.cost, 9.5);
        assert_eq!(draft.billing_cycle, BillingCycle::Monthly);
        assert_eq!(draft.currency, "USD");
        assert_eq!(draft.category, "Other");
        assert!(!draft.is_active);
    }

    #[test]
    fn test_transaction_keeps_subscription_reference() {
        let draft = transaction_draft(&json!({
            "amount": 4.2, "description": "Coffee", "date": "2024-06-03",
            "type": "subscription", "subscriptionId": "s00000001"
        }))
        .unwrap();
        assert_eq!(draft.kind, TransactionType::Subscription);
        assert_eq!(draft.subscription_id.as_deref(), Some("s00000001"));

        assert!(transaction_draft(&json!({"amount": 4.2, "date": "2024-06-03"})).is_none());
    }

    #[test]
    fn test_budget_settings_falsy_fields_default() {
        let update = budget_settings_update(&json!({
            "monthlyBudget": 0, "currency": "", "warningThreshold": 0
        }));
        assert_eq!(update.monthly_budget, Some(0.0));
        assert_eq!(update.currency.as_deref(), Some("USD"));
        assert_eq!(update.notifications, Some(false));
        assert_eq!(update.warning_threshold, Some(80));
    }
}
