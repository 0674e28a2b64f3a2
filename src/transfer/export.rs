use chrono::{NaiveDate, Utc};

use super::{Bundle, BundleData, BundleStats, ExportScope, BUNDLE_VERSION};
use crate::error::Result;
use crate::storage::BackingStore;
use crate::store::DataStore;

/// Snapshot the collections selected by `scope`.
pub fn export_bundle<B: BackingStore>(store: &DataStore<B>, scope: ExportScope) -> Bundle {
    let collections = store.collections();
    let mut data = BundleData::default();
    let mut stats = BundleStats::default();

    if scope.includes_tasks() {
        stats.total_notes = Some(collections.notes.len());
        stats.total_goals = Some(collections.goals.len());
        stats.total_plans = Some(collections.plans.len());
        stats.total_drawings = Some(collections.drawings.len());
        data.notes = Some(collections.notes.clone());
        data.goals = Some(collections.goals.clone());
        data.plans = Some(collections.plans.clone());
        data.drawings = Some(collections.drawings.clone());
    }

    if scope.includes_budget() {
        stats.total_subscriptions = Some(collections.subscriptions.len());
        stats.total_transactions = Some(collections.transactions.len());
        data.subscriptions = Some(collections.subscriptions.clone());
        data.transactions = Some(collections.transactions.clone());
        data.budget_settings = Some(store.settings().clone());
    }

    Bundle {
        version: BUNDLE_VERSION.to_string(),
        export_date: Utc::now(),
        export_type: scope,
        data,
        stats,
    }
}

/// Export as pretty-printed JSON, ready to write to a file.
pub fn export_json<B: BackingStore>(store: &DataStore<B>, scope: ExportScope) -> Result<String> {
    let bundle = export_bundle(store, scope);
    tracing::info!(scope = %scope, "exported bundle");
    Ok(serde_json::to_string_pretty(&bundle)?)
}

pub fn suggested_file_name(scope: ExportScope, date: NaiveDate) -> String {
    format!("planbook-{}-export-{}.json", scope, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{
        BillingCycle, BudgetSettingsUpdate, Note, NoteDraft, PlanDraft, PlanItem, Subscription,
        SubscriptionDraft,
    };
    use crate::storage::{MemoryStorage, StorageKeys};

    fn populated() -> DataStore<MemoryStorage> {
        let mut store = DataStore::open(MemoryStorage::new(), StorageKeys::default());
        store.add::<Note>(NoteDraft {
            title: "Note".into(),
            content: "Body".into(),
            ..Default::default()
        });
        store.add::<PlanItem>(PlanDraft::new(
            "Plan",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        ));
        store.add::<Subscription>(SubscriptionDraft {
            name: "Video".into(),
            description: String::new(),
            cost: 12.0,
            currency: "USD".into(),
            billing_cycle: BillingCycle::Monthly,
            next_payment: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
            is_active: true,
            category: "Entertainment".into(),
        });
        store.update_settings(BudgetSettingsUpdate {
            monthly_budget: Some(800.0),
            ..Default::default()
        });
        store
    }

    #[test]
    fn test_export_all() {
        let bundle = export_bundle(&populated(), ExportScope::All);
        assert_eq!(bundle.version, "1.0");
        assert_eq!(bundle.export_type, ExportScope::All);
        assert_eq!(bundle.stats.total_notes, Some(1));
        assert_eq!(bundle.stats.total_plans, Some(1));
        assert_eq!(bundle.stats.total_subscriptions, Some(1));
        assert_eq!(bundle.stats.total_transactions, Some(0));
        assert_eq!(
            bundle.data.budget_settings.map(|s| s.monthly_budget),
            Some(800.0)
        );
    }

    #[test]
    fn test_export_tasks_only() {
        let bundle = export_bundle(&populated(), ExportScope::Tasks);
        assert!(bundle.data.notes.is_some());
        assert!(bundle.data.drawings.is_some());
        assert!(bundle.data.subscriptions.is_none());
        assert!(bundle.data.budget_settings.is_none());
        assert_eq!(bundle.stats.total_subscriptions, None);
    }

    #[test]
    fn test_export_budget_json_shape() {
        let json = export_json(&populated(), ExportScope::Budget).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["exportType"], "budget");
        assert!(value["exportDate"].is_string());
        assert!(value["data"].get("notes").is_none());
        assert_eq!(value["data"]["subscriptions"][0]["billingCycle"], "monthly");
        assert_eq!(value["data"]["subscriptions"][0]["nextPayment"], "2024-06-20");
        assert_eq!(value["data"]["budgetSettings"]["monthlyBudget"], 800.0);
        assert_eq!(value["stats"]["totalSubscriptions"], 1);
        assert!(value["stats"].get("totalNotes").is_none());
    }

    #[test]
    fn test_suggested_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            suggested_file_name(ExportScope::Tasks, date),
            "planbook-tasks-export-2024-06-01.json"
        );
    }
}
