use serde_json::Value;

use super::coerce;
use super::{ImportMode, ImportOutcome};
use crate::entity::{Drawing, Entity, Goal, Note, PlanItem, Subscription, Transaction};
use crate::error::{PlanbookError, Result};
use crate::storage::BackingStore;
use crate::store::DataStore;

/// Parse `text` as a bundle and import it.
///
/// Nothing in the store changes unless the text parses and carries a `data`
/// object.
pub fn import_json<B: BackingStore>(
    store: &mut DataStore<B>,
    text: &str,
    mode: ImportMode,
) -> Result<ImportOutcome> {
    if text.trim().is_empty() {
        return Err(PlanbookError::InvalidImport(
            "Please paste JSON data to import".to_string(),
        ));
    }

    let bundle: Value = serde_json::from_str(text)
        .map_err(|e| PlanbookError::InvalidImport(format!("Invalid JSON: {}", e)))?;

    import_bundle(store, &bundle, mode)
}

/// Import an already-parsed bundle.
pub fn import_bundle<B: BackingStore>(
    store: &mut DataStore<B>,
    bundle: &Value,
    mode: ImportMode,
) -> Result<ImportOutcome> {
    let Some(data) = bundle.get("data").filter(|d| d.is_object()) else {
        return Err(PlanbookError::InvalidImport(
            "Invalid JSON format. Missing data object.".to_string(),
        ));
    };

    if mode == ImportMode::Replace {
        store.clear_all();
    }

    let mut imported = 0;
    imported += import_each::<B, Note>(store, data.get("notes"), coerce::note_draft);
    imported += import_each::<B, Goal>(store, data.get("goals"), coerce::goal_draft);
    imported += import_each::<B, PlanItem>(store, data.get("plans"), coerce::plan_draft);
    imported += import_each::<B, Drawing>(store, data.get("drawings"), coerce::drawing_draft);
    imported += import_each::<B, Subscription>(
        store,
        data.get("subscriptions"),
        coerce::subscription_draft,
    );
    imported += import_each::<B, Transaction>(
        store,
        data.get("transactions"),
        coerce::transaction_draft,
    );

    if let Some(settings) = data.get("budgetSettings").filter(|s| s.is_object()) {
        store.update_settings(coerce::budget_settings_update(settings));
        imported += 1;
    }

    tracing::info!(imported, mode = %mode, "imported bundle");
    Ok(ImportOutcome { imported, mode })
}

/// Add every entry of `entries` that coerces to a draft. Entries always get
/// fresh ids; ids carried in the bundle are ignored.
fn import_each<B, E>(
    store: &mut DataStore<B>,
    entries: Option<&Value>,
    coerce: fn(&Value) -> Option<E::Draft>,
) -> usize
where
    B: BackingStore,
    E: Entity,
{
    let Some(entries) = entries.and_then(Value::as_array) else {
        return 0;
    };

    let mut accepted = 0;
    for entry in entries {
        match coerce(entry) {
            Some(draft) => {
                store.add::<E>(draft);
                accepted += 1;
            }
            None => tracing::warn!(kind = %E::KIND, "skipped entry missing required fields"),
        }
    }
    accepted
}
