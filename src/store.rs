//! The data store: authoritative in-memory collections, kept in sync with a
//! backing store.
//!
//! Every successful mutation rewrites the whole affected collection to the
//! backing store before returning, so reopening the backing store always
//! reflects the last mutation. Write failures (for example a full quota) are
//! logged and kept for [`DataStore::take_persist_error`]; the in-memory change
//! stands either way.

use chrono::{NaiveDate, Utc};

use crate::entity::id::generate_unique_id;
use crate::entity::{
    BudgetSettings, BudgetSettingsUpdate, CollectionKind, Drawing, Entity, Goal, Note, PlanItem,
    Subscription, Transaction,
};
use crate::error::PlanbookError;
use crate::storage::{codec, BackingStore, StorageKeys};

/// The six live collections, each in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub notes: Vec<Note>,
    pub goals: Vec<Goal>,
    pub plans: Vec<PlanItem>,
    pub drawings: Vec<Drawing>,
    pub subscriptions: Vec<Subscription>,
    pub transactions: Vec<Transaction>,
}

impl Collections {
    pub fn len(&self, kind: CollectionKind) -> usize {
        match kind {
            CollectionKind::Notes => self.notes.len(),
            CollectionKind::Goals => self.goals.len(),
            CollectionKind::Plans => self.plans.len(),
            CollectionKind::Drawings => self.drawings.len(),
            CollectionKind::Subscriptions => self.subscriptions.len(),
            CollectionKind::Transactions => self.transactions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        CollectionKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }
}

/// What changed, delivered to listeners after each successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Added { kind: CollectionKind, id: String },
    Updated { kind: CollectionKind, id: String },
    Deleted { kind: CollectionKind, id: String },
    SettingsUpdated,
    Cleared,
}

pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&ChangeEvent)>;

/// A persisted value that could not be decoded at open time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub key: String,
    pub message: String,
}

pub struct DataStore<B: BackingStore> {
    backend: B,
    keys: StorageKeys,
    collections: Collections,
    budget_settings: BudgetSettings,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: ListenerId,
    load_failures: Vec<LoadFailure>,
    persist_error: Option<PlanbookError>,
}

impl<B: BackingStore> DataStore<B> {
    /// Open the store over `backend`, loading every collection it holds.
    ///
    /// Each key loads independently: a missing key gives an empty collection,
    /// and a corrupt one gives an empty collection plus a [`LoadFailure`].
    pub fn open(backend: B, keys: StorageKeys) -> Self {
        let mut store = Self {
            backend,
            keys,
            collections: Collections::default(),
            budget_settings: BudgetSettings::default(),
            listeners: Vec::new(),
            next_listener: 0,
            load_failures: Vec::new(),
            persist_error: None,
        };

        store.collections.notes = store.load_value(&store.keys.collection(Note::KIND));
        store.collections.goals = store.load_value(&store.keys.collection(Goal::KIND));
        store.collections.plans = store.load_value(&store.keys.collection(PlanItem::KIND));
        store.collections.drawings = store.load_value(&store.keys.collection(Drawing::KIND));
        store.collections.subscriptions =
            store.load_value(&store.keys.collection(Subscription::KIND));
        store.collections.transactions =
            store.load_value(&store.keys.collection(Transaction::KIND));
        store.budget_settings = store.load_value(&store.keys.budget_settings());

        store
    }

    fn load_value<T>(&mut self, key: &str) -> T
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read persisted value");
                self.load_failures.push(LoadFailure {
                    key: key.to_string(),
                    message: e.to_string(),
                });
                return T::default();
            }
        };

        match codec::deserialize(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding corrupt persisted value");
                self.load_failures.push(LoadFailure {
                    key: key.to_string(),
                    message: e.to_string(),
                });
                T::default()
            }
        }
    }

    pub fn load_failures(&self) -> &[LoadFailure] {
        &self.load_failures
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    // ========== Collections ==========

    pub fn list<E: Entity>(&self) -> &[E] {
        E::collection(&self.collections)
    }

    pub fn get<E: Entity>(&self, id: &str) -> Option<&E> {
        self.list::<E>().iter().find(|e| e.id() == id)
    }

    /// Create an entity with a fresh id (and creation time, where the type
    /// has one), append it and persist its collection.
    pub fn add<E: Entity>(&mut self, draft: E::Draft) -> E {
        let existing = E::collection(&self.collections);
        let id = generate_unique_id(|candidate| existing.iter().any(|e| e.id() == candidate));
        let entity = E::from_draft(id, Utc::now(), draft);

        E::collection_mut(&mut self.collections).push(entity.clone());
        tracing::debug!(kind = %E::KIND, id = entity.id(), "added entity");

        self.persist::<E>();
        self.notify(ChangeEvent::Added {
            kind: E::KIND,
            id: entity.id().to_string(),
        });
        entity
    }

    /// Shallow-merge `update` into the entity with `id`.
    ///
    /// Returns `false`, and does nothing else, when no such entity exists.
    pub fn update<E: Entity>(&mut self, id: &str, update: E::Update) -> bool {
        let items = E::collection_mut(&mut self.collections);
        let Some(index) = items.iter().position(|e| e.id() == id) else {
            tracing::debug!(kind = %E::KIND, id, "update of unknown id ignored");
            return false;
        };

        let mut updated = items[index].clone();
        updated.apply(update);
        items[index] = updated;

        self.persist::<E>();
        self.notify(ChangeEvent::Updated {
            kind: E::KIND,
            id: id.to_string(),
        });
        true
    }

    /// Remove the entity with `id`. Returns `false` if it was not present.
    ///
    /// Soft references to it (linked ids, `subscriptionId`) are left as they are.
    pub fn delete<E: Entity>(&mut self, id: &str) -> bool {
        let items = E::collection_mut(&mut self.collections);
        let before = items.len();
        items.retain(|e| e.id() != id);
        if items.len() == before {
            return false;
        }

        self.persist::<E>();
        self.notify(ChangeEvent::Deleted {
            kind: E::KIND,
            id: id.to_string(),
        });
        true
    }

    // ========== Budget settings ==========

    pub fn settings(&self) -> &BudgetSettings {
        &self.budget_settings
    }

    pub fn update_settings(&mut self, update: BudgetSettingsUpdate) {
        let mut settings = self.budget_settings.clone();
        settings.apply(update);
        self.budget_settings = settings;

        self.persist_settings();
        self.notify(ChangeEvent::SettingsUpdated);
    }

    /// Empty every collection, reset budget settings to their defaults and
    /// remove the persisted keys.
    pub fn clear_all(&mut self) {
        self.collections = Collections::default();
        self.budget_settings = BudgetSettings::default();

        for key in self.keys.data_keys() {
            if let Err(e) = self.backend.remove(&key) {
                tracing::error!(key = %key, error = %e, "failed to remove persisted key");
                self.persist_error = Some(e);
            }
        }
        tracing::debug!("cleared all collections");
        self.notify(ChangeEvent::Cleared);
    }

    // ========== Lookups ==========

    /// Plans dated within `from..=to`, in insertion order.
    pub fn plans_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&PlanItem> {
        self.collections
            .plans
            .iter()
            .filter(|p| p.date >= from && p.date <= to)
            .collect()
    }

    /// Notes a plan links to. Ids with no matching note are skipped.
    pub fn linked_notes(&self, plan: &PlanItem) -> Vec<&Note> {
        plan.linked_notes
            .iter()
            .filter_map(|id| self.get::<Note>(id))
            .collect()
    }

    /// Plans a note links to. Ids with no matching plan are skipped.
    pub fn linked_plans(&self, note: &Note) -> Vec<&PlanItem> {
        note.linked_plans
            .iter()
            .filter_map(|id| self.get::<PlanItem>(id))
            .collect()
    }

    /// The subscription a transaction refers to, if it still exists.
    pub fn subscription_for(&self, transaction: &Transaction) -> Option<&Subscription> {
        transaction
            .subscription_id
            .as_deref()
            .and_then(|id| self.get::<Subscription>(id))
    }

    // ========== Change notification ==========

    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: ChangeEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    // ========== Persistence ==========

    /// The most recent backing store write failure, if any, clearing it.
    pub fn take_persist_error(&mut self) -> Option<PlanbookError> {
        self.persist_error.take()
    }

    fn persist<E: Entity>(&mut self) {
        let key = self.keys.collection(E::KIND);
        let result = codec::serialize(E::collection(&self.collections))
            .and_then(|raw| self.backend.set(&key, &raw));
        self.record_write(&key, result);
    }

    fn persist_settings(&mut self) {
        let key = self.keys.budget_settings();
        let result = codec::serialize(&self.budget_settings)
            .and_then(|raw| self.backend.set(&key, &raw));
        self.record_write(&key, result);
    }

    fn record_write(&mut self, key: &str, result: crate::Result<()>) {
        match result {
            Ok(()) => tracing::debug!(key, "persisted"),
            Err(e) => {
                tracing::error!(key, error = %e, "failed to persist");
                self.persist_error = Some(e);
            }
        }
    }
}
