use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, Utc};

use crate::config::{find_project_root, Project};
use crate::entity::dates::{parse_day, parse_timestamp};
use crate::entity::{
    BudgetSettingsUpdate, CollectionKind, Drawing, DrawingDraft, DrawingUpdate, Entity, Goal,
    GoalDraft, GoalStatus, GoalUpdate, Note, NoteDraft, NoteUpdate, PlanDraft, PlanItem,
    PlanUpdate, Subscription, SubscriptionDraft, SubscriptionUpdate, Transaction,
    TransactionDraft, TransactionType, TransactionUpdate,
};
use crate::error::{PlanbookError, Result};
use crate::pomodoro;
use crate::preferences::{self, AppSettings, AppSettingsUpdate, Language};
use crate::storage::{BackingStore, SqliteStorage};
use crate::store::DataStore;
use crate::transfer::{self, ExportScope, ImportMode};

use super::commands::SettingsAction;

/// Open the project enclosing the working directory.
fn open_project() -> Result<Project> {
    let cwd = env::current_dir()?;
    let root = find_project_root(&cwd).unwrap_or(cwd);
    Project::open(&root)
}

fn open_store() -> Result<DataStore<SqliteStorage>> {
    open_project()?.open_store()
}

/// Turn a failed write from the last mutation into an error.
fn check_persisted<B: BackingStore>(store: &mut DataStore<B>) -> Result<()> {
    match store.take_persist_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn invalid(field: &str, value: &str) -> PlanbookError {
    PlanbookError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn parse_date_arg(field: &str, value: &str) -> Result<NaiveDate> {
    parse_day(value).ok_or_else(|| invalid(field, value))
}

/// `HH:MM` on `day`, or a full timestamp.
fn parse_time_arg(field: &str, value: &str, day: NaiveDate) -> Result<DateTime<Utc>> {
    if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M") {
        return Ok(day.and_time(time).and_utc());
    }
    parse_timestamp(value).ok_or_else(|| invalid(field, value))
}

fn parse_arg<T: FromStr>(field: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| invalid(field, value))
}

fn parse_kind(entity_type: &str) -> Result<CollectionKind> {
    entity_type
        .parse()
        .map_err(|_| PlanbookError::InvalidEntityType(entity_type.to_string()))
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    Ok(content)
}

fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        read_stdin()
    } else {
        Ok(fs::read_to_string(file)?)
    }
}

/// Ask on stderr; refuse outright when stdin is not a terminal.
fn confirm(prompt: &str, action: &str) -> Result<bool> {
    eprintln!("{} [y/N] ", prompt);

    if atty::is(atty::Stream::Stdin) {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().eq_ignore_ascii_case("y"))
    } else {
        Err(PlanbookError::ConfirmationRequired(action.to_string()))
    }
}

fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Find an entry by exact id, or by a prefix matching exactly one entry.
fn resolve<'a, E: Entity, B: BackingStore>(store: &'a DataStore<B>, id: &str) -> Result<&'a E> {
    if let Some(entry) = store.get::<E>(id) {
        return Ok(entry);
    }

    let mut matches = store
        .list::<E>()
        .iter()
        .filter(|e| !id.is_empty() && e.id().starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(entry), None) => Ok(entry),
        (Some(_), Some(_)) => Err(invalid(
            "id",
            &format!("{} matches more than one {}", id, E::KIND.singular()),
        )),
        _ => Err(PlanbookError::EntityNotFound(format!(
            "{} {}",
            E::KIND.singular(),
            id
        ))),
    }
}

// ========== Display ==========

/// One-line and detailed renderings for terminal output.
trait Summary {
    fn summary(&self) -> String;

    fn details(&self) -> Vec<String> {
        Vec::new()
    }
}

impl Summary for Note {
    fn summary(&self) -> String {
        let tags = self.display_tags();
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" #{}", tags.join(" #"))
        };
        format!("({}) {}{}", self.id, self.title, tags)
    }

    fn details(&self) -> Vec<String> {
        self.content.lines().map(str::to_string).collect()
    }
}

impl Summary for Goal {
    fn summary(&self) -> String {
        format!(
            "({}) [{}|{}%] {} due:{}",
            self.id, self.status, self.progress, self.title, self.target_date
        )
    }

    fn details(&self) -> Vec<String> {
        if self.description.is_empty() {
            Vec::new()
        } else {
            vec![self.description.clone()]
        }
    }
}

impl Summary for PlanItem {
    fn summary(&self) -> String {
        let check = if self.completed { "x" } else { " " };
        let time = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => format!(" {}-{}", start.format("%H:%M"), end.format("%H:%M")),
            (Some(start), None) => format!(" {}", start.format("%H:%M")),
            _ => String::new(),
        };
        format!(
            "({}) [{}] [{}] {}{} {}",
            self.id, check, self.priority, self.date, time, self.title
        )
    }

    fn details(&self) -> Vec<String> {
        if self.description.is_empty() {
            Vec::new()
        } else {
            vec![self.description.clone()]
        }
    }
}

impl Summary for Drawing {
    fn summary(&self) -> String {
        format!(
            "({}) {} [{}]",
            self.id,
            self.title,
            self.media_type().unwrap_or("unknown")
        )
    }

    fn details(&self) -> Vec<String> {
        vec![format!("{} bytes of image data", self.data.len())]
    }
}

impl Summary for Subscription {
    fn summary(&self) -> String {
        let state = if self.is_active { "active" } else { "paused" };
        format!(
            "({}) [{}] {} {:.2} {}/{} next:{}",
            self.id, state, self.name, self.cost, self.currency, self.billing_cycle, self.next_payment
        )
    }

    fn details(&self) -> Vec<String> {
        vec![
            format!("category: {}", self.category),
            format!("per month: {:.2} {}", self.monthly_cost(), self.currency),
        ]
    }
}

impl Summary for Transaction {
    fn summary(&self) -> String {
        format!(
            "({}) {} {:+.2} [{}] {} ({})",
            self.id,
            self.date,
            self.signed_amount(),
            self.kind,
            self.description,
            self.category
        )
    }
}

fn print_collection<E: Entity + Summary>(items: &[E], json: bool) -> Result<()> {
    let label = E::KIND.as_str();
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else if items.is_empty() {
        println!("No {} found.", label);
    } else {
        println!("{}:\n", capitalized(label));
        for item in items {
            println!("  {}", item.summary());
        }
    }
    Ok(())
}

fn print_entry<E: Entity + Summary>(entry: &E, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        println!("{} {}", capitalized(E::KIND.singular()), entry.summary());
        for line in entry.details() {
            println!("    {}", line);
        }
    }
    Ok(())
}

fn print_created<E: Entity + Summary>(entry: &E, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        println!("Created {} {}", E::KIND.singular(), entry.summary());
    }
    Ok(())
}

fn add_entry<E: Entity + Summary>(draft: E::Draft, json: bool) -> Result<()> {
    let mut store = open_store()?;
    let entry = store.add::<E>(draft);
    check_persisted(&mut store)?;
    print_created(&entry, json)
}

/// Apply `update` to the entry with `id`, persist, and print the result.
fn finish_update<E: Entity + Summary>(
    store: &mut DataStore<SqliteStorage>,
    id: &str,
    update: E::Update,
    json: bool,
) -> Result<()> {
    store.update::<E>(id, update);
    check_persisted(store)?;

    let updated = store.get::<E>(id).ok_or_else(|| {
        PlanbookError::Storage(format!("Failed to retrieve updated {}", E::KIND.singular()))
    })?;
    if json {
        println!("{}", serde_json::to_string_pretty(updated)?);
    } else {
        println!("Updated {} {}", E::KIND.singular(), updated.summary());
    }
    Ok(())
}

/// Resolve a subscription reference, keeping ids that match nothing as given.
fn subscription_ref<B: BackingStore>(store: &DataStore<B>, id: String) -> String {
    match resolve::<Subscription, _>(store, &id) {
        Ok(found) => found.id.clone(),
        Err(_) => {
            tracing::warn!(id = %id, "transaction refers to an unknown subscription");
            id
        }
    }
}

// ========== Commands ==========

pub fn handle_init() -> Result<()> {
    let project = Project::init(&env::current_dir()?)?;
    println!("Initialized planbook in {}", project.root().display());
    Ok(())
}

pub fn handle_add_note(
    title: String,
    content: Option<String>,
    stdin: bool,
    tags: Vec<String>,
    plans: Vec<String>,
    json: bool,
) -> Result<()> {
    let content = match (content, stdin) {
        (Some(content), _) => content,
        (None, true) => read_stdin()?.trim_end().to_string(),
        (None, false) => String::new(),
    };
    if content.is_empty() {
        return Err(invalid("content", "(empty)"));
    }

    let draft = NoteDraft {
        title,
        content,
        tags,
        linked_plans: plans,
    };
    add_entry::<Note>(draft, json)
}

pub fn handle_add_goal(
    title: String,
    target: String,
    description: String,
    progress: i32,
    status: String,
    json: bool,
) -> Result<()> {
    let draft = GoalDraft {
        title,
        description,
        target_date: parse_date_arg("target", &target)?,
        progress,
        status: parse_arg::<GoalStatus>("status", &status)?,
    };
    add_entry::<Goal>(draft, json)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_add_plan(
    title: String,
    date: String,
    description: String,
    start: Option<String>,
    end: Option<String>,
    priority: String,
    notes: Vec<String>,
    json: bool,
) -> Result<()> {
    let day = parse_date_arg("date", &date)?;
    let mut draft = PlanDraft::new(title, day);
    draft.description = description;
    draft.priority = parse_arg("priority", &priority)?;
    draft.start_time = start.map(|s| parse_time_arg("start", &s, day)).transpose()?;
    draft.end_time = end.map(|s| parse_time_arg("end", &s, day)).transpose()?;
    draft.linked_notes = notes;
    add_entry::<PlanItem>(draft, json)
}

pub fn handle_add_drawing(
    title: String,
    data: Option<String>,
    file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let data = match (data, file) {
        (Some(data), _) => data,
        (None, Some(file)) => read_input(&file)?.trim().to_string(),
        (None, None) => String::new(),
    };
    if data.is_empty() {
        return Err(invalid("data", "(empty)"));
    }
    add_entry::<Drawing>(DrawingDraft { title, data }, json)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_add_subscription(
    name: String,
    cost: f64,
    next_payment: String,
    currency: String,
    cycle: String,
    category: String,
    description: String,
    inactive: bool,
    json: bool,
) -> Result<()> {
    let draft = SubscriptionDraft {
        name,
        description,
        cost,
        currency,
        billing_cycle: parse_arg("cycle", &cycle)?,
        next_payment: parse_date_arg("next-payment", &next_payment)?,
        is_active: !inactive,
        category,
    };
    add_entry::<Subscription>(draft, json)
}

pub fn handle_add_transaction(
    description: String,
    amount: f64,
    date: String,
    kind: String,
    category: String,
    subscription: Option<String>,
    json: bool,
) -> Result<()> {
    let mut store = open_store()?;
    let subscription_id = subscription.map(|id| subscription_ref(&store, id));

    let draft = TransactionDraft {
        subscription_id,
        amount,
        description,
        date: parse_date_arg("date", &date)?,
        kind: parse_arg::<TransactionType>("type", &kind)?,
        category,
    };
    let entry = store.add::<Transaction>(draft);
    check_persisted(&mut store)?;
    print_created(&entry, json)
}

pub fn handle_list(
    entity_type: Option<String>,
    from: Option<String>,
    to: Option<String>,
    json: bool,
) -> Result<()> {
    let kind = entity_type.as_deref().map(parse_kind).transpose()?;
    if (from.is_some() || to.is_some()) && kind != Some(CollectionKind::Plans) {
        let flag = if from.is_some() { "--from" } else { "--to" };
        return Err(invalid(flag, "only applies to plans"));
    }

    let store = open_store()?;

    let Some(kind) = kind else {
        if json {
            let c = store.collections();
            let all = serde_json::json!({
                "notes": c.notes,
                "goals": c.goals,
                "plans": c.plans,
                "drawings": c.drawings,
                "subscriptions": c.subscriptions,
                "transactions": c.transactions,
            });
            println!("{}", serde_json::to_string_pretty(&all)?);
        } else {
            for kind in CollectionKind::ALL {
                list_kind(&store, kind, None, None, false)?;
                println!();
            }
        }
        return Ok(());
    };

    let from = from.map(|d| parse_date_arg("from", &d)).transpose()?;
    let to = to.map(|d| parse_date_arg("to", &d)).transpose()?;
    list_kind(&store, kind, from, to, json)
}

fn list_kind<B: BackingStore>(
    store: &DataStore<B>,
    kind: CollectionKind,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    match kind {
        CollectionKind::Notes => print_collection(store.list::<Note>(), json),
        CollectionKind::Goals => print_collection(store.list::<Goal>(), json),
        CollectionKind::Plans => {
            if from.is_none() && to.is_none() {
                return print_collection(store.list::<PlanItem>(), json);
            }
            let plans: Vec<PlanItem> = store
                .plans_between(from.unwrap_or(NaiveDate::MIN), to.unwrap_or(NaiveDate::MAX))
                .into_iter()
                .cloned()
                .collect();
            print_collection(&plans, json)
        }
        CollectionKind::Drawings => print_collection(store.list::<Drawing>(), json),
        CollectionKind::Subscriptions => print_collection(store.list::<Subscription>(), json),
        CollectionKind::Transactions => print_collection(store.list::<Transaction>(), json),
    }
}

pub fn handle_get(entity_type: String, id: String, json: bool) -> Result<()> {
    let store = open_store()?;

    match parse_kind(&entity_type)? {
        CollectionKind::Notes => {
            let note = resolve::<Note, _>(&store, &id)?;
            print_entry(note, json)?;
            if !json {
                for plan in store.linked_plans(note) {
                    println!("  plan {}", plan.summary());
                }
            }
        }
        CollectionKind::Goals => print_entry(resolve::<Goal, _>(&store, &id)?, json)?,
        CollectionKind::Plans => {
            let plan = resolve::<PlanItem, _>(&store, &id)?;
            print_entry(plan, json)?;
            if !json {
                for note in store.linked_notes(plan) {
                    println!("  note {}", note.summary());
                }
            }
        }
        CollectionKind::Drawings => print_entry(resolve::<Drawing, _>(&store, &id)?, json)?,
        CollectionKind::Subscriptions => {
            print_entry(resolve::<Subscription, _>(&store, &id)?, json)?
        }
        CollectionKind::Transactions => {
            let transaction = resolve::<Transaction, _>(&store, &id)?;
            print_entry(transaction, json)?;
            if !json {
                if let Some(subscription) = store.subscription_for(transaction) {
                    println!("  subscription {}", subscription.summary());
                }
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_update_goal(
    id: String,
    title: Option<String>,
    description: Option<String>,
    target: Option<String>,
    progress: Option<i32>,
    step: Option<i32>,
    complete: bool,
    status: Option<String>,
    json: bool,
) -> Result<()> {
    let mut store = open_store()?;
    let goal = resolve::<Goal, _>(&store, &id)?.clone();

    let mut update = if complete {
        goal.complete()
    } else if let Some(delta) = step {
        goal.progress_step(delta)
    } else {
        GoalUpdate::default()
    };
    update.title = title;
    update.description = description;
    update.target_date = target.map(|t| parse_date_arg("target", &t)).transpose()?;
    if progress.is_some() {
        update.progress = progress;
    }
    if let Some(status) = status {
        update.status = Some(parse_arg("status", &status)?);
    }

    finish_update::<Goal>(&mut store, &goal.id, update, json)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_update_plan(
    id: String,
    title: Option<String>,
    description: Option<String>,
    date: Option<String>,
    start: Option<String>,
    end: Option<String>,
    clear_times: bool,
    priority: Option<String>,
    done: bool,
    undone: bool,
    notes: Vec<String>,
    json: bool,
) -> Result<()> {
    let mut store = open_store()?;
    let plan = resolve::<PlanItem, _>(&store, &id)?.clone();

    let date = date.map(|d| parse_date_arg("date", &d)).transpose()?;
    let day = date.unwrap_or(plan.date);

    let mut update = PlanUpdate {
        title,
        description,
        date,
        ..Default::default()
    };
    if clear_times {
        update.start_time = Some(None);
        update.end_time = Some(None);
    }
    if let Some(start) = start {
        update.start_time = Some(Some(parse_time_arg("start", &start, day)?));
    }
    if let Some(end) = end {
        update.end_time = Some(Some(parse_time_arg("end", &end, day)?));
    }
    if let Some(priority) = priority {
        update.priority = Some(parse_arg("priority", &priority)?);
    }
    if done {
        update.completed = Some(true);
    } else if undone {
        update.completed = Some(false);
    }
    if !notes.is_empty() {
        update.linked_notes = Some(notes);
    }

    finish_update::<PlanItem>(&mut store, &plan.id, update, json)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_update_note(
    id: String,
    title: Option<String>,
    content: Option<String>,
    stdin: bool,
    tags: Vec<String>,
    clear_tags: bool,
    plans: Vec<String>,
    json: bool,
) -> Result<()> {
    let content = match (content, stdin) {
        (Some(content), _) => Some(content),
        (None, true) => Some(read_stdin()?.trim_end().to_string()),
        (None, false) => None,
    };
    if content.as_deref() == Some("") {
        return Err(invalid("content", "(empty)"));
    }

    let mut store = open_store()?;
    let note = resolve::<Note, _>(&store, &id)?.clone();

    let update = NoteUpdate {
        title,
        content,
        tags: if clear_tags {
            Some(Vec::new())
        } else {
            (!tags.is_empty()).then_some(tags)
        },
        linked_plans: (!plans.is_empty()).then_some(plans),
    };
    finish_update::<Note>(&mut store, &note.id, update, json)
}

pub fn handle_update_drawing(
    id: String,
    title: Option<String>,
    data: Option<String>,
    file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let data = match (data, file) {
        (Some(data), _) => Some(data),
        (None, Some(file)) => Some(read_input(&file)?.trim().to_string()),
        (None, None) => None,
    };
    if data.as_deref() == Some("") {
        return Err(invalid("data", "(empty)"));
    }

    let mut store = open_store()?;
    let drawing = resolve::<Drawing, _>(&store, &id)?.clone();
    finish_update::<Drawing>(&mut store, &drawing.id, DrawingUpdate { title, data }, json)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_update_subscription(
    id: String,
    name: Option<String>,
    description: Option<String>,
    cost: Option<f64>,
    currency: Option<String>,
    cycle: Option<String>,
    next_payment: Option<String>,
    category: Option<String>,
    resume: bool,
    pause: bool,
    json: bool,
) -> Result<()> {
    let mut store = open_store()?;
    let subscription = resolve::<Subscription, _>(&store, &id)?.clone();

    let update = SubscriptionUpdate {
        name,
        description,
        cost,
        currency,
        billing_cycle: cycle.map(|c| parse_arg("cycle", &c)).transpose()?,
        next_payment: next_payment
            .map(|d| parse_date_arg("next-payment", &d))
            .transpose()?,
        is_active: if resume {
            Some(true)
        } else if pause {
            Some(false)
        } else {
            None
        },
        category,
    };
    finish_update::<Subscription>(&mut store, &subscription.id, update, json)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_update_transaction(
    id: String,
    description: Option<String>,
    amount: Option<f64>,
    date: Option<String>,
    kind: Option<String>,
    category: Option<String>,
    subscription: Option<String>,
    detach: bool,
    json: bool,
) -> Result<()> {
    let mut store = open_store()?;
    let transaction = resolve::<Transaction, _>(&store, &id)?.clone();

    let subscription_id = if detach {
        Some(None)
    } else {
        subscription.map(|id| Some(subscription_ref(&store, id)))
    };
    let update = TransactionUpdate {
        subscription_id,
        amount,
        description,
        date: date.map(|d| parse_date_arg("date", &d)).transpose()?,
        kind: kind.map(|k| parse_arg("type", &k)).transpose()?,
        category,
    };
    finish_update::<Transaction>(&mut store, &transaction.id, update, json)
}

pub fn handle_delete(entity_type: String, id: String, force: bool) -> Result<()> {
    let mut store = open_store()?;

    match parse_kind(&entity_type)? {
        CollectionKind::Notes => delete_entry::<Note>(&mut store, &id, force),
        CollectionKind::Goals => delete_entry::<Goal>(&mut store, &id, force),
        CollectionKind::Plans => delete_entry::<PlanItem>(&mut store, &id, force),
        CollectionKind::Drawings => delete_entry::<Drawing>(&mut store, &id, force),
        CollectionKind::Subscriptions => delete_entry::<Subscription>(&mut store, &id, force),
        CollectionKind::Transactions => delete_entry::<Transaction>(&mut store, &id, force),
    }
}

fn delete_entry<E: Entity + Summary>(
    store: &mut DataStore<SqliteStorage>,
    id: &str,
    force: bool,
) -> Result<()> {
    let entry = resolve::<E, _>(store, id)?.clone();
    let singular = E::KIND.singular();

    if !force && !confirm(&format!("Delete {} {}?", singular, entry.summary()), "delete")? {
        println!("Cancelled.");
        return Ok(());
    }

    store.delete::<E>(entry.id());
    check_persisted(store)?;
    println!("Deleted {} {}", singular, entry.summary());
    Ok(())
}

pub fn handle_budget(
    monthly: Option<f64>,
    currency: Option<String>,
    notifications: Option<bool>,
    threshold: Option<i32>,
    json: bool,
) -> Result<()> {
    let mut store = open_store()?;

    let update = BudgetSettingsUpdate {
        monthly_budget: monthly,
        currency,
        notifications,
        warning_threshold: threshold,
    };
    if update != BudgetSettingsUpdate::default() {
        store.update_settings(update);
        check_persisted(&mut store)?;
    }

    let today = Local::now().date_naive();
    let this_month: Vec<&Transaction> = store
        .list::<Transaction>()
        .iter()
        .filter(|t| t.date.year() == today.year() && t.date.month() == today.month())
        .collect();
    let spent: f64 = this_month
        .iter()
        .filter(|t| t.kind != TransactionType::Income)
        .map(|t| t.amount)
        .sum();
    let income: f64 = this_month
        .iter()
        .filter(|t| t.kind == TransactionType::Income)
        .map(|t| t.amount)
        .sum();
    let recurring: f64 = store
        .list::<Subscription>()
        .iter()
        .filter(|s| s.is_active)
        .map(Subscription::monthly_cost)
        .sum();

    let settings = store.settings();
    let over = settings.is_over_threshold(spent);

    if json {
        let report = serde_json::json!({
            "settings": settings,
            "month": today.format("%Y-%m").to_string(),
            "spent": spent,
            "income": income,
            "subscriptionsMonthly": recurring,
            "overThreshold": over,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Budget ({}):\n", today.format("%Y-%m"));
    println!(
        "  monthly budget: {:.2} {}",
        settings.monthly_budget, settings.currency
    );
    println!("  spent:          {:.2}", spent);
    println!("  income:         {:.2}", income);
    println!("  subscriptions:  {:.2} per month", recurring);
    println!(
        "  warn at:        {}%{}",
        settings.warning_threshold,
        if settings.notifications { "" } else { " (notifications off)" }
    );
    if over && settings.notifications {
        println!(
            "\nWarning: spending has reached {}% of the monthly budget.",
            settings.warning_threshold
        );
    }
    Ok(())
}

pub fn handle_export(scope: String, output: Option<PathBuf>) -> Result<()> {
    let scope: ExportScope = parse_arg("scope", &scope)?;
    let store = open_store()?;
    let json = transfer::export_json(&store, scope)?;

    match output {
        None => println!("{}", json),
        Some(path) => {
            let path = if path.is_dir() {
                path.join(transfer::suggested_file_name(
                    scope,
                    Local::now().date_naive(),
                ))
            } else {
                path
            };
            fs::write(&path, json)?;
            println!("Exported {} data to {}", scope, path.display());
        }
    }
    Ok(())
}

pub fn handle_import(file: PathBuf, mode: String, json: bool) -> Result<()> {
    let mode: ImportMode = parse_arg("mode", &mode)?;
    let text = read_input(&file)?;

    let mut store = open_store()?;
    let outcome = transfer::import_json(&mut store, &text, mode)?;
    check_persisted(&mut store)?;

    if json {
        let report = serde_json::json!({
            "imported": outcome.imported,
            "mode": mode.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", outcome.message());
    }
    Ok(())
}

pub fn handle_clear(force: bool) -> Result<()> {
    let mut store = open_store()?;

    if !force && !confirm("Delete all planner data? This cannot be undone.", "clear")? {
        println!("Cancelled.");
        return Ok(());
    }

    store.clear_all();
    check_persisted(&mut store)?;
    println!("Cleared all planner data.");
    Ok(())
}

pub fn handle_pomodoro(complete: bool, json: bool) -> Result<()> {
    let project = open_project()?;
    let mut storage = project.open_storage()?;
    let keys = project.config().storage_keys();
    let today = Local::now().date_naive();

    let stats = if complete {
        pomodoro::record_completed(&mut storage, &keys, today)?
    } else {
        pomodoro::load_today(&mut storage, &keys, today)?
    };

    if json {
        let report = serde_json::json!({
            "date": stats.date.to_string(),
            "count": stats.count,
            "nextBreak": stats.next_break(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if complete {
        let next = stats.next_break();
        println!(
            "Completed pomodoro #{} today. Next: {} ({} min)",
            stats.count,
            next,
            next.duration().as_secs() / 60
        );
    } else {
        println!("{} pomodoros completed today ({})", stats.count, stats.date);
    }
    Ok(())
}

pub fn handle_language(code: Option<String>) -> Result<()> {
    let project = open_project()?;
    let mut storage = project.open_storage()?;
    let keys = project.config().storage_keys();

    match code {
        Some(code) => {
            let language: Language = parse_arg("language", &code)?;
            preferences::save_language(&mut storage, &keys, language)?;
            println!("Language set to {} ({})", language, language.native_name());
        }
        None => {
            let current = preferences::load_language(&storage, &keys);
            println!("Language: {} ({})\n", current, current.native_name());
            println!("Available:");
            for language in Language::ALL {
                println!("  {}  {}", language, language.native_name());
            }
        }
    }
    Ok(())
}

pub fn handle_settings(action: Option<SettingsAction>) -> Result<()> {
    let project = open_project()?;
    let mut storage = project.open_storage()?;
    let keys = project.config().storage_keys();

    match action.unwrap_or(SettingsAction::Show { json: false }) {
        SettingsAction::Show { json } => {
            let settings = preferences::load_settings(&storage, &keys);
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                print_settings(&settings);
            }
        }
        SettingsAction::Export { output } => {
            let settings = preferences::load_settings(&storage, &keys);
            let json = preferences::export_settings(&settings)?;
            match output {
                Some(path) => {
                    fs::write(&path, json)?;
                    println!("Exported settings to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        SettingsAction::Set { key, value } => {
            let update = AppSettingsUpdate::parse(&key, &value)?;
            preferences::update_settings(&mut storage, &keys, update)?;
            println!("Set {} to {}", key, value);
        }
        SettingsAction::Import { file } => {
            let text = read_input(&file)?;
            if !preferences::import_settings(&mut storage, &keys, &text) {
                return Err(PlanbookError::InvalidImport(
                    "Invalid settings file".to_string(),
                ));
            }
            println!("Settings imported.");
        }
        SettingsAction::Reset => {
            preferences::reset_settings(&mut storage, &keys)?;
            println!("Settings reset to defaults.");
        }
    }
    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn print_settings(settings: &AppSettings) {
    let g = &settings.general;
    println!("General:");
    println!("  time zone:      {}", g.time_zone);
    println!("  date format:    {}", g.date_format);
    println!("  auto save:      {}", on_off(g.auto_save));
    println!("  compact mode:   {}", on_off(g.compact_mode));
    println!("  animations:     {}", on_off(g.animations));
    println!("  sidebar:        {}", g.sidebar_position);

    let n = &settings.notifications;
    println!("\nNotifications:");
    println!("  task reminders: {}", on_off(n.task_reminders));
    println!("  goal milestones: {}", on_off(n.goal_milestones));
    println!("  payments:       {}", on_off(n.subscription_payments));
    println!("  weekly summary: {}", on_off(n.weekly_summary));
    println!("  time:           {}", n.notification_time);

    let p = &settings.privacy;
    println!("\nPrivacy:");
    println!("  analytics:      {}", on_off(p.analytics));
    println!("  crash reports:  {}", on_off(p.crash_reports));
}
