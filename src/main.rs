use clap::Parser;
use planbook::cli::{
    handle_add_drawing, handle_add_goal, handle_add_note, handle_add_plan,
    handle_add_subscription, handle_add_transaction, handle_budget, handle_clear, handle_delete,
    handle_export, handle_get, handle_import, handle_init, handle_language, handle_list,
    handle_pomodoro, handle_settings, handle_update_drawing, handle_update_goal,
    handle_update_note, handle_update_plan, handle_update_subscription, handle_update_transaction,
    AddEntity, Cli, Commands, UpdateEntity,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    // stdout is reserved for command output (including --json)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("PLANBOOK_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Add(add) => match add.entity {
            AddEntity::Note {
                title,
                content,
                stdin,
                tags,
                plans,
                json,
            } => handle_add_note(title, content, stdin, tags, plans, json),
            AddEntity::Goal {
                title,
                target,
                description,
                progress,
                status,
                json,
            } => handle_add_goal(title, target, description, progress, status, json),
            AddEntity::Plan {
                title,
                date,
                description,
                start,
                end,
                priority,
                notes,
                json,
            } => handle_add_plan(title, date, description, start, end, priority, notes, json),
            AddEntity::Drawing {
                title,
                data,
                file,
                json,
            } => handle_add_drawing(title, data, file, json),
            AddEntity::Subscription {
                name,
                cost,
                next_payment,
                currency,
                cycle,
                category,
                description,
                inactive,
                json,
            } => handle_add_subscription(
                name,
                cost,
                next_payment,
                currency,
                cycle,
                category,
                description,
                inactive,
                json,
            ),
            AddEntity::Transaction {
                description,
                amount,
                date,
                kind,
                category,
                subscription,
                json,
            } => handle_add_transaction(description, amount, date, kind, category, subscription, json),
        },
        Commands::List {
            entity_type,
            from,
            to,
            json,
        } => handle_list(entity_type, from, to, json),
        Commands::Get {
            entity_type,
            id,
            json,
        } => handle_get(entity_type, id, json),
        Commands::Update(update) => match update.entity {
            UpdateEntity::Goal {
                id,
                title,
                description,
                target,
                progress,
                step,
                complete,
                status,
                json,
            } => handle_update_goal(
                id,
                title,
                description,
                target,
                progress,
                step,
                complete,
                status,
                json,
            ),
            UpdateEntity::Plan {
                id,
                title,
                description,
                date,
                start,
                end,
                clear_times,
                priority,
                done,
                undone,
                notes,
                json,
            } => handle_update_plan(
                id,
                title,
                description,
                date,
                start,
                end,
                clear_times,
                priority,
                done,
                undone,
                notes,
                json,
            ),
            UpdateEntity::Note {
                id,
                title,
                content,
                stdin,
                tags,
                clear_tags,
                plans,
                json,
            } => handle_update_note(id, title, content, stdin, tags, clear_tags, plans, json),
            UpdateEntity::Drawing {
                id,
                title,
                data,
                file,
                json,
            } => handle_update_drawing(id, title, data, file, json),
            UpdateEntity::Subscription {
                id,
                name,
                description,
                cost,
                currency,
                cycle,
                next_payment,
                category,
                resume,
                pause,
                json,
            } => handle_update_subscription(
                id,
                name,
                description,
                cost,
                currency,
                cycle,
                next_payment,
                category,
                resume,
                pause,
                json,
            ),
            UpdateEntity::Transaction {
                id,
                description,
                amount,
                date,
                kind,
                category,
                subscription,
                detach,
                json,
            } => handle_update_transaction(
                id,
                description,
                amount,
                date,
                kind,
                category,
                subscription,
                detach,
                json,
            ),
        },
        Commands::Delete {
            entity_type,
            id,
            force,
        } => handle_delete(entity_type, id, force),
        Commands::Budget {
            monthly,
            currency,
            notifications,
            threshold,
            json,
        } => handle_budget(monthly, currency, notifications, threshold, json),
        Commands::Export { scope, output } => handle_export(scope, output),
        Commands::Import { file, mode, json } => handle_import(file, mode, json),
        Commands::Clear { force } => handle_clear(force),
        Commands::Pomodoro { complete, json } => handle_pomodoro(complete, json),
        Commands::Language { code } => handle_language(code),
        Commands::Settings(settings) => handle_settings(settings.action),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
