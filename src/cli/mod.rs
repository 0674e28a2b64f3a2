mod commands;
mod handlers;

pub use commands::{
    AddCommand, AddEntity, Cli, Commands, SettingsAction, SettingsCommand, UpdateCommand,
    UpdateEntity,
};
pub use handlers::{
    handle_add_drawing, handle_add_goal, handle_add_note, handle_add_plan,
    handle_add_subscription, handle_add_transaction, handle_budget, handle_clear, handle_delete,
    handle_export, handle_get, handle_import, handle_init, handle_language, handle_list,
    handle_pomodoro, handle_settings, handle_update_drawing, handle_update_goal,
    handle_update_note, handle_update_plan, handle_update_subscription, handle_update_transaction,
};
