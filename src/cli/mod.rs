//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod logging;

pub use commands::{
    ConfigSubcommand, GlobalOptions, handle_config_command, handle_events_command,
    handle_inventory_command, handle_list_command,
};
pub use logging::init_logging;
