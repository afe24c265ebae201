//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{
    AllowlistCommands, Cli, CloneCommands, Commands, ConfigCommands, LeafCommands,
    RegistryCommands,
};
pub use presentation::{
    format_claim_bundle, format_published_root, format_registry_list_json,
    format_registry_list_text, format_root_output,
};
pub use route::RunContext;
