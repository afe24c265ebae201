//! CLI command-name contract used for log spans.

use crate::cli::parse::{
    AllowlistCommands, CloneCommands, Commands, ConfigCommands, LeafCommands, RegistryCommands,
};

/// Dotted command name (e.g. "allowlist.proof", "registry.list").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Leaf { command } => format!("leaf.{}", leaf_command_name(command)),
        Commands::Allowlist { command } => {
            format!("allowlist.{}", allowlist_command_name(command))
        }
        Commands::Clone { command } => format!("clone.{}", clone_command_name(command)),
        Commands::Registry { command } => {
            format!("registry.{}", registry_command_name(command))
        }
        Commands::Config { command } => format!("config.{}", config_command_name(command)),
    }
}

pub fn leaf_command_name(command: &LeafCommands) -> &'static str {
    match command {
        LeafCommands::Hash { .. } => "hash",
    }
}

pub fn allowlist_command_name(command: &AllowlistCommands) -> &'static str {
    match command {
        AllowlistCommands::Root { .. } => "root",
        AllowlistCommands::Proof { .. } => "proof",
        AllowlistCommands::Verify { .. } => "verify",
        AllowlistCommands::Publish { .. } => "publish",
        AllowlistCommands::Claim { .. } => "claim",
    }
}

pub fn clone_command_name(command: &CloneCommands) -> &'static str {
    match command {
        CloneCommands::Address { .. } => "address",
    }
}

pub fn registry_command_name(command: &RegistryCommands) -> &'static str {
    match command {
        RegistryCommands::Register { .. } => "register",
        RegistryCommands::Revoke { .. } => "revoke",
        RegistryCommands::Approve { .. } => "approve",
        RegistryCommands::Status { .. } => "status",
        RegistryCommands::List { .. } => "list",
    }
}

pub fn config_command_name(command: &ConfigCommands) -> &'static str {
    match command {
        ConfigCommands::Show => "show",
    }
}
