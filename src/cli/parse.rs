//! CLI parse: clap types for clonekit. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// clonekit - deterministic clone deployment and Merkle allowlists
#[derive(Parser)]
#[command(name = "clonekit")]
#[command(about = "Deterministic minimal-proxy clones and Merkle allowlist tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Leaf digests
    Leaf {
        #[command(subcommand)]
        command: LeafCommands,
    },
    /// Build allowlist trees, produce and check proofs
    Allowlist {
        #[command(subcommand)]
        command: AllowlistCommands,
    },
    /// Clone address prediction
    Clone {
        #[command(subcommand)]
        command: CloneCommands,
    },
    /// Implementation registry
    Registry {
        #[command(subcommand)]
        command: RegistryCommands,
    },
    /// Inspect the effective configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum LeafCommands {
    /// Hash one leaf record (claim form, or airdrop form with --amount)
    Hash {
        #[arg(long)]
        claimant: String,
        #[arg(long, conflicts_with = "amount", requires_all = ["price", "currency"])]
        quantity: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        amount: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AllowlistCommands {
    /// Print the root of an eligibility list
    Root {
        /// CSV eligibility list
        #[arg(long)]
        input: PathBuf,
        /// Sort leaf digests before building the tree
        #[arg(long)]
        sort_leaves: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the proof for one claimant
    Proof {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        claimant: String,
        #[arg(long)]
        sort_leaves: bool,
        /// Print the proof as ABI-encoded bytes32[]
        #[arg(long)]
        abi: bool,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check a leaf and proof against a root
    Verify {
        #[arg(long)]
        root: String,
        #[arg(long)]
        leaf: String,
        /// Comma-separated proof digests (may be empty)
        #[arg(long, default_value = "")]
        proof: String,
    },
    /// Publish the root of an eligibility list under a name
    Publish {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        caller: String,
        #[arg(long)]
        sort_leaves: bool,
    },
    /// Check a claimant's record against a published root
    Claim {
        #[arg(long)]
        name: String,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        claimant: String,
        #[arg(long)]
        sort_leaves: bool,
    },
}

#[derive(Subcommand)]
pub enum CloneCommands {
    /// Predict the address of a minimal-proxy clone
    Address {
        #[arg(long)]
        implementation: String,
        #[arg(long)]
        deployer: String,
        /// 32-byte hex salt
        #[arg(long)]
        salt: String,
    },
}

#[derive(Subcommand)]
pub enum RegistryCommands {
    /// Register an implementation as approved
    Register {
        #[arg(long)]
        implementation: String,
        #[arg(long)]
        caller: String,
        /// Contract type name (with --contract-version)
        #[arg(long, requires = "contract_version")]
        contract_type: Option<String>,
        #[arg(long, requires = "contract_type")]
        contract_version: Option<u8>,
    },
    /// Revoke approval of an implementation
    Revoke {
        #[arg(long)]
        implementation: String,
        #[arg(long)]
        caller: String,
    },
    /// Re-approve a revoked implementation
    Approve {
        #[arg(long)]
        implementation: String,
        #[arg(long)]
        caller: String,
    },
    /// Show whether an implementation is approved, revoked or unknown
    Status {
        #[arg(long)]
        implementation: String,
    },
    /// List all registered implementations
    List {
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the merged configuration as TOML
    Show,
}
