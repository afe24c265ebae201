//! Discovery records for deployed clones
//!
//! The factory hands every committed deployment to a [`DeploymentSink`].
//! [`DeploymentLog`] is the in-memory sink used by the CLI and tests.

use crate::types::{Address, Salt};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

/// `{target, implementation, caller, salt}` for one successful deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub target: Address,
    pub implementation: Address,
    pub caller: Address,
    pub salt: Salt,
}

/// Receives discovery records; called once per committed deployment
pub trait DeploymentSink: Send + Sync {
    fn record(&self, record: &DeploymentRecord);
}

/// A record together with the time it reached the log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedDeployment {
    pub record: DeploymentRecord,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only in-memory deployment log
#[derive(Debug, Default)]
pub struct DeploymentLog {
    entries: RwLock<Vec<LoggedDeployment>>,
}

impl DeploymentLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<LoggedDeployment> {
        self.entries.read().clone()
    }

    pub fn by_deployer(&self, deployer: &Address) -> Vec<DeploymentRecord> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.record.caller == *deployer)
            .map(|e| e.record.clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.entries.read().len()
    }
}

impl DeploymentSink for DeploymentLog {
    fn record(&self, record: &DeploymentRecord) {
        self.entries.write().push(LoggedDeployment {
            record: record.clone(),
            recorded_at: Utc::now(),
        });
        info!(
            target_address = %record.target,
            implementation = %record.implementation,
            caller = %record.caller,
            "Deployment recorded"
        );
    }
}
