//! Access control seam
//!
//! Gated writes ask an [`Authorizer`] whether the caller holds a role and do
//! not care how roles are granted. [`RoleTable`] is the in-memory grant
//! table used by the CLI and tests.

use crate::codec::role_id;
use crate::error::ApiError;
use crate::types::{Address, Role};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

/// Admin of every role; the zero role id
pub const DEFAULT_ADMIN_ROLE: Role = [0u8; 32];

/// Role allowed to register, revoke and approve implementations
pub fn factory_role() -> Role {
    role_id("FACTORY_ROLE")
}

/// Role allowed to publish allowlist roots
pub fn allowlist_admin_role() -> Role {
    role_id("ALLOWLIST_ADMIN_ROLE")
}

/// Readable name for well-known roles, hex otherwise
pub fn role_label(role: &Role) -> String {
    if *role == DEFAULT_ADMIN_ROLE {
        "DEFAULT_ADMIN_ROLE".to_string()
    } else if *role == factory_role() {
        "FACTORY_ROLE".to_string()
    } else if *role == allowlist_admin_role() {
        "ALLOWLIST_ADMIN_ROLE".to_string()
    } else {
        format!("0x{}", hex::encode(role))
    }
}

/// Capability check used by every gated write
pub trait Authorizer: Send + Sync {
    fn has_role(&self, role: &Role, account: &Address) -> bool;
}

/// Fail with `Unauthorized` unless `caller` holds `role`
pub fn require_role(
    authorizer: &dyn Authorizer,
    role: &Role,
    caller: &Address,
) -> Result<(), ApiError> {
    if authorizer.has_role(role, caller) {
        return Ok(());
    }
    let role = role_label(role);
    warn!(caller = %caller, role = %role, "Rejected gated write");
    Err(ApiError::Unauthorized {
        caller: *caller,
        role,
    })
}

/// In-memory role grants
///
/// `DEFAULT_ADMIN_ROLE` holders may grant and revoke any role.
#[derive(Debug, Default)]
pub struct RoleTable {
    grants: RwLock<HashMap<Role, BTreeSet<Address>>>,
}

impl RoleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table whose only grant is `DEFAULT_ADMIN_ROLE` to `admin`
    pub fn with_admin(admin: Address) -> Self {
        let table = Self::new();
        table.bootstrap(DEFAULT_ADMIN_ROLE, admin);
        table
    }

    /// Grant without an admin check (construction time only)
    pub fn bootstrap(&self, role: Role, account: Address) {
        self.grants.write().entry(role).or_default().insert(account);
    }

    pub fn grant_role(
        &self,
        role: Role,
        account: Address,
        caller: &Address,
    ) -> Result<(), ApiError> {
        require_role(self, &DEFAULT_ADMIN_ROLE, caller)?;
        self.bootstrap(role, account);
        info!(role = %role_label(&role), account = %account, "Role granted");
        Ok(())
    }

    pub fn revoke_role(
        &self,
        role: Role,
        account: &Address,
        caller: &Address,
    ) -> Result<(), ApiError> {
        require_role(self, &DEFAULT_ADMIN_ROLE, caller)?;
        if let Some(members) = self.grants.write().get_mut(&role) {
            members.remove(account);
        }
        info!(role = %role_label(&role), account = %account, "Role revoked");
        Ok(())
    }

    pub fn members(&self, role: &Role) -> Vec<Address> {
        self.grants
            .read()
            .get(role)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl Authorizer for RoleTable {
    fn has_role(&self, role: &Role, account: &Address) -> bool {
        self.grants
            .read()
            .get(role)
            .is_some_and(|members| members.contains(account))
    }
}
