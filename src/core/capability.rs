use std::collections::HashSet;
use ahash::RandomState;
#[cfg(test)]
use mockall::automock;
use crate::core::identity::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    CanCreate,
    CanDestroy,
}

/// Authorization facts the parking lot consumes before gated mutations.
#[cfg_attr(test, automock)]
pub trait CapabilityCheck: Send + Sync {
    fn can_create(&self, identity: &Identity) -> bool;
    fn can_destroy(&self, identity: &Identity) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Minter,
    Burner,
}

/// Fixed role assignments, built once from configuration.
#[derive(Debug, Default, Clone)]
pub struct RoleRegistry {
    minters: HashSet<Identity, RandomState>,
    burners: HashSet<Identity, RandomState>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Grants `admin` every role, like the deployer of a fresh lot.
    pub fn with_admin(self, admin: Identity) -> Self {
        self.with_role(Role::Minter, admin.clone())
            .with_role(Role::Burner, admin)
    }

    pub fn with_role(mut self, role: Role, identity: Identity) -> Self {
        match role {
            Role::Minter => self.minters.insert(identity),
            Role::Burner => self.burners.insert(identity),
        };
        self
    }

    pub fn has_role(&self, role: Role, identity: &Identity) -> bool {
        match role {
            Role::Minter => self.minters.contains(identity),
            Role::Burner => self.burners.contains(identity),
        }
    }
}

impl CapabilityCheck for RoleRegistry {
    fn can_create(&self, identity: &Identity) -> bool {
        self.has_role(Role::Minter, identity)
    }

    fn can_destroy(&self, identity: &Identity) -> bool {
        self.has_role(Role::Burner, identity)
    }
}
