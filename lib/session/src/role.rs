//! Role types asserted by the remote service.
//!
//! The service grants every account the `USER` role; operators additionally
//! hold `ADMIN`. The client never derives roles itself, it only carries what
//! the auth and profile endpoints report.

use serde::{Deserialize, Deserializer, Serialize};

/// Account role as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Standard account with access to its own records.
    User,
    /// Operator account.
    Admin,
}

impl Role {
    /// Returns true if this role has admin privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns the wire name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of roles held by an identity.
///
/// Serialized as a bare JSON array. Duplicates are collapsed and the set is
/// kept sorted so two sets with the same members compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    /// Creates an empty role set.
    #[must_use]
    pub fn none() -> Self {
        Self { roles: Vec::new() }
    }

    /// Creates a role set with user access only.
    #[must_use]
    pub fn user() -> Self {
        Self {
            roles: vec![Role::User],
        }
    }

    /// Creates a role set with admin access (implies user access).
    #[must_use]
    pub fn admin() -> Self {
        Self {
            roles: vec![Role::User, Role::Admin],
        }
    }

    /// Returns true if the set has no roles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns true if the set contains the given role.
    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true if the identity has admin access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.contains(Role::Admin)
    }

    /// Returns the roles as a slice.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut roles: Vec<Role> = iter.into_iter().collect();
        roles.sort();
        roles.dedup();
        Self { roles }
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // The service sends `null` for accounts without roles.
        let roles = Option::<Vec<Role>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(roles.into_iter().collect())
    }
}
