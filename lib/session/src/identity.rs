//! Identity held by an authenticated session.
//!
//! An identity is established once per session: synthesized from the auth
//! response on login/registration, or fetched from the profile endpoint on
//! cold start. Afterwards it only changes through an explicit merge.

use crate::role::RoleSet;
use serde::{Deserialize, Serialize};

/// Client-held user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    roles: RoleSet,
}

impl Identity {
    /// Creates an identity from its fields.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            roles,
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the roles.
    #[must_use]
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Applies a patch, overwriting only the fields it carries.
    ///
    /// Returns true if any field changed.
    pub fn merge(&mut self, patch: IdentityPatch) -> bool {
        let before = self.clone();
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(roles) = patch.roles {
            self.roles = roles;
        }
        *self != before
    }
}

/// Partial identity used after an out-of-band profile edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<RoleSet>,
}

impl IdentityPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the roles.
    #[must_use]
    pub fn with_roles(mut self, roles: RoleSet) -> Self {
        self.roles = Some(roles);
        self
    }

    /// Returns true if the patch carries no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.roles.is_none()
    }
}
