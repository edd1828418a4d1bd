//! Profile of the logged-in user.
//!
//! Edits are applied on the server first; only a successful edit is merged
//! into the session's identity. The server does not reissue a credential, so
//! the stored one is kept as is.

use serde::{Deserialize, Serialize};
use spendwise_core::Result;
use spendwise_session::auth::PROFILE_PATH;
use spendwise_session::{GatewayError, Identity, IdentityPatch, RoleSet, SessionController};
use std::fmt;
use tracing::{debug, instrument};

/// Fields to change on the profile. Absent fields are left unchanged.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

impl fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Body returned by a profile edit.
#[derive(Debug, Deserialize)]
struct UpdatedProfile {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    roles: Option<RoleSet>,
}

impl UpdatedProfile {
    fn into_patch(self) -> IdentityPatch {
        let mut patch = IdentityPatch::new();
        if let Some(username) = self.username {
            patch = patch.with_username(username);
        }
        if let Some(email) = self.email {
            patch = patch.with_email(email);
        }
        if let Some(roles) = self.roles.filter(|roles| !roles.is_empty()) {
            patch = patch.with_roles(roles);
        }
        patch
    }
}

/// Client for `/users/me`.
#[derive(Clone)]
pub struct ProfileClient {
    session: SessionController,
}

impl ProfileClient {
    #[must_use]
    pub fn new(session: SessionController) -> Self {
        Self { session }
    }

    /// Fetches the profile from the server.
    ///
    /// Does not touch the session; use the session snapshot for the identity
    /// the client is operating as.
    #[instrument(skip(self))]
    pub async fn show(&self) -> Result<Identity, GatewayError> {
        self.session.gateway().get_json(PROFILE_PATH).await
    }

    /// Applies an edit and merges the result into the session.
    ///
    /// Returns the identity held by the session afterwards.
    #[instrument(skip(self))]
    pub async fn update(&self, update: &ProfileUpdate) -> Result<Option<Identity>, GatewayError> {
        let updated: UpdatedProfile = self
            .session
            .gateway()
            .put_json(PROFILE_PATH, update)
            .await?;

        let changed = self.session.update_identity(updated.into_patch());
        debug!(changed, "profile edit merged into session");

        Ok(self.session.snapshot().identity().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::authenticated;
    use spendwise_session::Credential;
    use spendwise_session::CredentialStore;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[test]
    fn debug_hides_password() {
        let update = ProfileUpdate {
            password: Some("hunter2".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(!format!("{update:?}").contains("hunter2"));
    }

    #[tokio::test]
    async fn successful_edit_merges_into_session() {
        let h = authenticated().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/me"))
            .and(body_json(serde_json::json!({"email": "new@x.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": null,
                "type": "Bearer",
                "username": "alice",
                "email": "new@x.com",
                "roles": ["USER"]
            })))
            .expect(1)
            .mount(&h.server)
            .await;

        let update = ProfileUpdate {
            email: Some("new@x.com".to_string()),
            ..ProfileUpdate::default()
        };
        let identity = ProfileClient::new(h.session.clone())
            .update(&update)
            .await
            .expect("update")
            .expect("identity");

        assert_eq!(identity.email(), "new@x.com");
        assert_eq!(identity.roles(), &RoleSet::user());
        assert!(h.session.snapshot().is_authenticated());
        assert_eq!(h.store.get(), Some(Credential::new("t1")));
    }

    #[tokio::test]
    async fn failed_edit_leaves_identity() {
        let h = authenticated().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/me"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"message": "Email is already in use"})),
            )
            .mount(&h.server)
            .await;

        let update = ProfileUpdate {
            email: Some("taken@x.com".to_string()),
            ..ProfileUpdate::default()
        };
        ProfileClient::new(h.session.clone())
            .update(&update)
            .await
            .expect_err("should fail");

        let session = h.session.snapshot();
        assert_eq!(session.identity().map(Identity::email), Some("a@x.com"));
    }
}
