//! Wire types of the auth collaborator.

use crate::credential::Credential;
use crate::error::SessionError;
use crate::identity::Identity;
use crate::role::RoleSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Path of the login endpoint.
pub const LOGIN_PATH: &str = "/auth/login";
/// Path of the registration endpoint.
pub const REGISTER_PATH: &str = "/auth/register";
/// Path of the profile endpoint.
pub const PROFILE_PATH: &str = "/users/me";

/// Body of a login request.
///
/// The service accepts either a username or an email in `username`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

impl LoginRequest {
    /// Creates a login request.
    #[must_use]
    pub fn new(username_or_email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username_or_email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Profile data submitted at registration.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// Creates a registration request.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Response of the login and registration endpoints.
///
/// The token may arrive as `token` or as `accessToken`; `token` wins when
/// both are present and non-empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    roles: RoleSet,
}

impl AuthResponse {
    /// Returns the credential carried by the response, if any.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        [&self.token, &self.access_token]
            .into_iter()
            .flatten()
            .find(|token| !token.is_empty())
            .map(|token| Credential::new(token.as_str()))
    }

    /// Splits the response into the credential to store and the identity to
    /// hold, without a second round trip.
    pub fn into_session_parts(self) -> Result<(Credential, Identity), SessionError> {
        let credential = self
            .credential()
            .ok_or_else(|| SessionError::MalformedAuthResponse {
                details: "response carried no token".to_string(),
            })?;
        let identity = Identity::new(self.username, self.email, self.roles);
        Ok((credential, identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_token_key() {
        let response: AuthResponse = serde_json::from_str(
            r#"{"token":"t1","type":"Bearer","username":"alice","email":"a@x.com","roles":[]}"#,
        )
        .expect("deserialize");

        let (credential, identity) = response.into_session_parts().expect("parts");
        assert_eq!(credential, Credential::new("t1"));
        assert_eq!(identity, Identity::new("alice", "a@x.com", RoleSet::none()));
    }

    #[test]
    fn accepts_access_token_key() {
        let response: AuthResponse = serde_json::from_str(
            r#"{"accessToken":"t2","username":"bob","email":"b@x.com","roles":["USER"]}"#,
        )
        .expect("deserialize");

        assert_eq!(response.credential(), Some(Credential::new("t2")));
    }

    #[test]
    fn falls_back_when_token_is_null() {
        let response: AuthResponse = serde_json::from_str(
            r#"{"token":null,"accessToken":"t3","username":"bob","email":"b@x.com"}"#,
        )
        .expect("deserialize");

        assert_eq!(response.credential(), Some(Credential::new("t3")));
    }

    #[test]
    fn missing_token_is_malformed() {
        let response: AuthResponse =
            serde_json::from_str(r#"{"username":"bob","email":"b@x.com","roles":null}"#)
                .expect("deserialize");

        let err = response.into_session_parts().expect_err("should fail");
        assert!(matches!(err, SessionError::MalformedAuthResponse { .. }));
    }

    #[test]
    fn request_debug_hides_password() {
        let request = LoginRequest::new("alice", "pw1");
        assert!(!format!("{request:?}").contains("pw1"));
        let registration = Registration::new("alice", "a@x.com", "pw1");
        assert!(!format!("{registration:?}").contains("pw1"));
    }
}
