//! Error types for the session crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `GatewayError`: Failures of a single outbound call
//! - `SessionError`: Login/registration failures (wraps gateway errors via context)
//! - `AccessDenied`: The access gate refused or abandoned a protected view

use crate::state::SessionEnd;
use std::fmt;

/// Errors from calls made through the API gateway.
///
/// Only `AuthorizationRevoked` is handled centrally (by tearing the session
/// down); every other variant is handed back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The server rejected the credential (HTTP 403).
    AuthorizationRevoked { path: String },
    /// The server refused the request for another client-side reason.
    Rejected {
        status: u16,
        path: String,
        message: String,
    },
    /// The server failed while handling the request.
    ServerFault {
        status: u16,
        path: String,
        message: String,
    },
    /// The request never produced a response.
    Network { path: String, details: String },
    /// The request body could not be encoded.
    Encode { path: String, details: String },
    /// The response body did not have the expected shape.
    Decode { path: String, details: String },
}

impl GatewayError {
    /// Returns the HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthorizationRevoked { .. } => Some(403),
            Self::Rejected { status, .. } | Self::ServerFault { status, .. } => Some(*status),
            Self::Network { .. } | Self::Encode { .. } | Self::Decode { .. } => None,
        }
    }

    /// Returns the server-provided message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } | Self::ServerFault { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthorizationRevoked { path } => {
                write!(f, "credential rejected by server on {path}")
            }
            Self::Rejected {
                status,
                path,
                message,
            } => {
                write!(f, "request to {path} rejected ({status}): {message}")
            }
            Self::ServerFault {
                status,
                path,
                message,
            } => {
                write!(f, "server error on {path} ({status}): {message}")
            }
            Self::Network { path, details } => {
                write!(f, "request to {path} failed: {details}")
            }
            Self::Encode { path, details } => {
                write!(f, "failed to encode request body for {path}: {details}")
            }
            Self::Decode { path, details } => {
                write!(f, "unexpected response body from {path}: {details}")
            }
        }
    }
}

impl std::error::Error for GatewayError {}

/// Errors from session operations that the caller is expected to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Login was rejected.
    InvalidCredentials,
    /// The username or email is already taken.
    RegistrationConflict { message: String },
    /// The auth response carried no usable token.
    MalformedAuthResponse { details: String },
    /// A logout or teardown was applied while the call was in flight.
    SessionSuperseded,
    /// The auth collaborator could not be reached or failed.
    RequestFailed,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::RegistrationConflict { message } => {
                write!(f, "registration conflict: {message}")
            }
            Self::MalformedAuthResponse { details } => {
                write!(f, "malformed auth response: {details}")
            }
            Self::SessionSuperseded => {
                write!(f, "session changed while the request was in flight")
            }
            Self::RequestFailed => write!(f, "authentication request failed"),
        }
    }
}

impl std::error::Error for SessionError {}

/// The access gate did not render a protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied {
    /// Why the session is unauthenticated, when known.
    pub reason: Option<SessionEnd>,
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            Some(reason) => write!(f, "login required: {reason}"),
            None => write!(f, "login required"),
        }
    }
}

impl std::error::Error for AccessDenied {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revoked_display_names_path() {
        let err = GatewayError::AuthorizationRevoked {
            path: "/expenses".to_string(),
        };
        assert!(err.to_string().contains("/expenses"));
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn rejected_carries_status_and_message() {
        let err = GatewayError::Rejected {
            status: 422,
            path: "/budgets".to_string(),
            message: "limit must be positive".to_string(),
        };
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.message(), Some("limit must be positive"));
        assert!(err.to_string().contains("422"));
    }

    #[test]
    fn network_error_has_no_status() {
        let err = GatewayError::Network {
            path: "/dashboard".to_string(),
            details: "connection refused".to_string(),
        };
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn registration_conflict_display() {
        let err = SessionError::RegistrationConflict {
            message: "Username is already taken".to_string(),
        };
        assert!(err.to_string().contains("already taken"));
    }

    #[test]
    fn access_denied_display_includes_reason() {
        let err = AccessDenied {
            reason: Some(SessionEnd::Revoked),
        };
        assert!(err.to_string().contains("login required"));
        assert!(err.to_string().contains("rejected"));
    }
}
