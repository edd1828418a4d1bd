//! Terminal client errors and their exit codes.

use rootcause::prelude::Report;
use spendwise_session::{AccessDenied, GatewayError, SessionEnd, SessionError};
use std::fmt;

/// Exit code for a command that needs a login.
pub const EXIT_LOGIN_REQUIRED: i32 = 2;

/// Errors reported to the terminal user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// The command needs an authenticated session.
    LoginRequired { reason: Option<SessionEnd> },
    /// Login or registration failed.
    Authentication { message: String },
    /// A resource call failed.
    Request { message: String },
    /// The command line or an interactive answer was unusable.
    Input { message: String },
    /// Configuration could not be loaded.
    Config { message: String },
}

impl CliError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LoginRequired { .. } => EXIT_LOGIN_REQUIRED,
            _ => 1,
        }
    }

    /// Returns true if the login hint already told the user about this error.
    ///
    /// Every refusal of a protected command goes through the navigator first.
    #[must_use]
    pub fn shown_by_login_hint(&self) -> bool {
        matches!(self, Self::LoginRequired { .. })
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoginRequired { reason: Some(reason) } => {
                write!(f, "login required ({reason})")
            }
            Self::LoginRequired { reason: None } => write!(f, "login required"),
            Self::Authentication { message } => write!(f, "{message}"),
            Self::Request { message } => write!(f, "{message}"),
            Self::Input { message } => write!(f, "{message}"),
            Self::Config { message } => write!(f, "configuration error: {message}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<AccessDenied> for CliError {
    fn from(denied: AccessDenied) -> Self {
        Self::LoginRequired {
            reason: denied.reason,
        }
    }
}

/// Layers a resource failure under the matching terminal error.
///
/// A revoked credential becomes a login requirement.
pub fn request_failed(report: Report<GatewayError>) -> Report<CliError> {
    let error = match report.current_context() {
        GatewayError::AuthorizationRevoked { .. } => CliError::LoginRequired {
            reason: Some(SessionEnd::Revoked),
        },
        other => CliError::Request {
            message: other.to_string(),
        },
    };
    report.context(error)
}

/// Layers a login or registration failure under a terminal error.
pub fn authentication_failed(report: Report<SessionError>) -> Report<CliError> {
    let error = CliError::Authentication {
        message: report.current_context().to_string(),
    };
    report.context(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revoked_request_requires_login() {
        let report: Report<GatewayError> = GatewayError::AuthorizationRevoked {
            path: "/goals".to_string(),
        }
        .into();

        let err = request_failed(report);

        assert_eq!(err.current_context().exit_code(), EXIT_LOGIN_REQUIRED);
    }

    #[test]
    fn other_failures_exit_with_one() {
        let report: Report<GatewayError> = GatewayError::ServerFault {
            status: 503,
            path: "/dashboard".to_string(),
            message: "down".to_string(),
        }
        .into();

        let err = request_failed(report);

        assert_eq!(err.current_context().exit_code(), 1);
        assert_eq!(
            err.current_context().to_string(),
            "server error on /dashboard (503): down"
        );
    }

    #[test]
    fn only_login_requirements_are_covered_by_the_hint() {
        let denied = CliError::from(AccessDenied {
            reason: Some(SessionEnd::NoCredential),
        });
        assert!(denied.shown_by_login_hint());
        assert_eq!(denied.exit_code(), EXIT_LOGIN_REQUIRED);

        assert!(!CliError::input("bad date").shown_by_login_hint());
        assert!(
            !CliError::Request {
                message: "down".to_string()
            }
            .shown_by_login_hint()
        );
    }

    #[test]
    fn authentication_message_is_session_error() {
        let report: Report<SessionError> = SessionError::InvalidCredentials.into();

        let err = authentication_failed(report);

        assert_eq!(
            err.current_context(),
            &CliError::Authentication {
                message: "invalid username or password".to_string()
            }
        );
    }
}
