//! Session controller: orchestrates startup reconciliation, login,
//! registration, logout, and identity updates.
//!
//! The controller is the only writer of session state. Readers (the access
//! gate, views) subscribe to snapshots; the gateway only holds the narrow
//! teardown capability the controller hands it.

use crate::auth::{
    AuthResponse, LOGIN_PATH, LoginRequest, PROFILE_PATH, REGISTER_PATH, Registration,
};
use crate::credential::CredentialStore;
use crate::error::{GatewayError, SessionError};
use crate::gate::AccessGate;
use crate::gateway::{ApiGateway, Teardown};
use crate::identity::{Identity, IdentityPatch};
use crate::navigation::Navigator;
use crate::state::{Session, SessionCell, SessionEnd, Ticket};
use crate::transport::Transport;
use spendwise_core::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Owner of the process-wide session.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct SessionController {
    cell: Arc<SessionCell>,
    gateway: ApiGateway,
    navigator: Arc<dyn Navigator>,
    started: Arc<AtomicBool>,
}

impl SessionController {
    /// Wires the controller, its gateway, and its teardown capability.
    ///
    /// The session starts out `initializing`; call [`initialize`](Self::initialize)
    /// once at startup.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let cell = Arc::new(SessionCell::new(store.clone()));
        let teardown = Teardown::new(cell.clone(), navigator.clone());
        let gateway = ApiGateway::new(transport, store, teardown);
        Self {
            cell,
            gateway,
            navigator,
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the gateway every resource collaborator must call through.
    #[must_use]
    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    /// Returns an access gate observing this session.
    #[must_use]
    pub fn gate(&self) -> AccessGate {
        AccessGate::new(self.cell.subscribe(), self.navigator.clone())
    }

    /// Returns the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.cell.snapshot()
    }

    /// Subscribes to session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.cell.subscribe()
    }

    /// Reconciles the stored credential with the server at startup.
    ///
    /// Never fails: any problem degrades to `unauthenticated`. Only the first
    /// call does anything.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("session already initialized");
            return;
        }

        let ticket = self.cell.ticket();
        let Some(credential) = self.cell.stored_credential() else {
            self.cell
                .resolve_unauthenticated(ticket, SessionEnd::NoCredential);
            debug!("no stored credential");
            return;
        };

        match self.gateway.get_json::<Identity>(PROFILE_PATH).await {
            Ok(identity) => {
                let username = identity.username().to_string();
                if self.cell.establish(ticket, credential, identity) {
                    info!(username, "session restored");
                } else {
                    debug!("session changed during startup, dropping restored identity");
                }
            }
            Err(report) => {
                warn!(error = %report, "could not verify stored credential");
                self.cell
                    .resolve_unauthenticated(ticket, SessionEnd::Unverified);
            }
        }
    }

    /// Logs in with a username or email and a password.
    ///
    /// On success the returned credential is stored and the identity is taken
    /// from the response. On any failure the session is left untouched.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> Result<Identity, SessionError> {
        let ticket = self.cell.ticket();
        let request = LoginRequest::new(username_or_email, password);

        let response: AuthResponse = self
            .gateway
            .post_json(LOGIN_PATH, &request)
            .await
            .map_err(|report| {
                let error = login_failure(report.current_context());
                report.context(error)
            })?;

        self.complete(ticket, response)
    }

    /// Registers a new account and logs it in.
    ///
    /// A taken username or email fails with
    /// [`SessionError::RegistrationConflict`]; the session is left untouched
    /// on any failure.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<Identity, SessionError> {
        let ticket = self.cell.ticket();

        let response: AuthResponse = self
            .gateway
            .post_json(REGISTER_PATH, registration)
            .await
            .map_err(|report| {
                let error = registration_failure(report.current_context());
                report.context(error)
            })?;

        self.complete(ticket, response)
    }

    fn complete(&self, ticket: Ticket, response: AuthResponse) -> Result<Identity, SessionError> {
        let (credential, identity) = response.into_session_parts()?;

        if !self.cell.establish(ticket, credential, identity.clone()) {
            warn!("session changed while authenticating, discarding result");
            return Err(SessionError::SessionSuperseded.into());
        }

        info!(username = identity.username(), "logged in");
        Ok(identity)
    }

    /// Clears the stored credential and ends the session. Never fails.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        self.cell.sign_out(SessionEnd::LoggedOut);
        info!("logged out");
    }

    /// Merges fields into the current identity without a network call.
    ///
    /// Used after an out-of-band profile edit succeeded. Returns true if the
    /// identity changed; does nothing when no one is logged in.
    pub fn update_identity(&self, patch: IdentityPatch) -> bool {
        self.cell.merge_identity(patch)
    }
}

fn login_failure(error: &GatewayError) -> SessionError {
    match error {
        GatewayError::AuthorizationRevoked { .. } => SessionError::InvalidCredentials,
        GatewayError::Rejected { status, .. } if matches!(status, 400 | 401 | 404) => {
            SessionError::InvalidCredentials
        }
        _ => SessionError::RequestFailed,
    }
}

fn registration_failure(error: &GatewayError) -> SessionError {
    // The service answers a taken username with a bodiless 403.
    let conflict = match error {
        GatewayError::AuthorizationRevoked { .. } => true,
        GatewayError::Rejected { status: 409, .. } => true,
        GatewayError::Rejected { message, .. } | GatewayError::ServerFault { message, .. } => {
            reports_taken_identity(message)
        }
        _ => false,
    };

    if conflict {
        SessionError::RegistrationConflict {
            message: error
                .message()
                .filter(|m| !m.is_empty())
                .unwrap_or("username or email already in use")
                .to_string(),
        }
    } else {
        SessionError::RequestFailed
    }
}

fn reports_taken_identity(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("already taken") || message.contains("already in use")
}
