//! Session state and its transitions.
//!
//! The session lives in a single `watch` channel. Every transition is applied
//! atomically through `send_if_modified`, and credential-store writes happen
//! inside the same critical section so the store and the session never
//! disagree once a transition completes.
//!
//! Transitions that span a network call capture a [`Ticket`] before the call
//! and are applied only if no other transition happened in between. This is
//! what makes a logout or forced teardown win over a login that was already in
//! flight, and what drops a stale `initialize()` completion.

use crate::credential::{Credential, CredentialStore};
use crate::identity::{Identity, IdentityPatch};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Lifecycle status of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Startup reconciliation of a stored credential is in progress.
    Initializing,
    /// Identity and credential are both present.
    Authenticated,
    /// No usable session.
    Unauthenticated,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => write!(f, "initializing"),
            Self::Authenticated => write!(f, "authenticated"),
            Self::Unauthenticated => write!(f, "unauthenticated"),
        }
    }
}

/// Why the session is unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEnd {
    /// Startup found no stored credential.
    NoCredential,
    /// Startup could not confirm the stored credential.
    Unverified,
    /// The user logged out.
    LoggedOut,
    /// The server rejected the credential on some call.
    Revoked,
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredential => write!(f, "not logged in"),
            Self::Unverified => write!(f, "stored credential could not be verified"),
            Self::LoggedOut => write!(f, "logged out"),
            Self::Revoked => write!(f, "credential rejected by server"),
        }
    }
}

/// Snapshot of the process-wide session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
    credential: Option<Credential>,
    status: SessionStatus,
    ended: Option<SessionEnd>,
    epoch: u64,
}

impl Session {
    fn initializing() -> Self {
        Self {
            identity: None,
            credential: None,
            status: SessionStatus::Initializing,
            ended: None,
            epoch: 0,
        }
    }

    /// Returns the identity, if authenticated.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Returns the credential the session was established with.
    #[must_use]
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns why the session is unauthenticated, if it is.
    #[must_use]
    pub fn ended(&self) -> Option<SessionEnd> {
        self.ended
    }

    /// Returns the number of transitions applied so far.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns true if the session is authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    fn reset(&mut self, end: SessionEnd) {
        self.identity = None;
        self.credential = None;
        self.status = SessionStatus::Unauthenticated;
        self.ended = Some(end);
        self.epoch += 1;
    }
}

/// Proof that no transition has happened since it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket {
    epoch: u64,
}

/// Owner of the session channel and the credential store.
pub(crate) struct SessionCell {
    tx: watch::Sender<Session>,
    store: Arc<dyn CredentialStore>,
}

impl SessionCell {
    pub(crate) fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (tx, _) = watch::channel(Session::initializing());
        Self { tx, store }
    }

    pub(crate) fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    pub(crate) fn ticket(&self) -> Ticket {
        Ticket {
            epoch: self.tx.borrow().epoch,
        }
    }

    pub(crate) fn stored_credential(&self) -> Option<Credential> {
        self.store.get()
    }

    /// Establishes an authenticated session unless superseded.
    pub(crate) fn establish(
        &self,
        ticket: Ticket,
        credential: Credential,
        identity: Identity,
    ) -> bool {
        self.tx.send_if_modified(|session| {
            if session.epoch != ticket.epoch {
                return false;
            }
            self.store.set(credential.clone());
            session.identity = Some(identity);
            session.credential = Some(credential);
            session.status = SessionStatus::Authenticated;
            session.ended = None;
            session.epoch += 1;
            true
        })
    }

    /// Leaves startup reconciliation without a session unless superseded.
    ///
    /// The stored credential is left in place.
    pub(crate) fn resolve_unauthenticated(&self, ticket: Ticket, end: SessionEnd) -> bool {
        self.tx.send_if_modified(|session| {
            if session.epoch != ticket.epoch || session.status != SessionStatus::Initializing {
                return false;
            }
            session.reset(end);
            true
        })
    }

    /// Clears the store and ends the session unconditionally.
    ///
    /// Always invalidates outstanding tickets. Returns true only if there was
    /// something to tear down: a non-unauthenticated status or a stored
    /// credential.
    pub(crate) fn sign_out(&self, end: SessionEnd) -> bool {
        let mut torn_down = false;
        self.tx.send_modify(|session| {
            let removed = self.store.clear();
            torn_down = removed || session.status != SessionStatus::Unauthenticated;
            if torn_down {
                session.reset(end);
            } else {
                session.epoch += 1;
            }
        });
        torn_down
    }

    /// Merges a patch into the current identity without a transition.
    pub(crate) fn merge_identity(&self, patch: IdentityPatch) -> bool {
        self.tx.send_if_modified(|session| match session.identity.as_mut() {
            Some(identity) => identity.merge(patch),
            None => false,
        })
    }
}
