//! Access gate for protected views.
//!
//! The gate maps the session status onto one of three decisions:
//!
//! | status            | decision   |
//! |-------------------|------------|
//! | `initializing`    | `Suspend`  |
//! | `authenticated`   | `Render`   |
//! | `unauthenticated` | `Redirect` |
//!
//! A protected view must never render while the session is initializing.

use crate::error::AccessDenied;
use crate::navigation::Navigator;
use crate::state::{Session, SessionEnd, SessionStatus};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// What the gate decided for a protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render the protected view.
    Render,
    /// Show a neutral loading indicator.
    Suspend,
    /// Send the user to the login entry point.
    Redirect,
}

impl Decision {
    /// Maps a session status onto a decision.
    #[must_use]
    pub fn for_status(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Initializing => Self::Suspend,
            SessionStatus::Authenticated => Self::Render,
            SessionStatus::Unauthenticated => Self::Redirect,
        }
    }
}

/// Read-only observer of the session that decides whether protected views
/// may render.
pub struct AccessGate {
    session: watch::Receiver<Session>,
    navigator: Arc<dyn Navigator>,
    seen: SessionStatus,
}

impl AccessGate {
    pub(crate) fn new(
        mut session: watch::Receiver<Session>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let seen = session.borrow_and_update().status();
        Self {
            session,
            navigator,
            seen,
        }
    }

    /// Returns the decision for the current status without side effects.
    #[must_use]
    pub fn decision(&self) -> Decision {
        Decision::for_status(self.session.borrow().status())
    }

    /// Returns the decision for the current status, navigating to login on
    /// `Redirect`.
    pub fn evaluate(&mut self) -> Decision {
        let status = self.session.borrow_and_update().status();
        self.seen = status;
        let decision = Decision::for_status(status);
        if decision == Decision::Redirect {
            self.navigator.to_login();
        }
        decision
    }

    /// Waits out initialization, then evaluates.
    ///
    /// Never returns `Suspend`.
    pub async fn resolve(&mut self) -> Decision {
        let settled = self
            .session
            .wait_for(|session| session.status() != SessionStatus::Initializing)
            .await
            .is_ok();
        if !settled {
            // Controller dropped mid-startup; nothing will ever authenticate.
            self.navigator.to_login();
            return Decision::Redirect;
        }
        self.evaluate()
    }

    /// Waits until the status differs from the last one this gate observed
    /// and returns the new decision.
    ///
    /// Returns `None` once the session controller is gone.
    pub async fn changed(&mut self) -> Option<Decision> {
        loop {
            self.session.changed().await.ok()?;
            let status = self.session.borrow_and_update().status();
            if status != self.seen {
                self.seen = status;
                return Some(Decision::for_status(status));
            }
        }
    }

    /// Runs a protected view while the session stays authenticated.
    ///
    /// Waits out initialization first. If the session is, or becomes,
    /// unauthenticated the view is abandoned and the user is sent to login.
    /// A server-side revocation has already navigated, so it is not repeated.
    pub async fn guard<F>(&mut self, view: F) -> Result<F::Output, AccessDenied>
    where
        F: Future,
    {
        if self.resolve().await != Decision::Render {
            return Err(self.denied());
        }

        let session = &mut self.session;
        let lost = async move {
            session
                .wait_for(|session| session.status() != SessionStatus::Authenticated)
                .await
                .map(|session| session.ended())
                .ok()
                .flatten()
        };

        tokio::select! {
            output = view => Ok(output),
            ended = lost => {
                debug!(?ended, "session lost while protected view was active");
                if ended != Some(SessionEnd::Revoked) {
                    self.navigator.to_login();
                }
                Err(AccessDenied { reason: ended })
            }
        }
    }

    fn denied(&self) -> AccessDenied {
        AccessDenied {
            reason: self.session.borrow().ended(),
        }
    }
}
