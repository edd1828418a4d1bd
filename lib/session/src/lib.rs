//! Session lifecycle for the spendwise client.
//!
//! This crate owns everything between the user and the remote expense
//! service that concerns authorization:
//!
//! - [`CredentialStore`]: durable slot for the single bearer credential
//! - [`ApiGateway`]: the one outbound channel; attaches the credential and
//!   tears the session down when the server rejects it
//! - [`SessionController`]: startup reconciliation, login, registration,
//!   logout, and identity updates
//! - [`AccessGate`]: decides whether protected views may render
//!
//! # Example
//!
//! ```no_run
//! use spendwise_session::{
//!     ClientConfig, FileCredentialStore, HttpTransport, SessionController,
//! };
//! use std::sync::Arc;
//!
//! # async fn run() -> spendwise_core::Result<(), spendwise_session::GatewayError> {
//! let transport = HttpTransport::new(&ClientConfig::default())?;
//! let store = FileCredentialStore::in_dir("/tmp/spendwise");
//! let controller = SessionController::new(
//!     Arc::new(transport),
//!     Arc::new(store),
//!     Arc::new(|| eprintln!("please log in")),
//! );
//!
//! controller.initialize().await;
//! let mut gate = controller.gate();
//! let _ = gate.resolve().await;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod controller;
pub mod credential;
pub mod error;
pub mod gate;
pub mod gateway;
pub mod identity;
pub mod navigation;
pub mod role;
pub mod state;
pub mod transport;

#[cfg(test)]
mod testing;

pub use auth::{AuthResponse, LoginRequest, Registration};
pub use config::ClientConfig;
pub use controller::SessionController;
pub use credential::{Credential, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::{AccessDenied, GatewayError, SessionError};
pub use gate::{AccessGate, Decision};
pub use gateway::ApiGateway;
pub use identity::{Identity, IdentityPatch};
pub use navigation::Navigator;
pub use role::{Role, RoleSet};
pub use state::{Session, SessionEnd, SessionStatus};
pub use transport::{ApiResponse, HttpTransport, Method, OutboundRequest, Transport};
