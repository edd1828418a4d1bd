//! Session commands: login, register, logout, status, health.

use super::{Context, prompt_line, prompt_password};
use crate::error::{CliError, authentication_failed, request_failed};
use crate::output::{self, print_row};
use serde::Serialize;
use spendwise_core::Result;
use spendwise_session::{Registration, RoleSet, Session, SessionEnd, SessionStatus};

/// Logs in, prompting for missing answers.
pub async fn login(
    ctx: &Context,
    username: Option<String>,
    password: Option<String>,
) -> Result<(), CliError> {
    ctx.session().initialize().await;
    if let Some(identity) = ctx.session().snapshot().identity() {
        output::print_success(
            &format!("Already logged in as {}", identity.username()),
            ctx.format(),
        );
        return Ok(());
    }

    let username = match username {
        Some(username) => username,
        None => prompt_line("Username or email: ")?,
    };
    if username.is_empty() {
        return Err(CliError::input("username or email is required").into());
    }
    let password = match password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };

    let identity = ctx
        .session()
        .login(&username, &password)
        .await
        .map_err(authentication_failed)?;

    output::print_success(
        &format!("Logged in as {}", identity.username()),
        ctx.format(),
    );
    Ok(())
}

/// Registers a new account and logs it in.
pub async fn register(ctx: &Context, username: String, email: String) -> Result<(), CliError> {
    ctx.session().initialize().await;

    let password = prompt_password("Password: ")?;
    let confirmation = prompt_password("Confirm password: ")?;
    if password != confirmation {
        return Err(CliError::input("passwords do not match").into());
    }

    let identity = ctx
        .session()
        .register(&Registration::new(username, email, password))
        .await
        .map_err(authentication_failed)?;

    output::print_success(
        &format!("Registered and logged in as {}", identity.username()),
        ctx.format(),
    );
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<(), CliError> {
    ctx.session().logout();
    output::print_success("Logged out", ctx.format());
    Ok(())
}

#[derive(Debug, Serialize)]
struct StatusView {
    status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    roles: Option<RoleSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<SessionEnd>,
}

impl From<&Session> for StatusView {
    fn from(session: &Session) -> Self {
        let identity = session.identity();
        Self {
            status: session.status(),
            username: identity.map(|i| i.username().to_string()),
            email: identity.map(|i| i.email().to_string()),
            roles: identity.map(|i| i.roles().clone()),
            reason: session.ended(),
        }
    }
}

/// Shows the session after reconciling the stored credential.
pub async fn status(ctx: &Context) -> Result<(), CliError> {
    ctx.session().initialize().await;
    let view = StatusView::from(&ctx.session().snapshot());

    output::print(&view, ctx.format(), |view| {
        print_row("Status", &view.status.to_string());
        if let Some(username) = &view.username {
            print_row("Username", username);
        }
        if let Some(email) = &view.email {
            print_row("Email", email);
        }
        if let Some(roles) = view.roles.as_ref().filter(|roles| !roles.is_empty()) {
            let roles: Vec<&str> = roles.roles().iter().map(|r| r.as_str()).collect();
            print_row("Roles", &roles.join(", "));
        }
        if let Some(reason) = view.reason {
            print_row("Reason", &reason.to_string());
        }
    });
    Ok(())
}

/// Probes the public health endpoint. Needs no session.
pub async fn health(ctx: &Context) -> Result<(), CliError> {
    let health = ctx
        .api()
        .health()
        .check()
        .await
        .map_err(request_failed)?;

    output::print(&health, ctx.format(), |health| {
        print_row("Status", &health.status);
        if let Some(application) = &health.application {
            print_row("Application", application);
        }
    });

    if health.is_up() {
        Ok(())
    } else {
        Err(CliError::Request {
            message: format!("server reports status {}", health.status),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendwise_session::{
        ClientConfig, HttpTransport, MemoryCredentialStore, SessionController,
    };
    use std::sync::Arc;

    #[tokio::test]
    async fn status_view_of_empty_session() {
        let store = Arc::new(MemoryCredentialStore::new());
        let transport =
            HttpTransport::new(&ClientConfig::new("http://127.0.0.1:9/api")).expect("transport");
        let session = SessionController::new(Arc::new(transport), store, Arc::new(|| {}));
        session.initialize().await;

        let view = StatusView::from(&session.snapshot());

        assert_eq!(view.status, SessionStatus::Unauthenticated);
        assert_eq!(view.reason, Some(SessionEnd::NoCredential));
        assert_eq!(
            serde_json::to_value(&view).expect("json"),
            serde_json::json!({"status": "unauthenticated", "reason": "no_credential"})
        );
    }
}
