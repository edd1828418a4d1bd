//! Subcommand implementations.
//!
//! Protected subcommands run their body through the access gate: they only
//! start once the session is authenticated, and are abandoned if the session
//! is torn down while they run.

pub mod assistant;
pub mod auth;
pub mod budget;
pub mod expenses;
pub mod goals;
pub mod insights;
pub mod profile;
pub mod recurring;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::output::OutputFormat;
use chrono::NaiveDate;
use spendwise_api::SpendwiseApi;
use spendwise_core::Result;
use spendwise_session::{FileCredentialStore, HttpTransport, Navigator, SessionController};
use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Navigation to the login entry point, rendered as a hint on stderr.
///
/// A command shows the hint at most once.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    shown: AtomicBool,
}

impl TerminalNavigator {
    /// Marks the hint as shown. Returns true the first time only.
    fn claim(&self) -> bool {
        !self.shown.swap(true, Ordering::SeqCst)
    }
}

impl Navigator for TerminalNavigator {
    fn to_login(&self) {
        if self.claim() {
            eprintln!("You are not logged in. Run `spendwise login` to continue.");
        }
    }
}

/// Everything a subcommand needs.
pub struct Context {
    api: SpendwiseApi,
    format: OutputFormat,
}

impl Context {
    /// Wires the session stack for the configured server and state directory.
    pub fn new(config: &CliConfig, format: OutputFormat) -> Result<Self, CliError> {
        let transport = HttpTransport::new(&config.client()).map_err(|report| {
            let message = report.current_context().to_string();
            report.context(CliError::Config { message })
        })?;
        let store = FileCredentialStore::in_dir(&config.state_dir);
        let session = SessionController::new(
            Arc::new(transport),
            Arc::new(store),
            Arc::new(TerminalNavigator::default()),
        );

        Ok(Self {
            api: SpendwiseApi::new(session),
            format,
        })
    }

    pub fn api(&self) -> &SpendwiseApi {
        &self.api
    }

    pub fn session(&self) -> &SessionController {
        self.api.session()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Reconciles the stored credential, then runs `view` under the gate.
    pub async fn protected<T, F>(&self, view: F) -> Result<T, CliError>
    where
        F: Future<Output = Result<T, CliError>>,
    {
        self.session().initialize().await;
        let mut gate = self.session().gate();
        match gate.guard(view).await {
            Ok(result) => result,
            Err(denied) => Err(CliError::from(denied).into()),
        }
    }
}

/// Today's date in the local time zone.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Reads one trimmed line from stdin after printing `label`.
pub fn prompt_line(label: &str) -> Result<String, CliError> {
    print!("{label}");
    io::stdout()
        .flush()
        .map_err(|e| CliError::input(format!("failed to write prompt: {e}")))?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| CliError::input(format!("failed to read input: {e}")))?;
    Ok(line.trim().to_string())
}

/// Reads a password without echo. Empty answers are rejected.
pub fn prompt_password(label: &str) -> Result<String, CliError> {
    let password = rpassword::prompt_password(label)
        .map_err(|e| CliError::input(format!("failed to read password: {e}")))?;
    if password.is_empty() {
        return Err(CliError::input("password is required").into());
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_hint_is_claimed_once() {
        let navigator = TerminalNavigator::default();

        assert!(navigator.claim());
        assert!(!navigator.claim());
    }
}
