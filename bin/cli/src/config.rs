//! Terminal client configuration.
//!
//! Loaded with the `config` crate from, in increasing precedence:
//! 1. built-in defaults
//! 2. `config.toml` in the state directory (optional)
//! 3. `SPENDWISE__*` environment variables
//!
//! Command-line flags are applied on top by the caller.

use serde::Deserialize;
use spendwise_session::ClientConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the optional configuration file inside the state directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

const ENV_PREFIX: &str = "SPENDWISE";

/// Configuration of the terminal client.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Base URL of the expense service.
    /// Default: "http://localhost:8080/api"
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Directory holding the credential slot and the configuration file.
    /// Default: the platform data directory joined with "spendwise".
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

fn default_base_url() -> String {
    ClientConfig::default().base_url().to_string()
}

fn default_request_timeout_seconds() -> u64 {
    ClientConfig::default().request_timeout().as_secs()
}

/// Platform data directory, falling back to the working directory when the
/// platform has none.
pub fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spendwise")
}

impl CliConfig {
    /// Loads configuration for the given state directory from its
    /// configuration file and the process environment.
    pub fn load(state_dir: &Path) -> Result<Self, config::ConfigError> {
        Self::load_with_env(state_dir, None)
    }

    /// Like [`load`](Self::load), reading environment variables from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(
        state_dir: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let file = state_dir.join(CONFIG_FILE_NAME);

        config::Config::builder()
            .set_default("state_dir", state_dir.to_string_lossy().as_ref())?
            .add_source(config::File::from(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the client configuration for the session layer.
    #[must_use]
    pub fn client(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone())
            .with_request_timeout_seconds(self.request_timeout_seconds)
    }
}
