//! Client configuration: service endpoints, quote loading floor, and local storage.
//!
//! Precedence: `QUICKPROTO__*` env > config file (`QUICKPROTO_CONFIG`, default
//! `config/quickproto`) > built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_GENERATE_URL: &str = "http://localhost:5000/api/generate-prototype";
pub const DEFAULT_QUOTE_URL: &str = "http://localhost:5001/generate-quote";
/// Minimum time the quote loading state stays visible after the call completes.
pub const DEFAULT_QUOTE_LOADING_FLOOR_SECS: u64 = 30;
pub const DEFAULT_STORAGE_PATH: &str = "./data";

/// Configuration for the prototype session and its two remote services.
///
/// | Env | Default |
/// |-----|---------|
/// | QUICKPROTO__GENERATE_URL | http://localhost:5000/api/generate-prototype |
/// | QUICKPROTO__QUOTE_URL | http://localhost:5001/generate-quote |
/// | QUICKPROTO__QUOTE_LOADING_FLOOR_SECS | 30 |
/// | QUICKPROTO__STORAGE_PATH | ./data |
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Generation endpoint (`POST {prompt}` → JSON artifact).
    pub generate_url: String,
    /// Quote endpoint (`POST {request}` → PDF bytes).
    pub quote_url: String,
    pub quote_loading_floor_secs: u64,
    /// Base directory for the preview surface and quote documents.
    pub storage_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            generate_url: DEFAULT_GENERATE_URL.to_string(),
            quote_url: DEFAULT_QUOTE_URL.to_string(),
            quote_loading_floor_secs: DEFAULT_QUOTE_LOADING_FLOOR_SECS,
            storage_path: DEFAULT_STORAGE_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load config from file and environment. Path comes from `QUICKPROTO_CONFIG`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("QUICKPROTO_CONFIG").unwrap_or_else(|_| "config/quickproto".to_string());
        Self::load_from_path(Path::new(&config_path))
    }

    /// Load config from a file (skipped when missing), then the environment.
    ///
    /// `path` may omit the extension; each format the `config` crate knows is tried
    /// (`config/quickproto` finds `config/quickproto.toml`).
    pub fn load_from_path(path: &Path) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, None)
    }

    /// `env` replaces the process environment as the `QUICKPROTO__*` source when given.
    fn load_with_env(
        path: &Path,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("generate_url", DEFAULT_GENERATE_URL)?
            .set_default("quote_url", DEFAULT_QUOTE_URL)?
            .set_default(
                "quote_loading_floor_secs",
                DEFAULT_QUOTE_LOADING_FLOOR_SECS as i64,
            )?
            .set_default("storage_path", DEFAULT_STORAGE_PATH)?
            .add_source(config::File::with_name(&path.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix("QUICKPROTO")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }

    pub fn quote_loading_floor(&self) -> Duration {
        Duration::from_secs(self.quote_loading_floor_secs)
    }

    /// Directory holding the single preview document.
    pub fn preview_dir(&self) -> PathBuf {
        Path::new(&self.storage_path).join("preview")
    }

    /// Directory holding live quote documents (at most one at a time).
    pub fn quote_dir(&self) -> PathBuf {
        Path::new(&self.storage_path).join("quotes")
    }
}
