use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for cadenza.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (CADENZA_* prefix)
/// 3. Config file (~/.config/cadenza/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: CADENZA_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/cadenza/cadenza.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Address the HTTP API binds to.
    ///
    /// Can be set via:
    /// - CLI: cadenza serve --listen 0.0.0.0:8080
    /// - ENV: CADENZA_LISTEN_ADDR
    /// - Config: listen_addr = "127.0.0.1:5080"
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            listen_addr: default_listen_addr(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("cadenza");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Apply CLI overrides on top of the loaded configuration.
    #[must_use]
    pub fn with_overrides(mut self, db_path: Option<PathBuf>, listen_addr: Option<String>) -> Self {
        if let Some(db_path) = db_path {
            self.database_path = db_path;
        }
        if let Some(listen_addr) = listen_addr {
            self.listen_addr = listen_addr;
        }
        self
    }
}

/// Get the default database path.
///
/// Returns: ~/.local/share/cadenza/cadenza.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cadenza")
        .join("cadenza.db")
}

fn default_listen_addr() -> String {
    "127.0.0.1:5080".to_string()
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/cadenza/config.toml
/// - macOS: ~/Library/Application Support/cadenza/config.toml
/// - Windows: %APPDATA%\cadenza\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cadenza")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Cadenza Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (CADENZA_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite database holding composers and compositions
#
# Can also be set via:
# - CLI: cadenza --db /custom/path.db serve
# - Environment: CADENZA_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/cadenza.db"

# Address the HTTP API listens on
#
# Can also be set via:
# - CLI: cadenza serve --listen 0.0.0.0:8080
# - Environment: CADENZA_LISTEN_ADDR=0.0.0.0:8080
listen_addr = "127.0.0.1:5080"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database_path.ends_with("cadenza.db"));
        assert_eq!(config.listen_addr, "127.0.0.1:5080");
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::default().with_overrides(
            Some(PathBuf::from("/tmp/test.db")),
            Some("0.0.0.0:9000".to_string()),
        );
        assert_eq!(config.database_path, PathBuf::from("/tmp/test.db"));
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
    }

    #[test]
    fn test_missing_overrides_keep_values() {
        let config = Config::default().with_overrides(None, None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }
}
