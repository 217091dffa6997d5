//! Server and runner configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then command-line flags.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Environment variable overriding the export directory.
pub const ENV_EXPORT_DIR: &str = "GAME_EXPORT_DIR";
/// Environment variable overriding the export file prefix.
pub const ENV_EXPORT_PREFIX: &str = "TERMINAL_EXPORT_PREFIX";
/// Environment variable naming a log file.
pub const ENV_LOG_FILENAME: &str = "LOG_FILENAME";
/// Environment variable overriding the listen port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding the listen host.
pub const ENV_HOST: &str = "HOST";

/// Configuration for the HTTP server and the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Directory receiving exported CSV files.
    #[serde(default = "default_export_dir")]
    export_dir: PathBuf,

    /// File name prefix for exported CSV files.
    #[serde(default = "default_export_prefix")]
    export_prefix: String,

    /// Optional log file, in addition to stderr.
    #[serde(default)]
    log_filename: Option<PathBuf>,

    /// Number of recent events kept per game.
    #[serde(default = "default_event_log_capacity")]
    event_log_capacity: usize,

    /// Pause between automatic moves.
    #[serde(default = "default_autoplay_delay_ms")]
    autoplay_delay_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("game_exports/")
}

fn default_export_prefix() -> String {
    "othello_terminal_data_".to_string()
}

fn default_event_log_capacity() -> usize {
    strictly_othello::DEFAULT_EVENT_CAPACITY
}

fn default_autoplay_delay_ms() -> u64 {
    50
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            export_dir: default_export_dir(),
            export_prefix: default_export_prefix(),
            log_filename: None,
            event_log_capacity: default_event_log_capacity(),
            autoplay_delay_ms: default_autoplay_delay_ms(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Missing keys take their defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Defaults, or the given file, with process environment applied on top.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies environment overrides using `lookup` to read variables.
    #[instrument(skip(self, lookup))]
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(dir) = lookup(ENV_EXPORT_DIR) {
            debug!(export_dir = %dir, "Export directory from environment");
            self.export_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = lookup(ENV_EXPORT_PREFIX) {
            self.export_prefix = prefix;
        }
        if let Some(file) = lookup(ENV_LOG_FILENAME) {
            self.log_filename = Some(PathBuf::from(file));
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid {}: {}", ENV_PORT, e)))?;
        }
        Ok(())
    }

    /// Overrides the host when given.
    pub fn override_host(&mut self, host: Option<String>) {
        if let Some(host) = host {
            self.host = host;
        }
    }

    /// Overrides the port when given.
    pub fn override_port(&mut self, port: Option<u16>) {
        if let Some(port) = port {
            self.port = port;
        }
    }

    /// Overrides the autoplay delay when given.
    pub fn override_autoplay_delay_ms(&mut self, delay_ms: Option<u64>) {
        if let Some(delay_ms) = delay_ms {
            self.autoplay_delay_ms = delay_ms;
        }
    }

    /// `host:port` listen address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.port(), 5001);
        assert_eq!(config.export_dir(), &PathBuf::from("game_exports/"));
        assert_eq!(config.export_prefix(), "othello_terminal_data_");
        assert_eq!(*config.log_filename(), None);
        assert_eq!(*config.event_log_capacity(), 8);
        assert_eq!(config.bind_address(), "127.0.0.1:5001");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_EXPORT_DIR, "/tmp/out"),
            (ENV_EXPORT_PREFIX, "run_"),
            (ENV_LOG_FILENAME, "othello_game.log"),
            (ENV_PORT, "8080"),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.export_dir(), &PathBuf::from("/tmp/out"));
        assert_eq!(config.export_prefix(), "run_");
        assert_eq!(
            config.log_filename().as_deref(),
            Some(Path::new("othello_game.log"))
        );
        assert_eq!(*config.port(), 8080);
        assert_eq!(config.host(), "127.0.0.1");
    }

    #[test]
    fn test_invalid_port_in_env() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_env(|key| (key == ENV_PORT).then(|| "not-a-port".to_string()))
            .unwrap_err();
        assert!(err.message.contains("PORT"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = ServerConfig::default();
        config.override_host(Some("0.0.0.0".to_string()));
        config.override_port(None);
        config.override_autoplay_delay_ms(Some(0));
        assert_eq!(config.bind_address(), "0.0.0.0:5001");
        assert_eq!(*config.autoplay_delay_ms(), 0);
    }
}
