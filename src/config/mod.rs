//! Configuration management
//!
//! This module handles loading and parsing configuration for the donor registry.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults. Admin
//! credentials have no default and must be supplied by one of the two sources.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Admin credentials
    #[serde(default)]
    pub admin: AdminConfig,
    /// Static web client configuration
    #[serde(default)]
    pub web: WebConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin, `*` allows any
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/donors.db".to_string()
}

/// Admin login credentials
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Static web client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Directory served for non-API paths
    #[serde(default = "default_web_path")]
    pub path: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            path: default_web_path(),
        }
    }
}

fn default_web_path() -> PathBuf {
    PathBuf::from("public")
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - DONOR_REGISTRY_SERVER_HOST
    /// - DONOR_REGISTRY_SERVER_PORT
    /// - DONOR_REGISTRY_SERVER_CORS_ORIGIN
    /// - DONOR_REGISTRY_DATABASE_URL
    /// - DONOR_REGISTRY_ADMIN_USERNAME
    /// - DONOR_REGISTRY_ADMIN_PASSWORD
    /// - DONOR_REGISTRY_WEB_PATH
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Check values that have no usable default
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.username.trim().is_empty() || self.admin.password.is_empty() {
            return Err(ConfigError::ValidationError(
                "admin.username and admin.password must be set \
                 (or DONOR_REGISTRY_ADMIN_USERNAME / DONOR_REGISTRY_ADMIN_PASSWORD)"
                    .to_string(),
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        // Server configuration
        if let Ok(host) = std::env::var("DONOR_REGISTRY_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("DONOR_REGISTRY_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("DONOR_REGISTRY_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(url) = std::env::var("DONOR_REGISTRY_DATABASE_URL") {
            self.database.url = url;
        }

        // Admin credentials
        if let Ok(username) = std::env::var("DONOR_REGISTRY_ADMIN_USERNAME") {
            self.admin.username = username;
        }
        if let Ok(password) = std::env::var("DONOR_REGISTRY_ADMIN_PASSWORD") {
            self.admin.password = password;
        }

        if let Ok(path) = std::env::var("DONOR_REGISTRY_WEB_PATH") {
            self.web.path = PathBuf::from(path);
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Tests that touch environment variables share this lock.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ENV_KEYS: &[&str] = &[
        "DONOR_REGISTRY_SERVER_HOST",
        "DONOR_REGISTRY_SERVER_PORT",
        "DONOR_REGISTRY_SERVER_CORS_ORIGIN",
        "DONOR_REGISTRY_DATABASE_URL",
        "DONOR_REGISTRY_ADMIN_USERNAME",
        "DONOR_REGISTRY_ADMIN_PASSWORD",
        "DONOR_REGISTRY_WEB_PATH",
    ];

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        super::CONFIG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::path::Path::new("nonexistent_config.yml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.cors_origin, "*");
        assert_eq!(config.database.url, "data/donors.db");
        assert_eq!(config.web.path, PathBuf::from("public"));
        assert!(config.admin.username.is_empty());
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "   \n").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: 8088\nadmin:\n  username: root\n").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.admin.username, "root");
        assert_eq!(config.admin.password, "");
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"
server:
  host: "127.0.0.1"
  port: 9000
  cors_origin: "http://localhost:5173"
database:
  url: "/var/lib/donors/donors.db"
admin:
  username: "registrar"
  password: "s3cret"
web:
  path: "static"
"#).unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_origin, "http://localhost:5173");
        assert_eq!(config.database.url, "/var/lib/donors/donors.db");
        assert_eq!(config.admin.username, "registrar");
        assert_eq!(config.admin.password, "s3cret");
        assert_eq!(config.web.path, PathBuf::from("static"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_invalid_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: not_a_number\n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validate_requires_admin_credentials() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = Config::default();
        config.admin.username = "admin".to_string();
        assert!(config.validate().is_err());

        config.admin.password = "pw".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let admin = AdminConfig {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{:?}", admin);
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_env_override_server_and_database() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  host: \"0.0.0.0\"\n  port: 3000\n").unwrap();

        std::env::set_var("DONOR_REGISTRY_SERVER_HOST", "192.168.1.1");
        std::env::set_var("DONOR_REGISTRY_SERVER_PORT", "4000");
        std::env::set_var("DONOR_REGISTRY_DATABASE_URL", "/tmp/registry.db");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.server.host, "192.168.1.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.database.url, "/tmp/registry.db");

        clear_env();
    }

    #[test]
    fn test_env_override_admin_credentials() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "admin:\n  username: file_user\n  password: file_pass\n").unwrap();

        std::env::set_var("DONOR_REGISTRY_ADMIN_USERNAME", "env_user");
        std::env::set_var("DONOR_REGISTRY_ADMIN_PASSWORD", "env_pass");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.admin.username, "env_user");
        assert_eq!(config.admin.password, "env_pass");

        clear_env();
    }

    #[test]
    fn test_env_invalid_port_is_ignored() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: 3100\n").unwrap();

        std::env::set_var("DONOR_REGISTRY_SERVER_PORT", "not-a-port");

        let config = Config::load_with_env(file.path()).unwrap();
        assert_eq!(config.server.port, 3100);

        clear_env();
    }
}
