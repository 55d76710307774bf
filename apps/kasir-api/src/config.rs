//! # Server Configuration
//!
//! Configuration for the HTTP server, its database and report clock.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KASIR_PORT=9000                                                    │
//! │     KASIR_UTC_OFFSET=+07:00                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, else $KASIR_CONFIG, else                          │
//! │     ~/.config/kasir-pos/kasir.toml (Linux)                             │
//! │     ~/Library/Application Support/com.kasir.pos/kasir.toml (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:8080, ./kasir.db, UTC                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # kasir.toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! path = "./kasir.db"
//! max_connections = 5
//!
//! [report]
//! utc_offset = "+07:00"  # store-local day boundaries for reports
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "KASIR_CONFIG";

// =============================================================================
// Errors
// =============================================================================

/// Failures while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is present but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

/// SQLite file and pool size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSection {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./kasir.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSection {
    fn default() -> Self {
        DatabaseSection {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Reporting clock.
///
/// `utc_offset` decides where a business day starts and ends. A shop in
/// Jakarta sets `+07:00` so a sale at 23:30 local time lands on that day,
/// not the next UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
}

fn default_utc_offset() -> String {
    "+00:00".to_string()
}

impl Default for ReportSection {
    fn default() -> Self {
        ReportSection {
            utc_offset: default_utc_offset(),
        }
    }
}

// =============================================================================
// Server Config
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub report: ReportSection,
}

impl ServerConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from TOML file if one is found
    /// 3. Override with environment variables
    /// 4. Validate
    ///
    /// An explicit `config_path` (or `$KASIR_CONFIG`) must exist; the
    /// platform default location is optional.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let explicit = config_path.or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                Self::from_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading server config from file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be greater than 0".into()));
        }

        if self.server.bind_addr.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "server.bind_addr must be an IP address, got: {}",
                self.server.bind_addr
            )));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }

        self.utc_offset()?;

        Ok(())
    }

    /// Applies `KASIR_*` environment variables on top of the current values.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override logic with an injectable lookup so tests never touch the
    /// process environment.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("KASIR_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("KASIR_PORT") {
            match port.parse::<u16>() {
                Ok(p) => {
                    debug!(port = p, "Overriding port from environment");
                    self.server.port = p;
                }
                Err(_) => warn!(value = %port, "Ignoring unparseable KASIR_PORT"),
            }
        }

        if let Some(path) = lookup("KASIR_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("KASIR_DB_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(m) => self.database.max_connections = m,
                Err(_) => warn!(value = %max, "Ignoring unparseable KASIR_DB_MAX_CONNECTIONS"),
            }
        }

        if let Some(offset) = lookup("KASIR_UTC_OFFSET") {
            debug!(offset = %offset, "Overriding report offset from environment");
            self.report.utc_offset = offset;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "kasir", "pos")
            .map(|dirs| dirs.config_dir().join("kasir.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Address the listener binds to.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        let ip: IpAddr = self.server.bind_addr.parse().map_err(|_| {
            ConfigError::Invalid(format!("invalid bind address: {}", self.server.bind_addr))
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// The parsed report offset.
    pub fn utc_offset(&self) -> ConfigResult<FixedOffset> {
        parse_utc_offset(&self.report.utc_offset)
    }
}

/// Parses `Z`, `+HH:MM` or `-HH:MM` into a fixed offset.
pub fn parse_utc_offset(raw: &str) -> ConfigResult<FixedOffset> {
    let s = raw.trim();
    let invalid = || {
        ConfigError::Invalid(format!(
            "report.utc_offset must look like +07:00, -05:30 or Z, got: {raw}"
        ))
    };

    if s.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let bytes = s.as_bytes();
    if bytes.len() != 6 || bytes[3] != b':' {
        return Err(invalid());
    }

    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(invalid()),
    };

    let hours: i32 = s[1..3].parse().map_err(|_| invalid())?;
    let minutes: i32 = s[4..6].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, PathBuf::from("./kasir.db"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 0);
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml(
            r#"
            [server]
            port = 9000

            [report]
            utc_offset = "+07:00"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 7 * 3600);
    }

    #[test]
    fn test_malformed_toml() {
        let err = ServerConfig::from_toml("[server\nport = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("KASIR_PORT", "3000"),
            ("KASIR_BIND_ADDR", "127.0.0.1"),
            ("KASIR_DB_PATH", "/tmp/shop.db"),
            ("KASIR_DB_MAX_CONNECTIONS", "not-a-number"),
            ("KASIR_UTC_OFFSET", "-05:30"),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
        assert_eq!(config.database.path, PathBuf::from("/tmp/shop.db"));
        // Unparseable value leaves the previous one in place
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(
            config.utc_offset().unwrap().local_minus_utc(),
            -(5 * 3600 + 30 * 60)
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = ServerConfig::default();

        config.server.port = 0;
        assert!(config.validate().is_err());
        config.server.port = 8080;

        config.database.max_connections = 0;
        assert!(config.validate().is_err());
        config.database.max_connections = 1;

        config.server.bind_addr = "localhost".to_string();
        assert!(config.validate().is_err());
        config.server.bind_addr = "::1".to_string();
        assert!(config.validate().is_ok());

        config.report.utc_offset = "WIB".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("+08:00").unwrap().local_minus_utc(), 8 * 3600);
        assert_eq!(parse_utc_offset(" +05:45 ").unwrap().local_minus_utc(), 5 * 3600 + 45 * 60);
        assert_eq!(parse_utc_offset("-00:30").unwrap().local_minus_utc(), -1800);

        for bad in ["", "+7", "+07", "07:00", "+24:00", "+07:60", "+07-00", "+0a:00"] {
            assert!(parse_utc_offset(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = ServerConfig::load(Some(PathBuf::from("/definitely/not/here/kasir.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&ServerConfig::default()).unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[report]"));
    }
}
