//! # Configuration
//!
//! Application settings, read from an optional TOML file and then
//! overridden by environment variables.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! cors_origins = "https://verdant.example"
//! rate_limit = 100
//!
//! [upload]
//! processing_delay_ms = 2000
//! require_fields = false
//!
//! [sort]
//! price = "ascending"
//! co2Amount = "descending"
//! rating = "descending"
//! ```
//!
//! ## Environment Overrides
//!
//! - `VERDANT_HOST`, `VERDANT_PORT`
//! - `VERDANT_CORS_ORIGINS`: comma-separated origins, or "*" for all
//! - `VERDANT_RATE_LIMIT`: requests per second, 0 disables
//! - `VERDANT_PROCESSING_DELAY_MS`

use serde::{Deserialize, Serialize};
use std::path::Path;
use verdant_core::primitives::PROCESSING_DELAY_MS;
use verdant_core::{LedgerError, SessionSettings, SortTable, ValidationPolicy};

/// Default rate limit in requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Largest config file accepted.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. `None` means localhost only.
    pub cors_origins: Option<String>,
    pub rate_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: None,
            rate_limit: DEFAULT_RATE_LIMIT,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upload wizard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    pub processing_delay_ms: u64,
    /// Require project name and location before leaving step 1.
    pub require_fields: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: PROCESSING_DELAY_MS,
            require_fields: false,
        }
    }
}

/// All application settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub sort: SortTable,
}

impl AppConfig {
    /// Read `path` if given, then apply the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, LedgerError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a config file without environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, LedgerError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            LedgerError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(LedgerError::Config(format!(
                "Config file size {} bytes exceeds maximum {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, LedgerError> {
        toml::from_str(contents).map_err(|e| LedgerError::Config(e.to_string()))
    }

    /// Apply `VERDANT_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), LedgerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("VERDANT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("VERDANT_PORT") {
            self.server.port = parse_override("VERDANT_PORT", &port)?;
        }
        if let Some(origins) = lookup("VERDANT_CORS_ORIGINS") {
            self.server.cors_origins = Some(origins);
        }
        if let Some(limit) = lookup("VERDANT_RATE_LIMIT") {
            self.server.rate_limit = parse_override("VERDANT_RATE_LIMIT", &limit)?;
        }
        if let Some(delay) = lookup("VERDANT_PROCESSING_DELAY_MS") {
            self.upload.processing_delay_ms =
                parse_override("VERDANT_PROCESSING_DELAY_MS", &delay)?;
        }
        Ok(())
    }

    /// Core session settings derived from this config.
    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            sort_table: self.sort.clone(),
            validation: if self.upload.require_fields {
                ValidationPolicy::RequireFields
            } else {
                ValidationPolicy::Lenient
            },
            processing_delay_ms: self.upload.processing_delay_ms,
        }
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, LedgerError> {
    raw.trim()
        .parse()
        .map_err(|_| LedgerError::Config(format!("{}: invalid value '{}'", key, raw)))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use verdant_core::{SortDirection, SortField};

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.addr(), "127.0.0.1:8080");
        assert_eq!(config.server.rate_limit, 100);
        assert_eq!(config.upload.processing_delay_ms, 2000);
        assert_eq!(config.sort, SortTable::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml("[upload]\nprocessing_delay_ms = 250\n").expect("parse");
        assert_eq!(config.upload.processing_delay_ms, 250);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn sort_table_from_file() {
        let config = AppConfig::from_toml("[sort]\nprice = \"descending\"\n").expect("parse");
        assert_eq!(
            config.sort.direction(SortField::Price),
            Some(SortDirection::Descending)
        );
        // A table given in the file replaces the default one.
        assert_eq!(config.sort.direction(SortField::Rating), None);
    }

    #[test]
    fn unknown_sort_key_rejected() {
        let result = AppConfig::from_toml("[sort]\nvintage = \"ascending\"\n");
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        assert!(AppConfig::from_toml("[database]\npath = \"x\"\n").is_err());
    }

    #[test]
    fn env_overrides_file() {
        let mut config = AppConfig::from_toml("[server]\nport = 9000\n").expect("parse");
        config
            .apply_overrides(lookup(&[
                ("VERDANT_PORT", "9100"),
                ("VERDANT_RATE_LIMIT", "0"),
                ("VERDANT_CORS_ORIGINS", "*"),
            ]))
            .expect("overrides");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.rate_limit, 0);
        assert_eq!(config.server.cors_origins.as_deref(), Some("*"));
    }

    #[test]
    fn bad_env_value_is_config_error() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(lookup(&[("VERDANT_PROCESSING_DELAY_MS", "soon")]));
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }

    #[test]
    fn reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[upload]\nrequire_fields = true").expect("write");

        let config = AppConfig::from_file(file.path()).expect("load");
        assert_eq!(
            config.session_settings().validation,
            ValidationPolicy::RequireFields
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = AppConfig::from_file(Path::new("/nonexistent/verdant.toml"));
        assert!(matches!(result, Err(LedgerError::Io(_))));
    }
}
