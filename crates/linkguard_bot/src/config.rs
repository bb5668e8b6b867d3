//! Process configuration.

use derive_getters::Getters;
use linkguard_core::UserId;
use linkguard_error::{ConfigError, LinkguardResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Environment variable overriding the owner id.
pub const ENV_OWNER_ID: &str = "LINKGUARD_OWNER_ID";
/// Environment variable overriding the exemption file location.
pub const ENV_WHITELIST_FILE: &str = "LINKGUARD_WHITELIST_FILE";
/// Environment variable overriding the log filter.
pub const ENV_LOG: &str = "LINKGUARD_LOG";

fn default_whitelist_path() -> PathBuf {
    PathBuf::from("whitelist.json")
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_event_buffer() -> usize {
    256
}

/// Configuration as written in the TOML file; every field optional so the
/// environment can fill the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    owner_id: Option<UserId>,
    whitelist_path: Option<PathBuf>,
    log_filter: Option<String>,
    json_logs: Option<bool>,
    event_buffer: Option<usize>,
}

/// Validated configuration for the moderation agent.
///
/// Loaded from a TOML file, then overridden by `LINKGUARD_*` environment
/// variables (after a `.env` file, if present, has been read).
///
/// ```toml
/// owner_id = 123456789
/// whitelist_path = "/var/lib/linkguard/whitelist.json"
/// log_filter = "linkguard=debug,info"
/// json_logs = true
/// event_buffer = 512
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct BotConfig {
    /// The single user with unconditional privilege in every chat
    owner_id: UserId,
    /// Exemption store file
    whitelist_path: PathBuf,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    log_filter: String,
    /// Emit logs as JSON lines
    json_logs: bool,
    /// Capacity of the inbound event channel
    event_buffer: usize,
}

impl BotConfig {
    /// Configuration with defaults for everything but the owner.
    pub fn new(owner_id: UserId) -> Self {
        Self {
            owner_id,
            whitelist_path: default_whitelist_path(),
            log_filter: default_log_filter(),
            json_logs: false,
            event_buffer: default_event_buffer(),
        }
    }

    /// Load configuration from the optional file and the process environment.
    ///
    /// A `.env` file in the working directory is read first. A missing `.env`
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed, an
    /// override does not parse, no owner is configured, or validation fails.
    #[instrument(skip_all, fields(path = ?path.map(Path::display)))]
    pub fn load(path: Option<&Path>) -> LinkguardResult<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!(env_file = %env_file.display(), "Loaded environment file");
        }

        let contents = path
            .map(|path| {
                std::fs::read_to_string(path).map_err(|e| {
                    ConfigError::new(format!(
                        "Failed to read config file {}: {}",
                        path.display(),
                        e
                    ))
                })
            })
            .transpose()?;

        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Load configuration from a TOML file, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read, does not
    /// parse, or fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> LinkguardResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_sources(Some(&contents), |_| None)
    }

    /// Build configuration from TOML text and an environment lookup.
    ///
    /// Environment values win over the file. Either source may be absent, but
    /// together they must name an owner.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on malformed TOML, unparseable overrides,
    /// a missing owner or failed validation.
    pub fn from_sources(
        toml_text: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> LinkguardResult<Self> {
        let file: ConfigFile = match toml_text {
            Some(text) => toml::from_str(text)
                .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?,
            None => ConfigFile::default(),
        };

        let owner_id = match env(ENV_OWNER_ID) {
            Some(raw) => raw.trim().parse::<UserId>().map_err(|e| {
                ConfigError::new(format!("{} is not a user id ({}): {}", ENV_OWNER_ID, raw, e))
            })?,
            None => file.owner_id.ok_or_else(|| {
                ConfigError::new(format!(
                    "owner_id is not configured; set it in the config file or {}",
                    ENV_OWNER_ID
                ))
            })?,
        };

        let config = Self {
            owner_id,
            whitelist_path: env(ENV_WHITELIST_FILE)
                .map(PathBuf::from)
                .or(file.whitelist_path)
                .unwrap_or_else(default_whitelist_path),
            log_filter: env(ENV_LOG)
                .or(file.log_filter)
                .unwrap_or_else(default_log_filter),
            json_logs: file.json_logs.unwrap_or(false),
            event_buffer: file.event_buffer.unwrap_or_else(default_event_buffer),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the rest of the process relies on.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero owner id, an empty whitelist
    /// path or a zero event buffer.
    pub fn validate(&self) -> LinkguardResult<()> {
        if self.owner_id.get() == 0 {
            return Err(ConfigError::new("owner_id must be non-zero").into());
        }
        if self.whitelist_path.as_os_str().is_empty() {
            return Err(ConfigError::new("whitelist_path must not be empty").into());
        }
        if self.event_buffer == 0 {
            return Err(ConfigError::new("event_buffer must be at least 1").into());
        }
        Ok(())
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if serialization fails.
    pub fn to_toml(&self) -> LinkguardResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to render config: {}", e)).into())
    }
}
