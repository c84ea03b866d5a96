//! Configuration loading and resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is never fatal: the remaining sources are used and
//! the caller reports it through [`ConfigSource::log`]. A config file that
//! exists but cannot be parsed is an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable for the database file path
pub const ENV_DATABASE: &str = "CHANTS_DATABASE";
/// Environment variable for the listen address
pub const ENV_BIND: &str = "CHANTS_BIND";
/// Environment variable for the listen port
pub const ENV_PORT: &str = "CHANTS_PORT";
/// Environment variable for the log filter
pub const ENV_LOG_LEVEL: &str = "CHANTS_LOG_LEVEL";

/// Compiled defaults used when no other source provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub database_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
}

impl CompiledDefaults {
    /// Defaults for the platform the binary was built for
    pub fn for_current_platform() -> Self {
        // ~/.local/share/chants on Linux, ~/Library/Application Support/chants
        // on macOS, %LOCALAPPDATA%\chants on Windows
        let data_dir = dirs::data_local_dir()
            .map(|d| d.join("chants"))
            .unwrap_or_else(|| PathBuf::from("./chants_data"));

        Self {
            database_path: data_dir.join("chants.db"),
            bind_address: "127.0.0.1".to_string(),
            port: 5780,
            log_level: "info".to_string(),
        }
    }
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML config string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a config file, returning `None` when the file does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Ok(Some(config))
    }
}

/// Default config file location: `<config_dir>/chants/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chants").join("config.toml"))
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub database_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
}

/// Where the config-file layer came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// File found and parsed
    File(PathBuf),
    /// File path known but absent; defaults used
    Missing(PathBuf),
    /// No config directory on this platform; defaults used
    NoConfigDir,
}

impl ConfigSource {
    /// Report the source; call once a tracing subscriber is installed
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded config file: {}", path.display()),
            ConfigSource::Missing(path) => {
                warn!("Config file not found: {} (using defaults)", path.display())
            }
            ConfigSource::NoConfigDir => {
                warn!("Could not determine config directory (using defaults)")
            }
        }
    }
}

/// Resolved configuration together with the config file it came from
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: ServiceConfig,
    pub source: ConfigSource,
}

impl ServiceConfig {
    /// Resolve configuration from CLI, environment, config file and defaults
    ///
    /// Nothing is logged here; the caller reports `source` once logging is up.
    pub fn resolve(cli: CliOverrides) -> Result<ResolvedConfig> {
        let config_path = cli.config_file.clone().or_else(default_config_path);

        let (file, source) = match config_path {
            Some(path) => match TomlConfig::load(&path)? {
                Some(config) => (config, ConfigSource::File(path)),
                None => (TomlConfig::default(), ConfigSource::Missing(path)),
            },
            None => (TomlConfig::default(), ConfigSource::NoConfigDir),
        };

        let config = Self::merge(cli, file, CompiledDefaults::for_current_platform())?;
        Ok(ResolvedConfig { config, source })
    }

    /// Merge the sources in priority order; environment is read here
    pub fn merge(cli: CliOverrides, file: TomlConfig, defaults: CompiledDefaults) -> Result<Self> {
        let port = match cli.port {
            Some(port) => Some(port),
            None => env_port()?,
        };

        Ok(Self {
            database_path: cli
                .database_path
                .or_else(|| env_var(ENV_DATABASE).map(PathBuf::from))
                .or(file.database_path)
                .unwrap_or(defaults.database_path),
            bind_address: cli
                .bind_address
                .or_else(|| env_var(ENV_BIND))
                .or(file.bind_address)
                .unwrap_or(defaults.bind_address),
            port: port.or(file.port).unwrap_or(defaults.port),
            log_level: cli
                .log_level
                .or_else(|| env_var(ENV_LOG_LEVEL))
                .or(file.log_level)
                .unwrap_or(defaults.log_level),
        })
    }

    /// Socket address the HTTP server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.bind_address.parse().map_err(|_| {
            Error::Config(format!("Invalid bind address: {}", self.bind_address))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_port() -> Result<Option<u16>> {
    match env_var(ENV_PORT) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} is not a valid port: {}", ENV_PORT, value))),
        None => Ok(None),
    }
}
