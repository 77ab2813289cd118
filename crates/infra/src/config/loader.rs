//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If any `AGENDA_DB_*` variable is set, loads from the environment and
//!    reports incomplete or invalid values as errors
//! 2. Otherwise loads from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. Uses built-in defaults when no file exists anywhere
//!
//! ## Environment Variables
//! - `AGENDA_DB_PATH`: Database file path (required for env loading)
//! - `AGENDA_DB_POOL_SIZE`: Connection pool size (required for env loading)
//! - `AGENDA_LOG_LEVEL`: `tracing` filter directive (default `info`)
//! - `AGENDA_LOG_JSON`: Emit JSON log lines (true/false)
//! - `AGENDA_NOTIFICATIONS_ENABLED`: Queue seller notifications (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./agenda.json` or `./agenda.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use agenda_domain::{AgendaError, Config, DatabaseConfig, LoggingConfig, NotificationConfig, Result};

/// Database variables that select environment-based loading.
const DB_ENV_KEYS: [&str; 2] = ["AGENDA_DB_PATH", "AGENDA_DB_POOL_SIZE"];

/// Load configuration with automatic fallback strategy
///
/// Environment when any database variable is set, otherwise the first config
/// file found, otherwise defaults.
///
/// # Errors
/// Returns `AgendaError::Config` if the database variables are incomplete or
/// invalid, or if a config file is present but invalid.
pub fn load() -> Result<Config> {
    if DB_ENV_KEYS.iter().any(|key| std::env::var_os(key).is_some()) {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    if probe_config_paths().is_none() {
        tracing::info!("No config file found, using defaults");
        return Ok(Config::default());
    }
    load_from_file(None)
}

/// Load configuration from environment variables
///
/// The database variables are required; the others fall back to defaults.
///
/// # Errors
/// Returns `AgendaError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("AGENDA_DB_PATH")?;
    let db_pool_size = env_var("AGENDA_DB_POOL_SIZE").and_then(|s| {
        s.parse::<u32>().map_err(|e| AgendaError::Config(format!("Invalid pool size: {e}")))
    })?;

    let logging = LoggingConfig {
        level: std::env::var("AGENDA_LOG_LEVEL").unwrap_or_else(|_| LoggingConfig::default().level),
        json: env_bool("AGENDA_LOG_JSON", false),
    };
    let notifications =
        NotificationConfig { enabled: env_bool("AGENDA_NOTIFICATIONS_ENABLED", true) };

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        logging,
        notifications,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `AgendaError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AgendaError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AgendaError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AgendaError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AgendaError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AgendaError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AgendaError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
        candidates.push(cwd.join("../config.json"));
        candidates.push(cwd.join("../config.toml"));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> Vec<PathBuf> {
    ["config.json", "config.toml", "agenda.json", "agenda.toml"]
        .iter()
        .map(|name| dir.join(name))
        .collect()
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| AgendaError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
