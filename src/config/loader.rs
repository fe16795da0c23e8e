//! Settings loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Settings;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "SERIAL_LINE";

/// Settings file name
const CONFIG_FILE_NAME: &str = "serial-line.toml";

/// Environment variable for explicit settings path
const CONFIG_PATH_ENV: &str = "SERIAL_LINE_CONFIG";

/// Settings loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved settings file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded settings
    pub settings: Settings,
}

impl ConfigLoader {
    /// Load settings using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `SERIAL_LINE_CONFIG` environment variable (explicit path)
    /// 2. `./serial-line.toml` (current directory)
    /// 3. `$XDG_CONFIG_HOME/serial-line/serial-line.toml`, falling back to
    ///    `~/.config/serial-line/serial-line.toml`
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables override values from the file.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut settings = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Settings::default(),
        };

        apply_env_overrides(&mut settings)?;

        Ok(Self {
            config_path,
            settings,
        })
    }

    /// Load settings from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut settings = load_from_file(&path)?;
        apply_env_overrides(&mut settings)?;

        Ok(Self {
            config_path: Some(path),
            settings,
        })
    }

    /// Create a loader with default settings (no file).
    pub fn with_defaults() -> ConfigResult<Self> {
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings)?;

        Ok(Self {
            config_path: None,
            settings,
        })
    }

    /// Get the loaded settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Consume the loader and return the settings.
    pub fn into_settings(self) -> Settings {
        self.settings
    }
}

/// Resolve the settings file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    get_default_config_path().filter(|path| path.exists())
}

/// Get the platform config directory.
fn get_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
}

/// Get the default settings file path.
pub fn get_default_config_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("serial-line").join(CONFIG_FILE_NAME))
}

fn load_from_file(path: &Path) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

fn env_var(key: &str) -> Option<(String, String)> {
    let var = format!("{}_{}", ENV_PREFIX, key);
    std::env::var(&var).ok().map(|val| (var, val))
}

/// Apply environment variable overrides.
///
/// - `SERIAL_LINE_PORT=/dev/ttyUSB0`
/// - `SERIAL_LINE_BAUD=115200`
/// - `SERIAL_LINE_TIMEOUT_MS=500`
/// - `SERIAL_LINE_LOG_LEVEL=debug`
fn apply_env_overrides(settings: &mut Settings) -> ConfigResult<()> {
    if let Some((_, val)) = env_var("PORT") {
        settings.serial.name = Some(val);
    }
    if let Some((var, val)) = env_var("BAUD") {
        settings.serial.baud = val
            .parse()
            .map_err(|_| ConfigError::env_parse(var, "Invalid baud rate"))?;
    }
    if let Some((var, val)) = env_var("TIMEOUT_MS") {
        settings.serial.read_timeout_ms = val
            .parse()
            .map_err(|_| ConfigError::env_parse(var, "Invalid timeout"))?;
    }
    if let Some((_, val)) = env_var("LOG_LEVEL") {
        settings.logging.level = val;
    }

    Ok(())
}
