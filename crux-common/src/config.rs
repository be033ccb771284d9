//! Configuration loading and data folder resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or malformed config file never stops startup; it is logged
//! and the defaults apply.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::loader::{DatasetPaths, DEFAULT_PROBLEMS_FILE, DEFAULT_RECORDS_FILE};
use crate::viewport::DEFAULT_VIEW_BOX;
use crate::{Error, Result};

/// Environment variable naming the data folder
pub const DATA_FOLDER_ENV: &str = "CRUX_DATA_FOLDER";

/// Default HTTP port of the wall viewer
pub const DEFAULT_PORT: u16 = 5760;

/// Settings read from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the two dataset files
    #[serde(default)]
    pub data_folder: Option<PathBuf>,

    /// Records table file name (relative to the data folder) or path
    #[serde(default)]
    pub records_file: Option<PathBuf>,

    /// Problem coordinate table file name (relative to the data folder) or path
    #[serde(default)]
    pub problems_file: Option<PathBuf>,

    /// Declared extent of the wall surface, `"x y w h"`
    #[serde(default)]
    pub view_box: Option<String>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Log level for the crux crates (trace, debug, info, warn, error);
    /// unset keeps the per-crate defaults
    #[serde(default)]
    pub level: Option<String>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load and parse one config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// The config file to read: `explicit` if given, else the first existing
    /// default location
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => config_file_candidates().into_iter().find(|p| p.exists()),
        }
    }

    /// Load `explicit` if given, else the first existing default location
    ///
    /// Falls back to defaults (with a warning) when the file is missing or
    /// cannot be parsed.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let Some(path) = Self::locate(explicit) else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Config file locations in lookup order
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("crux").join("config.toml"));
    }
    if cfg!(unix) {
        candidates.push(PathBuf::from("/etc/crux/config.toml"));
    }
    candidates
}

/// OS-dependent default data folder
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("crux"))
        .unwrap_or_else(|| PathBuf::from("./crux_data"))
}

/// Data folder: CLI argument, then `CRUX_DATA_FOLDER`, then TOML, then default
pub fn resolve_data_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(DATA_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.data_folder {
        return path.clone();
    }

    default_data_folder()
}

/// Overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_folder: Option<PathBuf>,
    pub records_file: Option<PathBuf>,
    pub problems_file: Option<PathBuf>,
    pub view_box: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved wall viewer settings
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSettings {
    pub data_folder: PathBuf,
    pub datasets: DatasetPaths,
    pub view_box: String,
    pub port: u16,
    /// Explicit log level, if any was configured
    pub log_level: Option<String>,
}

impl ViewerSettings {
    /// Merge command-line overrides, environment, and TOML onto the defaults
    pub fn resolve(cli: &CliOverrides, config: &TomlConfig) -> Self {
        let data_folder = resolve_data_folder(cli.data_folder.as_deref(), config);

        // Relative file names live in the data folder; absolute paths are kept
        let records = cli
            .records_file
            .clone()
            .or_else(|| config.records_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDS_FILE));
        let problems = cli
            .problems_file
            .clone()
            .or_else(|| config.problems_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROBLEMS_FILE));

        Self {
            datasets: DatasetPaths {
                records: data_folder.join(records),
                problems: data_folder.join(problems),
            },
            data_folder,
            view_box: cli
                .view_box
                .clone()
                .or_else(|| config.view_box.clone())
                .unwrap_or_else(|| DEFAULT_VIEW_BOX.to_string()),
            port: cli.port.or(config.port).unwrap_or(DEFAULT_PORT),
            log_level: cli
                .log_level
                .clone()
                .or_else(|| config.logging.level.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::parse(
            r#"
            data_folder = "/srv/crux"
            records_file = "round1.json"
            view_box = "0 0 3000 2000"
            port = 6000

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_folder, Some(PathBuf::from("/srv/crux")));
        assert_eq!(config.records_file, Some(PathBuf::from("round1.json")));
        assert_eq!(config.problems_file, None);
        assert_eq!(config.view_box.as_deref(), Some("0 0 3000 2000"));
        assert_eq!(config.port, Some(6000));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = TomlConfig::parse("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.logging.level, None);
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!(matches!(TomlConfig::parse("port = \"high\""), Err(Error::Config(_))));
    }

    #[test]
    fn test_cli_overrides_beat_toml() {
        let config = TomlConfig {
            data_folder: Some(PathBuf::from("/from/toml")),
            problems_file: Some(PathBuf::from("walls.json")),
            port: Some(6000),
            ..TomlConfig::default()
        };
        let cli = CliOverrides {
            data_folder: Some(PathBuf::from("/from/cli")),
            port: Some(7000),
            ..CliOverrides::default()
        };

        let settings = ViewerSettings::resolve(&cli, &config);
        assert_eq!(settings.data_folder, PathBuf::from("/from/cli"));
        assert_eq!(settings.datasets.records, PathBuf::from("/from/cli/record.json"));
        assert_eq!(settings.datasets.problems, PathBuf::from("/from/cli/walls.json"));
        assert_eq!(settings.port, 7000);
        assert_eq!(settings.view_box, "0 0 1920 1080");
        assert_eq!(settings.log_level, None);
    }

    #[test]
    fn test_log_level_from_cli_then_toml() {
        let config = TomlConfig {
            logging: LoggingConfig {
                level: Some("warn".into()),
            },
            ..TomlConfig::default()
        };
        let settings = ViewerSettings::resolve(&CliOverrides::default(), &config);
        assert_eq!(settings.log_level.as_deref(), Some("warn"));

        let cli = CliOverrides {
            log_level: Some("trace".into()),
            ..CliOverrides::default()
        };
        let settings = ViewerSettings::resolve(&cli, &config);
        assert_eq!(settings.log_level.as_deref(), Some("trace"));
    }

    #[test]
    fn test_absolute_file_paths_kept() {
        let cli = CliOverrides {
            data_folder: Some(PathBuf::from("/data")),
            records_file: Some(PathBuf::from("/elsewhere/records.json")),
            ..CliOverrides::default()
        };
        let settings = ViewerSettings::resolve(&cli, &TomlConfig::default());
        assert_eq!(settings.datasets.records, PathBuf::from("/elsewhere/records.json"));
    }
}
