//! Configuration file handling for folio.
//!
//! The config lives at `config.toml` in the platform config directory
//! (or wherever `FOLIO_CONFIG` points). Every field has a default, so a
//! missing or partial file is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use folio_core::{BackdropSettings, Rgba};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "FOLIO_CONFIG";

const CONFIG_FILE: &str = "config.toml";

/// Errors raised while reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a config directory for this platform")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backdrop: BackdropSettings,
    pub terminal: TerminalSettings,
    pub profile: Profile,
    pub contact: ContactSettings,
}

/// How terminal cells map onto the backdrop's logical pixel space.
///
/// Cells are drawn as two stacked pixels, so a cell is always twice as
/// tall as it is wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalSettings {
    /// Logical pixels per cell column.
    pub cell_width: f32,
    /// Color the backdrop is composited over, as `#rrggbb`.
    pub base_color: String,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            cell_width: 4.0,
            base_color: "#0b1020".to_string(),
        }
    }
}

impl TerminalSettings {
    /// Logical pixels per cell row.
    pub fn cell_height(&self) -> f32 {
        self.cell_width * 2.0
    }

    /// Parsed base color, falling back to the default on a malformed value.
    pub fn base_color(&self) -> Rgba {
        parse_hex_color(&self.base_color).unwrap_or_else(|| {
            log::warn!("invalid base_color {:?}, using default", self.base_color);
            Rgba::from_hex(0x0b1020)
        })
    }
}

/// Hero card contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    pub tagline: String,
    pub links: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Your Name".to_string(),
            headline: "Software Developer".to_string(),
            tagline: "Building things for the web and the terminal.".to_string(),
            links: Vec::new(),
        }
    }
}

/// Where contact form submissions go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMode {
    /// POST to an external form relay.
    Relay,
    /// Hand to the in-process contact API.
    #[default]
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSettings {
    pub mode: ContactMode,
    /// Relay submission URL, used in relay mode.
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            mode: ContactMode::Local,
            endpoint: String::new(),
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load from the default location. If no file exists yet, the
    /// defaults are written there so there is something to edit.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_create(&config_path()?)
    }

    fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        match config.save_to(path) {
            Ok(()) => log::info!("wrote default config to {}", path.display()),
            Err(err) => log::warn!("using default config, could not write it: {err}"),
        }
        Ok(config)
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "folio")
}

/// Path of the config file: `$FOLIO_CONFIG` or the platform config dir.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    project_dirs()
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
        .ok_or(ConfigError::NoConfigDir)
}

/// Directory for logs and other runtime data.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    project_dirs()
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .ok_or(ConfigError::NoConfigDir)
}

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(s: &str) -> Option<Rgba> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().map(Rgba::from_hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [backdrop]
            particle_count = 35

            [contact]
            mode = "relay"
            endpoint = "https://relay.example/f/abc"
            "#,
        )
        .unwrap();
        assert_eq!(config.backdrop.particle_count, 35);
        assert_eq!(config.backdrop.max_confetti, 50);
        assert_eq!(config.contact.mode, ContactMode::Relay);
        assert_eq!(config.contact.timeout_secs, 10);
        assert_eq!(config.terminal, TerminalSettings::default());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profile.name = "Ada".to_string();
        config.backdrop.fps = 60;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio").join("config.toml");

        let config = Config::load_or_create(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[profile]\nname = \"Grace\"\n").unwrap();

        let config = Config::load_or_create(&path).unwrap();
        assert_eq!(config.profile.name, "Grace");
        assert_eq!(fs::read_to_string(&path).unwrap(), "[profile]\nname = \"Grace\"\n");
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[backdrop]\nparticle_count = \"many\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#22d3ee"), Some(Rgba::rgb(0x22, 0xd3, 0xee)));
        assert_eq!(parse_hex_color("0b1020"), Some(Rgba::rgb(0x0b, 0x10, 0x20)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_bad_base_color_falls_back() {
        let settings = TerminalSettings {
            base_color: "blue".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.base_color(), Rgba::from_hex(0x0b1020));
    }
}
