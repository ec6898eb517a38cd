use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Deepest header level a TOC can show.
pub const MAX_TOC_LEVEL: u8 = 6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key} in {config_path}: {message}")]
    InvalidValue {
        config_path: PathBuf,
        key: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory searched for relative document paths.
    pub docs_path: Option<PathBuf>,
    /// Headers deeper than this are hidden from the TOC panel.
    pub toc_max_level: u8,
    /// Whether caret movement drives the TOC selection.
    pub sync_on_caret: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_path: None,
            toc_max_level: MAX_TOC_LEVEL,
            sync_on_caret: true,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        if !(1..=MAX_TOC_LEVEL).contains(&config.toc_max_level) {
            return Err(ConfigError::InvalidValue {
                config_path: config_path.to_path_buf(),
                key: "toc_max_level",
                message: format!(
                    "expected 1-{MAX_TOC_LEVEL}, got {}",
                    config.toc_max_level
                ),
            });
        }

        // Expand shell variables and tilde in the loaded docs path
        config.docs_path = config
            .docs_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-compass");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Finds `file` as given, then relative to `docs_path`.
    pub fn resolve_document(&self, file: &Path) -> Option<PathBuf> {
        if file.exists() {
            return Some(file.to_path_buf());
        }
        if file.is_absolute() {
            return None;
        }
        let candidate = self.docs_path.as_ref()?.join(file);
        candidate.exists().then_some(candidate)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
