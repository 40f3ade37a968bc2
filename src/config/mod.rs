//! User configuration loaded from `config.toml`.
//!
//! Every section and key is optional; defaults reproduce the built-in
//! behaviour so the tool works without any file at all.
pub mod toml_loader;
pub mod tools;
pub mod validation;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::autoclick::{ClickButton, DEFAULT_INTERVAL_MS};
use crate::dictation;
use crate::error::ConfigError;
use crate::tempmail;

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Store root; `None` means `$PASSWORD_STORE_DIR` or `~/.password-store`.
    pub dir: Option<PathBuf>,
    /// Directory prefix for temporary mailbox entries.
    pub tempmail_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: None,
            tempmail_prefix: tempmail::DEFAULT_PREFIX.to_string(),
        }
    }
}

/// `[tempmail]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TempmailConfig {
    /// Base URL of the mail API.
    pub api_base: String,
}

impl Default for TempmailConfig {
    fn default() -> Self {
        Self {
            api_base: tempmail::DEFAULT_API_BASE.to_string(),
        }
    }
}

/// `[generate]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    /// Password length.
    pub length: usize,
    /// Whether to include symbols.
    pub symbols: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            length: 24,
            symbols: true,
        }
    }
}

/// `[toggle.<name>]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleConfig {
    /// Program and arguments.
    pub command: Vec<String>,
}

/// `[autoclick]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutoclickConfig {
    /// Pause between clicks in milliseconds.
    pub interval_ms: u64,
    /// Button to click.
    pub button: ClickButton,
}

impl Default for AutoclickConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            button: ClickButton::Left,
        }
    }
}

/// `[dictation]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DictationConfig {
    /// Daemon socket.
    pub socket: PathBuf,
    /// Daemon status file.
    pub status_file: PathBuf,
}

impl Default for DictationConfig {
    fn default() -> Self {
        Self {
            socket: PathBuf::from(dictation::DEFAULT_SOCKET),
            status_file: PathBuf::from(dictation::DEFAULT_STATUS_FILE),
        }
    }
}

/// `[wallpaper]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WallpaperConfig {
    /// Image directory; `None` means `~/Pictures/wallpapers`.
    pub dir: Option<PathBuf>,
}

/// All configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tool candidate overrides.
    pub tools: tools::ToolsConfig,
    /// Credential store location.
    pub store: StoreConfig,
    /// Temporary mail API.
    pub tempmail: TempmailConfig,
    /// Generated credentials.
    pub generate: GenerateConfig,
    /// User-defined toggle daemons.
    pub toggle: BTreeMap<String, ToggleConfig>,
    /// Auto-clicker.
    pub autoclick: AutoclickConfig,
    /// Dictation daemon paths.
    pub dictation: DictationConfig,
    /// Wallpaper directory.
    pub wallpaper: WallpaperConfig,
}

impl Config {
    /// Default location: `$XDG_CONFIG_HOME/deskutil/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("deskutil").join("config.toml"))
    }

    /// Load from `path`, or from [`Config::default_path`] when `None`.
    ///
    /// An explicitly given path must exist; a missing default file yields
    /// the defaults. Validation warnings are logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config: Self = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::Io {
                        path: path.to_path_buf(),
                        source: std::io::Error::from(std::io::ErrorKind::NotFound),
                    });
                }
                toml_loader::load_config(path)?
            }
            None => Self::default_path()
                .map_or_else(|| Ok(Self::default()), |path| toml_loader::load_config(&path))?,
        };
        config.expand_paths();
        for warning in validation::validate(&config) {
            tracing::warn!("{warning}");
        }
        Ok(config)
    }

    fn expand_paths(&mut self) {
        for path in [
            self.store.dir.as_mut(),
            self.wallpaper.dir.as_mut(),
            Some(&mut self.dictation.socket),
            Some(&mut self.dictation.status_file),
        ]
        .into_iter()
        .flatten()
        {
            *path = expand_home(path);
        }
    }

    /// Configured toggle commands keyed by daemon name.
    #[must_use]
    pub fn toggle_commands(&self) -> BTreeMap<String, Vec<String>> {
        self.toggle
            .iter()
            .map(|(name, t)| (name.clone(), t.command.clone()))
            .collect()
    }
}

/// Replace a leading `~/` with the home directory.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
