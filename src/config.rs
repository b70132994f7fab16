use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::i18n::{self, Translator};
use crate::solar::BillingPeriod;

/// Default location of the settings file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Colour scheme of the desktop window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language code (`auto`, `es`, `en`)
    pub language: String,
    /// Directory holding `<code>.toml` language packs
    pub language_pack_dir: Option<String>,
    /// Period pre-selected in the form
    pub default_period: BillingPeriod,
    pub theme: Theme,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            language_pack_dir: None,
            default_period: BillingPeriod::Bimonthly,
            theme: Theme::Dark,
            log_level: "warn".into(),
        }
    }
}

/// Errors while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where the loaded settings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Read from an existing file.
    Loaded,
    /// The file was missing and has been written with defaults.
    Created,
}

impl ConfigOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigOrigin::Loaded => "loaded",
            ConfigOrigin::Created => "created",
        }
    }
}

/// Loads `config.toml` from the working directory, creating it when missing.
pub fn load_or_default() -> Result<(Config, ConfigOrigin), ConfigError> {
    load_from(Path::new(DEFAULT_CONFIG_PATH))
}

/// Loads settings from `path`, creating the file with defaults when missing.
///
/// Nothing is logged here; callers report the origin once logging is set up.
pub fn load_from(path: &Path) -> Result<(Config, ConfigOrigin), ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok((cfg, ConfigOrigin::Loaded))
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        Ok((cfg, ConfigOrigin::Created))
    }
}

impl Config {
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Translator for the configured language. A `cli_lang` other than `auto` wins.
    pub fn translator(&self, cli_lang: &str) -> Translator {
        let lang = i18n::resolve_language(cli_lang, Some(self.language.as_str()));
        Translator::new_with_pack(&lang, self.language_pack_dir.as_deref())
    }
}
