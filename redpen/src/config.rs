//! Configuration loading for redpen.
//!
//! Settings come from `$XDG_CONFIG_HOME/redpen/config.toml` (or
//! `~/.config/redpen/config.toml`). Every key is optional:
//!
//! ```toml
//! theme = "catppuccin-mocha"
//! focus_level = 2
//!
//! [provider]
//! api_key = "sk-..."
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-4.1"
//! temperature = 0.1
//! max_tokens = 10000
//! timeout_secs = 180
//! ```
//!
//! A missing file yields the defaults. A file that fails to parse is a soft
//! failure: it is logged and the defaults are used, so a typo never prevents
//! startup.

use std::path::{Path, PathBuf};

use redpen_core::provider::{ProviderConfig, DEFAULT_BASE_URL};
use redpen_core::Level;
use serde::Deserialize;
use tracing::{info, warn};

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub theme: Option<String>,
    pub focus_level: Option<u8>,
    pub provider: ProviderSection,
}

/// The `[provider]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved settings after config file and environment are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme: String,
    pub focus_level: Level,
    pub api_key: Option<String>,
    pub provider: ProviderConfig,
}

/// Returns the path to the redpen config file.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("redpen").join("config.toml")
}

/// Returns `$var` if set, else `~/<fallback>`, else `./<fallback>`.
pub fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(fallback)))
        .unwrap_or_else(|| PathBuf::from(fallback))
}

/// Reads and parses the config file at `path`.
///
/// Never fails: absent or invalid files produce `FileConfig::default()`.
pub fn load_file(path: &Path) -> FileConfig {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => return FileConfig::default(),
    };
    match toml::from_str(&raw) {
        Ok(config) => {
            info!(path = %path.display(), "loaded config");
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config parse error, using defaults");
            FileConfig::default()
        }
    }
}

impl FileConfig {
    /// Merges this file config with environment values.
    ///
    /// Credential: config, then `OPENAI_API_KEY`. Base URL: `OPENAI_BASE_URL`,
    /// then config, then the default endpoint.
    pub fn resolve(self, env: impl Fn(&str) -> Option<String>) -> Settings {
        let defaults = ProviderConfig::default();
        let section = self.provider;

        let api_key = non_blank(section.api_key).or_else(|| non_blank(env(API_KEY_ENV)));
        let base_url = non_blank(env(BASE_URL_ENV))
            .or_else(|| non_blank(section.base_url))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        let focus_level = match self.focus_level.map(Level::try_from) {
            Some(Ok(level)) => level,
            Some(Err(e)) => {
                warn!(error = %e, "ignoring focus_level from config");
                Level::default()
            }
            None => Level::default(),
        };

        Settings {
            theme: self.theme.unwrap_or_else(|| "catppuccin-mocha".to_owned()),
            focus_level,
            api_key,
            provider: ProviderConfig {
                base_url,
                model: non_blank(section.model).unwrap_or(defaults.model),
                temperature: section.temperature.unwrap_or(defaults.temperature),
                max_tokens: section.max_tokens.unwrap_or(defaults.max_tokens),
                timeout_secs: section.timeout_secs.unwrap_or(defaults.timeout_secs),
            },
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Loads the config file and merges the process environment.
pub fn load() -> Settings {
    load_file(&config_path()).resolve(|name| std::env::var(name).ok())
}
