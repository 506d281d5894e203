//! Configuration for the portfolio page
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/folio/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! The loaded [`Config`] is frozen behind an `Arc` and handed to every
//! component at construction; nothing mutates it after start-up.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod api;
mod observability;
mod page;
mod serialization;
mod ui;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use api::{FileGithub, GithubConfig};
pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use page::{
    ContactConfig, DownloadConfig, FileContact, FileDownload, FileTheme, Selectors, ThemeConfig,
};
pub use ui::{
    AnimationConfig, LayoutConfig, NotificationConfig, ScrollConfig, TypingConfig, UiConfig,
};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Remote repository listing (inert unless requested)
    pub github: GithubConfig,

    /// Animation, scroll, typing, layout and notification tunables
    pub ui: UiConfig,

    /// Theme default and storage key
    pub theme: ThemeConfig,

    /// Contact form submission behavior
    pub contact: ContactConfig,

    /// Resume download fallback
    pub download: DownloadConfig,

    /// Named page regions
    pub selectors: Selectors,

    /// Logging configuration
    pub logging: LoggingConfig,
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    /// Optional [github] section
    pub github: Option<FileGithub>,

    /// Optional [ui.*] sections (every key defaulted)
    #[serde(default)]
    pub ui: UiConfig,

    /// Optional [theme] section
    pub theme: Option<FileTheme>,

    /// Optional [contact] section
    pub contact: Option<FileContact>,

    /// Optional [download] section
    pub download: Option<FileDownload>,

    /// Optional [selectors] section (every key defaulted)
    #[serde(default)]
    pub selectors: Selectors,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

/// Values taken from the process environment
#[derive(Debug, Default)]
pub(crate) struct EnvOverrides {
    pub github_user: Option<String>,
    pub theme_default: Option<String>,
    pub log_level: Option<String>,
}

impl EnvOverrides {
    fn capture() -> Self {
        Self {
            github_user: std::env::var("FOLIO_GITHUB_USER").ok(),
            theme_default: std::env::var("FOLIO_THEME_DEFAULT").ok(),
            log_level: std::env::var("FOLIO_LOG_LEVEL").ok(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/folio/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("folio").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load configuration: env vars -> file -> defaults
    ///
    /// A config file that exists but does not parse is an error; falling back
    /// to defaults would hide the typo the user is looking for.
    pub fn from_env() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) => match std::fs::read_to_string(&path) {
                Ok(contents) => toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse {}", path.display()))?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
                Err(e) => {
                    return Err(e).with_context(|| format!("Cannot read {}", path.display()))
                }
            },
            None => FileConfig::default(),
        };

        Ok(Self::from_parts(file, EnvOverrides::capture()))
    }

    /// Parse a config document without consulting the environment
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(contents).context("Failed to parse config")?;
        Ok(Self::from_parts(file, EnvOverrides::default()))
    }

    pub(crate) fn from_parts(file: FileConfig, env: EnvOverrides) -> Self {
        let mut logging = LoggingConfig::from_file(file.logging);
        if let Some(level) = env.log_level {
            logging.level = level;
        }

        Self {
            github: GithubConfig::from_file(file.github, env.github_user),
            ui: file.ui,
            theme: ThemeConfig::from_file(file.theme, env.theme_default),
            contact: ContactConfig::from_file(file.contact),
            download: DownloadConfig::from_file(file.download),
            selectors: file.selectors,
            logging,
        }
    }
}
