//! Log output settings: level filter, optional rolling JSON files

use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// How often the log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// One file for the lifetime of the directory
    Never,
}

impl LogRotation {
    /// Case-insensitive; anything unrecognized rolls daily
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("hourly") {
            Self::Hourly
        } else if s.eq_ignore_ascii_case("never") {
            Self::Never
        } else {
            Self::Daily
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }

    fn rotation(self) -> Rotation {
        match self {
            Self::Hourly => Rotation::HOURLY,
            Self::Daily => Rotation::DAILY,
            Self::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Also write JSON lines under `file_dir`
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// File name stem, e.g. "folio" -> "folio.2026-01-15"
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "folio".to_string(),
        }
    }
}

/// `[logging]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let Some(file) = file else {
            return Self::default();
        };
        let defaults = Self::default();

        Self {
            level: file
                .level
                .map(|l| l.trim().to_ascii_lowercase())
                .unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file.file_dir.map_or(defaults.file_dir, PathBuf::from),
            file_rotation: file
                .file_rotation
                .as_deref()
                .map_or(defaults.file_rotation, LogRotation::parse),
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
        }
    }

    /// `EnvFilter` directive for this crate. An unknown level falls back to info.
    pub fn filter_directive(&self) -> String {
        let level = if LEVELS.contains(&self.level.as_str()) {
            self.level.as_str()
        } else {
            "info"
        };
        format!("folio={level}")
    }

    /// Rolling appender under `file_dir`, creating the directory first
    pub fn file_appender(&self) -> anyhow::Result<RollingFileAppender> {
        std::fs::create_dir_all(&self.file_dir)
            .with_context(|| format!("Could not create log directory {}", self.file_dir.display()))?;
        RollingFileAppender::builder()
            .rotation(self.file_rotation.rotation())
            .filename_prefix(self.file_prefix.as_str())
            .build(&self.file_dir)
            .context("Could not open log file")
    }
}
