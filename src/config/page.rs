//! Page wiring: selectors, theme preference, contact and download settings

use serde::Deserialize;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Selectors
// ─────────────────────────────────────────────────────────────────────────────

/// Named page regions. Resolved once during each component's DOM setup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub navbar: String,
    pub hamburger: String,
    pub nav_menu: String,
    pub nav_links: String,
    pub sections: String,
    pub theme_toggle: String,
    pub back_to_top: String,
    pub contact_form: String,
    pub projects_grid: String,
    pub project_cards: String,
    pub tab_buttons: String,
    pub tab_contents: String,
    pub filter_buttons: String,
    pub stat_numbers: String,
    pub skill_bars: String,
    pub typing_text: String,
    pub hero: String,
    pub hero_landmark: String,
    pub download_button: String,
    /// Elements that fade in on first reveal
    pub animated: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            navbar: "#navbar".to_string(),
            hamburger: "#hamburger".to_string(),
            nav_menu: "#nav-menu".to_string(),
            nav_links: ".nav-link".to_string(),
            sections: "section[id]".to_string(),
            theme_toggle: "#theme-toggle".to_string(),
            back_to_top: "#back-to-top".to_string(),
            contact_form: "#contact-form".to_string(),
            projects_grid: "#projects-grid".to_string(),
            project_cards: ".project-card:not(.loading-placeholder)".to_string(),
            tab_buttons: ".tab-button".to_string(),
            tab_contents: ".tab-content".to_string(),
            filter_buttons: ".filter-btn".to_string(),
            stat_numbers: ".stat-number".to_string(),
            skill_bars: ".skill-progress".to_string(),
            typing_text: ".typing-text".to_string(),
            hero: ".hero".to_string(),
            hero_landmark: "#home".to_string(),
            download_button: ".download-cv".to_string(),
            animated: ".section-header, .about-text, .about-stats, .timeline-item, \
                       .skill-category, .project-card, .contact-item, .contact-form"
                .to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme
// ─────────────────────────────────────────────────────────────────────────────

/// Theme preference defaults
#[derive(Debug, Clone)]
pub struct ThemeConfig {
    /// Theme used when nothing is stored yet
    pub default: String,
    /// Key under which the preference is persisted
    pub storage_key: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: "light".to_string(),
            storage_key: "theme".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileTheme {
    pub default: Option<String>,
    pub storage_key: Option<String>,
}

impl ThemeConfig {
    pub fn from_file(file: Option<FileTheme>, env_default: Option<String>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            default: env_default.or(file.default).unwrap_or(defaults.default),
            storage_key: file.storage_key.unwrap_or(defaults.storage_key),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Contact form
// ─────────────────────────────────────────────────────────────────────────────

/// Simulated submission behavior
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// Time the simulated submission takes (ms)
    pub submit_delay_ms: u64,
    /// Probability in [0, 1] that a simulated submission fails
    pub failure_rate: f64,
    pub success_message: String,
    pub failure_message: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 2000,
            failure_rate: 0.1,
            success_message: "Message sent successfully!".to_string(),
            failure_message: "Error sending message. Please try again.".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileContact {
    pub submit_delay_ms: Option<u64>,
    pub failure_rate: Option<f64>,
    pub success_message: Option<String>,
    pub failure_message: Option<String>,
}

impl ContactConfig {
    pub fn from_file(file: Option<FileContact>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            submit_delay_ms: file.submit_delay_ms.unwrap_or(defaults.submit_delay_ms),
            failure_rate: file
                .failure_rate
                .map(|r| r.clamp(0.0, 1.0))
                .unwrap_or(defaults.failure_rate),
            success_message: file.success_message.unwrap_or(defaults.success_message),
            failure_message: file.failure_message.unwrap_or(defaults.failure_message),
        }
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Download
// ─────────────────────────────────────────────────────────────────────────────

/// Resume download fallback
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Filename used when the link names none
    pub default_filename: String,
    /// Delay before the temporary-link fallback fires (ms)
    pub fallback_delay_ms: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            default_filename: "Resume.pdf".to_string(),
            fallback_delay_ms: 100,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileDownload {
    pub default_filename: Option<String>,
    pub fallback_delay_ms: Option<u64>,
}

impl DownloadConfig {
    pub fn from_file(file: Option<FileDownload>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            default_filename: file.default_filename.unwrap_or(defaults.default_filename),
            fallback_delay_ms: file.fallback_delay_ms.unwrap_or(defaults.fallback_delay_ms),
        }
    }
}
