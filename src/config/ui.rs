//! Presentation timing and thresholds
//!
//! Every field has a default, so the `[ui.*]` tables in the config file may
//! name any subset of keys.

use serde::Deserialize;
use std::time::Duration;

/// All presentation tunables, grouped by concern
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub animations: AnimationConfig,
    pub scroll: ScrollConfig,
    pub typing: TypingConfig,
    pub layout: LayoutConfig,
    pub notifications: NotificationConfig,
}

/// Reveal and counter animation parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Nominal transition duration (ms), exposed to styling
    pub duration_ms: u64,
    /// Easing curve, exposed to styling
    pub easing: String,
    /// Fraction of an element that must be inside the root to count as visible
    pub observer_threshold: f64,
    /// Root margin in CSS shorthand, e.g. "0px 0px -50px 0px"
    pub observer_root_margin: String,
    /// Total time a counter takes to reach its target (ms)
    pub counter_duration_ms: u64,
    /// Counter frame interval (ms)
    pub counter_tick_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 600,
            easing: "cubic-bezier(0.4, 0, 0.2, 1)".to_string(),
            observer_threshold: 0.1,
            observer_root_margin: "0px 0px -50px 0px".to_string(),
            counter_duration_ms: 2000,
            counter_tick_ms: 16,
        }
    }
}

impl AnimationConfig {
    pub fn counter_tick(&self) -> Duration {
        Duration::from_millis(self.counter_tick_ms.max(1))
    }
}

/// Scroll-driven thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Navbar gets `scrolled` past this offset (px)
    pub navbar_threshold: f64,
    /// Back-to-top button shows past this offset (px)
    pub back_to_top_threshold: f64,
    /// Hero offset per scrolled pixel
    pub parallax_speed: f64,
    /// Scroll handler rate limit window (ms)
    pub throttle_ms: u64,
    /// Sections count as current this many px before their top edge
    pub section_offset: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            navbar_threshold: 50.0,
            back_to_top_threshold: 300.0,
            parallax_speed: 0.5,
            throttle_ms: 16,
            section_offset: 100.0,
        }
    }
}

impl ScrollConfig {
    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

/// Typed greeting in the hero region
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub text: String,
    /// Delay between characters (ms)
    pub speed_ms: u64,
    /// Delay before the first character (ms)
    pub delay_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            text: "Hi, I'm".to_string(),
            speed_ms: 100,
            delay_ms: 1000,
        }
    }
}

/// Responsive layout breakpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewports wider than this (px) use the desktop menu
    pub mobile_breakpoint: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
        }
    }
}

/// Transient notice timing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a notice stays fully visible (ms)
    pub display_ms: u64,
    /// Exit animation length before removal (ms)
    pub exit_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display_ms: 5000,
            exit_ms: 300,
        }
    }
}
