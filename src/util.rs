//! Shared utility functions

use regex::Regex;
use std::cell::Cell;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::time::Instant;

/// Leading-edge rate limiter for high-frequency events.
///
/// The first call runs; every call arriving before `window` has elapsed
/// since the last run is dropped, not queued.
#[derive(Debug)]
pub struct Throttle {
    window: Duration,
    last_run: Cell<Option<Instant>>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_run: Cell::new(None),
        }
    }

    /// Returns true (and starts a new window) if a call may run now
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        match self.last_run.get() {
            Some(last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last_run.set(Some(now));
                true
            }
        }
    }

    /// Run `f` unless the window is still open
    pub fn run(&self, f: impl FnOnce()) -> bool {
        let acquired = self.try_acquire();
        if acquired {
            f();
        }
        acquired
    }
}

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static pattern"));

/// Turn a display tag into the token stored in `data-tags`.
///
/// "AI/ML" becomes "ai-ml", "Distributed Systems" becomes "distributed-systems".
pub fn slugify_tag(tag: &str) -> String {
    let lowered = tag.to_lowercase().replace("ai/ml", "ai-ml");
    NON_ALNUM
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Safely truncate a string to at most `max_bytes` while respecting UTF-8 boundaries.
///
/// ```
/// use folio::util::truncate_utf8_safe;
///
/// assert_eq!(truncate_utf8_safe("hello world", 5), "hello");
/// assert_eq!(truncate_utf8_safe("日本語", 4), "日");
/// ```
pub fn truncate_utf8_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_throttle_burst_runs_once() {
        let throttle = Throttle::new(Duration::from_millis(16));
        let mut runs = 0;
        for _ in 0..10 {
            throttle.run(|| runs += 1);
        }
        assert_eq!(runs, 1);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!throttle.try_acquire(), "still inside the window");

        tokio::time::sleep(Duration::from_millis(6)).await;
        assert!(throttle.try_acquire());
    }

    #[test]
    fn test_slugify_tag() {
        assert_eq!(slugify_tag("AI/ML"), "ai-ml");
        assert_eq!(slugify_tag("Distributed Systems"), "distributed-systems");
        assert_eq!(slugify_tag("  C++ / Rust "), "c-rust");
        assert_eq!(slugify_tag("Web"), "web");
    }

    #[test]
    fn test_truncate_at_utf8_boundary() {
        let s = "日本語";
        assert_eq!(truncate_utf8_safe(s, 4), "日");
        assert_eq!(truncate_utf8_safe(s, 6), "日本");
        assert_eq!(truncate_utf8_safe("", 5), "");
    }
}
