//! Reveal-on-scroll effects, stat counters, skill bars, typing and parallax
//!
//! Every visibility effect fires once per element: the observer stops
//! watching an element as soon as it has been revealed. Timed effects run
//! as page tasks and therefore need a `LocalSet`.

use crate::component::{Component, ComponentBase};
use crate::config::Config;
use crate::dom::{
    EventTarget, IntersectionEntry, IntersectionObserver, NodeId, ObserverOptions, Page,
    RootMargin,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Values shown by a stat counter, one per tick, ending exactly on the target
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: f64,
    step: f64,
    current: f64,
    finished: bool,
}

impl CounterAnimation {
    pub fn new(target: f64, duration: Duration, tick: Duration) -> Self {
        let ticks = (duration.as_secs_f64() / tick.as_secs_f64().max(f64::EPSILON)).max(1.0);
        Self {
            target,
            step: target / ticks,
            current: 0.0,
            finished: false,
        }
    }
}

impl Iterator for CounterAnimation {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.finished {
            return None;
        }
        self.current += self.step;
        if self.current >= self.target {
            self.current = self.target;
            self.finished = true;
        }
        Some(self.current.floor() as i64)
    }
}

fn animate_number(page: &Page, element: NodeId, config: &Config) {
    let raw = page.attribute(element, "data-target").unwrap_or_default();
    let Ok(target) = raw.trim().parse::<i64>() else {
        tracing::warn!(value = %raw, "stat counter without a numeric data-target");
        return;
    };

    let animations = &config.ui.animations;
    let tick = animations.counter_tick();
    let counter = CounterAnimation::new(
        target as f64,
        Duration::from_millis(animations.counter_duration_ms),
        tick,
    );

    let page_handle = page.clone();
    page.spawn(async move {
        for value in counter {
            tokio::time::sleep(tick).await;
            page_handle.set_text(element, &value.to_string());
        }
        Ok(())
    });
}

pub struct AnimationComponent {
    base: ComponentBase,
    observers: BTreeMap<&'static str, IntersectionObserver>,
}

impl AnimationComponent {
    pub fn new(config: Arc<Config>, page: Page) -> Self {
        Self {
            base: ComponentBase::new(config, page),
            observers: BTreeMap::new(),
        }
    }

    /// Names of the live observers
    pub fn observer_names(&self) -> Vec<&'static str> {
        self.observers.keys().copied().collect()
    }

    fn setup_scroll_animations(&mut self) {
        let animations = &self.base.config().ui.animations;
        let options = ObserverOptions {
            threshold: animations.observer_threshold,
            root_margin: RootMargin::parse(&animations.observer_root_margin),
        };
        let page = self.base.page().clone();
        let observer = IntersectionObserver::new(
            self.base.page(),
            options,
            move |entries: &[IntersectionEntry], observer: &IntersectionObserver| {
                for entry in entries.iter().filter(|e| e.is_intersecting) {
                    page.add_class(entry.target, "fade-in-up");
                    observer.unobserve(entry.target);
                }
            },
        );

        for element in self.base.query_all(&self.base.config().selectors.animated) {
            observer.observe(element);
        }
        self.observers.insert("scroll", observer);
    }

    fn setup_stats_animation(&mut self) {
        let page = self.base.page().clone();
        let config = self.base.config().clone();
        let observer = IntersectionObserver::new(
            self.base.page(),
            ObserverOptions::default(),
            move |entries: &[IntersectionEntry], observer: &IntersectionObserver| {
                for entry in entries.iter().filter(|e| e.is_intersecting) {
                    animate_number(&page, entry.target, &config);
                    observer.unobserve(entry.target);
                }
            },
        );

        for stat in self.base.query_all(&self.base.config().selectors.stat_numbers) {
            observer.observe(stat);
        }
        self.observers.insert("stats", observer);
    }

    fn setup_skill_bars_animation(&mut self) {
        let page = self.base.page().clone();
        let observer = IntersectionObserver::new(
            self.base.page(),
            ObserverOptions::default(),
            move |entries: &[IntersectionEntry], observer: &IntersectionObserver| {
                for entry in entries.iter().filter(|e| e.is_intersecting) {
                    page.set_style(entry.target, "animation-play-state", "running");
                    observer.unobserve(entry.target);
                }
            },
        );

        for bar in self.base.query_all(&self.base.config().selectors.skill_bars) {
            self.base
                .page()
                .set_style(bar, "animation-play-state", "paused");
            observer.observe(bar);
        }
        self.observers.insert("skills", observer);
    }

    fn setup_typing_animation(&self) {
        let Some(element) = self.base.query(&self.base.config().selectors.typing_text) else {
            return;
        };
        let typing = &self.base.config().ui.typing;
        let text = typing.text.clone();
        let speed = Duration::from_millis(typing.speed_ms);
        let delay = Duration::from_millis(typing.delay_ms);

        let page = self.base.page().clone();
        page.set_text(element, "");
        let page_handle = page.clone();
        page.spawn(async move {
            tokio::time::sleep(delay).await;
            for (i, ch) in text.chars().enumerate() {
                if i > 0 {
                    tokio::time::sleep(speed).await;
                }
                page_handle.push_text(element, ch.encode_utf8(&mut [0; 4]));
            }
            Ok(())
        });
    }

    fn setup_parallax_effect(&mut self) {
        let Some(hero) = self.base.query(&self.base.config().selectors.hero) else {
            return;
        };
        let page = self.base.page().clone();
        let speed = self.base.config().ui.scroll.parallax_speed;

        self.base.listen(Some(EventTarget::Window), "scroll", move |_| {
            let scroll_y = page.scroll_y();
            if scroll_y < page.layout(hero).height {
                page.set_style(hero, "transform", &format!("translateY({}px)", scroll_y * speed));
            }
        });
    }
}

impl Component for AnimationComponent {
    fn name(&self) -> &'static str {
        "animation"
    }

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn after_init(&mut self) -> anyhow::Result<()> {
        self.setup_scroll_animations();
        self.setup_stats_animation();
        self.setup_skill_bars_animation();
        self.setup_typing_animation();
        self.setup_parallax_effect();

        // Report what is already on screen
        self.base.page().flush_intersections();
        Ok(())
    }

    fn teardown(&mut self) {
        for observer in std::mem::take(&mut self.observers).into_values() {
            observer.disconnect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::LocalSet;

    fn animation(page: &Page) -> AnimationComponent {
        AnimationComponent::new(Arc::new(Config::default()), page.clone())
    }

    #[test]
    fn test_counter_ends_exactly_on_target() {
        let values: Vec<i64> =
            CounterAnimation::new(50.0, Duration::from_millis(2000), Duration::from_millis(16))
                .collect();
        assert_eq!(*values.last().unwrap(), 50);
        assert!(values.len() >= 125 && values.len() <= 126);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_counter_zero_target_finishes_immediately() {
        let values: Vec<i64> =
            CounterAnimation::new(0.0, Duration::from_millis(2000), Duration::from_millis(16))
                .collect();
        assert_eq!(values, vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_fires_once_and_unobserves() {
        LocalSet::new()
            .run_until(async {
                let page = Page::in_memory();
                page.set_viewport(1200.0, 800.0);
                let header = page
                    .build("h2")
                    .class("section-header")
                    .layout(100.0, 50.0)
                    .append_to(page.body());
                let item = page
                    .build("div")
                    .class("timeline-item")
                    .layout(3000.0, 200.0)
                    .append_to(page.body());

                let mut component = animation(&page);
                component.init().unwrap();
                assert!(page.has_class(header, "fade-in-up"));
                assert!(!page.has_class(item, "fade-in-up"));

                page.scroll_to(2500.0);
                assert!(page.has_class(item, "fade-in-up"));

                // Scrolling away and back does not re-run the effect
                page.remove_class(item, "fade-in-up");
                page.scroll_to(0.0);
                page.scroll_to(2500.0);
                assert!(!page.has_class(item, "fade-in-up"));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stat_counter_and_skill_bar() {
        LocalSet::new()
            .run_until(async {
                let page = Page::in_memory();
                page.set_viewport(1200.0, 800.0);
                let stat = page
                    .build("span")
                    .class("stat-number")
                    .attr("data-target", "42")
                    .text("0")
                    .layout(200.0, 40.0)
                    .append_to(page.body());
                let bar = page
                    .build("div")
                    .class("skill-progress")
                    .layout(1600.0, 10.0)
                    .append_to(page.body());

                let mut component = animation(&page);
                component.init().unwrap();
                assert_eq!(page.style(bar, "animation-play-state").as_deref(), Some("paused"));

                tokio::time::sleep(Duration::from_millis(2100)).await;
                assert_eq!(page.text_content(stat), "42");

                page.scroll_to(1000.0);
                assert_eq!(page.style(bar, "animation-play-state").as_deref(), Some("running"));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_reveals_one_char_per_tick() {
        LocalSet::new()
            .run_until(async {
                let page = Page::in_memory();
                let typing = page
                    .build("span")
                    .class("typing-text")
                    .text("placeholder")
                    .append_to(page.body());

                let mut component = animation(&page);
                component.init().unwrap();
                assert_eq!(page.text_content(typing), "");

                // delay 1000ms, then one char immediately and one per 100ms
                tokio::time::sleep(Duration::from_millis(1050)).await;
                assert_eq!(page.text_content(typing), "H");
                tokio::time::sleep(Duration::from_millis(100)).await;
                assert_eq!(page.text_content(typing), "Hi");
                tokio::time::sleep(Duration::from_millis(1000)).await;
                assert_eq!(page.text_content(typing), "Hi, I'm");
            })
            .await;
    }

    #[test]
    fn test_parallax_only_within_hero() {
        let page = Page::in_memory();
        let hero = page
            .build("section")
            .class("hero")
            .layout(0.0, 600.0)
            .append_to(page.body());

        let mut component = animation(&page);
        component.init().unwrap();

        page.scroll_to(200.0);
        assert_eq!(page.style(hero, "transform").as_deref(), Some("translateY(100px)"));

        page.scroll_to(700.0);
        assert_eq!(page.style(hero, "transform").as_deref(), Some("translateY(100px)"));
    }

    #[test]
    fn test_destroy_disconnects_observers() {
        let page = Page::in_memory();
        page.build("section").class("hero").layout(0.0, 600.0).append_to(page.body());
        let mut component = animation(&page);
        component.init().unwrap();
        assert_eq!(component.observer_names(), vec!["scroll", "skills", "stats"]);

        component.destroy();
        assert!(component.observer_names().is_empty());
        assert!(page.inner.observers.borrow().is_empty());
        assert_eq!(page.total_listener_count(), 0);
    }
}
