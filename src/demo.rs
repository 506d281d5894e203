// Demo mode: replay a scripted visitor session against the portfolio page
//
// Builds a page shaped like the real portfolio markup, starts the
// application on it, and walks through what a visitor typically does:
// scrolling, opening the menu, switching theme, filtering projects, flipping
// resume tabs, sending the contact form, downloading the resume.
//
// Everything here runs on page tasks, so the caller must drive it from
// inside a `tokio::task::LocalSet`.

use crate::app::Application;
use crate::catalog::FILTER_ALL;
use crate::config::Config;
use crate::dom::{Download, EventTarget, NodeId, Page};
use anyhow::{Context, Result};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Section ids with their (top, height) in page coordinates
const SECTIONS: [(&str, f64, f64); 5] = [
    ("home", 0.0, 800.0),
    ("about", 900.0, 700.0),
    ("experience", 1600.0, 800.0),
    ("projects", 2400.0, 1000.0),
    ("contact", 3400.0, 600.0),
];

const RESUME_TABS: [&str; 3] = ["experience-tab", "education-tab", "certifications-tab"];

const FILTERS: [&str; 5] = [FILTER_ALL, "ai-ml", "algorithms", "distributed-systems", "web"];

/// What the session observed, for the end-of-run summary
#[derive(Debug, Default)]
pub struct SessionReport {
    pub components: Vec<String>,
    pub listeners: usize,
    pub typed: String,
    pub counters: Vec<String>,
    pub theme: String,
    pub visible_by_filter: Vec<(String, usize)>,
    pub active_tab: Option<String>,
    pub contact_outcome: Option<String>,
    pub downloads: Vec<Download>,
    pub listeners_after_destroy: usize,
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Components:      {}", self.components.join(", "))?;
        writeln!(f, "Listeners:       {}", self.listeners)?;
        writeln!(f, "Hero text:       {:?}", self.typed)?;
        writeln!(f, "Counters:        {}", self.counters.join(" / "))?;
        writeln!(f, "Theme:           {}", self.theme)?;
        writeln!(f, "Project filters:")?;
        for (filter, visible) in &self.visible_by_filter {
            writeln!(f, "  {:<22} {} visible", filter, visible)?;
        }
        writeln!(
            f,
            "Active tab:      {}",
            self.active_tab.as_deref().unwrap_or("-")
        )?;
        writeln!(
            f,
            "Contact form:    {}",
            self.contact_outcome.as_deref().unwrap_or("no notice")
        )?;
        for download in &self.downloads {
            writeln!(f, "Downloaded:      {} ({})", download.filename, download.href)?;
        }
        write!(f, "After destroy:   {} listeners", self.listeners_after_destroy)
    }
}

/// Build the portfolio markup the components expect
pub fn build_page(page: &Page) {
    let body = page.body();

    let nav = page.build("nav").id("navbar").class("navbar").append_to(body);
    page.build("div")
        .id("hamburger")
        .class("hamburger")
        .child("span", |s| s.class("bar"))
        .append_to(nav);
    let menu = page.build("ul").id("nav-menu").class("nav-menu").append_to(nav);
    for (id, _, _) in SECTIONS {
        page.build("li")
            .child("a", |a| a.class("nav-link").attr("href", &format!("#{id}")).text(id))
            .append_to(menu);
    }
    page.build("button")
        .id("theme-toggle")
        .class("theme-toggle")
        .child("i", |i| i.class("fas").class("fa-moon"))
        .append_to(nav);

    let sections = SECTIONS.map(|(id, top, height)| {
        page.build("section")
            .id(id)
            .layout(top, height)
            .child("div", |h| {
                h.class("section-header")
                    .layout(top + 20.0, 60.0)
                    .child("h2", |t| t.text(id))
            })
            .append_to(body)
    });
    let [home, about, experience, projects, contact] = sections;

    page.add_class(home, "hero");
    page.build("h1")
        .child("span", |s| s.class("typing-text").text("Hi, I'm"))
        .append_to(home);
    page.build("a")
        .class("btn")
        .class("download-cv")
        .attr("href", "assets/Resume.pdf")
        .attr("download", "Resume.pdf")
        .child("i", |i| i.class("fas").class("fa-download"))
        .append_to(home);

    let stats = page
        .build("div")
        .class("about-stats")
        .layout(1000.0, 200.0)
        .append_to(about);
    for (i, target) in ["13", "5", "3"].into_iter().enumerate() {
        page.build("span")
            .class("stat-number")
            .attr("data-target", target)
            .text("0")
            .layout(1000.0 + i as f64 * 20.0, 80.0)
            .append_to(stats);
    }
    for (i, width) in ["90%", "80%", "70%"].into_iter().enumerate() {
        page.build("div")
            .class("skill-category")
            .layout(1250.0 + i as f64 * 60.0, 50.0)
            .child("div", |bar| {
                bar.class("skill-progress")
                    .style("width", width)
                    .layout(1260.0 + i as f64 * 60.0, 10.0)
            })
            .append_to(about);
    }

    let tabs = page.build("div").class("resume-tabs").append_to(experience);
    for (i, tab) in RESUME_TABS.into_iter().enumerate() {
        let button = page
            .build("button")
            .class("tab-button")
            .attr("data-tab", tab)
            .text(tab.trim_end_matches("-tab"))
            .append_to(tabs);
        let panel = page
            .build("div")
            .class("tab-content")
            .id(tab)
            .layout(1700.0, 600.0)
            .append_to(experience);
        if i == 0 {
            page.add_class(button, "active");
            page.add_class(panel, "active");
        }
    }

    let filters = page.build("div").class("project-filters").append_to(projects);
    for filter in FILTERS {
        let button = page
            .build("button")
            .class("filter-btn")
            .attr("data-filter", filter)
            .text(filter)
            .append_to(filters);
        if filter == FILTER_ALL {
            page.add_class(button, "active");
        }
    }
    page.build("div")
        .id("projects-grid")
        .class("projects-grid")
        .layout(2500.0, 900.0)
        .append_to(projects);

    let form = page
        .build("form")
        .id("contact-form")
        .class("contact-form")
        .layout(3450.0, 500.0)
        .append_to(contact);
    page.build("input").attr("name", "name").append_to(form);
    page.build("input").attr("name", "email").attr("type", "email").append_to(form);
    page.build("textarea").attr("name", "message").append_to(form);
    page.build("button").attr("type", "submit").text("Send Message").append_to(form);

    page.build("button")
        .id("back-to-top")
        .class("back-to-top")
        .child("i", |i| i.class("fas").class("fa-arrow-up"))
        .append_to(body);
}

fn required(page: &Page, selector: &str) -> Result<NodeId> {
    page.query(selector)
        .with_context(|| format!("demo page is missing {selector}"))
}

fn visible_cards(page: &Page, config: &Config) -> usize {
    page.query_all(&config.selectors.project_cards)
        .into_iter()
        .filter(|card| page.style(*card, "display").as_deref() != Some("none"))
        .count()
}

/// Start the application on a fresh demo page and replay a visitor session
pub async fn run_session(config: Arc<Config>, page: Page) -> Result<SessionReport> {
    build_page(&page);

    let mut app = Application::new(config.clone(), page.clone());
    app.init();

    let mut report = SessionReport {
        components: app
            .component_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect(),
        listeners: page.total_listener_count(),
        ..Default::default()
    };

    // Typing reveal finishes while the visitor reads the hero
    let typing = &config.ui.typing;
    let typed_after = typing.delay_ms + typing.speed_ms * typing.text.chars().count() as u64;
    sleep(Duration::from_millis(typed_after + 50)).await;
    let typing_text = required(&page, &config.selectors.typing_text)?;
    report.typed = page.text_content(typing_text);

    tracing::info!("demo: scrolling to the about section");
    page.scroll_to(600.0);
    sleep(Duration::from_millis(config.ui.animations.counter_duration_ms + 100)).await;
    report.counters = page
        .query_all(&config.selectors.stat_numbers)
        .into_iter()
        .map(|n| page.text_content(n))
        .collect();

    tracing::info!("demo: opening the menu and following the projects link");
    let hamburger = required(&page, &config.selectors.hamburger)?;
    page.click(hamburger);
    let projects_link = required(&page, ".nav-link[href=\"#projects\"]")?;
    page.click(projects_link);

    tracing::info!("demo: toggling the theme");
    let toggle = required(&page, &config.selectors.theme_toggle)?;
    page.click(toggle);
    report.theme = page
        .attribute(page.document_element(), "data-theme")
        .unwrap_or_else(|| config.theme.default.clone());

    tracing::info!("demo: trying every project filter");
    for filter in FILTERS {
        let button = required(&page, &format!(".filter-btn[data-filter=\"{filter}\"]"))?;
        page.click(button);
        report
            .visible_by_filter
            .push((filter.to_string(), visible_cards(&page, &config)));
    }

    tracing::info!("demo: switching resume tabs");
    let education = required(&page, ".tab-button[data-tab=\"education-tab\"]")?;
    page.click(education);
    report.active_tab = page
        .query(&format!("{}.active", config.selectors.tab_contents))
        .and_then(|panel| page.attribute(panel, "id"));

    tracing::info!("demo: sending the contact form");
    let form = required(&page, &config.selectors.contact_form)?;
    for (name, value) in [
        ("name", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("message", "Enjoyed the projects section."),
    ] {
        let field = page
            .query_within(form, &format!("[name=\"{name}\"]"))
            .with_context(|| format!("contact form has no {name} field"))?;
        page.set_value(field, value);
    }
    page.submit(form);
    sleep(config.contact.submit_delay() + Duration::from_millis(50)).await;
    report.contact_outcome = page
        .query(".notification")
        .map(|notice| page.text_content(notice));

    tracing::info!("demo: downloading the resume");
    let download = required(&page, &config.selectors.download_button)?;
    page.click(download);
    sleep(Duration::from_millis(config.download.fallback_delay_ms + 50)).await;
    report.downloads = page.downloads();

    tracing::info!("demo: menu on a narrow window, then back to desktop");
    page.set_viewport(600.0, 800.0);
    page.click(hamburger);
    page.key_down(EventTarget::Document, "Escape");
    page.click(hamburger);
    page.set_viewport(1280.0, 800.0);

    let back_to_top = required(&page, &config.selectors.back_to_top)?;
    page.click(back_to_top);

    app.destroy();
    report.listeners_after_destroy = page.total_listener_count();

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::LocalSet;

    fn quiet_config() -> Arc<Config> {
        let mut config = Config::default();
        config.contact.failure_rate = 0.0;
        Arc::new(config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_exercises_every_component() {
        LocalSet::new()
            .run_until(async {
                let report = run_session(quiet_config(), Page::in_memory()).await.unwrap();

                assert_eq!(report.components.len(), 6);
                assert!(report.listeners > 0);
                assert_eq!(report.typed, "Hi, I'm");
                assert_eq!(report.counters, vec!["13", "5", "3"]);
                assert_eq!(report.theme, "dark");
                assert_eq!(
                    report.visible_by_filter,
                    vec![
                        ("all".to_string(), 13),
                        ("ai-ml".to_string(), 4),
                        ("algorithms".to_string(), 4),
                        ("distributed-systems".to_string(), 2),
                        ("web".to_string(), 1),
                    ]
                );
                assert_eq!(report.active_tab.as_deref(), Some("education-tab"));
                assert_eq!(
                    report.contact_outcome.as_deref(),
                    Some("Message sent successfully!")
                );
                assert_eq!(report.downloads.len(), 1);
                assert_eq!(report.downloads[0].filename, "Resume.pdf");
                assert_eq!(report.listeners_after_destroy, 0);
            })
            .await;
    }

    #[test]
    fn test_demo_page_matches_default_selectors() {
        let page = Page::in_memory();
        build_page(&page);
        let selectors = Config::default().selectors;

        for selector in [
            &selectors.navbar,
            &selectors.hamburger,
            &selectors.nav_menu,
            &selectors.theme_toggle,
            &selectors.back_to_top,
            &selectors.contact_form,
            &selectors.projects_grid,
            &selectors.typing_text,
            &selectors.hero,
            &selectors.hero_landmark,
            &selectors.download_button,
        ] {
            assert!(page.query(selector).is_some(), "missing {selector}");
        }
        assert_eq!(page.query_all(&selectors.nav_links).len(), SECTIONS.len());
        assert_eq!(page.query_all(&selectors.tab_buttons).len(), 3);
        assert_eq!(page.query_all(&selectors.filter_buttons).len(), FILTERS.len());
    }
}
