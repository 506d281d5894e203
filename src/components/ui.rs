//! Back-to-top button, resume tabs, responsive menu reset, resume download

use crate::component::{Component, ComponentBase};
use crate::config::Config;
use crate::dom::{EventTarget, NodeId, Page, ScrollBlock};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

fn show_panel(page: &Page, panel: NodeId) {
    page.add_class(panel, "active");
    page.set_style(panel, "display", "block");
    page.set_attribute(panel, "aria-hidden", "false");
}

fn hide_panel(page: &Page, panel: NodeId) {
    page.remove_class(panel, "active");
    page.set_style(panel, "display", "none");
    page.set_attribute(panel, "aria-hidden", "true");
}

struct Tabs {
    buttons: Vec<NodeId>,
    panels: Vec<NodeId>,
}

impl Tabs {
    /// Clear every button and panel, then activate `button` and its panel
    fn activate(&self, page: &Page, button: NodeId) {
        let Some(panel) = page
            .attribute(button, "data-tab")
            .and_then(|name| page.get_element_by_id(&name))
        else {
            return;
        };

        for other in &self.buttons {
            page.remove_class(*other, "active");
            page.set_attribute(*other, "aria-selected", "false");
        }
        for other in &self.panels {
            hide_panel(page, *other);
        }

        page.add_class(button, "active");
        page.set_attribute(button, "aria-selected", "true");
        show_panel(page, panel);
        page.scroll_into_view(panel, ScrollBlock::Nearest);
    }

    /// Make display and aria state agree with the `active` class
    fn normalize(&self, page: &Page) {
        for panel in &self.panels {
            if page.has_class(*panel, "active") {
                show_panel(page, *panel);
            } else {
                hide_panel(page, *panel);
            }
        }
    }
}

/// Save `href` through a hidden temporary link
fn force_download(page: &Page, href: &str, filename: &str) {
    let link = page
        .build("a")
        .attr("href", href)
        .attr("download", filename)
        .style("display", "none")
        .append_to(page.body());
    page.click(link);
    page.remove(link);
}

pub struct UiComponent {
    base: ComponentBase,
    back_to_top: Option<NodeId>,
    download: Option<NodeId>,
    tabs: Rc<Tabs>,
}

impl UiComponent {
    pub fn new(config: Arc<Config>, page: Page) -> Self {
        Self {
            base: ComponentBase::new(config, page),
            back_to_top: None,
            download: None,
            tabs: Rc::new(Tabs {
                buttons: Vec::new(),
                panels: Vec::new(),
            }),
        }
    }

    /// Panels currently marked active
    pub fn active_panels(&self) -> Vec<NodeId> {
        let page = self.base.page();
        self.tabs
            .panels
            .iter()
            .copied()
            .filter(|p| page.has_class(*p, "active"))
            .collect()
    }

    fn bind_back_to_top(&mut self) {
        let page = self.base.page().clone();
        self.base
            .listen(self.back_to_top, "click", move |_| page.scroll_to(0.0));

        let Some(button) = self.back_to_top else {
            return;
        };
        let page = self.base.page().clone();
        let threshold = self.base.config().ui.scroll.back_to_top_threshold;
        self.base.listen(Some(EventTarget::Window), "scroll", move |_| {
            page.toggle_class(button, "visible", page.scroll_y() > threshold);
        });
    }

    fn bind_tabs(&mut self) {
        for button in self.tabs.buttons.clone() {
            let page = self.base.page().clone();
            let tabs = self.tabs.clone();
            self.base.listen(Some(button), "click", move |e| {
                e.prevent_default();
                tabs.activate(&page, button);
            });
        }
    }

    fn bind_download(&mut self) {
        let page = self.base.page().clone();
        let download = self.base.config().download.clone();

        self.base.listen(self.download, "click", move |e| {
            let Some(link) = e.target_node().and_then(|n| page.closest(n, "a")) else {
                return;
            };
            if page.has_attribute(link, "download") {
                // Native save handles it
                return;
            }
            e.prevent_default();

            let href = page.attribute(link, "href").unwrap_or_default();
            let filename = download.default_filename.clone();
            let page_handle = page.clone();
            page.set_timeout(Duration::from_millis(download.fallback_delay_ms), move || {
                force_download(&page_handle, &href, &filename);
            });
        });
    }

    fn bind_resize(&mut self) {
        let page = self.base.page().clone();
        let config = self.base.config().clone();
        self.base.listen(Some(EventTarget::Window), "resize", move |_| {
            if page.inner_width() <= config.ui.layout.mobile_breakpoint {
                return;
            }
            for selector in [&config.selectors.hamburger, &config.selectors.nav_menu] {
                if let Some(node) = page.query(selector) {
                    page.remove_class(node, "active");
                }
            }
        });
    }
}

impl Component for UiComponent {
    fn name(&self) -> &'static str {
        "ui"
    }

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn setup_dom(&mut self) -> anyhow::Result<()> {
        let selectors = &self.base.config().selectors;
        self.back_to_top = self.base.query(&selectors.back_to_top);
        self.download = self.base.query(&selectors.download_button);
        self.tabs = Rc::new(Tabs {
            buttons: self.base.query_all(&selectors.tab_buttons),
            panels: self.base.query_all(&selectors.tab_contents),
        });
        Ok(())
    }

    fn bind_events(&mut self) -> anyhow::Result<()> {
        self.bind_back_to_top();
        self.bind_tabs();
        self.bind_download();
        self.bind_resize();
        Ok(())
    }

    fn after_init(&mut self) -> anyhow::Result<()> {
        self.tabs.normalize(self.base.page());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Download;
    use tokio::task::LocalSet;

    fn ui(page: &Page) -> UiComponent {
        UiComponent::new(Arc::new(Config::default()), page.clone())
    }

    fn tabs_page() -> (Page, Vec<NodeId>, Vec<NodeId>) {
        let page = Page::in_memory();
        let body = page.body();
        let names = ["experience", "education", "certifications"];
        let buttons = names
            .iter()
            .map(|n| page.build("button").class("tab-button").attr("data-tab", n).append_to(body))
            .collect::<Vec<_>>();
        let panels = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                page.build("div")
                    .class("tab-content")
                    .id(n)
                    .layout(2000.0 + i as f64 * 10.0, 400.0)
                    .append_to(body)
            })
            .collect::<Vec<_>>();
        page.add_class(panels[0], "active");
        // Stale markup: a second panel also claims to be active
        page.add_class(panels[2], "active");
        (page, buttons, panels)
    }

    #[test]
    fn test_tabs_are_mutually_exclusive() {
        let (page, buttons, panels) = tabs_page();
        let mut component = ui(&page);
        component.init().unwrap();

        page.click(buttons[1]);
        assert_eq!(component.active_panels(), vec![panels[1]]);
        assert_eq!(page.style(panels[1], "display").as_deref(), Some("block"));
        assert_eq!(page.attribute(panels[1], "aria-hidden").as_deref(), Some("false"));
        for i in [0, 2] {
            assert_eq!(page.style(panels[i], "display").as_deref(), Some("none"));
            assert_eq!(page.attribute(panels[i], "aria-hidden").as_deref(), Some("true"));
            assert_eq!(page.attribute(buttons[i], "aria-selected").as_deref(), Some("false"));
        }
        assert_eq!(page.attribute(buttons[1], "aria-selected").as_deref(), Some("true"));
        // Brought into view
        assert!(page.scroll_y() > 0.0);

        page.click(buttons[2]);
        assert_eq!(component.active_panels(), vec![panels[2]]);
    }

    #[test]
    fn test_tab_with_unknown_panel_changes_nothing() {
        let (page, buttons, panels) = tabs_page();
        let mut component = ui(&page);
        component.init().unwrap();
        page.set_attribute(buttons[1], "data-tab", "missing");

        page.click(buttons[1]);
        assert!(page.has_class(panels[0], "active"));
        assert!(!page.has_class(buttons[1], "active"));
    }

    #[test]
    fn test_after_init_normalizes_visibility() {
        let (page, _, panels) = tabs_page();
        page.remove_class(panels[2], "active");
        let mut component = ui(&page);
        component.init().unwrap();

        assert_eq!(page.style(panels[0], "display").as_deref(), Some("block"));
        assert_eq!(page.style(panels[1], "display").as_deref(), Some("none"));
        assert_eq!(page.attribute(panels[2], "aria-hidden").as_deref(), Some("true"));
    }

    #[test]
    fn test_back_to_top() {
        let page = Page::in_memory();
        let button = page.build("button").id("back-to-top").append_to(page.body());
        let mut component = ui(&page);
        component.init().unwrap();

        page.scroll_to(301.0);
        assert!(page.has_class(button, "visible"));

        page.click(button);
        assert_eq!(page.scroll_y(), 0.0);
        assert!(!page.has_class(button, "visible"));
    }

    #[test]
    fn test_resize_to_desktop_closes_menu() {
        let page = Page::in_memory();
        let hamburger = page.build("div").id("hamburger").class("active").append_to(page.body());
        let menu = page.build("ul").id("nav-menu").class("active").append_to(page.body());
        let mut component = ui(&page);
        component.init().unwrap();

        page.set_viewport(600.0, 800.0);
        assert!(page.has_class(menu, "active"));

        page.set_viewport(1024.0, 800.0);
        assert!(!page.has_class(hamburger, "active"));
        assert!(!page.has_class(menu, "active"));
    }

    #[test]
    fn test_download_with_attribute_uses_native_path() {
        let page = Page::in_memory();
        let link = page
            .build("a")
            .class("download-cv")
            .attr("href", "docs/resume.pdf")
            .attr("download", "Resume.pdf")
            .append_to(page.body());
        let mut component = ui(&page);
        component.init().unwrap();

        page.click(link);
        assert_eq!(
            page.downloads(),
            vec![Download {
                href: "docs/resume.pdf".to_string(),
                filename: "Resume.pdf".to_string()
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_fallback_uses_temporary_link() {
        LocalSet::new()
            .run_until(async {
                let page = Page::in_memory();
                let link = page
                    .build("a")
                    .class("download-cv")
                    .attr("href", "docs/resume.pdf")
                    .child("i", |i| i.class("fas").class("fa-download"))
                    .append_to(page.body());
                let icon = page.first_child(link).unwrap();
                let mut component = ui(&page);
                component.init().unwrap();

                assert!(!page.click(icon), "plain navigation is prevented");
                assert!(page.downloads().is_empty());

                tokio::time::sleep(Duration::from_millis(150)).await;
                assert_eq!(
                    page.downloads(),
                    vec![Download {
                        href: "docs/resume.pdf".to_string(),
                        filename: "Resume.pdf".to_string()
                    }]
                );
                // Temporary link is gone again
                assert_eq!(page.query_all("a").len(), 1);
            })
            .await;
    }
}
