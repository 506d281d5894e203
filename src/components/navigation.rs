//! Navigation bar: mobile menu, in-page links, scroll-driven highlighting

use crate::component::{Component, ComponentBase};
use crate::config::Config;
use crate::dom::{EventTarget, NodeId, Page, ScrollBlock};
use crate::util::Throttle;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug, Default)]
struct NavElements {
    navbar: Option<NodeId>,
    hamburger: Option<NodeId>,
    menu: Option<NodeId>,
    links: Vec<NodeId>,
}

/// Shared between the component and its handlers
struct NavState {
    page: Page,
    config: Arc<Config>,
    elements: NavElements,
}

impl NavState {
    /// The `active` class is the source of truth; other behaviors may close the menu
    fn menu_open(&self) -> bool {
        self.elements
            .menu
            .or(self.elements.hamburger)
            .is_some_and(|node| self.page.has_class(node, "active"))
    }

    fn toggle_menu(&self) {
        let open = !self.menu_open();
        for node in [self.elements.hamburger, self.elements.menu].into_iter().flatten() {
            self.page.toggle_class(node, "active", open);
        }
    }

    fn close_menu(&self) {
        for node in [self.elements.hamburger, self.elements.menu].into_iter().flatten() {
            self.page.remove_class(node, "active");
        }
    }

    fn set_active_link(&self, active: NodeId) {
        for link in &self.elements.links {
            self.page.remove_class(*link, "active");
        }
        self.page.add_class(active, "active");
    }

    fn handle_link_click(&self, link: NodeId) {
        let href = self.page.attribute(link, "href").unwrap_or_default();
        let Some(section) = href
            .strip_prefix('#')
            .filter(|id| !id.is_empty())
            .and_then(|id| self.page.get_element_by_id(id))
        else {
            return;
        };

        self.close_menu();
        self.page.scroll_into_view(section, ScrollBlock::Start);
        self.set_active_link(link);
    }

    fn update_scroll_effects(&self) {
        let Some(navbar) = self.elements.navbar else {
            return;
        };
        let scrolled = self.page.scroll_y() > self.config.ui.scroll.navbar_threshold;
        self.page.toggle_class(navbar, "scrolled", scrolled);
    }

    /// Highlight the link of the section currently under the scroll offset
    fn update_active_link(&self) {
        let scroll_y = self.page.scroll_y();
        let offset = self.config.ui.scroll.section_offset;

        for section in self.page.query_all(&self.config.selectors.sections) {
            let layout = self.page.layout(section);
            let top = layout.top - offset;
            if !(scroll_y > top && scroll_y <= top + layout.height) {
                continue;
            }
            let Some(id) = self.page.attribute(section, "id") else {
                continue;
            };
            let href = format!("#{id}");
            if let Some(link) = self
                .elements
                .links
                .iter()
                .copied()
                .find(|link| self.page.attribute(*link, "href").as_deref() == Some(href.as_str()))
            {
                self.set_active_link(link);
            }
        }
    }
}

pub struct NavigationComponent {
    base: ComponentBase,
    state: Option<Rc<NavState>>,
}

impl NavigationComponent {
    pub fn new(config: Arc<Config>, page: Page) -> Self {
        Self {
            base: ComponentBase::new(config, page),
            state: None,
        }
    }

    pub fn is_menu_open(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.menu_open())
    }
}

impl Component for NavigationComponent {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn setup_dom(&mut self) -> anyhow::Result<()> {
        let selectors = &self.base.config().selectors;
        let elements = NavElements {
            navbar: self.base.query(&selectors.navbar),
            hamburger: self.base.query(&selectors.hamburger),
            menu: self.base.query(&selectors.nav_menu),
            links: self.base.query_all(&selectors.nav_links),
        };
        tracing::debug!(links = elements.links.len(), "navigation elements resolved");

        self.state = Some(Rc::new(NavState {
            page: self.base.page().clone(),
            config: self.base.config().clone(),
            elements,
        }));
        Ok(())
    }

    fn bind_events(&mut self) -> anyhow::Result<()> {
        let Some(state) = self.state.clone() else {
            return Ok(());
        };

        let s = state.clone();
        self.base
            .listen(state.elements.hamburger, "click", move |_| s.toggle_menu());

        for link in state.elements.links.iter().copied() {
            let s = state.clone();
            self.base.listen(Some(link), "click", move |e| {
                e.prevent_default();
                s.handle_link_click(link);
            });
        }

        let throttle = Throttle::new(self.base.config().ui.scroll.throttle_window());
        let s = state.clone();
        self.base.listen(Some(EventTarget::Window), "scroll", move |_| {
            throttle.run(|| {
                s.update_scroll_effects();
                s.update_active_link();
            });
        });

        let s = state;
        self.base.listen(Some(EventTarget::Document), "keydown", move |e| {
            if e.key_name() == Some("Escape") && s.menu_open() {
                s.close_menu();
            }
        });
        Ok(())
    }

    fn teardown(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn nav_page() -> (Page, NodeId, NodeId, NodeId, Vec<NodeId>) {
        let page = Page::in_memory();
        let body = page.body();
        let navbar = page.build("nav").id("navbar").append_to(body);
        let hamburger = page.build("div").id("hamburger").append_to(navbar);
        let menu = page.build("ul").id("nav-menu").append_to(navbar);
        let links = ["home", "about", "projects"]
            .iter()
            .map(|id| {
                page.build("a")
                    .class("nav-link")
                    .attr("href", &format!("#{id}"))
                    .append_to(menu)
            })
            .collect();
        page.build("section").id("home").layout(0.0, 800.0).append_to(body);
        page.build("section").id("about").layout(800.0, 600.0).append_to(body);
        page.build("section").id("projects").layout(1400.0, 900.0).append_to(body);
        (page, navbar, hamburger, menu, links)
    }

    fn nav(page: &Page) -> NavigationComponent {
        NavigationComponent::new(Arc::new(Config::default()), page.clone())
    }

    #[test]
    fn test_hamburger_toggles_menu() {
        let (page, _, hamburger, menu, _) = nav_page();
        let mut component = nav(&page);
        component.init().unwrap();

        page.click(hamburger);
        assert!(component.is_menu_open());
        assert!(page.has_class(hamburger, "active"));
        assert!(page.has_class(menu, "active"));

        page.click(hamburger);
        assert!(!component.is_menu_open());
        assert!(!page.has_class(menu, "active"));
    }

    #[test]
    fn test_escape_closes_open_menu() {
        let (page, _, hamburger, menu, _) = nav_page();
        let mut component = nav(&page);
        component.init().unwrap();

        page.click(hamburger);
        page.key_down(EventTarget::Document, "Enter");
        assert!(page.has_class(menu, "active"));

        page.key_down(EventTarget::Document, "Escape");
        assert!(!component.is_menu_open());
        assert!(!page.has_class(hamburger, "active"));
    }

    #[test]
    fn test_menu_closed_elsewhere_reopens_on_one_click() {
        let (page, _, hamburger, menu, _) = nav_page();
        let mut component = nav(&page);
        component.init().unwrap();

        page.click(hamburger);
        page.remove_class(hamburger, "active");
        page.remove_class(menu, "active");
        assert!(!component.is_menu_open());

        page.click(hamburger);
        assert!(component.is_menu_open());
        assert!(page.has_class(menu, "active"));
    }

    #[test]
    fn test_link_click_scrolls_and_marks_active() {
        let (page, _, hamburger, menu, links) = nav_page();
        let mut component = nav(&page);
        component.init().unwrap();
        page.click(hamburger);

        let proceeded = page.click(links[2]);
        assert!(!proceeded, "default navigation is prevented");
        assert_eq!(page.scroll_y(), 1400.0);
        assert!(!page.has_class(menu, "active"));
        assert!(page.has_class(links[2], "active"));
        assert!(!page.has_class(links[0], "active"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_updates_navbar_and_active_link() {
        let (page, navbar, _, _, links) = nav_page();
        let mut component = nav(&page);
        component.init().unwrap();

        page.scroll_to(900.0);
        assert!(page.has_class(navbar, "scrolled"));
        assert!(page.has_class(links[1], "active"));

        // Inside the throttle window: dropped
        page.scroll_to(0.0);
        assert!(page.has_class(navbar, "scrolled"));

        tokio::time::sleep(Duration::from_millis(20)).await;
        page.scroll_to(10.0);
        assert!(!page.has_class(navbar, "scrolled"));
        assert!(page.has_class(links[0], "active"));
        assert!(!page.has_class(links[1], "active"));
    }

    #[test]
    fn test_destroy_removes_all_listeners() {
        let (page, _, hamburger, menu, _) = nav_page();
        let mut component = nav(&page);
        component.init().unwrap();
        assert_eq!(component.listener_count(), 6);

        component.destroy();
        assert_eq!(page.total_listener_count(), 0);
        page.click(hamburger);
        assert!(!page.has_class(menu, "active"));
    }
}
