//! Light/dark theme switch with a persisted preference

use crate::component::{Component, ComponentBase};
use crate::config::Config;
use crate::dom::{NodeId, Page};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

pub const LIGHT: &str = "light";
pub const DARK: &str = "dark";

/// The other theme. Anything that is not "light" flips to light.
pub fn flipped(theme: &str) -> &'static str {
    if theme == LIGHT {
        DARK
    } else {
        LIGHT
    }
}

/// Icon shown on the toggle: a moon offers dark mode, a sun offers light mode
pub fn icon_class(theme: &str) -> &'static str {
    if theme == LIGHT {
        "fas fa-moon"
    } else {
        "fas fa-sun"
    }
}

fn apply(page: &Page, toggle: Option<NodeId>, theme: &str) {
    page.set_attribute(page.document_element(), "data-theme", theme);
    if let Some(icon) = toggle.and_then(|t| page.query_within(t, "i")) {
        page.set_class_name(icon, icon_class(theme));
    }
}

pub struct ThemeComponent {
    base: ComponentBase,
    toggle: Option<NodeId>,
    current: Rc<RefCell<String>>,
}

impl ThemeComponent {
    pub fn new(config: Arc<Config>, page: Page) -> Self {
        let current = Rc::new(RefCell::new(config.theme.default.clone()));
        Self {
            base: ComponentBase::new(config, page),
            toggle: None,
            current,
        }
    }

    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }

    /// Stored preference, used verbatim, or the configured default
    fn load_saved(&self) -> String {
        let theme = &self.base.config().theme;
        self.base
            .page()
            .storage()
            .get(&theme.storage_key)
            .unwrap_or_else(|| theme.default.clone())
    }
}

impl Component for ThemeComponent {
    fn name(&self) -> &'static str {
        "theme"
    }

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn setup_dom(&mut self) -> anyhow::Result<()> {
        self.toggle = self.base.query(&self.base.config().selectors.theme_toggle);
        let saved = self.load_saved();
        *self.current.borrow_mut() = saved;
        Ok(())
    }

    fn bind_events(&mut self) -> anyhow::Result<()> {
        let page = self.base.page().clone();
        let storage_key = self.base.config().theme.storage_key.clone();
        let current = self.current.clone();
        let toggle = self.toggle;

        self.base.listen(toggle, "click", move |_| {
            let next = flipped(&current.borrow()).to_string();
            apply(&page, toggle, &next);
            if let Err(e) = page.storage().set(&storage_key, &next) {
                tracing::warn!(error = %e, "could not persist theme preference");
            }
            tracing::debug!(theme = %next, "theme toggled");
            *current.borrow_mut() = next;
        });
        Ok(())
    }

    fn after_init(&mut self) -> anyhow::Result<()> {
        apply(self.base.page(), self.toggle, &self.current.borrow());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn themed_page(store: MemoryStore) -> (Page, NodeId, NodeId) {
        let page = Page::new(Rc::new(store));
        let toggle = page
            .build("button")
            .id("theme-toggle")
            .child("i", |i| i.class("fas").class("fa-moon"))
            .append_to(page.body());
        let icon = page.first_child(toggle).unwrap();
        (page, toggle, icon)
    }

    fn theme(page: &Page) -> ThemeComponent {
        ThemeComponent::new(Arc::new(Config::default()), page.clone())
    }

    #[test]
    fn test_defaults_to_light_without_saved_value() {
        let (page, _, icon) = themed_page(MemoryStore::new());
        let mut component = theme(&page);
        component.init().unwrap();

        assert_eq!(component.current(), "light");
        assert_eq!(
            page.attribute(page.document_element(), "data-theme").as_deref(),
            Some("light")
        );
        assert_eq!(page.classes(icon), vec!["fas", "fa-moon"]);
    }

    #[test]
    fn test_saved_value_used_verbatim() {
        let (page, _, icon) = themed_page(MemoryStore::with_value("theme", "solarized"));
        let mut component = theme(&page);
        component.init().unwrap();

        assert_eq!(component.current(), "solarized");
        assert_eq!(page.classes(icon), vec!["fas", "fa-sun"]);
    }

    #[test]
    fn test_toggle_twice_restores_and_persists() {
        let (page, toggle, icon) = themed_page(MemoryStore::new());
        let mut component = theme(&page);
        component.init().unwrap();

        page.click(toggle);
        assert_eq!(component.current(), "dark");
        assert_eq!(page.storage().get("theme").as_deref(), Some("dark"));
        assert_eq!(page.classes(icon), vec!["fas", "fa-sun"]);

        page.click(toggle);
        assert_eq!(component.current(), "light");
        assert_eq!(page.storage().get("theme").as_deref(), Some("light"));
        assert_eq!(
            page.attribute(page.document_element(), "data-theme").as_deref(),
            Some("light")
        );
    }

    #[test]
    fn test_missing_toggle_still_applies_theme() {
        let page = Page::new(Rc::new(MemoryStore::with_value("theme", "dark")));
        let mut component = theme(&page);
        component.init().unwrap();
        assert_eq!(component.listener_count(), 0);
        assert_eq!(
            page.attribute(page.document_element(), "data-theme").as_deref(),
            Some("dark")
        );
    }
}
