//! Application root
//!
//! Builds the fixed component set in order, starts each one, watches the
//! window for uncaught failures, and adds the page's accessibility
//! landmarks. A component that fails to start is logged and skipped; the
//! rest of the page keeps working.

use crate::component::{Component, ListenerRegistry};
use crate::components::{
    AnimationComponent, ContactComponent, FormSubmitter, NavigationComponent, ProjectsComponent,
    ThemeComponent, UiComponent,
};
use crate::config::Config;
use crate::dom::{handler, EventTarget, ListenerOptions, NodeId, Page};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;

/// Id the hero landmark is renamed to, and the skip link's destination
pub const MAIN_CONTENT_ID: &str = "main-content";

/// The six page roles, in start-up order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentName {
    Navigation,
    Theme,
    Animation,
    Projects,
    Contact,
    Ui,
}

impl ComponentName {
    pub const ALL: [ComponentName; 6] = [
        ComponentName::Navigation,
        ComponentName::Theme,
        ComponentName::Animation,
        ComponentName::Projects,
        ComponentName::Contact,
        ComponentName::Ui,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentName::Navigation => "navigation",
            ComponentName::Theme => "theme",
            ComponentName::Animation => "animation",
            ComponentName::Projects => "projects",
            ComponentName::Contact => "contact",
            ComponentName::Ui => "ui",
        }
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown component: {s}"))
    }
}

pub struct Application {
    config: Arc<Config>,
    page: Page,
    submitter: Option<Rc<dyn FormSubmitter>>,
    components: Vec<(ComponentName, Box<dyn Component>)>,
    listeners: ListenerRegistry,
    skip_link: Option<NodeId>,
    initialized: bool,
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field(
                "components",
                &self.components.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            )
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl Application {
    pub fn new(config: Arc<Config>, page: Page) -> Self {
        Self {
            config,
            page,
            submitter: None,
            components: Vec::new(),
            listeners: ListenerRegistry::new(),
            skip_link: None,
            initialized: false,
        }
    }

    /// Deliver contact form submissions through `submitter`
    pub fn with_submitter(mut self, submitter: Rc<dyn FormSubmitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn create_component(&self, name: ComponentName) -> Box<dyn Component> {
        let (config, page) = (self.config.clone(), self.page.clone());
        match name {
            ComponentName::Navigation => Box::new(NavigationComponent::new(config, page)),
            ComponentName::Theme => Box::new(ThemeComponent::new(config, page)),
            ComponentName::Animation => Box::new(AnimationComponent::new(config, page)),
            ComponentName::Projects => Box::new(ProjectsComponent::new(config, page)),
            ComponentName::Contact => {
                let contact = ContactComponent::new(config, page);
                match &self.submitter {
                    Some(submitter) => Box::new(contact.with_submitter(submitter.clone())),
                    None => Box::new(contact),
                }
            }
            ComponentName::Ui => Box::new(UiComponent::new(config, page)),
        }
    }

    /// Build and start every component. Calling it again does nothing.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }

        self.components = ComponentName::ALL
            .into_iter()
            .map(|name| (name, self.create_component(name)))
            .collect();

        let mut failed = 0;
        for (name, component) in &mut self.components {
            if let Err(e) = component.init() {
                failed += 1;
                tracing::warn!(component = %name, error = %e, "component failed to start");
            }
        }

        self.setup_global_handlers();
        self.enhance_accessibility();

        self.initialized = true;
        tracing::info!(
            components = self.components.len() - failed,
            failed,
            "Portfolio application initialized"
        );
    }

    fn setup_global_handlers(&mut self) {
        self.listeners.register(
            &self.page,
            Some(EventTarget::Window),
            "error",
            handler(|e| {
                tracing::error!(error = e.message().unwrap_or("unknown"), "Global error");
            }),
            ListenerOptions::default(),
        );
        self.listeners.register(
            &self.page,
            Some(EventTarget::Window),
            "unhandledrejection",
            handler(|e| {
                tracing::error!(
                    reason = e.message().unwrap_or("unknown"),
                    "Unhandled rejection"
                );
            }),
            ListenerOptions::default(),
        );
    }

    fn enhance_accessibility(&mut self) {
        let page = &self.page;
        let skip_link = page
            .build("a")
            .attr("href", &format!("#{MAIN_CONTENT_ID}"))
            .class("skip-link")
            .text("Skip to main content")
            .style("position", "absolute")
            .style("top", "-40px")
            .style("left", "6px")
            .finish();
        let first = page.first_child(page.body());
        page.insert_before(page.body(), skip_link, first);
        self.skip_link = Some(skip_link);

        let p = page.clone();
        self.listeners.register(
            page,
            Some(skip_link.into()),
            "focus",
            handler(move |_| p.set_style(skip_link, "top", "6px")),
            ListenerOptions::default(),
        );
        let p = page.clone();
        self.listeners.register(
            page,
            Some(skip_link.into()),
            "blur",
            handler(move |_| p.set_style(skip_link, "top", "-40px")),
            ListenerOptions::default(),
        );

        if let Some(hero) = page.query(&self.config.selectors.hero_landmark) {
            page.set_attribute(hero, "role", "main");
            page.set_attribute(hero, "id", MAIN_CONTENT_ID);
        }
    }

    pub fn get_component(&self, name: &str) -> Option<&dyn Component> {
        let name = name.parse::<ComponentName>().ok()?;
        self.components
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| &**c)
    }

    /// Names of the live components, in start-up order
    pub fn component_names(&self) -> Vec<ComponentName> {
        self.components.iter().map(|(n, _)| *n).collect()
    }

    /// Tear every component down and forget them
    pub fn destroy(&mut self) {
        for (_, component) in &mut self.components {
            component.destroy();
        }
        self.components.clear();
        self.listeners.release_all(&self.page);
        if let Some(skip_link) = self.skip_link.take() {
            self.page.remove(skip_link);
        }
        self.initialized = false;
        tracing::debug!("Portfolio application destroyed");
    }
}
