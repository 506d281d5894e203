//! Component lifecycle - the foundation every page behavior builds on
//!
//! A component is a behavioral unit bound to one region of the page. It
//! embeds a [`ComponentBase`] (shared config, page handle, initialized flag,
//! listener registry) and implements [`Component`], overriding only the
//! hooks it needs.
//!
//! # Lifecycle
//!
//! ```text
//! constructed ── init() ──► before_init → setup_dom → bind_events → after_init ──► initialized
//!                                                                                     │
//!            ◄──────────────── destroy(): release listeners, reset flag, teardown ◄───┘
//! ```
//!
//! `init()` is idempotent. If a hook fails the sequence stops, anything the
//! earlier hooks registered is released, and the component stays
//! uninitialized. `destroy()` detaches exactly the listeners attached
//! through [`ComponentBase::listen`].
//!
//! # Example
//!
//! ```ignore
//! struct Banner {
//!     base: ComponentBase,
//!     close: Option<NodeId>,
//! }
//!
//! impl Component for Banner {
//!     fn name(&self) -> &'static str { "banner" }
//!     fn base(&self) -> &ComponentBase { &self.base }
//!     fn base_mut(&mut self) -> &mut ComponentBase { &mut self.base }
//!
//!     fn setup_dom(&mut self) -> anyhow::Result<()> {
//!         self.close = self.base.query("#banner-close");
//!         Ok(())
//!     }
//!
//!     fn bind_events(&mut self) -> anyhow::Result<()> {
//!         let page = self.base.page().clone();
//!         self.base.listen(self.close, "click", move |e| {
//!             if let Some(node) = e.target_node() {
//!                 page.remove(node);
//!             }
//!         });
//!         Ok(())
//!     }
//! }
//! ```

mod registry;

pub use registry::{ListenerKey, ListenerRegistry};

use crate::config::Config;
use crate::dom::{handler, Event, EventTarget, ListenerOptions, NodeId, Page};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Lifecycle hook names, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    BeforeInit,
    SetupDom,
    BindEvents,
    AfterInit,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::BeforeInit,
        Phase::SetupDom,
        Phase::BindEvents,
        Phase::AfterInit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::BeforeInit => "before_init",
            Phase::SetupDom => "setup_dom",
            Phase::BindEvents => "bind_events",
            Phase::AfterInit => "after_init",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("{component}: {phase} failed: {message}")]
    Hook {
        component: &'static str,
        phase: Phase,
        message: String,
    },
}

/// State every component embeds
pub struct ComponentBase {
    config: Arc<Config>,
    page: Page,
    initialized: bool,
    listeners: ListenerRegistry,
}

impl fmt::Debug for ComponentBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentBase")
            .field("initialized", &self.initialized)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl ComponentBase {
    pub fn new(config: Arc<Config>, page: Page) -> Self {
        Self {
            config,
            page,
            initialized: false,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Attach a tracked listener. `None` targets are ignored.
    pub fn listen<T>(
        &mut self,
        target: Option<T>,
        event: &str,
        f: impl Fn(&Event) + 'static,
    ) -> Option<ListenerKey>
    where
        T: Into<EventTarget>,
    {
        self.listen_with(target, event, ListenerOptions::default(), f)
    }

    pub fn listen_with<T>(
        &mut self,
        target: Option<T>,
        event: &str,
        options: ListenerOptions,
        f: impl Fn(&Event) + 'static,
    ) -> Option<ListenerKey>
    where
        T: Into<EventTarget>,
    {
        self.listeners.register(
            &self.page,
            target.map(Into::into),
            event,
            handler(f),
            options,
        )
    }

    /// First match for `selector`, if any
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        self.page.query(selector)
    }

    pub fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.page.query_all(selector)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn release_listeners(&mut self) -> usize {
        self.listeners.release_all(&self.page)
    }
}

/// A page behavior with a four-phase start-up and symmetric teardown
pub trait Component {
    /// Stable name used for lookup and logging
    fn name(&self) -> &'static str;

    fn base(&self) -> &ComponentBase;

    fn base_mut(&mut self) -> &mut ComponentBase;

    fn before_init(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Resolve page elements
    fn setup_dom(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Attach listeners (through [`ComponentBase::listen`])
    fn bind_events(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn after_init(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Release anything that is not a listener (observers, cached handles).
    /// Runs after the listeners are gone.
    fn teardown(&mut self) {}

    /// Run the four hooks once
    fn init(&mut self) -> Result<(), ComponentError> {
        if self.is_initialized() {
            return Ok(());
        }

        for phase in Phase::ALL {
            let outcome = match phase {
                Phase::BeforeInit => self.before_init(),
                Phase::SetupDom => self.setup_dom(),
                Phase::BindEvents => self.bind_events(),
                Phase::AfterInit => self.after_init(),
            };
            if let Err(e) = outcome {
                self.base_mut().release_listeners();
                self.teardown();
                return Err(ComponentError::Hook {
                    component: self.name(),
                    phase,
                    message: format!("{e:#}"),
                });
            }
        }

        self.base_mut().initialized = true;
        tracing::debug!(
            component = self.name(),
            listeners = self.listener_count(),
            "component initialized"
        );
        Ok(())
    }

    /// Detach every tracked listener, reset, then run [`Component::teardown`]
    fn destroy(&mut self) {
        let released = self.base_mut().release_listeners();
        let was_initialized = std::mem::replace(&mut self.base_mut().initialized, false);
        self.teardown();
        if was_initialized {
            tracing::debug!(component = self.name(), released, "component destroyed");
        }
    }

    fn is_initialized(&self) -> bool {
        self.base().initialized
    }

    fn listener_count(&self) -> usize {
        self.base().listener_count()
    }
}
