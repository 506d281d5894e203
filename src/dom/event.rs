//! Events, handlers and listener options

use super::node::NodeId;
use std::cell::Cell;
use std::rc::Rc;

/// Anything listeners can attach to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Document,
    Node(NodeId),
}

impl From<NodeId> for EventTarget {
    fn from(node: NodeId) -> Self {
        EventTarget::Node(node)
    }
}

/// Listener callback. Identity (`Rc::ptr_eq`) is what removal matches on.
pub type Handler = Rc<dyn Fn(&Event)>;

/// Wrap a closure as a [`Handler`]
pub fn handler(f: impl Fn(&Event) + 'static) -> Handler {
    Rc::new(f)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Detach after the first dispatch
    pub once: bool,
    /// `prevent_default` is ignored inside this listener
    pub passive: bool,
}

impl ListenerOptions {
    pub fn passive() -> Self {
        Self {
            passive: true,
            ..Self::default()
        }
    }
}

/// A dispatched event
#[derive(Debug)]
pub struct Event {
    kind: String,
    target: EventTarget,
    current_target: Cell<EventTarget>,
    key: Option<String>,
    message: Option<String>,
    bubbles: bool,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
    in_passive: Cell<bool>,
}

impl Event {
    pub fn new(kind: &str, target: impl Into<EventTarget>) -> Self {
        let target = target.into();
        Self {
            kind: kind.to_string(),
            target,
            current_target: Cell::new(target),
            key: None,
            message: None,
            bubbles: !matches!(
                kind,
                "focus" | "blur" | "scroll" | "resize" | "load" | "error" | "unhandledrejection"
            ),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
            in_passive: Cell::new(false),
        }
    }

    /// Keyboard event carrying a key name (e.g. "Escape")
    pub fn key(kind: &str, target: impl Into<EventTarget>, key: &str) -> Self {
        let mut event = Self::new(kind, target);
        event.key = Some(key.to_string());
        event
    }

    /// Error-style event carrying a message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn target(&self) -> EventTarget {
        self.target
    }

    /// Node the event was originally dispatched to, if any
    pub fn target_node(&self) -> Option<NodeId> {
        match self.target {
            EventTarget::Node(id) => Some(id),
            _ => None,
        }
    }

    pub fn current_target(&self) -> EventTarget {
        self.current_target.get()
    }

    pub fn key_name(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn prevent_default(&self) {
        if !self.in_passive.get() {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub(crate) fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub(crate) fn enter(&self, current: EventTarget, options: ListenerOptions) {
        self.current_target.set(current);
        self.in_passive.set(options.passive);
    }

    pub(crate) fn leave(&self) {
        self.in_passive.set(false);
    }
}
