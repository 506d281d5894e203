//! Page model
//!
//! A single-threaded model of the browser page the components drive: an
//! element tree, a window with scroll offset and viewport size, listener
//! tables with bubbling dispatch, visibility observers, a durable key-value
//! store, and timers/tasks on the current `LocalSet`.
//!
//! # Ownership
//!
//! [`Page`] is a cheap `Rc` handle. Every method takes `&self` and holds its
//! internal borrows only for the duration of the call, so handlers invoked
//! during dispatch may call back into the page (including dispatching
//! further events) without conflicts.
//!
//! # Failure containment
//!
//! A panicking handler or timer is caught and re-dispatched to the window
//! as an `error` event; a page task that resolves to `Err` is re-dispatched
//! as `unhandledrejection`. Nothing a handler does can tear down the page.

mod builder;
mod event;
mod node;
mod observer;
mod selector;

pub use builder::ElementBuilder;
pub use event::{handler, Event, EventTarget, Handler, ListenerOptions};
pub use node::{LayoutBox, NodeId};
pub use observer::{
    visible_ratio, IntersectionEntry, IntersectionObserver, ObserverOptions, RootMargin,
};
pub use selector::{Selector, SelectorError};

use crate::storage::{KeyValueStore, MemoryStore};
use futures::FutureExt;
use node::NodeData;
use observer::ObserverSlot;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;
use std::time::Duration;

/// Viewport used by [`Page::in_memory`] until a host sets its own
pub const DEFAULT_VIEWPORT: (f64, f64) = (1280.0, 800.0);

/// A file save the page performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub href: String,
    pub filename: String,
}

/// Alignment for [`Page::scroll_into_view`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    /// Element top aligned with viewport top
    Start,
    /// Scroll the minimum distance that brings the element into view
    Nearest,
}

#[derive(Debug)]
pub(crate) struct WindowState {
    pub scroll_y: f64,
    pub inner_width: f64,
    pub inner_height: f64,
}

struct Registration {
    kind: String,
    handler: Handler,
    options: ListenerOptions,
}

pub(crate) struct PageInner {
    nodes: RefCell<Vec<NodeData>>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    listeners: RefCell<HashMap<EventTarget, Vec<Registration>>>,
    pub(crate) window: RefCell<WindowState>,
    pub(crate) observers: RefCell<Vec<ObserverSlot>>,
    pub(crate) next_observer: Cell<u64>,
    focused: Cell<Option<NodeId>>,
    store: Rc<dyn KeyValueStore>,
    downloads: RefCell<Vec<Download>>,
}

/// Handle to the page
///
/// Listeners and observer callbacks usually capture a clone, so the page
/// stays alive until they are removed. `Application::destroy` removes all
/// of its own.
#[derive(Clone)]
pub struct Page {
    pub(crate) inner: Rc<PageInner>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("nodes", &self.inner.nodes.borrow().len())
            .field("window", &*self.inner.window.borrow())
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Empty document (`html > head + body`) backed by `store`
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        let mut nodes = vec![NodeData::new("html"), NodeData::new("head"), NodeData::new("body")];
        let (root, head, body) = (NodeId(0), NodeId(1), NodeId(2));
        nodes[0].children = vec![head, body];
        nodes[1].parent = Some(root);
        nodes[2].parent = Some(root);

        Self {
            inner: Rc::new(PageInner {
                nodes: RefCell::new(nodes),
                root,
                head,
                body,
                listeners: RefCell::new(HashMap::new()),
                window: RefCell::new(WindowState {
                    scroll_y: 0.0,
                    inner_width: DEFAULT_VIEWPORT.0,
                    inner_height: DEFAULT_VIEWPORT.1,
                }),
                observers: RefCell::new(Vec::new()),
                next_observer: Cell::new(0),
                focused: Cell::new(None),
                store,
                downloads: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Empty document with a throwaway store
    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryStore::new()))
    }

    pub fn document_element(&self) -> NodeId {
        self.inner.root
    }

    pub fn head(&self) -> NodeId {
        self.inner.head
    }

    pub fn body(&self) -> NodeId {
        self.inner.body
    }

    /// Durable per-origin key-value store
    pub fn storage(&self) -> Rc<dyn KeyValueStore> {
        self.inner.store.clone()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tree
    // ─────────────────────────────────────────────────────────────────────

    /// Create a detached element
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut nodes = self.inner.nodes.borrow_mut();
        nodes.push(NodeData::new(tag));
        NodeId(nodes.len() - 1)
    }

    /// Start building a detached element
    pub fn build(&self, tag: &str) -> ElementBuilder<'_> {
        ElementBuilder::new(self, tag)
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` under `parent` before `reference` (or last)
    pub fn insert_before(&self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if parent == child || self.is_ancestor(child, parent) {
            tracing::warn!(?parent, ?child, "refusing to create a cycle in the page tree");
            return;
        }
        self.detach(child);

        let mut nodes = self.inner.nodes.borrow_mut();
        let siblings = &mut nodes[parent.0].children;
        let index = reference
            .and_then(|r| siblings.iter().position(|c| *c == r))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        nodes[child.0].parent = Some(parent);
    }

    /// Detach `node` (and its subtree) from the document
    pub fn remove(&self, node: NodeId) {
        self.detach(node);
    }

    fn detach(&self, node: NodeId) {
        let mut nodes = self.inner.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let nodes = self.inner.nodes.borrow();
        let mut current = nodes[node.0].parent;
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = nodes[p.0].parent;
        }
        false
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.nodes.borrow()[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.nodes.borrow()[node.0].children.clone()
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.inner.nodes.borrow()[node.0].children.first().copied()
    }

    /// Reachable from the document element
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.inner.root || self.is_ancestor(self.inner.root, node)
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.inner.nodes.borrow()[node.0].tag.clone()
    }

    /// Pre-order descendants of `root`, excluding `root`
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let nodes = self.inner.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes[root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    fn parse_selector(selector: &str) -> Option<Selector> {
        match Selector::parse(selector) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(selector, error = %e, "invalid selector, matching nothing");
                None
            }
        }
    }

    /// First element in document order matching `selector`
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    /// Every element in document order matching `selector`
    pub fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let mut matches = self.query_all_within(self.inner.root, selector);
        if let Some(parsed) = Self::parse_selector(selector) {
            if parsed.matches(&self.inner.nodes.borrow()[self.inner.root.0]) {
                matches.insert(0, self.inner.root);
            }
        }
        matches
    }

    /// First descendant of `root` matching `selector`
    pub fn query_within(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        self.query_all_within(root, selector).into_iter().next()
    }

    pub fn query_all_within(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(parsed) = Self::parse_selector(selector) else {
            return Vec::new();
        };
        let candidates = self.descendants(root);
        let nodes = self.inner.nodes.borrow();
        candidates
            .into_iter()
            .filter(|id| parsed.matches(&nodes[id.0]))
            .collect()
    }

    /// `node` or its nearest ancestor matching `selector`
    pub fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        let parsed = Self::parse_selector(selector)?;
        let nodes = self.inner.nodes.borrow();
        let mut current = Some(node);
        while let Some(id) = current {
            if parsed.matches(&nodes[id.0]) {
                return Some(id);
            }
            current = nodes[id.0].parent;
        }
        None
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let candidates = self.descendants(self.inner.root);
        let nodes = self.inner.nodes.borrow();
        candidates
            .into_iter()
            .find(|n| nodes[n.0].id() == Some(id))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Attributes, classes, style, text, values
    // ─────────────────────────────────────────────────────────────────────

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner.nodes.borrow()[node.0].attribute(name)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.inner.nodes.borrow()[node.0].has_attribute(name)
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let mut nodes = self.inner.nodes.borrow_mut();
        if name == "class" {
            nodes[node.0].set_class_name(value);
        } else {
            nodes[node.0]
                .attributes
                .insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        let mut nodes = self.inner.nodes.borrow_mut();
        if name == "class" {
            nodes[node.0].classes.clear();
        } else {
            nodes[node.0].attributes.remove(name);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.inner.nodes.borrow()[node.0].has_class(class)
    }

    pub fn add_class(&self, node: NodeId, class: &str) {
        self.inner.nodes.borrow_mut()[node.0].add_class(class);
    }

    pub fn remove_class(&self, node: NodeId, class: &str) {
        self.inner.nodes.borrow_mut()[node.0].remove_class(class);
    }

    /// Add when `force` is true, remove otherwise
    pub fn toggle_class(&self, node: NodeId, class: &str, force: bool) {
        if force {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.inner.nodes.borrow()[node.0].classes.clone()
    }

    pub fn set_class_name(&self, node: NodeId, class_name: &str) {
        self.inner.nodes.borrow_mut()[node.0].set_class_name(class_name);
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.inner.nodes.borrow()[node.0].style.get(property).cloned()
    }

    pub fn set_style(&self, node: NodeId, property: &str, value: &str) {
        self.inner.nodes.borrow_mut()[node.0]
            .style
            .insert(property.to_string(), value.to_string());
    }

    /// Own text followed by descendants' text in document order
    pub fn text_content(&self, node: NodeId) -> String {
        let descendants = self.descendants(node);
        let nodes = self.inner.nodes.borrow();
        let mut out = nodes[node.0].text.clone();
        for id in descendants {
            out.push_str(&nodes[id.0].text);
        }
        out
    }

    /// Replace children and text with `text`
    pub fn set_text(&self, node: NodeId, text: &str) {
        for child in self.children(node) {
            self.detach(child);
        }
        self.inner.nodes.borrow_mut()[node.0].text = text.to_string();
    }

    pub fn push_text(&self, node: NodeId, text: &str) {
        self.inner.nodes.borrow_mut()[node.0].text.push_str(text);
    }

    pub fn value(&self, node: NodeId) -> String {
        self.inner.nodes.borrow()[node.0].value.clone()
    }

    pub fn set_value(&self, node: NodeId, value: &str) {
        self.inner.nodes.borrow_mut()[node.0].value = value.to_string();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Layout and window
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_layout(&self, node: NodeId, top: f64, height: f64) {
        self.inner.nodes.borrow_mut()[node.0].layout = LayoutBox { top, height };
    }

    pub fn layout(&self, node: NodeId) -> LayoutBox {
        self.inner.nodes.borrow()[node.0].layout
    }

    pub fn scroll_y(&self) -> f64 {
        self.inner.window.borrow().scroll_y
    }

    pub fn inner_width(&self) -> f64 {
        self.inner.window.borrow().inner_width
    }

    pub fn inner_height(&self) -> f64 {
        self.inner.window.borrow().inner_height
    }

    /// Move the viewport, fire `scroll` on the window, deliver visibility
    pub fn scroll_to(&self, y: f64) {
        self.inner.window.borrow_mut().scroll_y = y.max(0.0);
        self.dispatch(&Event::new("scroll", EventTarget::Window));
        self.flush_intersections();
    }

    /// Resize the viewport, fire `resize` on the window, deliver visibility
    pub fn set_viewport(&self, width: f64, height: f64) {
        {
            let mut window = self.inner.window.borrow_mut();
            window.inner_width = width;
            window.inner_height = height;
        }
        self.dispatch(&Event::new("resize", EventTarget::Window));
        self.flush_intersections();
    }

    pub fn scroll_into_view(&self, node: NodeId, block: ScrollBlock) {
        let layout = self.layout(node);
        let (scroll_y, height) = (self.scroll_y(), self.inner_height());
        let target = match block {
            ScrollBlock::Start => layout.top,
            ScrollBlock::Nearest if layout.top < scroll_y => layout.top,
            ScrollBlock::Nearest if layout.top + layout.height > scroll_y + height => {
                layout.top + layout.height - height
            }
            ScrollBlock::Nearest => return,
        };
        self.scroll_to(target);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Listeners and dispatch
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_event_listener(
        &self,
        target: EventTarget,
        kind: &str,
        handler: Handler,
        options: ListenerOptions,
    ) {
        self.inner
            .listeners
            .borrow_mut()
            .entry(target)
            .or_default()
            .push(Registration {
                kind: kind.to_string(),
                handler,
                options,
            });
    }

    /// Remove the registration whose handler is `handler` (by identity)
    pub fn remove_event_listener(&self, target: EventTarget, kind: &str, handler: &Handler) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let Some(registrations) = listeners.get_mut(&target) else {
            return false;
        };
        let before = registrations.len();
        if let Some(index) = registrations
            .iter()
            .position(|r| r.kind == kind && Rc::ptr_eq(&r.handler, handler))
        {
            registrations.remove(index);
        }
        let removed = registrations.len() < before;
        if registrations.is_empty() {
            listeners.remove(&target);
        }
        removed
    }

    /// Listeners of any kind on `target`
    pub fn listener_count(&self, target: EventTarget) -> usize {
        self.inner
            .listeners
            .borrow()
            .get(&target)
            .map_or(0, Vec::len)
    }

    pub fn listener_count_for(&self, target: EventTarget, kind: &str) -> usize {
        self.inner
            .listeners
            .borrow()
            .get(&target)
            .map_or(0, |regs| regs.iter().filter(|r| r.kind == kind).count())
    }

    /// Listeners across every target
    pub fn total_listener_count(&self) -> usize {
        self.inner.listeners.borrow().values().map(Vec::len).sum()
    }

    fn is_registered(&self, target: EventTarget, kind: &str, handler: &Handler) -> bool {
        self.inner.listeners.borrow().get(&target).is_some_and(|regs| {
            regs.iter()
                .any(|r| r.kind == kind && Rc::ptr_eq(&r.handler, handler))
        })
    }

    fn propagation_path(&self, event: &Event) -> Vec<EventTarget> {
        let mut path = vec![event.target()];
        if !event.bubbles() {
            return path;
        }
        match event.target() {
            EventTarget::Node(node) => {
                let mut current = self.parent(node);
                while let Some(p) = current {
                    path.push(EventTarget::Node(p));
                    current = self.parent(p);
                }
                path.push(EventTarget::Document);
                path.push(EventTarget::Window);
            }
            EventTarget::Document => path.push(EventTarget::Window),
            EventTarget::Window => {}
        }
        path
    }

    /// Run listeners along the propagation path.
    /// Returns `false` if a listener called `prevent_default`.
    pub fn dispatch(&self, event: &Event) -> bool {
        for current in self.propagation_path(event) {
            let snapshot: Vec<(Handler, ListenerOptions)> = self
                .inner
                .listeners
                .borrow()
                .get(&current)
                .map(|regs| {
                    regs.iter()
                        .filter(|r| r.kind == event.kind())
                        .map(|r| (r.handler.clone(), r.options))
                        .collect()
                })
                .unwrap_or_default();

            for (handler, options) in snapshot {
                // Removed by an earlier listener in this same dispatch
                if !self.is_registered(current, event.kind(), &handler) {
                    continue;
                }
                if options.once {
                    self.remove_event_listener(current, event.kind(), &handler);
                }

                event.enter(current, options);
                let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| handler(event)));
                event.leave();

                if let Err(payload) = outcome {
                    let message = panic_message(&*payload);
                    if matches!(event.kind(), "error" | "unhandledrejection") {
                        tracing::error!(panic = %message, "error observer itself failed");
                    } else {
                        self.report_error(&format!("{} listener panicked: {message}", event.kind()));
                    }
                }
            }

            if event.propagation_stopped() {
                break;
            }
        }
        !event.default_prevented()
    }

    /// Activate `node`: dispatch `click`, then run the default action
    /// unless a listener prevented it.
    pub fn click(&self, node: NodeId) -> bool {
        let proceed = self.dispatch(&Event::new("click", node));
        if !proceed {
            return false;
        }

        let tag = self.tag(node);
        if tag == "a" && self.has_attribute(node, "download") {
            let href = self.attribute(node, "href").unwrap_or_default();
            let filename = self
                .attribute(node, "download")
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| href.rsplit('/').next().unwrap_or_default().to_string());
            tracing::debug!(%href, %filename, "download");
            self.inner
                .downloads
                .borrow_mut()
                .push(Download { href, filename });
        } else if tag == "button" && self.attribute(node, "type").as_deref() == Some("submit") {
            if let Some(form) = self.closest(node, "form") {
                self.submit(form);
            }
        }
        true
    }

    /// Dispatch `submit` on a form
    pub fn submit(&self, form: NodeId) -> bool {
        self.dispatch(&Event::new("submit", form))
    }

    /// Dispatch `keydown` with `key` at `target`
    pub fn key_down(&self, target: EventTarget, key: &str) -> bool {
        self.dispatch(&Event::key("keydown", target, key))
    }

    pub fn focus(&self, node: NodeId) {
        if let Some(previous) = self.inner.focused.replace(Some(node)) {
            if previous != node {
                self.dispatch(&Event::new("blur", previous));
            }
        }
        self.dispatch(&Event::new("focus", node));
    }

    pub fn blur(&self, node: NodeId) {
        if self.inner.focused.get() == Some(node) {
            self.inner.focused.set(None);
        }
        self.dispatch(&Event::new("blur", node));
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.inner.focused.get()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Forms
    // ─────────────────────────────────────────────────────────────────────

    /// `(name, value)` of every named field under `form`, in document order
    pub fn form_data(&self, form: NodeId) -> Vec<(String, String)> {
        let fields = self.descendants(form);
        let nodes = self.inner.nodes.borrow();
        fields
            .into_iter()
            .map(|id| &nodes[id.0])
            .filter(|n| n.is_form_field())
            .filter_map(|n| n.attributes.get("name").map(|name| (name.clone(), n.value.clone())))
            .collect()
    }

    /// Restore every field under `form` to its `value` attribute (or empty)
    pub fn reset_form(&self, form: NodeId) {
        let fields = self.descendants(form);
        let mut nodes = self.inner.nodes.borrow_mut();
        for id in fields {
            let node = &mut nodes[id.0];
            if node.is_form_field() {
                node.value = node.attributes.get("value").cloned().unwrap_or_default();
            }
        }
    }

    /// Every file save performed so far
    pub fn downloads(&self) -> Vec<Download> {
        self.inner.downloads.borrow().clone()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tasks, timers, error reporting
    // ─────────────────────────────────────────────────────────────────────

    /// Run a page task on the current `LocalSet`.
    ///
    /// An `Err` result is reported as `unhandledrejection`, a panic as
    /// `error`. Outside a `tokio::task::LocalSet` the task is dropped and
    /// reported as `error` instead of unwinding into the caller.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = anyhow::Result<()>> + 'static,
    {
        let page = self.clone();
        self.guard("page task", move || {
            tokio::task::spawn_local(async move {
                match AssertUnwindSafe(task).catch_unwind().await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => page.report_rejection(&format!("{e:#}")),
                    Err(payload) => page.report_error(&panic_message(&*payload)),
                }
            });
        });
    }

    /// Run `f` once after `delay`
    pub fn set_timeout(&self, delay: Duration, f: impl FnOnce() + 'static) {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            f();
            Ok(())
        });
    }

    /// Run `f`, converting a panic into a window `error` event
    pub(crate) fn guard(&self, what: &str, f: impl FnOnce()) {
        if let Err(payload) = std::panic::catch_unwind(AssertUnwindSafe(f)) {
            self.report_error(&format!("{what} panicked: {}", panic_message(&*payload)));
        }
    }

    /// Dispatch a window `error` event
    pub fn report_error(&self, message: &str) {
        self.dispatch(&Event::new("error", EventTarget::Window).with_message(message));
    }

    /// Dispatch a window `unhandledrejection` event
    pub fn report_rejection(&self, message: &str) {
        self.dispatch(&Event::new("unhandledrejection", EventTarget::Window).with_message(message));
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
