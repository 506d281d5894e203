//! Listener bookkeeping
//!
//! Every listener a component attaches goes through its registry so that
//! teardown can detach exactly what was attached, nothing more.

use crate::dom::{EventTarget, Handler, ListenerOptions, Page};
use std::collections::BTreeMap;

/// Key of one registration, unique within its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerKey(u64);

struct ListenerRecord {
    target: EventTarget,
    event: String,
    handler: Handler,
}

/// Registrations made by one owner, keyed by a per-instance counter
#[derive(Default)]
pub struct ListenerRegistry {
    next_key: u64,
    entries: BTreeMap<ListenerKey, ListenerRecord>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("next_key", &self.next_key)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `handler` and remember it. An absent target is a silent no-op.
    pub fn register(
        &mut self,
        page: &Page,
        target: Option<EventTarget>,
        event: &str,
        handler: Handler,
        options: ListenerOptions,
    ) -> Option<ListenerKey> {
        let target = target?;
        page.add_event_listener(target, event, handler.clone(), options);

        let key = ListenerKey(self.next_key);
        self.next_key += 1;
        self.entries.insert(
            key,
            ListenerRecord {
                target,
                event: event.to_string(),
                handler,
            },
        );
        Some(key)
    }

    /// Detach every recorded listener and forget them. Returns how many were recorded.
    pub fn release_all(&mut self, page: &Page) -> usize {
        let entries = std::mem::take(&mut self.entries);
        let count = entries.len();
        for record in entries.into_values() {
            page.remove_event_listener(record.target, &record.event, &record.handler);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::handler;

    #[test]
    fn test_absent_target_is_noop() {
        let page = Page::in_memory();
        let mut registry = ListenerRegistry::new();
        let key = registry.register(&page, None, "click", handler(|_| {}), Default::default());
        assert!(key.is_none());
        assert!(registry.is_empty());
        assert_eq!(page.total_listener_count(), 0);
    }

    #[test]
    fn test_keys_increase_and_release_detaches() {
        let page = Page::in_memory();
        let button = page.build("button").append_to(page.body());
        let mut registry = ListenerRegistry::new();

        let first = registry
            .register(&page, Some(button.into()), "click", handler(|_| {}), Default::default())
            .unwrap();
        let second = registry
            .register(&page, Some(EventTarget::Window), "scroll", handler(|_| {}), Default::default())
            .unwrap();
        assert!(second > first);

        // Listener attached outside the registry is left alone
        page.add_event_listener(button.into(), "focus", handler(|_| {}), Default::default());

        assert_eq!(registry.release_all(&page), 2);
        assert!(registry.is_empty());
        assert_eq!(page.total_listener_count(), 1);
    }

    #[test]
    fn test_same_closure_registered_twice_is_released_twice() {
        let page = Page::in_memory();
        let button = page.build("button").append_to(page.body());
        let mut registry = ListenerRegistry::new();
        let shared = handler(|_| {});

        registry.register(&page, Some(button.into()), "click", shared.clone(), Default::default());
        registry.register(&page, Some(button.into()), "click", shared, Default::default());
        assert_eq!(page.listener_count(button.into()), 2);

        registry.release_all(&page);
        assert_eq!(page.listener_count(button.into()), 0);
    }
}
