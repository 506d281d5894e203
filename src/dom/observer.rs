//! Visibility observers
//!
//! An [`IntersectionObserver`] watches a set of elements and reports when
//! each one starts or stops intersecting the (margin-adjusted) viewport.
//! Reports are delivered by [`Page::flush_intersections`], which the page
//! runs after every scroll and resize; the first flush after `observe()`
//! always reports the element's initial state.

use super::node::{LayoutBox, NodeId};
use super::Page;
use std::rc::Rc;

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Viewport adjustment in px; negative values shrink the root box
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    /// Parse CSS margin shorthand ("10px", "0px 0px -50px 0px", ...).
    /// Unparseable components count as zero.
    pub fn parse(s: &str) -> Self {
        let values: Vec<f64> = s
            .split_whitespace()
            .map(|part| part.trim_end_matches("px").parse().unwrap_or(0.0))
            .collect();

        match values.as_slice() {
            [all] => Self {
                top: *all,
                right: *all,
                bottom: *all,
                left: *all,
            },
            [vertical, horizontal] => Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            },
            [top, horizontal, bottom] => Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            },
            [top, right, bottom, left, ..] => Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            },
            [] => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ObserverOptions {
    /// Minimum visible fraction for an element to count as intersecting
    pub threshold: f64,
    pub root_margin: RootMargin,
}

/// One visibility change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

pub type ObserverCallback = Rc<dyn Fn(&[IntersectionEntry], &IntersectionObserver)>;

pub(crate) struct ObserverSlot {
    pub id: u64,
    pub options: ObserverOptions,
    pub callback: ObserverCallback,
    /// Watched elements with their last reported state (None = not yet reported)
    pub targets: Vec<(NodeId, Option<bool>)>,
}

/// Visible fraction of `layout` inside the viewport `[scroll_y, scroll_y + height)`
/// after applying the root margin.
pub fn visible_ratio(layout: LayoutBox, scroll_y: f64, viewport_height: f64, margin: RootMargin) -> f64 {
    let root_top = scroll_y - margin.top;
    let root_bottom = scroll_y + viewport_height + margin.bottom;
    if root_bottom <= root_top {
        return 0.0;
    }

    let top = layout.top;
    let bottom = layout.top + layout.height;
    if layout.height <= 0.0 {
        return if top >= root_top && top < root_bottom { 1.0 } else { 0.0 };
    }

    let overlap = (bottom.min(root_bottom) - top.max(root_top)).max(0.0);
    overlap / layout.height
}

// ─────────────────────────────────────────────────────────────────────────────
// Observer handle
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to a registered observer
#[derive(Clone)]
pub struct IntersectionObserver {
    id: u64,
    page: Page,
}

impl std::fmt::Debug for IntersectionObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntersectionObserver")
            .field("id", &self.id)
            .field("watching", &self.watched().len())
            .finish()
    }
}

impl IntersectionObserver {
    pub fn new(
        page: &Page,
        options: ObserverOptions,
        callback: impl Fn(&[IntersectionEntry], &IntersectionObserver) + 'static,
    ) -> Self {
        let id = page.inner.next_observer.get();
        page.inner.next_observer.set(id + 1);
        page.inner.observers.borrow_mut().push(ObserverSlot {
            id,
            options,
            callback: Rc::new(callback),
            targets: Vec::new(),
        });

        Self {
            id,
            page: page.clone(),
        }
    }

    pub fn observe(&self, node: NodeId) {
        self.with_slot(|slot| {
            if !slot.targets.iter().any(|(n, _)| *n == node) {
                slot.targets.push((node, None));
            }
        });
    }

    pub fn unobserve(&self, node: NodeId) {
        self.with_slot(|slot| slot.targets.retain(|(n, _)| *n != node));
    }

    /// Stop watching everything and drop the callback
    pub fn disconnect(&self) {
        self.page
            .inner
            .observers
            .borrow_mut()
            .retain(|slot| slot.id != self.id);
    }

    pub fn watched(&self) -> Vec<NodeId> {
        self.page
            .inner
            .observers
            .borrow()
            .iter()
            .find(|slot| slot.id == self.id)
            .map(|slot| slot.targets.iter().map(|(n, _)| *n).collect())
            .unwrap_or_default()
    }

    pub fn is_connected(&self) -> bool {
        self.page
            .inner
            .observers
            .borrow()
            .iter()
            .any(|slot| slot.id == self.id)
    }

    fn with_slot(&self, f: impl FnOnce(&mut ObserverSlot)) {
        let mut observers = self.page.inner.observers.borrow_mut();
        if let Some(slot) = observers.iter_mut().find(|slot| slot.id == self.id) {
            f(slot);
        }
    }
}

impl Page {
    /// Deliver pending visibility changes to every observer.
    ///
    /// Callbacks run with no page borrows held, so they may freely mutate
    /// the page and observe/unobserve.
    pub fn flush_intersections(&self) {
        let (scroll_y, viewport_height) = {
            let window = self.inner.window.borrow();
            (window.scroll_y, window.inner_height)
        };

        let mut deliveries = Vec::new();
        {
            let mut observers = self.inner.observers.borrow_mut();
            for slot in observers.iter_mut() {
                let mut entries = Vec::new();
                for (node, last) in slot.targets.iter_mut() {
                    let ratio = if self.is_connected(*node) {
                        visible_ratio(
                            self.layout(*node),
                            scroll_y,
                            viewport_height,
                            slot.options.root_margin,
                        )
                    } else {
                        0.0
                    };
                    let intersecting = ratio > 0.0 && ratio >= slot.options.threshold;
                    if *last != Some(intersecting) {
                        *last = Some(intersecting);
                        entries.push(IntersectionEntry {
                            target: *node,
                            is_intersecting: intersecting,
                            ratio,
                        });
                    }
                }
                if !entries.is_empty() {
                    deliveries.push((slot.id, slot.callback.clone(), entries));
                }
            }
        }

        for (id, callback, entries) in deliveries {
            let observer = IntersectionObserver {
                id,
                page: self.clone(),
            };
            self.guard("intersection observer", || callback(&entries, &observer));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_margin_shorthand() {
        assert_eq!(
            RootMargin::parse("0px 0px -50px 0px"),
            RootMargin {
                top: 0.0,
                right: 0.0,
                bottom: -50.0,
                left: 0.0
            }
        );
        assert_eq!(RootMargin::parse("10px").bottom, 10.0);
        assert_eq!(RootMargin::parse("5px 7px").left, 7.0);
        assert_eq!(RootMargin::parse(""), RootMargin::default());
    }

    #[test]
    fn test_visible_ratio() {
        let margin = RootMargin::default();
        let layout = LayoutBox {
            top: 900.0,
            height: 200.0,
        };

        // Viewport 0..1000 shows the top half
        assert_eq!(visible_ratio(layout, 0.0, 1000.0, margin), 0.5);
        // Fully inside
        assert_eq!(visible_ratio(layout, 500.0, 1000.0, margin), 1.0);
        // Entirely below
        assert_eq!(visible_ratio(layout, 0.0, 800.0, margin), 0.0);

        // A negative bottom margin pulls the edge up past the element
        let shrunk = RootMargin::parse("0px 0px -150px 0px");
        assert_eq!(visible_ratio(layout, 0.0, 1000.0, shrunk), 0.0);
    }
}
