use super::{NodeId, Page};

/// Fluent construction of an element
///
/// ```ignore
/// let card = page
///     .build("div")
///     .class("project-card")
///     .attr("data-tags", "web rust")
///     .append_to(grid);
/// ```
#[must_use = "call finish() or append_to() to get the node"]
pub struct ElementBuilder<'a> {
    page: &'a Page,
    node: NodeId,
}

impl<'a> ElementBuilder<'a> {
    pub(super) fn new(page: &'a Page, tag: &str) -> Self {
        Self {
            page,
            node: page.create_element(tag),
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.page.set_attribute(self.node, "id", id);
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.page.add_class(self.node, class);
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.page.set_attribute(self.node, name, value);
        self
    }

    pub fn style(self, property: &str, value: &str) -> Self {
        self.page.set_style(self.node, property, value);
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.page.push_text(self.node, text);
        self
    }

    pub fn layout(self, top: f64, height: f64) -> Self {
        self.page.set_layout(self.node, top, height);
        self
    }

    /// Append a child built by `f` under this element
    pub fn child(self, tag: &str, f: impl FnOnce(ElementBuilder<'a>) -> ElementBuilder<'a>) -> Self {
        let child = f(ElementBuilder::new(self.page, tag)).finish();
        self.page.append_child(self.node, child);
        self
    }

    /// Detached node
    pub fn finish(self) -> NodeId {
        self.node
    }

    pub fn append_to(self, parent: NodeId) -> NodeId {
        self.page.append_child(parent, self.node);
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_nests_children() {
        let page = Page::in_memory();
        let toggle = page
            .build("button")
            .id("theme-toggle")
            .child("i", |i| i.class("fas").class("fa-moon"))
            .append_to(page.body());

        let icon = page.first_child(toggle).unwrap();
        assert_eq!(page.tag(icon), "i");
        assert_eq!(page.attribute(icon, "class").as_deref(), Some("fas fa-moon"));
        assert_eq!(page.query("#theme-toggle"), Some(toggle));
    }
}
