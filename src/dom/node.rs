//! Element storage
//!
//! Nodes live in an arena owned by the page and are addressed by [`NodeId`].
//! Detached nodes stay in the arena so stale handles never dangle; they are
//! simply unreachable from the document root.

use std::collections::BTreeMap;

/// Handle to an element in the page arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Layout box used for scroll and visibility math (px, document coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutBox {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub text: String,
    pub value: String,
    pub layout: LayoutBox,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl NodeData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            text: String::new(),
            value: String::new(),
            layout: LayoutBox::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Replace the whole class list from a space-separated string
    pub fn set_class_name(&mut self, class_name: &str) {
        self.classes.clear();
        for class in class_name.split_whitespace() {
            self.add_class(class);
        }
    }

    /// Attribute lookup; `class` is synthesized from the class list
    pub fn attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            return (!self.classes.is_empty()).then(|| self.classes.join(" "));
        }
        self.attributes.get(name).cloned()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        if name == "class" {
            return !self.classes.is_empty();
        }
        self.attributes.contains_key(name)
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    pub fn is_form_field(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "textarea" | "select")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_is_a_set() {
        let mut node = NodeData::new("DIV");
        node.add_class("card");
        node.add_class("card");
        node.add_class("active");
        assert_eq!(node.tag, "div");
        assert_eq!(node.classes, vec!["card", "active"]);

        node.remove_class("card");
        assert_eq!(node.attribute("class").as_deref(), Some("active"));
    }

    #[test]
    fn test_set_class_name_replaces_list() {
        let mut node = NodeData::new("i");
        node.set_class_name("fas  fa-moon");
        node.set_class_name("fas fa-sun");
        assert_eq!(node.classes, vec!["fas", "fa-sun"]);
        assert!(!node.has_class("fa-moon"));
    }
}
