//! Selector parsing and matching
//!
//! Supports the compound selectors the page uses: type, `#id`, `.class`,
//! `[attr]`, `[attr="value"]`, `:not(...)`, and comma-separated groups.
//! Combinators are rejected rather than half-supported.

use super::node::NodeData;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("unexpected end of selector")]
    UnexpectedEnd,
    #[error("combinators are not supported (offset {offset})")]
    Combinator { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
    not: Vec<Compound>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.not.is_empty()
    }

    fn matches(&self, node: &NodeData) -> bool {
        if let Some(tag) = &self.tag {
            if tag != "*" && *tag != node.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| node.has_class(c)) {
            return false;
        }
        let attrs_ok = self.attrs.iter().all(|a| match &a.value {
            None => node.has_attribute(&a.name),
            Some(expected) => node.attribute(&a.name).as_deref() == Some(expected.as_str()),
        });
        attrs_ok && !self.not.iter().any(|n| n.matches(node))
    }
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    groups: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser {
            chars: input.char_indices().collect(),
            pos: 0,
        };
        let mut groups = Vec::new();

        loop {
            parser.skip_ws();
            let compound = parser.compound()?;
            if compound.is_empty() {
                return Err(match parser.peek() {
                    Some((offset, found)) => SelectorError::Unexpected { found, offset },
                    None if groups.is_empty() => SelectorError::Empty,
                    None => SelectorError::UnexpectedEnd,
                });
            }
            groups.push(compound);
            parser.skip_ws();

            match parser.peek() {
                None => break,
                Some((_, ',')) => parser.pos += 1,
                Some((offset, _)) => return Err(SelectorError::Combinator { offset }),
            }
        }

        Ok(Self { groups })
    }

    pub(crate) fn matches(&self, node: &NodeData) -> bool {
        self.groups.iter().any(|g| g.matches(node))
    }
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some((_, c)) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorError> {
        match self.peek() {
            Some((_, c)) if c == want => {
                self.pos += 1;
                Ok(())
            }
            Some((offset, found)) => Err(SelectorError::Unexpected { found, offset }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some((_, c)) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(match self.peek() {
                Some((offset, found)) => SelectorError::Unexpected { found, offset },
                None => SelectorError::UnexpectedEnd,
            });
        }
        Ok(out)
    }

    fn attr_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some((_, quote @ ('"' | '\''))) => {
                self.pos += 1;
                let mut out = String::new();
                loop {
                    match self.peek() {
                        Some((_, c)) if c == quote => {
                            self.pos += 1;
                            return Ok(out);
                        }
                        Some((_, c)) => {
                            out.push(c);
                            self.pos += 1;
                        }
                        None => return Err(SelectorError::UnexpectedEnd),
                    }
                }
            }
            _ => self.ident(),
        }
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();

        match self.peek() {
            Some((_, '*')) => {
                self.pos += 1;
                compound.tag = Some("*".to_string());
            }
            Some((_, c)) if c.is_alphanumeric() => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some((_, '#')) => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                Some((_, '.')) => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some((_, '[')) => {
                    self.pos += 1;
                    self.skip_ws();
                    let name = self.ident()?.to_ascii_lowercase();
                    self.skip_ws();
                    let value = match self.peek() {
                        Some((_, '=')) => {
                            self.pos += 1;
                            self.skip_ws();
                            let v = self.attr_value()?;
                            self.skip_ws();
                            Some(v)
                        }
                        _ => None,
                    };
                    self.expect(']')?;
                    compound.attrs.push(AttrMatch { name, value });
                }
                Some((offset, ':')) => {
                    self.pos += 1;
                    let pseudo = self.ident()?;
                    if pseudo != "not" {
                        return Err(SelectorError::Unexpected { found: ':', offset });
                    }
                    self.expect('(')?;
                    self.skip_ws();
                    let inner = self.compound()?;
                    if inner.is_empty() {
                        return Err(match self.peek() {
                            Some((offset, found)) => SelectorError::Unexpected { found, offset },
                            None => SelectorError::UnexpectedEnd,
                        });
                    }
                    self.skip_ws();
                    self.expect(')')?;
                    compound.not.push(inner);
                }
                _ => return Ok(compound),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(tag: &str, id: Option<&str>, classes: &[&str], attrs: &[(&str, &str)]) -> NodeData {
        let mut n = NodeData::new(tag);
        if let Some(id) = id {
            n.attributes.insert("id".to_string(), id.to_string());
        }
        for c in classes {
            n.add_class(c);
        }
        for (k, v) in attrs {
            n.attributes.insert(k.to_string(), v.to_string());
        }
        n
    }

    #[test]
    fn test_id_and_class() {
        let navbar = node("nav", Some("navbar"), &["top"], &[]);
        assert!(Selector::parse("#navbar").unwrap().matches(&navbar));
        assert!(Selector::parse("nav.top").unwrap().matches(&navbar));
        assert!(!Selector::parse("div.top").unwrap().matches(&navbar));
        assert!(!Selector::parse(".top.active").unwrap().matches(&navbar));
    }

    #[test]
    fn test_attribute_presence_and_value() {
        let link = node("a", None, &["nav-link"], &[("href", "#about")]);
        assert!(Selector::parse(".nav-link[href=\"#about\"]")
            .unwrap()
            .matches(&link));
        assert!(!Selector::parse(".nav-link[href='#home']")
            .unwrap()
            .matches(&link));
        assert!(Selector::parse("a[href]").unwrap().matches(&link));

        let section = node("section", Some("about"), &[], &[]);
        assert!(Selector::parse("section[id]").unwrap().matches(&section));
    }

    #[test]
    fn test_not_pseudo_class() {
        let sel = Selector::parse(".project-card:not(.loading-placeholder)").unwrap();
        assert!(sel.matches(&node("div", None, &["project-card"], &[])));
        assert!(!sel.matches(&node(
            "div",
            None,
            &["project-card", "loading-placeholder"],
            &[]
        )));
    }

    #[test]
    fn test_selector_groups() {
        let sel = Selector::parse(".section-header, .about-text ,.contact-form").unwrap();
        assert!(sel.matches(&node("h2", None, &["section-header"], &[])));
        assert!(sel.matches(&node("form", None, &["contact-form"], &[])));
        assert!(!sel.matches(&node("p", None, &["timeline-item"], &[])));
    }

    #[test]
    fn test_rejects_malformed_selectors() {
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("a,"), Err(SelectorError::UnexpectedEnd));
        assert!(matches!(
            Selector::parse("nav a"),
            Err(SelectorError::Combinator { offset: 4 })
        ));
        assert!(Selector::parse("[href=\"#x").is_err());
        assert!(Selector::parse("a:hover").is_err());
    }
}
