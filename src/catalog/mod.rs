//! Project records and where they come from
//!
//! The page renders the bundled catalog. The remote repository listing in
//! [`github`] produces the same record type but is only consulted when a
//! caller asks for it explicitly.

mod bundled;
pub mod github;

use crate::util::slugify_tag;
use serde::{Deserialize, Serialize};

/// Filter value that matches every project
pub const FILTER_ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLinks {
    /// Source repository
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub links: ProjectLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProjectRecord {
    /// Slugged tags, space separated, as stored in `data-tags`
    pub fn data_tags(&self) -> String {
        self.tags
            .iter()
            .map(|t| slugify_tag(t))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn matches_filter(&self, filter: &str) -> bool {
        tags_match(&self.data_tags(), filter)
    }
}

/// Whether a `data-tags` value passes `filter`: whole-token membership, or "all"
pub fn tags_match(data_tags: &str, filter: &str) -> bool {
    filter == FILTER_ALL || data_tags.split_whitespace().any(|tag| tag == filter)
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    project: Vec<ProjectRecord>,
}

/// Parse a catalog document (`[[project]]` tables)
pub fn parse(contents: &str) -> Result<Vec<ProjectRecord>, toml::de::Error> {
    toml::from_str::<CatalogFile>(contents).map(|file| file.project)
}

/// The catalog compiled into the binary
pub fn bundled() -> Result<Vec<ProjectRecord>, toml::de::Error> {
    parse(bundled::CATALOG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_parses() {
        let projects = bundled().unwrap();
        assert_eq!(projects.len(), 13);
        assert_eq!(projects[0].name, "Gaussian Processes");
        assert!(projects.iter().all(|p| p.links.demo.is_none()));
        assert!(projects.iter().all(|p| !p.tags.is_empty()));
    }

    #[test]
    fn test_data_tags_are_slugs() {
        let projects = bundled().unwrap();
        assert_eq!(projects[0].data_tags(), "ai-ml");
        let raft = projects.iter().find(|p| p.name.starts_with("Raft")).unwrap();
        assert_eq!(raft.data_tags(), "distributed-systems");
    }

    #[test]
    fn test_filter_uses_whole_tokens() {
        assert!(tags_match("ai-ml web", "web"));
        assert!(tags_match("ai-ml", FILTER_ALL));
        // A substring is not a tag
        assert!(!tags_match("web-design", "web"));
        assert!(!tags_match("", "web"));
    }

    #[test]
    fn test_filter_counts_over_bundled_catalog() {
        let projects = bundled().unwrap();
        let count = |filter: &str| projects.iter().filter(|p| p.matches_filter(filter)).count();
        assert_eq!(count("ai-ml"), 4);
        assert_eq!(count("algorithms"), 4);
        assert_eq!(count("distributed-systems"), 2);
        assert_eq!(count("web"), 1);
        assert_eq!(count(FILTER_ALL), 13);
    }
}
