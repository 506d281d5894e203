//! Remote repository listing
//!
//! An alternate project source built on the public repository API. Nothing
//! on the page calls it; `folio projects --remote` is the only entry point.

use super::{ProjectLinks, ProjectRecord};
use crate::config::{GithubConfig, VERSION};
use serde::Deserialize;
use thiserror::Error;

/// Description used when a repository has none
pub const DEFAULT_DESCRIPTION: &str =
    "An interesting project developed with best practices and modern technologies.";

/// Tech stack entries kept per project
const MAX_TECH_STACK: usize = 4;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("repository listing returned HTTP {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode repository listing: {0}")]
    Decode(#[source] reqwest::Error),
}

/// One repository as returned by the listing endpoint
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Repo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub fork: bool,
    pub html_url: String,
}

impl Repo {
    fn topics(&self) -> &[String] {
        self.topics.as_deref().unwrap_or_default()
    }

    fn has_topic(&self, topic: &str) -> bool {
        self.topics().iter().any(|t| t == topic)
    }

    /// Primary category (first match wins) plus `opensource` when applicable
    pub fn categories(&self) -> Vec<String> {
        let language = self.language.as_deref().map(str::to_lowercase);
        let language = language.as_deref().unwrap_or_default();
        let mut categories = Vec::new();

        if self.has_topic("mobile") || matches!(language, "swift" | "kotlin") {
            categories.push("mobile");
        } else if self.has_topic("backend") || matches!(language, "python" | "java" | "go") {
            categories.push("backend");
        } else if self.has_topic("web") || matches!(language, "javascript" | "typescript" | "html")
        {
            categories.push("web");
        }

        if self.has_topic("opensource") || self.fork {
            categories.push("opensource");
        }

        if categories.is_empty() {
            categories.push("web");
        }
        categories.into_iter().map(String::from).collect()
    }

    /// Language (or JavaScript when unknown) followed by topics
    pub fn tech_stack(&self) -> Vec<String> {
        let language = self.language.clone().unwrap_or_else(|| "JavaScript".to_string());
        std::iter::once(language)
            .chain(self.topics().iter().cloned())
            .take(MAX_TECH_STACK)
            .collect()
    }
}

/// Turn the first `limit` repositories into project records
pub fn process_repos(repos: &[Repo], limit: usize) -> Vec<ProjectRecord> {
    repos
        .iter()
        .take(limit)
        .map(|repo| ProjectRecord {
            name: repo.name.clone(),
            description: repo
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            tags: repo.categories(),
            tech_stack: repo.tech_stack(),
            links: ProjectLinks {
                code: repo.html_url.clone(),
                demo: repo.homepage.clone().filter(|h| !h.is_empty()),
            },
            image: None,
        })
        .collect()
}

/// Client for the repository listing endpoint
#[derive(Debug, Clone)]
pub struct GithubSource {
    client: reqwest::Client,
    config: GithubConfig,
}

impl GithubSource {
    pub fn new(config: GithubConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("folio/{VERSION}"))
            .build()?;
        Ok(Self { client, config })
    }

    /// Most recently updated repositories, up to `max_repos`
    pub async fn fetch_repos(&self) -> Result<Vec<Repo>, FetchError> {
        let url = self.config.repos_url();
        tracing::debug!(%url, "fetching repository listing");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "repository listing request failed");
            return Err(FetchError::Status(status.as_u16()));
        }

        response.json::<Vec<Repo>>().await.map_err(FetchError::Decode)
    }

    /// Fetch and process into display records
    pub async fn fetch_projects(&self) -> Result<Vec<ProjectRecord>, FetchError> {
        let repos = self.fetch_repos().await?;
        Ok(process_repos(&repos, self.config.display_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo(name: &str, language: Option<&str>, topics: &[&str], fork: bool) -> Repo {
        Repo {
            name: name.to_string(),
            description: None,
            language: language.map(String::from),
            topics: Some(topics.iter().map(|t| t.to_string()).collect()),
            homepage: None,
            fork,
            html_url: format!("https://example.com/{name}"),
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(repo("a", Some("Swift"), &[], false).categories(), vec!["mobile"]);
        assert_eq!(repo("b", Some("Go"), &[], true).categories(), vec!["backend", "opensource"]);
        assert_eq!(repo("c", Some("Rust"), &["web"], false).categories(), vec!["web"]);
        assert_eq!(repo("d", Some("Rust"), &[], false).categories(), vec!["web"]);
        assert_eq!(
            repo("e", None, &["opensource"], false).categories(),
            vec!["opensource"]
        );
    }

    #[test]
    fn test_tech_stack_capped() {
        let r = repo("a", None, &["wasm", "cli", "tokio", "serde"], false);
        assert_eq!(r.tech_stack(), vec!["JavaScript", "wasm", "cli", "tokio"]);
    }

    #[test]
    fn test_process_repos_applies_limit_and_defaults() {
        let repos: Vec<Repo> = (0..5).map(|i| repo(&format!("r{i}"), Some("Go"), &[], false)).collect();
        let projects = process_repos(&repos, 3);
        assert_eq!(projects.len(), 3);
        assert_eq!(projects[0].description, DEFAULT_DESCRIPTION);
        assert_eq!(projects[0].links.code, "https://example.com/r0");
        assert_eq!(projects[0].links.demo, None);
    }

    fn config_for(server: &MockServer) -> GithubConfig {
        GithubConfig {
            username: "octo".to_string(),
            base_url: server.uri(),
            max_repos: 20,
            display_limit: 13,
        }
    }

    #[tokio::test]
    async fn test_fetch_projects() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            {
                "name": "folio",
                "description": "Portfolio page",
                "language": "Rust",
                "topics": ["web"],
                "homepage": "https://folio.example",
                "fork": false,
                "html_url": "https://example.com/folio"
            },
            { "name": "bare", "html_url": "https://example.com/bare" }
        ]);

        Mock::given(method("GET"))
            .and(path("/users/octo/repos"))
            .and(query_param("sort", "updated"))
            .and(query_param("per_page", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let source = GithubSource::new(config_for(&server)).unwrap();
        let projects = source.fetch_projects().await.unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].tags, vec!["web"]);
        assert_eq!(projects[0].tech_stack, vec!["Rust", "web"]);
        assert_eq!(projects[0].links.demo.as_deref(), Some("https://folio.example"));
        assert_eq!(projects[1].description, DEFAULT_DESCRIPTION);
        assert_eq!(projects[1].tech_stack, vec!["JavaScript"]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_distinguishable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let source = GithubSource::new(config_for(&server)).unwrap();
        let err = source.fetch_repos().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(403)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let source = GithubSource::new(config_for(&server)).unwrap();
        let err = source.fetch_repos().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
