//! Remote repository source settings

use serde::Deserialize;

/// GitHub repository listing parameters
///
/// Only consulted when the remote project source is explicitly requested;
/// the page renders the bundled catalog by default.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub username: String,
    pub base_url: String,
    /// `per_page` sent to the listing endpoint
    pub max_repos: usize,
    /// How many repositories become project records
    pub display_limit: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            username: "JSerranom04".to_string(),
            base_url: "https://api.github.com".to_string(),
            max_repos: 20,
            display_limit: 13,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileGithub {
    pub username: Option<String>,
    pub base_url: Option<String>,
    pub max_repos: Option<usize>,
    pub display_limit: Option<usize>,
}

impl GithubConfig {
    pub fn from_file(file: Option<FileGithub>, env_user: Option<String>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            username: env_user.or(file.username).unwrap_or(defaults.username),
            base_url: file
                .base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            max_repos: file.max_repos.unwrap_or(defaults.max_repos),
            display_limit: file.display_limit.unwrap_or(defaults.display_limit),
        }
    }

    /// Listing endpoint: `{base}/users/{name}/repos?sort=updated&per_page={n}`
    pub fn repos_url(&self) -> String {
        format!(
            "{}/users/{}/repos?sort=updated&per_page={}",
            self.base_url, self.username, self.max_repos
        )
    }
}
