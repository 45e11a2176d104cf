use super::query::to_search_query;
use crate::capabilities::{RepositoryOwner, RepositorySearch, RepositorySummary, SearchResult};
use crate::config::ConfigProvider;
use crate::error::{CapabilityError, CapabilityResult};
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("gitpilot/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// GitHub REST API client for repository search, details and README.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    config: Arc<dyn ConfigProvider>,
}

#[derive(Deserialize)]
struct SearchResponse {
    total_count: u64,
    #[serde(default)]
    items: Vec<RepoItem>,
}

#[derive(Deserialize)]
struct RepoItem {
    id: u64,
    name: String,
    full_name: String,
    description: Option<String>,
    html_url: String,
    clone_url: String,
    #[serde(default)]
    ssh_url: Option<String>,
    stargazers_count: u64,
    forks_count: u64,
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    pushed_at: Option<String>,
    owner: Option<OwnerItem>,
}

#[derive(Deserialize)]
struct OwnerItem {
    login: String,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[derive(Deserialize)]
struct ReadmeItem {
    content: String,
}

impl From<RepoItem> for RepositorySummary {
    fn from(item: RepoItem) -> Self {
        let updated_at = item.updated_at.unwrap_or_default();
        Self {
            id: item.id,
            name: item.name,
            full_name: item.full_name,
            description: item.description.filter(|d| !d.is_empty()),
            html_url: item.html_url,
            clone_url: item.clone_url,
            ssh_url: item.ssh_url.unwrap_or_default(),
            stars: item.stargazers_count,
            forks: item.forks_count,
            language: item.language,
            topics: item.topics,
            created_at: item.created_at.unwrap_or_default(),
            pushed_at: item.pushed_at.unwrap_or_else(|| updated_at.clone()),
            updated_at,
            owner: match item.owner {
                Some(owner) => RepositoryOwner {
                    login: owner.login,
                    avatar_url: owner.avatar_url.unwrap_or_default(),
                },
                None => RepositoryOwner {
                    login: "unknown".to_string(),
                    avatar_url: String::new(),
                },
            },
        }
    }
}

impl GitHubClient {
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let settings = self.config.settings();
        let url = format!("{}{}", settings.github_api_url.trim_end_matches('/'), path);
        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        match settings.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Searches repositories by stars, rewriting natural language first.
    pub async fn search_repositories(&self, natural_query: &str) -> CapabilityResult<SearchResult> {
        let query = to_search_query(natural_query);
        let per_page = self.config.settings().max_search_results.clamp(1, 100).to_string();
        debug!("GitHub search q={:?} per_page={}", query, per_page);

        let response = self
            .get("/search/repositories")
            .query(&[
                ("q", query.as_str()),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;
        let body: SearchResponse = check(response, &query).await?.json().await?;

        Ok(SearchResult {
            repositories: body.items.into_iter().map(RepositorySummary::from).collect(),
            total_count: body.total_count,
            query,
        })
    }

    pub async fn repository_details(&self, owner: &str, repo: &str) -> CapabilityResult<RepositorySummary> {
        let what = format!("{}/{}", owner, repo);
        let response = self.get(&format!("/repos/{}", what)).send().await?;
        let item: RepoItem = check(response, &what).await?.json().await?;
        Ok(item.into())
    }

    /// Decoded README text, or `None` when the repository has none.
    pub async fn repository_readme(&self, owner: &str, repo: &str) -> CapabilityResult<Option<String>> {
        let what = format!("{}/{}", owner, repo);
        let response = self.get(&format!("/repos/{}/readme", what)).send().await?;
        let item: ReadmeItem = match check(response, &what).await {
            Ok(response) => response.json().await?,
            Err(CapabilityError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        decode_readme(&item.content).map(Some)
    }
}

#[async_trait]
impl RepositorySearch for GitHubClient {
    async fn search(&self, query: &str) -> CapabilityResult<SearchResult> {
        self.search_repositories(query).await
    }
}

async fn check(response: Response, what: &str) -> CapabilityResult<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(CapabilityError::RateLimited),
        StatusCode::NOT_FOUND => Err(CapabilityError::NotFound(what.to_string())),
        StatusCode::UNAUTHORIZED => Err(CapabilityError::Unauthenticated("GitHub rejected the token".to_string())),
        status => {
            let body = response.text().await.unwrap_or_default();
            Err(CapabilityError::Api(format!("GitHub returned {}: {}", status, body.trim())))
        }
    }
}

/// GitHub wraps base64 content at 60 columns.
pub fn decode_readme(content: &str) -> CapabilityResult<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| CapabilityError::Parse(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wrapped_readme() {
        assert_eq!(decode_readme("IyBIZWxs\nbyB3b3Js\nZA==\n").unwrap(), "# Hello world");
        assert!(decode_readme("not base64!").is_err());
    }

    #[test]
    fn test_item_mapping_defaults() {
        let item: RepoItem = serde_json::from_str(
            r#"{
                "id": 7, "name": "one", "full_name": "a/one", "description": "",
                "html_url": "https://github.com/a/one", "clone_url": "https://github.com/a/one.git",
                "stargazers_count": 42, "forks_count": 3, "language": "Rust",
                "updated_at": "2024-01-02T00:00:00Z", "owner": null
            }"#,
        )
        .unwrap();
        let repo = RepositorySummary::from(item);
        assert_eq!(repo.stars, 42);
        assert_eq!(repo.description, None);
        assert_eq!(repo.pushed_at, "2024-01-02T00:00:00Z");
        assert_eq!(repo.owner.login, "unknown");
        assert!(repo.topics.is_empty());
    }
}
