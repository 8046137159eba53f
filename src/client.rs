use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::models::{Repository, SearchUserResult};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;
/// Largest page size the GitHub REST API accepts.
pub const MAX_PER_PAGE: u32 = 100;
pub const REPOSITORIES_PER_PAGE: u32 = MAX_PER_PAGE;

const USER_AGENT: &str = "github-repo-explorer";
const ACCEPT: &str = "application/vnd.github.v3+json";

/// Read operations the application shell needs from GitHub.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn search_users(&self, query: &str, limit: u32) -> Result<SearchUserResult>;

    async fn get_user_repositories(&self, username: &str) -> Result<Vec<Repository>>;
}

/// Creates a preconfigured HTTP client with required headers.
fn build_client(builder: ClientBuilder) -> Result<Client> {
    use reqwest::header::{HeaderMap, HeaderValue};

    let mut headers = HeaderMap::new();
    headers.insert("User-Agent", HeaderValue::from_static(USER_AGENT));
    headers.insert("Accept", HeaderValue::from_static(ACCEPT));

    builder
        .default_headers(headers)
        .build()
        .context("Failed to build HTTP client")
}

/// Thin wrapper over the GitHub REST API. Every call is exactly one request.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: Url,
}

impl GitHubClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_builder(base_url, Client::builder())
    }

    /// Like [`GitHubClient::new`], on top of a caller-tuned `reqwest` builder.
    pub fn with_builder(base_url: &str, builder: ClientBuilder) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API base URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL must be an http(s) URL: {base_url}");
        }

        Ok(Self {
            http: build_client(builder)?,
            base_url,
        })
    }

    /// Shared HTTP client, also used for avatar downloads.
    pub fn http(&self) -> &Client {
        &self.http
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn search_users_inner(&self, query: &str, limit: u32) -> Result<SearchUserResult> {
        let url = self.endpoint(&["search", "users"]);
        tracing::debug!(%url, query, limit, "searching users");

        let response = self
            .http
            .get(url)
            .query(&[
                ("q", format!("{query} in:login")),
                ("per_page", limit.to_string()),
            ])
            .send()
            .await
            .context("Failed to send search request")?;

        decode(response, "GitHub Search API").await
    }

    async fn get_user_repositories_inner(&self, username: &str) -> Result<Vec<Repository>> {
        let url = self.endpoint(&["users", username, "repos"]);
        tracing::debug!(%url, username, "fetching repositories");

        let response = self
            .http
            .get(url)
            .query(&[
                ("sort", "updated".to_string()),
                ("direction", "desc".to_string()),
                ("per_page", REPOSITORIES_PER_PAGE.to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send repository request for {username}"))?;

        decode(response, "GitHub Repositories API").await
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    /// Searches GitHub users whose login matches `query`.
    /// Returns at most `limit` results in relevance order.
    async fn search_users(&self, query: &str, limit: u32) -> Result<SearchUserResult> {
        self.search_users_inner(query, limit)
            .await
            .inspect_err(|e| tracing::error!(error = %format!("{e:#}"), "Error searching users"))
    }

    /// Fetches the first page of a user's repositories, most recently updated first.
    async fn get_user_repositories(&self, username: &str) -> Result<Vec<Repository>> {
        self.get_user_repositories_inner(username)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    username,
                    error = %format!("{e:#}"),
                    "Error fetching user repositories"
                )
            })
    }
}

async fn decode<T: DeserializeOwned>(response: Response, api: &str) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("{api} error ({status}): {body}");
    }

    response
        .json::<T>()
        .await
        .with_context(|| format!("Failed to deserialize {api} response"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_segments_to_base() {
        let client = GitHubClient::new(DEFAULT_API_URL).unwrap();
        let url = client.endpoint(&["users", "octocat", "repos"]);
        assert_eq!(url.as_str(), "https://api.github.com/users/octocat/repos");
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client = GitHubClient::new("http://localhost:8080/api/v3/").unwrap();
        let url = client.endpoint(&["search", "users"]);
        assert_eq!(url.as_str(), "http://localhost:8080/api/v3/search/users");
    }

    #[test]
    fn endpoint_encodes_username_as_one_segment() {
        let client = GitHubClient::new(DEFAULT_API_URL).unwrap();
        let url = client.endpoint(&["users", "a/b c", "repos"]);
        assert_eq!(url.as_str(), "https://api.github.com/users/a%2Fb%20c/repos");
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(GitHubClient::new("not a url").is_err());
        assert!(GitHubClient::new("mailto:someone@example.com").is_err());
    }
}
