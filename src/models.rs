use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A user item from the Search Users API (`/search/users`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    #[serde(rename = "html_url")]
    pub profile_url: String,
}

/// Response from the GitHub Search Users API. `items` keeps the relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchUserResult {
    pub total_count: u64,
    #[serde(rename = "incomplete_results")]
    pub incomplete: bool,
    pub items: Vec<User>,
}

/// A repository from `/users/{username}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "html_url")]
    pub url: String,
    #[serde(rename = "stargazers_count")]
    pub star_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub language: Option<String>,
}
