#![allow(dead_code)]

use github_repo_explorer::GitHubClient;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Client for a local responder, ignoring any proxy set in the environment.
pub fn client(base_url: &str) -> GitHubClient {
    GitHubClient::with_builder(base_url, reqwest::Client::builder().no_proxy()).unwrap()
}

/// A canned HTTP response.
pub struct Reply {
    pub status: &'static str,
    pub body: String,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: "200 OK",
            body: body.into(),
        }
    }

    pub fn status(status: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Serves `replies` one connection at a time on a local port.
///
/// Returns the base URL and a handle yielding the raw request heads, in the
/// order they arrived.
pub async fn serve(replies: Vec<Reply>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut heads = Vec::new();
        for reply in replies {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.status,
                reply.body.len(),
                reply.body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            heads.push(String::from_utf8_lossy(&request).into_owned());
        }
        heads
    });

    (base_url, handle)
}

pub fn search_body(logins: &[&str]) -> String {
    let items: Vec<String> = logins
        .iter()
        .enumerate()
        .map(|(i, login)| {
            format!(
                r#"{{"id": {id}, "login": "{login}", "avatar_url": "https://avatars.githubusercontent.com/u/{id}", "html_url": "https://github.com/{login}", "type": "User", "score": 1.0}}"#,
                id = i + 1
            )
        })
        .collect();
    format!(
        r#"{{"total_count": {}, "incomplete_results": false, "items": [{}]}}"#,
        logins.len(),
        items.join(",")
    )
}

pub fn repos_body(repos: &[(&str, u64)]) -> String {
    let items: Vec<String> = repos
        .iter()
        .enumerate()
        .map(|(i, (name, stars))| {
            format!(
                r#"{{"id": {id}, "name": "{name}", "description": null, "html_url": "https://github.com/octocat/{name}", "stargazers_count": {stars}, "created_at": "2011-01-26T19:01:12Z", "updated_at": "2023-01-10T00:00:00Z", "language": "Ruby"}}"#,
                id = i + 1
            )
        })
        .collect();
    format!("[{}]", items.join(","))
}
