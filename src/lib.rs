//! Search GitHub users and browse the repositories of the one you pick.
//!
//! [`client`] talks to the REST API, [`shell::Shell`] owns the view state and
//! sequences requests, and [`view`] turns that state into what each pane shows.

pub mod client;
pub mod config;
pub mod models;
pub mod shell;
pub mod state;
pub mod view;

pub use client::{GitHubApi, GitHubClient};
pub use config::Config;
pub use models::{Repository, SearchUserResult, User};
pub use shell::{Shell, StateWatcher};
pub use state::ViewState;

/// Installs the global `tracing` subscriber, honouring `RUST_LOG`.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("github_repo_explorer=info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
