//! Application shell: the only writer of [`ViewState`].
//!
//! Two events drive it, [`Shell::search`] and [`Shell::select_user`]. Each
//! state change is published on a `watch` channel so that views redraw from a
//! fresh snapshot. Responses that arrive after a newer request of the same
//! kind was issued are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::client::GitHubApi;
use crate::state::{
    no_users_message, repositories_failed_message, ViewState, SEARCH_FAILED_MESSAGE,
};

/// Receiver that yields on every state change.
pub type StateWatcher = watch::Receiver<ViewState>;

pub struct Shell {
    api: Arc<dyn GitHubApi>,
    search_limit: u32,
    state: watch::Sender<ViewState>,
    search_generation: AtomicU64,
    repositories_generation: AtomicU64,
}

impl Shell {
    pub fn new(api: Arc<dyn GitHubApi>, search_limit: u32) -> Self {
        let (state, _rx) = watch::channel(ViewState::default());
        Self {
            api,
            search_limit,
            state,
            search_generation: AtomicU64::new(0),
            repositories_generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> StateWatcher {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Searches users by login. An empty query is ignored.
    ///
    /// Starting a search drops the current selection, its repositories and any
    /// repository fetch still in flight.
    pub async fn search(&self, query: &str) {
        if query.is_empty() {
            return;
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.repositories_generation.fetch_add(1, Ordering::SeqCst);

            state.error = None;
            state.is_searching = true;
            state.selected_user = None;
            state.repositories.clear();
            state.is_loading_repositories = false;
        });

        let result = self.api.search_users(query, self.search_limit).await;

        self.state.send_if_modified(|state| {
            if self.search_generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(query, "discarding stale search response");
                return false;
            }

            match result {
                Ok(found) => {
                    if found.items.is_empty() {
                        state.error = Some(no_users_message(query));
                    }
                    state.users = found.items;
                    state.users_query = Some(query.to_string());
                }
                Err(_) => {
                    state.error = Some(SEARCH_FAILED_MESSAGE.to_string());
                }
            }
            state.is_searching = false;
            true
        });
    }

    /// Selects `login` and loads its repositories, or clears the selection
    /// when `login` is already selected.
    ///
    /// Ignored while a search is in flight: `users` still holds the previous
    /// result set until it lands.
    pub async fn select_user(&self, login: &str) {
        let mut generation = None;
        self.state.send_if_modified(|state| {
            if state.is_searching {
                tracing::debug!(login, "ignoring selection while a search is in flight");
                return false;
            }

            if state.is_selected(login) {
                self.repositories_generation.fetch_add(1, Ordering::SeqCst);
                state.selected_user = None;
                state.repositories.clear();
                state.is_loading_repositories = false;
                return true;
            }

            if !state.users.iter().any(|user| user.login == login) {
                tracing::warn!(login, "ignoring selection of a user outside the result set");
                return false;
            }

            generation = Some(self.repositories_generation.fetch_add(1, Ordering::SeqCst) + 1);
            state.selected_user = Some(login.to_string());
            state.repositories.clear();
            state.error = None;
            state.is_loading_repositories = true;
            true
        });

        let Some(generation) = generation else {
            return;
        };

        let result = self.api.get_user_repositories(login).await;

        self.state.send_if_modified(|state| {
            if self.repositories_generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(login, "discarding stale repository response");
                return false;
            }

            match result {
                Ok(repositories) => state.repositories = repositories,
                Err(_) => {
                    state.error = Some(repositories_failed_message(login));
                }
            }
            state.is_loading_repositories = false;
            true
        });
    }
}
