use crate::models::{Repository, User};

pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search users. Please try again later.";

pub fn no_users_message(query: &str) -> String {
    format!("No users found matching \"{query}\"")
}

pub fn repositories_failed_message(login: &str) -> String {
    format!("Failed to fetch repositories for {login}. Please try again later.")
}

/// Everything the views need to draw one frame.
///
/// Only [`crate::shell::Shell`] writes to it. `repositories` always belongs to
/// `selected_user`, and `selected_user` is always a login from `users`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub users: Vec<User>,
    /// Query that produced `users`.
    pub users_query: Option<String>,
    pub repositories: Vec<Repository>,
    pub selected_user: Option<String>,
    pub is_searching: bool,
    pub is_loading_repositories: bool,
    pub error: Option<String>,
}

impl ViewState {
    pub fn selected(&self) -> Option<&User> {
        let login = self.selected_user.as_deref()?;
        self.users.iter().find(|user| user.login == login)
    }

    pub fn is_selected(&self, login: &str) -> bool {
        self.selected_user.as_deref() == Some(login)
    }
}
