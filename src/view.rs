//! Toolkit-independent projections of [`ViewState`] for the three panes.

use crate::models::{Repository, User};
use crate::state::ViewState;

pub const SEARCHING_USERS: &str = "Searching for users...";
pub const LOADING_REPOSITORIES: &str = "Loading repositories...";
pub const NO_REPOSITORIES: &str = "No repositories found";
pub const NO_DESCRIPTION: &str = "No description provided";

/// Search form: a text buffer plus the caller's busy flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchControl {
    pub text: String,
    pub is_loading: bool,
}

impl SearchControl {
    pub const PLACEHOLDER: &'static str = "Enter username";

    pub fn new(text: impl Into<String>, is_loading: bool) -> Self {
        Self {
            text: text.into(),
            is_loading,
        }
    }

    /// The query to search for, if this submission should go through.
    pub fn submit(&self) -> Option<String> {
        if self.is_loading {
            return None;
        }
        let query = self.text.trim();
        (!query.is_empty()).then(|| query.to_string())
    }

    pub fn input_enabled(&self) -> bool {
        !self.is_loading
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_loading {
            "Searching..."
        } else {
            "Search"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub login: String,
    pub avatar_url: String,
    pub profile_url: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserListView {
    Loading,
    Hidden,
    Rows { heading: String, rows: Vec<UserRow> },
}

impl UserListView {
    pub fn new(
        query: &str,
        users: &[User],
        selected_user: Option<&str>,
        is_loading: bool,
    ) -> Self {
        if is_loading {
            return Self::Loading;
        }
        if users.is_empty() {
            return Self::Hidden;
        }

        let rows = users
            .iter()
            .map(|user| UserRow {
                login: user.login.clone(),
                avatar_url: user.avatar_url.clone(),
                profile_url: user.profile_url.clone(),
                selected: selected_user == Some(user.login.as_str()),
            })
            .collect();

        Self::Rows {
            heading: format!("Showing users for \"{query}\""),
            rows,
        }
    }

    pub fn from_state(state: &ViewState) -> Self {
        Self::new(
            state.users_query.as_deref().unwrap_or_default(),
            &state.users,
            state.selected_user.as_deref(),
            state.is_searching,
        )
    }

    /// Status line shown instead of rows, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(SEARCHING_USERS),
            Self::Hidden | Self::Rows { .. } => None,
        }
    }

    pub fn heading(&self) -> Option<&str> {
        match self {
            Self::Rows { heading, .. } => Some(heading),
            Self::Loading | Self::Hidden => None,
        }
    }

    pub fn rows(&self) -> &[UserRow] {
        match self {
            Self::Rows { rows, .. } => rows,
            Self::Loading | Self::Hidden => &[],
        }
    }

    /// Login to hand to the selection callback when row `index` is clicked.
    /// The shell decides whether this selects or toggles off.
    pub fn clicked(&self, index: usize) -> Option<&str> {
        self.rows().get(index).map(|row| row.login.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    pub name: String,
    pub url: String,
    pub stars: u64,
    pub description: String,
    pub language: Option<String>,
    /// Last update as `YYYY-MM-DD`.
    pub updated: String,
}

impl From<&Repository> for RepositoryEntry {
    fn from(repo: &Repository) -> Self {
        Self {
            name: repo.name.clone(),
            url: repo.url.clone(),
            stars: repo.star_count,
            description: repo
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            language: repo.language.clone(),
            updated: repo.updated_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    Loading,
    Empty,
    Entries(Vec<RepositoryEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPanel {
    pub title: String,
    pub content: PanelContent,
}

impl RepositoryPanel {
    /// Entries keep the order they were given in.
    pub fn new(username: &str, repositories: &[Repository], is_loading: bool) -> Self {
        let content = if is_loading {
            PanelContent::Loading
        } else if repositories.is_empty() {
            PanelContent::Empty
        } else {
            PanelContent::Entries(repositories.iter().map(RepositoryEntry::from).collect())
        };

        Self {
            title: format!("{username}'s Repositories"),
            content,
        }
    }

    /// Status line shown instead of entries, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self.content {
            PanelContent::Loading => Some(LOADING_REPOSITORIES),
            PanelContent::Empty => Some(NO_REPOSITORIES),
            PanelContent::Entries(_) => None,
        }
    }

    pub fn entries(&self) -> &[RepositoryEntry] {
        match &self.content {
            PanelContent::Entries(entries) => entries,
            PanelContent::Loading | PanelContent::Empty => &[],
        }
    }
}

/// The detail panel exists only while a user is selected.
pub fn repository_panel_for(state: &ViewState) -> Option<RepositoryPanel> {
    let username = state.selected_user.as_deref()?;
    Some(RepositoryPanel::new(
        username,
        &state.repositories,
        state.is_loading_repositories,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn user(login: &str) -> User {
        User {
            id: 1,
            login: login.to_string(),
            avatar_url: format!("https://avatars.example/{login}"),
            profile_url: format!("https://github.com/{login}"),
        }
    }

    fn repo(name: &str, description: Option<&str>) -> Repository {
        Repository {
            id: 1,
            name: name.to_string(),
            description: description.map(str::to_string),
            url: format!("https://github.com/octocat/{name}"),
            star_count: 42,
            created_at: Utc.with_ymd_and_hms(2011, 1, 26, 19, 1, 12).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2023, 1, 10, 8, 30, 0).unwrap(),
            language: Some("Rust".into()),
        }
    }

    #[test]
    fn submit_trims_query() {
        let control = SearchControl::new("  octocat \n", false);
        assert_eq!(control.submit().as_deref(), Some("octocat"));
        assert_eq!(control.button_label(), "Search");
        assert!(control.input_enabled());
    }

    #[test]
    fn blank_submission_is_suppressed() {
        assert_eq!(SearchControl::new("", false).submit(), None);
        assert_eq!(SearchControl::new(" \t ", false).submit(), None);
    }

    #[test]
    fn submission_is_disabled_while_loading() {
        let control = SearchControl::new("octocat", true);
        assert_eq!(control.submit(), None);
        assert!(!control.input_enabled());
        assert_eq!(control.button_label(), "Searching...");
    }

    #[test]
    fn user_list_marks_selected_row() {
        let users = [user("a"), user("b")];
        let view = UserListView::new("x", &users, Some("b"), false);

        let selected: Vec<_> = view.rows().iter().map(|r| r.selected).collect();
        assert_eq!(selected, [false, true]);
        assert_eq!(view.clicked(1), Some("b"));
        assert_eq!(view.clicked(0), Some("a"));
        assert_eq!(view.clicked(2), None);
    }

    #[test]
    fn user_list_loading_hides_rows() {
        let users = [user("a")];
        let view = UserListView::new("x", &users, None, true);
        assert_eq!(view, UserListView::Loading);
        assert_eq!(view.message(), Some(SEARCHING_USERS));
        assert_eq!(view.clicked(0), None);
        assert_eq!(view.heading(), None);
    }

    #[test]
    fn empty_user_list_is_hidden() {
        assert_eq!(UserListView::new("x", &[], None, false), UserListView::Hidden);
    }

    #[test]
    fn user_list_heading_names_query() {
        let state = ViewState {
            users: vec![user("octocat")],
            users_query: Some("octo".into()),
            ..Default::default()
        };
        let view = UserListView::from_state(&state);
        assert_eq!(view.heading(), Some(r#"Showing users for "octo""#));
        assert_eq!(view.message(), None);
    }

    #[test]
    fn panel_loading_ignores_repositories() {
        let panel = RepositoryPanel::new("octocat", &[repo("x", None)], true);
        assert_eq!(panel.content, PanelContent::Loading);
        assert_eq!(panel.message(), Some(LOADING_REPOSITORIES));
        assert_eq!(panel.title, "octocat's Repositories");
    }

    #[test]
    fn panel_empty_state() {
        let panel = RepositoryPanel::new("octocat", &[], false);
        assert_eq!(panel.message(), Some(NO_REPOSITORIES));
        assert!(panel.entries().is_empty());
    }

    #[test]
    fn panel_entries_keep_order_and_fill_description() {
        let repos = [repo("zeta", None), repo("alpha", Some("First"))];
        let panel = RepositoryPanel::new("octocat", &repos, false);

        let entries = panel.entries();
        assert_eq!(panel.message(), None);
        assert_eq!(entries[0].name, "zeta");
        assert_eq!(entries[0].description, NO_DESCRIPTION);
        assert_eq!(entries[1].name, "alpha");
        assert_eq!(entries[1].description, "First");
        assert_eq!(entries[1].stars, 42);
        assert_eq!(entries[1].updated, "2023-01-10");
        assert_eq!(entries[1].url, "https://github.com/octocat/alpha");
    }

    #[test]
    fn panel_requires_selection() {
        let mut state = ViewState {
            users: vec![user("octocat")],
            ..Default::default()
        };
        assert_eq!(repository_panel_for(&state), None);

        state.selected_user = Some("octocat".into());
        state.is_loading_repositories = true;
        let panel = repository_panel_for(&state).unwrap();
        assert_eq!(panel.content, PanelContent::Loading);
    }
}
