#![windows_subsystem = "windows"]
slint::include_modules!();

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};

use github_repo_explorer::view::{repository_panel_for, SearchControl, UserListView};
use github_repo_explorer::{Config, GitHubClient, Shell, StateWatcher, User, ViewState};
use slint::{Rgba8Pixel, SharedPixelBuffer, VecModel};

const AVATAR_SIZE: u32 = 80;

/// Decoded avatars for the current result set, keyed by login.
type AvatarCache = Arc<Mutex<HashMap<String, SharedPixelBuffer<Rgba8Pixel>>>>;

fn main() -> anyhow::Result<()> {
    github_repo_explorer::init_logging();
    let config = Config::from_env()?;

    let client = GitHubClient::new(&config.api_base_url)?;
    let http_client = client.http().clone();
    let shell = Arc::new(Shell::new(Arc::new(client), config.search_limit));

    // Background tokio runtime for async HTTP
    let rt = Arc::new(tokio::runtime::Runtime::new()?);
    let avatars = AvatarCache::default();

    let app = AppWindow::new()?;
    app.set_search_placeholder(SearchControl::PLACEHOLDER.into());
    render(&app, &shell.snapshot(), &avatars);

    // =============================================
    //  STATE WATCHER: redraw on every change
    // =============================================
    {
        let app_weak = app.as_weak();
        let mut watcher = shell.subscribe();
        let avatars = avatars.clone();

        rt.spawn(async move {
            let mut shown_logins: Vec<String> = Vec::new();
            while watcher.changed().await.is_ok() {
                let state = watcher.borrow_and_update().clone();

                let logins: Vec<String> = state.users.iter().map(|u| u.login.clone()).collect();
                if logins != shown_logins {
                    shown_logins = logins;
                    refresh_avatars(
                        &state.users,
                        &http_client,
                        &avatars,
                        watcher.clone(),
                        app_weak.clone(),
                    );
                }

                redraw(&app_weak, state, &avatars);
            }
        });
    }

    // =============================================
    //  CALLBACK: search-requested
    // =============================================
    {
        let shell = shell.clone();
        let rt = rt.clone();

        app.on_search_requested(move |query| {
            let control = SearchControl::new(query.as_str(), shell.snapshot().is_searching);
            let Some(query) = control.submit() else {
                return;
            };

            let shell = shell.clone();
            rt.spawn(async move { shell.search(&query).await });
        });
    }

    // =============================================
    //  CALLBACK: user-selected
    // =============================================
    {
        let shell = shell.clone();
        let rt = rt.clone();

        app.on_user_selected(move |index| {
            let Ok(index) = usize::try_from(index) else {
                return;
            };
            let users = UserListView::from_state(&shell.snapshot());
            let Some(login) = users.clicked(index).map(str::to_string) else {
                return;
            };

            let shell = shell.clone();
            rt.spawn(async move { shell.select_user(&login).await });
        });
    }

    // =============================================
    //  CALLBACK: repo-clicked / profile-clicked
    // =============================================
    app.on_repo_clicked(|url| open_link(url.as_str()));

    {
        let shell = shell.clone();
        app.on_profile_clicked(move || {
            let state = shell.snapshot();
            if let Some(user) = state.selected() {
                open_link(&user.profile_url);
            }
        });
    }

    // Run the Slint event loop
    app.run()?;

    Ok(())
}

/// Opens `url` in the system browser, which runs as its own process.
fn open_link(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(url, error = %e, "failed to open link");
    }
}

fn redraw(app_weak: &slint::Weak<AppWindow>, state: ViewState, avatars: &AvatarCache) {
    let app_weak = app_weak.clone();
    let avatars = avatars.clone();
    let result = slint::invoke_from_event_loop(move || {
        if let Some(app) = app_weak.upgrade() {
            render(&app, &state, &avatars);
        }
    });
    if let Err(e) = result {
        tracing::debug!(error = %e, "event loop gone, skipping redraw");
    }
}

/// Pushes one `ViewState` snapshot into the window.
fn render(app: &AppWindow, state: &ViewState, avatars: &AvatarCache) {
    let search = SearchControl::new(app.get_search_query().as_str(), state.is_searching);
    app.set_is_searching(!search.input_enabled());
    app.set_search_button_label(search.button_label().into());
    app.set_error_message(state.error.clone().unwrap_or_default().into());

    let users = UserListView::from_state(state);
    app.set_users_message(users.message().unwrap_or_default().into());
    app.set_users_heading(users.heading().unwrap_or_default().into());
    let items: Vec<UserItem> = {
        let cache = avatars.lock().unwrap_or_else(PoisonError::into_inner);
        users
            .rows()
            .iter()
            .map(|row| UserItem {
                login: row.login.as_str().into(),
                avatar: cache
                    .get(&row.login)
                    .map(|pixels| slint::Image::from_rgba8(pixels.clone()))
                    .unwrap_or_default(),
                selected: row.selected,
            })
            .collect()
    };
    app.set_user_list(Rc::new(VecModel::from(items)).into());

    let Some(panel) = repository_panel_for(state) else {
        app.set_panel_visible(false);
        app.set_repo_list(Rc::new(VecModel::<RepoItem>::default()).into());
        return;
    };

    let repos: Vec<RepoItem> = panel
        .entries()
        .iter()
        .map(|entry| RepoItem {
            name: entry.name.as_str().into(),
            description: entry.description.as_str().into(),
            language: entry.language.clone().unwrap_or_default().into(),
            stars: entry.stars.to_string().into(),
            updated: entry.updated.as_str().into(),
            url: entry.url.as_str().into(),
        })
        .collect();

    app.set_panel_visible(true);
    app.set_panel_title(panel.title.as_str().into());
    app.set_panel_message(panel.message().unwrap_or_default().into());
    app.set_repo_list(Rc::new(VecModel::from(repos)).into());
}

/// Drops avatars of logins no longer shown and downloads the missing ones in
/// parallel, then redraws with whatever state is current by then.
fn refresh_avatars(
    users: &[User],
    http_client: &reqwest::Client,
    avatars: &AvatarCache,
    watcher: StateWatcher,
    app_weak: slint::Weak<AppWindow>,
) {
    let missing: Vec<(String, String)> = {
        let mut cache = avatars.lock().unwrap_or_else(PoisonError::into_inner);
        cache.retain(|login, _| users.iter().any(|u| &u.login == login));
        users
            .iter()
            .filter(|u| !cache.contains_key(&u.login))
            .map(|u| (u.login.clone(), u.avatar_url.clone()))
            .collect()
    };
    if missing.is_empty() {
        return;
    }

    let http_client = http_client.clone();
    let avatars = avatars.clone();
    tokio::spawn(async move {
        let mut handles = Vec::new();
        for (login, url) in missing {
            let client = http_client.clone();
            handles.push(tokio::spawn(async move {
                let pixels = download_avatar_pixels(&client, url, AVATAR_SIZE).await;
                (login, pixels)
            }));
        }

        for handle in handles {
            let Ok((login, Some((pixels, w, h)))) = handle.await else {
                continue;
            };
            let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(&pixels, w, h);
            avatars
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(login, buffer);
        }

        let state = watcher.borrow().clone();
        redraw(&app_weak, state, &avatars);
    });
}

/// Downloads avatar image bytes and decodes them into raw RGBA pixels.
async fn download_avatar_pixels(
    client: &reqwest::Client,
    url: String,
    size: u32,
) -> Option<(Vec<u8>, u32, u32)> {
    let sized_url = if url.contains('?') {
        format!("{url}&s={size}")
    } else {
        format!("{url}?s={size}")
    };

    let response = client.get(&sized_url).send().await.ok()?;
    let bytes = response.error_for_status().ok()?.bytes().await.ok()?;
    let decoded = image::load_from_memory(&bytes).ok()?;

    // GitHub sometimes ignores `s` and serves the full-size image.
    let rgba = decoded.thumbnail_exact(size, size).to_rgba8();
    let (w, h) = rgba.dimensions();

    Some((rgba.into_raw(), w, h))
}
