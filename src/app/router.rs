//! Pathname routing with the History API.
//!
//! Navigation pushes a history entry and re-renders; back/forward fire
//! `popstate`, which re-renders from the new pathname. Unknown paths
//! land on the dashboard.

use wasm_bindgen::JsValue;

use crate::games::GameKind;

use super::dom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    /// OAuth redirect landing; carries `session_id` in the URL fragment
    AuthCallback,
    Dashboard,
    Exercise(GameKind),
    Leaderboard,
    Competitions,
    Profile,
}

impl Route {
    pub fn parse(pathname: &str) -> Route {
        let path = pathname.trim_end_matches('/');
        match path {
            "/login" => Route::Login,
            "/auth/callback" => Route::AuthCallback,
            "" | "/dashboard" => Route::Dashboard,
            "/leaderboard" => Route::Leaderboard,
            "/competitions" => Route::Competitions,
            "/profile" => Route::Profile,
            _ => match path.strip_prefix("/exercise/").and_then(GameKind::from_slug) {
                Some(kind) => Route::Exercise(kind),
                None => Route::Dashboard,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_owned(),
            Route::AuthCallback => "/auth/callback".to_owned(),
            Route::Dashboard => "/dashboard".to_owned(),
            Route::Exercise(kind) => format!("/exercise/{}", kind.slug()),
            Route::Leaderboard => "/leaderboard".to_owned(),
            Route::Competitions => "/competitions".to_owned(),
            Route::Profile => "/profile".to_owned(),
        }
    }
}

/// Route for the current location.
pub fn current() -> Route {
    let pathname = dom::window()
        .location()
        .pathname()
        .unwrap_or_else(|_| "/".to_owned());
    Route::parse(&pathname)
}

/// `session_id` from the URL fragment on the auth callback route.
pub fn session_id_from_fragment() -> Option<String> {
    let hash = dom::window().location().hash().ok()?;
    let query = hash.trim_start_matches('#');
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("session_id="))
        .map(str::to_owned)
}

/// Push a history entry for `route`. The caller re-renders.
pub fn push(route: Route) {
    if let Ok(history) = dom::window().history() {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&route.path()));
    }
}

/// Replace the current entry, used to scrub the auth callback fragment.
pub fn replace(route: Route) {
    if let Ok(history) = dom::window().history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&route.path()));
    }
}
