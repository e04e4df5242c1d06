//! Browser shell.
//!
//! Single-page app: one `#app` container, views built straight into the
//! DOM. Navigation re-renders from the pathname; tearing down a view
//! drops its timer and listener handles, so callbacks from a dead view
//! never fire.

pub mod dom;
pub mod router;
pub mod views;
pub mod widgets;

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::api::client::{self, ApiError};
use crate::api::{AuthResponse, SessionRequest, TelegramLoginRequest, User};
use crate::auth::AuthContext;

use router::Route;

pub struct App {
    pub auth: AuthContext,
    /// Live view's handles; replaced (and dropped) on navigation
    view: Option<Box<dyn Any>>,
}

pub type Shared = Rc<RefCell<App>>;

pub async fn run() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

    info!("Brain Gym starting...");

    let app: Shared = Rc::new(RefCell::new(App {
        auth: AuthContext::new(),
        view: None,
    }));

    // OAuth landing: exchange the fragment session id for a cookie
    // session before anything renders.
    if router::current() == Route::AuthCallback {
        if let Some(session_id) = router::session_id_from_fragment() {
            match client::post_json::<_, AuthResponse>(
                "/api/auth/session",
                &SessionRequest { session_id },
            )
            .await
            {
                Ok(resp) => app.borrow_mut().auth.set_authenticated(resp.user),
                Err(err) => warn!("session exchange failed: {err}"),
            }
        }
        router::replace(Route::Dashboard);
    }

    if app.borrow().auth.is_resolving() {
        resolve_session(&app).await;
    }

    // Back/forward re-render from the new pathname.
    {
        let app = app.clone();
        let closure = wasm_bindgen::closure::Closure::<dyn FnMut(web_sys::Event)>::new(
            move |_| render(&app, router::current()),
        );
        let _ = dom::window()
            .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Internal links carry `data-nav`; intercept them app-wide so
    // navigation never reloads the page.
    {
        let app = app.clone();
        let closure = wasm_bindgen::closure::Closure::<dyn FnMut(web_sys::Event)>::new(
            move |event: web_sys::Event| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                else {
                    return;
                };
                let Ok(Some(link)) = target.closest("a[data-nav]") else {
                    return;
                };
                event.prevent_default();
                if let Some(href) = link.get_attribute("href") {
                    navigate(&app, Route::parse(&href));
                }
            },
        );
        let _ = dom::document()
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    info!("app ready");
    render(&app, router::current());
}

/// Resolve the session: cookie first, Telegram init data second.
async fn resolve_session(app: &Shared) {
    match client::get_json::<User>("/api/auth/me").await {
        Ok(user) => {
            app.borrow_mut().auth.set_authenticated(user);
            return;
        }
        Err(ApiError::Http(401)) => {}
        Err(err) => warn!("session check failed: {err}"),
    }

    if let Some(init_data) = telegram_init_data() {
        match client::post_json::<_, AuthResponse>(
            "/api/auth/telegram",
            &TelegramLoginRequest { init_data },
        )
        .await
        {
            Ok(resp) => {
                app.borrow_mut().auth.set_authenticated(resp.user);
                return;
            }
            Err(err) => warn!("telegram auth failed: {err}"),
        }
    }

    app.borrow_mut().auth.set_unauthenticated();
}

/// `window.Telegram.WebApp.initData`, present when running inside the
/// Telegram in-app browser.
fn telegram_init_data() -> Option<String> {
    let window = dom::window();
    let telegram = js_sys::Reflect::get(&window, &"Telegram".into()).ok()?;
    let webapp = js_sys::Reflect::get(&telegram, &"WebApp".into()).ok()?;
    let init_data = js_sys::Reflect::get(&webapp, &"initData".into()).ok()?;
    init_data.as_string().filter(|s| !s.is_empty())
}

pub fn navigate(app: &Shared, route: Route) {
    router::push(route);
    render(app, route);
}

pub fn render(app: &Shared, route: Route) {
    // Tear down the previous view before touching the DOM: its timers
    // must be dead before their elements go away.
    app.borrow_mut().view = None;
    widgets::close_results_modal();

    let container = dom::by_id("app").expect("no #app container");
    container.set_inner_html("");

    if app.borrow().auth.is_resolving() {
        let loading = dom::make("p", "loading");
        loading.set_text_content(Some("Загрузка..."));
        let _ = container.append_child(&loading);
        return;
    }

    let authed = app.borrow().auth.is_authenticated();
    let route = match route {
        Route::Login | Route::AuthCallback if authed => Route::Dashboard,
        Route::Login | Route::AuthCallback => Route::Login,
        other if !authed => {
            info!("not signed in, redirecting from {:?}", other);
            Route::Login
        }
        other => other,
    };

    if route != Route::Login {
        let _ = container.append_child(&widgets::header(&app.borrow().auth));
        wire_logout(app);
    }

    let view: Option<Box<dyn Any>> = match route {
        Route::Login => {
            views::login::render(&container);
            None
        }
        Route::Dashboard => {
            views::dashboard::render(&container);
            None
        }
        Route::Leaderboard => {
            views::leaderboard::render(&container);
            None
        }
        Route::Competitions => {
            views::competitions::render(&container);
            None
        }
        Route::Profile => {
            views::profile::render(&container);
            None
        }
        Route::Exercise(kind) => Some(views::exercise::mount(&container, kind, app.clone())),
        Route::AuthCallback => None,
    };
    app.borrow_mut().view = view;
}

fn wire_logout(app: &Shared) {
    if let Some(btn) = dom::by_id("logout-btn") {
        let app = app.clone();
        dom::on_click(&btn, move |_| {
            // Local state drops regardless of the request's outcome.
            spawn_local(async {
                if let Err(err) = client::post_empty("/api/auth/logout").await {
                    warn!("logout request failed: {err}");
                }
            });
            app.borrow_mut().auth.clear();
            navigate(&app, Route::Login);
        });
    }
}
