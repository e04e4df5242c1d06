//! Sign-in page. Outside Telegram the only option is the hosted auth
//! redirect; inside Telegram the session resolves automatically from
//! init data before this page is ever shown.

use web_sys::Element;

use crate::app::dom;

const AUTH_PORTAL: &str = "https://auth.emergentagent.com/";

pub fn render(container: &Element) {
    let page = dom::make("div", "login-page");

    let card = dom::make("div", "login-card");

    let title = dom::make("h1", "login-title");
    title.set_text_content(Some("Тренажёр мозга"));
    let _ = card.append_child(&title);

    let blurb = dom::make("p", "login-blurb");
    blurb.set_text_content(Some(
        "Короткие игры на внимание, память и скорость реакции. Войдите, чтобы сохранять прогресс.",
    ));
    let _ = card.append_child(&blurb);

    let button = dom::make("button", "btn btn-primary login-btn");
    button.set_text_content(Some("Войти"));
    dom::on_click(&button, |_| {
        let origin = dom::window()
            .location()
            .origin()
            .unwrap_or_default();
        let callback = format!("{origin}/auth/callback");
        let url = format!(
            "{AUTH_PORTAL}?redirect={}",
            js_sys::encode_uri_component(&callback)
        );
        let _ = dom::window().location().set_href(&url);
    });
    let _ = card.append_child(&button);

    let _ = page.append_child(&card);
    let _ = container.append_child(&page);
}
