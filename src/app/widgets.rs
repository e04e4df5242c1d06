//! Shared view widgets: header, difficulty selector, results modal.

use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::auth::AuthContext;
use crate::games::GameKind;
use crate::tuning::Difficulty;

use super::dom;

/// Top navigation bar with the signed-in user and logout.
pub fn header(auth: &AuthContext) -> Element {
    let bar = dom::make("header", "app-header");

    let brand = dom::make("div", "brand");
    brand.set_text_content(Some("Тренажёр мозга"));
    let _ = bar.append_child(&brand);

    let nav = dom::make("nav", "nav-links");
    for (label, path) in [
        ("Упражнения", "/dashboard"),
        ("Рейтинг", "/leaderboard"),
        ("Соревнования", "/competitions"),
        ("Профиль", "/profile"),
    ] {
        let link = dom::make("a", "nav-link");
        let _ = link.set_attribute("href", path);
        let _ = link.set_attribute("data-nav", "");
        link.set_text_content(Some(label));
        let _ = nav.append_child(&link);
    }
    let _ = bar.append_child(&nav);

    if let Some(user) = auth.user() {
        let who = dom::make("div", "user-chip");
        who.set_text_content(Some(&user.name));
        let _ = bar.append_child(&who);

        let logout = dom::make("button", "logout-btn");
        let _ = logout.set_attribute("id", "logout-btn");
        logout.set_text_content(Some("Выйти"));
        let _ = bar.append_child(&logout);
    }

    bar
}

/// Three-tier difficulty selector. `on_pick` runs with the chosen tier.
pub fn difficulty_selector<F>(selected: Difficulty, on_pick: F) -> Element
where
    F: Fn(Difficulty) + Clone + 'static,
{
    let row = dom::make("div", "difficulty-row");
    for d in Difficulty::ALL {
        let class = if d == selected {
            "difficulty-btn active"
        } else {
            "difficulty-btn"
        };
        let btn = dom::make("button", class);
        let _ = btn.set_attribute("data-difficulty", d.as_str());
        btn.set_text_content(Some(d.label()));
        let on_pick = on_pick.clone();
        dom::on_click(&btn, move |_| on_pick(d));
        let _ = row.append_child(&btn);
    }
    row
}

/// Sync selector button highlighting with the chosen tier.
pub fn mark_selected_difficulty(selected: Difficulty) {
    let buttons = dom::document().query_selector_all(".difficulty-btn");
    if let Ok(buttons) = buttons {
        for i in 0..buttons.length() {
            if let Some(btn) = buttons
                .item(i)
                .and_then(|n| n.dyn_into::<Element>().ok())
            {
                let active = btn.get_attribute("data-difficulty").as_deref()
                    == Some(selected.as_str());
                let _ = btn.set_attribute(
                    "class",
                    if active {
                        "difficulty-btn active"
                    } else {
                        "difficulty-btn"
                    },
                );
            }
        }
    }
}

/// Modal shown when a round finishes. `rows` are label/value stat
/// pairs; restart re-runs the game, back returns to the dashboard.
pub fn results_modal<R, B>(title: &str, rows: &[(&str, String)], on_restart: R, on_back: B)
where
    R: FnMut(web_sys::MouseEvent) + 'static,
    B: FnMut(web_sys::MouseEvent) + 'static,
{
    close_results_modal();

    let overlay = dom::make("div", "modal-overlay");
    let _ = overlay.set_attribute("id", "results-modal");

    let card = dom::make("div", "modal-card");

    let heading = dom::make("h2", "modal-title");
    heading.set_text_content(Some(title));
    let _ = card.append_child(&heading);

    let stats = dom::make("dl", "modal-stats");
    for (label, value) in rows {
        let dt = dom::make("dt", "");
        dt.set_text_content(Some(label));
        let dd = dom::make("dd", "");
        dd.set_text_content(Some(value));
        let _ = stats.append_child(&dt);
        let _ = stats.append_child(&dd);
    }
    let _ = card.append_child(&stats);

    let buttons = dom::make("div", "modal-buttons");

    let restart = dom::make("button", "btn btn-primary");
    restart.set_text_content(Some("Ещё раз"));
    dom::on_click(&restart, on_restart);
    let _ = buttons.append_child(&restart);

    let back = dom::make("button", "btn");
    back.set_text_content(Some("К упражнениям"));
    dom::on_click(&back, on_back);
    let _ = buttons.append_child(&back);

    let _ = card.append_child(&buttons);
    let _ = overlay.append_child(&card);
    let _ = dom::document()
        .body()
        .expect("no body")
        .append_child(&overlay);
}

pub fn close_results_modal() {
    if let Some(existing) = dom::by_id("results-modal") {
        existing.remove();
    }
}

/// Countdown badge text, shared by the timed game pages.
pub fn timer_text(remaining_secs: u32) -> String {
    format!("{}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

/// Card for an exercise on the dashboard.
pub fn exercise_card(kind: GameKind, description: &str) -> Element {
    let card = dom::make("a", "exercise-card");
    let _ = card.set_attribute("href", &format!("/exercise/{}", kind.slug()));
    let _ = card.set_attribute("data-nav", "");

    let title = dom::make("h3", "card-title");
    title.set_text_content(Some(kind.title()));
    let _ = card.append_child(&title);

    let blurb = dom::make("p", "card-description");
    blurb.set_text_content(Some(description));
    let _ = card.append_child(&blurb);

    card
}
