//! Exercise catalog.
//!
//! The card grid renders immediately from the built-in catalog; the
//! backend's exercise list refreshes descriptions when it arrives.

use log::warn;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::api::client;
use crate::api::ExerciseInfo;
use crate::app::{dom, widgets};
use crate::games::GameKind;

fn default_description(kind: GameKind) -> &'static str {
    match kind {
        GameKind::Schulte => "Тренировка периферийного зрения и концентрации",
        GameKind::Sequence => "Запомните порядок ячеек и повторите его",
        GameKind::SpotDifference => "Найдите различия между изображениями",
        GameKind::Reaction => "Проверьте свою скорость реакции",
        GameKind::Math => "Решайте примеры на скорость",
        GameKind::Stroop => "Назовите цвет текста, а не значение слова",
        GameKind::Typing => "Скоростная печать без ошибок",
        GameKind::CatchLetter => "Успейте нажать падающую букву",
        GameKind::WhackMole => "Поймайте кротов, пока они не спрятались",
    }
}

pub fn render(container: &Element) {
    let page = dom::make("div", "dashboard-page");

    let heading = dom::make("h1", "page-title");
    heading.set_text_content(Some("Упражнения"));
    let _ = page.append_child(&heading);

    let grid = dom::make("div", "exercise-grid");
    for kind in GameKind::ALL {
        let card = widgets::exercise_card(kind, default_description(kind));
        let _ = card.set_attribute("id", &format!("card-{}", kind.slug()));
        let _ = grid.append_child(&card);
    }
    let _ = page.append_child(&grid);
    let _ = container.append_child(&page);

    // Refresh descriptions from the catalog endpoint.
    spawn_local(async {
        match client::get_json::<Vec<ExerciseInfo>>("/api/exercises").await {
            Ok(exercises) => {
                for info in exercises {
                    let card_id = format!("card-{}", info.exercise_id);
                    if let Some(card) = dom::by_id(&card_id) {
                        if let Ok(Some(blurb)) = card.query_selector(".card-description") {
                            blurb.set_text_content(Some(&info.description));
                        }
                    }
                }
            }
            Err(err) => warn!("exercise catalog fetch failed: {err}"),
        }
    });
}
