//! Profile page: per-exercise progress pulled from the backend.

use log::warn;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::api::client;
use crate::api::ProfileStats;
use crate::app::dom;
use crate::games::GameKind;

pub fn render(container: &Element) {
    let page = dom::make("div", "profile-page");

    let heading = dom::make("h1", "page-title");
    heading.set_text_content(Some("Профиль"));
    let _ = page.append_child(&heading);

    let summary = dom::make("div", "profile-summary");
    let _ = summary.set_attribute("id", "profile-summary");
    summary.set_text_content(Some("Загрузка..."));
    let _ = page.append_child(&summary);

    let progress = dom::make("div", "profile-progress");
    let _ = progress.set_attribute("id", "profile-progress");
    let _ = page.append_child(&progress);

    let _ = container.append_child(&page);

    spawn_local(async {
        match client::get_json::<ProfileStats>("/api/profile/stats").await {
            Ok(stats) => show_stats(&stats),
            Err(err) => {
                warn!("profile stats fetch failed: {err}");
                dom::set_text("profile-summary", "Не удалось загрузить статистику");
            }
        }
    });
}

fn show_stats(stats: &ProfileStats) {
    if let Some(summary) = dom::by_id("profile-summary") {
        summary.set_inner_html("");

        let name = dom::make("h2", "profile-name");
        name.set_text_content(Some(&stats.user.name));
        let _ = summary.append_child(&name);

        let total = dom::make("p", "profile-total");
        total.set_text_content(Some(&format!("Всего игр: {}", stats.total_games)));
        let _ = summary.append_child(&total);
    }

    let Some(progress) = dom::by_id("profile-progress") else {
        return;
    };
    progress.set_inner_html("");

    if stats.progress.is_empty() {
        progress.set_text_content(Some("Сыграйте первую игру, чтобы увидеть прогресс"));
        return;
    }

    for row in &stats.progress {
        let card = dom::make("div", "progress-card");

        let title = dom::make("h3", "progress-title");
        let display = GameKind::from_slug(&row.exercise_id)
            .map(|k| k.title())
            .unwrap_or(row.exercise_id.as_str());
        title.set_text_content(Some(display));
        let _ = card.append_child(&title);

        let level = dom::make("p", "progress-level");
        level.set_text_content(Some(&format!(
            "Уровень {} · {} игр",
            row.level, row.total_games
        )));
        let _ = card.append_child(&level);

        if let Some(best) = row.best_score {
            let best_el = dom::make("p", "progress-best");
            best_el.set_text_content(Some(&format!("Лучший результат: {best:.0}")));
            let _ = card.append_child(&best_el);
        }
        if let Some(avg) = row.average_score {
            let avg_el = dom::make("p", "progress-average");
            avg_el.set_text_content(Some(&format!("Средний результат: {avg:.0}")));
            let _ = card.append_child(&avg_el);
        }
        if let Some(last) = &row.last_played {
            let last_el = dom::make("p", "progress-last");
            last_el.set_text_content(Some(&format!("Последняя игра: {last}")));
            let _ = card.append_child(&last_el);
        }

        let _ = progress.append_child(&card);
    }
}
