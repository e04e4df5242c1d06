//! Leaderboard page: pick an exercise, see its top players.

use log::warn;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::api::client;
use crate::api::LeaderboardRow;
use crate::app::dom;
use crate::games::GameKind;

pub fn render(container: &Element) {
    let page = dom::make("div", "leaderboard-page");

    let heading = dom::make("h1", "page-title");
    heading.set_text_content(Some("Рейтинг"));
    let _ = page.append_child(&heading);

    let tabs = dom::make("div", "exercise-tabs");
    for kind in GameKind::ALL {
        let tab = dom::make("button", "tab-btn");
        let _ = tab.set_attribute("data-exercise", kind.slug());
        tab.set_text_content(Some(kind.title()));
        dom::on_click(&tab, move |_| load(kind));
        let _ = tabs.append_child(&tab);
    }
    let _ = page.append_child(&tabs);

    let table = dom::make("div", "leaderboard-table");
    let _ = table.set_attribute("id", "leaderboard-rows");
    table.set_text_content(Some("Выберите упражнение"));
    let _ = page.append_child(&table);

    let _ = container.append_child(&page);

    load(GameKind::Schulte);
}

fn load(kind: GameKind) {
    dom::set_text("leaderboard-rows", "Загрузка...");
    spawn_local(async move {
        let path = format!("/api/leaderboard/{}?limit=10", kind.slug());
        match client::get_json::<Vec<LeaderboardRow>>(&path).await {
            Ok(rows) => show_rows(&rows),
            Err(err) => {
                warn!("leaderboard fetch failed: {err}");
                dom::set_text("leaderboard-rows", "Не удалось загрузить рейтинг");
            }
        }
    });
}

fn show_rows(rows: &[LeaderboardRow]) {
    let Some(table) = dom::by_id("leaderboard-rows") else {
        // View already torn down; nothing to update.
        return;
    };
    table.set_inner_html("");

    if rows.is_empty() {
        table.set_text_content(Some("Пока никто не играл"));
        return;
    }

    for (rank, row) in rows.iter().enumerate() {
        let line: Element = dom::make("div", "leaderboard-row");

        let place = dom::make("span", "rank");
        place.set_text_content(Some(&format!("{}", rank + 1)));
        let _ = line.append_child(&place);

        let name = dom::make("span", "player-name");
        name.set_text_content(Some(&row.name));
        let _ = line.append_child(&name);

        let level = dom::make("span", "player-level");
        level.set_text_content(Some(&format!("ур. {}", row.level)));
        let _ = line.append_child(&level);

        let games = dom::make("span", "player-games");
        games.set_text_content(Some(&format!("{} игр", row.total_games)));
        let _ = line.append_child(&games);

        if let Some(best) = row.best_time {
            let time = dom::make("span", "player-best");
            time.set_text_content(Some(&format!("{best:.1} с")));
            let _ = line.append_child(&time);
        }

        let _ = table.append_child(&line);
    }
}
