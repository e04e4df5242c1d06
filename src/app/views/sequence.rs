//! Sequence-memory page.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_sys::Element;

use crate::api::client;
use crate::app::dom::{self, RafLoop};
use crate::app::{widgets, Shared};
use crate::engine::RoundPhase;
use crate::games::sequence::SequenceGame;
use crate::games::GameKind;
use crate::tuning::Difficulty;

use super::exercise::{self, HandleSlot, Teardown};

type Game = Rc<RefCell<SequenceGame>>;

pub fn mount(container: &Element, app: Shared) -> Box<dyn Any> {
    let (teardown, slot) = Teardown::new();
    let (controls, area) = exercise::scaffold(container, GameKind::Sequence);

    let difficulty = Rc::new(Cell::new(Difficulty::Medium));
    let game: Game = Rc::new(RefCell::new(SequenceGame::new(
        difficulty.get(),
        dom::now_ms() as u64,
    )));

    {
        let difficulty = difficulty.clone();
        let selector = widgets::difficulty_selector(difficulty.get(), move |d| {
            difficulty.set(d);
            widgets::mark_selected_difficulty(d);
        });
        let _ = controls.append_child(&selector);
    }

    {
        let app = app.clone();
        let game = game.clone();
        let slot = slot.clone();
        let area = area.clone();
        let difficulty = difficulty.clone();
        exercise::start_button(&controls, move |_| {
            start_round(&app, &game, difficulty.get(), &slot, &area);
        });
    }

    let hint = dom::make("p", "game-hint");
    hint.set_text_content(Some("Запомните порядок подсветки и повторите его"));
    let _ = area.append_child(&hint);

    Box::new(teardown)
}

fn start_round(app: &Shared, game: &Game, difficulty: Difficulty, slot: &HandleSlot, area: &Element) {
    exercise::cancel_timers(slot);

    let now = dom::now_ms();
    *game.borrow_mut() = SequenceGame::new(difficulty, now as u64);
    game.borrow_mut().start(now);
    dom::set_text("game-timer", "—");
    update_score(&game.borrow());

    build_grid(area, game, app, slot);

    {
        let game = game.clone();
        let area = area.clone();
        let raf = RafLoop::new(move |now| {
            game.borrow_mut().advance(now);
            let g = game.borrow();
            paint_cells(&area, &g, now);
        });
        exercise::park(slot, raf);
    }
}

fn build_grid(area: &Element, game: &Game, app: &Shared, slot: &HandleSlot) {
    area.set_inner_html("");
    let settings = *game.borrow().settings();

    let grid = dom::make("div", "sequence-grid");
    let _ = grid.set_attribute(
        "style",
        &format!("grid-template-columns: repeat({}, 1fr)", settings.grid_size),
    );

    for cell in 0..settings.cells() {
        let el = dom::make("div", "sequence-cell");
        let _ = el.set_attribute("id", &format!("seq-cell-{cell}"));
        let game = game.clone();
        let app = app.clone();
        let slot = slot.clone();
        dom::on_click(&el, move |_| {
            let verdict = game.borrow_mut().press(cell, dom::now_ms());
            update_score(&game.borrow());
            if verdict == Some(false) {
                finish(&app, &game, &slot);
            }
        });
        let _ = grid.append_child(&el);
    }
    let _ = area.append_child(&grid);
}

fn paint_cells(area: &Element, game: &SequenceGame, now_ms: f64) {
    let lit = match game.phase() {
        RoundPhase::Preparing => game.highlighted(now_ms),
        _ => None,
    };
    let cells = game.settings().cells();
    for cell in 0..cells {
        let Ok(Some(el)) = area.query_selector(&format!("#seq-cell-{cell}")) else {
            continue;
        };
        let class = if lit == Some(cell) {
            "sequence-cell lit"
        } else {
            "sequence-cell"
        };
        let _ = el.set_attribute("class", class);
    }
}

fn update_score(game: &SequenceGame) {
    let (entered, total) = game.progress();
    dom::set_text(
        "game-score",
        &format!("Уровень {} · {}/{}", game.level(), entered, total),
    );
}

fn finish(app: &Shared, game: &Game, slot: &HandleSlot) {
    exercise::cancel_timers(slot);

    let (level, result) = {
        let g = game.borrow();
        (g.level(), g.result())
    };
    if let Some(result) = result {
        client::report(result);
    }

    let rows = [("Достигнутый уровень", level.to_string())];
    let app2 = app.clone();
    let game = game.clone();
    let slot = slot.clone();
    exercise::show_results(app, "Последовательность прервана", &rows, move || {
        if let Some(area) = dom::by_id("game-area") {
            start_round(&app2, &game, exercise::selected_difficulty(), &slot, &area);
        }
    });
}
