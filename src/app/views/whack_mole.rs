//! Whack-a-mole page.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_sys::Element;

use crate::api::client;
use crate::app::dom::{self, IntervalHandle, RafLoop};
use crate::app::{widgets, Shared};
use crate::consts;
use crate::engine::{Outcome, RoundPhase};
use crate::games::whack_mole::WhackMoleGame;
use crate::games::GameKind;
use crate::tuning::Difficulty;

use super::exercise::{self, HandleSlot, Teardown};

type Game = Rc<RefCell<WhackMoleGame>>;

pub fn mount(container: &Element, app: Shared) -> Box<dyn Any> {
    let (teardown, slot) = Teardown::new();
    let (controls, area) = exercise::scaffold(container, GameKind::WhackMole);

    let difficulty = Rc::new(Cell::new(Difficulty::Medium));
    let game: Game = Rc::new(RefCell::new(WhackMoleGame::new(
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

    build_grid(&area, &game);
    Box::new(teardown)
}

fn start_round(app: &Shared, game: &Game, difficulty: Difficulty, slot: &HandleSlot, area: &Element) {
    exercise::cancel_timers(slot);

    let now = dom::now_ms();
    *game.borrow_mut() = WhackMoleGame::new(difficulty, now as u64);
    game.borrow_mut().start(now);
    dom::set_text("game-timer", &widgets::timer_text(game.borrow().remaining_secs()));
    update_score(&game.borrow());

    // The grid size follows the tier, so rebuild on every start.
    build_grid(area, game);

    {
        let app = app.clone();
        let game = game.clone();
        let slot2 = slot.clone();
        let area = area.clone();
        let timer = IntervalHandle::new(consts::COUNTDOWN_TICK_MS, move || {
            let ended = game.borrow_mut().tick_second();
            dom::set_text(
                "game-timer",
                &widgets::timer_text(game.borrow().remaining_secs()),
            );
            if ended {
                finish(&app, &game, &slot2, &area);
            }
        });
        exercise::park(slot, timer);
    }

    {
        let game = game.clone();
        let area = area.clone();
        let raf = RafLoop::new(move |now| {
            game.borrow_mut().advance(now);
            let g = game.borrow();
            if g.phase() == RoundPhase::Playing {
                paint_holes(&area, &g);
                update_score(&g);
            }
        });
        exercise::park(slot, raf);
    }
}

fn build_grid(area: &Element, game: &Game) {
    area.set_inner_html("");
    let settings = *game.borrow().settings();

    let grid = dom::make("div", "mole-grid");
    let _ = grid.set_attribute(
        "style",
        &format!("grid-template-columns: repeat({}, 1fr)", settings.grid_size),
    );

    for hole in 0..settings.holes() {
        let cell = dom::make("div", "hole");
        let _ = cell.set_attribute("id", &format!("hole-{hole}"));
        let game = game.clone();
        dom::on_click(&cell, move |_| {
            let now = dom::now_ms();
            game.borrow_mut().whack(hole, now);
            update_score(&game.borrow());
        });
        let _ = grid.append_child(&cell);
    }
    let _ = area.append_child(&grid);
}

fn paint_holes(area: &Element, game: &WhackMoleGame) {
    let settings = game.settings();
    for hole in 0..settings.holes() {
        let Ok(Some(cell)) = area.query_selector(&format!("#hole-{hole}")) else {
            continue;
        };
        let class = match game
            .moles()
            .find(|m| m.payload.hole == hole)
            .map(|m| m.outcome())
        {
            Some(None) => "hole mole-up",
            Some(Some(Outcome::Hit)) => "hole mole-hit",
            Some(Some(_)) => "hole mole-missed",
            None => "hole",
        };
        let _ = cell.set_attribute("class", class);
    }
}

fn update_score(game: &WhackMoleGame) {
    dom::set_text(
        "game-score",
        &format!("Поймано: {} · Упущено: {}", game.hits(), game.misses()),
    );
}

fn finish(app: &Shared, game: &Game, slot: &HandleSlot, area: &Element) {
    exercise::cancel_timers(slot);

    let (hits, misses, result) = {
        let g = game.borrow();
        (g.hits(), g.misses(), g.result())
    };
    if let Some(result) = result {
        client::report(result);
    }

    let rows = [
        ("Поймано", hits.to_string()),
        ("Упущено", misses.to_string()),
    ];
    let app2 = app.clone();
    let game = game.clone();
    let slot = slot.clone();
    let area = area.clone();
    exercise::show_results(app, "Время вышло!", &rows, move || {
        start_round(&app2, &game, exercise::selected_difficulty(), &slot, &area);
    });
}
