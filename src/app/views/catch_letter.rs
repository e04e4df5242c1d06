//! Catch-the-letter page.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::api::client;
use crate::app::dom::{self, IntervalHandle, ListenerHandle, RafLoop};
use crate::app::{widgets, Shared};
use crate::consts;
use crate::engine::{Outcome, RoundPhase};
use crate::games::catch_letter::CatchLetterGame;
use crate::games::GameKind;
use crate::tuning::Difficulty;

use super::exercise::{self, HandleSlot, Teardown};

type Game = Rc<RefCell<CatchLetterGame>>;

pub fn mount(container: &Element, app: Shared) -> Box<dyn Any> {
    let (teardown, slot) = Teardown::new();
    let (controls, area) = exercise::scaffold(container, GameKind::CatchLetter);
    let _ = area.set_attribute("class", "game-area letter-field");

    let difficulty = Rc::new(Cell::new(Difficulty::Medium));
    let game: Game = Rc::new(RefCell::new(CatchLetterGame::new(
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
    hint.set_text_content(Some("Нажимайте клавиши падающих букв, пока они не долетели до низа"));
    let _ = area.append_child(&hint);

    Box::new(teardown)
}

fn start_round(app: &Shared, game: &Game, difficulty: Difficulty, slot: &HandleSlot, area: &Element) {
    exercise::cancel_timers(slot);

    let now = dom::now_ms();
    *game.borrow_mut() = CatchLetterGame::new(difficulty, now as u64);
    game.borrow_mut().start(now);
    dom::set_text("game-timer", &widgets::timer_text(game.borrow().remaining_secs()));
    update_score(&game.borrow());
    area.set_inner_html("");

    {
        let app = app.clone();
        let game = game.clone();
        let slot2 = slot.clone();
        let timer = IntervalHandle::new(consts::COUNTDOWN_TICK_MS, move || {
            let ended = game.borrow_mut().tick_second();
            dom::set_text(
                "game-timer",
                &widgets::timer_text(game.borrow().remaining_secs()),
            );
            if ended {
                finish(&app, &game, &slot2);
            }
        });
        exercise::park(slot, timer);
    }

    {
        let game = game.clone();
        let keys = ListenerHandle::new(
            &dom::document(),
            "keydown",
            move |event: web_sys::Event| {
                let Ok(event) = event.dyn_into::<web_sys::KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                let Some(ch) = key.chars().next() else {
                    return;
                };
                if key.chars().count() != 1 {
                    return;
                }
                if game.borrow_mut().press_key(ch, dom::now_ms()) {
                    update_score(&game.borrow());
                }
            },
        );
        exercise::park(slot, keys);
    }

    {
        let game = game.clone();
        let area = area.clone();
        let raf = RafLoop::new(move |now| {
            game.borrow_mut().advance(now);
            let g = game.borrow();
            if g.phase() == RoundPhase::Playing {
                paint_letters(&area, &g);
                update_score(&g);
            }
        });
        exercise::park(slot, raf);
    }
}

/// Redraw the falling letters. The field is cheap enough to rebuild
/// per frame given the pending-letter cap.
fn paint_letters(area: &Element, game: &CatchLetterGame) {
    area.set_inner_html("");
    for entity in game.letters() {
        let class = match entity.outcome() {
            None => "letter",
            Some(Outcome::Hit) => "letter letter-caught",
            Some(_) => "letter letter-missed",
        };
        let el = dom::make("div", class);
        let _ = el.set_attribute(
            "style",
            &format!(
                "left: {:.1}%; top: {:.1}%",
                entity.payload.pos.x, entity.payload.pos.y
            ),
        );
        el.set_text_content(Some(&entity.payload.ch.to_string()));
        let _ = area.append_child(&el);
    }
}

fn update_score(game: &CatchLetterGame) {
    dom::set_text(
        "game-score",
        &format!("Поймано: {} · Упущено: {}", game.caught(), game.missed()),
    );
}

fn finish(app: &Shared, game: &Game, slot: &HandleSlot) {
    exercise::cancel_timers(slot);

    let (caught, missed, result) = {
        let g = game.borrow();
        (g.caught(), g.missed(), g.result())
    };
    if let Some(result) = result {
        client::report(result);
    }

    let rows = [
        ("Поймано", caught.to_string()),
        ("Упущено", missed.to_string()),
    ];
    let app2 = app.clone();
    let game = game.clone();
    let slot = slot.clone();
    exercise::show_results(app, "Время вышло!", &rows, move || {
        let area = dom::by_id("game-area");
        if let Some(area) = area {
            start_round(&app2, &game, exercise::selected_difficulty(), &slot, &area);
        }
    });
}
