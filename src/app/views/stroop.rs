//! Stroop test page.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_sys::Element;

use crate::api::client;
use crate::app::dom::{self, IntervalHandle};
use crate::app::{widgets, Shared};
use crate::consts;
use crate::engine::RoundPhase;
use crate::games::stroop::StroopGame;
use crate::games::GameKind;
use crate::tuning::Difficulty;

use super::exercise::{self, HandleSlot, Teardown};

type Game = Rc<RefCell<StroopGame>>;

pub fn mount(container: &Element, app: Shared) -> Box<dyn Any> {
    let (teardown, slot) = Teardown::new();
    let (controls, area) = exercise::scaffold(container, GameKind::Stroop);

    let difficulty = Rc::new(Cell::new(Difficulty::Medium));
    let game: Game = Rc::new(RefCell::new(StroopGame::new(
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
    hint.set_text_content(Some("Выбирайте цвет шрифта, а не значение слова"));
    let _ = area.append_child(&hint);

    Box::new(teardown)
}

fn start_round(app: &Shared, game: &Game, difficulty: Difficulty, slot: &HandleSlot, area: &Element) {
    exercise::cancel_timers(slot);

    let now = dom::now_ms();
    *game.borrow_mut() = StroopGame::new(difficulty, now as u64);
    game.borrow_mut().start(now);
    dom::set_text("game-timer", &widgets::timer_text(game.borrow().remaining_secs()));

    build_panel(area, game, app, slot);
    show_question(&game.borrow());
    update_score(&game.borrow());

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
}

fn build_panel(area: &Element, game: &Game, app: &Shared, slot: &HandleSlot) {
    area.set_inner_html("");

    let word = dom::make("div", "stroop-word");
    let _ = word.set_attribute("id", "stroop-word");
    let _ = area.append_child(&word);

    let buttons = dom::make("div", "stroop-buttons");
    let colors = game.borrow().settings().colors;
    for &color in colors {
        let btn = dom::make("button", "btn stroop-btn");
        let _ = btn.set_attribute(
            "style",
            &format!("background-color: {}", color.hex()),
        );
        btn.set_text_content(Some(color.word()));
        let game = game.clone();
        let app = app.clone();
        let slot = slot.clone();
        dom::on_click(&btn, move |_| {
            let ended = {
                let mut g = game.borrow_mut();
                if g.answer(color, dom::now_ms()).is_none() {
                    return;
                }
                g.phase() == RoundPhase::Finished
            };
            update_score(&game.borrow());
            if ended {
                finish(&app, &game, &slot);
            } else {
                show_question(&game.borrow());
            }
        });
        let _ = buttons.append_child(&btn);
    }
    let _ = area.append_child(&buttons);
}

fn show_question(game: &StroopGame) {
    let Some(q) = game.current_question() else {
        return;
    };
    if let Some(word) = dom::by_id("stroop-word") {
        word.set_text_content(Some(q.word.word()));
        let _ = word.set_attribute("style", &format!("color: {}", q.ink.hex()));
    }
}

fn update_score(game: &StroopGame) {
    dom::set_text(
        "game-score",
        &format!(
            "Вопрос {}/{} · Верно: {}",
            game.question_number(),
            game.settings().questions,
            game.correct()
        ),
    );
}

fn finish(app: &Shared, game: &Game, slot: &HandleSlot) {
    exercise::cancel_timers(slot);

    let (correct, total, result) = {
        let g = game.borrow();
        (g.correct(), g.settings().questions, g.result())
    };
    if let Some(result) = result {
        client::report(result);
    }

    let rows = [
        ("Верных ответов", format!("{correct}/{total}")),
    ];
    let app2 = app.clone();
    let game = game.clone();
    let slot = slot.clone();
    exercise::show_results(app, "Раунд завершён!", &rows, move || {
        if let Some(area) = dom::by_id("game-area") {
            start_round(&app2, &game, exercise::selected_difficulty(), &slot, &area);
        }
    });
}
