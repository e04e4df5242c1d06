//! Mental-math page.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};

use crate::api::client;
use crate::app::dom::{self, IntervalHandle, ListenerHandle};
use crate::app::{widgets, Shared};
use crate::consts;
use crate::engine::score::accuracy_percent;
use crate::games::math::MathGame;
use crate::games::GameKind;
use crate::tuning::Difficulty;

use super::exercise::{self, HandleSlot, Teardown};

type Game = Rc<RefCell<MathGame>>;

pub fn mount(container: &Element, app: Shared) -> Box<dyn Any> {
    let (teardown, slot) = Teardown::new();
    let (controls, area) = exercise::scaffold(container, GameKind::Math);

    let difficulty = Rc::new(Cell::new(Difficulty::Medium));
    let game: Game = Rc::new(RefCell::new(MathGame::new(
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

    Box::new(teardown)
}

fn start_round(app: &Shared, game: &Game, difficulty: Difficulty, slot: &HandleSlot, area: &Element) {
    exercise::cancel_timers(slot);

    let now = dom::now_ms();
    *game.borrow_mut() = MathGame::new(difficulty, now as u64);
    game.borrow_mut().start();
    dom::set_text("game-timer", &widgets::timer_text(game.borrow().remaining_secs()));
    update_score(&game.borrow());

    build_panel(area, game, app, slot);
    show_problem(&game.borrow());
    focus_input();

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

    let problem = dom::make("div", "math-problem");
    let _ = problem.set_attribute("id", "math-problem");
    let _ = area.append_child(&problem);

    let input = dom::make("input", "math-input");
    let _ = input.set_attribute("id", "math-input");
    let _ = input.set_attribute("type", "number");
    let _ = input.set_attribute("placeholder", "Ответ");
    let _ = area.append_child(&input);

    let submit = dom::make("button", "btn btn-primary");
    submit.set_text_content(Some("Ответить"));
    {
        let game = game.clone();
        let app = app.clone();
        let slot = slot.clone();
        dom::on_click(&submit, move |_| {
            submit_answer(&game, &app, &slot);
        });
    }
    let _ = area.append_child(&submit);

    {
        let game = game.clone();
        let app = app.clone();
        let slot2 = slot.clone();
        let enter = ListenerHandle::new(&input, "keydown", move |event: web_sys::Event| {
            let Ok(event) = event.dyn_into::<web_sys::KeyboardEvent>() else {
                return;
            };
            if event.key() == "Enter" {
                submit_answer(&game, &app, &slot2);
            }
        });
        exercise::park(slot, enter);
    }
}

fn submit_answer(game: &Game, app: &Shared, slot: &HandleSlot) {
    let Some(input) = dom::by_id("math-input").and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };
    let Ok(answer) = input.value().trim().parse::<i32>() else {
        return;
    };
    let ended = {
        let mut g = game.borrow_mut();
        if g.submit(answer).is_none() {
            return;
        }
        g.phase() == crate::engine::RoundPhase::Finished
    };

    input.set_value("");
    show_problem(&game.borrow());
    update_score(&game.borrow());
    if ended {
        finish(app, game, slot);
    } else {
        focus_input();
    }
}

fn show_problem(game: &MathGame) {
    if let Some(p) = game.problem() {
        dom::set_text(
            "math-problem",
            &format!("{} {} {} = ?", p.a, p.op.symbol(), p.b),
        );
    }
}

fn focus_input() {
    if let Some(input) = dom::by_id("math-input").and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        let _ = input.focus();
    }
}

fn update_score(game: &MathGame) {
    dom::set_text(
        "game-score",
        &format!(
            "Верно: {} · Ошибок: {} · Серия: {}",
            game.correct(),
            game.errors(),
            game.streak()
        ),
    );
}

fn finish(app: &Shared, game: &Game, slot: &HandleSlot) {
    exercise::cancel_timers(slot);

    let (correct, errors, max_streak, result) = {
        let g = game.borrow();
        (g.correct(), g.errors(), g.max_streak(), g.result())
    };
    if let Some(result) = result {
        client::report(result);
    }

    let rows = [
        ("Верных ответов", correct.to_string()),
        ("Ошибок", errors.to_string()),
        ("Лучшая серия", max_streak.to_string()),
        (
            "Точность",
            format!("{}%", accuracy_percent(correct, correct + errors)),
        ),
    ];
    let app2 = app.clone();
    let game = game.clone();
    let slot = slot.clone();
    exercise::show_results(app, "Время вышло!", &rows, move || {
        if let Some(area) = dom::by_id("game-area") {
            start_round(&app2, &game, exercise::selected_difficulty(), &slot, &area);
        }
    });
}
