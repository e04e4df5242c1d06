//! Reaction-time page.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_sys::Element;

use crate::api::client;
use crate::app::dom::{self, RafLoop};
use crate::app::{widgets, Shared};
use crate::engine::RoundPhase;
use crate::games::reaction::{ReactionGame, Stage};
use crate::games::GameKind;
use crate::tuning::Difficulty;

use super::exercise::{self, HandleSlot, Teardown};

type Game = Rc<RefCell<ReactionGame>>;

pub fn mount(container: &Element, app: Shared) -> Box<dyn Any> {
    let (teardown, slot) = Teardown::new();
    let (controls, area) = exercise::scaffold(container, GameKind::Reaction);
    let _ = area.set_attribute("class", "game-area reaction-field");

    let difficulty = Rc::new(Cell::new(Difficulty::Medium));
    let game: Game = Rc::new(RefCell::new(ReactionGame::new(
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

    {
        let game = game.clone();
        let area2 = area.clone();
        dom::on_click(&area, move |_| {
            if game.borrow().phase() != RoundPhase::Playing {
                return;
            }
            game.borrow_mut().click(dom::now_ms());
            paint(&area2, &game.borrow());
        });
    }

    let hint = dom::make("p", "game-hint");
    hint.set_text_content(Some("Кликайте по кругу сразу, как он появится"));
    let _ = area.append_child(&hint);

    Box::new(teardown)
}

fn start_round(app: &Shared, game: &Game, difficulty: Difficulty, slot: &HandleSlot, area: &Element) {
    exercise::cancel_timers(slot);

    let now = dom::now_ms();
    *game.borrow_mut() = ReactionGame::new(difficulty, now as u64);
    game.borrow_mut().start(now);
    dom::set_text("game-timer", "—");
    update_score(&game.borrow());

    {
        let app = app.clone();
        let game = game.clone();
        let slot2 = slot.clone();
        let area = area.clone();
        let raf = RafLoop::new(move |now| {
            game.borrow_mut().advance(now);
            let finished = game.borrow().phase() == RoundPhase::Finished;
            paint(&area, &game.borrow());
            update_score(&game.borrow());
            if finished {
                finish(&app, &game, &slot2);
            }
        });
        exercise::park(slot, raf);
    }
}

fn paint(area: &Element, game: &ReactionGame) {
    area.set_inner_html("");
    if game.phase() != RoundPhase::Playing {
        return;
    }
    match game.stage() {
        Stage::Waiting { .. } => {
            let wait = dom::make("div", "reaction-wait");
            wait.set_text_content(Some("Ждите..."));
            let _ = area.append_child(&wait);
        }
        Stage::Target { pos, .. } => {
            let size = game.settings().target_size;
            let target = dom::make("div", "reaction-target");
            let _ = target.set_attribute(
                "style",
                &format!(
                    "left: {:.1}%; top: {:.1}%; width: {size}px; height: {size}px",
                    pos.x, pos.y
                ),
            );
            let _ = area.append_child(&target);
        }
        Stage::Penalty { .. } => {
            let penalty = dom::make("div", "reaction-penalty");
            penalty.set_text_content(Some("Рано! Дождитесь появления круга"));
            let _ = area.append_child(&penalty);
        }
        Stage::Pause { .. } => {
            let pause = dom::make("div", "reaction-wait");
            if let Some(&last) = game.times_ms().last() {
                pause.set_text_content(Some(&format!("{last:.0} мс")));
            }
            let _ = area.append_child(&pause);
        }
    }
}

fn update_score(game: &ReactionGame) {
    dom::set_text(
        "game-score",
        &format!(
            "Попытка {}/{} · Фальстартов: {}",
            game.round().min(game.settings().rounds),
            game.settings().rounds,
            game.false_starts()
        ),
    );
}

fn finish(app: &Shared, game: &Game, slot: &HandleSlot) {
    exercise::cancel_timers(slot);

    let result = game.borrow().result();
    let Some(result) = result else {
        return;
    };
    let (average, best) = match &result {
        crate::api::GameResult::Reaction {
            average_time,
            best_time,
            ..
        } => (*average_time, *best_time),
        _ => (0.0, 0.0),
    };
    client::report(result);

    let rows = [
        ("Среднее время", format!("{average:.0} мс")),
        ("Лучшее время", format!("{best:.0} мс")),
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
