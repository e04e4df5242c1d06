//! Typing-speed page.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlTextAreaElement};

use crate::api::client;
use crate::api::{GenerateTextRequest, GenerateTextResponse};
use crate::app::dom::{self, IntervalHandle, ListenerHandle};
use crate::app::{widgets, Shared};
use crate::consts;
use crate::engine::RoundGuard;
use crate::games::typing::TypingGame;
use crate::games::GameKind;
use crate::tuning::Difficulty;

use super::exercise::{self, HandleSlot, Teardown};

type Game = Rc<RefCell<TypingGame>>;

pub fn mount(container: &Element, app: Shared) -> Box<dyn Any> {
    let (teardown, slot) = Teardown::new();
    let (controls, area) = exercise::scaffold(container, GameKind::Typing);

    let difficulty = Rc::new(Cell::new(Difficulty::Medium));
    let game: Game = Rc::new(RefCell::new(TypingGame::new(
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
    hint.set_text_content(Some("Перепечатайте текст без ошибок до конца отсчёта"));
    let _ = area.append_child(&hint);

    Box::new(teardown)
}

fn start_round(app: &Shared, game: &Game, difficulty: Difficulty, slot: &HandleSlot, area: &Element) {
    exercise::cancel_timers(slot);

    *game.borrow_mut() = TypingGame::new(difficulty, dom::now_ms() as u64);
    dom::set_text("game-timer", &widgets::timer_text(game.borrow().remaining_secs()));
    dom::set_text("game-score", "Загрузка текста...");
    area.set_inner_html("");

    // The fetch may resolve after a restart or after teardown; the
    // parked guard goes stale with the round, and a stale fetch must
    // not start timers for it.
    let guard = RoundGuard::new();
    let token = guard.token();
    exercise::park(slot, guard);

    // The target text comes from the backend; the bundled pool covers
    // offline and error cases.
    let app = app.clone();
    let game = game.clone();
    let slot = slot.clone();
    let area = area.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let request = GenerateTextRequest {
            difficulty,
            word_count: game.borrow().settings().word_count,
        };
        let target = match client::post_json::<_, GenerateTextResponse>(
            "/api/typing/generate-text",
            &request,
        )
        .await
        {
            Ok(response) => response.text,
            Err(err) => {
                log::warn!("text generation failed, using bundled text: {err}");
                game.borrow_mut().fallback_text().to_string()
            }
        };
        if !token.is_live() {
            return;
        }
        begin(&app, &game, target, &slot, &area);
    });
}

fn begin(app: &Shared, game: &Game, target: String, slot: &HandleSlot, area: &Element) {
    let now = dom::now_ms();
    game.borrow_mut().start(target, now);
    update_score(&game.borrow());

    area.set_inner_html("");
    let text = dom::make("p", "typing-target");
    text.set_text_content(Some(game.borrow().target()));
    let _ = area.append_child(&text);

    let input = dom::make("textarea", "typing-input");
    let _ = input.set_attribute("id", "typing-input");
    let _ = input.set_attribute("placeholder", "Печатайте здесь");
    let _ = area.append_child(&input);
    if let Ok(input) = input.clone().dyn_into::<HtmlTextAreaElement>() {
        let _ = input.focus();
    }

    {
        let app = app.clone();
        let game = game.clone();
        let slot2 = slot.clone();
        let listener = ListenerHandle::new(&input, "input", move |event: web_sys::Event| {
            let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlTextAreaElement>().ok())
            else {
                return;
            };
            let completed = game.borrow_mut().set_input(&input.value(), dom::now_ms());
            update_score(&game.borrow());
            if completed {
                finish(&app, &game, &slot2);
            }
        });
        exercise::park(slot, listener);
    }

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

fn update_score(game: &TypingGame) {
    let elapsed_secs = f64::from(
        game.settings().duration_secs - game.remaining_secs().min(game.settings().duration_secs),
    );
    dom::set_text(
        "game-score",
        &format!(
            "{} слов/мин · точность {}%",
            game.wpm(elapsed_secs.max(1.0)),
            game.accuracy()
        ),
    );
}

fn finish(app: &Shared, game: &Game, slot: &HandleSlot) {
    exercise::cancel_timers(slot);

    let result = game.borrow().result();
    let Some(result) = result else {
        return;
    };
    let (wpm, accuracy, total_time) = match &result {
        crate::api::GameResult::Typing {
            wpm,
            accuracy,
            total_time,
            ..
        } => (*wpm, *accuracy, *total_time),
        _ => (0, 0, 0),
    };
    client::report(result);

    let rows = [
        ("Скорость", format!("{wpm} слов/мин")),
        ("Точность", format!("{accuracy}%")),
        ("Время", format!("{total_time} с")),
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
