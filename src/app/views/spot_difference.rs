//! Spot-the-difference page.
//!
//! The round itself lives on the server: it generates the image pair,
//! judges every click and records the result when the last difference
//! is found. The page keeps the click markers and the clock.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::api::client;
use crate::api::{SpotDifferenceCheckResponse, SpotDifferenceStartRequest, SpotDifferenceStartResponse};
use crate::app::dom::{self, IntervalHandle, RafLoop};
use crate::app::{widgets, Shared};
use crate::consts;
use crate::engine::{Outcome, RoundGuard, RoundPhase, RoundToken};
use crate::games::spot_difference::SpotDifferenceGame;
use crate::games::GameKind;
use crate::tuning::Difficulty;

use super::exercise::{self, HandleSlot, Teardown};

type Game = Rc<RefCell<SpotDifferenceGame>>;

pub fn mount(container: &Element, app: Shared) -> Box<dyn Any> {
    let (teardown, slot) = Teardown::new();
    let (controls, area) = exercise::scaffold(container, GameKind::SpotDifference);

    let difficulty = Rc::new(Cell::new(Difficulty::Medium));
    let game: Game = Rc::new(RefCell::new(SpotDifferenceGame::new()));

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
    hint.set_text_content(Some("Найдите все отличия между двумя картинками"));
    let _ = area.append_child(&hint);

    Box::new(teardown)
}

fn start_round(app: &Shared, game: &Game, difficulty: Difficulty, slot: &HandleSlot, area: &Element) {
    exercise::cancel_timers(slot);

    dom::set_text("game-timer", "—");
    dom::set_text("game-score", "Генерация картинок...");
    area.set_inner_html("");

    // A slow image generation can outlive this round; the parked guard
    // goes stale on restart or teardown and the late response is
    // dropped instead of starting timers for a dead round.
    let guard = RoundGuard::new();
    let token = guard.token();
    exercise::park(slot, guard);

    let app = app.clone();
    let game = game.clone();
    let slot = slot.clone();
    let area = area.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let request = SpotDifferenceStartRequest { difficulty };
        match client::post_json::<_, SpotDifferenceStartResponse>(
            "/api/spot-difference/start",
            &request,
        )
        .await
        {
            Ok(start) if token.is_live() => begin(&app, &game, start, &slot, &area, &token),
            Ok(_) => {}
            Err(err) => {
                log::warn!("spot-difference start failed: {err}");
                if token.is_live() {
                    dom::set_text("game-score", "Не удалось запустить раунд, попробуйте ещё раз");
                }
            }
        }
    });
}

fn begin(
    app: &Shared,
    game: &Game,
    start: SpotDifferenceStartResponse,
    slot: &HandleSlot,
    area: &Element,
    token: &RoundToken,
) {
    let now = dom::now_ms();
    game.borrow_mut().begin(start, now);
    update_score(&game.borrow());

    area.set_inner_html("");
    let pair = dom::make("div", "spot-pair");
    {
        let g = game.borrow();
        let (image1, image2) = g.images();
        for (index, image) in [image1, image2].into_iter().enumerate() {
            let wrap = dom::make("div", "spot-image-wrap");
            let _ = wrap.set_attribute("id", &format!("spot-wrap-{index}"));

            let img = dom::make("img", "spot-image");
            let _ = img.set_attribute("src", &format!("data:image/png;base64,{image}"));
            let _ = img.set_attribute("draggable", "false");
            let _ = wrap.append_child(&img);

            let game = game.clone();
            let app = app.clone();
            let slot = slot.clone();
            let wrap2 = wrap.clone();
            let token = token.clone();
            dom::on_click(&wrap, move |event: web_sys::MouseEvent| {
                let rect = wrap2.get_bounding_client_rect();
                if rect.width() <= 0.0 || rect.height() <= 0.0 {
                    return;
                }
                let x = (f64::from(event.client_x()) - rect.left()) / rect.width() * 100.0;
                let y = (f64::from(event.client_y()) - rect.top()) / rect.height() * 100.0;
                send_click(&app, &game, x, y, &slot, &token);
            });
            let _ = pair.append_child(&wrap);
        }
    }
    let _ = area.append_child(&pair);

    {
        let game = game.clone();
        let clock = IntervalHandle::new(consts::STOPWATCH_TICK_MS, move || {
            let g = game.borrow();
            if g.phase() == RoundPhase::Playing {
                dom::set_text(
                    "game-timer",
                    &format!("{:.1} с", g.elapsed_ms(dom::now_ms()) / 1000.0),
                );
            }
        });
        exercise::park(slot, clock);
    }

    {
        let game = game.clone();
        let raf = RafLoop::new(move |now| {
            game.borrow_mut().advance(now);
            paint_markers(&game.borrow());
        });
        exercise::park(slot, raf);
    }
}

fn send_click(
    app: &Shared,
    game: &Game,
    x_percent: f64,
    y_percent: f64,
    slot: &HandleSlot,
    token: &RoundToken,
) {
    let Some((marker_id, request)) =
        game.borrow_mut()
            .register_click(x_percent, y_percent, dom::now_ms())
    else {
        return;
    };

    let app = app.clone();
    let game = game.clone();
    let slot = slot.clone();
    let token = token.clone();
    wasm_bindgen_futures::spawn_local(async move {
        match client::post_json::<_, SpotDifferenceCheckResponse>(
            "/api/spot-difference/check",
            &request,
        )
        .await
        {
            Ok(check) if token.is_live() => {
                game.borrow_mut().apply_check(marker_id, &check, dom::now_ms());
                update_score(&game.borrow());
                if game.borrow().phase() == RoundPhase::Finished {
                    finish(&app, &game, &slot);
                }
            }
            Ok(_) => {}
            Err(err) => log::warn!("spot-difference check failed: {err}"),
        }
    });
}

/// Redraw the click markers on both images.
fn paint_markers(game: &SpotDifferenceGame) {
    for index in 0..2 {
        let Some(wrap) = dom::by_id(&format!("spot-wrap-{index}")) else {
            continue;
        };
        if let Ok(old) = wrap.query_selector_all(".spot-marker") {
            for i in 0..old.length() {
                if let Some(node) = old.item(i) {
                    if let Some(el) = node.dyn_ref::<Element>() {
                        el.remove();
                    }
                }
            }
        }
        for marker in game.markers() {
            let class = match marker.outcome() {
                Some(Outcome::Hit) => "spot-marker hit",
                Some(_) => "spot-marker miss",
                None => "spot-marker pending",
            };
            let el = dom::make("div", class);
            let _ = el.set_attribute(
                "style",
                &format!(
                    "left: {:.1}%; top: {:.1}%",
                    marker.payload.pos.x, marker.payload.pos.y
                ),
            );
            let _ = wrap.append_child(&el);
        }
    }
}

fn update_score(game: &SpotDifferenceGame) {
    dom::set_text(
        "game-score",
        &format!("Найдено: {}/{}", game.found(), game.total_differences()),
    );
}

fn finish(app: &Shared, game: &Game, slot: &HandleSlot) {
    exercise::cancel_timers(slot);

    let (found, total, time) = {
        let g = game.borrow();
        (g.found(), g.total_differences(), g.time_taken_secs())
    };

    let mut rows = vec![("Найдено отличий", format!("{found}/{total}"))];
    if let Some(time) = time {
        rows.push(("Время", format!("{time:.1} с")));
    }
    let app2 = app.clone();
    let game = game.clone();
    let slot = slot.clone();
    exercise::show_results(app, "Все отличия найдены!", &rows, move || {
        if let Some(area) = dom::by_id("game-area") {
            start_round(&app2, &game, exercise::selected_difficulty(), &slot, &area);
        }
    });
}
