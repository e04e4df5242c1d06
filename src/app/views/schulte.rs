//! Schulte table page.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_sys::Element;

use crate::api::client;
use crate::app::dom::{self, IntervalHandle, TimeoutHandle};
use crate::app::{widgets, Shared};
use crate::best_times::{format_clock, BestTimes};
use crate::consts;
use crate::games::schulte::{Click, SchulteGame};
use crate::games::GameKind;
use crate::tuning::SCHULTE_GRID_SIZES;

use super::exercise::{self, HandleSlot, Teardown};

type Game = Rc<RefCell<SchulteGame>>;

/// How long a wrong-clicked cell stays highlighted
const WRONG_FLASH_MS: i32 = 400;

pub fn mount(container: &Element, app: Shared) -> Box<dyn Any> {
    let (teardown, slot) = Teardown::new();
    let (controls, area) = exercise::scaffold(container, GameKind::Schulte);

    let grid_size = Rc::new(Cell::new(5usize));
    let game: Game = Rc::new(RefCell::new(SchulteGame::new(
        grid_size.get(),
        dom::now_ms() as u64,
    )));

    {
        let row = dom::make("div", "difficulty-row");
        for &size in SCHULTE_GRID_SIZES {
            let class = if size == grid_size.get() {
                "difficulty-btn active"
            } else {
                "difficulty-btn"
            };
            let btn = dom::make("button", class);
            let _ = btn.set_attribute("data-grid-size", &size.to_string());
            btn.set_text_content(Some(&format!("{size}×{size}")));
            let grid_size = grid_size.clone();
            dom::on_click(&btn, move |_| {
                grid_size.set(size);
                mark_selected_size(size);
            });
            let _ = row.append_child(&btn);
        }
        let _ = controls.append_child(&row);
    }

    {
        let app = app.clone();
        let game = game.clone();
        let slot = slot.clone();
        let area = area.clone();
        let grid_size = grid_size.clone();
        exercise::start_button(&controls, move |_| {
            start_round(&app, &game, grid_size.get(), &slot, &area);
        });
    }

    {
        let game = game.clone();
        let pause = dom::make("button", "btn");
        let _ = pause.set_attribute("id", "pause-btn");
        pause.set_text_content(Some("Пауза"));
        dom::on_click(&pause, move |_| {
            let now = dom::now_ms();
            let mut g = game.borrow_mut();
            if g.is_paused() {
                g.resume(now);
                dom::set_text("pause-btn", "Пауза");
            } else {
                g.pause(now);
                dom::set_text("pause-btn", "Продолжить");
            }
        });
        let _ = controls.append_child(&pause);
    }

    show_best(grid_size.get());

    let hint = dom::make("p", "game-hint");
    hint.set_text_content(Some("Находите числа по порядку как можно быстрее"));
    let _ = area.append_child(&hint);

    Box::new(teardown)
}

fn mark_selected_size(selected: usize) {
    use wasm_bindgen::JsCast;
    if let Ok(buttons) = dom::document().query_selector_all(".difficulty-btn") {
        for i in 0..buttons.length() {
            if let Some(btn) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let active = btn.get_attribute("data-grid-size").as_deref()
                    == Some(&selected.to_string());
                let _ = btn.set_attribute(
                    "class",
                    if active {
                        "difficulty-btn active"
                    } else {
                        "difficulty-btn"
                    },
                );
            }
        }
    }
    show_best(selected);
}

fn selected_size() -> usize {
    dom::document()
        .query_selector(".difficulty-btn.active")
        .ok()
        .flatten()
        .and_then(|el| el.get_attribute("data-grid-size"))
        .and_then(|s| s.parse().ok())
        .unwrap_or(5)
}

fn show_best(grid_size: usize) {
    let best = BestTimes::load().best_for(grid_size);
    let text = match best {
        Some(ms) => format!("Рекорд: {}", format_clock(f64::from(ms))),
        None => "Рекорд: —".to_string(),
    };
    dom::set_text("game-score", &text);
}

fn start_round(app: &Shared, game: &Game, grid_size: usize, slot: &HandleSlot, area: &Element) {
    exercise::cancel_timers(slot);

    let now = dom::now_ms();
    *game.borrow_mut() = SchulteGame::new(grid_size, now as u64);
    game.borrow_mut().start(now);
    dom::set_text("pause-btn", "Пауза");
    show_best(grid_size);

    build_grid(area, game, app, slot);

    {
        let game = game.clone();
        let clock = IntervalHandle::new(consts::STOPWATCH_TICK_MS, move || {
            let elapsed = game.borrow().elapsed_ms(dom::now_ms());
            dom::set_text("game-timer", &format_clock(elapsed));
        });
        exercise::park(slot, clock);
    }
}

fn build_grid(area: &Element, game: &Game, app: &Shared, slot: &HandleSlot) {
    area.set_inner_html("");
    let size = game.borrow().grid_size();
    let cells: Vec<u32> = game.borrow().cells().to_vec();

    let grid = dom::make("div", "schulte-grid");
    let _ = grid.set_attribute(
        "style",
        &format!("grid-template-columns: repeat({size}, 1fr)"),
    );

    for number in cells {
        let el = dom::make("div", "schulte-cell");
        let _ = el.set_attribute("id", &format!("schulte-{number}"));
        el.set_text_content(Some(&number.to_string()));
        let game = game.clone();
        let app = app.clone();
        let slot = slot.clone();
        dom::on_click(&el, move |_| {
            let now = dom::now_ms();
            let verdict = game.borrow_mut().click(number, now);
            match verdict {
                Some(Click::Correct) => {
                    dom::set_class(&format!("schulte-{number}"), "schulte-cell found");
                }
                Some(Click::Completed) => {
                    dom::set_class(&format!("schulte-{number}"), "schulte-cell found");
                    finish(&app, &game, &slot);
                }
                Some(Click::Wrong) => {
                    // Transient flash, no time penalty.
                    dom::set_class(&format!("schulte-{number}"), "schulte-cell wrong");
                    let game = game.clone();
                    let flash = TimeoutHandle::new(WRONG_FLASH_MS, move || {
                        if !game.borrow().is_found(number) {
                            dom::set_class(&format!("schulte-{number}"), "schulte-cell");
                        }
                    });
                    exercise::park(&slot, flash);
                }
                None => {}
            }
        });
        let _ = grid.append_child(&el);
    }
    let _ = area.append_child(&grid);
}

fn finish(app: &Shared, game: &Game, slot: &HandleSlot) {
    exercise::cancel_timers(slot);

    let (grid_size, result) = {
        let g = game.borrow();
        (g.grid_size(), g.result())
    };
    let Some(result) = result else {
        return;
    };
    let time_ms = match &result {
        crate::api::GameResult::Schulte { time_ms, .. } => *time_ms,
        _ => 0,
    };
    client::report(result);

    let mut best = BestTimes::load();
    let is_record = best.record(grid_size, time_ms, dom::now_ms());
    if is_record {
        best.save();
    }
    show_best(grid_size);

    let mut rows = vec![("Время", format_clock(f64::from(time_ms)))];
    if is_record {
        rows.push(("Новый рекорд!", format_clock(f64::from(time_ms))));
    } else if let Some(best_ms) = best.best_for(grid_size) {
        rows.push(("Рекорд", format_clock(f64::from(best_ms))));
    }

    let app2 = app.clone();
    let game = game.clone();
    let slot = slot.clone();
    exercise::show_results(app, "Таблица собрана!", &rows, move || {
        if let Some(area) = dom::by_id("game-area") {
            start_round(&app2, &game, selected_size(), &slot, &area);
        }
    });
}
