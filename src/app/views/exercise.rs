//! Game page dispatch and scaffolding shared by all exercise views.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use web_sys::Element;

use crate::app::router::Route;
use crate::app::{dom, navigate, widgets, Shared};
use crate::games::GameKind;

use super::{
    catch_letter, math, reaction, schulte, sequence, spot_difference, stroop, typing, whack_mole,
};

pub fn mount(container: &Element, kind: GameKind, app: Shared) -> Box<dyn Any> {
    match kind {
        GameKind::Schulte => schulte::mount(container, app),
        GameKind::Sequence => sequence::mount(container, app),
        GameKind::SpotDifference => spot_difference::mount(container, app),
        GameKind::Reaction => reaction::mount(container, app),
        GameKind::Math => math::mount(container, app),
        GameKind::Stroop => stroop::mount(container, app),
        GameKind::Typing => typing::mount(container, app),
        GameKind::CatchLetter => catch_letter::mount(container, app),
        GameKind::WhackMole => whack_mole::mount(container, app),
    }
}

/// Shared slot for a view's live timers and listeners.
///
/// Closures hold a clone of the inner `Rc` and park their handles here;
/// the `Teardown` returned from `mount` is the view's owner. Dropping
/// it clears the slot, which cancels every interval, timeout, raf loop
/// and listener the view ever started, even though the closures
/// themselves leak.
pub struct Teardown {
    slot: HandleSlot,
}

pub type HandleSlot = Rc<RefCell<Vec<Box<dyn Any>>>>;

impl Teardown {
    pub fn new() -> (Self, HandleSlot) {
        let slot: HandleSlot = Rc::new(RefCell::new(Vec::new()));
        (Self { slot: slot.clone() }, slot)
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.slot.borrow_mut().clear();
    }
}

/// Park a handle in the slot.
pub fn park<H: 'static>(slot: &HandleSlot, handle: H) {
    slot.borrow_mut().push(Box::new(handle));
}

/// Cancel a view's live timers, used when a round ends.
pub fn cancel_timers(slot: &HandleSlot) {
    slot.borrow_mut().clear();
}

/// Standard game page skeleton: title, status bar (`game-timer`,
/// `game-score`), controls strip and play area. Returns the controls
/// and area elements for the game view to fill.
pub fn scaffold(container: &Element, kind: GameKind) -> (Element, Element) {
    let page = dom::make("div", "game-page");

    let title = dom::make("h1", "page-title");
    title.set_text_content(Some(kind.title()));
    let _ = page.append_child(&title);

    let status = dom::make("div", "game-status");
    for (id, label) in [("game-timer", "—"), ("game-score", "")] {
        let item = dom::make("span", "status-item");
        let _ = item.set_attribute("id", id);
        item.set_text_content(Some(label));
        let _ = status.append_child(&item);
    }
    let _ = page.append_child(&status);

    let controls = dom::make("div", "game-controls");
    let _ = page.append_child(&controls);

    let area = dom::make("div", "game-area");
    let _ = area.set_attribute("id", "game-area");
    let _ = page.append_child(&area);

    let _ = container.append_child(&page);
    (controls, area)
}

/// Start button appended to the controls strip.
pub fn start_button<F: FnMut(web_sys::MouseEvent) + 'static>(controls: &Element, on_start: F) {
    let btn = dom::make("button", "btn btn-primary start-btn");
    let _ = btn.set_attribute("id", "start-btn");
    btn.set_text_content(Some("Начать"));
    dom::on_click(&btn, on_start);
    let _ = controls.append_child(&btn);
}

/// Tier currently highlighted in the selector.
pub fn selected_difficulty() -> crate::tuning::Difficulty {
    dom::document()
        .query_selector(".difficulty-btn.active")
        .ok()
        .flatten()
        .and_then(|el| el.get_attribute("data-difficulty"))
        .and_then(|s| crate::tuning::Difficulty::from_str(&s))
        .unwrap_or_default()
}

/// Results modal wired to restart-in-place or return to the dashboard.
pub fn show_results<R>(app: &Shared, title: &str, rows: &[(&str, String)], mut on_restart: R)
where
    R: FnMut() + 'static,
{
    let back_app = app.clone();
    widgets::results_modal(
        title,
        rows,
        move |_| {
            widgets::close_results_modal();
            on_restart();
        },
        move |_| {
            widgets::close_results_modal();
            navigate(&back_app, Route::Dashboard);
        },
    );
}
