//! DOM helpers and RAII timer handles.
//!
//! Every interval, timeout and animation-frame loop a view starts is
//! owned by a handle that clears it on drop. A view teardown drops its
//! handles, so no callback from a dead view can ever fire into a new
//! one.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

pub fn window() -> Window {
    web_sys::window().expect("no window")
}

pub fn document() -> Document {
    window().document().expect("no document")
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn set_text(id: &str, text: &str) {
    if let Some(el) = by_id(id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_class(id: &str, class: &str) {
    if let Some(el) = by_id(id) {
        let _ = el.set_attribute("class", class);
    }
}

/// Create an element with a class, ready to append.
pub fn make(tag: &str, class: &str) -> Element {
    let el = document().create_element(tag).expect("create_element");
    if !class.is_empty() {
        let _ = el.set_attribute("class", class);
    }
    el
}

/// Attach a click handler to `el`. The closure is leaked, which is fine
/// for elements that live as long as their view's DOM subtree.
pub fn on_click<F: FnMut(web_sys::MouseEvent) + 'static>(el: &Element, handler: F) {
    let closure = Closure::<dyn FnMut(_)>::new(handler);
    let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Event listener on a long-lived target (document, window), removed on
/// drop. Element-local listeners die with their element; these would
/// outlive the view without explicit removal.
pub struct ListenerHandle {
    target: web_sys::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl ListenerHandle {
    pub fn new<F: FnMut(web_sys::Event) + 'static>(
        target: &web_sys::EventTarget,
        event: &'static str,
        handler: F,
    ) -> Self {
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            event,
            closure,
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// `setInterval` wrapper cleared on drop.
pub struct IntervalHandle {
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl IntervalHandle {
    pub fn new<F: FnMut() + 'static>(millis: i32, handler: F) -> Self {
        let closure = Closure::<dyn FnMut()>::new(handler);
        let id = window()
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis,
            )
            .expect("setInterval");
        Self {
            id,
            _closure: closure,
        }
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        window().clear_interval_with_handle(self.id);
    }
}

/// `setTimeout` wrapper cleared on drop.
pub struct TimeoutHandle {
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl TimeoutHandle {
    pub fn new<F: FnMut() + 'static>(millis: i32, handler: F) -> Self {
        let closure = Closure::<dyn FnMut()>::new(handler);
        let id = window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis,
            )
            .expect("setTimeout");
        Self {
            id,
            _closure: closure,
        }
    }
}

impl Drop for TimeoutHandle {
    fn drop(&mut self) {
        window().clear_timeout_with_handle(self.id);
    }
}

/// Self-rescheduling `requestAnimationFrame` loop. Dropping the handle
/// cancels the pending frame and stops the loop.
pub struct RafLoop {
    state: Rc<RefCell<RafState>>,
}

struct RafState {
    raf_id: Option<i32>,
    closure: Option<Closure<dyn FnMut(f64)>>,
}

impl RafLoop {
    pub fn new<F: FnMut(f64) + 'static>(mut frame: F) -> Self {
        let state = Rc::new(RefCell::new(RafState {
            raf_id: None,
            closure: None,
        }));

        let state_clone = state.clone();
        let closure = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            frame(now_ms());
            let mut s = state_clone.borrow_mut();
            if s.closure.is_some() {
                s.raf_id = request_frame(s.closure.as_ref().expect("raf closure"));
            }
        });

        {
            let mut s = state.borrow_mut();
            s.raf_id = request_frame(&closure);
            s.closure = Some(closure);
        }

        Self { state }
    }
}

fn request_frame(closure: &Closure<dyn FnMut(f64)>) -> Option<i32> {
    window()
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        let mut s = self.state.borrow_mut();
        if let Some(id) = s.raf_id.take() {
            let _ = window().cancel_animation_frame(id);
        }
        s.closure = None;
    }
}
