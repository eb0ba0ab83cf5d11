use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Self-rescheduling `requestAnimationFrame` loop.
///
/// The tick closure holds a handle to itself to schedule the next frame, so
/// `stop` has to drop it explicitly to break the cycle.
#[derive(Default)]
pub struct FrameLoop {
    tick: Tick,
    pending: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
}

fn request(tick: &Tick, pending: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => pending.set(Some(id)),
            Err(e) => log::warn!("[frame] requestAnimationFrame failed: {:?}", e),
        }
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start calling `on_frame` once per display frame. A no-op if already running.
    pub fn start(&self, mut on_frame: impl FnMut() + 'static) {
        if self.running.replace(true) {
            return;
        }
        let tick_self = self.tick.clone();
        let pending = self.pending.clone();
        let running = self.running.clone();
        *self.tick.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
            pending.set(None);
            if !running.get() {
                return;
            }
            on_frame();
            if running.get() {
                request(&tick_self, &pending);
            }
        }) as Box<dyn FnMut(f64)>));
        request(&self.tick, &self.pending);
    }

    pub fn stop(&self) {
        self.running.set(false);
        if let Some(id) = self.pending.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        if let Ok(mut slot) = self.tick.try_borrow_mut() {
            slot.take();
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
