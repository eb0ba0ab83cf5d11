//! Mounting the wave engine onto a page canvas.

use crate::backend::ModuleBackend;
use crate::dom;
use crate::frame::FrameLoop;
use crate::input::{client_xy, RectCache};
use crate::listeners::{ListenerSet, SizeObserver, ThemeObserver};
use crate::surface::Canvas2dSurface;
use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wave_core::{
    is_outside_viewport, select_backend, ComputeBackend, InlineBackend, MotionPreference,
    WaveEngine, WaveProfile,
};
use web_sys as web;

type Slot = Rc<RefCell<Option<Mount>>>;

thread_local! {
    /// Live mounts by canvas id, so a second mount of the same canvas can
    /// tear the first one down.
    static MOUNTS: RefCell<FnvHashMap<String, Slot>> = RefCell::new(FnvHashMap::default());
}

#[wasm_bindgen]
#[derive(Clone, Debug)]
pub struct MountOptions {
    canvas_id: String,
    module_url: Option<String>,
    reduced_motion: bool,
    seed: Option<u64>,
}

#[wasm_bindgen]
impl MountOptions {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: String) -> Self {
        Self {
            canvas_id,
            module_url: None,
            reduced_motion: false,
            seed: None,
        }
    }

    /// URL of the compiled compute module. Without one the in-process
    /// backend is used.
    #[wasm_bindgen(js_name = setModuleUrl)]
    pub fn set_module_url(&mut self, url: String) {
        self.module_url = Some(url);
    }

    #[wasm_bindgen(js_name = setReducedMotion)]
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Fixes the wave-shape randomization. JS numbers are doubles, so the
    /// seed is truncated to an integer.
    #[wasm_bindgen(js_name = setSeed)]
    pub fn set_seed(&mut self, seed: f64) {
        self.seed = Some(seed.max(0.0) as u64);
    }
}

struct Mount {
    engine: Rc<RefCell<WaveEngine>>,
    frames: FrameLoop,
    listeners: ListenerSet,
    theme: Option<ThemeObserver>,
    size: Option<SizeObserver>,
}

impl Mount {
    fn teardown(mut self, id: &str) {
        self.frames.stop();
        self.listeners.remove_all();
        if let Some(t) = self.theme.take() {
            t.disconnect();
        }
        if let Some(s) = self.size.take() {
            s.disconnect();
        }
        log::info!("[mount] #{id} unmounted");
    }
}

/// Handle returned to JS for a mounted canvas.
#[wasm_bindgen]
pub struct MountedWave {
    id: String,
    slot: Slot,
}

#[wasm_bindgen]
impl MountedWave {
    /// Detach every listener and observer and cancel the pending frame.
    /// Calling it again is a no-op.
    pub fn unmount(&self) {
        let Some(mount) = self.slot.borrow_mut().take() else {
            return;
        };
        mount.teardown(&self.id);
        MOUNTS.with(|m| {
            let mut m = m.borrow_mut();
            if m.get(&self.id).is_some_and(|s| Rc::ptr_eq(s, &self.slot)) {
                m.remove(&self.id);
            }
        });
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Swap the tuning profile without remounting.
    #[wasm_bindgen(js_name = setReducedMotion)]
    pub fn set_reduced_motion(&self, reduced: bool) {
        if let Some(mount) = self.slot.borrow().as_ref() {
            let profile = MotionPreference::from_reduced(reduced).profile();
            mount.engine.borrow_mut().reconfigure(profile);
            log::info!("[mount] #{} reduced motion = {reduced}", self.id);
        }
    }

    #[wasm_bindgen(js_name = sourceCount)]
    pub fn source_count(&self) -> usize {
        self.slot
            .borrow()
            .as_ref()
            .map(|m| m.engine.borrow().source_count())
            .unwrap_or(0)
    }
}

fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}

async fn load_backend(
    url: Option<&str>,
    profile: WaveProfile,
) -> Box<dyn ComputeBackend> {
    let Some(url) = url else {
        log::info!("[backend] no module url; using inline");
        return Box::new(InlineBackend::new(profile));
    };
    let loaded = ModuleBackend::load(url)
        .await
        .map(|b| Box::new(b) as Box<dyn ComputeBackend>);
    select_backend(loaded, profile)
}

/// Mount the waveform on `<canvas id=options.canvas_id>`.
#[wasm_bindgen]
pub async fn mount(options: MountOptions) -> Result<MountedWave, JsValue> {
    mount_inner(options)
        .await
        .map_err(|e| JsValue::from_str(&format!("{e:#}")))
}

async fn mount_inner(options: MountOptions) -> anyhow::Result<MountedWave> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, &options.canvas_id)?;
    let id = options.canvas_id.clone();

    let profile = MotionPreference::from_reduced(options.reduced_motion).profile();
    let backend = load_backend(options.module_url.as_deref(), profile).await;

    // Nothing below awaits, so replacing the previous mount and registering
    // this one happen in the same task turn. A mount that finished while
    // this one was loading is the one replaced here.
    let previous = MOUNTS.with(|m| m.borrow_mut().remove(&id));
    if let Some(prev) = previous {
        if let Some(mount) = prev.borrow_mut().take() {
            log::warn!("[mount] #{id} already mounted; replacing");
            mount.teardown(&id);
        }
    }
    let seed = options.seed.unwrap_or_else(random_seed);
    let engine = Rc::new(RefCell::new(WaveEngine::new(profile, backend, seed)));
    let surface = Rc::new(RefCell::new(Canvas2dSurface::new(&canvas, &document)?));
    let rect = Rc::new(RefCell::new(RectCache::default()));

    let container = dom::container_of(&canvas);
    let apply_size = {
        let engine = engine.clone();
        let surface = surface.clone();
        let rect = rect.clone();
        let canvas = canvas.clone();
        move |w: f64, h: f64| {
            surface
                .borrow_mut()
                .resize(w, h, dom::device_pixel_ratio());
            engine.borrow_mut().resize(w as f32, h as f32);
            engine
                .borrow_mut()
                .set_foreground(dom::read_stroke_color(&canvas));
            rect.borrow_mut().refresh(&canvas);
        }
    };
    {
        let (w, h) = dom::css_size(&container);
        apply_size(w, h);
    }
    let size = SizeObserver::observe(&container, apply_size.clone())
        .map_err(|e| log::warn!("[mount] no ResizeObserver: {e}"))
        .ok();

    let mut listeners = ListenerSet::new();

    // Pointer movement over the canvas. A move while inactive counts as an
    // enter so a pointer that starts inside the page still activates.
    {
        let engine = engine.clone();
        let rect = rect.clone();
        let canvas_for_move = canvas.clone();
        listeners.add(&canvas, "mousemove", move |ev: web::Event| {
            let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
                return;
            };
            let now = instant::now();
            let mut eng = engine.borrow_mut();
            if !eng.pointer().active {
                rect.borrow_mut().refresh(&canvas_for_move);
                let (x, y) = rect.borrow().to_local(ev);
                eng.pointer_enter(x, y, now);
                return;
            }
            let (x, y) = rect.borrow().to_local(ev);
            eng.pointer_move(x, y, now);
        });
    }
    {
        let engine = engine.clone();
        let rect = rect.clone();
        let canvas = canvas.clone();
        listeners.add(&document, "mouseenter", move |ev: web::Event| {
            let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
                return;
            };
            rect.borrow_mut().refresh(&canvas);
            let (x, y) = rect.borrow().to_local(ev);
            engine.borrow_mut().pointer_enter(x, y, instant::now());
        });
    }
    {
        let engine = engine.clone();
        listeners.add(&document, "mouseleave", move |ev: web::Event| {
            let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
                return;
            };
            let (cx, cy) = client_xy(ev);
            let (vw, vh) = dom::viewport_size();
            if is_outside_viewport(cx, cy, vw, vh) {
                engine.borrow_mut().pointer_leave();
            }
        });
    }
    {
        let rect = rect.clone();
        let canvas = canvas.clone();
        listeners.add(&window, "scroll", move |_| rect.borrow_mut().refresh(&canvas));
    }
    if size.is_none() {
        let container = container.clone();
        listeners.add(&window, "resize", move |_| {
            let (w, h) = dom::css_size(&container);
            apply_size(w, h);
        });
    }

    let refresh_stroke = {
        let engine = engine.clone();
        let canvas = canvas.clone();
        move || {
            engine
                .borrow_mut()
                .set_foreground(dom::read_stroke_color(&canvas));
        }
    };
    if let Ok(Some(mq)) = window.match_media("(prefers-color-scheme: dark)") {
        let refresh = refresh_stroke.clone();
        listeners.add(&mq, "change", move |_| refresh());
    }
    let theme = ThemeObserver::observe(&document, refresh_stroke)
        .map_err(|e| log::warn!("[mount] no MutationObserver: {e}"))
        .ok();

    let frames = FrameLoop::new();
    {
        let engine = engine.clone();
        let surface = surface.clone();
        frames.start(move || {
            engine
                .borrow_mut()
                .frame(instant::now(), &mut *surface.borrow_mut());
        });
    }

    log::info!(
        "[mount] #{id} mounted ({} backend, {} listeners)",
        engine.borrow().backend_name(),
        listeners.len()
    );

    let slot: Slot = Rc::new(RefCell::new(Some(Mount {
        engine,
        frames,
        listeners,
        theme,
        size,
    })));
    MOUNTS.with(|m| m.borrow_mut().insert(id.clone(), slot.clone()));
    Ok(MountedWave { id, slot })
}
