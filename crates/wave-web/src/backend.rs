//! Compute backend that forwards to the compiled `wave-module` instance.
//!
//! The module is fetched and instantiated once. Calls go through its numeric
//! exports; the sample buffer is read straight out of the module's linear
//! memory through a cached `Float32Array` view.
//!
//! The module has its own linear memory, separate from the one the engine and
//! renderer run in, so one bulk `copy_to` per frame remains. Nothing else is
//! marshalled or allocated per frame.

use js_sys::{Array, Function, Object, Reflect, WebAssembly};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wave_core::{ComputeBackend, Result, WaveError, WaveProfile, WaveShape};
use web_sys as web;

fn load_err(e: JsValue) -> WaveError {
    WaveError::module_load(format!("{:?}", e))
}

fn export_fn(exports: &JsValue, name: &'static str) -> Result<Function> {
    Reflect::get(exports, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
        .ok_or(WaveError::MissingExport(name))
}

struct Exports {
    configure: Function,
    resize: Function,
    set_wave_shape: Function,
    add_source: Function,
    compute: Function,
    get_sample_count: Function,
    get_stride: Function,
    get_center_y: Function,
    get_source_count: Function,
    memory: WebAssembly::Memory,
}

impl Exports {
    fn resolve(exports: &JsValue) -> Result<Self> {
        let memory = Reflect::get(exports, &JsValue::from_str("memory"))
            .ok()
            .and_then(|v| v.dyn_into::<WebAssembly::Memory>().ok())
            .ok_or(WaveError::MissingExport("memory"))?;
        Ok(Self {
            configure: export_fn(exports, "configure")?,
            resize: export_fn(exports, "resize")?,
            set_wave_shape: export_fn(exports, "set_wave_shape")?,
            add_source: export_fn(exports, "add_source")?,
            compute: export_fn(exports, "compute")?,
            get_sample_count: export_fn(exports, "get_sample_count")?,
            get_stride: export_fn(exports, "get_stride")?,
            get_center_y: export_fn(exports, "get_center_y")?,
            get_source_count: export_fn(exports, "get_source_count")?,
            memory,
        })
    }
}

/// `Float32Array` over the module's sample buffer, valid while the module
/// keeps returning `ptr` and its memory has not grown.
struct SampleView {
    buffer: JsValue,
    ptr: u32,
    array: js_sys::Float32Array,
}

impl SampleView {
    fn matches(&self, buffer: &JsValue, ptr: u32, len: usize) -> bool {
        self.ptr == ptr && self.array.length() as usize == len && self.buffer == *buffer
    }
}

pub struct ModuleBackend {
    exports: Exports,
    view: Option<SampleView>,
    samples: Vec<f32>,
    stride: f32,
    center_y: f32,
    faulted: bool,
}

impl ModuleBackend {
    pub async fn load(url: &str) -> Result<Self> {
        let window = web::window().ok_or_else(|| WaveError::module_load("no window"))?;
        let resp = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(load_err)?
            .dyn_into::<web::Response>()
            .map_err(load_err)?;
        if !resp.ok() {
            return Err(WaveError::module_load(format!(
                "HTTP {} for {url}",
                resp.status()
            )));
        }
        let buf = JsFuture::from(resp.array_buffer().map_err(load_err)?)
            .await
            .map_err(load_err)?;
        let bytes = js_sys::Uint8Array::new(&buf).to_vec();
        let result = JsFuture::from(WebAssembly::instantiate_buffer(&bytes, &Object::new()))
            .await
            .map_err(load_err)?;
        let instance = Reflect::get(&result, &JsValue::from_str("instance")).map_err(load_err)?;
        let exports = Reflect::get(&instance, &JsValue::from_str("exports")).map_err(load_err)?;
        let exports = Exports::resolve(&exports)?;
        let mut backend = Self {
            exports,
            view: None,
            samples: Vec::new(),
            stride: 0.0,
            center_y: 0.0,
            faulted: false,
        };
        backend.stride = backend.query_f32(&backend.exports.get_stride, "get_stride")?;
        log::info!("[backend] module loaded from {url}");
        Ok(backend)
    }

    fn query_f32(&self, f: &Function, export: &'static str) -> Result<f32> {
        f.call0(&JsValue::NULL)
            .ok()
            .and_then(|v| v.as_f64())
            .map(|v| v as f32)
            .ok_or(WaveError::BadReturn { export })
    }

    /// Invoke an export; the first failure is logged, later ones are silent.
    fn invoke(&mut self, f: &Function, export: &'static str, args: &[f64]) -> Option<JsValue> {
        let argv = args.iter().map(|&a| JsValue::from_f64(a)).collect::<Array>();
        match f.apply(&JsValue::NULL, &argv) {
            Ok(v) => Some(v),
            Err(e) => {
                if !self.faulted {
                    self.faulted = true;
                    log::error!("[backend] module export `{export}` failed: {:?}", e);
                }
                None
            }
        }
    }

    fn refresh_layout(&mut self) {
        let count = self
            .exports
            .get_sample_count
            .call0(&JsValue::NULL)
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as usize;
        self.view = None;
        self.samples.clear();
        self.samples.resize(count, 0.0);
        if let Ok(cy) = self.query_f32(&self.exports.get_center_y, "get_center_y") {
            self.center_y = cy;
        }
    }
}

impl ComputeBackend for ModuleBackend {
    fn name(&self) -> &'static str {
        "module"
    }

    fn configure(&mut self, p: &WaveProfile) {
        let f = self.exports.configure.clone();
        let args = [
            p.global_frequency,
            p.global_amplitude,
            p.horizontal_influence,
            p.amplitude_dampening,
            p.linger_velocity_threshold,
            p.min_linger,
            p.max_linger,
        ]
        .map(f64::from);
        self.invoke(&f, "configure", &args);
    }

    fn resize(&mut self, width: f32, height: f32) {
        let f = self.exports.resize.clone();
        self.invoke(&f, "resize", &[width as f64, height as f64]);
        self.refresh_layout();
    }

    fn set_wave_shape(&mut self, shape: WaveShape) {
        let f = self.exports.set_wave_shape.clone();
        self.invoke(
            &f,
            "set_wave_shape",
            &[shape.freq as f64, shape.speed as f64, shape.amp as f64],
        );
    }

    fn add_source(&mut self, x: f32, y: f32, t: f64, intensity: f32) {
        let f = self.exports.add_source.clone();
        self.invoke(&f, "add_source", &[x as f64, y as f64, t, intensity as f64]);
    }

    fn compute(&mut self, now: f64, phase: f64) -> &[f32] {
        let ptr = self
            .exports
            .compute
            .call2(&JsValue::NULL, &JsValue::from_f64(now), &JsValue::from_f64(phase))
            .ok()
            .and_then(|v| v.as_f64());
        match ptr {
            Some(ptr) if !self.samples.is_empty() => {
                let ptr = ptr as u32;
                let len = self.samples.len();
                // Growth swaps the memory's ArrayBuffer and detaches old views.
                let buffer = self.exports.memory.buffer();
                if !self.view.as_ref().is_some_and(|v| v.matches(&buffer, ptr, len)) {
                    log::debug!("[backend] mapping {len} samples at {ptr:#x}");
                    let array =
                        js_sys::Float32Array::new_with_byte_offset_and_length(&buffer, ptr, len as u32);
                    self.view = Some(SampleView { buffer, ptr, array });
                }
                if let Some(view) = &self.view {
                    view.array.copy_to(&mut self.samples);
                }
            }
            Some(_) => {}
            None => {
                if !self.faulted {
                    self.faulted = true;
                    log::error!("[backend] module export `compute` failed");
                }
            }
        }
        &self.samples
    }

    fn sample_count(&self) -> usize {
        self.samples.len()
    }

    fn stride(&self) -> f32 {
        self.stride
    }

    fn center_y(&self) -> f32 {
        self.center_y
    }

    fn source_count(&self) -> usize {
        self.exports
            .get_source_count
            .call0(&JsValue::NULL)
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as usize
    }
}
