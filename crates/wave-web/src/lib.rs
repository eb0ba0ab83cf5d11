#![cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

mod backend;
mod dom;
mod frame;
mod input;
mod listeners;
mod mount;
mod surface;

pub use backend::ModuleBackend;
pub use mount::{mount, MountOptions, MountedWave};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("wave-web ready");
    Ok(())
}
