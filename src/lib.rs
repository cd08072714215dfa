//! WebAssembly host for the portfolio's generative sketches.
//!
//! The page calls `mount()` once its layout is in place. Each known
//! container (`hero-container`, `text-container-1`, `text-container-2`) that
//! exists and has a size gets a `<canvas>` and its sketch; the rest are
//! retried every 50 ms for up to 30 attempts. `unmount()` stops the loop and
//! removes every canvas.
//!
//! | Module | Role |
//! |--------|------|
//! | [`host`] | Container registry, generic over a [`host::Stage`] |
//! | [`retry`] | Bounded retry schedule |
//! | [`error`] | [`error::HostError`] |
//! | `web` | DOM stage and canvas-backed surface (feature `web`) |
//! | `runtime` | Thread-local runtime, animation loop, timers (feature `web`) |
//!
//! Everything outside `web`/`runtime` compiles natively, so the lifecycle
//! logic is tested without a browser.

pub mod error;
pub mod host;
pub mod retry;

#[cfg(feature = "web")]
mod runtime;
#[cfg(feature = "web")]
pub mod web;

pub use error::HostError;

#[cfg(feature = "web")]
mod exports {
    use sketches::SketchConfig;
    use wasm_bindgen::prelude::wasm_bindgen;

    use crate::runtime;

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            log::debug!("logger already installed: {err}");
        }
    }

    /// Bind every ready container with the stock configuration.
    #[wasm_bindgen]
    pub fn mount() {
        if let Err(err) = runtime::mount(SketchConfig::default()) {
            log::warn!("mount: {err}");
        }
    }

    /// Bind every ready container with a JSON configuration. Missing fields
    /// take their defaults; a malformed config is logged and nothing mounts.
    #[wasm_bindgen(js_name = mountWithConfig)]
    pub fn mount_with_config(json: &str) {
        let result = SketchConfig::from_json(json).map_err(crate::HostError::from).and_then(runtime::mount);
        if let Err(err) = result {
            log::error!("mount: {err}");
        }
    }

    #[wasm_bindgen]
    pub fn unmount() {
        if let Err(err) = runtime::unmount() {
            log::warn!("unmount: {err}");
        }
    }

    /// Re-measure the container with this id and resize its sketch.
    #[wasm_bindgen(js_name = onResize)]
    pub fn on_resize(container_id: &str) {
        if let Err(err) = runtime::resize(container_id) {
            log::debug!("{container_id}: resize skipped: {err}");
        }
    }

    /// Click at hero-canvas coordinates; cycles the hero layout. This is the
    /// only click route: canvases carry no click listener of their own.
    #[wasm_bindgen(js_name = onPointerClick)]
    pub fn on_pointer_click(x: f64, y: f64) {
        if let Err(err) = runtime::click(x, y) {
            log::warn!("click: {err}");
        }
    }
}
