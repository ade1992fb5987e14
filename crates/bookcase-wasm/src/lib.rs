//! WebAssembly bindings for the bookcase configurator.
//!
//! The host owns the canvas and the render loop. It reads meshes from
//! [`BookcaseConfigurator::meshes`], forwards pointer events, and listens for
//! configuration changes.
//!
//! ## Example
//!
//! ```js
//! import { BookcaseConfigurator } from 'bookcase-configurator';
//!
//! const configurator = new BookcaseConfigurator();
//! configurator.setViewport(canvas.width, canvas.height);
//! configurator.onChange((config) => form.update(config));
//!
//! canvas.addEventListener('pointermove', (e) => {
//!   const outcome = configurator.pointerMove(e.offsetX, e.offsetY);
//!   canvas.style.cursor = outcome.cursor;
//!   controls.enabled = outcome.orbitEnabled;
//! });
//!
//! configurator.applyPatch({ shelves: 6, color: '#8b4513' });
//! upload(configurator.meshes());
//! ```

use bookcase_core::{ConfigPatch, Configuration, RenderError};
use bookcase_interact::{Configurator, PointerEvent};
use bookcase_render_3d::{MemoryBackend, SceneOptions, Viewport};
use wasm_bindgen::prelude::*;

mod types;

pub use types::*;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
}

/// One configurator session for JavaScript.
#[wasm_bindgen]
pub struct BookcaseConfigurator {
    inner: Configurator<MemoryBackend>,
}

#[wasm_bindgen]
impl BookcaseConfigurator {
    /// Create a configurator with the default bookcase.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<BookcaseConfigurator, JsError> {
        let inner = Configurator::new(MemoryBackend::new()).map_err(render_error)?;
        Ok(Self { inner })
    }

    /// Create a configurator from a configuration object.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config: JsValue) -> Result<BookcaseConfigurator, JsError> {
        let config: Configuration = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsError::new(&format!("Invalid configuration: {}", e)))?;
        let inner = Configurator::with_config(MemoryBackend::new(), SceneOptions::default(), config)
            .map_err(render_error)?;
        Ok(Self { inner })
    }

    /// Get the version of the configurator.
    #[wasm_bindgen(js_name = version)]
    pub fn version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    /// Current configuration as a plain object.
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<JsValue, JsError> {
        to_js(self.inner.config())
    }

    /// Replace the configuration and rebuild.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: JsValue) -> Result<JsValue, JsError> {
        let config: Configuration = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsError::new(&format!("Invalid configuration: {}", e)))?;
        let report = self.inner.set_config(config).map_err(render_error)?;
        to_js(&SyncReportJs::from(&report))
    }

    /// Merge form-control values into the configuration and rebuild.
    #[wasm_bindgen(js_name = applyPatch)]
    pub fn apply_patch(&mut self, patch: JsValue) -> Result<JsValue, JsError> {
        let patch: ConfigPatch = serde_wasm_bindgen::from_value(patch)
            .map_err(|e| JsError::new(&format!("Invalid patch: {}", e)))?;
        let report = self.inner.apply_patch(&patch).map_err(render_error)?;
        to_js(&SyncReportJs::from(&report))
    }

    /// Problems with the current configuration, as messages.
    #[wasm_bindgen]
    pub fn validate(&self) -> Vec<String> {
        self.inner
            .config()
            .validate()
            .iter()
            .map(|problem| problem.to_string())
            .collect()
    }

    /// Load a configuration from a JSON record and rebuild.
    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&mut self, json: &str) -> Result<JsValue, JsError> {
        let config = bookcase_export::config_from_json(json)
            .map_err(|e| JsError::new(&format!("Invalid record: {}", e)))?;
        let report = self.inner.set_config(config).map_err(render_error)?;
        to_js(&SyncReportJs::from(&report))
    }

    /// Current configuration as a JSON record.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsError> {
        bookcase_export::config_to_json(self.inner.config())
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    /// Resize the viewport used for pointer rays.
    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.inner.set_viewport(Viewport::new(width, height));
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Result<JsValue, JsError> {
        self.pointer(PointerEvent::Move { x, y })
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Result<JsValue, JsError> {
        self.pointer(PointerEvent::Down { x, y })
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f32, y: f32) -> Result<JsValue, JsError> {
        self.pointer(PointerEvent::Up { x, y })
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> Result<JsValue, JsError> {
        self.pointer(PointerEvent::Leave)
    }

    /// Orbit the camera by the given angles in radians.
    #[wasm_bindgen]
    pub fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.inner.camera_mut().orbit(delta_azimuth, delta_elevation);
    }

    #[wasm_bindgen]
    pub fn zoom(&mut self, factor: f32) {
        self.inner.camera_mut().zoom(factor);
    }

    #[wasm_bindgen(js_name = fitCamera)]
    pub fn fit_camera(&mut self) {
        self.inner.fit_camera();
    }

    /// Column-major view matrix.
    #[wasm_bindgen(js_name = viewMatrix)]
    pub fn view_matrix(&self) -> Vec<f32> {
        self.inner.camera().view_matrix().to_cols_array().to_vec()
    }

    /// Column-major projection matrix for the current viewport.
    #[wasm_bindgen(js_name = projectionMatrix)]
    pub fn projection_matrix(&self) -> Vec<f32> {
        let aspect = self.inner.viewport().aspect();
        self.inner.camera().projection_matrix(aspect).to_cols_array().to_vec()
    }

    /// Column-major model matrix shared by every solid.
    #[wasm_bindgen(js_name = rootMatrix)]
    pub fn root_matrix(&self) -> Vec<f32> {
        self.inner.scene().root_transform().to_cols_array().to_vec()
    }

    /// Pixel position of a world point in the current viewport, or
    /// `undefined` when it is behind the camera.
    #[wasm_bindgen(js_name = projectPoint)]
    pub fn project_point(&self, x: f32, y: f32, z: f32) -> Option<Vec<f32>> {
        self.inner
            .camera()
            .project(self.inner.viewport(), glam::Vec3::new(x, y, z))
            .map(|pixel| vec![pixel.x, pixel.y])
    }

    /// Every solid with its mesh and material.
    #[wasm_bindgen]
    pub fn meshes(&self) -> Result<JsValue, JsError> {
        let meshes: Vec<MeshJs> = self.inner.scene().solids().iter().map(MeshJs::from_node).collect();
        to_js(&meshes)
    }

    /// Highlighted compartment, or `null`.
    #[wasm_bindgen]
    pub fn highlight(&self) -> Result<JsValue, JsError> {
        match self.inner.scene().highlight() {
            Some(highlight) => to_js(&HighlightJs::from(highlight)),
            None => Ok(JsValue::NULL),
        }
    }

    /// Scene summary: generation, counts, root and bounds.
    #[wasm_bindgen(js_name = sceneInfo)]
    pub fn scene_info(&self) -> Result<JsValue, JsError> {
        to_js(&SceneInfoJs::from(self.inner.scene()))
    }

    #[wasm_bindgen(js_name = liveResources)]
    pub fn live_resources(&self) -> usize {
        self.inner.synchronizer().backend().live_count()
    }

    /// Export the visible solids to binary STL, including the drag offset.
    #[wasm_bindgen(js_name = exportStl)]
    pub fn export_stl(&self) -> Result<Vec<u8>, JsError> {
        let options = bookcase_export::ExportOptions {
            space: bookcase_export::ExportSpace::World,
            ..Default::default()
        };
        bookcase_export::export_stl_with_options(self.inner.scene(), &options)
            .map_err(|e| JsError::new(&format!("STL export error: {}", e)))
    }

    /// Export the visible solids to ASCII STL in model space.
    #[wasm_bindgen(js_name = exportStlAscii)]
    pub fn export_stl_ascii(&self) -> Result<String, JsError> {
        bookcase_export::export_stl_ascii(self.inner.scene())
            .map_err(|e| JsError::new(&format!("STL export error: {}", e)))
    }

    /// Called with the configuration after every applied edit.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: js_sys::Function) {
        self.inner.on_change(move |config: &Configuration| {
            if let Ok(value) = serde_wasm_bindgen::to_value(config) {
                report_callback_error(callback.call1(&JsValue::NULL, &value));
            }
        });
    }

    /// Called with `[x, y, z]` while the model is dragged.
    #[wasm_bindgen(js_name = onRootMoved)]
    pub fn on_root_moved(&mut self, callback: js_sys::Function) {
        self.inner.on_root_moved(move |position| {
            let array = js_sys::Float32Array::from(position.to_array().as_slice());
            report_callback_error(callback.call1(&JsValue::NULL, &array));
        });
    }

    /// Called once with `{ kind, message }` when the scene can no longer be
    /// rebuilt.
    #[wasm_bindgen(js_name = onFatal)]
    pub fn on_fatal(&mut self, callback: js_sys::Function) {
        self.inner.on_fatal(move |err: &RenderError| {
            if let Ok(value) = serde_wasm_bindgen::to_value(&FatalJs::from(err)) {
                report_callback_error(callback.call1(&JsValue::NULL, &value));
            }
        });
    }

    /// Release every resource. Call before dropping the object.
    #[wasm_bindgen]
    pub fn shutdown(&mut self) -> usize {
        self.inner.shutdown()
    }
}

impl BookcaseConfigurator {
    fn pointer(&mut self, event: PointerEvent) -> Result<JsValue, JsError> {
        let outcome = self.inner.handle_pointer(event).map_err(render_error)?;
        to_js(&OutcomeJs::from(&outcome))
    }
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn render_error(err: RenderError) -> JsError {
    JsError::new(&format!("Render error: {}", err))
}

fn report_callback_error(result: Result<JsValue, JsValue>) {
    if let Err(err) = result {
        web_sys::console::error_2(&JsValue::from_str("bookcase callback failed:"), &err);
    }
}
