//! WebAssembly bindings for the drawing surface.
//!
//! The host page forwards DOM mouse/touch events here; strokes are rasterized
//! in Rust and the page blits [`WasmSurface::pixels`] into its canvas.

use sketch_core::{
    AttributeChange, CanvasBounds, PointerEvent, Rgb, TouchEvent as CoreTouchEvent, TouchPhase,
    TouchPoint,
};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

use crate::{DrawingSurface, SurfaceConfig};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
}

/// A drawing surface bound to a DOM canvas element.
#[wasm_bindgen]
pub struct WasmSurface {
    canvas: HtmlCanvasElement,
    surface: DrawingSurface,
}

#[wasm_bindgen]
impl WasmSurface {
    /// Create a surface sized to the canvas element.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let config = SurfaceConfig::with_size(canvas.width(), canvas.height());
        Self {
            canvas,
            surface: DrawingSurface::new(config),
        }
    }

    /// Mouse button pressed.
    #[wasm_bindgen(js_name = mouseDown)]
    pub fn mouse_down(&mut self, event: &MouseEvent) {
        self.refresh_bounds();
        self.surface.begin(&mouse_event(event));
    }

    /// Mouse moved.
    #[wasm_bindgen(js_name = mouseMove)]
    pub fn mouse_move(&mut self, event: &MouseEvent) {
        self.surface.extend(&mouse_event(event));
    }

    /// Mouse released or left the canvas.
    #[wasm_bindgen(js_name = mouseUp)]
    pub fn mouse_up(&mut self) {
        self.surface.end();
    }

    /// Finger down.
    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&mut self, event: &TouchEvent) {
        self.refresh_bounds();
        self.surface.begin(&touch_event(event, TouchPhase::Start));
    }

    /// Finger dragged. Claims the gesture from page scrolling while drawing.
    #[wasm_bindgen(js_name = touchMove)]
    pub fn touch_move(&mut self, event: &TouchEvent) {
        let propagation = self.surface.extend(&touch_event(event, TouchPhase::Move));
        if propagation.prevents_default() {
            event.prevent_default();
        }
    }

    /// Finger lifted.
    #[wasm_bindgen(js_name = touchEnd)]
    pub fn touch_end(&mut self) {
        self.surface.end();
    }

    /// Clear the drawing.
    pub fn reset(&mut self) {
        self.surface.reset();
    }

    /// Select a pencil color (`#rrggbb`) and switch back to drawing.
    ///
    /// # Errors
    ///
    /// Returns an error string if the color is not valid hex.
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, hex: &str) -> Result<(), JsValue> {
        let color = Rgb::from_hex(hex).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.surface.set_attributes(&AttributeChange::swatch(color));
        Ok(())
    }

    /// Select a pencil width.
    #[wasm_bindgen(js_name = setWidth)]
    pub fn set_width(&mut self, width: f32) {
        self.surface.set_attributes(&AttributeChange::width(width));
    }

    /// Turn the eraser on or off.
    #[wasm_bindgen(js_name = setEraser)]
    pub fn set_eraser(&mut self, erase: bool) {
        self.surface.set_attributes(&AttributeChange::eraser(erase));
    }

    /// The drawing as a PNG data URL.
    #[wasm_bindgen(js_name = captureDataUrl)]
    #[must_use]
    pub fn capture_data_url(&self) -> Option<String> {
        self.surface.capture().map(|capture| capture.to_data_url())
    }

    /// RGBA pixels for `putImageData`.
    #[must_use]
    pub fn pixels(&self) -> Option<Vec<u8>> {
        self.surface.rgba_pixels()
    }
}

impl WasmSurface {
    #[allow(clippy::cast_possible_truncation)]
    fn refresh_bounds(&mut self) {
        let rect = self.canvas.get_bounding_client_rect();
        self.surface
            .set_bounds(CanvasBounds::new(rect.left() as f32, rect.top() as f32));
    }
}

#[allow(clippy::cast_precision_loss)]
fn mouse_event(event: &MouseEvent) -> PointerEvent {
    PointerEvent::mouse(event.client_x() as f32, event.client_y() as f32)
}

#[allow(clippy::cast_precision_loss)]
fn touch_event(event: &TouchEvent, phase: TouchPhase) -> PointerEvent {
    let list = event.touches();
    let touches = (0..list.length())
        .filter_map(|idx| list.get(idx))
        .map(|touch| TouchPoint {
            id: u32::try_from(touch.identifier()).unwrap_or_default(),
            client_x: touch.client_x() as f32,
            client_y: touch.client_y() as f32,
            pressure: None,
        })
        .collect();
    PointerEvent::Touch(CoreTouchEvent::new(phase, touches, 0))
}
