//! WebAssembly exports for the intelligent scissors.
//!
//! These are exposed to JavaScript via wasm-bindgen. Images cross the
//! boundary as flat byte arrays of `width * height * channels` values,
//! selections as `width * height` bytes.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::config::ScissorsOptions;
use crate::error::ScissorsError;
use crate::selection::editor::{Modifiers, ScissorsEditor};
use crate::selection::mask::{CombineOp, SelectionMask};

// ============================================================================
// Editor Session
// ============================================================================

/// One scissors session over one image.
#[wasm_bindgen]
pub struct ScissorsSession {
    editor: ScissorsEditor<Array3<u8>>,
    selection: SelectionMask,
}

#[wasm_bindgen]
impl ScissorsSession {
    /// Create a session.
    ///
    /// # Arguments
    /// * `data` - Flat image bytes (length = width * height * channels)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `channels` - 1 to 4
    /// * `options_json` - Optional tool options as JSON
    #[wasm_bindgen(constructor)]
    pub fn new(
        data: &[u8],
        width: usize,
        height: usize,
        channels: usize,
        options_json: Option<String>,
    ) -> Result<ScissorsSession, JsError> {
        let options = match options_json {
            Some(json) => ScissorsOptions::from_json_str(&json)?,
            None => ScissorsOptions::default(),
        };
        let image = Array3::from_shape_vec((height, width, channels), data.to_vec()).map_err(
            |_| ScissorsError::SizeMismatch {
                expected: width * height * channels,
                actual: data.len(),
            },
        )?;
        let editor = ScissorsEditor::new(image, options)?;
        Ok(ScissorsSession {
            editor,
            selection: SelectionMask::new(width, height),
        })
    }

    /// Pointer press. Returns "seed", "vertex", "split", "commit" or "ignored".
    ///
    /// A "commit" press has already merged the region into the selection.
    pub fn press(&mut self, x: i32, y: i32, shift: bool, ctrl: bool) -> Result<String, JsError> {
        let outcome = self
            .editor
            .press(x, y, Modifiers { shift, ctrl }, &mut self.selection)?;
        Ok(outcome.name().to_string())
    }

    /// Pointer motion with the button held.
    pub fn drag(&mut self, x: i32, y: i32, shift: bool) {
        self.editor
            .drag_active_vertex(x, y, Modifiers { shift, ctrl: false });
    }

    pub fn release(&mut self) {
        self.editor.release();
    }

    pub fn cancel(&mut self) {
        self.editor.cancel();
    }

    /// Merge the closed boundary into the selection with the named operator
    /// ("replace", "add", "subtract", "intersect").
    ///
    /// `feather_radius` overrides the configured feathering.
    pub fn commit(&mut self, operation: &str, feather_radius: Option<f32>) -> Result<(), JsError> {
        let op = CombineOp::from_name(operation)
            .ok_or_else(|| JsError::new(&format!("unknown combine operation: {operation}")))?;
        self.editor.commit(&mut self.selection, op, feather_radius)?;
        Ok(())
    }

    pub fn hover(&self, x: i32, y: i32, shift: bool, ctrl: bool) -> String {
        self.editor.hover(x, y, Modifiers { shift, ctrl }).label()
    }

    pub fn is_connected(&self) -> bool {
        self.editor.is_connected()
    }

    /// Overlay shapes (curves, vertices, livewire, guides) as JSON.
    pub fn overlay_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.editor.overlay())?)
    }

    /// Current selection, `width * height` bytes.
    pub fn selection(&self) -> Vec<u8> {
        self.selection.clone().into_vec()
    }
}
