//! Scissors Rust Extensions
//!
//! Intelligent scissors (livewire) selection implemented in Rust, with
//! Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Images are `ndarray` arrays laid out (height, width, channels):
//! - **Grayscale**: (height, width, 1)
//! - **Grayscale + alpha**: (height, width, 2)
//! - **RGB**: (height, width, 3)
//! - **RGBA**: (height, width, 4)
//!
//! Only color channels feed the gradient map; alpha is ignored. Selections
//! are single-channel `u8` masks of shape (height, width).
//!
//! ## Modules
//! - [`selection`]: gradient map, path search, boundary editor, scan conversion
//! - [`filters`]: the convolution and feathering passes the selection uses
//! - [`config`]: tool options, loadable from JSON
//! - [`error`]: the crate error type

pub mod config;
pub mod error;
pub mod filters;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::ScissorsOptions;
pub use error::{Result, ScissorsError};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use ndarray::{Array2, Array3};
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::config::ScissorsOptions;
    use crate::error::ScissorsError;
    use crate::selection::editor::{Modifiers, ScissorsEditor};
    use crate::selection::gradient::GradientField;
    use crate::selection::mask::{CombineOp, SelectionMask};
    use crate::selection::source::check_channels;

    fn value_error(e: ScissorsError) -> PyErr {
        PyValueError::new_err(e.to_string())
    }

    // ========================================================================
    // Gradient Map
    // ========================================================================

    /// Compute the full gradient map of an image.
    ///
    /// # Returns
    /// Tuple of (magnitude, direction) arrays, each (height, width) u8.
    /// Direction 255 marks pixels too weak to carry a direction.
    #[pyfunction]
    pub fn gradient_map<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<(Bound<'py, PyArray2<u8>>, Bound<'py, PyArray2<u8>>)> {
        let input = image.as_array();
        let (height, width, channels) = input.dim();
        check_channels(channels).map_err(value_error)?;
        let mut field = GradientField::new(input);

        let mut magnitude = Array2::<u8>::zeros((height, width));
        let mut direction = Array2::<u8>::zeros((height, width));
        for y in 0..height {
            for x in 0..width {
                let s = field.sample(x as i32, y as i32);
                magnitude[[y, x]] = s.magnitude;
                direction[[y, x]] = s.direction;
            }
        }

        Ok((magnitude.into_pyarray(py), direction.into_pyarray(py)))
    }

    // ========================================================================
    // Editor Session
    // ========================================================================

    /// Intelligent scissors session over one image.
    ///
    /// Feed it pointer events; once the boundary is closed, a press inside it
    /// merges the region into `selection`.
    #[pyclass(name = "IntelligentScissors")]
    pub struct PyIntelligentScissors {
        editor: ScissorsEditor<Array3<u8>>,
        selection: SelectionMask,
    }

    #[pymethods]
    impl PyIntelligentScissors {
        /// # Arguments
        /// * `image` - Image (height, width, 1-4 channels)
        /// * `options_json` - Optional tool options as JSON
        #[new]
        #[pyo3(signature = (image, options_json=None))]
        fn new(image: PyReadonlyArray3<'_, u8>, options_json: Option<&str>) -> PyResult<Self> {
            let options = match options_json {
                Some(json) => ScissorsOptions::from_json_str(json).map_err(value_error)?,
                None => ScissorsOptions::default(),
            };
            let input = image.as_array().to_owned();
            let (height, width, _) = input.dim();
            let editor = ScissorsEditor::new(input, options).map_err(value_error)?;
            Ok(Self {
                editor,
                selection: SelectionMask::new(width, height),
            })
        }

        /// Pointer press. Returns "seed", "vertex", "split", "commit" or "ignored".
        #[pyo3(signature = (x, y, shift=false, ctrl=false))]
        fn press(&mut self, x: i32, y: i32, shift: bool, ctrl: bool) -> PyResult<&'static str> {
            let outcome = self
                .editor
                .press(x, y, Modifiers { shift, ctrl }, &mut self.selection)
                .map_err(value_error)?;
            Ok(outcome.name())
        }

        /// Pointer motion with the button held.
        #[pyo3(signature = (x, y, shift=false))]
        fn drag(&mut self, x: i32, y: i32, shift: bool) {
            self.editor.drag_active_vertex(
                x,
                y,
                Modifiers {
                    shift,
                    ctrl: false,
                },
            );
        }

        fn release(&mut self) {
            self.editor.release();
        }

        fn cancel(&mut self) {
            self.editor.cancel();
        }

        /// Merge the closed boundary into the selection.
        ///
        /// `feather_radius` overrides the configured feathering.
        #[pyo3(signature = (operation=None, feather_radius=None))]
        fn commit(&mut self, operation: Option<&str>, feather_radius: Option<f32>) -> PyResult<()> {
            let op = match operation {
                Some(name) => CombineOp::from_name(name).ok_or_else(|| {
                    PyValueError::new_err(format!("unknown combine operation: {name}"))
                })?,
                None => self.editor.options().operation,
            };
            self.editor
                .commit(&mut self.selection, op, feather_radius)
                .map_err(value_error)
        }

        #[pyo3(signature = (x, y, shift=false, ctrl=false))]
        fn hover(&self, x: i32, y: i32, shift: bool, ctrl: bool) -> String {
            self.editor.hover(x, y, Modifiers { shift, ctrl }).label()
        }

        #[getter]
        fn connected(&self) -> bool {
            self.editor.is_connected()
        }

        /// Traced points of every curve, each running end to start.
        fn curves(&self) -> Vec<Vec<(i32, i32)>> {
            self.editor
                .current_curves()
                .curves()
                .iter()
                .map(|c| c.points.iter().map(|p| (p.x, p.y)).collect())
                .collect()
        }

        /// Overlay shapes as JSON.
        fn overlay_json(&self) -> PyResult<String> {
            serde_json::to_string(&self.editor.overlay())
                .map_err(|e| PyValueError::new_err(e.to_string()))
        }

        /// Current selection mask (height, width).
        fn selection<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<u8>> {
            self.selection.as_array().clone().into_pyarray(py)
        }
    }

    /// Python module definition
    #[pymodule]
    pub fn scissors_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(gradient_map, m)?)?;
        m.add_class::<PyIntelligentScissors>()?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::scissors_rust;
