//! Intelligent scissors selection.
//!
//! Seeds placed by the user are joined by paths that follow image edges.
//! Leaves first:
//! - **source**: read access to the image
//! - **gradient**: per-tile gradient magnitude and direction, filled lazily
//! - **cost**: cost of stepping between neighboring pixels
//! - **solver**: windowed shortest-path sweep producing back-links
//! - **tracer**: back-links to pixel paths
//! - **snap**: moving a seed onto the strongest nearby edge
//! - **boundary**: curves and the boundary they form
//! - **scan_convert** / **mask**: filling a closed boundary and merging it
//!   into a selection
//! - **editor**: the press / drag / release state machine tying it together

pub mod boundary;
pub mod cost;
pub mod editor;
pub mod gradient;
pub mod mask;
pub mod scan_convert;
pub mod snap;
pub mod solver;
pub mod source;
pub mod tracer;

pub use boundary::{Boundary, Curve, Point};
pub use editor::{EditorState, HoverTarget, Modifiers, Overlay, PressOutcome, ScissorsEditor};
pub use gradient::{GradientField, GradientSample};
pub use mask::{combine_region, CombineOp, SelectionMask};
pub use scan_convert::scan_convert;
pub use source::PixelSource;
pub use tracer::calculate_curve;
