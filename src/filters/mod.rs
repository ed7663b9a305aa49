//! Raster filters used by the selection tools.
//!
//! | Module | Input | Output |
//! |--------|-------|--------|
//! | `convolve` | (H, W, C) u8 | (H-2, W-2, C) u8, normal or biased-signed |
//! | `feather` | (H, W) u8 mask | (H, W) u8 mask |
//!
//! Both are single-threaded and allocation-light; tiles and masks are small
//! enough that the gradient map and commit path never need more.

pub mod convolve;
pub mod feather;

pub use convolve::{convolve_3x3, ConvolveMode};
pub use feather::feather_mask;
