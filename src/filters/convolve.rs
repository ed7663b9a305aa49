//! 3×3 integer convolution used by the gradient map.
//!
//! Convolution is "valid" only: an input of (H, W, C) yields an output of
//! (H-2, W-2, C), every output pixel having a full 3×3 neighborhood. Callers
//! that need full coverage pad the input first.
//!
//! ## Modes
//! - **Normal**: `sum / normalizer`, clamped to 0-255.
//! - **Signed**: `sum / normalizer`, clamped to -128..127 and stored with a
//!   +128 bias so that derivatives fit in a `u8` plane. Use [`signed_value`]
//!   to read them back.

use ndarray::{Array3, ArrayView3};

/// Noise suppression kernel, normalized by 32.
pub const SMOOTH_32: [[i32; 3]; 3] = [[1, 1, 1], [1, 24, 1], [1, 1, 1]];

/// Horizontal derivative (Sobel).
pub const HORZ_DERIV: [[i32; 3]; 3] = [[1, 0, -1], [2, 0, -2], [1, 0, -1]];

/// Vertical derivative (Sobel).
pub const VERT_DERIV: [[i32; 3]; 3] = [[1, 2, 1], [0, 0, 0], [-1, -2, -1]];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConvolveMode {
    Normal,
    Signed,
}

/// Bias applied to values produced in [`ConvolveMode::Signed`].
pub const SIGNED_BIAS: i32 = 128;

/// Decode a value written in [`ConvolveMode::Signed`].
#[inline]
pub fn signed_value(v: u8) -> i32 {
    v as i32 - SIGNED_BIAS
}

/// Convolve every channel of `input` with a 3×3 kernel.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `kernel` - Row-major kernel, applied without flipping
/// * `normalizer` - Divisor applied to the weighted sum (must be non-zero)
/// * `mode` - How the result is clamped and stored
///
/// # Returns
/// Image of shape (height-2, width-2, channels); empty when the input is
/// smaller than 3×3.
pub fn convolve_3x3(
    input: ArrayView3<u8>,
    kernel: &[[i32; 3]; 3],
    normalizer: i32,
    mode: ConvolveMode,
) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let out_h = height.saturating_sub(2);
    let out_w = width.saturating_sub(2);
    let mut output = Array3::<u8>::zeros((out_h, out_w, channels));
    let normalizer = if normalizer == 0 { 1 } else { normalizer };

    for y in 0..out_h {
        for x in 0..out_w {
            for c in 0..channels {
                let mut sum = 0i32;
                for (ky, row) in kernel.iter().enumerate() {
                    for (kx, &k) in row.iter().enumerate() {
                        sum += input[[y + ky, x + kx, c]] as i32 * k;
                    }
                }

                let value = sum / normalizer;
                output[[y, x, c]] = match mode {
                    ConvolveMode::Normal => value.clamp(0, 255) as u8,
                    ConvolveMode::Signed => (value.clamp(-128, 127) + SIGNED_BIAS) as u8,
                };
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_shape_is_valid_region() {
        let img = Array3::<u8>::zeros((10, 7, 3));
        let out = convolve_3x3(img.view(), &SMOOTH_32, 32, ConvolveMode::Normal);
        assert_eq!(out.dim(), (8, 5, 3));
    }

    #[test]
    fn test_tiny_input_gives_empty_output() {
        let img = Array3::<u8>::zeros((2, 2, 1));
        let out = convolve_3x3(img.view(), &SMOOTH_32, 32, ConvolveMode::Normal);
        assert_eq!(out.len(), 0);
    }

    #[test]
    fn test_smoothing_preserves_flat_image() {
        let img = Array3::<u8>::from_elem((5, 5, 1), 200);
        let out = convolve_3x3(img.view(), &SMOOTH_32, 32, ConvolveMode::Normal);
        assert!(out.iter().all(|&v| v == 200));
    }

    #[test]
    fn test_horizontal_derivative_sign_and_clamp() {
        // Bright left column, dark elsewhere
        let mut img = Array3::<u8>::zeros((3, 3, 1));
        for y in 0..3 {
            img[[y, 0, 0]] = 20;
        }
        let out = convolve_3x3(img.view(), &HORZ_DERIV, 1, ConvolveMode::Signed);
        assert_eq!(signed_value(out[[0, 0, 0]]), 80);

        for y in 0..3 {
            img[[y, 0, 0]] = 255;
        }
        let out = convolve_3x3(img.view(), &HORZ_DERIV, 1, ConvolveMode::Signed);
        assert_eq!(signed_value(out[[0, 0, 0]]), 127);

        let out = convolve_3x3(img.view(), &VERT_DERIV, 1, ConvolveMode::Signed);
        assert_eq!(signed_value(out[[0, 0, 0]]), 0);
    }
}
