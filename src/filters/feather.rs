//! Gaussian feathering of single-channel selection masks.
//!
//! A feather radius `r` picks the Gaussian that has fallen to 1/255 of its
//! peak at `r` pixels, so a hard edge fades out over about `r` pixels on each
//! side. The kernel is cut off at `r`.

use ndarray::{Array2, Axis};

/// Standard deviation for a feather radius.
pub fn feather_sigma(radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    radius / (2.0 * 255f32.ln()).sqrt()
}

/// Normalized weights for offsets `-ceil(radius)..=ceil(radius)`.
pub fn feather_kernel(radius: f32) -> Vec<f32> {
    let sigma = feather_sigma(radius);
    if sigma <= 0.0 {
        return vec![1.0];
    }

    let reach = radius.ceil() as i32;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f32> = (-reach..=reach)
        .map(|d| (-((d * d) as f32) / denom).exp())
        .collect();
    let total: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Blur every lane of `plane` along `axis`, repeating the edge values.
fn blur_lanes(plane: &mut Array2<f32>, axis: Axis, kernel: &[f32]) {
    let reach = kernel.len() / 2;
    let mut line: Vec<f32> = Vec::new();

    for mut lane in plane.lanes_mut(axis) {
        line.clear();
        line.extend(lane.iter().copied());
        let Some(last) = line.len().checked_sub(1) else {
            continue;
        };

        for (i, out) in lane.iter_mut().enumerate() {
            *out = kernel
                .iter()
                .enumerate()
                .map(|(k, &w)| line[(i + k).saturating_sub(reach).min(last)] * w)
                .sum();
        }
    }
}

/// Feather a mask by `radius` pixels.
///
/// # Arguments
/// * `mask` - Mask values 0-255, shape (height, width)
/// * `radius` - Feather radius in pixels; non-positive radii return a copy
pub fn feather_mask(mask: &Array2<u8>, radius: f32) -> Array2<u8> {
    if radius <= 0.0 || mask.is_empty() {
        return mask.clone();
    }

    let kernel = feather_kernel(radius);
    let mut plane = mask.mapv(f32::from);
    blur_lanes(&mut plane, Axis(1), &kernel);
    blur_lanes(&mut plane, Axis(0), &kernel);

    plane.mapv(|v| v.round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_reaches_radius() {
        let k = feather_kernel(4.0);
        assert_eq!(k.len(), 9);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        // Edge weight is 1/255 of the peak
        assert!((k[0] / k[4] - 1.0 / 255.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_radius_is_identity() {
        let mut mask = Array2::<u8>::zeros((4, 4));
        mask[[1, 1]] = 255;
        assert_eq!(feather_mask(&mask, 0.0), mask);
        assert_eq!(feather_kernel(0.0), vec![1.0]);
    }

    #[test]
    fn test_feather_softens_edge() {
        let mut mask = Array2::<u8>::zeros((1, 21));
        for x in 0..10 {
            mask[[0, x]] = 255;
        }
        let soft = feather_mask(&mask, 6.0);
        assert_eq!(soft[[0, 0]], 255);
        assert_eq!(soft[[0, 20]], 0);
        assert!(soft[[0, 9]] < 255 && soft[[0, 9]] > 0);
        assert!(soft[[0, 10]] > 0 && soft[[0, 10]] < 255);
    }

    #[test]
    fn test_feather_is_symmetric_across_axes() {
        let mut mask = Array2::<u8>::zeros((15, 15));
        mask[[7, 7]] = 255;
        let soft = feather_mask(&mask, 3.0);
        assert!(soft[[7, 5]].abs_diff(soft[[5, 7]]) <= 1);
        assert!(soft[[7, 9]].abs_diff(soft[[9, 7]]) <= 1);
        assert!(soft[[7, 7]] > soft[[7, 8]]);
    }
}
