//! Selection masks and how new regions merge into them.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScissorsError};
use crate::filters::feather::feather_mask;

/// Single-channel selection, shape (height, width). 255 = selected, 0 = not
/// selected, values in between after feathering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionMask {
    data: Array2<u8>,
}

impl SelectionMask {
    /// Empty mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: Array2::zeros((height, width)),
        }
    }

    pub fn from_array(data: Array2<u8>) -> Self {
        Self { data }
    }

    /// Mask from row-major bytes.
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width * height;
        let actual = data.len();
        Array2::from_shape_vec((height, width), data)
            .map(Self::from_array)
            .map_err(|_| ScissorsError::SizeMismatch { expected, actual })
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Value at (x, y), 0 outside the mask.
    pub fn value(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 {
            return 0;
        }
        self.data.get((y as usize, x as usize)).copied().unwrap_or(0)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.value(x, y) > 0
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if let Some(v) = self.data.get_mut((y, x)) {
            *v = value;
        }
    }

    /// Number of pixels with a non-zero value.
    pub fn pixel_count(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0).count()
    }

    /// Bounding box of selected pixels as (x1, y1, x2, y2), inclusive.
    pub fn bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for ((y, x), &v) in self.data.indexed_iter() {
            if v == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x1, y1, x2, y2)) => (x1.min(x), y1.min(y), x2.max(x), y2.max(y)),
            });
        }
        bounds
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.data
    }

    pub fn into_array(self) -> Array2<u8> {
        self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }
}

/// How a new region merges into an existing selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineOp {
    /// Discard the existing selection.
    #[default]
    Replace,
    Add,
    Subtract,
    Intersect,
}

impl CombineOp {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "replace" => Some(CombineOp::Replace),
            "add" => Some(CombineOp::Add),
            "subtract" | "sub" => Some(CombineOp::Subtract),
            "intersect" => Some(CombineOp::Intersect),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CombineOp::Replace => "replace",
            CombineOp::Add => "add",
            CombineOp::Subtract => "subtract",
            CombineOp::Intersect => "intersect",
        }
    }
}

/// Merge `region` into `selection`.
///
/// # Arguments
/// * `selection` - Existing selection, updated in place
/// * `region` - New region, same size as `selection`
/// * `op` - Combine operator
/// * `feather_radius` - Blur `region` by this radius first; 0 for hard edges
pub fn combine_region(
    selection: &mut SelectionMask,
    region: &SelectionMask,
    op: CombineOp,
    feather_radius: f32,
) -> Result<()> {
    if selection.as_array().dim() != region.as_array().dim() {
        return Err(ScissorsError::SizeMismatch {
            expected: selection.width() * selection.height(),
            actual: region.width() * region.height(),
        });
    }

    let feathered;
    let region = if feather_radius > 0.0 {
        feathered = feather_mask(region.as_array(), feather_radius);
        &feathered
    } else {
        region.as_array()
    };

    match op {
        CombineOp::Replace => selection.data.assign(region),
        CombineOp::Add => selection
            .data
            .zip_mut_with(region, |s, &r| *s = s.saturating_add(r)),
        CombineOp::Subtract => selection
            .data
            .zip_mut_with(region, |s, &r| *s = s.saturating_sub(r)),
        CombineOp::Intersect => selection.data.zip_mut_with(region, |s, &r| *s = (*s).min(r)),
    }

    Ok(())
}
