//! Tool options for an intelligent scissors session.
//!
//! Options can be built in code or loaded from JSON. Every field has a
//! default, so a partial document only overrides what it names:
//!
//! ```json
//! { "operation": "add", "feather": true, "feather_radius": 4.0 }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScissorsError};
use crate::selection::mask::CombineOp;

/// Upper bound accepted for `feather_radius`.
pub const MAX_FEATHER_RADIUS: f32 = 100.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScissorsOptions {
    /// How a committed region is merged into the existing selection.
    pub operation: CombineOp,
    /// Blur the committed region before combining.
    pub feather: bool,
    pub feather_radius: f32,
    /// Keep a livewire from the last vertex to the cursor while placing seeds.
    pub interactive: bool,
    /// Side of the square window searched when snapping a seed to an edge.
    pub gradient_search: usize,
    /// Half the size of a vertex handle; also the loop-closing tolerance.
    pub point_halfwidth: i32,
    /// Fraction of the endpoint bounding box added to the search window.
    pub extend_by: f32,
    /// Fixed number of pixels added to the search window.
    pub fixed_margin: i32,
    /// Curves longer than this are not handed to the overlay.
    pub max_points: usize,
}

impl Default for ScissorsOptions {
    fn default() -> Self {
        Self {
            operation: CombineOp::Replace,
            feather: false,
            feather_radius: 10.0,
            interactive: false,
            gradient_search: 32,
            point_halfwidth: 4,
            extend_by: 0.2,
            fixed_margin: 5,
            max_points: 2048,
        }
    }
}

impl ScissorsOptions {
    /// Parse and validate options from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| ScissorsError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=MAX_FEATHER_RADIUS).contains(&self.feather_radius) {
            return Err(ScissorsError::InvalidOptions(format!(
                "feather_radius {} outside 0..={}",
                self.feather_radius, MAX_FEATHER_RADIUS
            )));
        }
        if self.gradient_search == 0 {
            return Err(ScissorsError::InvalidOptions(
                "gradient_search must be positive".into(),
            ));
        }
        if self.point_halfwidth < 0 || self.fixed_margin < 0 {
            return Err(ScissorsError::InvalidOptions(
                "point_halfwidth and fixed_margin must not be negative".into(),
            ));
        }
        if !self.extend_by.is_finite() || self.extend_by < 0.0 {
            return Err(ScissorsError::InvalidOptions(format!(
                "extend_by {} must be a non-negative number",
                self.extend_by
            )));
        }
        Ok(())
    }

    /// Feather radius to apply on commit, zero when feathering is off.
    pub fn effective_feather(&self) -> f32 {
        if self.feather {
            self.feather_radius
        } else {
            0.0
        }
    }
}
