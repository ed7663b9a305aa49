//! Link cost between neighboring pixels.
//!
//! The cost of stepping onto a pixel combines two terms:
//! - **Magnitude**: `255 - magnitude` of the pixel being entered, scaled by
//!   √2 for diagonal steps, weighted by `OMEGA_G`.
//! - **Direction**: how badly the gradient direction at both ends of the link
//!   agrees with the link orientation, weighted by `OMEGA_D`.
//!
//! Strong, consistently oriented edges are therefore cheap to follow, while
//! isolated high-magnitude noise still pays the direction penalty.

use std::sync::OnceLock;

use crate::selection::gradient::{GradientSample, NO_DIRECTION};

/// Weight of the gradient magnitude term.
pub const OMEGA_G: f32 = 0.8;

/// Weight of the gradient direction term.
pub const OMEGA_D: f32 = 0.2;

/// Step offsets for each link code.
///
/// ```text
/// +---+---+---+
/// | 7 | 5 | 6 |
/// +---+---+---+
/// | 4 |   | 0 |
/// +---+---+---+
/// | 2 | 1 | 3 |
/// +---+---+---+
/// ```
pub const MOVES: [(i32, i32); 8] = [
    (1, 0),
    (0, 1),
    (-1, 1),
    (1, 1),
    (-1, 0),
    (0, -1),
    (1, -1),
    (-1, -1),
];

/// Orientation class of a link: codes `k` and `k + 4` share class `k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkClass {
    Horizontal = 0,
    Vertical = 1,
    /// Down-left / up-right.
    AntiDiagonal = 2,
    /// Down-right / up-left.
    Diagonal = 3,
}

impl LinkClass {
    pub fn from_code(code: u8) -> Self {
        match code % 4 {
            0 => LinkClass::Horizontal,
            1 => LinkClass::Vertical,
            2 => LinkClass::AntiDiagonal,
            _ => LinkClass::Diagonal,
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(self, LinkClass::AntiDiagonal | LinkClass::Diagonal)
    }
}

/// Precomputed lookup tables for [`link_cost`].
pub struct CostTables {
    /// `round(i * √2)`.
    pub diagonal_weight: [u32; 256],
    /// Direction penalty per gradient direction code and link class.
    pub direction_value: [[u32; 4]; 256],
}

impl CostTables {
    fn build() -> Self {
        let mut diagonal_weight = [0u32; 256];
        let mut direction_value = [[0u32; 4]; 256];

        for i in 0..256usize {
            diagonal_weight[i] = (i as f32 * std::f32::consts::SQRT_2).round() as u32;

            let d = i as i32;
            direction_value[i] = [
                ((127 - (127 - d).abs()) * 2) as u32,
                ((127 - d).abs() * 2) as u32,
                ((191 - d).abs() * 2) as u32,
                ((63 - d).abs() * 2) as u32,
            ];
        }

        // Directionless pixels pay the highest penalty in every class
        direction_value[NO_DIRECTION as usize] = [255; 4];

        Self {
            diagonal_weight,
            direction_value,
        }
    }
}

/// Shared tables, built on first use.
pub fn tables() -> &'static CostTables {
    static TABLES: OnceLock<CostTables> = OnceLock::new();
    TABLES.get_or_init(CostTables::build)
}

/// Cost of the link between `pixel` and the `neighbor` sample reached by a
/// step of class `class`.
///
/// Only the magnitude at `pixel` counts; the direction term looks at both ends.
pub fn link_cost(pixel: GradientSample, neighbor: GradientSample, class: LinkClass) -> u32 {
    let tables = tables();
    let inverted = 255 - pixel.magnitude as usize;

    let magnitude_term = if class.is_diagonal() {
        tables.diagonal_weight[inverted] as f32
    } else {
        inverted as f32
    };

    let c = class as usize;
    let direction_term = (tables.direction_value[pixel.direction as usize][c]
        + tables.direction_value[neighbor.direction as usize][c]) as f32;

    (magnitude_term * OMEGA_G) as u32 + (direction_term * OMEGA_D) as u32
}
