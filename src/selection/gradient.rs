//! Lazily computed gradient map.
//!
//! Each pixel of the source image gets a [`GradientSample`]: a saturated
//! magnitude and a quantized direction. Samples are computed one 64×64 tile
//! at a time, the first time any pixel of the tile is asked for, and are
//! never recomputed for the lifetime of the field.
//!
//! ## Per-tile pipeline
//! 1. Read the tile plus a 2-pixel apron (clamped at the image edge).
//! 2. Smooth with the 1-24-1 kernel normalized by 32.
//! 3. Horizontal and vertical Sobel derivatives per color channel, clamped
//!    to -128..127.
//! 4. Keep the channel with the largest absolute response in each direction.
//! 5. Magnitude scaled so that `MAX_GRADIENT` maps to 255; direction scaled
//!    from -π/2..π/2 to 0..254, with 255 meaning "no reliable direction".
//!
//! The outer ring of every tile is stored as [`GradientSample::EMPTY`], so
//! a tile never depends on samples of its neighbors. Interior pixels next to
//! the ring read their context from the apron.

use ndarray::{Array3, ArrayView3};

use crate::error::{Result, ScissorsError};
use crate::filters::convolve::{
    convolve_3x3, signed_value, ConvolveMode, HORZ_DERIV, SMOOTH_32, VERT_DERIV,
};
use crate::selection::source::{check_channels, PixelSource};

/// Side of a gradient tile in pixels.
pub const TILE_SIZE: usize = 64;

/// Largest derivative response: sqrt(127² + 127²).
pub const MAX_GRADIENT: f32 = 179.606;

/// Magnitudes at or below this carry no direction.
pub const MIN_GRADIENT: u8 = 63;

/// Direction code reserved for weak gradients.
pub const NO_DIRECTION: u8 = 255;

/// Extra pixels read around a tile: one for smoothing, one for the derivative.
const APRON: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GradientSample {
    pub magnitude: u8,
    pub direction: u8,
}

impl GradientSample {
    /// Zero magnitude, no direction. Returned for anything that cannot be computed.
    pub const EMPTY: GradientSample = GradientSample {
        magnitude: 0,
        direction: NO_DIRECTION,
    };

    pub fn new(magnitude: u8, direction: u8) -> Self {
        Self {
            magnitude,
            direction,
        }
    }

    pub fn has_direction(&self) -> bool {
        self.direction != NO_DIRECTION
    }
}

impl Default for GradientSample {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Convert the strongest horizontal and vertical responses into a sample.
pub fn gradient_sample(hmax: i32, vmax: i32) -> GradientSample {
    let gradient = ((hmax * hmax + vmax * vmax) as f32).sqrt();
    let magnitude = (gradient * 255.0 / MAX_GRADIENT).min(255.0) as u8;

    if magnitude <= MIN_GRADIENT {
        return GradientSample::new(magnitude, NO_DIRECTION);
    }

    let angle = if hmax == 0 {
        if vmax > 0 {
            std::f32::consts::FRAC_PI_2
        } else {
            -std::f32::consts::FRAC_PI_2
        }
    } else {
        (vmax as f32 / hmax as f32).atan()
    };

    // -π/2..π/2 onto 0..254
    let direction = (254.0 * (angle + std::f32::consts::FRAC_PI_2) / std::f32::consts::PI)
        .round()
        .clamp(0.0, 254.0) as u8;

    GradientSample::new(magnitude, direction)
}

/// Gradient map over a pixel source, filled per tile on first access.
pub struct GradientField<S> {
    source: Option<S>,
    width: usize,
    height: usize,
    tiles_x: usize,
    tiles_y: usize,
    tiles: Vec<Option<Box<[GradientSample]>>>,
}

impl<S: PixelSource> GradientField<S> {
    /// Create an empty field; nothing is computed until the first sample.
    pub fn new(source: S) -> Self {
        let (width, height) = (source.width(), source.height());
        let tiles_x = width.div_ceil(TILE_SIZE);
        let tiles_y = height.div_ceil(TILE_SIZE);
        Self {
            source: Some(source),
            width,
            height,
            tiles_x,
            tiles_y,
            tiles: vec![None; tiles_x * tiles_y],
        }
    }

    /// Build a field from samples computed elsewhere, row-major.
    ///
    /// Every tile is present, so no source image is ever read.
    pub fn from_samples(width: usize, height: usize, samples: &[GradientSample]) -> Result<Self> {
        let expected = width * height;
        if samples.len() != expected {
            return Err(ScissorsError::SizeMismatch {
                expected,
                actual: samples.len(),
            });
        }

        let tiles_x = width.div_ceil(TILE_SIZE);
        let tiles_y = height.div_ceil(TILE_SIZE);
        let mut tiles = Vec::with_capacity(tiles_x * tiles_y);
        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let (x0, y0, tw, th) = tile_rect(width, height, tx, ty);
                let mut tile = Vec::with_capacity(tw * th);
                for y in y0..y0 + th {
                    tile.extend_from_slice(&samples[y * width + x0..y * width + x0 + tw]);
                }
                tiles.push(Some(tile.into_boxed_slice()));
            }
        }

        Ok(Self {
            source: None,
            width,
            height,
            tiles_x,
            tiles_y,
            tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    /// Tile grid dimensions (columns, rows).
    pub fn tile_grid(&self) -> (usize, usize) {
        (self.tiles_x, self.tiles_y)
    }

    /// Number of tiles computed (or supplied) so far.
    pub fn filled_tiles(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    /// Sample at (x, y); anything outside the image is [`GradientSample::EMPTY`].
    pub fn sample(&mut self, x: i32, y: i32) -> GradientSample {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return GradientSample::EMPTY;
        }
        let (x, y) = (x as usize, y as usize);
        let (tx, ty) = (x / TILE_SIZE, y / TILE_SIZE);
        let index = ty * self.tiles_x + tx;

        if self.tiles[index].is_none() {
            let tile = self.compute_tile(tx, ty);
            self.tiles[index] = Some(tile);
        }

        let (x0, y0, tw, _) = tile_rect(self.width, self.height, tx, ty);
        match &self.tiles[index] {
            Some(tile) => tile[(y - y0) * tw + (x - x0)],
            None => GradientSample::EMPTY,
        }
    }

    fn compute_tile(&self, tx: usize, ty: usize) -> Box<[GradientSample]> {
        let (x0, y0, tw, th) = tile_rect(self.width, self.height, tx, ty);
        let filled = match &self.source {
            Some(source) => fill_tile(source, x0, y0, tw, th),
            None => Err(ScissorsError::PixelRead { x: x0, y: y0 }),
        };

        match filled {
            Ok(tile) => {
                log::debug!("gradient tile ({tx}, {ty}) filled, {tw}x{th}");
                tile.into_boxed_slice()
            }
            Err(e) => {
                log::debug!("gradient tile ({tx}, {ty}) unavailable: {e}");
                vec![GradientSample::EMPTY; tw * th].into_boxed_slice()
            }
        }
    }
}

/// Origin and extent of tile (tx, ty), clipped to the image.
fn tile_rect(width: usize, height: usize, tx: usize, ty: usize) -> (usize, usize, usize, usize) {
    let x0 = tx * TILE_SIZE;
    let y0 = ty * TILE_SIZE;
    let tw = TILE_SIZE.min(width - x0);
    let th = TILE_SIZE.min(height - y0);
    (x0, y0, tw, th)
}

/// Compute the samples of one tile, row-major over (tw, th).
fn fill_tile<S: PixelSource>(
    source: &S,
    x0: usize,
    y0: usize,
    tw: usize,
    th: usize,
) -> Result<Vec<GradientSample>> {
    let (width, height) = (source.width(), source.height());
    let channels = source.channels();
    check_channels(channels)?;
    let color_channels = source.color_channels();

    // Tile plus apron, edge pixels replicated
    let region_w = tw + 2 * APRON;
    let region_h = th + 2 * APRON;
    let mut region = Array3::<u8>::zeros((region_h, region_w, color_channels));
    let mut pixel = vec![0u8; channels];

    for ry in 0..region_h {
        let sy = (y0 as isize + ry as isize - APRON as isize).clamp(0, height as isize - 1) as usize;
        for rx in 0..region_w {
            let sx =
                (x0 as isize + rx as isize - APRON as isize).clamp(0, width as isize - 1) as usize;
            source.read_pixel(sx, sy, &mut pixel)?;
            for c in 0..color_channels {
                region[[ry, rx, c]] = pixel[c];
            }
        }
    }

    let smoothed = convolve_3x3(region.view(), &SMOOTH_32, 32, ConvolveMode::Normal);
    let horz = convolve_3x3(smoothed.view(), &HORZ_DERIV, 1, ConvolveMode::Signed);
    let vert = convolve_3x3(smoothed.view(), &VERT_DERIV, 1, ConvolveMode::Signed);

    let mut tile = Vec::with_capacity(tw * th);
    for i in 0..th {
        for j in 0..tw {
            if i == 0 || j == 0 || i == th - 1 || j == tw - 1 {
                tile.push(GradientSample::EMPTY);
                continue;
            }

            let (hmax, vmax) = strongest_response(horz.view(), vert.view(), i, j);
            tile.push(gradient_sample(hmax, vmax));
        }
    }

    Ok(tile)
}

/// Channel with the largest absolute response, per direction.
fn strongest_response(horz: ArrayView3<u8>, vert: ArrayView3<u8>, y: usize, x: usize) -> (i32, i32) {
    let channels = horz.dim().2;
    let mut hmax = signed_value(horz[[y, x, 0]]);
    let mut vmax = signed_value(vert[[y, x, 0]]);
    for c in 1..channels {
        let h = signed_value(horz[[y, x, c]]);
        let v = signed_value(vert[[y, x, c]]);
        if h.abs() > hmax.abs() {
            hmax = h;
        }
        if v.abs() > vmax.abs() {
            vmax = v;
        }
    }
    (hmax, vmax)
}
