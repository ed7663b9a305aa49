//! Read access to the image the scissors trace over.

use ndarray::{ArrayBase, Data, Ix3};

use crate::error::{Result, ScissorsError};

/// Random-access pixel reader.
///
/// The gradient map is the only consumer; it reads each source pixel a
/// handful of times while filling a tile and never writes back.
pub trait PixelSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn channels(&self) -> usize;

    /// Copy the channels of pixel (x, y) into `out[..channels()]`.
    fn read_pixel(&self, x: usize, y: usize, out: &mut [u8]) -> Result<()>;

    /// Number of leading channels that carry color (alpha excluded).
    fn color_channels(&self) -> usize {
        match self.channels() {
            2 => 1,
            4 => 3,
            c => c,
        }
    }
}

/// Images laid out as (height, width, channels), as everywhere else in the crate.
impl<S> PixelSource for ArrayBase<S, Ix3>
where
    S: Data<Elem = u8>,
{
    fn width(&self) -> usize {
        self.dim().1
    }

    fn height(&self) -> usize {
        self.dim().0
    }

    fn channels(&self) -> usize {
        self.dim().2
    }

    fn read_pixel(&self, x: usize, y: usize, out: &mut [u8]) -> Result<()> {
        let (height, width, channels) = self.dim();
        if x >= width || y >= height || out.len() < channels {
            return Err(ScissorsError::PixelRead { x, y });
        }
        for c in 0..channels {
            out[c] = self[[y, x, c]];
        }
        Ok(())
    }
}

/// Check that a channel count is one the gradient map understands.
pub fn check_channels(channels: usize) -> Result<()> {
    match channels {
        1..=4 => Ok(()),
        other => Err(ScissorsError::UnsupportedChannels(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_array_reads_pixels() {
        let mut img = Array3::<u8>::zeros((2, 3, 4));
        img[[1, 2, 0]] = 10;
        img[[1, 2, 3]] = 255;

        let mut px = [0u8; 4];
        img.read_pixel(2, 1, &mut px).unwrap();
        assert_eq!(px, [10, 0, 0, 255]);
        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 2);
        assert_eq!(img.color_channels(), 3);
    }

    #[test]
    fn test_out_of_bounds_read_fails() {
        let img = Array3::<u8>::zeros((2, 2, 1));
        let mut px = [0u8; 1];
        assert_eq!(
            img.view().read_pixel(2, 0, &mut px),
            Err(ScissorsError::PixelRead { x: 2, y: 0 })
        );
    }

    #[test]
    fn test_channel_check() {
        assert!(check_channels(3).is_ok());
        assert_eq!(check_channels(5), Err(ScissorsError::UnsupportedChannels(5)));
    }
}
