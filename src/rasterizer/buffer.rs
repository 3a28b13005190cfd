//! Owned pixel grid used both as framebuffer and as decoded image

use super::types::Color;
use crate::error::{RasterError, Result};

/// Row-major grid of [`Color`]s; pixel `(x, y)` lives at `y * width + x`.
///
/// A buffer has exactly one owner. It is handed over by value (loader to render
/// loop, render loop back to `main`) and is never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Allocate a zero-filled buffer
    pub fn allocate(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(RasterError::OutOfMemory { width, height })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| RasterError::OutOfMemory { width, height })?;
        pixels.resize(len, Color::TRANSPARENT);

        Ok(Self { width, height, pixels })
    }

    /// Adopt already decoded pixels
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self> {
        if width == 0 || height == 0 || width.checked_mul(height) != Some(pixels.len()) {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height, pixels })
    }

    /// Free the pixel storage.
    ///
    /// Takes the buffer by value, so the old handle cannot be touched again:
    ///
    /// ```compile_fail
    /// use flatfill::rasterizer::ImageBuffer;
    ///
    /// let fb = ImageBuffer::allocate(4, 4).unwrap();
    /// fb.release();
    /// let _ = fb.get(0, 0);
    /// ```
    ///
    /// and a second release does not compile either:
    ///
    /// ```compile_fail
    /// use flatfill::rasterizer::ImageBuffer;
    ///
    /// let fb = ImageBuffer::allocate(4, 4).unwrap();
    /// fb.release();
    /// fb.release();
    /// ```
    pub fn release(self) {
        log::trace!("Releasing {}x{} image buffer", self.width, self.height);
        drop(self.pixels);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Linear index of `(x, y)`, if it is inside the buffer
    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Inverse of [`ImageBuffer::index_of`]
    pub fn coords_of(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.pixels.len()).then(|| (index % self.width, index / self.width))
    }

    pub fn get(&self, x: usize, y: usize) -> Result<Color> {
        let idx = self.checked_index(x, y)?;
        Ok(self.pixels[idx])
    }

    pub fn set(&mut self, x: usize, y: usize, color: Color) -> Result<()> {
        let idx = self.checked_index(x, y)?;
        self.pixels[idx] = color;
        Ok(())
    }

    fn checked_index(&self, x: usize, y: usize) -> Result<usize> {
        self.index_of(x, y).ok_or(RasterError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    pub fn row(&self, y: usize) -> Option<&[Color]> {
        (y < self.height).then(|| &self.pixels[y * self.width..(y + 1) * self.width])
    }

    pub fn row_mut(&mut self, y: usize) -> Option<&mut [Color]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&mut self.pixels[start..start + self.width])
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Fill a rectangle, clipped to the buffer
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u64, h: u64, color: Color) {
        let (width, height) = (self.width as i64, self.height as i64);
        let x1 = x.saturating_add(i64::try_from(w).unwrap_or(i64::MAX));
        let y1 = y.saturating_add(i64::try_from(h).unwrap_or(i64::MAX));
        let (x0, x1) = (x.clamp(0, width) as usize, x1.clamp(0, width) as usize);
        let (y0, y1) = (y.clamp(0, height) as usize, y1.clamp(0, height) as usize);
        if x0 >= x1 {
            return;
        }
        for row in y0..y1 {
            if let Some(pixels) = self.row_mut(row) {
                pixels[x0..x1].fill(color);
            }
        }
    }

    /// Flat byte copy in boundary channel order (R, G, B, A per pixel)
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_bytes()).collect()
    }
}
