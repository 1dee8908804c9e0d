//! Packed 3-bit-per-pixel surface.
//!
//! Eight pixels share one 3-byte group. Pixel `n = y * width + x` lives in the group at byte
//! `(n / 8) * 3`; reading the group as a little-endian 24-bit word, the pixel occupies bits
//! `(7 - n % 8) * 3 ..+3`, so the first pixel of a group sits in the high bits of its last byte.
//! This is the format the display driver decodes, so it must stay bit exact.

use tracing::debug;

use crate::error::{SurfaceError, SurfaceResult};

pub const BITS_PER_PIXEL: usize = 3;
pub const PIXEL_MASK: u8 = (1 << BITS_PER_PIXEL) - 1;

const PIXELS_PER_GROUP: usize = 8;
const BYTES_PER_GROUP: usize = 3;

/// Bytes needed to store `width * height` packed pixels, rounded up to whole 3-byte groups.
#[inline]
pub fn packed_len(width: u8, height: u8) -> usize {
    let pixels = width as usize * height as usize;
    pixels.div_ceil(PIXELS_PER_GROUP) * BYTES_PER_GROUP
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u8,
    height: u8,
    data: Vec<u8>,
}

impl Surface {
    /// Allocates a surface. Pixel contents are unspecified until written or filled.
    pub fn new(width: u8, height: u8) -> Self {
        let len = packed_len(width, height);
        debug!(width, height, bytes = len, "allocating packed surface");
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// Adopts an existing packed buffer, e.g. a sprite baked into a binary.
    pub fn from_bytes(width: u8, height: u8, mut data: Vec<u8>) -> SurfaceResult<Self> {
        let expected = packed_len(width, height);
        if data.len() < expected {
            return Err(SurfaceError::BufferTooSmall {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        data.truncate(expected);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Raw packed storage, ready to hand to the display.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Reallocates storage for new dimensions. Existing pixels are not remapped.
    pub fn resize(&mut self, width: u8, height: u8) {
        let len = packed_len(width, height);
        debug!(
            from_w = self.width,
            from_h = self.height,
            width,
            height,
            bytes = len,
            "resizing packed surface"
        );
        self.width = width;
        self.height = height;
        self.data.resize(len, 0);
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    #[inline(always)]
    fn locate(&self, x: u8, y: u8) -> (usize, u32) {
        let n = y as usize * self.width as usize + x as usize;
        let base = (n / PIXELS_PER_GROUP) * BYTES_PER_GROUP;
        let shift = ((PIXELS_PER_GROUP - 1 - n % PIXELS_PER_GROUP) * BITS_PER_PIXEL) as u32;
        (base, shift)
    }

    #[inline(always)]
    fn load_group(&self, base: usize) -> u32 {
        let g = &self.data[base..base + BYTES_PER_GROUP];
        g[0] as u32 | (g[1] as u32) << 8 | (g[2] as u32) << 16
    }

    /// Writes the low three bits of `color` at `(x, y)`.
    ///
    /// Unchecked fast path: callers clip first. Coordinates outside the surface land on the
    /// wrong pixel or panic on the slice index.
    #[inline]
    pub fn set_pixel(&mut self, x: u8, y: u8, color: u8) {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} surface",
            self.width,
            self.height
        );
        let (base, shift) = self.locate(x, y);
        let mask = (PIXEL_MASK as u32) << shift;
        let group = (self.load_group(base) & !mask) | (((color & PIXEL_MASK) as u32) << shift);
        self.data[base] = group as u8;
        self.data[base + 1] = (group >> 8) as u8;
        self.data[base + 2] = (group >> 16) as u8;
    }

    /// Reads the 3-bit color at `(x, y)`. Same contract as [`Surface::set_pixel`].
    #[inline]
    pub fn get_pixel(&self, x: u8, y: u8) -> u8 {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} surface",
            self.width,
            self.height
        );
        let (base, shift) = self.locate(x, y);
        ((self.load_group(base) >> shift) as u8) & PIXEL_MASK
    }

    /// Checked write. Returns `false` and leaves the surface untouched when off-surface.
    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, color: u8) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        self.set_pixel(x as u8, y as u8, color);
        true
    }

    /// Checked read.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<u8> {
        self.contains(x, y)
            .then(|| self.get_pixel(x as u8, y as u8))
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: u8) {
        match color & PIXEL_MASK {
            // all-zero and all-one patterns are the same in every byte
            0b000 => self.data.fill(0x00),
            0b111 => self.data.fill(0xFF),
            c => {
                for y in 0..self.height {
                    for x in 0..self.width {
                        self.set_pixel(x, y, c);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_len_rounds_to_groups() {
        assert_eq!(packed_len(0, 0), 0);
        assert_eq!(packed_len(1, 1), 3);
        assert_eq!(packed_len(8, 1), 3);
        assert_eq!(packed_len(9, 1), 6);
        assert_eq!(packed_len(6, 1), 3);
        assert_eq!(packed_len(160, 120), 7200);
    }

    #[test]
    fn first_pixel_of_group_uses_high_bits() {
        let mut s = Surface::new(8, 1);
        s.fill(0);
        s.set_pixel(0, 0, 0b101);
        // bits 21..23 of the little-endian word are the top three bits of byte 2
        assert_eq!(s.as_bytes(), &[0x00, 0x00, 0b1010_0000]);

        s.fill(0);
        s.set_pixel(7, 0, 0b011);
        assert_eq!(s.as_bytes(), &[0b0000_0011, 0x00, 0x00]);

        s.fill(0);
        // pixel 5 straddles bytes 0 and 1 (bits 6..8)
        s.set_pixel(5, 0, 0b111);
        assert_eq!(s.as_bytes(), &[0b1100_0000, 0b0000_0001, 0x00]);
    }

    #[test]
    fn round_trip_every_phase_without_touching_neighbours() {
        let mut s = Surface::new(8, 3);
        for c in 0..=7u8 {
            for y in 0..3u8 {
                for x in 0..8u8 {
                    s.fill(0);
                    // seed neighbours with a pattern that differs from c
                    for ny in 0..3u8 {
                        for nx in 0..8u8 {
                            s.set_pixel(nx, ny, (nx + ny) % 8);
                        }
                    }
                    s.set_pixel(x, y, c);
                    assert_eq!(s.get_pixel(x, y), c, "pixel ({x},{y}) color {c}");
                    for ny in 0..3u8 {
                        for nx in 0..8u8 {
                            if (nx, ny) != (x, y) {
                                assert_eq!(s.get_pixel(nx, ny), (nx + ny) % 8);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn set_pixel_masks_color() {
        let mut s = Surface::new(4, 4);
        s.fill(0);
        s.set_pixel(1, 1, 0xFA);
        assert_eq!(s.get_pixel(1, 1), 0b010);
        assert_eq!(s.get_pixel(0, 1), 0);
        assert_eq!(s.get_pixel(2, 1), 0);
    }

    #[test]
    fn checked_access_rejects_outside() {
        let mut s = Surface::new(4, 4);
        s.fill(1);
        assert!(!s.put_pixel(-1, 0, 5));
        assert!(!s.put_pixel(4, 0, 5));
        assert!(!s.put_pixel(0, 4, 5));
        assert!(s.put_pixel(3, 3, 5));
        assert_eq!(s.pixel(3, 3), Some(5));
        assert_eq!(s.pixel(0, -1), None);
        assert_eq!(s.pixel(2, 2), Some(1));
    }

    #[test]
    fn from_bytes_checks_length() {
        let err = Surface::from_bytes(8, 2, vec![0; 5]).unwrap_err();
        assert_eq!(
            err,
            SurfaceError::BufferTooSmall {
                width: 8,
                height: 2,
                expected: 6,
                actual: 5
            }
        );
        let s = Surface::from_bytes(8, 1, vec![0xFF, 0xFF, 0xFF, 0xAA]).unwrap();
        assert_eq!(s.as_bytes().len(), 3);
        assert_eq!(s.get_pixel(4, 0), 7);
    }

    #[test]
    fn resize_reallocates() {
        let mut s = Surface::new(8, 1);
        s.resize(16, 16);
        assert_eq!((s.width(), s.height()), (16, 16));
        assert_eq!(s.as_bytes().len(), packed_len(16, 16));
        s.fill(4);
        assert_eq!(s.get_pixel(15, 15), 4);
    }
}
