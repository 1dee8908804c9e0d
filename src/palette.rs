//! Palette: maps 3-bit surface indices to displayable colors.

pub const PALETTE_LEN: usize = 16;

/// Color with 3-bit channels, the device's native depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb3 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb3 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r & 0b111,
            g: g & 0b111,
            b: b & 0b111,
        }
    }

    /// Expands to 0RGB u32 for a softbuffer surface.
    #[inline]
    pub fn to_xrgb(self) -> u32 {
        pack_rgb(widen(self.r), widen(self.g), widen(self.b))
    }

    #[inline]
    pub fn to_gpio(self) -> u16 {
        gpio_from_rgb(self.r, self.g, self.b)
    }
}

#[inline]
fn widen(c: u8) -> u8 {
    ((c as u16 * 255) / 7) as u8
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

/// Scatters 3-bit channels onto the display's parallel bus pins.
pub fn gpio_from_rgb(r: u8, g: u8, b: u8) -> u16 {
    let (r, g, b) = (r as u16, g as u16, b as u16);
    ((r & 0b100) >> 1)
        | ((r & 0b010) << 9)
        | ((r & 0b001) << 11)
        | ((g & 0b100) << 10)
        | ((g & 0b010) << 12)
        | ((g & 0b001) << 14)
        | ((b & 0b111) << 5)
}

/// Inverse of [`gpio_from_rgb`].
pub fn rgb_from_gpio(bus: u16) -> Rgb3 {
    let r = ((bus << 1) & 0b100) | ((bus >> 9) & 0b010) | ((bus >> 11) & 0b001);
    let g = ((bus >> 10) & 0b100) | ((bus >> 12) & 0b010) | ((bus >> 14) & 0b001);
    let b = (bus >> 5) & 0b111;
    Rgb3::new(r as u8, g as u8, b as u8)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [Rgb3; PALETTE_LEN],
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}

impl Palette {
    /// Indices 0..=7 map to eight gray levels, the rest to black.
    pub fn grayscale() -> Self {
        let mut entries = [Rgb3::default(); PALETTE_LEN];
        for (i, e) in entries.iter_mut().take(8).enumerate() {
            *e = Rgb3::new(i as u8, i as u8, i as u8);
        }
        Self { entries }
    }

    pub fn set(&mut self, index: usize, color: Rgb3) {
        self.entries[index % PALETTE_LEN] = color;
    }

    #[inline]
    pub fn get(&self, index: u8) -> Rgb3 {
        self.entries[index as usize % PALETTE_LEN]
    }

    /// Lookup table from index to 0RGB, for expanding whole frames.
    pub fn to_xrgb_table(&self) -> [u32; PALETTE_LEN] {
        self.entries.map(Rgb3::to_xrgb)
    }

    /// Palette as the display expects it uploaded.
    pub fn to_gpio_table(&self) -> [u16; PALETTE_LEN] {
        self.entries.map(Rgb3::to_gpio)
    }
}
