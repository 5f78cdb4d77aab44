//! PPU register bitfields.
//!
//! PPUCTRL, PPUMASK and PPUSTATUS as bitflags, and the 15-bit "loopy" VRAM address used for
//! both the current (`v`) and temporary (`t`) registers.
//! See [PPU registers](https://www.nesdev.org/wiki/PPU_registers) and
//! [PPU scrolling](https://www.nesdev.org/wiki/PPU_scrolling).

use bitflags::bitflags;

bitflags! {
    /// $2000 PPUCTRL.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Control: u8 {
        const NAMETABLE_X = 1 << 0;
        const NAMETABLE_Y = 1 << 1;
        const INCREMENT_MODE = 1 << 2;
        const PATTERN_SPRITE = 1 << 3;
        const PATTERN_BACKGROUND = 1 << 4;
        const SPRITE_SIZE = 1 << 5;
        const SLAVE_MODE = 1 << 6;
        const ENABLE_NMI = 1 << 7;
    }
}

impl Control {
    /// VRAM address step after a $2007 access.
    pub fn increment(self) -> u16 {
        if self.contains(Control::INCREMENT_MODE) { 32 } else { 1 }
    }

    pub fn sprite_height(self) -> i16 {
        if self.contains(Control::SPRITE_SIZE) { 16 } else { 8 }
    }
}

bitflags! {
    /// $2001 PPUMASK.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Mask: u8 {
        const GRAYSCALE = 1 << 0;
        const RENDER_BACKGROUND_LEFT = 1 << 1;
        const RENDER_SPRITES_LEFT = 1 << 2;
        const RENDER_BACKGROUND = 1 << 3;
        const RENDER_SPRITES = 1 << 4;
        const ENHANCE_RED = 1 << 5;
        const ENHANCE_GREEN = 1 << 6;
        const ENHANCE_BLUE = 1 << 7;
    }
}

impl Mask {
    pub fn rendering(self) -> bool {
        self.intersects(Mask::RENDER_BACKGROUND | Mask::RENDER_SPRITES)
    }
}

bitflags! {
    /// $2002 PPUSTATUS. The low five bits read back as stale bus contents.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Status: u8 {
        const SPRITE_OVERFLOW = 1 << 5;
        const SPRITE_ZERO_HIT = 1 << 6;
        const VERTICAL_BLANK = 1 << 7;
    }
}

/// Packed scroll/address register.
///
/// ```text
/// 15 14-12  11  10  9-5     4-0
///  u fine_y ny  nx  coarse_y coarse_x
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Loopy(pub u16);

const COARSE_X: (u16, u16) = (0b11111, 0);
const COARSE_Y: (u16, u16) = (0b11111, 5);
const NAMETABLE_X: (u16, u16) = (0b1, 10);
const NAMETABLE_Y: (u16, u16) = (0b1, 11);
const FINE_Y: (u16, u16) = (0b111, 12);
const UNUSED: (u16, u16) = (0b1, 15);

impl Loopy {
    fn get(self, (mask, shift): (u16, u16)) -> u8 {
        ((self.0 >> shift) & mask) as u8
    }

    fn set(&mut self, (mask, shift): (u16, u16), value: u8) {
        self.0 &= !(mask << shift);
        self.0 |= (value as u16 & mask) << shift;
    }

    pub fn coarse_x(self) -> u8 {
        self.get(COARSE_X)
    }

    pub fn set_coarse_x(&mut self, value: u8) {
        self.set(COARSE_X, value)
    }

    pub fn coarse_y(self) -> u8 {
        self.get(COARSE_Y)
    }

    pub fn set_coarse_y(&mut self, value: u8) {
        self.set(COARSE_Y, value)
    }

    pub fn nametable_x(self) -> u8 {
        self.get(NAMETABLE_X)
    }

    pub fn set_nametable_x(&mut self, value: u8) {
        self.set(NAMETABLE_X, value)
    }

    pub fn nametable_y(self) -> u8 {
        self.get(NAMETABLE_Y)
    }

    pub fn set_nametable_y(&mut self, value: u8) {
        self.set(NAMETABLE_Y, value)
    }

    pub fn fine_y(self) -> u8 {
        self.get(FINE_Y)
    }

    pub fn set_fine_y(&mut self, value: u8) {
        self.set(FINE_Y, value)
    }

    pub fn unused(self) -> u8 {
        self.get(UNUSED)
    }

    pub fn set_unused(&mut self, value: u8) {
        self.set(UNUSED, value)
    }
}
