//! Object Attribute Memory: 64 sprites × 4 bytes.
//!
//! See [PPU OAM](https://www.nesdev.org/wiki/PPU_OAM).

pub const OAM_LEN: usize = 256;
pub const SPRITE_COUNT: usize = OAM_LEN / 4;

/// One sprite as laid out in OAM: Y, tile id, attributes, X.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObjectAttributeEntry {
    pub y: u8,
    pub id: u8,
    /// Bits 0-1 palette, bit 5 behind background, bit 6 flip horizontal, bit 7 flip vertical.
    pub attribute: u8,
    pub x: u8,
}

impl ObjectAttributeEntry {
    pub const PRIORITY_BEHIND: u8 = 0x20;
    pub const FLIP_HORIZONTAL: u8 = 0x40;
    pub const FLIP_VERTICAL: u8 = 0x80;

    /// Sprite parked off-screen, used to clear the secondary list.
    pub const HIDDEN: Self = Self {
        y: 0xFF,
        id: 0xFF,
        attribute: 0xFF,
        x: 0xFF,
    };
}

/// Byte-addressable OAM. DMA and $2004 see it as 256 bytes; rendering reads whole entries.
#[derive(Clone, Debug)]
pub struct Oam {
    bytes: [u8; OAM_LEN],
}

impl Default for Oam {
    fn default() -> Self {
        Self { bytes: [0; OAM_LEN] }
    }
}

impl Oam {
    pub fn read(&self, addr: u8) -> u8 {
        self.bytes[addr as usize]
    }

    pub fn write(&mut self, addr: u8, data: u8) {
        self.bytes[addr as usize] = data;
    }

    /// Copy of sprite `index` (0..64).
    pub fn entry(&self, index: usize) -> ObjectAttributeEntry {
        let base = (index % SPRITE_COUNT) * 4;
        ObjectAttributeEntry {
            y: self.bytes[base],
            id: self.bytes[base + 1],
            attribute: self.bytes[base + 2],
            x: self.bytes[base + 3],
        }
    }

    pub fn as_bytes(&self) -> &[u8; OAM_LEN] {
        &self.bytes
    }
}
