//! 2C02 system palette.
//!
//! The framebuffer stores 6-bit indices into this table rather than RGB, so a host can apply
//! its own palette. See [PPU palettes](https://www.nesdev.org/wiki/PPU_palettes).

/// Hardware colors as 0xRRGGBB, indexed by the 6-bit value read from palette RAM.
#[rustfmt::skip]
pub const SYSTEM_PALETTE: [u32; 64] = [
    0x545454, 0x001E74, 0x081090, 0x300088, 0x440064, 0x5C0030, 0x540400, 0x3C1800,
    0x202A00, 0x083A00, 0x004000, 0x003C00, 0x00323C, 0x000000, 0x000000, 0x000000,
    0x989698, 0x084CC4, 0x3032EC, 0x5C1EE4, 0x8814B0, 0xA01464, 0x982220, 0x783C00,
    0x545A00, 0x287200, 0x087C00, 0x007628, 0x006678, 0x000000, 0x000000, 0x000000,
    0xECEEEC, 0x4C9AEC, 0x787CEC, 0xB062EC, 0xE454EC, 0xEC58B4, 0xEC6A64, 0xD48820,
    0xA0AA00, 0x74C400, 0x4CD020, 0x38CC6C, 0x38B4CC, 0x3C3C3C, 0x000000, 0x000000,
    0xECEEEC, 0xA8CCEC, 0xBCBCEC, 0xD4B2EC, 0xECAEEC, 0xECAED4, 0xECB4B0, 0xE4C490,
    0xCCD278, 0xB4DE78, 0xA8E290, 0x98E2B4, 0xA0D6E4, 0xA0A2A0, 0x000000, 0x000000,
];

/// Resolve a framebuffer index to 0xRRGGBB. Only the low six bits are used.
pub fn rgb(index: u8) -> u32 {
    SYSTEM_PALETTE[(index & 0x3F) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_masked_to_six_bits() {
        assert_eq!(rgb(0x00), 0x545454);
        assert_eq!(rgb(0x40), rgb(0x00));
        assert_eq!(rgb(0x30), 0xECEEEC);
    }
}
