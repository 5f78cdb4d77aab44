//! NES mappers for PRG/CHR address translation.
//!
//! Mapper0 (NROM) and the nametable mirroring modes a board can wire up.

/// Nametable mirroring mode for the PPU's two physical 1 KiB tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mirroring {
    /// $2000/$2400 share table 0, $2800/$2C00 share table 1.
    Horizontal,
    /// $2000/$2800 share table 0, $2400/$2C00 share table 1.
    Vertical,
    OneScreenLower,
    OneScreenUpper,
}

pub mod mapper;

pub mod mapper0;
