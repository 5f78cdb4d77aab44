//! Mapper 0 (NROM): no bank switching, 16/32 KiB PRG, 8 KiB CHR.

use crate::cartridge::mapper::mapper::Mapper;

/// NROM mapper: fixed PRG and CHR. A single 16 KiB PRG bank is mirrored into $C000–$FFFF.
pub struct Mapper0 {
    prg_banks: u8,
    chr_banks: u8,
}

impl Mapper0 {
    /// Create Mapper0 for the bank counts from the iNES header.
    pub fn new(prg_banks: u8, chr_banks: u8) -> Self {
        Self {
            prg_banks,
            chr_banks,
        }
    }

    fn prg_mask(&self) -> u16 {
        // NROM-256 sees the whole 32 KiB; NROM-128 repeats its only bank.
        if self.prg_banks > 1 { 0x7FFF } else { 0x3FFF }
    }
}

impl Mapper for Mapper0 {
    fn cpu_map_read(&self, addr: u16) -> Option<usize> {
        match addr {
            0x8000..=0xFFFF => Some((addr & self.prg_mask()) as usize),
            _ => None,
        }
    }

    fn cpu_map_write(&mut self, addr: u16) -> Option<usize> {
        match addr {
            0x8000..=0xFFFF => Some((addr & self.prg_mask()) as usize),
            _ => None,
        }
    }

    fn ppu_map_read(&self, addr: u16) -> Option<usize> {
        match addr {
            0x0000..=0x1FFF => Some(addr as usize),
            _ => None,
        }
    }

    fn ppu_map_write(&mut self, addr: u16) -> Option<usize> {
        match addr {
            // CHR RAM only when the cartridge shipped without CHR ROM
            0x0000..=0x1FFF if self.chr_banks == 0 => Some(addr as usize),
            _ => None,
        }
    }
}
