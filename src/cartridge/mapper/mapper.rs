//! Mapper trait: CPU/PPU address translation into cartridge memory.

use crate::cartridge::mapper::Mirroring;

/// Trait for NES cartridge mappers. The cartridge asks the mapper where a bus address lands
/// before touching PRG or CHR memory; `None` means the mapper does not claim the address and
/// the caller falls through to the next device in its decode chain.
pub trait Mapper {
    /// Translate a CPU read ($4020–$FFFF) into a PRG offset.
    fn cpu_map_read(&self, addr: u16) -> Option<usize>;
    /// Translate a CPU write into a PRG offset. Bank-switching mappers latch registers here.
    fn cpu_map_write(&mut self, addr: u16) -> Option<usize>;
    /// Translate a PPU read ($0000–$1FFF) into a CHR offset.
    fn ppu_map_read(&self, addr: u16) -> Option<usize>;
    /// Translate a PPU write into a CHR offset. Only claimed when CHR is RAM.
    fn ppu_map_write(&mut self, addr: u16) -> Option<usize>;

    /// Return bank registers to their power-on state.
    fn reset(&mut self) {}

    /// Mirroring selected by the mapper at runtime, if it overrides the header.
    fn mirroring(&self) -> Option<Mirroring> {
        None
    }
}
