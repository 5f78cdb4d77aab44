//! NES cartridge loading from iNES format (.nes files).
//!
//! Implements the [iNES](https://www.nesdev.org/wiki/INES) format: 16-byte header (magic "NES\x1A",
//! PRG size in 16 KiB units, CHR size in 8 KiB units, flags 6–7 for mapper, etc.), an optional
//! 512-byte trainer, then PRG ROM, then CHR ROM. A cartridge without CHR ROM gets 8 KiB of CHR
//! RAM instead. The [Mapper](https://www.nesdev.org/wiki/Mapper) translates CPU PRG
//! ($8000–$FFFF) and PPU CHR ($0000–$1FFF) addresses into offsets within those buffers.

use std::fs;
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::cartridge::mapper::Mirroring;
use crate::cartridge::mapper::mapper::Mapper;
use crate::cartridge::mapper::mapper0::Mapper0;

pub const HEADER_LEN: usize = 16;
pub const TRAINER_LEN: usize = 512;
pub const PRG_BANK_SIZE: usize = 16 * 1024;
pub const CHR_BANK_SIZE: usize = 8 * 1024;

const MAGIC: [u8; 4] = *b"NES\x1A";

/// Reasons a ROM image cannot become a cartridge.
#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("failed to read ROM file: {0}")]
    Io(#[from] std::io::Error),
    #[error("not an iNES image (magic {0:02X?})")]
    InvalidMagic([u8; 4]),
    #[error("ROM truncated in {section}: expected {expected} bytes, found {actual}")]
    Truncated {
        section: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("unsupported mapper {0}")]
    UnsupportedMapper(u8),
}

/// The fixed 16-byte iNES header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 4],
    /// PRG ROM size in 16 KiB units.
    pub prg_banks: u8,
    /// CHR ROM size in 8 KiB units (0 means the board carries CHR RAM).
    pub chr_banks: u8,
    /// Flags 6: mirroring (bit 0), battery (bit 1), trainer (bit 2), mapper low nibble (bits 4–7).
    pub mapper1: u8,
    /// Flags 7: mapper high nibble (bits 4–7).
    pub mapper2: u8,
    pub prg_ram_size: u8,
    pub tv_system1: u8,
    pub tv_system2: u8,
}

impl Header {
    /// Parse the header from the first 16 bytes of an image.
    pub fn parse(bytes: &[u8]) -> Result<Self, CartridgeError> {
        if bytes.len() < HEADER_LEN {
            return Err(CartridgeError::Truncated {
                section: "header",
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if magic != MAGIC {
            return Err(CartridgeError::InvalidMagic(magic));
        }

        Ok(Self {
            magic,
            prg_banks: bytes[4],
            chr_banks: bytes[5],
            mapper1: bytes[6],
            mapper2: bytes[7],
            prg_ram_size: bytes[8],
            tv_system1: bytes[9],
            tv_system2: bytes[10],
        })
    }

    /// Mapper number: low nibble from flags 6, high nibble from flags 7.
    pub fn mapper_id(&self) -> u8 {
        (self.mapper2 & 0xF0) | (self.mapper1 >> 4)
    }

    pub fn has_trainer(&self) -> bool {
        self.mapper1 & 0x04 != 0
    }

    /// Solder-pad mirroring from flags 6 bit 0: 0 = horizontal, 1 = vertical.
    pub fn mirroring(&self) -> Mirroring {
        if self.mapper1 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        }
    }
}

/// Cartridge: holds PRG/CHR and the mapper that translates bus addresses into them.
/// CPU reads PRG via the bus at $8000–$FFFF; PPU reads CHR at $0000–$1FFF (pattern tables).
pub struct Cartridge {
    header: Header,
    prg_rom: Vec<u8>,
    /// CHR ROM, or 8 KiB of CHR RAM when the header declares no CHR banks.
    chr: Vec<u8>,
    mirroring: Mirroring,
    mapper: Box<dyn Mapper>,
}

impl Cartridge {
    /// Load a cartridge from an iNES file on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Build a cartridge from an in-memory iNES image.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        let header = Header::parse(data)?;

        let mut offset = HEADER_LEN;
        if header.has_trainer() {
            offset += TRAINER_LEN;
        }

        let prg_len = header.prg_banks as usize * PRG_BANK_SIZE;
        let prg_rom = take(data, offset, prg_len, "PRG ROM")?.to_vec();
        offset += prg_len;

        let chr = if header.chr_banks == 0 {
            vec![0; CHR_BANK_SIZE]
        } else {
            let chr_len = header.chr_banks as usize * CHR_BANK_SIZE;
            take(data, offset, chr_len, "CHR ROM")?.to_vec()
        };

        let mapper: Box<dyn Mapper> = match header.mapper_id() {
            0 => Box::new(Mapper0::new(header.prg_banks, header.chr_banks)),
            id => return Err(CartridgeError::UnsupportedMapper(id)),
        };

        let mirroring = header.mirroring();
        info!(
            "cartridge loaded: mapper {}, {} PRG bank(s), {} CHR bank(s), {:?} mirroring",
            header.mapper_id(),
            header.prg_banks,
            header.chr_banks,
            mirroring
        );

        Ok(Self {
            header,
            prg_rom,
            chr,
            mirroring,
            mapper,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Nametable mirroring, preferring whatever the mapper currently selects.
    pub fn mirroring(&self) -> Mirroring {
        self.mapper.mirroring().unwrap_or(self.mirroring)
    }

    /// CPU read. `None` when the mapper does not claim the address.
    pub fn cpu_read(&self, addr: u16) -> Option<u8> {
        let mapped = self.mapper.cpu_map_read(addr)?;
        Some(self.prg_rom.get(mapped).copied().unwrap_or(0))
    }

    /// CPU write. Returns whether the cartridge claimed the address. PRG ROM itself never
    /// changes; a claimed write only reaches mapper registers.
    pub fn cpu_write(&mut self, addr: u16, _data: u8) -> bool {
        self.mapper.cpu_map_write(addr).is_some()
    }

    /// PPU read from CHR. `None` when the mapper does not claim the address.
    pub fn ppu_read(&self, addr: u16) -> Option<u8> {
        let mapped = self.mapper.ppu_map_read(addr)?;
        Some(self.chr.get(mapped).copied().unwrap_or(0))
    }

    /// PPU write to CHR RAM. Returns whether the cartridge claimed the address.
    pub fn ppu_write(&mut self, addr: u16, data: u8) -> bool {
        match self.mapper.ppu_map_write(addr) {
            Some(mapped) => {
                if let Some(cell) = self.chr.get_mut(mapped) {
                    *cell = data;
                }
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.mapper.reset();
    }
}

fn take<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    section: &'static str,
) -> Result<&'a [u8], CartridgeError> {
    data.get(offset..offset + len)
        .ok_or(CartridgeError::Truncated {
            section,
            expected: len,
            actual: data.len().saturating_sub(offset),
        })
}

/// Assemble an iNES image in memory. `flags6` carries mirroring/trainer/mapper-low bits.
#[cfg(test)]
pub(crate) fn ines_image(prg: &[u8], chr: &[u8], flags6: u8) -> Vec<u8> {
    let mut rom = Vec::with_capacity(HEADER_LEN + prg.len() + chr.len());
    rom.extend_from_slice(&MAGIC);
    rom.push((prg.len() / PRG_BANK_SIZE) as u8);
    rom.push((chr.len() / CHR_BANK_SIZE) as u8);
    rom.push(flags6);
    rom.extend_from_slice(&[0; 9]);
    rom.extend_from_slice(prg);
    rom.extend_from_slice(chr);
    rom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_fields() {
        let mut bytes = ines_image(&[0; PRG_BANK_SIZE], &[0; CHR_BANK_SIZE], 0x01);
        bytes[7] = 0x00;
        bytes[8] = 2;
        bytes[9] = 1;
        let header = Header::parse(&bytes).unwrap();

        assert_eq!(header.magic, *b"NES\x1A");
        assert_eq!(header.prg_banks, 1);
        assert_eq!(header.chr_banks, 1);
        assert_eq!(header.mapper_id(), 0);
        assert_eq!(header.prg_ram_size, 2);
        assert_eq!(header.tv_system1, 1);
        assert_eq!(header.mirroring(), Mirroring::Vertical);
    }

    #[test]
    fn mapper_id_combines_both_nibbles() {
        let mut bytes = ines_image(&[], &[], 0x40);
        bytes[7] = 0x10;
        let header = Header::parse(&bytes).unwrap();
        assert_eq!(header.mapper_id(), 0x14);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = ines_image(&[0; PRG_BANK_SIZE], &[], 0);
        bytes[3] = 0x00;
        assert!(matches!(
            Cartridge::from_bytes(&bytes),
            Err(CartridgeError::InvalidMagic(_))
        ));
    }

    #[test]
    fn rejects_unsupported_mapper() {
        let bytes = ines_image(&[0; PRG_BANK_SIZE], &[0; CHR_BANK_SIZE], 0x10);
        assert!(matches!(
            Cartridge::from_bytes(&bytes),
            Err(CartridgeError::UnsupportedMapper(1))
        ));
    }

    #[test]
    fn rejects_truncated_prg() {
        let mut bytes = ines_image(&[0; PRG_BANK_SIZE], &[], 0);
        bytes.truncate(HEADER_LEN + 100);
        assert!(matches!(
            Cartridge::from_bytes(&bytes),
            Err(CartridgeError::Truncated {
                section: "PRG ROM",
                ..
            })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Cartridge::load("/nonexistent/rom.nes"),
            Err(CartridgeError::Io(_))
        ));
    }

    #[test]
    fn skips_trainer_block() {
        let mut prg = vec![0; PRG_BANK_SIZE];
        prg[0] = 0xAB;
        let mut bytes = ines_image(&[], &[], 0x04);
        bytes[4] = 1;
        bytes[5] = 1;
        bytes.extend_from_slice(&[0xEE; TRAINER_LEN]);
        bytes.extend_from_slice(&prg);
        bytes.extend_from_slice(&[0; CHR_BANK_SIZE]);

        let cart = Cartridge::from_bytes(&bytes).unwrap();
        assert!(cart.header().has_trainer());
        assert_eq!(cart.cpu_read(0x8000), Some(0xAB));
    }

    #[test]
    fn prg_reads_mirror_and_writes_are_ignored() {
        let mut prg = vec![0; PRG_BANK_SIZE];
        prg[0x0010] = 0x42;
        let mut cart = Cartridge::from_bytes(&ines_image(&prg, &[0; CHR_BANK_SIZE], 0)).unwrap();

        assert_eq!(cart.cpu_read(0x8010), Some(0x42));
        assert_eq!(cart.cpu_read(0xC010), Some(0x42));
        assert_eq!(cart.cpu_read(0x4020), None);

        assert!(cart.cpu_write(0x8010, 0x99));
        assert_eq!(cart.cpu_read(0x8010), Some(0x42));
    }

    #[test]
    fn chr_ram_is_allocated_and_writable() {
        let mut cart = Cartridge::from_bytes(&ines_image(&[0; PRG_BANK_SIZE], &[], 0)).unwrap();
        assert!(cart.ppu_write(0x0123, 0x77));
        assert_eq!(cart.ppu_read(0x0123), Some(0x77));
        assert_eq!(cart.ppu_read(0x1FFF), Some(0x00));
    }

    #[test]
    fn chr_rom_rejects_writes() {
        let mut chr = vec![0; CHR_BANK_SIZE];
        chr[5] = 0x3C;
        let mut cart = Cartridge::from_bytes(&ines_image(&[0; PRG_BANK_SIZE], &chr, 0)).unwrap();
        assert!(!cart.ppu_write(0x0005, 0xFF));
        assert_eq!(cart.ppu_read(0x0005), Some(0x3C));
    }
}
