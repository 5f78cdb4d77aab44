//! NES cartridge loading and mapper support.
//!
//! - **cartridge**: Loads iNES (.nes) images, holds PRG/CHR and the mapper.
//! - **mapper**: the `Mapper` contract, NROM (0), and nametable mirroring modes.

pub mod cartridge;
pub mod mapper;

pub use cartridge::{Cartridge, CartridgeError, Header};
pub use mapper::Mirroring;
