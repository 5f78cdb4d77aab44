//! Elaris: an NES (Nintendo Entertainment System) emulation core written in Rust.
//!
//! Implements the NES chipset as documented on the
//! [NESdev Wiki](https://www.nesdev.org/wiki/NES_reference_guide): the Ricoh 2A03 CPU core,
//! the 2C02 PPU, cartridge mappers and controller I/O. The host drives everything through
//! [`NesBus::clock`] and reads back the framebuffer; presentation and input polling live
//! outside this crate.
//!
//! ```no_run
//! use elaris::{Buttons, Cartridge, NesBus};
//!
//! let cart = Cartridge::load("game.nes")?;
//! let mut nes = NesBus::new(cart);
//! nes.reset();
//! nes.set_controller(0, Buttons::START);
//! while !nes.take_frame_complete() {
//!     nes.clock();
//! }
//! let pixels: &[u8] = nes.frame();
//! # Ok::<(), elaris::CartridgeError>(())
//! ```
//!
//! ## Modules (NESdev references)
//!
//! - **bus** – [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map): RAM, PPU,
//!   controllers, cartridge, [OAM DMA](https://www.nesdev.org/wiki/PPU_registers#OAMDMA);
//!   3 PPU dots per CPU cycle
//! - **cartridge** – [iNES](https://www.nesdev.org/wiki/INES) loading; [Mapper](https://www.nesdev.org/wiki/Mapper) NROM (0)
//! - **controller** – [Controller reading](https://www.nesdev.org/wiki/Controller_reading): $4016 latch, shift-out
//! - **cpu** – [6502](https://www.nesdev.org/wiki/CPU) / 2A03: table-driven core, [NMI](https://www.nesdev.org/wiki/NMI), trace hook
//! - **ppu** – [PPU](https://www.nesdev.org/wiki/PPU), [PPU registers](https://www.nesdev.org/wiki/PPU_registers), OAM, nametables, 256×240

pub mod bus;
pub mod cartridge;
pub mod controller;
pub mod cpu;
pub mod ppu;

pub use bus::{Bus, NesBus};
pub use cartridge::{Cartridge, CartridgeError, Mirroring};
pub use controller::Buttons;
pub use cpu::{Cpu, InstructionTrace, TraceObserver};
pub use ppu::{palette::SYSTEM_PALETTE, Ppu};
