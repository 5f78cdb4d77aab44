//! 6502 CPU emulation for the NES.
//!
//! Clock-stepped core driven by an opcode table. Official instructions are implemented;
//! undocumented opcodes consume their listed cycles and otherwise do nothing.
//! Memory and I/O go through the [`Bus`](crate::bus::Bus) trait.

pub mod cpu;
pub mod flags;
pub mod instructions;
pub mod trace;

pub use cpu::{Cpu, Registers};
pub use flags::Status;
pub use trace::{InstructionTrace, TraceObserver};
