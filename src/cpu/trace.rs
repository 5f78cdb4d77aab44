//! Per-instruction execution trace.
//!
//! The CPU builds an [`InstructionTrace`] each time it dispatches an opcode. It is written to
//! the `log` facade at trace level and handed to an installed [`TraceObserver`], if any.

use std::fmt;

use ansi_term::Colour::{Green, Red};

use crate::cpu::{flags::Status, instructions::AddressingMode};

/// CPU state at the moment an opcode was fetched, before it executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstructionTrace {
    pub pc: u16,
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub mode: AddressingMode,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub status: Status,
    /// Total CPU clocks elapsed before this instruction.
    pub clock_count: u64,
}

impl InstructionTrace {
    /// `NV-BDIZC`, with `.` for clear bits.
    pub fn flags(&self) -> String {
        FLAG_NAMES
            .iter()
            .map(|&(flag, name)| if self.status.contains(flag) { name } else { '.' })
            .collect()
    }

    /// Same line as `Display`, with set flags in green and clear flags in red.
    pub fn colored(&self) -> String {
        let flags: String = FLAG_NAMES
            .iter()
            .map(|&(flag, name)| {
                if self.status.contains(flag) {
                    Green.paint(name.to_string()).to_string()
                } else {
                    Red.paint(name.to_string()).to_string()
                }
            })
            .collect();
        format!("{} {}", self.registers_line(), flags)
    }

    fn registers_line(&self) -> String {
        format!(
            "{:04X}  {:02X}  {} {{{}}}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.pc,
            self.opcode,
            self.mnemonic,
            self.mode.tag(),
            self.a,
            self.x,
            self.y,
            self.status.bits(),
            self.sp,
            self.clock_count
        )
    }
}

impl fmt::Display for InstructionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.registers_line(), self.flags())
    }
}

const FLAG_NAMES: [(Status, char); 8] = [
    (Status::NEGATIVE, 'N'),
    (Status::OVERFLOW, 'V'),
    (Status::UNUSED, '-'),
    (Status::BREAK, 'B'),
    (Status::DECIMAL, 'D'),
    (Status::INTERRUPT_DISABLE, 'I'),
    (Status::ZERO, 'Z'),
    (Status::CARRY, 'C'),
];

/// Receives every dispatched instruction. Install with [`Cpu::set_observer`](crate::cpu::cpu::Cpu::set_observer).
pub trait TraceObserver {
    fn on_instruction(&mut self, trace: &InstructionTrace);
}

impl<F> TraceObserver for F
where
    F: FnMut(&InstructionTrace),
{
    fn on_instruction(&mut self, trace: &InstructionTrace) {
        self(trace)
    }
}
