//! NES controller input handling.
//!
//! Implements the standard controller shift register protocol on $4016/$4017: any write
//! latches the current button state; each read then returns one bit, A first, shifting the
//! register left.

use bitflags::bitflags;

bitflags! {
    /// Button bitmask as written by the host. Bit 7 is shifted out first.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const RIGHT = 0x01;
        const LEFT = 0x02;
        const DOWN = 0x04;
        const UP = 0x08;
        const START = 0x10;
        const SELECT = 0x20;
        const B = 0x40;
        const A = 0x80;
    }
}

/// A single controller port.
#[derive(Clone, Copy, Debug, Default)]
pub struct Controller {
    /// Live button state, updated by the host between frames.
    pub state: Buttons,
    /// Shift register: latched from `state` on write; shifted out MSB-first on read.
    shift: u8,
}

impl Controller {
    /// Create a new controller with no buttons pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write to the port: latch current button state into the shift register.
    pub fn write(&mut self, _data: u8) {
        self.shift = self.state.bits();
    }

    /// Read one button bit. Each read advances the shift (next read = next button).
    pub fn read(&mut self) -> u8 {
        let bit = (self.shift & 0x80 != 0) as u8;
        self.shift <<= 1;
        bit
    }

    /// Bit that the next `read` would return, without shifting.
    pub fn peek(&self) -> u8 {
        (self.shift & 0x80 != 0) as u8
    }
}
