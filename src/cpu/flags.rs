//! 6502 processor status register (P).
//!
//! See [Status flags](https://www.nesdev.org/wiki/Status_flags).

use bitflags::bitflags;

bitflags! {
    /// Processor status bits, `NV-BDIZC` from bit 7 down to bit 0.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        const CARRY = 1 << 0;
        const ZERO = 1 << 1;
        const INTERRUPT_DISABLE = 1 << 2;
        /// Stored and restored, but the 2A03 has no decimal mode.
        const DECIMAL = 1 << 3;
        /// Only meaningful in the copy pushed by BRK / PHP.
        const BREAK = 1 << 4;
        const UNUSED = 1 << 5;
        const OVERFLOW = 1 << 6;
        const NEGATIVE = 1 << 7;
    }
}

impl Status {
    /// Set Z and N from a result byte.
    pub fn set_zn(&mut self, value: u8) {
        self.set(Status::ZERO, value == 0);
        self.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    /// Carry as 0 or 1, for add/rotate arithmetic.
    pub fn carry(self) -> u8 {
        self.contains(Status::CARRY) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zn_follow_result() {
        let mut p = Status::empty();
        p.set_zn(0);
        assert_eq!(p, Status::ZERO);
        p.set_zn(0x80);
        assert_eq!(p, Status::NEGATIVE);
        p.set_zn(0x01);
        assert!(p.is_empty());
    }
}
