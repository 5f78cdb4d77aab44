//! 6502 opcode table.
//!
//! One entry per opcode byte: mnemonic, operation, addressing mode and base cycle count.
//! Undocumented opcodes are listed as `???` and decode to [`Operation::Xxx`] or
//! [`Operation::Nop`] so that they consume their cycles without side effects.
//! See [6502 instructions](https://www.nesdev.org/wiki/Instruction_reference).

/// How an instruction locates its operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand, or the accumulator.
    Implied,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    /// Signed 8-bit branch offset.
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// JMP only. Reproduces the page-wrap bug of the real part.
    Indirect,
    /// `(zp,X)`
    IndirectX,
    /// `(zp),Y`
    IndirectY,
}

impl AddressingMode {
    /// Three-letter tag used in traces (`IMP`, `ZPX`, ...).
    pub fn tag(self) -> &'static str {
        match self {
            AddressingMode::Implied => "IMP",
            AddressingMode::Immediate => "IMM",
            AddressingMode::ZeroPage => "ZP0",
            AddressingMode::ZeroPageX => "ZPX",
            AddressingMode::ZeroPageY => "ZPY",
            AddressingMode::Relative => "REL",
            AddressingMode::Absolute => "ABS",
            AddressingMode::AbsoluteX => "ABX",
            AddressingMode::AbsoluteY => "ABY",
            AddressingMode::Indirect => "IND",
            AddressingMode::IndirectX => "IZX",
            AddressingMode::IndirectY => "IZY",
        }
    }
}

/// The 56 documented operations plus a catch-all for illegal opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    /// Illegal opcode: does nothing.
    Xxx,
}

/// A decoded opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub name: &'static str,
    pub operation: Operation,
    pub mode: AddressingMode,
    /// Base cycle count before page-cross and branch penalties.
    pub cycles: u8,
}

const fn entry(
    name: &'static str,
    operation: Operation,
    mode: AddressingMode,
    cycles: u8,
) -> Instruction {
    Instruction {
        name,
        operation,
        mode,
        cycles,
    }
}

/// Decode an opcode byte.
pub fn lookup(opcode: u8) -> &'static Instruction {
    &INSTRUCTIONS[opcode as usize]
}

use AddressingMode::*;
use Operation::*;

#[rustfmt::skip]
pub static INSTRUCTIONS: [Instruction; 256] = [
    /* 00 */ entry("BRK", Brk, Immediate, 7),
    /* 01 */ entry("ORA", Ora, IndirectX, 6),
    /* 02 */ entry("???", Xxx, Implied, 2),
    /* 03 */ entry("???", Xxx, Implied, 8),
    /* 04 */ entry("???", Nop, Implied, 3),
    /* 05 */ entry("ORA", Ora, ZeroPage, 3),
    /* 06 */ entry("ASL", Asl, ZeroPage, 5),
    /* 07 */ entry("???", Xxx, Implied, 5),
    /* 08 */ entry("PHP", Php, Implied, 3),
    /* 09 */ entry("ORA", Ora, Immediate, 2),
    /* 0A */ entry("ASL", Asl, Implied, 2),
    /* 0B */ entry("???", Xxx, Implied, 2),
    /* 0C */ entry("???", Nop, Implied, 4),
    /* 0D */ entry("ORA", Ora, Absolute, 4),
    /* 0E */ entry("ASL", Asl, Absolute, 6),
    /* 0F */ entry("???", Xxx, Implied, 6),
    /* 10 */ entry("BPL", Bpl, Relative, 2),
    /* 11 */ entry("ORA", Ora, IndirectY, 5),
    /* 12 */ entry("???", Xxx, Implied, 2),
    /* 13 */ entry("???", Xxx, Implied, 8),
    /* 14 */ entry("???", Nop, Implied, 4),
    /* 15 */ entry("ORA", Ora, ZeroPageX, 4),
    /* 16 */ entry("ASL", Asl, ZeroPageX, 6),
    /* 17 */ entry("???", Xxx, Implied, 6),
    /* 18 */ entry("CLC", Clc, Implied, 2),
    /* 19 */ entry("ORA", Ora, AbsoluteY, 4),
    /* 1A */ entry("???", Nop, Implied, 2),
    /* 1B */ entry("???", Xxx, Implied, 7),
    /* 1C */ entry("???", Nop, Implied, 4),
    /* 1D */ entry("ORA", Ora, AbsoluteX, 4),
    /* 1E */ entry("ASL", Asl, AbsoluteX, 7),
    /* 1F */ entry("???", Xxx, Implied, 7),
    /* 20 */ entry("JSR", Jsr, Absolute, 6),
    /* 21 */ entry("AND", And, IndirectX, 6),
    /* 22 */ entry("???", Xxx, Implied, 2),
    /* 23 */ entry("???", Xxx, Implied, 8),
    /* 24 */ entry("BIT", Bit, ZeroPage, 3),
    /* 25 */ entry("AND", And, ZeroPage, 3),
    /* 26 */ entry("ROL", Rol, ZeroPage, 5),
    /* 27 */ entry("???", Xxx, Implied, 5),
    /* 28 */ entry("PLP", Plp, Implied, 4),
    /* 29 */ entry("AND", And, Immediate, 2),
    /* 2A */ entry("ROL", Rol, Implied, 2),
    /* 2B */ entry("???", Xxx, Implied, 2),
    /* 2C */ entry("BIT", Bit, Absolute, 4),
    /* 2D */ entry("AND", And, Absolute, 4),
    /* 2E */ entry("ROL", Rol, Absolute, 6),
    /* 2F */ entry("???", Xxx, Implied, 6),
    /* 30 */ entry("BMI", Bmi, Relative, 2),
    /* 31 */ entry("AND", And, IndirectY, 5),
    /* 32 */ entry("???", Xxx, Implied, 2),
    /* 33 */ entry("???", Xxx, Implied, 8),
    /* 34 */ entry("???", Nop, Implied, 4),
    /* 35 */ entry("AND", And, ZeroPageX, 4),
    /* 36 */ entry("ROL", Rol, ZeroPageX, 6),
    /* 37 */ entry("???", Xxx, Implied, 6),
    /* 38 */ entry("SEC", Sec, Implied, 2),
    /* 39 */ entry("AND", And, AbsoluteY, 4),
    /* 3A */ entry("???", Nop, Implied, 2),
    /* 3B */ entry("???", Xxx, Implied, 7),
    /* 3C */ entry("???", Nop, Implied, 4),
    /* 3D */ entry("AND", And, AbsoluteX, 4),
    /* 3E */ entry("ROL", Rol, AbsoluteX, 7),
    /* 3F */ entry("???", Xxx, Implied, 7),
    /* 40 */ entry("RTI", Rti, Implied, 6),
    /* 41 */ entry("EOR", Eor, IndirectX, 6),
    /* 42 */ entry("???", Xxx, Implied, 2),
    /* 43 */ entry("???", Xxx, Implied, 8),
    /* 44 */ entry("???", Nop, Implied, 3),
    /* 45 */ entry("EOR", Eor, ZeroPage, 3),
    /* 46 */ entry("LSR", Lsr, ZeroPage, 5),
    /* 47 */ entry("???", Xxx, Implied, 5),
    /* 48 */ entry("PHA", Pha, Implied, 3),
    /* 49 */ entry("EOR", Eor, Immediate, 2),
    /* 4A */ entry("LSR", Lsr, Implied, 2),
    /* 4B */ entry("???", Xxx, Implied, 2),
    /* 4C */ entry("JMP", Jmp, Absolute, 3),
    /* 4D */ entry("EOR", Eor, Absolute, 4),
    /* 4E */ entry("LSR", Lsr, Absolute, 6),
    /* 4F */ entry("???", Xxx, Implied, 6),
    /* 50 */ entry("BVC", Bvc, Relative, 2),
    /* 51 */ entry("EOR", Eor, IndirectY, 5),
    /* 52 */ entry("???", Xxx, Implied, 2),
    /* 53 */ entry("???", Xxx, Implied, 8),
    /* 54 */ entry("???", Nop, Implied, 4),
    /* 55 */ entry("EOR", Eor, ZeroPageX, 4),
    /* 56 */ entry("LSR", Lsr, ZeroPageX, 6),
    /* 57 */ entry("???", Xxx, Implied, 6),
    /* 58 */ entry("CLI", Cli, Implied, 2),
    /* 59 */ entry("EOR", Eor, AbsoluteY, 4),
    /* 5A */ entry("???", Nop, Implied, 2),
    /* 5B */ entry("???", Xxx, Implied, 7),
    /* 5C */ entry("???", Nop, Implied, 4),
    /* 5D */ entry("EOR", Eor, AbsoluteX, 4),
    /* 5E */ entry("LSR", Lsr, AbsoluteX, 7),
    /* 5F */ entry("???", Xxx, Implied, 7),
    /* 60 */ entry("RTS", Rts, Implied, 6),
    /* 61 */ entry("ADC", Adc, IndirectX, 6),
    /* 62 */ entry("???", Xxx, Implied, 2),
    /* 63 */ entry("???", Xxx, Implied, 8),
    /* 64 */ entry("???", Nop, Implied, 3),
    /* 65 */ entry("ADC", Adc, ZeroPage, 3),
    /* 66 */ entry("ROR", Ror, ZeroPage, 5),
    /* 67 */ entry("???", Xxx, Implied, 5),
    /* 68 */ entry("PLA", Pla, Implied, 4),
    /* 69 */ entry("ADC", Adc, Immediate, 2),
    /* 6A */ entry("ROR", Ror, Implied, 2),
    /* 6B */ entry("???", Xxx, Implied, 2),
    /* 6C */ entry("JMP", Jmp, Indirect, 5),
    /* 6D */ entry("ADC", Adc, Absolute, 4),
    /* 6E */ entry("ROR", Ror, Absolute, 6),
    /* 6F */ entry("???", Xxx, Implied, 6),
    /* 70 */ entry("BVS", Bvs, Relative, 2),
    /* 71 */ entry("ADC", Adc, IndirectY, 5),
    /* 72 */ entry("???", Xxx, Implied, 2),
    /* 73 */ entry("???", Xxx, Implied, 8),
    /* 74 */ entry("???", Nop, Implied, 4),
    /* 75 */ entry("ADC", Adc, ZeroPageX, 4),
    /* 76 */ entry("ROR", Ror, ZeroPageX, 6),
    /* 77 */ entry("???", Xxx, Implied, 6),
    /* 78 */ entry("SEI", Sei, Implied, 2),
    /* 79 */ entry("ADC", Adc, AbsoluteY, 4),
    /* 7A */ entry("???", Nop, Implied, 2),
    /* 7B */ entry("???", Xxx, Implied, 7),
    /* 7C */ entry("???", Nop, Implied, 4),
    /* 7D */ entry("ADC", Adc, AbsoluteX, 4),
    /* 7E */ entry("ROR", Ror, AbsoluteX, 7),
    /* 7F */ entry("???", Xxx, Implied, 7),
    /* 80 */ entry("???", Nop, Implied, 2),
    /* 81 */ entry("STA", Sta, IndirectX, 6),
    /* 82 */ entry("???", Nop, Implied, 2),
    /* 83 */ entry("???", Xxx, Implied, 6),
    /* 84 */ entry("STY", Sty, ZeroPage, 3),
    /* 85 */ entry("STA", Sta, ZeroPage, 3),
    /* 86 */ entry("STX", Stx, ZeroPage, 3),
    /* 87 */ entry("???", Xxx, Implied, 3),
    /* 88 */ entry("DEY", Dey, Implied, 2),
    /* 89 */ entry("???", Nop, Implied, 2),
    /* 8A */ entry("TXA", Txa, Implied, 2),
    /* 8B */ entry("???", Xxx, Implied, 2),
    /* 8C */ entry("STY", Sty, Absolute, 4),
    /* 8D */ entry("STA", Sta, Absolute, 4),
    /* 8E */ entry("STX", Stx, Absolute, 4),
    /* 8F */ entry("???", Xxx, Implied, 4),
    /* 90 */ entry("BCC", Bcc, Relative, 2),
    /* 91 */ entry("STA", Sta, IndirectY, 6),
    /* 92 */ entry("???", Xxx, Implied, 2),
    /* 93 */ entry("???", Xxx, Implied, 6),
    /* 94 */ entry("STY", Sty, ZeroPageX, 4),
    /* 95 */ entry("STA", Sta, ZeroPageX, 4),
    /* 96 */ entry("STX", Stx, ZeroPageY, 4),
    /* 97 */ entry("???", Xxx, Implied, 4),
    /* 98 */ entry("TYA", Tya, Implied, 2),
    /* 99 */ entry("STA", Sta, AbsoluteY, 5),
    /* 9A */ entry("TXS", Txs, Implied, 2),
    /* 9B */ entry("???", Xxx, Implied, 5),
    /* 9C */ entry("???", Nop, Implied, 5),
    /* 9D */ entry("STA", Sta, AbsoluteX, 5),
    /* 9E */ entry("???", Xxx, Implied, 5),
    /* 9F */ entry("???", Xxx, Implied, 5),
    /* A0 */ entry("LDY", Ldy, Immediate, 2),
    /* A1 */ entry("LDA", Lda, IndirectX, 6),
    /* A2 */ entry("LDX", Ldx, Immediate, 2),
    /* A3 */ entry("???", Xxx, Implied, 6),
    /* A4 */ entry("LDY", Ldy, ZeroPage, 3),
    /* A5 */ entry("LDA", Lda, ZeroPage, 3),
    /* A6 */ entry("LDX", Ldx, ZeroPage, 3),
    /* A7 */ entry("???", Xxx, Implied, 3),
    /* A8 */ entry("TAY", Tay, Implied, 2),
    /* A9 */ entry("LDA", Lda, Immediate, 2),
    /* AA */ entry("TAX", Tax, Implied, 2),
    /* AB */ entry("???", Xxx, Implied, 2),
    /* AC */ entry("LDY", Ldy, Absolute, 4),
    /* AD */ entry("LDA", Lda, Absolute, 4),
    /* AE */ entry("LDX", Ldx, Absolute, 4),
    /* AF */ entry("???", Xxx, Implied, 4),
    /* B0 */ entry("BCS", Bcs, Relative, 2),
    /* B1 */ entry("LDA", Lda, IndirectY, 5),
    /* B2 */ entry("???", Xxx, Implied, 2),
    /* B3 */ entry("???", Xxx, Implied, 5),
    /* B4 */ entry("LDY", Ldy, ZeroPageX, 4),
    /* B5 */ entry("LDA", Lda, ZeroPageX, 4),
    /* B6 */ entry("LDX", Ldx, ZeroPageY, 4),
    /* B7 */ entry("???", Xxx, Implied, 4),
    /* B8 */ entry("CLV", Clv, Implied, 2),
    /* B9 */ entry("LDA", Lda, AbsoluteY, 4),
    /* BA */ entry("TSX", Tsx, Implied, 2),
    /* BB */ entry("???", Xxx, Implied, 4),
    /* BC */ entry("LDY", Ldy, AbsoluteX, 4),
    /* BD */ entry("LDA", Lda, AbsoluteX, 4),
    /* BE */ entry("LDX", Ldx, AbsoluteY, 4),
    /* BF */ entry("???", Xxx, Implied, 4),
    /* C0 */ entry("CPY", Cpy, Immediate, 2),
    /* C1 */ entry("CMP", Cmp, IndirectX, 6),
    /* C2 */ entry("???", Nop, Implied, 2),
    /* C3 */ entry("???", Xxx, Implied, 8),
    /* C4 */ entry("CPY", Cpy, ZeroPage, 3),
    /* C5 */ entry("CMP", Cmp, ZeroPage, 3),
    /* C6 */ entry("DEC", Dec, ZeroPage, 5),
    /* C7 */ entry("???", Xxx, Implied, 5),
    /* C8 */ entry("INY", Iny, Implied, 2),
    /* C9 */ entry("CMP", Cmp, Immediate, 2),
    /* CA */ entry("DEX", Dex, Implied, 2),
    /* CB */ entry("???", Xxx, Implied, 2),
    /* CC */ entry("CPY", Cpy, Absolute, 4),
    /* CD */ entry("CMP", Cmp, Absolute, 4),
    /* CE */ entry("DEC", Dec, Absolute, 6),
    /* CF */ entry("???", Xxx, Implied, 6),
    /* D0 */ entry("BNE", Bne, Relative, 2),
    /* D1 */ entry("CMP", Cmp, IndirectY, 5),
    /* D2 */ entry("???", Xxx, Implied, 2),
    /* D3 */ entry("???", Xxx, Implied, 8),
    /* D4 */ entry("???", Nop, Implied, 4),
    /* D5 */ entry("CMP", Cmp, ZeroPageX, 4),
    /* D6 */ entry("DEC", Dec, ZeroPageX, 6),
    /* D7 */ entry("???", Xxx, Implied, 6),
    /* D8 */ entry("CLD", Cld, Implied, 2),
    /* D9 */ entry("CMP", Cmp, AbsoluteY, 4),
    /* DA */ entry("NOP", Nop, Implied, 2),
    /* DB */ entry("???", Xxx, Implied, 7),
    /* DC */ entry("???", Nop, Implied, 4),
    /* DD */ entry("CMP", Cmp, AbsoluteX, 4),
    /* DE */ entry("DEC", Dec, AbsoluteX, 7),
    /* DF */ entry("???", Xxx, Implied, 7),
    /* E0 */ entry("CPX", Cpx, Immediate, 2),
    /* E1 */ entry("SBC", Sbc, IndirectX, 6),
    /* E2 */ entry("???", Nop, Implied, 2),
    /* E3 */ entry("???", Xxx, Implied, 8),
    /* E4 */ entry("CPX", Cpx, ZeroPage, 3),
    /* E5 */ entry("SBC", Sbc, ZeroPage, 3),
    /* E6 */ entry("INC", Inc, ZeroPage, 5),
    /* E7 */ entry("???", Xxx, Implied, 5),
    /* E8 */ entry("INX", Inx, Implied, 2),
    /* E9 */ entry("SBC", Sbc, Immediate, 2),
    /* EA */ entry("NOP", Nop, Implied, 2),
    /* EB */ entry("???", Sbc, Implied, 2),
    /* EC */ entry("CPX", Cpx, Absolute, 4),
    /* ED */ entry("SBC", Sbc, Absolute, 4),
    /* EE */ entry("INC", Inc, Absolute, 6),
    /* EF */ entry("???", Xxx, Implied, 6),
    /* F0 */ entry("BEQ", Beq, Relative, 2),
    /* F1 */ entry("SBC", Sbc, IndirectY, 5),
    /* F2 */ entry("???", Xxx, Implied, 2),
    /* F3 */ entry("???", Xxx, Implied, 8),
    /* F4 */ entry("???", Nop, Implied, 4),
    /* F5 */ entry("SBC", Sbc, ZeroPageX, 4),
    /* F6 */ entry("INC", Inc, ZeroPageX, 6),
    /* F7 */ entry("???", Xxx, Implied, 6),
    /* F8 */ entry("SED", Sed, Implied, 2),
    /* F9 */ entry("SBC", Sbc, AbsoluteY, 4),
    /* FA */ entry("NOP", Nop, Implied, 2),
    /* FB */ entry("???", Xxx, Implied, 7),
    /* FC */ entry("???", Nop, Implied, 4),
    /* FD */ entry("SBC", Sbc, AbsoluteX, 4),
    /* FE */ entry("INC", Inc, AbsoluteX, 7),
    /* FF */ entry("???", Xxx, Implied, 7),
];
