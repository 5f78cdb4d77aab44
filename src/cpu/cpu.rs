use log::{debug, log_enabled, trace, Level};

use crate::{
    bus::Bus,
    cpu::{
        flags::Status,
        instructions::{self, AddressingMode, Operation},
        trace::{InstructionTrace, TraceObserver},
    },
};

const STACK_BASE: u16 = 0x0100;
const NMI_VECTOR: u16 = 0xFFFA;
const RESET_VECTOR: u16 = 0xFFFC;
const IRQ_VECTOR: u16 = 0xFFFE;

/// Snapshot of the programmer-visible registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: Status,
}

/// Ricoh 2A03 core (6502 without decimal mode), stepped one clock at a time.
///
/// The whole instruction runs on the clock that fetches its opcode; the remaining clocks of
/// its cycle budget are spent idling. The CPU does not own memory: every entry point borrows
/// a [`Bus`].
pub struct Cpu {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: Status,

    fetched: u8,
    addr_abs: u16,
    addr_rel: u16,
    opcode: u8,
    /// Clocks left before the next opcode fetch.
    cycles: u8,
    clock_count: u64,
    observer: Option<Box<dyn TraceObserver>>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0,
            pc: 0,
            status: Status::empty(),
            fetched: 0,
            addr_abs: 0,
            addr_rel: 0,
            opcode: 0,
            cycles: 0,
            clock_count: 0,
            observer: None,
        }
    }

    /// Install (or clear) the per-instruction observer.
    pub fn set_observer(&mut self, observer: Option<Box<dyn TraceObserver>>) {
        self.observer = observer;
    }

    pub fn registers(&self) -> Registers {
        Registers {
            a: self.a,
            x: self.x,
            y: self.y,
            sp: self.sp,
            pc: self.pc,
            status: self.status,
        }
    }

    /// True when the current instruction has used up its cycles.
    pub fn complete(&self) -> bool {
        self.cycles == 0
    }

    /// Total clocks since construction. Not cleared by reset.
    pub fn clock_count(&self) -> u64 {
        self.clock_count
    }

    /// Load PC from the reset vector and put the registers in their power-up state.
    pub fn reset<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        self.pc = read_word(bus, RESET_VECTOR);

        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.status = Status::UNUSED;

        self.addr_rel = 0;
        self.addr_abs = 0;
        self.fetched = 0;

        self.cycles = 8;
    }

    /// Maskable interrupt. Ignored while I is set.
    pub fn irq<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        if self.status.contains(Status::INTERRUPT_DISABLE) {
            return;
        }
        self.interrupt(bus, IRQ_VECTOR);
        self.cycles = 7;
    }

    /// Non-maskable interrupt.
    pub fn nmi<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        self.interrupt(bus, NMI_VECTOR);
        self.cycles = 8;
    }

    fn interrupt<B: Bus + ?Sized>(&mut self, bus: &mut B, vector: u16) {
        self.push(bus, (self.pc >> 8) as u8);
        self.push(bus, self.pc as u8);

        self.status.remove(Status::BREAK);
        self.status.insert(Status::UNUSED | Status::INTERRUPT_DISABLE);
        self.push(bus, self.status.bits());

        self.pc = read_word(bus, vector);
    }

    /// Advance one CPU clock.
    pub fn clock<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        if self.cycles == 0 {
            let pc = self.pc;
            self.opcode = bus.read(pc);
            self.status.insert(Status::UNUSED);
            self.pc = self.pc.wrapping_add(1);

            let instruction = instructions::lookup(self.opcode);
            self.emit_trace(pc, instruction);
            if instruction.operation == Operation::Xxx {
                debug!("illegal opcode ${:02X} at ${:04X}", self.opcode, pc);
            }

            self.cycles = instruction.cycles;
            let page_crossed = self.address(bus, instruction.mode);
            let may_take_extra = self.execute(bus, instruction.operation, instruction.mode);
            self.cycles += page_crossed & may_take_extra;

            self.status.insert(Status::UNUSED);
        }

        self.clock_count += 1;
        self.cycles -= 1;
    }

    fn emit_trace(&mut self, pc: u16, instruction: &instructions::Instruction) {
        if self.observer.is_none() && !log_enabled!(Level::Trace) {
            return;
        }
        let line = InstructionTrace {
            pc,
            opcode: self.opcode,
            mnemonic: instruction.name,
            mode: instruction.mode,
            a: self.a,
            x: self.x,
            y: self.y,
            sp: self.sp,
            status: self.status,
            clock_count: self.clock_count,
        };
        trace!("{line}");
        if let Some(observer) = self.observer.as_mut() {
            observer.on_instruction(&line);
        }
    }

    fn push<B: Bus + ?Sized>(&mut self, bus: &mut B, value: u8) {
        bus.write(STACK_BASE | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pop<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE | self.sp as u16)
    }

    fn next_byte<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u8 {
        let byte = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        byte
    }

    /// Resolve the operand address. Returns 1 if an indexed access crossed a page.
    fn address<B: Bus + ?Sized>(&mut self, bus: &mut B, mode: AddressingMode) -> u8 {
        match mode {
            AddressingMode::Implied => {
                self.fetched = self.a;
                0
            }
            AddressingMode::Immediate => {
                self.addr_abs = self.pc;
                self.pc = self.pc.wrapping_add(1);
                0
            }
            AddressingMode::ZeroPage => {
                self.addr_abs = self.next_byte(bus) as u16;
                0
            }
            AddressingMode::ZeroPageX => {
                self.addr_abs = self.next_byte(bus).wrapping_add(self.x) as u16;
                0
            }
            AddressingMode::ZeroPageY => {
                self.addr_abs = self.next_byte(bus).wrapping_add(self.y) as u16;
                0
            }
            AddressingMode::Relative => {
                self.addr_rel = self.next_byte(bus) as i8 as u16;
                0
            }
            AddressingMode::Absolute => {
                let lo = self.next_byte(bus) as u16;
                let hi = self.next_byte(bus) as u16;
                self.addr_abs = (hi << 8) | lo;
                0
            }
            AddressingMode::AbsoluteX => self.absolute_indexed(bus, self.x),
            AddressingMode::AbsoluteY => self.absolute_indexed(bus, self.y),
            AddressingMode::Indirect => {
                let lo = self.next_byte(bus) as u16;
                let hi = self.next_byte(bus) as u16;
                let ptr = (hi << 8) | lo;

                // The high byte is fetched without carrying into the pointer's page
                let hi_addr = if lo == 0x00FF {
                    ptr & 0xFF00
                } else {
                    ptr.wrapping_add(1)
                };
                self.addr_abs = ((bus.read(hi_addr) as u16) << 8) | bus.read(ptr) as u16;
                0
            }
            AddressingMode::IndirectX => {
                let zp = self.next_byte(bus).wrapping_add(self.x);
                let lo = bus.read(zp as u16) as u16;
                let hi = bus.read(zp.wrapping_add(1) as u16) as u16;
                self.addr_abs = (hi << 8) | lo;
                0
            }
            AddressingMode::IndirectY => {
                let zp = self.next_byte(bus);
                let lo = bus.read(zp as u16) as u16;
                let hi = bus.read(zp.wrapping_add(1) as u16) as u16;
                self.addr_abs = ((hi << 8) | lo).wrapping_add(self.y as u16);
                page_crossed(self.addr_abs, hi << 8)
            }
        }
    }

    fn absolute_indexed<B: Bus + ?Sized>(&mut self, bus: &mut B, index: u8) -> u8 {
        let lo = self.next_byte(bus) as u16;
        let hi = self.next_byte(bus) as u16;
        self.addr_abs = ((hi << 8) | lo).wrapping_add(index as u16);
        page_crossed(self.addr_abs, hi << 8)
    }

    /// Operand value. Implied mode already latched A into `fetched`.
    fn fetch<B: Bus + ?Sized>(&mut self, bus: &mut B, mode: AddressingMode) -> u8 {
        if mode != AddressingMode::Implied {
            self.fetched = bus.read(self.addr_abs);
        }
        self.fetched
    }

    /// Store a read-modify-write result to A or memory.
    fn store<B: Bus + ?Sized>(&mut self, bus: &mut B, mode: AddressingMode, value: u8) {
        if mode == AddressingMode::Implied {
            self.a = value;
        } else {
            bus.write(self.addr_abs, value);
        }
    }

    fn branch(&mut self, condition: bool) -> u8 {
        if condition {
            self.cycles += 1;
            self.addr_abs = self.pc.wrapping_add(self.addr_rel);
            if (self.addr_abs & 0xFF00) != (self.pc & 0xFF00) {
                self.cycles += 1;
            }
            self.pc = self.addr_abs;
        }
        0
    }

    fn compare<B: Bus + ?Sized>(&mut self, bus: &mut B, mode: AddressingMode, register: u8) {
        let value = self.fetch(bus, mode);
        self.status.set(Status::CARRY, register >= value);
        self.status.set_zn(register.wrapping_sub(value));
    }

    fn add(&mut self, value: u8) {
        let sum = self.a as u16 + value as u16 + self.status.carry() as u16;
        let result = sum as u8;
        self.status.set(Status::CARRY, sum > 0xFF);
        self.status.set(
            Status::OVERFLOW,
            (!(self.a ^ value) & (self.a ^ result)) & 0x80 != 0,
        );
        self.status.set_zn(result);
        self.a = result;
    }

    /// Run one operation. Returns 1 if it may take the page-cross penalty.
    fn execute<B: Bus + ?Sized>(&mut self, bus: &mut B, op: Operation, mode: AddressingMode) -> u8 {
        match op {
            Operation::Adc => {
                let value = self.fetch(bus, mode);
                self.add(value);
                1
            }
            Operation::Sbc => {
                // A - M - (1 - C) == A + !M + C
                let value = self.fetch(bus, mode);
                self.add(value ^ 0xFF);
                1
            }
            Operation::And => {
                self.a &= self.fetch(bus, mode);
                self.status.set_zn(self.a);
                1
            }
            Operation::Ora => {
                self.a |= self.fetch(bus, mode);
                self.status.set_zn(self.a);
                1
            }
            Operation::Eor => {
                self.a ^= self.fetch(bus, mode);
                self.status.set_zn(self.a);
                1
            }
            Operation::Asl => {
                let value = self.fetch(bus, mode);
                self.status.set(Status::CARRY, value & 0x80 != 0);
                let result = value << 1;
                self.status.set_zn(result);
                self.store(bus, mode, result);
                0
            }
            Operation::Lsr => {
                let value = self.fetch(bus, mode);
                self.status.set(Status::CARRY, value & 0x01 != 0);
                let result = value >> 1;
                self.status.set_zn(result);
                self.store(bus, mode, result);
                0
            }
            Operation::Rol => {
                let value = self.fetch(bus, mode);
                let result = (value << 1) | self.status.carry();
                self.status.set(Status::CARRY, value & 0x80 != 0);
                self.status.set_zn(result);
                self.store(bus, mode, result);
                0
            }
            Operation::Ror => {
                let value = self.fetch(bus, mode);
                let result = (self.status.carry() << 7) | (value >> 1);
                self.status.set(Status::CARRY, value & 0x01 != 0);
                self.status.set_zn(result);
                self.store(bus, mode, result);
                0
            }
            Operation::Bit => {
                let value = self.fetch(bus, mode);
                self.status.set(Status::ZERO, self.a & value == 0);
                self.status.set(Status::NEGATIVE, value & 0x80 != 0);
                self.status.set(Status::OVERFLOW, value & 0x40 != 0);
                0
            }

            Operation::Bcc => self.branch(!self.status.contains(Status::CARRY)),
            Operation::Bcs => self.branch(self.status.contains(Status::CARRY)),
            Operation::Bne => self.branch(!self.status.contains(Status::ZERO)),
            Operation::Beq => self.branch(self.status.contains(Status::ZERO)),
            Operation::Bpl => self.branch(!self.status.contains(Status::NEGATIVE)),
            Operation::Bmi => self.branch(self.status.contains(Status::NEGATIVE)),
            Operation::Bvc => self.branch(!self.status.contains(Status::OVERFLOW)),
            Operation::Bvs => self.branch(self.status.contains(Status::OVERFLOW)),

            Operation::Brk => {
                // Immediate mode already stepped over the padding byte
                self.status.insert(Status::INTERRUPT_DISABLE);
                self.push(bus, (self.pc >> 8) as u8);
                self.push(bus, self.pc as u8);

                self.status.insert(Status::BREAK);
                self.push(bus, (self.status | Status::UNUSED).bits());
                self.status.remove(Status::BREAK);

                self.pc = read_word(bus, IRQ_VECTOR);
                0
            }

            Operation::Clc => self.flag(Status::CARRY, false),
            Operation::Cld => self.flag(Status::DECIMAL, false),
            Operation::Cli => self.flag(Status::INTERRUPT_DISABLE, false),
            Operation::Clv => self.flag(Status::OVERFLOW, false),
            Operation::Sec => self.flag(Status::CARRY, true),
            Operation::Sed => self.flag(Status::DECIMAL, true),
            Operation::Sei => self.flag(Status::INTERRUPT_DISABLE, true),

            Operation::Cmp => {
                self.compare(bus, mode, self.a);
                1
            }
            Operation::Cpx => {
                self.compare(bus, mode, self.x);
                0
            }
            Operation::Cpy => {
                self.compare(bus, mode, self.y);
                0
            }

            Operation::Dec => {
                let result = self.fetch(bus, mode).wrapping_sub(1);
                bus.write(self.addr_abs, result);
                self.status.set_zn(result);
                0
            }
            Operation::Inc => {
                let result = self.fetch(bus, mode).wrapping_add(1);
                bus.write(self.addr_abs, result);
                self.status.set_zn(result);
                0
            }
            Operation::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.status.set_zn(self.x);
                0
            }
            Operation::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.status.set_zn(self.y);
                0
            }
            Operation::Inx => {
                self.x = self.x.wrapping_add(1);
                self.status.set_zn(self.x);
                0
            }
            Operation::Iny => {
                self.y = self.y.wrapping_add(1);
                self.status.set_zn(self.y);
                0
            }

            Operation::Jmp => {
                self.pc = self.addr_abs;
                0
            }
            Operation::Jsr => {
                // Pushes the address of the last operand byte
                let ret = self.pc.wrapping_sub(1);
                self.push(bus, (ret >> 8) as u8);
                self.push(bus, ret as u8);
                self.pc = self.addr_abs;
                0
            }
            Operation::Rts => {
                let lo = self.pop(bus) as u16;
                let hi = self.pop(bus) as u16;
                self.pc = ((hi << 8) | lo).wrapping_add(1);
                0
            }
            Operation::Rti => {
                self.status = Status::from_bits_retain(self.pop(bus));
                self.status.remove(Status::BREAK | Status::UNUSED);
                let lo = self.pop(bus) as u16;
                let hi = self.pop(bus) as u16;
                self.pc = (hi << 8) | lo;
                0
            }

            Operation::Lda => {
                self.a = self.fetch(bus, mode);
                self.status.set_zn(self.a);
                1
            }
            Operation::Ldx => {
                self.x = self.fetch(bus, mode);
                self.status.set_zn(self.x);
                1
            }
            Operation::Ldy => {
                self.y = self.fetch(bus, mode);
                self.status.set_zn(self.y);
                1
            }
            Operation::Sta => {
                bus.write(self.addr_abs, self.a);
                0
            }
            Operation::Stx => {
                bus.write(self.addr_abs, self.x);
                0
            }
            Operation::Sty => {
                bus.write(self.addr_abs, self.y);
                0
            }

            Operation::Pha => {
                self.push(bus, self.a);
                0
            }
            Operation::Php => {
                self.push(bus, (self.status | Status::BREAK | Status::UNUSED).bits());
                0
            }
            Operation::Pla => {
                self.a = self.pop(bus);
                self.status.set_zn(self.a);
                0
            }
            Operation::Plp => {
                self.status = Status::from_bits_retain(self.pop(bus));
                self.status.insert(Status::UNUSED);
                0
            }

            Operation::Tax => {
                self.x = self.a;
                self.status.set_zn(self.x);
                0
            }
            Operation::Tay => {
                self.y = self.a;
                self.status.set_zn(self.y);
                0
            }
            Operation::Tsx => {
                self.x = self.sp;
                self.status.set_zn(self.x);
                0
            }
            Operation::Txa => {
                self.a = self.x;
                self.status.set_zn(self.a);
                0
            }
            Operation::Tya => {
                self.a = self.y;
                self.status.set_zn(self.a);
                0
            }
            Operation::Txs => {
                self.sp = self.x;
                0
            }

            Operation::Nop => match self.opcode {
                0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC => 1,
                _ => 0,
            },
            Operation::Xxx => 0,
        }
    }

    fn flag(&mut self, flag: Status, value: bool) -> u8 {
        self.status.set(flag, value);
        0
    }
}

fn read_word<B: Bus + ?Sized>(bus: &mut B, addr: u16) -> u16 {
    let lo = bus.read(addr) as u16;
    let hi = bus.read(addr.wrapping_add(1)) as u16;
    (hi << 8) | lo
}

fn page_crossed(addr: u16, base_page: u16) -> u8 {
    ((addr & 0xFF00) != base_page) as u8
}
