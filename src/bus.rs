//! Memory bus and address decoding for the NES.
//!
//! Maps CPU addresses to RAM, PPU registers, cartridge, OAM DMA and controllers, and drives
//! the system clock: one PPU dot per tick, one CPU cycle (or DMA step) every third tick.
//! See [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map).

use log::{debug, info};

use crate::{
    cartridge::Cartridge,
    controller::{Buttons, Controller},
    cpu::Cpu,
    ppu::Ppu,
};

/// Trait for memory-mapped I/O and bus access used by the CPU.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);
}

pub const RAM_SIZE: usize = 2048;

/// OAM DMA ($4014) progress. A transfer waits for an odd cycle, then alternates
/// read and write for 256 bytes.
#[derive(Clone, Copy, Debug)]
struct Dma {
    page: u8,
    addr: u8,
    data: u8,
    dummy: bool,
    transfer: bool,
}

impl Default for Dma {
    fn default() -> Self {
        Self {
            page: 0,
            addr: 0,
            data: 0,
            dummy: true,
            transfer: false,
        }
    }
}

/// Everything on the CPU side of the bus except the CPU itself.
pub struct MemoryMap {
    pub ram: [u8; RAM_SIZE],
    pub ppu: Ppu,
    pub cart: Cartridge,
    controllers: [Controller; 2],
    dma: Dma,
}

impl MemoryMap {
    fn new(cart: Cartridge) -> Self {
        Self {
            ram: [0; RAM_SIZE],
            ppu: Ppu::new(),
            cart,
            controllers: [Controller::new(); 2],
            dma: Dma::default(),
        }
    }

    /// CPU-space read. `read_only` suppresses PPU and controller side effects.
    pub fn cpu_read(&mut self, addr: u16, read_only: bool) -> u8 {
        if let Some(data) = self.cart.cpu_read(addr) {
            return data;
        }

        match addr {
            // Internal RAM (mirrored 4x in 0x0000-0x1FFF)
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            // PPU registers $2000-$3FFF (mirrored every 8 bytes)
            0x2000..=0x3FFF => self.ppu.cpu_read(&self.cart, addr & 0x0007, read_only),
            0x4016..=0x4017 => {
                let pad = &mut self.controllers[(addr & 0x0001) as usize];
                if read_only { pad.peek() } else { pad.read() }
            }
            // APU, expansion: open bus
            _ => 0,
        }
    }

    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        if self.cart.cpu_write(addr, data) {
            return;
        }

        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize] = data,
            0x2000..=0x3FFF => self.ppu.cpu_write(&mut self.cart, addr & 0x0007, data),
            0x4014 => {
                debug!("OAM DMA from page ${:02X}", data);
                self.dma.page = data;
                self.dma.addr = 0;
                self.dma.transfer = true;
            }
            0x4016..=0x4017 => self.controllers[(addr & 0x0001) as usize].write(data),
            _ => {}
        }
    }

    /// One DMA step on the CPU cycle at system tick `tick`.
    fn dma_step(&mut self, tick: u64) {
        if self.dma.dummy {
            // Wait for an odd cycle before the first read
            if tick % 2 == 1 {
                self.dma.dummy = false;
            }
        } else if tick % 2 == 0 {
            let addr = ((self.dma.page as u16) << 8) | self.dma.addr as u16;
            self.dma.data = self.cpu_read(addr, false);
        } else {
            self.ppu.oam_write(self.dma.addr, self.dma.data);
            self.dma.addr = self.dma.addr.wrapping_add(1);
            if self.dma.addr == 0 {
                self.dma.transfer = false;
                self.dma.dummy = true;
            }
        }
    }
}

impl Bus for MemoryMap {
    fn read(&mut self, addr: u16) -> u8 {
        self.cpu_read(addr, false)
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.cpu_write(addr, data);
    }
}

/// The whole console: CPU plus everything it can address.
pub struct NesBus {
    pub cpu: Cpu,
    pub memory: MemoryMap,
    clock_counter: u64,
}

impl NesBus {
    /// Create a new bus with the given cartridge. Call [`reset`](Self::reset) before clocking.
    pub fn new(cart: Cartridge) -> Self {
        Self {
            cpu: Cpu::new(),
            memory: MemoryMap::new(cart),
            clock_counter: 0,
        }
    }

    pub fn reset(&mut self) {
        self.memory.cart.reset();
        self.cpu.reset(&mut self.memory);
        self.memory.ppu.reset();
        self.memory.dma = Dma::default();
        self.clock_counter = 0;
        info!("system reset, PC=${:04X}", self.cpu.pc);
    }

    /// Advance one PPU dot. Every third call also advances the CPU or the DMA unit.
    pub fn clock(&mut self) {
        self.memory.ppu.clock(&mut self.memory.cart);

        if self.clock_counter % 3 == 0 {
            if self.memory.dma.transfer {
                self.memory.dma_step(self.clock_counter);
            } else {
                self.cpu.clock(&mut self.memory);
            }
        }

        if self.memory.ppu.take_nmi() {
            self.cpu.nmi(&mut self.memory);
        }

        self.clock_counter += 1;
    }

    /// Raw CPU-space read for inspectors. `read_only` avoids register side effects.
    pub fn cpu_read(&mut self, addr: u16, read_only: bool) -> u8 {
        self.memory.cpu_read(addr, read_only)
    }

    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        self.memory.cpu_write(addr, data);
    }

    /// Set the buttons held on controller `port` (0 or 1). Other ports are ignored.
    pub fn set_controller(&mut self, port: usize, buttons: Buttons) {
        if let Some(pad) = self.memory.controllers.get_mut(port) {
            pad.state = buttons;
        }
    }

    pub fn ppu(&self) -> &Ppu {
        &self.memory.ppu
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.memory.cart
    }

    /// Current 256×240 framebuffer of system palette indices.
    pub fn frame(&self) -> &[u8] {
        self.memory.ppu.frame()
    }

    /// Pattern table `index` rendered with `palette`, 128×128 palette indices.
    pub fn pattern_table(&self, index: u8, palette: u8) -> Vec<u8> {
        self.memory.ppu.pattern_table(&self.memory.cart, index, palette)
    }

    pub fn take_frame_complete(&mut self) -> bool {
        self.memory.ppu.take_frame_complete()
    }

    pub fn dma_active(&self) -> bool {
        self.memory.dma.transfer
    }

    /// System ticks (PPU dots) since the last reset.
    pub fn clock_counter(&self) -> u64 {
        self.clock_counter
    }
}
