//! NES PPU (Picture Processing Unit) implementation.
//!
//! Dot-stepped 2C02: 341 dots per scanline, scanlines -1 (pre-render) through 260. Background
//! tiles are fetched through the loopy `v` register into 16-bit shifters; up to eight sprites
//! per line are evaluated at dot 257 and loaded at dot 340. Output is a 256×240 grid of
//! 6-bit system palette indices. Registers: $2000–$2007 (mirrored by the bus).
//!
//! See [PPU rendering](https://www.nesdev.org/wiki/PPU_rendering) and
//! [PPU memory map](https://www.nesdev.org/wiki/PPU_memory_map).

use crate::{
    cartridge::{Cartridge, Mirroring},
    ppu::{
        oam::{ObjectAttributeEntry, Oam},
        registers::{Control, Loopy, Mask, Status},
    },
};

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 240;
/// Side of a rendered pattern table (16×16 tiles of 8×8 pixels).
pub const PATTERN_TABLE_SIZE: usize = 128;

const DOTS_PER_SCANLINE: u16 = 341;
const LAST_SCANLINE: i16 = 260;
const VBLANK_SCANLINE: i16 = 241;
const MAX_SPRITES_PER_LINE: usize = 8;

/// Reverse the bits of a pattern row, for horizontally flipped sprites.
pub fn flip_byte(b: u8) -> u8 {
    b.reverse_bits()
}

/// PPU state: timing, VRAM, palettes, OAM, render pipeline and framebuffer.
pub struct Ppu {
    name_table: [[u8; 1024]; 2],
    /// Pattern RAM used only when the cartridge does not claim $0000–$1FFF.
    pattern_table: [[u8; 4096]; 2],
    palette_table: [u8; 32],
    oam: Oam,
    oam_addr: u8,

    control: Control,
    mask: Mask,
    status: Status,
    vram_addr: Loopy,
    tram_addr: Loopy,
    fine_x: u8,
    address_latch: bool,
    data_buffer: u8,

    scanline: i16,
    cycle: u16,
    frame_complete: bool,
    nmi: bool,

    bg_next_tile_id: u8,
    bg_next_tile_attrib: u8,
    bg_next_tile_lsb: u8,
    bg_next_tile_msb: u8,
    bg_shifter_pattern_lo: u16,
    bg_shifter_pattern_hi: u16,
    bg_shifter_attrib_lo: u16,
    bg_shifter_attrib_hi: u16,

    sprite_scanline: [ObjectAttributeEntry; MAX_SPRITES_PER_LINE],
    sprite_count: usize,
    sprite_shifter_pattern_lo: [u8; MAX_SPRITES_PER_LINE],
    sprite_shifter_pattern_hi: [u8; MAX_SPRITES_PER_LINE],
    sprite_zero_hit_possible: bool,
    sprite_zero_being_rendered: bool,

    frame: Vec<u8>,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    /// Create PPU in initial state (pre-render scanline -1, cycle 0).
    pub fn new() -> Self {
        Self {
            name_table: [[0; 1024]; 2],
            pattern_table: [[0; 4096]; 2],
            palette_table: [0; 32],
            oam: Oam::default(),
            oam_addr: 0,
            control: Control::empty(),
            mask: Mask::empty(),
            status: Status::empty(),
            vram_addr: Loopy::default(),
            tram_addr: Loopy::default(),
            fine_x: 0,
            address_latch: false,
            data_buffer: 0,
            scanline: -1,
            cycle: 0,
            frame_complete: false,
            nmi: false,
            bg_next_tile_id: 0,
            bg_next_tile_attrib: 0,
            bg_next_tile_lsb: 0,
            bg_next_tile_msb: 0,
            bg_shifter_pattern_lo: 0,
            bg_shifter_pattern_hi: 0,
            bg_shifter_attrib_lo: 0,
            bg_shifter_attrib_hi: 0,
            sprite_scanline: [ObjectAttributeEntry::HIDDEN; MAX_SPRITES_PER_LINE],
            sprite_count: 0,
            sprite_shifter_pattern_lo: [0; MAX_SPRITES_PER_LINE],
            sprite_shifter_pattern_hi: [0; MAX_SPRITES_PER_LINE],
            sprite_zero_hit_possible: false,
            sprite_zero_being_rendered: false,
            frame: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    /// Return registers and the render pipeline to power-up state. VRAM, palette RAM and
    /// OAM keep their contents.
    pub fn reset(&mut self) {
        self.fine_x = 0;
        self.address_latch = false;
        self.data_buffer = 0;
        self.scanline = -1;
        self.cycle = 0;
        self.frame_complete = false;
        self.nmi = false;
        self.bg_next_tile_id = 0;
        self.bg_next_tile_attrib = 0;
        self.bg_next_tile_lsb = 0;
        self.bg_next_tile_msb = 0;
        self.bg_shifter_pattern_lo = 0;
        self.bg_shifter_pattern_hi = 0;
        self.bg_shifter_attrib_lo = 0;
        self.bg_shifter_attrib_hi = 0;
        self.sprite_count = 0;
        self.sprite_shifter_pattern_lo = [0; MAX_SPRITES_PER_LINE];
        self.sprite_shifter_pattern_hi = [0; MAX_SPRITES_PER_LINE];
        self.sprite_zero_hit_possible = false;
        self.sprite_zero_being_rendered = false;
        self.status = Status::empty();
        self.mask = Mask::empty();
        self.control = Control::empty();
        self.vram_addr = Loopy::default();
        self.tram_addr = Loopy::default();
    }

    pub fn scanline(&self) -> i16 {
        self.scanline
    }

    pub fn cycle(&self) -> u16 {
        self.cycle
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn vram_addr(&self) -> Loopy {
        self.vram_addr
    }

    pub fn oam(&self) -> &Oam {
        &self.oam
    }

    /// Direct OAM write, used by sprite DMA.
    pub fn oam_write(&mut self, addr: u8, data: u8) {
        self.oam.write(addr, data);
    }

    /// Sprites selected by the last evaluation, in OAM order.
    pub fn sprites_on_scanline(&self) -> &[ObjectAttributeEntry] {
        &self.sprite_scanline[..self.sprite_count]
    }

    /// 256×240 system palette indices, row-major.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn frame_complete(&self) -> bool {
        self.frame_complete
    }

    /// Read and clear the frame-complete flag.
    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }

    /// Read and clear the pending NMI line.
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi)
    }

    /// CPU read of register `reg` (0..=7). `read_only` peeks without side effects.
    pub fn cpu_read(&mut self, cart: &Cartridge, reg: u16, read_only: bool) -> u8 {
        if read_only {
            return match reg & 0x0007 {
                0x0000 => self.control.bits(),
                0x0001 => self.mask.bits(),
                0x0002 => self.status.bits(),
                _ => 0,
            };
        }

        match reg & 0x0007 {
            // PPUSTATUS: stale buffer bits fill the low five
            0x0002 => {
                let data = (self.status.bits() & 0xE0) | (self.data_buffer & 0x1F);
                self.status.remove(Status::VERTICAL_BLANK);
                self.address_latch = false;
                data
            }
            // OAMDATA
            0x0004 => self.oam.read(self.oam_addr),
            // PPUDATA: one read behind, except palette
            0x0007 => {
                let mut data = self.data_buffer;
                self.data_buffer = self.ppu_read(cart, self.vram_addr.0);
                if self.vram_addr.0 >= 0x3F00 {
                    data = self.data_buffer;
                }
                self.increment_vram_addr();
                data
            }
            // PPUCTRL, PPUMASK, OAMADDR, PPUSCROLL, PPUADDR are write-only
            _ => 0,
        }
    }

    /// CPU write of register `reg` (0..=7).
    pub fn cpu_write(&mut self, cart: &mut Cartridge, reg: u16, data: u8) {
        match reg & 0x0007 {
            0x0000 => {
                self.control = Control::from_bits_retain(data);
                self.tram_addr
                    .set_nametable_x(self.control.contains(Control::NAMETABLE_X) as u8);
                self.tram_addr
                    .set_nametable_y(self.control.contains(Control::NAMETABLE_Y) as u8);
            }
            0x0001 => self.mask = Mask::from_bits_retain(data),
            0x0002 => {}
            0x0003 => self.oam_addr = data,
            0x0004 => {
                self.oam.write(self.oam_addr, data);
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            0x0005 => {
                if !self.address_latch {
                    self.fine_x = data & 0x07;
                    self.tram_addr.set_coarse_x(data >> 3);
                } else {
                    self.tram_addr.set_fine_y(data & 0x07);
                    self.tram_addr.set_coarse_y(data >> 3);
                }
                self.address_latch = !self.address_latch;
            }
            0x0006 => {
                if !self.address_latch {
                    self.tram_addr.0 = (((data & 0x3F) as u16) << 8) | (self.tram_addr.0 & 0x00FF);
                } else {
                    self.tram_addr.0 = (self.tram_addr.0 & 0xFF00) | data as u16;
                    self.vram_addr = self.tram_addr;
                }
                self.address_latch = !self.address_latch;
            }
            _ => {
                self.ppu_write(cart, self.vram_addr.0, data);
                self.increment_vram_addr();
            }
        }
    }

    fn increment_vram_addr(&mut self) {
        self.vram_addr.0 = self.vram_addr.0.wrapping_add(self.control.increment());
    }

    /// Read PPU address space ($0000–$3FFF, mirrored above).
    pub fn ppu_read(&self, cart: &Cartridge, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;
        if let Some(data) = cart.ppu_read(addr) {
            return data;
        }

        match addr {
            // Pattern tables
            0x0000..=0x1FFF => {
                self.pattern_table[((addr & 0x1000) >> 12) as usize][(addr & 0x0FFF) as usize]
            }
            // Nametables
            0x2000..=0x3EFF => {
                let (table, offset) = nametable_index(cart.mirroring(), addr);
                self.name_table[table][offset]
            }
            // Palette RAM
            _ => {
                let gray = if self.mask.contains(Mask::GRAYSCALE) { 0x30 } else { 0x3F };
                self.palette_table[palette_index(addr)] & gray
            }
        }
    }

    /// Write PPU address space ($0000–$3FFF, mirrored above).
    pub fn ppu_write(&mut self, cart: &mut Cartridge, addr: u16, data: u8) {
        let addr = addr & 0x3FFF;
        if cart.ppu_write(addr, data) {
            return;
        }

        match addr {
            0x0000..=0x1FFF => {
                self.pattern_table[((addr & 0x1000) >> 12) as usize][(addr & 0x0FFF) as usize] =
                    data;
            }
            0x2000..=0x3EFF => {
                let (table, offset) = nametable_index(cart.mirroring(), addr);
                self.name_table[table][offset] = data;
            }
            _ => self.palette_table[palette_index(addr)] = data,
        }
    }

    /// System palette index for `pixel` (0..4) of `palette` (0..8).
    fn color_index(&self, cart: &Cartridge, palette: u8, pixel: u8) -> u8 {
        self.ppu_read(cart, 0x3F00 + ((palette as u16) << 2) + pixel as u16) & 0x3F
    }

    /// Render pattern table `index` (0 or 1) as 128×128 palette indices using `palette`.
    pub fn pattern_table(&self, cart: &Cartridge, index: u8, palette: u8) -> Vec<u8> {
        let mut out = vec![0; PATTERN_TABLE_SIZE * PATTERN_TABLE_SIZE];
        let base = (index as u16 & 1) * 0x1000;

        for tile_y in 0..16u16 {
            for tile_x in 0..16u16 {
                let offset = tile_y * 256 + tile_x * 16;
                for row in 0..8u16 {
                    let mut lo = self.ppu_read(cart, base + offset + row);
                    let mut hi = self.ppu_read(cart, base + offset + row + 8);
                    for col in 0..8u16 {
                        let pixel = ((hi & 0x01) << 1) | (lo & 0x01);
                        lo >>= 1;
                        hi >>= 1;

                        let x = (tile_x * 8 + (7 - col)) as usize;
                        let y = (tile_y * 8 + row) as usize;
                        out[y * PATTERN_TABLE_SIZE + x] = self.color_index(cart, palette, pixel);
                    }
                }
            }
        }
        out
    }

    /// Advance one dot.
    pub fn clock(&mut self, cart: &mut Cartridge) {
        if self.scanline >= -1 && self.scanline < 240 {
            self.render_dot(cart);
        }

        if self.scanline == VBLANK_SCANLINE && self.cycle == 1 {
            self.status.insert(Status::VERTICAL_BLANK);
            if self.control.contains(Control::ENABLE_NMI) {
                self.nmi = true;
            }
        }

        self.compose_pixel(cart);

        self.cycle += 1;
        if self.cycle >= DOTS_PER_SCANLINE {
            self.cycle = 0;
            self.scanline += 1;
            if self.scanline > LAST_SCANLINE {
                self.scanline = -1;
                self.frame_complete = true;
            }
        }
    }

    /// Background fetches, scroll updates and sprite evaluation for lines -1..=239.
    fn render_dot(&mut self, cart: &Cartridge) {
        // Dot (0,0) is skipped while rendering
        if self.scanline == 0 && self.cycle == 0 && self.mask.rendering() {
            self.cycle = 1;
        }

        if self.scanline == -1 && self.cycle == 1 {
            self.status.remove(
                Status::VERTICAL_BLANK | Status::SPRITE_OVERFLOW | Status::SPRITE_ZERO_HIT,
            );
            self.sprite_count = 0;
            self.sprite_shifter_pattern_lo = [0; MAX_SPRITES_PER_LINE];
            self.sprite_shifter_pattern_hi = [0; MAX_SPRITES_PER_LINE];
        }

        if (2..258).contains(&self.cycle) || (321..338).contains(&self.cycle) {
            self.update_shifters();

            match (self.cycle - 1) % 8 {
                0 => {
                    self.load_background_shifters();
                    self.bg_next_tile_id = self.ppu_read(cart, 0x2000 | (self.vram_addr.0 & 0x0FFF));
                }
                2 => {
                    let v = self.vram_addr;
                    let addr = 0x23C0
                        | ((v.nametable_y() as u16) << 11)
                        | ((v.nametable_x() as u16) << 10)
                        | (((v.coarse_y() >> 2) as u16) << 3)
                        | (v.coarse_x() >> 2) as u16;
                    let mut attrib = self.ppu_read(cart, addr);
                    if v.coarse_y() & 0x02 != 0 {
                        attrib >>= 4;
                    }
                    if v.coarse_x() & 0x02 != 0 {
                        attrib >>= 2;
                    }
                    self.bg_next_tile_attrib = attrib & 0x03;
                }
                4 => {
                    let addr = self.background_pattern_addr();
                    self.bg_next_tile_lsb = self.ppu_read(cart, addr);
                }
                6 => {
                    let addr = self.background_pattern_addr() + 8;
                    self.bg_next_tile_msb = self.ppu_read(cart, addr);
                }
                7 => self.increment_scroll_x(),
                _ => {}
            }
        }

        if self.cycle == 256 {
            self.increment_scroll_y();
        }

        if self.cycle == 257 {
            self.load_background_shifters();
            self.transfer_address_x();
            if self.scanline >= 0 {
                self.evaluate_sprites();
            }
        }

        // Unused nametable fetches at the end of the line
        if self.cycle == 338 || self.cycle == 340 {
            self.bg_next_tile_id = self.ppu_read(cart, 0x2000 | (self.vram_addr.0 & 0x0FFF));
        }

        if self.cycle == 340 {
            self.load_sprite_patterns(cart);
        }

        if self.scanline == -1 && (280..305).contains(&self.cycle) {
            self.transfer_address_y();
        }
    }

    fn background_pattern_addr(&self) -> u16 {
        ((self.control.contains(Control::PATTERN_BACKGROUND) as u16) << 12)
            + ((self.bg_next_tile_id as u16) << 4)
            + self.vram_addr.fine_y() as u16
    }

    fn increment_scroll_x(&mut self) {
        if !self.mask.rendering() {
            return;
        }
        let v = &mut self.vram_addr;
        if v.coarse_x() == 31 {
            v.set_coarse_x(0);
            v.set_nametable_x(v.nametable_x() ^ 1);
        } else {
            v.set_coarse_x(v.coarse_x() + 1);
        }
    }

    fn increment_scroll_y(&mut self) {
        if !self.mask.rendering() {
            return;
        }
        let v = &mut self.vram_addr;
        if v.fine_y() < 7 {
            v.set_fine_y(v.fine_y() + 1);
            return;
        }

        v.set_fine_y(0);
        match v.coarse_y() {
            29 => {
                v.set_coarse_y(0);
                v.set_nametable_y(v.nametable_y() ^ 1);
            }
            // Attribute rows: wraps without switching nametable
            31 => v.set_coarse_y(0),
            row => v.set_coarse_y(row + 1),
        }
    }

    fn transfer_address_x(&mut self) {
        if !self.mask.rendering() {
            return;
        }
        self.vram_addr.set_nametable_x(self.tram_addr.nametable_x());
        self.vram_addr.set_coarse_x(self.tram_addr.coarse_x());
    }

    fn transfer_address_y(&mut self) {
        if !self.mask.rendering() {
            return;
        }
        self.vram_addr.set_fine_y(self.tram_addr.fine_y());
        self.vram_addr.set_nametable_y(self.tram_addr.nametable_y());
        self.vram_addr.set_coarse_y(self.tram_addr.coarse_y());
    }

    fn load_background_shifters(&mut self) {
        self.bg_shifter_pattern_lo =
            (self.bg_shifter_pattern_lo & 0xFF00) | self.bg_next_tile_lsb as u16;
        self.bg_shifter_pattern_hi =
            (self.bg_shifter_pattern_hi & 0xFF00) | self.bg_next_tile_msb as u16;

        let attrib_lo = if self.bg_next_tile_attrib & 0x01 != 0 { 0xFF } else { 0x00 };
        let attrib_hi = if self.bg_next_tile_attrib & 0x02 != 0 { 0xFF } else { 0x00 };
        self.bg_shifter_attrib_lo = (self.bg_shifter_attrib_lo & 0xFF00) | attrib_lo;
        self.bg_shifter_attrib_hi = (self.bg_shifter_attrib_hi & 0xFF00) | attrib_hi;
    }

    fn update_shifters(&mut self) {
        if self.mask.contains(Mask::RENDER_BACKGROUND) {
            self.bg_shifter_pattern_lo <<= 1;
            self.bg_shifter_pattern_hi <<= 1;
            self.bg_shifter_attrib_lo <<= 1;
            self.bg_shifter_attrib_hi <<= 1;
        }

        if self.mask.contains(Mask::RENDER_SPRITES) && self.cycle >= 1 && self.cycle < 258 {
            for i in 0..self.sprite_count {
                let sprite = &mut self.sprite_scanline[i];
                if sprite.x > 0 {
                    sprite.x -= 1;
                } else {
                    self.sprite_shifter_pattern_lo[i] <<= 1;
                    self.sprite_shifter_pattern_hi[i] <<= 1;
                }
            }
        }
    }

    /// Select up to eight sprites covering the current scanline. A ninth sets overflow.
    fn evaluate_sprites(&mut self) {
        self.sprite_scanline = [ObjectAttributeEntry::HIDDEN; MAX_SPRITES_PER_LINE];
        self.sprite_count = 0;
        self.sprite_shifter_pattern_lo = [0; MAX_SPRITES_PER_LINE];
        self.sprite_shifter_pattern_hi = [0; MAX_SPRITES_PER_LINE];
        self.sprite_zero_hit_possible = false;

        let height = self.control.sprite_height();
        for index in 0..64 {
            let entry = self.oam.entry(index);
            let diff = self.scanline - entry.y as i16;
            if !(0..height).contains(&diff) {
                continue;
            }

            if self.sprite_count == MAX_SPRITES_PER_LINE {
                self.status.insert(Status::SPRITE_OVERFLOW);
                break;
            }
            if index == 0 {
                self.sprite_zero_hit_possible = true;
            }
            self.sprite_scanline[self.sprite_count] = entry;
            self.sprite_count += 1;
        }
    }

    fn load_sprite_patterns(&mut self, cart: &Cartridge) {
        for i in 0..self.sprite_count {
            let sprite = self.sprite_scanline[i];
            let flip_v = sprite.attribute & ObjectAttributeEntry::FLIP_VERTICAL != 0;
            let row = (self.scanline - sprite.y as i16) as u16;

            let addr_lo = if !self.control.contains(Control::SPRITE_SIZE) {
                let row = if flip_v { 7 - (row & 0x07) } else { row & 0x07 };
                ((self.control.contains(Control::PATTERN_SPRITE) as u16) << 12)
                    | ((sprite.id as u16) << 4)
                    | row
            } else {
                // 8×16: bit 0 of the id picks the table, the rest the top tile
                let table = ((sprite.id & 0x01) as u16) << 12;
                let top = (sprite.id & 0xFE) as u16;
                let tile = match (row < 8, flip_v) {
                    (true, false) | (false, true) => top,
                    (false, false) | (true, true) => top + 1,
                };
                let row = if flip_v { 7 - (row & 0x07) } else { row & 0x07 };
                table | (tile << 4) | row
            };

            let mut lo = self.ppu_read(cart, addr_lo);
            let mut hi = self.ppu_read(cart, addr_lo + 8);
            if sprite.attribute & ObjectAttributeEntry::FLIP_HORIZONTAL != 0 {
                lo = flip_byte(lo);
                hi = flip_byte(hi);
            }
            self.sprite_shifter_pattern_lo[i] = lo;
            self.sprite_shifter_pattern_hi[i] = hi;
        }
    }

    /// Mix background and sprite pixels for the current dot into the framebuffer.
    fn compose_pixel(&mut self, cart: &Cartridge) {
        let mut bg_pixel = 0u8;
        let mut bg_palette = 0u8;
        if self.mask.contains(Mask::RENDER_BACKGROUND) {
            let bit_mux = 0x8000u16 >> self.fine_x;

            let p0 = (self.bg_shifter_pattern_lo & bit_mux != 0) as u8;
            let p1 = (self.bg_shifter_pattern_hi & bit_mux != 0) as u8;
            bg_pixel = (p1 << 1) | p0;

            let a0 = (self.bg_shifter_attrib_lo & bit_mux != 0) as u8;
            let a1 = (self.bg_shifter_attrib_hi & bit_mux != 0) as u8;
            bg_palette = (a1 << 1) | a0;
        }

        let mut fg_pixel = 0u8;
        let mut fg_palette = 0u8;
        let mut fg_priority = false;
        if self.mask.contains(Mask::RENDER_SPRITES) {
            self.sprite_zero_being_rendered = false;
            for i in 0..self.sprite_count {
                let sprite = self.sprite_scanline[i];
                if sprite.x != 0 {
                    continue;
                }
                let lo = (self.sprite_shifter_pattern_lo[i] & 0x80 != 0) as u8;
                let hi = (self.sprite_shifter_pattern_hi[i] & 0x80 != 0) as u8;
                fg_pixel = (hi << 1) | lo;
                fg_palette = (sprite.attribute & 0x03) + 0x04;
                fg_priority = sprite.attribute & ObjectAttributeEntry::PRIORITY_BEHIND == 0;

                if fg_pixel != 0 {
                    if i == 0 {
                        self.sprite_zero_being_rendered = true;
                    }
                    break;
                }
            }
        }

        let (pixel, palette) = match (bg_pixel, fg_pixel) {
            (0, 0) => (0, 0),
            (0, _) => (fg_pixel, fg_palette),
            (_, 0) => (bg_pixel, bg_palette),
            _ => {
                self.check_sprite_zero_hit();
                if fg_priority {
                    (fg_pixel, fg_palette)
                } else {
                    (bg_pixel, bg_palette)
                }
            }
        };

        let x = self.cycle as i32 - 1;
        let y = self.scanline as i32;
        if (0..SCREEN_WIDTH as i32).contains(&x) && (0..SCREEN_HEIGHT as i32).contains(&y) {
            self.frame[y as usize * SCREEN_WIDTH + x as usize] =
                self.color_index(cart, palette, pixel);
        }
    }

    fn check_sprite_zero_hit(&mut self) {
        let both_layers = Mask::RENDER_BACKGROUND | Mask::RENDER_SPRITES;
        if !(self.sprite_zero_hit_possible
            && self.sprite_zero_being_rendered
            && self.mask.contains(both_layers))
        {
            return;
        }

        // Left 8 pixels only count when neither layer is clipped there
        let both_left = Mask::RENDER_BACKGROUND_LEFT | Mask::RENDER_SPRITES_LEFT;
        let first_dot = if self.mask.contains(both_left) { 1 } else { 9 };
        if (first_dot..258).contains(&self.cycle) {
            self.status.insert(Status::SPRITE_ZERO_HIT);
        }
    }
}

/// Physical table and offset for a nametable address under `mirroring`.
fn nametable_index(mirroring: Mirroring, addr: u16) -> (usize, usize) {
    let addr = addr & 0x0FFF;
    let quadrant = (addr >> 10) as usize;
    let table = match mirroring {
        Mirroring::Vertical => quadrant & 1,
        Mirroring::Horizontal => quadrant >> 1,
        Mirroring::OneScreenLower => 0,
        Mirroring::OneScreenUpper => 1,
    };
    (table, (addr & 0x03FF) as usize)
}

/// Palette RAM index with the sprite backdrop entries folded onto the background ones.
fn palette_index(addr: u16) -> usize {
    let mut index = addr & 0x001F;
    if index & 0x0013 == 0x0010 {
        index &= !0x0010;
    }
    index as usize
}
