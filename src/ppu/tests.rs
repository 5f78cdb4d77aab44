use crate::{
    cartridge::{
        cartridge::{ines_image, CHR_BANK_SIZE, PRG_BANK_SIZE},
        Cartridge,
    },
    ppu::{
        flip_byte,
        registers::{Control, Loopy, Mask, Status},
        Ppu, PATTERN_TABLE_SIZE, SCREEN_WIDTH,
    },
};

const DOTS_PER_FRAME: usize = 341 * 262;

/// NROM cartridge whose CHR ROM starts with `chr`. `flags6` bit 0 selects vertical mirroring.
fn cart(chr: &[u8], flags6: u8) -> Cartridge {
    let mut chr_rom = vec![0; CHR_BANK_SIZE];
    chr_rom[..chr.len()].copy_from_slice(chr);
    Cartridge::from_bytes(&ines_image(&vec![0; PRG_BANK_SIZE], &chr_rom, flags6)).unwrap()
}

fn run_until(ppu: &mut Ppu, cart: &mut Cartridge, scanline: i16, cycle: u16) {
    while !(ppu.scanline() == scanline && ppu.cycle() == cycle) {
        ppu.clock(cart);
    }
}

fn set_vram_addr(ppu: &mut Ppu, cart: &mut Cartridge, addr: u16) {
    ppu.cpu_write(cart, 6, (addr >> 8) as u8);
    ppu.cpu_write(cart, 6, addr as u8);
}

fn write_sprite(ppu: &mut Ppu, cart: &mut Cartridge, index: u8, bytes: [u8; 4]) {
    ppu.cpu_write(cart, 3, index * 4);
    for b in bytes {
        ppu.cpu_write(cart, 4, b);
    }
}

fn hide_all_sprites(ppu: &mut Ppu) {
    for addr in 0..=255u8 {
        ppu.oam_write(addr, 0xFF);
    }
}

#[test]
fn frame_cadence_from_reset() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();

    let mut completions = 0;
    for _ in 0..DOTS_PER_FRAME {
        ppu.clock(&mut cart);
        if ppu.take_frame_complete() {
            completions += 1;
        }
    }

    assert_eq!(completions, 1);
    assert_eq!((ppu.scanline(), ppu.cycle()), (-1, 0));
}

#[test]
fn rendering_skips_first_dot_of_line_zero() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();
    ppu.cpu_write(&mut cart, 1, Mask::RENDER_BACKGROUND.bits());

    let mut dots = 0;
    while !ppu.frame_complete() {
        ppu.clock(&mut cart);
        dots += 1;
    }
    assert_eq!(dots, DOTS_PER_FRAME - 1);
}

#[test]
fn vblank_raises_nmi_when_enabled() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();
    ppu.cpu_write(&mut cart, 0, 0x80);

    run_until(&mut ppu, &mut cart, 241, 2);
    assert!(ppu.status().contains(Status::VERTICAL_BLANK));
    assert!(ppu.take_nmi());
    assert!(!ppu.take_nmi());

    // Pre-render dot 1 clears vblank
    run_until(&mut ppu, &mut cart, -1, 2);
    assert!(!ppu.status().contains(Status::VERTICAL_BLANK));
}

#[test]
fn vblank_without_nmi_enable_stays_quiet() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();

    run_until(&mut ppu, &mut cart, 241, 2);
    assert!(ppu.status().contains(Status::VERTICAL_BLANK));
    assert!(!ppu.take_nmi());
}

#[test]
fn status_read_clears_vblank_and_latch() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();
    run_until(&mut ppu, &mut cart, 241, 2);

    // Leave the address latch half-written
    ppu.cpu_write(&mut cart, 6, 0x12);

    assert_eq!(ppu.cpu_read(&cart, 2, true) & 0x80, 0x80);
    assert_eq!(ppu.cpu_read(&cart, 2, false) & 0x80, 0x80);
    assert_eq!(ppu.cpu_read(&cart, 2, false) & 0x80, 0x00);

    set_vram_addr(&mut ppu, &mut cart, 0x3F00);
    assert_eq!(ppu.vram_addr().0, 0x3F00);
}

#[test]
fn read_only_peek_has_no_side_effects() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();
    run_until(&mut ppu, &mut cart, 241, 2);

    ppu.cpu_read(&cart, 2, true);
    assert!(ppu.status().contains(Status::VERTICAL_BLANK));
}

#[test]
fn ppudata_reads_are_buffered() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();

    set_vram_addr(&mut ppu, &mut cart, 0x2108);
    ppu.cpu_write(&mut cart, 7, 0x42);
    ppu.cpu_write(&mut cart, 7, 0x43);
    assert_eq!(ppu.vram_addr().0, 0x210A);

    set_vram_addr(&mut ppu, &mut cart, 0x2108);
    assert_eq!(ppu.cpu_read(&cart, 7, false), 0x00);
    assert_eq!(ppu.cpu_read(&cart, 7, false), 0x42);
    assert_eq!(ppu.cpu_read(&cart, 7, false), 0x43);
}

#[test]
fn palette_reads_are_immediate() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();

    set_vram_addr(&mut ppu, &mut cart, 0x3F01);
    ppu.cpu_write(&mut cart, 7, 0x2C);

    set_vram_addr(&mut ppu, &mut cart, 0x3F01);
    assert_eq!(ppu.cpu_read(&cart, 7, false), 0x2C);
}

#[test]
fn increment_mode_steps_by_row() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();
    ppu.cpu_write(&mut cart, 0, 0x04);

    set_vram_addr(&mut ppu, &mut cart, 0x2000);
    ppu.cpu_write(&mut cart, 7, 0x01);
    assert_eq!(ppu.vram_addr().0, 0x2020);
}

#[test]
fn scroll_writes_fill_temp_register() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();
    // Rendering on so the temp register is copied into v during the frame
    ppu.cpu_write(&mut cart, 1, Mask::RENDER_BACKGROUND.bits());
    ppu.cpu_write(&mut cart, 5, 0b0111_1101);
    ppu.cpu_write(&mut cart, 5, 0b0101_1110);

    // Transfer-Y runs on pre-render dots 280..305, transfer-X at dot 257
    run_until(&mut ppu, &mut cart, -1, 306);
    let v = ppu.vram_addr();
    assert_eq!(v.coarse_y(), 0b01011);
    assert_eq!(v.fine_y(), 0b110);
    assert_eq!(v.coarse_x(), 0b01111);
}

/// Scroll to row `y` with `control`, render from reset and return v on either side of
/// the vertical increment at dot 256 of line 0.
fn vertical_increment(control: Control, y: u8) -> (Loopy, Loopy) {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();
    ppu.cpu_write(&mut cart, 0, control.bits());
    ppu.cpu_write(&mut cart, 1, Mask::RENDER_BACKGROUND.bits());
    ppu.cpu_write(&mut cart, 5, 0);
    ppu.cpu_write(&mut cart, 5, y);

    run_until(&mut ppu, &mut cart, 0, 256);
    let before = ppu.vram_addr();
    ppu.clock(&mut cart);
    (before, ppu.vram_addr())
}

#[test]
fn fine_y_carries_into_coarse_y() {
    let (before, after) = vertical_increment(Control::empty(), 5 * 8 + 7);
    assert_eq!((before.coarse_y(), before.fine_y()), (5, 7));
    assert_eq!((after.coarse_y(), after.fine_y(), after.nametable_y()), (6, 0, 0));
}

#[test]
fn coarse_y_wraps_at_row_29_into_next_nametable() {
    let (before, after) = vertical_increment(Control::empty(), 29 * 8 + 7);
    assert_eq!((before.coarse_y(), before.fine_y(), before.nametable_y()), (29, 7, 0));
    assert_eq!((after.coarse_y(), after.fine_y(), after.nametable_y()), (0, 0, 1));
}

#[test]
fn coarse_y_wraps_at_row_31_in_same_nametable() {
    let (before, after) = vertical_increment(Control::NAMETABLE_Y, 31 * 8 + 7);
    assert_eq!((before.coarse_y(), before.fine_y(), before.nametable_y()), (31, 7, 1));
    assert_eq!((after.coarse_y(), after.fine_y(), after.nametable_y()), (0, 0, 1));
}

#[test]
fn coarse_x_wraps_into_next_nametable() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();
    ppu.cpu_write(&mut cart, 1, Mask::RENDER_BACKGROUND.bits());
    ppu.cpu_write(&mut cart, 5, 31 * 8);
    ppu.cpu_write(&mut cart, 5, 0);

    // Transfer-X at dot 257 loads coarse-X 31; the prefetch increments at 328 and 336
    run_until(&mut ppu, &mut cart, -1, 328);
    let before = ppu.vram_addr();
    assert_eq!((before.coarse_x(), before.nametable_x()), (31, 0));

    ppu.clock(&mut cart);
    let after = ppu.vram_addr();
    assert_eq!((after.coarse_x(), after.nametable_x()), (0, 1));

    run_until(&mut ppu, &mut cart, -1, 337);
    let next = ppu.vram_addr();
    assert_eq!((next.coarse_x(), next.nametable_x()), (1, 1));
}

#[test]
fn palette_backdrop_mirrors() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();

    for (mirror, base) in [(0x3F10, 0x3F00), (0x3F14, 0x3F04), (0x3F18, 0x3F08), (0x3F1C, 0x3F0C)] {
        ppu.ppu_write(&mut cart, mirror, 0x30 | (base as u8 & 0x0F));
        assert_eq!(ppu.ppu_read(&cart, base), 0x30 | (base as u8 & 0x0F));
    }

    // Sprite palette colors proper do not alias
    ppu.ppu_write(&mut cart, 0x3F11, 0x05);
    assert_ne!(ppu.ppu_read(&cart, 0x3F01), 0x05);

    // Palette repeats every 32 bytes up to $3FFF
    assert_eq!(ppu.ppu_read(&cart, 0x3F31), 0x05);
}

#[test]
fn grayscale_masks_palette_reads() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();
    ppu.ppu_write(&mut cart, 0x3F01, 0x2A);

    ppu.cpu_write(&mut cart, 1, Mask::GRAYSCALE.bits());
    assert_eq!(ppu.ppu_read(&cart, 0x3F01), 0x20);
}

#[test]
fn vertical_mirroring_pairs_left_and_right() {
    let mut cart = cart(&[], 0x01);
    let mut ppu = Ppu::new();

    ppu.ppu_write(&mut cart, 0x2005, 0x11);
    ppu.ppu_write(&mut cart, 0x2405, 0x22);
    assert_eq!(ppu.ppu_read(&cart, 0x2805), 0x11);
    assert_eq!(ppu.ppu_read(&cart, 0x2C05), 0x22);
    // $3000-$3EFF mirrors $2000-$2EFF
    assert_eq!(ppu.ppu_read(&cart, 0x3005), 0x11);
}

#[test]
fn horizontal_mirroring_pairs_top_and_bottom() {
    let mut cart = cart(&[], 0x00);
    let mut ppu = Ppu::new();

    ppu.ppu_write(&mut cart, 0x2005, 0x11);
    ppu.ppu_write(&mut cart, 0x2805, 0x22);
    assert_eq!(ppu.ppu_read(&cart, 0x2405), 0x11);
    assert_eq!(ppu.ppu_read(&cart, 0x2C05), 0x22);
}

#[test]
fn chr_ram_is_writable() {
    let rom = ines_image(&vec![0; PRG_BANK_SIZE], &[], 0);
    let mut cart = Cartridge::from_bytes(&rom).unwrap();
    let mut ppu = Ppu::new();

    ppu.ppu_write(&mut cart, 0x1234, 0x77);
    assert_eq!(ppu.ppu_read(&cart, 0x1234), 0x77);
}

#[test]
fn oam_ports_read_and_write() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();

    write_sprite(&mut ppu, &mut cart, 1, [0x10, 0x20, 0x30, 0x40]);
    assert_eq!(ppu.oam().entry(1).id, 0x20);

    ppu.cpu_write(&mut cart, 3, 0x04);
    assert_eq!(ppu.cpu_read(&cart, 4, false), 0x10);
}

#[test]
fn ninth_sprite_sets_overflow() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();
    hide_all_sprites(&mut ppu);
    for i in 0..9 {
        write_sprite(&mut ppu, &mut cart, i, [10, i, 0, 8 * i]);
    }

    run_until(&mut ppu, &mut cart, 10, 258);

    assert!(ppu.status().contains(Status::SPRITE_OVERFLOW));
    let ids: Vec<u8> = ppu.sprites_on_scanline().iter().map(|s| s.id).collect();
    assert_eq!(ids, (0..8).collect::<Vec<u8>>());
}

#[test]
fn eight_sprites_do_not_overflow() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();
    hide_all_sprites(&mut ppu);
    for i in 0..8 {
        write_sprite(&mut ppu, &mut cart, i + 20, [10, i, 0, 0]);
    }

    run_until(&mut ppu, &mut cart, 10, 258);

    assert!(!ppu.status().contains(Status::SPRITE_OVERFLOW));
    assert_eq!(ppu.sprites_on_scanline().len(), 8);
}

#[test]
fn tall_sprites_cover_sixteen_lines() {
    let mut cart = cart(&[], 0);
    let mut ppu = Ppu::new();
    hide_all_sprites(&mut ppu);
    ppu.cpu_write(&mut cart, 0, 0x20);
    write_sprite(&mut ppu, &mut cart, 0, [10, 0, 0, 0]);

    run_until(&mut ppu, &mut cart, 25, 258);
    assert_eq!(ppu.sprites_on_scanline().len(), 1);

    run_until(&mut ppu, &mut cart, 26, 258);
    assert!(ppu.sprites_on_scanline().is_empty());
}

/// Sprites only, on the left column too, with sprite palette 0 set to two colors.
fn sprite_scene(chr: &[u8], control: Control) -> (Ppu, Cartridge) {
    let mut cart = cart(chr, 0);
    let mut ppu = Ppu::new();
    ppu.ppu_write(&mut cart, 0x3F00, 0x0F);
    ppu.ppu_write(&mut cart, 0x3F11, 0x16);
    ppu.ppu_write(&mut cart, 0x3F12, 0x2A);
    hide_all_sprites(&mut ppu);
    ppu.cpu_write(&mut cart, 0, control.bits());
    ppu.cpu_write(&mut cart, 1, (Mask::RENDER_SPRITES | Mask::RENDER_SPRITES_LEFT).bits());
    (ppu, cart)
}

fn pixel(ppu: &Ppu, x: usize, y: usize) -> u8 {
    ppu.frame()[y * SCREEN_WIDTH + x]
}

#[test]
fn sprite_flips_move_the_marked_corner() {
    // Tile 1: only its top-left pixel is set
    let mut chr = vec![0; 32];
    chr[16] = 0x80;
    let (mut ppu, mut cart) = sprite_scene(&chr, Control::empty());
    write_sprite(&mut ppu, &mut cart, 0, [20, 0x01, 0x00, 16]);
    write_sprite(&mut ppu, &mut cart, 1, [20, 0x01, 0x40, 40]);
    write_sprite(&mut ppu, &mut cart, 2, [20, 0x01, 0x80, 64]);
    write_sprite(&mut ppu, &mut cart, 3, [20, 0x01, 0xC0, 88]);

    run_until(&mut ppu, &mut cart, 40, 0);

    // Sprite y is one line above its first row
    let (top, bottom) = (21, 28);
    assert_eq!(pixel(&ppu, 16, top), 0x16);
    assert_eq!(pixel(&ppu, 23, top), 0x0F);

    assert_eq!(pixel(&ppu, 40, top), 0x0F);
    assert_eq!(pixel(&ppu, 47, top), 0x16);

    assert_eq!(pixel(&ppu, 64, top), 0x0F);
    assert_eq!(pixel(&ppu, 64, bottom), 0x16);

    assert_eq!(pixel(&ppu, 88, top), 0x0F);
    assert_eq!(pixel(&ppu, 95, bottom), 0x16);
    assert_eq!(pixel(&ppu, 88, bottom), 0x0F);
}

#[test]
fn vertical_flip_swaps_tall_sprite_halves() {
    // Tile 2 (top half): top-left pixel in color 1. Tile 3 (bottom half): bottom-right in color 2
    let mut chr = vec![0; 64];
    chr[32] = 0x80;
    chr[48 + 8 + 7] = 0x01;
    let (mut ppu, mut cart) = sprite_scene(&chr, Control::SPRITE_SIZE);
    write_sprite(&mut ppu, &mut cart, 0, [20, 0x02, 0x00, 16]);
    write_sprite(&mut ppu, &mut cart, 1, [20, 0x02, 0x80, 64]);

    run_until(&mut ppu, &mut cart, 40, 0);

    let (top, bottom) = (21, 36);
    assert_eq!(pixel(&ppu, 16, top), 0x16);
    assert_eq!(pixel(&ppu, 23, bottom), 0x2A);

    assert_eq!(pixel(&ppu, 71, top), 0x2A);
    assert_eq!(pixel(&ppu, 64, bottom), 0x16);
    assert_eq!(pixel(&ppu, 64, top), 0x0F);
    assert_eq!(pixel(&ppu, 71, bottom), 0x0F);
}

/// Cartridge with tile 1 solid in color 1, a nametable full of tile 1 and sprite 0 on top.
fn solid_scene() -> (Ppu, Cartridge) {
    let mut chr = vec![0; 32];
    chr[16..24].fill(0xFF);
    let mut cart = cart(&chr, 0);
    let mut ppu = Ppu::new();

    for addr in 0x2000..0x23C0 {
        ppu.ppu_write(&mut cart, addr, 0x01);
    }
    ppu.ppu_write(&mut cart, 0x3F00, 0x0F);
    ppu.ppu_write(&mut cart, 0x3F01, 0x21);
    ppu.ppu_write(&mut cart, 0x3F11, 0x16);

    hide_all_sprites(&mut ppu);
    write_sprite(&mut ppu, &mut cart, 0, [20, 0x01, 0x00, 50]);

    // Background and sprites on, including the left column
    ppu.cpu_write(&mut cart, 1, 0x1E);
    (ppu, cart)
}

#[test]
fn background_and_sprite_reach_framebuffer() {
    let (mut ppu, mut cart) = solid_scene();
    run_until(&mut ppu, &mut cart, 30, 0);

    let frame = ppu.frame();
    assert_eq!(frame[5 * SCREEN_WIDTH + 10], 0x21);
    assert_eq!(frame[21 * SCREEN_WIDTH + 52], 0x16);
    assert_eq!(frame[21 * SCREEN_WIDTH + 60], 0x21);
}

#[test]
fn sprite_zero_hit_on_overlap() {
    let (mut ppu, mut cart) = solid_scene();

    run_until(&mut ppu, &mut cart, 20, 0);
    assert!(!ppu.status().contains(Status::SPRITE_ZERO_HIT));

    run_until(&mut ppu, &mut cart, 22, 0);
    assert!(ppu.status().contains(Status::SPRITE_ZERO_HIT));

    // Cleared again at the start of the next frame
    run_until(&mut ppu, &mut cart, -1, 2);
    assert!(!ppu.status().contains(Status::SPRITE_ZERO_HIT));
}

#[test]
fn behind_background_sprite_is_hidden() {
    let (mut ppu, mut cart) = solid_scene();
    write_sprite(&mut ppu, &mut cart, 0, [20, 0x01, 0x20, 50]);

    run_until(&mut ppu, &mut cart, 30, 0);
    assert_eq!(ppu.frame()[21 * SCREEN_WIDTH + 52], 0x21);
    // Hit still registers for a background-priority sprite
    assert!(ppu.status().contains(Status::SPRITE_ZERO_HIT));
}

#[test]
fn identical_runs_render_identical_frames() {
    let render = || {
        let (mut ppu, mut cart) = solid_scene();
        for _ in 0..2 * DOTS_PER_FRAME {
            ppu.clock(&mut cart);
        }
        ppu.frame().to_vec()
    };
    assert_eq!(render(), render());
}

#[test]
fn pattern_table_uses_palette() {
    let mut chr = vec![0; 16];
    chr[0] = 0x80;
    chr[8] = 0x80;
    let mut cart = cart(&chr, 0);
    let mut ppu = Ppu::new();
    ppu.ppu_write(&mut cart, 0x3F00, 0x0F);
    ppu.ppu_write(&mut cart, 0x3F03, 0x15);

    let table = ppu.pattern_table(&cart, 0, 0);
    assert_eq!(table.len(), PATTERN_TABLE_SIZE * PATTERN_TABLE_SIZE);
    assert_eq!(table[0], 0x15);
    assert_eq!(table[1], 0x0F);
    assert_eq!(table[PATTERN_TABLE_SIZE], 0x0F);
}

#[test]
fn flip_byte_reverses_bits() {
    assert_eq!(flip_byte(0b1100_0000), 0b0000_0011);
    assert_eq!(flip_byte(0b1000_0001), 0b1000_0001);
    assert_eq!(flip_byte(0b0001_0110), 0b0110_1000);
}
