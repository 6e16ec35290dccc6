//! # Video Memory
//!
//! Tiles, palettes, background maps and the display registers.
//!
//! ```text
//! $0500_0000  BG palette   (256 colours)
//! $0500_0200  OBJ palette  (256 colours)
//! $0600_0000  char blocks 0-3 (16KB each), screen blocks 0-31 overlap them (2KB each)
//! $0601_0000  OBJ tiles    (32KB)
//! ```
//!
//! All of these are bulk, write-once uploads done before the main loop.
//! [`VideoMemory`] has two implementations: [`Vram`] (the real thing) and
//! [`VideoBuffer`] (plain arrays for hosts). Both only provide the raw writes;
//! the address arithmetic lives in the trait's provided methods.

use crate::scr::{BgControl, DisplayControl};

const PALRAM_ADDR: usize = 0x0500_0000;
const VRAM_ADDR: usize = 0x0600_0000;
const DISPCNT: *mut u16 = 0x0400_0000 as *mut u16;
const BG0CNT: *mut u16 = 0x0400_0008 as *mut u16;

/// Palette RAM, in halfwords (BG then OBJ).
pub const PALRAM_WORDS: usize = 0x200;
/// VRAM, in halfwords.
pub const VRAM_WORDS: usize = 0xC000;

const OBJ_PALETTE: usize = 0x100;
const CHAR_BLOCK_WORDS: usize = 0x2000;
const SCREEN_BLOCK_WORDS: usize = 0x400;
const OBJ_TILES: usize = 0x8000;
const OBJ_TILE_WORDS: usize = 0x4000;
const PALETTE_WORDS: usize = 0x100;

pub trait VideoMemory {
    /// Copy halfwords into VRAM at `offset` (in halfwords). Anything past
    /// the end of VRAM is dropped.
    fn write_vram(&mut self, offset: usize, words: &[u16]);

    /// Copy colours into palette RAM at `offset` (in halfwords).
    fn write_palram(&mut self, offset: usize, colors: &[u16]);

    fn set_display(&mut self, dc: DisplayControl);

    fn set_bg_control(&mut self, bg: u8, ctrl: BgControl);

    /// Upload sprite tiles to the start of OBJ tile memory.
    fn copy_obj_tiles(&mut self, words: &[u16]) {
        let words = &words[..words.len().min(OBJ_TILE_WORDS)];
        self.write_vram(OBJ_TILES, words);
    }

    /// Upload background tiles to the start of a character block.
    fn copy_bg_tiles(&mut self, char_block: u16, words: &[u16]) {
        let base = (char_block as usize & 0b11) * CHAR_BLOCK_WORDS;
        let words = &words[..words.len().min(OBJ_TILES - base)];
        self.write_vram(base, words);
    }

    fn set_obj_palette(&mut self, colors: &[u16]) {
        self.write_palram(OBJ_PALETTE, &colors[..colors.len().min(PALETTE_WORDS)]);
    }

    fn set_bg_palette(&mut self, colors: &[u16]) {
        self.write_palram(0, &colors[..colors.len().min(PALETTE_WORDS)]);
    }

    /// The backdrop is BG palette entry 0.
    fn set_bg_color(&mut self, color: u16) {
        self.write_palram(0, &[color]);
    }

    /// Write one text-mode map entry (32×32 per screen block).
    fn set_map_entry(&mut self, screen_block: u16, x: u16, y: u16, entry: u16) {
        let offset = (screen_block as usize & 0b1_1111) * SCREEN_BLOCK_WORDS
            + (y as usize & 31) * 32
            + (x as usize & 31);
        self.write_vram(offset, &[entry]);
    }

    /// Fill a whole screen block with one entry.
    fn fill_map(&mut self, screen_block: u16, entry: u16) {
        for y in 0..32 {
            for x in 0..32 {
                self.set_map_entry(screen_block, x, y, entry);
            }
        }
    }
}

/// The memory-mapped video hardware.
pub struct Vram {
    _private: (),
}

impl Vram {
    /// # Safety
    /// There must be exactly one `Vram` alive.
    pub unsafe fn new() -> Vram {
        Vram { _private: () }
    }
}

#[inline(always)]
unsafe fn copy_volatile(base: usize, limit: usize, offset: usize, words: &[u16]) {
    let dst = base as *mut u16;
    for (i, &word) in words.iter().enumerate().take(limit.saturating_sub(offset)) {
        unsafe { core::ptr::write_volatile(dst.add(offset + i), word) };
    }
}

impl VideoMemory for Vram {
    fn write_vram(&mut self, offset: usize, words: &[u16]) {
        unsafe { copy_volatile(VRAM_ADDR, VRAM_WORDS, offset, words) }
    }

    fn write_palram(&mut self, offset: usize, colors: &[u16]) {
        unsafe { copy_volatile(PALRAM_ADDR, PALRAM_WORDS, offset, colors) }
    }

    fn set_display(&mut self, dc: DisplayControl) {
        unsafe { core::ptr::write_volatile(DISPCNT, dc.bits()) }
    }

    fn set_bg_control(&mut self, bg: u8, ctrl: BgControl) {
        if bg < 4 {
            unsafe { core::ptr::write_volatile(BG0CNT.add(bg as usize), ctrl.bits()) }
        }
    }
}

/// Video memory as plain arrays.
#[derive(Clone)]
pub struct VideoBuffer {
    vram: [u16; VRAM_WORDS],
    palram: [u16; PALRAM_WORDS],
    display: DisplayControl,
    bg_control: [BgControl; 4],
}

impl Default for VideoBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoBuffer {
    pub const fn new() -> Self {
        Self {
            vram: [0; VRAM_WORDS],
            palram: [0; PALRAM_WORDS],
            display: DisplayControl::empty(),
            bg_control: [BgControl::empty(); 4],
        }
    }

    pub fn display(&self) -> DisplayControl {
        self.display
    }

    pub fn bg_control(&self, bg: u8) -> Option<BgControl> {
        self.bg_control.get(bg as usize).copied()
    }

    pub fn bg_palette(&self) -> &[u16] {
        &self.palram[..OBJ_PALETTE]
    }

    pub fn obj_palette(&self) -> &[u16] {
        &self.palram[OBJ_PALETTE..]
    }

    pub fn obj_tiles(&self) -> &[u16] {
        &self.vram[OBJ_TILES..]
    }

    pub fn char_block(&self, block: u16) -> &[u16] {
        let base = (block as usize & 0b11) * CHAR_BLOCK_WORDS;
        &self.vram[base..base + CHAR_BLOCK_WORDS]
    }

    pub fn map_entry(&self, screen_block: u16, x: u16, y: u16) -> u16 {
        self.vram[(screen_block as usize & 0b1_1111) * SCREEN_BLOCK_WORDS + (y as usize & 31) * 32 + (x as usize & 31)]
    }
}

impl VideoMemory for VideoBuffer {
    fn write_vram(&mut self, offset: usize, words: &[u16]) {
        if let Some(dst) = self.vram.get_mut(offset..) {
            let n = dst.len().min(words.len());
            dst[..n].copy_from_slice(&words[..n]);
        }
    }

    fn write_palram(&mut self, offset: usize, colors: &[u16]) {
        if let Some(dst) = self.palram.get_mut(offset..) {
            let n = dst.len().min(colors.len());
            dst[..n].copy_from_slice(&colors[..n]);
        }
    }

    fn set_display(&mut self, dc: DisplayControl) {
        self.display = dc;
    }

    fn set_bg_control(&mut self, bg: u8, ctrl: BgControl) {
        if let Some(slot) = self.bg_control.get_mut(bg as usize) {
            *slot = ctrl;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_land_in_their_halves() {
        let mut video = VideoBuffer::new();
        video.set_bg_palette(&[1, 2, 3]);
        video.set_obj_palette(&[4, 5]);
        video.set_bg_color(9);
        assert_eq!(&video.bg_palette()[..3], &[9, 2, 3]);
        assert_eq!(&video.obj_palette()[..2], &[4, 5]);
    }

    #[test]
    fn map_entries_address_the_screen_block() {
        let mut video = VideoBuffer::new();
        video.fill_map(31, 7);
        video.set_map_entry(31, 29, 17, 0x00A2);
        assert_eq!(video.map_entry(31, 0, 0), 7);
        assert_eq!(video.map_entry(31, 29, 17), 0x00A2);
        assert_eq!(video.map_entry(30, 0, 0), 0);
        // screen block 31 is the last 2KB of char block 3
        assert_eq!(video.char_block(3)[CHAR_BLOCK_WORDS - 1], 7);
    }

    #[test]
    fn oversized_uploads_are_clamped() {
        let mut video = VideoBuffer::new();
        let tiles = [0xFFFFu16; OBJ_TILE_WORDS + 10];
        video.copy_obj_tiles(&tiles);
        assert!(video.obj_tiles().iter().all(|&w| w == 0xFFFF));

        let colors = [1u16; 300];
        video.set_bg_palette(&colors);
        assert!(video.obj_palette().iter().all(|&c| c == 0));
    }
}
