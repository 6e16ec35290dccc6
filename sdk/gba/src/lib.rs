//! # gba
//!
//! Hardware abstraction for a GBA-class display: a 240×160 screen, a
//! 128-entry sprite attribute table, tile/palette memory, a ten-key pad and a
//! vertical-blank interrupt.
//!
//! Everything that touches memory-mapped registers goes through a trait
//! ([`oam::AttributeTable`], [`video::VideoMemory`]) so game code can run
//! against the in-memory implementations on a host.
//!
//! ```ignore
//! let mut registry = sprite::init_sprites(&mut oam)?;
//! let mut droid = registry.slot(0, 0, SizeClass::S16x16)?;
//! droid.set_position(120, 120);
//! droid.draw(&mut oam);
//! ```

#![cfg_attr(not(test), no_std)]

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod boot;
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod console;
pub mod debug;
pub mod input;
pub mod oam;
pub mod scr;
pub mod sprite;
pub mod video;

pub const SCREEN_WIDTH: i16 = 240;
pub const SCREEN_HEIGHT: i16 = 160;

/// Pack a 5-bit-per-channel colour.
#[inline(always)]
pub const fn rgb5(r: u16, g: u16, b: u16) -> u16 {
    (r & 0x1F) | ((g & 0x1F) << 5) | ((b & 0x1F) << 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb5_packs_channels() {
        assert_eq!(rgb5(31, 0, 0), 0x001F);
        assert_eq!(rgb5(0, 31, 0), 0x03E0);
        assert_eq!(rgb5(0, 0, 31), 0x7C00);
        assert_eq!(rgb5(15, 15, 31), 0x7DEF);
    }
}
