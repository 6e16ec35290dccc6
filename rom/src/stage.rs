//! The scene behind the sprites: graphics uploads, display mode and the
//! background-0 map (sky with a strip of ground).

use gba::{
    scr::{BgControl, DisplayControl},
    video::VideoMemory,
};

use crate::assets::{PALETTE, SKY_COLOR, SPRITE_SHEET, tiles};

pub const MAP_BLOCK: u16 = 31;
pub const CHAR_BLOCK: u16 = 0;
/// Map row holding the grass edge.
pub const GROUND_ROW: u16 = 17;
/// Visible map columns.
pub const GROUND_COLUMNS: u16 = 30;

pub const DISPLAY: DisplayControl = DisplayControl::MODE_0.union(DisplayControl::OBJ_ON).union(DisplayControl::BG0_ON);

pub fn bg0_control() -> BgControl {
    BgControl::map_base(MAP_BLOCK) | BgControl::size(0) | BgControl::char_base(CHAR_BLOCK) | BgControl::priority(0)
}

/// Upload graphics and build the background.
pub fn install<V: VideoMemory>(video: &mut V) {
    video.set_display(DISPLAY);

    video.copy_obj_tiles(&SPRITE_SHEET);
    video.copy_bg_tiles(CHAR_BLOCK, &SPRITE_SHEET);
    video.set_obj_palette(&PALETTE);
    video.set_bg_palette(&PALETTE);
    video.set_bg_color(SKY_COLOR);

    video.set_bg_control(0, bg0_control());

    video.fill_map(MAP_BLOCK, tiles::SKY);
    let last = GROUND_COLUMNS - 1;
    for x in 0..GROUND_COLUMNS {
        let edge = match x {
            0 => tiles::GROUND_LEFT,
            x if x == last => tiles::GROUND_RIGHT,
            _ => tiles::GROUND_TOP,
        };
        video.set_map_entry(MAP_BLOCK, x, GROUND_ROW, edge);
        for y in GROUND_ROW + 1..32 {
            video.set_map_entry(MAP_BLOCK, x, y, tiles::DIRT);
        }
    }
    log::debug!("stage installed, bg0 {:#06x}", bg0_control().bits());
}

#[cfg(test)]
mod tests {
    use super::*;
    use gba::video::VideoBuffer;

    fn installed() -> Box<VideoBuffer> {
        let mut video = Box::new(VideoBuffer::new());
        install(video.as_mut());
        video
    }

    #[test]
    fn display_and_bg0_registers() {
        let video = installed();
        assert_eq!(video.display().bits(), 0x1100);
        assert_eq!(video.bg_control(0).map(|c| c.bits()), Some(0x1F00));
        assert_eq!(video.bg_control(1), Some(BgControl::empty()));
    }

    #[test]
    fn ground_strip_layout() {
        let video = installed();
        assert_eq!(video.map_entry(31, 0, 17), 5 * 32);
        for x in 1..29 {
            assert_eq!(video.map_entry(31, x, 17), 1 + 5 * 32);
        }
        assert_eq!(video.map_entry(31, 29, 17), 2 + 5 * 32);
        for y in 18..32 {
            for x in 0..30 {
                assert_eq!(video.map_entry(31, x, y), 3 + 5 * 32, "({x}, {y})");
            }
        }
    }

    #[test]
    fn everything_else_is_sky() {
        let video = installed();
        for y in 0..17 {
            for x in 0..32 {
                assert_eq!(video.map_entry(31, x, y), 6 * 32);
            }
        }
        // off-screen columns past the ground strip
        assert_eq!(video.map_entry(31, 30, 20), 6 * 32);
        assert_eq!(video.map_entry(31, 31, 17), 6 * 32);
    }

    #[test]
    fn graphics_are_uploaded_to_both_layers() {
        let video = installed();
        assert_eq!(&video.obj_tiles()[..SPRITE_SHEET.len()], &SPRITE_SHEET[..]);
        assert_eq!(&video.char_block(0)[..SPRITE_SHEET.len()], &SPRITE_SHEET[..]);
        assert_eq!(&video.obj_palette()[..16], &PALETTE[..]);
        assert_eq!(video.bg_palette()[0], SKY_COLOR);
        assert_eq!(video.bg_palette()[0], gba::rgb5(15, 15, 31));
    }
}
