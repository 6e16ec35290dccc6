//! # Graphics
//!
//! One 4bpp tile sheet, 32 tiles wide, shared by sprites (2D mapping) and
//! background 0. Drawn procedurally at compile time.
//!
//! ```text
//!         cols 0-1   2-3   4-5   6-7   8-9   10-11
//! rows 0-1  idle    walk  walk  prep  up    down      characters 0..10
//! rows 2-3  apple   window                            characters 64, 66
//! row  5    ground left, ground top, ground right, dirt
//! row  6    sky
//! ```

use gba::rgb5;

pub const SHEET_COLUMNS: usize = 32;
pub const SHEET_ROWS: usize = 7;
/// 8×8 pixels at 4 bits each.
pub const TILE_WORDS: usize = 16;
pub const SHEET_WORDS: usize = SHEET_COLUMNS * SHEET_ROWS * TILE_WORDS;

/// Sprite base tiles.
pub mod characters {
    pub const DROID: u16 = 0;
    pub const APPLE: u16 = 64;
    pub const WINDOW: u16 = 66;
}

/// Background map entries (tile index, palette bank 0, no flips).
pub mod tiles {
    pub const GROUND_LEFT: u16 = 5 * 32;
    pub const GROUND_TOP: u16 = 1 + 5 * 32;
    pub const GROUND_RIGHT: u16 = 2 + 5 * 32;
    pub const DIRT: u16 = 3 + 5 * 32;
    pub const SKY: u16 = 6 * 32;
}

const CLEAR: u16 = 0;
const BODY: u16 = 1;
const EYE: u16 = 2;
const LEG: u16 = 3;
const APPLE: u16 = 4;
const STEM: u16 = 5;
const LEAF: u16 = 6;
const FRAME: u16 = 7;
const PANE: u16 = 8;
const GRASS: u16 = 9;
const DIRT: u16 = 10;
const DIRT_DARK: u16 = 11;

pub const SKY_COLOR: u16 = rgb5(15, 15, 31);

pub static PALETTE: [u16; 16] = [
    SKY_COLOR,
    rgb5(20, 26, 6),
    rgb5(2, 2, 2),
    rgb5(12, 16, 4),
    rgb5(28, 4, 4),
    rgb5(12, 7, 2),
    rgb5(6, 22, 6),
    rgb5(24, 24, 24),
    rgb5(20, 26, 31),
    rgb5(6, 24, 6),
    rgb5(18, 11, 5),
    rgb5(13, 7, 3),
    0,
    0,
    0,
    0,
];

pub static SPRITE_SHEET: [u16; SHEET_WORDS] = draw_sheet();

/// Droid frames in the order of [`crate::player::frames`], each 16×16.
const fn droid(frame: usize, x: usize, y: usize) -> u16 {
    // the crouch before a jump sits two pixels lower
    let drop = if frame == 3 { 2 } else { 0 };
    if x >= 4 && x < 12 && y >= 2 + drop && y < 11 + drop {
        if x >= 9 && x < 11 && y >= 4 + drop && y < 6 + drop {
            return EYE;
        }
        return BODY;
    }
    let (left, right) = match frame {
        1 => (4, 11),
        2 => (6, 9),
        5 => (4, 11),
        _ => (5, 10),
    };
    let bottom = if frame == 4 { 14 } else { 16 };
    if y >= 11 + drop && y < bottom && (x == left || x == right) {
        return LEG;
    }
    CLEAR
}

const fn apple(x: usize, y: usize) -> u16 {
    let dx = x as i32 - 8;
    let dy = y as i32 - 9;
    if dx * dx + dy * dy <= 36 {
        APPLE
    } else if x == 8 && y >= 1 && y < 4 {
        STEM
    } else if x >= 9 && x < 12 && y == 2 {
        LEAF
    } else {
        CLEAR
    }
}

const fn window(x: usize, y: usize) -> u16 {
    if x == 0 || x == 15 || y == 0 || y == 15 || x == 7 || y == 7 {
        FRAME
    } else {
        PANE
    }
}

/// Ground tiles, 8×8.
const fn ground(col: usize, x: usize, y: usize) -> u16 {
    match col {
        0 if x + y < 2 => CLEAR,
        2 if (7 - x) + y < 2 => CLEAR,
        0..=2 if y < 3 => GRASS,
        0..=3 if (x * 3 + y * 5) % 7 == 0 => DIRT_DARK,
        0..=3 => DIRT,
        _ => CLEAR,
    }
}

/// Colour index of one pixel of the sheet.
const fn pixel(sx: usize, sy: usize) -> u16 {
    let (col, row) = (sx / 8, sy / 8);
    let (cx, cy) = (sx % 16, sy % 16);
    match row {
        0 | 1 if col < 12 => droid(col / 2, cx, cy),
        2 | 3 if col < 2 => apple(cx, cy),
        2 | 3 if col < 4 => window(cx, cy),
        5 => ground(col, sx % 8, sy % 8),
        _ => CLEAR,
    }
}

const fn draw_sheet() -> [u16; SHEET_WORDS] {
    let mut sheet = [0u16; SHEET_WORDS];
    let mut tile = 0;
    while tile < SHEET_COLUMNS * SHEET_ROWS {
        let (col, row) = (tile % SHEET_COLUMNS, tile / SHEET_COLUMNS);
        let mut word = 0;
        while word < TILE_WORDS {
            // four pixels per halfword, leftmost in the low nibble
            let sy = row * 8 + word / 2;
            let sx = col * 8 + (word % 2) * 4;
            let mut packed = 0u16;
            let mut i = 0;
            while i < 4 {
                packed |= pixel(sx + i, sy) << (4 * i);
                i += 1;
            }
            sheet[tile * TILE_WORDS + word] = packed;
            word += 1;
        }
        tile += 1;
    }
    sheet
}
