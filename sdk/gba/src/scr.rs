//! # Display Control Registers
//!
//! ## DisplayControl (`$0400_0000`, DISPCNT)
//!
//! | Flag          | Effect                                           |
//! |---------------|--------------------------------------------------|
//! | `MODE_0`..`5` | Background mode (0 = four tiled backgrounds)     |
//! | `OBJ_1D_MAP`  | 1D sprite tile mapping (clear = 32-tile-wide 2D) |
//! | `BG0_ON`..    | Enable background layer                          |
//! | `OBJ_ON`      | Enable sprites                                   |
//!
//! ## BgControl (`$0400_0008 + 2n`, BGxCNT)
//!
//! Priority, character base block, colour depth, screen base block and map
//! size for one tiled background. The multi-bit fields are built with the
//! `const fn` constructors, e.g.
//!
//! ```ignore
//! let bg0 = BgControl::priority(0) | BgControl::char_base(0) | BgControl::map_base(31);
//! ```

bitflags::bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct DisplayControl: u16 {
        const MODE_0        = 0;
        const MODE_1        = 1;
        const MODE_2        = 2;
        const MODE_3        = 3;
        const MODE_4        = 4;
        const MODE_5        = 5;
        const FRAME_SELECT  = 1 << 4;
        const HBLANK_FREE   = 1 << 5;
        const OBJ_1D_MAP    = 1 << 6;
        const FORCED_BLANK  = 1 << 7;
        const BG0_ON        = 1 << 8;
        const BG1_ON        = 1 << 9;
        const BG2_ON        = 1 << 10;
        const BG3_ON        = 1 << 11;
        const OBJ_ON        = 1 << 12;
        const WIN0_ON       = 1 << 13;
        const WIN1_ON       = 1 << 14;
        const OBJ_WIN_ON    = 1 << 15;
    }

    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct BgControl: u16 {
        const MOSAIC        = 1 << 6;
        /// 256 colours / 1 palette; clear for 16 colours / 16 palettes.
        const COLOR_256     = 1 << 7;
        const WRAP          = 1 << 13;

        // fields, set through the constructors below
        const _PRIORITY     = 0b11;
        const _CHAR_BASE    = 0b11 << 2;
        const _MAP_BASE     = 0b1_1111 << 8;
        const _SIZE         = 0b11 << 14;
    }
}

impl BgControl {
    pub const fn priority(p: u16) -> BgControl {
        BgControl::from_bits_retain(p & 0b11)
    }

    /// 16KB character block, 0–3.
    pub const fn char_base(block: u16) -> BgControl {
        BgControl::from_bits_retain((block & 0b11) << 2)
    }

    /// 2KB screen block, 0–31.
    pub const fn map_base(block: u16) -> BgControl {
        BgControl::from_bits_retain((block & 0b1_1111) << 8)
    }

    /// 0 = 256×256, 1 = 512×256, 2 = 256×512, 3 = 512×512 (text mode).
    pub const fn size(size: u16) -> BgControl {
        BgControl::from_bits_retain((size & 0b11) << 14)
    }
}
