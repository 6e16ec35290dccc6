//! # Object Attribute Memory
//!
//! OAM holds **128 sprite entries** of four 16-bit words each. Only the first
//! three words describe the sprite; the fourth belongs to the affine
//! parameter table and is never touched here.
//!
//! ```text
//! attr0: [15:14] shape   [13] 256-colour   [9] disable   [7:0] y
//! attr1: [15:14] size    [13] v-flip   [12] h-flip       [8:0] x
//! attr2: [15:12] palette [11:10] priority                [9:0] tile
//! ```
//!
//! Coordinates wrap: x is 9 bits and y is 8 bits, so a sprite at x = -16 is
//! stored as 496 and appears partially at the left edge.
//!
//! Nothing ever reads OAM back. Writers go through [`AttributeTable`], which
//! is implemented by the memory-mapped [`Oam`] and by [`OamBuffer`] for hosts.

use bit_field::BitField;
use volatile_register::WO;

use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Number of hardware sprite entries.
pub const OAM_ENTRIES: usize = 128;

const OAM_ADDR: usize = 0x0700_0000;

/// First stored y that decodes as negative.
const Y_WRAP: i16 = 256 - 16;

/// One encoded OAM entry (without the affine filler word).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjAttrs {
    pub attr0: u16,
    pub attr1: u16,
    pub attr2: u16,
}

impl ObjAttrs {
    /// Disabled, parked just past the bottom-right corner of the screen.
    pub const HIDDEN: ObjAttrs = ObjAttrs {
        attr0: (1 << 9) | SCREEN_HEIGHT as u16,
        attr1: SCREEN_WIDTH as u16,
        attr2: 0,
    };

    pub fn set_position(&mut self, x: i16, y: i16) -> &mut Self {
        self.attr0.set_bits(0..8, y as u16 & 0xFF);
        self.attr1.set_bits(0..9, x as u16 & 0x1FF);
        self
    }

    pub fn set_shape(&mut self, shape: u16) -> &mut Self {
        self.attr0.set_bits(14..16, shape & 0b11);
        self
    }

    pub fn set_size(&mut self, size: u16) -> &mut Self {
        self.attr1.set_bits(14..16, size & 0b11);
        self
    }

    pub fn set_tile(&mut self, tile: u16) -> &mut Self {
        self.attr2.set_bits(0..10, tile & 0x3FF);
        self
    }

    pub fn set_h_flip(&mut self, flip: bool) -> &mut Self {
        self.attr1.set_bit(12, flip);
        self
    }

    pub fn set_v_flip(&mut self, flip: bool) -> &mut Self {
        self.attr1.set_bit(13, flip);
        self
    }

    pub fn set_hidden(&mut self, hidden: bool) -> &mut Self {
        self.attr0.set_bit(9, hidden);
        self
    }

    /// Screen-space x; values past 255 are negative.
    pub fn x(&self) -> i16 {
        let x = self.attr1.get_bits(0..9) as i16;
        if x >= 256 { x - 512 } else { x }
    }

    /// Screen-space y. Stored values from 240 up are read as -16..-1, the
    /// rows a sprite can hang above the top edge. Everything below that,
    /// including the hidden entry's 160, stays positive.
    pub fn y(&self) -> i16 {
        let y = self.attr0.get_bits(0..8) as i16;
        if y >= Y_WRAP { y - 256 } else { y }
    }

    pub fn shape(&self) -> u16 {
        self.attr0.get_bits(14..16)
    }

    pub fn size(&self) -> u16 {
        self.attr1.get_bits(14..16)
    }

    pub fn tile(&self) -> u16 {
        self.attr2.get_bits(0..10)
    }

    pub fn h_flip(&self) -> bool {
        self.attr1.get_bit(12)
    }

    pub fn v_flip(&self) -> bool {
        self.attr1.get_bit(13)
    }

    pub fn hidden(&self) -> bool {
        self.attr0.get_bit(9)
    }

    pub fn priority(&self) -> u16 {
        self.attr2.get_bits(10..12)
    }

    pub fn palette(&self) -> u16 {
        self.attr2.get_bits(12..16)
    }
}

/// Something sprite entries can be committed to.
///
/// `index` is always below [`OAM_ENTRIES`] when called through a
/// [`SpriteSlot`](crate::sprite::SpriteSlot).
pub trait AttributeTable {
    fn write(&mut self, index: u8, attrs: ObjAttrs);

    /// Mark the table's registry as handed out. Returns `false` if it already
    /// was, so a table only ever backs one [`SpriteRegistry`](crate::sprite::SpriteRegistry).
    fn claim_registry(&mut self) -> bool;
}

#[repr(C)]
struct OamEntry {
    attr0: WO<u16>,
    attr1: WO<u16>,
    attr2: WO<u16>,
    _affine: WO<u16>,
}

/// The memory-mapped attribute table at `$0700_0000`.
pub struct Oam {
    entries: &'static mut [OamEntry; OAM_ENTRIES],
    claimed: bool,
}

impl Oam {
    /// # Safety
    /// There must be exactly one `Oam` alive; it aliases hardware memory.
    pub unsafe fn new() -> Oam {
        Oam {
            entries: unsafe { &mut *(OAM_ADDR as *mut [OamEntry; OAM_ENTRIES]) },
            claimed: false,
        }
    }
}

impl AttributeTable for Oam {
    #[inline(always)]
    fn write(&mut self, index: u8, attrs: ObjAttrs) {
        // OAM only accepts 16/32-bit writes; WO<u16> keeps us honest
        if let Some(entry) = self.entries.get_mut(index as usize) {
            unsafe {
                entry.attr0.write(attrs.attr0);
                entry.attr1.write(attrs.attr1);
                entry.attr2.write(attrs.attr2);
            }
        }
    }

    fn claim_registry(&mut self) -> bool {
        !core::mem::replace(&mut self.claimed, true)
    }
}

/// An in-memory attribute table that can be inspected.
#[derive(Clone, Debug)]
pub struct OamBuffer {
    entries: [ObjAttrs; OAM_ENTRIES],
    writes: u32,
    claimed: bool,
}

impl Default for OamBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OamBuffer {
    pub const fn new() -> Self {
        Self {
            entries: [ObjAttrs { attr0: 0, attr1: 0, attr2: 0 }; OAM_ENTRIES],
            writes: 0,
            claimed: false,
        }
    }

    pub fn get(&self, index: u8) -> Option<&ObjAttrs> {
        self.entries.get(index as usize)
    }

    pub fn entries(&self) -> &[ObjAttrs; OAM_ENTRIES] {
        &self.entries
    }

    /// Total number of entry writes since creation.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl AttributeTable for OamBuffer {
    fn write(&mut self, index: u8, attrs: ObjAttrs) {
        if let Some(entry) = self.entries.get_mut(index as usize) {
            *entry = attrs;
            self.writes = self.writes.wrapping_add(1);
        }
    }

    fn claim_registry(&mut self) -> bool {
        !core::mem::replace(&mut self.claimed, true)
    }
}
