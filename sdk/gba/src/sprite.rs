//! # Hardware Sprites
//!
//! A [`SpriteSlot`] owns one OAM entry. It buffers a logical description of
//! the sprite (position, tile, flips) and only touches hardware in
//! [`SpriteSlot::draw`].
//!
//! Slots come from a [`SpriteRegistry`], and the only way to get a registry
//! is [`init_sprites`], which hides every entry first. A table hands out one
//! registry, and the registry refuses to hand out the same index twice, so
//! each OAM entry has exactly one writer.
//!
//! ```ignore
//! let mut registry = init_sprites(&mut oam)?;
//! let mut droid = registry.slot(0, 0, SizeClass::S16x16)?;
//!
//! loop {
//!     wait();
//!     droid.set_position(x, y);
//!     droid.draw(&mut oam);
//! }
//! ```

use core::fmt;

use crate::oam::{AttributeTable, OAM_ENTRIES, ObjAttrs};

/// Width × height of a sprite, as the hardware's shape and size codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SizeClass {
    S8x8,
    S16x16,
    S32x32,
    S64x64,
    S16x8,
    S32x8,
    S32x16,
    S64x32,
    S8x16,
    S8x32,
    S16x32,
    S32x64,
}

impl SizeClass {
    /// 0 = square, 1 = wide, 2 = tall.
    pub const fn shape(self) -> u16 {
        match self {
            SizeClass::S8x8 | SizeClass::S16x16 | SizeClass::S32x32 | SizeClass::S64x64 => 0,
            SizeClass::S16x8 | SizeClass::S32x8 | SizeClass::S32x16 | SizeClass::S64x32 => 1,
            SizeClass::S8x16 | SizeClass::S8x32 | SizeClass::S16x32 | SizeClass::S32x64 => 2,
        }
    }

    pub const fn size(self) -> u16 {
        match self {
            SizeClass::S8x8 | SizeClass::S16x8 | SizeClass::S8x16 => 0,
            SizeClass::S16x16 | SizeClass::S32x8 | SizeClass::S8x32 => 1,
            SizeClass::S32x32 | SizeClass::S32x16 | SizeClass::S16x32 => 2,
            SizeClass::S64x64 | SizeClass::S64x32 | SizeClass::S32x64 => 3,
        }
    }

    /// Pixel dimensions as (width, height).
    pub const fn dimensions(self) -> (u16, u16) {
        match self {
            SizeClass::S8x8 => (8, 8),
            SizeClass::S16x16 => (16, 16),
            SizeClass::S32x32 => (32, 32),
            SizeClass::S64x64 => (64, 64),
            SizeClass::S16x8 => (16, 8),
            SizeClass::S32x8 => (32, 8),
            SizeClass::S32x16 => (32, 16),
            SizeClass::S64x32 => (64, 32),
            SizeClass::S8x16 => (8, 16),
            SizeClass::S8x32 => (8, 32),
            SizeClass::S16x32 => (16, 32),
            SizeClass::S32x64 => (32, 64),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HandleFault {
    OutOfRange,
    AlreadyBound,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpriteError {
    InvalidHandle { index: u16, reason: HandleFault },
    /// The attribute table already handed out its registry.
    RegistryTaken,
}

impl fmt::Display for SpriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpriteError::InvalidHandle { index, reason: HandleFault::OutOfRange } => {
                write!(f, "sprite index {index} is outside 0..{OAM_ENTRIES}")
            }
            SpriteError::InvalidHandle { index, reason: HandleFault::AlreadyBound } => {
                write!(f, "sprite index {index} is already bound to a slot")
            }
            SpriteError::RegistryTaken => f.write_str("sprites were already initialised on this table"),
        }
    }
}

impl core::error::Error for SpriteError {}

/// Hide every OAM entry and return the registry slots are allocated from.
///
/// Each table hands out one registry. A second call fails with
/// [`SpriteError::RegistryTaken`] and leaves the table untouched, so slots
/// bound through the first registry keep their entries.
pub fn init_sprites<T: AttributeTable>(oam: &mut T) -> Result<SpriteRegistry, SpriteError> {
    if !oam.claim_registry() {
        return Err(SpriteError::RegistryTaken);
    }
    for index in 0..OAM_ENTRIES as u8 {
        oam.write(index, ObjAttrs::HIDDEN);
    }
    log::debug!("cleared {OAM_ENTRIES} sprite entries");
    Ok(SpriteRegistry { bound: 0 })
}

/// Tracks which OAM indices currently have an owner.
#[derive(Debug)]
pub struct SpriteRegistry {
    bound: u128,
}

impl SpriteRegistry {
    /// Bind a new slot to `index`.
    pub fn slot(&mut self, index: u16, character: u16, size: SizeClass) -> Result<SpriteSlot, SpriteError> {
        if index as usize >= OAM_ENTRIES {
            return Err(SpriteError::InvalidHandle { index, reason: HandleFault::OutOfRange });
        }
        let mask = 1u128 << index;
        if self.bound & mask != 0 {
            return Err(SpriteError::InvalidHandle { index, reason: HandleFault::AlreadyBound });
        }
        self.bound |= mask;

        Ok(SpriteSlot {
            index: index as u8,
            size,
            character,
            h_flip: false,
            v_flip: false,
            x: 0,
            y: 0,
        })
    }

    /// Give a slot's index back. The OAM entry keeps whatever was last drawn.
    pub fn release(&mut self, slot: SpriteSlot) {
        self.bound &= !(1u128 << slot.index);
    }

    pub fn is_bound(&self, index: u16) -> bool {
        (index as usize) < OAM_ENTRIES && self.bound & (1u128 << index) != 0
    }

    pub fn bound_count(&self) -> u32 {
        self.bound.count_ones()
    }
}

/// Sole owner of one OAM entry. Not `Clone`: two slots on one index would
/// race on the same hardware entry.
#[derive(Debug, PartialEq, Eq)]
pub struct SpriteSlot {
    index: u8,
    size: SizeClass,
    character: u16,
    h_flip: bool,
    v_flip: bool,
    x: i16,
    y: i16,
}

impl SpriteSlot {
    #[inline]
    pub fn set_position(&mut self, x: i16, y: i16) {
        self.x = x;
        self.y = y;
    }

    #[inline]
    pub fn set_character(&mut self, character: u16) {
        self.character = character;
    }

    #[inline]
    pub fn set_h_flip(&mut self, flip: bool) {
        self.h_flip = flip;
    }

    #[inline]
    pub fn set_v_flip(&mut self, flip: bool) {
        self.v_flip = flip;
    }

    #[inline]
    pub fn flip_h(&mut self) {
        self.h_flip = !self.h_flip;
    }

    #[inline]
    pub fn flip_v(&mut self) {
        self.v_flip = !self.v_flip;
    }

    pub fn x(&self) -> i16 {
        self.x
    }

    pub fn y(&self) -> i16 {
        self.y
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn size(&self) -> SizeClass {
        self.size
    }

    pub fn character(&self) -> u16 {
        self.character
    }

    pub fn h_flip(&self) -> bool {
        self.h_flip
    }

    pub fn v_flip(&self) -> bool {
        self.v_flip
    }

    /// Encode the buffered state without committing it.
    pub fn attrs(&self) -> ObjAttrs {
        let mut attrs = ObjAttrs::default();
        attrs
            .set_position(self.x, self.y)
            .set_shape(self.size.shape())
            .set_size(self.size.size())
            .set_tile(self.character)
            .set_h_flip(self.h_flip)
            .set_v_flip(self.v_flip);
        attrs
    }

    /// Commit the buffered state to this slot's entry.
    #[inline]
    pub fn draw<T: AttributeTable>(&self, oam: &mut T) {
        oam.write(self.index, self.attrs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oam::OamBuffer;

    fn registry() -> (OamBuffer, SpriteRegistry) {
        let mut oam = OamBuffer::new();
        let registry = init_sprites(&mut oam).unwrap();
        (oam, registry)
    }

    #[test]
    fn init_hides_every_entry() {
        let (oam, registry) = registry();
        assert!(oam.entries().iter().all(|e| *e == ObjAttrs::HIDDEN));
        assert_eq!(oam.writes(), 128);
        assert_eq!(registry.bound_count(), 0);
    }

    #[test]
    fn second_init_on_the_same_table_fails() {
        let (mut oam, mut registry) = registry();
        let mut slot = registry.slot(0, 4, SizeClass::S16x16).unwrap();
        slot.set_position(10, 20);
        slot.draw(&mut oam);
        let before = *oam.entries();

        assert_eq!(init_sprites(&mut oam).unwrap_err(), SpriteError::RegistryTaken);
        assert_eq!(*oam.entries(), before);
        assert_eq!(oam.writes(), 129);
        assert!(!oam.get(0).unwrap().hidden());
    }

    #[test]
    fn binding_an_index_twice_fails() {
        let (_, mut registry) = registry();
        for index in 0..OAM_ENTRIES as u16 {
            let _slot = registry.slot(index, 0, SizeClass::S8x8).unwrap();
            assert_eq!(
                registry.slot(index, 0, SizeClass::S8x8),
                Err(SpriteError::InvalidHandle { index, reason: HandleFault::AlreadyBound })
            );
        }
        assert_eq!(registry.bound_count(), 128);
    }

    #[test]
    fn out_of_range_index_fails() {
        let (_, mut registry) = registry();
        for index in [128, 200, u16::MAX] {
            assert_eq!(
                registry.slot(index, 0, SizeClass::S16x16),
                Err(SpriteError::InvalidHandle { index, reason: HandleFault::OutOfRange })
            );
        }
        assert!(!registry.is_bound(128));
    }

    #[test]
    fn released_index_can_be_bound_again() {
        let (_, mut registry) = registry();
        let slot = registry.slot(5, 0, SizeClass::S16x16).unwrap();
        assert!(registry.is_bound(5));
        registry.release(slot);
        assert!(!registry.is_bound(5));
        assert!(registry.slot(5, 2, SizeClass::S8x8).is_ok());
    }

    #[test]
    fn size_class_lookup_matches_hardware_codes() {
        assert_eq!((SizeClass::S8x8.shape(), SizeClass::S8x8.size()), (0, 0));
        assert_eq!((SizeClass::S16x16.shape(), SizeClass::S16x16.size()), (0, 1));
        assert_eq!((SizeClass::S32x32.shape(), SizeClass::S32x32.size()), (0, 2));
        assert_eq!((SizeClass::S64x64.shape(), SizeClass::S64x64.size()), (0, 3));
        assert_eq!((SizeClass::S64x32.shape(), SizeClass::S64x32.size()), (1, 3));
        assert_eq!((SizeClass::S8x32.shape(), SizeClass::S8x32.size()), (2, 1));
        assert_eq!(SizeClass::S32x16.dimensions(), (32, 16));
    }

    #[test]
    fn mutations_are_buffered_until_draw() {
        let (mut oam, mut registry) = registry();
        let mut slot = registry.slot(3, 64, SizeClass::S16x16).unwrap();
        slot.set_position(160, 120);
        slot.set_h_flip(true);
        assert_eq!(oam.get(3), Some(&ObjAttrs::HIDDEN));
        assert_eq!((slot.x(), slot.y()), (160, 120));

        slot.draw(&mut oam);
        let entry = oam.get(3).unwrap();
        assert_eq!((entry.x(), entry.y()), (160, 120));
        assert_eq!(entry.tile(), 64);
        assert_eq!((entry.shape(), entry.size()), (0, 1));
        assert!(entry.h_flip());
        assert!(!entry.hidden());
    }

    #[test]
    fn draw_is_idempotent() {
        let (mut oam, mut registry) = registry();
        let mut slot = registry.slot(0, 6, SizeClass::S16x16).unwrap();
        slot.set_position(-16, 40);
        slot.set_v_flip(true);

        slot.draw(&mut oam);
        let first = *oam.get(0).unwrap();
        slot.draw(&mut oam);
        assert_eq!(*oam.get(0).unwrap(), first);
        assert!(oam.entries()[1..].iter().all(|e| *e == ObjAttrs::HIDDEN));
    }

    #[test]
    fn flip_toggles() {
        let (_, mut registry) = registry();
        let mut slot = registry.slot(0, 0, SizeClass::S8x8).unwrap();
        slot.flip_h();
        slot.flip_v();
        assert!(slot.h_flip() && slot.v_flip());
        slot.flip_h();
        assert!(!slot.h_flip());
        assert!(slot.v_flip());
    }

    #[test]
    fn error_messages_name_the_index() {
        let err = SpriteError::InvalidHandle { index: 130, reason: HandleFault::OutOfRange };
        assert_eq!(err.to_string(), "sprite index 130 is outside 0..128");
        assert_eq!(SpriteError::RegistryTaken.to_string(), "sprites were already initialised on this table");
    }
}
