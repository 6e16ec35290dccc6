use bit_field::BitField;

/// `KEYINPUT`, active-low.
const KEYINPUT: *const u16 = 0x0400_0130 as *const u16;

/// Frames a key must be held before it starts repeating.
pub const REPEAT_DELAY: u16 = 60;
/// Frames between repeats once repeating.
pub const REPEAT_RATE: u16 = 30;

bitflags::bitflags! {
    /// The ten keys, at their `KEYINPUT` bit positions.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct Keys: u16 {
        const A      = 1 << 0;
        const B      = 1 << 1;
        const SELECT = 1 << 2;
        const START  = 1 << 3;
        const RIGHT  = 1 << 4;
        const LEFT   = 1 << 5;
        const UP     = 1 << 6;
        const DOWN   = 1 << 7;
        const R      = 1 << 8;
        const L      = 1 << 9;
    }
}

impl Keys {
    pub const HORIZONTAL: Keys = Keys::LEFT.union(Keys::RIGHT);
}

/// Read the held keys straight from hardware.
///
/// # Safety
/// Only meaningful on the target; `KEYINPUT` is not mapped anywhere else.
#[inline(always)]
pub unsafe fn read_keyinput() -> Keys {
    let raw = unsafe { core::ptr::read_volatile(KEYINPUT) };
    Keys::from_bits_truncate(!raw.get_bits(0..10))
}

/// The key state for one frame. Taken once after vblank and not re-polled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    /// Went down this frame.
    pub pressed: Keys,
    /// Down this frame.
    pub held: Keys,
    /// Went up this frame.
    pub released: Keys,
    /// Went down this frame, or auto-repeated.
    pub repeated: Keys,
}

impl KeySnapshot {
    #[inline]
    pub fn just_pressed(&self, keys: Keys) -> bool {
        self.pressed.intersects(keys)
    }

    #[inline]
    pub fn is_held(&self, keys: Keys) -> bool {
        self.held.intersects(keys)
    }

    #[inline]
    pub fn just_released(&self, keys: Keys) -> bool {
        self.released.intersects(keys)
    }
}

/// Edge detection and key repeat over successive scans.
#[derive(Debug)]
pub struct KeyPad {
    held: Keys,
    held_last: Keys,
    repeat_count: u16,
    delay: u16,
    rate: u16,
}

impl Default for KeyPad {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyPad {
    pub const fn new() -> Self {
        Self::with_repeat(REPEAT_DELAY, REPEAT_RATE)
    }

    /// A `delay` of zero disables repeat.
    pub const fn with_repeat(delay: u16, rate: u16) -> Self {
        Self {
            held: Keys::empty(),
            held_last: Keys::empty(),
            repeat_count: delay,
            delay,
            rate,
        }
    }

    /// Feed this frame's held keys and get the frame's snapshot.
    pub fn scan(&mut self, held: Keys) -> KeySnapshot {
        self.held_last = self.held;
        self.held = held;

        let pressed = self.held.difference(self.held_last);
        let released = self.held_last.difference(self.held);
        let mut repeated = pressed;

        if self.delay != 0 {
            if self.held != self.held_last {
                self.repeat_count = self.delay;
            }
            self.repeat_count = self.repeat_count.saturating_sub(1);
            if self.repeat_count == 0 {
                self.repeat_count = self.rate.max(1);
                repeated |= self.held;
            }
        }

        KeySnapshot { pressed, held: self.held, released, repeated }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_reported_once() {
        let mut pad = KeyPad::new();
        let first = pad.scan(Keys::UP);
        assert_eq!(first.pressed, Keys::UP);
        assert_eq!(first.held, Keys::UP);

        let second = pad.scan(Keys::UP | Keys::LEFT);
        assert_eq!(second.pressed, Keys::LEFT);
        assert!(second.is_held(Keys::UP));
        assert!(!second.just_pressed(Keys::UP));

        let third = pad.scan(Keys::LEFT);
        assert_eq!(third.released, Keys::UP);
        assert!(third.just_released(Keys::UP));

        let fourth = pad.scan(Keys::empty());
        assert_eq!(fourth.released, Keys::LEFT);
        assert!(fourth.held.is_empty());
    }

    #[test]
    fn held_key_repeats_after_delay_then_at_rate() {
        let mut pad = KeyPad::with_repeat(4, 2);
        let frames: Vec<bool> = (0..10)
            .map(|_| pad.scan(Keys::A).repeated.contains(Keys::A))
            .collect();
        // pressed on frame 0, delay elapses on frame 3, then every 2 frames
        assert_eq!(
            frames,
            [true, false, false, true, false, true, false, true, false, true]
        );
    }

    #[test]
    fn changing_held_keys_restarts_the_delay() {
        let mut pad = KeyPad::with_repeat(3, 1);
        pad.scan(Keys::A);
        pad.scan(Keys::A);
        // B joins; the repeat countdown starts over
        let s = pad.scan(Keys::A | Keys::B);
        assert_eq!(s.repeated, Keys::B);
        assert!(pad.scan(Keys::A | Keys::B).repeated == Keys::empty());
        assert_eq!(pad.scan(Keys::A | Keys::B).repeated, Keys::A | Keys::B);
    }

    #[test]
    fn zero_delay_disables_repeat() {
        let mut pad = KeyPad::with_repeat(0, 0);
        pad.scan(Keys::A);
        for _ in 0..200 {
            assert!(pad.scan(Keys::A).repeated.is_empty());
        }
    }
}
