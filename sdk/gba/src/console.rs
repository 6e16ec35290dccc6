use crate::{
    boot::{init_interrupts, wait},
    input::{KeyPad, KeySnapshot, read_keyinput},
    oam::Oam,
    video::Vram,
};

/// Everything the game touches on real hardware.
pub struct Console {
    pub oam: Oam,
    pub video: Vram,
    pub keypad: KeyPad,
}

impl Console {
    /// Bring up interrupts and hand out the hardware. Call once, from the
    /// entry point.
    pub fn init() -> Console {
        init_interrupts();

        Self {
            oam: unsafe { Oam::new() },
            video: unsafe { Vram::new() },
            keypad: KeyPad::new(),
        }
    }

    #[inline(always)]
    pub fn wait_vblank(&self) {
        wait();
    }

    /// Poll `KEYINPUT` once and run edge detection.
    #[inline(always)]
    pub fn scan_keys(&mut self) -> KeySnapshot {
        self.keypad.scan(unsafe { read_keyinput() })
    }
}
