//! Bare-metal glue: panic handler, interrupt setup and the vblank wait.
//!
//! The interrupt dispatcher and the BIOS call wrappers come from the
//! platform's C runtime (libgba), which is linked into the final ROM.

use core::panic::PanicInfo;

/// IE/IF bit for the vertical blank interrupt.
pub const IRQ_VBLANK: u32 = 1 << 0;

#[panic_handler]
fn panic(info: &PanicInfo<'_>) -> ! {
    log::error!("{info}");
    loop {}
}

unsafe extern "C" {
    unsafe fn irqInit();

    unsafe fn irqEnable(mask: u32);

    /// BIOS `VBlankIntrWait`: halts until the next vblank interrupt.
    unsafe fn VBlankIntrWait();

    /// Write a NUL-terminated string to the emulator's debug console.
    pub unsafe fn vbalog(msg: *const u8);
}

/// Install the interrupt dispatcher and enable the vblank interrupt, so that
/// [`wait`] can return.
pub fn init_interrupts() {
    unsafe {
        irqInit();
        irqEnable(IRQ_VBLANK);
    }
}

/// Block until the next vertical blank.
#[inline(always)]
pub fn wait() {
    unsafe { VBlankIntrWait() }
}
