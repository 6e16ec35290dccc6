//! # Debug Console
//!
//! A `log` backend for a one-way text sink. On hardware the sink is the
//! emulator's `vbalog` console; anything else can be plugged in as a plain
//! `fn(&str)`.
//!
//! ```ignore
//! gba::debug::init_vba_logger(log::LevelFilter::Info);
//! log::info!("droid({}, {})", x, y);
//! ```
//!
//! Lines longer than [`LINE_CAPACITY`] bytes are cut at the last character
//! that fits. Nothing is allocated.

use core::fmt::{self, Write};

use heapless::String;
use log::{LevelFilter, Log, Metadata, Record};

pub const LINE_CAPACITY: usize = 255;

pub type Line = String<LINE_CAPACITY>;

/// Render a record as `LEVEL target: message`.
pub fn format_record(record: &Record<'_>) -> Line {
    let mut line = Truncating(Line::new());
    let _ = write!(line, "{} {}: {}", record.level(), record.target(), record.args());
    line.0
}

/// Keeps whatever fits and drops the rest.
struct Truncating(Line);

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

pub struct SinkLogger {
    sink: fn(&str),
    level: LevelFilter,
}

impl SinkLogger {
    pub const fn new(sink: fn(&str), level: LevelFilter) -> Self {
        Self { sink, level }
    }
}

impl Log for SinkLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            (self.sink)(&format_record(record));
        }
    }

    fn flush(&self) {}
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
fn vba_write(msg: &str) {
    let mut buf: String<{ LINE_CAPACITY + 1 }> = String::new();
    let _ = buf.push_str(msg);
    let _ = buf.push('\0');
    unsafe { crate::boot::vbalog(buf.as_ptr()) }
}

/// Route `log` records to the emulator debug console.
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub fn init_vba_logger(level: LevelFilter) {
    static mut LOGGER: SinkLogger = SinkLogger::new(vba_write, LevelFilter::Trace);
    // single core, no interrupts touch the logger, and this runs before main's loop
    unsafe {
        LOGGER.level = level;
        let logger: &'static SinkLogger = &*core::ptr::addr_of!(LOGGER);
        let _ = log::set_logger_racy(logger);
        log::set_max_level_racy(level);
    }
}
