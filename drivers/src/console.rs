//! Global serial console and `log` backend.
//!
//! The console is the Mini UART behind a spinlock. Nothing here
//! allocates: formatting goes through `core::fmt::Write` straight
//! into the transmit FIFO.

use crate::hal::serial::{SerialConfig, SerialError, SerialPort};
use crate::platform::bcm283x::mini_uart::MiniUart;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

/// Global console instance. `None` until [`init_console`] runs;
/// writes before that are silently dropped.
static CONSOLE: Mutex<Option<MiniUart>> = Mutex::new(None);

/// Bring up the Mini UART and install it as the global console.
///
/// Safe to call once during early boot; calling again reconfigures
/// the port.
pub fn init_console(config: SerialConfig) -> Result<(), SerialError> {
    let mut uart = unsafe { MiniUart::new() };
    uart.configure(config)?;
    *CONSOLE.lock() = Some(uart);
    Ok(())
}

/// Write a string to the console with terminal line endings.
pub fn console_write(s: &str) {
    if let Some(uart) = CONSOLE.lock().as_mut() {
        let _ = uart.write_str_crlf(s);
    }
}

/// Blocking read of one character from the console, CR normalized to
/// LF. Returns `None` if the console is not initialized.
pub fn console_read_char() -> Option<u8> {
    CONSOLE.lock().as_mut().and_then(|uart| uart.read_char().ok())
}

/// Writer adapter for the `core::fmt::Write` trait.
pub struct ConsoleWriter;

impl core::fmt::Write for ConsoleWriter {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        console_write(s);
        Ok(())
    }
}

// ============================================================================
// Print Macros
// ============================================================================

/// Print to the console without a newline.
#[macro_export]
macro_rules! kprint {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let _ = write!($crate::console::ConsoleWriter, $($arg)*);
    }};
}

/// Print to the console with a newline.
#[macro_export]
macro_rules! kprintln {
    () => { $crate::kprint!("\n") };
    ($($arg:tt)*) => {{
        $crate::kprint!($($arg)*);
        $crate::kprint!("\n");
    }};
}

// ============================================================================
// Log Backend
// ============================================================================

/// `log` facade backend writing `[LEVEL target] message` lines to the
/// console.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            use core::fmt::Write;
            let _ = writeln!(
                ConsoleWriter,
                "[{:5} {}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Route the `log` macros to the console at the given level.
pub fn init_logging(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
