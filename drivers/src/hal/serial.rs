//! Serial Port (UART) Hardware Abstraction Layer.
//!
//! This module defines platform-independent traits for serial
//! communication, plus the terminal line discipline shared by every
//! port: LF is expanded to CR LF on output, CR is normalized to LF on
//! input.

use core::fmt;

/// Serial port configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Baud rate in bits per second.
    pub baud_rate: u32,
    /// Number of data bits per frame.
    pub data_bits: DataBits,
    /// Parity checking mode.
    pub parity: Parity,
    /// Number of stop bits.
    pub stop_bits: StopBits,
}

impl SerialConfig {
    /// Create a standard 8N1 configuration at the specified baud rate.
    ///
    /// 8N1 means: 8 data bits, no parity, 1 stop bit.
    pub const fn new_8n1(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for SerialConfig {
    /// Default configuration: 115200 baud, 8N1.
    fn default() -> Self {
        Self::new_8n1(115200)
    }
}

/// Number of data bits per frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit.
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
}

/// Number of stop bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopBits {
    /// One stop bit.
    One,
    /// Two stop bits.
    Two,
}

/// Serial port errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SerialError {
    /// Invalid configuration parameter.
    InvalidConfig,
    /// Other platform-specific error.
    Other,
}

/// Serial port trait.
///
/// `write_byte` and `read_byte` are blocking: they busy-wait on the
/// port's status register until the hardware is ready. There is no
/// timeout; an unplugged peripheral stalls the caller permanently.
pub trait SerialPort {
    /// Error type for serial operations.
    type Error: core::fmt::Debug;

    /// Configure the serial port.
    ///
    /// This must be called before using the serial port.
    fn configure(&mut self, config: SerialConfig) -> Result<(), Self::Error>;

    /// Write a single byte (blocking).
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Read a single byte (blocking).
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Wait until everything queued for transmission has left the port.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Write multiple bytes (blocking).
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(bytes.len())
    }

    /// Read a single character (blocking), normalizing a carriage
    /// return to a line feed.
    fn read_char(&mut self) -> Result<u8, Self::Error> {
        let byte = self.read_byte()?;
        Ok(if byte == b'\r' { b'\n' } else { byte })
    }

    /// Write a string with terminal line endings: each line feed is
    /// preceded by a carriage return. A CR already present in the
    /// input is never duplicated.
    fn write_str_crlf(&mut self, s: &str) -> Result<(), Self::Error> {
        let mut prev = 0u8;
        for byte in s.bytes() {
            if byte == b'\n' && prev != b'\r' {
                self.write_byte(b'\r')?;
            }
            self.write_byte(byte)?;
            prev = byte;
        }
        Ok(())
    }

    /// Write a 32-bit value as exactly 8 uppercase hexadecimal digits,
    /// without a `0x` prefix.
    fn write_hex(&mut self, value: u32) -> Result<(), Self::Error> {
        for shift in (0..8).rev() {
            let digit = ((value >> (shift * 4)) & 0xF) as u8;
            let ascii = if digit > 9 {
                b'A' + (digit - 10)
            } else {
                b'0' + digit
            };
            self.write_byte(ascii)?;
        }
        Ok(())
    }
}

/// Wrapper type to implement core::fmt::Write for SerialPort types.
/// This allows using write!/writeln! macros.
pub struct SerialWriter<T: SerialPort>(pub T);

impl<T> fmt::Write for SerialWriter<T>
where
    T: SerialPort,
    T::Error: fmt::Debug,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str_crlf(s).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Captures written bytes instead of driving hardware.
    struct RecordingPort {
        buf: [u8; 64],
        len: usize,
        rx: u8,
    }

    impl RecordingPort {
        fn new() -> Self {
            Self {
                buf: [0; 64],
                len: 0,
                rx: 0,
            }
        }

        fn written(&self) -> &[u8] {
            &self.buf[..self.len]
        }
    }

    impl SerialPort for RecordingPort {
        type Error = core::convert::Infallible;

        fn configure(&mut self, _config: SerialConfig) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
            self.buf[self.len] = byte;
            self.len += 1;
            Ok(())
        }

        fn read_byte(&mut self) -> Result<u8, Self::Error> {
            Ok(self.rx)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn lf_expands_to_cr_lf() {
        let mut port = RecordingPort::new();
        port.write_str_crlf("a\nb").unwrap();
        assert_eq!(port.written(), b"a\r\nb");
    }

    #[test]
    fn existing_cr_not_duplicated() {
        let mut port = RecordingPort::new();
        port.write_str_crlf("a\r\nb").unwrap();
        assert_eq!(port.written(), b"a\r\nb");
    }

    #[test]
    fn leading_lf_gets_cr() {
        let mut port = RecordingPort::new();
        port.write_str_crlf("\n").unwrap();
        assert_eq!(port.written(), b"\r\n");
    }

    #[test]
    fn hex_zero() {
        let mut port = RecordingPort::new();
        port.write_hex(0x0000_0000).unwrap();
        assert_eq!(port.written(), b"00000000");
    }

    #[test]
    fn hex_all_ones() {
        let mut port = RecordingPort::new();
        port.write_hex(0xFFFF_FFFF).unwrap();
        assert_eq!(port.written(), b"FFFFFFFF");
    }

    #[test]
    fn hex_mixed_digits() {
        let mut port = RecordingPort::new();
        port.write_hex(0x1A2B_3C4D).unwrap();
        assert_eq!(port.written(), b"1A2B3C4D");
    }

    #[test]
    fn read_char_normalizes_cr() {
        let mut port = RecordingPort::new();
        port.rx = b'\r';
        assert_eq!(port.read_char().unwrap(), b'\n');
        port.rx = b'x';
        assert_eq!(port.read_char().unwrap(), b'x');
    }
}
