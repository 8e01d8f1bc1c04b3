//! BCM283x Auxiliary Mini UART Driver (UART1)
//!
//! The Mini UART is one of the three devices in the auxiliary
//! peripheral block. It is a cut-down 16550: an I/O register that is
//! RX on read and TX on write, interrupt-enable / interrupt-identify
//! registers (kept disabled here), line-control, modem-control, a
//! line-status register whose bit 0 is data-ready and bit 5 is
//! transmitter-empty, and an 8x-oversampling baud divisor clocked off
//! the 250 MHz core clock.
//!
//! Character I/O is blocking: both directions busy-wait on the line
//! status register with no timeout.

use super::PERIPHERAL_BASE;
use super::gpio::Bcm283xGpio;
use crate::hal::gpio::GpioController;
use crate::hal::serial::{DataBits, Parity, SerialConfig, SerialError, SerialPort, StopBits};
use core::ptr::{read_volatile, write_volatile};

/// Auxiliary block offset from the peripheral base.
const AUX_OFFSET: usize = 0x21_5000;

/// Auxiliary block base address.
pub const AUX_BASE: usize = PERIPHERAL_BASE + AUX_OFFSET;

/// Core clock feeding the baud generator.
const CORE_CLOCK_HZ: u32 = 250_000_000;

// Register offsets within the auxiliary block
const AUX_IRQ: usize = 0x00;
const AUX_ENABLE: usize = 0x04;
const MU_IO: usize = 0x40;
const MU_IER: usize = 0x44;
const MU_IIR: usize = 0x48;
const MU_LCR: usize = 0x4C;
const MU_MCR: usize = 0x50;
const MU_LSR: usize = 0x54;
const MU_MSR: usize = 0x58;
const MU_SCRATCH: usize = 0x5C;
const MU_CNTL: usize = 0x60;
const MU_STAT: usize = 0x64;
const MU_BAUD: usize = 0x68;

// AUX enable register bit 0 enables the Mini UART; bits 1-2 belong to
// the SPI blocks and must be preserved
const ENABLE_MINI_UART: u32 = 1 << 0;

// Line status register bits
const LSR_DATA_READY: u32 = 1 << 0;
const LSR_TX_EMPTY: u32 = 1 << 5;

// Line control: 8-bit character mode
const LCR_8BIT: u32 = 0b11;

// IIR write: enable both FIFOs and clear their contents
const IIR_ENABLE_CLEAR_FIFOS: u32 = 0xC6;

// Control register: receiver and transmitter enables
const CNTL_RX_TX_ENABLE: u32 = 0b11;

/// GPIO pins the Mini UART is multiplexed onto.
const TXD_PIN: u8 = 14;
const RXD_PIN: u8 = 15;

/// Alternate function mapping TXD1/RXD1 onto pins 14/15.
const UART_ALT_FN: u8 = 5;

/// BCM283x Mini UART driver.
pub struct MiniUart {
    base: usize,
}

impl MiniUart {
    /// Create a new Mini UART instance at the SoC's auxiliary block.
    ///
    /// # Safety
    ///
    /// - Auxiliary registers must be properly mapped
    /// - Only one instance should exist
    pub const unsafe fn new() -> Self {
        Self { base: AUX_BASE }
    }

    /// Create an instance with a custom base address (for testing).
    ///
    /// # Safety
    ///
    /// `base` must point to a writable auxiliary register block.
    pub const unsafe fn with_base(base: usize) -> Self {
        Self { base }
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }

    /// Busy-wait until the transmit FIFO can accept a character.
    fn wait_until_transmitter_empty(&self) {
        while self.read_reg(MU_LSR) & LSR_TX_EMPTY == 0 {
            core::hint::spin_loop();
        }
    }

    /// Busy-wait until the receive FIFO holds a character.
    fn wait_until_data_ready(&self) {
        while self.read_reg(MU_LSR) & LSR_DATA_READY == 0 {
            core::hint::spin_loop();
        }
    }

    /// Baud divisor: `core_clock / (8 * baud) - 1`, 16 bits wide.
    fn baud_divisor(baud_rate: u32) -> Result<u32, SerialError> {
        if baud_rate == 0 {
            return Err(SerialError::InvalidConfig);
        }

        let divisor = CORE_CLOCK_HZ / (8 * baud_rate);
        if divisor == 0 || divisor - 1 > 0xFFFF {
            return Err(SerialError::InvalidConfig);
        }

        Ok(divisor - 1)
    }
}

impl SerialPort for MiniUart {
    type Error = SerialError;

    /// Bring up the Mini UART.
    ///
    /// Multiplexes GPIO 14/15 into the UART's alternate function
    /// (with the mandatory pull-disable sequencing), then programs the
    /// block: enable it, mask every interrupt, drop flow control,
    /// select 8-bit characters, force the modem-control line high,
    /// reset and enable both FIFOs, set the baud divisor, and finally
    /// enable transmitter and receiver.
    fn configure(&mut self, config: SerialConfig) -> Result<(), SerialError> {
        // The Mini UART has no parity generator and one stop bit
        if !matches!(config.data_bits, DataBits::Eight) {
            return Err(SerialError::InvalidConfig);
        }
        if !matches!(config.parity, Parity::None) {
            return Err(SerialError::InvalidConfig);
        }
        if !matches!(config.stop_bits, StopBits::One) {
            return Err(SerialError::InvalidConfig);
        }

        let divisor = Self::baud_divisor(config.baud_rate)?;

        // The pins must be multiplexed before the block is enabled
        let mut gpio = unsafe { Bcm283xGpio::new() };
        gpio.set_alternate(TXD_PIN, UART_ALT_FN)
            .map_err(|_| SerialError::Other)?;
        gpio.set_alternate(RXD_PIN, UART_ALT_FN)
            .map_err(|_| SerialError::Other)?;

        // Enable the Mini UART, preserving the SPI enable bits
        let enable = self.read_reg(AUX_ENABLE);
        self.write_reg(AUX_ENABLE, enable | ENABLE_MINI_UART);

        // All interrupts off; this system polls
        self.write_reg(MU_IER, 0);

        // Transmitter, receiver, and flow control off while configuring
        self.write_reg(MU_CNTL, 0);

        self.write_reg(MU_LCR, LCR_8BIT);

        // RTS high (and every other modem control bit clear)
        self.write_reg(MU_MCR, 0);

        self.write_reg(MU_IIR, IIR_ENABLE_CLEAR_FIFOS);
        self.write_reg(MU_BAUD, divisor);

        self.write_reg(MU_CNTL, CNTL_RX_TX_ENABLE);

        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
        self.wait_until_transmitter_empty();
        self.write_reg(MU_IO, byte as u32);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, SerialError> {
        self.wait_until_data_ready();
        Ok((self.read_reg(MU_IO) & 0xFF) as u8)
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        self.wait_until_transmitter_empty();
        Ok(())
    }
}

// SAFETY: MiniUart wraps memory-mapped hardware that can be safely
// accessed from any thread when protected by synchronization.
unsafe impl Send for MiniUart {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisor_for_115200_is_270() {
        assert_eq!(MiniUart::baud_divisor(115200).unwrap(), 270);
    }

    #[test]
    fn divisor_rejects_degenerate_rates() {
        assert_eq!(MiniUart::baud_divisor(0), Err(SerialError::InvalidConfig));
        // 300 baud needs a divisor beyond the 16-bit field
        assert_eq!(MiniUart::baud_divisor(300), Err(SerialError::InvalidConfig));
    }

    #[test]
    fn divisor_for_9600() {
        // 250 MHz / (8 * 9600) - 1 = 3254
        assert_eq!(MiniUart::baud_divisor(9600).unwrap(), 3254);
    }
}
