//! BCM283x GPIO Controller Driver
//!
//! 54 pins, each with a 3-bit function-select field (10 pins per
//! register), single-bit set/clear/level registers, and an internal
//! pull resistor programmed through a timed two-register sequence.
//!
//! Pin modes cannot be read back; callers track intended state.

use super::PERIPHERAL_BASE;
use crate::hal::gpio::{GpioController, PinLevel, PullMode};
use core::ptr::{read_volatile, write_volatile};

/// GPIO block offset from the peripheral base.
const GPIO_OFFSET: usize = 0x20_0000;

/// GPIO block base address.
pub const GPIO_BASE: usize = PERIPHERAL_BASE + GPIO_OFFSET;

/// Highest valid pin number.
const MAX_PIN: u8 = 53;

/// Settle/hold time of the pull-resistor control signal, in cycles.
const PULL_SETTLE_CYCLES: u32 = 150;

/// GPIO function selection.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Function {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

/// Internal pull resistor control codes.
#[repr(u32)]
#[derive(Copy, Clone, Debug)]
pub enum Pull {
    Off = 0b00,
    Down = 0b01,
    Up = 0b10,
}

impl From<PullMode> for Pull {
    fn from(mode: PullMode) -> Self {
        match mode {
            PullMode::None => Pull::Off,
            PullMode::Up => Pull::Up,
            PullMode::Down => Pull::Down,
        }
    }
}

/// Memory-mapped register layout.
///
/// The event-detect block between the level and pull registers is
/// unused (no interrupts anywhere in this system) but must be kept in
/// the layout so `gppud` lands at offset 0x94.
#[repr(C)]
struct Registers {
    gpfsel: [u32; 6],
    _r0: u32,
    gpset: [u32; 2],
    _r1: u32,
    gpclr: [u32; 2],
    _r2: u32,
    gplev: [u32; 2],
    _r3: [u32; 22],
    gppud: u32,
    gppudclk: [u32; 2],
}

fn pin_reg_and_bit(pin: u8) -> (usize, u32) {
    let reg = (pin / 32) as usize;
    let bit = 1u32 << (pin % 32);
    (reg, bit)
}

fn delay_cycles(mut count: u32) {
    while count != 0 {
        unsafe { core::arch::asm!("nop") };
        count -= 1;
    }
}

/// GPIO errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GpioError {
    InvalidPin,
    InvalidFunction,
}

/// BCM283x GPIO controller.
#[derive(Debug)]
pub struct Bcm283xGpio {
    base: usize,
}

impl Bcm283xGpio {
    /// Create a new GPIO controller at the SoC's GPIO block.
    ///
    /// # Safety
    ///
    /// GPIO registers must be properly mapped, and no other value may
    /// be driving the same block.
    pub const unsafe fn new() -> Self {
        Self { base: GPIO_BASE }
    }

    /// Create a controller with a custom base address (for testing).
    ///
    /// # Safety
    ///
    /// `base` must point to a writable block laid out like
    /// [`Registers`].
    pub const unsafe fn with_base(base: usize) -> Self {
        Self { base }
    }

    #[inline(always)]
    fn regs(&self) -> *mut Registers {
        self.base as *mut Registers
    }

    fn check_pin(pin: u8) -> Result<(), GpioError> {
        if pin <= MAX_PIN {
            Ok(())
        } else {
            Err(GpioError::InvalidPin)
        }
    }

    /// Set the function of a GPIO pin.
    ///
    /// Read-modify-write of the pin's 3-bit field only; every other
    /// pin sharing the register keeps its prior bit pattern.
    pub fn set_function(&mut self, pin: u8, func: Function) -> Result<(), GpioError> {
        Self::check_pin(pin)?;

        let reg = (pin / 10) as usize;
        let shift = (pin % 10) * 3;
        let mask = 0b111 << shift;

        unsafe {
            let fsel = &mut (*self.regs()).gpfsel[reg];
            let val = read_volatile(fsel);
            let val = (val & !mask) | ((func as u32) << shift);
            write_volatile(fsel, val);
        }

        Ok(())
    }

    /// Program the internal pull resistor for a pin.
    ///
    /// The hardware mandates this exact sequence: write the control
    /// code, wait >=150 cycles for it to settle, clock it into the
    /// pin with a single-bit pulse, wait >=150 cycles of hold time,
    /// then remove control signal and clock. Reordering or shortening
    /// any step leaves the pull state undefined.
    pub fn program_pull(&mut self, pin: u8, pull: Pull) -> Result<(), GpioError> {
        Self::check_pin(pin)?;
        let (reg, bit) = pin_reg_and_bit(pin);

        unsafe {
            let gppud = &mut (*self.regs()).gppud;
            let clk = &mut (*self.regs()).gppudclk[reg];

            write_volatile(gppud, pull as u32);
            delay_cycles(PULL_SETTLE_CYCLES);

            write_volatile(clk, bit);
            delay_cycles(PULL_SETTLE_CYCLES);

            write_volatile(gppud, 0);
            write_volatile(clk, 0);
        }

        Ok(())
    }

    /// Read the current logic level of a pin.
    pub fn level(&self, pin: u8) -> Result<PinLevel, GpioError> {
        Self::check_pin(pin)?;
        let (reg, bit) = pin_reg_and_bit(pin);

        unsafe {
            let val = read_volatile(&(*self.regs()).gplev[reg]);
            Ok(PinLevel::from(val & bit != 0))
        }
    }

    fn configure(&mut self, pin: u8, func: Function) -> Result<(), GpioError> {
        self.set_function(pin, func)?;
        self.program_pull(pin, Pull::Off)
    }
}

impl GpioController for Bcm283xGpio {
    type Pin = u8;
    type Error = GpioError;

    fn set_output(&mut self, pin: Self::Pin) -> Result<(), Self::Error> {
        self.configure(pin, Function::Output)
    }

    fn set_input(&mut self, pin: Self::Pin) -> Result<(), Self::Error> {
        self.configure(pin, Function::Input)
    }

    fn set_alternate(&mut self, pin: Self::Pin, alt: u8) -> Result<(), Self::Error> {
        let func = match alt {
            0 => Function::Alt0,
            1 => Function::Alt1,
            2 => Function::Alt2,
            3 => Function::Alt3,
            4 => Function::Alt4,
            5 => Function::Alt5,
            _ => return Err(GpioError::InvalidFunction),
        };
        self.configure(pin, func)
    }

    fn set_pull(&mut self, pin: Self::Pin, pull: PullMode) -> Result<(), Self::Error> {
        self.program_pull(pin, pull.into())
    }

    fn set_high(&mut self, pin: Self::Pin) -> Result<(), Self::Error> {
        Self::check_pin(pin)?;
        let (reg, bit) = pin_reg_and_bit(pin);

        unsafe {
            write_volatile(&mut (*self.regs()).gpset[reg], bit);
        }

        Ok(())
    }

    fn set_low(&mut self, pin: Self::Pin) -> Result<(), Self::Error> {
        Self::check_pin(pin)?;
        let (reg, bit) = pin_reg_and_bit(pin);

        unsafe {
            write_volatile(&mut (*self.regs()).gpclr[reg], bit);
        }

        Ok(())
    }

    fn read(&self, pin: Self::Pin) -> Result<PinLevel, Self::Error> {
        self.level(pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUM_REGS: usize = core::mem::size_of::<Registers>() / 4;

    const FSEL1: usize = 1;
    const SET0: usize = 7;
    const CLR0: usize = 10;
    const LEV0: usize = 13;
    const PUD: usize = 37;
    const PUDCLK0: usize = 38;

    struct MockBlock([u32; NUM_REGS]);

    fn gpio_on(block: &mut MockBlock) -> Bcm283xGpio {
        unsafe { Bcm283xGpio::with_base(block.0.as_mut_ptr() as usize) }
    }

    #[test]
    fn register_layout_offsets() {
        assert_eq!(core::mem::offset_of!(Registers, gpset), 0x1C);
        assert_eq!(core::mem::offset_of!(Registers, gpclr), 0x28);
        assert_eq!(core::mem::offset_of!(Registers, gplev), 0x34);
        assert_eq!(core::mem::offset_of!(Registers, gppud), 0x94);
        assert_eq!(core::mem::offset_of!(Registers, gppudclk), 0x98);
    }

    #[test]
    fn set_output_writes_function_field() {
        let mut block = MockBlock([0; NUM_REGS]);
        let mut gpio = gpio_on(&mut block);

        gpio.set_output(9).unwrap();

        // Pin 9 lives in GPFSEL0 bits 27-29
        assert_eq!(block.0[0], (Function::Output as u32) << 27);
    }

    #[test]
    fn set_function_preserves_sibling_pins() {
        let mut block = MockBlock([0; NUM_REGS]);
        // Pins 10 and 12 already configured in GPFSEL1
        block.0[FSEL1] = (0b001 << 0) | (0b100 << 6);

        let mut gpio = gpio_on(&mut block);
        gpio.set_alternate(14, 5).unwrap();

        // Pin 14 is bits 12-14 of GPFSEL1; neighbors untouched
        let expected = (0b001 << 0) | (0b100 << 6) | ((Function::Alt5 as u32) << 12);
        assert_eq!(block.0[FSEL1], expected);
    }

    #[test]
    fn reconfigure_clears_old_function_first() {
        let mut block = MockBlock([0; NUM_REGS]);
        let mut gpio = gpio_on(&mut block);

        gpio.set_alternate(11, 3).unwrap();
        gpio.set_input(11).unwrap();

        // GPFSEL1 bits 3-5 back to 000, nothing else set
        assert_eq!(block.0[FSEL1], 0);
    }

    #[test]
    fn pull_sequence_leaves_control_registers_cleared() {
        let mut block = MockBlock([0; NUM_REGS]);
        let mut gpio = gpio_on(&mut block);

        gpio.set_input(10).unwrap();

        assert_eq!(block.0[PUD], 0);
        assert_eq!(block.0[PUDCLK0], 0);
    }

    #[test]
    fn set_high_and_low_use_single_bit_writes() {
        let mut block = MockBlock([0; NUM_REGS]);
        let mut gpio = gpio_on(&mut block);

        gpio.set_high(9).unwrap();
        assert_eq!(block.0[SET0], 1 << 9);

        gpio.set_low(11).unwrap();
        assert_eq!(block.0[CLR0], 1 << 11);
    }

    #[test]
    fn level_reads_pin_bit() {
        let mut block = MockBlock([0; NUM_REGS]);
        block.0[LEV0] = 1 << 10;

        let gpio = gpio_on(&mut block);
        assert_eq!(gpio.read(10).unwrap(), PinLevel::High);
        assert_eq!(gpio.read(9).unwrap(), PinLevel::Low);
    }

    #[test]
    fn invalid_pin_rejected() {
        let mut block = MockBlock([0; NUM_REGS]);
        let mut gpio = gpio_on(&mut block);

        assert_eq!(gpio.set_output(54), Err(GpioError::InvalidPin));
        assert_eq!(gpio.set_alternate(9, 6), Err(GpioError::InvalidFunction));
    }
}
