//! SNES Controller Driver
//!
//! The SNES pad is a 16-position parallel-in/serial-out shift
//! register sampled by bit-banging three GPIO lines under software
//! timing:
//!
//! 1. Drive LATCH high for 12 us. The pad snapshots all 16 button
//!    states into its register and presents the first bit on DATA.
//! 2. Drop LATCH, then run 16 clock cycles of 12 us each: 6 us after
//!    the last edge, drive CLOCK low and read DATA on the falling
//!    edge; 6 us later drive CLOCK high, which shifts the next bit
//!    out.
//!
//! The wire is active-low (a pressed button reads as logic 0); the
//! returned snapshot inverts this so 1 = pressed. There is no framing
//! and no checksum: a desynchronized pad yields plausible-looking but
//! wrong bits, which this layer cannot detect.

use crate::hal::gpio::{GpioController, PinLevel};
use crate::hal::input::{Buttons, Gamepad};
use crate::hal::timer::MonotonicTimer;

/// LATCH pulse width in microseconds.
const LATCH_PULSE_US: u32 = 12;

/// Half of the 12 us bit-clock period.
const HALF_CYCLE_US: u32 = 6;

/// Number of shift positions the pad reports.
const REPORT_BITS: u16 = 16;

/// GPIO lines wired to the controller plug.
#[derive(Debug, Copy, Clone)]
pub struct SnesPins {
    /// LATCH output.
    pub latch: u8,
    /// CLOCK output.
    pub clock: u8,
    /// DATA input. Needs an external pull-down on the breadboard; the
    /// internal pull is left disabled.
    pub data: u8,
}

impl Default for SnesPins {
    /// The breadboard wiring this console ships with: LATCH on GPIO
    /// 9, CLOCK on 11, DATA on 10.
    fn default() -> Self {
        Self {
            latch: 9,
            clock: 11,
            data: 10,
        }
    }
}

/// Bit-banged SNES controller reader.
pub struct SnesController<G, T> {
    gpio: G,
    timer: T,
    pins: SnesPins,
}

impl<G, T> SnesController<G, T>
where
    G: GpioController<Pin = u8>,
    T: MonotonicTimer,
{
    pub fn new(gpio: G, timer: T, pins: SnesPins) -> Self {
        Self { gpio, timer, pins }
    }

    /// Configure the three lines and park them in the idle state the
    /// sampling protocol assumes: LATCH low, CLOCK high.
    pub fn init(&mut self) -> Result<(), G::Error> {
        self.gpio.set_output(self.pins.latch)?;
        self.gpio.set_output(self.pins.clock)?;
        self.gpio.set_input(self.pins.data)?;

        self.gpio.set_low(self.pins.latch)?;
        self.gpio.set_high(self.pins.clock)
    }

    /// Latch and shift out one full 16-bit snapshot.
    pub fn sample(&mut self) -> Result<Buttons, G::Error> {
        let mut data: u16 = 0;

        // Latch the button states; the first bit appears on DATA
        self.gpio.set_high(self.pins.latch)?;
        self.timer.delay_us(LATCH_PULSE_US);
        self.gpio.set_low(self.pins.latch)?;

        for bit in 0..REPORT_BITS {
            self.timer.delay_us(HALF_CYCLE_US);

            // Falling edge; the current bit is stable on DATA
            self.gpio.set_low(self.pins.clock)?;

            // A low line means pressed; record it as a 1
            if self.gpio.read(self.pins.data)? == PinLevel::Low {
                data |= 1 << bit;
            }

            self.timer.delay_us(HALF_CYCLE_US);

            // Rising edge shifts the next bit out
            self.gpio.set_high(self.pins.clock)?;
        }

        Ok(Buttons::from_bits_retain(data))
    }
}

impl<G, T> Gamepad for SnesController<G, T>
where
    G: GpioController<Pin = u8>,
    T: MonotonicTimer,
{
    type Error = G::Error;

    fn sample(&mut self) -> Result<Buttons, Self::Error> {
        SnesController::sample(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// Software model of the pad's shift register.
    ///
    /// `pressed` bit `i` makes the DATA line read electrically low
    /// while shift position `i` is selected, exactly as the active-low
    /// wire does.
    struct MockPad {
        pressed: u16,
        position: u16,
        latched: bool,
        clock_high: bool,
    }

    impl MockPad {
        fn new(pressed: u16) -> Self {
            Self {
                pressed,
                position: 0,
                latched: false,
                clock_high: true,
            }
        }
    }

    impl GpioController for MockPad {
        type Pin = u8;
        type Error = Infallible;

        fn set_output(&mut self, _pin: u8) -> Result<(), Infallible> {
            Ok(())
        }

        fn set_input(&mut self, _pin: u8) -> Result<(), Infallible> {
            Ok(())
        }

        fn set_alternate(&mut self, _pin: u8, _alt: u8) -> Result<(), Infallible> {
            Ok(())
        }

        fn set_pull(
            &mut self,
            _pin: u8,
            _pull: crate::hal::gpio::PullMode,
        ) -> Result<(), Infallible> {
            Ok(())
        }

        fn set_high(&mut self, pin: u8) -> Result<(), Infallible> {
            if pin == SnesPins::default().latch {
                self.position = 0;
                self.latched = true;
            } else if pin == SnesPins::default().clock {
                // Rising edge shifts to the next position
                if self.latched && !self.clock_high {
                    self.position += 1;
                }
                self.clock_high = true;
            }
            Ok(())
        }

        fn set_low(&mut self, pin: u8) -> Result<(), Infallible> {
            if pin == SnesPins::default().clock {
                self.clock_high = false;
            }
            Ok(())
        }

        fn read(&self, pin: u8) -> Result<PinLevel, Infallible> {
            assert_eq!(pin, SnesPins::default().data);
            let low = self.position < 16 && self.pressed & (1 << self.position) != 0;
            Ok(if low { PinLevel::Low } else { PinLevel::High })
        }
    }

    /// Counter stuck at zero, so every delay returns immediately.
    struct StoppedTimer;

    impl MonotonicTimer for StoppedTimer {
        fn now_us(&self) -> u64 {
            0
        }
    }

    fn sample_wire(pressed: u16) -> Buttons {
        let mut pad = SnesController::new(MockPad::new(pressed), StoppedTimer, SnesPins::default());
        pad.init().unwrap();
        pad.sample().unwrap()
    }

    #[test]
    fn idle_lines_give_empty_snapshot() {
        assert_eq!(sample_wire(0), Buttons::empty());
    }

    #[test]
    fn each_wire_bit_maps_to_its_snapshot_bit() {
        for bit in 0..16 {
            let snapshot = sample_wire(1 << bit);
            assert_eq!(snapshot.bits(), 1 << bit, "shift position {bit}");
        }
    }

    #[test]
    fn named_buttons_land_on_documented_positions() {
        assert_eq!(sample_wire(1 << 0), Buttons::B);
        assert_eq!(sample_wire(1 << 3), Buttons::START);
        assert_eq!(sample_wire(1 << 6), Buttons::LEFT);
        assert_eq!(sample_wire(1 << 11), Buttons::R);
    }

    #[test]
    fn simultaneous_presses_accumulate() {
        let snapshot = sample_wire((1 << 4) | (1 << 7));
        assert_eq!(snapshot, Buttons::UP | Buttons::RIGHT);
    }
}
