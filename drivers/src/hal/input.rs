//! Game controller Hardware Abstraction Layer.
//!
//! A controller sample is a raw 16-bit image of the wire: bit `i` set
//! means the button on shift position `i` was pressed when the
//! controller latched its state. The snapshot carries no framing or
//! checksum, so a desynchronized peripheral produces plausible-looking
//! but wrong bits; that is accepted at this layer.

use bitflags::bitflags;

bitflags! {
    /// Button-state snapshot of a 16-position shift-register pad.
    ///
    /// Bit positions 0-11 carry the named SNES buttons; positions
    /// 12-15 are unused by the pad but are retained verbatim so the
    /// snapshot stays a faithful wire image.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Buttons: u16 {
        const B = 1 << 0;
        const Y = 1 << 1;
        const SELECT = 1 << 2;
        const START = 1 << 3;
        const UP = 1 << 4;
        const DOWN = 1 << 5;
        const LEFT = 1 << 6;
        const RIGHT = 1 << 7;
        const A = 1 << 8;
        const X = 1 << 9;
        const L = 1 << 10;
        const R = 1 << 11;
    }
}

/// A pollable game controller.
///
/// Every call produces a fresh snapshot; there is no persistent state
/// and no change notification. Callers poll at whatever rate suits
/// them.
pub trait Gamepad {
    /// Error type for sampling operations.
    type Error: core::fmt::Debug;

    /// Sample the current button state.
    fn sample(&mut self) -> Result<Buttons, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_buttons_cover_low_twelve_bits() {
        let all = Buttons::all();
        assert_eq!(all.bits(), 0x0FFF);
    }

    #[test]
    fn unknown_bits_are_retained() {
        let snapshot = Buttons::from_bits_retain(0xF000);
        assert_eq!(snapshot.bits(), 0xF000);
        assert!(!snapshot.contains(Buttons::B));
    }
}
