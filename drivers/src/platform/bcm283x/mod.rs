//! BCM283x SoC drivers (Raspberry Pi 1/Zero and 3).
//!
//! The peripherals live in one memory-mapped block whose ARM physical
//! base address depends on the family member:
//!
//! - BCM2835 (Pi 1/Zero): `0x2000_0000`
//! - BCM2837 (Pi 3):      `0x3F00_0000`
//!
//! The VideoCore MMU maps either range onto bus addresses at
//! `0x7E00_0000`, which is why documentation offsets are given
//! relative to the block base here.

pub mod framebuffer;
pub mod gpio;
pub mod mailbox;
pub mod mini_uart;
pub mod timer;

// Board selection based on Cargo features
cfg_if::cfg_if! {
    if #[cfg(feature = "bcm2837")] {
        /// Peripheral block base (ARM physical address).
        pub const PERIPHERAL_BASE: usize = 0x3F00_0000;
    } else if #[cfg(feature = "bcm2835")] {
        /// Peripheral block base (ARM physical address).
        pub const PERIPHERAL_BASE: usize = 0x2000_0000;
    } else {
        compile_error!(
            "No board selected!\n\
            Use: cargo build --features bcm2837\n\
            Or:  cargo build --features bcm2835"
        );
    }
}

// Ensure only one board is selected
#[cfg(all(feature = "bcm2835", feature = "bcm2837"))]
compile_error!("Multiple boards selected! Choose only one: bcm2835 OR bcm2837");
