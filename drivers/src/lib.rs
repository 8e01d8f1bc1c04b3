//! Hardware Driver Subsystem
//!
//! This crate provides a layered architecture for the polled, bare-metal
//! peripheral access the maze console is built on:
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent trait definitions
//! - [`platform`]: Platform-specific drivers (SoC level)
//! - [`peripheral`]: Reusable peripheral drivers
//! - [`console`]: Global serial console and `log` backend
//!
//! # Design Principles
//!
//! 1. **Separation of Concerns**: Platform code is separate from peripheral code
//! 2. **Zero-Cost Abstractions**: HAL traits compile to direct hardware access
//! 3. **Polling Only**: every wait is a named busy-wait on a status register;
//!    no interrupts, no DMA, no allocation
//! 4. **Clear Ownership**: each register block has exactly one driver value
//!
//! # Usage Example
//!
//! ```no_run
//! use drivers::hal::serial::{SerialConfig, SerialPort};
//! use drivers::platform::bcm283x::mini_uart::MiniUart;
//!
//! let mut uart = unsafe { MiniUart::new() };
//! uart.configure(SerialConfig::default()).unwrap();
//! uart.write_str_crlf("Hello, world!\n").unwrap();
//! ```

#![no_std]
#![allow(dead_code)]

pub mod console;
pub mod hal;
pub mod peripheral;
pub mod platform;

// Re-export commonly used types
pub use hal::framebuffer::FrameBuffer;
pub use hal::gpio::{GpioController, PinLevel};
pub use hal::input::{Buttons, Gamepad};
pub use hal::serial::{SerialConfig, SerialPort};
pub use hal::timer::MonotonicTimer;
