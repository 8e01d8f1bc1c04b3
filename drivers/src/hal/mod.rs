//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! This module defines generic traits for interacting with hardware
//! peripherals. These traits are implemented by platform-specific
//! and peripheral drivers, allowing application code to be written
//! in a platform-independent manner.
//!
//! # Design Principles
//!
//! - **Zero-cost abstractions**: Traits compile to direct hardware access
//! - **Type safety**: Use associated types to catch errors at compile time
//! - **No platform leakage**: Traits must not reference platform-specific types
//! - **Blocking by busy-wait**: every suspend point is a spin loop on a
//!   hardware condition; no trait method yields to anything but hardware
//!
//! # Available Interfaces
//!
//! - [`gpio`]: General Purpose Input/Output control
//! - [`serial`]: Serial port (UART) communication
//! - [`timer`]: Free-running counters and busy-wait delays
//! - [`framebuffer`]: Linear pixel buffer access
//! - [`input`]: Game controller sampling

pub mod framebuffer;
pub mod gpio;
pub mod input;
pub mod serial;
pub mod timer;
