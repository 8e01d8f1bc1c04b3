//! Platform Drivers (SoC level)
//!
//! Each supported SoC gets a module of register-level drivers built on
//! the traits in [`crate::hal`]. The BCM283x family shares one
//! peripheral block layout; only the base address the block is mapped
//! at differs between family members, so board selection is a Cargo
//! feature rather than a separate module tree.

pub mod bcm283x;
