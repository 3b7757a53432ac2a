//! PHY register definitions
//!
//! These live behind the MDIO bus rather than in the peripheral's memory map
//! (see [`register`](super::register) for those).
//!
//! - [`standard`] - IEEE 802.3 Clause 22 registers (0-15)
//! - [`ksz8721`] - KS8721 vendor registers (16-31)

pub mod ksz8721;
pub mod standard;
