//! Hardware Abstraction Layer
//!
//! Higher-level access to the peripheral pieces that sit between the raw
//! registers and the driver.
//!
//! # Delay Integration
//!
//! All types that require delays use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL (e.g. a SysTick or TIMx delay).

pub mod mdio;

pub use mdio::{MdcClockDivider, MdioBus, MdioController};
