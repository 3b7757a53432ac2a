//! Ethernet PHY Drivers
//!
//! A generic PHY driver trait and the KS8721 implementation.
//!
//! The PHY layer talks to the MAC only through the [`MdioBus`](crate::hal::MdioBus)
//! trait, so drivers can be tested against a mock bus and reused with other
//! MACs.
//!
//! # Supported PHY Chips
//!
//! - [`Ksz8721`]: Micrel KS8721 (STM32F2x7 reference boards)

pub mod generic;
pub mod ksz8721;

pub use generic::{LinkStatus, PhyCapabilities, PhyDriver, PhyInterrupt, default_scan_order, scan};
pub use ksz8721::{Ksz8721, Ksz8721WithReset};

pub use crate::internal::phy_regs::standard::{anar, bmcr, bmsr, phy_reg};
