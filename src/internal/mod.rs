//! Internal Implementation Details
//!
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`register`]: MAC and DMA register map and typed accessors
//! - [`dma`]: Descriptor rings and the engine driving them
//! - [`phy_regs`]: IEEE 802.3 and KS8721 PHY register definitions
//! - [`constants`]: Frame sizes, ring defaults and timing

pub(crate) mod constants;
pub(crate) mod dma;
pub(crate) mod phy_regs;
pub(crate) mod register;
