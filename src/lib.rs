//! STM32F2x7 Ethernet Driver
//!
//! A `no_std`, `no_alloc` network-interface driver for the Ethernet MAC of the
//! STM32F2x7 (a Synopsys DesignWare MAC with its own DMA engine) paired with a
//! Micrel KS8721 PHY.
//!
//! # Architecture
//!
//! The driver is organized into three layers:
//!
//! 1. **Interface** ([`driver`]): [`NetInterface`] with its service loop,
//!    descriptor rings, buffer pool, link tracking and multicast filter
//! 2. **PHY Layer** ([`phy`]): PHY drivers over the MDIO bus
//! 3. **HAL Layer** ([`hal`]): MDIO station management
//!
//! Received frames are handed upward zero-copy as a [`Frame`] spanning one or
//! more pool buffers; frames to send are built in pool buffers and chained
//! over as many TX descriptors as they need.
//!
//! # Supported PHY Chips
//!
//! - [`Ksz8721`]: Micrel KS8721BL/SL (MII, 10/100)
//!
//! Additional PHY drivers can be added by implementing [`PhyDriver`].
//!
//! # Features
//!
//! - `defmt`: defmt formatting and driver logging through defmt
//! - `log`: driver logging through the `log` facade
//! - `smoltcp`: `smoltcp::phy::Device` for [`NetInterface`]
//!
//! # Example
//!
//! ```ignore
//! use ph_stm32_eth::{EventFlags, Ksz8721, Mmio, NetConfig, NetInterface, NetInterfaceDefault};
//!
//! ph_stm32_eth::net_statics!(STORAGE, EVENTS);
//!
//! let regs = unsafe { Mmio::stm32f2x7() };
//! let config = NetConfig::new()
//!     .with_mac_address(unsafe { ph_stm32_eth::driver::read_factory_mac_address() })
//!     .with_hclk_hz(120_000_000);
//!
//! let mut iface: NetInterfaceDefault<_, _, _> = NetInterface::new(
//!     regs,
//!     delay,
//!     Ksz8721::new(0),
//!     unsafe { &mut *core::ptr::addr_of_mut!(STORAGE) },
//!     &EVENTS,
//!     config,
//! );
//! iface.init().unwrap();
//!
//! // ETH interrupt: iface.interrupt_handle().on_mac_interrupt()
//! // PHY EXTI:      iface.interrupt_handle().on_phy_interrupt()
//!
//! loop {
//!     if !iface.poll(&mut stack) {
//!         cortex_m::asm::wfi();
//!     }
//! }
//! ```
//!
//! # Memory Requirements
//!
//! With the default sizing (5 RX and 20 TX descriptors, 32 buffers of 1536
//! bytes) the pool takes 48 KB and the descriptors 800 bytes, all of which
//! must sit in SRAM reachable by the Ethernet DMA.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in clippy.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;
pub mod phy;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "smoltcp")]
#[cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
pub mod integration;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::buffer::{Buffer, BufferPool};
pub use driver::config::{
    DmaBurstLen, Duplex, NetConfig, PhyAddress, RxValidation, Speed, State, TxChecksumMode,
};
pub use driver::delivery::{Frame, LinkObserver, NetStack, Rejected};
pub use driver::error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result,
};
pub use driver::filtering::{FilterOutcome, MulticastFilter, multicast_mac_for_ipv4};
pub use driver::interface::{NetInterface, NetInterfaceDefault, Stats, TxQueued};
pub use driver::interrupt::{EventFlags, InterruptHandle, InterruptStatus};
pub use driver::link::LinkState;
pub use hal::mdio::{MdcClockDivider, MdioBus};
pub use internal::dma::DmaStats;
pub use internal::register::{Mmio, Reg, RegisterBlock};

// Re-export PHY types
pub use phy::{Ksz8721, Ksz8721WithReset, LinkStatus, PhyCapabilities, PhyDriver};

/// Low-level register accessors for advanced use.
///
/// Most users should prefer the [`NetInterface`] API instead of touching
/// registers directly.
///
/// # Safety
///
/// Direct register access bypasses driver invariants. Writing `DMAOMR`,
/// `DMABMR` or the descriptor list registers while the interface is running
/// will desynchronize the rings.
pub mod unsafe_registers {
    pub use crate::internal::register::dma::DmaRegs;
    pub use crate::internal::register::mac::MacRegs;
}

/// Shared driver constants.
pub mod constants {
    pub use crate::internal::constants::{
        // Frame/buffer sizes
        CRC_SIZE,
        DEFAULT_BUFFER_SIZE,
        // MAC address
        DEFAULT_MAC_ADDR,
        // Ring and pool sizing
        DEFAULT_POOL_SIZE,
        DEFAULT_RX_DESCRIPTORS,
        DEFAULT_TX_DESCRIPTORS,
        ETH_HEADER_SIZE,
        MAC_ADDR_LEN,
        MAX_FRAME_SIZE,
        // PHY addressing and timing
        MAX_PHY_ADDR,
        MDIO_TIMEOUT_US,
        MTU,
        MULTICAST_FILTER_SLOTS,
    };
}

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare the static buffer storage and event mailbox an interface needs.
///
/// The storage must be reachable by the Ethernet DMA; place it with a
/// `link_section` attribute if the default `.bss` is not.
///
/// # Examples
///
/// ```ignore
/// ph_stm32_eth::net_statics!(STORAGE, EVENTS);
/// ph_stm32_eth::net_statics!(SMALL_STORAGE, SMALL_EVENTS, 512, 8);
/// ```
#[macro_export]
macro_rules! net_statics {
    ($storage:ident, $events:ident) => {
        $crate::net_statics!(
            $storage,
            $events,
            $crate::constants::DEFAULT_BUFFER_SIZE,
            $crate::constants::DEFAULT_POOL_SIZE
        );
    };
    ($storage:ident, $events:ident, $buf:expr, $pool:expr) => {
        static mut $storage: [[u8; $buf]; $pool] = [[0; $buf]; $pool];
        static $events: $crate::EventFlags = $crate::EventFlags::new();
    };
}
