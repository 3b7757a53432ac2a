//! Core driver components for the STM32 Ethernet peripheral.
//!
//! - [`config`] - Configuration types and builder
//! - [`error`] - Error types and result aliases
//! - [`buffer`] - Frame buffers and the pool they come from
//! - [`delivery`] - Traits the upper network layer implements
//! - [`interface`] - The [`NetInterface`] and its service loop
//! - [`interrupt`] - Interrupt handle and the pending-event mailbox
//! - [`filtering`] - Multicast filter table
//! - [`link`] - Link state tracking
//! - [`hwaddr`] - Factory MAC address
//!
//! # Example
//!
//! ```ignore
//! use ph_stm32_eth::driver::{NetConfig, RxValidation};
//!
//! let config = NetConfig::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01])
//!     .with_rx_validation(RxValidation::Strict);
//! ```

pub mod buffer;
pub mod config;
pub mod delivery;
pub mod error;
pub mod filtering;
pub mod hwaddr;
pub mod interface;
pub mod interrupt;
pub mod link;

pub use buffer::{Buffer, BufferPool};
pub use config::{
    DmaBurstLen, Duplex, NetConfig, PhyAddress, RxValidation, Speed, State, TxChecksumMode,
};
pub use delivery::{Frame, LinkObserver, NetStack, Rejected};
pub use error::{ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result};
pub use filtering::{FilterOutcome, FilterSlot, MulticastFilter, multicast_mac_for_ipv4};
pub use hwaddr::{hwaddr_from_otp, read_factory_mac_address};
pub use interface::{NetInterface, NetInterfaceDefault, Stats, TxQueued};
pub use interrupt::{EventFlags, InterruptHandle, InterruptStatus};
pub use link::{LinkMonitor, LinkState, LinkTransition};
