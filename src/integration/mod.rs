//! External Stack Integrations
//!
//! - **smoltcp** (`smoltcp`): Integration with the smoltcp TCP/IP network stack
//!   - Implements `smoltcp::phy::Device` for [`NetInterface`](crate::NetInterface)
//!   - Owned-copy RX token, pool-backed TX token
//!   - Requires `smoltcp` feature
//!
//! # Example
//!
//! ```ignore
//! use smoltcp::iface::{Config, Interface};
//! use ph_stm32_eth::integration::ethernet_address;
//!
//! let config = Config::new(ethernet_address(&iface).into());
//! let mut net = Interface::new(config, &mut iface, Instant::ZERO);
//! ```

#[cfg(feature = "smoltcp")]
pub mod smoltcp;

#[cfg(feature = "smoltcp")]
pub use smoltcp::{NetRxToken, NetTxToken, checksum_capabilities, ethernet_address};
