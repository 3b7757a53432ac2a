//! Centralized Constants
//!
//! Single source of truth for frame sizes, default ring dimensions and the
//! bounded-wait budgets used throughout the driver.
//!
//! Hardware register bit definitions remain in their respective modules
//! (`register/dma.rs`, `register/mac.rs`) as they are specific to those
//! hardware blocks.

// =============================================================================
// Frame and Buffer Sizes
// =============================================================================

/// Maximum Ethernet frame size including VLAN tag (1500 + 14 header + 4 CRC + 4 VLAN)
pub const MAX_FRAME_SIZE: usize = 1522;

/// Standard Ethernet MTU (Maximum Transmission Unit)
pub const MTU: usize = 1500;

/// Ethernet header size (dst MAC + src MAC + EtherType)
pub const ETH_HEADER_SIZE: usize = 14;

/// CRC/FCS size at end of frame
pub const CRC_SIZE: usize = 4;

/// Default DMA buffer size, one full frame plus slack, multiple of 4
pub const DEFAULT_BUFFER_SIZE: usize = 1536;

/// Largest buffer a single descriptor can describe (13-bit size field)
pub const MAX_DESCRIPTOR_BUFFER: usize = 0x1FFF;

// =============================================================================
// Default Ring and Pool Dimensions
// =============================================================================

/// Default number of receive descriptors
pub const DEFAULT_RX_DESCRIPTORS: usize = 5;

/// Default number of transmit descriptors
pub const DEFAULT_TX_DESCRIPTORS: usize = 20;

/// Default number of buffers in the shared pool
pub const DEFAULT_POOL_SIZE: usize = 32;

// =============================================================================
// Timing Constants
// =============================================================================

/// Default MDIO busy-wait timeout in microseconds
pub const MDIO_TIMEOUT_US: u32 = 1_000;

/// MDIO busy poll interval in microseconds
pub const MDIO_POLL_INTERVAL_US: u32 = 10;

/// Iterations to wait for the DMA soft reset bit to self-clear
pub const SOFT_RESET_SPINS: u32 = 0x50000;

/// Default iterations to wait for a free TX descriptor
pub const TX_WAIT_SPINS: u32 = 0x50000;

/// Maximum PHY soft reset polls
pub const PHY_RESET_POLLS: u32 = 500;

// =============================================================================
// MAC Address
// =============================================================================

/// Default locally-administered MAC address
/// Bit 1 of first byte = 1 indicates locally administered
/// Bit 0 of first byte = 0 indicates unicast
pub const DEFAULT_MAC_ADDR: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

/// MAC address length in bytes
pub const MAC_ADDR_LEN: usize = 6;

/// Number of perfect-match address slots usable for multicast (MACA1..MACA3)
pub const MULTICAST_FILTER_SLOTS: usize = 3;

// =============================================================================
// PHY Addressing
// =============================================================================

/// Highest valid Clause 22 PHY address
pub const MAX_PHY_ADDR: u8 = 31;
