//! Configuration types for the STM32 Ethernet driver

use crate::hal::mdio::MdcClockDivider;
use crate::internal::constants::{
    DEFAULT_MAC_ADDR, MAX_PHY_ADDR, MDIO_TIMEOUT_US, SOFT_RESET_SPINS, TX_WAIT_SPINS,
};
use crate::internal::dma::descriptor::bits::checksum_mode;

/// Ethernet link speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// 10 Mbps
    Mbps10,
    /// 100 Mbps
    #[default]
    Mbps100,
}

/// Ethernet duplex mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Duplex {
    /// Half duplex
    Half,
    /// Full duplex
    #[default]
    Full,
}

/// DMA burst length configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DmaBurstLen {
    /// 1 beat burst
    Burst1 = 1,
    /// 2 beat burst
    Burst2 = 2,
    /// 4 beat burst
    Burst4 = 4,
    /// 8 beat burst
    Burst8 = 8,
    /// 16 beat burst
    Burst16 = 16,
    /// 32 beat burst (default, best performance)
    #[default]
    Burst32 = 32,
}

impl DmaBurstLen {
    /// Convert to the programmable burst length value for DMA register
    #[must_use]
    pub const fn to_pbl(self) -> u32 {
        self as u32
    }
}

/// TX checksum insertion mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TxChecksumMode {
    /// Checksum insertion disabled
    Disabled = 0,
    /// Insert IP header checksum only
    IpHeaderOnly = 1,
    /// Insert IP header and payload checksum (TCP/UDP pseudo-header not calculated)
    IpAndPayload = 2,
    /// Insert IP header and payload checksum with pseudo-header
    #[default]
    Full = 3,
}

impl TxChecksumMode {
    /// Descriptor CIC field value
    #[must_use]
    pub const fn to_cic(self) -> u32 {
        match self {
            TxChecksumMode::Disabled => checksum_mode::DISABLED,
            TxChecksumMode::IpHeaderOnly => checksum_mode::IP_ONLY,
            TxChecksumMode::IpAndPayload => checksum_mode::IP_AND_PAYLOAD,
            TxChecksumMode::Full => checksum_mode::FULL,
        }
    }
}

/// What to do with a received frame whose descriptor reports an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxValidation {
    /// Drop frames with the error summary bit set, count and log them
    #[default]
    Strict,
    /// Deliver every complete frame regardless of error bits
    Trusting,
}

/// How the PHY is located on the MDIO bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhyAddress {
    /// Probe addresses 0..=31 for the driver's identifier
    #[default]
    Scan,
    /// Use a known address
    Fixed(u8),
}

/// Driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Not initialized
    #[default]
    Uninitialized,
    /// Running (TX/RX enabled)
    Running,
}

/// Complete driver configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetConfig {
    /// MAC address (6 bytes)
    pub mac_address: [u8; 6],
    /// MDC clock divider for the management bus
    pub mdc_divider: MdcClockDivider,
    /// MDIO busy-wait timeout in microseconds
    pub mdio_timeout_us: u32,
    /// PHY location
    pub phy_address: PhyAddress,
    /// Handling of RX frames with error bits
    pub rx_validation: RxValidation,
    /// Polls to wait for a free TX descriptor before giving up
    pub tx_wait_spins: u32,
    /// Polls to wait for the DMA soft reset to complete
    pub reset_spins: u32,
    /// DMA burst length
    pub dma_burst_len: DmaBurstLen,
    /// TX checksum insertion mode
    pub tx_checksum: TxChecksumMode,
    /// Enable RX IPv4 checksum offload
    pub rx_checksum: bool,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl NetConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mac_address: DEFAULT_MAC_ADDR,
            mdc_divider: MdcClockDivider::Div62,
            mdio_timeout_us: MDIO_TIMEOUT_US,
            phy_address: PhyAddress::Scan,
            rx_validation: RxValidation::Strict,
            tx_wait_spins: TX_WAIT_SPINS,
            reset_spins: SOFT_RESET_SPINS,
            dma_burst_len: DmaBurstLen::Burst32,
            tx_checksum: TxChecksumMode::Full,
            rx_checksum: true,
        }
    }

    /// Check values that cannot be expressed in the types
    pub const fn validate(&self) -> crate::driver::error::ConfigResult<()> {
        if let PhyAddress::Fixed(addr) = self.phy_address
            && addr > MAX_PHY_ADDR
        {
            return Err(crate::driver::error::ConfigError::InvalidPhyAddress);
        }
        if self.mac_address[0] & 0x01 != 0 {
            return Err(crate::driver::error::ConfigError::InvalidConfig);
        }
        Ok(())
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the MAC address
    ///
    /// If not set, a default locally-administered address (02:00:00:00:00:01)
    /// is used.
    #[must_use]
    pub const fn with_mac_address(mut self, addr: [u8; 6]) -> Self {
        self.mac_address = addr;
        self
    }

    /// Set the MDC clock divider directly
    #[must_use]
    pub const fn with_mdc_divider(mut self, divider: MdcClockDivider) -> Self {
        self.mdc_divider = divider;
        self
    }

    /// Derive the MDC clock divider from the HCLK frequency
    #[must_use]
    pub const fn with_hclk_hz(mut self, hclk_hz: u32) -> Self {
        self.mdc_divider = MdcClockDivider::from_sys_clock_hz(hclk_hz);
        self
    }

    /// Set the MDIO timeout
    #[must_use]
    pub const fn with_mdio_timeout_us(mut self, timeout_us: u32) -> Self {
        self.mdio_timeout_us = timeout_us;
        self
    }

    /// Set how the PHY is located
    #[must_use]
    pub const fn with_phy_address(mut self, address: PhyAddress) -> Self {
        self.phy_address = address;
        self
    }

    /// Set the RX error handling mode
    #[must_use]
    pub const fn with_rx_validation(mut self, validation: RxValidation) -> Self {
        self.rx_validation = validation;
        self
    }

    /// Set the TX descriptor wait budget
    #[must_use]
    pub const fn with_tx_wait_spins(mut self, spins: u32) -> Self {
        self.tx_wait_spins = spins;
        self
    }

    /// Set the soft reset wait budget
    #[must_use]
    pub const fn with_reset_spins(mut self, spins: u32) -> Self {
        self.reset_spins = spins;
        self
    }

    /// Set the DMA burst length
    #[must_use]
    pub const fn with_dma_burst_len(mut self, burst_len: DmaBurstLen) -> Self {
        self.dma_burst_len = burst_len;
        self
    }

    /// Set the TX checksum mode
    #[must_use]
    pub const fn with_tx_checksum(mut self, mode: TxChecksumMode) -> Self {
        self.tx_checksum = mode;
        self
    }

    /// Enable RX checksum offload
    #[must_use]
    pub const fn with_rx_checksum(mut self, enabled: bool) -> Self {
        self.rx_checksum = enabled;
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::error::ConfigError;

    #[test]
    fn config_default_values() {
        let config = NetConfig::new();

        assert_eq!(config.mac_address, DEFAULT_MAC_ADDR);
        assert_eq!(config.phy_address, PhyAddress::Scan);
        assert_eq!(config.rx_validation, RxValidation::Strict);
        assert_eq!(config.dma_burst_len, DmaBurstLen::Burst32);
        assert_eq!(config.tx_checksum, TxChecksumMode::Full);
        assert!(config.rx_checksum);
        assert_eq!(config.tx_wait_spins, TX_WAIT_SPINS);
        assert_eq!(config.mdc_divider, MdcClockDivider::Div62);
    }

    #[test]
    fn config_default_trait_matches_new() {
        let from_default = NetConfig::default();
        let from_new = NetConfig::new();

        assert_eq!(from_default.mac_address, from_new.mac_address);
        assert_eq!(from_default.mdc_divider, from_new.mdc_divider);
        assert_eq!(from_default.rx_validation, from_new.rx_validation);
    }

    #[test]
    fn config_builder_chain() {
        let mac = [0x02, 0x00, 0x00, 0x11, 0x22, 0x33];
        let config = NetConfig::new()
            .with_mac_address(mac)
            .with_phy_address(PhyAddress::Fixed(1))
            .with_rx_validation(RxValidation::Trusting)
            .with_tx_wait_spins(10)
            .with_reset_spins(20)
            .with_tx_checksum(TxChecksumMode::Disabled)
            .with_rx_checksum(false)
            .with_dma_burst_len(DmaBurstLen::Burst8);

        assert_eq!(config.mac_address, mac);
        assert_eq!(config.phy_address, PhyAddress::Fixed(1));
        assert_eq!(config.rx_validation, RxValidation::Trusting);
        assert_eq!(config.tx_wait_spins, 10);
        assert_eq!(config.reset_spins, 20);
        assert_eq!(config.tx_checksum, TxChecksumMode::Disabled);
        assert!(!config.rx_checksum);
        assert_eq!(config.dma_burst_len.to_pbl(), 8);
    }

    #[test]
    fn config_hclk_selects_divider() {
        let config = NetConfig::new().with_hclk_hz(120_000_000);
        assert_eq!(config.mdc_divider, MdcClockDivider::Div62);

        let config = NetConfig::new().with_hclk_hz(25_000_000);
        assert_eq!(config.mdc_divider, MdcClockDivider::Div16);
    }

    #[test]
    fn checksum_mode_maps_to_cic() {
        assert_eq!(TxChecksumMode::Disabled.to_cic(), 0);
        assert_eq!(TxChecksumMode::IpHeaderOnly.to_cic(), 1);
        assert_eq!(TxChecksumMode::IpAndPayload.to_cic(), 2);
        assert_eq!(TxChecksumMode::Full.to_cic(), 3);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert_eq!(NetConfig::new().validate(), Ok(()));
        assert_eq!(
            NetConfig::new().with_phy_address(PhyAddress::Fixed(32)).validate(),
            Err(ConfigError::InvalidPhyAddress)
        );
        assert_eq!(
            NetConfig::new().with_mac_address([0x01, 0, 0x5E, 0, 0, 1]).validate(),
            Err(ConfigError::InvalidConfig)
        );
    }

    #[test]
    fn dma_burst_len_values() {
        assert_eq!(DmaBurstLen::Burst1.to_pbl(), 1);
        assert_eq!(DmaBurstLen::Burst16.to_pbl(), 16);
        assert_eq!(DmaBurstLen::default().to_pbl(), 32);
    }
}
