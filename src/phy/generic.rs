//! Generic PHY Driver Trait
//!
//! Common interface for Ethernet PHY drivers built on the IEEE 802.3
//! Clause 22 register set, plus the bus scan used to locate the PHY.

use crate::driver::config::{Duplex, Speed};
use crate::driver::error::{ConfigError, Error, IoError, Result};
use crate::hal::mdio::MdioBus;
use crate::internal::constants::MAX_PHY_ADDR;
use crate::internal::phy_regs::standard::phy_reg;

// =============================================================================
// Link Status
// =============================================================================

/// Negotiated link parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStatus {
    /// Link speed
    pub speed: Speed,
    /// Duplex mode
    pub duplex: Duplex,
}

impl LinkStatus {
    /// Create a new link status
    pub const fn new(speed: Speed, duplex: Duplex) -> Self {
        Self { speed, duplex }
    }

    /// 100 Mbps Full Duplex
    pub const fn fast_full() -> Self {
        Self::new(Speed::Mbps100, Duplex::Full)
    }

    /// 100 Mbps Half Duplex
    pub const fn fast_half() -> Self {
        Self::new(Speed::Mbps100, Duplex::Half)
    }

    /// 10 Mbps Full Duplex
    pub const fn slow_full() -> Self {
        Self::new(Speed::Mbps10, Duplex::Full)
    }

    /// 10 Mbps Half Duplex
    pub const fn slow_half() -> Self {
        Self::new(Speed::Mbps10, Duplex::Half)
    }

    /// Running at 100 Mbps
    pub const fn is_fast(&self) -> bool {
        matches!(self.speed, Speed::Mbps100)
    }

    /// Running full duplex
    pub const fn is_full_duplex(&self) -> bool {
        matches!(self.duplex, Duplex::Full)
    }
}

// =============================================================================
// PHY Capabilities
// =============================================================================

/// Speed/duplex abilities reported by a PHY or its link partner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyCapabilities {
    /// 100BASE-TX Full Duplex
    pub speed_100_fd: bool,
    /// 100BASE-TX Half Duplex
    pub speed_100_hd: bool,
    /// 10BASE-T Full Duplex
    pub speed_10_fd: bool,
    /// 10BASE-T Half Duplex
    pub speed_10_hd: bool,
    /// Auto-negotiation
    pub auto_negotiation: bool,
    /// PAUSE flow control
    pub pause: bool,
}

impl PhyCapabilities {
    /// All 10/100 modes with auto-negotiation
    pub const fn standard_10_100() -> Self {
        Self {
            speed_100_fd: true,
            speed_100_hd: true,
            speed_10_fd: true,
            speed_10_hd: true,
            auto_negotiation: true,
            pause: false,
        }
    }
}

/// Link events latched by the PHY's interrupt register
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyInterrupt {
    /// Link came up since the last acknowledge
    pub link_up: bool,
    /// Link went down since the last acknowledge
    pub link_down: bool,
}

impl PhyInterrupt {
    /// Any link event latched
    pub const fn any(&self) -> bool {
        self.link_up || self.link_down
    }
}

// =============================================================================
// PHY Driver Trait
// =============================================================================

/// Trait for Ethernet PHY drivers
///
/// Implementations handle the chip-specific parts (vendor status registers,
/// interrupt register); the remaining operations default to the standard
/// Clause 22 registers.
pub trait PhyDriver {
    /// Expected `(PHYIDR1, PHYIDR2)` pair used when scanning the bus
    const IDENTIFIER: (u16, u16);

    /// Get the PHY address (0-31)
    fn address(&self) -> u8;

    /// Set the PHY address, typically after a bus scan
    fn set_address(&mut self, addr: u8);

    /// Bring the PHY into operating state
    fn init<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()>;

    /// Read the negotiated speed/duplex from the chip
    ///
    /// Returns `None` while negotiating or for an unknown mode encoding.
    fn negotiated_mode<M: MdioBus>(&self, mdio: &mut M) -> Result<Option<LinkStatus>>;

    /// Enable the link up/down interrupt sources
    fn enable_link_interrupt<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()>;

    /// Read (and thereby clear) the latched interrupt flags
    fn acknowledge_interrupt<M: MdioBus>(&mut self, mdio: &mut M) -> Result<PhyInterrupt>;

    /// Perform a soft reset
    fn soft_reset<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        ieee802_3::soft_reset(mdio, self.address(), crate::internal::constants::PHY_RESET_POLLS)
    }

    /// Check if the link is up
    fn is_link_up<M: MdioBus>(&self, mdio: &mut M) -> Result<bool> {
        ieee802_3::is_link_up(mdio, self.address())
    }

    /// Current link status, `None` if the link is down
    fn link_status<M: MdioBus>(&self, mdio: &mut M) -> Result<Option<LinkStatus>> {
        if !self.is_link_up(mdio)? {
            return Ok(None);
        }
        self.negotiated_mode(mdio)
    }

    /// Enable and restart auto-negotiation
    fn enable_auto_negotiation<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        ieee802_3::advertise(mdio, self.address(), &PhyCapabilities::standard_10_100())?;
        ieee802_3::enable_auto_negotiation(mdio, self.address())
    }

    /// Force specific speed and duplex
    ///
    /// Disables auto-negotiation; a mismatched partner will not link.
    fn force_link<M: MdioBus>(&mut self, mdio: &mut M, status: LinkStatus) -> Result<()> {
        ieee802_3::force_link(mdio, self.address(), status)
    }

    /// Get PHY capabilities
    fn capabilities<M: MdioBus>(&self, mdio: &mut M) -> Result<PhyCapabilities> {
        ieee802_3::read_capabilities(mdio, self.address())
    }

    /// Read the PHY identifier as `(PHYIDR1 << 16) | PHYIDR2`
    fn phy_id<M: MdioBus>(&self, mdio: &mut M) -> Result<u32> {
        ieee802_3::read_phy_id(mdio, self.address())
    }

    /// Check if auto-negotiation is complete
    fn is_auto_negotiation_complete<M: MdioBus>(&self, mdio: &mut M) -> Result<bool> {
        ieee802_3::is_an_complete(mdio, self.address())
    }

    /// Get the link partner's advertised abilities
    fn link_partner_abilities<M: MdioBus>(&self, mdio: &mut M) -> Result<PhyCapabilities> {
        ieee802_3::read_link_partner(mdio, self.address())
    }
}

/// Addresses probed when the PHY address is not configured: 1 to 31, then 0.
///
/// Many PHYs (the KS8721 among them) also answer on address 0 as a
/// broadcast address, so it is only tried once every real address missed.
pub fn default_scan_order() -> impl Iterator<Item = u8> {
    (1..=MAX_PHY_ADDR).chain(core::iter::once(0))
}

/// Probe `addresses` in order for a PHY answering with `id` in
/// PHYIDR1/PHYIDR2
///
/// An address whose read times out counts as empty. Returns the first
/// matching address, or [`ConfigError::PhyNotFound`].
pub fn scan<M, I>(mdio: &mut M, addresses: I, id: (u16, u16)) -> Result<u8>
where
    M: MdioBus,
    I: IntoIterator<Item = u8>,
{
    for addr in addresses {
        match probe_id(mdio, addr) {
            Ok(found) if found == id => return Ok(addr),
            Ok(_) | Err(Error::Io(IoError::Timeout)) => {}
            Err(err) => return Err(err),
        }
    }
    Err(ConfigError::PhyNotFound.into())
}

fn probe_id<M: MdioBus>(mdio: &mut M, addr: u8) -> Result<(u16, u16)> {
    Ok((mdio.read(addr, phy_reg::PHYIDR1)?, mdio.read(addr, phy_reg::PHYIDR2)?))
}

// =============================================================================
// Standard register helpers
// =============================================================================

/// Helper functions using standard IEEE 802.3 registers
pub mod ieee802_3 {
    use super::*;
    use crate::internal::phy_regs::standard::{anar, bmcr, bmsr};

    /// Read BMSR and check link status bit
    pub fn is_link_up<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<bool> {
        let bmsr_val = mdio.read(phy_addr, phy_reg::BMSR)?;
        Ok((bmsr_val & bmsr::LINK_STATUS) != 0)
    }

    /// Read BMSR and check AN complete bit
    pub fn is_an_complete<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<bool> {
        let bmsr_val = mdio.read(phy_addr, phy_reg::BMSR)?;
        Ok((bmsr_val & bmsr::AN_COMPLETE) != 0)
    }

    /// Soft reset via BMCR, polling up to `max_polls` times for completion
    pub fn soft_reset<M: MdioBus>(mdio: &mut M, phy_addr: u8, max_polls: u32) -> Result<()> {
        mdio.write(phy_addr, phy_reg::BMCR, bmcr::RESET)?;

        for _ in 0..max_polls {
            if mdio.read(phy_addr, phy_reg::BMCR)? & bmcr::RESET == 0 {
                return Ok(());
            }
        }
        Err(IoError::PhyError.into())
    }

    /// Write the advertisement register
    pub fn advertise<M: MdioBus>(mdio: &mut M, phy_addr: u8, caps: &PhyCapabilities) -> Result<()> {
        let mut anar_val = anar::SELECTOR_IEEE802_3;
        if caps.speed_100_fd {
            anar_val |= anar::TX_FD;
        }
        if caps.speed_100_hd {
            anar_val |= anar::TX_HD;
        }
        if caps.speed_10_fd {
            anar_val |= anar::T10_FD;
        }
        if caps.speed_10_hd {
            anar_val |= anar::T10_HD;
        }
        if caps.pause {
            anar_val |= anar::PAUSE;
        }
        mdio.write(phy_addr, phy_reg::ANAR, anar_val)
    }

    /// Enable auto-negotiation and restart
    pub fn enable_auto_negotiation<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<()> {
        let bmcr_val = mdio.read(phy_addr, phy_reg::BMCR)?;
        mdio.write(
            phy_addr,
            phy_reg::BMCR,
            (bmcr_val | bmcr::AN_ENABLE | bmcr::AN_RESTART) & !bmcr::ISOLATE,
        )
    }

    /// Force speed and duplex
    pub fn force_link<M: MdioBus>(mdio: &mut M, phy_addr: u8, status: LinkStatus) -> Result<()> {
        let mut bmcr_val = mdio.read(phy_addr, phy_reg::BMCR)?;
        bmcr_val &= !(bmcr::AN_ENABLE | bmcr::ISOLATE | bmcr::SPEED_100 | bmcr::DUPLEX_FULL);

        if status.is_fast() {
            bmcr_val |= bmcr::SPEED_100;
        }
        if status.is_full_duplex() {
            bmcr_val |= bmcr::DUPLEX_FULL;
        }

        mdio.write(phy_addr, phy_reg::BMCR, bmcr_val)
    }

    /// Read PHY ID from PHYIDR1 and PHYIDR2
    pub fn read_phy_id<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<u32> {
        let id1 = mdio.read(phy_addr, phy_reg::PHYIDR1)? as u32;
        let id2 = mdio.read(phy_addr, phy_reg::PHYIDR2)? as u32;
        Ok((id1 << 16) | id2)
    }

    /// Read capabilities from BMSR
    pub fn read_capabilities<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<PhyCapabilities> {
        let bmsr_val = mdio.read(phy_addr, phy_reg::BMSR)?;

        Ok(PhyCapabilities {
            speed_100_fd: (bmsr_val & bmsr::TX_FD_CAPABLE) != 0,
            speed_100_hd: (bmsr_val & bmsr::TX_HD_CAPABLE) != 0,
            speed_10_fd: (bmsr_val & bmsr::T10_FD_CAPABLE) != 0,
            speed_10_hd: (bmsr_val & bmsr::T10_HD_CAPABLE) != 0,
            auto_negotiation: (bmsr_val & bmsr::AN_ABILITY) != 0,
            pause: false,
        })
    }

    /// Read link partner abilities from ANLPAR
    pub fn read_link_partner<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<PhyCapabilities> {
        let anlpar_val = mdio.read(phy_addr, phy_reg::ANLPAR)?;

        Ok(PhyCapabilities {
            speed_100_fd: (anlpar_val & anar::TX_FD) != 0,
            speed_100_hd: (anlpar_val & anar::TX_HD) != 0,
            speed_10_fd: (anlpar_val & anar::T10_FD) != 0,
            speed_10_hd: (anlpar_val & anar::T10_HD) != 0,
            auto_negotiation: true,
            pause: (anlpar_val & anar::PAUSE) != 0,
        })
    }
}
