//! KS8721 PHY Driver
//!
//! Driver for the Micrel KS8721 10/100 Ethernet PHY.
//!
//! Besides the standard Clause 22 registers the driver uses two vendor
//! registers:
//!
//! - `0x1B` interrupt control/status: enables in the upper byte, latched
//!   flags in the lower byte, cleared by reading
//! - `0x1F` 100BASE-TX PHY controller: operation mode indication in bits 4:2
//!
//! The PHY's interrupt output is typically wired to a GPIO/EXTI line; route
//! that interrupt to [`InterruptHandle::on_phy_interrupt`](crate::InterruptHandle::on_phy_interrupt).
//!
//! # Example
//!
//! ```ignore
//! use ph_stm32_eth::phy::{Ksz8721, PhyDriver};
//!
//! let mut phy = Ksz8721::new(1);
//! phy.init(&mut mdio)?;
//!
//! if let Some(link) = phy.link_status(&mut mdio)? {
//!     // program the MAC
//! }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::driver::error::{ConfigError, Result};
use crate::hal::mdio::MdioBus;
use crate::internal::phy_regs::ksz8721::{PHY_ID1, PHY_ID2, icsr, phycr, reg};

use super::generic::{LinkStatus, PhyDriver, PhyInterrupt, ieee802_3};

/// Hardware reset pulse duration in microseconds
const RESET_PULSE_US: u32 = 200;

/// Hardware reset recovery time in microseconds
const RESET_RECOVERY_US: u32 = 1000;

/// Decode the operation mode field of the PHY controller register
pub const fn decode_mode(phycr_val: u16) -> Option<LinkStatus> {
    match phycr_val & phycr::MODE_MASK {
        phycr::MODE_10HD => Some(LinkStatus::slow_half()),
        phycr::MODE_100HD => Some(LinkStatus::fast_half()),
        phycr::MODE_10FD => Some(LinkStatus::slow_full()),
        phycr::MODE_100FD => Some(LinkStatus::fast_full()),
        _ => None,
    }
}

// =============================================================================
// KS8721 Driver (without reset pin)
// =============================================================================

/// KS8721 PHY Driver
///
/// Use [`Ksz8721WithReset`] if the board wires the PHY reset line to a GPIO.
#[derive(Debug)]
pub struct Ksz8721 {
    addr: u8,
}

impl Ksz8721 {
    /// Create a new KS8721 driver at the given address
    ///
    /// When the interface scans the bus the address is replaced by the one
    /// found.
    pub const fn new(addr: u8) -> Self {
        Self { addr }
    }

    /// Verify this is a KS8721 by reading the PHY ID
    pub fn verify_id<M: MdioBus>(&self, mdio: &mut M) -> Result<bool> {
        let id = ieee802_3::read_phy_id(mdio, self.addr)?;
        Ok(id == ((PHY_ID1 as u32) << 16 | PHY_ID2 as u32))
    }

    /// Read the RX error counter
    pub fn receive_error_count<M: MdioBus>(&self, mdio: &mut M) -> Result<u16> {
        mdio.read(self.addr, reg::RXERCR)
    }
}

impl PhyDriver for Ksz8721 {
    const IDENTIFIER: (u16, u16) = (PHY_ID1, PHY_ID2);

    fn address(&self) -> u8 {
        self.addr
    }

    fn set_address(&mut self, addr: u8) {
        self.addr = addr;
    }

    fn init<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        self.enable_auto_negotiation(mdio)?;
        self.enable_link_interrupt(mdio)
    }

    fn negotiated_mode<M: MdioBus>(&self, mdio: &mut M) -> Result<Option<LinkStatus>> {
        let value = mdio.read(self.addr, reg::PHYCR)?;
        Ok(decode_mode(value))
    }

    fn enable_link_interrupt<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        mdio.write(self.addr, reg::ICSR, icsr::LINK_UP_EN | icsr::LINK_DOWN_EN)
    }

    fn acknowledge_interrupt<M: MdioBus>(&mut self, mdio: &mut M) -> Result<PhyInterrupt> {
        let status = mdio.read(self.addr, reg::ICSR)?;
        Ok(PhyInterrupt {
            link_up: status & icsr::LINK_UP != 0,
            link_down: status & icsr::LINK_DOWN != 0,
        })
    }
}

// =============================================================================
// KS8721 Driver (with reset pin)
// =============================================================================

/// KS8721 PHY Driver with an active-low hardware reset pin
#[derive(Debug)]
pub struct Ksz8721WithReset<RST: OutputPin> {
    inner: Ksz8721,
    reset_pin: RST,
}

impl<RST: OutputPin> Ksz8721WithReset<RST> {
    /// Create the driver, releasing the reset line
    pub fn new(addr: u8, mut reset_pin: RST) -> Self {
        let _ = reset_pin.set_high();
        Self {
            inner: Ksz8721::new(addr),
            reset_pin,
        }
    }

    /// Pulse the reset line and wait for the PHY to recover
    ///
    /// Call this before `init()` if the PHY might be in an unknown state.
    pub fn hardware_reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        self.reset_pin.set_low().map_err(|_| ConfigError::ResetFailed)?;
        delay.delay_us(RESET_PULSE_US);
        self.reset_pin.set_high().map_err(|_| ConfigError::ResetFailed)?;
        delay.delay_us(RESET_RECOVERY_US);
        Ok(())
    }

    /// Release the reset pin
    pub fn into_reset_pin(self) -> RST {
        self.reset_pin
    }

    /// Access the inner driver
    pub fn inner(&self) -> &Ksz8721 {
        &self.inner
    }
}

impl<RST: OutputPin> PhyDriver for Ksz8721WithReset<RST> {
    const IDENTIFIER: (u16, u16) = Ksz8721::IDENTIFIER;

    fn address(&self) -> u8 {
        self.inner.address()
    }

    fn set_address(&mut self, addr: u8) {
        self.inner.set_address(addr);
    }

    fn init<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        self.inner.init(mdio)
    }

    fn negotiated_mode<M: MdioBus>(&self, mdio: &mut M) -> Result<Option<LinkStatus>> {
        self.inner.negotiated_mode(mdio)
    }

    fn enable_link_interrupt<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        self.inner.enable_link_interrupt(mdio)
    }

    fn acknowledge_interrupt<M: MdioBus>(&mut self, mdio: &mut M) -> Result<PhyInterrupt> {
        self.inner.acknowledge_interrupt(mdio)
    }
}
