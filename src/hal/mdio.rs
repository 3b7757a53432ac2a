//! MDIO (Management Data Input/Output) HAL
//!
//! Serial management access to the external PHY through the MAC's
//! `MACMIIAR`/`MACMIIDR` register pair. Every transaction is bounded by a
//! caller-supplied timeout; a busy flag that never clears becomes
//! [`IoError::Timeout`] instead of a hang.

use embedded_hal::delay::DelayNs;

use crate::driver::error::{ConfigError, IoError, Result};
use crate::internal::constants::{MAX_PHY_ADDR, MDIO_POLL_INTERVAL_US, MDIO_TIMEOUT_US};
use crate::internal::register::RegisterBlock;
use crate::internal::register::mac::{
    MACMIIAR_CR_MASK, MACMIIAR_CR_SHIFT, MACMIIAR_MB, MACMIIAR_MR_MASK, MACMIIAR_MR_SHIFT,
    MACMIIAR_MW, MACMIIAR_PA_MASK, MACMIIAR_PA_SHIFT, MacRegs,
};

/// Maximum valid register address (5-bit field)
pub const MAX_REG_ADDR: u8 = 31;

/// MDC clock divider (`MACMIIAR.CR`) for the AHB clock (HCLK)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MdcClockDivider {
    /// HCLK/42 (60-100 MHz)
    Div42 = 0,
    /// HCLK/62 (100-120 MHz)
    #[default]
    Div62 = 1,
    /// HCLK/16 (20-35 MHz)
    Div16 = 2,
    /// HCLK/26 (35-60 MHz)
    Div26 = 3,
}

impl MdcClockDivider {
    /// Get the appropriate divider for a given HCLK frequency
    ///
    /// The MDC clock must not exceed 2.5 MHz per IEEE 802.3. HCLK tops out
    /// at 120 MHz on the F2, so anything from 100 MHz up uses HCLK/62.
    pub const fn from_sys_clock_hz(sys_clk_hz: u32) -> Self {
        if sys_clk_hz < 35_000_000 {
            Self::Div16
        } else if sys_clk_hz < 60_000_000 {
            Self::Div26
        } else if sys_clk_hz < 100_000_000 {
            Self::Div42
        } else {
            Self::Div62
        }
    }

    /// Get the divider value for register programming
    pub const fn to_reg_value(self) -> u32 {
        self as u32
    }
}

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// PHY drivers are written against this trait so they can be exercised with
/// a scripted bus in tests.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16>;

    /// Write a PHY register
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()>;

    /// Check if the MDIO bus is busy
    fn is_busy(&self) -> bool;
}

impl<M: MdioBus + ?Sized> MdioBus for &mut M {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        (**self).read(phy_addr, reg_addr)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        (**self).write(phy_addr, reg_addr, value)
    }

    fn is_busy(&self) -> bool {
        (**self).is_busy()
    }
}

// =============================================================================
// MDIO Controller
// =============================================================================

/// MDIO controller driving the MAC's station management interface
#[derive(Debug)]
pub struct MdioController<R: RegisterBlock, D: DelayNs> {
    regs: R,
    clock_divider: MdcClockDivider,
    delay: D,
    timeout_us: u32,
}

impl<R: RegisterBlock, D: DelayNs> MdioController<R, D> {
    /// Create a new MDIO controller with the default divider and timeout
    pub fn new(regs: R, delay: D) -> Self {
        Self::with_clock_divider(regs, delay, MdcClockDivider::Div62)
    }

    /// Create a new MDIO controller with a custom clock divider
    pub fn with_clock_divider(regs: R, delay: D, divider: MdcClockDivider) -> Self {
        Self {
            regs,
            clock_divider: divider,
            delay,
            timeout_us: MDIO_TIMEOUT_US,
        }
    }

    /// Set the clock divider based on HCLK frequency
    pub fn configure_for_sys_clock(&mut self, sys_clk_hz: u32) {
        self.clock_divider = MdcClockDivider::from_sys_clock_hz(sys_clk_hz);
    }

    /// Set the operation timeout
    pub fn set_timeout_us(&mut self, timeout_us: u32) {
        self.timeout_us = timeout_us;
    }

    /// Current clock divider
    pub fn clock_divider(&self) -> MdcClockDivider {
        self.clock_divider
    }

    /// Current operation timeout
    pub fn timeout_us(&self) -> u32 {
        self.timeout_us
    }

    /// Borrow the delay provider
    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    fn wait_not_busy(&mut self) -> Result<()> {
        let mut elapsed = 0u32;
        while MacRegs::new(&self.regs).is_mii_busy() {
            if elapsed >= self.timeout_us {
                return Err(IoError::Timeout.into());
            }
            self.delay.delay_us(MDIO_POLL_INTERVAL_US);
            elapsed += MDIO_POLL_INTERVAL_US;
        }
        Ok(())
    }

    fn build_mii_addr(&self, phy_addr: u8, reg_addr: u8, is_write: bool) -> u32 {
        let mut addr = 0u32;

        // PHY address (bits 15:11)
        addr |= ((phy_addr as u32) << MACMIIAR_PA_SHIFT) & MACMIIAR_PA_MASK;

        // Register address (bits 10:6)
        addr |= ((reg_addr as u32) << MACMIIAR_MR_SHIFT) & MACMIIAR_MR_MASK;

        // Clock range (bits 4:2)
        addr |= (self.clock_divider.to_reg_value() << MACMIIAR_CR_SHIFT) & MACMIIAR_CR_MASK;

        if is_write {
            addr |= MACMIIAR_MW;
        }

        // Busy flag starts the transaction
        addr | MACMIIAR_MB
    }

    fn check_addresses(phy_addr: u8, reg_addr: u8) -> Result<()> {
        if phy_addr > MAX_PHY_ADDR {
            return Err(ConfigError::InvalidPhyAddress.into());
        }
        if reg_addr > MAX_REG_ADDR {
            return Err(ConfigError::InvalidConfig.into());
        }
        Ok(())
    }
}

impl<R: RegisterBlock, D: DelayNs> MdioBus for MdioController<R, D> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        Self::check_addresses(phy_addr, reg_addr)?;
        self.wait_not_busy()?;

        let addr = self.build_mii_addr(phy_addr, reg_addr, false);
        MacRegs::new(&self.regs).set_mii_address(addr);

        self.wait_not_busy()?;

        let data = MacRegs::new(&self.regs).mii_data() & 0xFFFF;
        Ok(data as u16)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        Self::check_addresses(phy_addr, reg_addr)?;
        self.wait_not_busy()?;

        // Data must be in place before the address write starts the cycle
        let mac = MacRegs::new(&self.regs);
        mac.set_mii_data(value as u32);
        mac.set_mii_address(self.build_mii_addr(phy_addr, reg_addr, true));

        self.wait_not_busy()
    }

    fn is_busy(&self) -> bool {
        MacRegs::new(&self.regs).is_mii_busy()
    }
}
