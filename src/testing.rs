//! Testing utilities and simulated hardware
//!
//! Host-side stand-ins for the Ethernet peripheral, the PHY and the DMA
//! engine's hardware side, so the driver can be exercised without a board.
//!
//! Only available when running `cargo test`.

#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::boxed::Box;
use std::collections::HashMap;
use std::vec;
use std::vec::Vec;

use crate::driver::delivery::{Frame, LinkObserver, NetStack, Rejected};
use crate::driver::error::{IoError, Result};
use crate::hal::mdio::MdioBus;
use crate::internal::dma::DmaEngine;
use crate::internal::dma::descriptor::bits::rdes0;
use crate::internal::phy_regs::ksz8721::{PHY_ID1, PHY_ID2, icsr, phycr, reg as ksz_reg};
use crate::internal::phy_regs::standard::{bmcr, bmsr, phy_reg};
use crate::internal::register::dma::{DMABMR, DMABMR_SR, DMASR};
use crate::internal::register::mac::{
    MACA0HR, MACA0LR, MACAHR_AE, MACFFR, MACFFR_PAM, MACFFR_PM, MACFFR_RA, MACMIIAR, MACMIIAR_MB,
    MACMIIAR_MR_MASK, MACMIIAR_MR_SHIFT, MACMIIAR_MW, MACMIIAR_PA_MASK, MACMIIAR_PA_SHIFT,
    MACMIIDR, MAC_ADDR_FILTER_COUNT, join_address, maca_high, maca_low,
};
use crate::internal::register::{Reg, RegisterBlock};
use crate::phy::LinkStatus;

/// Static pool storage for tests
pub fn leak_storage<const SIZE: usize, const COUNT: usize>() -> &'static mut [[u8; SIZE]; COUNT] {
    Box::leak(Box::new([[0u8; SIZE]; COUNT]))
}

const KSZ8721_BMSR: u16 = bmsr::TX_FD_CAPABLE
    | bmsr::TX_HD_CAPABLE
    | bmsr::T10_FD_CAPABLE
    | bmsr::T10_HD_CAPABLE
    | bmsr::MF_PREAMBLE_SUPP
    | bmsr::AN_ABILITY
    | bmsr::EXT_CAPABLE;

const fn encode_mode(status: LinkStatus) -> u16 {
    match (status.is_fast(), status.is_full_duplex()) {
        (false, false) => phycr::MODE_10HD,
        (true, false) => phycr::MODE_100HD,
        (false, true) => phycr::MODE_10FD,
        (true, true) => phycr::MODE_100FD,
    }
}

// =============================================================================
// Simulated MAC/DMA register file
// =============================================================================

/// Register file behaving like the STM32F2x7 ETH peripheral
///
/// Models the side effects the driver depends on:
///
/// - `DMASR` is write-1-to-clear
/// - `DMABMR.SR` clears itself unless [`set_reset_stuck`](Self::set_reset_stuck)
/// - a `MACMIIAR` write with `MB` runs the MDIO transaction against the
///   simulated PHYs and clears `MB`, unless [`set_mdio_stuck`](Self::set_mdio_stuck)
///
/// Unset registers read 0. An MDIO read from an address without a PHY
/// returns `0xFFFF`, as the pulled-up bus does.
#[derive(Debug, Default)]
pub struct SimulatedMac {
    registers: RefCell<HashMap<Reg, u32>>,
    write_counts: RefCell<HashMap<Reg, usize>>,
    phys: RefCell<HashMap<u8, HashMap<u8, u16>>>,
    reset_stuck: Cell<bool>,
    mdio_stuck: Cell<bool>,
}

impl SimulatedMac {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current register value, without side effects
    pub fn peek(&self, reg: Reg) -> u32 {
        self.registers.borrow().get(&reg).copied().unwrap_or(0)
    }

    /// Number of driver writes to `reg`
    pub fn write_count(&self, reg: Reg) -> usize {
        self.write_counts.borrow().get(&reg).copied().unwrap_or(0)
    }

    /// Set status bits as the DMA would
    pub fn raise_dma_status(&self, bits: u32) {
        let value = self.peek(DMASR) | bits;
        self.store(DMASR, value);
    }

    /// Keep `DMABMR.SR` set after a reset request
    pub fn set_reset_stuck(&self, stuck: bool) {
        self.reset_stuck.set(stuck);
    }

    /// Leave MDIO transactions pending; releasing abandons the one in flight
    pub fn set_mdio_stuck(&self, stuck: bool) {
        self.mdio_stuck.set(stuck);
        if !stuck {
            let value = self.peek(MACMIIAR) & !MACMIIAR_MB;
            self.store(MACMIIAR, value);
        }
    }

    /// Attach a KS8721 at `addr` with the link down
    pub fn setup_ksz8721(&self, addr: u8) {
        let regs = HashMap::from([
            (phy_reg::BMCR, bmcr::AN_ENABLE),
            (phy_reg::BMSR, KSZ8721_BMSR),
            (phy_reg::PHYIDR1, PHY_ID1),
            (phy_reg::PHYIDR2, PHY_ID2),
            (phy_reg::ANAR, 0x01E1),
            (ksz_reg::PHYCR, phycr::MODE_AUTONEG),
        ]);
        self.phys.borrow_mut().insert(addr, regs);
    }

    /// Change the cable state of the PHY at `addr` and latch its interrupt
    pub fn set_link(&self, addr: u8, link: Option<LinkStatus>) {
        let mut phys = self.phys.borrow_mut();
        let Some(regs) = phys.get_mut(&addr) else {
            return;
        };
        let status = regs.entry(phy_reg::BMSR).or_insert(KSZ8721_BMSR);
        let (mode, flag) = match link {
            Some(mode) => {
                *status |= bmsr::LINK_STATUS | bmsr::AN_COMPLETE;
                (encode_mode(mode) | phycr::AUTONEG_COMPLETE, icsr::LINK_UP)
            }
            None => {
                *status &= !(bmsr::LINK_STATUS | bmsr::AN_COMPLETE);
                (phycr::MODE_AUTONEG, icsr::LINK_DOWN)
            }
        };
        let phycr_val = regs.entry(ksz_reg::PHYCR).or_insert(0);
        *phycr_val = (*phycr_val & !(phycr::MODE_MASK | phycr::AUTONEG_COMPLETE)) | mode;
        *regs.entry(ksz_reg::ICSR).or_insert(0) |= flag;
    }

    /// Current PHY register value, without side effects
    pub fn phy_register(&self, addr: u8, reg: u8) -> u16 {
        match self.phys.borrow().get(&addr) {
            Some(regs) => regs.get(&reg).copied().unwrap_or(0),
            None => 0xFFFF,
        }
    }

    /// Whether the programmed filter would pass a frame sent to `addr`
    pub fn accepts_destination(&self, addr: &[u8; 6]) -> bool {
        let ffr = self.peek(MACFFR);
        if *addr == [0xFF; 6] || ffr & (MACFFR_PM | MACFFR_RA) != 0 {
            return true;
        }
        if addr[0] & 0x01 != 0 && ffr & MACFFR_PAM != 0 {
            return true;
        }
        if join_address(self.peek(MACA0HR), self.peek(MACA0LR)) == *addr {
            return true;
        }
        (1..=MAC_ADDR_FILTER_COUNT).any(|slot| {
            let high = self.peek(maca_high(slot));
            high & MACAHR_AE != 0 && join_address(high, self.peek(maca_low(slot))) == *addr
        })
    }

    fn store(&self, reg: Reg, value: u32) {
        self.registers.borrow_mut().insert(reg, value);
    }

    fn phy_read(&self, addr: u8, reg: u8) -> u16 {
        let mut phys = self.phys.borrow_mut();
        let Some(regs) = phys.get_mut(&addr) else {
            return 0xFFFF;
        };
        let value = regs.get(&reg).copied().unwrap_or(0);
        if reg == ksz_reg::ICSR {
            regs.insert(reg, value & !icsr::FLAGS_MASK);
        }
        value
    }

    fn phy_write(&self, addr: u8, reg: u8, value: u16) {
        let mut phys = self.phys.borrow_mut();
        let Some(regs) = phys.get_mut(&addr) else {
            return;
        };
        let stored = match reg {
            phy_reg::BMCR => value & !(bmcr::RESET | bmcr::AN_RESTART),
            ksz_reg::ICSR => {
                let flags = regs.get(&reg).copied().unwrap_or(0) & icsr::FLAGS_MASK;
                (value & !icsr::FLAGS_MASK) | flags
            }
            _ => value,
        };
        regs.insert(reg, stored);
    }

    fn run_mdio(&self, command: u32) {
        let addr = ((command & MACMIIAR_PA_MASK) >> MACMIIAR_PA_SHIFT) as u8;
        let reg = ((command & MACMIIAR_MR_MASK) >> MACMIIAR_MR_SHIFT) as u8;
        if command & MACMIIAR_MW != 0 {
            self.phy_write(addr, reg, self.peek(MACMIIDR) as u16);
        } else {
            let value = self.phy_read(addr, reg);
            self.store(MACMIIDR, u32::from(value));
        }
        self.store(MACMIIAR, command & !MACMIIAR_MB);
    }
}

impl RegisterBlock for SimulatedMac {
    fn read(&self, reg: Reg) -> u32 {
        self.peek(reg)
    }

    fn write(&self, reg: Reg, value: u32) {
        *self.write_counts.borrow_mut().entry(reg).or_insert(0) += 1;

        if reg == DMASR {
            let current = self.peek(DMASR);
            self.store(DMASR, current & !value);
        } else if reg == DMABMR {
            let stored = if self.reset_stuck.get() { value } else { value & !DMABMR_SR };
            self.store(DMABMR, stored);
        } else if reg == MACMIIAR {
            self.store(MACMIIAR, value);
            if value & MACMIIAR_MB != 0 && !self.mdio_stuck.get() {
                self.run_mdio(value);
            }
        } else {
            self.store(reg, value);
        }
    }
}

// =============================================================================
// Hardware side of the DMA
// =============================================================================

/// Plays the DMA controller against a [`DmaEngine`]'s descriptor rings
///
/// Keeps its own ring cursors, starting at descriptor 0 like the hardware
/// after the list address registers are written.
#[derive(Debug, Default)]
pub struct DmaModel {
    rx_cursor: usize,
    tx_cursor: usize,
}

impl DmaModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive `data` (CRC appended on the wire) into the armed descriptors
    ///
    /// Returns false, touching nothing, if too few descriptors are armed.
    pub fn receive<const RX: usize, const TX: usize, const BUF: usize>(
        &mut self,
        dma: &mut DmaEngine<RX, TX, BUF>,
        data: &[u8],
    ) -> bool {
        self.receive_with_status(dma, data, 0)
    }

    /// Like [`receive`](Self::receive), adding `extra` to the last descriptor's status
    pub fn receive_with_status<const RX: usize, const TX: usize, const BUF: usize>(
        &mut self,
        dma: &mut DmaEngine<RX, TX, BUF>,
        data: &[u8],
        extra: u32,
    ) -> bool {
        let mut wire = data.to_vec();
        wire.extend_from_slice(&[0u8; 4]);
        let chunks: Vec<&[u8]> = wire.chunks(BUF).collect();

        if chunks.len() > RX {
            return false;
        }
        let armed = (0..chunks.len()).all(|k| dma.rx_descriptor((self.rx_cursor + k) % RX).is_owned());
        if !armed {
            return false;
        }

        let last = chunks.len() - 1;
        for (k, chunk) in chunks.iter().enumerate() {
            let idx = (self.rx_cursor + k) % RX;
            if let Some(buffer) = dma.rx_slot_mut(idx) {
                buffer.storage_mut()[..chunk.len()].copy_from_slice(chunk);
            }
            let mut status = 0;
            if k == 0 {
                status |= rdes0::FIRST_DESC;
            }
            if k == last {
                status |= rdes0::LAST_DESC
                    | (((wire.len() as u32) << rdes0::FRAME_LEN_SHIFT) & rdes0::FRAME_LEN_MASK)
                    | extra;
            }
            dma.rx_descriptor(idx).complete(status);
        }
        self.rx_cursor = (self.rx_cursor + chunks.len()) % RX;
        true
    }

    /// Transmit every owned descriptor, returning the frames sent
    pub fn complete_tx<const RX: usize, const TX: usize, const BUF: usize>(
        &mut self,
        dma: &mut DmaEngine<RX, TX, BUF>,
    ) -> Vec<Vec<u8>> {
        self.complete_tx_with(dma, 0)
    }

    /// Like [`complete_tx`](Self::complete_tx), writing `status` back into each descriptor
    pub fn complete_tx_with<const RX: usize, const TX: usize, const BUF: usize>(
        &mut self,
        dma: &mut DmaEngine<RX, TX, BUF>,
        status: u32,
    ) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        let mut current = Vec::new();

        for _ in 0..TX {
            let idx = self.tx_cursor % TX;
            let desc = dma.tx_descriptor(idx);
            if !desc.is_owned() {
                break;
            }
            if let Some(buffer) = dma.tx_slot(idx) {
                current.extend_from_slice(buffer.as_slice());
            }
            let desc = dma.tx_descriptor(idx);
            if desc.is_last() {
                frames.push(core::mem::take(&mut current));
            }
            desc.complete(status);
            self.tx_cursor = (idx + 1) % TX;
        }
        frames
    }
}

// =============================================================================
// Mock MDIO Bus
// =============================================================================

/// Mock MDIO bus for testing PHY drivers without the MAC
///
/// # Example
///
/// ```ignore
/// let mut mdio = MockMdioBus::new();
/// mdio.setup_ksz8721(1);
/// mdio.simulate_link(1, Some(LinkStatus::fast_full()));
///
/// let phy = Ksz8721::new(1);
/// assert!(phy.is_link_up(&mut mdio).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MockMdioBus {
    /// Register values: (phy_addr, reg_addr) -> value
    registers: RefCell<HashMap<(u8, u8), u16>>,
    /// Record of writes: (phy_addr, reg_addr, value)
    write_log: RefCell<Vec<(u8, u8, u16)>>,
    busy: Cell<bool>,
    timeout: Cell<bool>,
    reset_sticky: Cell<bool>,
}

impl MockMdioBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_register(&self, phy_addr: u8, reg_addr: u8, value: u16) {
        self.registers.borrow_mut().insert((phy_addr, reg_addr), value);
    }

    pub fn get_register(&self, phy_addr: u8, reg_addr: u8) -> Option<u16> {
        self.registers.borrow().get(&(phy_addr, reg_addr)).copied()
    }

    /// All writes, as issued
    pub fn get_writes(&self) -> Vec<(u8, u8, u16)> {
        self.write_log.borrow().clone()
    }

    pub fn clear_writes(&self) {
        self.write_log.borrow_mut().clear();
    }

    pub fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
    }

    /// Fail every transaction with [`IoError::Timeout`]
    pub fn set_timeout(&self, timeout: bool) {
        self.timeout.set(timeout);
    }

    /// Keep `BMCR.RESET` set after it is written
    pub fn set_reset_sticky(&self, sticky: bool) {
        self.reset_sticky.set(sticky);
    }

    /// Setup for a KS8721 with the link down
    pub fn setup_ksz8721(&self, phy_addr: u8) {
        self.set_register(phy_addr, phy_reg::PHYIDR1, PHY_ID1);
        self.set_register(phy_addr, phy_reg::PHYIDR2, PHY_ID2);
        self.set_register(phy_addr, phy_reg::BMSR, KSZ8721_BMSR);
        self.set_register(phy_addr, phy_reg::BMCR, bmcr::AN_ENABLE);
        self.set_register(phy_addr, phy_reg::ANAR, 0x01E1);
        self.set_register(phy_addr, phy_reg::ANLPAR, 0x0000);
    }

    /// Bring the link up with `link`'s mode, or down with `None`
    pub fn simulate_link(&self, phy_addr: u8, link: Option<LinkStatus>) {
        let mut status = self.get_register(phy_addr, phy_reg::BMSR).unwrap_or(0);
        let mode = match link {
            Some(mode) => {
                status |= bmsr::LINK_STATUS | bmsr::AN_COMPLETE;
                encode_mode(mode) | phycr::AUTONEG_COMPLETE
            }
            None => {
                status &= !(bmsr::LINK_STATUS | bmsr::AN_COMPLETE);
                phycr::MODE_AUTONEG
            }
        };
        self.set_register(phy_addr, phy_reg::BMSR, status);
        self.set_register(phy_addr, ksz_reg::PHYCR, mode);
    }
}

impl MdioBus for MockMdioBus {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        if self.timeout.get() {
            return Err(IoError::Timeout.into());
        }
        Ok(self.get_register(phy_addr, reg_addr).unwrap_or(0))
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        if self.timeout.get() {
            return Err(IoError::Timeout.into());
        }
        self.write_log.borrow_mut().push((phy_addr, reg_addr, value));

        let stored = if reg_addr == phy_reg::BMCR && !self.reset_sticky.get() {
            value & !bmcr::RESET
        } else {
            value
        };
        self.set_register(phy_addr, reg_addr, stored);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    total_ns: Cell<u64>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        self.total_ns.get()
    }

    /// Total microseconds that were "delayed"
    pub fn total_us(&self) -> u32 {
        (self.total_ns() / 1_000) as u32
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + u64::from(ns));
    }
}

// =============================================================================
// Mock reset pin
// =============================================================================

/// Output pin recording every level it is driven to
#[derive(Debug, Default)]
pub struct MockPin {
    history: Vec<bool>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Levels driven so far, oldest first (`true` = high)
    pub fn history(&self) -> &[bool] {
        &self.history
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> core::result::Result<(), Infallible> {
        self.history.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Infallible> {
        self.history.push(true);
        Ok(())
    }
}

// =============================================================================
// Recording network stack
// =============================================================================

/// Upper layer that records what the driver hands it
#[derive(Debug, Default)]
pub struct RecordingStack {
    /// Accepted frames, in delivery order
    pub frames: Vec<Vec<u8>>,
    /// Fragment count of each accepted frame
    pub fragment_counts: Vec<usize>,
    /// `Some(mode)` for link up, `None` for link down
    pub link_events: Vec<Option<LinkStatus>>,
    /// Refuse every frame
    pub reject: bool,
}

impl RecordingStack {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinkObserver for RecordingStack {
    fn on_link_up(&mut self, status: LinkStatus) {
        self.link_events.push(Some(status));
    }

    fn on_link_down(&mut self) {
        self.link_events.push(None);
    }
}

impl NetStack for RecordingStack {
    fn input<const BUF: usize>(&mut self, frame: &Frame<'_, BUF>) -> core::result::Result<(), Rejected> {
        if self.reject {
            return Err(Rejected);
        }
        let mut data = vec![0u8; frame.len()];
        frame.copy_to(&mut data).map_err(|_| Rejected)?;
        self.frames.push(data);
        self.fragment_counts.push(frame.fragment_count());
        Ok(())
    }
}

// =============================================================================
// Test Assertions
// =============================================================================

/// Assert that a PHY register was written with a specific value
#[macro_export]
macro_rules! assert_reg_written {
    ($mdio:expr, $phy:expr, $reg:expr, $value:expr) => {
        let writes = $mdio.get_writes();
        assert!(
            writes
                .iter()
                .any(|w| w.0 == $phy && w.1 == $reg && w.2 == $value),
            "Expected write to PHY {} reg {} with value 0x{:04X}, but got: {:?}",
            $phy,
            $reg,
            $value,
            writes
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::buffer::BufferPool;
    use crate::internal::register::mac::MACMIIAR_MW;

    #[test]
    fn mock_mdio_read_write() {
        let mut mdio = MockMdioBus::new();

        assert_eq!(mdio.read(0, 1).unwrap(), 0);
        mdio.set_register(0, 1, 0x1234);
        assert_eq!(mdio.read(0, 1).unwrap(), 0x1234);

        mdio.write(0, 1, 0x5678).unwrap();
        assert_eq!(mdio.read(0, 1).unwrap(), 0x5678);
        assert_eq!(mdio.get_writes(), vec![(0, 1, 0x5678)]);
    }

    #[test]
    fn mock_mdio_reset_self_clears_but_is_logged() {
        let mut mdio = MockMdioBus::new();
        mdio.write(1, phy_reg::BMCR, bmcr::RESET | bmcr::AN_ENABLE).unwrap();

        assert_eq!(mdio.get_register(1, phy_reg::BMCR), Some(bmcr::AN_ENABLE));
        assert_reg_written!(mdio, 1, phy_reg::BMCR, bmcr::RESET | bmcr::AN_ENABLE);
    }

    #[test]
    fn mock_delay_tracking() {
        let mut delay = MockDelay::new();

        embedded_hal::delay::DelayNs::delay_ns(&mut delay, 1000);
        embedded_hal::delay::DelayNs::delay_us(&mut delay, 2);

        assert_eq!(delay.total_ns(), 3000);
        assert_eq!(delay.total_us(), 3);
    }

    #[test]
    fn simulated_mdio_transaction() {
        let sim = SimulatedMac::new();
        sim.setup_ksz8721(4);

        sim.write(MACMIIAR, (4 << MACMIIAR_PA_SHIFT) | (2 << MACMIIAR_MR_SHIFT) | MACMIIAR_MB);
        assert_eq!(sim.peek(MACMIIDR), u32::from(PHY_ID1));
        assert_eq!(sim.peek(MACMIIAR) & MACMIIAR_MB, 0);

        sim.write(MACMIIAR, (5 << MACMIIAR_PA_SHIFT) | MACMIIAR_MB);
        assert_eq!(sim.peek(MACMIIDR), 0xFFFF);

        sim.write(MACMIIDR, 0x0100);
        sim.write(MACMIIAR, (4 << MACMIIAR_PA_SHIFT) | MACMIIAR_MW | MACMIIAR_MB);
        assert_eq!(sim.phy_register(4, phy_reg::BMCR), 0x0100);
    }

    #[test]
    fn simulated_interrupt_flags_clear_on_read() {
        let sim = SimulatedMac::new();
        sim.setup_ksz8721(1);
        sim.set_link(1, Some(LinkStatus::fast_full()));

        assert_ne!(sim.phy_read(1, ksz_reg::ICSR) & icsr::LINK_UP, 0);
        assert_eq!(sim.phy_read(1, ksz_reg::ICSR) & icsr::LINK_UP, 0);
        assert_eq!(
            sim.phy_register(1, ksz_reg::PHYCR) & phycr::MODE_MASK,
            phycr::MODE_100FD
        );
    }

    #[test]
    fn dma_model_needs_armed_descriptors() {
        let mut pool: BufferPool<64, 4> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<2, 2, 64> = DmaEngine::new();
        let sim = SimulatedMac::new();
        let mut model = DmaModel::new();

        assert!(!model.receive(&mut dma, &[0u8; 10]));

        dma.init(&mut pool, &sim, 0).unwrap();
        assert!(!model.receive(&mut dma, &[0u8; 200]));
        assert!(model.receive(&mut dma, &[0u8; 100]));
        assert!(!dma.rx_descriptor(0).is_owned());
        assert!(!dma.rx_descriptor(1).is_owned());
    }
}
