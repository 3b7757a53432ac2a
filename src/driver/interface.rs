//! The network interface.
//!
//! [`NetInterface`] owns everything the peripheral needs: the register file,
//! the MDIO controller and PHY driver, both descriptor rings, the buffer
//! pool and the multicast filter table. It is created once by the
//! application and driven from a single cooperative context through
//! [`NetInterface::poll`] (or [`NetInterface::maintain`] for stacks that pull
//! frames themselves). Interrupt handlers only talk to the
//! [`EventFlags`] mailbox through an [`InterruptHandle`].
//!
//! # Example
//!
//! ```ignore
//! use ph_stm32_eth::{EventFlags, Ksz8721, Mmio, NetConfig, NetInterfaceDefault};
//!
//! static EVENTS: EventFlags = EventFlags::new();
//! static mut STORAGE: [[u8; 1536]; 32] = [[0; 1536]; 32];
//!
//! let regs = unsafe { Mmio::stm32f2x7() };
//! let config = NetConfig::new()
//!     .with_mac_address(unsafe { read_factory_mac_address() })
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
//! // The rings are handed to the DMA by address: do not move `iface` after init
//! iface.init()?;
//!
//! loop {
//!     if !iface.poll(&mut stack) {
//!         cortex_m::asm::wfi();
//!     }
//! }
//! ```

use embedded_hal::delay::DelayNs;

use crate::driver::buffer::{Buffer, BufferPool};
use crate::driver::config::{NetConfig, PhyAddress, State};
use crate::driver::delivery::{Frame, LinkObserver, NetStack, Rejected};
use crate::driver::error::{ConfigError, DmaError, Error, IoError, Result};
use crate::driver::filtering::{FilterOutcome, MulticastFilter, multicast_mac_for_ipv4};
use crate::driver::interrupt::{EventFlags, InterruptHandle};
use crate::driver::link::{LinkMonitor, LinkState, LinkTransition};
use crate::hal::mdio::MdioController;
use crate::internal::constants::{
    CRC_SIZE, DEFAULT_BUFFER_SIZE, DEFAULT_POOL_SIZE, DEFAULT_RX_DESCRIPTORS,
    DEFAULT_TX_DESCRIPTORS, MAX_FRAME_SIZE, MTU,
};
use crate::internal::dma::{DmaEngine, DmaStats};
use crate::internal::register::RegisterBlock;
use crate::internal::register::dma::{
    DMABMR_AAB, DMABMR_EDE, DMABMR_FB, DMABMR_PBL_SHIFT, DMABMR_RDP_SHIFT, DMABMR_RTPR_2_1,
    DMABMR_USP, DMAIER_ERIE, DMAIER_NISE, DMAIER_RIE, DMAOMR, DMAOMR_DTCEFD, DMAOMR_OSF,
    DMAOMR_RSF, DMAOMR_SR, DMAOMR_ST, DMAOMR_TSF, DmaRegs,
};
use crate::internal::register::mac::{
    MACCR, MACCR_DM, MACCR_FES, MACCR_IPCO, MACCR_ROD, MACFCR, MACFFR, MacRegs,
};
use crate::phy::{LinkStatus, PhyDriver, default_scan_order, scan};

/// Link servicing failed; the event is retried on the next call.
#[allow(unused_variables)]
fn log_link_error(err: Error) {
    #[cfg(feature = "defmt")]
    defmt::warn!("link service failed: {}", err);
    #[cfg(feature = "log")]
    log::warn!("link service failed: {err}");
}

/// Outcome of a successful transmit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxQueued {
    /// Descriptors the frame occupies
    pub fragments: usize,
}

/// Interface counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    /// Ring engine counters
    pub dma: DmaStats,
    /// Link servicing attempts that failed on the management bus
    pub mdio_errors: u32,
}

/// Ethernet network interface
///
/// # Type Parameters
/// * `R` - Register file ([`Mmio`](crate::Mmio) on hardware)
/// * `D` - Delay provider for MDIO busy-waits
/// * `P` - PHY driver
/// * `RX` - Number of receive descriptors
/// * `TX` - Number of transmit descriptors
/// * `BUF` - Size of each buffer in bytes
/// * `POOL` - Number of buffers in the pool
pub struct NetInterface<
    R,
    D,
    P,
    const RX: usize,
    const TX: usize,
    const BUF: usize,
    const POOL: usize,
> where
    R: RegisterBlock + Copy,
    D: DelayNs,
    P: PhyDriver,
{
    regs: R,
    mdio: MdioController<R, D>,
    phy: P,
    events: &'static EventFlags,
    config: NetConfig,
    dma: DmaEngine<RX, TX, BUF>,
    pool: BufferPool<BUF, POOL>,
    filter: MulticastFilter,
    link: LinkMonitor,
    state: State,
    mdio_errors: u32,
}

/// Interface with the reference sizing: 5 RX and 20 TX descriptors, 32
/// buffers of 1536 bytes.
pub type NetInterfaceDefault<R, D, P> = NetInterface<
    R,
    D,
    P,
    DEFAULT_RX_DESCRIPTORS,
    DEFAULT_TX_DESCRIPTORS,
    DEFAULT_BUFFER_SIZE,
    DEFAULT_POOL_SIZE,
>;

impl<R, D, P, const RX: usize, const TX: usize, const BUF: usize, const POOL: usize>
    NetInterface<R, D, P, RX, TX, BUF, POOL>
where
    R: RegisterBlock + Copy,
    D: DelayNs,
    P: PhyDriver,
{
    /// Create an uninitialized interface. No register is touched.
    pub fn new(
        regs: R,
        delay: D,
        phy: P,
        storage: &'static mut [[u8; BUF]; POOL],
        events: &'static EventFlags,
        config: NetConfig,
    ) -> Self {
        let mut mdio = MdioController::with_clock_divider(regs, delay, config.mdc_divider);
        mdio.set_timeout_us(config.mdio_timeout_us);

        Self {
            regs,
            mdio,
            phy,
            events,
            config,
            dma: DmaEngine::new(),
            pool: BufferPool::new(storage),
            filter: MulticastFilter::new(),
            link: LinkMonitor::new(),
            state: State::Uninitialized,
            mdio_errors: 0,
        }
    }

    /// Bring up the MAC, DMA and PHY.
    ///
    /// The link is not waited for: init marks a link change pending so the
    /// first service-loop run reports the current state.
    ///
    /// The interface must not move after this call.
    pub fn init(&mut self) -> Result<()> {
        self.config.validate()?;
        if self.state != State::Uninitialized {
            return Err(ConfigError::AlreadyInitialized.into());
        }

        // === STEP 1: DMA/MAC soft reset ===
        self.soft_reset()?;

        // === STEP 2: Locate the PHY ===
        self.locate_phy()?;

        // === STEP 3: MAC and DMA operating modes ===
        self.configure_mac();
        self.configure_dma();

        // === STEP 4: Station address and filters ===
        let mac = MacRegs::new(&self.regs);
        mac.set_mac_address(&self.config.mac_address);
        self.filter.reset(&mac);

        // === STEP 5: Descriptor rings ===
        self.dma
            .init(&mut self.pool, &self.regs, self.config.tx_checksum.to_cic())?;

        // === STEP 6: PHY auto-negotiation and link interrupt ===
        if let Err(err) = self.phy.init(&mut self.mdio) {
            self.dma.release_all(&mut self.pool);
            return Err(err);
        }

        // === STEP 7: Start ===
        self.start();

        self.link.reset();
        self.events.raise(EventFlags::LINK_CHANGE);
        self.state = State::Running;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "ETH up: phy={=u8} rx={=usize} tx={=usize} pool={=usize}",
            self.phy.address(),
            RX,
            TX,
            POOL
        );
        #[cfg(feature = "log")]
        log::info!(
            "ETH up: phy={} rx={} tx={} pool={}",
            self.phy.address(),
            RX,
            TX,
            POOL
        );

        Ok(())
    }

    /// Reset the MAC and DMA, waiting a bounded number of polls
    fn soft_reset(&self) -> Result<()> {
        let dma = DmaRegs::new(&self.regs);
        dma.start_soft_reset();

        for _ in 0..self.config.reset_spins {
            if !dma.is_reset_pending() {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        if dma.is_reset_pending() {
            #[cfg(feature = "defmt")]
            defmt::warn!("ETH soft reset did not complete");
            #[cfg(feature = "log")]
            log::warn!("ETH soft reset did not complete");
            return Err(ConfigError::ResetFailed.into());
        }
        Ok(())
    }

    fn locate_phy(&mut self) -> Result<()> {
        let addr = match self.config.phy_address {
            PhyAddress::Fixed(addr) => addr,
            PhyAddress::Scan => scan(&mut self.mdio, default_scan_order(), P::IDENTIFIER)?,
        };
        self.phy.set_address(addr);
        Ok(())
    }

    fn configure_mac(&self) {
        let mut maccr = MACCR_FES | MACCR_ROD | MACCR_DM;
        if self.config.rx_checksum {
            maccr |= MACCR_IPCO;
        }
        self.regs.set_bits(MACCR, maccr);
        self.regs.write(MACFFR, 0);
        self.regs.write(MACFCR, 0);
    }

    fn configure_dma(&self) {
        let dma = DmaRegs::new(&self.regs);
        dma.set_operation_mode(DMAOMR_DTCEFD | DMAOMR_RSF | DMAOMR_TSF | DMAOMR_OSF);

        let pbl = self.config.dma_burst_len.to_pbl();
        dma.set_bus_mode(
            DMABMR_AAB
                | DMABMR_FB
                | DMABMR_RTPR_2_1
                | (pbl << DMABMR_RDP_SHIFT)
                | (pbl << DMABMR_PBL_SHIFT)
                | DMABMR_USP
                | DMABMR_EDE,
        );
    }

    fn start(&self) {
        let mac = MacRegs::new(&self.regs);
        mac.enable_tx();
        mac.enable_rx();

        let dma = DmaRegs::new(&self.regs);
        dma.flush_tx_fifo();
        self.regs.set_bits(DMAOMR, DMAOMR_ST | DMAOMR_SR);
        dma.set_interrupt_enable(DMAIER_ERIE | DMAIER_RIE | DMAIER_NISE);
    }

    // =========================================================================
    // Transmit
    // =========================================================================

    /// Queue a frame made of pool buffers, first to last.
    ///
    /// The buffers belong to the driver from here on; on error they are
    /// already back in the pool.
    pub fn transmit<I>(&mut self, fragments: I) -> Result<TxQueued>
    where
        I: IntoIterator<Item = Buffer<BUF>>,
    {
        if self.state != State::Running {
            for buffer in fragments {
                self.pool.release(buffer);
            }
            return Err(IoError::InvalidState.into());
        }

        let fragments = self.dma.transmit(
            fragments,
            &mut self.pool,
            &self.regs,
            self.config.tx_wait_spins,
        )?;
        Ok(TxQueued { fragments })
    }

    /// Copy `frame` (without CRC) into pool buffers and transmit it
    pub fn send(&mut self, frame: &[u8]) -> Result<TxQueued> {
        if self.state != State::Running {
            return Err(IoError::InvalidState.into());
        }
        if frame.is_empty() {
            return Err(DmaError::InvalidLength.into());
        }
        if frame.len() > MAX_FRAME_SIZE - CRC_SIZE {
            return Err(DmaError::FrameTooLarge.into());
        }

        let needed = frame.len().div_ceil(BUF);
        if needed > TX {
            return Err(DmaError::RingTimeout.into());
        }
        if self.pool.available() < needed {
            return Err(DmaError::PoolExhausted.into());
        }

        let mut parts: [Option<Buffer<BUF>>; TX] = [const { None }; TX];
        for (slot, chunk) in parts.iter_mut().zip(frame.chunks(BUF)) {
            let Some(mut buffer) = self.pool.alloc() else {
                break;
            };
            // Chunks never exceed the buffer size
            let _ = buffer.copy_from(chunk);
            *slot = Some(buffer);
        }

        self.transmit(parts.into_iter().flatten())
    }

    /// Take a buffer from the pool, e.g. to build a frame in place
    pub fn alloc_buffer(&mut self) -> Option<Buffer<BUF>> {
        self.pool.alloc()
    }

    /// Return a buffer obtained from [`alloc_buffer`](Self::alloc_buffer)
    pub fn release_buffer(&mut self, buffer: Buffer<BUF>) {
        self.pool.release(buffer);
    }

    /// Release the buffers of transmitted descriptors
    pub fn recycle_tx(&mut self) -> usize {
        self.dma.recycle_tx(&mut self.pool)
    }

    // =========================================================================
    // Receive
    // =========================================================================

    /// Hand every completed frame to `deliver`, at most `RX` descriptors' worth.
    ///
    /// Returns `true` if any frame was delivered.
    pub fn poll_receive<F>(&mut self, deliver: F) -> bool
    where
        F: FnMut(&Frame<'_, BUF>) -> core::result::Result<(), Rejected>,
    {
        if self.state != State::Running {
            return false;
        }
        self.events.take(EventFlags::RX_WAKE);
        self.dma
            .receive(&mut self.pool, self.config.rx_validation, RX, deliver)
            > 0
    }

    /// Copy the next good frame into `out`.
    ///
    /// Frames that do not fit are rejected and skipped. Returns `None` when
    /// no frame is waiting.
    pub fn receive_into(&mut self, out: &mut [u8]) -> Option<usize> {
        if self.state != State::Running {
            return None;
        }
        self.events.take(EventFlags::RX_WAKE);

        let mut copied = None;
        for _ in 0..RX {
            let before = self.dma.stats();
            let delivered = self.dma.receive(
                &mut self.pool,
                self.config.rx_validation,
                1,
                |frame| match frame.copy_to(out) {
                    Ok(len) => {
                        copied = Some(len);
                        Ok(())
                    }
                    Err(_) => Err(Rejected),
                },
            );
            if copied.is_some() || (delivered == 0 && self.dma.stats() == before) {
                break;
            }
        }

        if copied.is_some() {
            self.replenish_rx();
        }
        copied
    }

    /// Re-arm RX descriptors that lost their buffer
    pub fn replenish_rx(&mut self) -> usize {
        self.dma.replenish(&mut self.pool, &self.regs)
    }

    // =========================================================================
    // Service loop
    // =========================================================================

    /// One unit of work: link events, receive into `stack`, recycle TX
    /// buffers, refill the RX ring.
    ///
    /// Returns `true` if anything was done. Never sleeps; the only waits are
    /// the bounded MDIO polls of a link event.
    pub fn poll<S: NetStack>(&mut self, stack: &mut S) -> bool {
        if self.state != State::Running {
            return false;
        }

        let mut did_work = self.service_link(stack);
        did_work |= self.poll_receive(|frame| stack.input(frame));
        did_work |= self.recycle_tx() > 0;
        did_work |= self.replenish_rx() > 0;
        did_work
    }

    /// [`poll`](Self::poll) without the receive step
    pub fn maintain<O: LinkObserver>(&mut self, observer: &mut O) -> bool {
        if self.state != State::Running {
            return false;
        }

        let mut did_work = self.service_link(observer);
        did_work |= self.recycle_tx() > 0;
        did_work |= self.replenish_rx() > 0;
        did_work
    }

    /// Handle a pending link change.
    ///
    /// On an MDIO failure the event stays pending for the next call.
    pub fn service_link<O: LinkObserver>(&mut self, observer: &mut O) -> bool {
        if self.state != State::Running || !self.events.take(EventFlags::LINK_CHANGE) {
            return false;
        }

        let link = match self.read_link() {
            Ok(link) => link,
            Err(err) => {
                self.events.raise(EventFlags::LINK_CHANGE);
                self.mdio_errors = self.mdio_errors.wrapping_add(1);
                log_link_error(err);
                return false;
            }
        };

        match self.link.observe(link) {
            Some(LinkTransition::Up(status)) => {
                MacRegs::new(&self.regs)
                    .set_speed_duplex(status.is_fast(), status.is_full_duplex());
                #[cfg(feature = "defmt")]
                defmt::info!("link up: {}", status);
                #[cfg(feature = "log")]
                log::info!("link up: {status:?}");
                observer.on_link_up(status);
            }
            Some(LinkTransition::Down) => {
                #[cfg(feature = "defmt")]
                defmt::info!("link down");
                #[cfg(feature = "log")]
                log::info!("link down");
                observer.on_link_down();
            }
            None => {}
        }
        true
    }

    fn read_link(&mut self) -> Result<Option<LinkStatus>> {
        self.phy.acknowledge_interrupt(&mut self.mdio)?;
        if !self.phy.is_link_up(&mut self.mdio)? {
            return Ok(None);
        }

        match self.phy.negotiated_mode(&mut self.mdio)? {
            Some(status) => Ok(Some(status)),
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("PHY reports no operating mode, assuming 10/half");
                #[cfg(feature = "log")]
                log::warn!("PHY reports no operating mode, assuming 10/half");
                Ok(Some(LinkStatus::slow_half()))
            }
        }
    }

    /// Events are waiting for the service loop
    pub fn has_pending_events(&self) -> bool {
        self.events.pending() != 0
    }

    /// Handle for the MAC and PHY interrupt handlers
    pub fn interrupt_handle(&self) -> InterruptHandle<R> {
        InterruptHandle::new(self.regs, self.events)
    }

    // =========================================================================
    // Multicast
    // =========================================================================

    /// Receive frames addressed to a multicast `addr`
    pub fn add_multicast_filter(&mut self, addr: &[u8; 6]) -> Result<FilterOutcome> {
        if addr[0] & 0x01 == 0 {
            return Err(ConfigError::InvalidConfig.into());
        }
        Ok(self.filter.add(&MacRegs::new(&self.regs), addr))
    }

    /// Stop receiving a multicast `addr` through its filter slot
    ///
    /// Returns `false` if no slot held the address.
    pub fn remove_multicast_filter(&mut self, addr: &[u8; 6]) -> bool {
        self.filter.remove(&MacRegs::new(&self.regs), addr)
    }

    /// Join an IPv4 multicast group at the Ethernet layer
    pub fn add_ipv4_multicast(&mut self, group: [u8; 4]) -> Result<FilterOutcome> {
        self.add_multicast_filter(&multicast_mac_for_ipv4(group))
    }

    /// Leave an IPv4 multicast group at the Ethernet layer
    pub fn remove_ipv4_multicast(&mut self, group: [u8; 4]) -> bool {
        self.remove_multicast_filter(&multicast_mac_for_ipv4(group))
    }

    /// Filter table state
    pub fn multicast_filter(&self) -> &MulticastFilter {
        &self.filter
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Station MAC address
    #[inline(always)]
    pub fn mac_address(&self) -> &[u8; 6] {
        &self.config.mac_address
    }

    /// IP MTU
    #[inline(always)]
    pub const fn mtu(&self) -> usize {
        MTU
    }

    /// Last observed link state
    #[inline(always)]
    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Counters
    pub fn stats(&self) -> Stats {
        Stats {
            dma: self.dma.stats(),
            mdio_errors: self.mdio_errors,
        }
    }

    /// Driver state
    #[inline(always)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Active configuration
    #[inline(always)]
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// PHY driver
    pub fn phy(&self) -> &P {
        &self.phy
    }

    /// PHY driver and the management bus, for vendor register access
    pub fn phy_and_mdio(&mut self) -> (&mut P, &mut MdioController<R, D>) {
        (&mut self.phy, &mut self.mdio)
    }

    /// Free TX descriptors
    pub fn tx_available(&self) -> usize {
        self.dma.tx_available()
    }

    /// Free pool buffers
    pub fn buffers_available(&self) -> usize {
        self.pool.available()
    }

    #[cfg(test)]
    pub(crate) fn dma_mut(&mut self) -> &mut DmaEngine<RX, TX, BUF> {
        &mut self.dma
    }
}
