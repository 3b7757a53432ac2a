//! Interrupt-side plumbing.
//!
//! Interrupt handlers never touch the rings. They acknowledge the DMA status
//! bits and leave a note in an [`EventFlags`] mailbox; the service loop picks
//! the notes up on its next run.
//!
//! ```ignore
//! static EVENTS: EventFlags = EventFlags::new();
//!
//! #[interrupt]
//! fn ETH() {
//!     // SAFETY: register file shared read-only with the driver
//!     let handle = InterruptHandle::new(unsafe { Mmio::stm32f2x7() }, &EVENTS);
//!     handle.on_mac_interrupt();
//! }
//!
//! #[interrupt]
//! fn EXTI15_10() {
//!     // PHY interrupt line
//!     PHY_HANDLE.on_phy_interrupt();
//! }
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use crate::internal::register::RegisterBlock;
use crate::internal::register::dma::{
    DMASR_AIS, DMASR_ERS, DMASR_FBES, DMASR_NIS, DMASR_ROS, DMASR_RBUS, DMASR_RPSS, DMASR_RS,
    DMASR_TBUS, DMASR_TPSS, DMASR_TS, DMASR_TUS, DmaRegs,
};

// =============================================================================
// Interrupt Status
// =============================================================================

/// Interrupt status flags parsed from the DMA status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// TX complete - frame transmitted
    pub tx_complete: bool,
    /// TX process stopped
    pub tx_stopped: bool,
    /// TX buffer unavailable - DMA suspended on a CPU-owned descriptor
    pub tx_buf_unavailable: bool,
    /// TX underflow
    pub tx_underflow: bool,
    /// RX complete - frame received
    pub rx_complete: bool,
    /// Early receive - first buffer of a frame filled
    pub early_rx: bool,
    /// RX process stopped
    pub rx_stopped: bool,
    /// RX buffer unavailable - DMA suspended on a CPU-owned descriptor
    pub rx_buf_unavailable: bool,
    /// RX FIFO overflow
    pub rx_overflow: bool,
    /// Fatal bus error
    pub fatal_bus_error: bool,
    /// Normal interrupt summary
    pub normal_summary: bool,
    /// Abnormal interrupt summary
    pub abnormal_summary: bool,
}

impl InterruptStatus {
    /// Create from raw DMA status register value
    #[inline]
    pub fn from_raw(status: u32) -> Self {
        Self {
            tx_complete: (status & DMASR_TS) != 0,
            tx_stopped: (status & DMASR_TPSS) != 0,
            tx_buf_unavailable: (status & DMASR_TBUS) != 0,
            tx_underflow: (status & DMASR_TUS) != 0,
            rx_complete: (status & DMASR_RS) != 0,
            early_rx: (status & DMASR_ERS) != 0,
            rx_stopped: (status & DMASR_RPSS) != 0,
            rx_buf_unavailable: (status & DMASR_RBUS) != 0,
            rx_overflow: (status & DMASR_ROS) != 0,
            fatal_bus_error: (status & DMASR_FBES) != 0,
            normal_summary: (status & DMASR_NIS) != 0,
            abnormal_summary: (status & DMASR_AIS) != 0,
        }
    }

    /// Convert to raw value for clearing (write-1-to-clear)
    #[inline]
    pub fn to_raw(&self) -> u32 {
        [
            (self.tx_complete, DMASR_TS),
            (self.tx_stopped, DMASR_TPSS),
            (self.tx_buf_unavailable, DMASR_TBUS),
            (self.tx_underflow, DMASR_TUS),
            (self.rx_complete, DMASR_RS),
            (self.early_rx, DMASR_ERS),
            (self.rx_stopped, DMASR_RPSS),
            (self.rx_buf_unavailable, DMASR_RBUS),
            (self.rx_overflow, DMASR_ROS),
            (self.fatal_bus_error, DMASR_FBES),
            (self.normal_summary, DMASR_NIS),
            (self.abnormal_summary, DMASR_AIS),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .fold(0, |acc, (_, bit)| acc | bit)
    }

    /// Receive activity that should wake the service loop
    #[inline]
    pub fn has_rx_activity(&self) -> bool {
        self.rx_complete || self.early_rx
    }

    /// Check if any error occurred
    #[inline]
    pub fn has_error(&self) -> bool {
        self.tx_underflow || self.rx_overflow || self.fatal_bus_error
    }
}

// =============================================================================
// Event mailbox
// =============================================================================

/// Pending-event mailbox shared between interrupt handlers and the driver
///
/// Lives in a `static`; every operation is a single atomic RMW.
#[derive(Debug)]
pub struct EventFlags(AtomicU32);

impl EventFlags {
    /// PHY reported a link change
    pub const LINK_CHANGE: u32 = 1 << 0;
    /// Receive activity
    pub const RX_WAKE: u32 = 1 << 1;

    /// Empty mailbox
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Mark the events in `mask` pending
    #[inline]
    pub fn raise(&self, mask: u32) {
        self.0.fetch_or(mask, Ordering::Release);
    }

    /// Clear the events in `mask`, returning whether any was pending
    #[inline]
    pub fn take(&self, mask: u32) -> bool {
        self.0.fetch_and(!mask, Ordering::Acquire) & mask != 0
    }

    /// Check without clearing
    #[inline]
    pub fn is_pending(&self, mask: u32) -> bool {
        self.0.load(Ordering::Acquire) & mask != 0
    }

    /// Raw pending bits
    #[inline]
    pub fn pending(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Interrupt handle
// =============================================================================

/// What an interrupt handler needs: register access and the mailbox
#[derive(Debug, Clone, Copy)]
pub struct InterruptHandle<R: RegisterBlock> {
    regs: R,
    events: &'static EventFlags,
}

impl<R: RegisterBlock> InterruptHandle<R> {
    /// Create a handle
    pub const fn new(regs: R, events: &'static EventFlags) -> Self {
        Self { regs, events }
    }

    /// MAC/DMA interrupt: acknowledge receive status and wake the service loop
    ///
    /// Only `RS`, `ERS` and `NIS` are cleared; other status bits are left
    /// for the driver (`TBUS`/`RBUS` drive the poll-demand logic).
    pub fn on_mac_interrupt(&self) -> InterruptStatus {
        let dma = DmaRegs::new(&self.regs);
        let status = InterruptStatus::from_raw(dma.status());

        let ack = InterruptStatus {
            rx_complete: status.rx_complete,
            early_rx: status.early_rx,
            normal_summary: status.normal_summary,
            ..InterruptStatus::default()
        }
        .to_raw();
        if ack != 0 {
            dma.clear_status(ack);
        }

        if status.has_rx_activity() {
            self.events.raise(EventFlags::RX_WAKE);
        }
        status
    }

    /// PHY interrupt line: defer the MDIO work to the service loop
    pub fn on_phy_interrupt(&self) {
        self.events.raise(EventFlags::LINK_CHANGE);
    }

    /// Mailbox this handle reports into
    pub fn events(&self) -> &'static EventFlags {
        self.events
    }
}
