//! DMA Controller Register Definitions
//!
//! The Ethernet DMA controller moves frames between the MAC FIFOs and system
//! memory using chained descriptor lists.

use super::{Reg, RegisterBlock, reg_bit_ops, reg_ro, reg_rw};

// =============================================================================
// Registers
// =============================================================================

/// DMA Bus Mode Register
pub const DMABMR: Reg = Reg::dma(0x00);
/// DMA Transmit Poll Demand Register
pub const DMATPDR: Reg = Reg::dma(0x04);
/// DMA Receive Poll Demand Register
pub const DMARPDR: Reg = Reg::dma(0x08);
/// DMA Receive Descriptor List Address Register
pub const DMARDLAR: Reg = Reg::dma(0x0C);
/// DMA Transmit Descriptor List Address Register
pub const DMATDLAR: Reg = Reg::dma(0x10);
/// DMA Status Register
pub const DMASR: Reg = Reg::dma(0x14);
/// DMA Operation Mode Register
pub const DMAOMR: Reg = Reg::dma(0x18);
/// DMA Interrupt Enable Register
pub const DMAIER: Reg = Reg::dma(0x1C);

// =============================================================================
// Bus Mode Register (DMABMR) Bits
// =============================================================================

/// Software Reset - resets all MAC logic, cleared automatically
pub const DMABMR_SR: u32 = 1 << 0;
/// Enhanced Descriptor Format Enable (32-byte descriptors)
pub const DMABMR_EDE: u32 = 1 << 7;
/// Programmable Burst Length shift
pub const DMABMR_PBL_SHIFT: u32 = 8;
/// Programmable Burst Length mask
pub const DMABMR_PBL_MASK: u32 = 0x3F << 8;
/// RX:TX priority ratio 2:1
pub const DMABMR_RTPR_2_1: u32 = 1 << 14;
/// Fixed Burst
pub const DMABMR_FB: u32 = 1 << 16;
/// RX DMA PBL shift
pub const DMABMR_RDP_SHIFT: u32 = 17;
/// RX DMA PBL mask
pub const DMABMR_RDP_MASK: u32 = 0x3F << 17;
/// Use Separate PBL (RDP applies to RX)
pub const DMABMR_USP: u32 = 1 << 23;
/// Address-Aligned Beats
pub const DMABMR_AAB: u32 = 1 << 25;

// =============================================================================
// Status Register (DMASR) Bits, write 1 to clear
// =============================================================================

/// Transmit Status - frame transmission complete
pub const DMASR_TS: u32 = 1 << 0;
/// Transmit Process Stopped
pub const DMASR_TPSS: u32 = 1 << 1;
/// Transmit Buffer Unavailable - TX DMA suspended on a CPU-owned descriptor
pub const DMASR_TBUS: u32 = 1 << 2;
/// Transmit Jabber Timeout
pub const DMASR_TJTS: u32 = 1 << 3;
/// Receive Overflow
pub const DMASR_ROS: u32 = 1 << 4;
/// Transmit Underflow
pub const DMASR_TUS: u32 = 1 << 5;
/// Receive Status - frame received
pub const DMASR_RS: u32 = 1 << 6;
/// Receive Buffer Unavailable - RX DMA suspended on a CPU-owned descriptor
pub const DMASR_RBUS: u32 = 1 << 7;
/// Receive Process Stopped
pub const DMASR_RPSS: u32 = 1 << 8;
/// Receive Watchdog Timeout
pub const DMASR_RWTS: u32 = 1 << 9;
/// Early Transmit Status
pub const DMASR_ETS: u32 = 1 << 10;
/// Fatal Bus Error
pub const DMASR_FBES: u32 = 1 << 13;
/// Early Receive Status
pub const DMASR_ERS: u32 = 1 << 14;
/// Abnormal Interrupt Summary
pub const DMASR_AIS: u32 = 1 << 15;
/// Normal Interrupt Summary
pub const DMASR_NIS: u32 = 1 << 16;

/// All write-1-to-clear status bits
pub const DMASR_CLEAR_ALL: u32 = 0x0001_E7FF;

// =============================================================================
// Operation Mode Register (DMAOMR) Bits
// =============================================================================

/// Start/Stop Receive
pub const DMAOMR_SR: u32 = 1 << 1;
/// Operate on Second Frame
pub const DMAOMR_OSF: u32 = 1 << 2;
/// Start/Stop Transmission
pub const DMAOMR_ST: u32 = 1 << 13;
/// Flush Transmit FIFO
pub const DMAOMR_FTF: u32 = 1 << 20;
/// Transmit Store and Forward
pub const DMAOMR_TSF: u32 = 1 << 21;
/// Receive Store and Forward
pub const DMAOMR_RSF: u32 = 1 << 25;
/// Dropping of TCP/IP Checksum Error Frames Disable
pub const DMAOMR_DTCEFD: u32 = 1 << 26;

// =============================================================================
// Interrupt Enable Register (DMAIER) Bits
// =============================================================================

/// Transmit Interrupt Enable
pub const DMAIER_TIE: u32 = 1 << 0;
/// Receive Interrupt Enable
pub const DMAIER_RIE: u32 = 1 << 6;
/// Receive Buffer Unavailable Interrupt Enable
pub const DMAIER_RBUIE: u32 = 1 << 7;
/// Fatal Bus Error Interrupt Enable
pub const DMAIER_FBEIE: u32 = 1 << 13;
/// Early Receive Interrupt Enable
pub const DMAIER_ERIE: u32 = 1 << 14;
/// Abnormal Interrupt Summary Enable
pub const DMAIER_AISE: u32 = 1 << 15;
/// Normal Interrupt Summary Enable
pub const DMAIER_NISE: u32 = 1 << 16;

// =============================================================================
// Accessors
// =============================================================================

/// Typed view of the DMA register block
pub struct DmaRegs<'a, R: RegisterBlock> {
    regs: &'a R,
}

impl<'a, R: RegisterBlock> DmaRegs<'a, R> {
    /// Wrap a register file
    #[must_use]
    pub const fn new(regs: &'a R) -> Self {
        Self { regs }
    }

    reg_rw!(bus_mode, set_bus_mode, DMABMR, "Bus Mode register");
    reg_rw!(operation_mode, set_operation_mode, DMAOMR, "Operation Mode register");
    reg_rw!(interrupt_enable, set_interrupt_enable, DMAIER, "Interrupt Enable register");
    reg_rw!(rx_desc_list_addr, set_rx_desc_list_addr, DMARDLAR, "RX Descriptor List Address register");
    reg_rw!(tx_desc_list_addr, set_tx_desc_list_addr, DMATDLAR, "TX Descriptor List Address register");
    reg_ro!(status, DMASR, "Status register");

    reg_bit_ops!(start_tx, stop_tx, DMAOMR, DMAOMR_ST, "TX DMA", "Start", "Stop");
    reg_bit_ops!(start_rx, stop_rx, DMAOMR, DMAOMR_SR, "RX DMA", "Start", "Stop");

    /// Clear status bits (write-1-to-clear)
    #[inline(always)]
    pub fn clear_status(&self, bits: u32) {
        self.regs.write(DMASR, bits);
    }

    /// Issue a TX poll demand
    #[inline(always)]
    pub fn tx_poll_demand(&self) {
        self.regs.write(DMATPDR, 0);
    }

    /// Issue an RX poll demand
    #[inline(always)]
    pub fn rx_poll_demand(&self) {
        self.regs.write(DMARPDR, 0);
    }

    /// Request a software reset of the MAC and DMA
    pub fn start_soft_reset(&self) {
        self.regs.set_bits(DMABMR, DMABMR_SR);
    }

    /// True while the software reset is still in progress
    #[inline(always)]
    pub fn is_reset_pending(&self) -> bool {
        (self.bus_mode() & DMABMR_SR) != 0
    }

    /// Flush the TX FIFO
    pub fn flush_tx_fifo(&self) {
        self.regs.set_bits(DMAOMR, DMAOMR_FTF);
    }

    /// Wake a TX DMA suspended on an unavailable descriptor
    ///
    /// Returns `true` if the DMA was suspended and a poll demand was issued.
    pub fn resume_tx_if_suspended(&self) -> bool {
        if self.status() & DMASR_TBUS == 0 {
            return false;
        }
        self.clear_status(DMASR_TBUS);
        self.tx_poll_demand();
        true
    }

    /// Wake an RX DMA suspended on an unavailable descriptor
    ///
    /// Returns `true` if the DMA was suspended and a poll demand was issued.
    pub fn resume_rx_if_suspended(&self) -> bool {
        if self.status() & DMASR_RBUS == 0 {
            return false;
        }
        self.clear_status(DMASR_RBUS);
        self.rx_poll_demand();
        true
    }
}
