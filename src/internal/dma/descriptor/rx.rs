//! RX DMA descriptor for frame reception.

use core::sync::atomic::{Ordering, fence};

use super::bits::{rdes0, rdes1};
use super::{VolatileCell, bus_addr};

/// RX DMA descriptor (enhanced format, 32 bytes).
#[repr(C)]
#[repr(align(4))]
pub struct RxDescriptor {
    /// RDES0: Status bits
    rdes0: VolatileCell<u32>,
    /// RDES1: Control and buffer size
    rdes1: VolatileCell<u32>,
    /// RDES2: Buffer 1 address
    buffer1_addr: VolatileCell<u32>,
    /// RDES3: Next descriptor address (chained mode)
    next_desc: VolatileCell<u32>,
    /// RDES4: Extended status
    _extended_status: VolatileCell<u32>,
    /// Reserved
    _reserved: u32,
    /// RDES6: Timestamp low
    _timestamp_low: VolatileCell<u32>,
    /// RDES7: Timestamp high
    _timestamp_high: VolatileCell<u32>,
}

impl RxDescriptor {
    /// Size of the descriptor in bytes
    pub const SIZE: usize = 32;

    /// Create a new zeroed descriptor. Call `setup_chained()` before use.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rdes0: VolatileCell::new(0),
            rdes1: VolatileCell::new(0),
            buffer1_addr: VolatileCell::new(0),
            next_desc: VolatileCell::new(0),
            _extended_status: VolatileCell::new(0),
            _reserved: 0,
            _timestamp_low: VolatileCell::new(0),
            _timestamp_high: VolatileCell::new(0),
        }
    }

    /// Configure descriptor in chained mode, CPU-owned and without a buffer.
    pub fn setup_chained(&self, buffer_size: usize, next_desc: *const RxDescriptor) {
        self.rdes0.set(0);
        self.buffer1_addr.set(0);
        self.next_desc.set(bus_addr(next_desc));
        self.rdes1
            .set(rdes1::SECOND_ADDR_CHAINED | ((buffer_size as u32) & rdes1::BUFFER1_SIZE_MASK));
    }

    /// Attach an empty buffer and hand the descriptor to the DMA.
    pub fn arm(&self, buffer: *mut u8) {
        self.buffer1_addr.set(bus_addr(buffer));
        fence(Ordering::Release);
        self.rdes0.set(rdes0::OWN);
    }

    /// Forget the buffer after the CPU has taken it back.
    pub fn detach(&self) {
        self.buffer1_addr.set(0);
        self.rdes0.set(0);
    }

    /// Returns true if DMA owns this descriptor.
    #[inline(always)]
    #[must_use]
    pub fn is_owned(&self) -> bool {
        (self.rdes0.get() & rdes0::OWN) != 0
    }

    /// First descriptor of a frame.
    #[inline(always)]
    #[must_use]
    pub fn is_first(&self) -> bool {
        (self.rdes0.get() & rdes0::FIRST_DESC) != 0
    }

    /// Last descriptor of a frame.
    #[inline(always)]
    #[must_use]
    pub fn is_last(&self) -> bool {
        (self.rdes0.get() & rdes0::LAST_DESC) != 0
    }

    /// Returns true if error summary bit is set.
    #[inline(always)]
    #[must_use]
    pub fn has_error(&self) -> bool {
        (self.rdes0.get() & rdes0::ERR_SUMMARY) != 0
    }

    /// Raw error flags from RDES0.
    #[inline(always)]
    #[must_use]
    pub fn error_flags(&self) -> u32 {
        self.rdes0.get() & rdes0::ALL_ERRORS
    }

    /// Cumulative frame length including CRC (valid on last descriptor).
    #[inline(always)]
    #[must_use]
    pub fn frame_length(&self) -> usize {
        ((self.rdes0.get() & rdes0::FRAME_LEN_MASK) >> rdes0::FRAME_LEN_SHIFT) as usize
    }

    /// Raw RDES0 status word.
    #[inline(always)]
    #[must_use]
    pub fn status(&self) -> u32 {
        self.rdes0.get()
    }

    /// Configured buffer size.
    #[inline(always)]
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        (self.rdes1.get() & rdes1::BUFFER1_SIZE_MASK) as usize
    }

    /// Buffer address (RDES2).
    #[inline(always)]
    #[must_use]
    pub fn buffer_addr(&self) -> u32 {
        self.buffer1_addr.get()
    }

    /// Next descriptor address (RDES3, chained mode).
    #[inline(always)]
    #[must_use]
    pub fn next_desc_addr(&self) -> u32 {
        self.next_desc.get()
    }

    /// Hardware write-back: replace the status word, which clears OWN.
    #[cfg(test)]
    pub(crate) fn complete(&self, status: u32) {
        self.rdes0.set(status & !rdes0::OWN);
    }
}

impl Default for RxDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

// Safety: RxDescriptor uses volatile cells for all DMA-accessed fields
unsafe impl Sync for RxDescriptor {}
unsafe impl Send for RxDescriptor {}
