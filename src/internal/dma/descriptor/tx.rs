//! TX DMA descriptor for frame transmission.

use super::bits::{tdes0, tdes1};
use super::{VolatileCell, bus_addr};

/// TX DMA descriptor (enhanced format, 32 bytes).
#[repr(C)]
#[repr(align(4))]
pub struct TxDescriptor {
    /// TDES0: Status and control bits
    tdes0: VolatileCell<u32>,
    /// TDES1: Buffer sizes
    tdes1: VolatileCell<u32>,
    /// TDES2: Buffer 1 address
    buffer1_addr: VolatileCell<u32>,
    /// TDES3: Next descriptor address (chained mode)
    next_desc: VolatileCell<u32>,
    /// Reserved
    _reserved1: u32,
    /// Reserved
    _reserved2: u32,
    /// Timestamp low (when timestamping enabled)
    _timestamp_low: VolatileCell<u32>,
    /// Timestamp high (when timestamping enabled)
    _timestamp_high: VolatileCell<u32>,
}

impl TxDescriptor {
    /// Size of the descriptor in bytes
    pub const SIZE: usize = 32;

    /// Create a new zeroed TX descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tdes0: VolatileCell::new(0),
            tdes1: VolatileCell::new(0),
            buffer1_addr: VolatileCell::new(0),
            next_desc: VolatileCell::new(0),
            _reserved1: 0,
            _reserved2: 0,
            _timestamp_low: VolatileCell::new(0),
            _timestamp_high: VolatileCell::new(0),
        }
    }

    /// Initialize descriptor for chained mode, CPU-owned and without a buffer.
    pub fn setup_chained(&self, next_desc: *const TxDescriptor, checksum_mode: u32) {
        self.buffer1_addr.set(0);
        self.next_desc.set(bus_addr(next_desc));
        self.tdes1.set(0);
        self.tdes0.set(tdes0::SECOND_ADDR_CHAINED);
        self.set_checksum_mode(checksum_mode);
    }

    /// Check if descriptor is owned by DMA.
    #[inline(always)]
    #[must_use]
    pub fn is_owned(&self) -> bool {
        (self.tdes0.get() & tdes0::OWN) != 0
    }

    /// Give ownership to DMA for transmission.
    #[inline(always)]
    pub fn set_owned(&self) {
        self.tdes0.update(|v| v | tdes0::OWN);
    }

    /// Attach one fragment of a frame, leaving ownership with the CPU.
    pub fn stage(&self, buffer: *const u8, len: usize, first: bool, last: bool) {
        let mut flags = self.tdes0.get() & tdes0::PERSISTENT;

        if first {
            flags |= tdes0::FIRST_SEGMENT;
        }
        if last {
            flags |= tdes0::LAST_SEGMENT | tdes0::INTERRUPT_ON_COMPLETE;
        }

        self.buffer1_addr.set(bus_addr(buffer));
        self.tdes1.set((len as u32) & tdes1::BUFFER1_SIZE_MASK);
        self.tdes0.set(flags);
    }

    /// Detach the buffer after transmission, keeping chain and checksum settings.
    pub fn release(&self) {
        self.tdes0.update(|v| v & tdes0::PERSISTENT);
        self.tdes1.set(0);
        self.buffer1_addr.set(0);
    }

    /// Set checksum insertion mode.
    pub fn set_checksum_mode(&self, mode: u32) {
        self.tdes0.update(|v| {
            (v & !tdes0::CHECKSUM_INSERT_MASK)
                | ((mode << tdes0::CHECKSUM_INSERT_SHIFT) & tdes0::CHECKSUM_INSERT_MASK)
        });
    }

    /// Check if transmission had errors.
    #[inline(always)]
    #[must_use]
    pub fn has_error(&self) -> bool {
        (self.tdes0.get() & tdes0::ERR_SUMMARY) != 0
    }

    /// Get all error flags from TDES0.
    #[inline(always)]
    #[must_use]
    pub fn error_flags(&self) -> u32 {
        self.tdes0.get() & tdes0::ALL_ERRORS
    }

    /// First segment of a frame.
    #[inline(always)]
    #[must_use]
    pub fn is_first(&self) -> bool {
        (self.tdes0.get() & tdes0::FIRST_SEGMENT) != 0
    }

    /// Last segment of a frame.
    #[inline(always)]
    #[must_use]
    pub fn is_last(&self) -> bool {
        (self.tdes0.get() & tdes0::LAST_SEGMENT) != 0
    }

    /// Length of the attached fragment.
    #[inline(always)]
    #[must_use]
    pub fn segment_len(&self) -> usize {
        (self.tdes1.get() & tdes1::BUFFER1_SIZE_MASK) as usize
    }

    /// Get buffer address.
    #[inline(always)]
    #[must_use]
    pub fn buffer_addr(&self) -> u32 {
        self.buffer1_addr.get()
    }

    /// Get next descriptor address in chained mode.
    #[inline(always)]
    #[must_use]
    pub fn next_desc_addr(&self) -> u32 {
        self.next_desc.get()
    }

    /// Get raw TDES0 value for debugging.
    #[inline(always)]
    #[must_use]
    pub fn raw_tdes0(&self) -> u32 {
        self.tdes0.get()
    }

    /// Hardware write-back: hand the descriptor back with the given status bits.
    #[cfg(test)]
    pub(crate) fn complete(&self, status: u32) {
        self.tdes0.update(|v| (v & !tdes0::OWN) | status);
    }
}

impl Default for TxDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

// Safety: TxDescriptor uses volatile cells for all DMA-accessed fields
unsafe impl Sync for TxDescriptor {}
unsafe impl Send for TxDescriptor {}
