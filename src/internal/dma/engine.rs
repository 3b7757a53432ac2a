//! DMA engine managing TX/RX descriptor rings and the buffers attached to them.
//!
//! Every descriptor slot has a shadow `Option<Buffer>` on the CPU side. A
//! buffer sits in the shadow exactly while its descriptor references it;
//! it leaves the shadow when the CPU takes the descriptor back, and only
//! then can it return to the pool.

use core::sync::atomic::{Ordering, fence};

use super::descriptor::bits::{checksum_mode, rdes0};
use super::descriptor::{RxDescriptor, TxDescriptor, bus_addr};
use super::ring::DescriptorRing;
use crate::driver::buffer::{Buffer, BufferPool};
use crate::driver::config::RxValidation;
use crate::driver::delivery::{Frame, Rejected};
use crate::driver::error::{DmaError, DmaResult};
use crate::internal::constants::{CRC_SIZE, MAX_DESCRIPTOR_BUFFER};
use crate::internal::register::RegisterBlock;
use crate::internal::register::dma::DmaRegs;

#[cfg(feature = "log")]
use log::warn;

/// Log the status word of a frame dropped for errors.
#[allow(unused_variables)]
fn log_rx_error(status: u32) {
    let flags = status & (rdes0::ALL_ERRORS | rdes0::SA_FILTER_FAIL | rdes0::DA_FILTER_FAIL);

    #[cfg(feature = "defmt")]
    defmt::warn!("RX frame error: rdes0={=u32:#x} flags={=u32:#x}", status, flags);
    #[cfg(feature = "log")]
    warn!("RX frame error: rdes0=0x{:08x} flags=0x{:08x}", status, flags);
}

/// Log the error flags of a transmitted descriptor.
#[allow(unused_variables)]
fn log_tx_error(flags: u32) {
    #[cfg(feature = "defmt")]
    defmt::warn!("TX error: tdes0 flags={=u32:#x}", flags);
    #[cfg(feature = "log")]
    warn!("TX error: tdes0 flags=0x{:08x}", flags);
}

/// Cumulative frame length (including CRC) from an RDES0 status word.
#[inline(always)]
const fn frame_length(status: u32) -> usize {
    ((status & rdes0::FRAME_LEN_MASK) >> rdes0::FRAME_LEN_SHIFT) as usize
}

/// Counters maintained by the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaStats {
    /// Frames queued for transmission
    pub tx_frames: u32,
    /// TX fragments handed back by the hardware
    pub tx_completed: u32,
    /// TX fragments the hardware reported errors for
    pub tx_errors: u32,
    /// Transmit attempts that found no free descriptor in time
    pub tx_timeouts: u32,
    /// Frames delivered and accepted upstream
    pub rx_frames: u32,
    /// Frames the upper layer refused
    pub rx_rejected: u32,
    /// Frames dropped for hardware-reported errors
    pub rx_errors: u32,
    /// Partial or orphaned fragments discarded
    pub rx_dropped: u32,
    /// RX refills that found the pool empty
    pub alloc_failures: u32,
}

/// DMA Engine over pool-backed buffers.
///
/// # Type Parameters
/// * `RX` - Number of receive descriptors
/// * `TX` - Number of transmit descriptors
/// * `BUF` - Size of each pool buffer in bytes
pub struct DmaEngine<const RX: usize, const TX: usize, const BUF: usize> {
    /// RX descriptor ring; `current` is the service cursor
    rx_ring: DescriptorRing<RxDescriptor, RX>,
    /// TX descriptor ring; `current` is the enqueue cursor
    tx_ring: DescriptorRing<TxDescriptor, TX>,
    /// Buffers attached to RX descriptors
    rx_slots: [Option<Buffer<BUF>>; RX],
    /// Buffers attached to TX descriptors
    tx_slots: [Option<Buffer<BUF>>; TX],
    /// Fragments of the frame being reassembled
    pending: [Option<Buffer<BUF>>; RX],
    /// Number of entries used in `pending`
    pending_count: usize,
    /// Next RX slot to refill
    rx_refill: usize,
    /// Oldest TX slot still referencing a buffer
    tx_recycle: usize,
    /// TX slots between `tx_recycle` and the enqueue cursor
    tx_in_flight: usize,
    /// TX control flags (checksum insertion mode)
    tx_ctrl_flags: u32,
    /// Counters
    stats: DmaStats,
    /// Whether the engine has been initialized
    initialized: bool,
}

impl<const RX: usize, const TX: usize, const BUF: usize> DmaEngine<RX, TX, BUF> {
    /// Create an idle engine. Const-compatible.
    #[must_use]
    pub const fn new() -> Self {
        const {
            assert!(RX > 0 && TX > 0, "descriptor rings must not be empty");
            assert!(
                BUF > 0 && BUF <= MAX_DESCRIPTOR_BUFFER,
                "buffer size must fit the 13-bit descriptor size field"
            );
        }
        Self {
            rx_ring: DescriptorRing::from_array([const { RxDescriptor::new() }; RX]),
            tx_ring: DescriptorRing::from_array([const { TxDescriptor::new() }; TX]),
            rx_slots: [const { None }; RX],
            tx_slots: [const { None }; TX],
            pending: [const { None }; RX],
            pending_count: 0,
            rx_refill: 0,
            tx_recycle: 0,
            tx_in_flight: 0,
            tx_ctrl_flags: checksum_mode::DISABLED,
            stats: DmaStats {
                tx_frames: 0,
                tx_completed: 0,
                tx_errors: 0,
                tx_timeouts: 0,
                rx_frames: 0,
                rx_rejected: 0,
                rx_errors: 0,
                rx_dropped: 0,
                alloc_failures: 0,
            },
            initialized: false,
        }
    }

    /// Descriptor memory in bytes (buffers live in the pool).
    #[must_use]
    pub const fn descriptor_memory() -> usize {
        RX * RxDescriptor::SIZE + TX * TxDescriptor::SIZE
    }

    /// Chain both rings, attach a buffer to every RX descriptor and program
    /// the list base registers.
    ///
    /// The engine must not move after this call: the DMA holds the
    /// descriptor addresses.
    pub fn init<R: RegisterBlock, const POOL: usize>(
        &mut self,
        pool: &mut BufferPool<BUF, POOL>,
        regs: &R,
        tx_checksum: u32,
    ) -> DmaResult<()> {
        self.release_all(pool);

        for i in 0..RX {
            let next = self.rx_ring.get(i + 1) as *const RxDescriptor;
            self.rx_ring.get(i).setup_chained(BUF, next);
        }
        for i in 0..TX {
            let next = self.tx_ring.get(i + 1) as *const TxDescriptor;
            self.tx_ring.get(i).setup_chained(next, tx_checksum);
        }

        self.tx_ctrl_flags = tx_checksum;
        self.rx_ring.reset();
        self.tx_ring.reset();
        self.rx_refill = 0;
        self.tx_recycle = 0;
        self.tx_in_flight = 0;

        if self.replenish(pool, regs) < RX {
            self.release_all(pool);
            return Err(DmaError::PoolExhausted);
        }

        let dma = DmaRegs::new(regs);
        dma.set_rx_desc_list_addr(bus_addr(self.rx_ring.base_addr()));
        dma.set_tx_desc_list_addr(bus_addr(self.tx_ring.base_addr()));
        self.initialized = true;
        Ok(())
    }

    /// Return every buffer held by the rings to the pool. Caller should stop DMA first.
    pub fn release_all<const POOL: usize>(&mut self, pool: &mut BufferPool<BUF, POOL>) {
        for (slot, desc) in self.rx_slots.iter_mut().zip(self.rx_ring.iter()) {
            desc.detach();
            if let Some(buffer) = slot.take() {
                pool.release(buffer);
            }
        }
        for (slot, desc) in self.tx_slots.iter_mut().zip(self.tx_ring.iter()) {
            desc.release();
            if let Some(buffer) = slot.take() {
                pool.release(buffer);
            }
        }
        self.discard_pending(pool);
        self.tx_in_flight = 0;
        self.initialized = false;
    }

    /// Check if the DMA engine has been initialized
    #[inline(always)]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get the current TX control flags
    #[inline(always)]
    pub fn tx_ctrl_flags(&self) -> u32 {
        self.tx_ctrl_flags
    }

    /// Engine counters
    #[inline(always)]
    pub fn stats(&self) -> DmaStats {
        self.stats
    }

    /// TX descriptors not referencing a buffer
    #[inline(always)]
    pub fn tx_available(&self) -> usize {
        TX - self.tx_in_flight
    }

    /// RX descriptors currently armed with a buffer
    pub fn rx_armed(&self) -> usize {
        self.rx_slots.iter().filter(|slot| slot.is_some()).count()
    }

    // =========================================================================
    // Transmit
    // =========================================================================

    /// Queue one frame made of `fragments`, first to last.
    ///
    /// Each fragment waits up to `wait_spins` polls for its descriptor,
    /// reclaiming completed slots while it waits. On any error every
    /// fragment, staged or not, goes back to the pool and no descriptor is
    /// handed to the hardware.
    pub fn transmit<R, I, const POOL: usize>(
        &mut self,
        fragments: I,
        pool: &mut BufferPool<BUF, POOL>,
        regs: &R,
        wait_spins: u32,
    ) -> DmaResult<usize>
    where
        R: RegisterBlock,
        I: IntoIterator<Item = Buffer<BUF>>,
    {
        let mut fragments = fragments.into_iter().peekable();
        let mut staged = 0usize;
        let mut failure = None;

        while let Some(buffer) = fragments.next() {
            if buffer.is_empty() {
                pool.release(buffer);
                failure = Some(DmaError::InvalidLength);
                break;
            }
            if let Err(err) = self.wait_tx_slot(staged, pool, wait_spins) {
                pool.release(buffer);
                failure = Some(err);
                break;
            }

            let last = fragments.peek().is_none();
            let idx = DescriptorRing::<TxDescriptor, TX>::wrap(self.tx_ring.current_index(), staged);
            self.tx_ring
                .get(idx)
                .stage(buffer.as_ptr(), buffer.len(), staged == 0, last);
            self.tx_slots[idx] = Some(buffer);
            staged += 1;
        }

        if staged == 0 && failure.is_none() {
            failure = Some(DmaError::InvalidLength);
        }

        if let Some(err) = failure {
            for rest in fragments {
                pool.release(rest);
            }
            self.unstage(staged, pool);
            if err == DmaError::RingTimeout {
                self.stats.tx_timeouts = self.stats.tx_timeouts.wrapping_add(1);
            }
            return Err(err);
        }

        // Buffer contents and descriptor fields before any OWN bit
        fence(Ordering::Release);
        // Last to first so the DMA never sees a partial chain
        for offset in (0..staged).rev() {
            self.tx_ring.at_offset(offset).set_owned();
        }

        self.tx_in_flight += staged;
        self.tx_ring.advance_by(staged);
        self.stats.tx_frames = self.stats.tx_frames.wrapping_add(1);

        DmaRegs::new(regs).resume_tx_if_suspended();
        Ok(staged)
    }

    /// Wait until the slot `offset` past the enqueue cursor is free.
    fn wait_tx_slot<const POOL: usize>(
        &mut self,
        offset: usize,
        pool: &mut BufferPool<BUF, POOL>,
        wait_spins: u32,
    ) -> DmaResult<()> {
        if offset >= TX {
            return Err(DmaError::RingTimeout);
        }

        let mut spins = wait_spins;
        while self.tx_in_flight + offset >= TX {
            if self.recycle_tx(pool) > 0 {
                continue;
            }
            if spins == 0 {
                return Err(DmaError::RingTimeout);
            }
            spins -= 1;
            core::hint::spin_loop();
        }
        Ok(())
    }

    /// Undo staging of the first `staged` slots past the enqueue cursor.
    fn unstage<const POOL: usize>(&mut self, staged: usize, pool: &mut BufferPool<BUF, POOL>) {
        for offset in 0..staged {
            let idx = DescriptorRing::<TxDescriptor, TX>::wrap(self.tx_ring.current_index(), offset);
            self.tx_ring.get(idx).release();
            if let Some(buffer) = self.tx_slots[idx].take() {
                pool.release(buffer);
            }
        }
    }

    /// Release the buffers of every transmitted descriptor, oldest first.
    ///
    /// Returns the number of buffers returned to the pool.
    pub fn recycle_tx<const POOL: usize>(&mut self, pool: &mut BufferPool<BUF, POOL>) -> usize {
        let mut released = 0;

        while self.tx_in_flight > 0 {
            let idx = self.tx_recycle;
            let desc = self.tx_ring.get(idx);
            if desc.is_owned() {
                break;
            }
            fence(Ordering::Acquire);

            if desc.has_error() {
                self.stats.tx_errors = self.stats.tx_errors.wrapping_add(1);
                log_tx_error(desc.error_flags());
            }

            desc.release();
            if let Some(buffer) = self.tx_slots[idx].take() {
                pool.release(buffer);
                released += 1;
            }

            self.tx_recycle = DescriptorRing::<TxDescriptor, TX>::wrap(idx, 1);
            self.tx_in_flight -= 1;
            self.stats.tx_completed = self.stats.tx_completed.wrapping_add(1);
        }

        released
    }

    // =========================================================================
    // Receive
    // =========================================================================

    /// Collect completed RX descriptors, reassemble frames and hand each
    /// complete frame to `deliver`. Stops after `limit` complete frames.
    ///
    /// Returns the number of frames passed to `deliver`, accepted or not.
    pub fn receive<F, const POOL: usize>(
        &mut self,
        pool: &mut BufferPool<BUF, POOL>,
        validation: RxValidation,
        limit: usize,
        mut deliver: F,
    ) -> usize
    where
        F: FnMut(&Frame<'_, BUF>) -> Result<(), Rejected>,
    {
        let mut delivered = 0;
        let mut completed = 0;

        for _ in 0..RX {
            if completed >= limit {
                break;
            }

            let idx = self.rx_ring.current_index();
            let desc = self.rx_ring.current();
            if desc.is_owned() {
                break;
            }
            let Some(buffer) = self.rx_slots[idx].take() else {
                break;
            };
            fence(Ordering::Acquire);
            let status = desc.status();
            desc.detach();
            self.rx_ring.advance();

            let first = status & rdes0::FIRST_DESC != 0;
            if first && self.pending_count > 0 {
                self.drop_pending(pool);
            }
            if !first && self.pending_count == 0 {
                // Continuation without a start
                pool.release(buffer);
                self.stats.rx_dropped = self.stats.rx_dropped.wrapping_add(1);
                continue;
            }
            if self.pending_count == RX {
                pool.release(buffer);
                self.drop_pending(pool);
                continue;
            }

            self.pending[self.pending_count] = Some(buffer);
            self.pending_count += 1;

            if status & rdes0::LAST_DESC == 0 {
                continue;
            }
            completed += 1;

            if status & rdes0::ERR_SUMMARY != 0 && validation == RxValidation::Strict {
                log_rx_error(status);
                self.stats.rx_errors = self.stats.rx_errors.wrapping_add(1);
                self.discard_pending(pool);
                continue;
            }

            let len = self.distribute(frame_length(status).saturating_sub(CRC_SIZE));
            let frame = Frame::new(&self.pending[..self.pending_count], len);
            delivered += 1;
            match deliver(&frame) {
                Ok(()) => {
                    self.stats.rx_frames = self.stats.rx_frames.wrapping_add(1);
                }
                Err(Rejected) => {
                    self.stats.rx_rejected = self.stats.rx_rejected.wrapping_add(1);
                }
            }
            self.discard_pending(pool);
        }

        delivered
    }

    /// Spread `total` bytes over the pending fragments in order.
    ///
    /// Returns the number of bytes the fragments actually cover.
    fn distribute(&mut self, total: usize) -> usize {
        let mut remaining = total;
        for buffer in self.pending[..self.pending_count].iter_mut().flatten() {
            let len = remaining.min(buffer.capacity());
            buffer.set_len(len);
            remaining -= len;
        }
        total - remaining
    }

    /// Discard a partial frame, counting it as dropped.
    fn drop_pending<const POOL: usize>(&mut self, pool: &mut BufferPool<BUF, POOL>) {
        if self.pending_count > 0 {
            self.stats.rx_dropped = self.stats.rx_dropped.wrapping_add(1);
        }
        self.discard_pending(pool);
    }

    /// Return all pending fragments to the pool.
    fn discard_pending<const POOL: usize>(&mut self, pool: &mut BufferPool<BUF, POOL>) {
        for slot in &mut self.pending[..self.pending_count] {
            if let Some(buffer) = slot.take() {
                pool.release(buffer);
            }
        }
        self.pending_count = 0;
    }

    /// Attach fresh buffers to empty RX descriptors, starting at the refill
    /// cursor. Stops at the first armed slot or when the pool runs dry.
    ///
    /// Returns the number of descriptors armed.
    pub fn replenish<R: RegisterBlock, const POOL: usize>(
        &mut self,
        pool: &mut BufferPool<BUF, POOL>,
        regs: &R,
    ) -> usize {
        let mut armed = 0;

        for _ in 0..RX {
            let idx = self.rx_refill;
            if self.rx_slots[idx].is_some() || self.rx_ring.get(idx).is_owned() {
                break;
            }
            let Some(mut buffer) = pool.alloc() else {
                self.stats.alloc_failures = self.stats.alloc_failures.wrapping_add(1);
                break;
            };

            self.rx_ring.get(idx).arm(buffer.as_mut_ptr());
            self.rx_slots[idx] = Some(buffer);
            self.rx_refill = DescriptorRing::<RxDescriptor, RX>::wrap(idx, 1);
            armed += 1;
        }

        if armed > 0 {
            DmaRegs::new(regs).resume_rx_if_suspended();
        }
        armed
    }

    // =========================================================================
    // Hardware-side access for the simulated DMA
    // =========================================================================

    #[cfg(test)]
    pub(crate) fn rx_descriptor(&self, idx: usize) -> &RxDescriptor {
        self.rx_ring.get(idx)
    }

    #[cfg(test)]
    pub(crate) fn rx_slot_mut(&mut self, idx: usize) -> Option<&mut Buffer<BUF>> {
        self.rx_slots[idx % RX].as_mut()
    }

    #[cfg(test)]
    pub(crate) fn tx_descriptor(&self, idx: usize) -> &TxDescriptor {
        self.tx_ring.get(idx)
    }

    #[cfg(test)]
    pub(crate) fn tx_slot(&self, idx: usize) -> Option<&Buffer<BUF>> {
        self.tx_slots[idx % TX].as_ref()
    }
}

impl<const RX: usize, const TX: usize, const BUF: usize> Default for DmaEngine<RX, TX, BUF> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::std_instead_of_alloc)]
mod tests {
    extern crate std;

    use super::*;
    use crate::internal::dma::descriptor::bits::tdes0;
    use crate::testing::{DmaModel, SimulatedMac, leak_storage};
    use std::vec::Vec;

    fn filled<const POOL: usize>(pool: &mut BufferPool<64, POOL>, data: &[u8]) -> Buffer<64> {
        let mut buffer = pool.alloc().unwrap();
        buffer.copy_from(data).unwrap();
        buffer
    }

    fn collect<const RX: usize, const TX: usize, const POOL: usize>(
        dma: &mut DmaEngine<RX, TX, 64>,
        pool: &mut BufferPool<64, POOL>,
        validation: RxValidation,
    ) -> Vec<(Vec<u8>, Vec<usize>)> {
        let mut frames = Vec::new();
        dma.receive(pool, validation, RX, |frame| {
            let mut data = std::vec![0u8; frame.len()];
            frame.copy_to(&mut data).unwrap();
            frames.push((data, frame.fragments().map(<[u8]>::len).collect()));
            Ok(())
        });
        frames
    }

    #[test]
    fn init_arms_every_rx_descriptor() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<4, 2, 64> = DmaEngine::new();

        dma.init(&mut pool, &sim, checksum_mode::FULL).unwrap();

        assert!(dma.is_initialized());
        assert_eq!(dma.rx_armed(), 4);
        assert_eq!(pool.available(), 4);
        assert!((0..4).all(|i| dma.rx_descriptor(i).is_owned()));
        assert_eq!(dma.tx_available(), 2);
        assert_eq!(dma.tx_ctrl_flags(), checksum_mode::FULL);
    }

    #[test]
    fn init_with_too_few_buffers_gives_everything_back() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 3> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<4, 2, 64> = DmaEngine::new();

        assert_eq!(dma.init(&mut pool, &sim, 0), Err(DmaError::PoolExhausted));
        assert!(!dma.is_initialized());
        assert_eq!(pool.available(), 3);
    }

    #[test]
    fn transmit_chains_fragments_first_to_last() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<2, 4, 64> = DmaEngine::new();
        dma.init(&mut pool, &sim, 0).unwrap();

        let parts = [filled(&mut pool, &[1; 64]), filled(&mut pool, &[2; 64]), filled(&mut pool, &[3; 10])];
        assert_eq!(dma.transmit(parts, &mut pool, &sim, 0), Ok(3));

        assert!(dma.tx_descriptor(0).is_first());
        assert!(!dma.tx_descriptor(0).is_last());
        assert!(!dma.tx_descriptor(1).is_first() && !dma.tx_descriptor(1).is_last());
        assert!(dma.tx_descriptor(2).is_last());
        assert_eq!(dma.tx_descriptor(2).segment_len(), 10);
        assert!((0..3).all(|i| dma.tx_descriptor(i).is_owned()));
        assert!(!dma.tx_descriptor(3).is_owned());
        assert_eq!(dma.tx_available(), 1);
    }

    #[test]
    fn tx_buffers_are_released_exactly_once() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<2, 4, 64> = DmaEngine::new();
        let mut model = DmaModel::new();
        dma.init(&mut pool, &sim, 0).unwrap();

        let parts = [filled(&mut pool, &[0xAA; 64]), filled(&mut pool, &[0xBB; 20])];
        dma.transmit(parts, &mut pool, &sim, 0).unwrap();
        assert_eq!(dma.recycle_tx(&mut pool), 0);

        let sent = model.complete_tx(&mut dma);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].len(), 84);

        assert_eq!(dma.recycle_tx(&mut pool), 2);
        assert_eq!(dma.recycle_tx(&mut pool), 0);
        assert_eq!(pool.available(), 8 - 2);
        assert_eq!(dma.stats().tx_completed, 2);
    }

    #[test]
    fn tx_errors_are_counted_on_recycle() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<2, 4, 64> = DmaEngine::new();
        let mut model = DmaModel::new();
        dma.init(&mut pool, &sim, 0).unwrap();

        let frame = [filled(&mut pool, &[0; 60])];
        dma.transmit(frame, &mut pool, &sim, 0).unwrap();
        model.complete_tx_with(&mut dma, tdes0::ERR_SUMMARY | tdes0::UNDERFLOW_ERR);

        assert_eq!(dma.recycle_tx(&mut pool), 1);
        assert_eq!(dma.stats().tx_errors, 1);
    }

    #[test]
    fn frame_longer_than_ring_is_refused_whole() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<2, 2, 64> = DmaEngine::new();
        dma.init(&mut pool, &sim, 0).unwrap();
        let before = pool.available();

        let parts = [filled(&mut pool, &[1; 64]), filled(&mut pool, &[2; 64]), filled(&mut pool, &[3; 64])];
        assert_eq!(dma.transmit(parts, &mut pool, &sim, 100), Err(DmaError::RingTimeout));

        assert_eq!(pool.available(), before);
        assert!(!dma.tx_descriptor(0).is_owned());
        assert!(!dma.tx_descriptor(1).is_owned());
        assert_eq!(dma.tx_available(), 2);
        assert_eq!(dma.stats().tx_timeouts, 1);
        assert_eq!(dma.stats().tx_frames, 0);
    }

    #[test]
    fn transmit_times_out_on_a_full_ring() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<2, 2, 64> = DmaEngine::new();
        dma.init(&mut pool, &sim, 0).unwrap();

        for _ in 0..2 {
            let frame = [filled(&mut pool, &[0; 60])];
            assert_eq!(dma.transmit(frame, &mut pool, &sim, 4), Ok(1));
        }
        let frame = [filled(&mut pool, &[0; 60])];
        assert_eq!(dma.transmit(frame, &mut pool, &sim, 4), Err(DmaError::RingTimeout));
        assert_eq!(pool.available(), 8 - 2 - 2);
    }

    #[test]
    fn transmit_rejects_empty_fragments() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<2, 2, 64> = DmaEngine::new();
        dma.init(&mut pool, &sim, 0).unwrap();
        let before = pool.available();

        let empty = pool.alloc().unwrap();
        assert_eq!(dma.transmit([empty], &mut pool, &sim, 0), Err(DmaError::InvalidLength));
        assert_eq!(dma.transmit(core::iter::empty::<Buffer<64>>(), &mut pool, &sim, 0), Err(DmaError::InvalidLength));
        assert_eq!(pool.available(), before);
    }

    #[test]
    fn receive_reassembles_without_crc() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<4, 2, 64> = DmaEngine::new();
        let mut model = DmaModel::new();
        dma.init(&mut pool, &sim, 0).unwrap();

        let data: Vec<u8> = (0..100u8).collect();
        assert!(model.receive(&mut dma, &data));

        let frames = collect(&mut dma, &mut pool, RxValidation::Strict);
        assert_eq!(frames, [(data, std::vec![64, 36])]);
        assert_eq!(dma.stats().rx_frames, 1);
    }

    #[test]
    fn replenish_rearms_consumed_descriptors() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<4, 2, 64> = DmaEngine::new();
        let mut model = DmaModel::new();
        dma.init(&mut pool, &sim, 0).unwrap();

        assert!(model.receive(&mut dma, &[7; 40]));
        assert!(model.receive(&mut dma, &[8; 90]));
        assert_eq!(collect(&mut dma, &mut pool, RxValidation::Strict).len(), 2);
        assert_eq!(dma.rx_armed(), 1);

        assert_eq!(dma.replenish(&mut pool, &sim), 3);
        assert_eq!(dma.rx_armed(), 4);
        assert!((0..4).all(|i| dma.rx_descriptor(i).is_owned()));
        assert_eq!(pool.available(), 4);
    }

    #[test]
    fn errored_frame_handling_follows_validation() {
        for (validation, expected) in [(RxValidation::Strict, 0), (RxValidation::Trusting, 1)] {
            let sim = SimulatedMac::new();
            let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
            let mut dma: DmaEngine<4, 2, 64> = DmaEngine::new();
            let mut model = DmaModel::new();
            dma.init(&mut pool, &sim, 0).unwrap();

            model.receive_with_status(&mut dma, &[1; 30], rdes0::ERR_SUMMARY | rdes0::CRC_ERR);
            assert_eq!(collect(&mut dma, &mut pool, validation).len(), expected);
            assert_eq!(dma.stats().rx_errors, 1 - expected as u32);
            assert_eq!(pool.available(), 5);
        }
    }

    #[test]
    fn continuation_without_start_is_dropped() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<4, 2, 64> = DmaEngine::new();
        dma.init(&mut pool, &sim, 0).unwrap();

        dma.rx_descriptor(0)
            .complete(rdes0::LAST_DESC | (40 << rdes0::FRAME_LEN_SHIFT));

        assert!(collect(&mut dma, &mut pool, RxValidation::Strict).is_empty());
        assert_eq!(dma.stats().rx_dropped, 1);
        assert_eq!(pool.available(), 5);
    }

    #[test]
    fn rejected_frames_are_counted() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<4, 2, 64> = DmaEngine::new();
        let mut model = DmaModel::new();
        dma.init(&mut pool, &sim, 0).unwrap();

        model.receive(&mut dma, &[0; 20]);
        assert_eq!(dma.receive(&mut pool, RxValidation::Strict, 4, |_| Err(Rejected)), 1);
        assert_eq!(dma.stats().rx_rejected, 1);
        assert_eq!(dma.stats().rx_frames, 0);
    }

    #[test]
    fn receive_stops_at_limit() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<4, 2, 64> = DmaEngine::new();
        let mut model = DmaModel::new();
        dma.init(&mut pool, &sim, 0).unwrap();

        model.receive(&mut dma, &[1; 20]);
        model.receive(&mut dma, &[2; 20]);

        assert_eq!(dma.receive(&mut pool, RxValidation::Strict, 1, |_| Ok(())), 1);
        assert_eq!(dma.receive(&mut pool, RxValidation::Strict, 1, |_| Ok(())), 1);
        assert_eq!(dma.receive(&mut pool, RxValidation::Strict, 1, |_| Ok(())), 0);
    }

    #[test]
    fn empty_pool_counts_alloc_failures() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 4> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<4, 2, 64> = DmaEngine::new();
        let mut model = DmaModel::new();
        dma.init(&mut pool, &sim, 0).unwrap();

        model.receive(&mut dma, &[0; 20]);
        collect(&mut dma, &mut pool, RxValidation::Strict);
        let held = pool.alloc().unwrap();

        assert_eq!(dma.replenish(&mut pool, &sim), 0);
        assert_eq!(dma.stats().alloc_failures, 1);

        pool.release(held);
        assert_eq!(dma.replenish(&mut pool, &sim), 1);
    }

    #[test]
    fn release_all_returns_ring_buffers() {
        let sim = SimulatedMac::new();
        let mut pool: BufferPool<64, 8> = BufferPool::new(leak_storage());
        let mut dma: DmaEngine<4, 2, 64> = DmaEngine::new();
        dma.init(&mut pool, &sim, 0).unwrap();
        let frame = [filled(&mut pool, &[0; 60])];
        dma.transmit(frame, &mut pool, &sim, 0).unwrap();

        dma.release_all(&mut pool);

        assert_eq!(pool.available(), 8);
        assert!(!dma.is_initialized());
        assert_eq!(DmaEngine::<4, 2, 64>::descriptor_memory(), 6 * 32);
    }
}
