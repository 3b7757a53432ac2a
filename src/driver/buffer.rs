//! Fixed-size frame buffers and the pool they are drawn from.
//!
//! A [`Buffer`] is a move-only handle to one statically allocated block of
//! `SIZE` bytes plus a used length. Holding the handle is the ownership:
//! whoever has it may touch the bytes, and giving it to
//! [`BufferPool::release`] is the only way to return it.

use crate::driver::error::{IoError, IoResult};

/// Owned handle to one fixed-capacity frame buffer.
pub struct Buffer<const SIZE: usize> {
    data: &'static mut [u8; SIZE],
    len: usize,
}

impl<const SIZE: usize> Buffer<SIZE> {
    /// Wrap a static block as an empty buffer
    pub fn new(data: &'static mut [u8; SIZE]) -> Self {
        Self { data, len: 0 }
    }

    /// Capacity in bytes
    #[inline(always)]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        SIZE
    }

    /// Number of valid bytes
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True if no bytes are valid
    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set the number of valid bytes, clamped to the capacity
    #[inline(always)]
    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(SIZE);
    }

    /// Valid bytes
    #[inline(always)]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Valid bytes, mutable
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }

    /// Replace the contents with `src`
    pub fn copy_from(&mut self, src: &[u8]) -> IoResult<()> {
        if src.len() > SIZE {
            return Err(IoError::BufferTooSmall);
        }
        self.data[..src.len()].copy_from_slice(src);
        self.len = src.len();
        Ok(())
    }

    /// Start of the storage, as handed to the DMA engine
    #[inline(always)]
    pub(crate) fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// Start of the storage, as handed to the DMA engine for writing
    #[inline(always)]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.data.as_mut_ptr()
    }

    /// Whole storage regardless of length, for the simulated DMA engine
    #[cfg(test)]
    pub(crate) fn storage_mut(&mut self) -> &mut [u8; SIZE] {
        &mut *self.data
    }
}

impl<const SIZE: usize> core::fmt::Debug for Buffer<SIZE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len)
            .field("capacity", &SIZE)
            .finish()
    }
}

/// Pool of `COUNT` buffers of `SIZE` bytes each.
///
/// Buffers are handed out and taken back as owned [`Buffer`] handles, so a
/// buffer cannot be released twice or used after release.
pub struct BufferPool<const SIZE: usize, const COUNT: usize> {
    free: [Option<Buffer<SIZE>>; COUNT],
    available: usize,
}

impl<const SIZE: usize, const COUNT: usize> BufferPool<SIZE, COUNT> {
    /// Build a pool over static storage; every buffer starts free.
    pub fn new(storage: &'static mut [[u8; SIZE]; COUNT]) -> Self {
        let mut blocks = storage.iter_mut();
        let free = core::array::from_fn(|_| blocks.next().map(Buffer::new));
        Self {
            free,
            available: COUNT,
        }
    }

    /// Total number of buffers
    #[inline(always)]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        COUNT
    }

    /// Number of buffers currently free
    #[inline(always)]
    #[must_use]
    pub const fn available(&self) -> usize {
        self.available
    }

    /// Take a free buffer, reset to zero length
    pub fn alloc(&mut self) -> Option<Buffer<SIZE>> {
        if self.available == 0 {
            return None;
        }
        self.available -= 1;
        let mut buffer = self.free[self.available].take()?;
        buffer.set_len(0);
        Some(buffer)
    }

    /// Give a buffer back to the pool
    pub fn release(&mut self, buffer: Buffer<SIZE>) {
        match self.free.get_mut(self.available) {
            Some(slot) => {
                *slot = Some(buffer);
                self.available += 1;
            }
            None => {
                // Only reachable with a buffer that came from another pool
                #[cfg(feature = "defmt")]
                defmt::error!("buffer released into a full pool, dropping it");
                #[cfg(feature = "log")]
                log::error!("buffer released into a full pool, dropping it");
            }
        }
    }
}
