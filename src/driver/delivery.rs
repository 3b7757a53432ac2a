//! Boundary between the driver and the network stack above it.
//!
//! Received frames are lent to the stack as a [`Frame`], a view over the
//! fragments that hold it; the stack copies or parses what it needs and
//! the driver reclaims the buffers as soon as [`NetStack::input`] returns.

use crate::driver::buffer::Buffer;
use crate::driver::error::{IoError, IoResult};
use crate::phy::LinkStatus;

/// A received frame, without its CRC, spread over one or more buffers.
pub struct Frame<'a, const BUF: usize> {
    parts: &'a [Option<Buffer<BUF>>],
    len: usize,
}

impl<'a, const BUF: usize> Frame<'a, BUF> {
    pub(crate) fn new(parts: &'a [Option<Buffer<BUF>>], len: usize) -> Self {
        Self { parts, len }
    }

    /// Total frame length in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length frame
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fragments in wire order; empty fragments are skipped
    pub fn fragments(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.parts
            .iter()
            .flatten()
            .map(Buffer::as_slice)
            .filter(|part| !part.is_empty())
    }

    /// Number of non-empty fragments
    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragments().count()
    }

    /// Copy the whole frame into `out`, returning the number of bytes written
    pub fn copy_to(&self, out: &mut [u8]) -> IoResult<usize> {
        if out.len() < self.len {
            return Err(IoError::BufferTooSmall);
        }
        let mut offset = 0;
        for part in self.fragments() {
            out[offset..offset + part.len()].copy_from_slice(part);
            offset += part.len();
        }
        Ok(offset)
    }
}

/// Returned by [`NetStack::input`] when the stack will not take a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rejected;

/// Receives link transitions. Each transition is reported exactly once.
pub trait LinkObserver {
    /// The link came up with the given negotiated mode
    fn on_link_up(&mut self, status: LinkStatus);

    /// The link went down
    fn on_link_down(&mut self);
}

/// Upper network layer fed by the service loop.
pub trait NetStack: LinkObserver {
    /// Take a received frame. The frame's buffers return to the pool when this returns.
    fn input<const BUF: usize>(&mut self, frame: &Frame<'_, BUF>) -> Result<(), Rejected>;
}
