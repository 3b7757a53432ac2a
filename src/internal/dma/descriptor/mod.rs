//! TX and RX DMA descriptor structures.
//!
//! Each descriptor points to a data buffer and contains status/control bits
//! for CPU/DMA ownership coordination. The OWN bit is the only handshake
//! between the CPU and the DMA engine: whoever does not hold it must not
//! touch the descriptor or its buffer.

pub mod bits;
pub mod rx;
pub mod tx;

pub use rx::RxDescriptor;
pub use tx::TxDescriptor;

/// Volatile cell wrapper for descriptor fields
///
/// Ensures all accesses are volatile to prevent compiler optimization
/// from reordering or caching descriptor field accesses.
#[repr(transparent)]
pub(crate) struct VolatileCell<T: Copy> {
    value: core::cell::UnsafeCell<T>,
}

// Safety: VolatileCell is safe to share between threads because all access
// is through volatile operations which are single-copy atomic for u32 on Cortex-M.
unsafe impl<T: Copy> Sync for VolatileCell<T> {}

impl<T: Copy> VolatileCell<T> {
    /// Create a new volatile cell with the given initial value
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self {
            value: core::cell::UnsafeCell::new(value),
        }
    }

    /// Read the value (volatile read)
    #[inline(always)]
    pub fn get(&self) -> T {
        unsafe { core::ptr::read_volatile(self.value.get()) }
    }

    /// Write a value (volatile write)
    #[inline(always)]
    pub fn set(&self, value: T) {
        unsafe { core::ptr::write_volatile(self.value.get(), value) }
    }

    /// Update the value using a function (read-modify-write)
    #[inline(always)]
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        let old = self.get();
        self.set(f(old));
    }
}

/// Truncate a pointer to the 32-bit bus address the DMA engine sees.
#[inline(always)]
pub(crate) fn bus_addr<T>(ptr: *const T) -> u32 {
    ptr as usize as u32
}
