//! Memory-mapped register access for the STM32F2x7 Ethernet peripheral
//!
//! Registers are addressed as a `(block, offset)` pair so the same driver
//! code can run against real MMIO or against a simulated register file in
//! tests. All real accesses are volatile.

pub mod dma;
pub mod mac;

/// ETH peripheral base address on STM32F2x7 (MAC block)
pub const ETH_BASE: usize = 0x4002_8000;

/// Offset of the DMA block from the MAC block
pub const DMA_BLOCK_OFFSET: usize = 0x1000;

/// Register block selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    /// MAC core registers
    Mac,
    /// DMA controller registers
    Dma,
}

/// A single 32-bit register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reg {
    /// Register block
    pub block: Block,
    /// Byte offset inside the block
    pub offset: usize,
}

impl Reg {
    /// Register in the MAC block
    #[must_use]
    pub const fn mac(offset: usize) -> Self {
        Self {
            block: Block::Mac,
            offset,
        }
    }

    /// Register in the DMA block
    #[must_use]
    pub const fn dma(offset: usize) -> Self {
        Self {
            block: Block::Dma,
            offset,
        }
    }
}

/// Access to the Ethernet MAC/DMA register file.
///
/// Implementations must perform each access exactly once and in program
/// order; the driver relies on write-1-to-clear semantics of `DMASR` and on
/// the self-clearing busy bits of `MACMIIAR` and `DMABMR`.
pub trait RegisterBlock {
    /// Read a register
    fn read(&self, reg: Reg) -> u32;

    /// Write a register
    fn write(&self, reg: Reg, value: u32);

    /// Read-modify-write a register
    #[inline(always)]
    fn modify<F>(&self, reg: Reg, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    /// Set bits in a register (read-modify-write)
    #[inline(always)]
    fn set_bits(&self, reg: Reg, bits: u32) {
        self.modify(reg, |v| v | bits);
    }

    /// Clear bits in a register (read-modify-write)
    #[inline(always)]
    fn clear_bits(&self, reg: Reg, bits: u32) {
        self.modify(reg, |v| v & !bits);
    }
}

impl<T: RegisterBlock + ?Sized> RegisterBlock for &T {
    #[inline(always)]
    fn read(&self, reg: Reg) -> u32 {
        (**self).read(reg)
    }

    #[inline(always)]
    fn write(&self, reg: Reg, value: u32) {
        (**self).write(reg, value);
    }
}

/// Volatile MMIO register file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mmio {
    mac_base: usize,
    dma_base: usize,
}

impl Mmio {
    /// Register file at an arbitrary ETH base address.
    ///
    /// # Safety
    /// `eth_base` must be the base of a DesignWare Ethernet MAC with the DMA
    /// block at `eth_base + 0x1000`, and the caller must be the only owner of
    /// that peripheral.
    #[must_use]
    pub const unsafe fn new(eth_base: usize) -> Self {
        Self {
            mac_base: eth_base,
            dma_base: eth_base + DMA_BLOCK_OFFSET,
        }
    }

    /// Register file of the STM32F2x7 ETH peripheral.
    ///
    /// # Safety
    /// The caller must be the only owner of the ETH peripheral and must have
    /// enabled its clocks and pins beforehand.
    #[must_use]
    pub const unsafe fn stm32f2x7() -> Self {
        // SAFETY: forwarded to the caller
        unsafe { Self::new(ETH_BASE) }
    }

    #[inline(always)]
    const fn addr(&self, reg: Reg) -> usize {
        match reg.block {
            Block::Mac => self.mac_base + reg.offset,
            Block::Dma => self.dma_base + reg.offset,
        }
    }
}

impl RegisterBlock for Mmio {
    #[inline(always)]
    fn read(&self, reg: Reg) -> u32 {
        // SAFETY: construction of `Mmio` guarantees the block addresses
        unsafe { read_reg(self.addr(reg)) }
    }

    #[inline(always)]
    fn write(&self, reg: Reg, value: u32) {
        // SAFETY: construction of `Mmio` guarantees the block addresses
        unsafe { write_reg(self.addr(reg), value) }
    }
}

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate read/write accessor methods for a register.
///
/// # Example
/// ```ignore
/// impl<R: RegisterBlock> DmaRegs<'_, R> {
///     reg_rw!(bus_mode, set_bus_mode, DMABMR, "Bus Mode register");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $reg:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            self.regs.read($reg)
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(&self, value: u32) {
            self.regs.write($reg, value);
        }
    };
}

/// Generate a read-only accessor method for a register.
macro_rules! reg_ro {
    ($read_fn:ident, $reg:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            self.regs.read($reg)
        }
    };
}

/// Generate set/clear bit operation methods for a register.
///
/// # Example
/// ```ignore
/// reg_bit_ops!(start_tx, stop_tx, DMAOMR, DMAOMR_ST, "TX DMA", "Start", "Stop");
/// ```
macro_rules! reg_bit_ops {
    ($set_fn:ident, $clear_fn:ident, $reg:expr, $bit:expr, $what:expr, $set_verb:expr, $clear_verb:expr) => {
        #[doc = concat!($set_verb, " ", $what)]
        #[inline(always)]
        pub fn $set_fn(&self) {
            self.regs.set_bits($reg, $bit);
        }

        #[doc = concat!($clear_verb, " ", $what)]
        #[inline(always)]
        pub fn $clear_fn(&self) {
            self.regs.clear_bits($reg, $bit);
        }
    };
}

pub(crate) use reg_bit_ops;
pub(crate) use reg_ro;
pub(crate) use reg_rw;
