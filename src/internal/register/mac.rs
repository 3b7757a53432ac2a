//! MAC Core Register Definitions
//!
//! The MAC core handles frame transmission and reception according to IEEE 802.3,
//! destination address filtering and the MDIO management interface.

use super::{Reg, RegisterBlock, reg_bit_ops, reg_rw};

// =============================================================================
// Registers
// =============================================================================

/// MAC Configuration Register
pub const MACCR: Reg = Reg::mac(0x00);
/// MAC Frame Filter Register
pub const MACFFR: Reg = Reg::mac(0x04);
/// MAC Hash Table High Register
pub const MACHTHR: Reg = Reg::mac(0x08);
/// MAC Hash Table Low Register
pub const MACHTLR: Reg = Reg::mac(0x0C);
/// MAC MII Address Register
pub const MACMIIAR: Reg = Reg::mac(0x10);
/// MAC MII Data Register
pub const MACMIIDR: Reg = Reg::mac(0x14);
/// MAC Flow Control Register
pub const MACFCR: Reg = Reg::mac(0x18);
/// MAC Address 0 High Register (upper 16 bits of station address)
pub const MACA0HR: Reg = Reg::mac(0x40);
/// MAC Address 0 Low Register (lower 32 bits of station address)
pub const MACA0LR: Reg = Reg::mac(0x44);

/// Number of additional perfect-match address slots (MACA1..MACA3)
pub const MAC_ADDR_FILTER_COUNT: usize = 3;

// =============================================================================
// MAC Configuration Register (MACCR) Bits
// =============================================================================

/// Receiver Enable
pub const MACCR_RE: u32 = 1 << 2;
/// Transmitter Enable
pub const MACCR_TE: u32 = 1 << 3;
/// IPv4 Checksum Offload
pub const MACCR_IPCO: u32 = 1 << 10;
/// Duplex Mode (1 = full duplex)
pub const MACCR_DM: u32 = 1 << 11;
/// Receive Own Disable
pub const MACCR_ROD: u32 = 1 << 13;
/// Fast Ethernet Speed (1 = 100 Mbps)
pub const MACCR_FES: u32 = 1 << 14;

// =============================================================================
// MAC Frame Filter Register (MACFFR) Bits
// =============================================================================

/// Promiscuous Mode
pub const MACFFR_PM: u32 = 1 << 0;
/// Pass All Multicast
pub const MACFFR_PAM: u32 = 1 << 4;
/// Receive All
pub const MACFFR_RA: u32 = 1 << 31;

// =============================================================================
// MAC MII Address Register (MACMIIAR) Bits
// =============================================================================

/// MII Busy
pub const MACMIIAR_MB: u32 = 1 << 0;
/// MII Write (1 = write, 0 = read)
pub const MACMIIAR_MW: u32 = 1 << 1;
/// Clock Range shift (bits 4:2)
pub const MACMIIAR_CR_SHIFT: u32 = 2;
/// Clock Range mask
pub const MACMIIAR_CR_MASK: u32 = 0x7 << 2;
/// MII Register shift (bits 10:6)
pub const MACMIIAR_MR_SHIFT: u32 = 6;
/// MII Register mask
pub const MACMIIAR_MR_MASK: u32 = 0x1F << 6;
/// PHY Address shift (bits 15:11)
pub const MACMIIAR_PA_SHIFT: u32 = 11;
/// PHY Address mask
pub const MACMIIAR_PA_MASK: u32 = 0x1F << 11;

// =============================================================================
// MAC Address High Register Bits (filter slots 1-3)
// =============================================================================

/// Address Enable - when set, address comparison is enabled
pub const MACAHR_AE: u32 = 1 << 31;
/// Source Address filter - when set, compares SA instead of DA
pub const MACAHR_SA: u32 = 1 << 30;

/// High register of an address slot (0 = station address, 1-3 = filters)
#[must_use]
pub const fn maca_high(slot: usize) -> Reg {
    Reg::mac(0x40 + slot * 8)
}

/// Low register of an address slot (0 = station address, 1-3 = filters)
#[must_use]
pub const fn maca_low(slot: usize) -> Reg {
    Reg::mac(0x44 + slot * 8)
}

/// Split a MAC address into its (high, low) register halves, without control bits.
#[must_use]
pub const fn split_address(addr: &[u8; 6]) -> (u32, u32) {
    let low = (addr[0] as u32)
        | ((addr[1] as u32) << 8)
        | ((addr[2] as u32) << 16)
        | ((addr[3] as u32) << 24);
    let high = (addr[4] as u32) | ((addr[5] as u32) << 8);
    (high, low)
}

/// Reassemble a MAC address from its register halves.
#[must_use]
pub const fn join_address(high: u32, low: u32) -> [u8; 6] {
    [
        (low & 0xFF) as u8,
        ((low >> 8) & 0xFF) as u8,
        ((low >> 16) & 0xFF) as u8,
        ((low >> 24) & 0xFF) as u8,
        (high & 0xFF) as u8,
        ((high >> 8) & 0xFF) as u8,
    ]
}

// =============================================================================
// Accessors
// =============================================================================

/// Typed view of the MAC register block
pub struct MacRegs<'a, R: RegisterBlock> {
    regs: &'a R,
}

impl<'a, R: RegisterBlock> MacRegs<'a, R> {
    /// Wrap a register file
    #[must_use]
    pub const fn new(regs: &'a R) -> Self {
        Self { regs }
    }

    reg_rw!(config, set_config, MACCR, "MAC Configuration register");
    reg_rw!(frame_filter, set_frame_filter, MACFFR, "Frame Filter register");
    reg_rw!(mii_address, set_mii_address, MACMIIAR, "MII Address register");
    reg_rw!(mii_data, set_mii_data, MACMIIDR, "MII Data register");
    reg_rw!(flow_control, set_flow_control, MACFCR, "Flow Control register");

    reg_bit_ops!(enable_tx, disable_tx, MACCR, MACCR_TE, "transmitter", "Enable", "Disable");
    reg_bit_ops!(enable_rx, disable_rx, MACCR, MACCR_RE, "receiver", "Enable", "Disable");

    /// Program speed and duplex from a negotiated link mode
    pub fn set_speed_duplex(&self, fast: bool, full_duplex: bool) {
        self.regs.modify(MACCR, |v| {
            let mut v = v & !(MACCR_FES | MACCR_DM);
            if fast {
                v |= MACCR_FES;
            }
            if full_duplex {
                v |= MACCR_DM;
            }
            v
        });
    }

    /// Check if the MII interface is busy
    #[inline(always)]
    pub fn is_mii_busy(&self) -> bool {
        (self.mii_address() & MACMIIAR_MB) != 0
    }

    /// Enable or disable pass-all-multicast
    pub fn set_pass_all_multicast(&self, enable: bool) {
        if enable {
            self.regs.set_bits(MACFFR, MACFFR_PAM);
        } else {
            self.regs.clear_bits(MACFFR, MACFFR_PAM);
        }
    }

    /// Check if pass-all-multicast is enabled
    pub fn is_pass_all_multicast(&self) -> bool {
        (self.frame_filter() & MACFFR_PAM) != 0
    }

    /// Set the station MAC address (slot 0)
    pub fn set_mac_address(&self, addr: &[u8; 6]) {
        let (high, low) = split_address(addr);
        // High first: the low write latches the pair
        self.regs.write(maca_high(0), high | MACAHR_AE);
        self.regs.write(maca_low(0), low);
    }

    /// Get the station MAC address
    pub fn mac_address(&self) -> [u8; 6] {
        join_address(self.regs.read(maca_high(0)), self.regs.read(maca_low(0)))
    }

    /// Write a destination filter slot (1-3) with the given enable state
    ///
    /// Returns `false` if the slot is invalid.
    pub fn set_mac_filter(&self, slot: usize, addr: &[u8; 6], enabled: bool) -> bool {
        if !(1..=MAC_ADDR_FILTER_COUNT).contains(&slot) {
            return false;
        }
        let (mut high, low) = split_address(addr);
        if enabled {
            high |= MACAHR_AE;
        }
        self.regs.write(maca_high(slot), high);
        self.regs.write(maca_low(slot), low);
        true
    }

    /// Flip only the Address Enable bit of a filter slot (1-3)
    pub fn set_mac_filter_enabled(&self, slot: usize, enabled: bool) -> bool {
        if !(1..=MAC_ADDR_FILTER_COUNT).contains(&slot) {
            return false;
        }
        if enabled {
            self.regs.set_bits(maca_high(slot), MACAHR_AE);
        } else {
            self.regs.clear_bits(maca_high(slot), MACAHR_AE);
        }
        true
    }

    /// Read back a filter slot as `(address, enabled)`
    pub fn mac_filter(&self, slot: usize) -> Option<([u8; 6], bool)> {
        if !(1..=MAC_ADDR_FILTER_COUNT).contains(&slot) {
            return None;
        }
        let high = self.regs.read(maca_high(slot));
        let low = self.regs.read(maca_low(slot));
        Some((join_address(high, low), (high & MACAHR_AE) != 0))
    }

    /// Disable and zero all filter slots
    pub fn clear_all_mac_filters(&self) {
        for slot in 1..=MAC_ADDR_FILTER_COUNT {
            self.regs.write(maca_high(slot), 0);
            self.regs.write(maca_low(slot), 0);
        }
    }
}
