//! KS8721 vendor-specific registers (16-31)

#![allow(dead_code)]

/// PHYIDR1 value
pub const PHY_ID1: u16 = 0x0022;
/// PHYIDR2 value
pub const PHY_ID2: u16 = 0x1619;

/// Vendor register addresses
pub mod reg {
    /// RXER counter
    pub const RXERCR: u8 = 0x15;
    /// Interrupt control/status
    pub const ICSR: u8 = 0x1B;
    /// 100BASE-TX PHY controller
    pub const PHYCR: u8 = 0x1F;
}

/// Interrupt control/status register (0x1B)
///
/// The upper byte holds enables, the lower byte the matching flags. Reading
/// the register clears the flags.
pub mod icsr {
    /// Jabber interrupt enable
    pub const JABBER_EN: u16 = 1 << 15;
    /// Receive error interrupt enable
    pub const RECV_ERR_EN: u16 = 1 << 14;
    /// Page received interrupt enable
    pub const PAGE_RECVD_EN: u16 = 1 << 13;
    /// Parallel detect fault interrupt enable
    pub const PARALLEL_FAULT_EN: u16 = 1 << 12;
    /// Link partner acknowledge interrupt enable
    pub const LP_ACK_EN: u16 = 1 << 11;
    /// Link down interrupt enable
    pub const LINK_DOWN_EN: u16 = 1 << 10;
    /// Remote fault interrupt enable
    pub const REMOTE_FAULT_EN: u16 = 1 << 9;
    /// Link up interrupt enable
    pub const LINK_UP_EN: u16 = 1 << 8;

    /// Jabber occurred
    pub const JABBER: u16 = 1 << 7;
    /// Receive error occurred
    pub const RECV_ERR: u16 = 1 << 6;
    /// Page received
    pub const PAGE_RECVD: u16 = 1 << 5;
    /// Parallel detect fault
    pub const PARALLEL_FAULT: u16 = 1 << 4;
    /// Link partner acknowledge
    pub const LP_ACK: u16 = 1 << 3;
    /// Link went down
    pub const LINK_DOWN: u16 = 1 << 2;
    /// Remote fault
    pub const REMOTE_FAULT: u16 = 1 << 1;
    /// Link came up
    pub const LINK_UP: u16 = 1 << 0;

    /// Lower byte
    pub const FLAGS_MASK: u16 = 0x00FF;
}

/// 100BASE-TX PHY controller register (0x1F)
pub mod phycr {
    /// Disable MDI/MDI-X pair swap
    pub const PAIRSWAP_DIS: u16 = 1 << 13;
    /// Energy detected on the line
    pub const ENERGY_DETECT: u16 = 1 << 12;
    /// Force link pass
    pub const FORCE_LINK: u16 = 1 << 11;
    /// Power saving
    pub const POWER_SAVING: u16 = 1 << 10;
    /// Interrupt pin active high
    pub const INTERRUPT_LEVEL: u16 = 1 << 9;
    /// Jabber counter enable
    pub const ENABLE_JABBER: u16 = 1 << 8;
    /// Auto-negotiation complete
    pub const AUTONEG_COMPLETE: u16 = 1 << 7;
    /// Pause negotiated
    pub const ENABLE_PAUSE: u16 = 1 << 6;
    /// PHY isolated
    pub const PHY_ISOLATE: u16 = 1 << 5;

    /// Operation mode indication (bits 4:2)
    pub const MODE_MASK: u16 = 0x7 << 2;
    /// Still negotiating
    pub const MODE_AUTONEG: u16 = 0x0 << 2;
    /// 10BASE-T half duplex
    pub const MODE_10HD: u16 = 0x1 << 2;
    /// 100BASE-TX half duplex
    pub const MODE_100HD: u16 = 0x2 << 2;
    /// 10BASE-T full duplex
    pub const MODE_10FD: u16 = 0x5 << 2;
    /// 100BASE-TX full duplex
    pub const MODE_100FD: u16 = 0x6 << 2;
    /// PHY/MII isolated
    pub const MODE_ISOLATE: u16 = 0x7 << 2;
}
