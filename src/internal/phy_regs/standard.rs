//! IEEE 802.3 Clause 22 management registers (0-15)
//!
//! | Reg | Name    | Used for                          |
//! |-----|---------|-----------------------------------|
//! | 0   | BMCR    | reset, auto-negotiation, forcing  |
//! | 1   | BMSR    | link status, capabilities         |
//! | 2-3 | PHYIDR  | probing during address scan       |
//! | 4   | ANAR    | local advertisement               |
//! | 5   | ANLPAR  | link partner advertisement        |

#![allow(dead_code)]

/// Register addresses
pub mod phy_reg {
    /// Basic Mode Control
    pub const BMCR: u8 = 0x00;
    /// Basic Mode Status
    pub const BMSR: u8 = 0x01;
    /// PHY Identifier 1 (OUI bits 3:18)
    pub const PHYIDR1: u8 = 0x02;
    /// PHY Identifier 2 (OUI bits 19:24, model, revision)
    pub const PHYIDR2: u8 = 0x03;
    /// Auto-Negotiation Advertisement
    pub const ANAR: u8 = 0x04;
    /// Auto-Negotiation Link Partner Ability
    pub const ANLPAR: u8 = 0x05;
    /// Auto-Negotiation Expansion
    pub const ANER: u8 = 0x06;
}

/// BMCR bits
pub mod bmcr {
    /// Software reset, self-clearing
    pub const RESET: u16 = 1 << 15;
    /// Loopback
    pub const LOOPBACK: u16 = 1 << 14;
    /// 100 Mbps when set and auto-negotiation is off
    pub const SPEED_100: u16 = 1 << 13;
    /// Auto-negotiation enable
    pub const AN_ENABLE: u16 = 1 << 12;
    /// Power down
    pub const POWER_DOWN: u16 = 1 << 11;
    /// Electrically isolate from the MII
    pub const ISOLATE: u16 = 1 << 10;
    /// Restart auto-negotiation, self-clearing
    pub const AN_RESTART: u16 = 1 << 9;
    /// Full duplex when set and auto-negotiation is off
    pub const DUPLEX_FULL: u16 = 1 << 8;
    /// Collision test
    pub const COLLISION_TEST: u16 = 1 << 7;
}

/// BMSR bits
pub mod bmsr {
    /// 100BASE-T4 able
    pub const T4_CAPABLE: u16 = 1 << 15;
    /// 100BASE-TX full duplex able
    pub const TX_FD_CAPABLE: u16 = 1 << 14;
    /// 100BASE-TX half duplex able
    pub const TX_HD_CAPABLE: u16 = 1 << 13;
    /// 10BASE-T full duplex able
    pub const T10_FD_CAPABLE: u16 = 1 << 12;
    /// 10BASE-T half duplex able
    pub const T10_HD_CAPABLE: u16 = 1 << 11;
    /// Management frames accepted without preamble
    pub const MF_PREAMBLE_SUPP: u16 = 1 << 6;
    /// Auto-negotiation complete
    pub const AN_COMPLETE: u16 = 1 << 5;
    /// Remote fault
    pub const REMOTE_FAULT: u16 = 1 << 4;
    /// Auto-negotiation able
    pub const AN_ABILITY: u16 = 1 << 3;
    /// Link is up (latched low)
    pub const LINK_STATUS: u16 = 1 << 2;
    /// Jabber detected
    pub const JABBER_DETECT: u16 = 1 << 1;
    /// Extended register set present
    pub const EXT_CAPABLE: u16 = 1 << 0;
}

/// ANAR / ANLPAR technology ability bits (shared layout)
pub mod anar {
    /// Next page
    pub const NEXT_PAGE: u16 = 1 << 15;
    /// Acknowledge (ANLPAR only)
    pub const ACK: u16 = 1 << 14;
    /// Remote fault
    pub const REMOTE_FAULT: u16 = 1 << 13;
    /// Asymmetric pause
    pub const PAUSE_ASYM: u16 = 1 << 11;
    /// Symmetric pause
    pub const PAUSE: u16 = 1 << 10;
    /// 100BASE-T4
    pub const T4: u16 = 1 << 9;
    /// 100BASE-TX full duplex
    pub const TX_FD: u16 = 1 << 8;
    /// 100BASE-TX half duplex
    pub const TX_HD: u16 = 1 << 7;
    /// 10BASE-T full duplex
    pub const T10_FD: u16 = 1 << 6;
    /// 10BASE-T half duplex
    pub const T10_HD: u16 = 1 << 5;
    /// Selector field
    pub const SELECTOR_MASK: u16 = 0x001F;
    /// IEEE 802.3 selector
    pub const SELECTOR_IEEE802_3: u16 = 0x0001;
}
