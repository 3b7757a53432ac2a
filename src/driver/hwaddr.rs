//! Factory hardware address.
//!
//! Boards may burn a MAC address into the first OTP block. Blank parts fall
//! back to a locally administered address derived from the 96-bit unique ID.

/// STM32F2 OTP area
pub const OTP_BASE: usize = 0x1FFF_7800;

/// STM32F2 unique device ID
pub const UID_BASE: usize = 0x1FFF_7A10;

/// Locally administered prefix used for blank OTP
pub const FALLBACK_OUI: [u8; 3] = [0x32, 0xCC, 0xDD];

/// Pick the OTP address, or build one from the unique ID if the OTP is blank
pub fn hwaddr_from_otp(otp: &[u8; 6], uid: &[u8; 12]) -> [u8; 6] {
    if otp.iter().all(|&b| b == 0xFF) {
        [
            FALLBACK_OUI[0],
            FALLBACK_OUI[1],
            FALLBACK_OUI[2],
            uid[0],
            uid[1],
            uid[2],
        ]
    } else {
        *otp
    }
}

/// Read the factory MAC address from OTP / unique ID
///
/// # Safety
/// Must run on an STM32F2x7; the OTP and UID areas are read directly.
pub unsafe fn read_factory_mac_address() -> [u8; 6] {
    let mut otp = [0u8; 6];
    let mut uid = [0u8; 12];
    for (i, byte) in otp.iter_mut().enumerate() {
        // SAFETY: OTP block 0 is always readable on this family
        *byte = unsafe { core::ptr::read_volatile((OTP_BASE + i) as *const u8) };
    }
    for (i, byte) in uid.iter_mut().enumerate() {
        // SAFETY: the unique ID is always readable on this family
        *byte = unsafe { core::ptr::read_volatile((UID_BASE + i) as *const u8) };
    }
    hwaddr_from_otp(&otp, &uid)
}
