//! smoltcp Network Stack Integration
#![cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
//!
//! Implements `smoltcp::phy::Device` for [`NetInterface`], so the interface
//! can back a smoltcp `Interface` directly.
//!
//! smoltcp pulls frames itself, so the application keeps the link and the
//! rings serviced with [`NetInterface::maintain`] instead of `poll`:
//!
//! ```ignore
//! use smoltcp::iface::{Config, Interface, SocketSet};
//! use smoltcp::wire::{IpAddress, IpCidr};
//!
//! let config = Config::new(ethernet_address(&iface).into());
//! let mut net = Interface::new(config, &mut iface, Instant::ZERO);
//! net.update_ip_addrs(|addrs| {
//!     addrs.push(IpCidr::new(IpAddress::v4(192, 168, 1, 100), 24)).unwrap();
//! });
//!
//! loop {
//!     iface.maintain(&mut link_observer);
//!     net.poll(now(), &mut iface, &mut sockets);
//! }
//! ```
//!
//! # Tokens
//!
//! `Device::receive` must hand out an RX and a TX token at once. The frame is
//! copied out of the ring while `receive` runs, so [`NetRxToken`] owns its
//! bytes and only [`NetTxToken`] borrows the interface.

use embedded_hal::delay::DelayNs;
use smoltcp::phy::{Checksum, ChecksumCapabilities, Device, DeviceCapabilities, Medium};
use smoltcp::time::Instant;

use crate::driver::config::{State, TxChecksumMode};
use crate::driver::interface::NetInterface;
use crate::internal::constants::{CRC_SIZE, ETH_HEADER_SIZE, MAX_FRAME_SIZE};
use crate::internal::register::RegisterBlock;
use crate::phy::PhyDriver;

#[cfg(feature = "log")]
use log::warn;

// =============================================================================
// RX Token
// =============================================================================

/// Receive token holding a copy of one frame
pub struct NetRxToken {
    frame: [u8; MAX_FRAME_SIZE],
    len: usize,
}

impl smoltcp::phy::RxToken for NetRxToken {
    fn consume<R, F>(self, f: F) -> R
    where
        F: FnOnce(&[u8]) -> R,
    {
        f(&self.frame[..self.len])
    }
}

// =============================================================================
// TX Token
// =============================================================================

/// Transmit token building the frame in a pool buffer
///
/// Frames that fit one buffer are written in place; longer frames go through
/// a stack copy and are split by [`NetInterface::send`].
pub struct NetTxToken<'a, R, D, P, const RX: usize, const TX: usize, const BUF: usize, const POOL: usize>
where
    R: RegisterBlock + Copy,
    D: DelayNs,
    P: PhyDriver,
{
    iface: &'a mut NetInterface<R, D, P, RX, TX, BUF, POOL>,
}

impl<R, D, P, const RX: usize, const TX: usize, const BUF: usize, const POOL: usize> smoltcp::phy::TxToken
    for NetTxToken<'_, R, D, P, RX, TX, BUF, POOL>
where
    R: RegisterBlock + Copy,
    D: DelayNs,
    P: PhyDriver,
{
    fn consume<T, F>(self, len: usize, f: F) -> T
    where
        F: FnOnce(&mut [u8]) -> T,
    {
        let len = len.min(MAX_FRAME_SIZE - CRC_SIZE);

        if len <= BUF
            && let Some(mut buffer) = self.iface.alloc_buffer()
        {
            buffer.set_len(len);
            let result = f(buffer.as_mut_slice());
            if let Err(err) = self.iface.transmit([buffer]) {
                log_tx_drop(err);
            }
            return result;
        }

        let mut scratch = [0u8; MAX_FRAME_SIZE];
        let result = f(&mut scratch[..len]);
        if let Err(err) = self.iface.send(&scratch[..len]) {
            log_tx_drop(err);
        }
        result
    }
}

/// smoltcp has no error path out of `consume`; the frame is dropped.
#[allow(unused_variables)]
fn log_tx_drop(err: crate::driver::error::Error) {
    #[cfg(feature = "defmt")]
    defmt::warn!("smoltcp TX dropped: {}", err);
    #[cfg(feature = "log")]
    warn!("smoltcp TX dropped: {err}");
}

// =============================================================================
// Device Implementation
// =============================================================================

impl<R, D, P, const RX: usize, const TX: usize, const BUF: usize, const POOL: usize> Device
    for NetInterface<R, D, P, RX, TX, BUF, POOL>
where
    R: RegisterBlock + Copy,
    D: DelayNs,
    P: PhyDriver,
{
    type RxToken<'a>
        = NetRxToken
    where
        Self: 'a;
    type TxToken<'a>
        = NetTxToken<'a, R, D, P, RX, TX, BUF, POOL>
    where
        Self: 'a;

    fn receive(&mut self, _timestamp: Instant) -> Option<(Self::RxToken<'_>, Self::TxToken<'_>)> {
        if self.state() != State::Running {
            return None;
        }

        let mut frame = [0u8; MAX_FRAME_SIZE];
        let len = self.receive_into(&mut frame)?;
        Some((NetRxToken { frame, len }, NetTxToken { iface: self }))
    }

    fn transmit(&mut self, _timestamp: Instant) -> Option<Self::TxToken<'_>> {
        if self.state() != State::Running {
            return None;
        }

        self.recycle_tx();
        if self.tx_available() == 0 || self.buffers_available() == 0 {
            return None;
        }
        Some(NetTxToken { iface: self })
    }

    fn capabilities(&self) -> DeviceCapabilities {
        let mut caps = DeviceCapabilities::default();
        caps.medium = Medium::Ethernet;
        caps.max_transmission_unit = self.mtu() + ETH_HEADER_SIZE;
        caps.max_burst_size = Some(TX);
        caps.checksum = checksum_capabilities(self.config().tx_checksum);
        caps
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Checksums smoltcp must still compute for a given TX offload mode
///
/// Fields the MAC inserts are left to the hardware on transmit and only
/// verified by smoltcp on receive. Payload-only insertion needs a
/// pseudo-header sum smoltcp does not provide, so it counts as header only.
pub fn checksum_capabilities(mode: TxChecksumMode) -> ChecksumCapabilities {
    let mut caps = ChecksumCapabilities::default();
    match mode {
        TxChecksumMode::Disabled => {}
        TxChecksumMode::IpHeaderOnly | TxChecksumMode::IpAndPayload => {
            caps.ipv4 = Checksum::Rx;
        }
        TxChecksumMode::Full => {
            caps.ipv4 = Checksum::Rx;
            caps.udp = Checksum::Rx;
            caps.tcp = Checksum::Rx;
            caps.icmpv4 = Checksum::Rx;
        }
    }
    caps
}

/// Get the MAC address as a smoltcp EthernetAddress
pub fn ethernet_address<R, D, P, const RX: usize, const TX: usize, const BUF: usize, const POOL: usize>(
    iface: &NetInterface<R, D, P, RX, TX, BUF, POOL>,
) -> smoltcp::wire::EthernetAddress
where
    R: RegisterBlock + Copy,
    D: DelayNs,
    P: PhyDriver,
{
    smoltcp::wire::EthernetAddress(*iface.mac_address())
}
