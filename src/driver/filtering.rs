//! Multicast destination filtering
//!
//! The MAC has three perfect-match address slots (MACA1-MACA3) besides the
//! station address. [`MulticastFilter`] keeps a software copy of those slots
//! and falls back to pass-all-multicast (`MACFFR.PAM`) once they are
//! exhausted, so subscribing never fails.
//!
//! The fallback stays on until [`MulticastFilter::reset`]; removing groups
//! later does not turn it back off.

use crate::internal::constants::MULTICAST_FILTER_SLOTS;
use crate::internal::register::RegisterBlock;
use crate::internal::register::mac::MacRegs;

/// One perfect-match filter slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterSlot {
    /// Address last programmed into the slot
    pub address: Option<[u8; 6]>,
    /// Address Enable bit state
    pub enabled: bool,
}

/// Result of [`MulticastFilter::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterOutcome {
    /// Address already held by a slot (1-3); the slot is enabled
    Existing(usize),
    /// Address written into a previously unused slot (1-3)
    Programmed(usize),
    /// No slot left; pass-all-multicast is enabled
    PassAll,
}

/// Software view of the hardware multicast filter
#[derive(Debug, Clone)]
pub struct MulticastFilter {
    slots: [FilterSlot; MULTICAST_FILTER_SLOTS],
    pass_all: bool,
}

impl MulticastFilter {
    /// Empty table, fallback off
    pub const fn new() -> Self {
        Self {
            slots: [FilterSlot {
                address: None,
                enabled: false,
            }; MULTICAST_FILTER_SLOTS],
            pass_all: false,
        }
    }

    /// Clear every slot and the fallback in software and hardware
    pub fn reset<R: RegisterBlock>(&mut self, mac: &MacRegs<'_, R>) {
        self.slots = [FilterSlot::default(); MULTICAST_FILTER_SLOTS];
        self.pass_all = false;
        mac.clear_all_mac_filters();
        mac.set_pass_all_multicast(false);
    }

    /// Accept frames addressed to `addr`
    pub fn add<R: RegisterBlock>(&mut self, mac: &MacRegs<'_, R>, addr: &[u8; 6]) -> FilterOutcome {
        if let Some(index) = self.slots.iter().position(|s| s.address.as_ref() == Some(addr)) {
            if !self.slots[index].enabled {
                mac.set_mac_filter_enabled(index + 1, true);
                self.slots[index].enabled = true;
            }
            return FilterOutcome::Existing(index + 1);
        }

        if let Some(index) = self.slots.iter().position(|s| !s.enabled) {
            mac.set_mac_filter(index + 1, addr, true);
            self.slots[index] = FilterSlot {
                address: Some(*addr),
                enabled: true,
            };
            return FilterOutcome::Programmed(index + 1);
        }

        if !self.pass_all {
            #[cfg(feature = "defmt")]
            defmt::warn!("multicast filter full, passing all multicast");
            #[cfg(feature = "log")]
            log::warn!("multicast filter full, passing all multicast");
            mac.set_pass_all_multicast(true);
            self.pass_all = true;
        }
        FilterOutcome::PassAll
    }

    /// Stop accepting `addr` through its perfect-match slot
    ///
    /// Returns `false` if no slot holds the address. The slot keeps the
    /// address with Address Enable cleared so a later `add` re-enables it.
    pub fn remove<R: RegisterBlock>(&mut self, mac: &MacRegs<'_, R>, addr: &[u8; 6]) -> bool {
        match self.slots.iter().position(|s| s.address.as_ref() == Some(addr)) {
            Some(index) => {
                mac.set_mac_filter_enabled(index + 1, false);
                self.slots[index].enabled = false;
                true
            }
            None => false,
        }
    }

    /// Slot table, index 0 is hardware slot 1
    pub fn slots(&self) -> &[FilterSlot; MULTICAST_FILTER_SLOTS] {
        &self.slots
    }

    /// Pass-all-multicast fallback is active
    pub fn is_pass_all(&self) -> bool {
        self.pass_all
    }

    /// Number of enabled slots
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.enabled).count()
    }
}

impl Default for MulticastFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an IPv4 multicast group to its Ethernet address (`01:00:5E` + low 23 bits)
pub const fn multicast_mac_for_ipv4(group: [u8; 4]) -> [u8; 6] {
    [0x01, 0x00, 0x5E, group[1] & 0x7F, group[2], group[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::register::mac::MACFFR;
    use crate::testing::SimulatedMac;

    const GROUP_A: [u8; 6] = [0x01, 0x00, 0x5E, 0x00, 0x00, 0x01];
    const GROUP_B: [u8; 6] = [0x01, 0x00, 0x5E, 0x00, 0x00, 0xFB];
    const GROUP_C: [u8; 6] = [0x01, 0x00, 0x5E, 0x7F, 0xFF, 0xFA];
    const GROUP_D: [u8; 6] = [0x33, 0x33, 0x00, 0x00, 0x00, 0x01];

    #[test]
    fn ipv4_group_mapping() {
        assert_eq!(multicast_mac_for_ipv4([224, 0, 0, 251]), GROUP_B);
        assert_eq!(multicast_mac_for_ipv4([239, 255, 255, 250]), GROUP_C);
        // High bit of the second octet is dropped
        assert_eq!(multicast_mac_for_ipv4([224, 128, 0, 1]), GROUP_A);
    }

    #[test]
    fn add_programs_first_free_slot() {
        let sim = SimulatedMac::new();
        let mac = MacRegs::new(&sim);
        let mut filter = MulticastFilter::new();

        assert_eq!(filter.add(&mac, &GROUP_A), FilterOutcome::Programmed(1));
        assert_eq!(filter.add(&mac, &GROUP_B), FilterOutcome::Programmed(2));
        assert_eq!(mac.mac_filter(1), Some((GROUP_A, true)));
        assert_eq!(mac.mac_filter(2), Some((GROUP_B, true)));
        assert_eq!(filter.active_count(), 2);
    }

    #[test]
    fn add_is_idempotent() {
        let sim = SimulatedMac::new();
        let mac = MacRegs::new(&sim);
        let mut filter = MulticastFilter::new();

        filter.add(&mac, &GROUP_A);
        assert_eq!(filter.add(&mac, &GROUP_A), FilterOutcome::Existing(1));
        assert_eq!(filter.active_count(), 1);
        assert!(!filter.is_pass_all());
    }

    #[test]
    fn fourth_address_falls_back_to_pass_all() {
        let sim = SimulatedMac::new();
        let mac = MacRegs::new(&sim);
        let mut filter = MulticastFilter::new();

        filter.add(&mac, &GROUP_A);
        filter.add(&mac, &GROUP_B);
        filter.add(&mac, &GROUP_C);
        assert_eq!(filter.add(&mac, &GROUP_D), FilterOutcome::PassAll);

        assert!(filter.is_pass_all());
        assert!(mac.is_pass_all_multicast());
        for group in [GROUP_A, GROUP_B, GROUP_C, GROUP_D] {
            assert!(sim.accepts_destination(&group));
        }
    }

    #[test]
    fn remove_disables_slot_and_add_reenables() {
        let sim = SimulatedMac::new();
        let mac = MacRegs::new(&sim);
        let mut filter = MulticastFilter::new();

        filter.add(&mac, &GROUP_A);
        assert!(filter.remove(&mac, &GROUP_A));
        assert_eq!(mac.mac_filter(1), Some((GROUP_A, false)));
        assert!(!sim.accepts_destination(&GROUP_A));

        assert_eq!(filter.add(&mac, &GROUP_A), FilterOutcome::Existing(1));
        assert!(sim.accepts_destination(&GROUP_A));
    }

    #[test]
    fn disabled_slot_is_reused_for_new_address() {
        let sim = SimulatedMac::new();
        let mac = MacRegs::new(&sim);
        let mut filter = MulticastFilter::new();

        filter.add(&mac, &GROUP_A);
        filter.add(&mac, &GROUP_B);
        filter.add(&mac, &GROUP_C);
        filter.remove(&mac, &GROUP_B);

        assert_eq!(filter.add(&mac, &GROUP_D), FilterOutcome::Programmed(2));
        assert!(!filter.is_pass_all());
        assert!(!sim.accepts_destination(&GROUP_B));
    }

    #[test]
    fn remove_unknown_address() {
        let sim = SimulatedMac::new();
        let mac = MacRegs::new(&sim);
        let mut filter = MulticastFilter::new();

        assert!(!filter.remove(&mac, &GROUP_A));
    }

    #[test]
    fn fallback_persists_until_reset() {
        let sim = SimulatedMac::new();
        let mac = MacRegs::new(&sim);
        let mut filter = MulticastFilter::new();

        for group in [GROUP_A, GROUP_B, GROUP_C, GROUP_D] {
            filter.add(&mac, &group);
        }
        filter.remove(&mac, &GROUP_A);
        assert!(filter.is_pass_all());

        filter.reset(&mac);
        assert!(!filter.is_pass_all());
        assert_eq!(sim.peek(MACFFR), 0);
        assert_eq!(filter.active_count(), 0);
        assert_eq!(mac.mac_filter(3), Some(([0; 6], false)));
    }
}
