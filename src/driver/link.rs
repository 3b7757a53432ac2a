//! Link state tracking.
//!
//! [`LinkMonitor`] turns successive PHY observations into edge events so the
//! MAC is reprogrammed and the upper layer notified once per transition.

use crate::phy::LinkStatus;

/// Link state as seen by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Not yet observed
    #[default]
    Unknown,
    /// No carrier
    Down,
    /// Carrier with the negotiated mode
    Up(LinkStatus),
}

impl LinkState {
    /// Link is up
    pub const fn is_up(&self) -> bool {
        matches!(self, LinkState::Up(_))
    }
}

/// Edge reported by [`LinkMonitor::observe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkTransition {
    /// Link came up
    Up(LinkStatus),
    /// Link went down
    Down,
}

/// Edge detector over PHY link observations
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkMonitor {
    state: LinkState,
}

impl LinkMonitor {
    /// Monitor in the `Unknown` state
    pub const fn new() -> Self {
        Self {
            state: LinkState::Unknown,
        }
    }

    /// Current state
    pub const fn state(&self) -> LinkState {
        self.state
    }

    /// Feed an observation (`Some(mode)` = up, `None` = down)
    ///
    /// Up is reported when coming from `Unknown` or `Down`; Down when coming
    /// from `Unknown` or `Up`. A repeated observation reports nothing, even
    /// if the mode differs.
    pub fn observe(&mut self, link: Option<LinkStatus>) -> Option<LinkTransition> {
        match (self.state, link) {
            (LinkState::Up(_), Some(_)) | (LinkState::Down, None) => None,
            (_, Some(status)) => {
                self.state = LinkState::Up(status);
                Some(LinkTransition::Up(status))
            }
            (_, None) => {
                self.state = LinkState::Down;
                Some(LinkTransition::Down)
            }
        }
    }

    /// Forget the observed state
    pub fn reset(&mut self) {
        self.state = LinkState::Unknown;
    }
}
