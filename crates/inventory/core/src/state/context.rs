//! Character facts the engine consults but never mutates.

use bitflags::bitflags;

bitflags! {
    /// Class capabilities that widen the equipment slot candidates.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u8 {
        /// One-handed weapons may also go into the off-hand.
        const DUAL_WIELD = 1 << 0;
        /// Two-handed weapons may be held in both hands at once.
        const TITAN_GRIP = 1 << 1;
    }
}

bitflags! {
    /// Transient conditions that block inventory changes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PlayerStatus: u8 {
        const DEAD         = 1 << 0;
        const IN_COMBAT    = 1 << 1;
        const ARENA_LOCKED = 1 << 2;
    }
}

/// Read-only view of the character state the engine needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerContext {
    pub level: u8,
    pub capabilities: Capabilities,
    pub status: PlayerStatus,
}

impl PlayerContext {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_status(mut self, status: PlayerStatus) -> Self {
        self.status = status;
        self
    }

    #[inline]
    pub fn can_dual_wield(&self) -> bool {
        self.capabilities.contains(Capabilities::DUAL_WIELD)
    }

    #[inline]
    pub fn has_titan_grip(&self) -> bool {
        self.capabilities.contains(Capabilities::TITAN_GRIP)
    }
}
